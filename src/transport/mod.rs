pub mod dispatcher;

use reqwest::header::HeaderMap;
use reqwest::multipart::{Form, Part};
use serde_json::Value;
use std::time::Duration;
use uuid::Uuid;

use crate::error::{ProxyError, Result};

/// A document payload buffered for multipart upload.
///
/// The file bytes are held in memory so the request can be rebuilt and
/// replayed after a token refresh; streaming bodies are not accepted.
#[derive(Debug, Clone)]
pub struct DocumentUpload {
    pub original_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
    pub file_path: String,
    pub user_id: String,
}

impl DocumentUpload {
    /// Buffer a file for upload, deriving a storage path of the form
    /// `users/{user_id}/{uuid}{ext}` from the original name.
    pub fn new(user_id: i64, original_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        let original_name = original_name.into();
        let extension = original_name
            .rsplit_once('.')
            .map(|(_, ext)| ext.to_ascii_lowercase())
            .unwrap_or_default();

        let file_path = if extension.is_empty() {
            format!("users/{}/{}", user_id, Uuid::new_v4())
        } else {
            format!("users/{}/{}.{}", user_id, Uuid::new_v4(), extension)
        };
        let content_type = if extension.is_empty() {
            "application/octet-stream".to_string()
        } else {
            format!("application/{}", extension)
        };

        Self {
            original_name,
            content_type,
            bytes,
            file_path,
            user_id: user_id.to_string(),
        }
    }

    /// Build a fresh multipart form from the buffered fields.
    ///
    /// Called once per dispatch attempt; `reqwest` forms are single-use.
    pub(crate) fn to_form(&self) -> Result<Form> {
        let part = Part::bytes(self.bytes.clone())
            .file_name(self.original_name.clone())
            .mime_str(&self.content_type)
            .map_err(|e| ProxyError::other(format!("invalid upload content type: {e}")))?;

        Ok(Form::new()
            .part("file", part)
            .text("file_path", self.file_path.clone())
            .text("user_id", self.user_id.clone())
            .text("original_name", self.original_name.clone()))
    }
}

/// Outbound request body, fully buffered before the first attempt.
#[derive(Debug, Clone, Default)]
pub enum RequestBody {
    #[default]
    Empty,
    Json(Value),
    Multipart(DocumentUpload),
}

impl RequestBody {
    /// Serialize a typed payload into a JSON body.
    pub fn json<T: serde::Serialize>(payload: &T) -> Result<Self> {
        let value = serde_json::to_value(payload)
            .map_err(|e| ProxyError::other(format!("serializing request body: {e}")))?;
        Ok(RequestBody::Json(value))
    }
}

/// Per-call request settings. Immutable once the call is issued.
#[derive(Debug, Clone, Default)]
pub struct RequestOptions {
    pub body: RequestBody,
    pub headers: Option<HeaderMap>,
    /// Overrides the client's default timeout for this call only.
    pub timeout: Option<Duration>,
}

impl RequestOptions {
    pub fn with_body(body: RequestBody) -> Self {
        Self {
            body,
            ..Default::default()
        }
    }
}

/// Downstream response: status plus the raw body text.
#[derive(Debug, Clone)]
pub struct ProxyResponse {
    pub status: u16,
    pub body: String,
}

impl ProxyResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Parse the body as JSON.
    pub fn json(&self) -> Result<Value> {
        serde_json::from_str(&self.body)
            .map_err(|e| ProxyError::status(self.status, format!("invalid JSON body: {e}")))
    }

    /// Parse the body as a JSON array.
    pub fn json_list(&self) -> Result<Vec<Value>> {
        serde_json::from_str(&self.body)
            .map_err(|e| ProxyError::status(self.status, format!("expected JSON array: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upload_derives_storage_path() {
        let upload = DocumentUpload::new(42, "report.PDF", vec![1, 2, 3]);

        assert!(upload.file_path.starts_with("users/42/"));
        assert!(upload.file_path.ends_with(".pdf"));
        assert_eq!(upload.content_type, "application/pdf");
        assert_eq!(upload.user_id, "42");
        assert_eq!(upload.original_name, "report.PDF");
    }

    #[test]
    fn test_upload_without_extension() {
        let upload = DocumentUpload::new(7, "README", vec![]);

        assert!(!upload.file_path.contains('.'));
        assert_eq!(upload.content_type, "application/octet-stream");
    }

    #[test]
    fn test_upload_form_is_rebuildable() {
        let upload = DocumentUpload::new(1, "scan.png", vec![0xff; 16]);

        // a form can be produced for every attempt, not just the first
        assert!(upload.to_form().is_ok());
        assert!(upload.to_form().is_ok());
    }

    #[test]
    fn test_response_json() {
        let resp = ProxyResponse {
            status: 200,
            body: r#"{"id":"ord_1"}"#.to_string(),
        };
        assert!(resp.is_success());
        assert_eq!(resp.json().unwrap()["id"], "ord_1");
    }

    #[test]
    fn test_response_invalid_json() {
        let resp = ProxyResponse {
            status: 200,
            body: "<html>".to_string(),
        };
        let err = resp.json().unwrap_err();
        assert_eq!(err.http_status(), Some(200));
    }

    #[test]
    fn test_response_json_list() {
        let resp = ProxyResponse {
            status: 200,
            body: r#"[{"id":1},{"id":2}]"#.to_string(),
        };
        assert_eq!(resp.json_list().unwrap().len(), 2);
    }
}
