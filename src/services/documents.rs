use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{error, info, warn};

use crate::error::{ProxyError, Result};
use crate::transport::dispatcher::ProxyClient;
use crate::transport::{DocumentUpload, RequestBody};

fn default_analysis_type() -> String {
    "ocr".to_string()
}

/// Payload for starting an analysis job on an uploaded document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisRequest {
    pub document_id: String,
    #[serde(default = "default_analysis_type")]
    pub analysis_type: String,
}

impl AnalysisRequest {
    pub fn new(document_id: impl Into<String>) -> Self {
        Self {
            document_id: document_id.into(),
            analysis_type: default_analysis_type(),
        }
    }
}

impl ProxyClient {
    /// Upload a document as multipart form data. Non-201 is a hard failure.
    pub async fn upload_document(&self, upload: DocumentUpload) -> Result<Value> {
        let response = self
            .post("/api/documents/upload/", RequestBody::Multipart(upload))
            .await?;

        match response.status {
            201 => {
                let body = response.json()?;
                info!(document_id = ?body.get("id"), "document uploaded");
                Ok(body)
            }
            status => {
                error!(status, body = %response.body, "document upload failed");
                Err(ProxyError::status(status, "document upload failed"))
            }
        }
    }

    /// Processing status of a document; unavailable reads as `None`.
    pub async fn get_document_status(&self, document_id: &str) -> Option<Value> {
        match self
            .get(&format!("/api/documents/{document_id}/status/"))
            .await
        {
            Ok(response) if response.status == 200 => response.json().ok(),
            Ok(response) => {
                error!(
                    status = response.status,
                    document_id, "failed to get document status"
                );
                None
            }
            Err(err) => {
                error!(document_id, error = %err, "error getting document status");
                None
            }
        }
    }

    /// Analysis output for a document; unavailable reads as `None`.
    pub async fn get_document_analysis(&self, document_id: &str) -> Option<Value> {
        match self
            .get(&format!("/api/documents/{document_id}/analysis/"))
            .await
        {
            Ok(response) if response.status == 200 => response.json().ok(),
            Ok(response) => {
                warn!(
                    status = response.status,
                    document_id, "analysis not available"
                );
                None
            }
            Err(err) => {
                error!(document_id, error = %err, "error getting document analysis");
                None
            }
        }
    }

    /// Delete a document. Any error reads as "not deleted".
    pub async fn delete_document(&self, document_id: &str) -> bool {
        match self.delete(&format!("/api/documents/{document_id}/")).await {
            Ok(response) if matches!(response.status, 200 | 204) => {
                info!(document_id, "document deleted");
                true
            }
            Ok(response) => {
                error!(
                    status = response.status,
                    document_id, "failed to delete document"
                );
                false
            }
            Err(err) => {
                error!(document_id, error = %err, "error deleting document");
                false
            }
        }
    }

    /// Kick off an analysis job. The service acknowledges with 202.
    pub async fn start_analysis(&self, request: &AnalysisRequest) -> Result<Value> {
        let response = self
            .post("/api/analysis/start/", RequestBody::json(request)?)
            .await?;

        match response.status {
            202 => {
                let body = response.json()?;
                info!(job_id = ?body.get("job_id"), "analysis started");
                Ok(body)
            }
            status => {
                error!(status, body = %response.body, "failed to start analysis");
                Err(ProxyError::status(status, "failed to start analysis"))
            }
        }
    }

    /// Status of a running analysis job; unavailable reads as `None`.
    pub async fn get_analysis_status(&self, job_id: &str) -> Option<Value> {
        match self.get(&format!("/api/analysis/{job_id}/status/")).await {
            Ok(response) if response.status == 200 => response.json().ok(),
            Ok(response) => {
                warn!(status = response.status, job_id, "analysis status not available");
                None
            }
            Err(err) => {
                error!(job_id, error = %err, "error getting analysis status");
                None
            }
        }
    }

    /// List a user's documents, degrading to an empty list on any failure.
    pub async fn list_user_documents(&self, user_id: i64) -> Vec<Value> {
        match self.get(&format!("/api/documents/?user_id={user_id}")).await {
            Ok(response) if response.status == 200 => match response.json_list() {
                Ok(documents) => documents,
                Err(err) => {
                    error!(user_id, error = %err, "malformed document list payload");
                    Vec::new()
                }
            },
            Ok(response) => {
                error!(
                    status = response.status,
                    user_id, "failed to list documents"
                );
                Vec::new()
            }
            Err(err) => {
                error!(user_id, error = %err, "error listing documents");
                Vec::new()
            }
        }
    }
}
