use thiserror::Error;

/// Failure taxonomy for Proxy Service calls.
///
/// Callers pattern-match on the variant: `Auth` means the bearer token could
/// not be produced at all, `Connection` means the service was unreachable
/// (after transport retries), `Client` is every other failed exchange and
/// carries the downstream status when one was received.
#[derive(Debug, Error)]
pub enum ProxyError {
    #[error("token generation failed: {0}")]
    Auth(String),

    #[error("cannot reach Proxy Service: {0}")]
    Connection(String),

    #[error("Proxy Service error: {message}")]
    Client {
        status: Option<u16>,
        message: String,
    },
}

impl ProxyError {
    /// A `Client` error for a response with a known downstream status.
    pub fn status(status: u16, message: impl Into<String>) -> Self {
        ProxyError::Client {
            status: Some(status),
            message: message.into(),
        }
    }

    /// A `Client` error with no associated response.
    pub fn other(message: impl Into<String>) -> Self {
        ProxyError::Client {
            status: None,
            message: message.into(),
        }
    }

    /// Downstream HTTP status, when the failure carries one.
    pub fn http_status(&self) -> Option<u16> {
        match self {
            ProxyError::Client { status, .. } => *status,
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, ProxyError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_helper_carries_code() {
        let err = ProxyError::status(502, "bad gateway");
        assert_eq!(err.http_status(), Some(502));
        assert!(err.to_string().contains("bad gateway"));
    }

    #[test]
    fn connection_has_no_status() {
        let err = ProxyError::Connection("connection refused".into());
        assert_eq!(err.http_status(), None);
    }
}
