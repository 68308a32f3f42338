use serde_json::Value;
use tracing::{error, warn};

use crate::transport::dispatcher::ProxyClient;

impl ProxyClient {
    /// Whether the Proxy Service is reachable and answering.
    pub async fn health_check(&self) -> bool {
        match self.get("/health/").await {
            Ok(response) => response.status == 200,
            Err(err) => {
                warn!(error = %err, "health check failed");
                false
            }
        }
    }

    /// Service status and metrics; `None` when they cannot be fetched.
    pub async fn get_service_status(&self) -> Option<Value> {
        match self.get("/status/").await {
            Ok(response) if response.status == 200 => response.json().ok(),
            Ok(response) => {
                warn!(status = response.status, "service status unavailable");
                None
            }
            Err(err) => {
                error!(error = %err, "failed to get service status");
                None
            }
        }
    }
}
