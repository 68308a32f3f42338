use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{error, info, warn};

use crate::error::{ProxyError, Result};
use crate::transport::dispatcher::ProxyClient;
use crate::transport::RequestBody;

/// Payload for creating an analysis order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderRequest {
    pub document_id: String,
    pub service_type: String,
    pub user_id: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub callback_url: Option<String>,
}

impl ProxyClient {
    /// Create a new order. Any non-201 outcome is a hard failure.
    pub async fn create_order(&self, order: &OrderRequest) -> Result<Value> {
        let response = self.post("/orders/", RequestBody::json(order)?).await?;

        match response.status {
            201 => {
                let body = response.json()?;
                info!(order_id = ?body.get("id"), "order created");
                Ok(body)
            }
            status => {
                error!(status, body = %response.body, "failed to create order");
                Err(ProxyError::status(status, "failed to create order"))
            }
        }
    }

    /// Fetch full order details.
    pub async fn get_order(&self, order_id: &str) -> Result<Value> {
        let response = self.get(&format!("/orders/{order_id}/")).await?;

        match response.status {
            200 => response.json(),
            status => {
                error!(status, order_id, body = %response.body, "failed to get order");
                Err(ProxyError::status(status, "failed to get order"))
            }
        }
    }

    /// Fetch the processing status of an order.
    pub async fn get_order_status(&self, order_id: &str) -> Result<Value> {
        let response = self.get(&format!("/orders/{order_id}/status/")).await?;

        match response.status {
            200 => response.json(),
            status => {
                error!(status, order_id, body = %response.body, "failed to get order status");
                Err(ProxyError::status(status, "failed to get order status"))
            }
        }
    }

    /// Fetch analysis results for an order.
    ///
    /// 404 means the results simply do not exist yet and is not an error.
    pub async fn get_order_results(&self, order_id: &str) -> Result<Option<Value>> {
        let response = self.get(&format!("/orders/{order_id}/results/")).await?;

        match response.status {
            200 => Ok(Some(response.json()?)),
            404 => {
                warn!(order_id, "order results not available yet");
                Ok(None)
            }
            status => {
                error!(status, order_id, body = %response.body, "failed to get order results");
                Err(ProxyError::status(status, "failed to get order results"))
            }
        }
    }

    /// Cancel an order. Never fails hard: any error reads as "not cancelled".
    pub async fn cancel_order(&self, order_id: &str) -> bool {
        match self
            .put(&format!("/orders/{order_id}/cancel/"), RequestBody::Empty)
            .await
        {
            Ok(response) if response.status == 200 => true,
            Ok(response) => {
                error!(
                    status = response.status,
                    order_id,
                    body = %response.body,
                    "failed to cancel order"
                );
                false
            }
            Err(err) => {
                error!(order_id, error = %err, "error canceling order");
                false
            }
        }
    }

    /// List a user's orders, degrading to an empty list on any failure.
    pub async fn get_user_orders(&self, user_id: i64) -> Vec<Value> {
        match self.get(&format!("/users/{user_id}/orders/")).await {
            Ok(response) if response.status == 200 => match response.json_list() {
                Ok(orders) => orders,
                Err(err) => {
                    error!(user_id, error = %err, "malformed user orders payload");
                    Vec::new()
                }
            },
            Ok(response) => {
                error!(
                    status = response.status,
                    user_id,
                    body = %response.body,
                    "failed to get user orders"
                );
                Vec::new()
            }
            Err(err) => {
                error!(user_id, error = %err, "error getting user orders");
                Vec::new()
            }
        }
    }
}
