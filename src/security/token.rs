use chrono::Utc;
use jsonwebtoken::{encode, EncodingKey, Header};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

use crate::error::{ProxyError, Result};
use crate::security::store::TokenStore;

/// Cache key the bearer token is stored under.
pub const TOKEN_CACHE_KEY: &str = "proxy_jwt_token";

/// Lifetime of the token itself, carried in its `exp` claim.
pub const TOKEN_LIFETIME_SECS: i64 = 3600;

/// Cache TTL, kept below the token lifetime so a cached token is never
/// served inside its final five minutes.
pub const TOKEN_CACHE_TTL: Duration = Duration::from_secs(55 * 60);

const SERVICE_NAME: &str = "django_web";
const PERMISSIONS: [&str; 3] = ["documents:read", "documents:write", "analysis:create"];

/// Claim set presented to the Proxy Service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub service: String,
    pub iat: i64,
    pub exp: i64,
    pub permissions: Vec<String>,
}

impl Claims {
    fn issue_now() -> Self {
        let iat = Utc::now().timestamp();
        Self {
            service: SERVICE_NAME.to_string(),
            iat,
            exp: iat + TOKEN_LIFETIME_SECS,
            permissions: PERMISSIONS.iter().map(|p| p.to_string()).collect(),
        }
    }
}

/// Issues and caches the signed bearer token used on every outbound call.
#[derive(Clone)]
pub struct TokenManager {
    secret: String,
    store: Arc<dyn TokenStore>,
}

impl TokenManager {
    pub fn new(secret: impl Into<String>, store: Arc<dyn TokenStore>) -> Self {
        Self {
            secret: secret.into(),
            store,
        }
    }

    /// Return the cached token, or sign and cache a fresh one.
    pub async fn bearer(&self) -> Result<String> {
        if let Some(token) = self.store.get(TOKEN_CACHE_KEY).await {
            return Ok(token);
        }

        let token = self.issue()?;
        self.store
            .set(TOKEN_CACHE_KEY, token.clone(), TOKEN_CACHE_TTL)
            .await;
        debug!("signed fresh bearer token");
        Ok(token)
    }

    /// Evict the cached token unconditionally.
    pub async fn invalidate(&self) {
        self.store.delete(TOKEN_CACHE_KEY).await;
    }

    /// Evict the cached token and sign a replacement.
    pub async fn refresh(&self) -> Result<String> {
        self.invalidate().await;
        self.bearer().await
    }

    fn issue(&self) -> Result<String> {
        let claims = Claims::issue_now();
        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.secret.as_bytes()),
        )
        .map_err(|e| ProxyError::Auth(e.to_string()))
    }
}
