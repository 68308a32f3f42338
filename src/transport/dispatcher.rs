use reqwest::{Client, Method, RequestBuilder};
use std::sync::Arc;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::config::ProxyConfig;
use crate::error::{ProxyError, Result};
use crate::security::store::{MemoryTokenStore, TokenStore};
use crate::security::token::TokenManager;
use crate::transport::{ProxyResponse, RequestBody, RequestOptions};

/// Authenticated HTTP client for the Proxy Service.
///
/// Owns the token lifecycle: every call resolves a cached bearer token,
/// dispatches with a bounded transport retry, and recovers a single 401 by
/// refreshing the token and replaying the request exactly once.
#[derive(Clone)]
pub struct ProxyClient {
    config: ProxyConfig,
    http: Client,
    tokens: TokenManager,
}

impl ProxyClient {
    /// Client with a private in-memory token cache.
    pub fn new(config: ProxyConfig) -> Result<Self> {
        Self::with_store(config, Arc::new(MemoryTokenStore::new()))
    }

    /// Client with an injected token cache backend.
    pub fn with_store(config: ProxyConfig, store: Arc<dyn TokenStore>) -> Result<Self> {
        let http = Client::builder()
            .timeout(config.timeout())
            .user_agent(crate::USER_AGENT)
            .build()
            .map_err(|e| ProxyError::other(format!("building HTTP client: {e}")))?;

        let tokens = TokenManager::new(&config.jwt_secret, store);

        Ok(Self {
            config,
            http,
            tokens,
        })
    }

    pub fn tokens(&self) -> &TokenManager {
        &self.tokens
    }

    pub fn base_url(&self) -> &str {
        &self.config.base_url
    }

    /// Issue an authenticated request.
    ///
    /// The retry-once-on-401 invariant is the loop below: at most two
    /// dispatches, the second with a freshly signed token. A second 401 is
    /// returned to the caller as-is.
    pub async fn request(
        &self,
        method: Method,
        path: &str,
        options: RequestOptions,
    ) -> Result<ProxyResponse> {
        let url = format!("{}{}", self.config.base_url, path);
        let mut token = self.tokens.bearer().await?;
        let mut refreshed = false;

        loop {
            debug!(method = %method, url = %url, "dispatching request to Proxy Service");
            let response = self.dispatch(&method, &url, &options, &token).await?;
            debug!(status = %response.status, url = %url, "Proxy Service responded");

            if response.status == 401 && !refreshed {
                warn!(url = %url, "bearer token rejected, refreshing");
                token = self.tokens.refresh().await?;
                refreshed = true;
                continue;
            }

            return Ok(response);
        }
    }

    pub async fn get(&self, path: &str) -> Result<ProxyResponse> {
        self.request(Method::GET, path, RequestOptions::default())
            .await
    }

    pub async fn post(&self, path: &str, body: RequestBody) -> Result<ProxyResponse> {
        self.request(Method::POST, path, RequestOptions::with_body(body))
            .await
    }

    pub async fn put(&self, path: &str, body: RequestBody) -> Result<ProxyResponse> {
        self.request(Method::PUT, path, RequestOptions::with_body(body))
            .await
    }

    pub async fn delete(&self, path: &str) -> Result<ProxyResponse> {
        self.request(Method::DELETE, path, RequestOptions::default())
            .await
    }

    /// Single authenticated exchange, with the transport retry loop.
    ///
    /// Connect-class failures are retried up to the configured budget;
    /// timeouts surface immediately so no call overruns its deadline.
    async fn dispatch(
        &self,
        method: &Method,
        url: &str,
        options: &RequestOptions,
        token: &str,
    ) -> Result<ProxyResponse> {
        let mut attempt = 0u32;

        loop {
            let request = self.build(method.clone(), url, options, token)?;

            match request.send().await {
                Ok(response) => {
                    let status = response.status().as_u16();
                    let body = response
                        .text()
                        .await
                        .map_err(|e| ProxyError::other(format!("reading response body: {e}")))?;
                    return Ok(ProxyResponse { status, body });
                }
                Err(err) if err.is_connect() && attempt < self.config.max_retries => {
                    attempt += 1;
                    debug!(
                        attempt = attempt,
                        url = %url,
                        error = %err,
                        "connect failure, retrying"
                    );
                }
                Err(err) if err.is_connect() || err.is_timeout() => {
                    return Err(ProxyError::Connection(err.to_string()));
                }
                Err(err) => {
                    return Err(ProxyError::Client {
                        status: err.status().map(|s| s.as_u16()),
                        message: err.to_string(),
                    });
                }
            }
        }
    }

    fn build(
        &self,
        method: Method,
        url: &str,
        options: &RequestOptions,
        token: &str,
    ) -> Result<RequestBuilder> {
        let mut request = self
            .http
            .request(method, url)
            .bearer_auth(token)
            .header("X-Request-Id", Uuid::new_v4().to_string());

        if let Some(headers) = &options.headers {
            request = request.headers(headers.clone());
        }
        if let Some(timeout) = options.timeout {
            request = request.timeout(timeout);
        }

        // bodies are buffered, so a retried attempt rebuilds them losslessly
        match &options.body {
            RequestBody::Empty => {}
            RequestBody::Json(value) => request = request.json(value),
            RequestBody::Multipart(upload) => request = request.multipart(upload.to_form()?),
        }

        Ok(request)
    }
}
