use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;
use tracing::debug;

/// Cache seam for bearer tokens.
///
/// The store is injected into the client at construction, so tests and
/// embedders can supply their own backend. Entries carry a TTL; an expired
/// entry reads as absent. Individual operations are atomic, but callers may
/// race to regenerate a token concurrently — the last writer wins, which is
/// fine because independently generated tokens are interchangeable.
#[async_trait]
pub trait TokenStore: Send + Sync {
    async fn get(&self, key: &str) -> Option<String>;
    async fn set(&self, key: &str, value: String, ttl: Duration);
    async fn delete(&self, key: &str);
}

/// In-memory token store with per-entry expiry.
#[derive(Debug, Clone, Default)]
pub struct MemoryTokenStore {
    entries: Arc<RwLock<HashMap<String, (String, Instant)>>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TokenStore for MemoryTokenStore {
    async fn get(&self, key: &str) -> Option<String> {
        let expired = {
            let entries = self.entries.read().await;
            match entries.get(key) {
                Some((value, deadline)) if *deadline > Instant::now() => {
                    return Some(value.clone())
                }
                Some(_) => true,
                None => false,
            }
        };

        if expired {
            // lazy eviction of the stale entry
            self.entries.write().await.remove(key);
            debug!(key = %key, "expired token entry evicted");
        }
        None
    }

    async fn set(&self, key: &str, value: String, ttl: Duration) {
        let deadline = Instant::now() + ttl;
        self.entries
            .write()
            .await
            .insert(key.to_string(), (value, deadline));
    }

    async fn delete(&self, key: &str) {
        self.entries.write().await.remove(key);
    }
}
