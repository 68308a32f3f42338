pub mod config;
pub mod error;
pub mod security;
pub mod services;
pub mod transport;
pub mod utils;

pub use config::ProxyConfig;
pub use error::{ProxyError, Result};
pub use transport::dispatcher::ProxyClient;

// Crate version exposed for runtime queries
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// User agent presented to the Proxy Service on every request.
pub const USER_AGENT: &str = concat!("proxy-client/", env!("CARGO_PKG_VERSION"));
