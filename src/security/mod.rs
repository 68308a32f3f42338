pub mod store;
pub mod token;

pub use store::{MemoryTokenStore, TokenStore};
pub use token::TokenManager;
