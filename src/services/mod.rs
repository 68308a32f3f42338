pub mod documents;
pub mod health;
pub mod orders;

pub use documents::AnalysisRequest;
pub use orders::OrderRequest;
