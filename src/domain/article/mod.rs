pub mod error;
pub mod fingerprint;
pub mod model;
pub mod service;

pub use error::GenerationError;
pub use fingerprint::fingerprint;
pub use model::{Article, ArticleStatus, ArticleSummary, Sentence};
pub use service::ArticleService;
