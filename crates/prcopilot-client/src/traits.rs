use async_trait::async_trait;
use prcopilot_core::summary::PrSummary;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("connection failed: {0}")]
    Transport(String),

    #[error("backend returned {status}: {message}")]
    Backend { status: u16, message: String },

    #[error("malformed response: {0}")]
    Malformed(String),
}

/// Abstraction over the review backend.
///
/// The TUI programs against this trait. `HttpService` is the production
/// implementation over the backend's HTTP contract.
#[async_trait]
pub trait ReviewService: Send + Sync {
    /// Fetch the current set of pending summaries, in backend order.
    async fn list_summaries(&self) -> Result<Vec<PrSummary>, ServiceError>;

    /// Record an approve decision for the given PR.
    async fn approve(&self, pr_id: i64) -> Result<(), ServiceError>;

    /// Record a reject decision for the given PR.
    async fn reject(&self, pr_id: i64) -> Result<(), ServiceError>;
}
