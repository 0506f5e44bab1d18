use async_trait::async_trait;
use thiserror::Error;

use parley_core::domain::submission::SubmissionRecord;

pub mod memory;
pub mod submission;

pub use memory::InMemorySubmissionStore;
pub use submission::SqlSubmissionStore;

#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("decode error: {0}")]
    Decode(String),
}

/// Destination for confirmed feature requests. Each record is written once
/// and never updated.
#[async_trait]
pub trait SubmissionStore: Send + Sync {
    async fn insert(&self, record: SubmissionRecord) -> Result<(), RepositoryError>;
}
