use tokio::sync::RwLock;

use parley_core::domain::submission::SubmissionRecord;

use super::{RepositoryError, SubmissionStore};

#[derive(Default)]
pub struct InMemorySubmissionStore {
    records: RwLock<Vec<SubmissionRecord>>,
    fail_with: Option<String>,
}

impl InMemorySubmissionStore {
    /// A store whose inserts always fail with a decode error carrying `message`.
    pub fn failing(message: impl Into<String>) -> Self {
        Self { records: RwLock::default(), fail_with: Some(message.into()) }
    }

    pub async fn records(&self) -> Vec<SubmissionRecord> {
        self.records.read().await.clone()
    }
}

#[async_trait::async_trait]
impl SubmissionStore for InMemorySubmissionStore {
    async fn insert(&self, record: SubmissionRecord) -> Result<(), RepositoryError> {
        if let Some(message) = &self.fail_with {
            return Err(RepositoryError::Decode(message.clone()));
        }
        self.records.write().await.push(record);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use parley_core::domain::submission::SubmissionRecord;
    use parley_core::domain::tracker::Tracker;

    use crate::repositories::{InMemorySubmissionStore, RepositoryError, SubmissionStore};

    #[tokio::test]
    async fn in_memory_store_keeps_insert_order() {
        let store = InMemorySubmissionStore::default();
        let first = SubmissionRecord::from_tracker(&Tracker::new("a"), Utc::now());
        let second = SubmissionRecord::from_tracker(&Tracker::new("b"), Utc::now());

        store.insert(first.clone()).await.expect("insert a");
        store.insert(second.clone()).await.expect("insert b");

        assert_eq!(store.records().await, vec![first, second]);
    }

    #[tokio::test]
    async fn failing_store_rejects_and_keeps_nothing() {
        let store = InMemorySubmissionStore::failing("disk full");
        let record = SubmissionRecord::from_tracker(&Tracker::new("a"), Utc::now());

        let error = store.insert(record).await.expect_err("should fail");
        assert!(matches!(error, RepositoryError::Decode(message) if message == "disk full"));
        assert!(store.records().await.is_empty());
    }
}
