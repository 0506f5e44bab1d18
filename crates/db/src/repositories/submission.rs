use sqlx::Connection;

use parley_core::domain::submission::SubmissionRecord;

use super::{RepositoryError, SubmissionStore};
use crate::connection::open_connection;

const INSERT_SUBMISSION: &str = r#"
INSERT INTO chatbot_results
    (sender_id, user_story, initial_description, chat_description, "createdAt", "updatedAt")
VALUES (?, ?, ?, ?, ?, ?)
"#;

/// Writes submissions over a fresh connection per insert. The connection is
/// closed whether or not the insert succeeds.
#[derive(Clone, Debug)]
pub struct SqlSubmissionStore {
    database_url: String,
    timeout_secs: u64,
}

impl SqlSubmissionStore {
    pub fn new(database_url: impl Into<String>, timeout_secs: u64) -> Self {
        Self { database_url: database_url.into(), timeout_secs }
    }
}

#[async_trait::async_trait]
impl SubmissionStore for SqlSubmissionStore {
    async fn insert(&self, record: SubmissionRecord) -> Result<(), RepositoryError> {
        let mut conn = open_connection(&self.database_url, self.timeout_secs).await?;
        let inserted = sqlx::query(INSERT_SUBMISSION)
            .bind(&record.sender_id)
            .bind(&record.user_story)
            .bind(&record.initial_description)
            .bind(&record.chat_description)
            .bind(record.created_at.to_rfc3339())
            .bind(record.updated_at.to_rfc3339())
            .execute(&mut conn)
            .await;
        let closed = conn.close().await;

        inserted?;
        closed?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use chrono::{DateTime, TimeZone, Utc};
    use sqlx::{Connection, Row};
    use tempfile::TempDir;

    use parley_core::domain::submission::SubmissionRecord;

    use crate::connection::open_connection;
    use crate::migrations::run_pending_on;
    use crate::repositories::{RepositoryError, SqlSubmissionStore, SubmissionStore};

    fn record(sender_id: &str) -> SubmissionRecord {
        let now = Utc.with_ymd_and_hms(2026, 3, 1, 9, 30, 0).single().expect("timestamp");
        SubmissionRecord {
            sender_id: sender_id.to_owned(),
            user_story: Some("As a planner I want CSV export so that I can report monthly.".to_owned()),
            initial_description: r#"{"bb_request_description":"CSV export"}"#.to_owned(),
            chat_description: r#"{"feature_goal":"Monthly reporting"}"#.to_owned(),
            created_at: now,
            updated_at: now,
        }
    }

    async fn migrated_store(dir: &TempDir) -> (SqlSubmissionStore, String) {
        let url = format!("sqlite://{}", dir.path().join("submissions.db").display());
        let mut conn = open_connection(&url, 5).await.expect("open");
        run_pending_on(&mut conn).await.expect("migrate");
        conn.close().await.expect("close");
        (SqlSubmissionStore::new(url.clone(), 5), url)
    }

    /// Stored submissions for a sender, oldest first.
    async fn rows_for_sender(url: &str, sender_id: &str) -> Vec<SubmissionRecord> {
        let mut conn = open_connection(url, 5).await.expect("open");
        let rows = sqlx::query(
            r#"SELECT sender_id, user_story, initial_description, chat_description,
                      "createdAt", "updatedAt"
               FROM chatbot_results WHERE sender_id = ? ORDER BY id"#,
        )
        .bind(sender_id)
        .fetch_all(&mut conn)
        .await
        .expect("select");
        conn.close().await.expect("close");

        rows.iter()
            .map(|row| {
                let timestamp = |column: &str| {
                    let raw: String = row.get(column);
                    DateTime::parse_from_rfc3339(&raw).expect("rfc3339").with_timezone(&Utc)
                };
                SubmissionRecord {
                    sender_id: row.get("sender_id"),
                    user_story: row.get("user_story"),
                    initial_description: row.get("initial_description"),
                    chat_description: row.get("chat_description"),
                    created_at: timestamp("createdAt"),
                    updated_at: timestamp("updatedAt"),
                }
            })
            .collect()
    }

    #[tokio::test]
    async fn insert_persists_one_row_per_submission() {
        let dir = TempDir::new().expect("tempdir");
        let (store, url) = migrated_store(&dir).await;

        store.insert(record("user-1")).await.expect("first insert");
        store.insert(record("user-1")).await.expect("second insert");
        store.insert(record("user-2")).await.expect("other sender");

        let rows = rows_for_sender(&url, "user-1").await;
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0], record("user-1"));

        let chat: serde_json::Value =
            serde_json::from_str(&rows[0].chat_description).expect("chat json");
        assert_eq!(chat["feature_goal"], "Monthly reporting");
    }

    #[tokio::test]
    async fn insert_without_schema_reports_database_error() {
        let dir = TempDir::new().expect("tempdir");
        let url = format!("sqlite://{}", dir.path().join("empty.db").display());
        let store = SqlSubmissionStore::new(url, 5);

        let error = store.insert(record("user-1")).await.expect_err("missing table");
        assert!(matches!(error, RepositoryError::Database(_)));
    }
}
