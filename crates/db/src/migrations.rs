use sqlx::migrate::{MigrateError, Migrator};
use sqlx::SqliteConnection;

use crate::DbPool;

pub static MIGRATOR: Migrator = sqlx::migrate!("../../migrations");

pub async fn run_pending(pool: &DbPool) -> Result<(), MigrateError> {
    MIGRATOR.run(pool).await
}

pub async fn run_pending_on(conn: &mut SqliteConnection) -> Result<(), MigrateError> {
    MIGRATOR.run(conn).await
}

#[cfg(test)]
mod tests {
    use sqlx::Row;

    use super::{run_pending, MIGRATOR};
    use crate::connect_with_settings;

    async fn table_count(pool: &sqlx::SqlitePool, name: &str) -> i64 {
        sqlx::query(
            "SELECT COUNT(*) AS count FROM sqlite_master WHERE type = 'table' AND name = ?",
        )
        .bind(name)
        .fetch_one(pool)
        .await
        .expect("query sqlite_master")
        .get::<i64, _>("count")
    }

    #[tokio::test]
    async fn migrations_create_submission_table() {
        let pool = connect_with_settings("sqlite::memory:", 1, 30).await.expect("connect");
        run_pending(&pool).await.expect("run migrations");

        assert_eq!(table_count(&pool, "chatbot_results").await, 1);

        let columns: Vec<String> = sqlx::query("SELECT name FROM pragma_table_info('chatbot_results')")
            .fetch_all(&pool)
            .await
            .expect("table info")
            .into_iter()
            .map(|row| row.get::<String, _>("name"))
            .collect();
        for expected in
            ["sender_id", "user_story", "initial_description", "chat_description", "createdAt", "updatedAt"]
        {
            assert!(columns.iter().any(|column| column == expected), "missing column {expected}");
        }
    }

    #[tokio::test]
    async fn migrations_are_reversible_and_rerunnable() {
        let pool = connect_with_settings("sqlite::memory:", 1, 30).await.expect("connect");
        run_pending(&pool).await.expect("run migrations");

        MIGRATOR.undo(&pool, 0).await.expect("undo migrations");
        assert_eq!(table_count(&pool, "chatbot_results").await, 0);

        run_pending(&pool).await.expect("re-run migrations");
        run_pending(&pool).await.expect("second run is a no-op");
        assert_eq!(table_count(&pool, "chatbot_results").await, 1);
    }
}
