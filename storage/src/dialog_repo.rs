//! Dialog repository: append-only persistence for the message history.
//!
//! External: SQLite via sqlx; callers use save/list_all. `list_all` is the
//! admin view's single unscoped read.

use crate::models::DialogRecord;
use sqlx::SqlitePool;
use tracing::info;

#[derive(Clone)]
pub struct DialogRepository {
    pool: SqlitePool,
}

impl DialogRepository {
    pub async fn new(pool: SqlitePool) -> Result<Self, sqlx::Error> {
        let repo = Self { pool };
        repo.init().await?;
        Ok(repo)
    }

    async fn init(&self) -> Result<(), sqlx::Error> {
        info!("Creating dialogs table if not exists");

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS dialogs (
                id TEXT PRIMARY KEY,
                user_id INTEGER NOT NULL,
                text TEXT NOT NULL,
                is_from_user INTEGER NOT NULL,
                created_at TEXT NOT NULL
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r#"
            CREATE INDEX IF NOT EXISTS idx_dialogs_user_id ON dialogs(user_id);
            CREATE INDEX IF NOT EXISTS idx_dialogs_created_at ON dialogs(created_at);
            "#,
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    pub async fn save(&self, record: &DialogRecord) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"
            INSERT INTO dialogs (id, user_id, text, is_from_user, created_at)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(&record.id)
        .bind(record.user_id)
        .bind(&record.text)
        .bind(record.is_from_user)
        .bind(record.created_at)
        .execute(&self.pool)
        .await?;

        info!(
            user_id = record.user_id,
            is_from_user = record.is_from_user,
            "Saved dialog row"
        );
        Ok(())
    }

    /// Full history, oldest first. Consumed by the admin view.
    pub async fn list_all(&self) -> Result<Vec<DialogRecord>, sqlx::Error> {
        let rows: Vec<DialogRecord> =
            sqlx::query_as("SELECT * FROM dialogs ORDER BY created_at ASC")
                .fetch_all(&self.pool)
                .await?;

        info!("Retrieved {} dialog rows", rows.len());
        Ok(rows)
    }
}
