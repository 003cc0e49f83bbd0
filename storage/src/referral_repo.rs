//! Referral repository: user registration set and referral edges.
//!
//! A user is registered the first time the bot sees them. Referral edges are
//! first-referrer-wins: the insert for a referee who already has a referrer
//! is ignored, never updated.

use crate::models::ReferralEdge;
use sqlx::SqlitePool;
use tracing::info;

#[derive(Clone)]
pub struct ReferralRepository {
    pool: SqlitePool,
}

impl ReferralRepository {
    pub async fn new(pool: SqlitePool) -> Result<Self, sqlx::Error> {
        let repo = Self { pool };
        repo.init().await?;
        Ok(repo)
    }

    async fn init(&self) -> Result<(), sqlx::Error> {
        info!("Creating users/referrals tables if not exist");

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS users (
                user_id INTEGER PRIMARY KEY,
                created_at TEXT NOT NULL DEFAULT (datetime('now'))
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS referrals (
                referee_id INTEGER PRIMARY KEY,
                referrer_id INTEGER NOT NULL
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Registers the user if not seen before. Idempotent.
    pub async fn ensure_user(&self, user_id: i64) -> Result<(), sqlx::Error> {
        sqlx::query("INSERT OR IGNORE INTO users (user_id) VALUES (?)")
            .bind(user_id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    pub async fn is_registered(&self, user_id: i64) -> Result<bool, sqlx::Error> {
        let row: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM users WHERE user_id = ?")
            .bind(user_id)
            .fetch_one(&self.pool)
            .await?;
        Ok(row.0 > 0)
    }

    pub async fn count_users(&self) -> Result<i64, sqlx::Error> {
        let row: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM users")
            .fetch_one(&self.pool)
            .await?;
        Ok(row.0)
    }

    /// Records `referrer_id` as the referrer of `referee_id`, subject to the
    /// referral rules: the referrer must be registered, must not be the
    /// referee, and an existing edge for the referee is never replaced.
    /// Returns whether a new edge was written; rejected edges are not errors.
    pub async fn record_referral(
        &self,
        referee_id: i64,
        referrer_id: i64,
    ) -> Result<bool, sqlx::Error> {
        if referee_id == referrer_id || !self.is_registered(referrer_id).await? {
            return Ok(false);
        }

        let result =
            sqlx::query("INSERT OR IGNORE INTO referrals (referee_id, referrer_id) VALUES (?, ?)")
                .bind(referee_id)
                .bind(referrer_id)
                .execute(&self.pool)
                .await?;

        let inserted = result.rows_affected() > 0;
        if inserted {
            info!(referee_id, referrer_id, "Recorded referral");
        }
        Ok(inserted)
    }

    pub async fn has_referrer(&self, referee_id: i64) -> Result<bool, sqlx::Error> {
        let row: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM referrals WHERE referee_id = ?")
            .bind(referee_id)
            .fetch_one(&self.pool)
            .await?;
        Ok(row.0 > 0)
    }

    pub async fn referrer_of(&self, referee_id: i64) -> Result<Option<i64>, sqlx::Error> {
        let edge: Option<ReferralEdge> =
            sqlx::query_as("SELECT * FROM referrals WHERE referee_id = ?")
                .bind(referee_id)
                .fetch_optional(&self.pool)
                .await?;
        Ok(edge.map(|e| e.referrer_id))
    }

    pub async fn count_referrals(&self, referrer_id: i64) -> Result<i64, sqlx::Error> {
        let row: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM referrals WHERE referrer_id = ?")
            .bind(referrer_id)
            .fetch_one(&self.pool)
            .await?;
        Ok(row.0)
    }
}
