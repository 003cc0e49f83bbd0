//! Dialog record model for persistence.
//!
//! Maps to the `dialogs` table and is used by DialogRepository. One row per
//! inbound or outbound message; rows are immutable once written.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct DialogRecord {
    pub id: String,
    pub user_id: i64,
    pub text: String,
    pub is_from_user: bool,
    pub created_at: DateTime<Utc>,
}

impl DialogRecord {
    /// Creates a new record with a generated UUID and current timestamp.
    pub fn new(user_id: i64, text: impl Into<String>, is_from_user: bool) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            user_id,
            text: text.into(),
            is_from_user,
            created_at: Utc::now(),
        }
    }
}
