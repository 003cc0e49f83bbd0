//! Referral edge model: who referred whom.
//!
//! At most one edge per referee (first-referrer-wins); never mutated.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct ReferralEdge {
    pub referee_id: i64,
    pub referrer_id: i64,
}
