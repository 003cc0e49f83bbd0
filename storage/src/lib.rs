//! Storage crate: dialog history and referral persistence.
//!
//! ## Modules
//!
//! - [`models`] – DialogRecord, ReferralEdge
//! - [`dialog_repo`] – DialogRepository (append-only dialog rows)
//! - [`referral_repo`] – ReferralRepository (users, referral edges)
//! - [`sqlite_pool`] – pool construction

mod dialog_repo;
mod models;
mod referral_repo;
mod sqlite_pool;

pub use dialog_repo::DialogRepository;
pub use models::{DialogRecord, ReferralEdge};
pub use referral_repo::ReferralRepository;
pub use sqlite_pool::connect;
