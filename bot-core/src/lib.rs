//! # bot-core
//!
//! Shared building blocks for the assistant bots: error types, tracing
//! initialization, and the keyed [`SessionStore`] abstraction used for
//! per-user wizard sessions and the thread registry.

pub mod error;
pub mod logger;
pub mod session;


pub use error::{BotError, Result};
pub use logger::init_tracing;
pub use session::{InMemorySessionStore, SessionStore};
