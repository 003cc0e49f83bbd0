//! Factory bot: assistant-management wizards over an explicit FSM.
//!
//! ## Modules
//!
//! - [`states`] – [`WizardState`] and selection helpers
//! - [`wizard`] – [`FactoryBot`] session transitions and backend calls
//! - [`telegram`] – message/callback routing and reply rendering

pub mod states;
pub mod telegram;
pub mod wizard;

pub use states::WizardState;
pub use telegram::Command;
pub use wizard::FactoryBot;
