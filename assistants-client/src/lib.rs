//! # assistants-client
//!
//! Wrapper around the OpenAI Assistants API plus the run polling loop shared
//! by both bots.
//!
//! ## Modules
//!
//! - [`api`] – the [`AssistantsApi`] trait, the only seam the bots depend on
//! - [`openai`] – [`OpenAiAssistants`], the async-openai implementation
//! - [`poller`] – [`RunPoller`], bounded poll-until-terminal loop
//! - [`types`] – run statuses, assistant descriptors, ownership filter
//! - [`error`] – [`AssistantsError`]

pub mod api;
pub mod error;
pub mod openai;
pub mod poller;
pub mod types;

pub use api::AssistantsApi;
pub use error::AssistantsError;
pub use openai::OpenAiAssistants;
pub use poller::{PollConfig, RunPoller};
pub use types::{owned_assistants, AssistantInfo, NewAssistant, RunStatus, OWNER_METADATA_KEY};
