//! Backend trait for the Assistants API.
//!
//! Everything the bots need from the conversational backend goes through
//! this seam: thread/message/run plumbing for conversations, plus file and
//! assistant management for the factory wizards. Tests substitute scripted
//! fakes.

use async_trait::async_trait;

use crate::error::AssistantsError;
use crate::types::{AssistantInfo, NewAssistant, RunStatus};

#[async_trait]
pub trait AssistantsApi: Send + Sync {
    /// Creates a new conversation thread and returns its id.
    async fn create_thread(&self) -> Result<String, AssistantsError>;

    /// Appends a user-authored message to the thread.
    async fn add_user_message(&self, thread_id: &str, text: &str) -> Result<(), AssistantsError>;

    /// Starts a run of `assistant_id` over the thread; returns the run id.
    async fn create_run(
        &self,
        thread_id: &str,
        assistant_id: &str,
    ) -> Result<String, AssistantsError>;

    /// Current status of a run.
    async fn run_status(&self, thread_id: &str, run_id: &str)
        -> Result<RunStatus, AssistantsError>;

    /// First text segment of the most recently added thread message.
    async fn latest_reply(&self, thread_id: &str) -> Result<Option<String>, AssistantsError>;

    /// Uploads a knowledge file; returns the remote file id.
    async fn upload_file(&self, file_name: &str, bytes: Vec<u8>)
        -> Result<String, AssistantsError>;

    /// Creates an assistant with ownership metadata; returns its id.
    async fn create_assistant(&self, new: NewAssistant) -> Result<String, AssistantsError>;

    /// Lists assistants visible to the API key (all owners).
    async fn list_assistants(&self) -> Result<Vec<AssistantInfo>, AssistantsError>;

    async fn delete_assistant(&self, assistant_id: &str) -> Result<(), AssistantsError>;
}
