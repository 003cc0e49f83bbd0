//! Wizard core: session transitions and backend calls, no Telegram types.
//!
//! The Telegram layer decides which method to call from the current session
//! state and renders the returned data; everything here is exercised
//! directly by the tests with a fake backend.

use assistants_client::{
    owned_assistants, AssistantInfo, AssistantsApi, AssistantsError, NewAssistant, RunPoller,
};
use bot_core::{InMemorySessionStore, SessionStore};
use tracing::{error, info};

use crate::states::{select_numbered, WizardState};

#[derive(Clone)]
pub struct FactoryBot<A: AssistantsApi + Clone> {
    api: A,
    poller: RunPoller<A>,
    sessions: InMemorySessionStore<WizardState>,
    pub(crate) bot_username: String,
}

impl<A> FactoryBot<A>
where
    A: AssistantsApi + Clone + 'static,
{
    pub fn new(api: A, bot_username: impl Into<String>) -> Self {
        Self {
            poller: RunPoller::new(api.clone()),
            api,
            sessions: InMemorySessionStore::new(),
            bot_username: bot_username.into(),
        }
    }

    pub async fn state(&self, user_id: i64) -> Option<WizardState> {
        self.sessions.get(user_id).await
    }

    /// Drops the user's session regardless of which step was active.
    /// Returns whether there was a session to drop.
    pub async fn cancel(&self, user_id: i64) -> bool {
        self.sessions.remove(user_id).await.is_some()
    }

    /// Assistants owned by the user: ownership metadata must parse and match.
    pub async fn owned(&self, user_id: i64) -> Result<Vec<AssistantInfo>, AssistantsError> {
        let all = self.api.list_assistants().await?;
        Ok(owned_assistants(all, user_id))
    }

    // --- creation wizard ---

    pub async fn begin_creation(&self, user_id: i64) {
        self.sessions.set(user_id, WizardState::FillName).await;
    }

    pub async fn submit_name(&self, user_id: i64, name: &str) {
        self.sessions
            .set(
                user_id,
                WizardState::FillInstructions {
                    name: name.to_string(),
                },
            )
            .await;
    }

    pub async fn submit_instructions(&self, user_id: i64, name: String, instructions: &str) {
        self.sessions
            .set(
                user_id,
                WizardState::UploadFile {
                    name,
                    instructions: instructions.to_string(),
                },
            )
            .await;
    }

    /// Final creation step. Uploads the knowledge file when one was attached
    /// (a missing document is tolerated, not an error), creates the remote
    /// assistant tagged with the user's id, and clears the session.
    pub async fn complete_creation(
        &self,
        user_id: i64,
        name: String,
        instructions: String,
        file: Option<(String, Vec<u8>)>,
    ) -> Result<String, AssistantsError> {
        let mut file_ids = Vec::new();
        if let Some((file_name, bytes)) = file {
            let file_id = self.api.upload_file(&file_name, bytes).await?;
            file_ids.push(file_id);
        }

        let assistant_id = self
            .api
            .create_assistant(NewAssistant {
                name,
                instructions,
                file_ids,
                owner_id: user_id,
            })
            .await?;

        self.sessions.remove(user_id).await;
        info!(user_id, %assistant_id, "creation wizard finished");
        Ok(assistant_id)
    }

    // --- deletion wizard ---

    /// Lists the user's assistants and enters the number-entry step.
    /// `None` when the user owns nothing; the session stays idle then.
    pub async fn begin_deletion(
        &self,
        user_id: i64,
    ) -> Result<Option<Vec<AssistantInfo>>, AssistantsError> {
        let mine = self.owned(user_id).await?;
        if mine.is_empty() {
            return Ok(None);
        }
        self.sessions
            .set(
                user_id,
                WizardState::DeleteEnterNumber {
                    assistants: mine.clone(),
                },
            )
            .await;
        Ok(Some(mine))
    }

    /// Applies a number entry. A valid selection advances to the confirm
    /// step and returns the target; anything else leaves the state as is.
    pub async fn choose_deletion_target(
        &self,
        user_id: i64,
        assistants: &[AssistantInfo],
        input: &str,
    ) -> Option<AssistantInfo> {
        let target = select_numbered(assistants, input)?.clone();
        self.sessions
            .set(
                user_id,
                WizardState::ConfirmDelete {
                    target: target.clone(),
                },
            )
            .await;
        Some(target)
    }

    /// Applies the yes/no press: `true` deletes the remote assistant.
    /// Either answer ends the wizard.
    pub async fn confirm_deletion(
        &self,
        user_id: i64,
        target: &AssistantInfo,
        confirmed: bool,
    ) -> Result<(), AssistantsError> {
        if confirmed {
            self.api.delete_assistant(&target.id).await?;
            info!(user_id, assistant_id = %target.id, "assistant deleted");
        }
        self.sessions.remove(user_id).await;
        Ok(())
    }

    // --- activation wizard ---

    pub async fn begin_activation(
        &self,
        user_id: i64,
    ) -> Result<Option<Vec<AssistantInfo>>, AssistantsError> {
        let mine = self.owned(user_id).await?;
        if mine.is_empty() {
            return Ok(None);
        }
        self.sessions
            .set(
                user_id,
                WizardState::ChooseAssistant {
                    assistants: mine.clone(),
                },
            )
            .await;
        Ok(Some(mine))
    }

    /// Applies a number entry; a valid selection opens a fresh thread and
    /// enters the conversing state.
    pub async fn choose_activation_target(
        &self,
        user_id: i64,
        assistants: &[AssistantInfo],
        input: &str,
    ) -> Result<Option<AssistantInfo>, AssistantsError> {
        let Some(target) = select_numbered(assistants, input).cloned() else {
            return Ok(None);
        };
        let thread_id = self.api.create_thread().await?;
        self.sessions
            .set(
                user_id,
                WizardState::Conversing {
                    assistant_id: target.id.clone(),
                    thread_id,
                },
            )
            .await;
        Ok(Some(target))
    }

    /// One conversational turn while conversing. A failed or timed-out run
    /// yields `None` (the caller sends the apology); transport errors
    /// propagate.
    pub async fn converse(
        &self,
        user_id: i64,
        thread_id: &str,
        assistant_id: &str,
        text: &str,
    ) -> Result<Option<String>, AssistantsError> {
        match self.poller.run_turn(thread_id, assistant_id, text).await {
            Ok(reply) => Ok(Some(reply)),
            Err(AssistantsError::Api(e)) => Err(AssistantsError::Api(e)),
            Err(e) => {
                error!(user_id, error = %e, "assistant turn failed");
                Ok(None)
            }
        }
    }
}
