//! Run poller: submit a user message, start a run, poll to a terminal status.
//!
//! Both bots route every conversational turn through [`RunPoller::run_turn`].
//! The loop is bounded: at most `max_attempts` status polls with a fixed
//! sleep between them. Exhausting the budget yields
//! [`AssistantsError::Timeout`], distinct from a terminal failure status.

use std::time::Duration;

use tracing::{error, info};

use crate::api::AssistantsApi;
use crate::error::AssistantsError;
use crate::types::RunStatus;

#[derive(Debug, Clone, Copy)]
pub struct PollConfig {
    /// Sleep between status polls.
    pub interval: Duration,
    /// Maximum number of status polls before giving up.
    pub max_attempts: u32,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(3),
            max_attempts: 100,
        }
    }
}

#[derive(Clone)]
pub struct RunPoller<A> {
    api: A,
    config: PollConfig,
}

impl<A: AssistantsApi> RunPoller<A> {
    pub fn new(api: A) -> Self {
        Self {
            api,
            config: PollConfig::default(),
        }
    }

    pub fn with_config(api: A, config: PollConfig) -> Self {
        Self { api, config }
    }

    /// One conversational turn: append `user_text`, run the assistant, and
    /// return the extracted reply once the run completes.
    ///
    /// Short-circuits as soon as the status is `completed`; any other
    /// terminal status is [`AssistantsError::RunFailed`] without fetching the
    /// message list. The reply is fetched exactly once, after completion.
    pub async fn run_turn(
        &self,
        thread_id: &str,
        assistant_id: &str,
        user_text: &str,
    ) -> Result<String, AssistantsError> {
        self.api.add_user_message(thread_id, user_text).await?;
        let run_id = self.api.create_run(thread_id, assistant_id).await?;

        for attempt in 1..=self.config.max_attempts {
            let status = self.api.run_status(thread_id, &run_id).await?;
            info!(%status, attempt, run_id = %run_id, "assistant run status");

            if status == RunStatus::Completed {
                let reply = self.api.latest_reply(thread_id).await?;
                return reply.ok_or(AssistantsError::EmptyReply);
            }
            if status.is_terminal() {
                error!(%status, run_id = %run_id, "assistant run ended without completing");
                return Err(AssistantsError::RunFailed(status));
            }

            tokio::time::sleep(self.config.interval).await;
        }

        error!(
            attempts = self.config.max_attempts,
            run_id = %run_id,
            "assistant run polling budget exhausted"
        );
        Err(AssistantsError::Timeout {
            attempts: self.config.max_attempts,
        })
    }
}
