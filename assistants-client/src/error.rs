use thiserror::Error;

use crate::types::RunStatus;

#[derive(Error, Debug)]
pub enum AssistantsError {
    /// Transport or API-level failure reported by the backend.
    #[error("API error: {0}")]
    Api(String),

    /// The run reached a terminal status other than `completed`.
    #[error("run ended with status {0}")]
    RunFailed(RunStatus),

    /// The run never reached a terminal status within the attempt budget.
    #[error("run still not terminal after {attempts} polls")]
    Timeout { attempts: u32 },

    /// The run completed but the thread had no extractable reply text.
    #[error("completed run produced no reply text")]
    EmptyReply,
}

impl AssistantsError {
    pub fn api(err: impl std::fmt::Display) -> Self {
        Self::Api(err.to_string())
    }
}
