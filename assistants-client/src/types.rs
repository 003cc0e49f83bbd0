//! Run statuses, assistant descriptors, and the ownership filter.

use std::fmt;

/// Metadata key carrying the Telegram user id of the assistant's creator.
/// The only place ownership is recorded; there is no local mirror table.
pub const OWNER_METADATA_KEY: &str = "client_id";

/// Status of an assistant run, as reported by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStatus {
    Queued,
    InProgress,
    RequiresAction,
    Cancelling,
    Cancelled,
    Failed,
    Completed,
    Incomplete,
    Expired,
}

impl RunStatus {
    /// Whether polling stops at this status. The terminal set is fixed:
    /// requires_action, cancelling, cancelled, failed, completed, expired.
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            RunStatus::RequiresAction
                | RunStatus::Cancelling
                | RunStatus::Cancelled
                | RunStatus::Failed
                | RunStatus::Completed
                | RunStatus::Expired
        )
    }
}

impl fmt::Display for RunStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            RunStatus::Queued => "queued",
            RunStatus::InProgress => "in_progress",
            RunStatus::RequiresAction => "requires_action",
            RunStatus::Cancelling => "cancelling",
            RunStatus::Cancelled => "cancelled",
            RunStatus::Failed => "failed",
            RunStatus::Completed => "completed",
            RunStatus::Incomplete => "incomplete",
            RunStatus::Expired => "expired",
        };
        f.write_str(s)
    }
}

/// Remote assistant as listed by the backend. `owner_id` is `None` when the
/// ownership metadata is absent or unparseable; such assistants belong to
/// no one and are never listed for any user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssistantInfo {
    pub id: String,
    pub name: String,
    pub owner_id: Option<i64>,
}

/// Fields for a remote assistant creation call. `owner_id` is embedded in
/// the resource metadata under [`OWNER_METADATA_KEY`].
#[derive(Debug, Clone)]
pub struct NewAssistant {
    pub name: String,
    pub instructions: String,
    pub file_ids: Vec<String>,
    pub owner_id: i64,
}

/// Filters the listing down to the assistants owned by `user_id`.
pub fn owned_assistants(assistants: Vec<AssistantInfo>, user_id: i64) -> Vec<AssistantInfo> {
    assistants
        .into_iter()
        .filter(|a| a.owner_id == Some(user_id))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn info(id: &str, owner_id: Option<i64>) -> AssistantInfo {
        AssistantInfo {
            id: id.to_string(),
            name: format!("assistant {}", id),
            owner_id,
        }
    }

    #[test]
    fn terminal_set_matches_fixed_list() {
        let terminal = [
            RunStatus::RequiresAction,
            RunStatus::Cancelling,
            RunStatus::Cancelled,
            RunStatus::Failed,
            RunStatus::Completed,
            RunStatus::Expired,
        ];
        for status in terminal {
            assert!(status.is_terminal(), "{} should be terminal", status);
        }
        for status in [RunStatus::Queued, RunStatus::InProgress, RunStatus::Incomplete] {
            assert!(!status.is_terminal(), "{} should not be terminal", status);
        }
    }

    #[test]
    fn owned_assistants_filters_by_owner() {
        let all = vec![info("a", Some(1)), info("b", Some(2)), info("c", Some(1))];

        let mine = owned_assistants(all, 1);

        assert_eq!(mine.len(), 2);
        assert!(mine.iter().all(|a| a.owner_id == Some(1)));
    }

    #[test]
    fn ownerless_assistants_match_no_one() {
        let all = vec![info("a", None), info("b", Some(2))];

        assert!(owned_assistants(all.clone(), 1).is_empty());
        assert_eq!(owned_assistants(all, 2).len(), 1);
    }
}
