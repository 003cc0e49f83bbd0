//! Wizard states for the factory bot.
//!
//! One value per user in the session store; no entry means idle. Each
//! variant carries exactly the fields collected by its predecessor steps,
//! so a session can never hold leftover or missing fields for its state.
//! Every transition except cancel moves forward; cancel always drops the
//! whole value.

use assistants_client::AssistantInfo;

#[derive(Debug, Clone)]
pub enum WizardState {
    /// Creation wizard: waiting for the assistant name.
    FillName,
    /// Creation wizard: name collected, waiting for instructions.
    FillInstructions { name: String },
    /// Creation wizard: waiting for an optional knowledge file.
    UploadFile { name: String, instructions: String },

    /// Deletion wizard: waiting for a number out of the listed assistants.
    DeleteEnterNumber { assistants: Vec<AssistantInfo> },
    /// Deletion wizard: waiting for the yes/no confirmation press.
    ConfirmDelete { target: AssistantInfo },

    /// Activation wizard: waiting for a number out of the listed assistants.
    ChooseAssistant { assistants: Vec<AssistantInfo> },
    /// Activation wizard: relaying every text message through the assistant.
    Conversing {
        assistant_id: String,
        thread_id: String,
    },
}

/// Resolves a 1-based selection like `"2"` against a listing. `None` for
/// non-numeric input or an out-of-range index; out-of-range never panics.
pub fn select_numbered<'a>(assistants: &'a [AssistantInfo], input: &str) -> Option<&'a AssistantInfo> {
    let number: usize = input.trim().parse().ok()?;
    if number == 0 {
        return None;
    }
    assistants.get(number - 1)
}

/// Renders a listing as `1. name` lines.
pub fn format_assistant_list(assistants: &[AssistantInfo]) -> String {
    assistants
        .iter()
        .enumerate()
        .map(|(i, a)| format!("{}. {}\n", i + 1, a.name))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn listing() -> Vec<AssistantInfo> {
        vec![
            AssistantInfo {
                id: "asst-a".to_string(),
                name: "first".to_string(),
                owner_id: Some(1),
            },
            AssistantInfo {
                id: "asst-b".to_string(),
                name: "second".to_string(),
                owner_id: Some(1),
            },
        ]
    }

    #[test]
    fn select_numbered_in_range() {
        let list = listing();
        assert_eq!(select_numbered(&list, "1").map(|a| a.id.as_str()), Some("asst-a"));
        assert_eq!(select_numbered(&list, " 2 ").map(|a| a.id.as_str()), Some("asst-b"));
    }

    #[test]
    fn select_numbered_rejects_out_of_range_and_garbage() {
        let list = listing();
        assert!(select_numbered(&list, "0").is_none());
        assert!(select_numbered(&list, "3").is_none());
        assert!(select_numbered(&list, "-1").is_none());
        assert!(select_numbered(&list, "two").is_none());
        assert!(select_numbered(&list, "").is_none());
    }

    #[test]
    fn format_assistant_list_numbers_from_one() {
        assert_eq!(format_assistant_list(&listing()), "1. first\n2. second\n");
        assert_eq!(format_assistant_list(&[]), "");
    }
}
