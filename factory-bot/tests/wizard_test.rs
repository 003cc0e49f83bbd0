//! Tests for the factory wizards against a recording fake backend.
//!
//! The fake serves a fixed assistant listing and records every management
//! call, so the tests can pin down which remote operations each wizard step
//! performs and what the session holds between steps.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use assistants_client::{
    AssistantInfo, AssistantsApi, AssistantsError, NewAssistant, RunStatus,
};
use factory_bot::{FactoryBot, WizardState};

#[derive(Clone, Default)]
struct RecordingApi {
    listing: Arc<Mutex<Vec<AssistantInfo>>>,
    uploaded: Arc<Mutex<Vec<String>>>,
    created: Arc<Mutex<Vec<NewAssistant>>>,
    deleted: Arc<Mutex<Vec<String>>>,
    threads_created: Arc<Mutex<usize>>,
    reply: Arc<Mutex<Option<String>>>,
}

impl RecordingApi {
    fn with_listing(listing: Vec<AssistantInfo>) -> Self {
        Self {
            listing: Arc::new(Mutex::new(listing)),
            reply: Arc::new(Mutex::new(Some("assistant says hi".to_string()))),
            ..Default::default()
        }
    }
}

#[async_trait]
impl AssistantsApi for RecordingApi {
    async fn create_thread(&self) -> Result<String, AssistantsError> {
        let mut count = self.threads_created.lock().await;
        *count += 1;
        Ok(format!("thread-{count}"))
    }

    async fn add_user_message(&self, _thread_id: &str, _text: &str) -> Result<(), AssistantsError> {
        Ok(())
    }

    async fn create_run(
        &self,
        _thread_id: &str,
        _assistant_id: &str,
    ) -> Result<String, AssistantsError> {
        Ok("run-1".to_string())
    }

    async fn run_status(
        &self,
        _thread_id: &str,
        _run_id: &str,
    ) -> Result<RunStatus, AssistantsError> {
        Ok(RunStatus::Completed)
    }

    async fn latest_reply(&self, _thread_id: &str) -> Result<Option<String>, AssistantsError> {
        Ok(self.reply.lock().await.clone())
    }

    async fn upload_file(
        &self,
        file_name: &str,
        _bytes: Vec<u8>,
    ) -> Result<String, AssistantsError> {
        self.uploaded.lock().await.push(file_name.to_string());
        Ok(format!("file-{file_name}"))
    }

    async fn create_assistant(&self, new: NewAssistant) -> Result<String, AssistantsError> {
        self.created.lock().await.push(new);
        Ok("asst-new".to_string())
    }

    async fn list_assistants(&self) -> Result<Vec<AssistantInfo>, AssistantsError> {
        Ok(self.listing.lock().await.clone())
    }

    async fn delete_assistant(&self, assistant_id: &str) -> Result<(), AssistantsError> {
        self.deleted.lock().await.push(assistant_id.to_string());
        Ok(())
    }
}

fn assistant(id: &str, name: &str, owner_id: Option<i64>) -> AssistantInfo {
    AssistantInfo {
        id: id.to_string(),
        name: name.to_string(),
        owner_id,
    }
}

fn factory(api: RecordingApi) -> FactoryBot<RecordingApi> {
    FactoryBot::new(api, "factory_bot")
}

/// **Test: the creation wizard accumulates fields step by step.**
///
/// **Setup:** Fresh factory, no session.
/// **Action:** `/newassistant`, then a name, then instructions.
/// **Expected:** Each step's state carries exactly the fields collected so
/// far; finishing creates one assistant with all of them plus the owner tag,
/// and clears the session.
#[tokio::test]
async fn test_creation_accumulates_fields() {
    let api = RecordingApi::default();
    let factory = factory(api.clone());

    factory.begin_creation(7).await;
    assert!(matches!(factory.state(7).await, Some(WizardState::FillName)));

    factory.submit_name(7, "helper").await;
    match factory.state(7).await {
        Some(WizardState::FillInstructions { name }) => assert_eq!(name, "helper"),
        other => panic!("unexpected state: {other:?}"),
    }

    factory.submit_instructions(7, "helper".to_string(), "be nice").await;
    match factory.state(7).await {
        Some(WizardState::UploadFile { name, instructions }) => {
            assert_eq!(name, "helper");
            assert_eq!(instructions, "be nice");
        }
        other => panic!("unexpected state: {other:?}"),
    }

    let id = factory
        .complete_creation(7, "helper".to_string(), "be nice".to_string(), None)
        .await
        .expect("creation should succeed");

    assert_eq!(id, "asst-new");
    let created = api.created.lock().await;
    assert_eq!(created.len(), 1);
    assert_eq!(created[0].name, "helper");
    assert_eq!(created[0].instructions, "be nice");
    assert_eq!(created[0].owner_id, 7);
    assert!(created[0].file_ids.is_empty());
    assert!(factory.state(7).await.is_none());
}

/// **Test: an attached knowledge file is uploaded and wired in.**
///
/// **Setup:** Fresh factory.
/// **Action:** `complete_creation` with a file.
/// **Expected:** One upload; the created assistant carries the returned
/// file id.
#[tokio::test]
async fn test_creation_with_file_uploads_it() {
    let api = RecordingApi::default();
    let factory = factory(api.clone());

    factory
        .complete_creation(
            7,
            "helper".to_string(),
            "be nice".to_string(),
            Some(("notes.txt".to_string(), b"facts".to_vec())),
        )
        .await
        .unwrap();

    assert_eq!(*api.uploaded.lock().await, vec!["notes.txt".to_string()]);
    let created = api.created.lock().await;
    assert_eq!(created[0].file_ids, vec!["file-notes.txt".to_string()]);
}

/// **Test: cancel drops collected fields and a restart begins clean.**
///
/// **Setup:** Creation wizard advanced past the name step.
/// **Action:** Cancel, then `/newassistant` again.
/// **Expected:** Cancel reports a dropped session and leaves it idle; the
/// restarted wizard is back at the name step with nothing carried over.
#[tokio::test]
async fn test_cancel_clears_fields() {
    let api = RecordingApi::default();
    let factory = factory(api);

    factory.begin_creation(7).await;
    factory.submit_name(7, "stale").await;

    assert!(factory.cancel(7).await);
    assert!(factory.state(7).await.is_none());
    assert!(!factory.cancel(7).await);

    factory.begin_creation(7).await;
    assert!(matches!(factory.state(7).await, Some(WizardState::FillName)));
}

/// **Test: listings only show assistants owned by the asking user.**
///
/// **Setup:** Backend listing with two owners and one untagged assistant.
/// **Action:** `owned` for user 1.
/// **Expected:** Only user 1's assistant; untagged ones never surface.
#[tokio::test]
async fn test_owned_filters_by_owner() {
    let api = RecordingApi::with_listing(vec![
        assistant("asst-a", "mine", Some(1)),
        assistant("asst-b", "theirs", Some(2)),
        assistant("asst-c", "untagged", None),
    ]);
    let factory = factory(api);

    let mine = factory.owned(1).await.unwrap();

    assert_eq!(mine.len(), 1);
    assert_eq!(mine[0].id, "asst-a");
}

/// **Test: deletion does not start for a user who owns nothing.**
///
/// **Setup:** Listing holds only another user's assistant.
/// **Action:** `begin_deletion` for user 1.
/// **Expected:** `None` and the session stays idle.
#[tokio::test]
async fn test_deletion_requires_owned_assistants() {
    let api = RecordingApi::with_listing(vec![assistant("asst-b", "theirs", Some(2))]);
    let factory = factory(api);

    assert!(factory.begin_deletion(1).await.unwrap().is_none());
    assert!(factory.state(1).await.is_none());
}

/// **Test: a confirmed deletion removes exactly the chosen assistant.**
///
/// **Setup:** User 1 owns two assistants.
/// **Action:** `begin_deletion`, pick "2", confirm with yes.
/// **Expected:** The second assistant is deleted once and the session ends.
#[tokio::test]
async fn test_deletion_confirmed() {
    let api = RecordingApi::with_listing(vec![
        assistant("asst-a", "first", Some(1)),
        assistant("asst-b", "second", Some(1)),
    ]);
    let factory = factory(api.clone());

    let mine = factory.begin_deletion(1).await.unwrap().expect("owns two");
    let target = factory
        .choose_deletion_target(1, &mine, "2")
        .await
        .expect("2 is in range");
    assert_eq!(target.id, "asst-b");
    assert!(matches!(
        factory.state(1).await,
        Some(WizardState::ConfirmDelete { .. })
    ));

    factory.confirm_deletion(1, &target, true).await.unwrap();

    assert_eq!(*api.deleted.lock().await, vec!["asst-b".to_string()]);
    assert!(factory.state(1).await.is_none());
}

/// **Test: answering no ends the wizard without deleting.**
///
/// **Setup:** Deletion advanced to the confirm step.
/// **Action:** `confirm_deletion` with `false`.
/// **Expected:** No delete call; session cleared.
#[tokio::test]
async fn test_deletion_declined() {
    let api = RecordingApi::with_listing(vec![assistant("asst-a", "first", Some(1))]);
    let factory = factory(api.clone());

    let mine = factory.begin_deletion(1).await.unwrap().unwrap();
    let target = factory.choose_deletion_target(1, &mine, "1").await.unwrap();

    factory.confirm_deletion(1, &target, false).await.unwrap();

    assert!(api.deleted.lock().await.is_empty());
    assert!(factory.state(1).await.is_none());
}

/// **Test: an invalid number entry leaves the wizard where it was.**
///
/// **Setup:** Deletion at the number-entry step with one assistant.
/// **Action:** Feed "5" and "garbage".
/// **Expected:** No target, state still at number entry, nothing deleted.
#[tokio::test]
async fn test_deletion_rejects_bad_number() {
    let api = RecordingApi::with_listing(vec![assistant("asst-a", "first", Some(1))]);
    let factory = factory(api.clone());

    let mine = factory.begin_deletion(1).await.unwrap().unwrap();

    assert!(factory.choose_deletion_target(1, &mine, "5").await.is_none());
    assert!(factory.choose_deletion_target(1, &mine, "garbage").await.is_none());
    assert!(matches!(
        factory.state(1).await,
        Some(WizardState::DeleteEnterNumber { .. })
    ));
    assert!(api.deleted.lock().await.is_empty());
}

/// **Test: activating an assistant opens a fresh thread and converses.**
///
/// **Setup:** User 1 owns one assistant; backend completes runs immediately.
/// **Action:** `begin_activation`, pick "1", send one message, then stop.
/// **Expected:** One thread created; conversing state carries its id and the
/// chosen assistant; the turn returns the reply; cancel ends the session.
#[tokio::test]
async fn test_activation_and_conversation() {
    let api = RecordingApi::with_listing(vec![assistant("asst-a", "first", Some(1))]);
    let factory = factory(api.clone());

    let mine = factory.begin_activation(1).await.unwrap().expect("owns one");
    let target = factory
        .choose_activation_target(1, &mine, "1")
        .await
        .unwrap()
        .expect("1 is in range");
    assert_eq!(target.id, "asst-a");

    let (assistant_id, thread_id) = match factory.state(1).await {
        Some(WizardState::Conversing {
            assistant_id,
            thread_id,
        }) => (assistant_id, thread_id),
        other => panic!("unexpected state: {other:?}"),
    };
    assert_eq!(assistant_id, "asst-a");
    assert_eq!(thread_id, "thread-1");
    assert_eq!(*api.threads_created.lock().await, 1);

    let reply = factory
        .converse(1, &thread_id, &assistant_id, "hello")
        .await
        .unwrap();
    assert_eq!(reply.as_deref(), Some("assistant says hi"));

    assert!(factory.cancel(1).await);
    assert!(factory.state(1).await.is_none());
}

/// **Test: a turn with no extractable reply is reported as None.**
///
/// **Setup:** Conversing user; the fake completes runs but returns no text.
/// **Action:** `converse`.
/// **Expected:** `Ok(None)` so the caller can apologize instead of crashing.
#[tokio::test]
async fn test_conversation_swallows_empty_reply() {
    let api = RecordingApi::with_listing(vec![assistant("asst-a", "first", Some(1))]);
    *api.reply.lock().await = None;
    let factory = factory(api);

    let reply = factory.converse(1, "thread-1", "asst-a", "hello").await.unwrap();

    assert!(reply.is_none());
}
