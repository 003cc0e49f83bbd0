//! async-openai implementation of [`AssistantsApi`].
//!
//! Thin wrapper over the beta Assistants endpoints (threads, messages, runs,
//! files, assistants). Uploaded knowledge files are attached through a
//! file-search vector store created alongside the assistant.

use std::collections::HashMap;
use std::sync::Arc;

use async_openai::config::OpenAIConfig;
use async_openai::types::{
    AssistantTools, AssistantVectorStore, CreateAssistantRequestArgs,
    CreateAssistantToolFileSearchResources, CreateAssistantToolResources, CreateFileRequest,
    CreateMessageRequestArgs, CreateRunRequestArgs, CreateThreadRequest, FileInput, FilePurpose,
    MessageContent, MessageRole, RunStatus as ApiRunStatus,
};
use async_openai::Client;
use async_trait::async_trait;
use tracing::info;

use crate::api::AssistantsApi;
use crate::error::AssistantsError;
use crate::types::{AssistantInfo, NewAssistant, RunStatus, OWNER_METADATA_KEY};

const ASSISTANT_MODEL: &str = "gpt-4-1106-preview";

#[derive(Clone)]
pub struct OpenAiAssistants {
    client: Arc<Client<OpenAIConfig>>,
}

impl OpenAiAssistants {
    pub fn new(api_key: String) -> Self {
        let config = OpenAIConfig::new().with_api_key(api_key);
        Self {
            client: Arc::new(Client::with_config(config)),
        }
    }

    pub fn with_base_url(api_key: String, base_url: String) -> Self {
        let config = OpenAIConfig::new()
            .with_api_key(api_key)
            .with_api_base(base_url);
        Self {
            client: Arc::new(Client::with_config(config)),
        }
    }
}

/// Reads the owner id out of assistant metadata. Absent key, non-string and
/// non-numeric values all mean "owned by no one".
fn owner_from_metadata(metadata: Option<&HashMap<String, serde_json::Value>>) -> Option<i64> {
    let value = metadata?.get(OWNER_METADATA_KEY)?;
    match value {
        serde_json::Value::String(s) => s.parse().ok(),
        other => other.as_i64(),
    }
}

fn from_api_status(status: ApiRunStatus) -> RunStatus {
    match status {
        ApiRunStatus::Queued => RunStatus::Queued,
        ApiRunStatus::InProgress => RunStatus::InProgress,
        ApiRunStatus::RequiresAction => RunStatus::RequiresAction,
        ApiRunStatus::Cancelling => RunStatus::Cancelling,
        ApiRunStatus::Cancelled => RunStatus::Cancelled,
        ApiRunStatus::Failed => RunStatus::Failed,
        ApiRunStatus::Completed => RunStatus::Completed,
        ApiRunStatus::Incomplete => RunStatus::Incomplete,
        ApiRunStatus::Expired => RunStatus::Expired,
    }
}

#[async_trait]
impl AssistantsApi for OpenAiAssistants {
    async fn create_thread(&self) -> Result<String, AssistantsError> {
        let thread = self
            .client
            .threads()
            .create(CreateThreadRequest::default())
            .await
            .map_err(AssistantsError::api)?;
        info!(thread_id = %thread.id, "created thread");
        Ok(thread.id)
    }

    async fn add_user_message(&self, thread_id: &str, text: &str) -> Result<(), AssistantsError> {
        let request = CreateMessageRequestArgs::default()
            .role(MessageRole::User)
            .content(text)
            .build()
            .map_err(AssistantsError::api)?;

        self.client
            .threads()
            .messages(thread_id)
            .create(request)
            .await
            .map_err(AssistantsError::api)?;
        Ok(())
    }

    async fn create_run(
        &self,
        thread_id: &str,
        assistant_id: &str,
    ) -> Result<String, AssistantsError> {
        let request = CreateRunRequestArgs::default()
            .assistant_id(assistant_id)
            .build()
            .map_err(AssistantsError::api)?;

        let run = self
            .client
            .threads()
            .runs(thread_id)
            .create(request)
            .await
            .map_err(AssistantsError::api)?;
        Ok(run.id)
    }

    async fn run_status(
        &self,
        thread_id: &str,
        run_id: &str,
    ) -> Result<RunStatus, AssistantsError> {
        let run = self
            .client
            .threads()
            .runs(thread_id)
            .retrieve(run_id)
            .await
            .map_err(AssistantsError::api)?;
        Ok(from_api_status(run.status))
    }

    async fn latest_reply(&self, thread_id: &str) -> Result<Option<String>, AssistantsError> {
        let messages = self
            .client
            .threads()
            .messages(thread_id)
            .list(&[("limit", "1")])
            .await
            .map_err(AssistantsError::api)?;

        let reply = messages.data.first().and_then(|message| {
            message.content.iter().find_map(|part| match part {
                MessageContent::Text(text) => Some(text.text.value.clone()),
                _ => None,
            })
        });
        Ok(reply)
    }

    async fn upload_file(
        &self,
        file_name: &str,
        bytes: Vec<u8>,
    ) -> Result<String, AssistantsError> {
        let request = CreateFileRequest {
            file: FileInput::from_vec_u8(file_name.to_string(), bytes),
            purpose: FilePurpose::Assistants,
        };

        let file = self
            .client
            .files()
            .create(request)
            .await
            .map_err(AssistantsError::api)?;
        info!(file_id = %file.id, file_name, "uploaded knowledge file");
        Ok(file.id)
    }

    async fn create_assistant(&self, new: NewAssistant) -> Result<String, AssistantsError> {
        let metadata: HashMap<String, serde_json::Value> = HashMap::from([(
            OWNER_METADATA_KEY.to_string(),
            serde_json::Value::String(new.owner_id.to_string()),
        )]);

        let mut builder = CreateAssistantRequestArgs::default();
        builder
            .name(&new.name)
            .instructions(&new.instructions)
            .model(ASSISTANT_MODEL)
            .metadata(metadata);

        if !new.file_ids.is_empty() {
            builder.tools(vec![AssistantTools::FileSearch(Default::default())]);
            builder.tool_resources(CreateAssistantToolResources {
                code_interpreter: None,
                file_search: Some(CreateAssistantToolFileSearchResources {
                    vector_store_ids: None,
                    vector_stores: Some(vec![AssistantVectorStore {
                        file_ids: new.file_ids.clone(),
                        chunking_strategy: None,
                        metadata: None,
                    }]),
                }),
            });
        }

        let request = builder.build().map_err(AssistantsError::api)?;

        let assistant = self
            .client
            .assistants()
            .create(request)
            .await
            .map_err(AssistantsError::api)?;
        info!(
            assistant_id = %assistant.id,
            owner_id = new.owner_id,
            "created assistant"
        );
        Ok(assistant.id)
    }

    async fn list_assistants(&self) -> Result<Vec<AssistantInfo>, AssistantsError> {
        let listing = self
            .client
            .assistants()
            .list(&[("limit", "100")])
            .await
            .map_err(AssistantsError::api)?;

        Ok(listing
            .data
            .into_iter()
            .map(|assistant| AssistantInfo {
                owner_id: owner_from_metadata(assistant.metadata.as_ref()),
                name: assistant.name.unwrap_or_default(),
                id: assistant.id,
            })
            .collect())
    }

    async fn delete_assistant(&self, assistant_id: &str) -> Result<(), AssistantsError> {
        self.client
            .assistants()
            .delete(assistant_id)
            .await
            .map_err(AssistantsError::api)?;
        info!(%assistant_id, "deleted assistant");
        Ok(())
    }
}
