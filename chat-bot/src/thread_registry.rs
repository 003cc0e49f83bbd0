//! Thread registry: lazy per-user conversation threads.
//!
//! The first text message from a user creates a remote thread; every later
//! message reuses it. Entries live for the process lifetime — no eviction,
//! no expiry, no capacity bound. Unbounded growth under a long-running
//! process is a known limitation.

use assistants_client::AssistantsApi;
use bot_core::{InMemorySessionStore, SessionStore};

#[derive(Clone)]
pub struct ThreadRegistry<A> {
    api: A,
    store: InMemorySessionStore<String>,
}

impl<A> ThreadRegistry<A>
where
    A: AssistantsApi + Clone + 'static,
{
    pub fn new(api: A) -> Self {
        Self {
            api,
            store: InMemorySessionStore::new(),
        }
    }

    /// Returns the user's thread handle, creating it remotely on first use.
    /// The create runs under the user's session lock, so two interleaved
    /// first messages cannot create two threads.
    pub async fn get_or_create(&self, user_id: i64) -> anyhow::Result<String> {
        let api = self.api.clone();
        self.store
            .get_or_init(
                user_id,
                Box::pin(async move {
                    let thread_id = api.create_thread().await?;
                    Ok(thread_id)
                }),
            )
            .await
    }
}
