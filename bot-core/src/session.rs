//! Keyed session store: per-user state for wizards and the thread registry.
//!
//! The store is an explicit mapping abstraction so the backing can later be
//! swapped (persisted, distributed) without touching call sites. Each key owns
//! its own async lock; `get_or_init` holds that lock across the init future,
//! so two concurrent lazy creates for the same user cannot both run.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use futures::future::BoxFuture;
use tokio::sync::Mutex;

/// Store of one value per user id. Absence of a value is the idle state.
#[async_trait]
pub trait SessionStore<V>: Send + Sync
where
    V: Clone + Send + Sync + 'static,
{
    async fn get(&self, key: i64) -> Option<V>;

    async fn set(&self, key: i64, value: V);

    /// Removes and returns the stored value, if any.
    async fn remove(&self, key: i64) -> Option<V>;

    /// Returns the stored value, running `init` under the per-key lock when
    /// absent and caching its result. `init` is not polled when a value exists.
    async fn get_or_init(
        &self,
        key: i64,
        init: BoxFuture<'static, anyhow::Result<V>>,
    ) -> anyhow::Result<V>;
}

/// In-memory backing: a map of per-key cells, each behind its own lock.
/// Volatile by design; sessions do not survive a restart.
pub struct InMemorySessionStore<V> {
    cells: Arc<Mutex<HashMap<i64, Arc<Mutex<Option<V>>>>>>,
}

impl<V> Clone for InMemorySessionStore<V> {
    fn clone(&self) -> Self {
        Self {
            cells: Arc::clone(&self.cells),
        }
    }
}

impl<V> Default for InMemorySessionStore<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> InMemorySessionStore<V> {
    pub fn new() -> Self {
        Self {
            cells: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Fetches (or creates) the cell for `key`. The outer map lock is only
    /// held for the lookup, never across an await on the cell itself.
    async fn cell(&self, key: i64) -> Arc<Mutex<Option<V>>> {
        let mut cells = self.cells.lock().await;
        Arc::clone(
            cells
                .entry(key)
                .or_insert_with(|| Arc::new(Mutex::new(None))),
        )
    }
}

#[async_trait]
impl<V> SessionStore<V> for InMemorySessionStore<V>
where
    V: Clone + Send + Sync + 'static,
{
    async fn get(&self, key: i64) -> Option<V> {
        let cell = self.cell(key).await;
        let guard = cell.lock().await;
        guard.clone()
    }

    async fn set(&self, key: i64, value: V) {
        let cell = self.cell(key).await;
        *cell.lock().await = Some(value);
    }

    async fn remove(&self, key: i64) -> Option<V> {
        let cell = self.cell(key).await;
        let value = cell.lock().await.take();
        value
    }

    async fn get_or_init(
        &self,
        key: i64,
        init: BoxFuture<'static, anyhow::Result<V>>,
    ) -> anyhow::Result<V> {
        let cell = self.cell(key).await;
        let mut guard = cell.lock().await;
        if let Some(value) = guard.as_ref() {
            return Ok(value.clone());
        }
        let value = init.await?;
        *guard = Some(value.clone());
        Ok(value)
    }
}
