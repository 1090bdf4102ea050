//! Storage capability for journal and goal state. The engine never touches
//! persistence directly; callers hand in any `ScoreStore` and the server
//! defaults to the in-process memory store.

use std::collections::HashMap;
use std::sync::Mutex;

use anyhow::Result;

/// Key for the persisted score journal.
pub const HISTORY_KEY: &str = "sat_score_history";
/// Key for the persisted score goal.
pub const GOAL_KEY: &str = "sat_score_goal";

/// String key/value storage. Values are JSON documents owned by the caller.
#[async_trait::async_trait]
pub trait ScoreStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>>;
    async fn set(&self, key: &str, value: &str) -> Result<()>;
    async fn remove(&self, key: &str) -> Result<()>;
}

/// In-process store backing the default server setup and tests.
#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.inner.lock().expect("store mutex poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait::async_trait]
impl ScoreStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self
            .inner
            .lock()
            .expect("store mutex poisoned")
            .get(key)
            .cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        self.inner
            .lock()
            .expect("store mutex poisoned")
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<()> {
        self.inner
            .lock()
            .expect("store mutex poisoned")
            .remove(key);
        Ok(())
    }
}
