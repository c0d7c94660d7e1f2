//! In-memory store whose "durable" side is a second map

use async_trait::async_trait;
use serde_json::{Map, Value};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{PoisonError, RwLock};
use std::time::Duration;

use crate::application::errors::{ConfigError, StorageError};
use crate::domain::traits::Store;
use crate::infrastructure::config::Config;

/// Store kept entirely in memory, for tests and dry runs
///
/// `save` copies the working map into the persisted map, optionally after a
/// delay, so write ordering between overlapping saves can be observed.
#[derive(Default)]
pub struct MemoryStore {
    values: RwLock<Map<String, Value>>,
    persisted: RwLock<Map<String, Value>>,
    save_delay: Option<Duration>,
    fail_saves: AtomicBool,
    saves: AtomicUsize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start with `contents` already persisted, as if read from disk
    pub fn with_contents(contents: Map<String, Value>) -> Self {
        Self {
            values: RwLock::new(contents.clone()),
            persisted: RwLock::new(contents),
            ..Self::default()
        }
    }

    pub fn with_save_delay(mut self, delay: Duration) -> Self {
        self.save_delay = Some(delay);
        self
    }

    /// Make every following `save` fail with an IO error
    pub fn fail_saves(&self, fail: bool) {
        self.fail_saves.store(fail, Ordering::SeqCst);
    }

    pub fn save_count(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }

    /// Snapshot of what the last completed save wrote
    pub fn persisted(&self) -> Map<String, Value> {
        self.persisted.read().unwrap_or_else(PoisonError::into_inner).clone()
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn load(&self) -> Result<Config, ConfigError> {
        let mut map = Config::defaults();
        map.extend(self.persisted());
        Config::normalize_lists(&mut map);

        let config = Config::from_map(&map)?;
        *self.values.write().unwrap_or_else(PoisonError::into_inner) = map;
        Ok(config)
    }

    fn get(&self, key: &str) -> Option<Value> {
        self.values
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned()
    }

    fn set(&self, key: &str, value: Value) {
        self.values
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.to_string(), value);
    }

    async fn save(&self) -> Result<(), StorageError> {
        self.saves.fetch_add(1, Ordering::SeqCst);
        if self.fail_saves.load(Ordering::SeqCst) {
            return Err(StorageError::Io(std::io::Error::new(
                std::io::ErrorKind::PermissionDenied,
                "read-only store",
            )));
        }

        let snapshot = self.values.read().unwrap_or_else(PoisonError::into_inner).clone();
        let after = super::save_timeout(self);
        let write = async {
            if let Some(delay) = self.save_delay {
                tokio::time::sleep(delay).await;
            }
            *self.persisted.write().unwrap_or_else(PoisonError::into_inner) = snapshot;
        };

        tokio::time::timeout(after, write)
            .await
            .map_err(|_| StorageError::Timeout(after))
    }
}
