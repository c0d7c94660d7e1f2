use std::sync::Arc;
use serde_json::Value;
use tokio::sync::Mutex;

use crate::application::errors::StorageError;
use crate::domain::entities::ListName;
use crate::domain::traits::Store;

/// Whitelist, blacklist and mute lists, read and written through the store
///
/// Every mutation runs read-modify-save under one writer lock, so each
/// `add`/`remove` persists a state that includes all earlier completed
/// mutations. Reads never wait on the lock.
pub struct PermissionLists {
    store: Arc<dyn Store>,
    writer: Mutex<()>,
}

impl PermissionLists {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self {
            store,
            writer: Mutex::new(()),
        }
    }

    /// Current members, in stored order
    pub fn members(&self, list: ListName) -> Vec<String> {
        decode(self.store.get(list.as_str()).as_ref())
    }

    pub fn contains(&self, list: ListName, token: &str) -> bool {
        self.members(list).iter().any(|member| member == token)
    }

    pub fn whitelisted(&self, token: &str) -> bool {
        self.contains(ListName::Whitelist, token)
    }

    pub fn blacklisted(&self, token: &str) -> bool {
        self.contains(ListName::Blacklist, token)
    }

    pub fn muted(&self, token: &str) -> bool {
        self.contains(ListName::Mute, token)
    }

    /// Add `token`; already present means no change, but the save still runs
    pub async fn add(&self, list: ListName, token: &str) -> Result<(), StorageError> {
        self.update(list, token, |members| {
            if members.iter().any(|m| m == token) {
                false
            } else {
                members.push(token.to_string());
                true
            }
        })
        .await
    }

    /// Remove `token`; absent means no change, but the save still runs
    pub async fn remove(&self, list: ListName, token: &str) -> Result<(), StorageError> {
        self.update(list, token, |members| {
            let before = members.len();
            members.retain(|m| m != token);
            members.len() != before
        })
        .await
    }

    async fn update<F>(&self, list: ListName, token: &str, mutate: F) -> Result<(), StorageError>
    where
        F: FnOnce(&mut Vec<String>) -> bool,
    {
        let _writer = self.writer.lock().await;

        let previous = self.store.get(list.as_str());
        let mut members = decode(previous.as_ref());
        let changed = mutate(&mut members);
        if changed {
            self.store.set(list.as_str(), encode(members));
        }

        if let Err(e) = self.store.save().await {
            if changed {
                // Memory must not run ahead of what was persisted
                self.store
                    .set(list.as_str(), previous.unwrap_or_else(|| Value::Array(Vec::new())));
            }
            tracing::error!("Failed to persist {} update for {}: {}", list, token, e);
            return Err(e);
        }

        if changed {
            tracing::info!("Updated {}: {}", list, token);
        } else {
            tracing::debug!("{} unchanged for {}", list, token);
        }
        Ok(())
    }
}

fn decode(value: Option<&Value>) -> Vec<String> {
    let Some(Value::Array(items)) = value else {
        return Vec::new();
    };

    items
        .iter()
        .filter_map(|item| match item {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        })
        .collect()
}

fn encode(members: Vec<String>) -> Value {
    Value::Array(members.into_iter().map(Value::String).collect())
}
