use async_trait::async_trait;
use serde_json::Value;
use crate::application::errors::{ConfigError, StorageError};
use crate::infrastructure::config::Config;

/// Store trait - durable key/value configuration backing the bot
///
/// `set` only touches memory; nothing reaches durable storage until `save`.
/// The store does not queue saves, callers that mutate shared keys must
/// serialise their read-modify-save cycles themselves.
#[async_trait]
pub trait Store: Send + Sync {
    /// Read the backing resource and merge it over `Config::default()`,
    /// stored values win per key
    async fn load(&self) -> Result<Config, ConfigError>;

    fn get(&self, key: &str) -> Option<Value>;

    fn set(&self, key: &str, value: Value);

    /// Write the whole in-memory representation to durable storage
    async fn save(&self) -> Result<(), StorageError>;
}
