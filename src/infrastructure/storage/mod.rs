//! File-based storage implementation

mod memory;

use async_trait::async_trait;
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};
use std::sync::{PoisonError, RwLock};
use std::time::Duration;

use crate::application::errors::{ConfigError, StorageError};
use crate::domain::traits::Store;
use crate::infrastructure::config::{Config, Format, CMD_KEY, TIMEOUT_KEY};

pub use memory::MemoryStore;

/// Config-file backed store; JSON unless the path ends in `.yaml`/`.yml`
pub struct JsonStore {
    path: PathBuf,
    format: Format,
    values: RwLock<Map<String, Value>>,
    cmd_override: Option<String>,
}

impl JsonStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        Self {
            format: Format::from_path(&path),
            values: RwLock::new(Config::defaults()),
            cmd_override: Config::cmd_from_env(),
            path,
        }
    }

    /// Root keyword forced over the file's `cmd`, in the loaded view only.
    /// Defaults to the `BOT_CMD` environment variable.
    pub fn with_cmd_override(mut self, cmd: Option<String>) -> Self {
        self.cmd_override = cmd;
        self
    }

    fn snapshot(&self) -> Map<String, Value> {
        self.values.read().unwrap_or_else(PoisonError::into_inner).clone()
    }
}

/// Deadline for one save, from the store's own `timeout` key
fn save_timeout(store: &impl Store) -> Duration {
    let secs = store
        .get(TIMEOUT_KEY)
        .and_then(|v| v.as_u64())
        .filter(|secs| *secs > 0)
        .unwrap_or(Config::default().timeout);
    Duration::from_secs(secs)
}

#[async_trait]
impl Store for JsonStore {
    async fn load(&self) -> Result<Config, ConfigError> {
        let mut map = Config::defaults();

        match tokio::fs::read_to_string(&self.path).await {
            Ok(content) => {
                map.extend(self.format.parse(&content)?);
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::info!("Config file {} not found, using defaults", self.path.display());
            }
            Err(e) => {
                return Err(ConfigError::Read(format!("{}: {}", self.path.display(), e)));
            }
        }

        Config::normalize_lists(&mut map);

        // The override shapes the returned view only, it is never saved
        let mut view = map.clone();
        if let Some(cmd) = &self.cmd_override {
            view.insert(CMD_KEY.to_string(), Value::String(cmd.clone()));
        }
        let config = Config::from_map(&view)?;

        *self.values.write().unwrap_or_else(PoisonError::into_inner) = map;
        tracing::debug!("Loaded config from {}", self.path.display());
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
        let content = self.format.render(&self.snapshot())?;
        write_replace(&self.path, content, save_timeout(self)).await?;

        tracing::debug!("Saved config to {}", self.path.display());
        Ok(())
    }
}

/// Write to a sibling temporary file, then rename it over the target so a
/// crash mid-write never leaves a truncated config behind.
///
/// Only the write is bounded by `after`. A write that times out keeps running
/// on the blocking pool, but its file has a name of its own and is never
/// renamed, so the target keeps its previous contents. The rename is awaited
/// unbounded because once it starts it cannot be called back. An abandoned
/// write may leave its temporary file behind.
async fn write_replace(path: &Path, content: String, after: Duration) -> Result<(), StorageError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent).await?;
    }

    let mut tmp = path.as_os_str().to_owned();
    tmp.push(format!(".{}.tmp", uuid::Uuid::new_v4().simple()));
    let tmp = PathBuf::from(tmp);

    tokio::time::timeout(after, tokio::fs::write(&tmp, content))
        .await
        .map_err(|_| StorageError::Timeout(after))??;
    tokio::fs::rename(&tmp, path).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::collections::HashSet;

    fn members(config: &Config) -> HashSet<String> {
        config.whitelist.iter().cloned().collect()
    }

    #[tokio::test]
    async fn test_missing_file_loads_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonStore::new(dir.path().join("cheevobot.json"));

        let config = store.load().await.unwrap();
        assert_eq!(config.whitelist, Config::default().whitelist);
        assert_eq!(config.timeout, 30);
    }

    #[tokio::test]
    async fn test_file_values_win_per_key() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cheevobot.json");
        std::fs::write(&path, r#"{"mute": ["42"], "extra": true}"#).unwrap();

        let store = JsonStore::new(&path);
        let config = store.load().await.unwrap();

        assert_eq!(config.mute, vec!["42".to_string()]);
        assert_eq!(config.timeout, 30);
        assert_eq!(store.get("extra"), Some(json!(true)));
        assert_eq!(store.get("whitelist"), Some(json!([])));
    }

    #[tokio::test]
    async fn test_unparseable_file_is_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cheevobot.json");
        std::fs::write(&path, "{ not json").unwrap();

        let store = JsonStore::new(&path);
        assert!(matches!(store.load().await, Err(ConfigError::Parse(_))));
    }

    #[tokio::test]
    async fn test_save_then_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("cheevobot.json");

        let store = JsonStore::new(&path);
        store.load().await.unwrap();
        store.set("whitelist", json!(["3", "1", "2"]));
        store.save().await.unwrap();

        let reloaded = JsonStore::new(&path).load().await.unwrap();
        let expected: HashSet<String> = ["1", "2", "3"].iter().map(|s| s.to_string()).collect();
        assert_eq!(members(&reloaded), expected);
        let files: Vec<_> = std::fs::read_dir(dir.path().join("nested"))
            .unwrap()
            .map(|entry| entry.unwrap().file_name())
            .collect();
        assert_eq!(files, vec![std::ffi::OsString::from("cheevobot.json")]);
    }

    #[tokio::test]
    async fn test_loaded_lists_are_normalized() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cheevobot.json");
        std::fs::write(&path, r#"{"whitelist": ["7", "7", 7], "mute": [12, "12", "3"]}"#).unwrap();

        let store = JsonStore::new(&path);
        let config = store.load().await.unwrap();
        assert_eq!(config.whitelist, vec!["7".to_string()]);
        assert_eq!(store.get("mute"), Some(json!(["12", "3"])));

        store.save().await.unwrap();
        let written: Value = serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(written["whitelist"], json!(["7"]));
    }

    #[tokio::test]
    async fn test_cmd_override_is_view_only() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cheevobot.json");
        std::fs::write(&path, r#"{"cmd": "cheevo"}"#).unwrap();

        let store = JsonStore::new(&path).with_cmd_override(Some("!bot".to_string()));
        assert_eq!(store.load().await.unwrap().cmd, "!bot");
        assert_eq!(store.get(CMD_KEY), Some(json!("cheevo")));

        store.save().await.unwrap();
        let reloaded = JsonStore::new(&path).with_cmd_override(None).load().await.unwrap();
        assert_eq!(reloaded.cmd, "cheevo");
    }

    #[tokio::test]
    async fn test_yaml_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cheevobot.yaml");
        std::fs::write(&path, "cmd: \"!bot\"\nblacklist:\n  - \"7\"\n").unwrap();

        let store = JsonStore::new(&path).with_cmd_override(None);
        let config = store.load().await.unwrap();
        assert_eq!(config.cmd, "!bot");

        store.set("blacklist", json!(["7", "8"]));
        store.save().await.unwrap();

        let reloaded = JsonStore::new(&path).with_cmd_override(None).load().await.unwrap();
        assert_eq!(reloaded.blacklist, vec!["7".to_string(), "8".to_string()]);
        assert_eq!(reloaded.cmd, "!bot");
    }
}
