//! Configuration management

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::path::Path;
use std::time::Duration;
use crate::application::errors::{ConfigError, StorageError};

/// Key holding the opaque transport credentials
pub const LOGIN_KEY: &str = "login";
/// Key holding the root keyword commands must start with
pub const CMD_KEY: &str = "cmd";
pub const TIMEOUT_KEY: &str = "timeout";
/// Keys holding permission lists
pub const LIST_KEYS: [&str; 3] = ["whitelist", "blacklist", "mute"];
/// Environment variable overriding the root keyword
pub const CMD_ENV: &str = "BOT_CMD";

/// Bot configuration, as merged from defaults and the config file
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    /// Passed to the transport unexamined
    pub login: Value,
    pub cmd: String,
    #[serde(deserialize_with = "tokens")]
    pub whitelist: Vec<String>,
    #[serde(deserialize_with = "tokens")]
    pub blacklist: Vec<String>,
    #[serde(deserialize_with = "tokens")]
    pub mute: Vec<String>,
    /// Seconds allowed for each transport call and each save
    pub timeout: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            login: Value::Object(Map::new()),
            cmd: "cheevo".to_string(),
            whitelist: Vec::new(),
            blacklist: Vec::new(),
            mute: Vec::new(),
            timeout: 30,
        }
    }
}

impl Config {
    /// Defaults as a flat key/value map, the base every load merges over
    pub fn defaults() -> Map<String, Value> {
        match serde_json::to_value(Config::default()) {
            Ok(Value::Object(map)) => map,
            _ => Map::new(),
        }
    }

    /// Typed view over a merged key/value map
    pub fn from_map(map: &Map<String, Value>) -> Result<Self, ConfigError> {
        let config: Config = serde_json::from_value(Value::Object(map.clone()))
            .map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.cmd.chars().any(char::is_whitespace) {
            return Err(ConfigError::InvalidValue(format!(
                "cmd must be a single word, got '{}'",
                self.cmd
            )));
        }
        if self.timeout == 0 {
            return Err(ConfigError::InvalidValue("timeout must be at least 1 second".to_string()));
        }
        Ok(())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout)
    }

    /// Root keyword override taken from the environment, if set
    pub fn cmd_from_env() -> Option<String> {
        std::env::var(CMD_ENV).ok()
    }

    /// Rewrite each permission list as string tokens without repeats,
    /// keeping the first occurrence. Members that are neither strings nor
    /// numbers are left for `from_map` to reject.
    pub fn normalize_lists(map: &mut Map<String, Value>) {
        for key in LIST_KEYS {
            let Some(Value::Array(items)) = map.get_mut(key) else {
                continue;
            };
            let mut seen = Vec::with_capacity(items.len());
            for item in items.drain(..) {
                let item = match item {
                    Value::Number(n) => Value::String(n.to_string()),
                    other => other,
                };
                if !seen.contains(&item) {
                    seen.push(item);
                }
            }
            *items = seen;
        }
    }
}

/// Steam IDs are often written as bare numbers; read them as tokens
fn tokens<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let values = Vec::<Value>::deserialize(deserializer)?;
    values
        .into_iter()
        .map(|value| match value {
            Value::String(s) => Ok(s),
            Value::Number(n) => Ok(n.to_string()),
            other => Err(serde::de::Error::custom(format!(
                "list members must be strings or numbers, found {}",
                kind_of(&other)
            ))),
        })
        .collect()
}

/// On-disk document format, chosen by file extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Json,
    Yaml,
}

impl Format {
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("yaml") | Some("yml") => Format::Yaml,
            _ => Format::Json,
        }
    }

    /// Parse a document whose top level must be a key/value map
    pub fn parse(&self, content: &str) -> Result<Map<String, Value>, ConfigError> {
        if content.trim().is_empty() {
            return Ok(Map::new());
        }

        let value: Value = match self {
            Format::Json => serde_json::from_str(content)
                .map_err(|e| ConfigError::Parse(e.to_string()))?,
            Format::Yaml => serde_yaml::from_str(content)
                .map_err(|e| ConfigError::Parse(e.to_string()))?,
        };

        match value {
            Value::Object(map) => Ok(map),
            Value::Null => Ok(Map::new()),
            other => Err(ConfigError::Parse(format!(
                "expected a key/value document, found {}",
                kind_of(&other)
            ))),
        }
    }

    pub fn render(&self, map: &Map<String, Value>) -> Result<String, StorageError> {
        match self {
            Format::Json => serde_json::to_string_pretty(map)
                .map(|mut s| {
                    s.push('\n');
                    s
                })
                .map_err(|e| StorageError::Serialization(e.to_string())),
            Format::Yaml => serde_yaml::to_string(map)
                .map_err(|e| StorageError::Serialization(e.to_string())),
        }
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
