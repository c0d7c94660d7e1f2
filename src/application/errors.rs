//! Application layer errors

use std::time::Duration;
use thiserror::Error;
use crate::application::services::BotState;
use crate::domain::entities::EResult;

/// General bot errors
#[derive(Error, Debug)]
pub enum BotError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Authentication error: login response {0}")]
    Authentication(EResult),

    #[error("Transport call '{operation}' timed out after {after:?}")]
    Timeout { operation: &'static str, after: Duration },

    #[error("{stage} failed: {source}")]
    Stage {
        stage: BotState,
        #[source]
        source: Box<BotError>,
    },

    #[error("Invalid state: expected {expected}, found {found}")]
    InvalidState { expected: BotState, found: BotState },

    #[error("Disconnect response {0}")]
    Disconnect(EResult),

    #[error("Request rejected: {0}")]
    Rejected(EResult),
}

impl BotError {
    pub(crate) fn at(stage: BotState, source: BotError) -> Self {
        BotError::Stage {
            stage,
            source: Box::new(source),
        }
    }
}

/// Command dispatch errors; every variant renders as a chat reply
#[derive(Error, Debug)]
pub enum CommandError {
    #[error("Unknown command: {0}")]
    UnknownCommand(String),

    #[error("{message}\nUsage: {usage}")]
    Usage { message: String, usage: String },

    #[error("Permission denied")]
    PermissionDenied,

    #[error("Execution failed: {0}")]
    ExecutionFailed(String),

    /// The raw cause stays in the logs, chat only sees the generic text
    #[error("Failed to update permissions")]
    Persistence(#[source] StorageError),
}

/// Storage errors
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Save timed out after {0:?}")]
    Timeout(Duration),
}

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config: {0}")]
    Read(String),

    #[error("Failed to parse config: {0}")]
    Parse(String),

    #[error("Invalid value: {0}")]
    InvalidValue(String),
}

/// Plugin registry construction errors
#[derive(Error, Debug)]
pub enum PluginError {
    #[error("Command '{0}' registered twice")]
    DuplicateCommand(String),

    #[error("Trigger '{0}' registered twice")]
    DuplicateTrigger(String),

    #[error("Invalid descriptor '{name}': {reason}")]
    Invalid { name: String, reason: String },
}
