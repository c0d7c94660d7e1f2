//! cheevobot - command dispatch and permission control for a Steam chat bot
//!
//! Layers:
//! - `domain`: events, invocations, command parameter shapes, and the
//!   `Transport` and `Store` seams
//! - `application`: permission lists, dispatch, event routing, the bot itself
//! - `infrastructure`: config file handling, stores, transport adapters
//! - `plugins`: built-in commands and triggers, and the registry holding them

pub mod domain;
pub mod application;
pub mod infrastructure;
pub mod plugins;

pub use application::errors::{BotError, CommandError, ConfigError, PluginError, StorageError};
pub use application::messaging::Outcome;
pub use application::services::{BotState, PermissionLists, SteamBot};
pub use domain::entities::{EResult, Event, ListName};
