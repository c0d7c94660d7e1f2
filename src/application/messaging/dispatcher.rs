//! Command dispatcher - Resolves a command line, checks guards, runs handlers

use std::error::Error as _;
use std::sync::Arc;

use super::guards::GuardContext;
use super::parser::MessageParser;
use crate::application::errors::CommandError;
use crate::application::services::SteamBot;
use crate::domain::entities::Invocation;
use crate::plugins::{CommandContext, PluginRegistry};

/// Result of dispatching one command line
#[derive(Debug)]
pub enum Outcome {
    Reply(String),
    /// Help or usage text, not an error
    Help(String),
    /// The handler ran and chose not to reply
    Silent,
    Error(CommandError),
}

impl Outcome {
    /// Text to send back to the chat, if any
    pub fn text(&self) -> Option<String> {
        match self {
            Outcome::Reply(text) | Outcome::Help(text) => Some(text.clone()),
            Outcome::Silent => None,
            Outcome::Error(e) => Some(e.to_string()),
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Outcome::Error(_))
    }
}

/// Routes command lines to the handlers in the plugin registry
pub struct CommandDispatcher {
    registry: Arc<PluginRegistry>,
}

impl CommandDispatcher {
    pub fn new(registry: Arc<PluginRegistry>) -> Self {
        Self { registry }
    }

    /// Dispatch `line`, which must already have the root keyword stripped
    pub async fn dispatch(&self, bot: &SteamBot, line: &str, sender_id: &str, chat_id: &str) -> Outcome {
        let invocation = Invocation::new(line, sender_id, chat_id);
        let tokens = MessageParser::tokenize(line);

        let Some((name, rest)) = tokens.split_first() else {
            return Outcome::Error(CommandError::UnknownCommand(String::new()));
        };

        if MessageParser::is_help(name) {
            return Outcome::Help(self.help());
        }

        let Some(spec) = self.registry.command(name) else {
            tracing::debug!("[{}] Unknown command from {}: {}", invocation.id, sender_id, name);
            return Outcome::Error(CommandError::UnknownCommand(name.clone()));
        };

        if rest.iter().any(|t| t == "--help" || t == "-h")
            && !spec.flags.iter().any(|f| f.matches("-h"))
        {
            return Outcome::Help(spec.help());
        }

        let args = match MessageParser::parse_args(spec, rest) {
            Ok(args) => args,
            Err(e) => return Outcome::Error(e),
        };

        if let Some(guard) = spec.guard {
            let ctx = GuardContext {
                sender_id,
                chat_id,
                lists: bot.lists(),
            };
            if !guard(&ctx) {
                tracing::warn!("[{}] {} denied to {} in {}", invocation.id, spec.name, sender_id, chat_id);
                return Outcome::Error(CommandError::PermissionDenied);
            }
        }

        tracing::debug!("[{}] Running {} for {}: {}", invocation.id, spec.name, sender_id, invocation.preview());
        let ctx = CommandContext {
            bot,
            invocation: &invocation,
            args: &args,
        };

        match spec.handler.call(&ctx).await {
            Ok(Some(text)) => Outcome::Reply(text),
            Ok(None) => Outcome::Silent,
            Err(e) => {
                match e.source() {
                    Some(cause) => tracing::error!("[{}] {} failed: {} ({})", invocation.id, spec.name, e, cause),
                    None => tracing::warn!("[{}] {} failed: {}", invocation.id, spec.name, e),
                }
                Outcome::Error(e)
            }
        }
    }

    /// Every command with its usage and description
    pub fn help(&self) -> String {
        let mut help = "Available commands:\n".to_string();
        for spec in self.registry.commands() {
            help.push_str(&format!("  {} - {}\n", spec.usage(), spec.description));
        }
        help.push_str("Use <command> --help for details");
        help
    }
}
