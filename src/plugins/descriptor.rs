//! Command and trigger descriptors contributed by plugins

use async_trait::async_trait;
use std::fmt;
use std::sync::Arc;

use crate::application::errors::{BotError, CommandError};
use crate::application::messaging::guards::Guard;
use crate::application::services::SteamBot;
use crate::domain::entities::{Event, EventKind, Flag, Invocation, ParsedArgs, Positional};

/// `Some(text)` replies, `None` stays silent
pub type HandlerResult = Result<Option<String>, CommandError>;

/// Everything a command handler may look at or act through
pub struct CommandContext<'a> {
    pub bot: &'a SteamBot,
    pub invocation: &'a Invocation,
    pub args: &'a ParsedArgs,
}

/// Handler that needs to await (store saves, transport calls)
#[async_trait]
pub trait AsyncHandler: Send + Sync {
    async fn call(&self, ctx: &CommandContext<'_>) -> HandlerResult;
}

type SyncHandler = dyn Fn(&CommandContext<'_>) -> HandlerResult + Send + Sync;

#[derive(Clone)]
pub enum CommandHandler {
    Sync(Arc<SyncHandler>),
    Async(Arc<dyn AsyncHandler>),
}

impl CommandHandler {
    pub fn sync<F>(handler: F) -> Self
    where
        F: Fn(&CommandContext<'_>) -> HandlerResult + Send + Sync + 'static,
    {
        CommandHandler::Sync(Arc::new(handler))
    }

    pub fn asynchronous<H: AsyncHandler + 'static>(handler: H) -> Self {
        CommandHandler::Async(Arc::new(handler))
    }

    pub async fn call(&self, ctx: &CommandContext<'_>) -> HandlerResult {
        match self {
            CommandHandler::Sync(handler) => handler(ctx),
            CommandHandler::Async(handler) => handler.call(ctx).await,
        }
    }
}

/// Immutable description of one chat command
#[derive(Clone)]
pub struct CommandSpec {
    pub name: String,
    pub description: String,
    pub positionals: Vec<Positional>,
    pub flags: Vec<Flag>,
    /// Reject unknown flags and surplus positionals
    pub strict: bool,
    pub guard: Option<Guard>,
    pub handler: CommandHandler,
}

impl CommandSpec {
    pub fn new(name: impl Into<String>, description: impl Into<String>, handler: CommandHandler) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            positionals: Vec::new(),
            flags: Vec::new(),
            strict: true,
            guard: None,
            handler,
        }
    }

    pub fn with_positional(mut self, positional: Positional) -> Self {
        self.positionals.push(positional);
        self
    }

    pub fn with_flag(mut self, flag: Flag) -> Self {
        self.flags.push(flag);
        self
    }

    pub fn with_guard(mut self, guard: Guard) -> Self {
        self.guard = Some(guard);
        self
    }

    /// Ignore unknown flags and surplus positionals instead of failing
    pub fn lenient(mut self) -> Self {
        self.strict = false;
        self
    }

    /// One-line usage, e.g. `whitelist <steam-id> [options]`
    pub fn usage(&self) -> String {
        let mut usage = self.name.clone();
        for positional in &self.positionals {
            usage.push(' ');
            usage.push_str(&positional.usage());
        }
        if !self.flags.is_empty() {
            usage.push_str(" [options]");
        }
        usage
    }

    /// Usage plus a line per parameter
    pub fn help(&self) -> String {
        let mut help = format!("{} - {}\nUsage: {}", self.name, self.description, self.usage());
        for positional in &self.positionals {
            if let Some(desc) = &positional.description {
                help.push_str(&format!("\n  {} {}", positional.usage(), desc));
            }
        }
        for flag in &self.flags {
            help.push_str(&format!(
                "\n  {} {}",
                flag.usage(),
                flag.description.as_deref().unwrap_or("")
            ));
        }
        help
    }
}

impl fmt::Debug for CommandSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandSpec")
            .field("name", &self.name)
            .field("positionals", &self.positionals)
            .field("flags", &self.flags)
            .field("strict", &self.strict)
            .field("guarded", &self.guard.is_some())
            .finish()
    }
}

/// Handler bound to a network event
#[async_trait]
pub trait TriggerHandler: Send + Sync {
    async fn handle(&self, bot: &SteamBot, event: &Event) -> Result<(), BotError>;
}

/// Immutable description of one event trigger
#[derive(Clone)]
pub struct TriggerSpec {
    pub name: String,
    pub event: EventKind,
    pub handler: Arc<dyn TriggerHandler>,
}

impl TriggerSpec {
    pub fn new<H: TriggerHandler + 'static>(name: impl Into<String>, event: EventKind, handler: H) -> Self {
        Self {
            name: name.into(),
            event,
            handler: Arc::new(handler),
        }
    }
}

impl fmt::Debug for TriggerSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TriggerSpec")
            .field("name", &self.name)
            .field("event", &self.event)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spec() -> CommandSpec {
        CommandSpec::new("mute", "Mute a user or group", CommandHandler::sync(|_| Ok(None)))
            .with_positional(Positional::required("steam-id").with_description("64-bit Steam ID"))
            .with_flag(Flag::boolean("remove").with_short('r').with_description("Unmute instead"))
    }

    #[test]
    fn test_usage() {
        assert_eq!(spec().usage(), "mute <steam-id> [options]");
    }

    #[test]
    fn test_help_lists_parameters() {
        let help = spec().help();
        assert!(help.starts_with("mute - Mute a user or group"));
        assert!(help.contains("<steam-id> 64-bit Steam ID"));
        assert!(help.contains("-r, --remove Unmute instead"));
    }
}
