//! Plugin registry - Command and trigger descriptors, keyed for dispatch

use std::collections::{BTreeMap, HashMap, HashSet};

use super::descriptor::{CommandSpec, TriggerSpec};
use crate::application::errors::PluginError;
use crate::application::messaging::MessageParser;
use crate::domain::entities::EventKind;

/// Registry of every command and trigger known to the bot
///
/// Filled once at startup and shared read-only afterwards.
#[derive(Default)]
pub struct PluginRegistry {
    commands: BTreeMap<String, CommandSpec>,
    triggers: HashMap<EventKind, Vec<TriggerSpec>>,
    trigger_names: HashSet<String>,
}

impl PluginRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a command; a name already taken is a configuration error
    pub fn register_command(&mut self, spec: CommandSpec) -> Result<(), PluginError> {
        validate(&spec)?;

        if self.commands.contains_key(&spec.name) {
            return Err(PluginError::DuplicateCommand(spec.name));
        }

        tracing::debug!("Registering command: {}", spec.name);
        self.commands.insert(spec.name.clone(), spec);
        Ok(())
    }

    /// Register a trigger after any others for the same event
    pub fn register_trigger(&mut self, spec: TriggerSpec) -> Result<(), PluginError> {
        if !self.trigger_names.insert(spec.name.clone()) {
            return Err(PluginError::DuplicateTrigger(spec.name));
        }

        tracing::debug!("Registering trigger: {} on {}", spec.name, spec.event);
        self.triggers.entry(spec.event).or_default().push(spec);
        Ok(())
    }

    /// Exact-name lookup
    pub fn command(&self, name: &str) -> Option<&CommandSpec> {
        self.commands.get(name)
    }

    /// All commands, sorted by name
    pub fn commands(&self) -> impl Iterator<Item = &CommandSpec> {
        self.commands.values()
    }

    /// Triggers for an event, in registration order
    pub fn triggers(&self, event: EventKind) -> &[TriggerSpec] {
        self.triggers.get(&event).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn command_count(&self) -> usize {
        self.commands.len()
    }

    pub fn trigger_count(&self) -> usize {
        self.trigger_names.len()
    }
}

fn validate(spec: &CommandSpec) -> Result<(), PluginError> {
    let invalid = |reason: &str| PluginError::Invalid {
        name: spec.name.clone(),
        reason: reason.to_string(),
    };

    if spec.name.is_empty() || spec.name.starts_with('-') || spec.name.chars().any(char::is_whitespace) {
        return Err(invalid("name must be a single word not starting with '-'"));
    }
    if MessageParser::is_help(&spec.name) {
        return Err(invalid("name is reserved for help"));
    }
    if spec
        .positionals
        .windows(2)
        .any(|pair| !pair[0].required && pair[1].required)
    {
        return Err(invalid("required positionals must come before optional ones"));
    }

    let mut seen = HashSet::new();
    for flag in &spec.flags {
        if !seen.insert(flag.name.as_str()) {
            return Err(invalid("flag declared twice"));
        }
    }
    let mut shorts = HashSet::new();
    for short in spec.flags.iter().filter_map(|f| f.short) {
        if !shorts.insert(short) {
            return Err(invalid("short flag declared twice"));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::errors::BotError;
    use crate::application::services::SteamBot;
    use crate::domain::entities::{Event, Positional};
    use crate::plugins::{CommandHandler, TriggerHandler};
    use async_trait::async_trait;

    struct Noop;

    #[async_trait]
    impl TriggerHandler for Noop {
        async fn handle(&self, _bot: &SteamBot, _event: &Event) -> Result<(), BotError> {
            Ok(())
        }
    }

    fn command(name: &str) -> CommandSpec {
        CommandSpec::new(name, "test", CommandHandler::sync(|_| Ok(None)))
    }

    #[test]
    fn test_duplicate_command_fails() {
        let mut registry = PluginRegistry::new();
        registry.register_command(command("dice")).unwrap();
        assert!(matches!(
            registry.register_command(command("dice")),
            Err(PluginError::DuplicateCommand(name)) if name == "dice"
        ));
    }

    #[test]
    fn test_invalid_names_fail() {
        let mut registry = PluginRegistry::new();
        for name in ["", "two words", "--flag", "help"] {
            assert!(registry.register_command(command(name)).is_err(), "{:?}", name);
        }
    }

    #[test]
    fn test_optional_before_required_fails() {
        let spec = command("bad")
            .with_positional(Positional::optional("a"))
            .with_positional(Positional::required("b"));
        assert!(PluginRegistry::new().register_command(spec).is_err());
    }

    #[test]
    fn test_triggers_keep_registration_order() {
        let mut registry = PluginRegistry::new();
        registry
            .register_trigger(TriggerSpec::new("first", EventKind::ChatInvite, Noop))
            .unwrap();
        registry
            .register_trigger(TriggerSpec::new("second", EventKind::ChatInvite, Noop))
            .unwrap();

        let names: Vec<&str> = registry
            .triggers(EventKind::ChatInvite)
            .iter()
            .map(|t| t.name.as_str())
            .collect();
        assert_eq!(names, vec!["first", "second"]);
        assert!(registry.triggers(EventKind::LoggedOn).is_empty());
        assert!(matches!(
            registry.register_trigger(TriggerSpec::new("first", EventKind::LoggedOn, Noop)),
            Err(PluginError::DuplicateTrigger(_))
        ));
    }
}
