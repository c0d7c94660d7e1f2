//! Plugin system for cheevobot
//!
//! Commands and triggers are plain descriptors. `registry()` enumerates
//! every built-in one; adding a plugin means adding its descriptor to
//! `cmds::all()` or `triggers::all()`, never touching dispatch code.

pub mod cmds;
pub mod descriptor;
pub mod registry;
pub mod triggers;

pub use descriptor::{
    AsyncHandler, CommandContext, CommandHandler, CommandSpec, HandlerResult, TriggerHandler,
    TriggerSpec,
};
pub use registry::PluginRegistry;

use crate::application::errors::PluginError;

/// Build the registry of built-in plugins; a clash is fatal at startup
pub fn registry() -> Result<PluginRegistry, PluginError> {
    let mut registry = PluginRegistry::new();
    for spec in cmds::all() {
        registry.register_command(spec)?;
    }
    for spec in triggers::all() {
        registry.register_trigger(spec)?;
    }

    tracing::info!(
        "Plugin registry built with {} commands and {} triggers",
        registry.command_count(),
        registry.trigger_count()
    );
    Ok(registry)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_registry_builds() {
        let registry = registry().unwrap();
        for name in ["whitelist", "blacklist", "mute", "dice", "uptime", "kill"] {
            assert!(registry.command(name).is_some(), "missing {}", name);
        }
        assert_eq!(registry.trigger_count(), 3);
    }
}
