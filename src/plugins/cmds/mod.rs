//! Built-in chat commands

mod dice;
mod kill;
mod permissions;
mod uptime;

use super::CommandSpec;

/// Every built-in command; adding one means adding it here
pub fn all() -> Vec<CommandSpec> {
    vec![
        permissions::whitelist(),
        permissions::blacklist(),
        permissions::mute(),
        dice::dice(),
        uptime::uptime(),
        kill::kill(),
    ]
}
