//! `uptime`
//!
//! ```text
//! uptime
//! // => Bot uptime: 20.078s
//! ```

use crate::application::errors::CommandError;
use crate::application::messaging::guards;
use crate::plugins::{CommandHandler, CommandSpec};

pub fn uptime() -> CommandSpec {
    CommandSpec::new(
        "uptime",
        "Retrieve bot uptime",
        CommandHandler::sync(|ctx| {
            let uptime = ctx
                .bot
                .uptime()
                .ok_or_else(|| CommandError::ExecutionFailed("bot is not running".to_string()))?;
            Ok(Some(format!("Bot uptime: {:.3}s", uptime.as_secs_f64())))
        }),
    )
    .with_guard(guards::not_blacklisted)
}
