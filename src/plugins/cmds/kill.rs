//! `kill` - log off and end the event loop

use async_trait::async_trait;

use crate::application::errors::CommandError;
use crate::application::messaging::guards;
use crate::plugins::{AsyncHandler, CommandContext, CommandHandler, CommandSpec, HandlerResult};

pub fn kill() -> CommandSpec {
    CommandSpec::new("kill", "Terminate the bot", CommandHandler::asynchronous(Kill))
        .with_guard(guards::whitelisted_sender)
}

struct Kill;

#[async_trait]
impl AsyncHandler for Kill {
    async fn call(&self, ctx: &CommandContext<'_>) -> HandlerResult {
        tracing::info!("Kill requested by {}", ctx.invocation.sender_id);
        ctx.bot
            .stop()
            .await
            .map_err(|e| CommandError::ExecutionFailed(e.to_string()))?;
        Ok(None)
    }
}
