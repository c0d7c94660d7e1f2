//! `whitelist`, `blacklist` and `mute`
//!
//! ```text
//! whitelist 76561197962144253
//! // => Permissions updated
//! whitelist 76561197962144253 --remove
//! // => Permissions updated
//! ```

use async_trait::async_trait;

use crate::application::errors::CommandError;
use crate::application::messaging::guards;
use crate::domain::entities::{Flag, ListName, Positional};
use crate::plugins::{AsyncHandler, CommandContext, CommandHandler, CommandSpec, HandlerResult};

const UPDATED: &str = "Permissions updated";

pub fn whitelist() -> CommandSpec {
    list_command(ListName::Whitelist, "Whitelist a user or group")
}

pub fn blacklist() -> CommandSpec {
    list_command(ListName::Blacklist, "Blacklist a user or group")
}

pub fn mute() -> CommandSpec {
    list_command(ListName::Mute, "Mute the bot for a user or group")
}

fn list_command(list: ListName, description: &str) -> CommandSpec {
    CommandSpec::new(list.as_str(), description, CommandHandler::asynchronous(UpdateList { list }))
        .with_positional(
            Positional::required("steam-id").with_description("64-bit user or group Steam ID"),
        )
        .with_flag(
            Flag::boolean("remove")
                .with_short('r')
                .with_description(format!("Remove from the {} instead", list)),
        )
        .with_guard(guards::whitelisted_sender)
}

struct UpdateList {
    list: ListName,
}

#[async_trait]
impl AsyncHandler for UpdateList {
    async fn call(&self, ctx: &CommandContext<'_>) -> HandlerResult {
        let steam_id = ctx
            .args
            .str("steam-id")
            .ok_or_else(|| CommandError::ExecutionFailed("missing steam-id".to_string()))?;

        let lists = ctx.bot.lists();
        let result = if ctx.args.flag("remove") {
            lists.remove(self.list, steam_id).await
        } else {
            lists.add(self.list, steam_id).await
        };
        result.map_err(CommandError::Persistence)?;

        Ok(Some(UPDATED.to_string()))
    }
}
