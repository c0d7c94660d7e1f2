use async_trait::async_trait;

use crate::application::errors::BotError;
use crate::application::services::SteamBot;
use crate::domain::entities::{Event, EventKind};
use crate::plugins::{TriggerHandler, TriggerSpec};

/// Run chat messages as commands
pub fn exec_cmd() -> TriggerSpec {
    TriggerSpec::new("exec-cmd", EventKind::FriendOrChatMessage, ExecCmd)
}

struct ExecCmd;

#[async_trait]
impl TriggerHandler for ExecCmd {
    async fn handle(&self, bot: &SteamBot, event: &Event) -> Result<(), BotError> {
        if let Event::FriendOrChatMessage { sender_id, text, chat_id } = event {
            bot.exec(text, sender_id, chat_id).await;
        }
        Ok(())
    }
}
