use async_trait::async_trait;

use crate::application::errors::BotError;
use crate::application::services::SteamBot;
use crate::domain::entities::{Event, EventKind};
use crate::plugins::{TriggerHandler, TriggerSpec};

/// Join group chats the bot is invited to, unless the inviter or the chat
/// is blacklisted
pub fn accept_chat_invite() -> TriggerSpec {
    TriggerSpec::new("accept-chat-invite", EventKind::ChatInvite, AcceptChatInvite)
}

struct AcceptChatInvite;

#[async_trait]
impl TriggerHandler for AcceptChatInvite {
    async fn handle(&self, bot: &SteamBot, event: &Event) -> Result<(), BotError> {
        let Event::ChatInvite { inviter_id, chat_id, name } = event else {
            return Ok(());
        };
        let lists = bot.lists();
        if lists.blacklisted(inviter_id) || lists.blacklisted(chat_id) {
            tracing::debug!("Ignoring invite to {} from {}", chat_id, inviter_id);
            return Ok(());
        }

        tracing::info!("Invited to {} ({}) by {}", name, chat_id, inviter_id);
        if let Err(e) = bot.join(chat_id).await {
            bot.respond(inviter_id, &e.to_string()).await?;
            return Err(e);
        }
        Ok(())
    }
}
