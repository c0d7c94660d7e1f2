use async_trait::async_trait;

use crate::application::errors::BotError;
use crate::application::services::SteamBot;
use crate::domain::entities::{Event, EventKind, Relationship};
use crate::plugins::{TriggerHandler, TriggerSpec};

/// Accept incoming friend requests from anyone not blacklisted
pub fn accept_friend_request() -> TriggerSpec {
    TriggerSpec::new("accept-friend-request", EventKind::FriendRelationship, AcceptFriendRequest)
}

struct AcceptFriendRequest;

#[async_trait]
impl TriggerHandler for AcceptFriendRequest {
    async fn handle(&self, bot: &SteamBot, event: &Event) -> Result<(), BotError> {
        let Event::FriendRelationship { user_id, relationship } = event else {
            return Ok(());
        };
        if *relationship != Relationship::RequestRecipient {
            return Ok(());
        }
        if bot.lists().blacklisted(user_id) {
            tracing::debug!("Ignoring friend request from blacklisted {}", user_id);
            return Ok(());
        }

        if let Err(e) = bot.befriend(user_id).await {
            bot.respond(user_id, &e.to_string()).await?;
            return Err(e);
        }
        Ok(())
    }
}
