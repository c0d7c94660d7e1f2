use async_trait::async_trait;
use crate::domain::entities::EResult;
use crate::application::errors::BotError;

/// Transport trait - abstraction over the chat network connection
///
/// Calls that the network answers with a result code return that code
/// instead of failing, so callers decide what a non-OK result means.
/// `Err` is reserved for the transport itself being unusable.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Open the connection to the network
    async fn connect(&self) -> Result<(), BotError>;

    /// Submit credentials and wait for the login response
    async fn log_on(&self, credentials: &serde_json::Value) -> Result<EResult, BotError>;

    /// Request a disconnect and wait for it to be acknowledged
    async fn log_off(&self) -> Result<EResult, BotError>;

    /// Join a user or group chat
    async fn join_chat(&self, chat_id: &str) -> Result<EResult, BotError>;

    async fn leave_chat(&self, chat_id: &str) -> Result<(), BotError>;

    /// Send or accept a friend request
    async fn add_friend(&self, user_id: &str) -> Result<EResult, BotError>;

    async fn remove_friend(&self, user_id: &str) -> Result<(), BotError>;

    /// Send a chat message to a user or group chat
    async fn chat_message(&self, target_id: &str, text: &str) -> Result<(), BotError>;

    /// Adapter name, for logs
    fn name(&self) -> &str;
}
