//! Loopback adapter - answers with scripted results and records every call

use async_trait::async_trait;
use std::sync::{Mutex, PoisonError};

use crate::application::errors::BotError;
use crate::domain::entities::EResult;
use crate::domain::traits::Transport;

/// One call made against the transport
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Connect,
    LogOn,
    LogOff,
    JoinChat(String),
    LeaveChat(String),
    AddFriend(String),
    RemoveFriend(String),
    ChatMessage { target_id: String, text: String },
}

/// Transport that never touches the network, for tests and dry runs
pub struct LoopbackTransport {
    calls: Mutex<Vec<Call>>,
    connect_error: Option<String>,
    login_result: EResult,
    log_off_result: EResult,
    join_result: EResult,
    friend_result: EResult,
    hang_log_off: bool,
}

impl LoopbackTransport {
    pub fn new() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            connect_error: None,
            login_result: EResult::OK,
            log_off_result: EResult::OK,
            join_result: EResult::OK,
            friend_result: EResult::OK,
            hang_log_off: false,
        }
    }

    pub fn with_connect_error(mut self, message: impl Into<String>) -> Self {
        self.connect_error = Some(message.into());
        self
    }

    pub fn with_login_result(mut self, result: EResult) -> Self {
        self.login_result = result;
        self
    }

    pub fn with_log_off_result(mut self, result: EResult) -> Self {
        self.log_off_result = result;
        self
    }

    pub fn with_join_result(mut self, result: EResult) -> Self {
        self.join_result = result;
        self
    }

    pub fn with_friend_result(mut self, result: EResult) -> Self {
        self.friend_result = result;
        self
    }

    /// Never acknowledge a log off
    pub fn with_hanging_log_off(mut self) -> Self {
        self.hang_log_off = true;
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    /// Every chat message sent, as `(target, text)`
    pub fn messages(&self) -> Vec<(String, String)> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                Call::ChatMessage { target_id, text } => Some((target_id, text)),
                _ => None,
            })
            .collect()
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap_or_else(PoisonError::into_inner).push(call);
    }
}

impl Default for LoopbackTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Transport for LoopbackTransport {
    async fn connect(&self) -> Result<(), BotError> {
        self.record(Call::Connect);
        match &self.connect_error {
            Some(message) => Err(BotError::Network(message.clone())),
            None => Ok(()),
        }
    }

    async fn log_on(&self, _credentials: &serde_json::Value) -> Result<EResult, BotError> {
        self.record(Call::LogOn);
        Ok(self.login_result)
    }

    async fn log_off(&self) -> Result<EResult, BotError> {
        self.record(Call::LogOff);
        if self.hang_log_off {
            std::future::pending::<()>().await;
        }
        Ok(self.log_off_result)
    }

    async fn join_chat(&self, chat_id: &str) -> Result<EResult, BotError> {
        self.record(Call::JoinChat(chat_id.to_string()));
        Ok(self.join_result)
    }

    async fn leave_chat(&self, chat_id: &str) -> Result<(), BotError> {
        self.record(Call::LeaveChat(chat_id.to_string()));
        Ok(())
    }

    async fn add_friend(&self, user_id: &str) -> Result<EResult, BotError> {
        self.record(Call::AddFriend(user_id.to_string()));
        Ok(self.friend_result)
    }

    async fn remove_friend(&self, user_id: &str) -> Result<(), BotError> {
        self.record(Call::RemoveFriend(user_id.to_string()));
        Ok(())
    }

    async fn chat_message(&self, target_id: &str, text: &str) -> Result<(), BotError> {
        self.record(Call::ChatMessage {
            target_id: target_id.to_string(),
            text: text.to_string(),
        });
        Ok(())
    }

    fn name(&self) -> &str {
        "loopback"
    }
}
