use chrono::{DateTime, Utc};
use std::fmt;
use std::future::Future;
use std::sync::{Arc, Mutex, PoisonError, RwLock};
use std::time::Duration;
use tokio::sync::mpsc;

use super::PermissionLists;
use crate::application::errors::BotError;
use crate::application::messaging::{CommandDispatcher, MessageParser, Outcome, TriggerRouter};
use crate::domain::entities::Event;
use crate::domain::traits::{Store, Transport};
use crate::infrastructure::config::Config;
use crate::plugins::PluginRegistry;

/// Lifecycle of a bot session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BotState {
    Created,
    Starting,
    Connecting,
    Authenticating,
    Ready,
    Stopping,
    Stopped,
    Failed,
}

impl fmt::Display for BotState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            BotState::Created => "created",
            BotState::Starting => "starting",
            BotState::Connecting => "connecting",
            BotState::Authenticating => "authenticating",
            BotState::Ready => "ready",
            BotState::Stopping => "stopping",
            BotState::Stopped => "stopped",
            BotState::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// The bot: owns the transport, the store, the permission lists and the
/// plugin registry, and drives the session lifecycle.
///
/// Commands and triggers only ever see this public surface.
pub struct SteamBot {
    transport: Arc<dyn Transport>,
    store: Arc<dyn Store>,
    lists: PermissionLists,
    dispatcher: CommandDispatcher,
    router: TriggerRouter,
    state: Mutex<BotState>,
    config: RwLock<Config>,
    started_at: Mutex<Option<DateTime<Utc>>>,
}

impl SteamBot {
    pub fn new(transport: Arc<dyn Transport>, store: Arc<dyn Store>, registry: PluginRegistry) -> Self {
        let registry = Arc::new(registry);
        Self {
            lists: PermissionLists::new(store.clone()),
            dispatcher: CommandDispatcher::new(registry.clone()),
            router: TriggerRouter::new(registry),
            transport,
            store,
            state: Mutex::new(BotState::Created),
            config: RwLock::new(Config::default()),
            started_at: Mutex::new(None),
        }
    }

    pub fn state(&self) -> BotState {
        *self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn lists(&self) -> &PermissionLists {
        &self.lists
    }

    /// Configuration as loaded by `start`
    pub fn config(&self) -> Config {
        self.config.read().unwrap_or_else(PoisonError::into_inner).clone()
    }

    /// Time since the bot became ready
    pub fn uptime(&self) -> Option<Duration> {
        let started_at = (*self.started_at.lock().unwrap_or_else(PoisonError::into_inner))?;
        (Utc::now() - started_at).to_std().ok()
    }

    /// Load the store, connect and log in
    pub async fn start(&self) -> Result<(), BotError> {
        self.advance(BotState::Created, BotState::Starting)?;

        let config = match self.store.load().await {
            Ok(config) => config,
            Err(e) => return Err(self.fail(BotState::Starting, e.into())),
        };
        *self.config.write().unwrap_or_else(PoisonError::into_inner) = config.clone();

        self.set_state(BotState::Connecting);
        if let Err(e) = self.call("connect", self.transport.connect()).await {
            return Err(self.fail(BotState::Connecting, e));
        }

        self.set_state(BotState::Authenticating);
        match self.call("logOn", self.transport.log_on(&config.login)).await {
            Ok(result) if result.is_ok() => {}
            Ok(result) => return Err(self.fail(BotState::Authenticating, BotError::Authentication(result))),
            Err(e) => return Err(self.fail(BotState::Authenticating, e)),
        }

        *self.started_at.lock().unwrap_or_else(PoisonError::into_inner) = Some(Utc::now());
        self.set_state(BotState::Ready);
        tracing::info!("Logged in via {}", self.transport.name());
        Ok(())
    }

    /// Log off; the bot ends up stopped even when the disconnect reports an error
    pub async fn stop(&self) -> Result<(), BotError> {
        self.advance(BotState::Ready, BotState::Stopping)?;

        let result = self.call("logOff", self.transport.log_off()).await;
        self.set_state(BotState::Stopped);

        match result {
            Ok(code) if code.is_ok() => Ok(()),
            Ok(code) => Err(BotError::Disconnect(code)),
            Err(e) => Err(e),
        }
    }

    /// Send `text` to a chat unless that chat is muted
    pub async fn respond(&self, chat_id: &str, text: &str) -> Result<(), BotError> {
        if self.lists.muted(chat_id) {
            tracing::debug!("Muted, not responding in {}", chat_id);
            return Ok(());
        }
        self.call("chatMessage", self.transport.chat_message(chat_id, text)).await
    }

    /// Run a chat message as a command. Messages without the root keyword
    /// are not commands and yield `None`; otherwise any text outcome is
    /// sent back to the chat.
    pub async fn exec(&self, raw: &str, sender_id: &str, chat_id: &str) -> Option<Outcome> {
        let root = self.config.read().unwrap_or_else(PoisonError::into_inner).cmd.clone();
        let line = MessageParser::new(root).strip_root(raw)?;

        let outcome = self.dispatcher.dispatch(self, line, sender_id, chat_id).await;
        if let Some(text) = outcome.text() {
            if let Err(e) = self.respond(chat_id, &text).await {
                tracing::error!("Failed to respond in {}: {}", chat_id, e);
            }
        }
        Some(outcome)
    }

    /// Join a user or group chat
    pub async fn join(&self, chat_id: &str) -> Result<(), BotError> {
        let result = self.call("joinChat", self.transport.join_chat(chat_id)).await?;
        if !result.is_ok() {
            return Err(BotError::Rejected(result));
        }
        tracing::info!("Joined chat {}", chat_id);
        Ok(())
    }

    /// Accept a friend request from (or send one to) `user_id`
    pub async fn befriend(&self, user_id: &str) -> Result<(), BotError> {
        let result = self.call("addFriend", self.transport.add_friend(user_id)).await?;
        if !result.is_ok() {
            return Err(BotError::Rejected(result));
        }
        tracing::info!("Befriended {}", user_id);
        Ok(())
    }

    pub async fn leave(&self, chat_id: &str) -> Result<(), BotError> {
        self.call("leaveChat", self.transport.leave_chat(chat_id)).await
    }

    pub async fn unfriend(&self, user_id: &str) -> Result<(), BotError> {
        self.call("removeFriend", self.transport.remove_friend(user_id)).await
    }

    /// Hand one inbound event to its triggers
    pub async fn handle_event(&self, event: Event) {
        tracing::debug!("Event: {}", event.kind());
        self.router.route(self, &event).await;
    }

    /// Process events one at a time until the bot stops or the channel closes
    pub async fn run(&self, mut events: mpsc::Receiver<Event>) {
        while let Some(event) = events.recv().await {
            self.handle_event(event).await;
            if matches!(self.state(), BotState::Stopped | BotState::Failed) {
                break;
            }
        }
        tracing::info!("Event loop finished ({})", self.state());
    }

    fn timeout(&self) -> Duration {
        self.config.read().unwrap_or_else(PoisonError::into_inner).timeout()
    }

    async fn call<T, F>(&self, operation: &'static str, fut: F) -> Result<T, BotError>
    where
        F: Future<Output = Result<T, BotError>>,
    {
        let after = self.timeout();
        tokio::time::timeout(after, fut)
            .await
            .map_err(|_| BotError::Timeout { operation, after })?
    }

    fn advance(&self, from: BotState, to: BotState) -> Result<(), BotError> {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        if *state != from {
            return Err(BotError::InvalidState {
                expected: from,
                found: *state,
            });
        }
        tracing::info!("Bot {} -> {}", *state, to);
        *state = to;
        Ok(())
    }

    fn set_state(&self, to: BotState) {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        tracing::info!("Bot {} -> {}", *state, to);
        *state = to;
    }

    fn fail(&self, stage: BotState, source: BotError) -> BotError {
        tracing::error!("Bot failed while {}: {}", stage, source);
        self.set_state(BotState::Failed);
        BotError::at(stage, source)
    }
}
