//! Console adapter for development/testing

use async_trait::async_trait;
use std::sync::{Mutex, PoisonError};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::application::errors::BotError;
use crate::domain::entities::{EResult, Event};
use crate::domain::traits::Transport;

/// Console transport: stdin lines arrive as chat messages from one local
/// identity, replies are printed to stdout
pub struct ConsoleTransport {
    identity: String,
    events: mpsc::Sender<Event>,
    reader: Mutex<Option<JoinHandle<()>>>,
}

impl ConsoleTransport {
    pub fn new(events: mpsc::Sender<Event>) -> Self {
        Self {
            identity: "console".to_string(),
            events,
            reader: Mutex::new(None),
        }
    }

    /// Identity token used as both sender and chat for typed lines
    pub fn with_identity(mut self, identity: impl Into<String>) -> Self {
        self.identity = identity.into();
        self
    }

    async fn emit(&self, event: Event) -> Result<(), BotError> {
        self.events
            .send(event)
            .await
            .map_err(|_| BotError::Network("event channel closed".to_string()))
    }
}

#[async_trait]
impl Transport for ConsoleTransport {
    async fn connect(&self) -> Result<(), BotError> {
        let events = self.events.clone();
        let identity = self.identity.clone();

        let reader = tokio::spawn(async move {
            let mut lines = BufReader::new(tokio::io::stdin()).lines();
            loop {
                match lines.next_line().await {
                    Ok(Some(line)) if line.trim().is_empty() => continue,
                    Ok(Some(line)) => {
                        let event = Event::message(identity.as_str(), line, identity.as_str());
                        if events.send(event).await.is_err() {
                            break;
                        }
                    }
                    Ok(None) => {
                        tracing::info!("Console input closed");
                        break;
                    }
                    Err(e) => {
                        tracing::warn!("Failed to read console input: {}", e);
                        break;
                    }
                }
            }
        });

        *self.reader.lock().unwrap_or_else(PoisonError::into_inner) = Some(reader);
        tracing::info!("Console transport connected as {}", self.identity);
        Ok(())
    }

    async fn log_on(&self, _credentials: &serde_json::Value) -> Result<EResult, BotError> {
        self.emit(Event::LoggedOn { result: EResult::OK }).await?;
        Ok(EResult::OK)
    }

    async fn log_off(&self) -> Result<EResult, BotError> {
        if let Some(reader) = self.reader.lock().unwrap_or_else(PoisonError::into_inner).take() {
            reader.abort();
        }
        Ok(EResult::OK)
    }

    async fn join_chat(&self, chat_id: &str) -> Result<EResult, BotError> {
        println!("[BOT] joined {}", chat_id);
        Ok(EResult::OK)
    }

    async fn leave_chat(&self, chat_id: &str) -> Result<(), BotError> {
        println!("[BOT] left {}", chat_id);
        Ok(())
    }

    async fn add_friend(&self, user_id: &str) -> Result<EResult, BotError> {
        println!("[BOT] befriended {}", user_id);
        Ok(EResult::OK)
    }

    async fn remove_friend(&self, user_id: &str) -> Result<(), BotError> {
        println!("[BOT] unfriended {}", user_id);
        Ok(())
    }

    async fn chat_message(&self, target_id: &str, text: &str) -> Result<(), BotError> {
        if target_id == self.identity {
            println!("[BOT] {}", text);
        } else {
            println!("[BOT -> {}] {}", target_id, text);
        }
        Ok(())
    }

    fn name(&self) -> &str {
        "console"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_log_on_emits_logged_on() {
        let (tx, mut rx) = mpsc::channel(4);
        let transport = ConsoleTransport::new(tx);

        assert_eq!(transport.log_on(&serde_json::Value::Null).await.unwrap(), EResult::OK);
        assert_eq!(rx.recv().await, Some(Event::LoggedOn { result: EResult::OK }));
    }

    #[tokio::test]
    async fn test_closed_channel_is_network_error() {
        let (tx, rx) = mpsc::channel(1);
        drop(rx);
        let transport = ConsoleTransport::new(tx).with_identity("me");

        assert!(matches!(
            transport.log_on(&serde_json::Value::Null).await,
            Err(BotError::Network(_))
        ));
    }
}
