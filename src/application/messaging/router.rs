//! Trigger router - Fans inbound network events out to their triggers

use std::sync::Arc;

use crate::application::services::SteamBot;
use crate::domain::entities::Event;
use crate::plugins::PluginRegistry;

pub struct TriggerRouter {
    registry: Arc<PluginRegistry>,
}

impl TriggerRouter {
    pub fn new(registry: Arc<PluginRegistry>) -> Self {
        Self { registry }
    }

    /// Run every trigger registered for the event, in registration order.
    /// A failing trigger is logged and does not stop the ones after it.
    /// Returns how many triggers failed.
    pub async fn route(&self, bot: &SteamBot, event: &Event) -> usize {
        let kind = event.kind();
        let mut failed = 0;

        for trigger in self.registry.triggers(kind) {
            if let Err(e) = trigger.handler.handle(bot, event).await {
                failed += 1;
                tracing::warn!("Trigger {} failed on {}: {}", trigger.name, kind, e);
            }
        }
        failed
    }
}
