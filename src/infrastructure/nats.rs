//! NATS event bus: host events in, email notifications out.

use async_trait::async_trait;
use futures::StreamExt;
use std::sync::Arc;

use crate::domain::events::{DomainEvent, SUBJECTS};
use crate::domain::ports::{Notification, Notifier};
use crate::subscribers::Subscribers;
use crate::{CommerceError, Result};

pub const NOTIFICATION_SUBJECT: &str = "notification.email";

/// Hands notifications to the host's notification module over NATS.
#[derive(Clone)]
pub struct NatsNotifier {
    client: async_nats::Client,
}

impl NatsNotifier {
    pub fn new(client: async_nats::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Notifier for NatsNotifier {
    async fn create_notification(&self, notification: Notification) -> Result<()> {
        let payload = serde_json::to_vec(&notification).map_err(|e| CommerceError::EventBus(e.to_string()))?;
        self.client
            .publish(NOTIFICATION_SUBJECT.to_string(), payload.into())
            .await
            .map_err(|e| CommerceError::EventBus(e.to_string()))?;
        Ok(())
    }
}

/// Subscribes to every host subject and feeds decoded events to `subscribers`.
///
/// One task per subject; messages on a subject are handled in arrival order.
pub async fn spawn_event_listeners(client: async_nats::Client, subscribers: Arc<Subscribers>) -> Result<()> {
    for subject in SUBJECTS {
        let mut sub = client
            .subscribe(subject.to_string())
            .await
            .map_err(|e| CommerceError::EventBus(e.to_string()))?;
        let subscribers = subscribers.clone();
        tokio::spawn(async move {
            while let Some(message) = sub.next().await {
                match DomainEvent::decode(subject, &message.payload) {
                    Ok(event) => {
                        if let Err(e) = subscribers.dispatch(event).await {
                            tracing::error!(subject, error = %e, "event handler failed");
                        }
                    }
                    Err(e) => tracing::warn!(subject, error = %e, "dropping undecodable event"),
                }
            }
            tracing::warn!(subject, "event subscription closed");
        });
        tracing::info!(subject, "subscribed");
    }
    Ok(())
}
