//! Publishes domain events to NATS when a connection is configured.

use crate::domain::events::DomainEvent;

pub const SUBJECT_PREFIX: &str = "pharmacy";

#[derive(Clone, Default)]
pub struct EventPublisher {
    nats: Option<async_nats::Client>,
}

impl EventPublisher {
    pub fn disabled() -> Self { Self { nats: None } }

    pub async fn connect(url: Option<&str>) -> Self {
        let Some(url) = url else { return Self::disabled() };
        match async_nats::connect(url).await {
            Ok(client) => {
                tracing::info!(%url, "connected to NATS");
                Self { nats: Some(client) }
            }
            Err(e) => {
                tracing::warn!(%url, error = %e, "NATS unavailable, events will only be logged");
                Self::disabled()
            }
        }
    }

    /// Best effort: failures are logged, never returned.
    pub async fn publish(&self, event: DomainEvent) {
        let subject = format!("{SUBJECT_PREFIX}.{}", event.subject());
        tracing::debug!(%subject, ?event, "domain event");
        let Some(client) = &self.nats else { return };
        match serde_json::to_vec(&event) {
            Ok(payload) => {
                if let Err(e) = client.publish(subject.clone(), payload.into()).await {
                    tracing::warn!(%subject, error = %e, "failed to publish event");
                }
            }
            Err(e) => tracing::warn!(%subject, error = %e, "failed to encode event"),
        }
    }
}
