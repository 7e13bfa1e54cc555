//! Event publishers
//!
//! Delivery guarantees (outbox, retries) belong to the transport behind this
//! trait, not to the service.

use std::sync::{Mutex, MutexGuard};

use crate::events::GameEvent;

/// Sink for events, keyed by topic name
pub trait EventPublisher {
    fn publish(&self, topic: &str, event: &GameEvent);
}

/// Logs every event as JSON through `tracing`
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingPublisher;

impl EventPublisher for TracingPublisher {
    fn publish(&self, topic: &str, event: &GameEvent) {
        match serde_json::to_string(event) {
            Ok(json) => tracing::info!(topic, success = event.success, "{}", json),
            Err(e) => tracing::warn!(topic, "could not serialize event {}: {}", event.id, e),
        }
    }
}

/// Keeps published events in memory
#[derive(Debug, Default)]
pub struct InMemoryPublisher {
    events: Mutex<Vec<(String, GameEvent)>>,
}

impl InMemoryPublisher {
    pub fn new() -> Self {
        Self::default()
    }

    /// All published events with their topic names, oldest first
    pub fn events(&self) -> Vec<(String, GameEvent)> {
        self.lock().clone()
    }

    /// Events published to one topic name
    pub fn on_topic(&self, topic: &str) -> Vec<GameEvent> {
        self.events()
            .into_iter()
            .filter(|(t, _)| t == topic)
            .map(|(_, e)| e)
            .collect()
    }

    pub fn last(&self) -> Option<GameEvent> {
        self.events().pop().map(|(_, e)| e)
    }

    pub fn clear(&self) {
        self.lock().clear();
    }

    fn lock(&self) -> MutexGuard<'_, Vec<(String, GameEvent)>> {
        // Every write is a single push or clear, so a poisoned log is still whole
        self.events.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl EventPublisher for InMemoryPublisher {
    fn publish(&self, topic: &str, event: &GameEvent) {
        self.lock().push((topic.to_string(), event.clone()));
    }
}

impl<P: EventPublisher + ?Sized> EventPublisher for &P {
    fn publish(&self, topic: &str, event: &GameEvent) {
        (**self).publish(topic, event)
    }
}
