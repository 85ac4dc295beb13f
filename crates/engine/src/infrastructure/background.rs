//! Fire-and-forget event publication.
//!
//! Mutations whose callers should not wait on the bus hand their events here.
//! Tasks are tracked so shutdown can wait for in-flight publishes.

use std::sync::Arc;

use roster_domain::{CharacterEvent, CharacterId, OwnerId};
use tokio_util::task::TaskTracker;

use crate::infrastructure::ports::EventPublisherPort;

#[derive(Clone)]
pub struct BackgroundPublisher {
    publisher: Arc<dyn EventPublisherPort>,
    tracker: TaskTracker,
}

impl BackgroundPublisher {
    pub fn new(publisher: Arc<dyn EventPublisherPort>) -> Self {
        Self {
            publisher,
            tracker: TaskTracker::new(),
        }
    }

    /// Publish without blocking the caller. Failures are logged; the publisher
    /// has already retried and dead-lettered by the time one surfaces here.
    pub fn spawn(&self, character_id: CharacterId, owner_id: OwnerId, event: CharacterEvent) {
        let publisher = Arc::clone(&self.publisher);
        let subject = event.subject();
        self.tracker.spawn(async move {
            if let Err(e) = publisher.publish(character_id, owner_id, event).await {
                tracing::warn!(
                    %character_id,
                    subject,
                    error = %e,
                    "Background event publish failed"
                );
            }
        });
    }

    pub fn in_flight(&self) -> usize {
        self.tracker.len()
    }

    /// Wait for every publish spawned so far. Called once during shutdown.
    pub async fn drain(&self) {
        self.tracker.close();
        let pending = self.tracker.len();
        if pending > 0 {
            tracing::info!(pending, "Waiting for background event publishes");
        }
        self.tracker.wait().await;
    }
}
