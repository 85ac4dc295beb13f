//! Event publisher with linear-backoff retry and a dead-letter fallback.
//!
//! Every logical event gets one `EventId` and one timestamp. Retries resend
//! the same bytes; when all attempts fail, the envelope is wrapped in a
//! [`DeadLetter`] and sent once to `character.dlq.<subject>`.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use futures_util::future::join_all;
use roster_domain::events::dead_letter_subject;
use roster_domain::{CharacterEvent, CharacterId, DeadLetter, EventEnvelope, EventId, OwnerId};

use crate::infrastructure::ports::{
    BusError, ClockPort, EventPublisherPort, MessageBusPort, PublishError, StreamConfig,
};

/// Configuration for retry behavior
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PublishConfig {
    /// Total delivery attempts, including the first (minimum 1)
    pub max_attempts: u32,
    /// Sleep after failed attempt `n` is `n * backoff_unit`
    pub backoff_unit: Duration,
}

impl Default for PublishConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            backoff_unit: Duration::from_millis(100),
        }
    }
}

pub struct RetryingEventPublisher {
    bus: Arc<dyn MessageBusPort>,
    clock: Arc<dyn ClockPort>,
    config: PublishConfig,
}

impl RetryingEventPublisher {
    pub fn new(bus: Arc<dyn MessageBusPort>, clock: Arc<dyn ClockPort>, config: PublishConfig) -> Self {
        Self { bus, clock, config }
    }

    /// Declare the event and dead-letter streams. Called once at startup.
    pub async fn ensure_streams(&self) -> Result<(), BusError> {
        for stream in [
            StreamConfig::character_events(),
            StreamConfig::character_dead_letters(),
        ] {
            self.bus.ensure_stream(&stream).await?;
        }
        Ok(())
    }

    /// Publish several events concurrently. Failures are logged per event and
    /// the successfully delivered ids are returned.
    pub async fn publish_batch(
        &self,
        events: Vec<(CharacterId, OwnerId, CharacterEvent)>,
    ) -> Vec<EventId> {
        let total = events.len();
        let results = join_all(
            events
                .into_iter()
                .map(|(character_id, owner_id, event)| self.publish(character_id, owner_id, event)),
        )
        .await;

        let delivered: Vec<EventId> = results
            .into_iter()
            .filter_map(|result| match result {
                Ok(event_id) => Some(event_id),
                Err(e) => {
                    tracing::warn!(error = %e, "Batch event failed to publish");
                    None
                }
            })
            .collect();

        if delivered.len() < total {
            tracing::warn!(
                delivered = delivered.len(),
                total,
                "Event batch partially published"
            );
        }
        delivered
    }

    async fn deliver_with_retry(&self, subject: &'static str, payload: &[u8]) -> Result<(), (u32, BusError)> {
        let max_attempts = self.config.max_attempts.max(1);
        let mut attempt = 1;
        loop {
            match self.bus.publish(subject, payload.to_vec()).await {
                Ok(()) => {
                    if attempt > 1 {
                        tracing::info!(attempt, subject, "Event published after retry");
                    }
                    return Ok(());
                }
                Err(e) if attempt < max_attempts => {
                    let delay = self.config.backoff_unit * attempt;
                    tracing::warn!(
                        attempt,
                        max_attempts,
                        delay_ms = delay.as_millis() as u64,
                        error = %e,
                        subject,
                        "Event publish failed, retrying..."
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(e) => return Err((attempt, e)),
            }
        }
    }

    async fn dead_letter(&self, envelope: EventEnvelope, attempts: u32, last_error: &BusError) -> bool {
        let subject = envelope.subject();
        let dlq_subject = dead_letter_subject(subject);
        let event_id = envelope.event_id;
        let record = DeadLetter {
            original_subject: subject.to_string(),
            original_event: envelope,
            last_error: last_error.to_string(),
            attempt_count: attempts,
            timestamp: self.clock.now(),
        };

        let payload = match serde_json::to_vec(&record) {
            Ok(payload) => payload,
            Err(e) => {
                tracing::error!(%event_id, error = %e, "Failed to encode dead letter");
                return false;
            }
        };

        match self.bus.publish(&dlq_subject, payload).await {
            Ok(()) => {
                tracing::warn!(
                    %event_id,
                    subject = %dlq_subject,
                    attempts,
                    "Event moved to dead letter queue"
                );
                true
            }
            Err(e) => {
                tracing::error!(
                    %event_id,
                    subject = %dlq_subject,
                    error = %e,
                    "Dead letter publish failed, event dropped"
                );
                false
            }
        }
    }
}

#[async_trait]
impl EventPublisherPort for RetryingEventPublisher {
    async fn publish(
        &self,
        character_id: CharacterId,
        owner_id: OwnerId,
        event: CharacterEvent,
    ) -> Result<EventId, PublishError> {
        let envelope =
            EventEnvelope::new(EventId::new(), character_id, owner_id, event, self.clock.now());
        let subject = envelope.subject();
        let event_id = envelope.event_id;

        let payload = serde_json::to_vec(&envelope).map_err(|e| PublishError::Encode {
            subject,
            message: e.to_string(),
        })?;

        match self.deliver_with_retry(subject, &payload).await {
            Ok(()) => {
                tracing::debug!(%event_id, %character_id, subject, "Event published");
                Ok(event_id)
            }
            Err((attempts, last_error)) => {
                tracing::error!(
                    %event_id,
                    %character_id,
                    subject,
                    attempts,
                    error = %last_error,
                    "Event publish failed after all retry attempts"
                );
                let dead_lettered = self.dead_letter(envelope, attempts, &last_error).await;
                Err(PublishError::Exhausted {
                    subject,
                    attempts,
                    last_error,
                    dead_lettered,
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::clock::FixedClock;
    use crate::infrastructure::message_bus::InMemoryMessageBus;
    use crate::infrastructure::ports::MockMessageBusPort;
    use chrono::Utc;
    use roster_domain::events::{SUBJECT_RESTORED, SUBJECT_SELECTED};
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Mutex;

    /// Bus that fails the main subject a configurable number of times and
    /// records every subject it was asked to publish on.
    struct FailingBus {
        failures_remaining: AtomicU32,
        fail_dead_letters: bool,
        attempts: Mutex<Vec<(String, Vec<u8>)>>,
    }

    impl FailingBus {
        fn new(failure_count: u32) -> Self {
            Self {
                failures_remaining: AtomicU32::new(failure_count),
                fail_dead_letters: false,
                attempts: Mutex::new(Vec::new()),
            }
        }

        fn subjects(&self) -> Vec<String> {
            self.attempts
                .lock()
                .unwrap()
                .iter()
                .map(|(subject, _)| subject.clone())
                .collect()
        }

        fn payloads(&self) -> Vec<Vec<u8>> {
            self.attempts
                .lock()
                .unwrap()
                .iter()
                .map(|(_, payload)| payload.clone())
                .collect()
        }
    }

    #[async_trait]
    impl MessageBusPort for FailingBus {
        async fn publish(&self, subject: &str, payload: Vec<u8>) -> Result<(), BusError> {
            self.attempts
                .lock()
                .unwrap()
                .push((subject.to_string(), payload));
            let is_dead_letter = subject.starts_with("character.dlq.");
            let fail = if is_dead_letter {
                self.fail_dead_letters
            } else {
                self.failures_remaining
                    .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
                    .is_ok()
            };
            if fail {
                Err(BusError::Publish {
                    subject: subject.to_string(),
                    message: "no responders".to_string(),
                })
            } else {
                Ok(())
            }
        }

        async fn ensure_stream(&self, _config: &StreamConfig) -> Result<(), BusError> {
            Ok(())
        }
    }

    fn publisher(bus: Arc<dyn MessageBusPort>) -> RetryingEventPublisher {
        RetryingEventPublisher::new(bus, Arc::new(FixedClock(Utc::now())), PublishConfig::default())
    }

    fn restored() -> CharacterEvent {
        CharacterEvent::Restored {
            name: "Thane".to_string(),
            restore_reason: None,
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_succeeds_without_retry() {
        let bus = Arc::new(FailingBus::new(0));
        let result = publisher(bus.clone())
            .publish(CharacterId::new(), OwnerId::new(), restored())
            .await;

        assert!(result.is_ok());
        assert_eq!(bus.subjects(), vec![SUBJECT_RESTORED.to_string()]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_succeeds_after_retry_with_linear_backoff() {
        let bus = Arc::new(FailingBus::new(2));
        let started = tokio::time::Instant::now();
        let result = publisher(bus.clone())
            .publish(CharacterId::new(), OwnerId::new(), restored())
            .await;

        assert!(result.is_ok());
        assert_eq!(bus.subjects().len(), 3);
        // 100ms after the first failure, 200ms after the second
        assert_eq!(started.elapsed(), Duration::from_millis(300));
    }

    #[tokio::test(start_paused = true)]
    async fn retries_reuse_the_same_event_bytes() {
        let bus = Arc::new(FailingBus::new(2));
        let event_id = publisher(bus.clone())
            .publish(CharacterId::new(), OwnerId::new(), restored())
            .await
            .unwrap();

        let payloads = bus.payloads();
        assert!(payloads.windows(2).all(|pair| pair[0] == pair[1]));
        let envelope: EventEnvelope = serde_json::from_slice(&payloads[0]).unwrap();
        assert_eq!(envelope.event_id, event_id);
    }

    #[tokio::test(start_paused = true)]
    async fn test_fails_after_max_attempts_and_dead_letters() {
        let bus = Arc::new(FailingBus::new(u32::MAX));
        let character_id = CharacterId::new();
        let err = publisher(bus.clone())
            .publish(character_id, OwnerId::new(), restored())
            .await
            .unwrap_err();

        match err {
            PublishError::Exhausted {
                attempts,
                dead_lettered,
                ..
            } => {
                assert_eq!(attempts, 3);
                assert!(dead_lettered);
            }
            other => panic!("unexpected error {other:?}"),
        }

        let subjects = bus.subjects();
        assert_eq!(subjects.len(), 4);
        assert_eq!(subjects[3], "character.dlq.character.restored");

        let dead_letter: DeadLetter =
            serde_json::from_slice(bus.payloads().last().unwrap()).unwrap();
        let first: EventEnvelope = serde_json::from_slice(&bus.payloads()[0]).unwrap();
        assert_eq!(dead_letter.original_subject, SUBJECT_RESTORED);
        assert_eq!(dead_letter.attempt_count, 3);
        assert!(dead_letter.last_error.contains("no responders"));
        assert_eq!(dead_letter.original_event.event_id, first.event_id);
        assert_eq!(dead_letter.original_event.character_id, character_id);
    }

    #[tokio::test(start_paused = true)]
    async fn dead_letter_failure_is_reported_not_retried() {
        let bus = Arc::new(FailingBus {
            fail_dead_letters: true,
            ..FailingBus::new(u32::MAX)
        });
        let err = publisher(bus.clone())
            .publish(CharacterId::new(), OwnerId::new(), restored())
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            PublishError::Exhausted {
                dead_lettered: false,
                ..
            }
        ));
        assert_eq!(bus.subjects().len(), 4);
    }

    #[tokio::test(start_paused = true)]
    async fn single_attempt_config_skips_backoff() {
        let mut bus = MockMessageBusPort::new();
        bus.expect_publish()
            .withf(|subject, _| subject == SUBJECT_SELECTED)
            .times(1)
            .returning(|subject, _| {
                Err(BusError::Publish {
                    subject: subject.to_string(),
                    message: "down".to_string(),
                })
            });
        bus.expect_publish()
            .withf(|subject, _| subject.starts_with("character.dlq."))
            .times(1)
            .returning(|_, _| Ok(()));

        let publisher = RetryingEventPublisher::new(
            Arc::new(bus),
            Arc::new(FixedClock(Utc::now())),
            PublishConfig {
                max_attempts: 1,
                backoff_unit: Duration::from_secs(10),
            },
        );
        let started = tokio::time::Instant::now();
        let result = publisher
            .publish(
                CharacterId::new(),
                OwnerId::new(),
                CharacterEvent::Selected {
                    name: "Thane".to_string(),
                    session_id: None,
                },
            )
            .await;

        assert!(result.is_err());
        assert_eq!(started.elapsed(), Duration::ZERO);
    }

    #[tokio::test]
    async fn ensure_streams_declares_both_streams() {
        let bus = Arc::new(InMemoryMessageBus::new());
        let publisher = publisher(bus.clone());
        publisher.ensure_streams().await.unwrap();

        assert!(bus.stream("CHARACTER_EVENTS").await.is_some());
        assert!(bus.stream("CHARACTER_EVENTS_DLQ").await.is_some());
    }

    #[tokio::test]
    async fn publish_batch_returns_delivered_ids() {
        let bus = Arc::new(InMemoryMessageBus::new());
        let publisher = publisher(bus.clone());
        publisher.ensure_streams().await.unwrap();

        let owner = OwnerId::new();
        let ids = publisher
            .publish_batch(vec![
                (CharacterId::new(), owner, restored()),
                (CharacterId::new(), owner, restored()),
            ])
            .await;

        assert_eq!(ids.len(), 2);
        assert_eq!(bus.messages_on(SUBJECT_RESTORED).await.len(), 2);
    }
}
