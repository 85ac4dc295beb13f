//! In-process message bus.
//!
//! Keeps every published message in memory, grouped by subject, and a registry
//! of declared streams. Messages on subjects no stream captures are rejected,
//! the same as a JetStream publish with no matching stream.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::infrastructure::ports::{BusError, MessageBusPort, StreamConfig};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishedMessage {
    pub subject: String,
    pub payload: Vec<u8>,
}

#[derive(Default)]
pub struct InMemoryMessageBus {
    streams: RwLock<HashMap<String, StreamConfig>>,
    messages: RwLock<Vec<PublishedMessage>>,
}

impl InMemoryMessageBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn stream(&self, name: &str) -> Option<StreamConfig> {
        self.streams.read().await.get(name).cloned()
    }

    pub async fn messages(&self) -> Vec<PublishedMessage> {
        self.messages.read().await.clone()
    }

    pub async fn messages_on(&self, subject: &str) -> Vec<PublishedMessage> {
        self.messages
            .read()
            .await
            .iter()
            .filter(|message| message.subject == subject)
            .cloned()
            .collect()
    }
}

#[async_trait]
impl MessageBusPort for InMemoryMessageBus {
    async fn publish(&self, subject: &str, payload: Vec<u8>) -> Result<(), BusError> {
        let captured = self
            .streams
            .read()
            .await
            .values()
            .any(|stream| stream.captures(subject));
        if !captured {
            return Err(BusError::Publish {
                subject: subject.to_string(),
                message: "no stream captures this subject".to_string(),
            });
        }

        self.messages.write().await.push(PublishedMessage {
            subject: subject.to_string(),
            payload,
        });
        tracing::trace!(subject, "Message published");
        Ok(())
    }

    async fn ensure_stream(&self, config: &StreamConfig) -> Result<(), BusError> {
        let mut streams = self.streams.write().await;
        match streams.get(&config.name) {
            Some(existing) if existing == config => {
                tracing::debug!(stream = %config.name, "Stream already exists");
            }
            Some(_) => {
                tracing::info!(stream = %config.name, "Updating stream limits");
                streams.insert(config.name.clone(), config.clone());
            }
            None => {
                tracing::info!(
                    stream = %config.name,
                    subjects = ?config.subjects,
                    "Created stream"
                );
                streams.insert(config.name.clone(), config.clone());
            }
        }
        Ok(())
    }
}
