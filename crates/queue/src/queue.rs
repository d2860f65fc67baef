//! Task queue contract.

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::Result;

/// A message delivered from the queue.
///
/// `receive_count` includes the current delivery; a message seen for
/// the first time carries a count of 1.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueueMessage {
    pub id: Uuid,
    pub body: String,
    pub receive_count: u32,
}

/// Message-passing boundary between producers and consumers.
///
/// Delivered messages stay in flight until acked or nacked. A nacked
/// message is redelivered until its receive budget is exhausted, after
/// which the implementation routes it to a dead-letter channel.
#[async_trait]
pub trait TaskQueue: Send + Sync {
    /// Enqueues a task body, returning the assigned message id.
    async fn send(&self, body: String) -> Result<Uuid>;

    /// Dequeues up to `max` messages, marking them in flight.
    async fn receive(&self, max: usize) -> Result<Vec<QueueMessage>>;

    /// Confirms successful processing of an in-flight message.
    async fn ack(&self, id: Uuid) -> Result<()>;

    /// Returns an in-flight message for redelivery or dead-lettering.
    async fn nack(&self, id: Uuid) -> Result<()>;
}
