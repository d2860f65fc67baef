//! In-memory task queue for testing and local development.

use std::collections::{HashMap, VecDeque};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::{QueueError, Result};
use crate::queue::{QueueMessage, TaskQueue};

#[derive(Debug, Default)]
struct QueueState {
    pending: VecDeque<QueueMessage>,
    in_flight: HashMap<Uuid, QueueMessage>,
    dead_letter: Vec<QueueMessage>,
}

/// In-memory queue with bounded redelivery.
///
/// A nacked message goes back to the pending queue until it has been
/// received `max_receive_count` times, then moves to the dead-letter
/// channel.
#[derive(Debug, Clone)]
pub struct InMemoryTaskQueue {
    max_receive_count: u32,
    state: Arc<RwLock<QueueState>>,
}

impl InMemoryTaskQueue {
    /// Creates a queue with the given per-message receive budget.
    pub fn new(max_receive_count: u32) -> Self {
        Self {
            max_receive_count,
            state: Arc::new(RwLock::new(QueueState::default())),
        }
    }

    /// Returns the number of messages waiting for delivery.
    pub async fn pending_count(&self) -> usize {
        self.state.read().await.pending.len()
    }

    /// Returns the number of messages currently in flight.
    pub async fn in_flight_count(&self) -> usize {
        self.state.read().await.in_flight.len()
    }

    /// Returns the dead-lettered messages.
    pub async fn dead_letters(&self) -> Vec<QueueMessage> {
        self.state.read().await.dead_letter.clone()
    }
}

impl Default for InMemoryTaskQueue {
    fn default() -> Self {
        Self::new(3)
    }
}

#[async_trait]
impl TaskQueue for InMemoryTaskQueue {
    async fn send(&self, body: String) -> Result<Uuid> {
        let id = Uuid::new_v4();
        let message = QueueMessage {
            id,
            body,
            receive_count: 0,
        };

        self.state.write().await.pending.push_back(message);
        Ok(id)
    }

    async fn receive(&self, max: usize) -> Result<Vec<QueueMessage>> {
        let mut state = self.state.write().await;
        let mut batch = Vec::new();

        while batch.len() < max {
            let Some(mut message) = state.pending.pop_front() else {
                break;
            };
            message.receive_count += 1;
            state.in_flight.insert(message.id, message.clone());
            batch.push(message);
        }

        Ok(batch)
    }

    async fn ack(&self, id: Uuid) -> Result<()> {
        let mut state = self.state.write().await;
        state
            .in_flight
            .remove(&id)
            .map(|_| ())
            .ok_or(QueueError::NotInFlight(id))
    }

    async fn nack(&self, id: Uuid) -> Result<()> {
        let mut state = self.state.write().await;
        let message = state
            .in_flight
            .remove(&id)
            .ok_or(QueueError::NotInFlight(id))?;

        if message.receive_count >= self.max_receive_count {
            tracing::warn!(
                message_id = %id,
                receive_count = message.receive_count,
                "receive budget exhausted, dead-lettering message"
            );
            state.dead_letter.push(message);
        } else {
            state.pending.push_back(message);
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn send_then_receive_delivers_in_order() {
        let queue = InMemoryTaskQueue::new(3);
        queue.send("first".to_string()).await.unwrap();
        queue.send("second".to_string()).await.unwrap();

        let batch = queue.receive(10).await.unwrap();
        let bodies: Vec<&str> = batch.iter().map(|m| m.body.as_str()).collect();
        assert_eq!(bodies, vec!["first", "second"]);
        assert_eq!(queue.in_flight_count().await, 2);
    }

    #[tokio::test]
    async fn receive_respects_batch_size() {
        let queue = InMemoryTaskQueue::new(3);
        for i in 0..5 {
            queue.send(format!("task-{i}")).await.unwrap();
        }

        let batch = queue.receive(2).await.unwrap();
        assert_eq!(batch.len(), 2);
        assert_eq!(queue.pending_count().await, 3);
    }

    #[tokio::test]
    async fn ack_removes_message_for_good() {
        let queue = InMemoryTaskQueue::new(3);
        let id = queue.send("task".to_string()).await.unwrap();

        queue.receive(1).await.unwrap();
        queue.ack(id).await.unwrap();

        assert_eq!(queue.pending_count().await, 0);
        assert_eq!(queue.in_flight_count().await, 0);
        assert!(queue.dead_letters().await.is_empty());
    }

    #[tokio::test]
    async fn ack_of_unknown_message_fails() {
        let queue = InMemoryTaskQueue::new(3);
        let result = queue.ack(Uuid::new_v4()).await;
        assert!(matches!(result, Err(QueueError::NotInFlight(_))));
    }

    #[tokio::test]
    async fn nack_redelivers_with_incremented_count() {
        let queue = InMemoryTaskQueue::new(3);
        let id = queue.send("task".to_string()).await.unwrap();

        let first = queue.receive(1).await.unwrap();
        assert_eq!(first[0].receive_count, 1);
        queue.nack(id).await.unwrap();

        let second = queue.receive(1).await.unwrap();
        assert_eq!(second[0].receive_count, 2);
    }

    #[tokio::test]
    async fn exhausted_receive_budget_dead_letters() {
        let queue = InMemoryTaskQueue::new(2);
        let id = queue.send("task".to_string()).await.unwrap();

        for _ in 0..2 {
            queue.receive(1).await.unwrap();
            queue.nack(id).await.unwrap();
        }

        assert_eq!(queue.pending_count().await, 0);
        let dead = queue.dead_letters().await;
        assert_eq!(dead.len(), 1);
        assert_eq!(dead[0].id, id);
    }
}
