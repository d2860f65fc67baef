//! Batch consumer loop.

use async_trait::async_trait;

use crate::error::Result;
use crate::queue::{QueueMessage, TaskQueue};

/// Processes a single dequeued message.
#[async_trait]
pub trait TaskHandler: Send + Sync {
    async fn handle(&self, message: &QueueMessage) -> Result<()>;
}

/// Drains a queue in batches, dispatching each message to a handler.
///
/// Messages are processed independently: a handler failure nacks only
/// the failed message and never aborts the rest of the batch.
pub struct QueueConsumer<Q, H>
where
    Q: TaskQueue,
    H: TaskHandler,
{
    queue: Q,
    handler: H,
    batch_size: usize,
}

impl<Q, H> QueueConsumer<Q, H>
where
    Q: TaskQueue,
    H: TaskHandler,
{
    /// Creates a consumer pulling batches of `batch_size` messages.
    pub fn new(queue: Q, handler: H, batch_size: usize) -> Self {
        Self {
            queue,
            handler,
            batch_size,
        }
    }

    async fn process_batch(&self, batch: Vec<QueueMessage>) -> Result<usize> {
        let mut processed = 0;

        for message in batch {
            match self.handler.handle(&message).await {
                Ok(()) => {
                    self.queue.ack(message.id).await?;
                    processed += 1;
                }
                Err(e) => {
                    tracing::warn!(
                        message_id = %message.id,
                        receive_count = message.receive_count,
                        error = %e,
                        "task failed, returning message to queue"
                    );
                    self.queue.nack(message.id).await?;
                }
            }
        }

        Ok(processed)
    }

    /// Receives and processes one batch.
    ///
    /// Returns the number of successfully processed messages.
    #[tracing::instrument(skip(self))]
    pub async fn run_once(&self) -> Result<usize> {
        let batch = self.queue.receive(self.batch_size).await?;
        self.process_batch(batch).await
    }

    /// Runs batches until a receive comes back empty.
    ///
    /// Persistently failing messages are re-received until their budget
    /// is exhausted and they are dead-lettered, so this terminates on
    /// poisoned queues too.
    pub async fn drain(&self) -> Result<usize> {
        let mut total = 0;
        loop {
            let batch = self.queue.receive(self.batch_size).await?;
            if batch.is_empty() {
                return Ok(total);
            }
            total += self.process_batch(batch).await?;
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;
    use crate::error::QueueError;
    use crate::memory::InMemoryTaskQueue;

    /// Handler that fails for bodies containing "poison".
    #[derive(Clone, Default)]
    struct SelectiveHandler {
        handled: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl TaskHandler for SelectiveHandler {
        async fn handle(&self, message: &QueueMessage) -> Result<()> {
            if message.body.contains("poison") {
                return Err(QueueError::Handler("cannot process".to_string()));
            }
            self.handled.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    #[tokio::test]
    async fn run_once_acks_successful_messages() {
        let queue = InMemoryTaskQueue::new(3);
        queue.send("a".to_string()).await.unwrap();
        queue.send("b".to_string()).await.unwrap();

        let handler = SelectiveHandler::default();
        let consumer = QueueConsumer::new(queue.clone(), handler.clone(), 10);

        let processed = consumer.run_once().await.unwrap();
        assert_eq!(processed, 2);
        assert_eq!(handler.handled.load(Ordering::SeqCst), 2);
        assert_eq!(queue.pending_count().await, 0);
        assert_eq!(queue.in_flight_count().await, 0);
    }

    #[tokio::test]
    async fn failed_message_does_not_abort_batch() {
        let queue = InMemoryTaskQueue::new(3);
        queue.send("a".to_string()).await.unwrap();
        queue.send("poison".to_string()).await.unwrap();
        queue.send("b".to_string()).await.unwrap();

        let handler = SelectiveHandler::default();
        let consumer = QueueConsumer::new(queue.clone(), handler.clone(), 10);

        let processed = consumer.run_once().await.unwrap();
        assert_eq!(processed, 2);
        // The poisoned message went back to the queue.
        assert_eq!(queue.pending_count().await, 1);
    }

    #[tokio::test]
    async fn drain_dead_letters_poisoned_messages_and_terminates() {
        let queue = InMemoryTaskQueue::new(2);
        queue.send("a".to_string()).await.unwrap();
        queue.send("poison".to_string()).await.unwrap();

        let handler = SelectiveHandler::default();
        let consumer = QueueConsumer::new(queue.clone(), handler.clone(), 10);

        let processed = consumer.drain().await.unwrap();
        assert_eq!(processed, 1);
        assert_eq!(queue.pending_count().await, 0);

        let dead = queue.dead_letters().await;
        assert_eq!(dead.len(), 1);
        assert_eq!(dead[0].body, "poison");
        assert_eq!(dead[0].receive_count, 2);
    }

    #[tokio::test]
    async fn run_once_on_empty_queue_is_a_no_op() {
        let queue = InMemoryTaskQueue::new(3);
        let handler = SelectiveHandler::default();
        let consumer = QueueConsumer::new(queue, handler, 10);

        assert_eq!(consumer.run_once().await.unwrap(), 0);
    }
}
