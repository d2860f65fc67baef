//! Asynchronous task processing boundary.
//!
//! A producer enqueues task messages; a consumer dequeues batches and
//! processes each message independently. A failed message is redelivered
//! up to a bounded receive count, then routed to a dead-letter channel.

pub mod consumer;
pub mod error;
pub mod memory;
pub mod queue;

pub use consumer::{QueueConsumer, TaskHandler};
pub use error::QueueError;
pub use memory::InMemoryTaskQueue;
pub use queue::{QueueMessage, TaskQueue};
