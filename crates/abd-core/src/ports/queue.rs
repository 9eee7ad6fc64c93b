use std::time::Duration;

use async_trait::async_trait;

use abd_model::LeaseReceipt;

use crate::error::CoreError;

/// One leased delivery of a queue message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueueMessage {
    /// Raw message body as enqueued.
    pub body: String,
    /// Receipt for this delivery; required to delete the message.
    pub receipt: LeaseReceipt,
    /// Number of deliveries so far, this one included.
    pub receive_count: u32,
}

/// Durable queue with lease (visibility timeout) semantics.
///
/// Guarantees expected from implementations:
/// - `enqueue` stores the body durably, delivered at least once;
/// - `lease` returns at most one message and hides it from other consumers
///   until the timeout expires or it is deleted;
/// - `delete` removes the message permanently and fails for an expired or
///   superseded receipt.
#[async_trait]
pub trait BuildQueue: Send + Sync {
    /// Queue name used in logs and diagnostics.
    fn name(&self) -> &str;

    async fn enqueue(&self, body: &str) -> Result<(), CoreError>;

    async fn lease(&self, visibility_timeout: Duration) -> Result<Option<QueueMessage>, CoreError>;

    async fn delete(&self, receipt: &LeaseReceipt) -> Result<(), CoreError>;
}
