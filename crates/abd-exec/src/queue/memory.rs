use std::time::Duration;

use async_trait::async_trait;
use tokio::{sync::Mutex, time::Instant};
use tracing::{debug, trace};
use uuid::Uuid;

use abd_core::{BuildQueue, CoreError, QueueMessage};
use abd_model::LeaseReceipt;

#[derive(Debug)]
struct Stored {
    body: String,
    /// Message is hidden from `lease` until this instant.
    visible_at: Instant,
    receive_count: u32,
    /// Receipt of the most recent delivery.
    receipt: Option<LeaseReceipt>,
}

/// In-process queue with visibility-timeout leases.
///
/// Messages are leased in FIFO order among the visible ones. A leased message is
/// hidden until its timeout expires or it is deleted; every delivery gets a new
/// receipt and only the latest unexpired receipt can delete it.
#[derive(Debug)]
pub struct MemoryQueue {
    name: String,
    messages: Mutex<Vec<Stored>>,
}

impl MemoryQueue {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            messages: Mutex::new(Vec::new()),
        }
    }

    /// Number of stored messages, leased ones included.
    pub async fn len(&self) -> usize {
        self.messages.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.messages.lock().await.is_empty()
    }
}

#[async_trait]
impl BuildQueue for MemoryQueue {
    fn name(&self) -> &str {
        &self.name
    }

    async fn enqueue(&self, body: &str) -> Result<(), CoreError> {
        let mut messages = self.messages.lock().await;
        messages.push(Stored {
            body: body.to_string(),
            visible_at: Instant::now(),
            receive_count: 0,
            receipt: None,
        });
        trace!(queue = %self.name, depth = messages.len(), "message stored");
        Ok(())
    }

    async fn lease(&self, visibility_timeout: Duration) -> Result<Option<QueueMessage>, CoreError> {
        let now = Instant::now();
        let mut messages = self.messages.lock().await;

        let Some(msg) = messages.iter_mut().find(|m| m.visible_at <= now) else {
            return Ok(None);
        };
        let receipt = LeaseReceipt::new(Uuid::new_v4().to_string());
        msg.visible_at = now + visibility_timeout;
        msg.receive_count += 1;
        msg.receipt = Some(receipt.clone());

        debug!(
            queue = %self.name,
            receipt = %receipt,
            receive_count = msg.receive_count,
            "message leased"
        );
        Ok(Some(QueueMessage {
            body: msg.body.clone(),
            receipt,
            receive_count: msg.receive_count,
        }))
    }

    async fn delete(&self, receipt: &LeaseReceipt) -> Result<(), CoreError> {
        let now = Instant::now();
        let mut messages = self.messages.lock().await;

        let pos = messages
            .iter()
            .position(|m| m.receipt.as_ref() == Some(receipt))
            .ok_or_else(|| CoreError::InvalidReceipt(receipt.to_string()))?;
        if messages[pos].visible_at <= now {
            return Err(CoreError::InvalidReceipt(format!("{receipt} (lease expired)")));
        }
        messages.remove(pos);
        debug!(queue = %self.name, receipt = %receipt, "message deleted");
        Ok(())
    }
}
