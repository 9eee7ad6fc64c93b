use std::time::Duration;

use tracing::{debug, info};

use abd_model::{BuildRequest, LeasedBuild};

use crate::{
    error::DispatchError,
    ports::{BuildQueue, QueueMessage},
};

/// Lease at most one raw message from the queue.
///
/// `Ok(None)` means the queue is empty; callers must short-circuit, it is not an error.
pub async fn lease_message(
    queue: &dyn BuildQueue,
    visibility_timeout: Duration,
) -> Result<Option<QueueMessage>, DispatchError> {
    debug!(
        queue = queue.name(),
        visibility_timeout_secs = visibility_timeout.as_secs(),
        "loading build from queue"
    );
    let msg = queue
        .lease(visibility_timeout)
        .await
        .map_err(DispatchError::Dequeue)?;

    if msg.is_none() {
        info!(queue = queue.name(), "queue is empty; nothing to dispatch");
    }
    Ok(msg)
}

/// Decode a leased message into a [`LeasedBuild`].
///
/// A body that is not a build request aborts the activation; the message stays
/// queued and becomes visible again after its timeout.
pub fn parse_lease(msg: QueueMessage) -> Result<LeasedBuild, DispatchError> {
    let request = BuildRequest::from_body(&msg.body).map_err(|source| {
        DispatchError::MalformedMessage {
            receipt: msg.receipt.clone(),
            source,
        }
    })?;
    debug!(%request, receive_count = msg.receive_count, "leased build");
    Ok(LeasedBuild::new(request, msg.receipt, msg.receive_count))
}

/// Lease and decode the next build, if any.
pub async fn dequeue(
    queue: &dyn BuildQueue,
    visibility_timeout: Duration,
) -> Result<Option<LeasedBuild>, DispatchError> {
    match lease_message(queue, visibility_timeout).await? {
        Some(msg) => parse_lease(msg).map(Some),
        None => Ok(None),
    }
}
