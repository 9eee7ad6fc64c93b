use tracing::warn;

use crate::{
    error::DispatchError,
    ports::{BuildQueue, QueueMessage},
};

/// Move a message that exceeded its delivery budget to the dead-letter queue.
///
/// The body is forwarded verbatim before the original is deleted, so a failure
/// between the two leaves a duplicate in the dead-letter queue rather than losing it.
pub async fn forward_to_dead_letter(
    queue: &dyn BuildQueue,
    dead_letter: &dyn BuildQueue,
    msg: &QueueMessage,
) -> Result<(), DispatchError> {
    warn!(
        queue = queue.name(),
        dead_letter = dead_letter.name(),
        receipt = %msg.receipt,
        receive_count = msg.receive_count,
        "delivery budget exceeded; moving message to dead-letter queue"
    );
    let to_err = |source| DispatchError::DeadLetter {
        receipt: msg.receipt.clone(),
        source,
    };
    dead_letter.enqueue(&msg.body).await.map_err(to_err)?;
    queue.delete(&msg.receipt).await.map_err(to_err)?;
    Ok(())
}
