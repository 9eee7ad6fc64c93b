use tracing::{error, info};

use abd_model::{LeasedBuild, TaskDescriptor};

use crate::{error::DispatchError, ports::BuildQueue};

/// Delete the leased message once its task is confirmed started.
///
/// This is the only step that makes a dequeue permanent. A lease without an
/// attached task is refused and left in the queue.
pub async fn acknowledge(
    queue: &dyn BuildQueue,
    lease: LeasedBuild,
) -> Result<TaskDescriptor, DispatchError> {
    let Some(task) = lease.task().cloned() else {
        return Err(DispatchError::NoTaskStarted {
            request: lease.request().clone(),
        });
    };

    info!(queue = queue.name(), receipt = %lease.receipt(), "deleting message from queue");
    if let Err(source) = queue.delete(lease.receipt()).await {
        error!(
            task = %task,
            receipt = %lease.receipt(),
            error = %source,
            "task started but message was not deleted; it will be redelivered"
        );
        return Err(DispatchError::Acknowledge {
            task,
            receipt: lease.receipt().clone(),
            source,
        });
    }
    Ok(task)
}
