use tracing::{debug, info, warn};

use abd_model::{ActivationEvent, BuildRequest};

use crate::{error::DispatchError, ports::BuildQueue};

/// Push the build request carried by `event`, if any.
///
/// Returns the enqueued request, or `None` when the event carries no (valid) request.
/// Events with missing or unusable fields are not an error: there is simply nothing to enqueue.
pub async fn enqueue(
    queue: &dyn BuildQueue,
    event: &ActivationEvent,
) -> Result<Option<BuildRequest>, DispatchError> {
    let request = match event.build_request() {
        Ok(Some(request)) => request,
        Ok(None) => {
            debug!("activation carries no build request; nothing to enqueue");
            return Ok(None);
        }
        Err(e) => {
            warn!(error = %e, "ignoring malformed build request in activation");
            return Ok(None);
        }
    };

    let body = match request.to_body() {
        Ok(body) => body,
        Err(e) => {
            return Err(DispatchError::Enqueue {
                request,
                source: e.into(),
            });
        }
    };

    info!(queue = queue.name(), %request, "pushing build to queue");
    if let Err(source) = queue.enqueue(&body).await {
        return Err(DispatchError::Enqueue { request, source });
    }
    Ok(Some(request))
}
