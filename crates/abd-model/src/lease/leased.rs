use uuid::Uuid;

use crate::{BuildRequest, LeaseReceipt, ScopedCredentials, TaskDescriptor};

/// Namespace for launch idempotency keys.
const IDEMPOTENCY_NAMESPACE: Uuid = Uuid::from_u128(0x6b1f_2c3e_9a4d_4f07_b8e2_5d61_a0c4_7e19);

/// A build request leased from the queue, enriched as it moves through the pipeline.
///
/// Lifecycle:
/// - created by the dequeue step with request + receipt;
/// - the credential step attaches [`ScopedCredentials`];
/// - the launch step attaches the started [`TaskDescriptor`];
/// - the acknowledge step deletes the message and the value is dropped.
#[derive(Debug, Clone)]
pub struct LeasedBuild {
    request: BuildRequest,
    receipt: LeaseReceipt,
    receive_count: u32,
    credentials: Option<ScopedCredentials>,
    task: Option<TaskDescriptor>,
}

impl LeasedBuild {
    pub fn new(request: BuildRequest, receipt: LeaseReceipt, receive_count: u32) -> Self {
        Self {
            request,
            receipt,
            receive_count,
            credentials: None,
            task: None,
        }
    }

    pub fn request(&self) -> &BuildRequest {
        &self.request
    }

    pub fn receipt(&self) -> &LeaseReceipt {
        &self.receipt
    }

    /// How many times the queue has delivered this message, this delivery included.
    pub fn receive_count(&self) -> u32 {
        self.receive_count
    }

    pub fn credentials(&self) -> Option<&ScopedCredentials> {
        self.credentials.as_ref()
    }

    pub fn task(&self) -> Option<&TaskDescriptor> {
        self.task.as_ref()
    }

    /// Attach issued credentials and return the updated lease.
    pub fn with_credentials(mut self, credentials: ScopedCredentials) -> Self {
        self.credentials = Some(credentials);
        self
    }

    /// Attach the started task and return the updated lease.
    pub fn with_task(mut self, task: TaskDescriptor) -> Self {
        self.task = Some(task);
        self
    }

    /// Deterministic key tying this delivery to exactly one task launch.
    ///
    /// UUIDv5 over the request triple and the lease receipt, so a retried launch of
    /// the same delivery yields the same key, while a redelivery yields a new one.
    pub fn idempotency_key(&self) -> String {
        let name = format!(
            "{}\n{}\n{}\n{}",
            self.request.addon,
            self.request.addon_version,
            self.request.ember_version,
            self.receipt.as_str()
        );
        Uuid::new_v5(&IDEMPOTENCY_NAMESPACE, name.as_bytes()).to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lease(receipt: &str) -> LeasedBuild {
        LeasedBuild::new(BuildRequest::new("foo", "1.0.0", "3.2.0"), receipt.into(), 1)
    }

    #[test]
    fn new_lease_has_no_credentials_or_task() {
        let l = lease("r-1");
        assert!(l.credentials().is_none());
        assert!(l.task().is_none());
        assert_eq!(l.receipt().as_str(), "r-1");
        assert_eq!(l.receive_count(), 1);
    }

    #[test]
    fn idempotency_key_is_stable_per_delivery() {
        assert_eq!(lease("r-1").idempotency_key(), lease("r-1").idempotency_key());
        assert_ne!(lease("r-1").idempotency_key(), lease("r-2").idempotency_key());
    }

    #[test]
    fn idempotency_key_depends_on_request() {
        let other = LeasedBuild::new(BuildRequest::new("foo", "1.0.1", "3.2.0"), "r-1".into(), 1);
        assert_ne!(lease("r-1").idempotency_key(), other.idempotency_key());
    }
}
