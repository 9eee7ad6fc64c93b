//! Recording fakes of the collaborator ports, shared by the unit tests.
use std::{
    collections::VecDeque,
    sync::Mutex,
    time::Duration,
};

use async_trait::async_trait;
use time::OffsetDateTime;

use abd_model::{LaunchFailure, LeaseReceipt, ScopedCredentials, TaskDescriptor};

use crate::{
    AssumeRoleRequest, BuildQueue, CoreError, CredentialIssuer, QueueMessage, RunTaskRequest,
    RunTaskResponse, TaskOrchestrator,
};

#[derive(Default)]
pub struct FakeQueue {
    pub pending: Mutex<VecDeque<String>>,
    pub enqueued: Mutex<Vec<String>>,
    pub leases: Mutex<Vec<Duration>>,
    pub deleted: Mutex<Vec<LeaseReceipt>>,
    pub receive_count: u32,
    pub fail_enqueue: bool,
    pub fail_lease: bool,
    pub fail_delete: bool,
}

impl FakeQueue {
    pub fn with_pending<I: IntoIterator<Item = String>>(bodies: I) -> Self {
        Self {
            pending: Mutex::new(bodies.into_iter().collect()),
            receive_count: 1,
            ..Default::default()
        }
    }

    pub fn deleted(&self) -> Vec<LeaseReceipt> {
        self.deleted.lock().unwrap().clone()
    }

    pub fn enqueued(&self) -> Vec<String> {
        self.enqueued.lock().unwrap().clone()
    }

    pub fn lease_calls(&self) -> usize {
        self.leases.lock().unwrap().len()
    }
}

#[async_trait]
impl BuildQueue for FakeQueue {
    fn name(&self) -> &str {
        "fake"
    }

    async fn enqueue(&self, body: &str) -> Result<(), CoreError> {
        if self.fail_enqueue {
            return Err(CoreError::AccessDenied("enqueue".into()));
        }
        self.enqueued.lock().unwrap().push(body.to_string());
        self.pending.lock().unwrap().push_back(body.to_string());
        Ok(())
    }

    async fn lease(&self, visibility_timeout: Duration) -> Result<Option<QueueMessage>, CoreError> {
        let mut leases = self.leases.lock().unwrap();
        leases.push(visibility_timeout);
        if self.fail_lease {
            return Err(CoreError::Transport("lease".into()));
        }
        let seq = leases.len();
        Ok(self
            .pending
            .lock()
            .unwrap()
            .pop_front()
            .map(|body| QueueMessage {
                body,
                receipt: LeaseReceipt::new(format!("receipt-{seq}")),
                receive_count: self.receive_count.max(1),
            }))
    }

    async fn delete(&self, receipt: &LeaseReceipt) -> Result<(), CoreError> {
        if self.fail_delete {
            return Err(CoreError::InvalidReceipt(receipt.to_string()));
        }
        self.deleted.lock().unwrap().push(receipt.clone());
        Ok(())
    }
}

pub struct FakeIssuer {
    pub requests: Mutex<Vec<AssumeRoleRequest>>,
    pub lifetime_secs: i64,
    pub fail: bool,
}

impl Default for FakeIssuer {
    fn default() -> Self {
        Self {
            requests: Mutex::new(Vec::new()),
            lifetime_secs: 900,
            fail: false,
        }
    }
}

impl FakeIssuer {
    pub fn calls(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

#[async_trait]
impl CredentialIssuer for FakeIssuer {
    async fn assume_role(&self, req: &AssumeRoleRequest) -> Result<ScopedCredentials, CoreError> {
        self.requests.lock().unwrap().push(req.clone());
        if self.fail {
            return Err(CoreError::Rejected("MalformedPolicyDocument".into()));
        }
        let now = OffsetDateTime::now_utc();
        Ok(ScopedCredentials::new(
            "ASIAFAKE",
            "fake-secret",
            "fake-token",
            now,
            now + time::Duration::seconds(self.lifetime_secs),
        ))
    }
}

#[derive(Clone, Copy, Default, PartialEq, Eq)]
pub enum LaunchMode {
    #[default]
    Started,
    Failure,
    StartedWithFailure,
    Nothing,
    Error,
}

#[derive(Default)]
pub struct FakeOrchestrator {
    pub requests: Mutex<Vec<RunTaskRequest>>,
    pub mode: LaunchMode,
}

impl FakeOrchestrator {
    pub fn with_mode(mode: LaunchMode) -> Self {
        Self {
            mode,
            ..Default::default()
        }
    }

    pub fn calls(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    pub fn last_request(&self) -> Option<RunTaskRequest> {
        self.requests.lock().unwrap().last().cloned()
    }
}

pub fn started_task(req: &RunTaskRequest) -> TaskDescriptor {
    TaskDescriptor {
        task_arn: format!("arn:aws:ecs:task/{}", req.client_token),
        task_definition: req.task_definition.clone(),
        cluster: req.cluster.clone(),
        last_status: Some("PROVISIONING".into()),
        started_by: Some(req.started_by.clone()),
    }
}

#[async_trait]
impl TaskOrchestrator for FakeOrchestrator {
    fn name(&self) -> &str {
        "fake"
    }

    async fn run_task(&self, req: &RunTaskRequest) -> Result<RunTaskResponse, CoreError> {
        self.requests.lock().unwrap().push(req.clone());
        let failure = || LaunchFailure::new("RESOURCE:MEMORY");
        match self.mode {
            LaunchMode::Started => Ok(RunTaskResponse {
                tasks: vec![started_task(req)],
                failures: vec![],
            }),
            LaunchMode::Failure => Ok(RunTaskResponse {
                tasks: vec![],
                failures: vec![failure()],
            }),
            LaunchMode::StartedWithFailure => Ok(RunTaskResponse {
                tasks: vec![started_task(req)],
                failures: vec![failure()],
            }),
            LaunchMode::Nothing => Ok(RunTaskResponse::default()),
            LaunchMode::Error => Err(CoreError::Transport("connection reset".into())),
        }
    }
}
