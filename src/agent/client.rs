//! HTTP client side of the worker protocol.

use async_trait::async_trait;
use thiserror::Error;

use crate::protocol::{TaskEnvelope, TaskPayload, TaskReport};

#[derive(Error, Debug)]
pub enum AgentError {
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("unexpected status code {0} from orchestrator")]
    UnexpectedStatus(u16),
}

/// The orchestrator as seen by a worker: claim a task, report an outcome.
///
/// Abstracted so the worker loop can be driven against a scripted double in
/// tests.
#[async_trait]
pub trait Coordinator: Send + Sync {
    /// Address workers poll, for diagnostics only.
    fn endpoint(&self) -> &str;

    /// Claim the next ready task. `None` means the queue was empty.
    async fn fetch_task(&self) -> Result<Option<TaskPayload>, AgentError>;

    /// Deliver a result or failure report for a claimed task.
    async fn submit(&self, report: TaskReport) -> Result<(), AgentError>;
}

pub struct HttpCoordinator {
    base_url: String,
    client: reqwest::Client,
}

impl HttpCoordinator {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_owned(),
            client: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl Coordinator for HttpCoordinator {
    fn endpoint(&self) -> &str {
        &self.base_url
    }

    async fn fetch_task(&self) -> Result<Option<TaskPayload>, AgentError> {
        let response = self
            .client
            .get(format!("{}/internal/task", self.base_url))
            .send()
            .await?;

        match response.status().as_u16() {
            200 => {
                let envelope: TaskEnvelope = response.json().await?;
                Ok(Some(envelope.task))
            }
            404 => Ok(None),
            status => Err(AgentError::UnexpectedStatus(status)),
        }
    }

    async fn submit(&self, report: TaskReport) -> Result<(), AgentError> {
        let response = self
            .client
            .post(format!("{}/internal/task", self.base_url))
            .json(&report)
            .send()
            .await?;

        if response.status().is_success() {
            Ok(())
        } else {
            Err(AgentError::UnexpectedStatus(response.status().as_u16()))
        }
    }
}
