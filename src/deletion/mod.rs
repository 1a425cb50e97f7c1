pub mod processor;
pub mod upstream;

use async_trait::async_trait;
use serde::Serialize;
use uuid::Uuid;

/// Outcome of a single job within a pass.
#[derive(Debug, Clone, Serialize)]
pub struct JobOutcome {
    pub user_id: Uuid,
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Summary returned by one processing pass.
#[derive(Debug, Clone, Serialize)]
pub struct PassSummary {
    pub ok: bool,
    pub processed: usize,
    pub results: Vec<JobOutcome>,
}

#[derive(Debug)]
pub struct HardDeleteError {
    pub message: String,
}

impl std::fmt::Display for HardDeleteError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl From<String> for HardDeleteError {
    fn from(s: String) -> Self {
        HardDeleteError { message: s }
    }
}

impl From<&str> for HardDeleteError {
    fn from(s: &str) -> Self {
        HardDeleteError {
            message: s.to_string(),
        }
    }
}

/// The irreversible upstream operation that removes a user's data.
/// Invoked exactly once per claimed job.
#[async_trait]
pub trait HardDelete: Send + Sync {
    async fn perform_hard_delete(
        &self,
        user_id: Uuid,
        performed_by: Uuid,
    ) -> Result<serde_json::Value, HardDeleteError>;
}
