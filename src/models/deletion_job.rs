use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A row in the deletion queue. Status moves forward only:
/// `pending -> in_progress -> completed | failed`. Terminal rows are
/// never deleted; they persist for audit.
#[derive(Debug, Clone, sqlx::FromRow, Serialize, Deserialize)]
pub struct DeletionJob {
    pub id: Uuid,
    pub user_id: Uuid,
    pub requested_by: Uuid,
    pub scheduled_for: DateTime<Utc>,
    pub status: String,
    pub error: Option<String>,
    pub created_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
}
