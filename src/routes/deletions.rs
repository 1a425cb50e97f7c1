use axum::extract::{Path, Query, State};
use axum::Json;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

use crate::audit;
use crate::auth::extractor::ApiKey;
use crate::db;
use crate::deletion::{processor, PassSummary};
use crate::error::AppError;
use crate::models::DeletionJob;
use crate::state::SharedState;

const STATUSES: &[&str] = &["pending", "in_progress", "completed", "failed"];

#[derive(Deserialize)]
pub struct EnqueueDeletion {
    pub user_id: Uuid,
    pub requested_by: Uuid,
    pub scheduled_for: Option<DateTime<Utc>>,
}

#[derive(Deserialize)]
pub struct ListQuery {
    pub status: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// Run one processing pass over the deletion queue. Called by an external
/// scheduler tick; a call with nothing due is a no-op returning processed: 0.
pub async fn process(
    _auth: ApiKey,
    State(state): State<SharedState>,
) -> Result<Json<PassSummary>, AppError> {
    let summary = processor::run_pass(&state).await?;
    Ok(Json(summary))
}

pub async fn enqueue(
    _auth: ApiKey,
    State(state): State<SharedState>,
    Json(req): Json<EnqueueDeletion>,
) -> Result<Json<DeletionJob>, AppError> {
    let job = db::deletion_jobs::enqueue(
        &state.pool,
        req.user_id,
        req.requested_by,
        req.scheduled_for,
    )
    .await?;

    audit::record(
        &state.pool,
        Some(req.requested_by),
        "deletion.requested",
        "deletion_job",
        Some(job.id),
        Some(json!({ "user_id": req.user_id })),
    )
    .await;

    Ok(Json(job))
}

pub async fn list(
    _auth: ApiKey,
    State(state): State<SharedState>,
    Query(params): Query<ListQuery>,
) -> Result<Json<Vec<DeletionJob>>, AppError> {
    if let Some(ref status) = params.status {
        if !STATUSES.contains(&status.as_str()) {
            return Err(AppError::BadRequest(format!("Unknown status: {status}")));
        }
    }

    let limit = params.limit.unwrap_or(50).clamp(1, 200);
    let offset = params.offset.unwrap_or(0).max(0);

    let jobs = db::deletion_jobs::list(&state.pool, params.status.as_deref(), limit, offset).await?;
    Ok(Json(jobs))
}

pub async fn get(
    _auth: ApiKey,
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
) -> Result<Json<DeletionJob>, AppError> {
    let job = db::deletion_jobs::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::NotFound("Deletion job not found".to_string()))?;
    Ok(Json(job))
}
