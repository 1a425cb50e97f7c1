use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::DeletionJob;

pub async fn enqueue(
    pool: &PgPool,
    user_id: Uuid,
    requested_by: Uuid,
    scheduled_for: Option<DateTime<Utc>>,
) -> Result<DeletionJob, sqlx::Error> {
    sqlx::query_as::<_, DeletionJob>(
        "INSERT INTO deletion_jobs (user_id, requested_by, scheduled_for)
         VALUES ($1, $2, COALESCE($3, now())) RETURNING *",
    )
    .bind(user_id)
    .bind(requested_by)
    .bind(scheduled_for)
    .fetch_one(pool)
    .await
}

/// Atomically claim up to `limit` due pending jobs, marking them in_progress
/// in the same statement. SKIP LOCKED keeps overlapping passes from
/// double-claiming a job.
pub async fn claim_due(pool: &PgPool, limit: i64) -> Result<Vec<DeletionJob>, sqlx::Error> {
    sqlx::query_as::<_, DeletionJob>(
        "WITH claimed AS (
             UPDATE deletion_jobs SET status = 'in_progress'
             WHERE id IN (
                 SELECT id FROM deletion_jobs
                 WHERE status = 'pending'
                   AND scheduled_for <= now()
                 ORDER BY scheduled_for ASC
                 LIMIT $1
                 FOR UPDATE SKIP LOCKED
             )
             RETURNING *
         )
         SELECT * FROM claimed ORDER BY scheduled_for ASC",
    )
    .bind(limit)
    .fetch_all(pool)
    .await
}

pub async fn mark_completed(pool: &PgPool, id: Uuid) -> Result<(), sqlx::Error> {
    sqlx::query(
        "UPDATE deletion_jobs
         SET status = 'completed', error = NULL, completed_at = now()
         WHERE id = $1",
    )
    .bind(id)
    .execute(pool)
    .await?;
    Ok(())
}

/// Terminal failure. There is no automatic re-queue; failed jobs stay failed
/// until an operator intervenes.
pub async fn mark_failed(pool: &PgPool, id: Uuid, error: &str) -> Result<(), sqlx::Error> {
    sqlx::query(
        "UPDATE deletion_jobs
         SET status = 'failed', error = $2, completed_at = now()
         WHERE id = $1",
    )
    .bind(id)
    .bind(error)
    .execute(pool)
    .await?;
    Ok(())
}

pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<DeletionJob>, sqlx::Error> {
    sqlx::query_as::<_, DeletionJob>("SELECT * FROM deletion_jobs WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub async fn list(
    pool: &PgPool,
    status: Option<&str>,
    limit: i64,
    offset: i64,
) -> Result<Vec<DeletionJob>, sqlx::Error> {
    match status {
        Some(status) => {
            sqlx::query_as::<_, DeletionJob>(
                "SELECT * FROM deletion_jobs WHERE status = $1
                 ORDER BY created_at DESC LIMIT $2 OFFSET $3",
            )
            .bind(status)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
        }
        None => {
            sqlx::query_as::<_, DeletionJob>(
                "SELECT * FROM deletion_jobs
                 ORDER BY created_at DESC LIMIT $1 OFFSET $2",
            )
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
        }
    }
}
