use crate::audit;
use crate::db;
use crate::models::DeletionJob;
use crate::state::SharedState;

use super::{JobOutcome, PassSummary};

/// Upper bound on jobs claimed per pass.
const BATCH_SIZE: i64 = 20;

const HARD_DELETE_TIMEOUT: std::time::Duration = std::time::Duration::from_secs(30);

/// Run one processing pass: claim the currently due batch, hard-delete each
/// user sequentially, record per-job outcomes. A claim failure fails the
/// whole pass; a per-job failure only fails that job.
pub async fn run_pass(state: &SharedState) -> Result<PassSummary, sqlx::Error> {
    let jobs = db::deletion_jobs::claim_due(&state.pool, BATCH_SIZE).await?;

    if jobs.is_empty() {
        return Ok(PassSummary {
            ok: true,
            processed: 0,
            results: Vec::new(),
        });
    }

    tracing::info!("Claimed {} deletion job(s)", jobs.len());

    let mut results = Vec::with_capacity(jobs.len());
    for job in &jobs {
        results.push(process_job(state, job).await);
    }

    Ok(PassSummary {
        ok: true,
        processed: results.len(),
        results,
    })
}

async fn process_job(state: &SharedState, job: &DeletionJob) -> JobOutcome {
    tracing::debug!(
        "Hard-deleting user {} (job={}, requested_by={})",
        job.user_id,
        job.id,
        job.requested_by
    );

    let result = match tokio::time::timeout(
        HARD_DELETE_TIMEOUT,
        state.deleter.perform_hard_delete(job.user_id, job.requested_by),
    )
    .await
    {
        Ok(Ok(data)) => Ok(data),
        Ok(Err(e)) => Err(e.message),
        Err(_) => Err(format!(
            "Hard delete timed out after {}s",
            HARD_DELETE_TIMEOUT.as_secs()
        )),
    };

    match result {
        Ok(data) => {
            // If this write fails the job is left in_progress; that only
            // surfaces in logs, there is no retry for the status write.
            if let Err(e) = db::deletion_jobs::mark_completed(&state.pool, job.id).await {
                tracing::error!("Failed to mark job {} completed: {e}", job.id);
            }

            audit::record(
                &state.pool,
                Some(job.requested_by),
                "user.hard_deleted",
                "user",
                Some(job.user_id),
                None,
            )
            .await;

            JobOutcome {
                user_id: job.user_id,
                ok: true,
                data: Some(data),
                error: None,
            }
        }
        Err(message) => {
            tracing::warn!("Deletion job {} failed: {message}", job.id);

            if let Err(e) = db::deletion_jobs::mark_failed(&state.pool, job.id, &message).await {
                tracing::error!("Failed to mark job {} failed: {e}", job.id);
            }

            JobOutcome {
                user_id: job.user_id,
                ok: false,
                data: None,
                error: Some(message),
            }
        }
    }
}
