use sqlx::PgPool;
use uuid::Uuid;

/// Record an audit event. This is called explicitly in handlers after mutations.
pub async fn record(
    pool: &PgPool,
    actor: Option<Uuid>,
    action: &str,
    resource_type: &str,
    resource_id: Option<Uuid>,
    details: Option<serde_json::Value>,
) {
    if let Err(e) =
        crate::db::audit::log_event(pool, actor, action, resource_type, resource_id, details).await
    {
        tracing::error!("Failed to record audit event: {e}");
    }
}
