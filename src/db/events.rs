use sqlx::PgPool;

use crate::models::AnalyticsEvent;

pub async fn insert(
    pool: &PgPool,
    name: &str,
    payload: &serde_json::Value,
    client_ip: Option<&str>,
) -> Result<AnalyticsEvent, sqlx::Error> {
    sqlx::query_as::<_, AnalyticsEvent>(
        "INSERT INTO analytics_events (name, payload, client_ip)
         VALUES ($1, $2, $3) RETURNING *",
    )
    .bind(name)
    .bind(payload)
    .bind(client_ip)
    .fetch_one(pool)
    .await
}

pub async fn list(
    pool: &PgPool,
    limit: i64,
    offset: i64,
) -> Result<Vec<AnalyticsEvent>, sqlx::Error> {
    sqlx::query_as::<_, AnalyticsEvent>(
        "SELECT * FROM analytics_events
         ORDER BY created_at DESC LIMIT $1 OFFSET $2",
    )
    .bind(limit)
    .bind(offset)
    .fetch_all(pool)
    .await
}
