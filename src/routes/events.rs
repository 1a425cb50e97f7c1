use axum::extract::{ConnectInfo, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;
use serde_json::json;

use crate::auth::extractor::ApiKey;
use crate::db;
use crate::error::AppError;
use crate::models::AnalyticsEvent;
use crate::state::SharedState;

const RATE_LIMIT: u32 = 60;
const RATE_WINDOW_SECS: u64 = 60;

#[derive(Deserialize)]
pub struct IngestEvent {
    pub name: String,
    pub payload: Option<serde_json::Value>,
}

#[derive(Deserialize)]
pub struct ListQuery {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

pub async fn ingest(
    State(state): State<SharedState>,
    ConnectInfo(addr): ConnectInfo<std::net::SocketAddr>,
    Json(req): Json<IngestEvent>,
) -> Result<impl IntoResponse, AppError> {
    state
        .event_limiter
        .check(addr.ip(), RATE_LIMIT, RATE_WINDOW_SECS)
        .map_err(AppError::RateLimited)?;

    let name = req.name.trim();
    if name.is_empty() {
        return Err(AppError::BadRequest("Event name is required".to_string()));
    }

    let payload = req.payload.unwrap_or_else(|| json!({}));
    let client_ip = addr.ip().to_string();
    let event = db::events::insert(&state.pool, name, &payload, Some(client_ip.as_str())).await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "status": "created",
            "event_id": event.id,
        })),
    ))
}

pub async fn list(
    _auth: ApiKey,
    State(state): State<SharedState>,
    Query(params): Query<ListQuery>,
) -> Result<Json<Vec<AnalyticsEvent>>, AppError> {
    let limit = params.limit.unwrap_or(50).clamp(1, 200);
    let offset = params.offset.unwrap_or(0).max(0);

    let events = db::events::list(&state.pool, limit, offset).await?;
    Ok(Json(events))
}
