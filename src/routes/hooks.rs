use axum::extract::State;
use axum::Json;
use serde_json::json;

use crate::auth::extractor::ApiKey;
use crate::error::AppError;
use crate::state::SharedState;

/// Forward a signup notification to the configured upstream, injecting the
/// shared secret as a bearer token. The body passes through unchanged.
pub async fn forward_signup(
    _auth: ApiKey,
    State(state): State<SharedState>,
    Json(payload): Json<serde_json::Value>,
) -> Result<Json<serde_json::Value>, AppError> {
    let forward = state.config.signup_forward.as_ref().ok_or_else(|| {
        AppError::Unavailable("Signup forwarding is not configured".to_string())
    })?;

    let resp = state
        .forwarder
        .post(&forward.url)
        .bearer_auth(&forward.token)
        .json(&payload)
        .send()
        .await
        .map_err(|e| AppError::Upstream(format!("Signup forward failed: {e}")))?;

    let status_code = resp.status().as_u16();
    tracing::debug!("Forwarded signup webhook, upstream returned {status_code}");

    Ok(Json(json!({
        "forwarded": true,
        "status_code": status_code,
    })))
}
