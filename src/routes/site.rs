use askama::Template;
use axum::extract::State;
use axum::http::header;
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::Utc;
use serde_json::json;

use crate::error::AppError;
use crate::state::SharedState;

/// Pages listed in the sitemap, relative to the configured base URL.
const SITE_PAGES: &[&str] = &["/", "/pricing", "/about", "/blog", "/contact"];

#[derive(Template)]
#[template(path = "sitemap.xml")]
struct SitemapTemplate {
    urls: Vec<String>,
}

pub async fn sitemap(State(state): State<SharedState>) -> Result<Response, AppError> {
    let base = state.config.base_url.trim_end_matches('/');
    let urls = SITE_PAGES
        .iter()
        .map(|page| format!("{base}{page}"))
        .collect();

    let body = SitemapTemplate { urls }
        .render()
        .map_err(|e| AppError::Internal(format!("Failed to render sitemap: {e}")))?;

    Ok(([(header::CONTENT_TYPE, "application/xml")], body).into_response())
}

pub async fn countdown(
    State(state): State<SharedState>,
) -> Result<Json<serde_json::Value>, AppError> {
    let target = state
        .config
        .launch_at
        .ok_or_else(|| AppError::NotFound("No launch date configured".to_string()))?;

    let remaining = (target - Utc::now()).num_seconds().max(0);

    Ok(Json(json!({
        "target": target.to_rfc3339(),
        "remaining_seconds": remaining,
        "complete": remaining == 0,
    })))
}
