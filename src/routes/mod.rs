pub mod deletions;
pub mod events;
pub mod hooks;
pub mod site;

use axum::routing::{get, post};
use axum::Router;

use crate::state::SharedState;

pub fn api_routes() -> Router<SharedState> {
    Router::new()
        // Deletion queue
        .route(
            "/api/v1/deletions",
            get(deletions::list).post(deletions::enqueue),
        )
        .route("/api/v1/deletions/process", post(deletions::process))
        .route("/api/v1/deletions/{id}", get(deletions::get))
        // Analytics
        .route("/api/v1/events", get(events::list))
}

pub fn public_routes() -> Router<SharedState> {
    Router::new()
        .route("/v1/hooks/signup", post(hooks::forward_signup))
        .route("/v1/events", post(events::ingest))
        .route("/v1/countdown", get(site::countdown))
        .route("/sitemap.xml", get(site::sitemap))
}
