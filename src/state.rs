use std::sync::Arc;

use sqlx::PgPool;

use crate::config::Config;
use crate::deletion::HardDelete;
use crate::rate_limit::EventRateLimiter;

pub type SharedState = Arc<AppState>;

pub struct AppState {
    pub pool: PgPool,
    pub config: Config,
    pub deleter: Arc<dyn HardDelete>,
    pub forwarder: reqwest::Client,
    pub event_limiter: EventRateLimiter,
}
