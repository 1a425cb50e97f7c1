use std::net::IpAddr;

use chrono::{DateTime, Utc};

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub api_key: String,
    pub upstream_admin_url: String,
    pub upstream_service_token: String,
    pub host: IpAddr,
    pub port: u16,
    pub base_url: String,
    pub pass_interval_secs: u64,
    pub launch_at: Option<DateTime<Utc>>,
    pub log_level: String,
    pub signup_forward: Option<SignupForwardConfig>,
}

#[derive(Debug, Clone)]
pub struct SignupForwardConfig {
    pub url: String,
    pub token: String,
}

impl Config {
    pub fn from_env() -> Result<Self, String> {
        let database_url = env_required("DATABASE_URL")?;
        let api_key = env_required("HOOKRELAY_API_KEY")?;
        let upstream_admin_url = env_required("UPSTREAM_ADMIN_URL")?;
        let upstream_service_token = env_required("UPSTREAM_SERVICE_TOKEN")?;

        let host: IpAddr = env_or("HOOKRELAY_HOST", "0.0.0.0")
            .parse()
            .map_err(|e| format!("Invalid HOOKRELAY_HOST: {e}"))?;

        let port: u16 = env_or("HOOKRELAY_PORT", "3000")
            .parse()
            .map_err(|e| format!("Invalid HOOKRELAY_PORT: {e}"))?;

        let base_url = env_or("HOOKRELAY_BASE_URL", &format!("http://{host}:{port}"));

        // 0 disables the internal ticker; an external scheduler drives passes instead.
        let pass_interval_secs: u64 = env_or("HOOKRELAY_PASS_INTERVAL_SECS", "0")
            .parse()
            .map_err(|e| format!("Invalid HOOKRELAY_PASS_INTERVAL_SECS: {e}"))?;

        let launch_at = match std::env::var("HOOKRELAY_LAUNCH_AT").ok() {
            Some(raw) => Some(
                DateTime::parse_from_rfc3339(&raw)
                    .map(|dt| dt.with_timezone(&Utc))
                    .map_err(|e| format!("Invalid HOOKRELAY_LAUNCH_AT: {e}"))?,
            ),
            None => None,
        };

        let log_level = env_or("HOOKRELAY_LOG_LEVEL", "info");

        let signup_forward = match (
            std::env::var("SIGNUP_WEBHOOK_URL").ok(),
            std::env::var("SIGNUP_WEBHOOK_TOKEN").ok(),
        ) {
            (Some(url), Some(token)) => Some(SignupForwardConfig { url, token }),
            _ => None,
        };

        Ok(Config {
            database_url,
            api_key,
            upstream_admin_url,
            upstream_service_token,
            host,
            port,
            base_url,
            pass_interval_secs,
            launch_at,
            log_level,
            signup_forward,
        })
    }
}

fn env_required(key: &str) -> Result<String, String> {
    std::env::var(key).map_err(|_| format!("Missing required environment variable: {key}"))
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}
