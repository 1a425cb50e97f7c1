use async_trait::async_trait;
use serde_json::json;
use uuid::Uuid;

use super::{HardDelete, HardDeleteError};

/// Hard delete against the platform's admin API. The service token is
/// injected here and never exposed to callers.
pub struct UpstreamDeleter {
    client: reqwest::Client,
    url: String,
    token: String,
}

impl UpstreamDeleter {
    pub fn new(url: String, token: String) -> Self {
        Self {
            client: reqwest::Client::builder()
                .timeout(std::time::Duration::from_secs(30))
                .build()
                .expect("Failed to build reqwest client"),
            url,
            token,
        }
    }
}

#[async_trait]
impl HardDelete for UpstreamDeleter {
    async fn perform_hard_delete(
        &self,
        user_id: Uuid,
        performed_by: Uuid,
    ) -> Result<serde_json::Value, HardDeleteError> {
        let resp = self
            .client
            .post(&self.url)
            .bearer_auth(&self.token)
            .json(&json!({
                "user_id": user_id,
                "performed_by": performed_by,
            }))
            .send()
            .await
            .map_err(|e| HardDeleteError::from(format!("Hard delete request failed: {e}")))?;

        let status_code = resp.status().as_u16();
        if !(200..300).contains(&status_code) {
            let body = resp
                .text()
                .await
                .unwrap_or_default()
                .chars()
                .take(1024)
                .collect::<String>();
            return Err(HardDeleteError::from(format!(
                "Upstream returned {status_code}: {body}"
            )));
        }

        let data = resp
            .json::<serde_json::Value>()
            .await
            .unwrap_or_else(|_| json!({ "user_id": user_id }));
        Ok(data)
    }
}
