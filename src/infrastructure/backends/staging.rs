#[cfg(test)]
#[path = "staging_test.rs"]
mod tests;

use std::time::Duration;

use anyhow::bail;
use anyhow::Result;
use async_trait::async_trait;

use crate::configuration::Config;
use crate::configuration::ConfigKey;
use crate::domain::models::CreateSessionRequest;
use crate::domain::models::CreateSessionResponse;
use crate::domain::models::GenerateStagingRequest;
use crate::domain::models::GenerateStagingResponse;
use crate::domain::models::StagingService;

fn error_message(status: u16, body: &str) -> String {
    if let Ok(value) = serde_json::from_str::<serde_json::Value>(body) {
        for key in ["detail", "message", "error"] {
            if let Some(msg) = value.get(key).and_then(|e| return e.as_str()) {
                return msg.to_string();
            }
        }
    }

    if !body.trim().is_empty() && body.len() <= 200 {
        return body.trim().to_string();
    }

    return format!("Staging service responded with status {status}");
}

pub struct StagingBackend {
    url: String,
    timeout: String,
}

impl Default for StagingBackend {
    fn default() -> StagingBackend {
        return StagingBackend {
            url: Config::get(ConfigKey::StagingURL),
            timeout: Config::get(ConfigKey::RequestTimeout),
        };
    }
}

impl StagingBackend {
    fn endpoint(&self, path: &str) -> String {
        return format!("{url}{path}", url = self.url.trim_end_matches('/'));
    }

    fn timeout(&self) -> Result<Duration> {
        return Ok(Duration::from_millis(self.timeout.parse::<u64>()?));
    }

    async fn read_body(&self, res: reqwest::Response, action: &str) -> Result<String> {
        let status = res.status();
        let body = res.text().await?;
        if !status.is_success() {
            tracing::error!(status = status.as_u16(), action, "Staging request failed");
            bail!(error_message(status.as_u16(), &body));
        }

        return Ok(body);
    }
}

#[async_trait]
impl StagingService for StagingBackend {
    #[allow(clippy::implicit_return)]
    async fn create_session(&self, request: CreateSessionRequest) -> Result<CreateSessionResponse> {
        let res = reqwest::Client::new()
            .post(self.endpoint("/sessions"))
            .json(&request)
            .timeout(self.timeout()?)
            .send()
            .await?;

        let body = self.read_body(res, "create_session").await?;
        return Ok(serde_json::from_str::<CreateSessionResponse>(&body)?);
    }

    #[allow(clippy::implicit_return)]
    async fn get_session(&self, session_id: &str) -> Result<serde_json::Value> {
        let res = reqwest::Client::new()
            .get(self.endpoint(&format!("/sessions/{session_id}")))
            .timeout(self.timeout()?)
            .send()
            .await?;

        let body = self.read_body(res, "get_session").await?;
        return Ok(serde_json::from_str::<serde_json::Value>(&body)?);
    }

    #[allow(clippy::implicit_return)]
    async fn generate_staging(
        &self,
        request: GenerateStagingRequest,
    ) -> Result<GenerateStagingResponse> {
        let res = reqwest::Client::new()
            .post(self.endpoint("/generate"))
            .json(&request)
            .timeout(self.timeout()?)
            .send()
            .await?;

        let body = self.read_body(res, "generate_staging").await?;
        return Ok(serde_json::from_str::<GenerateStagingResponse>(&body)?);
    }
}
