#[cfg(test)]
#[path = "mark_test.rs"]
mod tests;

use std::time::Duration;

use anyhow::bail;
use anyhow::Result;
use async_trait::async_trait;

use crate::configuration::Config;
use crate::configuration::ConfigKey;
use crate::domain::models::SummaryRequest;
use crate::domain::models::SummaryResponse;
use crate::domain::models::SummaryService;

pub struct MarkBackend {
    url: String,
    timeout: String,
}

impl Default for MarkBackend {
    fn default() -> MarkBackend {
        return MarkBackend {
            url: Config::get(ConfigKey::ApiURL),
            timeout: Config::get(ConfigKey::RequestTimeout),
        };
    }
}

#[async_trait]
impl SummaryService for MarkBackend {
    #[allow(clippy::implicit_return)]
    async fn summarize(&self, request: SummaryRequest) -> Result<SummaryResponse> {
        let res = reqwest::Client::new()
            .post(format!(
                "{url}/mark/summary",
                url = self.url.trim_end_matches('/')
            ))
            .json(&request)
            .timeout(Duration::from_millis(self.timeout.parse::<u64>()?))
            .send()
            .await?;

        if !res.status().is_success() {
            tracing::error!(
                status = res.status().as_u16(),
                property_id = request.property_id,
                "Mark summary request failed"
            );
            bail!(format!(
                "Mark summary request failed with status {}",
                res.status().as_u16()
            ));
        }

        let body = res.json::<SummaryResponse>().await?;
        return Ok(body);
    }
}
