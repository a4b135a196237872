#[cfg(test)]
#[path = "staging_test.rs"]
mod tests;

use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use serde_derive::Deserialize;
use serde_derive::Serialize;

pub const STAGING_SESSION_KEY_PREFIX: &str = "vista_staging_session_";
pub const STAGING_SESSION_TTL_MS: i64 = 24 * 60 * 60 * 1000;
pub const DEFAULT_ROOM_NAME: &str = "Main Room";

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StagingSessionRecord {
    pub session_id: String,
    pub property_id: String,
    pub created_at: i64,
    pub last_accessed_at: i64,
}

impl StagingSessionRecord {
    pub fn new(property_id: &str, session_id: &str, now_ms: i64) -> StagingSessionRecord {
        return StagingSessionRecord {
            session_id: session_id.to_string(),
            property_id: property_id.to_string(),
            created_at: now_ms,
            last_accessed_at: now_ms,
        };
    }

    pub fn storage_key(property_id: &str) -> String {
        return format!("{STAGING_SESSION_KEY_PREFIX}{property_id}");
    }

    /// Expiry is absolute from creation; access never extends it.
    pub fn is_expired(&self, now_ms: i64) -> bool {
        return now_ms - self.created_at > STAGING_SESSION_TTL_MS;
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CreateSessionRequest {
    pub property_id: String,
    pub user_id: String,
    pub room_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub furniture_theme: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CreateSessionResponse {
    pub session_id: String,
    #[serde(default)]
    pub staging: Option<serde_json::Value>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GenerateStagingRequest {
    pub session_id: String,
    pub image_index: usize,
    pub custom_prompt: String,
    pub user_message: String,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct GenerateStagingResponse {
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

#[async_trait]
pub trait StagingService {
    async fn create_session(&self, request: CreateSessionRequest) -> Result<CreateSessionResponse>;

    /// Raw session document. Panoramic images live under
    /// `session.panoramic_images` or top-level `panoramic_images`.
    async fn get_session(&self, session_id: &str) -> Result<serde_json::Value>;

    async fn generate_staging(
        &self,
        request: GenerateStagingRequest,
    ) -> Result<GenerateStagingResponse>;
}

pub type StagingServiceBox = Arc<dyn StagingService + Send + Sync>;
