#[cfg(test)]
#[path = "staging_sessions_test.rs"]
mod tests;

use anyhow::Result;
use chrono::Utc;

use crate::domain::models::CreateSessionRequest;
use crate::domain::models::GenerateStagingRequest;
use crate::domain::models::GenerateStagingResponse;
use crate::domain::models::KeyValueBox;
use crate::domain::models::StagingServiceBox;
use crate::domain::models::StagingSessionRecord;
use crate::domain::models::DEFAULT_ROOM_NAME;
use crate::domain::models::STAGING_SESSION_KEY_PREFIX;

fn now_ms() -> i64 {
    return Utc::now().timestamp_millis();
}

/// Per-property virtual-staging session ids with a 24 hour lifetime.
pub struct StagingSessions {
    storage: KeyValueBox,
}

impl StagingSessions {
    pub fn new(storage: KeyValueBox) -> StagingSessions {
        return StagingSessions { storage };
    }

    pub async fn get_session_id(&self, property_id: &str) -> Result<Option<String>> {
        return self.get_session_id_at(property_id, now_ms()).await;
    }

    pub async fn get_session_id_at(&self, property_id: &str, now_ms: i64) -> Result<Option<String>> {
        let key = StagingSessionRecord::storage_key(property_id);
        let mut record = match self.read(&key, now_ms).await? {
            Some(record) => record,
            None => return Ok(None),
        };

        record.last_accessed_at = now_ms;
        self.storage.set(&key, &serde_json::to_string(&record)?).await?;

        return Ok(Some(record.session_id));
    }

    pub async fn store_session(&self, property_id: &str, session_id: &str) -> Result<()> {
        return self.store_session_at(property_id, session_id, now_ms()).await;
    }

    pub async fn store_session_at(&self, property_id: &str, session_id: &str, now_ms: i64) -> Result<()> {
        let record = StagingSessionRecord::new(property_id, session_id, now_ms);
        self.storage
            .set(
                &StagingSessionRecord::storage_key(property_id),
                &serde_json::to_string(&record)?,
            )
            .await?;

        tracing::debug!(property_id, session_id, "stored staging session");
        return Ok(());
    }

    pub async fn remove_session(&self, property_id: &str) -> Result<()> {
        return self
            .storage
            .remove(&StagingSessionRecord::storage_key(property_id))
            .await;
    }

    pub async fn clear_all(&self) -> Result<usize> {
        let keys = self.staging_keys().await?;
        for key in keys.iter() {
            self.storage.remove(key).await?;
        }

        return Ok(keys.len());
    }

    pub async fn list(&self) -> Result<Vec<StagingSessionRecord>> {
        return self.list_at(now_ms()).await;
    }

    /// Live records, oldest first. Expired and unreadable records are pruned.
    pub async fn list_at(&self, now_ms: i64) -> Result<Vec<StagingSessionRecord>> {
        let mut records = vec![];
        for key in self.staging_keys().await? {
            if let Some(record) = self.read(&key, now_ms).await? {
                records.push(record);
            }
        }
        records.sort_by_key(|e| return e.created_at);

        return Ok(records);
    }

    /// Reuses the stored session while the staging service still knows it,
    /// otherwise creates and stores a fresh one.
    pub async fn ensure_session(
        &self,
        service: &StagingServiceBox,
        property_id: &str,
        user_id: &str,
    ) -> Result<String> {
        if let Some(session_id) = self.get_session_id(property_id).await? {
            match service.get_session(&session_id).await {
                Ok(_) => return Ok(session_id),
                Err(err) => {
                    tracing::warn!(property_id, session_id, error = ?err, "stored staging session was rejected");
                    self.remove_session(property_id).await?;
                }
            }
        }

        let res = service
            .create_session(CreateSessionRequest {
                property_id: property_id.to_string(),
                user_id: user_id.to_string(),
                room_name: DEFAULT_ROOM_NAME.to_string(),
                style: None,
                furniture_theme: None,
            })
            .await?;
        self.store_session(property_id, &res.session_id).await?;

        return Ok(res.session_id);
    }

    pub async fn generate(
        &self,
        service: &StagingServiceBox,
        property_id: &str,
        user_id: &str,
        image_index: usize,
        prompt: &str,
        user_message: &str,
    ) -> Result<GenerateStagingResponse> {
        let session_id = self.ensure_session(service, property_id, user_id).await?;

        return service
            .generate_staging(GenerateStagingRequest {
                session_id,
                image_index,
                custom_prompt: prompt.to_string(),
                user_message: user_message.to_string(),
            })
            .await;
    }

    async fn staging_keys(&self) -> Result<Vec<String>> {
        return Ok(self
            .storage
            .keys()
            .await?
            .into_iter()
            .filter(|e| return e.starts_with(STAGING_SESSION_KEY_PREFIX))
            .collect());
    }

    async fn read(&self, key: &str, now_ms: i64) -> Result<Option<StagingSessionRecord>> {
        let raw = match self.storage.get(key).await? {
            Some(raw) => raw,
            None => return Ok(None),
        };

        let record = match serde_json::from_str::<StagingSessionRecord>(&raw) {
            Ok(record) => record,
            Err(err) => {
                tracing::warn!(key, error = ?err, "removing unreadable staging session");
                self.storage.remove(key).await?;
                return Ok(None);
            }
        };

        if record.is_expired(now_ms) {
            tracing::debug!(key, "removing expired staging session");
            self.storage.remove(key).await?;
            return Ok(None);
        }

        return Ok(Some(record));
    }
}
