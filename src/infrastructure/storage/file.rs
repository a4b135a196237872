#[cfg(test)]
#[path = "file_test.rs"]
mod tests;

use std::collections::BTreeMap;
use std::path;

use anyhow::bail;
use anyhow::Result;
use async_trait::async_trait;
use tokio::fs;
use tokio::sync::Mutex;

use crate::domain::models::KeyValueStore;

/// Storage persisted as a single JSON object of string values. The whole
/// file is rewritten on every mutation.
pub struct FileStorage {
    path: path::PathBuf,
    entries: Mutex<BTreeMap<String, String>>,
}

impl FileStorage {
    pub async fn open(file_path: &str) -> Result<FileStorage> {
        let path = path::PathBuf::from(file_path);
        let mut entries = BTreeMap::new();

        if fs::try_exists(&path).await? {
            let text = fs::read_to_string(&path).await?;
            if !text.trim().is_empty() {
                entries = match serde_json::from_str(&text) {
                    Ok(entries) => entries,
                    Err(err) => {
                        bail!(format!(
                            "Storage file {} is not a JSON object of strings: {err}",
                            path.display()
                        ));
                    }
                };
            }
        }

        tracing::debug!(path = ?path, entries = entries.len(), "opened file storage");

        return Ok(FileStorage {
            path,
            entries: Mutex::new(entries),
        });
    }

    async fn flush(&self, entries: &BTreeMap<String, String>) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).await?;
        }
        fs::write(&self.path, serde_json::to_string_pretty(entries)?).await?;

        return Ok(());
    }
}

#[async_trait]
impl KeyValueStore for FileStorage {
    #[allow(clippy::implicit_return)]
    async fn get(&self, key: &str) -> Result<Option<String>> {
        return Ok(self.entries.lock().await.get(key).cloned());
    }

    #[allow(clippy::implicit_return)]
    async fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut entries = self.entries.lock().await;
        entries.insert(key.to_string(), value.to_string());

        return self.flush(&entries).await;
    }

    #[allow(clippy::implicit_return)]
    async fn remove(&self, key: &str) -> Result<()> {
        let mut entries = self.entries.lock().await;
        if entries.remove(key).is_none() {
            return Ok(());
        }

        return self.flush(&entries).await;
    }

    #[allow(clippy::implicit_return)]
    async fn keys(&self) -> Result<Vec<String>> {
        return Ok(self.entries.lock().await.keys().cloned().collect());
    }
}
