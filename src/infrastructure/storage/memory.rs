#[cfg(test)]
#[path = "memory_test.rs"]
mod tests;

use anyhow::Result;
use async_trait::async_trait;
use dashmap::DashMap;

use crate::domain::models::KeyValueStore;

#[derive(Default)]
pub struct MemoryStorage {
    entries: DashMap<String, String>,
}

#[async_trait]
impl KeyValueStore for MemoryStorage {
    #[allow(clippy::implicit_return)]
    async fn get(&self, key: &str) -> Result<Option<String>> {
        return Ok(self.entries.get(key).map(|e| return e.value().to_string()));
    }

    #[allow(clippy::implicit_return)]
    async fn set(&self, key: &str, value: &str) -> Result<()> {
        self.entries.insert(key.to_string(), value.to_string());
        return Ok(());
    }

    #[allow(clippy::implicit_return)]
    async fn remove(&self, key: &str) -> Result<()> {
        self.entries.remove(key);
        return Ok(());
    }

    #[allow(clippy::implicit_return)]
    async fn keys(&self) -> Result<Vec<String>> {
        let mut keys = self
            .entries
            .iter()
            .map(|e| return e.key().to_string())
            .collect::<Vec<String>>();
        keys.sort();

        return Ok(keys);
    }
}
