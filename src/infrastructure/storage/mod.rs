pub mod file;
pub mod memory;

use std::sync::Arc;

use anyhow::Result;

use crate::configuration::Config;
use crate::configuration::ConfigKey;
use crate::domain::models::KeyValueBox;
use crate::domain::models::StorageName;

pub struct StorageManager {}

impl StorageManager {
    pub async fn get(name: StorageName) -> Result<KeyValueBox> {
        match name {
            StorageName::File => {
                let storage = file::FileStorage::open(&Config::get(ConfigKey::StorageFile)).await?;
                return Ok(Arc::new(storage));
            }
            StorageName::Memory => {
                return Ok(Arc::<memory::MemoryStorage>::default());
            }
        }
    }
}
