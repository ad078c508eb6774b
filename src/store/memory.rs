use async_trait::async_trait;
use tokio::sync::Mutex;

use super::PreferencesStore;
use crate::{error::StoreError, models::Preferences};

/// Keeps preferences in memory only. Used when no file is configured and in tests.
#[derive(Default)]
pub struct MemoryStore {
    saved: Mutex<Option<Preferences>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PreferencesStore for MemoryStore {
    async fn load(&self) -> Result<Preferences, StoreError> {
        Ok(self.saved.lock().await.clone().unwrap_or_default())
    }

    async fn save(&self, preferences: &Preferences) -> Result<(), StoreError> {
        *self.saved.lock().await = Some(preferences.clone());
        Ok(())
    }
}
