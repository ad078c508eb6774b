use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs;

use super::PreferencesStore;
use crate::{error::StoreError, models::Preferences};

/// Stores preferences as a JSON document on disk.
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    fn io_error(&self, source: std::io::Error) -> StoreError {
        StoreError::Io {
            path: self.path.clone(),
            source,
        }
    }
}

#[async_trait]
impl PreferencesStore for FileStore {
    async fn load(&self) -> Result<Preferences, StoreError> {
        match fs::read_to_string(&self.path).await {
            Ok(content) => Ok(serde_json::from_str(&content)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::info!(
                    "No preferences at {}, using defaults",
                    self.path.display()
                );
                Ok(Preferences::default())
            }
            Err(e) => Err(self.io_error(e)),
        }
    }

    async fn save(&self, preferences: &Preferences) -> Result<(), StoreError> {
        let json = serde_json::to_string_pretty(preferences)?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| self.io_error(e))?;
        }

        // Write next to the target and rename so a crash never leaves half a file
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, json).await.map_err(|e| self.io_error(e))?;
        fs::rename(&tmp, &self.path)
            .await
            .map_err(|e| self.io_error(e))?;

        tracing::debug!("Saved preferences to {}", self.path.display());
        Ok(())
    }
}
