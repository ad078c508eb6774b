use async_trait::async_trait;

use crate::{error::StoreError, models::Preferences};

pub mod file;
pub mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

/// Persistence for player preferences and the best score.
#[async_trait]
pub trait PreferencesStore: Send + Sync {
    /// Load stored preferences, falling back to defaults when nothing was saved yet
    async fn load(&self) -> Result<Preferences, StoreError>;

    async fn save(&self, preferences: &Preferences) -> Result<(), StoreError>;
}
