/*!
 * Storage module for persisting per-video subtitle collections.
 *
 * This module provides:
 * - The `ObjectStore` seam the host's key/value store plugs into
 * - A directory-backed store writing one JSON file per key
 * - An in-memory store for tests and embedding
 * - `SubtitleStorageManager`, which maps video ids to store keys
 */

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::errors::StorageResult;
use crate::file_utils::FileEntry;

pub mod file_store;
pub mod manager;
pub mod memory_store;

// Re-export main types
pub use file_store::FileObjectStore;
pub use manager::{
    CURRENT_VERSION, DEFAULT_RECENT_AGE_DAYS, STORAGE_KEY_PREFIX, SubtitleStorageManager,
    storage_key,
};
pub use memory_store::MemoryObjectStore;

/// Key/value object store
///
/// Values are whole aggregates; there are no partial writes. Reads of a key
/// that was never written return `Ok(None)`.
pub trait ObjectStore {
    /// Load the object stored under `key`
    fn load_object<T: DeserializeOwned>(&self, key: &str) -> StorageResult<Option<T>>;

    /// Store `value` under `key`, replacing any previous value
    fn save_object<T: Serialize>(&self, key: &str, value: &T) -> StorageResult<()>;

    /// Names and timestamps of everything in the store's data area, unfiltered
    fn list_entries(&self) -> StorageResult<Vec<StoreEntry>>;
}

/// A listed store entry
pub type StoreEntry = FileEntry;

impl FileEntry {
    /// Timestamp an age scan compares against
    pub fn timestamp(&self, policy: AgePolicy) -> DateTime<Utc> {
        match policy {
            AgePolicy::AddedWithinWindow => self.created.unwrap_or(self.modified),
            AgePolicy::ModifiedWithinWindow => self.modified,
        }
    }
}

/// Which timestamp decides whether a stored collection is recent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgePolicy {
    /// Creation time; falls back to modification time where unavailable
    #[default]
    AddedWithinWindow,
    /// Last modification time
    ModifiedWithinWindow,
}

impl fmt::Display for AgePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AgePolicy::AddedWithinWindow => write!(f, "added_within_window"),
            AgePolicy::ModifiedWithinWindow => write!(f, "modified_within_window"),
        }
    }
}

impl std::str::FromStr for AgePolicy {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "added_within_window" | "added" => Ok(AgePolicy::AddedWithinWindow),
            "modified_within_window" | "modified" => Ok(AgePolicy::ModifiedWithinWindow),
            _ => Err(anyhow::anyhow!("Invalid age policy: {}", s)),
        }
    }
}
