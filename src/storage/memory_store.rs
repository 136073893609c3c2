/*!
 * In-memory object store.
 *
 * Objects are kept as encoded JSON, so a load always returns a fresh value
 * and never aliases what was saved.
 */

use chrono::{DateTime, Utc};
use log::debug;
use parking_lot::RwLock;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::collections::BTreeMap;
use std::sync::Arc;

use crate::errors::StorageResult;

use super::{ObjectStore, StoreEntry};

/// Stored object with its bookkeeping timestamps
#[derive(Debug, Clone)]
struct MemoryObject {
    data: Vec<u8>,
    created: DateTime<Utc>,
    modified: DateTime<Utc>,
}

/// Object store held in process memory
///
/// Clones share the same underlying map.
#[derive(Debug, Clone, Default)]
pub struct MemoryObjectStore {
    objects: Arc<RwLock<BTreeMap<String, MemoryObject>>>,
}

impl MemoryObjectStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Save `value` as if written at `at`
    ///
    /// The first write of a key sets its creation time; every write sets the
    /// modification time.
    pub fn save_object_at<T: Serialize>(
        &self,
        key: &str,
        value: &T,
        at: DateTime<Utc>,
    ) -> StorageResult<()> {
        let data = serde_json::to_vec(value)?;
        let mut objects = self.objects.write();

        match objects.get_mut(key) {
            Some(existing) => {
                existing.data = data;
                existing.modified = at;
            }
            None => {
                objects.insert(
                    key.to_string(),
                    MemoryObject {
                        data,
                        created: at,
                        modified: at,
                    },
                );
            }
        }

        debug!("Saved {} to memory store", key);
        Ok(())
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.objects.read().contains_key(key)
    }

    /// Get the number of stored objects
    pub fn len(&self) -> usize {
        self.objects.read().len()
    }

    /// Check if the store is empty
    pub fn is_empty(&self) -> bool {
        self.objects.read().is_empty()
    }

    /// Drop every stored object
    pub fn clear(&self) {
        self.objects.write().clear();
        debug!("Memory store cleared");
    }
}

impl ObjectStore for MemoryObjectStore {
    fn load_object<T: DeserializeOwned>(&self, key: &str) -> StorageResult<Option<T>> {
        let objects = self.objects.read();
        match objects.get(key) {
            Some(object) => Ok(Some(serde_json::from_slice(&object.data)?)),
            None => Ok(None),
        }
    }

    fn save_object<T: Serialize>(&self, key: &str, value: &T) -> StorageResult<()> {
        self.save_object_at(key, value, Utc::now())
    }

    fn list_entries(&self) -> StorageResult<Vec<StoreEntry>> {
        Ok(self
            .objects
            .read()
            .iter()
            .map(|(name, object)| StoreEntry {
                name: name.clone(),
                is_file: true,
                created: Some(object.created),
                modified: object.modified,
            })
            .collect())
    }
}
