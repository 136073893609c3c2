/*!
 * Directory-backed object store.
 *
 * Every key is one file directly inside the data directory, holding the
 * JSON encoding of the stored object. File names equal keys, so a directory
 * listing doubles as the list of stored keys.
 */

use log::debug;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::path::{Path, PathBuf};

use crate::errors::{StorageError, StorageResult};
use crate::file_utils::FileManager;

use super::{ObjectStore, StoreEntry};

/// Default application directory name under the user's data directory
const DEFAULT_APP_DIRNAME: &str = "substore";

/// Directory holding the stored objects
const DEFAULT_DATA_DIRNAME: &str = "DataItems";

/// Object store writing one JSON file per key
#[derive(Debug, Clone)]
pub struct FileObjectStore {
    data_path: PathBuf,
}

impl FileObjectStore {
    /// Create a store rooted at `data_path`; the directory is created on first save
    pub fn new<P: AsRef<Path>>(data_path: P) -> Self {
        Self {
            data_path: data_path.as_ref().to_path_buf(),
        }
    }

    /// Create a store at the default location
    pub fn new_default() -> StorageResult<Self> {
        Ok(Self::new(Self::default_data_path()?))
    }

    /// Get the default data directory
    pub fn default_data_path() -> StorageResult<PathBuf> {
        let base_dir = dirs::data_local_dir()
            .or_else(dirs::data_dir)
            .or_else(|| dirs::home_dir().map(|h| h.join(".local").join("share")))
            .ok_or_else(|| {
                StorageError::DataDirectory("Could not determine data directory".to_string())
            })?;

        Ok(base_dir.join(DEFAULT_APP_DIRNAME).join(DEFAULT_DATA_DIRNAME))
    }

    pub fn data_path(&self) -> &Path {
        &self.data_path
    }

    /// File backing `key`
    pub fn object_path(&self, key: &str) -> StorageResult<PathBuf> {
        let is_plain_name = !key.is_empty()
            && key != "."
            && key != ".."
            && !key.contains(['/', '\\', '\0']);
        if !is_plain_name {
            return Err(StorageError::InvalidKey(key.to_string()));
        }
        Ok(self.data_path.join(key))
    }
}

impl ObjectStore for FileObjectStore {
    fn load_object<T: DeserializeOwned>(&self, key: &str) -> StorageResult<Option<T>> {
        let path = self.object_path(key)?;
        if !FileManager::file_exists(&path) {
            debug!("No stored object for key {}", key);
            return Ok(None);
        }

        let bytes = FileManager::read_bytes(&path)?;
        let value = serde_json::from_slice(&bytes)?;
        debug!("Loaded {} ({} bytes)", key, bytes.len());
        Ok(Some(value))
    }

    fn save_object<T: Serialize>(&self, key: &str, value: &T) -> StorageResult<()> {
        let path = self.object_path(key)?;
        let bytes = serde_json::to_vec(value)?;
        FileManager::write_bytes(&path, &bytes)?;
        debug!("Saved {} ({} bytes)", key, bytes.len());
        Ok(())
    }

    fn list_entries(&self) -> StorageResult<Vec<StoreEntry>> {
        if !FileManager::dir_exists(&self.data_path) {
            debug!("Data directory {:?} does not exist yet", self.data_path);
            return Ok(Vec::new());
        }
        FileManager::list_dir(&self.data_path)
    }
}
