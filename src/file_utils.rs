use chrono::{DateTime, Utc};
use log::warn;
use std::fs;
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;
use walkdir::WalkDir;

use crate::errors::{StorageError, StorageResult};

// @module: File and directory utilities

// @struct: Directory entry with the timestamps used for age scans
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileEntry {
    pub name: String,
    // @field: False for directories, symlinks and other special entries
    pub is_file: bool,
    // @field: Birth time, None where the filesystem does not record it
    pub created: Option<DateTime<Utc>>,
    pub modified: DateTime<Utc>,
}

// @struct: File operations utility
pub struct FileManager;

impl FileManager {
    // @checks: File existence
    pub fn file_exists<P: AsRef<Path>>(path: P) -> bool {
        path.as_ref().exists() && path.as_ref().is_file()
    }

    // @checks: Directory existence
    pub fn dir_exists<P: AsRef<Path>>(path: P) -> bool {
        path.as_ref().exists() && path.as_ref().is_dir()
    }

    // @creates: Directory and parents if needed
    pub fn ensure_dir<P: AsRef<Path>>(path: P) -> StorageResult<()> {
        let path = path.as_ref();
        if !path.exists() {
            fs::create_dir_all(path).map_err(|e| StorageError::io(path, e))?;
        }
        Ok(())
    }

    /// Read a whole file into memory
    pub fn read_bytes<P: AsRef<Path>>(path: P) -> StorageResult<Vec<u8>> {
        let path = path.as_ref();
        fs::read(path).map_err(|e| StorageError::io(path, e))
    }

    /// Write bytes to a file, creating the parent directory first
    ///
    /// The bytes go to a temporary file next to `path` which is then renamed
    /// over it, so readers see either the old or the new content.
    pub fn write_bytes<P: AsRef<Path>>(path: P, content: &[u8]) -> StorageResult<()> {
        let path = path.as_ref();
        let parent = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        Self::ensure_dir(parent)?;

        let mut temp = NamedTempFile::new_in(parent).map_err(|e| StorageError::io(parent, e))?;
        temp.write_all(content)
            .and_then(|_| temp.as_file().sync_all())
            .map_err(|e| StorageError::io(temp.path(), e))?;
        temp.persist(path).map_err(|e| StorageError::io(path, e.error))?;
        Ok(())
    }

    /// List every entry directly inside `dir`, sorted by name
    ///
    /// Symlinks are not followed. Entries whose name is not valid UTF-8 are
    /// skipped with a warning.
    pub fn list_dir<P: AsRef<Path>>(dir: P) -> StorageResult<Vec<FileEntry>> {
        let dir = dir.as_ref();
        let mut result = Vec::new();

        for entry in WalkDir::new(dir).min_depth(1).max_depth(1) {
            let entry = entry.map_err(|e| {
                let path = e.path().unwrap_or(dir).to_path_buf();
                let source = e
                    .into_io_error()
                    .unwrap_or_else(|| std::io::Error::other("directory walk failed"));
                StorageError::io(path, source)
            })?;

            let Some(name) = entry.file_name().to_str() else {
                warn!("Skipping entry with a non UTF-8 name: {:?}", entry.path());
                continue;
            };

            let metadata = entry
                .metadata()
                .map_err(|e| StorageError::io(entry.path(), e.into()))?;
            let modified = metadata
                .modified()
                .map_err(|e| StorageError::io(entry.path(), e))?;

            result.push(FileEntry {
                name: name.to_string(),
                is_file: entry.file_type().is_file(),
                created: metadata.created().ok().map(DateTime::<Utc>::from),
                modified: DateTime::<Utc>::from(modified),
            });
        }

        result.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(result)
    }
}
