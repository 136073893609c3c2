/*!
 * Common test utilities for the substore test suite
 */

use std::fs;
use std::path::{Path, PathBuf};
use anyhow::Result;
use tempfile::TempDir;

use substore::{FileObjectStore, SubtitleCandidate, SubtitleStorageManager};

/// Creates a temporary directory for test files
pub fn create_temp_dir() -> Result<TempDir> {
    Ok(TempDir::new()?)
}

/// Creates a test file with the given content in the specified directory
pub fn create_test_file(dir: &Path, filename: &str, content: &str) -> Result<PathBuf> {
    let file_path = dir.join(filename);
    fs::write(&file_path, content)?;
    Ok(file_path)
}

/// Route library log output through the test harness
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Manager over a fresh data directory inside `temp_dir`
pub fn file_manager(temp_dir: &TempDir) -> SubtitleStorageManager<FileObjectStore> {
    SubtitleStorageManager::new(FileObjectStore::new(temp_dir.path().join("DataItems")))
}

/// Small SRT body used as subtitle content
pub fn srt_content(text: &str) -> Vec<u8> {
    format!("1\n00:00:01,000 --> 00:00:04,000\n{}\n", text).into_bytes()
}

/// Subtitle candidate with an SRT body
pub fn candidate(provider: &str, id: &str, score: i64, text: &str) -> SubtitleCandidate {
    SubtitleCandidate::new(provider, id, score, srt_content(text))
}
