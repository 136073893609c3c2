/*!
 * # substore - subtitle storage bookkeeping
 * 
 * A Rust library that records which subtitles have been fetched for a video,
 * per media part and language.
 * 
 * ## Features
 * 
 * - Per-video subtitle collections keyed by part and language
 * - First-write-wins deduplication on (provider, subtitle id)
 * - A "current" record per part and language, moved on every new add
 * - MD5 content hashes taken when a record is built
 * - Pluggable object stores:
 *   - Directory store (one JSON file per video)
 *   - In-memory store
 * - Age-based scans over stored collections
 * 
 * ## Architecture
 * 
 * The library is organized in these main modules:
 * - `subtitles`: Data model:
 *   - `subtitles::models`: Stored records, modes, storage tags
 *   - `subtitles::collection`: Per-video collections and language buckets
 * - `storage`: Persistence:
 *   - `storage::manager`: Load/create/save and recent scans
 *   - `storage::file_store`: Directory-backed object store
 *   - `storage::memory_store`: In-memory object store
 * - `app_config`: Configuration management
 * - `file_utils`: File system operations
 * - `errors`: Custom error types for the library
 * 
 * ## License
 * 
 * This project is licensed under the MIT License
 */

// Global lints configuration
// These lints will be allowed but not auto-fixed
#![allow(clippy::uninlined_format_args)]

// Public modules
pub mod app_config;
pub mod errors;
pub mod file_utils;
pub mod storage;
pub mod subtitles;

// Re-export main types for easier usage
pub use app_config::StorageConfig;
pub use errors::{StorageError, StorageResult};
pub use storage::{
    AgePolicy, FileObjectStore, MemoryObjectStore, ObjectStore, SubtitleStorageManager,
};
pub use subtitles::{
    StorageType, SubtitleCandidate, SubtitleKey, SubtitleMode, SubtitleRecord, SubtitleSource,
    VideoSubtitleCollection,
};
