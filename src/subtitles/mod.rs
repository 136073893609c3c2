/*!
 * Subtitle data model.
 *
 * - `models`: stored records, mode and storage tags, score coercion
 * - `collection`: per-video bucketing and current-record selection
 */

pub mod collection;
pub mod models;

// Re-export main types
pub use collection::{LanguageBucket, PartSubtitles, VideoSubtitleCollection};
pub use models::{
    RawScore, StorageType, SubtitleCandidate, SubtitleKey, SubtitleMode, SubtitleRecord,
    SubtitleSource, content_hash, mode_label,
};
