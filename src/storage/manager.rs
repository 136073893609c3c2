/*!
 * Storage manager for per-video subtitle collections.
 *
 * This module handles:
 * - Mapping video ids to store keys
 * - Loading a collection, or creating and persisting an empty one
 * - Whole-object saves (last write wins)
 * - Listing and loading recently stored collections
 *
 * Load, mutate and save is not atomic. Callers updating the same video from
 * several places must serialize those updates themselves.
 */

use chrono::{DateTime, Duration, Utc};
use log::{debug, info};
use std::collections::BTreeMap;
use std::fmt;

use crate::errors::StorageResult;
use crate::subtitles::VideoSubtitleCollection;

use super::{AgePolicy, ObjectStore};

/// Prefix of every subtitle collection key
pub const STORAGE_KEY_PREFIX: &str = "subs_";

/// Schema version stamped on newly created collections
pub const CURRENT_VERSION: u32 = 1;

/// Default window for recent-collection scans
pub const DEFAULT_RECENT_AGE_DAYS: u32 = 30;

/// Store key of a video's collection
pub fn storage_key(video_id: impl fmt::Display) -> String {
    format!("{}{}", STORAGE_KEY_PREFIX, video_id)
}

/// Loads and saves `VideoSubtitleCollection`s through an object store
pub struct SubtitleStorageManager<S: ObjectStore> {
    /// Backing store
    store: S,
    /// Timestamp used by recent scans
    age_policy: AgePolicy,
}

impl<S: ObjectStore> SubtitleStorageManager<S> {
    /// Create a manager over `store` with the default age policy
    pub fn new(store: S) -> Self {
        Self {
            store,
            age_policy: AgePolicy::default(),
        }
    }

    /// Use a different age policy for recent scans
    pub fn with_age_policy(mut self, age_policy: AgePolicy) -> Self {
        self.age_policy = age_policy;
        self
    }

    /// Get the underlying store
    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn age_policy(&self) -> AgePolicy {
        self.age_policy
    }

    /// Schema version given to new collections
    pub fn version(&self) -> u32 {
        CURRENT_VERSION
    }

    pub fn storage_key(&self, video_id: impl fmt::Display) -> String {
        storage_key(video_id)
    }

    /// Load a video's collection, `None` if it was never saved
    pub fn load(
        &self,
        video_id: impl fmt::Display,
    ) -> StorageResult<Option<VideoSubtitleCollection>> {
        self.store.load_object(&storage_key(video_id))
    }

    /// Load a video's collection, creating and saving an empty one on a miss
    ///
    /// `title` is only used when a new collection is created.
    pub fn load_or_create(
        &self,
        video_id: impl fmt::Display,
        title: &str,
    ) -> StorageResult<VideoSubtitleCollection> {
        let video_id = video_id.to_string();
        if let Some(existing) = self.load(&video_id)? {
            return Ok(existing);
        }

        info!("Creating subtitle storage for {} ({})", title, video_id);
        let collection = VideoSubtitleCollection::new(&video_id, title, Some(CURRENT_VERSION));
        self.save(&collection)?;
        Ok(collection)
    }

    /// Persist the whole collection, replacing what was stored before
    pub fn save(&self, collection: &VideoSubtitleCollection) -> StorageResult<()> {
        let key = storage_key(&collection.video_id);
        debug!(
            "Saving {} ({} subtitle records)",
            key,
            collection.record_count()
        );
        self.store.save_object(&key, collection)
    }

    /// Every entry name in the store's data area, unfiltered
    pub fn list_all_storage_files(&self) -> StorageResult<Vec<String>> {
        Ok(self
            .store
            .list_entries()?
            .into_iter()
            .map(|entry| entry.name)
            .collect())
    }

    /// Collection files stored within the last `age_days` days
    pub fn list_recent_storage_files(&self, age_days: u32) -> StorageResult<Vec<String>> {
        self.list_recent_storage_files_at(age_days, Utc::now())
    }

    /// Same as [`Self::list_recent_storage_files`] with an explicit "now"
    pub fn list_recent_storage_files_at(
        &self,
        age_days: u32,
        now: DateTime<Utc>,
    ) -> StorageResult<Vec<String>> {
        // A window reaching past chrono's range covers everything
        let cutoff = now
            .checked_sub_signed(Duration::days(i64::from(age_days)))
            .unwrap_or(DateTime::<Utc>::MIN_UTC);

        let recent: Vec<String> = self
            .store
            .list_entries()?
            .into_iter()
            .filter(|entry| entry.is_file && entry.name.starts_with(STORAGE_KEY_PREFIX))
            .filter(|entry| entry.timestamp(self.age_policy) > cutoff)
            .map(|entry| entry.name)
            .collect();

        debug!(
            "{} collection(s) within {} day(s) ({})",
            recent.len(),
            age_days,
            self.age_policy
        );
        Ok(recent)
    }

    /// Load every collection stored within the last `age_days` days, keyed by file name
    pub fn load_recent(
        &self,
        age_days: u32,
    ) -> StorageResult<BTreeMap<String, VideoSubtitleCollection>> {
        self.load_recent_at(age_days, Utc::now())
    }

    /// Same as [`Self::load_recent`] with an explicit "now"
    pub fn load_recent_at(
        &self,
        age_days: u32,
        now: DateTime<Utc>,
    ) -> StorageResult<BTreeMap<String, VideoSubtitleCollection>> {
        let mut out = BTreeMap::new();
        for name in self.list_recent_storage_files_at(age_days, now)? {
            match self.store.load_object::<VideoSubtitleCollection>(&name)? {
                Some(collection) => {
                    out.insert(name, collection);
                }
                // Listed but gone by the time it was read
                None => debug!("Skipping {}: no longer stored", name),
            }
        }
        Ok(out)
    }
}
