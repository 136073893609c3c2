/*!
 * Per-video subtitle bookkeeping.
 *
 * A `VideoSubtitleCollection` files records by media part, then by language.
 * Each language bucket holds its records plus an explicit pointer to the
 * record currently selected for that part and language.
 */

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};
use log::debug;
use serde::{Deserialize, Serialize};

use crate::errors::StorageResult;

use super::models::{StorageType, SubtitleKey, SubtitleMode, SubtitleRecord, SubtitleSource};

/// Records for one part and language, plus the current selection
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LanguageBucket {
    #[serde(with = "records_as_seq")]
    records: BTreeMap<SubtitleKey, SubtitleRecord>,
    #[serde(default)]
    current: Option<SubtitleKey>,
}

impl LanguageBucket {
    /// Record currently selected, if any
    pub fn current(&self) -> Option<&SubtitleRecord> {
        self.current.as_ref().and_then(|key| self.records.get(key))
    }

    /// Key of the current selection
    pub fn current_key(&self) -> Option<&SubtitleKey> {
        self.current.as_ref()
    }

    pub fn get(&self, key: &SubtitleKey) -> Option<&SubtitleRecord> {
        self.records.get(key)
    }

    pub fn contains(&self, key: &SubtitleKey) -> bool {
        self.records.contains_key(key)
    }

    /// All records, ordered by key
    pub fn records(&self) -> impl Iterator<Item = &SubtitleRecord> {
        self.records.values()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Insert unless the key is taken; a successful insert becomes current
    fn insert(&mut self, record: SubtitleRecord) -> bool {
        let key = record.key();
        if self.records.contains_key(&key) {
            return false;
        }
        self.records.insert(key.clone(), record);
        self.current = Some(key);
        true
    }
}

/// Languages of one media part
pub type PartSubtitles = BTreeMap<String, LanguageBucket>;

/// Stored subtitles of one video
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VideoSubtitleCollection {
    /// Host identifier of the video
    pub video_id: String,
    /// Display title, informational only
    pub title: String,
    /// Part id -> language -> bucket
    #[serde(default)]
    pub parts: BTreeMap<String, PartSubtitles>,
    /// Schema version the collection was created with
    #[serde(default)]
    pub version: Option<u32>,
}

impl VideoSubtitleCollection {
    pub fn new(video_id: impl ToString, title: impl Into<String>, version: Option<u32>) -> Self {
        Self {
            video_id: video_id.to_string(),
            title: title.into(),
            parts: BTreeMap::new(),
            version,
        }
    }

    pub fn video_id(&self) -> &str {
        &self.video_id
    }

    /// Key under which a provider's subtitle is filed
    pub fn sub_key(provider_name: &str, id: impl ToString) -> SubtitleKey {
        SubtitleKey::new(provider_name, id)
    }

    /// Store a subtitle for a part and language
    ///
    /// Returns `Ok(false)` when the same provider and id are already stored
    /// for that part and language; the existing record and the current
    /// selection are left alone. A new record becomes current. Nothing is
    /// persisted here.
    pub fn add<S: SubtitleSource + ?Sized>(
        &mut self,
        part_id: impl ToString,
        lang: &str,
        subtitle: &S,
        storage_type: StorageType,
        date_added: Option<DateTime<Utc>>,
        mode: SubtitleMode,
    ) -> StorageResult<bool> {
        let part_id = part_id.to_string();
        let key = Self::sub_key(subtitle.provider_name(), subtitle.id());

        if self
            .bucket(&part_id, lang)
            .is_some_and(|bucket| bucket.contains(&key))
        {
            debug!(
                "Subtitle {} already stored for {} part {} [{}]",
                key, self.video_id, part_id, lang
            );
            return Ok(false);
        }

        let record = SubtitleRecord::from_content(
            subtitle.score(),
            storage_type,
            key.provider_name.clone(),
            &key.subtitle_id,
            date_added,
            mode,
            subtitle.content().to_vec(),
        )?;

        let bucket = self
            .parts
            .entry(part_id.clone())
            .or_default()
            .entry(lang.to_string())
            .or_default();
        let added = bucket.insert(record);

        if added {
            debug!(
                "Stored subtitle {} for {} part {} [{}]",
                key, self.video_id, part_id, lang
            );
        }

        Ok(added)
    }

    /// Currently selected record for a part and language
    pub fn get_any(&self, part_id: impl ToString, lang: &str) -> Option<&SubtitleRecord> {
        self.bucket(&part_id.to_string(), lang)?.current()
    }

    /// A specific record, whether or not it is current
    pub fn get(
        &self,
        part_id: impl ToString,
        lang: &str,
        key: &SubtitleKey,
    ) -> Option<&SubtitleRecord> {
        self.bucket(&part_id.to_string(), lang)?.get(key)
    }

    pub fn bucket(&self, part_id: &str, lang: &str) -> Option<&LanguageBucket> {
        self.parts.get(part_id)?.get(lang)
    }

    /// Number of records across all parts and languages
    pub fn record_count(&self) -> usize {
        self.parts
            .values()
            .flat_map(|languages| languages.values())
            .map(LanguageBucket::len)
            .sum()
    }

    pub fn is_empty(&self) -> bool {
        self.record_count() == 0
    }
}

impl fmt::Display for VideoSubtitleCollection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.title, self.video_id)
    }
}

impl AsRef<str> for VideoSubtitleCollection {
    fn as_ref(&self) -> &str {
        &self.video_id
    }
}

// The key is derived from the record, so the map is written as a plain list
mod records_as_seq {
    use std::collections::BTreeMap;

    use serde::{Deserialize, Deserializer, Serializer};

    use crate::subtitles::models::{SubtitleKey, SubtitleRecord};

    pub fn serialize<S>(
        records: &BTreeMap<SubtitleKey, SubtitleRecord>,
        serializer: S,
    ) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_seq(records.values())
    }

    pub fn deserialize<'de, D>(
        deserializer: D,
    ) -> Result<BTreeMap<SubtitleKey, SubtitleRecord>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let records: Vec<SubtitleRecord> = Vec::deserialize(deserializer)?;
        let mut map = BTreeMap::new();
        for record in records {
            // First occurrence wins, same as `add`
            map.entry(record.key()).or_insert(record);
        }
        Ok(map)
    }
}
