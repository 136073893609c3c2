/*!
 * Stored subtitle records and the small value types they carry.
 *
 * A `SubtitleRecord` describes a subtitle that was already fetched and
 * scored elsewhere. The record keeps the raw bytes inline together with an
 * MD5 digest taken when the record was built.
 */

use std::convert::Infallible;
use std::fmt;

use chrono::{DateTime, Utc};
use md5::{Digest, Md5};
use serde::{Deserialize, Serialize};

use crate::errors::{StorageError, StorageResult};

/// Label returned for mode codes missing from the label table
pub const UNKNOWN_MODE_LABEL: &str = "Unknown";

/// Look up the display label for a one-letter mode code
pub fn mode_label(code: &str) -> Option<&'static str> {
    match code {
        "a" => Some("Auto"),
        "m" => Some("Manual"),
        "b" => Some("Auto-Better"),
        _ => None,
    }
}

/// Selection origin of a stored subtitle
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum SubtitleMode {
    /// Picked automatically (`a`)
    #[default]
    Auto,
    /// Picked by the user (`m`)
    Manual,
    /// Replaced automatically by a better match (`b`)
    AutoBetter,
    /// Code not known to this crate, kept verbatim
    Other(String),
}

impl SubtitleMode {
    /// One-letter storage code
    pub fn code(&self) -> &str {
        match self {
            SubtitleMode::Auto => "a",
            SubtitleMode::Manual => "m",
            SubtitleMode::AutoBetter => "b",
            SubtitleMode::Other(code) => code,
        }
    }

    /// Human-readable label, `"Unknown"` for unrecognized codes
    pub fn label(&self) -> &'static str {
        mode_label(self.code()).unwrap_or(UNKNOWN_MODE_LABEL)
    }
}

impl From<&str> for SubtitleMode {
    fn from(code: &str) -> Self {
        match code {
            "a" => SubtitleMode::Auto,
            "m" => SubtitleMode::Manual,
            "b" => SubtitleMode::AutoBetter,
            other => SubtitleMode::Other(other.to_string()),
        }
    }
}

impl From<String> for SubtitleMode {
    fn from(code: String) -> Self {
        Self::from(code.as_str())
    }
}

impl From<SubtitleMode> for String {
    fn from(mode: SubtitleMode) -> Self {
        mode.code().to_string()
    }
}

impl fmt::Display for SubtitleMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

impl std::str::FromStr for SubtitleMode {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::from(s))
    }
}

/// Where the subtitle bytes are physically kept
///
/// The tag is owned by the host; unknown tags round-trip unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum StorageType {
    /// Written next to the media file
    Filesystem,
    /// Stored in the host's metadata bundle
    Metadata,
    /// Any other host-defined tag
    Other(String),
}

impl StorageType {
    /// Tag as stored
    pub fn as_str(&self) -> &str {
        match self {
            StorageType::Filesystem => "filesystem",
            StorageType::Metadata => "metadata",
            StorageType::Other(tag) => tag,
        }
    }
}

impl From<&str> for StorageType {
    fn from(tag: &str) -> Self {
        match tag {
            "filesystem" => StorageType::Filesystem,
            "metadata" => StorageType::Metadata,
            other => StorageType::Other(other.to_string()),
        }
    }
}

impl From<String> for StorageType {
    fn from(tag: String) -> Self {
        Self::from(tag.as_str())
    }
}

impl From<StorageType> for String {
    fn from(storage_type: StorageType) -> Self {
        storage_type.as_str().to_string()
    }
}

impl fmt::Display for StorageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Score value as handed over by the caller, before integer coercion
#[derive(Debug, Clone, PartialEq)]
pub enum RawScore {
    Int(i64),
    Float(f64),
    Text(String),
}

impl RawScore {
    /// Coerce to an integer score
    ///
    /// Floats truncate toward zero. Text must hold an integer literal
    /// (surrounding whitespace allowed).
    pub fn to_score(&self) -> StorageResult<i64> {
        match self {
            RawScore::Int(value) => Ok(*value),
            RawScore::Float(value) => {
                let truncated = value.trunc();
                // i64::MAX as f64 rounds up to 2^63, which is already out of range
                if !truncated.is_finite()
                    || truncated < i64::MIN as f64
                    || truncated >= i64::MAX as f64
                {
                    return Err(StorageError::InvalidScore(format!(
                        "{} cannot be converted to an integer",
                        value
                    )));
                }
                Ok(truncated as i64)
            }
            RawScore::Text(text) => text.trim().parse::<i64>().map_err(|_| {
                StorageError::InvalidScore(format!("'{}' is not an integer", text))
            }),
        }
    }
}

impl From<i64> for RawScore {
    fn from(value: i64) -> Self {
        RawScore::Int(value)
    }
}

impl From<i32> for RawScore {
    fn from(value: i32) -> Self {
        RawScore::Int(value.into())
    }
}

impl From<u32> for RawScore {
    fn from(value: u32) -> Self {
        RawScore::Int(value.into())
    }
}

impl From<f64> for RawScore {
    fn from(value: f64) -> Self {
        RawScore::Float(value)
    }
}

impl From<f32> for RawScore {
    fn from(value: f32) -> Self {
        RawScore::Float(value.into())
    }
}

impl From<&str> for RawScore {
    fn from(value: &str) -> Self {
        RawScore::Text(value.to_string())
    }
}

impl From<String> for RawScore {
    fn from(value: String) -> Self {
        RawScore::Text(value)
    }
}

/// Identity of a record inside one language bucket
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SubtitleKey {
    pub provider_name: String,
    pub subtitle_id: String,
}

impl SubtitleKey {
    pub fn new(provider_name: impl Into<String>, subtitle_id: impl ToString) -> Self {
        Self {
            provider_name: provider_name.into(),
            subtitle_id: subtitle_id.to_string(),
        }
    }
}

impl fmt::Display for SubtitleKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.provider_name, self.subtitle_id)
    }
}

/// Hex MD5 digest of raw subtitle bytes
pub fn content_hash(content: &[u8]) -> String {
    hex::encode(Md5::digest(content))
}

/// One stored subtitle instance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubtitleRecord {
    /// Relevance score assigned by the fetcher
    pub score: i64,
    /// Where the subtitle bytes live
    pub storage_type: StorageType,
    /// MD5 of `content` taken when the record was built
    pub content_hash: String,
    /// Provider the subtitle came from
    pub provider_name: String,
    /// Provider-side subtitle identifier
    pub subtitle_id: String,
    /// When the record was added
    pub date_added: DateTime<Utc>,
    /// How the subtitle was selected
    #[serde(default)]
    pub mode: SubtitleMode,
    /// Raw subtitle file content
    #[serde(default, with = "content_base64")]
    pub content: Option<Vec<u8>>,
}

impl SubtitleRecord {
    /// Build a record from already computed parts
    ///
    /// `hash` is trusted as given. Use [`SubtitleRecord::from_content`] to
    /// derive it from the bytes instead.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        score: impl Into<RawScore>,
        storage_type: StorageType,
        hash: impl Into<String>,
        provider_name: impl Into<String>,
        subtitle_id: impl ToString,
        date_added: Option<DateTime<Utc>>,
        mode: SubtitleMode,
        content: Option<Vec<u8>>,
    ) -> StorageResult<Self> {
        Ok(Self {
            score: score.into().to_score()?,
            storage_type,
            content_hash: hash.into(),
            provider_name: provider_name.into(),
            subtitle_id: subtitle_id.to_string(),
            date_added: date_added.unwrap_or_else(Utc::now),
            mode,
            content,
        })
    }

    /// Build a record whose hash is computed from `content`
    pub fn from_content(
        score: impl Into<RawScore>,
        storage_type: StorageType,
        provider_name: impl Into<String>,
        subtitle_id: impl ToString,
        date_added: Option<DateTime<Utc>>,
        mode: SubtitleMode,
        content: Vec<u8>,
    ) -> StorageResult<Self> {
        let hash = content_hash(&content);
        Self::new(
            score,
            storage_type,
            hash,
            provider_name,
            subtitle_id,
            date_added,
            mode,
            Some(content),
        )
    }

    /// Display label of the selection mode
    pub fn mode_verbose(&self) -> &'static str {
        self.mode.label()
    }

    /// Key this record is filed under
    pub fn key(&self) -> SubtitleKey {
        SubtitleKey::new(self.provider_name.clone(), &self.subtitle_id)
    }
}

/// Subtitle handed in for storage
///
/// Implemented by whatever type the fetching side produces.
pub trait SubtitleSource {
    fn provider_name(&self) -> &str;
    fn id(&self) -> String;
    fn score(&self) -> RawScore;
    fn content(&self) -> &[u8];
}

/// Plain subtitle candidate
#[derive(Debug, Clone, PartialEq)]
pub struct SubtitleCandidate {
    pub provider_name: String,
    pub id: String,
    pub score: RawScore,
    pub content: Vec<u8>,
}

impl SubtitleCandidate {
    pub fn new(
        provider_name: impl Into<String>,
        id: impl ToString,
        score: impl Into<RawScore>,
        content: impl Into<Vec<u8>>,
    ) -> Self {
        Self {
            provider_name: provider_name.into(),
            id: id.to_string(),
            score: score.into(),
            content: content.into(),
        }
    }
}

impl SubtitleSource for SubtitleCandidate {
    fn provider_name(&self) -> &str {
        &self.provider_name
    }

    fn id(&self) -> String {
        self.id.clone()
    }

    fn score(&self) -> RawScore {
        self.score.clone()
    }

    fn content(&self) -> &[u8] {
        &self.content
    }
}

// Inline bytes are kept as base64 text rather than a JSON number array
mod content_base64 {
    use base64::{Engine as _, engine::general_purpose::STANDARD};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(content: &Option<Vec<u8>>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match content {
            Some(bytes) => serializer.serialize_some(&STANDARD.encode(bytes)),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<Vec<u8>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let encoded: Option<String> = Option::deserialize(deserializer)?;
        encoded
            .map(|text| STANDARD.decode(text).map_err(serde::de::Error::custom))
            .transpose()
    }
}
