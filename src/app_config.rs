use anyhow::{Context, Result, anyhow};
use log::warn;
use serde::{Deserialize, Serialize};
use std::default::Default;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use crate::storage::{AgePolicy, DEFAULT_RECENT_AGE_DAYS, FileObjectStore};

/// Storage configuration module
/// This module handles loading, validating and saving the settings that
/// locate the data directory and drive recent-collection scans.
/// Represents the storage configuration
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct StorageConfig {
    /// Directory holding the stored collections
    /// Falls back to the platform data directory when unset
    #[serde(default)]
    pub data_path: Option<PathBuf>,

    /// Window used by recent scans, in days
    #[serde(default = "default_recent_age_days")]
    pub recent_age_days: u32,

    /// Timestamp recent scans compare against
    #[serde(default)]
    pub age_policy: AgePolicy,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// Log verbosity level
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    // @returns: Matching log crate filter
    pub fn to_level_filter(&self) -> log::LevelFilter {
        match self {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

fn default_recent_age_days() -> u32 {
    DEFAULT_RECENT_AGE_DAYS
}

impl StorageConfig {
    /// Load configuration from a JSON file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)
            .with_context(|| format!("Failed to open config file: {:?}", path))?;

        let reader = BufReader::new(file);
        let config: StorageConfig = serde_json::from_reader(reader)
            .with_context(|| format!("Failed to parse config file: {:?}", path))?;

        Ok(config)
    }

    /// Load configuration, writing a default file first if none exists
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if path.exists() {
            return Self::load(path);
        }

        warn!("Config file not found at {:?}, creating default config.", path);
        let config = Self::default();
        config.save(path)?;
        Ok(config)
    }

    /// Write configuration as pretty JSON
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let config_json = serde_json::to_string_pretty(self)
            .context("Failed to serialize config to JSON")?;

        std::fs::write(path, config_json)
            .with_context(|| format!("Failed to write config to file: {:?}", path))?;

        Ok(())
    }

    /// Validate the configuration for consistency and required values
    pub fn validate(&self) -> Result<()> {
        if self
            .data_path
            .as_ref()
            .is_some_and(|path| path.as_os_str().is_empty())
        {
            return Err(anyhow!("data_path must not be empty when set"));
        }

        Ok(())
    }

    /// Data directory to use, resolving the platform default when unset
    pub fn resolved_data_path(&self) -> Result<PathBuf> {
        match &self.data_path {
            Some(path) => Ok(path.clone()),
            None => Ok(FileObjectStore::default_data_path()?),
        }
    }
}

/// Default implementation for StorageConfig
impl Default for StorageConfig {
    fn default() -> Self {
        StorageConfig {
            data_path: None,
            recent_age_days: default_recent_age_days(),
            age_policy: AgePolicy::default(),
            log_level: LogLevel::default(),
        }
    }
}
