/*!
 * Tests for storage configuration functionality
 */

use std::path::PathBuf;
use anyhow::Result;
use substore::AgePolicy;
use substore::app_config::{LogLevel, StorageConfig};
use crate::common;

/// Test default configuration values
#[test]
fn test_default_config_withNoParameters_shouldHaveCorrectDefaults() {
    let config = StorageConfig::default();

    assert_eq!(config.data_path, None);
    assert_eq!(config.recent_age_days, 30);
    assert_eq!(config.age_policy, AgePolicy::AddedWithinWindow);
    assert_eq!(config.log_level, LogLevel::Info);
    assert!(config.validate().is_ok());
}

/// Test that missing fields fall back to defaults
#[test]
fn test_config_deserialize_withPartialJson_shouldFillDefaults() -> Result<()> {
    let config: StorageConfig = serde_json::from_str(
        r#"{ "data_path": "/srv/plex/DataItems", "age_policy": "modified_within_window" }"#,
    )?;

    assert_eq!(config.data_path, Some(PathBuf::from("/srv/plex/DataItems")));
    assert_eq!(config.age_policy, AgePolicy::ModifiedWithinWindow);
    assert_eq!(config.recent_age_days, 30);
    assert_eq!(config.log_level, LogLevel::Info);

    Ok(())
}

/// Test configuration validation
#[test]
fn test_config_validation_withEmptyDataPath_shouldFail() {
    let config = StorageConfig {
        data_path: Some(PathBuf::new()),
        ..StorageConfig::default()
    };

    assert!(config.validate().is_err());
}

/// Test that load_or_default writes a default file and reads it back
#[test]
fn test_load_or_default_withMissingFile_shouldCreateDefault() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let config_path = temp_dir.path().join("substore.json");

    let created = StorageConfig::load_or_default(&config_path)?;
    assert!(config_path.exists());

    let reloaded = StorageConfig::load(&config_path)?;
    assert_eq!(reloaded, created);

    Ok(())
}

/// Test that an invalid config file is reported
#[test]
fn test_load_withMalformedFile_shouldFail() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let config_path = common::create_test_file(temp_dir.path(), "substore.json", "{ not json")?;

    assert!(StorageConfig::load(&config_path).is_err());

    Ok(())
}

/// Test that an explicit data path wins over the platform default
#[test]
fn test_resolved_data_path_withExplicitPath_shouldUseIt() -> Result<()> {
    let config = StorageConfig {
        data_path: Some(PathBuf::from("/data/DataItems")),
        ..StorageConfig::default()
    };

    assert_eq!(config.resolved_data_path()?, PathBuf::from("/data/DataItems"));

    Ok(())
}

/// Test log level mapping
#[test]
fn test_log_level_toLevelFilter_shouldMapEachLevel() {
    assert_eq!(LogLevel::Error.to_level_filter(), log::LevelFilter::Error);
    assert_eq!(LogLevel::Debug.to_level_filter(), log::LevelFilter::Debug);
    assert_eq!(LogLevel::Trace.to_level_filter(), log::LevelFilter::Trace);
}
