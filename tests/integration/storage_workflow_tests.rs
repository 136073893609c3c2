/*!
 * Integration tests for the load / add / save workflow on disk
 */

use anyhow::Result;
use substore::{
    FileObjectStore, ObjectStore, StorageType, SubtitleMode, SubtitleStorageManager,
    VideoSubtitleCollection,
};
use crate::common;

/// Test the full fetch-bookkeeping cycle a host runs for one video
#[test]
fn test_storage_workflow_withFileStore_shouldPersistWholeCollection() -> Result<()> {
    common::init_logging();
    let temp_dir = common::create_temp_dir()?;
    let manager = common::file_manager(&temp_dir);

    // 1. First lookup creates and persists an empty collection
    let mut collection = manager.load_or_create("12345", "Example Movie")?;
    assert!(collection.is_empty());
    assert!(temp_dir.path().join("DataItems").join("subs_12345").exists());

    // 2. Record two fetched subtitles
    let a = common::candidate("OpenSubtitles", "abc", 10, "Hello");
    let b = common::candidate("Subscene", "xyz", 5, "World");
    assert!(collection.add("1", "eng", &a, StorageType::Filesystem, None, SubtitleMode::Auto)?);
    assert!(collection.add("1", "eng", &b, StorageType::Filesystem, None, SubtitleMode::Manual)?);
    manager.save(&collection)?;

    // 3. A later lookup sees everything that was saved
    let reloaded = manager.load("12345")?.expect("collection should be stored");
    assert_eq!(reloaded, collection);
    assert_eq!(reloaded.get_any("1", "eng").unwrap().provider_name, "Subscene");
    assert_eq!(reloaded.to_string(), "Example Movie (12345)");

    Ok(())
}

/// Test that load_or_create does not replace an existing collection
#[test]
fn test_load_or_create_calledTwice_shouldKeepFirstTitle() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let manager = common::file_manager(&temp_dir);

    manager.load_or_create(42, "Original Title")?;
    let second = manager.load_or_create(42, "Renamed Title")?;

    assert_eq!(second.title, "Original Title");
    assert_eq!(second.version, Some(manager.version()));
    assert_eq!(manager.list_all_storage_files()?, vec!["subs_42"]);

    Ok(())
}

/// Test that the last save wins when two copies are updated independently
#[test]
fn test_save_withStaleCopy_shouldOverwriteNewerData() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let manager = common::file_manager(&temp_dir);

    let mut first = manager.load_or_create("7", "Race")?;
    let mut second = manager.load_or_create("7", "Race")?;

    let sub_a = common::candidate("OpenSubtitles", "a", 1, "A");
    first.add("1", "eng", &sub_a, StorageType::Filesystem, None, SubtitleMode::Auto)?;
    manager.save(&first)?;

    let sub_b = common::candidate("Subscene", "b", 1, "B");
    second.add("1", "eng", &sub_b, StorageType::Filesystem, None, SubtitleMode::Auto)?;
    manager.save(&second)?;

    let stored = manager.load("7")?.unwrap();
    assert_eq!(stored.record_count(), 1);
    assert_eq!(stored.get_any("1", "eng").unwrap().provider_name, "Subscene");

    Ok(())
}

/// Test that unknown videos are reported as absent
#[test]
fn test_load_withUnknownVideo_shouldReturnNone() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let manager = common::file_manager(&temp_dir);

    assert!(manager.load("does-not-exist")?.is_none());
    assert!(manager.list_all_storage_files()?.is_empty());

    Ok(())
}

/// Test that a corrupt stored file surfaces as an error instead of absence
#[test]
fn test_load_withCorruptFile_shouldPropagateError() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let data_dir = temp_dir.path().join("DataItems");
    std::fs::create_dir_all(&data_dir)?;
    common::create_test_file(&data_dir, "subs_9", "{ truncated")?;
    let manager = SubtitleStorageManager::new(FileObjectStore::new(&data_dir));

    assert!(manager.load("9").is_err());

    Ok(())
}

/// Test that the stored JSON uses an explicit current pointer per bucket
#[test]
fn test_stored_layout_shouldSeparateRecordsAndCurrent() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let manager = common::file_manager(&temp_dir);
    let mut collection = manager.load_or_create("1", "Layout")?;
    let odd = common::candidate("current", "1", 3, "odd");
    collection.add("1", "eng", &odd, StorageType::Filesystem, None, SubtitleMode::Auto)?;
    manager.save(&collection)?;

    let raw: serde_json::Value = manager
        .store()
        .load_object("subs_1")?
        .expect("raw object");
    let bucket = &raw["parts"]["1"]["eng"];

    assert_eq!(bucket["records"].as_array().map(Vec::len), Some(1));
    assert_eq!(bucket["current"]["provider_name"], "current");
    assert_eq!(bucket["current"]["subtitle_id"], "1");

    let reloaded: VideoSubtitleCollection = serde_json::from_value(raw)?;
    assert_eq!(reloaded, collection);

    Ok(())
}
