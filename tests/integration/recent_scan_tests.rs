/*!
 * Integration tests for recent-collection scans
 */

use anyhow::Result;
use chrono::{Duration, Utc};
use substore::{AgePolicy, MemoryObjectStore, SubtitleStorageManager, VideoSubtitleCollection};
use crate::common;

/// Test that only prefixed files inside the window are listed on disk
#[test]
fn test_list_recent_withFileStore_shouldSkipForeignFiles() -> Result<()> {
    common::init_logging();
    let temp_dir = common::create_temp_dir()?;
    let manager = common::file_manager(&temp_dir);

    manager.load_or_create("1", "One")?;
    manager.load_or_create("2", "Two")?;
    common::create_test_file(&temp_dir.path().join("DataItems"), "settings.json", "{}")?;

    let all = manager.list_all_storage_files()?;
    assert_eq!(all, vec!["settings.json", "subs_1", "subs_2"]);

    let recent = manager.list_recent_storage_files(30)?;
    assert_eq!(recent, vec!["subs_1", "subs_2"]);

    // Everything on disk was written moments ago
    let far_future = Utc::now() + Duration::days(31);
    assert!(manager.list_recent_storage_files_at(30, far_future)?.is_empty());

    Ok(())
}

/// Test that the full listing keeps directories while recent scans only consider files
#[test]
fn test_list_withSubdirectory_shouldListItButNotScanIt() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let manager = common::file_manager(&temp_dir);

    manager.load_or_create("1", "One")?;
    std::fs::create_dir(temp_dir.path().join("DataItems").join("subs_dir"))?;

    assert_eq!(manager.list_all_storage_files()?, vec!["subs_1", "subs_dir"]);
    assert_eq!(manager.list_recent_storage_files(30)?, vec!["subs_1"]);
    assert_eq!(manager.load_recent(30)?.len(), 1);

    Ok(())
}

/// Test that the widest possible window lists every collection instead of failing
#[test]
fn test_list_recent_withMaximumWindow_shouldListEverything() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let manager = common::file_manager(&temp_dir);

    manager.load_or_create("1", "One")?;
    manager.load_or_create("2", "Two")?;

    assert_eq!(manager.list_recent_storage_files(u32::MAX)?, vec!["subs_1", "subs_2"]);
    assert_eq!(manager.load_recent(u32::MAX)?.len(), 2);

    Ok(())
}

/// Test that load_recent maps file names to collections on disk
#[test]
fn test_load_recent_withFileStore_shouldLoadEachCollection() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let manager = common::file_manager(&temp_dir).with_age_policy(AgePolicy::ModifiedWithinWindow);

    manager.load_or_create("10", "Ten")?;
    manager.load_or_create("11", "Eleven")?;

    let recent = manager.load_recent(7)?;

    assert_eq!(recent.len(), 2);
    assert_eq!(recent["subs_10"].to_string(), "Ten (10)");
    assert_eq!(recent["subs_11"].title, "Eleven");

    Ok(())
}

/// Test how the two age policies treat a collection created long ago but updated recently
#[test]
fn test_load_recent_withOldButUpdatedCollection_shouldDependOnPolicy() -> Result<()> {
    let now = Utc::now();
    let store = MemoryObjectStore::new();
    let collection = VideoSubtitleCollection::new("5", "Old Show", Some(1));
    store.save_object_at("subs_5", &collection, now - Duration::days(120))?;
    store.save_object_at("subs_5", &collection, now - Duration::days(3))?;

    let by_added = SubtitleStorageManager::new(store.clone());
    assert!(by_added.load_recent_at(30, now)?.is_empty());

    let by_modified =
        SubtitleStorageManager::new(store).with_age_policy(AgePolicy::ModifiedWithinWindow);
    let recent = by_modified.load_recent_at(30, now)?;
    assert_eq!(recent.keys().collect::<Vec<_>>(), vec!["subs_5"]);

    Ok(())
}
