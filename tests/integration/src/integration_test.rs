//! End-to-end integration tests for the viewer flow
//!
//! These tests exercise the complete flow: config file -> collection ->
//! engine options -> mounted engine on a shared channel.

use std::fs;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use demo_core::{
    Channel, ChangeOrigin, EngineOptions, FilePreferences, MemoryChannel, Phase, PreferenceStore,
    SyncEngine,
};
use demo_meta::{RetentionMode, ViewerConfig};
use demo_test_utils::{SwitchRecorder, TestCollection, demo_collection};
use pretty_assertions::assert_eq;
use tempfile::TempDir;

const CONFIG: &str = r#"
[viewer]
retention = "remove-after-interaction"
initial-variant = "Tailwind"

[collection]
id = "Basic"
title = "Basic demo"

[variants.Default]
main = { name = "component.tsx", source = "./component.tsx" }
files = { "styles.css" = "./styles.css" }

[variants.Premium]
main = { name = "component.tsx", source = "./premium/component.tsx" }
files = { "helper.ts" = "./premium/helper.ts" }

[variants.Tailwind]
main = { name = "index.tsx", source = "./tailwind/index.tsx" }

[transform]
"component.tsx" = "component.js"
"#;

/// Write the viewer config into a fresh temp dir
fn setup_config() -> (TempDir, PathBuf) {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("viewer.toml");
    fs::write(&path, CONFIG).unwrap();
    (temp, path)
}

fn mount_from_config(path: &Path, channel: &MemoryChannel, preferences: &FilePreferences) -> SyncEngine {
    let config = ViewerConfig::load(path).unwrap();
    let collection = config.collection().unwrap();
    let options = EngineOptions::from_config(&config)
        .unwrap()
        .with_preferences(Rc::new(preferences.clone()));
    SyncEngine::mount(collection, Rc::new(channel.clone()), options)
}

#[test]
fn test_config_drives_engine() {
    let (temp, path) = setup_config();
    let preferences = FilePreferences::with_dir(temp.path().join("prefs"));
    let channel = MemoryChannel::new(Some("basic:component.tsx"));

    let mut engine = mount_from_config(&path, &channel, &preferences);
    assert_eq!(engine.retention(), RetentionMode::RemoveAfterInteraction);
    assert_eq!(engine.collection().title(), "Basic demo");
    assert_eq!(engine.selected_file(), "component.tsx");
    assert_eq!(engine.display_file_name(), "component.js");
    assert_eq!(channel.write_count(), 0);

    // The shared link survives until the user acts
    engine.select_file("styles.css");
    assert_eq!(channel.writes(), vec![None]);

    // Selecting by display name maps back to the original file
    engine.select_file("component.js");
    assert_eq!(engine.selected_file(), "component.tsx");
    assert_eq!(
        engine.display_source().map(|source| source.as_str()),
        Some("./component.tsx")
    );
    assert_eq!(channel.write_count(), 1);
}

#[test]
fn test_initial_variant_from_config() {
    let (temp, path) = setup_config();
    let preferences = FilePreferences::with_dir(temp.path().join("prefs"));
    let channel = MemoryChannel::new(None);

    let engine = mount_from_config(&path, &channel, &preferences);
    assert_eq!(engine.selected_variant(), "Tailwind");
    assert_eq!(engine.selected_file(), "index.tsx");
    assert_eq!(engine.last_change_origin(), ChangeOrigin::Init);
}

#[test]
fn test_preference_persists_across_mounts() {
    let (temp, path) = setup_config();
    let preferences = FilePreferences::with_dir(temp.path().join("prefs"));

    let channel = MemoryChannel::new(None);
    let mut first = mount_from_config(&path, &channel, &preferences);
    first.select_variant("Premium");
    first.unmount();

    assert!(preferences.path().is_file());
    assert_eq!(
        preferences.get("Default:Premium:Tailwind").as_deref(),
        Some("Premium")
    );

    // Stored preference beats the configured initial variant
    let second = mount_from_config(&path, &MemoryChannel::new(None), &preferences);
    assert_eq!(second.selected_variant(), "Premium");
    assert_eq!(second.selected_file(), "component.tsx");

    // A link beats the stored preference
    let third = mount_from_config(&path, &MemoryChannel::new(Some("basic:styles.css")), &preferences);
    assert_eq!(third.selected_variant(), "Default");
    assert_eq!(third.selected_file(), "styles.css");
    assert_eq!(third.last_change_origin(), ChangeOrigin::Channel);
}

#[test]
fn test_unreadable_preferences_fall_back() {
    let (temp, path) = setup_config();
    let dir = temp.path().join("prefs");
    fs::create_dir_all(&dir).unwrap();
    fs::write(dir.join("preferences.toml"), "not = [valid").unwrap();
    let preferences = FilePreferences::with_dir(&dir);

    let engine = mount_from_config(&path, &MemoryChannel::new(None), &preferences);
    assert_eq!(engine.selected_variant(), "Tailwind");
}

#[test]
fn test_viewers_of_different_collections_share_channel() {
    let other = TestCollection::new("OtherDemo")
        .variant("Default", "file.tsx", &["second.tsx"])
        .build();
    let channel = MemoryChannel::new(None);

    let mut demo = SyncEngine::mount(
        demo_collection(),
        Rc::new(channel.clone()),
        EngineOptions::new().with_retention(RetentionMode::Demo),
    );
    let mut other = SyncEngine::mount(other, Rc::new(channel.clone()), EngineOptions::new());

    channel.navigate(Some("other-demo:second.tsx"));
    demo.poll();
    other.poll();
    assert_eq!(demo.selected_file(), "component.tsx");
    assert_eq!(other.selected_file(), "second.tsx");
    assert_eq!(channel.write_count(), 0);

    channel.navigate(Some("demo:styles.css"));
    demo.poll();
    other.poll();
    demo.poll();
    assert_eq!(demo.selected_file(), "styles.css");
    assert_eq!(other.selected_file(), "second.tsx");
    assert_eq!(channel.writes(), vec![Some("demo".to_string())]);
    assert_eq!(channel.get().as_deref(), Some("demo"));
}

#[test]
fn test_back_navigation_through_history() {
    let channel = MemoryChannel::new(None);
    let recorder = SwitchRecorder::new();
    let mut engine = SyncEngine::mount(
        demo_collection(),
        Rc::new(channel.clone()),
        EngineOptions::new().on_variant_switch(recorder.requester()),
    );

    let history = [
        "demo:styles.css",
        "demo:premium:helper.ts",
        "demo:utils.ts",
    ];
    for value in history.iter().chain(history.iter().rev()) {
        channel.navigate(Some(*value));
        engine.poll();
        if let Some(variant) = recorder.last()
            && engine.is_awaiting_variant_switch()
        {
            engine.activate_variant(&variant);
        }
    }

    assert_eq!(engine.selected_variant(), "Default");
    assert_eq!(engine.selected_file(), "styles.css");
    assert_eq!(engine.phase(), &Phase::Settled);
    assert_eq!(
        recorder.requests(),
        vec!["Premium".to_string(), "Default".to_string(), "Premium".to_string(), "Default".to_string()]
    );
    assert_eq!(channel.write_count(), 0);
}

#[test]
fn test_snapshot_serializes() {
    let channel = MemoryChannel::new(Some("demo:premium:helper.ts"));
    let engine = SyncEngine::mount(demo_collection(), Rc::new(channel), EngineOptions::new());

    let json = engine.snapshot().to_json().unwrap();
    assert!(json.contains("\"variant\": \"Premium\""));
    assert!(json.contains("\"origin\": \"channel\""));
    assert!(json.contains("\"settled\""));
}
