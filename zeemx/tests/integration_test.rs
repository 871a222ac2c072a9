//! Integration tests for zeemX
//!
//! These tests verify end-to-end functionality against the file-backed
//! store, including:
//! - Settings persistence, defaults backfill and legacy key migration
//! - Feature store persistence across restarts
//! - Formula evaluation through the spreadsheet service
//! - Command dispatch

use serde_json::{json, Value};
use std::sync::Arc;
use tempfile::TempDir;
use zeemx::app::AppState;
use zeemx::commands;
use zeemx::config::{AppConfig, FORMULA_ERROR};
use zeemx::error::AppError;
use zeemx::services::settings::{FontFamily, Prayer, Theme};
use zeemx::services::uploads::Upload;
use zeemx::services::{AppSettings, SettingChange, SettingsService};
use zeemx::sheet::CellRef;
use zeemx::storage::{JsonFileStore, SharedStore, StorageKey};

/// Helper to create a file-backed store in a temp directory
fn create_test_store() -> (SharedStore, TempDir) {
    let temp_dir = TempDir::new().unwrap();
    let store = JsonFileStore::new(temp_dir.path().join("data"));
    store.initialize().unwrap();

    (Arc::new(store), temp_dir)
}

fn open_state(temp_dir: &TempDir) -> AppState {
    AppState::open(AppConfig::new(temp_dir.path().join("data"))).unwrap()
}

fn upload(name: &str, mime_type: &str) -> Upload {
    Upload {
        name: name.to_string(),
        mime_type: mime_type.to_string(),
        bytes: name.as_bytes().to_vec(),
    }
}

#[tokio::test]
async fn test_settings_save_then_load_reconstructs_record() {
    let (store, _temp) = create_test_store();
    let settings = SettingsService::load(store.clone()).unwrap();

    settings
        .update(SettingChange::FontFamily(FontFamily::Mono))
        .await
        .unwrap();
    settings
        .update(SettingChange::UiTransparency(140))
        .await
        .unwrap();
    settings
        .adjust_prayer_offset(Prayer::Asr, -7)
        .await
        .unwrap();
    let saved = settings.get();

    let reloaded = SettingsService::load(store.clone()).unwrap();
    assert_eq!(reloaded.get(), saved);
    assert_eq!(reloaded.get().ui_transparency, 140);
}

#[tokio::test]
async fn test_missing_settings_fields_get_defaults() {
    let (store, _temp) = create_test_store();
    store
        .set("zeemx_settings", r#"{"theme":"dark","sidebarCompact":true}"#)
        .unwrap();

    let settings = SettingsService::load(store.clone()).unwrap().get();

    assert_eq!(settings.theme, Theme::Dark);
    assert!(settings.sidebar_compact);
    let defaults = AppSettings::default();
    assert_eq!(settings.font_family, defaults.font_family);
    assert_eq!(settings.auto_save_interval, defaults.auto_save_interval);
    assert_eq!(settings.prayer_offsets, defaults.prayer_offsets);
    assert_eq!(settings.show_word_count, defaults.show_word_count);
}

#[tokio::test]
async fn test_legacy_prayer_offsets_are_migrated_once() {
    let (store, _temp) = create_test_store();
    store
        .set("zeemx_settings", r#"{"theme":"light"}"#)
        .unwrap();
    store
        .set("zeemx_prayer_offsets", r#"{"Fajr":3,"Isha":-2}"#)
        .unwrap();

    let settings = SettingsService::load(store.clone()).unwrap().get();

    assert_eq!(settings.prayer_offsets.fajr, 3);
    assert_eq!(settings.prayer_offsets.isha, -2);
    assert_eq!(settings.theme, Theme::Light);
    assert!(store.get("zeemx_prayer_offsets").unwrap().is_none());

    let stored: Value =
        serde_json::from_str(&store.get("zeemx_settings").unwrap().unwrap()).unwrap();
    assert_eq!(stored["prayerOffsets"]["Fajr"], 3);
}

#[tokio::test]
async fn test_malformed_settings_fall_back_to_defaults() {
    let (store, _temp) = create_test_store();
    store.set("zeemx_settings", "{not json").unwrap();

    let settings = SettingsService::load(store.clone()).unwrap();

    assert_eq!(settings.get(), AppSettings::default());
}

#[tokio::test]
async fn test_malformed_collection_is_refused() {
    let (store, temp) = create_test_store();
    store.set("zeemx_docs", "[{\"id\":").unwrap();

    let result = AppState::with_store(AppConfig::new(temp.path().join("data")), store.clone());

    assert!(matches!(result, Err(AppError::CorruptData { .. })));
    // The damaged blob is left untouched
    assert_eq!(store.get("zeemx_docs").unwrap().unwrap(), "[{\"id\":");
}

#[tokio::test]
async fn test_theme_toggle_survives_restart() {
    let temp_dir = TempDir::new().unwrap();

    {
        let state = open_state(&temp_dir);
        state
            .settings
            .update(SettingChange::ShowWordCount(false))
            .await
            .unwrap();
        let theme = state.settings.toggle_theme().await.unwrap();
        assert_eq!(theme, Theme::Dark);
    }

    let state = open_state(&temp_dir);
    let settings = state.settings.get();
    assert_eq!(settings.theme, Theme::Dark);
    assert!(!settings.show_word_count);
    assert!(!state.notepad.show_word_count());
    assert!(state.settings.current_presentation().dark_mode);
}

#[tokio::test]
async fn test_settings_changes_reach_other_stores_live() {
    let temp_dir = TempDir::new().unwrap();
    let state = open_state(&temp_dir);
    assert!(state.docs.show_word_count());

    state
        .settings
        .update_field("showWordCount", json!(false))
        .await
        .unwrap();
    state
        .settings
        .adjust_prayer_offset(Prayer::Dhuhr, 2)
        .await
        .unwrap();

    assert!(!state.docs.show_word_count());
    assert!(!state.notepad.show_word_count());
    assert_eq!(state.sanctuary.adjusted_times().unwrap()[1].time, "12:30");
}

#[tokio::test]
async fn test_document_version_scenario() {
    let temp_dir = TempDir::new().unwrap();
    let state = open_state(&temp_dir);

    let doc = state.docs.create().await.unwrap();
    state
        .docs
        .update_content(&doc.id, "<p>first</p>".to_string())
        .await
        .unwrap();
    state
        .docs
        .update_content(&doc.id, "<p>second</p>".to_string())
        .await
        .unwrap();
    state.docs.save_version(&doc.id).await.unwrap();
    state
        .docs
        .update_content(&doc.id, "<p>third</p>".to_string())
        .await
        .unwrap();

    let reopened = open_state(&temp_dir);
    let doc = reopened.docs.get(&doc.id).await.unwrap();
    assert_eq!(doc.history.len(), 1);
    assert_eq!(doc.history[0].content, "<p>second</p>");
    assert_eq!(doc.content, "<p>third</p>");
}

#[tokio::test]
async fn test_document_history_is_capped() {
    let temp_dir = TempDir::new().unwrap();
    let state = open_state(&temp_dir);
    let doc = state.docs.create().await.unwrap();

    for n in 1..=6 {
        state
            .docs
            .update_content(&doc.id, format!("v{}", n))
            .await
            .unwrap();
        state.docs.save_version(&doc.id).await.unwrap();
    }

    let doc = state.docs.get(&doc.id).await.unwrap();
    let versions: Vec<&str> = doc.history.iter().map(|s| s.content.as_str()).collect();
    assert_eq!(versions, vec!["v6", "v5", "v4", "v3", "v2"]);
}

#[tokio::test]
async fn test_locker_and_gallery_deletes_keep_order() {
    let temp_dir = TempDir::new().unwrap();
    let state = open_state(&temp_dir);

    let a = state.locker.upload(upload("a.txt", "text/plain")).await.unwrap();
    let b = state.locker.upload(upload("b.txt", "text/plain")).await.unwrap();
    let c = state.locker.upload(upload("c.txt", "text/plain")).await.unwrap();
    assert!(state.locker.delete(&b.id, |_| true).await.unwrap());

    let photo = state
        .gallery
        .upload(upload("p.png", "image/png"))
        .await
        .unwrap();
    assert!(state.gallery.delete("1", |_| true).await.unwrap());

    let reopened = open_state(&temp_dir);
    let files: Vec<String> = reopened.locker.list().await.into_iter().map(|f| f.id).collect();
    assert_eq!(files, vec![c.id, a.id]);
    let gallery: Vec<String> = reopened
        .gallery
        .list()
        .await
        .into_iter()
        .map(|g| g.id)
        .collect();
    assert_eq!(gallery, vec![photo.id, "2".to_string()]);
}

#[tokio::test]
async fn test_sheet_formulas_through_service() {
    let temp_dir = TempDir::new().unwrap();
    let state = open_state(&temp_dir);
    let cell = |name: &str| CellRef::parse(name).unwrap();

    state.sheet.set_cell(cell("A1"), "2".to_string()).await.unwrap();
    state.sheet.set_cell(cell("A2"), "x".to_string()).await.unwrap();
    state.sheet.set_cell(cell("A3"), "3".to_string()).await.unwrap();

    let sum = state
        .sheet
        .set_cell(cell("C1"), "=SUM(A1:A3)".to_string())
        .await
        .unwrap();
    assert_eq!(sum, "5");
    let reversed = state
        .sheet
        .set_cell(cell("C2"), "=SUM(A5:A1)".to_string())
        .await
        .unwrap();
    assert_eq!(reversed, "0");
    let malformed = state
        .sheet
        .set_cell(cell("C3"), "=AVG(A1:A2)".to_string())
        .await
        .unwrap();
    assert_eq!(malformed, FORMULA_ERROR);
    let text = state
        .sheet
        .set_cell(cell("C4"), "just words".to_string())
        .await
        .unwrap();
    assert_eq!(text, "just words");

    let csv_path = temp_dir.path().join("export.csv");
    state.sheet.export_csv(&csv_path).await.unwrap();
    let csv = std::fs::read_to_string(&csv_path).unwrap();
    assert!(csv.starts_with("2,,=SUM(A1:A3),"));
}

#[tokio::test]
async fn test_notepad_flush_persists_raw_string() {
    let temp_dir = TempDir::new().unwrap();

    {
        let state = open_state(&temp_dir);
        state.notepad.set_content("quiet morning".to_string()).await;
        assert!(state.notepad.has_pending_save().await);
        state.notepad.flush().await.unwrap();
        assert!(!state.notepad.has_pending_save().await);
        assert_eq!(
            state.store.get(&StorageKey::Notepad.name()).unwrap().as_deref(),
            Some("quiet morning")
        );
    }

    let state = open_state(&temp_dir);
    assert_eq!(state.notepad.content().await, "quiet morning");
    assert_eq!(state.notepad.word_count().await, 2);
}

#[tokio::test]
async fn test_factory_reset_reseeds() {
    let temp_dir = TempDir::new().unwrap();
    let state = open_state(&temp_dir);

    state.docs.delete("1").await.unwrap();
    state.slides.create_deck("Extra").await.unwrap();
    state
        .settings
        .update(SettingChange::Theme(Theme::Dark))
        .await
        .unwrap();

    state.factory_reset().await.unwrap();

    assert_eq!(state.docs.list().await[0].id, "1");
    assert_eq!(state.slides.list().await.len(), 1);
    assert_eq!(state.settings.get(), AppSettings::default());
    assert!(std::fs::read_dir(temp_dir.path().join("data"))
        .unwrap()
        .next()
        .is_none());
}

#[tokio::test]
async fn test_command_workflow() {
    let temp_dir = TempDir::new().unwrap();
    let state = open_state(&temp_dir);

    let gated = commands::invoke(&state, "navigate", json!({ "view": "docs" }))
        .await
        .unwrap();
    assert_eq!(gated["access"], "signInRequired");

    let user = commands::invoke(
        &state,
        "sign_up",
        json!({ "name": "Amina Yusuf", "email": "amina@example.com", "password": "x" }),
    )
    .await
    .unwrap();
    assert_eq!(user["name"], "Amina Yusuf");

    let granted = commands::invoke(&state, "navigate", json!({ "view": "docs" }))
        .await
        .unwrap();
    assert_eq!(granted, json!({ "access": "granted", "view": "docs" }));

    let event = commands::invoke(
        &state,
        "add_event",
        json!({ "date": "2024-03-05", "title": "Walk", "type": "task" }),
    )
    .await
    .unwrap();
    assert_eq!(event["type"], "task");

    let on_day = commands::invoke(&state, "events_on", json!({ "date": "2024-03-05" }))
        .await
        .unwrap();
    assert_eq!(on_day.as_array().unwrap().len(), 1);

    let deck = commands::invoke(&state, "create_deck", json!({ "title": "Retreat" }))
        .await
        .unwrap();
    let deck_id = deck["id"].as_str().unwrap().to_string();
    commands::invoke(&state, "add_slide", json!({ "deckId": deck_id }))
        .await
        .unwrap();
    let moved = commands::invoke(
        &state,
        "move_slide",
        json!({ "deckId": deck_id, "index": 1, "direction": "up" }),
    )
    .await
    .unwrap();
    assert_eq!(moved, 0);

    let reply = commands::invoke(&state, "send_message", json!({ "text": "hello" }))
        .await
        .unwrap();
    assert_eq!(
        reply["content"],
        "I'm having a quiet moment of reflection. Please try again in a bit."
    );

    commands::invoke(&state, "log_out", Value::Null).await.unwrap();
    assert!(state.session.current_user().await.is_none());
}
