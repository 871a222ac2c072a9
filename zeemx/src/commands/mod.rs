//! Commands exposed to the front end
//!
//! Every command takes `&AppState` plus named arguments and returns
//! `Result<T, AppError>`. [`invoke`] dispatches a command by name with its
//! arguments as a JSON object, which is how the binary drives them.
//!
//! Submodules:
//! - `settings`: settings and session
//! - `notes`: notepad and documents
//! - `planner`: calendar and sanctuary
//! - `files`: locker and gallery
//! - `slides`: slide decks and the spreadsheet
//! - `assistant`: chat with the writing companion

pub mod assistant;
pub mod files;
pub mod notes;
pub mod planner;
pub mod settings;
pub mod slides;

use crate::app::AppState;
use crate::error::{AppError, Result};
use crate::services::dashboard;
use crate::views::{ViewAccess, ViewType};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};

/// Named command arguments
#[derive(Debug, Default)]
pub struct Args(Map<String, Value>);

impl Args {
    /// Accepts a JSON object, or null for no arguments
    pub fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Null => Ok(Self::default()),
            Value::Object(map) => Ok(Self(map)),
            other => Err(AppError::InvalidArgument(format!(
                "arguments must be an object, got {}",
                other
            ))),
        }
    }

    /// Required argument
    pub fn get<T: DeserializeOwned>(&self, name: &str) -> Result<T> {
        self.opt(name)?
            .ok_or_else(|| AppError::InvalidArgument(format!("missing argument '{}'", name)))
    }

    /// Optional argument; absent and `null` are both `None`
    pub fn opt<T: DeserializeOwned>(&self, name: &str) -> Result<Option<T>> {
        match self.0.get(name) {
            None | Some(Value::Null) => Ok(None),
            Some(value) => serde_json::from_value(value.clone())
                .map(Some)
                .map_err(|e| AppError::InvalidArgument(format!("argument '{}': {}", name, e))),
        }
    }
}

fn reply<T: Serialize>(value: T) -> Result<Value> {
    Ok(serde_json::to_value(value)?)
}

/// Run a command by name
pub async fn invoke(state: &AppState, command: &str, args: Value) -> Result<Value> {
    let args = Args::from_value(args)?;
    tracing::debug!("Command: {}", command);

    match command {
        // General
        "get_app_info" => reply(get_app_info(state)),
        "list_views" => reply(list_views()),
        "get_startup_view" => reply(state.startup_view().await),
        "navigate" => reply(state.navigate(args.get("view")?).await),
        "get_dashboard" => reply(get_dashboard(state).await),
        "factory_reset" => reply(state.factory_reset().await?),

        // Settings and session
        "get_settings" => reply(settings::get_settings(state)),
        "update_setting" => reply(
            settings::update_setting(state, args.get("field")?, args.get("value")?).await?,
        ),
        "toggle_theme" => reply(settings::toggle_theme(state).await?),
        "get_presentation" => reply(settings::get_presentation(state)),
        "adjust_prayer_offset" => reply(
            settings::adjust_prayer_offset(state, args.get("prayer")?, args.get("delta")?)
                .await?,
        ),
        "sign_up" => reply(
            settings::sign_up(
                state,
                args.get("name")?,
                args.get("email")?,
                args.get("password")?,
            )
            .await?,
        ),
        "sign_in" => reply(
            settings::sign_in(state, args.get("email")?, args.get("password")?).await?,
        ),
        "log_out" => reply(settings::log_out(state).await?),
        "current_user" => reply(settings::current_user(state).await),

        // Notepad and docs
        "get_notepad" => reply(notes::get_notepad(state).await),
        "set_notepad" => reply(notes::set_notepad(state, args.get("content")?).await),
        "save_notepad" => reply(notes::save_notepad(state).await?),
        "clear_notepad" => reply(notes::clear_notepad(state).await?),
        "list_docs" => reply(notes::list_docs(state).await),
        "get_doc" => reply(notes::get_doc(state, args.get("id")?).await?),
        "create_doc" => reply(notes::create_doc(state).await?),
        "update_doc_content" => reply(
            notes::update_doc_content(state, args.get("id")?, args.get("content")?).await?,
        ),
        "rename_doc" => reply(notes::rename_doc(state, args.get("id")?, args.get("title")?).await?),
        "save_doc_version" => reply(notes::save_doc_version(state, args.get("id")?).await?),
        "delete_doc" => reply(notes::delete_doc(state, args.get("id")?).await?),
        "search_docs" => reply(notes::search_docs(state, args.get("query")?).await),
        "doc_word_count" => reply(notes::doc_word_count(state, args.get("id")?).await?),

        // Calendar and sanctuary
        "list_events" => reply(planner::list_events(state).await),
        "add_event" => reply(
            planner::add_event(
                state,
                args.get("date")?,
                args.get("title")?,
                args.opt("type")?.unwrap_or_default(),
            )
            .await?,
        ),
        "delete_event" => reply(planner::delete_event(state, args.get("id")?).await?),
        "events_on" => reply(planner::events_on(state, args.get("date")?).await),
        "month_grid" => reply(planner::month_grid(args.get("year")?, args.get("month")?)?),
        "prayer_times" => reply(planner::prayer_times(state)?),
        "tasbih_increment" => reply(planner::tasbih_increment(state)),
        "tasbih_reset" => reply(planner::tasbih_reset(state)),
        "tasbih_count" => reply(planner::tasbih_count(state)),

        // Locker and gallery
        "list_files" => reply(files::list_files(state).await),
        "upload_file" => reply(
            files::upload_file(
                state,
                args.get("name")?,
                args.get("mimeType")?,
                args.get("data")?,
            )
            .await?,
        ),
        "import_files" => reply(files::import_files(state, args.get("paths")?).await?),
        "delete_file" => reply(
            files::delete_file(state, args.get("id")?, args.opt("confirmed")?.unwrap_or(false))
                .await?,
        ),
        "search_files" => reply(files::search_files(state, args.get("query")?).await),
        "locker_usage" => reply(files::locker_usage(state).await),
        "list_gallery" => reply(
            files::list_gallery(state, args.opt("album")?).await,
        ),
        "list_albums" => reply(files::list_albums()),
        "upload_media" => reply(
            files::upload_media(
                state,
                args.get("name")?,
                args.get("mimeType")?,
                args.get("data")?,
            )
            .await?,
        ),
        "import_media" => reply(files::import_media(state, args.get("paths")?).await?),
        "update_reflection" => reply(
            files::update_reflection(state, args.get("id")?, args.get("reflection")?).await?,
        ),
        "set_album" => reply(files::set_album(state, args.get("id")?, args.opt("album")?).await?),
        "delete_media" => reply(
            files::delete_media(state, args.get("id")?, args.opt("confirmed")?.unwrap_or(false))
                .await?,
        ),

        // Slides and sheet
        "list_decks" => reply(slides::list_decks(state).await),
        "create_deck" => reply(slides::create_deck(state, args.get("title")?).await?),
        "add_slide" => reply(slides::add_slide(state, args.get("deckId")?).await?),
        "update_slide" => reply(
            slides::update_slide(
                state,
                args.get("deckId")?,
                args.get("index")?,
                args.get("field")?,
                args.get("value")?,
            )
            .await?,
        ),
        "move_slide" => reply(
            slides::move_slide(
                state,
                args.get("deckId")?,
                args.get("index")?,
                args.get("direction")?,
            )
            .await?,
        ),
        "remove_slide" => reply(
            slides::remove_slide(state, args.get("deckId")?, args.get("index")?).await?,
        ),
        "get_sheet" => reply(slides::get_sheet(state).await),
        "set_cell" => reply(
            slides::set_cell(state, args.get("cell")?, args.get("value")?).await?,
        ),
        "reset_sheet" => reply(slides::reset_sheet(state).await?),
        "export_csv" => reply(slides::export_csv(state, args.get("path")?).await?),

        // Assistant
        "ask_assistant" => reply(assistant::ask_assistant(state, args.get("prompt")?).await),
        "send_message" => reply(assistant::send_message(state, args.get("text")?).await),
        "summarize_docs" => reply(assistant::summarize_docs(state).await),
        "get_transcript" => reply(assistant::get_transcript(state).await),
        "clear_chat" => reply(assistant::clear_chat(state).await),

        other => Err(AppError::UnknownCommand(other.to_string())),
    }
}

// ===== General Commands =====

/// Application information structure
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AppInfo {
    pub version: String,
    pub data_dir: String,
    pub assistant_model: String,
    pub assistant_configured: bool,
}

/// Get application information
pub fn get_app_info(state: &AppState) -> AppInfo {
    AppInfo {
        version: env!("CARGO_PKG_VERSION").to_string(),
        data_dir: state.config.data_dir.to_string_lossy().to_string(),
        assistant_model: state.config.assistant_model.clone(),
        assistant_configured: state.config.api_key.is_some(),
    }
}

/// Sidebar menu entry
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuEntry {
    pub view: ViewType,
    pub label: &'static str,
    pub requires_auth: bool,
}

pub fn list_views() -> Vec<MenuEntry> {
    ViewType::MENU
        .iter()
        .map(|&view| MenuEntry {
            view,
            label: view.label(),
            requires_auth: view.requires_auth(),
        })
        .collect()
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Dashboard {
    pub headline: String,
    pub startup: ViewAccess,
}

pub async fn get_dashboard(state: &AppState) -> Dashboard {
    let user = state.session.current_user().await;
    Dashboard {
        headline: dashboard::current_headline(user.as_ref()),
        startup: state.startup_view().await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;
    use serde_json::json;
    use std::path::PathBuf;

    fn create_test_state() -> AppState {
        AppState::in_memory(AppConfig::new(PathBuf::from("unused"))).unwrap()
    }

    #[test]
    fn test_args_parsing() {
        let args = Args::from_value(json!({ "id": "7", "count": 3, "gone": null })).unwrap();

        assert_eq!(args.get::<String>("id").unwrap(), "7");
        assert_eq!(args.get::<i32>("count").unwrap(), 3);
        assert_eq!(args.opt::<String>("gone").unwrap(), None);
        assert!(matches!(
            args.get::<String>("missing"),
            Err(AppError::InvalidArgument(_))
        ));
        assert!(args.get::<i32>("id").is_err());

        assert!(Args::from_value(Value::Null).is_ok());
        assert!(Args::from_value(json!([1, 2])).is_err());
    }

    #[tokio::test]
    async fn test_unknown_command() {
        let state = create_test_state();
        let result = invoke(&state, "launch_rocket", Value::Null).await;
        assert!(matches!(result, Err(AppError::UnknownCommand(_))));
    }

    #[tokio::test]
    async fn test_app_info_and_views() {
        let state = create_test_state();

        let info = invoke(&state, "get_app_info", Value::Null).await.unwrap();
        assert_eq!(info["version"], env!("CARGO_PKG_VERSION"));
        assert_eq!(info["assistantConfigured"], false);

        let views = invoke(&state, "list_views", Value::Null).await.unwrap();
        assert_eq!(views[0]["view"], "dashboard");

        let access = invoke(&state, "navigate", json!({ "view": "files" }))
            .await
            .unwrap();
        assert_eq!(access, json!({ "access": "signInRequired" }));
    }

    #[tokio::test]
    async fn test_settings_round_trip_through_commands() {
        let state = create_test_state();

        invoke(
            &state,
            "update_setting",
            json!({ "field": "theme", "value": "dark" }),
        )
        .await
        .unwrap();

        let settings = invoke(&state, "get_settings", Value::Null).await.unwrap();
        assert_eq!(settings["theme"], "dark");

        let presentation = invoke(&state, "get_presentation", Value::Null).await.unwrap();
        assert_eq!(presentation["darkMode"], true);

        let err = invoke(
            &state,
            "update_setting",
            json!({ "field": "wallpaper", "value": "x" }),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, AppError::UnknownSetting(_)));
    }

    #[tokio::test]
    async fn test_docs_and_sheet_commands() {
        let state = create_test_state();

        let doc = invoke(&state, "create_doc", Value::Null).await.unwrap();
        let id = doc["id"].as_str().unwrap().to_string();
        invoke(
            &state,
            "update_doc_content",
            json!({ "id": id, "content": "<p>one two</p>" }),
        )
        .await
        .unwrap();
        let count = invoke(&state, "doc_word_count", json!({ "id": id }))
            .await
            .unwrap();
        assert_eq!(count, 2);

        invoke(&state, "set_cell", json!({ "cell": "A1", "value": "4" }))
            .await
            .unwrap();
        let shown = invoke(
            &state,
            "set_cell",
            json!({ "cell": "B1", "value": "=SUM(A1:A2)" }),
        )
        .await
        .unwrap();
        assert_eq!(shown, "4");

        let bad = invoke(&state, "set_cell", json!({ "cell": "Z99", "value": "1" })).await;
        assert!(matches!(bad, Err(AppError::InvalidArgument(_))));
    }

    #[tokio::test]
    async fn test_delete_requires_confirmation_flag() {
        let state = create_test_state();

        let removed = invoke(&state, "delete_media", json!({ "id": "1" }))
            .await
            .unwrap();
        assert_eq!(removed, false);

        let removed = invoke(&state, "delete_media", json!({ "id": "1", "confirmed": true }))
            .await
            .unwrap();
        assert_eq!(removed, true);

        let gallery = invoke(&state, "list_gallery", Value::Null).await.unwrap();
        assert_eq!(gallery.as_array().unwrap().len(), 1);
    }
}
