//! Settings and session commands
//!
//! Field-by-field settings updates, the quick theme toggle, prayer offset
//! nudges, and the simulated sign-in flow.

use crate::app::AppState;
use crate::error::Result;
use crate::models::User;
use crate::services::settings::{Prayer, PrayerOffsets, Presentation, Theme};
use crate::services::AppSettings;

// ===== Settings =====

/// Get current settings
pub fn get_settings(state: &AppState) -> AppSettings {
    state.settings.get()
}

/// Replace one settings field by its stored name
pub async fn update_setting(
    state: &AppState,
    field: String,
    value: serde_json::Value,
) -> Result<AppSettings> {
    tracing::info!("Updating setting: {}", field);
    state.settings.update_field(&field, value).await
}

pub async fn toggle_theme(state: &AppState) -> Result<Theme> {
    state.settings.toggle_theme().await
}

/// Dark-mode and font flags for the view layer
pub fn get_presentation(state: &AppState) -> Presentation {
    state.settings.current_presentation()
}

pub async fn adjust_prayer_offset(
    state: &AppState,
    prayer: Prayer,
    delta: i32,
) -> Result<PrayerOffsets> {
    state.settings.adjust_prayer_offset(prayer, delta).await
}

// ===== Session =====

pub async fn sign_up(
    state: &AppState,
    name: String,
    email: String,
    password: String,
) -> Result<User> {
    state.session.sign_up(&name, &email, &password).await
}

pub async fn sign_in(state: &AppState, email: String, password: String) -> Result<User> {
    state.session.sign_in(&email, &password).await
}

pub async fn log_out(state: &AppState) -> Result<()> {
    state.session.log_out().await
}

pub async fn current_user(state: &AppState) -> Option<User> {
    state.session.current_user().await
}
