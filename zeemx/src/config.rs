//! Application configuration
//!
//! Central location for all configuration constants, resource limits,
//! and the runtime configuration read from the environment.

use std::path::PathBuf;

// ===== Storage =====

/// Prefix shared by every persisted key (e.g. `zeemx_settings`)
pub const STORAGE_NAMESPACE: &str = "zeemx";

/// Default data directory when `ZEEMX_DATA_DIR` is not set
pub const DEFAULT_DATA_DIR: &str = "zeemx-data";

// ===== Notepad =====

/// Idle delay before buffered notepad content is written to storage
pub const NOTEPAD_SAVE_DELAY_MS: u64 = 1000;

// ===== Docs =====

/// Maximum number of saved versions kept per document (newest first)
pub const DOC_HISTORY_LIMIT: usize = 5;

pub const NEW_DOC_TITLE: &str = "Untitled Document";
pub const NEW_DOC_CONTENT: &str = "<h1>New Document</h1><p>Start writing here...</p>";

// ===== Spreadsheet =====

pub const SHEET_ROWS: usize = 20;
pub const SHEET_COLS: usize = 10;

/// Leading character that marks a cell as a formula
pub const FORMULA_MARKER: char = '=';

/// Display value for any formula that cannot be evaluated
pub const FORMULA_ERROR: &str = "Err!";

// ===== Settings =====

/// Auto-save intervals (seconds) offered by the settings panel.
/// Other values are accepted and stored as-is.
pub const AUTO_SAVE_INTERVAL_OPTIONS: &[i32] = &[1, 5, 10, 30];

// ===== Gallery =====

/// Album filter tabs; "All" disables filtering
pub const GALLERY_ALBUMS: &[&str] = &["All", "Nature", "Family", "Travel", "Reflections"];

pub const ALL_ALBUMS: &str = "All";

// ===== Sanctuary =====

/// Unadjusted prayer times (24h `HH:MM`), Fajr through Isha
pub const BASE_PRAYER_TIMES: [&str; 5] = ["05:42", "12:28", "15:45", "18:12", "19:30"];

// ===== Assistant =====

pub const ASSISTANT_ENDPOINT: &str = "https://generativelanguage.googleapis.com/v1beta";

pub const ASSISTANT_MODEL: &str = "gemini-3-flash-preview";

pub const ASSISTANT_TEMPERATURE: f32 = 0.7;

pub const ASSISTANT_SYSTEM_INSTRUCTION: &str = "You are zeemX Assistant, a calm, gentle, and helpful writing companion. Your tone is introverted, minimalist, and deeply empathetic. You help users with writing, brainstorming, and finding peace. Keep answers concise and beautiful.";

/// Returned by `ask` whenever the service call fails
pub const ASSISTANT_FALLBACK: &str =
    "I'm having a quiet moment of reflection. Please try again in a bit.";

/// Shown in the chat when the service answered with nothing
pub const ASSISTANT_EMPTY_REPLY: &str = "I'm lost in thought. Please try again.";

pub const ASSISTANT_GREETING: &str = "Salam. I am your zeemX companion. I can help you write, plan, or summarize your documents. How can I assist your focus today?";

/// Greeting left in the transcript after it is cleared
pub const ASSISTANT_CLEARED_GREETING: &str = "Salam. How can I help you find clarity today?";

// ===== Runtime configuration =====

/// Runtime configuration resolved from the environment
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Directory holding one file per storage key
    pub data_dir: PathBuf,
    /// Key for the generative-text service; requests fail over to the
    /// fallback reply when absent
    pub api_key: Option<String>,
    pub assistant_model: String,
    pub assistant_endpoint: String,
}

impl AppConfig {
    pub fn new(data_dir: PathBuf) -> Self {
        Self {
            data_dir,
            api_key: None,
            assistant_model: ASSISTANT_MODEL.to_string(),
            assistant_endpoint: ASSISTANT_ENDPOINT.to_string(),
        }
    }

    /// Read `ZEEMX_DATA_DIR`, `API_KEY` (or `GEMINI_API_KEY`) and
    /// `ZEEMX_ASSISTANT_MODEL`
    pub fn from_env() -> Self {
        let data_dir = std::env::var_os("ZEEMX_DATA_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_DIR));

        let api_key = std::env::var("API_KEY")
            .or_else(|_| std::env::var("GEMINI_API_KEY"))
            .ok()
            .filter(|key| !key.trim().is_empty());

        let assistant_model =
            std::env::var("ZEEMX_ASSISTANT_MODEL").unwrap_or_else(|_| ASSISTANT_MODEL.to_string());

        Self {
            data_dir,
            api_key,
            assistant_model,
            assistant_endpoint: ASSISTANT_ENDPOINT.to_string(),
        }
    }
}
