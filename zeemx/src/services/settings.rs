//! Settings service
//!
//! Owns the canonical `AppSettings` record. Every field has a schema
//! default so blobs written by older builds load forward-compatibly.
//! Updates persist the whole record and are published to subscribers
//! through watch channels.

use crate::error::{AppError, Result};
use crate::storage::{SharedStore, Slot, StorageKey};
use crate::views::ViewType;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::{watch, Mutex};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Light,
    Dark,
    /// Follow the platform; leaves the dark-mode flag as it was
    #[default]
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum FontFamily {
    #[default]
    Serif,
    Sans,
    Mono,
}

impl FontFamily {
    /// Class applied to the document body
    pub fn css_class(self) -> &'static str {
        match self {
            FontFamily::Serif => "font-serif",
            FontFamily::Sans => "font-sans",
            FontFamily::Mono => "font-mono",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum AccentColor {
    #[default]
    Emerald,
    Blue,
    Amber,
    Rose,
    Slate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum NotificationSound {
    None,
    #[default]
    Zen,
    Chime,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum QuoteCategory {
    Wisdom,
    #[default]
    Spiritual,
    Poetry,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ContentWidth {
    #[default]
    Standard,
    Wide,
    Full,
}

/// The five daily prayers, in order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Prayer {
    Fajr,
    Dhuhr,
    Asr,
    Maghrib,
    Isha,
}

impl Prayer {
    pub const ALL: [Prayer; 5] = [
        Prayer::Fajr,
        Prayer::Dhuhr,
        Prayer::Asr,
        Prayer::Maghrib,
        Prayer::Isha,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Prayer::Fajr => "Fajr",
            Prayer::Dhuhr => "Dhuhr",
            Prayer::Asr => "Asr",
            Prayer::Maghrib => "Maghrib",
            Prayer::Isha => "Isha",
        }
    }
}

/// Per-prayer adjustment in minutes. Unbounded; never clamped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "PascalCase")]
pub struct PrayerOffsets {
    #[serde(default)]
    pub fajr: i32,
    #[serde(default)]
    pub dhuhr: i32,
    #[serde(default)]
    pub asr: i32,
    #[serde(default)]
    pub maghrib: i32,
    #[serde(default)]
    pub isha: i32,
}

impl PrayerOffsets {
    pub fn get(&self, prayer: Prayer) -> i32 {
        match prayer {
            Prayer::Fajr => self.fajr,
            Prayer::Dhuhr => self.dhuhr,
            Prayer::Asr => self.asr,
            Prayer::Maghrib => self.maghrib,
            Prayer::Isha => self.isha,
        }
    }

    pub fn get_mut(&mut self, prayer: Prayer) -> &mut i32 {
        match prayer {
            Prayer::Fajr => &mut self.fajr,
            Prayer::Dhuhr => &mut self.dhuhr,
            Prayer::Asr => &mut self.asr,
            Prayer::Maghrib => &mut self.maghrib,
            Prayer::Isha => &mut self.isha,
        }
    }
}

/// Application settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppSettings {
    #[serde(default)]
    pub theme: Theme,
    #[serde(default)]
    pub font_family: FontFamily,
    #[serde(default)]
    pub accent_color: AccentColor,
    /// Documented as 0-100; stored as given
    #[serde(default = "default_ui_transparency")]
    pub ui_transparency: i32,
    #[serde(default)]
    pub sidebar_compact: bool,
    /// Seconds
    #[serde(default = "default_auto_save_interval")]
    pub auto_save_interval: i32,
    #[serde(default)]
    pub default_view: ViewType,
    #[serde(default = "default_true")]
    pub show_word_count: bool,
    #[serde(default = "default_true")]
    pub hijri_date_enabled: bool,
    #[serde(default)]
    pub notification_sound: NotificationSound,
    #[serde(default)]
    pub quote_category: QuoteCategory,
    #[serde(default)]
    pub content_width: ContentWidth,
    #[serde(default = "default_true")]
    pub motion_enabled: bool,
    #[serde(default = "default_true")]
    pub sound_effects: bool,
    #[serde(default)]
    pub privacy_blur: bool,
    #[serde(default)]
    pub prayer_offsets: PrayerOffsets,
    #[serde(default)]
    pub typewriter_mode: bool,
}

fn default_true() -> bool {
    true
}

fn default_ui_transparency() -> i32 {
    80
}

fn default_auto_save_interval() -> i32 {
    5
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            theme: Theme::default(),
            font_family: FontFamily::default(),
            accent_color: AccentColor::default(),
            ui_transparency: default_ui_transparency(),
            sidebar_compact: false,
            auto_save_interval: default_auto_save_interval(),
            default_view: ViewType::default(),
            show_word_count: true,
            hijri_date_enabled: true,
            notification_sound: NotificationSound::default(),
            quote_category: QuoteCategory::default(),
            content_width: ContentWidth::default(),
            motion_enabled: true,
            sound_effects: true,
            privacy_blur: false,
            prayer_offsets: PrayerOffsets::default(),
            typewriter_mode: false,
        }
    }
}

/// Replacement of exactly one settings field
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "field", content = "value", rename_all = "camelCase")]
pub enum SettingChange {
    Theme(Theme),
    FontFamily(FontFamily),
    AccentColor(AccentColor),
    UiTransparency(i32),
    SidebarCompact(bool),
    AutoSaveInterval(i32),
    DefaultView(ViewType),
    ShowWordCount(bool),
    HijriDateEnabled(bool),
    NotificationSound(NotificationSound),
    QuoteCategory(QuoteCategory),
    ContentWidth(ContentWidth),
    MotionEnabled(bool),
    SoundEffects(bool),
    PrivacyBlur(bool),
    PrayerOffsets(PrayerOffsets),
    TypewriterMode(bool),
}

impl SettingChange {
    /// Stored field names accepted by `from_field`
    pub const FIELDS: [&'static str; 17] = [
        "theme",
        "fontFamily",
        "accentColor",
        "uiTransparency",
        "sidebarCompact",
        "autoSaveInterval",
        "defaultView",
        "showWordCount",
        "hijriDateEnabled",
        "notificationSound",
        "quoteCategory",
        "contentWidth",
        "motionEnabled",
        "soundEffects",
        "privacyBlur",
        "prayerOffsets",
        "typewriterMode",
    ];

    /// Parse an untyped `(field, value)` pair
    pub fn from_field(field: &str, value: serde_json::Value) -> Result<Self> {
        if !Self::FIELDS.contains(&field) {
            return Err(AppError::UnknownSetting(field.to_string()));
        }

        let tagged = serde_json::json!({ "field": field, "value": value });
        serde_json::from_value(tagged)
            .map_err(|e| AppError::InvalidArgument(format!("{}: {}", field, e)))
    }

    fn apply(self, settings: &mut AppSettings) {
        match self {
            SettingChange::Theme(v) => settings.theme = v,
            SettingChange::FontFamily(v) => settings.font_family = v,
            SettingChange::AccentColor(v) => settings.accent_color = v,
            SettingChange::UiTransparency(v) => settings.ui_transparency = v,
            SettingChange::SidebarCompact(v) => settings.sidebar_compact = v,
            SettingChange::AutoSaveInterval(v) => settings.auto_save_interval = v,
            SettingChange::DefaultView(v) => settings.default_view = v,
            SettingChange::ShowWordCount(v) => settings.show_word_count = v,
            SettingChange::HijriDateEnabled(v) => settings.hijri_date_enabled = v,
            SettingChange::NotificationSound(v) => settings.notification_sound = v,
            SettingChange::QuoteCategory(v) => settings.quote_category = v,
            SettingChange::ContentWidth(v) => settings.content_width = v,
            SettingChange::MotionEnabled(v) => settings.motion_enabled = v,
            SettingChange::SoundEffects(v) => settings.sound_effects = v,
            SettingChange::PrivacyBlur(v) => settings.privacy_blur = v,
            SettingChange::PrayerOffsets(v) => settings.prayer_offsets = v,
            SettingChange::TypewriterMode(v) => settings.typewriter_mode = v,
        }
    }
}

/// Global presentation flags consumed by the view layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Presentation {
    pub dark_mode: bool,
    pub font_family: FontFamily,
}

impl Presentation {
    fn initial(settings: &AppSettings) -> Self {
        Self {
            dark_mode: settings.theme == Theme::Dark,
            font_family: settings.font_family,
        }
    }

    /// `System` keeps whatever dark-mode state was already showing
    fn follow(self, settings: &AppSettings) -> Self {
        let dark_mode = match settings.theme {
            Theme::Dark => true,
            Theme::Light => false,
            Theme::System => self.dark_mode,
        };
        Self {
            dark_mode,
            font_family: settings.font_family,
        }
    }

    pub fn font_class(&self) -> &'static str {
        self.font_family.css_class()
    }
}

/// Service for managing application settings
#[derive(Clone)]
pub struct SettingsService {
    store: SharedStore,
    slot: Slot<AppSettings>,
    settings_tx: Arc<watch::Sender<AppSettings>>,
    presentation_tx: Arc<watch::Sender<Presentation>>,
    write_lock: Arc<Mutex<()>>,
}

impl SettingsService {
    /// Load settings, backfilling defaults and migrating legacy keys
    pub fn load(store: SharedStore) -> Result<Self> {
        let slot = Slot::new(Arc::clone(&store), StorageKey::Settings);
        let settings = read_settings(&store, &slot)?;
        let presentation = Presentation::initial(&settings);

        let (settings_tx, _) = watch::channel(settings);
        let (presentation_tx, _) = watch::channel(presentation);

        Ok(Self {
            store,
            slot,
            settings_tx: Arc::new(settings_tx),
            presentation_tx: Arc::new(presentation_tx),
            write_lock: Arc::new(Mutex::new(())),
        })
    }

    /// Current settings
    pub fn get(&self) -> AppSettings {
        self.settings_tx.borrow().clone()
    }

    /// Current presentation flags
    pub fn current_presentation(&self) -> Presentation {
        *self.presentation_tx.borrow()
    }

    /// Receiver that always holds the latest settings
    pub fn subscribe(&self) -> watch::Receiver<AppSettings> {
        self.settings_tx.subscribe()
    }

    pub fn presentation(&self) -> watch::Receiver<Presentation> {
        self.presentation_tx.subscribe()
    }

    /// Replace one field and persist the whole record
    pub async fn update(&self, change: SettingChange) -> Result<AppSettings> {
        let _guard = self.write_lock.lock().await;

        let mut settings = self.get();
        change.apply(&mut settings);

        self.slot.save(&settings)?;
        tracing::debug!("Settings saved under {}", self.slot.key());

        self.publish(settings.clone());

        Ok(settings)
    }

    /// Untyped variant of `update` for the command surface
    pub async fn update_field(&self, field: &str, value: serde_json::Value) -> Result<AppSettings> {
        let change = SettingChange::from_field(field, value)?;
        self.update(change).await
    }

    /// Increment or decrement one prayer offset
    pub async fn adjust_prayer_offset(&self, prayer: Prayer, delta: i32) -> Result<PrayerOffsets> {
        let mut offsets = self.get().prayer_offsets;
        let offset = offsets.get_mut(prayer);
        *offset = offset.saturating_add(delta);

        let settings = self.update(SettingChange::PrayerOffsets(offsets)).await?;
        Ok(settings.prayer_offsets)
    }

    /// Sidebar quick toggle: flip between dark and light
    pub async fn toggle_theme(&self) -> Result<Theme> {
        let theme = if self.current_presentation().dark_mode {
            Theme::Light
        } else {
            Theme::Dark
        };

        self.update(SettingChange::Theme(theme)).await?;
        tracing::info!("Theme toggled to {:?}", theme);

        Ok(theme)
    }

    /// Re-read from storage (after a factory reset clears it)
    pub async fn reload(&self) -> Result<()> {
        let _guard = self.write_lock.lock().await;

        let settings = read_settings(&self.store, &self.slot)?;
        self.presentation_tx
            .send_replace(Presentation::initial(&settings));
        self.settings_tx.send_replace(settings);

        Ok(())
    }

    fn publish(&self, settings: AppSettings) {
        let previous = *self.presentation_tx.borrow();
        let next = previous.follow(&settings);

        if next.dark_mode != previous.dark_mode {
            tracing::debug!("Dark mode {}", if next.dark_mode { "on" } else { "off" });
        }
        if next.font_family != previous.font_family {
            tracing::debug!("Font class set to {}", next.font_class());
        }

        self.presentation_tx.send_replace(next);
        self.settings_tx.send_replace(settings);
    }
}

/// Fold each stored field over the defaults. A field that no longer
/// parses (a `null` number, a retired enum value) keeps its default
/// without discarding the fields around it.
fn merge_stored_fields(stored: serde_json::Value) -> AppSettings {
    let mut settings = AppSettings::default();

    let serde_json::Value::Object(fields) = stored else {
        tracing::warn!("Stored settings are not an object, using defaults");
        return settings;
    };

    for (field, value) in fields {
        match SettingChange::from_field(&field, value) {
            Ok(change) => change.apply(&mut settings),
            Err(AppError::UnknownSetting(name)) => {
                tracing::debug!("Ignoring unknown stored setting {}", name);
            }
            Err(e) => tracing::warn!("Stored setting reset to default: {}", e),
        }
    }

    settings
}

/// Read the primary record and fold in the legacy standalone keys.
/// Legacy keys are written into the primary record once, then removed.
fn read_settings(store: &SharedStore, slot: &Slot<AppSettings>) -> Result<AppSettings> {
    let mut migrated = false;

    let raw: Slot<serde_json::Value> = Slot::new(Arc::clone(store), slot.key());
    let stored = match raw.load() {
        Ok(stored) => stored.map(merge_stored_fields),
        Err(AppError::CorruptData { key, source }) => {
            tracing::warn!("Settings under {} are malformed, using defaults: {}", key, source);
            Some(AppSettings::default())
        }
        Err(e) => return Err(e),
    };

    let legacy_theme_key = StorageKey::LegacyTheme.name();
    let legacy_theme = store.get(&legacy_theme_key)?;

    let mut settings = match stored {
        Some(settings) => settings,
        None => {
            let mut settings = AppSettings::default();
            match legacy_theme.as_deref().map(str::trim) {
                Some("dark") => settings.theme = Theme::Dark,
                Some("light") => settings.theme = Theme::Light,
                _ => {}
            }
            settings
        }
    };

    if legacy_theme.is_some() {
        migrated = true;
    }

    let legacy_offsets: Slot<PrayerOffsets> =
        Slot::new(Arc::clone(store), StorageKey::LegacyPrayerOffsets);
    match legacy_offsets.load() {
        Ok(Some(offsets)) => {
            settings.prayer_offsets = offsets;
            migrated = true;
        }
        Ok(None) => {}
        Err(AppError::CorruptData { key, source }) => {
            tracing::warn!("Dropping malformed legacy offsets under {}: {}", key, source);
            migrated = true;
        }
        Err(e) => return Err(e),
    }

    if migrated {
        slot.save(&settings)?;
        legacy_offsets.clear()?;
        store.remove(&legacy_theme_key)?;
        tracing::info!("Migrated legacy settings keys into {}", slot.key());
    }

    Ok(settings)
}
