//! Services module
//!
//! One service per feature store. Services own their in-memory records,
//! persist through the storage layer, and are driven by the command surface.

pub mod assistant;
pub mod calendar;
pub mod dashboard;
pub mod docs;
pub mod gallery;
pub mod locker;
pub mod notepad;
pub mod sanctuary;
pub mod session;
pub mod settings;
pub mod sheet;
pub mod slides;
pub mod uploads;

pub use assistant::{AssistantService, GeminiClient, TextGenerator};
pub use calendar::CalendarService;
pub use docs::DocsService;
pub use gallery::GalleryService;
pub use locker::LockerService;
pub use notepad::NotepadService;
pub use sanctuary::SanctuaryService;
pub use session::SessionService;
pub use settings::{AppSettings, SettingChange, SettingsService};
pub use sheet::SheetService;
pub use slides::SlidesService;
