//! View identifiers and access gating
//!
//! Rendering lives outside this crate; this module only decides which
//! view a request may open.

use crate::models::User;
use serde::{Deserialize, Serialize};

/// Every panel the shell can show
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ViewType {
    #[default]
    Dashboard,
    Notepad,
    Docs,
    Slides,
    Spreadsheet,
    Ai,
    Islam,
    Gallery,
    Notbot,
    Settings,
    Calendar,
    Files,
}

impl ViewType {
    /// Sidebar order
    pub const MENU: [ViewType; 11] = [
        ViewType::Dashboard,
        ViewType::Notepad,
        ViewType::Docs,
        ViewType::Calendar,
        ViewType::Files,
        ViewType::Slides,
        ViewType::Spreadsheet,
        ViewType::Ai,
        ViewType::Islam,
        ViewType::Gallery,
        ViewType::Notbot,
    ];

    /// Sidebar label
    pub fn label(self) -> &'static str {
        match self {
            ViewType::Dashboard => "Home",
            ViewType::Notepad => "Notepad",
            ViewType::Docs => "Docs",
            ViewType::Calendar => "Planner",
            ViewType::Files => "Locker",
            ViewType::Slides => "Slides",
            ViewType::Spreadsheet => "Sheets",
            ViewType::Ai => "Assistant",
            ViewType::Islam => "Islam",
            ViewType::Gallery => "Gallery",
            ViewType::Notbot => "NotBot",
            ViewType::Settings => "Settings",
        }
    }

    /// Dashboard, NotBot and Settings are public; everything else needs a
    /// signed-in user
    pub fn requires_auth(self) -> bool {
        !matches!(
            self,
            ViewType::Dashboard | ViewType::Notbot | ViewType::Settings
        )
    }
}

/// Outcome of a navigation request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "access", content = "view", rename_all = "camelCase")]
pub enum ViewAccess {
    Granted(ViewType),
    SignInRequired,
}

/// Gate a navigation request on the current session
pub fn resolve(view: ViewType, user: Option<&User>) -> ViewAccess {
    if view.requires_auth() && user.is_none() {
        tracing::debug!("View {:?} requires sign-in", view);
        ViewAccess::SignInRequired
    } else {
        ViewAccess::Granted(view)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user() -> User {
        User {
            id: "u1".to_string(),
            name: "Amina".to_string(),
            email: "amina@example.com".to_string(),
        }
    }

    #[test]
    fn test_public_views_open_without_session() {
        for view in [ViewType::Dashboard, ViewType::Notbot, ViewType::Settings] {
            assert_eq!(resolve(view, None), ViewAccess::Granted(view));
        }
    }

    #[test]
    fn test_private_views_need_session() {
        assert_eq!(resolve(ViewType::Docs, None), ViewAccess::SignInRequired);
        assert_eq!(resolve(ViewType::Files, None), ViewAccess::SignInRequired);

        let user = user();
        assert_eq!(
            resolve(ViewType::Docs, Some(&user)),
            ViewAccess::Granted(ViewType::Docs)
        );
    }

    #[test]
    fn test_view_serialization() {
        assert_eq!(serde_json::to_string(&ViewType::Ai).unwrap(), r#""ai""#);
        let view: ViewType = serde_json::from_str(r#""calendar""#).unwrap();
        assert_eq!(view, ViewType::Calendar);
        assert_eq!(ViewType::Calendar.label(), "Planner");
    }
}
