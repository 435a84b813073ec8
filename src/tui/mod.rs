//! Terminal UI for driving TradeSense from the console.

mod app;
mod bot;
mod dashboard;
mod events;
mod logs;
mod settings;
mod state;
mod theme;
mod trading;

pub use app::{run_tui, App, Command};
pub use state::{LogBuffer, LogMakeWriter};
pub use theme::Theme;

use crate::types::Section;

/// Route/View enum for navigation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Dashboard,
    Trading,
    Bot,
    Settings,
    Logs,
}

impl Route {
    /// Get all available routes.
    pub fn all() -> Vec<Self> {
        vec![
            Self::Dashboard,
            Self::Trading,
            Self::Bot,
            Self::Settings,
            Self::Logs,
        ]
    }

    /// Get the route name.
    pub fn name(&self) -> &str {
        match self {
            Self::Dashboard => "Dashboard",
            Self::Trading => "Trading",
            Self::Bot => "AI Bot",
            Self::Settings => "Settings",
            Self::Logs => "Logs",
        }
    }

    /// Get the route shortcut key.
    pub fn key(&self) -> char {
        match self {
            Self::Dashboard => '1',
            Self::Trading => '2',
            Self::Bot => '3',
            Self::Settings => '4',
            Self::Logs => '5',
        }
    }

    /// Controller section shown by this route. Logs is terminal-only.
    pub fn section(&self) -> Option<Section> {
        match self {
            Self::Dashboard => Some(Section::Dashboard),
            Self::Trading => Some(Section::Trading),
            Self::Bot => Some(Section::Bot),
            Self::Settings => Some(Section::Settings),
            Self::Logs => None,
        }
    }
}

impl From<Section> for Route {
    fn from(section: Section) -> Self {
        match section {
            Section::Dashboard => Self::Dashboard,
            Section::Trading => Self::Trading,
            Section::Bot => Self::Bot,
            Section::Settings => Self::Settings,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_route_keys_are_unique() {
        let keys: Vec<char> = Route::all().iter().map(|r| r.key()).collect();
        assert_eq!(keys, vec!['1', '2', '3', '4', '5']);
    }

    #[test]
    fn test_sections_map_back_to_routes() {
        for section in Section::ALL {
            assert_eq!(Route::from(section).section(), Some(section));
        }
        assert_eq!(Route::Logs.section(), None);
    }
}
