//! Theme and color definitions for the TUI.

use crate::types::NotificationType;
use ratatui::style::{Color, Modifier, Style};

/// Theme for the TUI with consistent color scheme.
#[derive(Debug, Clone)]
pub struct Theme {
    pub primary: Color,
    pub secondary: Color,
    pub success: Color,
    pub warning: Color,
    pub danger: Color,
    pub info: Color,
    pub muted: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            primary: Color::Cyan,
            secondary: Color::Magenta,
            success: Color::Green,
            warning: Color::Yellow,
            danger: Color::Red,
            info: Color::Blue,
            muted: Color::DarkGray,
        }
    }
}

impl Theme {
    pub fn title(&self) -> Style {
        Style::default()
            .fg(self.primary)
            .add_modifier(Modifier::BOLD)
    }

    pub fn header(&self) -> Style {
        Style::default()
            .fg(self.secondary)
            .add_modifier(Modifier::BOLD)
    }

    pub fn success(&self) -> Style {
        Style::default().fg(self.success)
    }

    pub fn warning(&self) -> Style {
        Style::default().fg(self.warning)
    }

    pub fn error(&self) -> Style {
        Style::default().fg(self.danger)
    }

    pub fn info(&self) -> Style {
        Style::default().fg(self.info)
    }

    pub fn muted(&self) -> Style {
        Style::default().fg(self.muted)
    }

    /// Green for gains, red for losses.
    pub fn change(&self, positive: bool) -> Style {
        if positive {
            self.success()
        } else {
            self.error()
        }
    }

    /// Style for a notification of the given type.
    pub fn notification(&self, notification_type: NotificationType) -> Style {
        match notification_type {
            NotificationType::Success => self.success(),
            NotificationType::Error => self.error(),
            NotificationType::Warning => self.warning(),
            NotificationType::Info => self.info(),
        }
        .add_modifier(Modifier::BOLD)
    }

    /// Style for the field being edited.
    pub fn editing(&self) -> Style {
        Style::default()
            .fg(self.warning)
            .add_modifier(Modifier::UNDERLINED)
    }

    pub fn border(&self) -> Style {
        Style::default().fg(self.primary)
    }

    pub fn tab_active(&self) -> Style {
        Style::default()
            .fg(Color::Black)
            .bg(self.primary)
            .add_modifier(Modifier::BOLD)
    }

    pub fn tab_inactive(&self) -> Style {
        Style::default().fg(self.muted)
    }
}
