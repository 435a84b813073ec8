//! Settings view - API credentials form.

use crate::types::{mask, Credentials};
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use super::{events, Command, Theme};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    ApiKey,
    ApiSecret,
}

/// Credentials being edited.
#[derive(Debug, Clone, Default)]
pub struct SettingsForm {
    pub api_key: String,
    pub api_secret: String,
    pub use_testnet: bool,
    editing: Option<Field>,
}

impl SettingsForm {
    pub fn from_credentials(credentials: &Credentials) -> Self {
        Self {
            api_key: credentials.api_key.clone(),
            api_secret: credentials.api_secret.clone(),
            use_testnet: credentials.use_testnet,
            editing: None,
        }
    }

    pub fn is_editing(&self) -> bool {
        self.editing.is_some()
    }

    fn field_mut(&mut self, field: Field) -> &mut String {
        match field {
            Field::ApiKey => &mut self.api_key,
            Field::ApiSecret => &mut self.api_secret,
        }
    }

    fn save(&self) -> Command {
        Command::SaveSettings {
            api_key: self.api_key.clone(),
            api_secret: self.api_secret.clone(),
            use_testnet: self.use_testnet,
        }
    }
}

/// Render the settings view.
pub fn render(frame: &mut Frame, area: Rect, theme: &Theme, form: &SettingsForm) {
    let value_style = |field: Field| {
        if form.editing == Some(field) {
            theme.editing()
        } else {
            theme.title()
        }
    };

    // The secret is only shown in clear while it is being typed
    let secret = if form.editing == Some(Field::ApiSecret) {
        form.api_secret.clone()
    } else {
        mask(&form.api_secret)
    };
    let network = Credentials::new("", "", form.use_testnet).network_name();

    let lines = vec![
        Line::from(vec![
            Span::styled("API Key:    ", theme.muted()),
            Span::styled(form.api_key.clone(), value_style(Field::ApiKey)),
        ]),
        Line::from(vec![
            Span::styled("API Secret: ", theme.muted()),
            Span::styled(secret, value_style(Field::ApiSecret)),
        ]),
        Line::from(vec![
            Span::styled("Network:    ", theme.muted()),
            Span::styled(network, theme.title()),
        ]),
        Line::from(""),
        Line::from(vec![
            Span::styled("[k]", theme.info()),
            Span::raw(" Edit key  "),
            Span::styled("[e]", theme.info()),
            Span::raw(" Edit secret  "),
            Span::styled("[n]", theme.info()),
            Span::raw(" Toggle network"),
        ]),
        Line::from(vec![
            Span::styled("[s]", theme.success()),
            Span::raw(" Save  "),
            Span::styled("[t]", theme.warning()),
            Span::raw(" Test connection  "),
            Span::styled("[Enter/Esc]", theme.muted()),
            Span::raw(" Finish editing"),
        ]),
    ];

    let block = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .title("⚙ API Settings")
            .border_style(theme.border()),
    );
    frame.render_widget(block, area);
}

/// Handle keyboard events for the settings view.
pub fn handle_event(key: &KeyEvent, form: &mut SettingsForm) -> Option<Command> {
    if let Some(field) = form.editing {
        match key.code {
            KeyCode::Enter | KeyCode::Esc | KeyCode::Tab => form.editing = None,
            KeyCode::Backspace => {
                form.field_mut(field).pop();
            }
            KeyCode::Char(c) => form.field_mut(field).push(c),
            _ => {}
        }
        return None;
    }

    if events::is_char(key, 'k') {
        form.editing = Some(Field::ApiKey);
    } else if events::is_char(key, 'e') {
        form.editing = Some(Field::ApiSecret);
    } else if events::is_char(key, 'n') {
        form.use_testnet = !form.use_testnet;
    } else if events::is_char(key, 's') {
        return Some(form.save());
    } else if events::is_char(key, 't') {
        return Some(Command::TestConnection);
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;

    fn press(form: &mut SettingsForm, code: KeyCode) -> Option<Command> {
        handle_event(&KeyEvent::new(code, KeyModifiers::NONE), form)
    }

    #[test]
    fn test_edit_and_save() {
        let mut form = SettingsForm::from_credentials(&Credentials::new("", "", true));

        press(&mut form, KeyCode::Char('k'));
        for c in "abcx".chars() {
            press(&mut form, KeyCode::Char(c));
        }
        press(&mut form, KeyCode::Backspace);
        press(&mut form, KeyCode::Enter);

        press(&mut form, KeyCode::Char('e'));
        for c in "s3cret".chars() {
            press(&mut form, KeyCode::Char(c));
        }
        press(&mut form, KeyCode::Esc);
        press(&mut form, KeyCode::Char('n'));

        assert_eq!(
            press(&mut form, KeyCode::Char('s')),
            Some(Command::SaveSettings {
                api_key: "abc".to_string(),
                api_secret: "s3cret".to_string(),
                use_testnet: false,
            })
        );
        assert_eq!(press(&mut form, KeyCode::Char('t')), Some(Command::TestConnection));
    }
}
