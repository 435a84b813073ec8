//! Event handling for the TUI.

use crossterm::event::{self, Event as CrosstermEvent, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use std::time::Duration;
use tokio::sync::mpsc;

/// Events that can occur in the TUI.
#[derive(Debug, Clone)]
pub enum Event {
    /// Keyboard input.
    Key(KeyEvent),
    /// Tick for periodic redraws.
    Tick,
    Resize(u16, u16),
}

/// Polls crossterm on a blocking thread and forwards events over a channel.
pub struct EventHandler {
    rx: mpsc::UnboundedReceiver<Event>,
}

impl EventHandler {
    pub fn new(tick_rate: Duration) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();

        tokio::task::spawn_blocking(move || loop {
            let event = if event::poll(tick_rate).unwrap_or(false) {
                match event::read() {
                    Ok(CrosstermEvent::Key(key)) if key.kind == KeyEventKind::Press => Event::Key(key),
                    Ok(CrosstermEvent::Resize(w, h)) => Event::Resize(w, h),
                    _ => continue,
                }
            } else {
                Event::Tick
            };

            if tx.send(event).is_err() {
                break;
            }
        });

        Self { rx }
    }

    /// Receive the next event.
    pub async fn next(&mut self) -> Option<Event> {
        self.rx.recv().await
    }
}

/// Check if a key event matches a key code without modifiers (shift allowed).
pub fn is_key(event: &KeyEvent, code: KeyCode) -> bool {
    event.code == code && event.modifiers.difference(KeyModifiers::SHIFT).is_empty()
}

/// Check for a character key, ignoring case.
pub fn is_char(event: &KeyEvent, c: char) -> bool {
    match event.code {
        KeyCode::Char(k) => k.eq_ignore_ascii_case(&c) && !event.modifiers.contains(KeyModifiers::CONTROL),
        _ => false,
    }
}

/// Ctrl+C always quits.
pub fn is_force_quit(event: &KeyEvent) -> bool {
    event.code == KeyCode::Char('c') && event.modifiers.contains(KeyModifiers::CONTROL)
}

/// Check if a key event is a quit request.
pub fn is_quit(event: &KeyEvent) -> bool {
    is_force_quit(event) || is_key(event, KeyCode::Char('q'))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quit_keys() {
        assert!(is_quit(&KeyEvent::new(KeyCode::Char('q'), KeyModifiers::NONE)));
        assert!(is_quit(&KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL)));
        assert!(!is_quit(&KeyEvent::new(KeyCode::Char('c'), KeyModifiers::NONE)));
    }

    #[test]
    fn test_is_char_ignores_case() {
        assert!(is_char(&KeyEvent::new(KeyCode::Char('B'), KeyModifiers::SHIFT), 'b'));
        assert!(!is_char(&KeyEvent::new(KeyCode::Char('b'), KeyModifiers::CONTROL), 'b'));
    }
}
