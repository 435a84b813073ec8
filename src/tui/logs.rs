//! Logs view - captured tracing output.

use crossterm::event::KeyEvent;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph},
    Frame,
};

use super::{events, LogBuffer, Theme};

const VISIBLE_LINES: usize = 200;

/// Minimum level shown in the Logs view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFilter {
    #[default]
    All,
    Error,
    Warn,
    Info,
}

impl LogFilter {
    fn name(&self) -> &'static str {
        match self {
            LogFilter::All => "All",
            LogFilter::Error => "Error",
            LogFilter::Warn => "Warn",
            LogFilter::Info => "Info",
        }
    }

    fn matches(&self, line: &str) -> bool {
        match self {
            LogFilter::All => true,
            LogFilter::Error => line.contains("ERROR"),
            LogFilter::Warn => line.contains("ERROR") || line.contains("WARN"),
            LogFilter::Info => !line.contains("DEBUG") && !line.contains("TRACE"),
        }
    }
}

/// Render the logs view.
pub fn render(frame: &mut Frame, area: Rect, theme: &Theme, buffer: &LogBuffer, filter: LogFilter) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(0)])
        .split(area);

    render_log_controls(frame, chunks[0], theme, filter);
    render_log_output(frame, chunks[1], theme, buffer, filter);
}

fn render_log_controls(frame: &mut Frame, area: Rect, theme: &Theme, filter: LogFilter) {
    let text = Line::from(vec![
        Span::styled("Filter: ", theme.muted()),
        Span::styled(filter.name(), theme.title()),
        Span::raw("  "),
        Span::styled("[A]", theme.info()),
        Span::raw(" All  "),
        Span::styled("[E]", theme.error()),
        Span::raw(" Error  "),
        Span::styled("[W]", theme.warning()),
        Span::raw(" Warn  "),
        Span::styled("[I]", theme.info()),
        Span::raw(" Info  "),
        Span::styled("[C]", theme.info()),
        Span::raw(" Clear"),
    ]);

    let block = Paragraph::new(text).block(
        Block::default()
            .borders(Borders::ALL)
            .title("📋 Log Controls")
            .border_style(theme.border()),
    );
    frame.render_widget(block, area);
}

fn render_log_output(frame: &mut Frame, area: Rect, theme: &Theme, buffer: &LogBuffer, filter: LogFilter) {
    let lines: Vec<String> = buffer
        .recent(VISIBLE_LINES)
        .into_iter()
        .filter(|line| filter.matches(line))
        .collect();

    let block = Block::default()
        .borders(Borders::ALL)
        .title("📝 Logs (Live)")
        .border_style(theme.border());

    if lines.is_empty() {
        let empty = Paragraph::new(Line::from(Span::styled("No logs yet.", theme.muted())))
            .block(block)
            .centered();
        frame.render_widget(empty, area);
        return;
    }

    let items: Vec<ListItem> = lines
        .into_iter()
        .rev()
        .map(|line| {
            let style = if line.contains("ERROR") {
                theme.error()
            } else if line.contains("WARN") {
                theme.warning()
            } else if line.contains("INFO") {
                theme.success()
            } else {
                theme.muted()
            };
            ListItem::new(Line::from(Span::styled(line, style)))
        })
        .collect();

    frame.render_widget(List::new(items).block(block), area);
}

/// Handle keyboard events for the logs view.
pub fn handle_event(key: &KeyEvent, filter: &mut LogFilter, buffer: &LogBuffer) {
    if events::is_char(key, 'a') {
        *filter = LogFilter::All;
    } else if events::is_char(key, 'e') {
        *filter = LogFilter::Error;
    } else if events::is_char(key, 'w') {
        *filter = LogFilter::Warn;
    } else if events::is_char(key, 'i') {
        *filter = LogFilter::Info;
    } else if events::is_char(key, 'c') {
        buffer.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_levels() {
        let error = "2026-01-01T00:00:00Z ERROR tradesense: boom";
        let debug = "2026-01-01T00:00:00Z DEBUG tradesense: tick";

        assert!(LogFilter::All.matches(debug));
        assert!(LogFilter::Error.matches(error));
        assert!(!LogFilter::Warn.matches(debug));
        assert!(!LogFilter::Info.matches(debug));
        assert!(LogFilter::Info.matches(error));
    }
}
