//! Dashboard view - prices, chart and bot summary.

use crate::services::market_data::DEFAULT_SYMBOLS;
use crate::services::BotState;
use crate::AppState;
use crossterm::event::KeyEvent;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    symbols,
    text::{Line, Span},
    widgets::{Axis, Block, Borders, Chart, Dataset, GraphType, Paragraph},
    Frame,
};

use super::{events, Command, Theme};

/// Render the dashboard view.
pub fn render(frame: &mut Frame, area: Rect, app_state: &AppState, theme: &Theme) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(5), // Price widgets
            Constraint::Min(10),   // Chart
            Constraint::Length(4), // Bot summary
        ])
        .split(area);

    render_prices(frame, chunks[0], app_state, theme);
    render_chart(frame, chunks[1], app_state, theme);
    render_bot_summary(frame, chunks[2], app_state, theme);
}

fn render_prices(frame: &mut Frame, area: Rect, app_state: &AppState, theme: &Theme) {
    let quotes = app_state.market_data.get_all_prices();
    let count = quotes.len().max(1) as u32;
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints(vec![Constraint::Ratio(1, count); count as usize])
        .split(area);

    if quotes.is_empty() {
        let block = Paragraph::new(Line::from(Span::styled("Waiting for prices...", theme.muted())))
            .block(Block::default().borders(Borders::ALL).title("Prices").border_style(theme.border()));
        frame.render_widget(block, area);
        return;
    }

    for (quote, column) in quotes.iter().zip(columns.iter()) {
        let arrow = if quote.is_positive() { "▲" } else { "▼" };
        let lines = vec![
            Line::from(Span::styled(quote.formatted_price(), theme.title())),
            Line::from(Span::styled(
                format!("{} {}", arrow, quote.formatted_change()),
                theme.change(quote.is_positive()),
            )),
        ];

        let block = Paragraph::new(lines).block(
            Block::default()
                .borders(Borders::ALL)
                .title(quote.symbol.clone())
                .border_style(theme.border()),
        );
        frame.render_widget(block, *column);
    }
}

fn render_chart(frame: &mut Frame, area: Rect, app_state: &AppState, theme: &Theme) {
    let snapshot = app_state.charts.snapshot();
    let data: Vec<(f64, f64)> = snapshot
        .points
        .iter()
        .enumerate()
        .map(|(i, p)| (i as f64, p.value))
        .collect();

    let (lo, hi) = snapshot.bounds().unwrap_or((0.0, 1.0));
    let pad = ((hi - lo) * 0.05).max(1.0);
    let y_bounds = [lo - pad, hi + pad];
    let x_max = data.len().saturating_sub(1).max(1) as f64;

    let first_label = snapshot.points.first().map(|p| p.label.clone()).unwrap_or_default();
    let last_label = snapshot.points.last().map(|p| p.label.clone()).unwrap_or_default();

    let datasets = vec![Dataset::default()
        .name(snapshot.label.clone())
        .marker(symbols::Marker::Braille)
        .graph_type(GraphType::Line)
        .style(theme.success())
        .data(&data)];

    let chart = Chart::new(datasets)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!(
                    "{} [{}]  (c: symbol, f: timeframe)",
                    snapshot.label,
                    snapshot.timeframe.as_str()
                ))
                .border_style(theme.border()),
        )
        .x_axis(
            Axis::default()
                .style(theme.muted())
                .bounds([0.0, x_max])
                .labels(vec![Span::raw(first_label), Span::raw(last_label)]),
        )
        .y_axis(
            Axis::default()
                .style(theme.muted())
                .bounds(y_bounds)
                .labels(vec![
                    Span::raw(format!("{:.0}", y_bounds[0])),
                    Span::raw(format!("{:.0}", y_bounds[1])),
                ]),
        );

    frame.render_widget(chart, area);
}

fn render_bot_summary(frame: &mut Frame, area: Rect, app_state: &AppState, theme: &Theme) {
    let status = app_state.bot.status();
    let (label, style) = match status.state {
        BotState::Running => ("● Running", theme.success()),
        BotState::Stopped => ("○ Stopped", theme.muted()),
    };

    let lines = vec![Line::from(vec![
        Span::styled("AI Bot: ", theme.muted()),
        Span::styled(label, style),
        Span::raw("  "),
        Span::styled("Trades: ", theme.muted()),
        Span::raw(status.trades_executed.to_string()),
        Span::raw("  "),
        Span::styled("Symbol: ", theme.muted()),
        Span::raw(status.settings.symbol.clone()),
    ])];

    let block = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .title("🤖 Trading Bot")
            .border_style(theme.border()),
    );
    frame.render_widget(block, area);
}

/// Symbol after `current` in the display list.
fn next_symbol(current: &str) -> String {
    let index = DEFAULT_SYMBOLS
        .iter()
        .position(|s| *s == current)
        .map(|i| (i + 1) % DEFAULT_SYMBOLS.len())
        .unwrap_or(0);
    DEFAULT_SYMBOLS[index].to_string()
}

/// Handle keyboard events for the dashboard.
pub fn handle_event(key: &KeyEvent, app_state: &AppState) -> Option<Command> {
    if events::is_char(key, 'c') {
        let snapshot = app_state.charts.snapshot();
        return Some(Command::ChartSymbol(next_symbol(&snapshot.symbol)));
    }
    if events::is_char(key, 'f') {
        let snapshot = app_state.charts.snapshot();
        return Some(Command::ChartTimeframe(snapshot.timeframe.next()));
    }
    None
}
