//! Bot view - lifecycle controls, loop counters and performance.

use crate::services::BotState;
use crate::AppState;
use crossterm::event::KeyEvent;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use super::{events, Command, Theme};

/// Render the bot view.
pub fn render(frame: &mut Frame, area: Rect, app_state: &AppState, theme: &Theme) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(area);

    render_status(frame, chunks[0], app_state, theme);
    render_performance(frame, chunks[1], app_state, theme);
}

fn field(name: &str, value: String, theme: &Theme) -> Line<'static> {
    Line::from(vec![Span::styled(format!("{:<18}", name), theme.muted()), Span::raw(value)])
}

fn render_status(frame: &mut Frame, area: Rect, app_state: &AppState, theme: &Theme) {
    let status = app_state.bot.status();
    let (state_label, state_style) = match status.state {
        BotState::Running => ("● Running", theme.success()),
        BotState::Stopped => ("○ Stopped", theme.muted()),
    };

    let mut lines = vec![
        Line::from(vec![
            Span::styled(format!("{:<18}", "Status"), theme.muted()),
            Span::styled(state_label, state_style),
        ]),
        field("Initialized", status.initialized.to_string(), theme),
        field("Strategy", status.strategy.clone(), theme),
        field("Symbol", status.settings.symbol.clone(), theme),
        field("Quantity", status.settings.quantity.to_string(), theme),
        field("Risk", status.settings.risk_level.display_name().to_string(), theme),
        field(
            "Stop loss / TP",
            format!(
                "{}% / {}%{}",
                status.settings.stop_loss_percent,
                status.settings.take_profit_percent,
                if status.settings.use_stop_loss { "" } else { " (off)" }
            ),
            theme,
        ),
        Line::from(""),
        field("Iterations", status.iterations.to_string(), theme),
        field("Trades executed", status.trades_executed.to_string(), theme),
        field(
            "Errors",
            format!("{} ({} in a row)", status.total_errors, status.consecutive_errors),
            theme,
        ),
    ];

    if let Some(error) = &status.last_error {
        lines.push(Line::from(vec![
            Span::styled(format!("{:<18}", "Last error"), theme.muted()),
            Span::styled(error.clone(), theme.error()),
        ]));
    }

    lines.push(Line::from(""));
    lines.push(Line::from(vec![
        Span::styled("[s]", theme.success()),
        Span::raw(" Start  "),
        Span::styled("[x]", theme.error()),
        Span::raw(" Stop"),
    ]));

    let block = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .title("🤖 AI Trading Bot")
            .border_style(theme.border()),
    );
    frame.render_widget(block, area);
}

fn render_performance(frame: &mut Frame, area: Rect, app_state: &AppState, theme: &Theme) {
    let lines = match app_state.bot.performance_stats(&app_state.mark_prices()) {
        Ok(stats) => vec![
            field("Total trades", stats.total_trades.to_string(), theme),
            field("Buys / Sells", format!("{} / {}", stats.buy_trades, stats.sell_trades), theme),
            field("Volume", format!("${:.2}", stats.total_volume), theme),
            Line::from(vec![
                Span::styled(format!("{:<18}", "P&L (marked)"), theme.muted()),
                Span::styled(
                    format!("${:.2}", stats.total_profit),
                    theme.change(stats.total_profit >= 0.0),
                ),
            ]),
            field("Win rate", format!("{:.1}%", stats.win_rate), theme),
        ],
        Err(e) => vec![Line::from(Span::styled(e.to_string(), theme.error()))],
    };

    let block = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .title("📊 Performance")
            .border_style(theme.border()),
    );
    frame.render_widget(block, area);
}

/// Handle keyboard events for the bot view.
pub fn handle_event(key: &KeyEvent) -> Option<Command> {
    if events::is_char(key, 's') {
        Some(Command::StartBot)
    } else if events::is_char(key, 'x') {
        Some(Command::StopBot)
    } else {
        None
    }
}
