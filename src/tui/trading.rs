//! Trading view - manual trade form and trade history.

use crate::types::TradeAction;
use crate::AppState;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Row, Table},
    Frame,
};

use super::{events, Command, Theme};

const PAIRS: [&str; 3] = ["BTC/USDT", "ETH/USDT", "ADA/USDT"];
const AMOUNTS: [f64; 8] = [0.001, 0.01, 0.1, 0.5, 1.0, 5.0, 10.0, 100.0];
const HISTORY_ROWS: usize = 15;

/// Manual trade form.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TradeForm {
    pair_index: usize,
    amount_index: usize,
}

impl TradeForm {
    pub fn pair(&self) -> &'static str {
        PAIRS[self.pair_index]
    }

    pub fn amount(&self) -> f64 {
        AMOUNTS[self.amount_index]
    }

    fn next_pair(&mut self) {
        self.pair_index = (self.pair_index + 1) % PAIRS.len();
    }

    fn increase(&mut self) {
        self.amount_index = (self.amount_index + 1).min(AMOUNTS.len() - 1);
    }

    fn decrease(&mut self) {
        self.amount_index = self.amount_index.saturating_sub(1);
    }

    fn submit(&self, side: TradeAction) -> Command {
        Command::ManualTrade {
            symbol: self.pair().to_string(),
            side,
            amount: self.amount().to_string(),
        }
    }
}

/// Render the trading view.
pub fn render(frame: &mut Frame, area: Rect, app_state: &AppState, theme: &Theme, form: &TradeForm) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(35), Constraint::Percentage(65)])
        .split(area);

    render_form(frame, chunks[0], app_state, theme, form);
    render_history(frame, chunks[1], app_state, theme);
}

fn render_form(frame: &mut Frame, area: Rect, app_state: &AppState, theme: &Theme, form: &TradeForm) {
    let symbol = form.pair().replace('/', "");
    let price = app_state
        .market_data
        .get_price(&symbol)
        .map(|q| q.formatted_price())
        .unwrap_or_else(|| "-".to_string());

    let lines = vec![
        Line::from(vec![
            Span::styled("Pair:   ", theme.muted()),
            Span::styled(form.pair(), theme.title()),
        ]),
        Line::from(vec![
            Span::styled("Price:  ", theme.muted()),
            Span::raw(price),
        ]),
        Line::from(vec![
            Span::styled("Amount: ", theme.muted()),
            Span::styled(form.amount().to_string(), theme.title()),
        ]),
        Line::from(""),
        Line::from(vec![
            Span::styled("[b]", theme.success()),
            Span::raw(" Buy  "),
            Span::styled("[s]", theme.error()),
            Span::raw(" Sell"),
        ]),
        Line::from(vec![
            Span::styled("[p]", theme.info()),
            Span::raw(" Pair  "),
            Span::styled("[+/-]", theme.info()),
            Span::raw(" Amount"),
        ]),
    ];

    let block = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .title("💱 Manual Trade")
            .border_style(theme.border()),
    );
    frame.render_widget(block, area);
}

fn render_history(frame: &mut Frame, area: Rect, app_state: &AppState, theme: &Theme) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title("📜 Trade History")
        .border_style(theme.border());

    let trades = match app_state.bot.trade_history() {
        Ok(trades) => trades,
        Err(e) => {
            let error = Paragraph::new(Line::from(Span::styled(e.to_string(), theme.error()))).block(block);
            frame.render_widget(error, area);
            return;
        }
    };

    let rows: Vec<Row> = trades
        .iter()
        .rev()
        .take(HISTORY_ROWS)
        .map(|t| {
            let side_style = theme.change(t.action == TradeAction::Buy);
            Row::new(vec![
                Span::raw(t.timestamp.format("%H:%M:%S").to_string()),
                Span::raw(t.symbol.clone()),
                Span::styled(t.action.as_str(), side_style),
                Span::raw(t.quantity.to_string()),
                Span::raw(format!("{:.2}", t.price)),
                Span::raw(t.reason.clone()),
            ])
        })
        .collect();

    let widths = [
        Constraint::Length(9),
        Constraint::Length(9),
        Constraint::Length(5),
        Constraint::Length(8),
        Constraint::Length(11),
        Constraint::Min(10),
    ];

    let table = Table::new(rows, widths)
        .header(Row::new(vec!["Time", "Symbol", "Side", "Qty", "Price", "Reason"]).style(theme.header()))
        .block(block);

    frame.render_widget(table, area);
}

/// Handle keyboard events for the trading view.
pub fn handle_event(key: &KeyEvent, form: &mut TradeForm) -> Option<Command> {
    if events::is_char(key, 'b') {
        return Some(form.submit(TradeAction::Buy));
    }
    if events::is_char(key, 's') {
        return Some(form.submit(TradeAction::Sell));
    }
    if events::is_char(key, 'p') {
        form.next_pair();
    } else if events::is_key(key, KeyCode::Char('+')) || events::is_key(key, KeyCode::Char('=')) {
        form.increase();
    } else if events::is_key(key, KeyCode::Char('-')) {
        form.decrease();
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;

    fn key(c: char) -> KeyEvent {
        KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE)
    }

    #[test]
    fn test_form_adjustments() {
        let mut form = TradeForm::default();
        handle_event(&key('p'), &mut form);
        assert_eq!(form.pair(), "ETH/USDT");

        handle_event(&key('-'), &mut form);
        assert_eq!(form.amount(), 0.001);
        for _ in 0..20 {
            handle_event(&key('+'), &mut form);
        }
        assert_eq!(form.amount(), 100.0);
    }

    #[test]
    fn test_submit_commands() {
        let mut form = TradeForm::default();
        assert_eq!(
            handle_event(&key('b'), &mut form),
            Some(Command::ManualTrade {
                symbol: "BTC/USDT".to_string(),
                side: TradeAction::Buy,
                amount: "0.001".to_string(),
            })
        );
        assert!(matches!(
            handle_event(&key('s'), &mut form),
            Some(Command::ManualTrade { side: TradeAction::Sell, .. })
        ));
    }
}
