//! Trade records and performance accounting.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Side of a trade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TradeAction {
    Buy,
    Sell,
}

impl TradeAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            TradeAction::Buy => "BUY",
            TradeAction::Sell => "SELL",
        }
    }

    /// Parse a side as typed into a form ("buy", " SELL ", ...).
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "BUY" => Some(TradeAction::Buy),
            "SELL" => Some(TradeAction::Sell),
            _ => None,
        }
    }
}

impl fmt::Display for TradeAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A simulated trade, as persisted in the trade history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Trade {
    /// Millisecond timestamp id, strictly increasing within a process
    pub id: i64,
    pub symbol: String,
    pub action: TradeAction,
    pub quantity: f64,
    /// Simulated execution price
    pub price: f64,
    pub timestamp: DateTime<Utc>,
    pub reason: String,
    /// Prediction confidence (0-100) behind the trade
    pub confidence: f64,
}

impl Trade {
    /// Quote-currency value of the trade at its execution price.
    pub fn notional(&self) -> f64 {
        self.quantity * self.price
    }

    /// Mark-to-market P&L of the trade against `mark_price`.
    pub fn pnl_at(&self, mark_price: f64) -> f64 {
        match self.action {
            TradeAction::Buy => (mark_price - self.price) * self.quantity,
            TradeAction::Sell => (self.price - mark_price) * self.quantity,
        }
    }
}

/// Aggregate statistics over the trade history.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PerformanceStats {
    pub total_trades: usize,
    pub buy_trades: usize,
    pub sell_trades: usize,
    pub winning_trades: usize,
    pub total_volume: f64,
    pub total_profit: f64,
    /// Percentage of trades with positive P&L (0-100)
    pub win_rate: f64,
}

impl PerformanceStats {
    /// Compute stats, marking each trade against the price of its symbol
    /// in `marks`. Trades without a mark contribute zero P&L.
    pub fn compute(trades: &[Trade], marks: &HashMap<String, f64>) -> Self {
        let mut stats = PerformanceStats {
            total_trades: trades.len(),
            ..Default::default()
        };

        for trade in trades {
            match trade.action {
                TradeAction::Buy => stats.buy_trades += 1,
                TradeAction::Sell => stats.sell_trades += 1,
            }
            stats.total_volume += trade.notional();

            if let Some(&mark) = marks.get(&trade.symbol) {
                let pnl = trade.pnl_at(mark);
                stats.total_profit += pnl;
                if pnl > 0.0 {
                    stats.winning_trades += 1;
                }
            }
        }

        stats.win_rate = if stats.total_trades > 0 {
            stats.winning_trades as f64 / stats.total_trades as f64 * 100.0
        } else {
            0.0
        };

        stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn trade(action: TradeAction, price: f64, quantity: f64) -> Trade {
        Trade {
            id: 1,
            symbol: "BTCUSDT".to_string(),
            action,
            quantity,
            price,
            timestamp: Utc::now(),
            reason: "test".to_string(),
            confidence: 80.0,
        }
    }

    #[test]
    fn test_action_parse() {
        assert_eq!(TradeAction::parse("BUY"), Some(TradeAction::Buy));
        assert_eq!(TradeAction::parse(" sell "), Some(TradeAction::Sell));
        assert_eq!(TradeAction::parse("hold"), None);
    }

    #[test]
    fn test_trade_serializes_camel_case_uppercase_action() {
        let json = serde_json::to_value(trade(TradeAction::Sell, 35000.0, 0.001)).unwrap();
        assert_eq!(json["action"], "SELL");
        assert!(json.get("timestamp").is_some());
        assert_eq!(json["quantity"], 0.001);
    }

    #[test]
    fn test_pnl_direction() {
        let buy = trade(TradeAction::Buy, 100.0, 2.0);
        let sell = trade(TradeAction::Sell, 100.0, 2.0);

        assert_eq!(buy.pnl_at(110.0), 20.0);
        assert_eq!(sell.pnl_at(110.0), -20.0);
        assert_eq!(sell.pnl_at(90.0), 20.0);
    }

    #[test]
    fn test_performance_stats() {
        let trades = vec![
            trade(TradeAction::Buy, 100.0, 1.0),
            trade(TradeAction::Buy, 120.0, 1.0),
            trade(TradeAction::Sell, 130.0, 1.0),
        ];
        let marks = HashMap::from([("BTCUSDT".to_string(), 110.0)]);

        let stats = PerformanceStats::compute(&trades, &marks);
        assert_eq!(stats.total_trades, 3);
        assert_eq!(stats.buy_trades, 2);
        assert_eq!(stats.sell_trades, 1);
        assert_eq!(stats.winning_trades, 2);
        assert_eq!(stats.total_profit, 10.0 - 10.0 + 20.0);
        assert!((stats.win_rate - 66.666).abs() < 0.01);
        assert_eq!(stats.total_volume, 350.0);
    }

    #[test]
    fn test_performance_stats_empty_and_unmarked() {
        assert_eq!(PerformanceStats::compute(&[], &HashMap::new()).win_rate, 0.0);

        let stats = PerformanceStats::compute(&[trade(TradeAction::Buy, 1.0, 1.0)], &HashMap::new());
        assert_eq!(stats.total_profit, 0.0);
        assert_eq!(stats.winning_trades, 0);
    }
}
