use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::TradeAction;

/// Latest simulated quote for a symbol.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceQuote {
    pub symbol: String,
    pub price: f64,
    /// Percent change, independent of the previous quote
    pub change: f64,
    pub last_updated: DateTime<Utc>,
}

impl PriceQuote {
    /// Price as shown in the price widget.
    pub fn formatted_price(&self) -> String {
        format_price(&self.symbol, self.price)
    }

    /// Percent change as shown in the price widget.
    pub fn formatted_change(&self) -> String {
        format_change(self.change)
    }

    pub fn is_positive(&self) -> bool {
        self.change >= 0.0
    }
}

/// Format a price with a dollar sign. ADA is quoted with 4 decimals,
/// everything else with 2.
pub fn format_price(symbol: &str, price: f64) -> String {
    if symbol == "ADAUSDT" {
        format!("${:.4}", price)
    } else {
        format!("${:.2}", price)
    }
}

/// Format a percent change with an explicit sign, e.g. `+1.25%`.
pub fn format_change(change: f64) -> String {
    let sign = if change >= 0.0 { "+" } else { "" };
    format!("{}{:.2}%", sign, change)
}

/// Market data handed to a trading strategy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketSnapshot {
    pub symbol: String,
    pub price: f64,
    pub volume: f64,
    pub timestamp: DateTime<Utc>,
}

/// Predicted market direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Bullish,
    Bearish,
    Neutral,
}

impl Trend {
    pub const ALL: [Trend; 3] = [Trend::Bullish, Trend::Bearish, Trend::Neutral];

    pub fn as_str(&self) -> &'static str {
        match self {
            Trend::Bullish => "bullish",
            Trend::Bearish => "bearish",
            Trend::Neutral => "neutral",
        }
    }
}

/// Output of a trading strategy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Prediction {
    pub trend: Trend,
    /// Confidence in the trend (0-100)
    pub confidence: f64,
    pub price_target: f64,
    pub timestamp: DateTime<Utc>,
}

/// Whether and how to trade on a prediction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TradingDecision {
    pub should_trade: bool,
    pub action: Option<TradeAction>,
    pub reason: Option<String>,
    pub confidence: f64,
}

impl TradingDecision {
    pub fn hold(confidence: f64) -> Self {
        Self {
            should_trade: false,
            action: None,
            reason: None,
            confidence,
        }
    }

    pub fn trade(action: TradeAction, reason: &str, confidence: f64) -> Self {
        Self {
            should_trade: true,
            action: Some(action),
            reason: Some(reason.to_string()),
            confidence,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_price_decimals() {
        assert_eq!(format_price("BTCUSDT", 35123.456), "$35123.46");
        assert_eq!(format_price("ETHUSDT", 2000.0), "$2000.00");
        assert_eq!(format_price("ADAUSDT", 0.54321), "$0.5432");
    }

    #[test]
    fn test_format_change_sign() {
        assert_eq!(format_change(1.234), "+1.23%");
        assert_eq!(format_change(0.0), "+0.00%");
        assert_eq!(format_change(-1.5), "-1.50%");
    }

    #[test]
    fn test_quote_direction() {
        let quote = PriceQuote {
            symbol: "ETHUSDT".to_string(),
            price: 2050.0,
            change: -0.01,
            last_updated: Utc::now(),
        };
        assert!(!quote.is_positive());
        assert_eq!(quote.formatted_change(), "-0.01%");
        assert_eq!(quote.formatted_price(), "$2050.00");
    }

    #[test]
    fn test_trend_serialization() {
        assert_eq!(serde_json::to_string(&Trend::Bullish).unwrap(), "\"bullish\"");
        let trend: Trend = serde_json::from_str("\"neutral\"").unwrap();
        assert_eq!(trend, Trend::Neutral);
    }
}
