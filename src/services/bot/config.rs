//! Bot settings types

use serde::{Deserialize, Serialize};

/// Risk appetite of the bot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl RiskLevel {
    pub fn display_name(&self) -> &'static str {
        match self {
            RiskLevel::Low => "Low",
            RiskLevel::Medium => "Medium",
            RiskLevel::High => "High",
        }
    }
}

/// Settings the bot trades with
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BotSettings {
    /// Symbol the bot trades
    pub symbol: String,

    /// Quantity per trade (base currency units)
    pub quantity: f64,

    pub risk_level: RiskLevel,

    pub use_stop_loss: bool,

    /// Stop loss percentage (0-100)
    pub stop_loss_percent: f64,

    /// Take profit percentage (0-100)
    pub take_profit_percent: f64,
}

impl Default for BotSettings {
    fn default() -> Self {
        Self {
            symbol: "BTCUSDT".to_string(),
            quantity: 0.001,
            risk_level: RiskLevel::Medium,
            use_stop_loss: true,
            stop_loss_percent: 2.0,
            take_profit_percent: 4.0,
        }
    }
}
