//! Threshold rule turning a prediction into a trading decision

use crate::types::{Prediction, TradeAction, TradingDecision, Trend};

/// Minimum confidence (exclusive) required to trade.
pub const CONFIDENCE_THRESHOLD: f64 = 70.0;

/// Decide whether to trade on a prediction.
///
/// Trades only when confidence is strictly above the threshold and the
/// trend has a direction: bullish buys, bearish sells, neutral holds.
pub fn make_trading_decision(prediction: &Prediction) -> TradingDecision {
    decide(prediction.trend, prediction.confidence)
}

/// Pure form of [`make_trading_decision`] over its two inputs.
pub fn decide(trend: Trend, confidence: f64) -> TradingDecision {
    if confidence > CONFIDENCE_THRESHOLD {
        match trend {
            Trend::Bullish => {
                return TradingDecision::trade(TradeAction::Buy, "Strong bullish signal", confidence)
            }
            Trend::Bearish => {
                return TradingDecision::trade(TradeAction::Sell, "Strong bearish signal", confidence)
            }
            Trend::Neutral => {}
        }
    }

    TradingDecision::hold(confidence)
}
