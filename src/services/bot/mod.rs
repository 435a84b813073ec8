//! AI Trading Bot
//!
//! A simulated trading bot that polls market data, asks a strategy for a
//! prediction, applies a confidence threshold and records the resulting
//! trades. Strategy and exchange are injected so either can be replaced
//! without touching the loop.

pub mod config;
pub mod decision;
pub mod exchange;
pub mod runner;
pub mod strategy;

pub use config::{BotSettings, RiskLevel};
pub use decision::{make_trading_decision, CONFIDENCE_THRESHOLD};
pub use exchange::SimulatedExchange;
pub use runner::{AiTradingBot, BotState, BotStatus};
pub use strategy::RandomStrategy;

use crate::error::AppError;
use crate::types::{Credentials, MarketSnapshot, OperationResult, Prediction, TradeAction};
use std::future::Future;
use std::pin::Pin;

/// Boxed future returned by the bot's pluggable components.
pub type BotFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, AppError>> + Send + 'a>>;

/// Produces a prediction from a market snapshot.
pub trait TradingStrategy: Send + Sync {
    /// Returns the strategy's name
    fn name(&self) -> &str;

    /// Predict the market direction for a snapshot
    fn predict<'a>(&'a self, snapshot: &'a MarketSnapshot) -> BotFuture<'a, Prediction>;
}

/// Exchange operations the bot depends on.
pub trait ExchangeClient: Send + Sync {
    /// Check that the exchange accepts these credentials
    fn test_connection<'a>(&'a self, credentials: &'a Credentials) -> BotFuture<'a, OperationResult>;

    /// Current market data for a symbol
    fn market_snapshot<'a>(&'a self, symbol: &'a str) -> BotFuture<'a, MarketSnapshot>;

    /// Fill price for a market order
    fn execution_price<'a>(&'a self, symbol: &'a str, action: TradeAction) -> BotFuture<'a, f64>;
}
