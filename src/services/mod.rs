pub mod bot;
pub mod charts;
pub mod controller;
pub mod market_data;
pub mod notifications;
pub mod sqlite_store;

pub use bot::{AiTradingBot, BotSettings, BotState, BotStatus, ExchangeClient, RandomStrategy, SimulatedExchange, TradingStrategy};
pub use charts::TradingCharts;
pub use controller::TradeSenseApp;
pub use market_data::MarketData;
pub use notifications::NotificationCenter;
pub use sqlite_store::SqliteStore;
