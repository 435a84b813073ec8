//! TradeSense - simulated crypto trading dashboard with a paper AI trading bot

pub mod api;
pub mod config;
pub mod error;
pub mod services;
pub mod tui;
pub mod types;

use axum::Router;
use config::Config;
use services::{
    AiTradingBot, MarketData, NotificationCenter, RandomStrategy, SimulatedExchange, SqliteStore,
    TradeSenseApp, TradingCharts,
};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Application state shared across handlers and the terminal UI.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub store: Arc<SqliteStore>,
    pub notifications: NotificationCenter,
    pub market_data: Arc<MarketData>,
    pub charts: Arc<TradingCharts>,
    pub bot: Arc<AiTradingBot>,
    pub app: Arc<TradeSenseApp>,
}

impl AppState {
    /// Wire up all services over an opened store.
    pub fn new(config: Arc<Config>, store: Arc<SqliteStore>) -> error::Result<Self> {
        let notifications = NotificationCenter::new(config.notification_capacity);
        let market_data = MarketData::new(config.market_update_interval);
        let charts = TradingCharts::new(config.chart_window, config.chart_update_interval);

        let bot = Arc::new(AiTradingBot::new(
            Arc::new(RandomStrategy::new()),
            Arc::new(SimulatedExchange::new(config.connection_delay)),
            store.clone(),
            notifications.clone(),
            config.bot.clone(),
        ));
        let app = Arc::new(TradeSenseApp::new(bot.clone(), store.clone(), notifications.clone())?);

        Ok(Self {
            config,
            store,
            notifications,
            market_data,
            charts,
            bot,
            app,
        })
    }

    /// Start the market and chart refresh timers.
    pub fn start_background_tasks(&self, shutdown_tx: &broadcast::Sender<()>) -> Vec<JoinHandle<()>> {
        self.market_data.fetch_all_prices();
        vec![
            self.market_data.start_auto_update(shutdown_tx.subscribe()),
            self.charts.start_auto_update(shutdown_tx.subscribe()),
        ]
    }

    /// Current quote per symbol, used to mark trades to market.
    pub fn mark_prices(&self) -> HashMap<String, f64> {
        self.market_data
            .get_all_prices()
            .into_iter()
            .map(|quote| (quote.symbol, quote.price))
            .collect()
    }
}

/// Build the HTTP router.
pub fn app_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .merge(api::router())
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
