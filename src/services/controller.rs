//! Application controller
//!
//! Wires user actions (HTTP handlers, terminal hotkeys) to the trading
//! bot and turns every outcome into a notification. Also tracks the
//! selected section and the cached API credentials.

use std::sync::{Arc, RwLock};
use tracing::{debug, info, warn};

use crate::error::AppError;
use crate::services::bot::{AiTradingBot, BotState};
use crate::services::{NotificationCenter, SqliteStore};
use crate::types::{Credentials, Notification, NotificationType, OperationResult, Section, Trade, TradeAction};

/// What the user currently sees
#[derive(Debug, Clone)]
struct ViewState {
    current_section: Section,
    bot_status: BotState,
    api_key: Option<String>,
    api_secret: Option<String>,
    use_testnet: bool,
}

impl ViewState {
    fn credentials(&self) -> Option<Credentials> {
        let (Some(key), Some(secret)) = (&self.api_key, &self.api_secret) else {
            return None;
        };
        let credentials = Credentials::new(key.clone(), secret.clone(), self.use_testnet);
        credentials.is_complete().then_some(credentials)
    }
}

/// The TradeSense controller.
pub struct TradeSenseApp {
    bot: Arc<AiTradingBot>,
    store: Arc<SqliteStore>,
    notifications: NotificationCenter,
    view: RwLock<ViewState>,
}

impl TradeSenseApp {
    /// Create the controller, loading persisted credentials.
    pub fn new(
        bot: Arc<AiTradingBot>,
        store: Arc<SqliteStore>,
        notifications: NotificationCenter,
    ) -> Result<Self, AppError> {
        let (api_key, api_secret, use_testnet) = store.load_credentials()?;
        debug!(
            "Loaded credentials (key present: {}, testnet: {})",
            api_key.is_some(),
            use_testnet
        );

        Ok(Self {
            bot,
            store,
            notifications,
            view: RwLock::new(ViewState {
                current_section: Section::Dashboard,
                bot_status: BotState::Stopped,
                api_key,
                api_secret,
                use_testnet,
            }),
        })
    }

    /// Initialize the bot if credentials were persisted.
    pub async fn init(&self) {
        self.update_bot_status();
        if self.credentials().is_some() {
            self.initialize_trading_bot().await;
        } else {
            info!("No API credentials configured");
        }
    }

    // ========== Bot Lifecycle ==========

    pub async fn initialize_trading_bot(&self) -> OperationResult {
        let credentials = self.cached_credentials();
        let result = self.bot.initialize(credentials).await;

        if result.success {
            self.show_notification("Trading bot initialized successfully!", NotificationType::Success);
        } else {
            self.show_notification(result.message.clone(), NotificationType::Error);
        }
        result
    }

    /// Start the bot. Without credentials, routes to the settings section.
    pub fn start_trading_bot(&self) -> Result<OperationResult, AppError> {
        if self.credentials().is_none() {
            self.show_notification("Please configure API keys first!", NotificationType::Error);
            self.show_section(Section::Settings);
            return Err(AppError::Configuration("API keys not configured".to_string()));
        }

        match self.bot.start() {
            Ok(result) => {
                self.update_bot_status();
                self.show_notification(result.message.clone(), NotificationType::Success);
                Ok(result)
            }
            Err(e) => {
                self.show_notification(
                    format!("Failed to start trading bot: {}", e),
                    NotificationType::Error,
                );
                self.update_bot_status();
                Err(e)
            }
        }
    }

    pub fn stop_trading_bot(&self) -> OperationResult {
        let result = self.bot.stop();
        self.update_bot_status();
        self.show_notification(result.message.clone(), NotificationType::Info);
        result
    }

    /// Execute a trade from the trade form. `symbol` may be written as a
    /// pair (`BTC/USDT`); `side` is BUY or SELL; `amount` is the raw input.
    pub async fn execute_manual_trade(&self, symbol: &str, side: &str, amount: &str) -> Result<Trade, AppError> {
        if self.credentials().is_none() {
            self.show_notification("Please configure API keys first!", NotificationType::Error);
            return Err(AppError::Configuration("API keys not configured".to_string()));
        }

        let symbol = symbol.replace('/', "");
        let outcome = match parse_trade_request(side, amount) {
            Ok((action, quantity)) => {
                self.show_notification(format!("Executing {} order...", action), NotificationType::Info);
                self.bot
                    .execute_manual_trade(&symbol, action, quantity)
                    .await
                    .map(|trade| (action, trade))
            }
            Err(e) => Err(e),
        };

        match outcome {
            Ok((action, trade)) => {
                self.show_notification(
                    format!("{} order executed successfully at ${:.2}", action, trade.price),
                    NotificationType::Success,
                );
                Ok(trade)
            }
            Err(e) => {
                self.show_notification(format!("Trade execution failed: {}", e), NotificationType::Error);
                Err(e)
            }
        }
    }

    // ========== Settings ==========

    /// Persist credentials, cache them and re-initialize the bot.
    pub async fn save_api_settings(
        &self,
        api_key: &str,
        api_secret: &str,
        use_testnet: bool,
    ) -> Result<OperationResult, AppError> {
        let credentials = Credentials::new(api_key.trim(), api_secret.trim(), use_testnet);

        if let Err(e) = self.store.save_credentials(&credentials) {
            self.show_notification(format!("Failed to save API settings: {}", e), NotificationType::Error);
            return Err(e);
        }

        {
            let mut view = self.view.write().unwrap();
            view.api_key = Some(credentials.api_key.clone());
            view.api_secret = Some(credentials.api_secret.clone());
            view.use_testnet = use_testnet;
        }

        let result = self.initialize_trading_bot().await;
        self.show_notification("API settings saved successfully!", NotificationType::Success);
        Ok(result)
    }

    /// Test the cached credentials against the exchange.
    pub async fn test_api_connection(&self) -> Result<OperationResult, AppError> {
        let Some(credentials) = self.credentials() else {
            self.show_notification("Please enter API keys first!", NotificationType::Error);
            return Err(AppError::Configuration("API keys not configured".to_string()));
        };

        self.show_notification("Testing connection...", NotificationType::Info);
        let result = self.bot.test_connection_with(&credentials).await;

        if result.success {
            self.show_notification("Connection successful! API keys are valid.", NotificationType::Success);
        } else {
            self.show_notification(format!("Connection failed: {}", result.message), NotificationType::Error);
        }
        Ok(result)
    }

    /// Complete cached credentials, if any.
    pub fn credentials(&self) -> Option<Credentials> {
        self.view.read().unwrap().credentials()
    }

    /// Cached credentials as entered, possibly blank.
    pub fn cached_credentials(&self) -> Credentials {
        let view = self.view.read().unwrap();
        Credentials::new(
            view.api_key.clone().unwrap_or_default(),
            view.api_secret.clone().unwrap_or_default(),
            view.use_testnet,
        )
    }

    // ========== View ==========

    pub fn show_section(&self, section: Section) {
        debug!("Showing section {}", section.as_str());
        self.view.write().unwrap().current_section = section;
    }

    pub fn current_section(&self) -> Section {
        self.view.read().unwrap().current_section
    }

    /// Sync the cached bot status with the bot.
    pub fn update_bot_status(&self) -> BotState {
        let state = self.bot.status().state;
        self.view.write().unwrap().bot_status = state;
        state
    }

    /// Bot status as last synced; refreshes when the bot stopped itself.
    pub fn bot_status(&self) -> BotState {
        let cached = self.view.read().unwrap().bot_status;
        if cached == BotState::Running && !self.bot.is_running() {
            warn!("Trading bot is no longer running");
            return self.update_bot_status();
        }
        cached
    }

    pub fn show_notification(&self, message: impl Into<String>, notification_type: NotificationType) -> Notification {
        self.notifications.notify(notification_type, message)
    }

    pub fn bot(&self) -> &Arc<AiTradingBot> {
        &self.bot
    }
}

/// Parse the side and raw amount of a manual trade.
pub fn parse_trade_request(side: &str, amount: &str) -> Result<(TradeAction, f64), AppError> {
    let action = TradeAction::parse(side)
        .ok_or_else(|| AppError::BadRequest(format!("Invalid side: {}", side)))?;
    let quantity: f64 = amount
        .trim()
        .parse()
        .map_err(|_| AppError::BadRequest(format!("Invalid amount: {}", amount)))?;
    if !quantity.is_finite() || quantity <= 0.0 {
        return Err(AppError::BadRequest(format!("Invalid amount: {}", amount)));
    }
    Ok((action, quantity))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::BotLoopConfig;
    use crate::services::bot::{RandomStrategy, SimulatedExchange};
    use std::time::Duration;

    fn create_test_app(store: Arc<SqliteStore>) -> TradeSenseApp {
        let notifications = NotificationCenter::new(20);
        let bot = Arc::new(AiTradingBot::new(
            Arc::new(RandomStrategy::with_seed(7)),
            Arc::new(SimulatedExchange::with_seed(Duration::ZERO, 7)),
            store.clone(),
            notifications.clone(),
            BotLoopConfig::default(),
        ));
        TradeSenseApp::new(bot, store, notifications).expect("Failed to create app")
    }

    fn latest_message(app: &TradeSenseApp) -> String {
        app.notifications.latest().map(|n| n.message).unwrap_or_default()
    }

    #[test]
    fn test_parse_trade_request() {
        assert_eq!(parse_trade_request("BUY", "0.5").unwrap(), (TradeAction::Buy, 0.5));
        assert_eq!(parse_trade_request("sell", " 2 ").unwrap(), (TradeAction::Sell, 2.0));
        assert!(parse_trade_request("HOLD", "1").is_err());
        assert!(parse_trade_request("BUY", "abc").is_err());
        assert!(parse_trade_request("BUY", "-1").is_err());
        assert!(parse_trade_request("BUY", "0").is_err());
    }

    #[tokio::test]
    async fn test_start_without_credentials_routes_to_settings() {
        let app = create_test_app(Arc::new(SqliteStore::new_in_memory().unwrap()));

        let err = app.start_trading_bot().unwrap_err();
        assert!(err.is_configuration());
        assert_eq!(app.current_section(), Section::Settings);
        assert_eq!(latest_message(&app), "Please configure API keys first!");
        assert_eq!(app.bot_status(), BotState::Stopped);
    }

    #[tokio::test]
    async fn test_connection_without_credentials() {
        let app = create_test_app(Arc::new(SqliteStore::new_in_memory().unwrap()));

        let err = app.test_api_connection().await.unwrap_err();
        assert!(err.is_configuration());
        assert_eq!(latest_message(&app), "Please enter API keys first!");
    }

    #[tokio::test]
    async fn test_save_settings_initializes_bot() {
        let store = Arc::new(SqliteStore::new_in_memory().unwrap());
        let app = create_test_app(store.clone());

        let result = app.save_api_settings("key", "secret", false).await.unwrap();
        assert!(result.success);
        assert!(app.bot().status().initialized);
        assert_eq!(latest_message(&app), "API settings saved successfully!");

        let (key, secret, testnet) = store.load_credentials().unwrap();
        assert_eq!(key.as_deref(), Some("key"));
        assert_eq!(secret.as_deref(), Some("secret"));
        assert!(!testnet);

        let tested = app.test_api_connection().await.unwrap();
        assert!(tested.success);
        assert_eq!(latest_message(&app), "Connection successful! API keys are valid.");
    }

    #[tokio::test]
    async fn test_save_empty_settings_does_not_initialize() {
        let app = create_test_app(Arc::new(SqliteStore::new_in_memory().unwrap()));

        let result = app.save_api_settings("", "", true).await.unwrap();
        assert!(!result.success);
        assert!(!app.bot().status().initialized);
        assert!(app.credentials().is_none());
    }

    #[tokio::test]
    async fn test_init_loads_persisted_credentials() {
        let store = Arc::new(SqliteStore::new_in_memory().unwrap());
        store.save_credentials(&Credentials::new("k", "s", true)).unwrap();

        let app = create_test_app(store);
        app.init().await;

        assert!(app.bot().status().initialized);
        assert_eq!(latest_message(&app), "Trading bot initialized successfully!");
    }

    #[tokio::test]
    async fn test_blank_persisted_credentials_cannot_start() {
        let store = Arc::new(SqliteStore::new_in_memory().unwrap());
        store.save_credentials(&Credentials::new("   ", "secret", true)).unwrap();

        let app = create_test_app(store);
        app.init().await;
        assert!(app.credentials().is_none());
        assert!(!app.bot().status().initialized);

        let err = app.start_trading_bot().unwrap_err();
        assert!(err.is_configuration());
        assert_eq!(app.current_section(), Section::Settings);
        assert!(!app.bot().is_running());
    }

    #[tokio::test]
    async fn test_start_and_stop() {
        let app = create_test_app(Arc::new(SqliteStore::new_in_memory().unwrap()));
        app.save_api_settings("key", "secret", true).await.unwrap();

        assert!(app.start_trading_bot().unwrap().success);
        assert_eq!(app.bot_status(), BotState::Running);

        let err = app.start_trading_bot().unwrap_err();
        assert!(matches!(err, AppError::BotAlreadyRunning));
        assert_eq!(latest_message(&app), "Failed to start trading bot: Bot is already running");
        assert_eq!(app.bot_status(), BotState::Running);

        assert!(app.stop_trading_bot().success);
        assert_eq!(app.bot_status(), BotState::Stopped);
    }

    #[tokio::test]
    async fn test_manual_trade_strips_pair_separator() {
        let store = Arc::new(SqliteStore::new_in_memory().unwrap());
        let app = create_test_app(store.clone());
        app.save_api_settings("key", "secret", true).await.unwrap();

        let trade = app.execute_manual_trade("ETH/USDT", "SELL", "1.5").await.unwrap();
        assert_eq!(trade.symbol, "ETHUSDT");
        assert_eq!(trade.action, TradeAction::Sell);
        assert_eq!(trade.quantity, 1.5);
        assert!(latest_message(&app).starts_with("SELL order executed successfully at $"));
        assert_eq!(store.trade_count().unwrap(), 1);
    }

    #[tokio::test]
    async fn test_manual_trade_failure_notifies() {
        let store = Arc::new(SqliteStore::new_in_memory().unwrap());
        let app = create_test_app(store.clone());
        app.save_api_settings("key", "secret", true).await.unwrap();

        assert!(app.execute_manual_trade("BTC/USDT", "BUY", "nope").await.is_err());
        assert!(latest_message(&app).starts_with("Trade execution failed:"));
        assert_eq!(store.trade_count().unwrap(), 0);
    }
}
