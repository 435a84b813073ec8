//! Bot Runner
//!
//! Owns the bot's lifecycle: credentials, start/stop, the supervised
//! poll → predict → decide → execute loop, and the trade log.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, RwLock};
use tokio::sync::watch;
use tracing::{debug, error, info, warn};

use crate::config::BotLoopConfig;
use crate::error::AppError;
use crate::services::{NotificationCenter, SqliteStore};
use crate::types::{Credentials, OperationResult, PerformanceStats, Trade, TradeAction, TradingDecision};

use super::{make_trading_decision, BotSettings, ExchangeClient, TradingStrategy};

/// Lifecycle state of the bot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BotState {
    Stopped,
    Running,
}

impl BotState {
    pub fn as_str(&self) -> &'static str {
        match self {
            BotState::Stopped => "stopped",
            BotState::Running => "running",
        }
    }
}

/// Observable status of the bot
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BotStatus {
    pub state: BotState,
    /// Whether the last initialization reached the exchange
    pub initialized: bool,
    pub settings: BotSettings,
    /// Strategy producing predictions
    pub strategy: String,
    /// Loop iterations completed, successful or not
    pub iterations: u64,
    /// Trades executed by the loop since startup
    pub trades_executed: u64,
    /// Failed iterations in a row
    pub consecutive_errors: u32,
    pub total_errors: u64,
    pub last_error: Option<String>,
    /// Last iteration timestamp (ms)
    pub last_iteration_at: Option<i64>,
    /// When the current run started (ms)
    pub started_at: Option<i64>,
    /// Bumped by every start and stop; a loop only writes status while it matches
    #[serde(skip)]
    run: u64,
}

/// The AI trading bot
pub struct AiTradingBot {
    settings: RwLock<BotSettings>,
    credentials: RwLock<Option<Credentials>>,
    status: RwLock<BotStatus>,
    strategy: Arc<dyn TradingStrategy>,
    exchange: Arc<dyn ExchangeClient>,
    store: Arc<SqliteStore>,
    notifications: NotificationCenter,
    loop_config: BotLoopConfig,
    /// Stop signal for the current run
    stop_tx: Mutex<Option<watch::Sender<bool>>>,
    last_trade_id: Mutex<i64>,
}

impl AiTradingBot {
    /// Create a stopped bot with default settings
    pub fn new(
        strategy: Arc<dyn TradingStrategy>,
        exchange: Arc<dyn ExchangeClient>,
        store: Arc<SqliteStore>,
        notifications: NotificationCenter,
        loop_config: BotLoopConfig,
    ) -> Self {
        let settings = BotSettings::default();
        let status = BotStatus {
            state: BotState::Stopped,
            initialized: false,
            settings: settings.clone(),
            strategy: strategy.name().to_string(),
            iterations: 0,
            trades_executed: 0,
            consecutive_errors: 0,
            total_errors: 0,
            last_error: None,
            last_iteration_at: None,
            started_at: None,
            run: 0,
        };

        Self {
            settings: RwLock::new(settings),
            credentials: RwLock::new(None),
            status: RwLock::new(status),
            strategy,
            exchange,
            store,
            notifications,
            loop_config,
            stop_tx: Mutex::new(None),
            last_trade_id: Mutex::new(0),
        }
    }

    // ========== Credentials ==========

    /// Store credentials and verify them against the exchange.
    ///
    /// Blank credentials fail without contacting the exchange.
    pub async fn initialize(&self, credentials: Credentials) -> OperationResult {
        if !credentials.is_complete() {
            self.set_initialized(false);
            *self.credentials.write().unwrap() = None;
            return OperationResult::failed("API key and secret are required");
        }

        info!("Initializing trading bot ({})", credentials.network_name());
        *self.credentials.write().unwrap() = Some(credentials.clone());

        let result = self.test_connection_with(&credentials).await;
        self.set_initialized(result.success);
        result
    }

    /// Test the connection with the stored credentials.
    pub async fn test_connection(&self) -> OperationResult {
        let credentials = self.credentials.read().unwrap().clone();

        match credentials {
            Some(credentials) => self.test_connection_with(&credentials).await,
            None => OperationResult::failed("API credentials not configured"),
        }
    }

    /// Test the connection with explicit credentials. Exchange errors are
    /// reported in the result rather than raised.
    pub async fn test_connection_with(&self, credentials: &Credentials) -> OperationResult {
        match self.exchange.test_connection(credentials).await {
            Ok(result) => result,
            Err(e) => {
                warn!("Connection test failed: {}", e);
                OperationResult::failed(e.to_string())
            }
        }
    }

    fn set_initialized(&self, initialized: bool) {
        self.status.write().unwrap().initialized = initialized;
    }

    // ========== Lifecycle ==========

    /// Start the bot loop. Fails if the bot is already running.
    pub fn start(self: &Arc<Self>) -> Result<OperationResult, AppError> {
        let run = {
            let mut status = self.status.write().unwrap();
            if status.state == BotState::Running {
                return Err(AppError::BotAlreadyRunning);
            }
            status.state = BotState::Running;
            status.consecutive_errors = 0;
            status.started_at = Some(Utc::now().timestamp_millis());
            status.run += 1;
            status.run
        };

        // A fresh channel per run; replacing the sender ends any previous loop.
        let (stop_tx, stop_rx) = watch::channel(false);
        *self.stop_tx.lock().unwrap() = Some(stop_tx);

        let bot = Arc::clone(self);
        tokio::spawn(async move {
            bot.run_loop(run, stop_rx).await;
        });

        info!("Trading bot started");
        Ok(OperationResult::ok("Trading bot started"))
    }

    /// Stop the bot loop. Stopping a stopped bot is a no-op.
    pub fn stop(&self) -> OperationResult {
        let was_running = {
            let mut status = self.status.write().unwrap();
            let was_running = status.state == BotState::Running;
            status.state = BotState::Stopped;
            status.started_at = None;
            status.run += 1;
            was_running
        };

        if let Some(stop_tx) = self.stop_tx.lock().unwrap().take() {
            let _ = stop_tx.send(true);
        }

        if was_running {
            info!("Trading bot stopped");
        }
        OperationResult::ok("Trading bot stopped")
    }

    pub fn is_running(&self) -> bool {
        self.status.read().unwrap().state == BotState::Running
    }

    /// Supervised loop. Stop is observed before every iteration and
    /// interrupts the pause between iterations. An iteration still in
    /// flight when `run` is superseded leaves the status alone.
    async fn run_loop(&self, run: u64, mut stop_rx: watch::Receiver<bool>) {
        debug!(
            "Bot loop running (interval {:?}, retry {:?})",
            self.loop_config.interval, self.loop_config.retry_delay
        );

        loop {
            if *stop_rx.borrow() {
                break;
            }

            let delay = match self.run_iteration().await {
                Ok(_) => {
                    if !self.record_success(run) {
                        break;
                    }
                    self.loop_config.interval
                }
                Err(e) => {
                    error!("Error in bot loop: {}", e);
                    let Some(consecutive) = self.record_failure(run, &e) else {
                        break;
                    };
                    let max = self.loop_config.max_consecutive_errors;
                    if max > 0 && consecutive >= max {
                        self.halt(run, consecutive);
                        break;
                    }
                    self.loop_config.retry_delay
                }
            };

            tokio::select! {
                _ = tokio::time::sleep(delay) => {}
                _ = stop_rx.wait_for(|stop| *stop) => break,
            }
        }

        debug!("Bot loop exited");
    }

    /// Run one poll → predict → decide → execute cycle.
    ///
    /// Returns the executed trade, if the decision was to trade.
    pub async fn run_iteration(&self) -> Result<Option<Trade>, AppError> {
        let symbol = self.settings().symbol;

        let snapshot = self.exchange.market_snapshot(&symbol).await?;
        let prediction = self.strategy.predict(&snapshot).await?;
        let decision = make_trading_decision(&prediction);

        if !decision.should_trade {
            debug!(
                "Holding {}: {} at {:.1}% confidence",
                symbol,
                prediction.trend.as_str(),
                prediction.confidence
            );
            return Ok(None);
        }

        let trade = self.execute_trade(&decision).await?;
        Ok(Some(trade))
    }

    /// Returns false when `run` is no longer current.
    fn record_success(&self, run: u64) -> bool {
        let mut status = self.status.write().unwrap();
        if status.run != run {
            debug!("Discarding result of superseded run {}", run);
            return false;
        }
        status.iterations += 1;
        status.consecutive_errors = 0;
        status.last_iteration_at = Some(Utc::now().timestamp_millis());
        true
    }

    /// Consecutive failures of the current run, or `None` when `run` is stale.
    fn record_failure(&self, run: u64, e: &AppError) -> Option<u32> {
        let mut status = self.status.write().unwrap();
        if status.run != run {
            debug!("Discarding failure of superseded run {}: {}", run, e);
            return None;
        }
        status.iterations += 1;
        status.consecutive_errors += 1;
        status.total_errors += 1;
        status.last_error = Some(e.to_string());
        status.last_iteration_at = Some(Utc::now().timestamp_millis());
        Some(status.consecutive_errors)
    }

    fn halt(&self, run: u64, consecutive: u32) {
        {
            let mut status = self.status.write().unwrap();
            if status.run != run {
                return;
            }
            status.state = BotState::Stopped;
            status.started_at = None;
            status.run += 1;
        }
        warn!("Trading bot halted after {} consecutive errors", consecutive);
        self.notifications.error(format!(
            "Trading bot stopped after {} consecutive errors",
            consecutive
        ));
    }

    // ========== Trades ==========

    /// Execute a decision from the loop and record the trade.
    async fn execute_trade(&self, decision: &TradingDecision) -> Result<Trade, AppError> {
        let action = decision
            .action
            .ok_or_else(|| AppError::Internal("Trade decision without an action".to_string()))?;
        let settings = self.settings();

        let price = self.exchange.execution_price(&settings.symbol, action).await?;
        let trade = Trade {
            id: self.next_trade_id(),
            symbol: settings.symbol,
            action,
            quantity: settings.quantity,
            price,
            timestamp: Utc::now(),
            reason: decision.reason.clone().unwrap_or_default(),
            confidence: decision.confidence,
        };

        self.store.append_trade(&trade)?;
        self.status.write().unwrap().trades_executed += 1;

        info!(
            "Trade executed: {} {} {} @ {:.2} (confidence: {:.1}%)",
            trade.action, trade.quantity, trade.symbol, trade.price, trade.confidence
        );
        self.notifications.success(format!(
            "{} order executed for {}",
            trade.action, trade.symbol
        ));

        Ok(trade)
    }

    /// Execute a manual trade from the trade form.
    pub async fn execute_manual_trade(
        &self,
        symbol: &str,
        action: TradeAction,
        quantity: f64,
    ) -> Result<Trade, AppError> {
        if symbol.trim().is_empty() {
            return Err(AppError::BadRequest("Symbol is required".to_string()));
        }
        if !quantity.is_finite() || quantity <= 0.0 {
            return Err(AppError::BadRequest(format!("Invalid amount: {}", quantity)));
        }

        let price = self.exchange.execution_price(symbol, action).await?;
        let trade = Trade {
            id: self.next_trade_id(),
            symbol: symbol.to_string(),
            action,
            quantity,
            price,
            timestamp: Utc::now(),
            reason: "Manual trade".to_string(),
            confidence: 100.0,
        };

        self.store.append_trade(&trade)?;
        info!(
            "Manual trade executed: {} {} {} @ {:.2}",
            trade.action, trade.quantity, trade.symbol, trade.price
        );

        Ok(trade)
    }

    /// Millisecond timestamp, bumped to stay strictly increasing.
    fn next_trade_id(&self) -> i64 {
        let mut last = self.last_trade_id.lock().unwrap();
        let id = Utc::now().timestamp_millis().max(*last + 1);
        *last = id;
        id
    }

    /// Persisted trade history, oldest first.
    pub fn trade_history(&self) -> Result<Vec<Trade>, AppError> {
        self.store.get_trade_history()
    }

    /// Performance of the trade history marked against `marks`
    /// (symbol → current price).
    pub fn performance_stats(&self, marks: &HashMap<String, f64>) -> Result<PerformanceStats, AppError> {
        let history = self.trade_history()?;
        Ok(PerformanceStats::compute(&history, marks))
    }

    // ========== Accessors ==========

    pub fn settings(&self) -> BotSettings {
        self.settings.read().unwrap().clone()
    }

    pub fn status(&self) -> BotStatus {
        let mut status = self.status.read().unwrap().clone();
        status.settings = self.settings();
        status
    }

    pub fn credentials(&self) -> Option<Credentials> {
        self.credentials.read().unwrap().clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::bot::{BotFuture, RandomStrategy, SimulatedExchange};
    use crate::types::{MarketSnapshot, Prediction, Trend};
    use std::time::Duration;

    struct FixedStrategy {
        trend: Trend,
        confidence: f64,
    }

    impl TradingStrategy for FixedStrategy {
        fn name(&self) -> &str {
            "fixed"
        }

        fn predict<'a>(&'a self, snapshot: &'a MarketSnapshot) -> BotFuture<'a, Prediction> {
            Box::pin(async move {
                Ok(Prediction {
                    trend: self.trend,
                    confidence: self.confidence,
                    price_target: snapshot.price,
                    timestamp: Utc::now(),
                })
            })
        }
    }

    fn create_test_bot(strategy: Arc<dyn TradingStrategy>) -> (Arc<AiTradingBot>, Arc<SqliteStore>, NotificationCenter) {
        let store = Arc::new(SqliteStore::new_in_memory().expect("Failed to create SQLite"));
        let notifications = NotificationCenter::new(20);
        let bot = Arc::new(AiTradingBot::new(
            strategy,
            Arc::new(SimulatedExchange::with_seed(Duration::from_millis(10), 9)),
            store.clone(),
            notifications.clone(),
            BotLoopConfig::default(),
        ));
        (bot, store, notifications)
    }

    #[test]
    fn test_new_bot_is_stopped() {
        let (bot, _, _) = create_test_bot(Arc::new(RandomStrategy::with_seed(1)));
        let status = bot.status();

        assert_eq!(status.state, BotState::Stopped);
        assert!(!status.initialized);
        assert_eq!(status.strategy, "random");
        assert_eq!(status.iterations, 0);
        assert!(bot.credentials().is_none());
    }

    #[tokio::test]
    async fn test_initialize_with_blank_credentials_fails() {
        let (bot, _, _) = create_test_bot(Arc::new(RandomStrategy::with_seed(1)));

        let result = bot.initialize(Credentials::new("", "", true)).await;
        assert!(!result.success);
        assert!(!bot.status().initialized);
        assert!(bot.credentials().is_none());
    }

    #[tokio::test]
    async fn test_initialize_with_credentials() {
        let (bot, _, _) = create_test_bot(Arc::new(RandomStrategy::with_seed(1)));

        let result = bot.initialize(Credentials::new("key", "secret", true)).await;
        assert!(result.success);
        assert!(bot.status().initialized);
        assert!(bot.test_connection().await.success);
    }

    #[tokio::test]
    async fn test_test_connection_without_credentials() {
        let (bot, _, _) = create_test_bot(Arc::new(RandomStrategy::with_seed(1)));
        let result = bot.test_connection().await;
        assert!(!result.success);
        assert_eq!(result.message, "API credentials not configured");
    }

    #[tokio::test]
    async fn test_iteration_trades_on_strong_signal() {
        let strategy = Arc::new(FixedStrategy { trend: Trend::Bearish, confidence: 95.0 });
        let (bot, store, notifications) = create_test_bot(strategy);

        let trade = bot.run_iteration().await.unwrap().expect("should trade");
        assert_eq!(trade.action, TradeAction::Sell);
        assert_eq!(trade.symbol, "BTCUSDT");
        assert_eq!(trade.quantity, 0.001);
        assert_eq!(trade.reason, "Strong bearish signal");
        assert_eq!(trade.confidence, 95.0);

        assert_eq!(store.get_trade_history().unwrap(), vec![trade]);
        assert_eq!(
            notifications.latest().unwrap().message,
            "SELL order executed for BTCUSDT"
        );
    }

    #[tokio::test]
    async fn test_iteration_holds_on_weak_signal() {
        let strategy = Arc::new(FixedStrategy { trend: Trend::Bullish, confidence: 70.0 });
        let (bot, store, _) = create_test_bot(strategy);

        assert!(bot.run_iteration().await.unwrap().is_none());
        assert_eq!(store.trade_count().unwrap(), 0);
    }

    #[tokio::test]
    async fn test_manual_trade_validation() {
        let (bot, store, _) = create_test_bot(Arc::new(RandomStrategy::with_seed(1)));

        assert!(bot.execute_manual_trade("ETHUSDT", TradeAction::Buy, 0.0).await.is_err());
        assert!(bot.execute_manual_trade("ETHUSDT", TradeAction::Buy, f64::NAN).await.is_err());
        assert!(bot.execute_manual_trade("", TradeAction::Buy, 1.0).await.is_err());

        let trade = bot.execute_manual_trade("ETHUSDT", TradeAction::Buy, 0.5).await.unwrap();
        assert_eq!(trade.reason, "Manual trade");
        assert!(trade.price >= 2_000.0 && trade.price < 2_100.0);
        assert_eq!(store.trade_count().unwrap(), 1);
    }

    #[tokio::test]
    async fn test_trade_ids_strictly_increase() {
        let (bot, _, _) = create_test_bot(Arc::new(RandomStrategy::with_seed(1)));

        let mut last = 0;
        for _ in 0..20 {
            let trade = bot.execute_manual_trade("BTCUSDT", TradeAction::Buy, 0.01).await.unwrap();
            assert!(trade.id > last);
            last = trade.id;
        }
    }

    #[tokio::test]
    async fn test_start_twice_fails() {
        let (bot, _, _) = create_test_bot(Arc::new(RandomStrategy::with_seed(1)));

        assert!(bot.start().unwrap().success);
        assert!(matches!(bot.start(), Err(AppError::BotAlreadyRunning)));
        assert!(bot.is_running());

        bot.stop();
        assert!(!bot.is_running());
    }

    #[test]
    fn test_stop_when_stopped_reports_success() {
        let (bot, _, _) = create_test_bot(Arc::new(RandomStrategy::with_seed(1)));

        let result = bot.stop();
        assert!(result.success);
        assert_eq!(result.message, "Trading bot stopped");
        assert_eq!(bot.status().state, BotState::Stopped);
    }

    #[tokio::test]
    async fn test_performance_stats_marked_to_market() {
        let (bot, _, _) = create_test_bot(Arc::new(RandomStrategy::with_seed(1)));
        let trade = bot.execute_manual_trade("BTCUSDT", TradeAction::Buy, 1.0).await.unwrap();

        let marks = HashMap::from([("BTCUSDT".to_string(), trade.price + 10.0)]);
        let stats = bot.performance_stats(&marks).unwrap();

        assert_eq!(stats.total_trades, 1);
        assert_eq!(stats.winning_trades, 1);
        assert!((stats.total_profit - 10.0).abs() < 1e-6);
    }
}
