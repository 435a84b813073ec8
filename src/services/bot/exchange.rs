//! Simulated exchange
//!
//! Connection tests sleep for a fixed round-trip and always succeed;
//! snapshots and fills are drawn from the per-symbol price table.

use chrono::Utc;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::{Mutex};
use std::time::Duration;
use tracing::{debug, info};

use crate::error::AppError;
use crate::services::market_data::{price_range, sample_price};
use crate::types::{Credentials, MarketSnapshot, OperationResult, TradeAction};

use super::{BotFuture, ExchangeClient};

/// Exchange stand-in backed by a random number generator.
pub struct SimulatedExchange {
    connection_delay: Duration,
    rng: Mutex<StdRng>,
}

impl SimulatedExchange {
    pub fn new(connection_delay: Duration) -> Self {
        Self {
            connection_delay,
            rng: Mutex::new(StdRng::from_entropy()),
        }
    }

    pub fn with_seed(connection_delay: Duration, seed: u64) -> Self {
        Self {
            connection_delay,
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }

    fn price_for(&self, symbol: &str) -> Result<f64, AppError> {
        if price_range(symbol).is_none() {
            return Err(AppError::Exchange(format!("Unknown symbol: {}", symbol)));
        }
        let mut rng = self.rng.lock().unwrap();
        Ok(sample_price(symbol, &mut *rng))
    }
}

impl ExchangeClient for SimulatedExchange {
    fn test_connection<'a>(&'a self, credentials: &'a Credentials) -> BotFuture<'a, OperationResult> {
        Box::pin(async move {
            debug!("Testing connection to {}", credentials.network_name());
            tokio::time::sleep(self.connection_delay).await;
            info!("Connected to {}", credentials.network_name());
            Ok(OperationResult::ok("Connected successfully"))
        })
    }

    fn market_snapshot<'a>(&'a self, symbol: &'a str) -> BotFuture<'a, MarketSnapshot> {
        Box::pin(async move {
            let price = self.price_for(symbol)?;
            let volume = {
                let mut rng = self.rng.lock().unwrap();
                1_000.0 + rng.gen::<f64>() * 500.0
            };

            Ok(MarketSnapshot {
                symbol: symbol.to_string(),
                price,
                volume,
                timestamp: Utc::now(),
            })
        })
    }

    fn execution_price<'a>(&'a self, symbol: &'a str, action: TradeAction) -> BotFuture<'a, f64> {
        Box::pin(async move {
            let price = self.price_for(symbol)?;
            debug!("Simulated {} fill for {} at {:.4}", action, symbol, price);
            Ok(price)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_connection_waits_for_delay() {
        let exchange = SimulatedExchange::with_seed(Duration::from_millis(1000), 1);
        let credentials = Credentials::new("key", "secret", true);

        let started = tokio::time::Instant::now();
        let result = exchange.test_connection(&credentials).await.unwrap();

        assert!(result.success);
        assert_eq!(result.message, "Connected successfully");
        assert!(started.elapsed() >= Duration::from_millis(1000));
    }

    #[tokio::test]
    async fn test_snapshot_ranges() {
        let exchange = SimulatedExchange::with_seed(Duration::ZERO, 2);

        for _ in 0..100 {
            let snap = exchange.market_snapshot("BTCUSDT").await.unwrap();
            assert!(snap.price >= 35_000.0 && snap.price < 36_000.0);
            assert!(snap.volume >= 1_000.0 && snap.volume < 1_500.0);
        }
    }

    #[tokio::test]
    async fn test_execution_price_per_symbol() {
        let exchange = SimulatedExchange::with_seed(Duration::ZERO, 3);

        let eth = exchange.execution_price("ETHUSDT", TradeAction::Buy).await.unwrap();
        assert!(eth >= 2_000.0 && eth < 2_100.0);

        let ada = exchange.execution_price("ADAUSDT", TradeAction::Sell).await.unwrap();
        assert!(ada >= 0.5 && ada < 0.6);
    }

    #[tokio::test]
    async fn test_unknown_symbol_rejected() {
        let exchange = SimulatedExchange::with_seed(Duration::ZERO, 4);
        let err = exchange.market_snapshot("FOOUSDT").await.unwrap_err();
        assert!(matches!(err, AppError::Exchange(_)));
    }
}
