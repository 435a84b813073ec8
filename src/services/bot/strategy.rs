//! Random "AI" strategy
//!
//! Draws a uniformly random trend and confidence. Stands in for a real
//! prediction model behind the [`TradingStrategy`] trait.

use chrono::Utc;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::{Mutex};
use tracing::debug;

use crate::types::{MarketSnapshot, Prediction, Trend};

use super::{BotFuture, TradingStrategy};

/// Strategy that fabricates predictions.
pub struct RandomStrategy {
    rng: Mutex<StdRng>,
}

impl RandomStrategy {
    pub fn new() -> Self {
        Self {
            rng: Mutex::new(StdRng::from_entropy()),
        }
    }

    /// Deterministic strategy for tests and replays.
    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }

    fn draw(&self, snapshot: &MarketSnapshot) -> Prediction {
        let mut rng = self.rng.lock().unwrap();
        let trend = Trend::ALL[rng.gen_range(0..Trend::ALL.len())];
        let confidence = rng.gen::<f64>() * 100.0;
        // Target within +/-5% of the snapshot price
        let price_target = snapshot.price * (1.0 + (rng.gen::<f64>() * 0.1 - 0.05));

        Prediction {
            trend,
            confidence,
            price_target,
            timestamp: Utc::now(),
        }
    }
}

impl Default for RandomStrategy {
    fn default() -> Self {
        Self::new()
    }
}

impl TradingStrategy for RandomStrategy {
    fn name(&self) -> &str {
        "random"
    }

    fn predict<'a>(&'a self, snapshot: &'a MarketSnapshot) -> BotFuture<'a, Prediction> {
        Box::pin(async move {
            let prediction = self.draw(snapshot);
            debug!(
                "Prediction for {}: {} ({:.1}%), target {:.2}",
                snapshot.symbol,
                prediction.trend.as_str(),
                prediction.confidence,
                prediction.price_target
            );
            Ok(prediction)
        })
    }
}
