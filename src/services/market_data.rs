//! Simulated market prices.
//!
//! Keeps the latest quote per symbol and re-fabricates every quote on a
//! timer. No history is retained beyond the latest value.

use chrono::Utc;
use dashmap::DashMap;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tokio::time::interval;
use tracing::{debug, info};

use crate::types::PriceQuote;

/// Symbols shown in the price widgets.
pub const DEFAULT_SYMBOLS: [&str; 3] = ["BTCUSDT", "ETHUSDT", "ADAUSDT"];

/// Base price and random span for each simulated symbol.
pub fn price_range(symbol: &str) -> Option<(f64, f64)> {
    match symbol {
        "BTCUSDT" => Some((35_000.0, 1_000.0)),
        "ETHUSDT" => Some((2_000.0, 100.0)),
        "ADAUSDT" => Some((0.5, 0.1)),
        _ => None,
    }
}

/// Draw a simulated price for `symbol`. Unknown symbols price at zero.
pub fn sample_price<R: Rng + ?Sized>(symbol: &str, rng: &mut R) -> f64 {
    match price_range(symbol) {
        Some((base, span)) => base + rng.gen::<f64>() * span,
        None => 0.0,
    }
}

/// Latest simulated quote per symbol.
pub struct MarketData {
    prices: DashMap<String, PriceQuote>,
    symbols: Vec<String>,
    update_interval: Duration,
    rng: Mutex<StdRng>,
}

impl MarketData {
    /// Create market data for the default symbols.
    pub fn new(update_interval: Duration) -> Arc<Self> {
        Arc::new(Self::with_rng(
            DEFAULT_SYMBOLS.iter().map(|s| s.to_string()).collect(),
            update_interval,
            StdRng::from_entropy(),
        ))
    }

    /// Create market data with explicit symbols and random source.
    pub fn with_rng(symbols: Vec<String>, update_interval: Duration, rng: StdRng) -> Self {
        Self {
            prices: DashMap::new(),
            symbols,
            update_interval,
            rng: Mutex::new(rng),
        }
    }

    /// Fabricate a fresh quote for `symbol` and record it.
    pub fn fetch_price(&self, symbol: &str) -> PriceQuote {
        let (price, change) = {
            let mut rng = self.rng.lock().unwrap();
            let price = sample_price(symbol, &mut *rng);
            // -2% to +2%, unrelated to the previous quote
            let change = rng.gen::<f64>() * 4.0 - 2.0;
            (price, change)
        };

        let quote = PriceQuote {
            symbol: symbol.to_string(),
            price,
            change,
            last_updated: Utc::now(),
        };

        debug!(
            "{} {} ({})",
            symbol,
            quote.formatted_price(),
            quote.formatted_change()
        );

        self.prices.insert(symbol.to_string(), quote.clone());
        quote
    }

    /// Refresh every tracked symbol.
    pub fn fetch_all_prices(&self) {
        for symbol in &self.symbols {
            self.fetch_price(symbol);
        }
    }

    /// Latest quote for a symbol.
    pub fn get_price(&self, symbol: &str) -> Option<PriceQuote> {
        self.prices.get(symbol).map(|q| q.clone())
    }

    /// Latest quotes for all tracked symbols that have one, in display order.
    pub fn get_all_prices(&self) -> Vec<PriceQuote> {
        self.symbols
            .iter()
            .filter_map(|s| self.get_price(s))
            .collect()
    }

    /// Fetch once, then refresh on the update interval until shutdown.
    pub fn start_auto_update(self: &Arc<Self>, mut shutdown_rx: broadcast::Receiver<()>) -> JoinHandle<()> {
        let market = Arc::clone(self);
        tokio::spawn(async move {
            info!(
                "Market data refreshing {} symbols every {:?}",
                market.symbols.len(),
                market.update_interval
            );
            let mut ticker = interval(market.update_interval);
            loop {
                tokio::select! {
                    _ = ticker.tick() => market.fetch_all_prices(),
                    _ = shutdown_rx.recv() => {
                        debug!("Market data updater stopped");
                        break;
                    }
                }
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seeded() -> MarketData {
        MarketData::with_rng(
            DEFAULT_SYMBOLS.iter().map(|s| s.to_string()).collect(),
            Duration::from_secs(5),
            StdRng::seed_from_u64(7),
        )
    }

    #[test]
    fn test_prices_within_symbol_ranges() {
        let market = seeded();

        for _ in 0..200 {
            for symbol in DEFAULT_SYMBOLS {
                let quote = market.fetch_price(symbol);
                let (base, span) = price_range(symbol).unwrap();
                assert!(quote.price >= base && quote.price < base + span);
                assert!(quote.change >= -2.0 && quote.change < 2.0);
            }
        }
    }

    #[test]
    fn test_unknown_symbol_prices_at_zero() {
        let market = seeded();
        assert_eq!(market.fetch_price("DOGEUSDT").price, 0.0);
    }

    #[test]
    fn test_only_latest_quote_kept() {
        let market = seeded();
        assert!(market.get_price("BTCUSDT").is_none());

        market.fetch_price("BTCUSDT");
        let second = market.fetch_price("BTCUSDT");

        assert_eq!(market.get_price("BTCUSDT"), Some(second));
        assert!(market.get_all_prices().len() == 1);
    }

    #[test]
    fn test_fetch_all_prices_in_display_order() {
        let market = seeded();
        market.fetch_all_prices();

        let symbols: Vec<String> = market.get_all_prices().into_iter().map(|q| q.symbol).collect();
        assert_eq!(symbols, vec!["BTCUSDT", "ETHUSDT", "ADAUSDT"]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_auto_update_until_shutdown() {
        let market = Arc::new(seeded());
        let (shutdown_tx, _) = broadcast::channel(1);

        let handle = market.start_auto_update(shutdown_tx.subscribe());
        tokio::time::sleep(Duration::from_millis(100)).await;
        assert_eq!(market.get_all_prices().len(), 3);

        let first = market.get_price("BTCUSDT").unwrap();
        tokio::time::sleep(Duration::from_secs(6)).await;
        assert!(market.get_price("BTCUSDT").unwrap().last_updated >= first.last_updated);

        shutdown_tx.send(()).unwrap();
        handle.await.unwrap();
    }
}
