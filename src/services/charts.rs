//! Price chart with a fixed-size sliding window.

use chrono::{DateTime, Duration as ChronoDuration, Local};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, RwLock};
use std::time::Duration;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};
use tracing::{debug, info};

use crate::types::{ChartSnapshot, ChartTimeframe, PricePoint};

const SEED_BASE_PRICE: f64 = 35_000.0;
const SEED_VOLATILITY: f64 = 500.0;
const TICK_VOLATILITY: f64 = 100.0;

/// `BTCUSDT` -> `BTC/USDT`.
pub fn pair_label(symbol: &str) -> String {
    match symbol.strip_suffix("USDT") {
        Some(base) if !base.is_empty() => format!("{}/USDT", base),
        _ => symbol.to_string(),
    }
}

/// `count` hour-spaced `HH:MM` labels ending at `now`.
pub fn generate_time_labels(count: usize, now: DateTime<Local>) -> Vec<String> {
    (0..count)
        .rev()
        .map(|i| {
            let time = now - ChronoDuration::hours(i as i64);
            time.format("%H:%M").to_string()
        })
        .collect()
}

/// Random walk of `count` prices starting from `base_price`.
pub fn generate_price_data<R: Rng + ?Sized>(
    count: usize,
    base_price: f64,
    volatility: f64,
    rng: &mut R,
) -> Vec<f64> {
    let mut price = base_price;
    (0..count)
        .map(|_| {
            price += (rng.gen::<f64>() - 0.5) * volatility;
            price
        })
        .collect()
}

#[derive(Debug)]
struct ChartState {
    symbol: String,
    label: String,
    timeframe: ChartTimeframe,
    points: VecDeque<PricePoint>,
}

/// Single-series line chart fed with synthetic prices.
pub struct TradingCharts {
    state: RwLock<ChartState>,
    rng: Mutex<StdRng>,
    update_interval: Duration,
}

impl TradingCharts {
    /// Create a chart seeded with `window` points.
    pub fn new(window: usize, update_interval: Duration) -> Arc<Self> {
        Arc::new(Self::with_rng(window, update_interval, StdRng::from_entropy()))
    }

    /// Create a chart with an explicit random source.
    pub fn with_rng(window: usize, update_interval: Duration, mut rng: StdRng) -> Self {
        let labels = generate_time_labels(window, Local::now());
        let values = generate_price_data(window, SEED_BASE_PRICE, SEED_VOLATILITY, &mut rng);
        let points = labels
            .into_iter()
            .zip(values)
            .map(|(label, value)| PricePoint { label, value })
            .collect();

        let symbol = "BTCUSDT".to_string();
        Self {
            state: RwLock::new(ChartState {
                label: pair_label(&symbol),
                symbol,
                timeframe: ChartTimeframe::default(),
                points,
            }),
            rng: Mutex::new(rng),
            update_interval,
        }
    }

    /// Append one point (last + random delta) and drop the oldest.
    pub fn update_chart_data(&self) -> PricePoint {
        let delta = {
            let mut rng = self.rng.lock().unwrap();
            (rng.gen::<f64>() - 0.5) * TICK_VOLATILITY
        };

        let mut state = self.state.write().unwrap();
        let last = state.points.back().map(|p| p.value).unwrap_or(SEED_BASE_PRICE);
        let point = PricePoint {
            label: Local::now().format("%H:%M").to_string(),
            value: last + delta,
        };

        state.points.push_back(point.clone());
        state.points.pop_front();
        point
    }

    /// Relabel the series and refresh once. Generation is unaffected.
    pub fn change_symbol(&self, symbol: &str) {
        {
            let mut state = self.state.write().unwrap();
            state.symbol = symbol.to_string();
            state.label = symbol.to_string();
        }
        info!("Chart symbol changed to {}", symbol);
        self.update_chart_data();
    }

    /// Record the timeframe and refresh once.
    pub fn change_timeframe(&self, timeframe: ChartTimeframe) {
        self.state.write().unwrap().timeframe = timeframe;
        info!("Chart timeframe changed to {}", timeframe.as_str());
        self.update_chart_data();
    }

    /// Number of points in the window.
    pub fn len(&self) -> usize {
        self.state.read().unwrap().points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Copy of the current chart state.
    pub fn snapshot(&self) -> ChartSnapshot {
        let state = self.state.read().unwrap();
        ChartSnapshot {
            symbol: state.symbol.clone(),
            label: state.label.clone(),
            timeframe: state.timeframe,
            points: state.points.iter().cloned().collect(),
        }
    }

    /// Refresh on the update interval until shutdown.
    pub fn start_auto_update(self: &Arc<Self>, mut shutdown_rx: broadcast::Receiver<()>) -> JoinHandle<()> {
        let charts = Arc::clone(self);
        tokio::spawn(async move {
            info!("Chart refreshing every {:?}", charts.update_interval);
            let mut ticker = interval(charts.update_interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        charts.update_chart_data();
                    }
                    _ = shutdown_rx.recv() => {
                        debug!("Chart updater stopped");
                        break;
                    }
                }
            }
        })
    }
}
