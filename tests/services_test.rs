//! Integration tests for the storage, market data and chart services.

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast;

use tradesense::services::{MarketData, SqliteStore, TradingCharts};
use tradesense::types::{Credentials, Trade, TradeAction};

fn temp_db_path() -> std::path::PathBuf {
    std::env::temp_dir().join(format!("tradesense-test-{}.db", uuid::Uuid::new_v4()))
}

fn trade(id: i64) -> Trade {
    Trade {
        id,
        symbol: "ETHUSDT".to_string(),
        action: TradeAction::Sell,
        quantity: 0.25,
        price: 2_050.0,
        timestamp: chrono::Utc::now(),
        reason: "Manual trade".to_string(),
        confidence: 100.0,
    }
}

#[test]
fn test_store_survives_reopen() {
    let path = temp_db_path();

    {
        let store = SqliteStore::new(&path).unwrap();
        store.save_credentials(&Credentials::new("key", "secret", false)).unwrap();
        store.append_trade(&trade(1)).unwrap();
        store.append_trade(&trade(2)).unwrap();
    }

    {
        let store = SqliteStore::new(&path).unwrap();
        let (key, secret, testnet) = store.load_credentials().unwrap();
        assert_eq!(key.as_deref(), Some("key"));
        assert_eq!(secret.as_deref(), Some("secret"));
        assert!(!testnet);

        let ids: Vec<i64> = store.get_trade_history().unwrap().iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![1, 2]);
    }

    let _ = std::fs::remove_file(&path);
}

#[test]
fn test_missing_testnet_flag_defaults_on() {
    let store = SqliteStore::new_in_memory().unwrap();
    store.set_value("apiKey", "k").unwrap();

    let (key, secret, testnet) = store.load_credentials().unwrap();
    assert_eq!(key.as_deref(), Some("k"));
    assert!(secret.is_none());
    assert!(testnet);

    store.set_value("useTestnet", "no").unwrap();
    assert!(store.load_credentials().unwrap().2);
}

#[test]
fn test_chart_length_invariant() {
    let charts = TradingCharts::new(24, Duration::from_secs(10));
    for _ in 0..100 {
        charts.update_chart_data();
        assert_eq!(charts.len(), 24);
    }
    charts.change_symbol("ADAUSDT");
    assert_eq!(charts.len(), 24);
}

#[tokio::test(start_paused = true)]
async fn test_background_updates_stop_on_shutdown() {
    let market = MarketData::new(Duration::from_secs(5));
    let charts: Arc<TradingCharts> = TradingCharts::new(24, Duration::from_secs(10));
    let (shutdown_tx, _) = broadcast::channel::<()>(1);

    let market_task = market.start_auto_update(shutdown_tx.subscribe());
    let chart_task = charts.start_auto_update(shutdown_tx.subscribe());

    tokio::time::sleep(Duration::from_secs(1)).await;
    assert_eq!(market.get_all_prices().len(), 3);

    let first = market.get_price("BTCUSDT").unwrap();
    tokio::time::sleep(Duration::from_secs(5)).await;
    let second = market.get_price("BTCUSDT").unwrap();
    assert!(second.last_updated >= first.last_updated);

    shutdown_tx.send(()).unwrap();
    market_task.await.unwrap();
    chart_task.await.unwrap();
    assert_eq!(charts.len(), 24);
}
