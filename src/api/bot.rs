//! Bot API endpoints
//!
//! Lifecycle, trade history and manual trading for the AI trading bot.

use axum::{
    extract::{Query, State},
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;

use crate::error::AppError;
use crate::services::BotStatus;
use crate::types::{OperationResult, PerformanceStats, Trade};
use crate::AppState;

use super::ApiResponse;

/// Trade amount as typed into the form, or as a JSON number
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum Amount {
    Number(f64),
    Text(String),
}

impl Amount {
    fn as_input(&self) -> String {
        match self {
            Amount::Number(n) => n.to_string(),
            Amount::Text(s) => s.clone(),
        }
    }
}

/// Request for a manual trade
#[derive(Debug, Deserialize)]
pub struct ManualTradeRequest {
    /// Pair or symbol, e.g. `BTC/USDT`
    pub symbol: String,
    /// BUY or SELL
    pub side: String,
    pub amount: Amount,
}

#[derive(Debug, Deserialize)]
pub struct TradesQuery {
    pub limit: Option<usize>,
}

/// Create bot API routes
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/status", get(get_status))
        .route("/start", post(start_bot))
        .route("/stop", post(stop_bot))
        .route("/trades", get(get_trades))
        .route("/performance", get(get_performance))
        .route("/trade", post(manual_trade))
}

/// GET /api/bot/status
async fn get_status(State(state): State<AppState>) -> Json<BotStatus> {
    Json(state.bot.status())
}

/// POST /api/bot/start
async fn start_bot(State(state): State<AppState>) -> Result<Json<OperationResult>, AppError> {
    let result = state.app.start_trading_bot()?;
    Ok(Json(result))
}

/// POST /api/bot/stop
async fn stop_bot(State(state): State<AppState>) -> Json<OperationResult> {
    Json(state.app.stop_trading_bot())
}

/// Trade history, oldest first. `limit` keeps the newest entries.
///
/// GET /api/bot/trades
async fn get_trades(
    State(state): State<AppState>,
    Query(query): Query<TradesQuery>,
) -> Result<Json<ApiResponse<Vec<Trade>>>, AppError> {
    let mut trades = state.bot.trade_history()?;
    if let Some(limit) = query.limit {
        let start = trades.len().saturating_sub(limit);
        trades.drain(..start);
    }
    Ok(Json(ApiResponse::new(trades)))
}

/// GET /api/bot/performance
async fn get_performance(State(state): State<AppState>) -> Result<Json<PerformanceStats>, AppError> {
    let stats = state.bot.performance_stats(&state.mark_prices())?;
    Ok(Json(stats))
}

/// POST /api/bot/trade
async fn manual_trade(
    State(state): State<AppState>,
    Json(request): Json<ManualTradeRequest>,
) -> Result<Json<Trade>, AppError> {
    let trade = state
        .app
        .execute_manual_trade(&request.symbol, &request.side, &request.amount.as_input())
        .await?;
    Ok(Json(trade))
}
