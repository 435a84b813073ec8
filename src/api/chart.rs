use crate::error::{AppError, Result};
use crate::types::{ChartSnapshot, ChartTimeframe};
use crate::AppState;
use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct SymbolRequest {
    pub symbol: String,
}

#[derive(Debug, Deserialize)]
pub struct TimeframeRequest {
    pub timeframe: String,
}

/// GET /api/chart
async fn get_chart(State(state): State<AppState>) -> Json<ChartSnapshot> {
    Json(state.charts.snapshot())
}

/// POST /api/chart/symbol
async fn change_symbol(
    State(state): State<AppState>,
    Json(request): Json<SymbolRequest>,
) -> Result<Json<ChartSnapshot>> {
    let symbol = request.symbol.trim();
    if symbol.is_empty() {
        return Err(AppError::BadRequest("Symbol is required".to_string()));
    }
    state.charts.change_symbol(symbol);
    Ok(Json(state.charts.snapshot()))
}

/// POST /api/chart/timeframe
async fn change_timeframe(
    State(state): State<AppState>,
    Json(request): Json<TimeframeRequest>,
) -> Result<Json<ChartSnapshot>> {
    let timeframe = ChartTimeframe::parse(&request.timeframe)
        .ok_or_else(|| AppError::BadRequest(format!("Unknown timeframe: {}", request.timeframe)))?;
    state.charts.change_timeframe(timeframe);
    Ok(Json(state.charts.snapshot()))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(get_chart))
        .route("/symbol", post(change_symbol))
        .route("/timeframe", post(change_timeframe))
}
