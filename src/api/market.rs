use crate::error::{AppError, Result};
use crate::types::PriceQuote;
use crate::AppState;
use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};
use chrono::{DateTime, Utc};
use serde::Serialize;

use super::ApiResponse;

/// Quote with its display formatting.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteResponse {
    pub symbol: String,
    pub price: f64,
    pub change: f64,
    pub formatted_price: String,
    pub formatted_change: String,
    pub positive: bool,
    pub last_updated: DateTime<Utc>,
}

impl From<PriceQuote> for QuoteResponse {
    fn from(quote: PriceQuote) -> Self {
        Self {
            formatted_price: quote.formatted_price(),
            formatted_change: quote.formatted_change(),
            positive: quote.is_positive(),
            symbol: quote.symbol,
            price: quote.price,
            change: quote.change,
            last_updated: quote.last_updated,
        }
    }
}

/// GET /api/market/prices
async fn get_prices(State(state): State<AppState>) -> Json<ApiResponse<Vec<QuoteResponse>>> {
    let quotes = state
        .market_data
        .get_all_prices()
        .into_iter()
        .map(QuoteResponse::from)
        .collect();
    Json(ApiResponse::new(quotes))
}

/// GET /api/market/prices/:symbol
async fn get_price(
    State(state): State<AppState>,
    Path(symbol): Path<String>,
) -> Result<Json<ApiResponse<QuoteResponse>>> {
    let symbol = symbol.replace('/', "").to_uppercase();
    let quote = state
        .market_data
        .get_price(&symbol)
        .ok_or_else(|| AppError::NotFound(format!("No price for {}", symbol)))?;
    Ok(Json(ApiResponse::new(quote.into())))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/prices", get(get_prices))
        .route("/prices/:symbol", get(get_price))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quote_response_formatting() {
        let response = QuoteResponse::from(PriceQuote {
            symbol: "ADAUSDT".to_string(),
            price: 0.54321,
            change: -1.5,
            last_updated: Utc::now(),
        });

        assert_eq!(response.formatted_price, "$0.5432");
        assert_eq!(response.formatted_change, "-1.50%");
        assert!(!response.positive);

        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["formattedPrice"], "$0.5432");
    }
}
