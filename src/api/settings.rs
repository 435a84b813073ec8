//! API settings endpoints

use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::types::{mask, OperationResult};
use crate::AppState;

/// Stored settings; the secret is never returned in clear.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SettingsResponse {
    pub api_key: String,
    pub api_secret: String,
    pub use_testnet: bool,
    pub network: &'static str,
    pub configured: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveSettingsRequest {
    pub api_key: String,
    pub api_secret: String,
    #[serde(default = "default_testnet")]
    pub use_testnet: bool,
}

fn default_testnet() -> bool {
    true
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(get_settings).put(save_settings))
        .route("/test", post(test_connection))
}

/// GET /api/settings
async fn get_settings(State(state): State<AppState>) -> Json<SettingsResponse> {
    let credentials = state.app.cached_credentials();
    Json(SettingsResponse {
        configured: credentials.is_complete(),
        network: credentials.network_name(),
        api_secret: mask(&credentials.api_secret),
        api_key: credentials.api_key,
        use_testnet: credentials.use_testnet,
    })
}

/// PUT /api/settings
async fn save_settings(
    State(state): State<AppState>,
    Json(request): Json<SaveSettingsRequest>,
) -> Result<Json<OperationResult>, AppError> {
    let result = state
        .app
        .save_api_settings(&request.api_key, &request.api_secret, request.use_testnet)
        .await?;
    Ok(Json(result))
}

/// POST /api/settings/test
async fn test_connection(State(state): State<AppState>) -> Result<Json<OperationResult>, AppError> {
    let result = state.app.test_api_connection().await?;
    Ok(Json(result))
}
