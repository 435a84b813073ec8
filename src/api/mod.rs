pub mod app;
pub mod bot;
pub mod chart;
pub mod health;
pub mod market;
pub mod notifications;
pub mod settings;

use crate::AppState;
use axum::Router;
use serde::Serialize;

/// API response wrapper for list and detail endpoints
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub data: T,
}

impl<T> ApiResponse<T> {
    pub fn new(data: T) -> Self {
        Self { data }
    }
}

/// Create the API router.
pub fn router() -> Router<AppState> {
    Router::new()
        .merge(health::router())
        .nest("/api/market", market::router())
        .nest("/api/chart", chart::router())
        .nest("/api/bot", bot::router())
        .nest("/api/settings", settings::router())
        .nest("/api/notifications", notifications::router())
        .nest("/api/app", app::router())
}
