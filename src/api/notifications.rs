use crate::types::Notification;
use crate::AppState;
use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use serde::Deserialize;

use super::ApiResponse;

const DEFAULT_LIMIT: usize = 20;

#[derive(Debug, Deserialize)]
pub struct NotificationsQuery {
    pub limit: Option<usize>,
}

/// GET /api/notifications
async fn get_notifications(
    State(state): State<AppState>,
    Query(query): Query<NotificationsQuery>,
) -> Json<ApiResponse<Vec<Notification>>> {
    let limit = query.limit.unwrap_or(DEFAULT_LIMIT);
    Json(ApiResponse::new(state.notifications.recent(limit)))
}

pub fn router() -> Router<AppState> {
    Router::new().route("/", get(get_notifications))
}
