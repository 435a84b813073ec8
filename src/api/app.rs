//! Controller view state endpoints

use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::services::BotState;
use crate::types::Section;
use crate::AppState;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AppViewResponse {
    pub current_section: Section,
    pub bot_status: BotState,
    pub sections: Vec<Section>,
}

#[derive(Debug, Deserialize)]
pub struct SectionRequest {
    pub section: String,
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(get_view))
        .route("/section", post(show_section))
}

fn view(state: &AppState) -> AppViewResponse {
    AppViewResponse {
        current_section: state.app.current_section(),
        bot_status: state.app.bot_status(),
        sections: Section::ALL.to_vec(),
    }
}

/// GET /api/app
async fn get_view(State(state): State<AppState>) -> Json<AppViewResponse> {
    Json(view(&state))
}

/// POST /api/app/section
async fn show_section(
    State(state): State<AppState>,
    Json(request): Json<SectionRequest>,
) -> Result<Json<AppViewResponse>, AppError> {
    let section = Section::parse(&request.section)
        .ok_or_else(|| AppError::NotFound(format!("Unknown section: {}", request.section)))?;
    state.app.show_section(section);
    Ok(Json(view(&state)))
}
