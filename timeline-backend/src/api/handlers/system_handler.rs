use axum::{extract::State, routing::get, Router};
use serde::{Deserialize, Serialize};

use crate::{api::AppState, types::ApiResponse};

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub environment: String,
    pub scheduler_enabled: bool,
}

pub async fn health_check_handler(State(app_state): State<AppState>) -> ApiResponse<HealthResponse> {
    let config = &app_state.config;

    ApiResponse::success(HealthResponse {
        status: "ok".to_string(),
        environment: config.environment.clone(),
        scheduler_enabled: config.scheduler.enabled,
    })
}

pub fn system_router(app_state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check_handler))
        .with_state(app_state)
}
