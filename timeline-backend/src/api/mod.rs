// src/api/mod.rs
use crate::config::AppConfig;
use crate::logging::{inject_request_context, logging_middleware};
use crate::service::calendar_service::CalendarService;
use axum::{middleware, Router};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

pub mod dto;
pub mod handlers;

/// アプリケーション状態
#[derive(Clone)]
pub struct AppState {
    pub calendar_service: Arc<CalendarService>,
    pub config: Arc<AppConfig>,
}

impl AppState {
    pub fn new(calendar_service: Arc<CalendarService>, config: Arc<AppConfig>) -> Self {
        Self {
            calendar_service,
            config,
        }
    }
}

/// 全ルートをまとめたルーター
pub fn app_router(app_state: AppState) -> Router {
    Router::new()
        .merge(handlers::calendar_handler::calendar_router(app_state.clone()))
        .merge(handlers::system_handler::system_router(app_state))
        .layer(middleware::from_fn(logging_middleware))
        .layer(middleware::from_fn(inject_request_context))
        .layer(TraceLayer::new_for_http())
}
