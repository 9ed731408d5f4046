//! API routes configuration

use axum::{
    routing::{delete, get},
    Router,
};

use crate::api::handlers::*;
use crate::AppState;

/// Create API routes
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/api/v1/alarms", get(list_alarms))
        .route("/api/v1/alarms/map", get(get_alarms_map))
        .route(
            "/api/v1/alarms/{token}/{index}",
            delete(delete_alarm).post(update_alarm),
        )
        .with_state(state)
}
