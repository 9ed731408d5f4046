//! API handlers
//!
//! Handlers validate wire-level shape only; all snapshot and mutation
//! semantics live in [`AlarmViewService`]. Error kinds are mapped to
//! status codes by `AlarmError`'s `IntoResponse` impl.

use axum::{
    extract::{Path, Query, State},
    response::Json,
};
use std::collections::HashMap;
use uuid::Uuid;

use crate::api::models::*;
use crate::error::Result;
use crate::service::AlarmsPage;
use crate::AppState;

/// Health check endpoint
pub async fn health_check() -> &'static str {
    HEALTH_OK
}

/// List alarms: paginated view over a token-pinned snapshot
pub async fn list_alarms(
    State(state): State<AppState>,
    Query(query): Query<AlarmsQuery>,
) -> Result<Json<AlarmsPage>> {
    let filter = query.filter()?;
    let page = state
        .service
        .list(query.token(), query.offset, query.limit, filter)?;
    Ok(Json(page))
}

/// Current alarm-type to priority mapping
pub async fn get_alarms_map(State(state): State<AppState>) -> Json<HashMap<String, String>> {
    Json(state.service.priority_map())
}

/// Delete the alarm at `(token, index)` of a pinned snapshot
pub async fn delete_alarm(
    State(state): State<AppState>,
    Path((token, index)): Path<(Uuid, usize)>,
) -> Result<Json<SuccessResponse>> {
    state.service.delete(token, index)?;
    Ok(Json(SuccessResponse::ok()))
}

/// Close or comment the alarm at `(token, index)` of a pinned snapshot
pub async fn update_alarm(
    State(state): State<AppState>,
    Path((token, index)): Path<(Uuid, usize)>,
    Json(request): Json<UpdateRequest>,
) -> Result<Json<SuccessResponse>> {
    state
        .service
        .update(token, index, &request.action, &request.value)?;
    Ok(Json(SuccessResponse::ok()))
}
