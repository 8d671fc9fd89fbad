use axum::extract::{Path, State};
use axum::Json;
use std::sync::Arc;
use uuid::Uuid;

use mannam_shared::errors::AppResult;
use mannam_shared::types::auth::AuthUser;
use mannam_shared::types::ApiResponse;

use crate::services::mission_service::{self, DepartureOutcome, MissionView};
use crate::AppState;

// --- GET /missions/:id ---

pub async fn get_mission(
    user: AuthUser,
    State(state): State<Arc<AppState>>,
    Path(mission_id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<MissionView>>> {
    let view = mission_service::get_mission(&state, mission_id, user.id)?;
    Ok(Json(ApiResponse::ok(view)))
}

// --- POST /missions/:id/departure ---

pub async fn confirm_departure(
    user: AuthUser,
    State(state): State<Arc<AppState>>,
    Path(mission_id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<DepartureOutcome>>> {
    let outcome = mission_service::confirm_departure(&state, mission_id, user.id).await?;
    Ok(Json(ApiResponse::ok(outcome)))
}
