use axum::extract::{Path, State};
use axum::Json;
use serde::Deserialize;
use std::sync::Arc;
use uuid::Uuid;

use mannam_shared::errors::AppResult;
use mannam_shared::middleware::AdminUser;
use mannam_shared::types::auth::AuthUser;
use mannam_shared::types::ApiResponse;

use crate::models::Match;
use crate::services::match_service::{self, MatchOutcome, MatchSummary, RespondOutcome};
use crate::AppState;

// --- POST /matches/run ---

pub async fn run_matching(
    user: AuthUser,
    State(state): State<Arc<AppState>>,
) -> AppResult<Json<ApiResponse<MatchOutcome>>> {
    let outcome = match_service::run_matching(&state, user.id).await?;
    Ok(Json(ApiResponse::ok(outcome)))
}

// --- GET /matches ---

pub async fn list_matches(
    user: AuthUser,
    State(state): State<Arc<AppState>>,
) -> AppResult<Json<ApiResponse<Vec<MatchSummary>>>> {
    let matches = match_service::list_matches(&state, user.id)?;
    Ok(Json(ApiResponse::ok(matches)))
}

// --- PUT /matches/:id/respond ---

#[derive(Debug, Deserialize)]
pub struct RespondRequest {
    pub accept: bool,
}

pub async fn respond(
    user: AuthUser,
    State(state): State<Arc<AppState>>,
    Path(match_id): Path<Uuid>,
    Json(req): Json<RespondRequest>,
) -> AppResult<Json<ApiResponse<RespondOutcome>>> {
    let outcome = match_service::respond(&state, match_id, user.id, req.accept).await?;
    Ok(Json(ApiResponse::ok(outcome)))
}

// --- PUT /matches/:id/complete ---

pub async fn complete(
    _admin: AdminUser,
    State(state): State<Arc<AppState>>,
    Path(match_id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<Match>>> {
    let completed = match_service::complete_match(&state, match_id).await?;
    Ok(Json(ApiResponse::ok(completed)))
}
