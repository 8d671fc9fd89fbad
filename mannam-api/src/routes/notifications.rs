use axum::extract::{Path, Query, State};
use axum::Json;
use serde::Serialize;
use std::sync::Arc;
use uuid::Uuid;

use mannam_shared::errors::AppResult;
use mannam_shared::types::auth::AuthUser;
use mannam_shared::types::pagination::{Paginated, PaginationParams};
use mannam_shared::types::ApiResponse;

use crate::models::Notification;
use crate::services::notification_service;
use crate::AppState;

// --- GET /notifications ---

pub async fn list_notifications(
    user: AuthUser,
    State(state): State<Arc<AppState>>,
    Query(params): Query<PaginationParams>,
) -> AppResult<Json<ApiResponse<Paginated<Notification>>>> {
    let params = params.sanitized();
    let (items, total) =
        notification_service::list_notifications(&state, user.id, params.limit(), params.offset())?;

    Ok(Json(ApiResponse::ok(Paginated::new(items, &params, total))))
}

// --- GET /notifications/unread-count ---

#[derive(Debug, Serialize)]
pub struct UnreadCount {
    pub unread: i64,
}

pub async fn unread_count(
    user: AuthUser,
    State(state): State<Arc<AppState>>,
) -> AppResult<Json<ApiResponse<UnreadCount>>> {
    let unread = notification_service::count_unread(&state, user.id)?;
    Ok(Json(ApiResponse::ok(UnreadCount { unread })))
}

// --- PUT /notifications/:id/read ---

pub async fn mark_read(
    user: AuthUser,
    State(state): State<Arc<AppState>>,
    Path(notification_id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<Notification>>> {
    let updated = notification_service::mark_read(&state, notification_id, user.id)?;
    Ok(Json(ApiResponse::ok(updated)))
}

// --- PUT /notifications/read-all ---

#[derive(Debug, Serialize)]
pub struct ReadAllResult {
    pub updated: usize,
}

pub async fn mark_all_read(
    user: AuthUser,
    State(state): State<Arc<AppState>>,
) -> AppResult<Json<ApiResponse<ReadAllResult>>> {
    let updated = notification_service::mark_all_read(&state, user.id)?;
    Ok(Json(ApiResponse::ok(ReadAllResult { updated })))
}
