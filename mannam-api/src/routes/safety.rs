use axum::extract::State;
use axum::Json;
use diesel::prelude::*;
use serde::Deserialize;
use std::sync::Arc;
use uuid::Uuid;

use mannam_shared::errors::{AppError, AppResult, ErrorCode};
use mannam_shared::types::auth::AuthUser;
use mannam_shared::types::ApiResponse;

use crate::events::publisher;
use crate::models::{NewSafetyReport, SafetyReport};
use crate::schema::safety_reports;
use crate::AppState;

const REPORT_TYPES: [&str; 5] = ["harassment", "inappropriate", "no_show", "safety", "other"];

// --- POST /safety/reports ---

#[derive(Debug, Deserialize)]
pub struct ReportRequest {
    pub reported_user_id: Uuid,
    pub mission_id: Option<Uuid>,
    pub report_type: String,
    pub description: Option<String>,
    pub reporter_lat: Option<f64>,
    pub reporter_lng: Option<f64>,
}

pub async fn create_report(
    user: AuthUser,
    State(state): State<Arc<AppState>>,
    Json(req): Json<ReportRequest>,
) -> AppResult<Json<ApiResponse<SafetyReport>>> {
    if req.reported_user_id == user.id {
        return Err(AppError::new(
            ErrorCode::CannotReportSelf,
            "you cannot report yourself",
        ));
    }
    if !REPORT_TYPES.contains(&req.report_type.as_str()) {
        return Err(AppError::new(
            ErrorCode::ValidationError,
            format!("unknown report type: {}", req.report_type),
        ));
    }

    let mut conn = state.db.get().map_err(|e| AppError::internal(e.to_string()))?;

    // One open report per (reporter, reported, mission) triple.
    let mut duplicate_query = safety_reports::table
        .filter(safety_reports::reporter_id.eq(user.id))
        .filter(safety_reports::reported_user_id.eq(req.reported_user_id))
        .filter(safety_reports::status.eq("pending"))
        .into_boxed();
    duplicate_query = match req.mission_id {
        Some(mission_id) => duplicate_query.filter(safety_reports::mission_id.eq(mission_id)),
        None => duplicate_query.filter(safety_reports::mission_id.is_null()),
    };
    let duplicate: i64 = duplicate_query.count().get_result(&mut conn)?;
    if duplicate > 0 {
        return Err(AppError::new(
            ErrorCode::DuplicateReport,
            "you already have a pending report for this user",
        ));
    }

    let report: SafetyReport = diesel::insert_into(safety_reports::table)
        .values(&NewSafetyReport {
            reporter_id: user.id,
            reported_user_id: req.reported_user_id,
            mission_id: req.mission_id,
            report_type: req.report_type,
            description: req.description,
            reporter_lat: req.reporter_lat,
            reporter_lng: req.reporter_lng,
        })
        .get_result(&mut conn)?;

    tracing::info!(
        report_id = %report.id,
        reporter_id = %report.reporter_id,
        report_type = %report.report_type,
        "safety report created"
    );

    publisher::publish_safety_report_created(
        &state.rabbitmq,
        report.id,
        report.reporter_id,
        report.reported_user_id,
        &report.report_type,
    )
    .await;

    Ok(Json(ApiResponse::ok(report)))
}
