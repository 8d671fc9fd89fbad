//! Scheduler-driven sweeps. Every handler is idempotent: a duplicate tick
//! finds nothing left to transition and reports zero rows.

use axum::extract::State;
use axum::Json;
use serde::Serialize;
use std::sync::Arc;

use mannam_shared::errors::AppResult;
use mannam_shared::middleware::{record_job_run, CronCaller};
use mannam_shared::types::ApiResponse;

use crate::services::{match_service, noshow_service};
use crate::AppState;

#[derive(Debug, Serialize)]
pub struct JobResult {
    pub processed: usize,
}

// --- POST /cron/expire-matches ---

pub async fn expire_matches(
    _caller: CronCaller,
    State(state): State<Arc<AppState>>,
) -> AppResult<Json<ApiResponse<JobResult>>> {
    match match_service::expire_matches(&state).await {
        Ok(processed) => {
            record_job_run("expire_matches", "success", processed as u64);
            Ok(Json(ApiResponse::ok(JobResult { processed })))
        }
        Err(e) => {
            record_job_run("expire_matches", "failure", 0);
            Err(e)
        }
    }
}

// --- POST /cron/no-show-sweep ---

pub async fn no_show_sweep(
    _caller: CronCaller,
    State(state): State<Arc<AppState>>,
) -> AppResult<Json<ApiResponse<JobResult>>> {
    match noshow_service::sweep(&state).await {
        Ok(processed) => {
            record_job_run("no_show_sweep", "success", processed as u64);
            Ok(Json(ApiResponse::ok(JobResult { processed })))
        }
        Err(e) => {
            record_job_run("no_show_sweep", "failure", 0);
            Err(e)
        }
    }
}

// --- POST /cron/departure-reminder ---

pub async fn departure_reminder(
    _caller: CronCaller,
    State(state): State<Arc<AppState>>,
) -> AppResult<Json<ApiResponse<JobResult>>> {
    match noshow_service::send_departure_reminders(&state).await {
        Ok(processed) => {
            record_job_run("departure_reminder", "success", processed as u64);
            Ok(Json(ApiResponse::ok(JobResult { processed })))
        }
        Err(e) => {
            record_job_run("departure_reminder", "failure", 0);
            Err(e)
        }
    }
}
