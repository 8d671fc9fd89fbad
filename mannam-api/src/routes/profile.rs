use axum::extract::State;
use axum::Json;
use diesel::prelude::*;
use serde::Deserialize;
use std::sync::Arc;
use validator::Validate;

use mannam_shared::errors::{AppError, AppResult, ErrorCode};
use mannam_shared::types::auth::AuthUser;
use mannam_shared::types::ApiResponse;

use crate::models::{NewProfile, Profile, UpdateProfile};
use crate::schema::profiles;
use crate::AppState;

fn check_age_range(min: i32, max: i32) -> AppResult<()> {
    if min > max {
        return Err(AppError::new(
            ErrorCode::InvalidPreferenceRange,
            "preferred_age_min must not exceed preferred_age_max",
        ));
    }
    if !(19..=120).contains(&min) || !(19..=120).contains(&max) {
        return Err(AppError::new(
            ErrorCode::InvalidPreferenceRange,
            "preferred age bounds must be between 19 and 120",
        ));
    }
    Ok(())
}

fn check_coordinates(lat: f64, lng: f64) -> AppResult<()> {
    if !(-90.0..=90.0).contains(&lat) || !(-180.0..=180.0).contains(&lng) {
        return Err(AppError::new(
            ErrorCode::ValidationError,
            "coordinates out of range",
        ));
    }
    Ok(())
}

fn check_gender(value: &str, allow_any: bool) -> AppResult<()> {
    let ok = matches!(value, "male" | "female") || (allow_any && value == "any");
    if !ok {
        return Err(AppError::new(
            ErrorCode::ValidationError,
            format!("unknown gender value: {value}"),
        ));
    }
    Ok(())
}

// --- GET /me ---

pub async fn get_profile(
    user: AuthUser,
    State(state): State<Arc<AppState>>,
) -> AppResult<Json<ApiResponse<Profile>>> {
    let mut conn = state.db.get().map_err(|e| AppError::internal(e.to_string()))?;

    let profile = profiles::table
        .find(user.id)
        .first::<Profile>(&mut conn)
        .map_err(|_| AppError::new(ErrorCode::ProfileNotFound, "profile not found"))?;

    Ok(Json(ApiResponse::ok(profile)))
}

// --- POST /me  (onboarding) ---

#[derive(Debug, Deserialize, Validate)]
pub struct OnboardingRequest {
    #[validate(length(min = 8, max = 20, message = "phone must be 8-20 characters"))]
    pub phone: String,
    #[validate(length(min = 2, max = 20, message = "nickname must be 2-20 characters"))]
    pub nickname: String,
    #[validate(range(min = 1900, max = 2100))]
    pub birth_year: i32,
    pub gender: String,
    pub occupation: String,
    pub mbti: Option<String>,
    pub activity_area: String,
    pub activity_lat: f64,
    pub activity_lng: f64,
    #[serde(default)]
    pub hobbies: Vec<String>,
    #[serde(default)]
    pub personality: Vec<String>,
    #[serde(default)]
    pub ideal_type: Vec<String>,
    pub preferred_gender: String,
    pub preferred_age_min: i32,
    pub preferred_age_max: i32,
    #[validate(range(min = 1, max = 500))]
    pub preferred_distance_km: i32,
}

pub async fn create_profile(
    user: AuthUser,
    State(state): State<Arc<AppState>>,
    Json(req): Json<OnboardingRequest>,
) -> AppResult<Json<ApiResponse<Profile>>> {
    req.validate()
        .map_err(|e| AppError::new(ErrorCode::ValidationError, e.to_string()))?;
    check_gender(&req.gender, false)?;
    check_gender(&req.preferred_gender, true)?;
    check_age_range(req.preferred_age_min, req.preferred_age_max)?;
    check_coordinates(req.activity_lat, req.activity_lng)?;

    let mut conn = state.db.get().map_err(|e| AppError::internal(e.to_string()))?;

    let exists: bool = profiles::table
        .find(user.id)
        .count()
        .get_result::<i64>(&mut conn)
        .map(|c| c > 0)
        .unwrap_or(false);
    if exists {
        return Err(AppError::new(
            ErrorCode::Conflict,
            "profile already exists, use PATCH /me to update it",
        ));
    }

    let new_profile = NewProfile {
        id: user.id,
        phone: req.phone,
        nickname: req.nickname,
        birth_year: req.birth_year,
        gender: req.gender,
        occupation: req.occupation,
        mbti: req.mbti,
        activity_area: req.activity_area,
        activity_lat: req.activity_lat,
        activity_lng: req.activity_lng,
        hobbies: serde_json::json!(req.hobbies),
        personality: serde_json::json!(req.personality),
        ideal_type: serde_json::json!(req.ideal_type),
        preferred_gender: req.preferred_gender,
        preferred_age_min: req.preferred_age_min,
        preferred_age_max: req.preferred_age_max,
        preferred_distance_km: req.preferred_distance_km,
    };

    let profile: Profile = diesel::insert_into(profiles::table)
        .values(&new_profile)
        .get_result(&mut conn)
        .map_err(|e| {
            AppError::map_unique_violation(
                e,
                ErrorCode::PhoneAlreadyRegistered,
                "phone number is already registered",
            )
        })?;

    tracing::info!(user_id = %profile.id, "profile created");

    Ok(Json(ApiResponse::ok(profile)))
}

// --- PATCH /me ---

pub async fn update_profile(
    user: AuthUser,
    State(state): State<Arc<AppState>>,
    Json(payload): Json<UpdateProfile>,
) -> AppResult<Json<ApiResponse<Profile>>> {
    let mut conn = state.db.get().map_err(|e| AppError::internal(e.to_string()))?;

    let current = profiles::table
        .find(user.id)
        .first::<Profile>(&mut conn)
        .map_err(|_| AppError::new(ErrorCode::ProfileNotFound, "profile not found"))?;

    // Validate against the values the row would end up with.
    let age_min = payload.preferred_age_min.unwrap_or(current.preferred_age_min);
    let age_max = payload.preferred_age_max.unwrap_or(current.preferred_age_max);
    check_age_range(age_min, age_max)?;

    let lat = payload.activity_lat.unwrap_or(current.activity_lat);
    let lng = payload.activity_lng.unwrap_or(current.activity_lng);
    check_coordinates(lat, lng)?;

    if let Some(gender) = &payload.preferred_gender {
        check_gender(gender, true)?;
    }
    // A user can pause or resume their own account but never lift a ban.
    if let Some(status) = &payload.status {
        if !matches!(status.as_str(), "active" | "paused") || current.status == "banned" {
            return Err(AppError::new(
                ErrorCode::ValidationError,
                "status can only be set to active or paused",
            ));
        }
    }
    if let Some(distance) = payload.preferred_distance_km {
        if !(1..=500).contains(&distance) {
            return Err(AppError::new(
                ErrorCode::InvalidPreferenceRange,
                "preferred_distance_km must be between 1 and 500",
            ));
        }
    }

    let updated = diesel::update(profiles::table.find(user.id))
        .set((&payload, profiles::updated_at.eq(chrono::Utc::now())))
        .get_result::<Profile>(&mut conn)?;

    Ok(Json(ApiResponse::ok(updated)))
}
