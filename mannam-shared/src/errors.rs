use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::types::ApiErrorResponse;

/// Application error codes following the pattern E{domain}{sequence}
///
/// Ranges:
/// - E0xxx: Shared/infrastructure errors
/// - E1xxx: Profile errors
/// - E2xxx: Question/answer errors
/// - E3xxx: Matching errors
/// - E4xxx: Mission errors
/// - E5xxx: Notification errors
/// - E6xxx: Safety errors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorCode {
    // Shared (E0xxx)
    InternalError,
    ValidationError,
    NotFound,
    Unauthorized,
    Forbidden,
    BadRequest,
    Conflict,
    ServiceUnavailable,
    TokenExpired,
    TokenInvalid,

    // Profile (E1xxx)
    ProfileNotFound,
    ProfileInactive,
    InvalidPreferenceRange,
    PhoneAlreadyRegistered,

    // Questions (E2xxx)
    QuestionNotFound,
    InvalidAnswerOption,
    CustomQuestionLimit,
    CannotAnswerOwnQuestion,

    // Matching (E3xxx)
    InsufficientAnswers,
    NoCandidate,
    AlreadyMatched,
    MatchNotFound,
    NotParticipant,
    AlreadyResolved,
    AlreadyResponded,
    InvalidMatchState,

    // Missions (E4xxx)
    MissionNotFound,
    InvalidMissionState,
    TooEarlyToConfirm,

    // Notifications (E5xxx)
    NotificationNotFound,

    // Safety (E6xxx)
    CannotReportSelf,
    DuplicateReport,
}

impl ErrorCode {
    pub fn code(&self) -> &'static str {
        match self {
            // Shared
            Self::InternalError => "E0001",
            Self::ValidationError => "E0002",
            Self::NotFound => "E0003",
            Self::Unauthorized => "E0004",
            Self::Forbidden => "E0005",
            Self::BadRequest => "E0006",
            Self::Conflict => "E0007",
            Self::ServiceUnavailable => "E0008",
            Self::TokenExpired => "E0009",
            Self::TokenInvalid => "E0010",

            // Profile
            Self::ProfileNotFound => "E1001",
            Self::ProfileInactive => "E1002",
            Self::InvalidPreferenceRange => "E1003",
            Self::PhoneAlreadyRegistered => "E1004",

            // Questions
            Self::QuestionNotFound => "E2001",
            Self::InvalidAnswerOption => "E2002",
            Self::CustomQuestionLimit => "E2003",
            Self::CannotAnswerOwnQuestion => "E2004",

            // Matching
            Self::InsufficientAnswers => "E3001",
            Self::NoCandidate => "E3002",
            Self::AlreadyMatched => "E3003",
            Self::MatchNotFound => "E3004",
            Self::NotParticipant => "E3005",
            Self::AlreadyResolved => "E3006",
            Self::AlreadyResponded => "E3007",
            Self::InvalidMatchState => "E3008",

            // Missions
            Self::MissionNotFound => "E4001",
            Self::InvalidMissionState => "E4002",
            Self::TooEarlyToConfirm => "E4003",

            // Notifications
            Self::NotificationNotFound => "E5001",

            // Safety
            Self::CannotReportSelf => "E6001",
            Self::DuplicateReport => "E6002",
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::InternalError | Self::ServiceUnavailable => StatusCode::INTERNAL_SERVER_ERROR,
            Self::ValidationError | Self::BadRequest | Self::InvalidPreferenceRange
            | Self::InvalidAnswerOption => StatusCode::BAD_REQUEST,
            Self::NotFound | Self::ProfileNotFound | Self::QuestionNotFound
            | Self::MatchNotFound | Self::MissionNotFound | Self::NotificationNotFound
            | Self::NoCandidate => StatusCode::NOT_FOUND,
            Self::Unauthorized | Self::TokenExpired | Self::TokenInvalid => {
                StatusCode::UNAUTHORIZED
            }
            Self::Forbidden | Self::ProfileInactive | Self::NotParticipant
            | Self::CannotAnswerOwnQuestion | Self::CannotReportSelf => StatusCode::FORBIDDEN,
            Self::Conflict | Self::PhoneAlreadyRegistered | Self::AlreadyMatched
            | Self::AlreadyResolved | Self::AlreadyResponded | Self::DuplicateReport => {
                StatusCode::CONFLICT
            }
            Self::CustomQuestionLimit | Self::InsufficientAnswers | Self::InvalidMatchState
            | Self::InvalidMissionState | Self::TooEarlyToConfirm => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("{message}")]
    Known {
        code: ErrorCode,
        message: String,
        details: Option<serde_json::Value>,
    },

    #[error("internal server error")]
    Internal(#[from] anyhow::Error),

    #[error("database error: {0}")]
    Database(#[from] diesel::result::Error),

    #[error("validation error: {0}")]
    Validation(String),
}

impl AppError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self::Known {
            code,
            message: message.into(),
            details: None,
        }
    }

    pub fn with_details(code: ErrorCode, message: impl Into<String>, details: serde_json::Value) -> Self {
        Self::Known {
            code,
            message: message.into(),
            details: Some(details),
        }
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Unauthorized, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::NotFound, message)
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::BadRequest, message)
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Forbidden, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InternalError, message)
    }

    /// Remaps a unique-constraint violation to the given code, leaving every
    /// other database error untouched. Used where a constraint expresses a
    /// domain rule (one match per pair, one answer per question).
    pub fn map_unique_violation(err: diesel::result::Error, code: ErrorCode, message: &str) -> Self {
        match err {
            diesel::result::Error::DatabaseError(
                diesel::result::DatabaseErrorKind::UniqueViolation,
                _,
            ) => Self::new(code, message),
            other => Self::Database(other),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_response) = match &self {
            AppError::Known { code, message, details } => {
                let status = code.status_code();
                let mut resp = ApiErrorResponse::new(code.code(), message);
                if let Some(d) = details {
                    resp = resp.with_details(d.clone());
                }
                (status, resp)
            }
            AppError::Internal(err) => {
                tracing::error!(error = %err, "internal server error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ApiErrorResponse::new("E0001", "internal server error"),
                )
            }
            AppError::Database(err) => {
                tracing::error!(error = %err, "database error");
                match err {
                    diesel::result::Error::NotFound => (
                        StatusCode::NOT_FOUND,
                        ApiErrorResponse::new("E0003", "resource not found"),
                    ),
                    _ => (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        ApiErrorResponse::new("E0001", "database error"),
                    ),
                }
            }
            AppError::Validation(msg) => (
                StatusCode::BAD_REQUEST,
                ApiErrorResponse::new("E0002", msg),
            ),
        };

        (status, Json(error_response)).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;
    use diesel::result::{DatabaseErrorKind, Error as DieselError};

    #[test]
    fn unique_violation_maps_to_domain_code() {
        let err = DieselError::DatabaseError(
            DatabaseErrorKind::UniqueViolation,
            Box::new("duplicate key value".to_string()),
        );
        let mapped = AppError::map_unique_violation(err, ErrorCode::AlreadyMatched, "already matched");
        match mapped {
            AppError::Known { code, .. } => assert_eq!(code, ErrorCode::AlreadyMatched),
            other => panic!("expected Known, got {other:?}"),
        }
    }

    #[test]
    fn other_database_errors_pass_through() {
        let mapped = AppError::map_unique_violation(
            DieselError::NotFound,
            ErrorCode::AlreadyMatched,
            "already matched",
        );
        assert!(matches!(mapped, AppError::Database(DieselError::NotFound)));
    }

    #[test]
    fn status_codes_are_stable() {
        assert_eq!(ErrorCode::AlreadyMatched.code(), "E3003");
        assert_eq!(ErrorCode::AlreadyMatched.status_code(), StatusCode::CONFLICT);
        assert_eq!(ErrorCode::TooEarlyToConfirm.status_code(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(ErrorCode::NotParticipant.status_code(), StatusCode::FORBIDDEN);
    }
}
