use axum::extract::{Path, State};
use axum::Json;
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

use mannam_shared::errors::{AppError, AppResult, ErrorCode};
use mannam_shared::types::auth::AuthUser;
use mannam_shared::types::ApiResponse;

use crate::models::{CustomQuestion, CustomQuestionAnswer, NewCustomQuestion, NewCustomQuestionAnswer};
use crate::schema::{custom_question_answers, custom_questions};
use crate::AppState;

const MAX_ACTIVE_PER_AUTHOR: i64 = 10;

// --- POST /custom-questions ---

#[derive(Debug, Deserialize, Validate)]
pub struct CreateCustomQuestionRequest {
    #[validate(length(min = 5, max = 200, message = "question text must be 5-200 characters"))]
    pub question_text: String,
    #[validate(length(min = 1, max = 50, message = "options must be 1-50 characters"))]
    pub option_a: String,
    #[validate(length(min = 1, max = 50, message = "options must be 1-50 characters"))]
    pub option_b: String,
    pub preferred_answer: String,
}

pub async fn create_custom_question(
    user: AuthUser,
    State(state): State<Arc<AppState>>,
    Json(mut req): Json<CreateCustomQuestionRequest>,
) -> AppResult<Json<ApiResponse<CustomQuestion>>> {
    req.question_text = req.question_text.trim().to_string();
    req.option_a = req.option_a.trim().to_string();
    req.option_b = req.option_b.trim().to_string();
    req.validate()
        .map_err(|e| AppError::new(ErrorCode::ValidationError, e.to_string()))?;
    if !matches!(req.preferred_answer.as_str(), "a" | "b") {
        return Err(AppError::new(
            ErrorCode::InvalidAnswerOption,
            "preferred_answer must be 'a' or 'b'",
        ));
    }

    let mut conn = state.db.get().map_err(|e| AppError::internal(e.to_string()))?;

    let active_count: i64 = custom_questions::table
        .filter(custom_questions::author_id.eq(user.id))
        .filter(custom_questions::is_active.eq(true))
        .count()
        .get_result(&mut conn)?;
    if active_count >= MAX_ACTIVE_PER_AUTHOR {
        return Err(AppError::new(
            ErrorCode::CustomQuestionLimit,
            format!("you can have at most {MAX_ACTIVE_PER_AUTHOR} active custom questions"),
        ));
    }

    let created: CustomQuestion = diesel::insert_into(custom_questions::table)
        .values(&NewCustomQuestion {
            author_id: user.id,
            question_text: req.question_text,
            option_a: req.option_a,
            option_b: req.option_b,
            preferred_answer: req.preferred_answer,
        })
        .get_result(&mut conn)?;

    Ok(Json(ApiResponse::ok(created)))
}

// --- GET /custom-questions/mine ---

pub async fn list_my_questions(
    user: AuthUser,
    State(state): State<Arc<AppState>>,
) -> AppResult<Json<ApiResponse<Vec<CustomQuestion>>>> {
    let mut conn = state.db.get().map_err(|e| AppError::internal(e.to_string()))?;

    let mine = custom_questions::table
        .filter(custom_questions::author_id.eq(user.id))
        .filter(custom_questions::is_active.eq(true))
        .order(custom_questions::created_at.desc())
        .load::<CustomQuestion>(&mut conn)?;

    Ok(Json(ApiResponse::ok(mine)))
}

// --- GET /custom-questions/to-answer ---

/// What a respondent sees: never the author's preferred answer.
#[derive(Debug, Serialize)]
pub struct CustomQuestionPublic {
    pub id: Uuid,
    pub author_id: Uuid,
    pub question_text: String,
    pub option_a: String,
    pub option_b: String,
}

impl From<CustomQuestion> for CustomQuestionPublic {
    fn from(q: CustomQuestion) -> Self {
        Self {
            id: q.id,
            author_id: q.author_id,
            question_text: q.question_text,
            option_a: q.option_a,
            option_b: q.option_b,
        }
    }
}

pub async fn list_questions_to_answer(
    user: AuthUser,
    State(state): State<Arc<AppState>>,
) -> AppResult<Json<ApiResponse<Vec<CustomQuestionPublic>>>> {
    let mut conn = state.db.get().map_err(|e| AppError::internal(e.to_string()))?;

    let answered: Vec<Uuid> = custom_question_answers::table
        .filter(custom_question_answers::user_id.eq(user.id))
        .select(custom_question_answers::question_id)
        .load(&mut conn)?;

    let open: Vec<CustomQuestion> = custom_questions::table
        .filter(custom_questions::is_active.eq(true))
        .filter(custom_questions::author_id.ne(user.id))
        .filter(custom_questions::id.ne_all(answered))
        .order(custom_questions::created_at.desc())
        .load(&mut conn)?;

    Ok(Json(ApiResponse::ok(
        open.into_iter().map(CustomQuestionPublic::from).collect(),
    )))
}

// --- POST /custom-questions/:id/answer ---

#[derive(Debug, Deserialize)]
pub struct AnswerRequest {
    pub answer: String,
}

pub async fn answer_custom_question(
    user: AuthUser,
    State(state): State<Arc<AppState>>,
    Path(question_id): Path<Uuid>,
    Json(req): Json<AnswerRequest>,
) -> AppResult<Json<ApiResponse<CustomQuestionAnswer>>> {
    if !matches!(req.answer.as_str(), "a" | "b") {
        return Err(AppError::new(
            ErrorCode::InvalidAnswerOption,
            "answer must be 'a' or 'b'",
        ));
    }

    let mut conn = state.db.get().map_err(|e| AppError::internal(e.to_string()))?;

    let question: CustomQuestion = custom_questions::table
        .filter(custom_questions::id.eq(question_id))
        .filter(custom_questions::is_active.eq(true))
        .first(&mut conn)
        .optional()?
        .ok_or_else(|| {
            AppError::new(ErrorCode::QuestionNotFound, "question not found or inactive")
        })?;

    if question.author_id == user.id {
        return Err(AppError::new(
            ErrorCode::CannotAnswerOwnQuestion,
            "you cannot answer your own question",
        ));
    }

    let saved: CustomQuestionAnswer = diesel::insert_into(custom_question_answers::table)
        .values(&NewCustomQuestionAnswer {
            question_id,
            user_id: user.id,
            answer: req.answer.clone(),
        })
        .on_conflict((
            custom_question_answers::question_id,
            custom_question_answers::user_id,
        ))
        .do_update()
        .set((
            custom_question_answers::answer.eq(&req.answer),
            custom_question_answers::answered_at.eq(chrono::Utc::now()),
        ))
        .get_result(&mut conn)?;

    Ok(Json(ApiResponse::ok(saved)))
}

// --- DELETE /custom-questions/:id ---

/// Deactivation, not deletion: existing answer rows stay, but the question
/// stops being offered and drops out of bonus scoring.
pub async fn delete_custom_question(
    user: AuthUser,
    State(state): State<Arc<AppState>>,
    Path(question_id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<CustomQuestion>>> {
    let mut conn = state.db.get().map_err(|e| AppError::internal(e.to_string()))?;

    diesel::update(
        custom_questions::table
            .filter(custom_questions::id.eq(question_id))
            .filter(custom_questions::author_id.eq(user.id))
            .filter(custom_questions::is_active.eq(true)),
    )
    .set(custom_questions::is_active.eq(false))
    .get_result::<CustomQuestion>(&mut conn)
    .map(|q| Json(ApiResponse::ok(q)))
    .map_err(|e| match e {
        diesel::result::Error::NotFound => {
            AppError::new(ErrorCode::QuestionNotFound, "question not found")
        }
        other => AppError::Database(other),
    })
}
