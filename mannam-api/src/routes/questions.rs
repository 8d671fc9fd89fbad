use axum::extract::{Path, State};
use axum::Json;
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use uuid::Uuid;

use mannam_shared::errors::{AppError, AppResult, ErrorCode};
use mannam_shared::types::auth::AuthUser;
use mannam_shared::types::ApiResponse;

use crate::models::{NewUserAnswer, Question, UserAnswer};
use crate::schema::{questions, user_answers};
use crate::AppState;

// --- GET /questions ---

#[derive(Debug, Serialize)]
pub struct QuestionWithAnswer {
    #[serde(flatten)]
    pub question: Question,
    pub my_answer: Option<String>,
}

pub async fn list_questions(
    user: AuthUser,
    State(state): State<Arc<AppState>>,
) -> AppResult<Json<ApiResponse<Vec<QuestionWithAnswer>>>> {
    let mut conn = state.db.get().map_err(|e| AppError::internal(e.to_string()))?;

    let active: Vec<Question> = questions::table
        .filter(questions::is_active.eq(true))
        .order((questions::category.asc(), questions::created_at.asc()))
        .load(&mut conn)?;

    let mine: HashMap<Uuid, String> = user_answers::table
        .filter(user_answers::user_id.eq(user.id))
        .select((user_answers::question_id, user_answers::answer))
        .load::<(Uuid, String)>(&mut conn)?
        .into_iter()
        .collect();

    let items = active
        .into_iter()
        .map(|question| {
            let my_answer = mine.get(&question.id).cloned();
            QuestionWithAnswer {
                question,
                my_answer,
            }
        })
        .collect();

    Ok(Json(ApiResponse::ok(items)))
}

// --- POST /questions/:id/answer ---

#[derive(Debug, Deserialize)]
pub struct AnswerRequest {
    pub answer: String,
}

pub async fn answer_question(
    user: AuthUser,
    State(state): State<Arc<AppState>>,
    Path(question_id): Path<Uuid>,
    Json(req): Json<AnswerRequest>,
) -> AppResult<Json<ApiResponse<UserAnswer>>> {
    if !matches!(req.answer.as_str(), "a" | "b") {
        return Err(AppError::new(
            ErrorCode::InvalidAnswerOption,
            "answer must be 'a' or 'b'",
        ));
    }

    let mut conn = state.db.get().map_err(|e| AppError::internal(e.to_string()))?;

    let known: bool = questions::table
        .filter(questions::id.eq(question_id))
        .filter(questions::is_active.eq(true))
        .count()
        .get_result::<i64>(&mut conn)
        .map(|c| c > 0)
        .unwrap_or(false);
    if !known {
        return Err(AppError::new(
            ErrorCode::QuestionNotFound,
            "question not found or inactive",
        ));
    }

    // Re-answering overwrites; one row per (user, question).
    let saved: UserAnswer = diesel::insert_into(user_answers::table)
        .values(&NewUserAnswer {
            user_id: user.id,
            question_id,
            answer: req.answer.clone(),
        })
        .on_conflict((user_answers::user_id, user_answers::question_id))
        .do_update()
        .set((
            user_answers::answer.eq(&req.answer),
            user_answers::answered_at.eq(chrono::Utc::now()),
        ))
        .get_result(&mut conn)?;

    Ok(Json(ApiResponse::ok(saved)))
}
