use axum::{extract::State, routing::post, Json, Router};
use tracing::{info, instrument};

use crate::{
    auth::jwt::AuthUser,
    error::ApiError,
    questions::model::{Difficulty, QuestionType},
    state::AppState,
};

use super::dto::{ExamMode, ExamQuestion, ExamRequest, ExamResponse};
use super::service::{
    build_closed_test_prep_exam, build_mixed_exam, build_standard_exam, clamp_count,
};

pub fn routes() -> Router<AppState> {
    Router::new().route("/exam", post(create_exam))
}

#[instrument(skip(state, payload), fields(mode = ?payload.mode, count = payload.count))]
pub async fn create_exam(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(payload): Json<ExamRequest>,
) -> Result<Json<ExamResponse>, ApiError> {
    let questions = match payload.mode {
        ExamMode::Mixed => {
            if payload.count < 1 {
                return Err(ApiError::Validation("count must be at least 1".into()));
            }
            build_mixed_exam(state.questions.as_ref(), payload.count, payload.difficulty).await?
        }
        ExamMode::Closed if payload.difficulty == Some(Difficulty::TestPrep) => {
            let count = clamp_count(ExamMode::Closed, payload.count);
            build_closed_test_prep_exam(state.test_prep_bank.as_deref(), count).await?
        }
        ExamMode::Open | ExamMode::Closed => {
            let qtype = match payload.mode {
                ExamMode::Open => QuestionType::Open,
                _ => QuestionType::Closed,
            };
            let count = clamp_count(payload.mode, payload.count);
            build_standard_exam(state.questions.as_ref(), qtype, count, payload.difficulty).await?
        }
    };

    let questions: Vec<ExamQuestion> = questions.into_iter().map(ExamQuestion::from).collect();
    info!(user_id = %user_id, count = questions.len(), "exam assembled");
    Ok(Json(ExamResponse {
        mode: payload.mode,
        count: questions.len(),
        questions,
    }))
}
