use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use tracing::instrument;

use crate::{auth::jwt::AuthUser, error::ApiError, state::AppState};

use super::model::{Difficulty, Question, QuestionFilter, QuestionType};

pub fn read_routes() -> Router<AppState> {
    Router::new().route("/questions", get(list_questions))
}

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub qtype: Option<QuestionType>,
    pub difficulty: Option<Difficulty>,
    #[serde(default = "default_limit")]
    pub limit: i64,
}

fn default_limit() -> i64 {
    50
}

#[instrument(skip(state))]
pub async fn list_questions(
    State(state): State<AppState>,
    AuthUser(_user_id): AuthUser,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<Question>>, ApiError> {
    if query.limit < 1 {
        return Err(ApiError::Validation("limit must be at least 1".into()));
    }
    let filter = QuestionFilter {
        qtype: query.qtype,
        difficulty: query.difficulty,
        limit: Some(query.limit),
    };
    let questions = state.questions.list(&filter).await?;
    Ok(Json(questions))
}
