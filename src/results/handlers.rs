use std::collections::HashMap;

use axum::{extract::State, routing::post, Json, Router};
use tracing::{info, instrument};

use crate::{auth::jwt::AuthUser, error::ApiError, questions::model::Question, state::AppState};

use super::dto::{
    AnswerKind, AnswerSubmission, ExamResultResponse, MixedAnswerSubmission, WrongAnswer,
};
use super::scoring::{closed_book_mastery, percent};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/closed-book/test-prep-results", post(closed_book_results))
        .route("/open-book/test-prep-results", post(open_book_results))
        .route("/mixed/test-prep-results", post(mixed_results))
}

const PLACEHOLDER_TEXT: &str = "Placeholder question text";
const PLACEHOLDER_EXPLANATION: &str = "Detailed explanation will go here later.";

#[instrument(skip(state, answers), fields(answers = answers.len()))]
pub async fn closed_book_results(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(answers): Json<Vec<AnswerSubmission>>,
) -> Result<Json<ExamResultResponse>, ApiError> {
    let total = answers.len();
    let ids: Vec<i64> = answers.iter().map(|a| a.question_id).collect();
    let questions = state.questions.fetch_by_ids(&ids).await?;
    let by_id: HashMap<i64, &Question> = questions.iter().map(|q| (q.id, q)).collect();

    let mut correct = 0;
    let mut wrong_answers = Vec::new();
    let mut graded = Vec::new();

    // Submissions referencing unknown questions count toward the total but
    // are neither correct nor listed as wrong.
    for answer in &answers {
        let Some(question) = by_id.get(&answer.question_id) else {
            continue;
        };
        let is_correct = answer.choice == question.correct_answer;
        graded.push((question.domain.as_deref(), is_correct));
        if is_correct {
            correct += 1;
        } else {
            wrong_answers.push(WrongAnswer {
                question_id: answer.question_id,
                kind: None,
                text: question.text.clone(),
                user_choice: answer.choice.clone(),
                correct_choice: question.correct_answer.clone(),
                explanation: question
                    .source_note
                    .clone()
                    .unwrap_or_else(|| PLACEHOLDER_EXPLANATION.into()),
            });
        }
    }

    let mastery = closed_book_mastery(graded);
    info!(user_id = %user_id, correct, total, "closed-book test prep graded");
    Ok(Json(ExamResultResponse {
        correct,
        total_questions: total,
        percent: percent(correct, total),
        raw_percent: None,
        psychometric_score: Some(mastery),
        wrong_answers,
    }))
}

/// Open-book grading is not authored yet: half marks, every answer echoed
/// back as wrong with placeholder detail.
#[instrument(skip(answers), fields(answers = answers.len()))]
pub async fn open_book_results(
    AuthUser(user_id): AuthUser,
    Json(answers): Json<Vec<AnswerSubmission>>,
) -> Result<Json<ExamResultResponse>, ApiError> {
    let total = answers.len();
    let correct = total / 2;
    let score = percent(correct, total);

    let wrong_answers = answers
        .iter()
        .map(|a| WrongAnswer {
            question_id: a.question_id,
            kind: None,
            text: PLACEHOLDER_TEXT.into(),
            user_choice: a.choice.clone(),
            correct_choice: "A".into(),
            explanation: PLACEHOLDER_EXPLANATION.into(),
        })
        .collect();

    info!(user_id = %user_id, correct, total, "open-book test prep graded (stub)");
    Ok(Json(ExamResultResponse {
        correct,
        total_questions: total,
        percent: score,
        raw_percent: None,
        psychometric_score: Some(score),
        wrong_answers,
    }))
}

/// Mixed grading mirrors the open-book stub but keeps each answer's kind.
#[instrument(skip(answers), fields(answers = answers.len()))]
pub async fn mixed_results(
    AuthUser(user_id): AuthUser,
    Json(answers): Json<Vec<MixedAnswerSubmission>>,
) -> Result<Json<ExamResultResponse>, ApiError> {
    let total = answers.len();
    let correct = total / 2;
    let score = percent(correct, total);

    let wrong_answers = answers
        .iter()
        .map(|a| WrongAnswer {
            question_id: a.question_id,
            kind: Some(a.kind),
            text: PLACEHOLDER_TEXT.into(),
            user_choice: a.choice.clone(),
            correct_choice: "A".into(),
            explanation: PLACEHOLDER_EXPLANATION.into(),
        })
        .collect();

    info!(user_id = %user_id, correct, total, "mixed test prep graded (stub)");
    Ok(Json(ExamResultResponse {
        correct,
        total_questions: total,
        percent: score,
        raw_percent: None,
        psychometric_score: Some(score),
        wrong_answers,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(json: &serde_json::Value) -> Vec<Option<&str>> {
        json["wrong_answers"]
            .as_array()
            .unwrap()
            .iter()
            .map(|w| w.get("kind").and_then(|k| k.as_str()))
            .collect()
    }

    #[test]
    fn result_response_shape() {
        let response = ExamResultResponse {
            correct: 1,
            total_questions: 2,
            percent: 50.0,
            raw_percent: None,
            psychometric_score: Some(50.0),
            wrong_answers: vec![WrongAnswer {
                question_id: 2,
                kind: Some(AnswerKind::ClosedBook),
                text: "q".into(),
                user_choice: "B".into(),
                correct_choice: "A".into(),
                explanation: PLACEHOLDER_EXPLANATION.into(),
            }],
        };
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["percent"], 50.0);
        assert_eq!(json["psychometric_score"], 50.0);
        assert_eq!(kinds(&json), vec![Some("closed_book")]);
    }
}
