use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Deserialize)]
pub struct AnswerSubmission {
    pub question_id: i64,
    pub choice: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnswerKind {
    OpenBook,
    ClosedBook,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MixedAnswerSubmission {
    pub question_id: i64,
    pub kind: AnswerKind,
    pub choice: String,
}

#[derive(Debug, Serialize)]
pub struct WrongAnswer {
    pub question_id: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<AnswerKind>,
    pub text: String,
    pub user_choice: String,
    pub correct_choice: String,
    pub explanation: String,
}

/// Result of one graded test-prep submission. `psychometric_score` is the
/// domain-weighted mastery score (0-100) for test prep exams.
#[derive(Debug, Serialize)]
pub struct ExamResultResponse {
    pub correct: usize,
    pub total_questions: usize,
    pub percent: f64,
    pub raw_percent: Option<f64>,
    pub psychometric_score: Option<f64>,
    pub wrong_answers: Vec<WrongAnswer>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn answer_kind_uses_snake_case() {
        let a: MixedAnswerSubmission =
            serde_json::from_str(r#"{"question_id":1,"kind":"open_book","choice":"B"}"#).unwrap();
        assert_eq!(a.kind, AnswerKind::OpenBook);
    }

    #[test]
    fn wrong_answer_omits_absent_kind() {
        let wrong = WrongAnswer {
            question_id: 7,
            kind: None,
            text: "q".into(),
            user_choice: "B".into(),
            correct_choice: "A".into(),
            explanation: "why".into(),
        };
        let json = serde_json::to_value(&wrong).unwrap();
        assert!(json.get("kind").is_none());
        assert_eq!(json["correct_choice"], "A");
    }
}
