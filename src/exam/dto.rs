use serde::{Deserialize, Serialize};

use crate::questions::model::{Difficulty, Question, QuestionType};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExamMode {
    Open,
    Closed,
    Mixed,
}

#[derive(Debug, Deserialize)]
pub struct ExamRequest {
    pub mode: ExamMode,
    pub count: i64,
    pub difficulty: Option<Difficulty>,
}

/// Question as delivered in an exam. The correct answer ships with the
/// question; grading happens client-side during practice and server-side for
/// test-prep submissions.
#[derive(Debug, Serialize)]
pub struct ExamQuestion {
    pub id: i64,
    pub text: String,
    pub correct_answer: String,
    pub qtype: Option<QuestionType>,
    pub difficulty: Option<Difficulty>,
    pub reference_document: Option<String>,
    pub reference_section: Option<String>,
}

impl From<Question> for ExamQuestion {
    fn from(q: Question) -> Self {
        Self {
            id: q.id,
            text: q.text,
            correct_answer: q.correct_answer,
            qtype: q.qtype,
            difficulty: q.difficulty,
            reference_document: q.reference_document,
            reference_section: q.reference_section,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ExamResponse {
    pub mode: ExamMode,
    pub count: usize,
    pub questions: Vec<ExamQuestion>,
}
