use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// open-book questions let the candidate consult references, closed-book do not.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "question_type", rename_all = "lowercase")]
pub enum QuestionType {
    Open,
    Closed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(type_name = "question_difficulty", rename_all = "snake_case")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
    TestPrep,
}

/// One bank question. Rows come from the `questions` table or from the
/// bundled closed-book JSON file, normalized to the same shape.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Question {
    pub id: i64,
    pub text: String,
    pub correct_answer: String,
    pub qtype: Option<QuestionType>,
    pub difficulty: Option<Difficulty>,
    pub topic: Option<String>,
    pub subject: Option<String>,
    /// Scoring category used by the psychometric mastery computation.
    pub domain: Option<String>,
    /// Authored explanation shown when the question is answered wrong.
    pub source_note: Option<String>,
    // Guided mode: where the answer lives.
    pub reference_document: Option<String>,
    pub reference_section: Option<String>,
    pub tags: Option<String>,
}

/// Read filter shared by both backing stores.
#[derive(Debug, Clone, Default)]
pub struct QuestionFilter {
    pub qtype: Option<QuestionType>,
    pub difficulty: Option<Difficulty>,
    pub limit: Option<i64>,
}

impl QuestionFilter {
    pub fn qtype(qtype: QuestionType) -> Self {
        Self {
            qtype: Some(qtype),
            ..Self::default()
        }
    }

    pub fn with_difficulty(mut self, difficulty: Option<Difficulty>) -> Self {
        self.difficulty = difficulty;
        self
    }

    pub fn with_limit(mut self, limit: i64) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn matches(&self, q: &Question) -> bool {
        if let Some(want) = self.qtype {
            if q.qtype != Some(want) {
                return false;
            }
        }
        if let Some(want) = self.difficulty {
            if q.difficulty != Some(want) {
                return false;
            }
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(id: i64, qtype: QuestionType, difficulty: Difficulty) -> Question {
        Question {
            id,
            text: format!("question {id}"),
            correct_answer: "A".into(),
            qtype: Some(qtype),
            difficulty: Some(difficulty),
            topic: None,
            subject: None,
            domain: None,
            source_note: None,
            reference_document: None,
            reference_section: None,
            tags: None,
        }
    }

    #[test]
    fn filter_matches_on_qtype_and_difficulty() {
        let q = sample(1, QuestionType::Open, Difficulty::Easy);
        assert!(QuestionFilter::default().matches(&q));
        assert!(QuestionFilter::qtype(QuestionType::Open).matches(&q));
        assert!(!QuestionFilter::qtype(QuestionType::Closed).matches(&q));
        assert!(!QuestionFilter::qtype(QuestionType::Open)
            .with_difficulty(Some(Difficulty::Hard))
            .matches(&q));
    }

    #[test]
    fn difficulty_serializes_snake_case() {
        assert_eq!(
            serde_json::to_string(&Difficulty::TestPrep).unwrap(),
            "\"test_prep\""
        );
        assert_eq!(
            serde_json::from_str::<QuestionType>("\"closed\"").unwrap(),
            QuestionType::Closed
        );
    }
}
