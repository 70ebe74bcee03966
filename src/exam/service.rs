use rand::seq::SliceRandom;

use crate::error::ApiError;
use crate::questions::model::{Difficulty, Question, QuestionFilter, QuestionType};
use crate::questions::store::QuestionStore;

use super::dto::ExamMode;

/// Pool limits for standalone open-book and closed-book exams.
const OPEN_MAX: i64 = 40;
const CLOSED_MAX: i64 = 60;

pub fn clamp_count(mode: ExamMode, count: i64) -> i64 {
    let max = match mode {
        ExamMode::Open => OPEN_MAX,
        _ => CLOSED_MAX,
    };
    count.clamp(1, max)
}

/// Mixed exams are 40% open-book, remainder closed-book; when the total
/// allows it, each kind gets at least one question.
pub fn mixed_split(total: i64) -> (i64, i64) {
    let mut open = (total as f64 * 0.4).round() as i64;
    let mut closed = total - open;
    if total >= 2 {
        if open == 0 {
            open = 1;
            closed = total - open;
        }
        if closed == 0 {
            closed = 1;
            open = total - closed;
        }
    }
    (open, closed)
}

async fn list_with_fallback(
    store: &dyn QuestionStore,
    qtype: Option<QuestionType>,
    difficulty: Option<Difficulty>,
    limit: i64,
) -> Result<Vec<Question>, ApiError> {
    let base = QuestionFilter {
        qtype,
        difficulty,
        limit: Some(limit),
    };
    let questions = store.list(&base).await?;
    // Difficulty-specific pool may be empty; fall back to the full pool for
    // the same mode rather than returning an empty exam.
    if questions.is_empty() && difficulty.is_some() {
        let fallback = QuestionFilter {
            qtype,
            difficulty: None,
            limit: Some(limit),
        };
        return Ok(store.list(&fallback).await?);
    }
    Ok(questions)
}

/// Standalone open-book or closed-book exam from the primary store.
pub async fn build_standard_exam(
    store: &dyn QuestionStore,
    qtype: QuestionType,
    count: i64,
    difficulty: Option<Difficulty>,
) -> Result<Vec<Question>, ApiError> {
    let questions = list_with_fallback(store, Some(qtype), difficulty, count).await?;
    if questions.is_empty() {
        return Err(ApiError::Validation("no questions available".into()));
    }
    Ok(questions)
}

/// Mixed exam: open and closed pools drawn separately, then combined.
pub async fn build_mixed_exam(
    store: &dyn QuestionStore,
    total: i64,
    difficulty: Option<Difficulty>,
) -> Result<Vec<Question>, ApiError> {
    let (open_count, closed_count) = mixed_split(total);

    let mut open = store
        .list(&QuestionFilter {
            qtype: Some(QuestionType::Open),
            difficulty,
            limit: Some(open_count),
        })
        .await?;
    let mut closed = store
        .list(&QuestionFilter {
            qtype: Some(QuestionType::Closed),
            difficulty,
            limit: Some(closed_count),
        })
        .await?;

    if open.is_empty() && closed.is_empty() && difficulty.is_some() {
        open = store
            .list(&QuestionFilter {
                qtype: Some(QuestionType::Open),
                difficulty: None,
                limit: Some(open_count),
            })
            .await?;
        closed = store
            .list(&QuestionFilter {
                qtype: Some(QuestionType::Closed),
                difficulty: None,
                limit: Some(closed_count),
            })
            .await?;
    }

    let mut questions = open;
    questions.append(&mut closed);
    if questions.is_empty() {
        return Err(ApiError::Validation(
            "no questions available for requested difficulty/mode mix".into(),
        ));
    }
    Ok(questions)
}

/// Closed-book test prep draws from the authored JSON bank: shuffle the
/// test_prep pool and take up to `count`.
pub async fn build_closed_test_prep_exam(
    bank: Option<&dyn QuestionStore>,
    count: i64,
) -> Result<Vec<Question>, ApiError> {
    let bank =
        bank.ok_or_else(|| anyhow::anyhow!("closed-book question bank not found"))?;
    let mut pool = bank
        .list(&QuestionFilter::default().with_difficulty(Some(Difficulty::TestPrep)))
        .await?;
    if pool.is_empty() {
        return Err(ApiError::Validation(
            "no closed-book test prep questions available".into(),
        ));
    }
    pool.shuffle(&mut rand::thread_rng());
    pool.truncate(count.max(0) as usize);
    Ok(pool)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::questions::store::JsonQuestionStore;

    fn question(id: i64, qtype: QuestionType, difficulty: Difficulty) -> Question {
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

    fn store(questions: Vec<Question>) -> JsonQuestionStore {
        JsonQuestionStore::from_questions(questions)
    }

    #[test]
    fn clamp_bounds_per_mode() {
        assert_eq!(clamp_count(ExamMode::Open, 0), 1);
        assert_eq!(clamp_count(ExamMode::Open, 25), 25);
        assert_eq!(clamp_count(ExamMode::Open, 100), 40);
        assert_eq!(clamp_count(ExamMode::Closed, -5), 1);
        assert_eq!(clamp_count(ExamMode::Closed, 100), 60);
    }

    #[test]
    fn mixed_split_is_forty_sixty() {
        assert_eq!(mixed_split(10), (4, 6));
        assert_eq!(mixed_split(5), (2, 3));
        assert_eq!(mixed_split(3), (1, 2));
    }

    #[test]
    fn mixed_split_forces_one_of_each() {
        // 40% of 2 rounds to 1 already; craft the degenerate ends instead.
        assert_eq!(mixed_split(1), (0, 1));
        let (open, closed) = mixed_split(2);
        assert!(open >= 1 && closed >= 1);
    }

    #[tokio::test]
    async fn standard_exam_respects_count() {
        let s = store(
            (1..=10)
                .map(|i| question(i, QuestionType::Open, Difficulty::Easy))
                .collect(),
        );
        let exam = build_standard_exam(&s, QuestionType::Open, 4, None)
            .await
            .unwrap();
        assert_eq!(exam.len(), 4);
        assert!(exam.iter().all(|q| q.qtype == Some(QuestionType::Open)));
    }

    #[tokio::test]
    async fn standard_exam_falls_back_when_difficulty_pool_empty() {
        let s = store(vec![
            question(1, QuestionType::Closed, Difficulty::Easy),
            question(2, QuestionType::Closed, Difficulty::Easy),
        ]);
        let exam = build_standard_exam(&s, QuestionType::Closed, 5, Some(Difficulty::Hard))
            .await
            .unwrap();
        assert_eq!(exam.len(), 2);
    }

    #[tokio::test]
    async fn standard_exam_empty_pool_is_rejected() {
        let s = store(vec![]);
        let err = build_standard_exam(&s, QuestionType::Open, 5, None)
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Validation(_)));
    }

    #[tokio::test]
    async fn mixed_exam_combines_both_kinds() {
        let mut qs: Vec<Question> = (1..=10)
            .map(|i| question(i, QuestionType::Open, Difficulty::Medium))
            .collect();
        qs.extend((11..=20).map(|i| question(i, QuestionType::Closed, Difficulty::Medium)));
        let s = store(qs);

        let exam = build_mixed_exam(&s, 10, None).await.unwrap();
        assert_eq!(exam.len(), 10);
        let open = exam
            .iter()
            .filter(|q| q.qtype == Some(QuestionType::Open))
            .count();
        assert_eq!(open, 4);
    }

    #[tokio::test]
    async fn mixed_exam_falls_back_on_unmatched_difficulty() {
        let s = store(vec![
            question(1, QuestionType::Open, Difficulty::Easy),
            question(2, QuestionType::Closed, Difficulty::Easy),
        ]);
        let exam = build_mixed_exam(&s, 4, Some(Difficulty::TestPrep))
            .await
            .unwrap();
        assert_eq!(exam.len(), 2);
    }

    #[tokio::test]
    async fn mixed_exam_empty_pool_is_rejected() {
        let s = store(vec![]);
        let err = build_mixed_exam(&s, 4, None).await.unwrap_err();
        assert!(matches!(err, ApiError::Validation(_)));
    }

    #[tokio::test]
    async fn closed_test_prep_samples_from_bank() {
        let s = store(
            (1..=8)
                .map(|i| question(i, QuestionType::Closed, Difficulty::TestPrep))
                .collect(),
        );
        let exam = build_closed_test_prep_exam(Some(&s), 3).await.unwrap();
        assert_eq!(exam.len(), 3);
        assert!(exam
            .iter()
            .all(|q| q.difficulty == Some(Difficulty::TestPrep)));
    }

    #[tokio::test]
    async fn closed_test_prep_ignores_other_difficulties() {
        let s = store(vec![
            question(1, QuestionType::Closed, Difficulty::Easy),
            question(2, QuestionType::Closed, Difficulty::TestPrep),
        ]);
        let exam = build_closed_test_prep_exam(Some(&s), 10).await.unwrap();
        assert_eq!(exam.len(), 1);
        assert_eq!(exam[0].id, 2);
    }

    #[tokio::test]
    async fn closed_test_prep_without_bank_is_internal_error() {
        let err = build_closed_test_prep_exam(None, 5).await.unwrap_err();
        assert!(matches!(err, ApiError::Internal(_)));
    }

    #[tokio::test]
    async fn closed_test_prep_empty_pool_is_rejected() {
        let s = store(vec![question(1, QuestionType::Closed, Difficulty::Easy)]);
        let err = build_closed_test_prep_exam(Some(&s), 5).await.unwrap_err();
        assert!(matches!(err, ApiError::Validation(_)));
    }
}
