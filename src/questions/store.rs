use std::collections::HashMap;
use std::path::Path;

use anyhow::Context;
use async_trait::async_trait;
use serde::Deserialize;
use sqlx::PgPool;
use tracing::info;

use super::model::{Difficulty, Question, QuestionFilter, QuestionType};

/// Read seam over the question bank. The deployment note never settled
/// whether the bank lives in the database or in a shipped JSON file, so both
/// backends implement the same interface.
#[async_trait]
pub trait QuestionStore: Send + Sync {
    async fn list(&self, filter: &QuestionFilter) -> anyhow::Result<Vec<Question>>;
    async fn fetch_by_ids(&self, ids: &[i64]) -> anyhow::Result<Vec<Question>>;
}

/// Postgres-backed store; the `questions` table is the primary source.
pub struct DbQuestionStore {
    db: PgPool,
}

impl DbQuestionStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl QuestionStore for DbQuestionStore {
    async fn list(&self, filter: &QuestionFilter) -> anyhow::Result<Vec<Question>> {
        let rows = sqlx::query_as::<_, Question>(
            r#"
            SELECT id, text, correct_answer, qtype, difficulty, topic, subject,
                   domain, source_note, reference_document, reference_section, tags
            FROM questions
            WHERE ($1::question_type IS NULL OR qtype = $1)
              AND ($2::question_difficulty IS NULL OR difficulty = $2)
            ORDER BY id
            LIMIT $3
            "#,
        )
        .bind(filter.qtype)
        .bind(filter.difficulty)
        .bind(filter.limit)
        .fetch_all(&self.db)
        .await?;
        Ok(rows)
    }

    async fn fetch_by_ids(&self, ids: &[i64]) -> anyhow::Result<Vec<Question>> {
        let rows = sqlx::query_as::<_, Question>(
            r#"
            SELECT id, text, correct_answer, qtype, difficulty, topic, subject,
                   domain, source_note, reference_document, reference_section, tags
            FROM questions
            WHERE id = ANY($1)
            "#,
        )
        .bind(ids)
        .fetch_all(&self.db)
        .await?;
        Ok(rows)
    }
}

/// Entry shape of the authored closed-book bank file. The authoring format
/// predates the `questions` table and uses its own field names.
#[derive(Debug, Deserialize)]
struct BankEntry {
    id: i64,
    text: String,
    correctchoice: String,
    #[serde(default)]
    explanation: Option<String>,
    #[serde(default)]
    reference: Option<String>,
    #[serde(default)]
    difficulty: Option<Difficulty>,
    #[serde(default)]
    domain: Option<String>,
    // Answer choices are rendered client-side from the same file; the
    // backend only needs the correct one.
    #[serde(default)]
    #[allow(dead_code)]
    choices: Option<HashMap<String, String>>,
}

impl From<BankEntry> for Question {
    fn from(entry: BankEntry) -> Self {
        Question {
            id: entry.id,
            text: entry.text,
            correct_answer: entry.correctchoice,
            qtype: Some(QuestionType::Closed),
            difficulty: entry.difficulty,
            topic: None,
            subject: None,
            domain: entry.domain,
            source_note: entry.explanation,
            reference_document: entry.reference,
            reference_section: None,
            tags: None,
        }
    }
}

/// In-memory store over the bundled JSON bank. Loaded once at startup, so
/// repeated reads are stable for the process lifetime.
#[derive(Debug)]
pub struct JsonQuestionStore {
    questions: Vec<Question>,
}

impl JsonQuestionStore {
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("read question bank {}", path.display()))?;
        let entries: Vec<BankEntry> = serde_json::from_str(&raw)
            .with_context(|| format!("parse question bank {}", path.display()))?;
        let store = Self::from_questions(entries.into_iter().map(Question::from).collect());
        info!(path = %path.display(), count = store.questions.len(), "question bank loaded");
        Ok(store)
    }

    pub fn from_questions(questions: Vec<Question>) -> Self {
        Self { questions }
    }
}

#[async_trait]
impl QuestionStore for JsonQuestionStore {
    async fn list(&self, filter: &QuestionFilter) -> anyhow::Result<Vec<Question>> {
        let mut out: Vec<Question> = self
            .questions
            .iter()
            .filter(|q| filter.matches(q))
            .cloned()
            .collect();
        if let Some(limit) = filter.limit {
            out.truncate(limit.max(0) as usize);
        }
        Ok(out)
    }

    async fn fetch_by_ids(&self, ids: &[i64]) -> anyhow::Result<Vec<Question>> {
        Ok(self
            .questions
            .iter()
            .filter(|q| ids.contains(&q.id))
            .cloned()
            .collect())
    }
}
