use std::sync::Arc;

use anyhow::Context;
use sqlx::{postgres::PgPoolOptions, PgPool};
use tracing::{debug, warn};

use crate::config::AppConfig;
use crate::questions::store::{DbQuestionStore, JsonQuestionStore, QuestionStore};

#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub config: Arc<AppConfig>,
    /// Primary question store, backed by the `questions` table.
    pub questions: Arc<dyn QuestionStore>,
    /// Authored closed-book bank from the bundled JSON file. Absent when the
    /// file is missing; closed-book test prep then fails per request.
    pub test_prep_bank: Option<Arc<dyn QuestionStore>>,
}

impl AppState {
    pub async fn init() -> anyhow::Result<Self> {
        let config = Arc::new(AppConfig::from_env()?);
        Self::with_config(config).await
    }

    pub async fn with_config(config: Arc<AppConfig>) -> anyhow::Result<Self> {
        let db = PgPoolOptions::new()
            .max_connections(10)
            .connect(&config.database_url)
            .await
            .context("connect to database")?;

        let questions: Arc<dyn QuestionStore> = Arc::new(DbQuestionStore::new(db.clone()));

        let test_prep_bank: Option<Arc<dyn QuestionStore>> =
            match JsonQuestionStore::load(&config.question_bank_path) {
                Ok(bank) => Some(Arc::new(bank)),
                Err(e) => {
                    warn!(error = %e, "closed-book bank unavailable; test prep exams will fail");
                    None
                }
            };

        debug!(
            email_configured = config.email.is_some(),
            origins = config.cors_origins.len(),
            "app state initialized"
        );

        Ok(Self {
            db,
            config,
            questions,
            test_prep_bank,
        })
    }
}
