//! Seeds the dev database: default users plus a sample question bank.
//! Users are upserted by email; sample questions are replaced wholesale so
//! repeated runs do not accumulate duplicates.

use sqlx::{postgres::PgPoolOptions, PgPool};
use tracing::info;

use casp_backend::auth::password::hash_password;
use casp_backend::auth::repo::User;
use casp_backend::config::AppConfig;
use casp_backend::questions::model::{Difficulty, QuestionType};

const SAMPLE_SUBJECT: &str = "CASp";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(std::env::var("RUST_LOG").unwrap_or_else(|_| "seed=info".into()))
        .init();

    let config = AppConfig::from_env()?;
    let db = PgPoolOptions::new()
        .max_connections(2)
        .connect(&config.database_url)
        .await?;

    sqlx::migrate!("./migrations").run(&db).await?;

    seed_users(&db).await?;
    seed_questions(&db).await?;

    Ok(())
}

async fn get_or_create_user(db: &PgPool, email: &str, password: &str, is_admin: bool) -> anyhow::Result<User> {
    if let Some(user) = User::find_by_email(db, email).await? {
        return Ok(user);
    }
    let user = User::create(db, email, &hash_password(password)?, is_admin).await?;
    info!(email, is_admin, "user created");
    Ok(user)
}

async fn seed_users(db: &PgPool) -> anyhow::Result<()> {
    // Dev-only credentials; real deployments seed their own users.
    get_or_create_user(db, "admin@example.com", "admin123", true).await?;
    get_or_create_user(db, "user@example.com", "user123", false).await?;
    Ok(())
}

async fn seed_questions(db: &PgPool) -> anyhow::Result<()> {
    let mut tx = db.begin().await?;

    sqlx::query("DELETE FROM questions WHERE subject = $1")
        .bind(SAMPLE_SUBJECT)
        .execute(&mut *tx)
        .await?;

    // 20 open-book then 20 closed-book samples; the first 10 of each are
    // easy and carry guided-mode references.
    for (qtype, topic, prefix) in [
        (QuestionType::Open, "Sample Open", "OB"),
        (QuestionType::Closed, "Sample Closed", "CB"),
    ] {
        for i in 1..=20 {
            let is_easy = i <= 10;
            let kind = match qtype {
                QuestionType::Open => "open-book",
                QuestionType::Closed => "closed-book",
            };
            sqlx::query(
                r#"
                INSERT INTO questions
                    (text, correct_answer, qtype, difficulty, topic, subject,
                     source_note, reference_document, reference_section, tags)
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
                "#,
            )
            .bind(format!("Sample {kind} question {i}"))
            .bind("A")
            .bind(qtype)
            .bind(if is_easy {
                Difficulty::Easy
            } else {
                Difficulty::Medium
            })
            .bind(topic)
            .bind(SAMPLE_SUBJECT)
            .bind(format!("Seeded {kind} sample"))
            .bind(is_easy.then(|| "CBC Chapter 11B - Sample Guide".to_string()))
            .bind(is_easy.then(|| format!("Section {prefix}-{i:02}")))
            .bind(format!("sample,{kind}"))
            .execute(&mut *tx)
            .await?;
        }
    }

    tx.commit().await?;
    info!("sample questions seeded");
    Ok(())
}
