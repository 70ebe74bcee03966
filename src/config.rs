use std::path::PathBuf;

use serde::Deserialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AppEnv {
    Development,
    Production,
}

#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    pub secret: String,
    pub ttl_minutes: i64,
}

/// SMTP settings reserved for a future email feature. Loaded so that a
/// misconfigured deployment is caught at startup, but nothing sends mail yet.
#[derive(Debug, Clone, Deserialize)]
pub struct EmailConfig {
    pub from: Option<String>,
    pub smtp_host: String,
    pub smtp_port: u16,
    pub smtp_user: Option<String>,
    pub smtp_password: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub env: AppEnv,
    pub database_url: String,
    pub jwt: JwtConfig,
    pub cors_origins: Vec<String>,
    pub question_bank_path: PathBuf,
    pub email: Option<EmailConfig>,
}

const DEFAULT_CORS_ORIGINS: &str = "http://localhost:5173,http://127.0.0.1:5173";
const DEFAULT_BANK_PATH: &str = "data/closed_book_questions.json";

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from a key lookup function so tests do not have to
    /// mutate process environment variables.
    fn from_lookup(get: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let env = match get("APP_ENV").as_deref() {
            None | Some("development") | Some("dev") => AppEnv::Development,
            Some("production") | Some("prod") => AppEnv::Production,
            Some(other) => anyhow::bail!("APP_ENV has unknown value {other:?}"),
        };

        let database_url =
            get("DATABASE_URL").ok_or_else(|| anyhow::anyhow!("DATABASE_URL is not set"))?;
        let secret = get("JWT_SECRET").ok_or_else(|| anyhow::anyhow!("JWT_SECRET is not set"))?;

        if env == AppEnv::Production {
            if database_url.is_empty() {
                anyhow::bail!("DATABASE_URL must be non-empty in production");
            }
            if secret.is_empty() {
                anyhow::bail!("JWT_SECRET must be non-empty in production");
            }
        }

        let jwt = JwtConfig {
            secret,
            ttl_minutes: get("JWT_TTL_MINUTES")
                .and_then(|v| v.parse::<i64>().ok())
                .unwrap_or(60),
        };

        let cors_origins =
            parse_origins(&get("CORS_ORIGINS").unwrap_or_else(|| DEFAULT_CORS_ORIGINS.into()));

        let question_bank_path = get("QUESTION_BANK_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_BANK_PATH));

        let email = match get("EMAIL_SMTP_HOST") {
            Some(smtp_host) => Some(EmailConfig {
                from: get("EMAIL_FROM"),
                smtp_host,
                smtp_port: get("EMAIL_SMTP_PORT")
                    .map(|v| {
                        v.parse::<u16>()
                            .map_err(|_| anyhow::anyhow!("EMAIL_SMTP_PORT is not a valid port"))
                    })
                    .transpose()?
                    .unwrap_or(587),
                smtp_user: get("EMAIL_SMTP_USER"),
                smtp_password: get("EMAIL_SMTP_PASSWORD"),
            }),
            None => None,
        };

        Ok(Self {
            env,
            database_url,
            jwt,
            cors_origins,
            question_bank_path,
            email,
        })
    }
}

fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}
