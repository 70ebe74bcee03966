use axum::{
    extract::{FromRef, State},
    routing::{get, post},
    Json, Router,
};
use lazy_static::lazy_static;
use regex::Regex;
use tracing::{info, instrument, warn};

use crate::{error::ApiError, state::AppState};

use super::{
    dto::{LoginRequest, PublicUser, TokenResponse},
    jwt::{AuthUser, JwtKeys},
    password::verify_password,
    repo::User,
};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/auth/login", post(login))
        .route("/auth/me", get(me))
}

pub(crate) fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    Json(mut payload): Json<LoginRequest>,
) -> Result<Json<TokenResponse>, ApiError> {
    payload.email = payload.email.trim().to_lowercase();

    if !is_valid_email(&payload.email) {
        warn!("login with malformed email");
        return Err(ApiError::Validation("invalid email".into()));
    }

    // Unknown email and wrong password collapse into the same rejection.
    let user = match User::find_by_email(&state.db, &payload.email).await? {
        Some(u) => u,
        None => {
            warn!(email = %payload.email, "login unknown email");
            return Err(ApiError::InvalidCredentials);
        }
    };

    if !verify_password(&payload.password, &user.password_hash)? {
        warn!(user_id = %user.id, "login invalid password");
        return Err(ApiError::InvalidCredentials);
    }

    let keys = JwtKeys::from_ref(&state);
    let access_token = keys.sign(user.id)?;

    info!(user_id = %user.id, "user logged in");
    Ok(Json(TokenResponse {
        access_token,
        token_type: "bearer",
        user: PublicUser {
            id: user.id,
            email: user.email,
            has_active_subscription: user.has_active_subscription,
        },
    }))
}

#[instrument(skip(state))]
pub async fn me(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<PublicUser>, ApiError> {
    let user = User::find_by_id(&state.db, user_id)
        .await?
        .ok_or_else(|| ApiError::Unauthorized("user not found".into()))?;

    Ok(Json(PublicUser {
        id: user.id,
        email: user.email,
        has_active_subscription: user.has_active_subscription,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn email_validation() {
        assert!(is_valid_email("admin@example.com"));
        assert!(is_valid_email("a.b+c@sub.example.org"));
        assert!(!is_valid_email("admin@example"));
        assert!(!is_valid_email("not-an-email"));
        assert!(!is_valid_email("two@at@example.com"));
        assert!(!is_valid_email(""));
    }

    #[test]
    fn token_response_serializes_bearer() {
        let response = TokenResponse {
            access_token: "abc".into(),
            token_type: "bearer",
            user: PublicUser {
                id: uuid::Uuid::new_v4(),
                email: "user@example.com".into(),
                has_active_subscription: true,
            },
        };
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["token_type"], "bearer");
        assert_eq!(json["user"]["email"], "user@example.com");
        assert_eq!(json["user"]["has_active_subscription"], true);
    }
}
