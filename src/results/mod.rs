pub mod dto;
pub mod handlers;
pub mod scoring;

use crate::state::AppState;
use axum::Router;

pub fn router() -> Router<AppState> {
    handlers::routes()
}
