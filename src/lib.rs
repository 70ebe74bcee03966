//! Backend for the CASp exam-preparation app: seeded JWT auth, a question
//! bank served from Postgres or a bundled JSON file, exam assembly, and
//! test-prep result grading.

pub mod app;
pub mod auth;
pub mod config;
pub mod error;
pub mod exam;
pub mod questions;
pub mod results;
pub mod state;
