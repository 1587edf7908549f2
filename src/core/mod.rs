//! Core of the notes backend: authentication, ownership-scoped notes and the
//! HTTP surface around them

pub mod app;
pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod notes;
pub mod validation;

pub use app::{AppState, build_router, shutdown_signal};
pub use config::Config;
pub use error::ApiError;
