//! Auth API endpoints
//!
//! - POST /signup - Register a new user
//! - POST /login - Check credentials and get an access token

use axum::{
    Json, Router,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    routing::post,
};
use serde::Serialize;
use uuid::Uuid;

use crate::core::app::AppState;
use crate::core::auth::service::{AuthService, LoginRequest, SignupRequest};
use crate::core::error::ApiError;

/// Response for a successful signup
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SignupResponse {
    pub message: String,
    pub user_id: Uuid,
}

/// Response for a successful login
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub token: String,
    pub user_id: Uuid,
    pub username: String,
    pub message: String,
}

/// Create the auth API router
pub fn auth_api_router() -> Router<AppState> {
    Router::new()
        .route("/signup", post(signup_handler))
        .route("/login", post(login_handler))
}

/// POST /signup
async fn signup_handler(
    State(auth_service): State<AuthService>,
    payload: Result<Json<SignupRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<SignupResponse>), ApiError> {
    let Json(request) = payload?;
    tracing::info!(
        "Signup attempt for username: {}",
        request.username.as_deref().unwrap_or_default()
    );

    let user = auth_service
        .signup(&request)
        .await
        .inspect_err(|e| tracing::info!("Signup rejected: {}", e))?;

    tracing::info!("User registered successfully: {} ({})", user.username, user.id);

    Ok((
        StatusCode::CREATED,
        Json(SignupResponse {
            message: "User registered successfully. Please login.".to_string(),
            user_id: user.id,
        }),
    ))
}

/// POST /login
async fn login_handler(
    State(auth_service): State<AuthService>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<LoginResponse>, ApiError> {
    let Json(request) = payload?;
    tracing::info!(
        "Login attempt for username: {}",
        request.username.as_deref().unwrap_or_default()
    );

    let outcome = auth_service
        .login(&request)
        .await
        .inspect_err(|e| tracing::info!("Login rejected: {}", e))?;

    tracing::info!(
        "User logged in successfully: {} (token expires {})",
        outcome.user.username,
        outcome.token.expires_at
    );

    Ok(Json(LoginResponse {
        token: outcome.token.token,
        user_id: outcome.user.id,
        username: outcome.user.username,
        message: "Login successful".to_string(),
    }))
}
