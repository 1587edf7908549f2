//! HTTP error responses
//!
//! Every handler and the auth middleware fail with `ApiError`. Each variant
//! maps to one status code and one JSON body shape; internal faults are
//! logged here and reach the client only as a generic 500.

use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::{Value, json};

use crate::core::auth::jwt::JwtError;
use crate::core::auth::service::AuthError;
use crate::core::db::repositories::NoteRepositoryError;
use crate::core::validation::{FieldError, ValidationError};

/// Field that collided with an existing account
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConflictField {
    Username,
    Email,
}

impl ConflictField {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConflictField::Username => "username",
            ConflictField::Email => "email",
        }
    }

    fn label(&self) -> &'static str {
        match self {
            ConflictField::Username => "Username",
            ConflictField::Email => "Email",
        }
    }
}

/// API error
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{message}")]
    MissingFields {
        message: &'static str,
        fields: Vec<&'static str>,
    },

    #[error("Validation Error")]
    Validation(Vec<FieldError>),

    #[error("{} already exists", .0.label())]
    Conflict(ConflictField),

    #[error("No token, authorization denied")]
    MissingToken,

    #[error("Token is not valid")]
    InvalidToken,

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("User not found")]
    UserNotFound,

    #[error("Note not found or unauthorized")]
    NoteNotFound { note_id: String },

    #[error("Internal error: {0}")]
    Internal(String),
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::MissingFields { .. } | ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::MissingToken | ApiError::InvalidToken | ApiError::InvalidCredentials => {
                StatusCode::UNAUTHORIZED
            }
            ApiError::UserNotFound | ApiError::NoteNotFound { .. } => StatusCode::NOT_FOUND,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn body(&self) -> Value {
        let message = self.to_string();
        match self {
            ApiError::MissingFields { fields, .. } => {
                json!({ "message": message, "missingFields": fields })
            }
            ApiError::Validation(errors) => json!({ "message": message, "errors": errors }),
            ApiError::Conflict(field) => {
                json!({ "message": message, "conflictField": field.as_str() })
            }
            ApiError::MissingToken => json!({ "message": message, "error": "Token is missing" }),
            ApiError::InvalidToken => {
                json!({ "message": message, "error": "Invalid or expired token" })
            }
            ApiError::InvalidCredentials => json!({ "message": message, "field": "password" }),
            ApiError::UserNotFound => json!({ "message": message, "field": "username" }),
            ApiError::NoteNotFound { note_id } => {
                json!({ "message": message, "noteId": note_id })
            }
            ApiError::Internal(_) => json!({
                "error": "Internal Server Error",
                "details": "An unexpected error occurred",
            }),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if let ApiError::Internal(detail) = &self {
            tracing::error!("Internal error: {}", detail);
        }

        (self.status_code(), Json(self.body())).into_response()
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        match err {
            ValidationError::MissingFields { message, fields } => {
                ApiError::MissingFields { message, fields }
            }
            ValidationError::Invalid(errors) => ApiError::Validation(errors),
        }
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::Validation(e) => e.into(),
            AuthError::UsernameAlreadyExists => ApiError::Conflict(ConflictField::Username),
            AuthError::EmailAlreadyExists => ApiError::Conflict(ConflictField::Email),
            AuthError::UserNotFound => ApiError::UserNotFound,
            AuthError::InvalidCredentials => ApiError::InvalidCredentials,
            AuthError::InternalError(detail) => ApiError::Internal(detail),
        }
    }
}

/// Any token failure is reported to the client as the same generic rejection
impl From<JwtError> for ApiError {
    fn from(_: JwtError) -> Self {
        ApiError::InvalidToken
    }
}

impl From<NoteRepositoryError> for ApiError {
    fn from(err: NoteRepositoryError) -> Self {
        match err {
            // A validly signed token whose user is gone
            NoteRepositoryError::OwnerNotFound => ApiError::InvalidToken,
            NoteRepositoryError::DatabaseError(e) => ApiError::Internal(e.to_string()),
        }
    }
}

/// Body could not be read as JSON
impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::Validation(vec![FieldError::new("body", rejection.body_text())])
    }
}
