//! Authentication middleware
//!
//! `require_auth` resolves the bearer token on the request to a user id and
//! stores it in the request extensions as [`AuthenticatedUser`]. Handlers
//! behind it take the identity through the [`AuthUser`] extractor; it is the
//! only place a handler learns who is calling.
//!
//! The middleware only needs the [`JwtService`]. It never looks a user up,
//! so a token stays valid for its full lifetime regardless of store state.
//!
//! ```rust,ignore
//! let notes = Router::new()
//!     .route("/notes", get(list_notes))
//!     .route_layer(middleware::from_fn_with_state(state.clone(), require_auth));
//! ```

use axum::{
    extract::{FromRequestParts, Request, State},
    http::{HeaderMap, header, request::Parts},
    middleware::Next,
    response::Response,
};
use uuid::Uuid;

use crate::core::auth::jwt::JwtService;
use crate::core::error::ApiError;

/// Identity resolved from a verified token
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthenticatedUser {
    pub user_id: Uuid,
}

/// Reject requests without a valid bearer token
pub async fn require_auth(
    State(jwt_service): State<JwtService>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = extract_bearer_token(request.headers()).inspect_err(|e| {
        tracing::warn!(
            method = %request.method(),
            path = %request.uri().path(),
            "Rejected request: {}",
            e
        );
    })?;

    let user_id = jwt_service.verify(&token).map_err(|e| {
        tracing::warn!(
            method = %request.method(),
            path = %request.uri().path(),
            "Token verification failed: {}",
            e
        );
        ApiError::from(e)
    })?;

    tracing::debug!("Authenticated request for user {}", user_id);

    request
        .extensions_mut()
        .insert(AuthenticatedUser { user_id });

    Ok(next.run(request).await)
}

/// Extract the token from `Authorization: Bearer <token>`.
///
/// An absent header or an empty token is `MissingToken`; any other scheme
/// or an unreadable header is `InvalidToken`.
pub fn extract_bearer_token(headers: &HeaderMap) -> Result<String, ApiError> {
    let Some(value) = headers.get(header::AUTHORIZATION) else {
        return Err(ApiError::MissingToken);
    };

    let value = value.to_str().map_err(|_| ApiError::InvalidToken)?.trim();
    if value.is_empty() {
        return Err(ApiError::MissingToken);
    }

    let (scheme, token) = value.split_once(' ').unwrap_or((value, ""));
    if !scheme.eq_ignore_ascii_case("bearer") {
        return Err(ApiError::InvalidToken);
    }

    let token = token.trim();
    if token.is_empty() {
        return Err(ApiError::MissingToken);
    }

    Ok(token.to_string())
}

/// Extractor for the caller's identity.
///
/// Only works on routes behind [`require_auth`]; anywhere else it rejects
/// as if no token had been sent.
#[derive(Debug, Clone, Copy)]
pub struct AuthUser(pub AuthenticatedUser);

impl AuthUser {
    pub fn user_id(&self) -> Uuid {
        self.0.user_id
    }
}

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthenticatedUser>()
            .copied()
            .map(AuthUser)
            .ok_or(ApiError::MissingToken)
    }
}
