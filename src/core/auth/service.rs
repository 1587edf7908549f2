//! Authentication service
//!
//! Signup and login. Coordinates the credential store, the password hasher
//! and the JWT service; HTTP concerns live in `auth::api`.

use std::sync::Arc;

use serde::Deserialize;

use crate::core::auth::jwt::{IssuedToken, JwtError, JwtService};
use crate::core::auth::password::{PasswordError, PasswordHasher};
use crate::core::db::models::{CreateUser, User};
use crate::core::db::repositories::{UserRepositoryError, UserStore};
use crate::core::validation::{ValidationError, validate_login, validate_signup};

/// Authentication service error types
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Username already exists")]
    UsernameAlreadyExists,

    #[error("Email already exists")]
    EmailAlreadyExists,

    #[error("User not found")]
    UserNotFound,

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Internal error: {0}")]
    InternalError(String),
}

impl From<UserRepositoryError> for AuthError {
    fn from(err: UserRepositoryError) -> Self {
        match err {
            UserRepositoryError::UsernameAlreadyExists => AuthError::UsernameAlreadyExists,
            UserRepositoryError::EmailAlreadyExists => AuthError::EmailAlreadyExists,
            UserRepositoryError::DatabaseError(_) => AuthError::InternalError(err.to_string()),
        }
    }
}

impl From<PasswordError> for AuthError {
    fn from(err: PasswordError) -> Self {
        AuthError::InternalError(err.to_string())
    }
}

impl From<JwtError> for AuthError {
    fn from(err: JwtError) -> Self {
        AuthError::InternalError(err.to_string())
    }
}

/// Signup request body. Fields are optional so absence can be reported per field.
#[derive(Clone, Default, Deserialize)]
pub struct SignupRequest {
    pub username: Option<String>,
    pub password: Option<String>,
    pub email: Option<String>,
}

/// Login request body
#[derive(Clone, Default, Deserialize)]
pub struct LoginRequest {
    pub username: Option<String>,
    pub password: Option<String>,
}

/// Successful login
#[derive(Debug, Clone)]
pub struct LoginOutcome {
    pub user: User,
    pub token: IssuedToken,
}

/// Authentication service
#[derive(Clone)]
pub struct AuthService {
    users: Arc<dyn UserStore>,
    hasher: PasswordHasher,
    jwt_service: JwtService,
}

impl AuthService {
    /// Create a new authentication service
    pub fn new(users: Arc<dyn UserStore>, hasher: PasswordHasher, jwt_service: JwtService) -> Self {
        Self {
            users,
            hasher,
            jwt_service,
        }
    }

    pub fn jwt_service(&self) -> &JwtService {
        &self.jwt_service
    }

    /// Register a new user.
    ///
    /// The up-front lookups give the common case a precise conflict; a
    /// concurrent signup that slips past them is still caught by the store.
    pub async fn signup(&self, request: &SignupRequest) -> Result<User, AuthError> {
        let input = validate_signup(request)?;

        if self.users.find_by_username(&input.username).await?.is_some() {
            return Err(AuthError::UsernameAlreadyExists);
        }

        if self.users.find_by_email(&input.email).await?.is_some() {
            return Err(AuthError::EmailAlreadyExists);
        }

        let password_hash = self.hasher.hash(&input.password).await?;

        let user = self
            .users
            .create(CreateUser {
                username: input.username,
                email: input.email,
                password_hash,
            })
            .await?;

        Ok(user)
    }

    /// Check credentials and issue an access token
    pub async fn login(&self, request: &LoginRequest) -> Result<LoginOutcome, AuthError> {
        let input = validate_login(request)?;

        let user = self
            .users
            .find_by_username(&input.username)
            .await?
            .ok_or(AuthError::UserNotFound)?;

        if !self.hasher.verify(&input.password, &user.password_hash).await? {
            return Err(AuthError::InvalidCredentials);
        }

        let token = self.jwt_service.issue(user.id)?;

        Ok(LoginOutcome { user, token })
    }
}
