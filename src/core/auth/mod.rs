//! Authentication module
//!
//! This module provides:
//! - Password hashing with bcrypt
//! - JWT access token generation and validation
//! - Middleware resolving bearer tokens to the calling user
//! - User signup and login, and their REST endpoints

pub mod api;
pub mod jwt;
pub mod middleware;
pub mod password;
pub mod service;

pub use api::auth_api_router;
pub use jwt::{Claims, IssuedToken, JwtConfig, JwtError, JwtService};
pub use middleware::{AuthUser, AuthenticatedUser, require_auth};
pub use password::{PasswordError, PasswordHasher};
pub use service::{AuthError, AuthService, LoginOutcome, LoginRequest, SignupRequest};
