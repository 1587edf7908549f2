//! Database models
//!
//! Entity structs that map to the PostgreSQL `users` and `notes` tables. The
//! in-memory stores use the same types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

// ============================================================================
// User Model
// ============================================================================

/// User entity representing a registered account
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

/// User data for creation (without id and timestamps)
#[derive(Debug, Clone)]
pub struct CreateUser {
    pub username: String,
    pub email: String,
    pub password_hash: String,
}

// ============================================================================
// Note Model
// ============================================================================

/// Note entity. `owner_id` is fixed at creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    pub id: Uuid,
    pub title: String,
    pub content: String,
    pub owner_id: Uuid,
    pub created_at: DateTime<Utc>,
}

/// Note data for creation
#[derive(Debug, Clone)]
pub struct CreateNote {
    pub owner_id: Uuid,
    pub title: String,
    pub content: String,
}

/// Replacement title and content for an existing note
#[derive(Debug, Clone)]
pub struct UpdateNote {
    pub title: String,
    pub content: String,
}
