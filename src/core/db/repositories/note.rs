//! Note repository for database operations
//!
//! Every read or write is keyed by the owner. Update and delete filter on
//! `id AND owner_id` inside a single statement, so ownership is checked and
//! acted on atomically; `None` means "no such note for this owner" and does
//! not distinguish a missing note from someone else's.

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::core::db::models::{CreateNote, Note, UpdateNote};

/// Note repository error types
#[derive(Debug, thiserror::Error)]
pub enum NoteRepositoryError {
    /// The owner has no user record, e.g. a token outliving its account
    #[error("Note owner does not exist")]
    OwnerNotFound,

    #[error("Database error: {0}")]
    DatabaseError(#[from] sqlx::Error),
}

/// Note store scoped by owner
#[async_trait]
pub trait NoteStore: Send + Sync {
    /// Fails with `OwnerNotFound` when `note.owner_id` is not a known user
    async fn create(&self, note: CreateNote) -> Result<Note, NoteRepositoryError>;

    /// All notes owned by `owner_id`, newest first
    async fn list_by_owner(&self, owner_id: Uuid) -> Result<Vec<Note>, NoteRepositoryError>;

    /// Replace title and content of note `id` if it belongs to `owner_id`
    async fn update_owned(
        &self,
        id: Uuid,
        owner_id: Uuid,
        changes: UpdateNote,
    ) -> Result<Option<Note>, NoteRepositoryError>;

    /// Delete note `id` if it belongs to `owner_id`, returning what was removed
    async fn delete_owned(&self, id: Uuid, owner_id: Uuid)
    -> Result<Option<Note>, NoteRepositoryError>;
}

/// PostgreSQL-backed note store
#[derive(Clone)]
pub struct NoteRepository {
    pool: PgPool,
}

impl NoteRepository {
    /// Create a new note repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl NoteStore for NoteRepository {
    async fn create(&self, note: CreateNote) -> Result<Note, NoteRepositoryError> {
        let note = sqlx::query_as::<_, Note>(
            r#"
            INSERT INTO notes (owner_id, title, content)
            VALUES ($1, $2, $3)
            RETURNING id, title, content, owner_id, created_at
            "#,
        )
        .bind(note.owner_id)
        .bind(&note.title)
        .bind(&note.content)
        .fetch_one(&self.pool)
        .await
        .map_err(map_owner_violation)?;

        Ok(note)
    }

    async fn list_by_owner(&self, owner_id: Uuid) -> Result<Vec<Note>, NoteRepositoryError> {
        let notes = sqlx::query_as::<_, Note>(
            r#"
            SELECT id, title, content, owner_id, created_at
            FROM notes
            WHERE owner_id = $1
            ORDER BY created_at DESC, id DESC
            "#,
        )
        .bind(owner_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(notes)
    }

    async fn update_owned(
        &self,
        id: Uuid,
        owner_id: Uuid,
        changes: UpdateNote,
    ) -> Result<Option<Note>, NoteRepositoryError> {
        let note = sqlx::query_as::<_, Note>(
            r#"
            UPDATE notes
            SET title = $3, content = $4
            WHERE id = $1 AND owner_id = $2
            RETURNING id, title, content, owner_id, created_at
            "#,
        )
        .bind(id)
        .bind(owner_id)
        .bind(&changes.title)
        .bind(&changes.content)
        .fetch_optional(&self.pool)
        .await?;

        Ok(note)
    }

    async fn delete_owned(
        &self,
        id: Uuid,
        owner_id: Uuid,
    ) -> Result<Option<Note>, NoteRepositoryError> {
        let note = sqlx::query_as::<_, Note>(
            r#"
            DELETE FROM notes
            WHERE id = $1 AND owner_id = $2
            RETURNING id, title, content, owner_id, created_at
            "#,
        )
        .bind(id)
        .bind(owner_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(note)
    }
}

fn map_owner_violation(err: sqlx::Error) -> NoteRepositoryError {
    if let sqlx::Error::Database(db_err) = &err
        && db_err.is_foreign_key_violation()
    {
        return NoteRepositoryError::OwnerNotFound;
    }

    NoteRepositoryError::DatabaseError(err)
}
