//! In-memory stores
//!
//! Used when no `DATABASE_URL` is configured and by the router tests. They
//! keep the same guarantees as the PostgreSQL repositories: username/email
//! uniqueness is checked and claimed under one write lock, and owner-scoped
//! update/delete happen while holding the note's shard lock.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use chrono::Utc;
use dashmap::DashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::core::db::models::{CreateNote, CreateUser, Note, UpdateNote, User};
use crate::core::db::repositories::note::{NoteRepositoryError, NoteStore};
use crate::core::db::repositories::user::{UserRepositoryError, UserStore};

// ============================================================================
// Users
// ============================================================================

#[derive(Default)]
struct UserTable {
    by_id: HashMap<Uuid, User>,
    by_username: HashMap<String, Uuid>,
    by_email: HashMap<String, Uuid>,
}

/// In-memory credential store
#[derive(Default)]
pub struct MemoryUserStore {
    table: RwLock<UserTable>,
}

impl MemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.table.read().await.by_id.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    pub async fn contains(&self, id: Uuid) -> bool {
        self.table.read().await.by_id.contains_key(&id)
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn create(&self, user: CreateUser) -> Result<User, UserRepositoryError> {
        let mut table = self.table.write().await;

        if table.by_username.contains_key(&user.username) {
            return Err(UserRepositoryError::UsernameAlreadyExists);
        }
        if table.by_email.contains_key(&user.email) {
            return Err(UserRepositoryError::EmailAlreadyExists);
        }

        let user = User {
            id: Uuid::new_v4(),
            username: user.username,
            email: user.email,
            password_hash: user.password_hash,
            created_at: Utc::now(),
        };

        table.by_username.insert(user.username.clone(), user.id);
        table.by_email.insert(user.email.clone(), user.id);
        table.by_id.insert(user.id, user.clone());

        Ok(user)
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, UserRepositoryError> {
        let table = self.table.read().await;
        Ok(table
            .by_username
            .get(username)
            .and_then(|id| table.by_id.get(id))
            .cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, UserRepositoryError> {
        let table = self.table.read().await;
        Ok(table
            .by_email
            .get(email)
            .and_then(|id| table.by_id.get(id))
            .cloned())
    }
}

// ============================================================================
// Notes
// ============================================================================

struct StoredNote {
    /// Insertion order, breaks ties between notes created in the same instant
    seq: u64,
    note: Note,
}

/// In-memory note store
#[derive(Default)]
pub struct MemoryNoteStore {
    notes: DashMap<Uuid, StoredNote>,
    next_seq: AtomicU64,
    /// When set, `create` refuses owners unknown to this store
    owners: Option<Arc<MemoryUserStore>>,
}

impl MemoryNoteStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store whose notes must belong to users of `owners`
    pub fn with_owners(owners: Arc<MemoryUserStore>) -> Self {
        Self {
            owners: Some(owners),
            ..Self::default()
        }
    }

    /// Total notes across all owners
    pub fn len(&self) -> usize {
        self.notes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }
}

#[async_trait]
impl NoteStore for MemoryNoteStore {
    async fn create(&self, note: CreateNote) -> Result<Note, NoteRepositoryError> {
        if let Some(owners) = &self.owners
            && !owners.contains(note.owner_id).await
        {
            return Err(NoteRepositoryError::OwnerNotFound);
        }

        let note = Note {
            id: Uuid::new_v4(),
            title: note.title,
            content: note.content,
            owner_id: note.owner_id,
            created_at: Utc::now(),
        };
        let seq = self.next_seq.fetch_add(1, Ordering::Relaxed);

        self.notes.insert(
            note.id,
            StoredNote {
                seq,
                note: note.clone(),
            },
        );

        Ok(note)
    }

    async fn list_by_owner(&self, owner_id: Uuid) -> Result<Vec<Note>, NoteRepositoryError> {
        let mut owned: Vec<(u64, Note)> = self
            .notes
            .iter()
            .filter(|entry| entry.note.owner_id == owner_id)
            .map(|entry| (entry.seq, entry.note.clone()))
            .collect();

        owned.sort_by(|(a_seq, a), (b_seq, b)| {
            b.created_at.cmp(&a.created_at).then(b_seq.cmp(a_seq))
        });

        Ok(owned.into_iter().map(|(_, note)| note).collect())
    }

    async fn update_owned(
        &self,
        id: Uuid,
        owner_id: Uuid,
        changes: UpdateNote,
    ) -> Result<Option<Note>, NoteRepositoryError> {
        if let Some(mut entry) = self.notes.get_mut(&id)
            && entry.note.owner_id == owner_id
        {
            entry.note.title = changes.title;
            entry.note.content = changes.content;
            return Ok(Some(entry.note.clone()));
        }

        Ok(None)
    }

    async fn delete_owned(
        &self,
        id: Uuid,
        owner_id: Uuid,
    ) -> Result<Option<Note>, NoteRepositoryError> {
        Ok(self
            .notes
            .remove_if(&id, |_, stored| stored.note.owner_id == owner_id)
            .map(|(_, stored)| stored.note))
    }
}
