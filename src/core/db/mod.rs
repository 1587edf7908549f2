//! Database module
//!
//! Connection pool, entity models and the user/note stores.

pub mod models;
pub mod pool;
pub mod repositories;

pub use models::*;
pub use pool::{DbConfig, DbError, create_pool, create_pool_with_migrations, health_check};
pub use repositories::{
    MemoryNoteStore, MemoryUserStore, NoteRepository, NoteRepositoryError, NoteStore,
    UserRepository, UserRepositoryError, UserStore,
};

pub use sqlx::PgPool;
