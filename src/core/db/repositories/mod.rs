//! Database repositories
//!
//! Each store is a trait with a PostgreSQL implementation and an in-memory
//! one. Handlers only ever see `Arc<dyn UserStore>` / `Arc<dyn NoteStore>`.

pub mod memory;
pub mod note;
pub mod user;

pub use memory::{MemoryNoteStore, MemoryUserStore};
pub use note::{NoteRepository, NoteRepositoryError, NoteStore};
pub use user::{UserRepository, UserRepositoryError, UserStore};
