//! Notes owned by authenticated users

pub mod api;

use serde::Deserialize;

pub use api::notes_api_router;

/// Create/update request body
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NoteRequest {
    pub title: Option<String>,
    pub content: Option<String>,
}
