//! Notes API endpoints
//!
//! All routes sit behind `require_auth` and act only on the caller's notes:
//! - POST /notes - Create a note
//! - GET /notes - List own notes, newest first
//! - PUT /notes/{id} - Replace title and content
//! - DELETE /notes/{id} - Delete a note
//!
//! Updating or deleting a note that does not exist and one that belongs to
//! someone else produce the same 404.

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
    middleware,
    routing::{post, put},
};
use serde::Serialize;
use uuid::Uuid;

use crate::core::app::AppState;
use crate::core::auth::middleware::{AuthUser, require_auth};
use crate::core::db::models::{CreateNote, Note, UpdateNote};
use crate::core::db::repositories::NoteStore;
use crate::core::error::ApiError;
use crate::core::notes::NoteRequest;
use crate::core::validation::validate_note;

/// Response carrying a single note
#[derive(Debug, Serialize)]
pub struct NoteResponse {
    pub message: String,
    pub note: Note,
}

/// Response for listing notes
#[derive(Debug, Serialize)]
pub struct NotesListResponse {
    pub notes: Vec<Note>,
    pub count: usize,
    pub message: String,
}

/// Response for a deleted note
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteNoteResponse {
    pub message: String,
    pub deleted_note: Note,
}

/// Create the notes API router, guarded by the auth middleware
pub fn notes_api_router(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/notes", post(create_note_handler).get(list_notes_handler))
        .route(
            "/notes/{id}",
            put(update_note_handler).delete(delete_note_handler),
        )
        .route_layer(middleware::from_fn_with_state(state, require_auth))
}

/// POST /notes
async fn create_note_handler(
    State(notes): State<Arc<dyn NoteStore>>,
    AuthUser(user): AuthUser,
    payload: Result<Json<NoteRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<NoteResponse>), ApiError> {
    let Json(request) = payload?;
    let input = validate_note(&request)?;

    let note = notes
        .create(CreateNote {
            owner_id: user.user_id,
            title: input.title,
            content: input.content,
        })
        .await?;

    tracing::info!("Note created: {} (owner {})", note.id, note.owner_id);

    Ok((
        StatusCode::CREATED,
        Json(NoteResponse {
            message: "Note added successfully".to_string(),
            note,
        }),
    ))
}

/// GET /notes
async fn list_notes_handler(
    State(notes): State<Arc<dyn NoteStore>>,
    AuthUser(user): AuthUser,
) -> Result<Json<NotesListResponse>, ApiError> {
    let notes = notes.list_by_owner(user.user_id).await?;

    tracing::debug!("Listed {} notes for user {}", notes.len(), user.user_id);

    let message = if notes.is_empty() {
        "No notes found"
    } else {
        "Notes retrieved successfully"
    };

    Ok(Json(NotesListResponse {
        count: notes.len(),
        notes,
        message: message.to_string(),
    }))
}

/// PUT /notes/{id}
async fn update_note_handler(
    State(notes): State<Arc<dyn NoteStore>>,
    AuthUser(user): AuthUser,
    Path(raw_id): Path<String>,
    payload: Result<Json<NoteRequest>, JsonRejection>,
) -> Result<Json<NoteResponse>, ApiError> {
    let Json(request) = payload?;
    let input = validate_note(&request)?;
    let note_id = parse_note_id(&raw_id)?;

    let note = notes
        .update_owned(
            note_id,
            user.user_id,
            UpdateNote {
                title: input.title,
                content: input.content,
            },
        )
        .await?
        .ok_or_else(|| not_found(raw_id, user.user_id))?;

    tracing::info!("Note updated: {} (owner {})", note.id, note.owner_id);

    Ok(Json(NoteResponse {
        message: "Note updated successfully".to_string(),
        note,
    }))
}

/// DELETE /notes/{id}
async fn delete_note_handler(
    State(notes): State<Arc<dyn NoteStore>>,
    AuthUser(user): AuthUser,
    Path(raw_id): Path<String>,
) -> Result<Json<DeleteNoteResponse>, ApiError> {
    let note_id = parse_note_id(&raw_id)?;

    let deleted_note = notes
        .delete_owned(note_id, user.user_id)
        .await?
        .ok_or_else(|| not_found(raw_id, user.user_id))?;

    tracing::info!("Note deleted: {} (owner {})", deleted_note.id, deleted_note.owner_id);

    Ok(Json(DeleteNoteResponse {
        message: "Note deleted successfully".to_string(),
        deleted_note,
    }))
}

/// An id that is not a UUID cannot name any note, so it is reported like any other miss
fn parse_note_id(raw_id: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(raw_id).map_err(|_| ApiError::NoteNotFound {
        note_id: raw_id.to_string(),
    })
}

fn not_found(note_id: String, user_id: Uuid) -> ApiError {
    tracing::info!("Note {} not found for user {}", note_id, user_id);
    ApiError::NoteNotFound { note_id }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn sample_note() -> Note {
        Note {
            id: Uuid::new_v4(),
            title: "T".to_string(),
            content: "C".to_string(),
            owner_id: Uuid::new_v4(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_parse_note_id() {
        let id = Uuid::new_v4();
        assert_eq!(parse_note_id(&id.to_string()).unwrap(), id);

        match parse_note_id("12345") {
            Err(ApiError::NoteNotFound { note_id }) => assert_eq!(note_id, "12345"),
            other => panic!("expected NoteNotFound, got {:?}", other),
        }
    }

    #[test]
    fn test_delete_response_uses_deleted_note_key() {
        let response = DeleteNoteResponse {
            message: "Note deleted successfully".to_string(),
            deleted_note: sample_note(),
        };

        let value = serde_json::to_value(&response).unwrap();
        assert!(value.get("deletedNote").is_some());
        assert_eq!(value["deletedNote"]["title"], "T");
    }

    #[test]
    fn test_list_response_shape() {
        let response = NotesListResponse {
            notes: vec![sample_note()],
            count: 1,
            message: "Notes retrieved successfully".to_string(),
        };

        let value = serde_json::to_value(&response).unwrap();
        assert_eq!(value["count"], 1);
        assert_eq!(value["notes"].as_array().unwrap().len(), 1);
        assert!(value["notes"][0].get("ownerId").is_some());
    }
}
