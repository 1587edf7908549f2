//! Application state and router
//!
//! `AppState` is built once in `main` and cloned into every request. Handlers
//! pull out only the piece they need through `FromRef`.

use std::sync::Arc;

use axum::{Json, Router, extract::FromRef, routing::get};
use chrono::{DateTime, Utc};
use serde::Serialize;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::core::auth::{AuthService, JwtService, PasswordHasher, auth_api_router};
use crate::core::db::repositories::{MemoryNoteStore, MemoryUserStore, NoteStore, UserStore};
use crate::core::notes::notes_api_router;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub auth_service: AuthService,
    pub jwt_service: JwtService,
    pub notes: Arc<dyn NoteStore>,
}

impl AppState {
    pub fn new(
        users: Arc<dyn UserStore>,
        notes: Arc<dyn NoteStore>,
        jwt_service: JwtService,
        hasher: PasswordHasher,
    ) -> Self {
        Self {
            auth_service: AuthService::new(users, hasher, jwt_service.clone()),
            jwt_service,
            notes,
        }
    }

    /// State backed by fresh in-memory stores
    pub fn in_memory(jwt_service: JwtService, hasher: PasswordHasher) -> Self {
        let users = Arc::new(MemoryUserStore::new());
        let notes = Arc::new(MemoryNoteStore::with_owners(users.clone()));
        Self::new(users, notes, jwt_service, hasher)
    }
}

impl FromRef<AppState> for AuthService {
    fn from_ref(state: &AppState) -> Self {
        state.auth_service.clone()
    }
}

impl FromRef<AppState> for JwtService {
    fn from_ref(state: &AppState) -> Self {
        state.jwt_service.clone()
    }
}

impl FromRef<AppState> for Arc<dyn NoteStore> {
    fn from_ref(state: &AppState) -> Self {
        state.notes.clone()
    }
}

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub timestamp: DateTime<Utc>,
}

/// GET /health
async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        timestamp: Utc::now(),
    })
}

/// Build the full application router
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .merge(auth_api_router())
        .merge(notes_api_router(state.clone()))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}

/// Resolves on Ctrl+C, or SIGTERM on unix
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{SignalKind, signal};

        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => tracing::info!("Received Ctrl+C, shutting down"),
        _ = terminate => tracing::info!("Received SIGTERM, shutting down"),
    }
}
