use std::sync::Arc;

use notekeeper::core::auth::{JwtConfig, JwtService, PasswordHasher};
use notekeeper::core::config::Config;
use notekeeper::core::db::{
    DbConfig, NoteRepository, UserRepository, create_pool_with_migrations, health_check,
};
use notekeeper::core::{AppState, build_router, shutdown_signal};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load .env file (if exists)
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("notekeeper=debug,tower_http=info")),
        )
        .init();

    let config = Config::from_env()?;

    // Log config status (without revealing secrets)
    tracing::info!(
        "Config loaded: database={}, jwt_secret={}, bcrypt_cost={}",
        config.has_database(),
        config.has_jwt_secret(),
        config.bcrypt_cost
    );

    if !config.has_jwt_secret() {
        tracing::warn!("JWT_SECRET is not set, using the development signing secret");
    }

    let jwt_service = JwtService::new(
        JwtConfig::new(config.jwt_secret_or_dev_default()).issuer(config.jwt_issuer.clone()),
    );
    let hasher = PasswordHasher::new(config.bcrypt_cost);

    let (state, pool) = match &config.database_url {
        Some(url) => {
            let pool = create_pool_with_migrations(
                &DbConfig::new(url).max_connections(config.db_max_connections),
            )
            .await?;
            health_check(&pool).await?;
            tracing::info!("Connected to PostgreSQL");

            let state = AppState::new(
                Arc::new(UserRepository::new(pool.clone())),
                Arc::new(NoteRepository::new(pool.clone())),
                jwt_service,
                hasher,
            );
            (state, Some(pool))
        }
        None => {
            tracing::warn!("DATABASE_URL is not set, data is kept in memory only");
            (AppState::in_memory(jwt_service, hasher), None)
        }
    };

    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(config.listen_addr()).await?;
    tracing::info!("listening on http://{}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    if let Some(pool) = pool {
        pool.close().await;
        tracing::info!("Database connections closed");
    }

    tracing::info!("Server stopped");
    Ok(())
}
