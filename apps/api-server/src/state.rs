//! Application state - shared across all handlers.

use std::sync::Arc;

use inkpost_core::PostService;
use inkpost_core::ports::{PostRepository, TokenService};
use inkpost_infra::database::{DatabaseConfig, InMemoryPostRepository};
use inkpost_infra::JwtTokenService;

#[cfg(feature = "postgres")]
use inkpost_infra::database::{DatabaseConnections, PostgresPostRepository};

use crate::config::AppConfig;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub posts: PostService,
    pub tokens: Arc<dyn TokenService>,
}

impl AppState {
    /// Build the application state with appropriate implementations.
    pub async fn new(config: &AppConfig) -> Self {
        let repo = post_repository(config.database.as_ref()).await;
        let tokens: Arc<dyn TokenService> = Arc::new(JwtTokenService::new(config.jwt.clone()));

        tracing::info!("Application state initialized");

        Self::from_parts(repo, tokens)
    }

    pub fn from_parts(repo: Arc<dyn PostRepository>, tokens: Arc<dyn TokenService>) -> Self {
        Self {
            posts: PostService::new(repo),
            tokens,
        }
    }
}

#[cfg(feature = "postgres")]
async fn post_repository(db_config: Option<&DatabaseConfig>) -> Arc<dyn PostRepository> {
    let Some(config) = db_config else {
        tracing::warn!("DATABASE_URL not set. Running without database (in-memory mode).");
        return Arc::new(InMemoryPostRepository::new());
    };

    match DatabaseConnections::init(config).await {
        Ok(connections) => Arc::new(PostgresPostRepository::new(connections.main)),
        Err(e) => {
            tracing::error!(
                "Failed to connect to database: {}. Using in-memory fallback.",
                e
            );
            Arc::new(InMemoryPostRepository::new())
        }
    }
}

#[cfg(not(feature = "postgres"))]
async fn post_repository(_db_config: Option<&DatabaseConfig>) -> Arc<dyn PostRepository> {
    tracing::info!("Running without postgres feature - using in-memory repository");
    Arc::new(InMemoryPostRepository::new())
}
