//! Application state - shared across all handlers.

use std::sync::Arc;

use croft_core::PostService;
use croft_core::ports::PostRepository;
use croft_infra::InMemoryPostRepository;

use crate::config::AppConfig;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub posts: Arc<PostService>,
}

impl AppState {
    /// Build the application state with the appropriate store.
    pub async fn new(config: &AppConfig) -> Self {
        #[cfg(feature = "postgres")]
        let repo: Arc<dyn PostRepository> = {
            if let Some(db_config) = &config.database {
                match croft_infra::database::connect(db_config).await {
                    Ok(conn) => Arc::new(croft_infra::PostgresPostRepository::new(conn)),
                    Err(e) => {
                        tracing::error!(
                            "Failed to connect to database: {}. Using in-memory fallback.",
                            e
                        );
                        Arc::new(InMemoryPostRepository::new())
                    }
                }
            } else {
                tracing::warn!("DATABASE_URL not set. Running with the in-memory store.");
                Arc::new(InMemoryPostRepository::new())
            }
        };

        #[cfg(not(feature = "postgres"))]
        let repo: Arc<dyn PostRepository> = {
            tracing::info!("Running without postgres feature - using the in-memory store");
            Arc::new(InMemoryPostRepository::new())
        };

        let posts = PostService::new(repo).with_legacy_not_found(config.legacy_not_found);
        if config.legacy_not_found {
            tracing::info!("Legacy error mode: authorization failures reported as not-found");
        }

        tracing::info!("Application state initialized");

        Self {
            posts: Arc::new(posts),
        }
    }
}
