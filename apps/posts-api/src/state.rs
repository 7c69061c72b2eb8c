//! Application state - shared across all handlers.

use std::path::Path;
use std::sync::Arc;

use posts_core::PostService;
use posts_core::ports::PostRepository;
use posts_infra::{DatabaseConfig, InMemoryPostRepository, SeedOutcome, seed_from_file};

#[cfg(feature = "postgres")]
use posts_infra::PostgresPostRepository;
#[cfg(feature = "postgres")]
use posts_infra::database::{connect, ensure_schema};

/// Which store backs the running service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreKind {
    Postgres,
    InMemory,
}

impl StoreKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            StoreKind::Postgres => "postgres",
            StoreKind::InMemory => "in-memory",
        }
    }
}

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub posts: PostService,
    pub store: StoreKind,
}

impl AppState {
    /// Build the application state with appropriate implementations.
    pub async fn new(db_config: Option<&DatabaseConfig>, seed_file: Option<&Path>) -> Self {
        let (repo, store) = Self::open_store(db_config).await;

        if let Some(path) = seed_file {
            match seed_from_file(repo.as_ref(), path).await {
                Ok(SeedOutcome::Loaded(count)) => tracing::info!(count, "Seed data loaded"),
                Ok(SeedOutcome::Skipped { .. }) => {}
                Err(e) => tracing::error!("Failed to seed posts: {}", e),
            }
        }

        tracing::info!(store = store.as_str(), "Application state initialized");
        Self::with_repository(repo, store)
    }

    pub fn with_repository(repo: Arc<dyn PostRepository>, store: StoreKind) -> Self {
        Self {
            posts: PostService::new(repo),
            store,
        }
    }

    /// State over a fresh in-memory store.
    pub fn in_memory() -> Self {
        Self::with_repository(Arc::new(InMemoryPostRepository::new()), StoreKind::InMemory)
    }

    #[cfg(feature = "postgres")]
    async fn open_store(
        db_config: Option<&DatabaseConfig>,
    ) -> (Arc<dyn PostRepository>, StoreKind) {
        let Some(config) = db_config else {
            tracing::warn!("DATABASE_URL not set. Running without database (in-memory mode).");
            return (Arc::new(InMemoryPostRepository::new()), StoreKind::InMemory);
        };

        let conn = match connect(config).await {
            Ok(conn) => conn,
            Err(e) => {
                tracing::error!("Failed to connect to database: {}. Using in-memory fallback.", e);
                return (Arc::new(InMemoryPostRepository::new()), StoreKind::InMemory);
            }
        };

        if let Err(e) = ensure_schema(&conn).await {
            tracing::error!("Failed to prepare posts table: {}. Using in-memory fallback.", e);
            return (Arc::new(InMemoryPostRepository::new()), StoreKind::InMemory);
        }

        (Arc::new(PostgresPostRepository::new(conn)), StoreKind::Postgres)
    }

    #[cfg(not(feature = "postgres"))]
    async fn open_store(
        _db_config: Option<&DatabaseConfig>,
    ) -> (Arc<dyn PostRepository>, StoreKind) {
        tracing::info!("Running without postgres feature - using in-memory repository");
        (Arc::new(InMemoryPostRepository::new()), StoreKind::InMemory)
    }
}
