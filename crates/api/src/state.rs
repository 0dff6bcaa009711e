use std::sync::Arc;

use cohort_core::catalog::MemoryProtocolCatalog;
use cohort_core::coordinator::ScopeCoordinator;
use cohort_core::diagnostics::TracingSink;
use cohort_core::store::MemoryScopeStore;
use cohort_db::{DbPool, PgProtocolCatalog, PgScopeStore};

use crate::config::ServerConfig;

/// Where protocols and scopes are persisted.
#[derive(Clone)]
pub enum StorageBackend {
    Postgres(DbPool),
    Memory,
}

impl StorageBackend {
    pub fn name(&self) -> &'static str {
        match self {
            StorageBackend::Postgres(_) => "postgres",
            StorageBackend::Memory => "memory",
        }
    }

    pub async fn is_healthy(&self) -> bool {
        match self {
            StorageBackend::Postgres(pool) => cohort_db::health_check(pool).await.is_ok(),
            StorageBackend::Memory => true,
        }
    }
}

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Cheaply cloneable; inner data is behind `Arc` or is already `Clone`.
#[derive(Clone)]
pub struct AppState {
    /// Create-or-join logic over the configured catalog and scope store.
    pub coordinator: Arc<ScopeCoordinator>,
    /// Backend the coordinator's collaborators were built on.
    pub storage: StorageBackend,
    pub config: Arc<ServerConfig>,
}

impl AppState {
    /// State over in-process stores seeded with `catalog`.
    pub fn in_memory(catalog: MemoryProtocolCatalog, config: ServerConfig) -> Self {
        let coordinator = ScopeCoordinator::new(
            Arc::new(catalog),
            Arc::new(MemoryScopeStore::new()),
            Arc::new(TracingSink),
        );
        Self {
            coordinator: Arc::new(coordinator),
            storage: StorageBackend::Memory,
            config: Arc::new(config),
        }
    }

    /// State over the Postgres catalog and scope store.
    pub fn postgres(pool: DbPool, config: ServerConfig) -> Self {
        let coordinator = ScopeCoordinator::new(
            Arc::new(PgProtocolCatalog::new(pool.clone())),
            Arc::new(PgScopeStore::new(pool.clone())),
            Arc::new(TracingSink),
        );
        Self {
            coordinator: Arc::new(coordinator),
            storage: StorageBackend::Postgres(pool),
            config: Arc::new(config),
        }
    }
}
