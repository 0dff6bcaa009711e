//! `cohort-core` repository traits backed by PostgreSQL.

use async_trait::async_trait;
use cohort_core::catalog::ProtocolCatalog;
use cohort_core::error::StoreError;
use cohort_core::protocol::Protocol;
use cohort_core::scope::Scope;
use cohort_core::store::ScopeStore;
use cohort_core::types::WorkerId;

use crate::repositories::{ProtocolRepo, ScopeRepo};
use crate::DbPool;

/// Map a sqlx error onto the store error vocabulary.
///
/// - `RowNotFound` is left to callers, which know the entity; here it
///   becomes a backend error.
/// - Unique violations (`23505`) become [`StoreError::Conflict`].
pub fn classify_sqlx_error(err: sqlx::Error) -> StoreError {
    if let sqlx::Error::Database(db_err) = &err {
        if db_err.code().as_deref() == Some("23505") {
            let constraint = db_err.constraint().unwrap_or("unknown");
            return StoreError::Conflict(format!(
                "Duplicate value violates unique constraint: {constraint}"
            ));
        }
    }
    tracing::error!(error = %err, "Database error");
    StoreError::Backend(err.to_string())
}

/// Protocol catalog reading the `protocols` table.
#[derive(Clone)]
pub struct PgProtocolCatalog {
    pool: DbPool,
}

impl PgProtocolCatalog {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ProtocolCatalog for PgProtocolCatalog {
    async fn lookup(&self, protocol_id: &str) -> Result<Protocol, StoreError> {
        ProtocolRepo::find_by_id(&self.pool, protocol_id)
            .await
            .map_err(classify_sqlx_error)?
            .map(Protocol::from)
            .ok_or_else(|| StoreError::protocol_not_found(protocol_id))
    }
}

/// Scope store over the `scopes` table.
#[derive(Clone)]
pub struct PgScopeStore {
    pool: DbPool,
}

impl PgScopeStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ScopeStore for PgScopeStore {
    async fn create(&self, scope: &Scope) -> Result<(), StoreError> {
        ScopeRepo::insert(&self.pool, scope)
            .await
            .map_err(classify_sqlx_error)?;
        Ok(())
    }

    async fn get(&self, scope_id: &str) -> Result<Scope, StoreError> {
        ScopeRepo::find_by_id(&self.pool, scope_id)
            .await
            .map_err(classify_sqlx_error)?
            .map(Scope::from)
            .ok_or_else(|| StoreError::scope_not_found(scope_id))
    }

    async fn append_participant(
        &self,
        scope_id: &str,
        worker_id: &str,
    ) -> Result<Vec<WorkerId>, StoreError> {
        if let Some(participants) = ScopeRepo::append_participant(&self.pool, scope_id, worker_id)
            .await
            .map_err(classify_sqlx_error)?
        {
            return Ok(participants);
        }

        // Nothing was written. Participants only ever grow, so the state
        // read now still explains why.
        let scope = self.get(scope_id).await?;
        if scope.position_of(worker_id).is_some() {
            Ok(scope.participants)
        } else if scope.is_full() {
            Err(StoreError::CohortFull {
                scope_id: scope.id,
                capacity: scope.capacity,
            })
        } else {
            Err(StoreError::Backend(format!(
                "append to scope {scope_id} was not applied"
            )))
        }
    }
}
