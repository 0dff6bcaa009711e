//! Repository for the `scopes` table.

use cohort_core::scope::Scope;
use sqlx::PgPool;

use crate::models::scope::ScopeRow;

/// Column list for `scopes` queries.
const COLUMNS: &str = "id, protocol_id, participants, capacity, created_at, updated_at";

/// Provides create, read and append operations for scopes.
pub struct ScopeRepo;

impl ScopeRepo {
    /// Insert a new scope with its initial participant list.
    ///
    /// A duplicate id surfaces as a unique violation (`23505`) on
    /// `scopes_pkey`.
    pub async fn insert(pool: &PgPool, scope: &Scope) -> Result<ScopeRow, sqlx::Error> {
        let capacity = i32::try_from(scope.capacity)
            .map_err(|e| sqlx::Error::Encode(Box::new(e)))?;
        let query = format!(
            "INSERT INTO scopes (id, protocol_id, participants, capacity, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $5) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ScopeRow>(&query)
            .bind(&scope.id)
            .bind(&scope.protocol_id)
            .bind(&scope.participants)
            .bind(capacity)
            .bind(scope.created_at)
            .fetch_one(pool)
            .await
    }

    /// Find a scope by id.
    pub async fn find_by_id(pool: &PgPool, id: &str) -> Result<Option<ScopeRow>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM scopes WHERE id = $1");
        sqlx::query_as::<_, ScopeRow>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Append a worker in a single conditional statement.
    ///
    /// The row lock taken by `UPDATE` serializes concurrent appends to the
    /// same scope; under READ COMMITTED the `WHERE` clause is re-evaluated
    /// against the latest committed row, so a waiting appender sees the
    /// previous append before deciding.
    ///
    /// Returns `None` when nothing was written: the scope is missing, the
    /// worker is already a participant, or the scope is full.
    pub async fn append_participant(
        pool: &PgPool,
        id: &str,
        worker_id: &str,
    ) -> Result<Option<Vec<String>>, sqlx::Error> {
        let row: Option<(Vec<String>,)> = sqlx::query_as(
            "UPDATE scopes \
             SET participants = array_append(participants, $2), updated_at = NOW() \
             WHERE id = $1 \
               AND NOT ($2 = ANY(participants)) \
               AND cardinality(participants) < capacity \
             RETURNING participants",
        )
        .bind(id)
        .bind(worker_id)
        .fetch_optional(pool)
        .await?;
        Ok(row.map(|(participants,)| participants))
    }

    /// Count scopes opened for a protocol.
    pub async fn count_by_protocol(pool: &PgPool, protocol_id: &str) -> Result<i64, sqlx::Error> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM scopes WHERE protocol_id = $1")
            .bind(protocol_id)
            .fetch_one(pool)
            .await?;
        Ok(count)
    }
}
