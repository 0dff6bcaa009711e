//! Repository for the `protocols` table.
//!
//! The catalog is authored outside this service; `insert` exists for
//! seeding and tests.

use cohort_core::protocol::Protocol;
use sqlx::types::Json;
use sqlx::PgPool;

use crate::models::protocol::ProtocolRow;

/// Column list for `protocols` queries.
const COLUMNS: &str = "id, plans, created_at";

/// Provides read access (and seeding) for protocol definitions.
pub struct ProtocolRepo;

impl ProtocolRepo {
    /// Find a protocol by its catalog id.
    pub async fn find_by_id(pool: &PgPool, id: &str) -> Result<Option<ProtocolRow>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM protocols WHERE id = $1");
        sqlx::query_as::<_, ProtocolRow>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Insert a protocol definition, returning the created row.
    pub async fn insert(pool: &PgPool, protocol: &Protocol) -> Result<ProtocolRow, sqlx::Error> {
        let query = format!(
            "INSERT INTO protocols (id, plans) VALUES ($1, $2) RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ProtocolRow>(&query)
            .bind(&protocol.id)
            .bind(Json(&protocol.plans))
            .fetch_one(pool)
            .await
    }
}
