//! Rows of the `scopes` table.

use cohort_core::scope::Scope;
use cohort_core::types::Timestamp;
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `scopes` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ScopeRow {
    pub id: String,
    pub protocol_id: String,
    pub participants: Vec<String>,
    pub capacity: i32,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl From<ScopeRow> for Scope {
    fn from(row: ScopeRow) -> Self {
        Scope {
            id: row.id,
            protocol_id: row.protocol_id,
            participants: row.participants,
            // The column carries a `capacity >= 0` check constraint.
            capacity: usize::try_from(row.capacity).unwrap_or_default(),
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}
