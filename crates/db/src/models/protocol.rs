//! Rows of the `protocols` table.

use cohort_core::protocol::Protocol;
use cohort_core::types::{Plan, Timestamp};
use serde::Serialize;
use sqlx::types::Json;
use sqlx::FromRow;

/// A row from the `protocols` table. `plans` is stored as a JSONB array of
/// string arrays.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ProtocolRow {
    pub id: String,
    pub plans: Json<Vec<Plan>>,
    pub created_at: Timestamp,
}

impl From<ProtocolRow> for Protocol {
    fn from(row: ProtocolRow) -> Self {
        Protocol::new(row.id, row.plans.0)
    }
}
