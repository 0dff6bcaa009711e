use crate::types::{ProtocolId, ScopeId};

/// Message returned when a join request carries no protocol id.
pub const MISSING_PROTOCOL_ID: &str = "Please supply a protocolId";

/// Message returned when a join request carries no worker id.
pub const MISSING_WORKER_ID: &str = "Please supply a workerId";

/// Errors raised by the scope coordinator.
///
/// Every variant is a synchronous rejection: no scope is created or
/// mutated when one of these is returned.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("{0}")]
    InvalidRequest(String),

    #[error("Cannot find protocol {0}")]
    UnknownProtocol(ProtocolId),

    #[error("Cannot find scope {0}")]
    UnknownScope(ScopeId),

    #[error("Scope {scope_id} belongs to protocol {actual}, not {requested}")]
    ProtocolMismatch {
        scope_id: ScopeId,
        requested: ProtocolId,
        actual: ProtocolId,
    },

    #[error("Protocol {protocol_id} admits at most {capacity} participants")]
    CohortFull {
        protocol_id: ProtocolId,
        capacity: usize,
    },

    #[error("Storage failure: {0}")]
    Storage(#[source] StoreError),
}

/// Errors raised by [`ProtocolCatalog`](crate::catalog::ProtocolCatalog)
/// and [`ScopeStore`](crate::store::ScopeStore) implementations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: String },

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Scope {scope_id} is full ({capacity} participants)")]
    CohortFull { scope_id: ScopeId, capacity: usize },

    #[error("Backend error: {0}")]
    Backend(String),
}

impl StoreError {
    pub fn scope_not_found(id: &str) -> Self {
        StoreError::NotFound {
            entity: "Scope",
            id: id.to_string(),
        }
    }

    pub fn protocol_not_found(id: &str) -> Self {
        StoreError::NotFound {
            entity: "Protocol",
            id: id.to_string(),
        }
    }
}
