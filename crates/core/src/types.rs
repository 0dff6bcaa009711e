/// Catalog key of a protocol definition (e.g. `millionaire-problem`).
pub type ProtocolId = String;

/// Scope identifiers are UUIDv7 strings generated at creation.
pub type ScopeId = String;

/// Caller-supplied worker identity.
pub type WorkerId = String;

/// Identifier of a single program inside a role-bundle.
pub type ProgramId = String;

/// One party's ordered list of programs within a protocol.
pub type Plan = Vec<ProgramId>;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;

/// Generate a fresh, collision-resistant scope identifier.
pub fn new_scope_id() -> ScopeId {
    uuid::Uuid::now_v7().to_string()
}
