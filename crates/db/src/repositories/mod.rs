//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async methods that
//! accept `&PgPool` as the first argument.

pub mod protocol_repo;
pub mod scope_repo;

pub use protocol_repo::ProtocolRepo;
pub use scope_repo::ScopeRepo;
