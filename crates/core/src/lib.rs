//! Domain layer for the cohort rendezvous service.
//!
//! Workers join multi-party protocols by id and are grouped into scopes.
//! This crate owns the types, the repository traits and the
//! [`ScopeCoordinator`](coordinator::ScopeCoordinator); persistence and
//! transport live in `cohort-db` and `cohort-api`.

pub mod catalog;
pub mod coordinator;
pub mod diagnostics;
pub mod error;
pub mod protocol;
pub mod scope;
pub mod store;
pub mod types;
