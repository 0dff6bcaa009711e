//! Row models.
//!
//! Each submodule contains a `FromRow` struct matching the database row and
//! the conversion into the matching `cohort-core` domain type.

pub mod protocol;
pub mod scope;
