//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define use-case oriented data access contracts.
//! - Isolate SQLite query and transaction details from service
//!   orchestration.
//!
//! # Invariants
//! - Every repository operation runs on its own connection inside
//!   exactly one transaction, committed or rolled back as a whole.
//! - Repository APIs report expected absence as `Ok(None)`, never as
//!   an error.

pub mod project_repo;
