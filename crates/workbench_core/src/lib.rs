//! Core domain logic for the workbench project tracker.
//! This crate is the single source of truth for persistence invariants.

pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use db::{open_db, open_db_in_memory, Database, DbError, DbResult};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::project::{Category, Material, NewProject, Project, ProjectId, Step};
pub use repo::project_repo::{
    run_in_transaction, ProjectRepository, RepoError, RepoResult, SqliteProjectRepository,
};
pub use service::project_service::{ProjectService, ProjectServiceError};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
