//! Project use-case service.
//!
//! # Responsibility
//! - Expose the three project operations (create, list, fetch-by-id)
//!   to presentation callers.
//! - Convert expected absence into a domain-level failure for the
//!   by-id fetch.
//!
//! # Invariants
//! - This is the sole place `Ok(None)` from the repository becomes
//!   `ProjectNotFound`; the repository itself never errors on absence.
//! - No validation is added here; callers supply already-validated,
//!   typed values.

use crate::model::project::{NewProject, Project, ProjectId};
use crate::repo::project_repo::{ProjectRepository, RepoError};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Service error for project use-cases.
#[derive(Debug)]
pub enum ProjectServiceError {
    /// Requested project does not exist. Expected flow-control outcome
    /// for callers, not a defect.
    ProjectNotFound(ProjectId),
    /// Persistence-layer failure, already rolled back.
    Repo(RepoError),
}

impl Display for ProjectServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ProjectNotFound(project_id) => {
                write!(f, "project with ID={project_id} does not exist")
            }
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ProjectServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::ProjectNotFound(_) => None,
            Self::Repo(err) => Some(err),
        }
    }
}

impl From<RepoError> for ProjectServiceError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

/// Project service facade over repository implementations.
pub struct ProjectService<R: ProjectRepository> {
    repo: R,
}

impl<R: ProjectRepository> ProjectService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Creates one project and returns it with store-assigned identity.
    pub fn add_project(&self, input: &NewProject) -> Result<Project, ProjectServiceError> {
        Ok(self.repo.insert_project(input)?)
    }

    /// Lists all projects ordered by name, summary fields only.
    pub fn fetch_all_projects(&self) -> Result<Vec<Project>, ProjectServiceError> {
        Ok(self.repo.fetch_all_projects()?)
    }

    /// Fetches one fully populated project aggregate by identity.
    ///
    /// # Errors
    /// - `ProjectNotFound` when no project has the given id.
    pub fn fetch_project_by_id(
        &self,
        project_id: ProjectId,
    ) -> Result<Project, ProjectServiceError> {
        self.repo
            .fetch_project_by_id(project_id)?
            .ok_or(ProjectServiceError::ProjectNotFound(project_id))
    }
}
