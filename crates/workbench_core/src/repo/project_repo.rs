//! Project repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Persist new projects and read project aggregates from the five
//!   relational tables.
//! - Keep SQL, parameter binding, and row mapping inside the
//!   persistence boundary.
//!
//! # Invariants
//! - Each operation acquires one fresh connection and one transaction,
//!   released on every exit path.
//! - The by-id read is all-or-nothing: a partially assembled aggregate
//!   is never returned.
//! - Identity retrieval after insert is connection-scoped
//!   (`last_insert_rowid` on the inserting connection), so concurrent
//!   inserts on other connections cannot race it.

use crate::db::{Database, DbError};
use crate::model::project::{Category, Material, NewProject, Project, ProjectId, Step};
use bigdecimal::BigDecimal;
use rusqlite::{params, Connection, Row, Transaction, TransactionBehavior};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

const PROJECT_SELECT_SQL: &str = "SELECT
    project_id,
    project_name,
    estimated_hours,
    actual_hours,
    difficulty,
    notes
FROM project";

pub type RepoResult<T> = Result<T, RepoError>;

/// Persistence error for project repository operations.
///
/// Any failure inside a transaction is preceded by a rollback of that
/// transaction before the error reaches the caller.
#[derive(Debug)]
pub enum RepoError {
    /// Connection acquisition or SQLite transport/bind/execute failure.
    Db(DbError),
    /// Persisted data cannot be converted to a valid read model.
    InvalidData(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::InvalidData(message) => write!(f, "invalid persisted project data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::InvalidData(_) => None,
        }
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Runs `work` inside a single transaction scope.
///
/// Begins a transaction with the requested behavior, commits when
/// `work` returns `Ok`, and rolls back (on drop of the transaction
/// guard) before propagating any `Err`. Every repository operation
/// traverses this scope exactly once; nested reads share the one outer
/// transaction instead of opening their own.
pub fn run_in_transaction<T>(
    conn: &mut Connection,
    behavior: TransactionBehavior,
    work: impl FnOnce(&Transaction<'_>) -> RepoResult<T>,
) -> RepoResult<T> {
    let tx = conn.transaction_with_behavior(behavior)?;
    let value = work(&tx)?;
    tx.commit()?;
    Ok(value)
}

/// Repository interface for project persistence and aggregate reads.
pub trait ProjectRepository {
    /// Inserts one project and returns it with store-assigned identity.
    fn insert_project(&self, input: &NewProject) -> RepoResult<Project>;
    /// Lists all projects ordered by name, summary fields only.
    fn fetch_all_projects(&self) -> RepoResult<Vec<Project>>;
    /// Fetches one fully populated aggregate, or `None` when absent.
    fn fetch_project_by_id(&self, project_id: ProjectId) -> RepoResult<Option<Project>>;
}

/// SQLite-backed project repository.
///
/// Holds only the connection provider; every operation acquires and
/// releases its own connection.
pub struct SqliteProjectRepository {
    db: Database,
}

impl SqliteProjectRepository {
    /// Creates a repository over the given connection provider.
    pub fn new(db: Database) -> Self {
        Self { db }
    }
}

impl ProjectRepository for SqliteProjectRepository {
    fn insert_project(&self, input: &NewProject) -> RepoResult<Project> {
        let mut conn = self.db.acquire()?;
        run_in_transaction(&mut conn, TransactionBehavior::Immediate, |tx| {
            tx.execute(
                "INSERT INTO project (
                    project_name,
                    estimated_hours,
                    actual_hours,
                    difficulty,
                    notes
                ) VALUES (?1, ?2, ?3, ?4, ?5);",
                params![
                    input.name.as_str(),
                    input.estimated_hours.as_ref().map(decimal_to_db),
                    input.actual_hours.as_ref().map(decimal_to_db),
                    input.difficulty,
                    input.notes.as_deref(),
                ],
            )?;

            // Connection-scoped: reflects the INSERT above, not a
            // global max over rows other connections may be adding.
            let project_id = tx.last_insert_rowid();

            Ok(Project::from_new(
                project_id,
                NewProject {
                    name: input.name.clone(),
                    estimated_hours: normalize_hours(input.estimated_hours.as_ref()),
                    actual_hours: normalize_hours(input.actual_hours.as_ref()),
                    difficulty: input.difficulty,
                    notes: input.notes.clone(),
                },
            ))
        })
    }

    fn fetch_all_projects(&self) -> RepoResult<Vec<Project>> {
        let mut conn = self.db.acquire()?;
        run_in_transaction(&mut conn, TransactionBehavior::Deferred, |tx| {
            let mut stmt = tx.prepare(&format!("{PROJECT_SELECT_SQL} ORDER BY project_name;"))?;
            let mut rows = stmt.query([])?;
            let mut projects = Vec::new();
            while let Some(row) = rows.next()? {
                projects.push(project_from_row(row)?);
            }
            Ok(projects)
        })
    }

    fn fetch_project_by_id(&self, project_id: ProjectId) -> RepoResult<Option<Project>> {
        let mut conn = self.db.acquire()?;
        run_in_transaction(&mut conn, TransactionBehavior::Deferred, |tx| {
            let mut project = {
                let mut stmt =
                    tx.prepare(&format!("{PROJECT_SELECT_SQL} WHERE project_id = ?1;"))?;
                let mut rows = stmt.query([project_id])?;
                match rows.next()? {
                    Some(row) => project_from_row(row)?,
                    None => return Ok(None),
                }
            };

            // All three child reads share the outer transaction; any
            // failure rolls the whole read back.
            project.materials = fetch_materials_for_project(tx, project_id)?;
            project.steps = fetch_steps_for_project(tx, project_id)?;
            project.categories = fetch_categories_for_project(tx, project_id)?;

            Ok(Some(project))
        })
    }
}

fn fetch_materials_for_project(
    conn: &Connection,
    project_id: ProjectId,
) -> RepoResult<Vec<Material>> {
    let mut stmt = conn.prepare(
        "SELECT
            material_id,
            project_id,
            material_name,
            num_required,
            cost
         FROM material
         WHERE project_id = ?1;",
    )?;
    let mut rows = stmt.query([project_id])?;
    let mut materials = Vec::new();
    while let Some(row) = rows.next()? {
        materials.push(material_from_row(row)?);
    }
    Ok(materials)
}

fn fetch_steps_for_project(conn: &Connection, project_id: ProjectId) -> RepoResult<Vec<Step>> {
    let mut stmt = conn.prepare(
        "SELECT
            step_id,
            project_id,
            step_text,
            step_order
         FROM step
         WHERE project_id = ?1
         ORDER BY step_order;",
    )?;
    let mut rows = stmt.query([project_id])?;
    let mut steps = Vec::new();
    while let Some(row) = rows.next()? {
        steps.push(step_from_row(row)?);
    }
    Ok(steps)
}

fn fetch_categories_for_project(
    conn: &Connection,
    project_id: ProjectId,
) -> RepoResult<Vec<Category>> {
    let mut stmt = conn.prepare(
        "SELECT c.category_id, c.category_name
         FROM category c
         JOIN project_category pc ON pc.category_id = c.category_id
         WHERE pc.project_id = ?1;",
    )?;
    let mut rows = stmt.query([project_id])?;
    let mut categories = Vec::new();
    while let Some(row) = rows.next()? {
        categories.push(category_from_row(row)?);
    }
    Ok(categories)
}

fn project_from_row(row: &Row<'_>) -> RepoResult<Project> {
    Ok(Project {
        project_id: row.get("project_id")?,
        name: row.get("project_name")?,
        estimated_hours: decimal_from_db("project.estimated_hours", row.get("estimated_hours")?)?,
        actual_hours: decimal_from_db("project.actual_hours", row.get("actual_hours")?)?,
        difficulty: row.get("difficulty")?,
        notes: row.get("notes")?,
        materials: Vec::new(),
        steps: Vec::new(),
        categories: Vec::new(),
    })
}

fn material_from_row(row: &Row<'_>) -> RepoResult<Material> {
    Ok(Material {
        material_id: row.get("material_id")?,
        project_id: row.get("project_id")?,
        material_name: row.get("material_name")?,
        num_required: row.get("num_required")?,
        cost: decimal_from_db("material.cost", row.get("cost")?)?,
    })
}

fn step_from_row(row: &Row<'_>) -> RepoResult<Step> {
    Ok(Step {
        step_id: row.get("step_id")?,
        project_id: row.get("project_id")?,
        step_text: row.get("step_text")?,
        step_order: row.get("step_order")?,
    })
}

fn category_from_row(row: &Row<'_>) -> RepoResult<Category> {
    Ok(Category {
        category_id: row.get("category_id")?,
        category_name: row.get("category_name")?,
    })
}

/// Renders a decimal for storage, normalized to two fractional digits.
fn decimal_to_db(value: &BigDecimal) -> String {
    value.with_scale(2).to_string()
}

fn normalize_hours(value: Option<&BigDecimal>) -> Option<BigDecimal> {
    value.map(|hours| hours.with_scale(2))
}

fn decimal_from_db(column: &str, value: Option<String>) -> RepoResult<Option<BigDecimal>> {
    match value {
        None => Ok(None),
        Some(text) => BigDecimal::from_str(&text).map(Some).map_err(|_| {
            RepoError::InvalidData(format!("invalid decimal value `{text}` in {column}"))
        }),
    }
}
