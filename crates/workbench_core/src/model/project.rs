//! Project aggregate model.
//!
//! # Responsibility
//! - Define the `Project` aggregate and its child entities.
//! - Define the write model (`NewProject`) used by the insert path.
//!
//! # Invariants
//! - `project_id` is the store-assigned rowid; it is absent before
//!   insert (hence `NewProject` carries no identity).
//! - Hour/cost decimals are normalized to two fractional digits by the
//!   persistence layer.

use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};

/// Store-assigned project identity (SQLite rowid).
///
/// Kept as a type alias to make semantic intent explicit in signatures.
pub type ProjectId = i64;

/// Write model for creating a project.
///
/// Identity and child collections are intentionally absent: the store
/// assigns the id, and materials/steps/categories are read-only here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewProject {
    /// Display name, required.
    pub name: String,
    /// Planned effort in hours, two fractional digits.
    pub estimated_hours: Option<BigDecimal>,
    /// Recorded effort in hours, two fractional digits.
    pub actual_hours: Option<BigDecimal>,
    /// Difficulty rating 1-5; range is validated by callers.
    pub difficulty: Option<u8>,
    /// Free-form notes.
    pub notes: Option<String>,
}

/// Project aggregate: one project row plus its owned child collections.
///
/// List views return the scalar fields with empty collections; the
/// by-id fetch always returns fully populated collections.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    /// Store-assigned identity, immutable once set.
    pub project_id: ProjectId,
    pub name: String,
    pub estimated_hours: Option<BigDecimal>,
    pub actual_hours: Option<BigDecimal>,
    pub difficulty: Option<u8>,
    pub notes: Option<String>,
    /// Materials required by this project.
    pub materials: Vec<Material>,
    /// Build steps, ordered by `step_order`.
    pub steps: Vec<Step>,
    /// Categories this project belongs to (many-to-many membership).
    pub categories: Vec<Category>,
}

impl Project {
    /// Builds the aggregate root from a persisted write model.
    ///
    /// Child collections start empty; the by-id read path fills them.
    pub fn from_new(project_id: ProjectId, input: NewProject) -> Self {
        Self {
            project_id,
            name: input.name,
            estimated_hours: input.estimated_hours,
            actual_hours: input.actual_hours,
            difficulty: input.difficulty,
            notes: input.notes,
            materials: Vec::new(),
            steps: Vec::new(),
            categories: Vec::new(),
        }
    }
}

/// Material required by a project. Read-only in this crate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Material {
    pub material_id: i64,
    pub project_id: ProjectId,
    pub material_name: String,
    pub num_required: Option<i64>,
    /// Unit cost, two fractional digits.
    pub cost: Option<BigDecimal>,
}

/// Single build step of a project. Read-only in this crate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Step {
    pub step_id: i64,
    pub project_id: ProjectId,
    pub step_text: String,
    pub step_order: i64,
}

/// Independent category a project can be associated with.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub category_id: i64,
    pub category_name: String,
}
