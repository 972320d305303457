//! Interactive console for the workbench project tracker.
//!
//! # Responsibility
//! - Drive the menu loop over the three service operations (create,
//!   list, select-by-id).
//! - Parse typed values from console input; blank input maps to NULL
//!   for nullable fields.
//! - Display every core failure and continue the loop instead of
//!   terminating the process.

use bigdecimal::BigDecimal;
use log::info;
use std::fmt::{Display, Formatter};
use std::io::{self, BufRead, Write};
use std::str::FromStr;
use workbench_core::{
    core_version, default_log_level, init_logging, Database, NewProject, Project, ProjectService,
    ProjectServiceError, SqliteProjectRepository,
};

const DEFAULT_DB_FILE: &str = "workbench.db";

const MENU: &str = "\nThese are the available selections. Press the Enter key to quit:
  1) Add a project
  2) List projects
  3) Select a project";

/// Presentation-level error: I/O trouble, unparseable input, or a core
/// failure bubbled up from the service layer.
#[derive(Debug)]
enum AppError {
    Io(io::Error),
    InvalidInput(String),
    Service(ProjectServiceError),
}

impl Display for AppError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(err) => write!(f, "{err}."),
            Self::InvalidInput(message) => write!(f, "{message}."),
            Self::Service(err) => write!(f, "{err}."),
        }
    }
}

impl From<io::Error> for AppError {
    fn from(value: io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<ProjectServiceError> for AppError {
    fn from(value: ProjectServiceError) -> Self {
        Self::Service(value)
    }
}

struct App<I> {
    service: ProjectService<SqliteProjectRepository>,
    lines: I,
    current: Option<Project>,
}

fn main() {
    init_logging_from_env();

    // Config is resolved once at process start: argv wins, then the
    // environment, then the working-directory default.
    let db_path = std::env::args()
        .nth(1)
        .or_else(|| std::env::var("WORKBENCH_DB").ok())
        .unwrap_or_else(|| DEFAULT_DB_FILE.to_string());

    info!(
        "event=app_start module=cli status=ok version={} db_path={db_path}",
        core_version()
    );

    let repo = SqliteProjectRepository::new(Database::new(db_path));
    let stdin = io::stdin();
    let app = App {
        service: ProjectService::new(repo),
        lines: stdin.lock().lines(),
        current: None,
    };
    app.run();
}

fn init_logging_from_env() {
    // Logging is optional for the console app; it is only set up when
    // the operator points WORKBENCH_LOG_DIR at an absolute directory.
    if let Ok(dir) = std::env::var("WORKBENCH_LOG_DIR") {
        if let Err(err) = init_logging(default_log_level(), &dir) {
            eprintln!("warning: file logging disabled: {err}");
        }
    }
}

impl<I: Iterator<Item = io::Result<String>>> App<I> {
    fn run(mut self) {
        loop {
            println!("{MENU}");
            match &self.current {
                Some(project) => {
                    println!("\nYou are working with project:\n{}", render_project(project));
                }
                None => println!("\nYou are not working with a project."),
            }

            match self.menu_selection() {
                Ok(None) => {
                    println!("\nExiting the menu.");
                    return;
                }
                Ok(Some(selection)) => {
                    let outcome = match selection {
                        1 => self.create_project(),
                        2 => self.list_projects(),
                        3 => self.select_project(),
                        other => {
                            println!("\n{other} is not a valid selection. Try again.");
                            Ok(())
                        }
                    };
                    if let Err(err) = outcome {
                        println!("\nError: {err} Try again.");
                    }
                }
                Err(err) => println!("\nError: {err} Try again."),
            }
        }
    }

    fn menu_selection(&mut self) -> Result<Option<i64>, AppError> {
        match self.prompt("Enter a menu selection")? {
            None => Ok(None),
            Some(text) => text.parse().map(Some).map_err(|_| {
                AppError::InvalidInput(format!("`{text}` is not a valid selection"))
            }),
        }
    }

    fn create_project(&mut self) -> Result<(), AppError> {
        let name = self
            .prompt("Enter the project name")?
            .ok_or_else(|| AppError::InvalidInput("the project name is required".to_string()))?;
        let estimated_hours = self.decimal_input("Enter the estimated hours")?;
        let actual_hours = self.decimal_input("Enter the actual hours")?;
        let difficulty = self.difficulty_input("Enter the project difficulty (1-5)")?;
        let notes = self.prompt("Enter the project notes")?;

        let created = self.service.add_project(&NewProject {
            name,
            estimated_hours,
            actual_hours,
            difficulty,
            notes,
        })?;

        println!(
            "You have successfully created project:\n{}",
            render_project(&created)
        );
        Ok(())
    }

    fn list_projects(&mut self) -> Result<(), AppError> {
        let projects = self.service.fetch_all_projects()?;
        println!("\nProjects:");
        for project in &projects {
            println!("  {}: {}", project.project_id, project.name);
        }
        Ok(())
    }

    fn select_project(&mut self) -> Result<(), AppError> {
        self.list_projects()?;
        let project_id = self
            .prompt("Enter a project ID to select a project")?
            .ok_or_else(|| AppError::InvalidInput("a project ID is required".to_string()))?
            .parse()
            .map_err(|_| AppError::InvalidInput("the project ID must be a number".to_string()))?;

        // Drop the previous selection first so a failed fetch leaves
        // no stale project selected.
        self.current = None;
        self.current = Some(self.service.fetch_project_by_id(project_id)?);
        Ok(())
    }

    fn decimal_input(&mut self, label: &str) -> Result<Option<BigDecimal>, AppError> {
        match self.prompt(label)? {
            None => Ok(None),
            Some(text) => match BigDecimal::from_str(&text) {
                Ok(value) => Ok(Some(value.with_scale(2))),
                Err(_) => Err(AppError::InvalidInput(format!(
                    "`{text}` is not a valid decimal number"
                ))),
            },
        }
    }

    fn difficulty_input(&mut self, label: &str) -> Result<Option<u8>, AppError> {
        match self.prompt(label)? {
            None => Ok(None),
            Some(text) => match text.parse::<u8>() {
                Ok(value @ 1..=5) => Ok(Some(value)),
                _ => Err(AppError::InvalidInput(format!(
                    "`{text}` is not a difficulty between 1 and 5"
                ))),
            },
        }
    }

    /// Prints `label`, reads one line, and maps blank input (or EOF)
    /// to `None`.
    fn prompt(&mut self, label: &str) -> Result<Option<String>, AppError> {
        print!("{label}: ");
        io::stdout().flush()?;
        match self.lines.next() {
            None => Ok(None),
            Some(line) => {
                let trimmed = line?.trim().to_string();
                if trimmed.is_empty() {
                    Ok(None)
                } else {
                    Ok(Some(trimmed))
                }
            }
        }
    }
}

fn render_project(project: &Project) -> String {
    let mut out = format!(
        "   ID={}, name={}, estimated_hours={}, actual_hours={}, difficulty={}, notes={}",
        project.project_id,
        project.name,
        render_opt(project.estimated_hours.as_ref()),
        render_opt(project.actual_hours.as_ref()),
        render_opt(project.difficulty.as_ref()),
        render_opt(project.notes.as_ref()),
    );

    if !project.materials.is_empty() {
        out.push_str("\n   Materials:");
        for material in &project.materials {
            out.push_str(&format!(
                "\n      {} x {} (cost {})",
                render_opt(material.num_required.as_ref()),
                material.material_name,
                render_opt(material.cost.as_ref()),
            ));
        }
    }

    if !project.steps.is_empty() {
        out.push_str("\n   Steps:");
        for step in &project.steps {
            out.push_str(&format!("\n      {}: {}", step.step_order, step.step_text));
        }
    }

    if !project.categories.is_empty() {
        out.push_str("\n   Categories:");
        for category in &project.categories {
            out.push_str(&format!("\n      {}", category.category_name));
        }
    }

    out
}

fn render_opt<T: Display>(value: Option<&T>) -> String {
    match value {
        Some(value) => value.to_string(),
        None => "-".to_string(),
    }
}
