use bigdecimal::BigDecimal;
use rusqlite::{params, TransactionBehavior};
use std::str::FromStr;
use tempfile::TempDir;
use workbench_core::{
    run_in_transaction, Database, NewProject, ProjectRepository, ProjectService,
    ProjectServiceError, RepoError, RepoResult, SqliteProjectRepository,
};

fn test_db(dir: &TempDir) -> Database {
    Database::new(dir.path().join("workbench.db"))
}

fn test_service(db: Database) -> ProjectService<SqliteProjectRepository> {
    ProjectService::new(SqliteProjectRepository::new(db))
}

fn sample_project(name: &str) -> NewProject {
    NewProject {
        name: name.to_string(),
        estimated_hours: Some(BigDecimal::from_str("12.50").unwrap()),
        actual_hours: Some(BigDecimal::from_str("10.00").unwrap()),
        difficulty: Some(3),
        notes: Some("x".to_string()),
    }
}

#[test]
fn insert_then_fetch_round_trips_scalar_fields() {
    let dir = tempfile::tempdir().unwrap();
    let db = test_db(&dir);
    let service = test_service(db);

    let created = service.add_project(&sample_project("Deck")).unwrap();
    assert!(created.project_id > 0);

    let fetched = service.fetch_project_by_id(created.project_id).unwrap();
    assert_eq!(fetched.name, "Deck");
    assert_eq!(fetched.estimated_hours.as_ref().unwrap().to_string(), "12.50");
    assert_eq!(fetched.actual_hours.as_ref().unwrap().to_string(), "10.00");
    assert_eq!(fetched.difficulty, Some(3));
    assert_eq!(fetched.notes.as_deref(), Some("x"));
}

#[test]
fn insert_normalizes_decimals_to_two_fractional_digits() {
    let dir = tempfile::tempdir().unwrap();
    let service = test_service(test_db(&dir));

    let created = service
        .add_project(&NewProject {
            name: "Shed".to_string(),
            estimated_hours: Some(BigDecimal::from_str("12.5").unwrap()),
            actual_hours: None,
            difficulty: None,
            notes: None,
        })
        .unwrap();
    assert_eq!(created.estimated_hours.as_ref().unwrap().to_string(), "12.50");

    let fetched = service.fetch_project_by_id(created.project_id).unwrap();
    assert_eq!(fetched.estimated_hours.as_ref().unwrap().to_string(), "12.50");
    assert_eq!(fetched.actual_hours, None);
    assert_eq!(fetched.difficulty, None);
    assert_eq!(fetched.notes, None);
}

#[test]
fn fetch_all_orders_projects_by_name_regardless_of_insertion_order() {
    let dir = tempfile::tempdir().unwrap();
    let service = test_service(test_db(&dir));

    for name in ["Zeta", "Alpha", "Mid"] {
        service.add_project(&sample_project(name)).unwrap();
    }

    let listed = service.fetch_all_projects().unwrap();
    let names: Vec<&str> = listed.iter().map(|project| project.name.as_str()).collect();
    assert_eq!(names, vec!["Alpha", "Mid", "Zeta"]);

    // List view is summary-only: child collections stay empty.
    for project in &listed {
        assert!(project.materials.is_empty());
        assert!(project.steps.is_empty());
        assert!(project.categories.is_empty());
    }
}

#[test]
fn fetch_all_on_empty_table_returns_empty_sequence() {
    let dir = tempfile::tempdir().unwrap();
    let service = test_service(test_db(&dir));

    let listed = service.fetch_all_projects().unwrap();
    assert!(listed.is_empty());
}

#[test]
fn missing_project_is_none_at_repo_and_not_found_at_service() {
    let dir = tempfile::tempdir().unwrap();
    let db = test_db(&dir);
    let repo = SqliteProjectRepository::new(db.clone());

    assert!(repo.fetch_project_by_id(42).unwrap().is_none());

    let service = test_service(db);
    let err = service.fetch_project_by_id(42).unwrap_err();
    match err {
        ProjectServiceError::ProjectNotFound(project_id) => assert_eq!(project_id, 42),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn fetch_by_id_returns_complete_aggregate() {
    let dir = tempfile::tempdir().unwrap();
    let db = test_db(&dir);
    let service = test_service(db.clone());

    let created = service.add_project(&sample_project("Bench")).unwrap();
    let project_id = created.project_id;

    let conn = db.acquire().unwrap();
    conn.execute(
        "INSERT INTO material (project_id, material_name, num_required, cost)
         VALUES (?1, '2x4 lumber', 8, '5.00'), (?1, 'wood screws', 40, '0.10');",
        params![project_id],
    )
    .unwrap();
    // Step rows are inserted out of display order on purpose.
    conn.execute(
        "INSERT INTO step (project_id, step_text, step_order)
         VALUES (?1, 'sand surfaces', 3), (?1, 'cut legs', 1), (?1, 'assemble frame', 2);",
        params![project_id],
    )
    .unwrap();
    conn.execute(
        "INSERT INTO category (category_name) VALUES ('Outdoor'), ('Furniture');",
        [],
    )
    .unwrap();
    conn.execute(
        "INSERT INTO project_category (project_id, category_id)
         SELECT ?1, category_id FROM category;",
        params![project_id],
    )
    .unwrap();
    drop(conn);

    let fetched = service.fetch_project_by_id(project_id).unwrap();
    assert_eq!(fetched.materials.len(), 2);
    assert_eq!(fetched.steps.len(), 3);
    assert_eq!(fetched.categories.len(), 2);

    let step_orders: Vec<i64> = fetched.steps.iter().map(|step| step.step_order).collect();
    assert_eq!(step_orders, vec![1, 2, 3]);
    assert_eq!(fetched.steps[0].step_text, "cut legs");

    let material = fetched
        .materials
        .iter()
        .find(|material| material.material_name == "2x4 lumber")
        .unwrap();
    assert_eq!(material.num_required, Some(8));
    assert_eq!(material.cost.as_ref().unwrap().to_string(), "5.00");

    let mut category_names: Vec<&str> = fetched
        .categories
        .iter()
        .map(|category| category.category_name.as_str())
        .collect();
    category_names.sort_unstable();
    assert_eq!(category_names, vec!["Furniture", "Outdoor"]);
}

#[test]
fn repeated_fetch_by_id_returns_equal_aggregates() {
    let dir = tempfile::tempdir().unwrap();
    let db = test_db(&dir);
    let service = test_service(db.clone());

    let created = service.add_project(&sample_project("Planter")).unwrap();
    let conn = db.acquire().unwrap();
    conn.execute(
        "INSERT INTO step (project_id, step_text, step_order) VALUES (?1, 'drill drainage', 1);",
        params![created.project_id],
    )
    .unwrap();
    drop(conn);

    let first = service.fetch_project_by_id(created.project_id).unwrap();
    let second = service.fetch_project_by_id(created.project_id).unwrap();
    assert_eq!(first, second);
}

#[test]
fn failed_transaction_leaves_no_partial_insert() {
    let dir = tempfile::tempdir().unwrap();
    let db = test_db(&dir);

    let mut conn = db.acquire().unwrap();
    // Simulates identity retrieval failing right after the INSERT ran:
    // the whole transaction must roll back.
    let result: RepoResult<()> =
        run_in_transaction(&mut conn, TransactionBehavior::Immediate, |tx| {
            tx.execute(
                "INSERT INTO project (project_name) VALUES ('doomed');",
                [],
            )?;
            Err(RepoError::InvalidData(
                "forced failure after insert".to_string(),
            ))
        });
    assert!(result.is_err());

    let remaining: i64 = conn
        .query_row("SELECT COUNT(*) FROM project;", [], |row| row.get(0))
        .unwrap();
    assert_eq!(remaining, 0);
}

#[test]
fn malformed_stored_decimal_surfaces_invalid_data() {
    let dir = tempfile::tempdir().unwrap();
    let db = test_db(&dir);

    let conn = db.acquire().unwrap();
    conn.execute(
        "INSERT INTO project (project_name, estimated_hours) VALUES ('corrupt', 'twelve');",
        [],
    )
    .unwrap();
    let project_id = conn.last_insert_rowid();
    drop(conn);

    let repo = SqliteProjectRepository::new(db);
    let err = repo.fetch_project_by_id(project_id).unwrap_err();
    match err {
        RepoError::InvalidData(message) => assert!(message.contains("estimated_hours")),
        other => panic!("unexpected error: {other}"),
    }
}
