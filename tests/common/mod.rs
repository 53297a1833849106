//! Shared helpers for integration tests.
#![allow(dead_code)]

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
};
use rusqlite::Connection;
use serde_json::Value;
use tempfile::TempDir;
use tower::ServiceExt;

pub use collabhub::db::{AppState, membership, queries};
pub use collabhub::error::AppError;
pub use collabhub::models::*;

/// App state backed by a SQLite file in a temp dir. Keep the value alive
/// for the duration of the test.
pub struct TestState {
    pub state: AppState,
    _dir: TempDir,
}

pub fn create_test_app_state() -> TestState {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("collabhub.db");
    let pool = collabhub::db::create_pool(path.to_str().unwrap(), 4).expect("Failed to create pool");
    {
        let conn = pool.get().unwrap();
        collabhub::db::init_db(&conn).unwrap();
    }
    TestState {
        state: AppState { db: pool },
        _dir: dir,
    }
}

pub fn test_app(test_state: &TestState) -> Router {
    collabhub::handlers::app(test_state.state.clone())
}

pub fn setup_test_db() -> Connection {
    let conn = Connection::open_in_memory().unwrap();
    collabhub::db::init_db(&conn).unwrap();
    conn
}

pub fn create_test_user(conn: &Connection, first_name: &str, last_name: &str) -> User {
    let input = CreateUser {
        first_name: first_name.to_string(),
        last_name: last_name.to_string(),
        email: format!("{}@example.com", uuid::Uuid::new_v4()),
    };
    queries::create_user(conn, &input).expect("Failed to create test user")
}

pub fn create_test_team(conn: &Connection, title: &str, admins: &[&str]) -> Team {
    let input = CreateTeam {
        title: title.to_string(),
        description: None,
        admins: admins.iter().map(|id| id.to_string()).collect(),
        contributors: Vec::new(),
    };
    queries::create_team(conn, &input).expect("Failed to create test team")
}

pub fn new_project(title: &str, project_type: ProjectType, team: Option<&str>) -> NewProject {
    NewProject {
        title: title.to_string(),
        description: Some(format!("{} description", title)),
        project_type,
        start_date: None,
        end_date: 1735689600,
        team: team.map(String::from),
    }
}

pub fn create_test_project(
    conn: &mut Connection,
    creator: &User,
    title: &str,
    project_type: ProjectType,
    team: Option<&str>,
) -> membership::CreatedProject {
    membership::create_project_with_admin(conn, &creator.id, &new_project(title, project_type, team))
        .expect("Failed to create test project")
}

pub fn create_test_task(
    conn: &Connection,
    project_id: &str,
    title: &str,
    assigned_to: Option<&str>,
) -> Task {
    let input = CreateTask {
        title: title.to_string(),
        due_date: Some(1735689600),
        assigned_to: assigned_to.map(String::from),
        status: "todo".to_string(),
    };
    queries::create_task(conn, project_id, &input).expect("Failed to create test task")
}

/// Send a request as `user_id` and return the status and JSON body.
pub async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    user_id: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(id) = user_id {
        builder = builder.header("x-user-id", id);
    }
    let request = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("Response should be valid JSON")
    };
    (status, json)
}

pub fn ids(value: &Value) -> Vec<String> {
    value
        .as_array()
        .expect("expected a JSON array")
        .iter()
        .map(|v| v.as_str().unwrap().to_string())
        .collect()
}
