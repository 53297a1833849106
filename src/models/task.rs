use serde::{Deserialize, Serialize};

/// Tasks belong to another domain; this crate only stores enough of them
/// to expand a project's task references.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: String,
    pub project_id: String,
    pub title: String,
    pub due_date: Option<i64>,
    pub assigned_to: Option<String>,
    pub status: String,
    pub created_at: i64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTask {
    pub title: String,
    #[serde(default)]
    pub due_date: Option<i64>,
    #[serde(default)]
    pub assigned_to: Option<String>,
    #[serde(default = "default_status")]
    pub status: String,
}

fn default_status() -> String {
    "todo".to_string()
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AssigneeSummary {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub full_name: String,
}

/// A task reference expanded for project views.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskSummary {
    pub id: String,
    pub title: String,
    pub due_date: Option<i64>,
    pub assigned_to: Option<AssigneeSummary>,
    pub status: String,
}
