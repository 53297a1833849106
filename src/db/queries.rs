use chrono::Utc;
use rusqlite::{Connection, params, types::Value};
use uuid::Uuid;

use crate::error::{AppError, Result};
use crate::models::*;

use super::from_row::{
    PROJECT_COLS, PROJECT_ROLE_COLS, TEAM_COLS, USER_COLS, query_all, query_one,
};

fn now() -> i64 {
    Utc::now().timestamp()
}

fn gen_id() -> String {
    Uuid::new_v4().to_string()
}

fn id_set_json(ids: &[String]) -> Result<String> {
    Ok(serde_json::to_string(ids)?)
}

/// Collects the provided columns of a partial update into one UPDATE
/// statement that also stamps `updated_at`.
struct PartialUpdate {
    table: &'static str,
    fields: Vec<(&'static str, Value)>,
}

impl PartialUpdate {
    fn new(table: &'static str) -> Self {
        Self {
            table,
            fields: Vec::new(),
        }
    }

    fn set_opt<V: Into<Value>>(mut self, column: &'static str, value: Option<V>) -> Self {
        if let Some(v) = value {
            self.fields.push((column, v.into()));
        }
        self
    }

    /// Returns false without touching the row when nothing was provided.
    fn execute(self, conn: &Connection, id: &str) -> Result<bool> {
        if self.fields.is_empty() {
            return Ok(false);
        }
        let sets: Vec<String> = self
            .fields
            .iter()
            .map(|(col, _)| format!("{} = ?", col))
            .collect();
        let mut values: Vec<Value> = self.fields.into_iter().map(|(_, v)| v).collect();
        values.push(now().into());
        values.push(id.to_string().into());
        let sql = format!(
            "UPDATE {} SET {}, updated_at = ? WHERE id = ?",
            self.table,
            sets.join(", ")
        );
        let affected = conn.execute(&sql, rusqlite::params_from_iter(values))?;
        Ok(affected > 0)
    }
}

// ============ Users ============

pub fn create_user(conn: &Connection, input: &CreateUser) -> Result<User> {
    let id = gen_id();
    let now = now();

    conn.execute(
        "INSERT INTO users (id, first_name, last_name, email, projects, created_at)
         VALUES (?1, ?2, ?3, ?4, '[]', ?5)",
        params![&id, &input.first_name, &input.last_name, &input.email, now],
    )?;

    Ok(User {
        id,
        first_name: input.first_name.clone(),
        last_name: input.last_name.clone(),
        email: input.email.clone(),
        projects: Vec::new(),
        created_at: now,
    })
}

pub fn get_user_by_id(conn: &Connection, id: &str) -> Result<Option<User>> {
    query_one(
        conn,
        &format!("SELECT {} FROM users WHERE id = ?1", USER_COLS),
        [id],
    )
}

/// Persist a user's ProjectRole id set.
pub fn set_user_projects(conn: &Connection, id: &str, role_ids: &[String]) -> Result<bool> {
    let affected = conn.execute(
        "UPDATE users SET projects = ?1 WHERE id = ?2",
        params![id_set_json(role_ids)?, id],
    )?;
    Ok(affected > 0)
}

// ============ Teams ============

pub fn create_team(conn: &Connection, input: &CreateTeam) -> Result<Team> {
    let id = gen_id();
    let now = now();

    conn.execute(
        "INSERT INTO teams (id, title, description, admins, contributors, projects, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, '[]', ?6)",
        params![
            &id,
            &input.title,
            &input.description,
            id_set_json(&input.admins)?,
            id_set_json(&input.contributors)?,
            now
        ],
    )?;

    Ok(Team {
        id,
        title: input.title.clone(),
        description: input.description.clone(),
        members: TeamMembers {
            admin: input.admins.clone(),
            contributor: input.contributors.clone(),
        },
        projects: Vec::new(),
        created_at: now,
    })
}

pub fn get_team_by_id(conn: &Connection, id: &str) -> Result<Option<Team>> {
    query_one(
        conn,
        &format!("SELECT {} FROM teams WHERE id = ?1", TEAM_COLS),
        [id],
    )
}

/// Persist a team's project id set.
pub fn set_team_projects(conn: &Connection, id: &str, project_ids: &[String]) -> Result<bool> {
    let affected = conn.execute(
        "UPDATE teams SET projects = ?1 WHERE id = ?2",
        params![id_set_json(project_ids)?, id],
    )?;
    Ok(affected > 0)
}

// ============ Projects ============

/// Insert a project with empty member and task sets.
pub fn create_project(conn: &Connection, input: &NewProject) -> Result<Project> {
    let id = gen_id();
    let now = now();
    let start_date = input.start_date.unwrap_or(now);

    conn.execute(
        "INSERT INTO projects (id, title, description, project_type, start_date, end_date, members, tasks, team_id, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, '[]', '[]', ?7, ?8, ?9)",
        params![
            &id,
            &input.title,
            &input.description,
            input.project_type.as_ref(),
            start_date,
            input.end_date,
            &input.team,
            now,
            now
        ],
    )?;

    Ok(Project {
        id,
        title: input.title.clone(),
        description: input.description.clone(),
        project_type: input.project_type,
        start_date,
        end_date: input.end_date,
        members: Vec::new(),
        tasks: Vec::new(),
        team: input.team.clone(),
        created_at: now,
        updated_at: now,
    })
}

pub fn get_project_by_id(conn: &Connection, id: &str) -> Result<Option<Project>> {
    query_one(
        conn,
        &format!("SELECT {} FROM projects WHERE id = ?1", PROJECT_COLS),
        [id],
    )
}

/// Persist a project's member (user id) set.
pub fn set_project_members(conn: &Connection, id: &str, user_ids: &[String]) -> Result<bool> {
    let affected = conn.execute(
        "UPDATE projects SET members = ?1, updated_at = ?2 WHERE id = ?3",
        params![id_set_json(user_ids)?, now(), id],
    )?;
    Ok(affected > 0)
}

pub fn update_project(conn: &Connection, id: &str, input: &UpdateProject) -> Result<bool> {
    PartialUpdate::new("projects")
        .set_opt("title", input.title.clone())
        .set_opt("description", input.description.clone())
        .set_opt("start_date", input.start_date)
        .set_opt("end_date", input.end_date)
        .execute(conn, id)
}

pub fn delete_project(conn: &Connection, id: &str) -> Result<bool> {
    let deleted = conn.execute("DELETE FROM projects WHERE id = ?1", params![id])?;
    Ok(deleted > 0)
}

/// Personal projects whose member set contains the user.
pub fn list_personal_projects_for_user(conn: &Connection, user_id: &str) -> Result<Vec<Project>> {
    query_all(
        conn,
        &format!(
            "SELECT {} FROM projects
             WHERE project_type = ?1
             AND EXISTS (SELECT 1 FROM json_each(projects.members) WHERE json_each.value = ?2)
             ORDER BY created_at DESC",
            PROJECT_COLS
        ),
        params![ProjectType::Personal.as_ref(), user_id],
    )
}

// ============ Project Roles ============

pub fn create_project_role(
    conn: &Connection,
    user_id: &str,
    project_id: &str,
    role: ProjectRoleKind,
) -> Result<ProjectRole> {
    let id = gen_id();
    let now = now();

    conn.execute(
        "INSERT INTO project_roles (id, user_id, project_id, role, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![&id, user_id, project_id, role.as_ref(), now],
    )?;

    Ok(ProjectRole {
        id,
        user_id: user_id.to_string(),
        project_id: project_id.to_string(),
        role,
        created_at: now,
    })
}

/// The unique role for a (user, project) pair, if any.
pub fn get_project_role(
    conn: &Connection,
    user_id: &str,
    project_id: &str,
) -> Result<Option<ProjectRole>> {
    query_one(
        conn,
        &format!(
            "SELECT {} FROM project_roles WHERE user_id = ?1 AND project_id = ?2",
            PROJECT_ROLE_COLS
        ),
        [user_id, project_id],
    )
}

pub fn list_project_roles_for_project(conn: &Connection, project_id: &str) -> Result<Vec<ProjectRole>> {
    query_all(
        conn,
        &format!(
            "SELECT {} FROM project_roles WHERE project_id = ?1 ORDER BY created_at",
            PROJECT_ROLE_COLS
        ),
        [project_id],
    )
}

pub fn delete_project_role(conn: &Connection, id: &str) -> Result<bool> {
    let deleted = conn.execute("DELETE FROM project_roles WHERE id = ?1", params![id])?;
    Ok(deleted > 0)
}

pub fn delete_project_roles_for_project(conn: &Connection, project_id: &str) -> Result<usize> {
    let deleted = conn.execute(
        "DELETE FROM project_roles WHERE project_id = ?1",
        params![project_id],
    )?;
    Ok(deleted)
}

// ============ Tasks ============

/// Create a task and append it to the project's task set.
pub fn create_task(conn: &Connection, project_id: &str, input: &CreateTask) -> Result<Task> {
    let mut project = get_project_by_id(conn, project_id)?
        .ok_or_else(|| AppError::NotFound("Project not found".into()))?;

    let id = gen_id();
    let now = now();

    conn.execute(
        "INSERT INTO tasks (id, project_id, title, due_date, assigned_to, status, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        params![
            &id,
            project_id,
            &input.title,
            input.due_date,
            &input.assigned_to,
            &input.status,
            now
        ],
    )?;

    insert_ref(&mut project.tasks, &id);
    conn.execute(
        "UPDATE projects SET tasks = ?1, updated_at = ?2 WHERE id = ?3",
        params![id_set_json(&project.tasks)?, now, project_id],
    )?;

    Ok(Task {
        id,
        project_id: project_id.to_string(),
        title: input.title.clone(),
        due_date: input.due_date,
        assigned_to: input.assigned_to.clone(),
        status: input.status.clone(),
        created_at: now,
    })
}

/// Expand task ids into summaries with their assignee's name.
/// Ids that no longer resolve to a task are skipped.
pub fn list_task_summaries(conn: &Connection, task_ids: &[String]) -> Result<Vec<TaskSummary>> {
    if task_ids.is_empty() {
        return Ok(Vec::new());
    }

    query_all(
        conn,
        "SELECT t.id, t.title, t.due_date, t.status, u.id, u.first_name, u.last_name
         FROM tasks t
         LEFT JOIN users u ON u.id = t.assigned_to
         WHERE t.id IN (SELECT value FROM json_each(?1))
         ORDER BY t.created_at",
        [id_set_json(task_ids)?],
    )
}
