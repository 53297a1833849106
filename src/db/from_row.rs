//! Row mapping for the store tables.

use std::str::FromStr;

use rusqlite::{Connection, Params, Row, types::Type};

use crate::error::Result;
use crate::models::*;

pub const USER_COLS: &str = "id, first_name, last_name, email, projects, created_at";

pub const TEAM_COLS: &str = "id, title, description, admins, contributors, projects, created_at";

pub const PROJECT_COLS: &str = "id, title, description, project_type, start_date, end_date, members, tasks, team_id, created_at, updated_at";

pub const PROJECT_ROLE_COLS: &str = "id, user_id, project_id, role, created_at";

pub trait FromRow: Sized {
    fn from_row(row: &Row) -> rusqlite::Result<Self>;
}

pub fn query_one<T: FromRow>(conn: &Connection, sql: &str, params: impl Params) -> Result<Option<T>> {
    let mut stmt = conn.prepare(sql)?;
    let mut rows = stmt.query(params)?;
    match rows.next()? {
        Some(row) => Ok(Some(T::from_row(row)?)),
        None => Ok(None),
    }
}

pub fn query_all<T: FromRow>(conn: &Connection, sql: &str, params: impl Params) -> Result<Vec<T>> {
    let mut stmt = conn.prepare(sql)?;
    let items = stmt
        .query_map(params, |row| T::from_row(row))?
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(items)
}

fn id_set(row: &Row, idx: usize) -> rusqlite::Result<Vec<String>> {
    let raw: String = row.get(idx)?;
    serde_json::from_str(&raw)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

fn parse_enum<T>(row: &Row, idx: usize) -> rusqlite::Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    let raw: String = row.get(idx)?;
    raw.parse()
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

impl FromRow for User {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(User {
            id: row.get(0)?,
            first_name: row.get(1)?,
            last_name: row.get(2)?,
            email: row.get(3)?,
            projects: id_set(row, 4)?,
            created_at: row.get(5)?,
        })
    }
}

impl FromRow for Team {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Team {
            id: row.get(0)?,
            title: row.get(1)?,
            description: row.get(2)?,
            members: TeamMembers {
                admin: id_set(row, 3)?,
                contributor: id_set(row, 4)?,
            },
            projects: id_set(row, 5)?,
            created_at: row.get(6)?,
        })
    }
}

impl FromRow for Project {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Project {
            id: row.get(0)?,
            title: row.get(1)?,
            description: row.get(2)?,
            project_type: parse_enum(row, 3)?,
            start_date: row.get(4)?,
            end_date: row.get(5)?,
            members: id_set(row, 6)?,
            tasks: id_set(row, 7)?,
            team: row.get(8)?,
            created_at: row.get(9)?,
            updated_at: row.get(10)?,
        })
    }
}

impl FromRow for ProjectRole {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(ProjectRole {
            id: row.get(0)?,
            user_id: row.get(1)?,
            project_id: row.get(2)?,
            role: parse_enum(row, 3)?,
            created_at: row.get(4)?,
        })
    }
}

/// Expects `t.id, t.title, t.due_date, t.status, u.id, u.first_name, u.last_name`
/// from a tasks LEFT JOIN users query.
impl FromRow for TaskSummary {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        let assignee_id: Option<String> = row.get(4)?;
        let assigned_to = match assignee_id {
            Some(id) => {
                let first_name: String = row.get(5)?;
                let last_name: String = row.get(6)?;
                Some(AssigneeSummary {
                    id,
                    full_name: format!("{} {}", first_name, last_name),
                    first_name,
                    last_name,
                })
            }
            None => None,
        };

        Ok(TaskSummary {
            id: row.get(0)?,
            title: row.get(1)?,
            due_date: row.get(2)?,
            assigned_to,
            status: row.get(3)?,
        })
    }
}
