use std::collections::HashMap;

use axum::{
    extract::{Extension, Request, State},
    middleware::Next,
    response::Response,
};
use rusqlite::Connection;

use crate::db::{AppState, queries};
use crate::error::{AppError, Result};
use crate::extractors::Path;
use crate::middleware::ActingUser;
use crate::models::{Project, ProjectRole, User};

/// Project resolved by a guard, available to the guarded handler.
#[derive(Clone)]
pub struct ProjectContext {
    pub project: Project,
    /// Set when the admin guard ran.
    pub role: Option<ProjectRole>,
}

impl ProjectContext {
    /// Role the acting user passed the guard with.
    pub fn role_name(&self) -> &str {
        self.role
            .as_ref()
            .map(|role| role.role.as_ref())
            .unwrap_or("member")
    }
}

fn load_project(conn: &Connection, project_id: &str) -> Result<Project> {
    queries::get_project_by_id(conn, project_id)?
        .ok_or_else(|| AppError::NotFound("Project not found".into()))
}

/// Fails unless the user is in the project's member set.
pub fn check_member(conn: &Connection, user: &User, project_id: &str) -> Result<Project> {
    let project = load_project(conn, project_id)?;

    if !project.has_member(&user.id) {
        tracing::debug!("User {} is not a member of project {}", user.id, project_id);
        return Err(AppError::NotAMember(
            "You are not a member of this project".into(),
        ));
    }

    Ok(project)
}

/// Fails unless the user holds the admin role on the project.
pub fn check_admin(conn: &Connection, user: &User, project_id: &str) -> Result<(Project, ProjectRole)> {
    let project = load_project(conn, project_id)?;

    let role = queries::get_project_role(conn, &user.id, project_id)?
        .filter(|role| role.role.can_manage_project())
        .ok_or_else(|| {
            tracing::debug!("User {} is not an admin of project {}", user.id, project_id);
            AppError::NotAuthorized("You are not authorized to perform this action".into())
        })?;

    Ok((project, role))
}

fn project_id_param(params: &HashMap<String, String>) -> Result<&str> {
    params
        .get("project_id")
        .map(String::as_str)
        .ok_or_else(|| AppError::Validation("project id is required".into()))
}

pub async fn require_project_member(
    State(state): State<AppState>,
    Extension(acting): Extension<ActingUser>,
    Path(params): Path<HashMap<String, String>>,
    mut request: Request,
    next: Next,
) -> Result<Response> {
    let project_id = project_id_param(&params)?;

    let project = {
        let conn = state.db.get()?;
        check_member(&conn, &acting.user, project_id)?
    };

    request
        .extensions_mut()
        .insert(ProjectContext { project, role: None });

    Ok(next.run(request).await)
}

pub async fn require_project_admin(
    State(state): State<AppState>,
    Extension(acting): Extension<ActingUser>,
    Path(params): Path<HashMap<String, String>>,
    mut request: Request,
    next: Next,
) -> Result<Response> {
    let project_id = project_id_param(&params)?;

    let (project, role) = {
        let conn = state.db.get()?;
        check_admin(&conn, &acting.user, project_id)?
    };

    request.extensions_mut().insert(ProjectContext {
        project,
        role: Some(role),
    });

    Ok(next.run(request).await)
}
