use axum::extract::{Extension, State};

use crate::db::{AppState, membership, queries};
use crate::error::{AppError, Result};
use crate::extractors::Json;
use crate::middleware::{ActingUser, ProjectContext};
use crate::models::{CreateProject, Project, ProjectDetails, UpdateProject};

/// POST /projects
/// The acting user becomes the project's first admin.
pub async fn create_project(
    State(state): State<AppState>,
    Extension(acting): Extension<ActingUser>,
    Json(input): Json<CreateProject>,
) -> Result<Json<membership::CreatedProject>> {
    let new_project = input.validate()?;

    let mut conn = state.db.get()?;
    let created = membership::create_project_with_admin(&mut conn, &acting.user.id, &new_project)?;

    tracing::info!(
        "Project {} ({}) created by {}",
        created.project.title,
        created.project.id,
        acting.user.id
    );

    Ok(Json(created))
}

/// GET /projects/{project_id}
pub async fn show_project(
    State(state): State<AppState>,
    Extension(ctx): Extension<ProjectContext>,
) -> Result<Json<ProjectDetails>> {
    let conn = state.db.get()?;
    let tasks = queries::list_task_summaries(&conn, &ctx.project.tasks)?;
    Ok(Json(ProjectDetails::new(ctx.project, tasks)))
}

/// GET /projects/personal
pub async fn list_personal_projects(
    State(state): State<AppState>,
    Extension(acting): Extension<ActingUser>,
) -> Result<Json<Vec<ProjectDetails>>> {
    let conn = state.db.get()?;
    let projects = queries::list_personal_projects_for_user(&conn, &acting.user.id)?;

    let mut details = Vec::with_capacity(projects.len());
    for project in projects {
        let tasks = queries::list_task_summaries(&conn, &project.tasks)?;
        details.push(ProjectDetails::new(project, tasks));
    }

    Ok(Json(details))
}

/// PUT /projects/{project_id}
pub async fn update_project(
    State(state): State<AppState>,
    Extension(acting): Extension<ActingUser>,
    Extension(ctx): Extension<ProjectContext>,
    Json(input): Json<UpdateProject>,
) -> Result<Json<Project>> {
    let conn = state.db.get()?;

    queries::update_project(&conn, &ctx.project.id, &input)?;

    tracing::info!(
        "Project {} updated by {} ({})",
        ctx.project.id,
        acting.user.id,
        ctx.role_name()
    );

    let project = queries::get_project_by_id(&conn, &ctx.project.id)?
        .ok_or_else(|| AppError::NotFound("Project not found".into()))?;

    Ok(Json(project))
}

/// DELETE /projects/{project_id}
pub async fn delete_project(
    State(state): State<AppState>,
    Extension(acting): Extension<ActingUser>,
    Extension(ctx): Extension<ProjectContext>,
) -> Result<Json<serde_json::Value>> {
    let mut conn = state.db.get()?;
    let project = membership::delete_project_cascade(&mut conn, &ctx.project.id)?;

    tracing::info!(
        "Project {} ({}) deleted by {} ({})",
        project.title,
        project.id,
        acting.user.id,
        ctx.role_name()
    );

    Ok(Json(serde_json::json!({
        "message": format!("Project '{}' deleted", project.title)
    })))
}
