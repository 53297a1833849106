use axum::extract::{Extension, State};

use crate::db::{AppState, membership};
use crate::error::Result;
use crate::extractors::{Json, Path};
use crate::middleware::{ActingUser, ProjectContext};
use crate::models::AddProjectMember;

#[derive(serde::Deserialize)]
pub struct ProjectMemberPath {
    pub project_id: String,
    pub member_id: String,
}

/// POST /projects/{project_id}/members
pub async fn add_project_member(
    State(state): State<AppState>,
    Extension(acting): Extension<ActingUser>,
    Extension(ctx): Extension<ProjectContext>,
    Json(input): Json<AddProjectMember>,
) -> Result<Json<membership::AddedMember>> {
    let (member_id, role) = input.validate()?;

    let mut conn = state.db.get()?;
    let added = membership::add_project_member(&mut conn, &ctx.project.id, member_id, role)?;

    tracing::info!(
        "User {} added to project {} as {} by {}",
        added.member.id,
        added.project.id,
        role.as_ref(),
        acting.user.id
    );

    Ok(Json(added))
}

/// DELETE /projects/{project_id}/members/{member_id}
pub async fn remove_project_member(
    State(state): State<AppState>,
    Extension(acting): Extension<ActingUser>,
    Extension(ctx): Extension<ProjectContext>,
    Path(path): Path<ProjectMemberPath>,
) -> Result<Json<membership::RemovedMember>> {
    let mut conn = state.db.get()?;
    let removed = membership::remove_project_member(&mut conn, &ctx.project.id, &path.member_id)?;

    tracing::info!(
        "User {} removed from project {} by {}",
        removed.member.id,
        removed.project.id,
        acting.user.id
    );

    Ok(Json(removed))
}
