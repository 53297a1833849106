//! Multi-record project mutations.
//!
//! Projects, users, roles and teams each hold their half of a
//! bidirectional link:
//!
//! ```text
//! project.members  <->  project_roles(user, project)  <->  user.projects
//! project.team     <->  team.projects
//! ```
//!
//! Every function here runs in one IMMEDIATE transaction so the links are
//! either all written or none are. Authorization is not checked here;
//! callers run the project guards first.

use rusqlite::{Connection, TransactionBehavior};
use serde::Serialize;

use crate::error::{AppError, Result};
use crate::models::*;

use super::queries;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatedProject {
    pub project: Project,
    pub project_role: ProjectRole,
    pub user: User,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AddedMember {
    pub project: Project,
    pub member_role: ProjectRole,
    pub member: User,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RemovedMember {
    pub project: Project,
    pub member: User,
}

fn project_not_found() -> AppError {
    AppError::NotFound("Project not found".into())
}

fn user_not_found() -> AppError {
    AppError::NotFound("User not found".into())
}

/// Create a project with its creator as the sole admin member.
/// Team projects are appended to their team's project set.
pub fn create_project_with_admin(
    conn: &mut Connection,
    creator_id: &str,
    input: &NewProject,
) -> Result<CreatedProject> {
    let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

    let mut user = queries::get_user_by_id(&tx, creator_id)?.ok_or_else(user_not_found)?;

    let team = match &input.team {
        Some(team_id) => Some(
            queries::get_team_by_id(&tx, team_id)?
                .ok_or_else(|| AppError::NotFound("Team not found".into()))?,
        ),
        None => None,
    };

    let mut project = queries::create_project(&tx, input)?;
    let project_role =
        queries::create_project_role(&tx, &user.id, &project.id, ProjectRoleKind::Admin)?;

    insert_ref(&mut user.projects, &project_role.id);
    queries::set_user_projects(&tx, &user.id, &user.projects)?;

    insert_ref(&mut project.members, &user.id);
    queries::set_project_members(&tx, &project.id, &project.members)?;

    if let Some(mut team) = team {
        insert_ref(&mut team.projects, &project.id);
        queries::set_team_projects(&tx, &team.id, &team.projects)?;
    }

    tx.commit()?;

    Ok(CreatedProject {
        project,
        project_role,
        user,
    })
}

/// Add a user to a project with the given role.
pub fn add_project_member(
    conn: &mut Connection,
    project_id: &str,
    member_id: &str,
    role: ProjectRoleKind,
) -> Result<AddedMember> {
    let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

    let mut project = queries::get_project_by_id(&tx, project_id)?.ok_or_else(project_not_found)?;
    let mut member = queries::get_user_by_id(&tx, member_id)?.ok_or_else(user_not_found)?;

    // One role per (user, project)
    if queries::get_project_role(&tx, &member.id, &project.id)?.is_some() {
        return Err(AppError::Validation(
            "User is already a member of this project".into(),
        ));
    }

    insert_ref(&mut project.members, &member.id);
    queries::set_project_members(&tx, &project.id, &project.members)?;

    let member_role = queries::create_project_role(&tx, &member.id, &project.id, role)?;

    insert_ref(&mut member.projects, &member_role.id);
    queries::set_user_projects(&tx, &member.id, &member.projects)?;

    tx.commit()?;

    Ok(AddedMember {
        project,
        member_role,
        member,
    })
}

/// Remove a user from a project, deleting their role for it.
pub fn remove_project_member(
    conn: &mut Connection,
    project_id: &str,
    member_id: &str,
) -> Result<RemovedMember> {
    let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

    let mut project = queries::get_project_by_id(&tx, project_id)?.ok_or_else(project_not_found)?;
    let mut member = queries::get_user_by_id(&tx, member_id)?.ok_or_else(user_not_found)?;

    remove_ref(&mut project.members, &member.id);

    let role = queries::get_project_role(&tx, &member.id, &project.id)?
        .ok_or_else(|| AppError::NotFound("Project role not found".into()))?;
    queries::delete_project_role(&tx, &role.id)?;

    remove_ref(&mut member.projects, &role.id);

    queries::set_project_members(&tx, &project.id, &project.members)?;
    queries::set_user_projects(&tx, &member.id, &member.projects)?;

    tx.commit()?;

    Ok(RemovedMember { project, member })
}

/// Delete a project and every back-reference to it. Returns the deleted
/// project.
pub fn delete_project_cascade(conn: &mut Connection, project_id: &str) -> Result<Project> {
    let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

    let project = queries::get_project_by_id(&tx, project_id)?.ok_or_else(project_not_found)?;
    queries::delete_project(&tx, &project.id)?;

    if let (ProjectType::Team, Some(team_id)) = (project.project_type, &project.team) {
        match queries::get_team_by_id(&tx, team_id)? {
            Some(mut team) => {
                remove_ref(&mut team.projects, &project.id);
                queries::set_team_projects(&tx, &team.id, &team.projects)?;
            }
            None => tracing::warn!(
                "Team {} of deleted project {} no longer exists",
                team_id,
                project.id
            ),
        }
    }

    let roles = queries::list_project_roles_for_project(&tx, &project.id)?;
    for role in &roles {
        if let Some(mut user) = queries::get_user_by_id(&tx, &role.user_id)? {
            remove_ref(&mut user.projects, &role.id);
            queries::set_user_projects(&tx, &user.id, &user.projects)?;
        }
    }
    queries::delete_project_roles_for_project(&tx, &project.id)?;

    tx.commit()?;

    Ok(project)
}
