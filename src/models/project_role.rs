use serde::{Deserialize, Serialize};
use strum::{AsRefStr, EnumString};

use crate::error::{AppError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, AsRefStr, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ProjectRoleKind {
    Admin,
    Contributor,
}

impl ProjectRoleKind {
    pub fn can_manage_project(&self) -> bool {
        matches!(self, ProjectRoleKind::Admin)
    }
}

/// Join record granting one user one role on one project.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectRole {
    pub id: String,
    #[serde(rename = "user")]
    pub user_id: String,
    #[serde(rename = "project")]
    pub project_id: String,
    pub role: ProjectRoleKind,
    pub created_at: i64,
}

#[derive(Debug, Deserialize)]
pub struct AddProjectMember {
    #[serde(default)]
    pub member: Option<String>,
    #[serde(default)]
    pub role: Option<ProjectRoleKind>,
}

impl AddProjectMember {
    pub fn validate(&self) -> Result<(&str, ProjectRoleKind)> {
        let member = self
            .member
            .as_deref()
            .map(str::trim)
            .filter(|m| !m.is_empty())
            .ok_or_else(|| AppError::Validation("member is required".into()))?;
        let role = self
            .role
            .ok_or_else(|| AppError::Validation("role is required".into()))?;
        Ok((member, role))
    }
}
