use serde::{Deserialize, Serialize};
use strum::{AsRefStr, EnumString};

use crate::error::{AppError, Result};
use crate::models::TaskSummary;
use crate::util::timestamp;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, AsRefStr, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ProjectType {
    Personal,
    Team,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: String,
    pub title: String,
    pub description: Option<String>,
    #[serde(rename = "type")]
    pub project_type: ProjectType,
    pub start_date: i64,
    pub end_date: i64,
    /// User ids.
    pub members: Vec<String>,
    /// Task ids.
    pub tasks: Vec<String>,
    /// Owning team, set only for team projects.
    pub team: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
}

impl Project {
    pub fn has_member(&self, user_id: &str) -> bool {
        self.members.iter().any(|m| m == user_id)
    }
}

/// Request body for creating a project. Everything is optional at the
/// serde level so missing fields surface as validation messages.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateProject {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, rename = "type")]
    pub project_type: Option<ProjectType>,
    #[serde(default, deserialize_with = "timestamp::deserialize_opt")]
    pub start_date: Option<i64>,
    #[serde(default, deserialize_with = "timestamp::deserialize_opt")]
    pub end_date: Option<i64>,
    #[serde(default)]
    pub team: Option<String>,
}

/// A project creation request that passed required-field checks.
#[derive(Debug, Clone)]
pub struct NewProject {
    pub title: String,
    pub description: Option<String>,
    pub project_type: ProjectType,
    /// None = creation time
    pub start_date: Option<i64>,
    pub end_date: i64,
    pub team: Option<String>,
}

impl CreateProject {
    pub fn validate(&self) -> Result<NewProject> {
        let title = self
            .title
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or_else(|| AppError::Validation("title is required".into()))?;
        let project_type = self
            .project_type
            .ok_or_else(|| AppError::Validation("type is required".into()))?;
        let end_date = self
            .end_date
            .ok_or_else(|| AppError::Validation("endDate is required".into()))?;

        // A personal project never carries a team reference.
        let team = match project_type {
            ProjectType::Team => Some(
                self.team
                    .as_deref()
                    .map(str::trim)
                    .filter(|t| !t.is_empty())
                    .ok_or_else(|| AppError::Validation("team is required for team projects".into()))?
                    .to_string(),
            ),
            ProjectType::Personal => None,
        };

        Ok(NewProject {
            title: title.to_string(),
            description: self.description.clone(),
            project_type,
            start_date: self.start_date,
            end_date,
            team,
        })
    }
}

/// Shallow overwrite: only provided fields change.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProject {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "timestamp::deserialize_opt")]
    pub start_date: Option<i64>,
    #[serde(default, deserialize_with = "timestamp::deserialize_opt")]
    pub end_date: Option<i64>,
}

/// A project with its task references expanded.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectDetails {
    pub id: String,
    pub title: String,
    pub description: Option<String>,
    #[serde(rename = "type")]
    pub project_type: ProjectType,
    pub start_date: i64,
    pub end_date: i64,
    pub members: Vec<String>,
    pub tasks: Vec<TaskSummary>,
    pub team: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
}

impl ProjectDetails {
    pub fn new(project: Project, tasks: Vec<TaskSummary>) -> Self {
        Self {
            id: project.id,
            title: project.title,
            description: project.description,
            project_type: project.project_type,
            start_date: project.start_date,
            end_date: project.end_date,
            members: project.members,
            tasks,
            team: project.team,
            created_at: project.created_at,
            updated_at: project.updated_at,
        }
    }
}
