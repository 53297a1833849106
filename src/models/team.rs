use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TeamMembers {
    pub admin: Vec<String>,
    pub contributor: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Team {
    pub id: String,
    pub title: String,
    pub description: Option<String>,
    pub members: TeamMembers,
    pub projects: Vec<String>,
    pub created_at: i64,
}

#[derive(Debug, Deserialize)]
pub struct CreateTeam {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub admins: Vec<String>,
    #[serde(default)]
    pub contributors: Vec<String>,
}

impl CreateTeam {
    pub fn validate(&self) -> Result<()> {
        if self.title.trim().is_empty() {
            return Err(AppError::Validation("title is required".into()));
        }
        Ok(())
    }
}
