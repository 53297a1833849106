use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    /// ProjectRole ids held by this user.
    pub projects: Vec<String>,
    pub created_at: i64,
}

impl User {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateUser {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
}

impl CreateUser {
    pub fn validate(&self) -> Result<()> {
        if self.first_name.trim().is_empty() {
            return Err(AppError::Validation("firstName is required".into()));
        }
        if self.last_name.trim().is_empty() {
            return Err(AppError::Validation("lastName is required".into()));
        }
        if self.email.trim().is_empty() {
            return Err(AppError::Validation("email is required".into()));
        }
        Ok(())
    }
}
