//! User profile model
//!
//! Table: user_profiles
//!
//! `performance`, `current_workload` and `accepted_items_count` are owned by
//! the scorer; nothing else writes them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;
use wb_core::traits::{Entity, Id, Identifiable, Timestamped, UserId};
use wb_core::types::Percentage;

#[derive(Debug, Clone, Serialize, Deserialize, Validate, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: Option<Id>,

    pub user_id: UserId,

    #[validate(length(min = 1, max = 100, message = "must be between 1 and 100 characters"))]
    pub full_name: String,

    /// Comma-separated
    pub skills: Option<String>,

    #[validate(range(min = 0, message = "must not be negative"))]
    pub experience_years: i32,

    pub performance: Percentage,

    pub current_workload: Percentage,

    pub accepted_items_count: i32,

    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl Identifiable for UserProfile {
    fn id(&self) -> Option<Id> {
        self.id
    }
}

impl Timestamped for UserProfile {
    fn created_at(&self) -> Option<DateTime<Utc>> {
        self.created_at
    }

    fn updated_at(&self) -> Option<DateTime<Utc>> {
        self.updated_at
    }
}

impl Entity for UserProfile {
    const TABLE_NAME: &'static str = "user_profiles";
    const TYPE_NAME: &'static str = "UserProfile";
}

impl UserProfile {
    pub fn new(user_id: impl Into<UserId>, full_name: impl Into<String>) -> Self {
        Self {
            id: None,
            user_id: user_id.into(),
            full_name: full_name.into(),
            skills: None,
            experience_years: 0,
            performance: Percentage::FULL,
            current_workload: Percentage::ZERO,
            accepted_items_count: 0,
            created_at: None,
            updated_at: None,
        }
    }

    pub fn skills_list(&self) -> Vec<&str> {
        self.skills
            .as_deref()
            .map(|skills| {
                skills
                    .split(',')
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .collect()
            })
            .unwrap_or_default()
    }
}

/// Self-service profile changes
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileDto {
    pub full_name: Option<String>,
    pub skills: Option<String>,
    pub experience_years: Option<i32>,
    /// Rejected as not writable when present
    pub performance: Option<serde_json::Value>,
    pub current_workload: Option<serde_json::Value>,
    pub accepted_items_count: Option<serde_json::Value>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_profile_defaults() {
        let profile = UserProfile::new("u-1", "Ada Lovelace");
        assert_eq!(profile.performance, Percentage::FULL);
        assert_eq!(profile.current_workload, Percentage::ZERO);
        assert_eq!(profile.accepted_items_count, 0);
    }

    #[test]
    fn test_skills_list() {
        let mut profile = UserProfile::new("u-1", "Ada Lovelace");
        assert!(profile.skills_list().is_empty());

        profile.skills = Some("rust, sql,, ops ".into());
        assert_eq!(profile.skills_list(), vec!["rust", "sql", "ops"]);
    }

    #[test]
    fn test_negative_experience_is_invalid() {
        let mut profile = UserProfile::new("u-1", "Ada Lovelace");
        profile.experience_years = -1;
        assert!(profile.validate().is_err());
    }
}
