//! Project model
//!
//! Table: projects

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;
use wb_core::traits::{Entity, Id, Identifiable, Timestamped, UserId};
use wb_core::types::DateRange;

use crate::priority::Priority;
use crate::status::ProjectStatus;

/// Project entity
///
/// A project owns its work items; deleting it removes them as well.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: Option<Id>,

    #[validate(length(min = 1, max = 200, message = "must be between 1 and 200 characters"))]
    pub name: String,

    pub description: Option<String>,

    pub start_date: NaiveDate,

    pub deadline: NaiveDate,

    /// Free-text requirements
    pub requirements: Option<String>,

    #[serde(default)]
    pub priority: Priority,

    #[serde(default)]
    pub status: ProjectStatus,

    pub created_by_id: UserId,

    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl Identifiable for Project {
    fn id(&self) -> Option<Id> {
        self.id
    }
}

impl Timestamped for Project {
    fn created_at(&self) -> Option<DateTime<Utc>> {
        self.created_at
    }

    fn updated_at(&self) -> Option<DateTime<Utc>> {
        self.updated_at
    }
}

impl Entity for Project {
    const TABLE_NAME: &'static str = "projects";
    const TYPE_NAME: &'static str = "Project";
}

impl Project {
    /// Create a new project with minimal required fields
    pub fn new(
        name: impl Into<String>,
        start_date: NaiveDate,
        deadline: NaiveDate,
        created_by_id: impl Into<UserId>,
    ) -> Self {
        Self {
            id: None,
            name: name.into(),
            description: None,
            start_date,
            deadline,
            requirements: None,
            priority: Priority::default(),
            status: ProjectStatus::default(),
            created_by_id: created_by_id.into(),
            created_at: None,
            updated_at: None,
        }
    }

    pub fn is_active(&self) -> bool {
        self.status == ProjectStatus::Active
    }

    pub fn is_closed(&self) -> bool {
        self.status == ProjectStatus::Closed
    }

    pub fn schedule(&self) -> DateRange {
        DateRange::new(self.start_date, self.deadline)
    }
}

/// DTO for creating a new project
///
/// Literal fields stay strings until the contract layer parses them.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct CreateProjectDto {
    pub name: String,
    pub description: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub deadline: Option<NaiveDate>,
    pub requirements: Option<String>,
    pub priority: Option<String>,
    pub status: Option<String>,
}

/// DTO for updating a project
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProjectDto {
    pub name: Option<String>,
    pub description: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub deadline: Option<NaiveDate>,
    pub requirements: Option<String>,
    pub priority: Option<String>,
    pub status: Option<String>,
}

impl UpdateProjectDto {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.description.is_none()
            && self.start_date.is_none()
            && self.deadline.is_none()
            && self.requirements.is_none()
            && self.priority.is_none()
            && self.status.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_project_new() {
        let project = Project::new("Apollo", date(2024, 1, 1), date(2024, 2, 1), "u-1");
        assert_eq!(project.name, "Apollo");
        assert_eq!(project.priority, Priority::Medium);
        assert!(project.is_active());
        assert!(project.is_new_record());
        assert_eq!(project.schedule().duration_days(), 31);
    }

    #[test]
    fn test_name_length_is_validated() {
        let project = Project::new("x".repeat(201), date(2024, 1, 1), date(2024, 2, 1), "u-1");
        assert!(project.validate().is_err());

        let project = Project::new("x".repeat(200), date(2024, 1, 1), date(2024, 2, 1), "u-1");
        assert!(project.validate().is_ok());
    }

    #[test]
    fn test_create_dto_reads_camel_case() {
        let dto: CreateProjectDto = serde_json::from_value(serde_json::json!({
            "name": "Apollo",
            "startDate": "2024-01-01",
            "deadline": "2024-02-01",
            "priority": "Major"
        }))
        .unwrap();
        assert_eq!(dto.start_date, Some(date(2024, 1, 1)));
        assert_eq!(dto.priority.as_deref(), Some("Major"));
    }
}
