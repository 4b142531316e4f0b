//! Base contract for work items

use wb_core::error::ValidationErrors;
use wb_models::WorkItem;

use crate::base::{validate_derived, validate_presence, Contract, ValidationResult};

/// Attribute checks shared by create and update
#[derive(Debug, Default, Clone, Copy)]
pub struct WorkItemBaseContract;

impl WorkItemBaseContract {
    pub fn new() -> Self {
        Self
    }

    pub fn validate_project(&self, item: &WorkItem, errors: &mut ValidationErrors) {
        if item.project_id <= 0 {
            errors.add("project_id", "can't be blank");
        }
    }
}

impl Contract<WorkItem> for WorkItemBaseContract {
    fn validate(&self, item: &WorkItem) -> ValidationResult {
        let mut errors = ValidationErrors::new();

        validate_derived(item, &mut errors);
        validate_presence("name", &item.name, &mut errors);
        validate_presence("assigned_to_id", &item.assigned_to_id, &mut errors);
        self.validate_project(item, &mut errors);

        errors.into_result()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn item(name: &str, project_id: i64, assignee: &str) -> WorkItem {
        let now = Utc.with_ymd_and_hms(2024, 1, 1, 9, 0, 0).unwrap();
        WorkItem::new(name, project_id, assignee, "m-1", now)
    }

    #[test]
    fn test_valid_item() {
        assert!(WorkItemBaseContract::new().validate(&item("Write docs", 1, "u-1")).is_ok());
    }

    #[test]
    fn test_missing_fields() {
        let errors = WorkItemBaseContract::new()
            .validate(&item("", 0, " "))
            .unwrap_err();
        assert!(errors.has_error("name"));
        assert!(errors.has_error("project_id"));
        assert!(errors.has_error("assigned_to_id"));
    }

    #[test]
    fn test_name_over_200_characters() {
        let errors = WorkItemBaseContract::new()
            .validate(&item(&"é".repeat(201), 1, "u-1"))
            .unwrap_err();
        assert!(errors.has_error("name"));
        assert!(WorkItemBaseContract::new()
            .validate(&item(&"é".repeat(200), 1, "u-1"))
            .is_ok());
    }
}
