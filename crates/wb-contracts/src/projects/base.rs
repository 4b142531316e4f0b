//! Base contract for projects

use wb_core::error::ValidationErrors;
use wb_models::Project;

use crate::base::{validate_derived, validate_presence, Contract, ValidationResult};

/// Attribute checks shared by create and update
#[derive(Debug, Default, Clone, Copy)]
pub struct ProjectBaseContract;

impl ProjectBaseContract {
    pub fn new() -> Self {
        Self
    }

    pub fn validate_name(&self, project: &Project, errors: &mut ValidationErrors) {
        validate_presence("name", &project.name, errors);
    }

    /// The deadline may not precede the start date
    pub fn validate_schedule(&self, project: &Project, errors: &mut ValidationErrors) {
        if !project.schedule().is_ordered() {
            errors.add("deadline", "must be on or after the start date");
        }
    }
}

impl Contract<Project> for ProjectBaseContract {
    fn validate(&self, project: &Project) -> ValidationResult {
        let mut errors = ValidationErrors::new();

        validate_derived(project, &mut errors);
        self.validate_name(project, &mut errors);
        self.validate_schedule(project, &mut errors);

        errors.into_result()
    }
}
