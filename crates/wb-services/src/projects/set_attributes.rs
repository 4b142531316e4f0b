//! Attribute assignment for projects

use chrono::NaiveDate;
use wb_contracts::{parse_attribute, ChangeTracker};
use wb_core::error::ValidationErrors;
use wb_models::{CreateProjectDto, Priority, Project, ProjectStatus, UpdateProjectDto};

/// New project from `dto`; the start date defaults to `today`, the deadline
/// has no default
pub fn build(dto: &CreateProjectDto, author: &str, today: NaiveDate) -> (Project, ValidationErrors) {
    let mut errors = ValidationErrors::new();
    let start_date = dto.start_date.unwrap_or(today);
    let deadline = match dto.deadline {
        Some(deadline) => deadline,
        None => {
            errors.add("deadline", "can't be blank");
            start_date
        }
    };

    let mut project = Project::new(dto.name.trim(), start_date, deadline, author);
    project.description = dto.description.clone();
    project.requirements = dto.requirements.clone();
    if let Some(ref raw) = dto.priority {
        if let Some(priority) = parse_attribute::<Priority>("priority", raw, &mut errors) {
            project.priority = priority;
        }
    }
    if let Some(ref raw) = dto.status {
        if let Some(status) = parse_attribute::<ProjectStatus>("status", raw, &mut errors) {
            project.status = status;
        }
    }

    (project, errors)
}

pub fn apply(project: &mut Project, dto: &UpdateProjectDto, changes: &mut ChangeTracker) -> ValidationErrors {
    let mut errors = ValidationErrors::new();

    if let Some(ref name) = dto.name {
        let name = name.trim();
        if project.name != name {
            project.name = name.to_string();
            changes.mark_changed("name");
        }
    }
    if dto.description.is_some() && project.description != dto.description {
        project.description = dto.description.clone();
        changes.mark_changed("description");
    }
    if dto.requirements.is_some() && project.requirements != dto.requirements {
        project.requirements = dto.requirements.clone();
        changes.mark_changed("requirements");
    }
    if let Some(start_date) = dto.start_date {
        if project.start_date != start_date {
            project.start_date = start_date;
            changes.mark_changed("start_date");
        }
    }
    if let Some(deadline) = dto.deadline {
        if project.deadline != deadline {
            project.deadline = deadline;
            changes.mark_changed("deadline");
        }
    }
    if let Some(ref raw) = dto.priority {
        if let Some(priority) = parse_attribute::<Priority>("priority", raw, &mut errors) {
            if project.priority != priority {
                project.priority = priority;
                changes.mark_changed("priority");
            }
        }
    }
    if let Some(ref raw) = dto.status {
        if let Some(status) = parse_attribute::<ProjectStatus>("status", raw, &mut errors) {
            if project.status != status {
                project.status = status;
                changes.mark_changed("status");
            }
        }
    }

    errors
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, month, day).unwrap()
    }

    #[test]
    fn test_build_requires_deadline() {
        let dto = CreateProjectDto {
            name: "Apollo".into(),
            ..CreateProjectDto::default()
        };
        let (project, errors) = build(&dto, "m-1", day(1, 5));
        assert!(errors.has_error("deadline"));
        assert_eq!(project.start_date, day(1, 5));
    }

    #[test]
    fn test_build_parses_literals() {
        let dto = CreateProjectDto {
            name: "Apollo".into(),
            start_date: Some(day(1, 1)),
            deadline: Some(day(2, 1)),
            priority: Some("Critical".into()),
            status: Some("Paused".into()),
            ..CreateProjectDto::default()
        };
        let (project, errors) = build(&dto, "m-1", day(1, 5));
        assert_eq!(project.priority, Priority::Critical);
        assert_eq!(project.status, ProjectStatus::Active);
        assert!(errors.has_error("status"));
    }

    #[test]
    fn test_apply_closes_project() {
        let mut project = Project::new("Apollo", day(1, 1), day(2, 1), "m-1");
        let mut changes = ChangeTracker::new();
        let dto = UpdateProjectDto {
            status: Some("Closed".into()),
            ..UpdateProjectDto::default()
        };
        assert!(apply(&mut project, &dto, &mut changes).is_empty());
        assert!(project.is_closed());
        assert!(changes.is_changed("status"));
    }
}
