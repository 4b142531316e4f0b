//! Attribute assignment for work items
//!
//! Literal fields arrive as strings; a bad literal becomes a field error here
//! and the entity keeps its previous value.

use chrono::{DateTime, Utc};
use wb_contracts::{parse_attribute, ChangeTracker};
use wb_core::error::ValidationErrors;
use wb_models::{CreateWorkItemDto, Priority, UpdateWorkItemDto, WorkItem, WorkItemStatus};

/// Build a new item from `dto`, created by `author` at `now`
pub fn build(dto: &CreateWorkItemDto, author: &str, now: DateTime<Utc>) -> (WorkItem, ValidationErrors) {
    let mut errors = ValidationErrors::new();
    let mut item = WorkItem::new(
        dto.name.trim(),
        dto.project_id.unwrap_or_default(),
        dto.assigned_to_id.clone().unwrap_or_default(),
        author,
        now,
    );

    item.description = dto.description.clone();
    item.comments = dto.comments.clone();
    if let Some(deadline) = dto.deadline {
        item.deadline = deadline;
    }
    if let Some(ref raw) = dto.priority {
        if let Some(priority) = parse_attribute::<Priority>("priority", raw, &mut errors) {
            item.priority = priority;
        }
    }
    if let Some(ref raw) = dto.status {
        if let Some(status) = parse_attribute::<WorkItemStatus>("status", raw, &mut errors) {
            item.status = status;
        }
    }

    (item, errors)
}

/// Apply `dto` to `item`, recording every attribute whose value changes
pub fn apply(item: &mut WorkItem, dto: &UpdateWorkItemDto, changes: &mut ChangeTracker) -> ValidationErrors {
    let mut errors = ValidationErrors::new();

    if let Some(ref name) = dto.name {
        let name = name.trim();
        if item.name != name {
            item.name = name.to_string();
            changes.mark_changed("name");
        }
    }
    if dto.description.is_some() && item.description != dto.description {
        item.description = dto.description.clone();
        changes.mark_changed("description");
    }
    if dto.comments.is_some() && item.comments != dto.comments {
        item.comments = dto.comments.clone();
        changes.mark_changed("comments");
    }
    if let Some(deadline) = dto.deadline {
        if item.deadline != deadline {
            item.deadline = deadline;
            changes.mark_changed("deadline");
        }
    }
    if let Some(ref assignee) = dto.assigned_to_id {
        if &item.assigned_to_id != assignee {
            item.assigned_to_id = assignee.clone();
            changes.mark_changed("assigned_to_id");
        }
    }
    if let Some(ref raw) = dto.priority {
        if let Some(priority) = parse_attribute::<Priority>("priority", raw, &mut errors) {
            if item.priority != priority {
                item.priority = priority;
                changes.mark_changed("priority");
            }
        }
    }
    // Only the transition endpoint moves an item through its lifecycle
    if dto.status.is_some() {
        changes.mark_changed("status");
    }

    errors
}
