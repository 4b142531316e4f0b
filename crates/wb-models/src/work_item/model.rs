//! Work item model
//!
//! Table: work_items

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;
use wb_core::traits::{Entity, Id, Identifiable, Lockable, ProjectScoped, Timestamped, UserId};

use crate::priority::Priority;
use crate::status::WorkItemStatus;

/// Days between creation and the default deadline
pub const DEFAULT_DEADLINE_DAYS: i64 = 7;

/// Work item entity
#[derive(Debug, Clone, Serialize, Deserialize, Validate, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WorkItem {
    pub id: Option<Id>,

    #[validate(length(min = 1, max = 200, message = "must be between 1 and 200 characters"))]
    pub name: String,

    pub description: Option<String>,

    #[serde(default)]
    pub priority: Priority,

    #[serde(default)]
    pub status: WorkItemStatus,

    pub deadline: DateTime<Utc>,

    /// Reviewer remarks
    pub comments: Option<String>,

    pub project_id: Id,

    pub assigned_to_id: UserId,

    pub created_by_id: UserId,

    /// Set on entering `Done`, cleared on leaving it
    pub completed_at: Option<DateTime<Utc>>,

    pub lock_version: i32,

    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl Identifiable for WorkItem {
    fn id(&self) -> Option<Id> {
        self.id
    }
}

impl Timestamped for WorkItem {
    fn created_at(&self) -> Option<DateTime<Utc>> {
        self.created_at
    }

    fn updated_at(&self) -> Option<DateTime<Utc>> {
        self.updated_at
    }
}

impl Lockable for WorkItem {
    fn lock_version(&self) -> i32 {
        self.lock_version
    }
}

impl ProjectScoped for WorkItem {
    fn project_id(&self) -> Option<Id> {
        Some(self.project_id)
    }
}

impl Entity for WorkItem {
    const TABLE_NAME: &'static str = "work_items";
    const TYPE_NAME: &'static str = "WorkItem";
}

impl WorkItem {
    /// New item created at `now` with the default deadline
    pub fn new(
        name: impl Into<String>,
        project_id: Id,
        assigned_to_id: impl Into<UserId>,
        created_by_id: impl Into<UserId>,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: None,
            name: name.into(),
            description: None,
            priority: Priority::default(),
            status: WorkItemStatus::default(),
            deadline: Self::default_deadline(now),
            comments: None,
            project_id,
            assigned_to_id: assigned_to_id.into(),
            created_by_id: created_by_id.into(),
            completed_at: None,
            lock_version: 0,
            created_at: Some(now),
            updated_at: Some(now),
        }
    }

    pub fn default_deadline(created_at: DateTime<Utc>) -> DateTime<Utc> {
        created_at + Duration::days(DEFAULT_DEADLINE_DAYS)
    }

    pub fn is_open(&self) -> bool {
        self.status.is_open()
    }

    pub fn is_assigned_to(&self, user_id: &str) -> bool {
        self.assigned_to_id == user_id
    }

    /// Open and past its deadline
    pub fn is_overdue(&self, now: DateTime<Utc>) -> bool {
        self.is_open() && self.deadline < now
    }

    /// Open and due within `days` from `now`, inclusive
    pub fn is_due_soon(&self, now: DateTime<Utc>, days: i64) -> bool {
        self.is_open() && self.deadline >= now && self.deadline <= now + Duration::days(days)
    }

    /// `None` until the item is done
    pub fn completed_on_time(&self) -> Option<bool> {
        match (self.status, self.completed_at) {
            (WorkItemStatus::Done, Some(completed_at)) => Some(completed_at <= self.deadline),
            _ => None,
        }
    }

    /// Move to `status` at `now`, keeping `completed_at` in step
    pub fn apply_status(&mut self, status: WorkItemStatus, now: DateTime<Utc>) {
        self.status = status;
        self.completed_at = match status {
            WorkItemStatus::Done => Some(now),
            _ => None,
        };
        self.updated_at = Some(now);
    }
}

/// DTO for creating a work item
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct CreateWorkItemDto {
    pub name: String,
    pub description: Option<String>,
    pub priority: Option<String>,
    pub status: Option<String>,
    /// Defaults to seven days after creation
    pub deadline: Option<DateTime<Utc>>,
    pub comments: Option<String>,
    pub project_id: Option<Id>,
    pub assigned_to_id: Option<UserId>,
}

/// DTO for updating work item attributes; status changes go through [`TransitionDto`]
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct UpdateWorkItemDto {
    pub name: Option<String>,
    pub description: Option<String>,
    pub priority: Option<String>,
    pub deadline: Option<DateTime<Utc>>,
    pub comments: Option<String>,
    pub assigned_to_id: Option<UserId>,
    /// Present only so a stray `status` can be reported as not writable
    pub status: Option<String>,
    pub lock_version: Option<i32>,
}

/// Body of a lifecycle transition request
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransitionDto {
    pub status: String,
    /// Row version the client last saw; required so a lost race is
    /// reported as a conflict
    pub lock_version: i32,
    pub comments: Option<String>,
}
