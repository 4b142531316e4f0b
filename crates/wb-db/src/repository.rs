//! Repository error, pagination and filter types shared by every store

use chrono::{DateTime, Utc};
use wb_core::error::WbError;
use wb_core::pagination::PaginationParams;
use wb_core::traits::{Id, UserId};
use wb_models::{WorkItem, WorkItemStatus};

/// Error type for repository operations
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Optimistic lock failure or uniqueness violation
    #[error("Conflict: {0}")]
    Conflict(String),

    /// A stored row no longer maps onto the model
    #[error("Corrupt row: {0}")]
    Corrupt(String),

    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

impl RepositoryError {
    pub fn not_found(entity: &'static str, id: impl ToString) -> Self {
        RepositoryError::NotFound {
            entity,
            id: id.to_string(),
        }
    }
}

/// Result type for repository operations
pub type RepositoryResult<T> = Result<T, RepositoryError>;

impl From<RepositoryError> for WbError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound { entity, id } => WbError::not_found(entity, "id", id),
            RepositoryError::Conflict(message) => WbError::Conflict { message },
            RepositoryError::Database(e) => WbError::DataAccess(e.to_string()),
            RepositoryError::Unavailable(message) => WbError::DataAccess(message),
            RepositoryError::Corrupt(message) => WbError::Internal(message),
        }
    }
}

/// Pagination parameters for queries
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub limit: i64,
    pub offset: i64,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            limit: 20,
            offset: 0,
        }
    }
}

impl Pagination {
    pub fn new(limit: i64, offset: i64) -> Self {
        Self { limit, offset }
    }

    /// Slice an already ordered collection
    pub fn apply<T: Clone>(&self, items: &[T]) -> Vec<T> {
        items
            .iter()
            .skip(self.offset.max(0) as usize)
            .take(self.limit.max(0) as usize)
            .cloned()
            .collect()
    }
}

impl From<PaginationParams> for Pagination {
    fn from(params: PaginationParams) -> Self {
        Self::new(params.limit(), params.offset())
    }
}

/// Query result with pagination metadata
#[derive(Debug, Clone)]
pub struct PaginatedResult<T> {
    pub items: Vec<T>,
    pub total: i64,
    pub limit: i64,
    pub offset: i64,
}

impl<T> PaginatedResult<T> {
    pub fn new(items: Vec<T>, total: i64, pagination: Pagination) -> Self {
        Self {
            items,
            total,
            limit: pagination.limit,
            offset: pagination.offset,
        }
    }

    pub fn has_next(&self) -> bool {
        self.offset + self.limit < self.total
    }

    pub fn map<U, F: FnMut(T) -> U>(self, f: F) -> PaginatedResult<U> {
        PaginatedResult {
            items: self.items.into_iter().map(f).collect(),
            total: self.total,
            limit: self.limit,
            offset: self.offset,
        }
    }
}

/// Range query over work items; every set field must match
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WorkItemFilter {
    pub project_id: Option<Id>,
    pub assigned_to_id: Option<UserId>,
    pub status: Option<WorkItemStatus>,
    /// Only `ToDo`, `InProgress` and `Review`
    pub open_only: bool,
    /// Exclusive upper bound
    pub deadline_before: Option<DateTime<Utc>>,
    /// Inclusive lower bound
    pub deadline_after: Option<DateTime<Utc>>,
}

impl WorkItemFilter {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn for_project(project_id: Id) -> Self {
        Self {
            project_id: Some(project_id),
            ..Self::default()
        }
    }

    pub fn assigned_to(user_id: impl Into<UserId>) -> Self {
        Self {
            assigned_to_id: Some(user_id.into()),
            ..Self::default()
        }
    }

    pub fn open(mut self) -> Self {
        self.open_only = true;
        self
    }

    pub fn matches(&self, item: &WorkItem) -> bool {
        self.project_id.map_or(true, |id| item.project_id == id)
            && self
                .assigned_to_id
                .as_deref()
                .map_or(true, |id| item.assigned_to_id == id)
            && self.status.map_or(true, |status| item.status == status)
            && (!self.open_only || item.is_open())
            && self.deadline_before.map_or(true, |before| item.deadline < before)
            && self.deadline_after.map_or(true, |after| item.deadline >= after)
    }
}
