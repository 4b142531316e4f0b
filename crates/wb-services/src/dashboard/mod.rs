//! Role-scoped dashboards
//!
//! Both dashboards are projections over one snapshot of the store read in a
//! single transaction that is never committed. The aggregation itself is a set
//! of pure functions over that snapshot, so it is tested without a store.

mod employee;
mod manager;

pub use employee::{EmployeeDashboard, UpcomingDeadline};
pub use manager::{ManagerDashboard, TeamMember};

use chrono::{DateTime, Utc};
use serde::Serialize;
use wb_contracts::UserContext;
use wb_core::error::WbError;
use wb_core::result::WbResult;
use wb_db::WorkItemFilter;
use wb_models::{permissions, UserProfile, WorkItem, WorkItemStatus};

use crate::base::ServiceContext;

/// Work item counts for every status, zeros included
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct StatusCounts {
    pub to_do: usize,
    pub in_progress: usize,
    pub review: usize,
    pub done: usize,
    pub rejected: usize,
}

impl StatusCounts {
    pub fn tally<'a, I: IntoIterator<Item = &'a WorkItem>>(items: I) -> Self {
        let mut counts = Self::default();
        for item in items {
            *counts.slot(item.status) += 1;
        }
        counts
    }

    fn slot(&mut self, status: WorkItemStatus) -> &mut usize {
        match status {
            WorkItemStatus::ToDo => &mut self.to_do,
            WorkItemStatus::InProgress => &mut self.in_progress,
            WorkItemStatus::Review => &mut self.review,
            WorkItemStatus::Done => &mut self.done,
            WorkItemStatus::Rejected => &mut self.rejected,
        }
    }

    pub fn get(&self, status: WorkItemStatus) -> usize {
        match status {
            WorkItemStatus::ToDo => self.to_do,
            WorkItemStatus::InProgress => self.in_progress,
            WorkItemStatus::Review => self.review,
            WorkItemStatus::Done => self.done,
            WorkItemStatus::Rejected => self.rejected,
        }
    }

    pub fn total(&self) -> usize {
        WorkItemStatus::ALL.iter().map(|status| self.get(*status)).sum()
    }
}

/// Counts shared by both dashboards
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkItemSummary {
    pub total_work_items: usize,
    pub work_items_by_status: StatusCounts,
    /// Open and past the deadline
    pub overdue_work_items: usize,
    /// Open and due within the configured window
    pub due_soon_work_items: usize,
}

impl WorkItemSummary {
    pub fn of(items: &[WorkItem], now: DateTime<Utc>, due_soon_days: i64) -> Self {
        Self {
            total_work_items: items.len(),
            work_items_by_status: StatusCounts::tally(items),
            overdue_work_items: items.iter().filter(|item| item.is_overdue(now)).count(),
            due_soon_work_items: items
                .iter()
                .filter(|item| item.is_due_soon(now, due_soon_days))
                .count(),
        }
    }
}

pub struct DashboardService<'a, U: UserContext> {
    ctx: ServiceContext<'a, U>,
}

impl<'a, U: UserContext> DashboardService<'a, U> {
    pub fn new(ctx: ServiceContext<'a, U>) -> Self {
        Self { ctx }
    }

    /// Team-wide view; managers and admins only
    pub async fn manager(&self) -> WbResult<ManagerDashboard> {
        if !self.ctx.user.allowed(permissions::VIEW_TEAM_DASHBOARD) {
            return Err(WbError::forbidden("You are not authorized to view the team dashboard"));
        }

        let mut tx = self.ctx.store.begin().await?;
        let projects = tx.all_projects().await?;
        let items = tx.work_items(&WorkItemFilter::all()).await?;
        let profiles = tx.all_profiles().await?;
        drop(tx);

        Ok(manager::aggregate(
            &projects,
            &items,
            &profiles,
            self.ctx.now(),
            &self.ctx.settings.dashboard,
        ))
    }

    /// The acting user's own assignments
    pub async fn employee(&self) -> WbResult<EmployeeDashboard> {
        let user_id = self.ctx.user.id();

        let mut tx = self.ctx.store.begin().await?;
        let items = tx.work_items(&WorkItemFilter::assigned_to(user_id)).await?;
        let profile = tx.find_profile(user_id).await?;
        drop(tx);

        let profile = profile.unwrap_or_else(|| {
            tracing::debug!(user_id, "No profile, using defaults for dashboard");
            UserProfile::new(user_id, user_id)
        });
        Ok(employee::aggregate(
            &profile,
            &items,
            self.ctx.now(),
            &self.ctx.settings.dashboard,
        ))
    }
}
