use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::Serialize;
use wb_core::config::DashboardConfig;
use wb_core::traits::Id;
use wb_core::types::Percentage;
use wb_models::{Priority, UserProfile, WorkItem, WorkItemStatus};

use super::WorkItemSummary;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpcomingDeadline {
    pub id: Option<Id>,
    pub name: String,
    pub project_id: Id,
    pub priority: Priority,
    pub status: WorkItemStatus,
    pub deadline: DateTime<Utc>,
}

impl From<&WorkItem> for UpcomingDeadline {
    fn from(item: &WorkItem) -> Self {
        Self {
            id: item.id,
            name: item.name.clone(),
            project_id: item.project_id,
            priority: item.priority,
            status: item.status,
            deadline: item.deadline,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeDashboard {
    #[serde(flatten)]
    pub work_items: WorkItemSummary,
    pub projects_involved: usize,
    pub performance: Percentage,
    pub current_workload: Percentage,
    pub accepted_items_count: i32,
    /// Open items not yet past their deadline, soonest first
    pub upcoming_deadlines: Vec<UpcomingDeadline>,
}

/// `items` are the profile owner's assignments
pub(super) fn aggregate(
    profile: &UserProfile,
    items: &[WorkItem],
    now: DateTime<Utc>,
    config: &DashboardConfig,
) -> EmployeeDashboard {
    let projects: BTreeSet<Id> = items.iter().map(|item| item.project_id).collect();

    let mut upcoming: Vec<&WorkItem> = items
        .iter()
        .filter(|item| item.is_open() && item.deadline >= now)
        .collect();
    upcoming.sort_by_key(|item| (item.deadline, item.id));
    upcoming.truncate(config.upcoming_limit);

    EmployeeDashboard {
        work_items: WorkItemSummary::of(items, now, config.due_soon_days),
        projects_involved: projects.len(),
        performance: profile.performance,
        current_workload: profile.current_workload,
        accepted_items_count: profile.accepted_items_count,
        upcoming_deadlines: upcoming.into_iter().map(UpcomingDeadline::from).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dashboard::fixture;

    fn own_items(user_id: &str) -> Vec<WorkItem> {
        fixture::work_items()
            .into_iter()
            .filter(|item| item.is_assigned_to(user_id))
            .collect()
    }

    #[test]
    fn test_counts_are_self_scoped() {
        let mut profile = UserProfile::new("u-1", "Ada");
        profile.accepted_items_count = 2;
        let dashboard = aggregate(
            &profile,
            &own_items("u-1"),
            fixture::now(),
            &DashboardConfig::default(),
        );

        assert_eq!(dashboard.work_items.total_work_items, 6);
        assert_eq!(dashboard.work_items.work_items_by_status.done, 2);
        assert_eq!(dashboard.work_items.overdue_work_items, 1);
        assert_eq!(dashboard.projects_involved, 2);
        assert_eq!(dashboard.accepted_items_count, 2);
    }

    #[test]
    fn test_upcoming_deadlines_skip_overdue_and_respect_limit() {
        let profile = UserProfile::new("u-1", "Ada");
        let config = DashboardConfig {
            upcoming_limit: 2,
            ..DashboardConfig::default()
        };
        let dashboard = aggregate(&profile, &own_items("u-1"), fixture::now(), &config);

        let names: Vec<&str> = dashboard
            .upcoming_deadlines
            .iter()
            .map(|item| item.name.as_str())
            .collect();
        // Item 10 is due in 10 hours, item 6 in 30; item 5 is already overdue
        assert_eq!(names, vec!["Item 10", "Item 6"]);
    }

    #[test]
    fn test_serializes_flat() {
        let profile = UserProfile::new("u-2", "Grace");
        let dashboard = aggregate(
            &profile,
            &own_items("u-2"),
            fixture::now(),
            &DashboardConfig::default(),
        );
        let json = serde_json::to_value(&dashboard).unwrap();
        assert_eq!(json["totalWorkItems"], 4);
        assert_eq!(json["projectsInvolved"], 2);
        assert_eq!(json["performance"], 100.0);
        assert_eq!(json["upcomingDeadlines"].as_array().map(Vec::len), Some(2));
    }
}
