use std::cmp::Ordering;

use chrono::{DateTime, Utc};
use serde::Serialize;
use wb_core::config::DashboardConfig;
use wb_core::types::Percentage;
use wb_core::traits::UserId;
use wb_models::{Project, UserProfile, WorkItem};

use super::WorkItemSummary;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamMember {
    pub user_id: UserId,
    pub full_name: String,
    pub performance: Percentage,
    pub current_workload: Percentage,
    pub accepted_items_count: i32,
    pub open_work_items: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ManagerDashboard {
    pub total_projects: usize,
    pub active_projects: usize,
    pub closed_projects: usize,
    #[serde(flatten)]
    pub work_items: WorkItemSummary,
    /// Every profile counts, managers and admins included, since any of
    /// them can hold assignments
    pub team_size: usize,
    /// `None` for an empty team
    pub average_performance: Option<Percentage>,
    pub average_workload: Option<Percentage>,
    /// Best performers first
    pub team_members: Vec<TeamMember>,
}

pub(super) fn aggregate(
    projects: &[Project],
    items: &[WorkItem],
    profiles: &[UserProfile],
    now: DateTime<Utc>,
    config: &DashboardConfig,
) -> ManagerDashboard {
    let mut team_members: Vec<TeamMember> = profiles
        .iter()
        .map(|profile| TeamMember {
            user_id: profile.user_id.clone(),
            full_name: profile.full_name.clone(),
            performance: profile.performance,
            current_workload: profile.current_workload,
            accepted_items_count: profile.accepted_items_count,
            open_work_items: items
                .iter()
                .filter(|item| item.is_open() && item.is_assigned_to(&profile.user_id))
                .count(),
        })
        .collect();
    team_members.sort_by(|a, b| match b.performance.cmp(&a.performance) {
        Ordering::Equal => a.user_id.cmp(&b.user_id),
        other => other,
    });

    ManagerDashboard {
        total_projects: projects.len(),
        active_projects: projects.iter().filter(|p| p.is_active()).count(),
        closed_projects: projects.iter().filter(|p| p.is_closed()).count(),
        work_items: WorkItemSummary::of(items, now, config.due_soon_days),
        team_size: profiles.len(),
        average_performance: Percentage::mean(profiles.iter().map(|p| p.performance)),
        average_workload: Percentage::mean(profiles.iter().map(|p| p.current_workload)),
        team_members,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dashboard::fixture;
    use rust_decimal_macros::dec;

    fn profile(user_id: &str, performance: Percentage, workload: Percentage) -> UserProfile {
        let mut profile = UserProfile::new(user_id, user_id.to_uppercase());
        profile.performance = performance;
        profile.current_workload = workload;
        profile
    }

    #[test]
    fn test_fixture_counts() {
        let profiles = vec![
            profile("u-1", Percentage::new(dec!(80)), Percentage::new(dec!(40))),
            profile("u-2", Percentage::new(dec!(90)), Percentage::new(dec!(20))),
        ];
        let dashboard = aggregate(
            &fixture::projects(),
            &fixture::work_items(),
            &profiles,
            fixture::now(),
            &DashboardConfig::default(),
        );

        assert_eq!(dashboard.total_projects, 3);
        assert_eq!(dashboard.active_projects, 2);
        assert_eq!(dashboard.closed_projects, 1);
        assert_eq!(dashboard.work_items.total_work_items, 10);
        let by_status = dashboard.work_items.work_items_by_status;
        assert_eq!(
            (by_status.done, by_status.in_progress, by_status.to_do, by_status.review),
            (4, 3, 2, 1)
        );
        assert_eq!(dashboard.team_size, 2);
        assert_eq!(dashboard.average_performance, Some(Percentage::new(dec!(85))));
        assert_eq!(dashboard.average_workload, Some(Percentage::new(dec!(30))));
    }

    #[test]
    fn test_team_sorted_by_performance() {
        let profiles = vec![
            profile("u-1", Percentage::new(dec!(70)), Percentage::ZERO),
            profile("u-3", Percentage::FULL, Percentage::ZERO),
            profile("u-2", Percentage::FULL, Percentage::ZERO),
        ];
        let dashboard = aggregate(
            &[],
            &fixture::work_items(),
            &profiles,
            fixture::now(),
            &DashboardConfig::default(),
        );

        let order: Vec<&str> = dashboard.team_members.iter().map(|m| m.user_id.as_str()).collect();
        assert_eq!(order, vec!["u-2", "u-3", "u-1"]);
        // u-1 has two InProgress, one ToDo and one Review item open
        assert_eq!(dashboard.team_members[2].open_work_items, 4);
    }

    #[test]
    fn test_team_includes_every_profile_with_work() {
        let mut items = fixture::work_items();
        // the Review item
        items[9].assigned_to_id = "m-1".into();
        let profiles = vec![
            profile("u-1", Percentage::FULL, Percentage::ZERO),
            profile("m-1", Percentage::new(dec!(60)), Percentage::new(dec!(10))),
        ];
        let dashboard = aggregate(&[], &items, &profiles, fixture::now(), &DashboardConfig::default());

        assert_eq!(dashboard.team_size, 2);
        let manager = dashboard
            .team_members
            .iter()
            .find(|m| m.user_id == "m-1")
            .unwrap();
        assert_eq!(manager.open_work_items, 1);
        assert_eq!(dashboard.average_performance, Some(Percentage::new(dec!(80))));
    }

    #[test]
    fn test_empty_team_has_no_averages() {
        let dashboard = aggregate(&[], &[], &[], fixture::now(), &DashboardConfig::default());
        assert_eq!(dashboard.average_performance, None);

        let json = serde_json::to_value(&dashboard).unwrap();
        assert_eq!(json["totalWorkItems"], 0);
        assert!(json["averagePerformance"].is_null());
        assert!(json["workItemsByStatus"].is_object());
    }
}
