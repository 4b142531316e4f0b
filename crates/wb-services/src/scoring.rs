//! Performance and workload scoring
//!
//! Performance moves by a fixed delta when a reviewer decides on an item:
//!
//! | decision                     | performance          | accepted items |
//! |------------------------------|----------------------|----------------|
//! | Review -> Done, on time      | `+on_time_bonus`     | +1             |
//! | Review -> Done, late         | `-late_penalty`      | +1             |
//! | Review -> InProgress         | `-changes_requested` |                |
//! | Review -> Rejected           | `-rejection_penalty` |                |
//!
//! Workload is recomputed from scratch over the user's open items:
//! `sum(weight(priority) * overdue) / capacity * 100`, where `overdue` is
//! `overdue_factor` for items past their deadline and 1 otherwise.
//! Both values are clamped to `[0, 100]` by [`Percentage`].

use chrono::{DateTime, Utc};
use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;
use wb_core::config::ScoringConfig;
use wb_core::result::WbResult;
use wb_core::types::Percentage;
use wb_db::{StoreTx, WorkItemFilter};
use wb_models::{UserProfile, WorkItem, WorkItemStatus};

/// Performance change caused by one review decision
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Adjustment {
    pub performance: Decimal,
    pub accepted: bool,
    pub reason: &'static str,
}

pub struct Scorer<'a> {
    config: &'a ScoringConfig,
}

/// Config values are checked finite by `AppConfig::validate`
fn decimal(value: f64) -> Decimal {
    Decimal::from_f64(value).unwrap_or(Decimal::ZERO)
}

impl<'a> Scorer<'a> {
    pub fn new(config: &'a ScoringConfig) -> Self {
        Self { config }
    }

    /// Adjustment for `item` having just left `from`; `None` unless a reviewer decided
    pub fn adjustment(&self, from: WorkItemStatus, item: &WorkItem) -> Option<Adjustment> {
        if !from.is_review_decision(item.status) {
            return None;
        }
        let adjustment = match item.status {
            WorkItemStatus::Done => match item.completed_on_time() {
                Some(true) => Adjustment {
                    performance: decimal(self.config.on_time_bonus),
                    accepted: true,
                    reason: "accepted on time",
                },
                _ => Adjustment {
                    performance: -decimal(self.config.late_penalty),
                    accepted: true,
                    reason: "accepted late",
                },
            },
            WorkItemStatus::InProgress => Adjustment {
                performance: -decimal(self.config.changes_requested_penalty),
                accepted: false,
                reason: "changes requested",
            },
            WorkItemStatus::Rejected => Adjustment {
                performance: -decimal(self.config.rejection_penalty),
                accepted: false,
                reason: "rejected",
            },
            _ => return None,
        };
        Some(adjustment)
    }

    /// Workload over `items`; closed items are ignored
    pub fn workload(&self, items: &[WorkItem], now: DateTime<Utc>) -> Percentage {
        let overdue_factor = decimal(self.config.overdue_factor);
        let weighted: Decimal = items
            .iter()
            .filter(|item| item.is_open())
            .map(|item| {
                let weight = decimal(item.priority.weight(&self.config.weights));
                if item.is_overdue(now) {
                    weight * overdue_factor
                } else {
                    weight
                }
            })
            .sum();

        let capacity = decimal(self.config.capacity);
        if capacity <= Decimal::ZERO {
            return Percentage::ZERO;
        }
        Percentage::new(weighted / capacity * Decimal::ONE_HUNDRED)
    }

    /// Apply a fresh workload and an optional adjustment to `profile`
    pub fn score(
        &self,
        profile: &mut UserProfile,
        open_items: &[WorkItem],
        adjustment: Option<Adjustment>,
        now: DateTime<Utc>,
    ) {
        if let Some(adjustment) = adjustment {
            profile.performance = profile.performance.adjust(adjustment.performance);
            if adjustment.accepted {
                profile.accepted_items_count += 1;
            }
        }
        profile.current_workload = self.workload(open_items, now);
        profile.updated_at = Some(now);
    }

    /// Recompute `user_id`'s profile inside `tx`.
    ///
    /// A user without a profile is skipped.
    pub async fn rescore(
        &self,
        tx: &mut dyn StoreTx,
        user_id: &str,
        adjustment: Option<Adjustment>,
        now: DateTime<Utc>,
    ) -> WbResult<Option<UserProfile>> {
        let Some(mut profile) = tx.find_profile_for_update(user_id).await? else {
            tracing::warn!(user_id, "No profile to rescore");
            return Ok(None);
        };

        let open_items = tx
            .work_items(&WorkItemFilter::assigned_to(user_id).open())
            .await?;
        self.score(&mut profile, &open_items, adjustment, now);
        let profile = tx.update_profile(&profile).await?;

        tracing::debug!(
            user_id,
            performance = %profile.performance,
            workload = %profile.current_workload,
            accepted = profile.accepted_items_count,
            reason = adjustment.map(|a| a.reason).unwrap_or("workload"),
            "Rescored profile"
        );
        Ok(Some(profile))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};
    use rust_decimal_macros::dec;
    use wb_models::Priority;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 10, 12, 0, 0).unwrap()
    }

    fn item(priority: Priority, status: WorkItemStatus, deadline: DateTime<Utc>) -> WorkItem {
        let mut item = WorkItem::new("Task", 1, "u-1", "m-1", now() - Duration::days(3));
        item.priority = priority;
        item.status = status;
        item.deadline = deadline;
        item
    }

    #[test]
    fn test_workload_weights_open_items() {
        let config = ScoringConfig::default();
        let scorer = Scorer::new(&config);
        let later = now() + Duration::days(2);
        let items = vec![
            item(Priority::Critical, WorkItemStatus::ToDo, later),
            item(Priority::Medium, WorkItemStatus::Review, later),
            item(Priority::Major, WorkItemStatus::Done, later),
        ];
        // (2.0 + 1.0) / 10 * 100
        assert_eq!(scorer.workload(&items, now()).value(), dec!(30));
    }

    #[test]
    fn test_overdue_items_weigh_more() {
        let config = ScoringConfig::default();
        let scorer = Scorer::new(&config);
        let items = vec![item(Priority::Medium, WorkItemStatus::InProgress, now() - Duration::hours(1))];
        assert_eq!(scorer.workload(&items, now()).value(), dec!(15));
    }

    #[test]
    fn test_workload_is_clamped() {
        let config = ScoringConfig::default();
        let scorer = Scorer::new(&config);
        let later = now() + Duration::days(2);
        let items: Vec<WorkItem> = (0..8)
            .map(|_| item(Priority::Critical, WorkItemStatus::ToDo, later))
            .collect();
        assert_eq!(scorer.workload(&items, now()), Percentage::FULL);
    }

    #[test]
    fn test_adjustments() {
        let config = ScoringConfig::default();
        let scorer = Scorer::new(&config);
        let deadline = now() + Duration::days(1);

        let mut done = item(Priority::Medium, WorkItemStatus::Review, deadline);
        done.apply_status(WorkItemStatus::Done, now());
        let on_time = scorer.adjustment(WorkItemStatus::Review, &done).unwrap();
        assert_eq!(on_time.performance, dec!(5));
        assert!(on_time.accepted);

        done.apply_status(WorkItemStatus::Done, deadline + Duration::hours(1));
        let late = scorer.adjustment(WorkItemStatus::Review, &done).unwrap();
        assert_eq!(late.performance, dec!(-5));
        assert!(late.accepted);

        let mut back = item(Priority::Medium, WorkItemStatus::Review, deadline);
        back.apply_status(WorkItemStatus::InProgress, now());
        let sent_back = scorer.adjustment(WorkItemStatus::Review, &back).unwrap();
        assert_eq!(sent_back.performance, dec!(-2));
        assert!(!sent_back.accepted);

        let mut rejected = item(Priority::Medium, WorkItemStatus::Review, deadline);
        rejected.apply_status(WorkItemStatus::Rejected, now());
        assert_eq!(
            scorer.adjustment(WorkItemStatus::Review, &rejected).unwrap().performance,
            dec!(-10)
        );

        let mut started = item(Priority::Medium, WorkItemStatus::ToDo, deadline);
        started.apply_status(WorkItemStatus::InProgress, now());
        assert_eq!(scorer.adjustment(WorkItemStatus::ToDo, &started), None);
    }

    #[test]
    fn test_score_clamps_performance() {
        let config = ScoringConfig::default();
        let scorer = Scorer::new(&config);
        let mut profile = UserProfile::new("u-1", "User One");
        let bonus = Adjustment {
            performance: dec!(5),
            accepted: true,
            reason: "accepted on time",
        };

        scorer.score(&mut profile, &[], Some(bonus), now());
        assert_eq!(profile.performance, Percentage::FULL);
        assert_eq!(profile.accepted_items_count, 1);
        assert_eq!(profile.updated_at, Some(now()));

        profile.performance = Percentage::from_f64(3.0);
        let penalty = Adjustment {
            performance: dec!(-10),
            accepted: false,
            reason: "rejected",
        };
        scorer.score(&mut profile, &[], Some(penalty), now());
        assert_eq!(profile.performance, Percentage::ZERO);
    }
}
