//! Periodic workload recomputation
//!
//! Workload depends on the clock through the overdue factor, so it drifts as
//! deadlines pass even when nothing is written. The sweeper rescores every
//! profile on a fixed interval until shutdown is signalled.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::time::MissedTickBehavior;
use wb_core::clock::Clock;
use wb_core::config::ScoringConfig;
use wb_core::result::WbResult;
use wb_db::Store;

use crate::scoring::Scorer;

pub struct WorkloadSweeper {
    store: Arc<dyn Store>,
    clock: Arc<dyn Clock>,
    config: ScoringConfig,
    shutdown: watch::Receiver<bool>,
}

impl WorkloadSweeper {
    pub fn new(
        store: Arc<dyn Store>,
        clock: Arc<dyn Clock>,
        config: ScoringConfig,
        shutdown: watch::Receiver<bool>,
    ) -> Self {
        Self {
            store,
            clock,
            config,
            shutdown,
        }
    }

    /// Rescore every profile in one transaction; returns how many were updated
    pub async fn sweep_once(&self) -> WbResult<usize> {
        let now = self.clock.now();
        let scorer = Scorer::new(&self.config);

        let mut tx = self.store.begin().await?;
        let profiles = tx.all_profiles().await?;
        let mut updated = 0;
        for profile in &profiles {
            if scorer
                .rescore(&mut *tx, &profile.user_id, None, now)
                .await?
                .is_some()
            {
                updated += 1;
            }
        }
        tx.commit().await?;
        Ok(updated)
    }

    pub async fn run(mut self) {
        let period = Duration::from_secs(self.config.sweep_interval_seconds.max(1));
        let mut interval = tokio::time::interval(period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // The first tick fires immediately; startup already has fresh scores
        interval.tick().await;

        tracing::info!(interval_secs = period.as_secs(), "Workload sweeper started");
        loop {
            if *self.shutdown.borrow() {
                break;
            }
            tokio::select! {
                _ = interval.tick() => {
                    match self.sweep_once().await {
                        Ok(updated) => tracing::debug!(updated, "Workload sweep finished"),
                        Err(e) => tracing::warn!(error = %e, "Workload sweep failed"),
                    }
                }
                changed = self.shutdown.changed() => {
                    if changed.is_err() {
                        break;
                    }
                }
            }
        }
        tracing::info!("Workload sweeper stopped");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::base::test_support::{seed_team, Actor, Fixture};
    use crate::work_items::CreateWorkItemService;
    use chrono::{TimeZone, Utc};
    use wb_core::clock::FixedClock;
    use wb_db::MemoryStore;
    use wb_models::{CreateWorkItemDto, Role};

    #[tokio::test]
    async fn test_sweep_applies_overdue_factor() {
        let fixture = Fixture::new();
        let project_id = seed_team(&fixture).await;
        let manager = Actor::new("m-1", Role::Manager);
        CreateWorkItemService::new(fixture.ctx(&manager))
            .call(CreateWorkItemDto {
                name: "Report".into(),
                project_id: Some(project_id),
                assigned_to_id: Some("u-1".into()),
                deadline: Some(Utc.with_ymd_and_hms(2024, 1, 5, 17, 0, 0).unwrap()),
                ..CreateWorkItemDto::default()
            })
            .await
            .into_result()
            .unwrap();

        let before = fixture.store.find_profile("u-1").await.unwrap().unwrap();
        assert_eq!(before.current_workload.to_f64(), 10.0);

        let store: Arc<dyn Store> = Arc::new(fixture.store.clone());
        let clock = Arc::new(FixedClock::new(Utc.with_ymd_and_hms(2024, 1, 8, 9, 0, 0).unwrap()));
        let (_tx, rx) = watch::channel(false);
        let sweeper = WorkloadSweeper::new(store, clock, ScoringConfig::default(), rx);

        assert_eq!(sweeper.sweep_once().await.unwrap(), 4);
        let after = fixture.store.find_profile("u-1").await.unwrap().unwrap();
        assert_eq!(after.current_workload.to_f64(), 15.0);
    }

    #[tokio::test]
    async fn test_run_stops_on_shutdown() {
        let store: Arc<dyn Store> = Arc::new(MemoryStore::new());
        let clock = Arc::new(FixedClock::new(Utc::now()));
        let (tx, rx) = watch::channel(false);
        let handle = tokio::spawn(WorkloadSweeper::new(store, clock, ScoringConfig::default(), rx).run());

        tx.send(true).unwrap();
        tokio::time::timeout(Duration::from_secs(5), handle)
            .await
            .expect("sweeper did not stop")
            .unwrap();
    }
}
