//! Shared service plumbing
//!
//! Every service is built from a [`ServiceContext`]: the acting user plus the
//! store, clock and settings injected by the caller.

use chrono::{DateTime, Utc};
use wb_contracts::{Contract, UserContext};
use wb_core::clock::Clock;
use wb_core::config::{DashboardConfig, ScoringConfig};
use wb_core::error::{ValidationErrors, WbError};
use wb_core::result::WbResult;
use wb_db::{Store, StoreTx};
use wb_models::{User, WorkItem};

use crate::scoring::Scorer;

/// Settings services read; a subset of the application config
#[derive(Debug, Clone, Default)]
pub struct ServiceSettings {
    pub scoring: ScoringConfig,
    pub dashboard: DashboardConfig,
}

/// Service context for managing service execution
pub struct ServiceContext<'a, U: UserContext> {
    pub user: &'a U,
    pub store: &'a dyn Store,
    pub clock: &'a dyn Clock,
    pub settings: &'a ServiceSettings,
}

impl<'a, U: UserContext> ServiceContext<'a, U> {
    pub fn new(
        user: &'a U,
        store: &'a dyn Store,
        clock: &'a dyn Clock,
        settings: &'a ServiceSettings,
    ) -> Self {
        Self {
            user,
            store,
            clock,
            settings,
        }
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    pub fn scorer(&self) -> Scorer<'a> {
        Scorer::new(&self.settings.scoring)
    }
}

/// Authorization first, then validation merged with errors collected while
/// setting attributes
pub(crate) fn run_contract<T, C>(contract: &C, entity: &T, mut errors: ValidationErrors) -> WbResult<()>
where
    C: Contract<T>,
{
    contract.authorize(entity)?;
    if let Err(contract_errors) = contract.validate(entity) {
        errors.merge(contract_errors);
    }
    errors.into_result().map_err(WbError::Validation)
}

/// The assignee must be a registered user
pub(crate) async fn require_assignee(tx: &mut dyn StoreTx, item: &WorkItem) -> WbResult<User> {
    tx.find_user(&item.assigned_to_id)
        .await?
        .ok_or_else(|| WbError::invalid("assigned_to_id", "does not exist"))
}
