//! Profile edits
//!
//! Only the descriptive fields change here. Supplying a scorer-owned field is
//! reported as "is not writable" rather than silently dropped.

use wb_contracts::users::UpdateProfileContract;
use wb_contracts::{ChangeTracker, UserContext};
use wb_core::error::WbError;
use wb_core::result::WbResult;
use wb_models::{Entity, UpdateProfileDto, UserProfile};

use crate::base::{run_contract, ServiceContext};
use crate::result::ServiceResult;

pub struct UpdateProfileService<'a, U: UserContext> {
    ctx: ServiceContext<'a, U>,
}

impl<'a, U: UserContext> UpdateProfileService<'a, U> {
    pub fn new(ctx: ServiceContext<'a, U>) -> Self {
        Self { ctx }
    }

    pub async fn call(self, user_id: &str, dto: UpdateProfileDto) -> ServiceResult<UserProfile> {
        self.update(user_id, dto).await.into()
    }

    async fn update(&self, user_id: &str, dto: UpdateProfileDto) -> WbResult<UserProfile> {
        let mut tx = self.ctx.store.begin().await?;
        let mut profile = tx
            .find_profile_for_update(user_id)
            .await?
            .ok_or_else(|| WbError::not_found(UserProfile::TYPE_NAME, "user_id", user_id))?;

        let mut changes = ChangeTracker::new();
        apply(&mut profile, &dto, &mut changes);
        let contract = UpdateProfileContract::new(self.ctx.user).with_changes(changes.clone());
        run_contract(&contract, &profile, Default::default())?;

        if changes.changed_attributes().is_empty() {
            return Ok(profile);
        }

        profile.updated_at = Some(self.ctx.now());
        let profile = tx.update_profile(&profile).await?;
        tx.commit().await?;

        tracing::info!(user_id, "Profile updated");
        Ok(profile)
    }
}

fn apply(profile: &mut UserProfile, dto: &UpdateProfileDto, changes: &mut ChangeTracker) {
    if let Some(ref full_name) = dto.full_name {
        let full_name = full_name.trim();
        if profile.full_name != full_name {
            profile.full_name = full_name.to_string();
            changes.mark_changed("full_name");
        }
    }
    if dto.skills.is_some() && profile.skills != dto.skills {
        profile.skills = dto.skills.clone();
        changes.mark_changed("skills");
    }
    if let Some(years) = dto.experience_years {
        if profile.experience_years != years {
            profile.experience_years = years;
            changes.mark_changed("experience_years");
        }
    }

    for (attribute, supplied) in [
        ("performance", &dto.performance),
        ("current_workload", &dto.current_workload),
        ("accepted_items_count", &dto.accepted_items_count),
    ] {
        if supplied.is_some() {
            changes.mark_changed(attribute);
        }
    }
}
