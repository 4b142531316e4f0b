//! Role changes

use wb_contracts::users::ChangeRoleContract;
use wb_contracts::{parse_attribute, UserContext};
use wb_core::error::{ValidationErrors, WbError};
use wb_core::result::WbResult;
use wb_models::{ChangeRoleDto, Role, User};

use crate::base::{run_contract, ServiceContext};
use crate::result::ServiceResult;

pub struct ChangeRoleService<'a, U: UserContext> {
    ctx: ServiceContext<'a, U>,
}

impl<'a, U: UserContext> ChangeRoleService<'a, U> {
    pub fn new(ctx: ServiceContext<'a, U>) -> Self {
        Self { ctx }
    }

    pub async fn call(self, user_id: &str, dto: ChangeRoleDto) -> ServiceResult<User> {
        self.change(user_id, dto).await.into()
    }

    async fn change(&self, user_id: &str, dto: ChangeRoleDto) -> WbResult<User> {
        let mut errors = ValidationErrors::new();
        let role = parse_attribute::<Role>("role", &dto.role, &mut errors);

        let mut tx = self.ctx.store.begin().await?;
        let target = tx
            .find_user(user_id)
            .await?
            .ok_or_else(|| WbError::not_found("User", "id", user_id))?;

        let new_role = role.unwrap_or(target.role);
        run_contract(&ChangeRoleContract::new(self.ctx.user, new_role), &target, errors)?;
        if target.role == new_role {
            return Ok(target);
        }

        let user = tx.update_user_role(user_id, new_role).await?;
        tx.commit().await?;

        tracing::info!(user_id, from = %target.role, to = %new_role, "Role changed");
        Ok(user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::base::test_support::{seed_team, Actor, Fixture};
    use wb_db::Store;

    fn to(role: &str) -> ChangeRoleDto {
        ChangeRoleDto { role: role.into() }
    }

    #[tokio::test]
    async fn test_admin_promotes_employee() {
        let fixture = Fixture::new();
        seed_team(&fixture).await;
        let admin = Actor::new("a-1", Role::Admin);

        let user = ChangeRoleService::new(fixture.ctx(&admin))
            .call("u-1", to("Manager"))
            .await
            .into_result()
            .unwrap();
        assert_eq!(user.role, Role::Manager);
        let stored = fixture.store.find_user("u-1").await.unwrap().unwrap();
        assert_eq!(stored.role, Role::Manager);
    }

    #[tokio::test]
    async fn test_unknown_role_is_invalid() {
        let fixture = Fixture::new();
        seed_team(&fixture).await;
        let admin = Actor::new("a-1", Role::Admin);

        let result = ChangeRoleService::new(fixture.ctx(&admin))
            .call("u-1", to("Overlord"))
            .await;
        assert!(result.errors().has_error("role"));
    }

    #[tokio::test]
    async fn test_missing_user() {
        let fixture = Fixture::new();
        let admin = Actor::new("a-1", Role::Admin);

        let result = ChangeRoleService::new(fixture.ctx(&admin))
            .call("ghost", to("Manager"))
            .await;
        assert_eq!(result.failure_status(), Some(404));
    }

    #[tokio::test]
    async fn test_manager_is_forbidden() {
        let fixture = Fixture::new();
        seed_team(&fixture).await;
        let manager = Actor::new("m-1", Role::Manager);

        let result = ChangeRoleService::new(fixture.ctx(&manager))
            .call("u-1", to("Admin"))
            .await;
        assert_eq!(result.failure_status(), Some(403));
    }
}
