//! User and profile services

mod create;
mod profile;
mod role;

pub use create::RegisterUserService;
pub use profile::UpdateProfileService;
pub use role::ChangeRoleService;

use wb_contracts::UserContext;
use wb_core::error::WbError;
use wb_core::result::WbResult;
use wb_db::{PaginatedResult, Pagination};
use wb_models::{permissions, Entity, User, UserProfile};

use crate::base::ServiceContext;

/// A user with the profile registered alongside
#[derive(Debug, Clone, PartialEq)]
pub struct UserAccount {
    pub user: User,
    pub profile: Option<UserProfile>,
}

/// Read access to users; a user may always look at themselves
pub struct UserQueryService<'a, U: UserContext> {
    ctx: ServiceContext<'a, U>,
}

impl<'a, U: UserContext> UserQueryService<'a, U> {
    pub fn new(ctx: ServiceContext<'a, U>) -> Self {
        Self { ctx }
    }

    fn authorize_view(&self, user_id: &str) -> WbResult<()> {
        if self.ctx.user.is(user_id) || self.ctx.user.allowed(permissions::VIEW_USERS) {
            Ok(())
        } else {
            Err(WbError::forbidden("You are not authorized to view this user"))
        }
    }

    pub async fn get(&self, user_id: &str) -> WbResult<UserAccount> {
        self.authorize_view(user_id)?;
        let user = self
            .ctx
            .store
            .find_user(user_id)
            .await?
            .ok_or_else(|| WbError::not_found("User", "id", user_id))?;
        let profile = self.ctx.store.find_profile(user_id).await?;
        Ok(UserAccount { user, profile })
    }

    /// The acting user
    pub async fn me(&self) -> WbResult<UserAccount> {
        self.get(self.ctx.user.id()).await
    }

    pub async fn list(&self, pagination: Pagination) -> WbResult<PaginatedResult<User>> {
        if !self.ctx.user.allowed(permissions::VIEW_USERS) {
            return Err(WbError::forbidden("You are not authorized to list users"));
        }
        Ok(self.ctx.store.list_users(pagination).await?)
    }

    pub async fn profile(&self, user_id: &str) -> WbResult<UserProfile> {
        self.authorize_view(user_id)?;
        self.ctx
            .store
            .find_profile(user_id)
            .await?
            .ok_or_else(|| WbError::not_found(UserProfile::TYPE_NAME, "user_id", user_id))
    }
}
