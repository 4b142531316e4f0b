//! Registration of a user together with their profile

use wb_contracts::users::{CreateUserContract, ProfileBaseContract};
use wb_contracts::{parse_attribute, Contract, UserContext};
use wb_core::error::ValidationErrors;
use wb_core::result::WbResult;
use wb_models::{NewUser, Role, User, UserProfile};

use super::UserAccount;
use crate::base::{run_contract, ServiceContext};
use crate::result::ServiceResult;

pub struct RegisterUserService<'a, U: UserContext> {
    ctx: ServiceContext<'a, U>,
}

impl<'a, U: UserContext> RegisterUserService<'a, U> {
    pub fn new(ctx: ServiceContext<'a, U>) -> Self {
        Self { ctx }
    }

    pub async fn call(self, params: NewUser) -> ServiceResult<UserAccount> {
        self.register(params).await.into()
    }

    async fn register(&self, params: NewUser) -> WbResult<UserAccount> {
        let now = self.ctx.now();
        let (mut user, mut profile, mut errors) = build(&params);

        let contract = CreateUserContract::new(self.ctx.user);
        contract.authorize(&user)?;
        if let Err(user_errors) = contract.validate(&user) {
            errors.merge(user_errors);
        }
        run_contract(&ProfileBaseContract::new(), &profile, errors)?;

        user.created_at = Some(now);
        profile.created_at = Some(now);
        profile.updated_at = Some(now);

        let mut tx = self.ctx.store.begin().await?;
        let user = tx.insert_user(&user).await?;
        let profile = tx.insert_profile(&profile).await?;
        tx.commit().await?;

        tracing::info!(user_id = %user.id, role = %user.role, "User registered");
        Ok(UserAccount {
            user,
            profile: Some(profile),
        })
    }
}

fn build(params: &NewUser) -> (User, UserProfile, ValidationErrors) {
    let mut errors = ValidationErrors::new();
    let role = match params.role {
        Some(ref raw) => parse_attribute::<Role>("role", raw, &mut errors).unwrap_or_default(),
        None => Role::default(),
    };

    let user_name = params.user_name.trim();
    let user = User::new(params.id.trim(), params.email.trim(), user_name).with_role(role);

    let full_name = params
        .full_name
        .as_deref()
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .unwrap_or(user_name);
    let mut profile = UserProfile::new(user.id.clone(), full_name);
    profile.skills = params.skills.clone();
    profile.experience_years = params.experience_years.unwrap_or(0);

    (user, profile, errors)
}
