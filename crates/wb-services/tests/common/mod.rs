#![allow(dead_code)]

use std::sync::Arc;

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use wb_contracts::UserContext;
use wb_core::clock::{Clock, FixedClock};
use wb_core::traits::Id;
use wb_db::{MemoryStore, Store};
use wb_models::{
    CreateProjectDto, CreateWorkItemDto, NewUser, Role, TransitionDto, UserProfile, WorkItem,
};
use wb_services::{
    CreateProjectService, CreateWorkItemService, RegisterUserService, ServiceContext,
    ServiceResult, ServiceSettings, TransitionOutcome, TransitionWorkItemService,
};

#[derive(Debug, Clone)]
pub struct Actor {
    pub id: String,
    pub role: Role,
}

impl Actor {
    pub fn new(id: &str, role: Role) -> Self {
        Self {
            id: id.to_string(),
            role,
        }
    }

    pub fn admin() -> Self {
        Self::new("a-1", Role::Admin)
    }

    pub fn manager() -> Self {
        Self::new("m-1", Role::Manager)
    }

    pub fn employee() -> Self {
        Self::new("u-1", Role::Employee)
    }
}

impl UserContext for Actor {
    fn id(&self) -> &str {
        &self.id
    }

    fn role(&self) -> Role {
        self.role
    }
}

/// In-memory store, pinned clock and default settings, shareable across tasks
#[derive(Clone)]
pub struct TestWorld {
    pub store: Arc<MemoryStore>,
    pub clock: Arc<FixedClock>,
    pub settings: Arc<ServiceSettings>,
}

pub fn start_of_test() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 3, 10, 0, 0).unwrap()
}

impl TestWorld {
    /// Registers `a-1` (Admin), `m-1` (Manager) and `u-1` (Employee)
    pub async fn new() -> Self {
        let world = Self {
            store: Arc::new(MemoryStore::new()),
            clock: Arc::new(FixedClock::new(start_of_test())),
            settings: Arc::new(ServiceSettings::default()),
        };

        // The first admin is bootstrapped straight into the store
        let mut tx = world.store.begin().await.unwrap();
        let admin = wb_models::User::new("a-1", "admin@example.com", "admin").with_role(Role::Admin);
        tx.insert_user(&admin).await.unwrap();
        tx.insert_profile(&UserProfile::new("a-1", "Admin")).await.unwrap();
        tx.commit().await.unwrap();

        for (id, role) in [("m-1", "Manager"), ("u-1", "Employee")] {
            RegisterUserService::new(world.ctx(&Actor::admin()))
                .call(NewUser {
                    id: id.into(),
                    email: format!("{}@example.com", id),
                    user_name: id.into(),
                    role: Some(role.into()),
                    ..NewUser::default()
                })
                .await
                .into_result()
                .unwrap();
        }
        world
    }

    pub fn ctx<'a>(&'a self, user: &'a Actor) -> ServiceContext<'a, Actor> {
        ServiceContext::new(user, self.store.as_ref(), self.clock.as_ref(), &self.settings)
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    /// Project P1: Medium priority, 2024-01-01 to 2024-02-01
    pub async fn create_p1(&self) -> Id {
        let project = CreateProjectService::new(self.ctx(&Actor::manager()))
            .call(CreateProjectDto {
                name: "P1".into(),
                start_date: NaiveDate::from_ymd_opt(2024, 1, 1),
                deadline: NaiveDate::from_ymd_opt(2024, 2, 1),
                priority: Some("Medium".into()),
                ..CreateProjectDto::default()
            })
            .await
            .into_result()
            .unwrap();
        project.id.unwrap()
    }

    /// Work item W1 under `project_id`, assigned to `u-1`
    pub async fn create_w1(&self, project_id: Id) -> WorkItem {
        CreateWorkItemService::new(self.ctx(&Actor::manager()))
            .call(CreateWorkItemDto {
                name: "W1".into(),
                project_id: Some(project_id),
                assigned_to_id: Some("u-1".into()),
                ..CreateWorkItemDto::default()
            })
            .await
            .into_result()
            .unwrap()
    }

    /// `None` sends the version currently stored, like a client that has
    /// just fetched the item
    pub async fn transition(
        &self,
        actor: &Actor,
        id: Id,
        status: &str,
        lock_version: Option<i32>,
    ) -> ServiceResult<TransitionOutcome> {
        let lock_version = match lock_version {
            Some(version) => version,
            None => self
                .store
                .find_work_item(id)
                .await
                .unwrap()
                .map(|item| item.lock_version)
                .unwrap_or_default(),
        };
        TransitionWorkItemService::new(self.ctx(actor))
            .call(
                id,
                TransitionDto {
                    status: status.into(),
                    lock_version,
                    comments: None,
                },
            )
            .await
    }

    pub async fn profile(&self, user_id: &str) -> UserProfile {
        self.store.find_profile(user_id).await.unwrap().unwrap()
    }

    pub async fn work_item(&self, id: Id) -> WorkItem {
        self.store.find_work_item(id).await.unwrap().unwrap()
    }
}
