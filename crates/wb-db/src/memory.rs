//! In-memory store
//!
//! Backs tests and `memory://` deployments. A transaction holds the store's
//! lock for its whole lifetime and works on a copy of the tables; commit
//! writes the copy back. Transactions are therefore fully serialized, and a
//! caller must not open a second transaction while holding one.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::{Mutex, OwnedMutexGuard};
use wb_core::traits::{Id, UserId};
use wb_models::{Entity, Project, Role, User, UserProfile, WorkItem};

use crate::repository::{
    PaginatedResult, Pagination, RepositoryError, RepositoryResult, WorkItemFilter,
};
use crate::store::{Store, StoreTx};

#[derive(Debug, Clone, Default)]
struct Tables {
    projects: BTreeMap<Id, Project>,
    work_items: BTreeMap<Id, WorkItem>,
    users: BTreeMap<UserId, User>,
    profiles: BTreeMap<UserId, UserProfile>,
    project_seq: Id,
    work_item_seq: Id,
    profile_seq: Id,
}

impl Tables {
    fn sorted_work_items(&self, filter: &WorkItemFilter) -> Vec<WorkItem> {
        let mut items: Vec<WorkItem> = self
            .work_items
            .values()
            .filter(|item| filter.matches(item))
            .cloned()
            .collect();
        items.sort_by(|a, b| a.deadline.cmp(&b.deadline).then(a.id.cmp(&b.id)));
        items
    }
}

/// Store keeping every table in process memory
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    tables: Arc<Mutex<Tables>>,
    offline: Arc<AtomicBool>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent call fail as if the backend were down
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    fn check_online(&self) -> RepositoryResult<()> {
        if self.offline.load(Ordering::SeqCst) {
            return Err(RepositoryError::Unavailable("memory store is offline".into()));
        }
        Ok(())
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn begin(&self) -> RepositoryResult<Box<dyn StoreTx>> {
        self.check_online()?;
        let guard = self.tables.clone().lock_owned().await;
        let working = guard.clone();
        Ok(Box::new(MemoryTx { guard, working }))
    }

    async fn ping(&self) -> RepositoryResult<()> {
        self.check_online()
    }

    fn backend(&self) -> &'static str {
        "memory"
    }
}

/// Transaction over a working copy of the tables
pub struct MemoryTx {
    guard: OwnedMutexGuard<Tables>,
    working: Tables,
}

#[async_trait]
impl StoreTx for MemoryTx {
    async fn find_project(&mut self, id: Id) -> RepositoryResult<Option<Project>> {
        Ok(self.working.projects.get(&id).cloned())
    }

    async fn list_projects(&mut self, pagination: Pagination) -> RepositoryResult<PaginatedResult<Project>> {
        let all: Vec<Project> = self.working.projects.values().cloned().collect();
        Ok(PaginatedResult::new(
            pagination.apply(&all),
            all.len() as i64,
            pagination,
        ))
    }

    async fn all_projects(&mut self) -> RepositoryResult<Vec<Project>> {
        Ok(self.working.projects.values().cloned().collect())
    }

    async fn insert_project(&mut self, project: &Project) -> RepositoryResult<Project> {
        self.working.project_seq += 1;
        let mut stored = project.clone();
        stored.id = Some(self.working.project_seq);
        self.working
            .projects
            .insert(self.working.project_seq, stored.clone());
        Ok(stored)
    }

    async fn update_project(&mut self, project: &Project) -> RepositoryResult<Project> {
        let id = project
            .id
            .ok_or_else(|| RepositoryError::not_found(Project::TYPE_NAME, "new record"))?;
        let slot = self
            .working
            .projects
            .get_mut(&id)
            .ok_or_else(|| RepositoryError::not_found(Project::TYPE_NAME, id))?;
        *slot = project.clone();
        Ok(project.clone())
    }

    async fn delete_project(&mut self, id: Id) -> RepositoryResult<()> {
        self.working
            .projects
            .remove(&id)
            .ok_or_else(|| RepositoryError::not_found(Project::TYPE_NAME, id))?;
        self.working
            .work_items
            .retain(|_, item| item.project_id != id);
        Ok(())
    }

    async fn find_work_item(&mut self, id: Id) -> RepositoryResult<Option<WorkItem>> {
        Ok(self.working.work_items.get(&id).cloned())
    }

    async fn find_work_item_for_update(&mut self, id: Id) -> RepositoryResult<Option<WorkItem>> {
        self.find_work_item(id).await
    }

    async fn work_items(&mut self, filter: &WorkItemFilter) -> RepositoryResult<Vec<WorkItem>> {
        Ok(self.working.sorted_work_items(filter))
    }

    async fn list_work_items(
        &mut self,
        filter: &WorkItemFilter,
        pagination: Pagination,
    ) -> RepositoryResult<PaginatedResult<WorkItem>> {
        let all = self.working.sorted_work_items(filter);
        Ok(PaginatedResult::new(
            pagination.apply(&all),
            all.len() as i64,
            pagination,
        ))
    }

    async fn insert_work_item(&mut self, item: &WorkItem) -> RepositoryResult<WorkItem> {
        if !self.working.projects.contains_key(&item.project_id) {
            return Err(RepositoryError::not_found(Project::TYPE_NAME, item.project_id));
        }
        self.working.work_item_seq += 1;
        let mut stored = item.clone();
        stored.id = Some(self.working.work_item_seq);
        stored.lock_version = 0;
        self.working
            .work_items
            .insert(self.working.work_item_seq, stored.clone());
        Ok(stored)
    }

    async fn update_work_item(&mut self, item: &WorkItem) -> RepositoryResult<WorkItem> {
        let id = item
            .id
            .ok_or_else(|| RepositoryError::not_found(WorkItem::TYPE_NAME, "new record"))?;
        let slot = self
            .working
            .work_items
            .get_mut(&id)
            .ok_or_else(|| RepositoryError::not_found(WorkItem::TYPE_NAME, id))?;
        if slot.lock_version != item.lock_version {
            return Err(RepositoryError::Conflict(format!(
                "WorkItem {} was modified concurrently (expected version {}, found {})",
                id, item.lock_version, slot.lock_version
            )));
        }
        let mut stored = item.clone();
        stored.lock_version += 1;
        *slot = stored.clone();
        Ok(stored)
    }

    async fn delete_work_item(&mut self, id: Id) -> RepositoryResult<()> {
        self.working
            .work_items
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| RepositoryError::not_found(WorkItem::TYPE_NAME, id))
    }

    async fn find_user(&mut self, id: &str) -> RepositoryResult<Option<User>> {
        Ok(self.working.users.get(id).cloned())
    }

    async fn list_users(&mut self, pagination: Pagination) -> RepositoryResult<PaginatedResult<User>> {
        let mut all: Vec<User> = self.working.users.values().cloned().collect();
        all.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        Ok(PaginatedResult::new(
            pagination.apply(&all),
            all.len() as i64,
            pagination,
        ))
    }

    async fn insert_user(&mut self, user: &User) -> RepositoryResult<User> {
        if self.working.users.contains_key(&user.id) {
            return Err(RepositoryError::Conflict(format!("User {} already exists", user.id)));
        }
        self.working.users.insert(user.id.clone(), user.clone());
        Ok(user.clone())
    }

    async fn update_user_role(&mut self, id: &str, role: Role) -> RepositoryResult<User> {
        let user = self
            .working
            .users
            .get_mut(id)
            .ok_or_else(|| RepositoryError::not_found("User", id))?;
        user.role = role;
        Ok(user.clone())
    }

    async fn find_profile(&mut self, user_id: &str) -> RepositoryResult<Option<UserProfile>> {
        Ok(self.working.profiles.get(user_id).cloned())
    }

    async fn find_profile_for_update(&mut self, user_id: &str) -> RepositoryResult<Option<UserProfile>> {
        self.find_profile(user_id).await
    }

    async fn all_profiles(&mut self) -> RepositoryResult<Vec<UserProfile>> {
        let mut profiles: Vec<UserProfile> = self.working.profiles.values().cloned().collect();
        profiles.sort_by_key(|profile| profile.id);
        Ok(profiles)
    }

    async fn insert_profile(&mut self, profile: &UserProfile) -> RepositoryResult<UserProfile> {
        if !self.working.users.contains_key(&profile.user_id) {
            return Err(RepositoryError::not_found("User", &profile.user_id));
        }
        if self.working.profiles.contains_key(&profile.user_id) {
            return Err(RepositoryError::Conflict(format!(
                "User {} already has a profile",
                profile.user_id
            )));
        }
        self.working.profile_seq += 1;
        let mut stored = profile.clone();
        stored.id = Some(self.working.profile_seq);
        self.working
            .profiles
            .insert(stored.user_id.clone(), stored.clone());
        Ok(stored)
    }

    async fn update_profile(&mut self, profile: &UserProfile) -> RepositoryResult<UserProfile> {
        let slot = self
            .working
            .profiles
            .get_mut(&profile.user_id)
            .ok_or_else(|| RepositoryError::not_found(UserProfile::TYPE_NAME, &profile.user_id))?;
        *slot = profile.clone();
        Ok(profile.clone())
    }

    async fn commit(self: Box<Self>) -> RepositoryResult<()> {
        let MemoryTx { mut guard, working } = *self;
        *guard = working;
        Ok(())
    }
}
