//! Store abstraction
//!
//! A [`Store`] hands out transactions. Every write, and every read that has
//! to agree with a later write, goes through a [`StoreTx`]; dropping a
//! transaction without calling [`StoreTx::commit`] discards its changes.
//! The read helpers on [`Store`] open a short transaction of their own.

use async_trait::async_trait;
use wb_core::traits::{Id, UserId};
use wb_models::{Project, Role, User, UserProfile, WorkItem};

use crate::repository::{PaginatedResult, Pagination, RepositoryResult, WorkItemFilter};

/// A unit of work against the store
#[async_trait]
pub trait StoreTx: Send {
    // Projects

    async fn find_project(&mut self, id: Id) -> RepositoryResult<Option<Project>>;

    async fn list_projects(&mut self, pagination: Pagination) -> RepositoryResult<PaginatedResult<Project>>;

    async fn all_projects(&mut self) -> RepositoryResult<Vec<Project>>;

    /// Returns the project with its assigned id
    async fn insert_project(&mut self, project: &Project) -> RepositoryResult<Project>;

    async fn update_project(&mut self, project: &Project) -> RepositoryResult<Project>;

    /// Deletes the project together with its work items
    async fn delete_project(&mut self, id: Id) -> RepositoryResult<()>;

    // Work items

    async fn find_work_item(&mut self, id: Id) -> RepositoryResult<Option<WorkItem>>;

    /// Loads the item and holds it against concurrent writers until commit
    async fn find_work_item_for_update(&mut self, id: Id) -> RepositoryResult<Option<WorkItem>>;

    /// Ordered by deadline, then id
    async fn work_items(&mut self, filter: &WorkItemFilter) -> RepositoryResult<Vec<WorkItem>>;

    async fn list_work_items(
        &mut self,
        filter: &WorkItemFilter,
        pagination: Pagination,
    ) -> RepositoryResult<PaginatedResult<WorkItem>>;

    async fn insert_work_item(&mut self, item: &WorkItem) -> RepositoryResult<WorkItem>;

    /// Writes `item` if the stored row still carries `item.lock_version`.
    ///
    /// Returns the stored item with the incremented version, or
    /// [`RepositoryError::Conflict`](crate::RepositoryError::Conflict) when
    /// another writer got there first.
    async fn update_work_item(&mut self, item: &WorkItem) -> RepositoryResult<WorkItem>;

    async fn delete_work_item(&mut self, id: Id) -> RepositoryResult<()>;

    // Users

    async fn find_user(&mut self, id: &str) -> RepositoryResult<Option<User>>;

    async fn list_users(&mut self, pagination: Pagination) -> RepositoryResult<PaginatedResult<User>>;

    async fn insert_user(&mut self, user: &User) -> RepositoryResult<User>;

    async fn update_user_role(&mut self, id: &str, role: Role) -> RepositoryResult<User>;

    // Profiles

    async fn find_profile(&mut self, user_id: &str) -> RepositoryResult<Option<UserProfile>>;

    /// Loads the profile and holds it against concurrent writers until commit
    async fn find_profile_for_update(&mut self, user_id: &str) -> RepositoryResult<Option<UserProfile>>;

    async fn all_profiles(&mut self) -> RepositoryResult<Vec<UserProfile>>;

    async fn insert_profile(&mut self, profile: &UserProfile) -> RepositoryResult<UserProfile>;

    async fn update_profile(&mut self, profile: &UserProfile) -> RepositoryResult<UserProfile>;

    /// Make every change of this transaction visible
    async fn commit(self: Box<Self>) -> RepositoryResult<()>;
}

/// Shared handle on the persistence layer
#[async_trait]
pub trait Store: Send + Sync {
    async fn begin(&self) -> RepositoryResult<Box<dyn StoreTx>>;

    /// Cheap reachability check for health reporting
    async fn ping(&self) -> RepositoryResult<()>;

    /// Backend name for logs and health output
    fn backend(&self) -> &'static str;

    async fn find_project(&self, id: Id) -> RepositoryResult<Option<Project>> {
        let mut tx = self.begin().await?;
        tx.find_project(id).await
    }

    async fn list_projects(&self, pagination: Pagination) -> RepositoryResult<PaginatedResult<Project>> {
        let mut tx = self.begin().await?;
        tx.list_projects(pagination).await
    }

    async fn all_projects(&self) -> RepositoryResult<Vec<Project>> {
        let mut tx = self.begin().await?;
        tx.all_projects().await
    }

    async fn find_work_item(&self, id: Id) -> RepositoryResult<Option<WorkItem>> {
        let mut tx = self.begin().await?;
        tx.find_work_item(id).await
    }

    async fn work_items(&self, filter: &WorkItemFilter) -> RepositoryResult<Vec<WorkItem>> {
        let mut tx = self.begin().await?;
        tx.work_items(filter).await
    }

    async fn list_work_items(
        &self,
        filter: &WorkItemFilter,
        pagination: Pagination,
    ) -> RepositoryResult<PaginatedResult<WorkItem>> {
        let mut tx = self.begin().await?;
        tx.list_work_items(filter, pagination).await
    }

    async fn find_user(&self, id: &str) -> RepositoryResult<Option<User>> {
        let mut tx = self.begin().await?;
        tx.find_user(id).await
    }

    async fn list_users(&self, pagination: Pagination) -> RepositoryResult<PaginatedResult<User>> {
        let mut tx = self.begin().await?;
        tx.list_users(pagination).await
    }

    async fn find_profile(&self, user_id: &str) -> RepositoryResult<Option<UserProfile>> {
        let mut tx = self.begin().await?;
        tx.find_profile(user_id).await
    }

    async fn all_profiles(&self) -> RepositoryResult<Vec<UserProfile>> {
        let mut tx = self.begin().await?;
        tx.all_profiles().await
    }
}

/// Distinct assignees of `items`, sorted
pub fn assignees(items: &[WorkItem]) -> Vec<UserId> {
    let mut ids: Vec<UserId> = items.iter().map(|item| item.assigned_to_id.clone()).collect();
    ids.sort();
    ids.dedup();
    ids
}
