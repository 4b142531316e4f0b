//! PostgreSQL store
//!
//! Rows are read into `*Row` structs and converted into models; a literal
//! column holding an unknown value surfaces as [`RepositoryError::Corrupt`].

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use sqlx::{FromRow, PgPool, Postgres, QueryBuilder, Transaction};
use wb_core::traits::Id;
use wb_core::types::Percentage;
use wb_models::{Entity, Project, Role, User, UserProfile, WorkItem};

use crate::pool::Database;
use crate::repository::{
    PaginatedResult, Pagination, RepositoryError, RepositoryResult, WorkItemFilter,
};
use crate::store::{Store, StoreTx};

const PROJECT_COLUMNS: &str = "id, name, description, start_date, deadline, requirements, \
     priority, status, created_by_id, created_at, updated_at";

const WORK_ITEM_COLUMNS: &str = "id, name, description, priority, status, deadline, comments, \
     project_id, assigned_to_id, created_by_id, completed_at, lock_version, created_at, updated_at";

const USER_COLUMNS: &str = "id, email, user_name, role, created_at";

const PROFILE_COLUMNS: &str = "id, user_id, full_name, skills, experience_years, performance, \
     current_workload, accepted_items_count, created_at, updated_at";

fn literal<T: std::str::FromStr>(column: &str, raw: &str) -> RepositoryResult<T> {
    raw.parse()
        .map_err(|_| RepositoryError::Corrupt(format!("{} holds unknown value {:?}", column, raw)))
}

/// Project database row
#[derive(Debug, Clone, FromRow)]
pub struct ProjectRow {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub start_date: NaiveDate,
    pub deadline: NaiveDate,
    pub requirements: Option<String>,
    pub priority: String,
    pub status: String,
    pub created_by_id: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<ProjectRow> for Project {
    type Error = RepositoryError;

    fn try_from(row: ProjectRow) -> RepositoryResult<Self> {
        Ok(Project {
            id: Some(row.id),
            name: row.name,
            description: row.description,
            start_date: row.start_date,
            deadline: row.deadline,
            requirements: row.requirements,
            priority: literal("projects.priority", &row.priority)?,
            status: literal("projects.status", &row.status)?,
            created_by_id: row.created_by_id,
            created_at: Some(row.created_at),
            updated_at: Some(row.updated_at),
        })
    }
}

/// Work item database row
#[derive(Debug, Clone, FromRow)]
pub struct WorkItemRow {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub priority: String,
    pub status: String,
    pub deadline: DateTime<Utc>,
    pub comments: Option<String>,
    pub project_id: i64,
    pub assigned_to_id: String,
    pub created_by_id: String,
    pub completed_at: Option<DateTime<Utc>>,
    pub lock_version: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<WorkItemRow> for WorkItem {
    type Error = RepositoryError;

    fn try_from(row: WorkItemRow) -> RepositoryResult<Self> {
        Ok(WorkItem {
            id: Some(row.id),
            name: row.name,
            description: row.description,
            priority: literal("work_items.priority", &row.priority)?,
            status: literal("work_items.status", &row.status)?,
            deadline: row.deadline,
            comments: row.comments,
            project_id: row.project_id,
            assigned_to_id: row.assigned_to_id,
            created_by_id: row.created_by_id,
            completed_at: row.completed_at,
            lock_version: row.lock_version,
            created_at: Some(row.created_at),
            updated_at: Some(row.updated_at),
        })
    }
}

#[derive(Debug, Clone, FromRow)]
pub struct UserRow {
    pub id: String,
    pub email: String,
    pub user_name: String,
    pub role: String,
    pub created_at: DateTime<Utc>,
}

impl TryFrom<UserRow> for User {
    type Error = RepositoryError;

    fn try_from(row: UserRow) -> RepositoryResult<Self> {
        Ok(User {
            id: row.id,
            email: row.email,
            user_name: row.user_name,
            role: literal("users.role", &row.role)?,
            created_at: Some(row.created_at),
        })
    }
}

#[derive(Debug, Clone, FromRow)]
pub struct ProfileRow {
    pub id: i64,
    pub user_id: String,
    pub full_name: String,
    pub skills: Option<String>,
    pub experience_years: i32,
    pub performance: Decimal,
    pub current_workload: Decimal,
    pub accepted_items_count: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<ProfileRow> for UserProfile {
    fn from(row: ProfileRow) -> Self {
        UserProfile {
            id: Some(row.id),
            user_id: row.user_id,
            full_name: row.full_name,
            skills: row.skills,
            experience_years: row.experience_years,
            performance: Percentage::new(row.performance),
            current_workload: Percentage::new(row.current_workload),
            accepted_items_count: row.accepted_items_count,
            created_at: Some(row.created_at),
            updated_at: Some(row.updated_at),
        }
    }
}

fn convert_all<R, T>(rows: Vec<R>) -> RepositoryResult<Vec<T>>
where
    T: TryFrom<R, Error = RepositoryError>,
{
    rows.into_iter().map(T::try_from).collect()
}

/// Map constraint violations onto repository errors
fn on_write(err: sqlx::Error) -> RepositoryError {
    match &err {
        sqlx::Error::Database(db) if db.is_unique_violation() => {
            RepositoryError::Conflict(db.message().to_string())
        }
        sqlx::Error::Database(db) if db.is_foreign_key_violation() => {
            RepositoryError::NotFound {
                entity: "referenced row",
                id: db.constraint().unwrap_or("unknown").to_string(),
            }
        }
        _ => RepositoryError::Database(err),
    }
}

fn push_filter<'a>(builder: &mut QueryBuilder<'a, Postgres>, filter: &'a WorkItemFilter) {
    builder.push(" WHERE TRUE");
    if let Some(project_id) = filter.project_id {
        builder.push(" AND project_id = ").push_bind(project_id);
    }
    if let Some(assignee) = filter.assigned_to_id.as_deref() {
        builder.push(" AND assigned_to_id = ").push_bind(assignee);
    }
    if let Some(status) = filter.status {
        builder.push(" AND status = ").push_bind(status.as_str());
    }
    if filter.open_only {
        builder.push(" AND status IN ('ToDo', 'InProgress', 'Review')");
    }
    if let Some(before) = filter.deadline_before {
        builder.push(" AND deadline < ").push_bind(before);
    }
    if let Some(after) = filter.deadline_after {
        builder.push(" AND deadline >= ").push_bind(after);
    }
}

/// Store over a PostgreSQL pool
#[derive(Clone)]
pub struct PgStore {
    db: Database,
}

impl PgStore {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    pub fn pool(&self) -> &PgPool {
        self.db.pool()
    }

    pub fn database(&self) -> &Database {
        &self.db
    }
}

#[async_trait]
impl Store for PgStore {
    async fn begin(&self) -> RepositoryResult<Box<dyn StoreTx>> {
        let tx = self.db.pool().begin().await?;
        Ok(Box::new(PgTx { tx }))
    }

    async fn ping(&self) -> RepositoryResult<()> {
        Ok(self.db.ping().await?)
    }

    fn backend(&self) -> &'static str {
        "postgres"
    }
}

/// Transaction on one pooled connection
pub struct PgTx {
    tx: Transaction<'static, Postgres>,
}

#[async_trait]
impl StoreTx for PgTx {
    async fn find_project(&mut self, id: Id) -> RepositoryResult<Option<Project>> {
        let row = sqlx::query_as::<_, ProjectRow>(&format!(
            "SELECT {} FROM projects WHERE id = $1",
            PROJECT_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&mut *self.tx)
        .await?;
        row.map(Project::try_from).transpose()
    }

    async fn list_projects(&mut self, pagination: Pagination) -> RepositoryResult<PaginatedResult<Project>> {
        let (total,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM projects")
            .fetch_one(&mut *self.tx)
            .await?;

        let rows = sqlx::query_as::<_, ProjectRow>(&format!(
            "SELECT {} FROM projects ORDER BY id LIMIT $1 OFFSET $2",
            PROJECT_COLUMNS
        ))
        .bind(pagination.limit)
        .bind(pagination.offset)
        .fetch_all(&mut *self.tx)
        .await?;

        Ok(PaginatedResult::new(convert_all(rows)?, total, pagination))
    }

    async fn all_projects(&mut self) -> RepositoryResult<Vec<Project>> {
        let rows = sqlx::query_as::<_, ProjectRow>(&format!(
            "SELECT {} FROM projects ORDER BY id",
            PROJECT_COLUMNS
        ))
        .fetch_all(&mut *self.tx)
        .await?;
        convert_all(rows)
    }

    async fn insert_project(&mut self, project: &Project) -> RepositoryResult<Project> {
        let row = sqlx::query_as::<_, ProjectRow>(&format!(
            r#"
            INSERT INTO projects (name, description, start_date, deadline, requirements,
                                  priority, status, created_by_id, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, COALESCE($9, NOW()), COALESCE($10, NOW()))
            RETURNING {}
            "#,
            PROJECT_COLUMNS
        ))
        .bind(&project.name)
        .bind(&project.description)
        .bind(project.start_date)
        .bind(project.deadline)
        .bind(&project.requirements)
        .bind(project.priority.as_str())
        .bind(project.status.as_str())
        .bind(&project.created_by_id)
        .bind(project.created_at)
        .bind(project.updated_at)
        .fetch_one(&mut *self.tx)
        .await
        .map_err(on_write)?;

        tracing::debug!(project_id = row.id, "Inserted project");
        row.try_into()
    }

    async fn update_project(&mut self, project: &Project) -> RepositoryResult<Project> {
        let id = project
            .id
            .ok_or_else(|| RepositoryError::not_found(Project::TYPE_NAME, "new record"))?;
        let row = sqlx::query_as::<_, ProjectRow>(&format!(
            r#"
            UPDATE projects
            SET name = $2, description = $3, start_date = $4, deadline = $5,
                requirements = $6, priority = $7, status = $8,
                updated_at = COALESCE($9, NOW())
            WHERE id = $1
            RETURNING {}
            "#,
            PROJECT_COLUMNS
        ))
        .bind(id)
        .bind(&project.name)
        .bind(&project.description)
        .bind(project.start_date)
        .bind(project.deadline)
        .bind(&project.requirements)
        .bind(project.priority.as_str())
        .bind(project.status.as_str())
        .bind(project.updated_at)
        .fetch_optional(&mut *self.tx)
        .await
        .map_err(on_write)?
        .ok_or_else(|| RepositoryError::not_found(Project::TYPE_NAME, id))?;

        row.try_into()
    }

    async fn delete_project(&mut self, id: Id) -> RepositoryResult<()> {
        let result = sqlx::query("DELETE FROM projects WHERE id = $1")
            .bind(id)
            .execute(&mut *self.tx)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::not_found(Project::TYPE_NAME, id));
        }
        Ok(())
    }

    async fn find_work_item(&mut self, id: Id) -> RepositoryResult<Option<WorkItem>> {
        let row = sqlx::query_as::<_, WorkItemRow>(&format!(
            "SELECT {} FROM work_items WHERE id = $1",
            WORK_ITEM_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&mut *self.tx)
        .await?;
        row.map(WorkItem::try_from).transpose()
    }

    async fn find_work_item_for_update(&mut self, id: Id) -> RepositoryResult<Option<WorkItem>> {
        let row = sqlx::query_as::<_, WorkItemRow>(&format!(
            "SELECT {} FROM work_items WHERE id = $1 FOR UPDATE",
            WORK_ITEM_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&mut *self.tx)
        .await?;
        row.map(WorkItem::try_from).transpose()
    }

    async fn work_items(&mut self, filter: &WorkItemFilter) -> RepositoryResult<Vec<WorkItem>> {
        let mut builder = QueryBuilder::new(format!("SELECT {} FROM work_items", WORK_ITEM_COLUMNS));
        push_filter(&mut builder, filter);
        builder.push(" ORDER BY deadline, id");

        let rows = builder
            .build_query_as::<WorkItemRow>()
            .fetch_all(&mut *self.tx)
            .await?;
        convert_all(rows)
    }

    async fn list_work_items(
        &mut self,
        filter: &WorkItemFilter,
        pagination: Pagination,
    ) -> RepositoryResult<PaginatedResult<WorkItem>> {
        let mut count = QueryBuilder::new("SELECT COUNT(*) FROM work_items");
        push_filter(&mut count, filter);
        let (total,) = count
            .build_query_as::<(i64,)>()
            .fetch_one(&mut *self.tx)
            .await?;

        let mut builder = QueryBuilder::new(format!("SELECT {} FROM work_items", WORK_ITEM_COLUMNS));
        push_filter(&mut builder, filter);
        builder
            .push(" ORDER BY deadline, id LIMIT ")
            .push_bind(pagination.limit)
            .push(" OFFSET ")
            .push_bind(pagination.offset);

        let rows = builder
            .build_query_as::<WorkItemRow>()
            .fetch_all(&mut *self.tx)
            .await?;

        Ok(PaginatedResult::new(convert_all(rows)?, total, pagination))
    }

    async fn insert_work_item(&mut self, item: &WorkItem) -> RepositoryResult<WorkItem> {
        let row = sqlx::query_as::<_, WorkItemRow>(&format!(
            r#"
            INSERT INTO work_items (name, description, priority, status, deadline, comments,
                                    project_id, assigned_to_id, created_by_id, completed_at,
                                    lock_version, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, 0,
                    COALESCE($11, NOW()), COALESCE($12, NOW()))
            RETURNING {}
            "#,
            WORK_ITEM_COLUMNS
        ))
        .bind(&item.name)
        .bind(&item.description)
        .bind(item.priority.as_str())
        .bind(item.status.as_str())
        .bind(item.deadline)
        .bind(&item.comments)
        .bind(item.project_id)
        .bind(&item.assigned_to_id)
        .bind(&item.created_by_id)
        .bind(item.completed_at)
        .bind(item.created_at)
        .bind(item.updated_at)
        .fetch_one(&mut *self.tx)
        .await
        .map_err(on_write)?;

        tracing::debug!(work_item_id = row.id, project_id = row.project_id, "Inserted work item");
        row.try_into()
    }

    async fn update_work_item(&mut self, item: &WorkItem) -> RepositoryResult<WorkItem> {
        let id = item
            .id
            .ok_or_else(|| RepositoryError::not_found(WorkItem::TYPE_NAME, "new record"))?;

        let row = sqlx::query_as::<_, WorkItemRow>(&format!(
            r#"
            UPDATE work_items
            SET name = $3, description = $4, priority = $5, status = $6, deadline = $7,
                comments = $8, project_id = $9, assigned_to_id = $10, completed_at = $11,
                updated_at = COALESCE($12, NOW()),
                lock_version = lock_version + 1
            WHERE id = $1 AND lock_version = $2
            RETURNING {}
            "#,
            WORK_ITEM_COLUMNS
        ))
        .bind(id)
        .bind(item.lock_version)
        .bind(&item.name)
        .bind(&item.description)
        .bind(item.priority.as_str())
        .bind(item.status.as_str())
        .bind(item.deadline)
        .bind(&item.comments)
        .bind(item.project_id)
        .bind(&item.assigned_to_id)
        .bind(item.completed_at)
        .bind(item.updated_at)
        .fetch_optional(&mut *self.tx)
        .await
        .map_err(on_write)?;

        match row {
            Some(row) => row.try_into(),
            None => {
                let exists: Option<(i32,)> =
                    sqlx::query_as("SELECT lock_version FROM work_items WHERE id = $1")
                        .bind(id)
                        .fetch_optional(&mut *self.tx)
                        .await?;
                match exists {
                    Some((current,)) => Err(RepositoryError::Conflict(format!(
                        "WorkItem {} was modified concurrently (expected version {}, found {})",
                        id, item.lock_version, current
                    ))),
                    None => Err(RepositoryError::not_found(WorkItem::TYPE_NAME, id)),
                }
            }
        }
    }

    async fn delete_work_item(&mut self, id: Id) -> RepositoryResult<()> {
        let result = sqlx::query("DELETE FROM work_items WHERE id = $1")
            .bind(id)
            .execute(&mut *self.tx)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::not_found(WorkItem::TYPE_NAME, id));
        }
        Ok(())
    }

    async fn find_user(&mut self, id: &str) -> RepositoryResult<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {} FROM users WHERE id = $1",
            USER_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&mut *self.tx)
        .await?;
        row.map(User::try_from).transpose()
    }

    async fn list_users(&mut self, pagination: Pagination) -> RepositoryResult<PaginatedResult<User>> {
        let (total,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM users")
            .fetch_one(&mut *self.tx)
            .await?;

        let rows = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {} FROM users ORDER BY created_at, id LIMIT $1 OFFSET $2",
            USER_COLUMNS
        ))
        .bind(pagination.limit)
        .bind(pagination.offset)
        .fetch_all(&mut *self.tx)
        .await?;

        Ok(PaginatedResult::new(convert_all(rows)?, total, pagination))
    }

    async fn insert_user(&mut self, user: &User) -> RepositoryResult<User> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            r#"
            INSERT INTO users (id, email, user_name, role, created_at)
            VALUES ($1, $2, $3, $4, COALESCE($5, NOW()))
            RETURNING {}
            "#,
            USER_COLUMNS
        ))
        .bind(&user.id)
        .bind(&user.email)
        .bind(&user.user_name)
        .bind(user.role.as_str())
        .bind(user.created_at)
        .fetch_one(&mut *self.tx)
        .await
        .map_err(on_write)?;

        row.try_into()
    }

    async fn update_user_role(&mut self, id: &str, role: Role) -> RepositoryResult<User> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "UPDATE users SET role = $2 WHERE id = $1 RETURNING {}",
            USER_COLUMNS
        ))
        .bind(id)
        .bind(role.as_str())
        .fetch_optional(&mut *self.tx)
        .await?
        .ok_or_else(|| RepositoryError::not_found("User", id))?;

        row.try_into()
    }

    async fn find_profile(&mut self, user_id: &str) -> RepositoryResult<Option<UserProfile>> {
        let row = sqlx::query_as::<_, ProfileRow>(&format!(
            "SELECT {} FROM user_profiles WHERE user_id = $1",
            PROFILE_COLUMNS
        ))
        .bind(user_id)
        .fetch_optional(&mut *self.tx)
        .await?;
        Ok(row.map(UserProfile::from))
    }

    async fn find_profile_for_update(&mut self, user_id: &str) -> RepositoryResult<Option<UserProfile>> {
        let row = sqlx::query_as::<_, ProfileRow>(&format!(
            "SELECT {} FROM user_profiles WHERE user_id = $1 FOR UPDATE",
            PROFILE_COLUMNS
        ))
        .bind(user_id)
        .fetch_optional(&mut *self.tx)
        .await?;
        Ok(row.map(UserProfile::from))
    }

    async fn all_profiles(&mut self) -> RepositoryResult<Vec<UserProfile>> {
        let rows = sqlx::query_as::<_, ProfileRow>(&format!(
            "SELECT {} FROM user_profiles ORDER BY id",
            PROFILE_COLUMNS
        ))
        .fetch_all(&mut *self.tx)
        .await?;
        Ok(rows.into_iter().map(UserProfile::from).collect())
    }

    async fn insert_profile(&mut self, profile: &UserProfile) -> RepositoryResult<UserProfile> {
        let row = sqlx::query_as::<_, ProfileRow>(&format!(
            r#"
            INSERT INTO user_profiles (user_id, full_name, skills, experience_years, performance,
                                       current_workload, accepted_items_count, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, COALESCE($8, NOW()), COALESCE($9, NOW()))
            RETURNING {}
            "#,
            PROFILE_COLUMNS
        ))
        .bind(&profile.user_id)
        .bind(&profile.full_name)
        .bind(&profile.skills)
        .bind(profile.experience_years)
        .bind(profile.performance.value())
        .bind(profile.current_workload.value())
        .bind(profile.accepted_items_count)
        .bind(profile.created_at)
        .bind(profile.updated_at)
        .fetch_one(&mut *self.tx)
        .await
        .map_err(on_write)?;

        Ok(row.into())
    }

    async fn update_profile(&mut self, profile: &UserProfile) -> RepositoryResult<UserProfile> {
        let row = sqlx::query_as::<_, ProfileRow>(&format!(
            r#"
            UPDATE user_profiles
            SET full_name = $2, skills = $3, experience_years = $4, performance = $5,
                current_workload = $6, accepted_items_count = $7,
                updated_at = COALESCE($8, NOW())
            WHERE user_id = $1
            RETURNING {}
            "#,
            PROFILE_COLUMNS
        ))
        .bind(&profile.user_id)
        .bind(&profile.full_name)
        .bind(&profile.skills)
        .bind(profile.experience_years)
        .bind(profile.performance.value())
        .bind(profile.current_workload.value())
        .bind(profile.accepted_items_count)
        .bind(profile.updated_at)
        .fetch_optional(&mut *self.tx)
        .await?
        .ok_or_else(|| RepositoryError::not_found(UserProfile::TYPE_NAME, &profile.user_id))?;

        Ok(row.into())
    }

    async fn commit(self: Box<Self>) -> RepositoryResult<()> {
        self.tx.commit().await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rust_decimal_macros::dec;
    use wb_models::{Priority, WorkItemStatus};

    fn work_item_row(status: &str) -> WorkItemRow {
        let at = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        WorkItemRow {
            id: 7,
            name: "Wire up store".into(),
            description: None,
            priority: "Major".into(),
            status: status.into(),
            deadline: at,
            comments: None,
            project_id: 1,
            assigned_to_id: "u-1".into(),
            created_by_id: "m-1".into(),
            completed_at: None,
            lock_version: 3,
            created_at: at,
            updated_at: at,
        }
    }

    #[test]
    fn test_work_item_row_conversion() {
        let item = WorkItem::try_from(work_item_row("Review")).unwrap();
        assert_eq!(item.id, Some(7));
        assert_eq!(item.priority, Priority::Major);
        assert_eq!(item.status, WorkItemStatus::Review);
        assert_eq!(item.lock_version, 3);
    }

    #[test]
    fn test_unknown_status_is_corrupt() {
        let err = WorkItem::try_from(work_item_row("Archived")).unwrap_err();
        assert!(matches!(err, RepositoryError::Corrupt(_)));
    }

    #[test]
    fn test_profile_row_clamps_percentages() {
        let at = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let profile = UserProfile::from(ProfileRow {
            id: 1,
            user_id: "u-1".into(),
            full_name: "User One".into(),
            skills: None,
            experience_years: 2,
            performance: dec!(101.5),
            current_workload: dec!(12.346),
            accepted_items_count: 4,
            created_at: at,
            updated_at: at,
        });
        assert_eq!(profile.performance, Percentage::FULL);
        assert_eq!(profile.current_workload.value(), dec!(12.35));
    }
}
