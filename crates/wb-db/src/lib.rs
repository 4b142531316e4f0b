//! # wb-db
//!
//! Persistence layer for WorkBoard.
//!
//! - [`Store`] / [`StoreTx`]: the transactional interface services work against
//! - [`PgStore`]: PostgreSQL via SQLx, schema under `migrations/`
//! - [`MemoryStore`]: in-process tables for tests and `memory://` deployments
//!
//! ## Example
//!
//! ```ignore
//! use wb_db::{Database, PgStore, Store};
//!
//! let db = Database::connect(&config.database).await?;
//! db.migrate().await?;
//! let store = PgStore::new(db);
//!
//! let mut tx = store.begin().await?;
//! let item = tx.find_work_item_for_update(1).await?;
//! tx.commit().await?;
//! ```

pub mod memory;
pub mod pool;
pub mod postgres;
pub mod repository;
pub mod store;

// Re-exports
pub use memory::MemoryStore;
pub use pool::{Database, PoolStats};
pub use postgres::PgStore;
pub use repository::{PaginatedResult, Pagination, RepositoryError, RepositoryResult, WorkItemFilter};
pub use store::{assignees, Store, StoreTx};
