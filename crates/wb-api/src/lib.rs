//! # wb-api
//!
//! JSON HTTP API for WorkBoard.
//!
//! Every resource is rendered with a `_type` discriminator and `_links.self`,
//! field names in camelCase. Handlers authenticate through [`wb_auth`] and
//! delegate to the services in [`wb_services`].

pub mod error;
pub mod extractors;
pub mod handlers;
pub mod representers;
pub mod routes;

pub use error::{ApiError, ApiResult};
pub use extractors::{ApiConfig, AppState, LifecycleObserver};
pub use routes::router;
