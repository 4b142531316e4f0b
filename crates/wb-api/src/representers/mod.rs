//! Representers
//!
//! Turn domain models and service outputs into the JSON the API returns.

pub mod dashboard;
pub mod hal;
pub mod project;
pub mod user;
pub mod work_item;

pub use dashboard::DashboardRepresenter;
pub use hal::{HalCollection, HalLink, HalLinks, HalResource};
pub use project::ProjectRepresenter;
pub use user::{ProfileRepresenter, UserRepresentation, UserRepresenter};
pub use work_item::WorkItemRepresenter;
