//! Work item model and DTOs
//!
//! Work items are the unit of assignable work; their status follows the
//! lifecycle in [`crate::status::WorkItemStatus`].

pub mod model;

pub use model::*;
