//! Project model and DTOs

pub mod model;

pub use model::*;
