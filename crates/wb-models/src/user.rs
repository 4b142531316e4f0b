//! User and user profile models

pub mod model;
pub mod profile;

pub use model::*;
pub use profile::*;
