//! API request handlers

pub mod dashboard;
pub mod projects;
pub mod users;
pub mod work_items;

pub use dashboard::*;
pub use projects::*;
pub use users::*;
pub use work_items::*;
