//! # wb-contracts
//!
//! Contract validation for WorkBoard.
//!
//! Contracts validate entities before create/update operations and check the
//! acting user's permissions. The work item transition contract also guards
//! the lifecycle state machine.

pub mod base;
pub mod projects;
pub mod users;
pub mod work_items;

pub use base::*;
