//! User and profile contracts

mod create;
mod profile;
mod role;

pub use create::CreateUserContract;
pub use profile::{ProfileBaseContract, UpdateProfileContract};
pub use role::ChangeRoleContract;
