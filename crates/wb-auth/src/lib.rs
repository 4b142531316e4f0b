//! # wb-auth
//!
//! Authentication and authorization for WorkBoard.
//!
//! Identity is delegated: callers present an HS256 bearer token whose claims
//! carry the user id and role. The role is trusted as given and mapped to a
//! permission set by [`wb_models::Role::permissions`].

pub mod jwt;
pub mod middleware;
pub mod permissions;

pub use jwt::{extract_bearer_token, Claims, JwtError, JwtService};
pub use middleware::{AuthError, Authenticator, RequestHeaders};
pub use permissions::{Authorizer, CurrentUser};
