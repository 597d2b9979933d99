//! Identity, as seen by the API.
//!
//! Sign-up, sign-in and profile storage belong to the external identity
//! provider. This module only verifies the bearer tokens it issues and keeps an
//! [`AuthContext`] that other parts of the server can subscribe to.

pub mod context;
pub mod jwt;
pub mod middleware;
pub mod routes;

pub use context::{AuthContext, AuthEvent, AuthSubscription};
pub use middleware::{AdminUser, AuthUser, Role};
pub use routes::routes;
