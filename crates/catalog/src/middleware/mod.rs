//! Middleware and extractors.

pub mod auth;

pub use auth::{AuthenticatedUser, RequireAuth, TOKEN_COOKIE, auth_cookie, expired_cookie};
