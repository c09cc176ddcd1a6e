//! Application services.
//!
//! - [`listing`] - cache-aside read path for the listing endpoints
//! - [`integrity`] - referential-integrity guard for Car → Make references
//! - [`auth`] - registration, login, and signed-token issuance/verification

pub mod auth;
pub mod integrity;
pub mod listing;
