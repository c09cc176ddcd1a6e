//! CarVault Core - Shared types library.
//!
//! This crate provides common types used across CarVault components.
//! It contains only types and traits - no I/O, no database access, no HTTP.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs and email addresses

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
