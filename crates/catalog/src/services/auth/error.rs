//! Authentication error types.

use thiserror::Error;

use crate::db::RepositoryError;

/// Errors that can occur during authentication operations.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Invalid email format.
    #[error("invalid email: {0}")]
    InvalidEmail(#[from] carvault_core::EmailError),

    /// Invalid credentials (wrong password or user not found).
    ///
    /// Deliberately a single variant: the two causes must be
    /// indistinguishable to the client.
    #[error("invalid credentials")]
    InvalidCredentials,

    /// No token cookie was presented.
    #[error("missing authorization token")]
    MissingToken,

    /// The token is malformed or its signature does not verify.
    #[error("invalid token")]
    InvalidToken,

    /// The token's expiry instant has passed.
    #[error("token expired")]
    TokenExpired,

    /// Token signing failed.
    #[error("token creation failed")]
    TokenCreation,

    /// Password hashing error.
    #[error("password hashing error")]
    PasswordHash,

    /// Repository/database error.
    #[error("database error: {0}")]
    Repository(#[from] RepositoryError),
}
