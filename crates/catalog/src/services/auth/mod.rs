//! Authentication service.
//!
//! Password registration/login with Argon2id hashes, and issuance and
//! verification of signed, time-limited tokens. The token is the complete
//! authorization state; there is no server-side session store.

mod error;

pub use error::AuthError;

use std::sync::Arc;

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use carvault_core::Email;

use crate::db::users::UserRepository;
use crate::models::User;

/// Token lifetime: two hours from issuance.
const TOKEN_TTL_SECS: i64 = 2 * 60 * 60;

// =============================================================================
// Clock
// =============================================================================

/// Clock abstraction for token time validation.
///
/// Owning the expiry comparison (instead of letting `jsonwebtoken` read the
/// system clock) makes expiry tests fully deterministic.
pub trait Clock: Send + Sync {
    /// Current time as Unix epoch seconds.
    fn now_epoch_secs(&self) -> i64;
}

/// Production clock using system time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_epoch_secs(&self) -> i64 {
        chrono::Utc::now().timestamp()
    }
}

/// Fixed clock for deterministic tests.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub i64);

impl Clock for FixedClock {
    fn now_epoch_secs(&self) -> i64 {
        self.0
    }
}

// =============================================================================
// Tokens
// =============================================================================

/// Claims embedded in a signed token.
#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    /// The identity the token was issued for (the user's email).
    sub: String,
    /// Absolute expiry as Unix epoch seconds.
    exp: i64,
}

/// Issues and verifies signed tokens with one process-wide secret.
///
/// Constructed once at startup from configuration and shared via
/// [`crate::state::AppState`]; token operations never read the environment.
pub struct TokenAuthority {
    encoding: EncodingKey,
    decoding: DecodingKey,
    clock: Arc<dyn Clock>,
}

impl TokenAuthority {
    /// Create a token authority over the process-wide signing secret.
    #[must_use]
    pub fn new(secret: &SecretString) -> Self {
        Self::with_clock(secret, Arc::new(SystemClock))
    }

    /// Create a token authority with an injected clock.
    #[must_use]
    pub fn with_clock(secret: &SecretString, clock: Arc<dyn Clock>) -> Self {
        let bytes = secret.expose_secret().as_bytes();

        Self {
            encoding: EncodingKey::from_secret(bytes),
            decoding: DecodingKey::from_secret(bytes),
            clock,
        }
    }

    /// Token lifetime in seconds; cookie expiry mirrors this.
    #[must_use]
    pub const fn ttl_secs(&self) -> i64 {
        TOKEN_TTL_SECS
    }

    /// Issue a signed token for this identity, expiring in two hours.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::TokenCreation` if signing fails.
    pub fn issue(&self, email: &Email) -> Result<String, AuthError> {
        let claims = Claims {
            sub: email.as_str().to_owned(),
            exp: self.clock.now_epoch_secs() + TOKEN_TTL_SECS,
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|_| AuthError::TokenCreation)
    }

    /// Verify a token and return the identity it was issued for.
    ///
    /// Signature validation is delegated to `jsonwebtoken`; the expiry
    /// comparison happens exactly once here, against the injected clock.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidToken` for a malformed or mis-signed
    /// token, `AuthError::TokenExpired` at or past the expiry instant.
    pub fn verify(&self, token: &str) -> Result<String, AuthError> {
        let mut validation = Validation::new(Algorithm::HS256);
        // Expiry is checked below with the injected clock, not twice.
        validation.validate_exp = false;
        validation.required_spec_claims = std::collections::HashSet::from(["exp".to_string()]);

        let data = decode::<Claims>(token, &self.decoding, &validation)
            .map_err(|_| AuthError::InvalidToken)?;

        // RFC 7519: a token is expired from its exp instant onward.
        if data.claims.exp <= self.clock.now_epoch_secs() {
            return Err(AuthError::TokenExpired);
        }

        Ok(data.claims.sub)
    }
}

// =============================================================================
// AuthService
// =============================================================================

/// Authentication service.
///
/// Handles user registration, login, and token issuance.
pub struct AuthService<'a> {
    users: UserRepository<'a>,
    tokens: &'a TokenAuthority,
}

impl<'a> AuthService<'a> {
    /// Create a new authentication service.
    #[must_use]
    pub const fn new(pool: &'a PgPool, tokens: &'a TokenAuthority) -> Self {
        Self {
            users: UserRepository::new(pool),
            tokens,
        }
    }

    /// Register a new user with name, email, and password.
    ///
    /// The password is replaced by a salted Argon2id hash before anything is
    /// persisted; the plaintext is never stored or logged.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidEmail` if the email format is invalid.
    /// Returns `AuthError::PasswordHash` or `AuthError::Repository` on
    /// internal failure.
    pub async fn register(
        &self,
        name: &str,
        email: &str,
        password: &str,
    ) -> Result<User, AuthError> {
        let email = Email::parse(email)?;
        let password_hash = hash_password(password)?;

        let user = self.users.create(name, &email, &password_hash).await?;

        Ok(user)
    }

    /// Login with email and password, returning the user and a fresh token.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidCredentials` for an unknown email and for
    /// a wrong password alike; the two are indistinguishable by design.
    pub async fn login(&self, email: &str, password: &str) -> Result<(User, String), AuthError> {
        // An unparseable email cannot belong to any user; same rejection.
        let email = Email::parse(email).map_err(|_| AuthError::InvalidCredentials)?;

        let (user, password_hash) = self
            .users
            .get_password_hash(&email)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        verify_password(password, &password_hash)?;

        let token = self.tokens.issue(&user.email)?;

        Ok((user, token))
    }
}

/// Hash a password using Argon2id.
fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|_| AuthError::PasswordHash)
}

/// Verify a password against a hash.
fn verify_password(password: &str, hash: &str) -> Result<(), AuthError> {
    let parsed_hash = PasswordHash::new(hash).map_err(|_| AuthError::InvalidCredentials)?;
    let argon2 = Argon2::default();

    argon2
        .verify_password(password.as_bytes(), &parsed_hash)
        .map_err(|_| AuthError::InvalidCredentials)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn secret() -> SecretString {
        SecretString::from("kX9vQ2mWx7pL4nR8tZ1cB6yH3dF5gJ0a")
    }

    fn email() -> Email {
        Email::parse("a@b.com").unwrap()
    }

    /// 2024-01-01 00:00:00 UTC
    const T0: i64 = 1_704_067_200;

    #[test]
    fn test_issue_then_verify_roundtrip() {
        let authority = TokenAuthority::with_clock(&secret(), Arc::new(FixedClock(T0)));

        let token = authority.issue(&email()).unwrap();
        let identity = authority.verify(&token).unwrap();

        assert_eq!(identity, "a@b.com");
    }

    #[test]
    fn test_verify_after_expiry_fails() {
        let issuer = TokenAuthority::with_clock(&secret(), Arc::new(FixedClock(T0)));
        let token = issuer.issue(&email()).unwrap();

        // Same secret, clock one second past the expiry instant.
        let later = TokenAuthority::with_clock(
            &secret(),
            Arc::new(FixedClock(T0 + TOKEN_TTL_SECS + 1)),
        );

        assert!(matches!(
            later.verify(&token),
            Err(AuthError::TokenExpired)
        ));
    }

    #[test]
    fn test_verify_at_expiry_instant_fails() {
        let issuer = TokenAuthority::with_clock(&secret(), Arc::new(FixedClock(T0)));
        let token = issuer.issue(&email()).unwrap();

        // A token is expired from its exp instant onward, not one past it.
        let at_expiry = TokenAuthority::with_clock(
            &secret(),
            Arc::new(FixedClock(T0 + TOKEN_TTL_SECS)),
        );

        assert!(matches!(
            at_expiry.verify(&token),
            Err(AuthError::TokenExpired)
        ));
    }

    #[test]
    fn test_verify_just_before_expiry_succeeds() {
        let issuer = TokenAuthority::with_clock(&secret(), Arc::new(FixedClock(T0)));
        let token = issuer.issue(&email()).unwrap();

        let almost = TokenAuthority::with_clock(
            &secret(),
            Arc::new(FixedClock(T0 + TOKEN_TTL_SECS - 1)),
        );

        assert!(almost.verify(&token).is_ok());
    }

    #[test]
    fn test_verify_rejects_wrong_secret() {
        let authority = TokenAuthority::with_clock(&secret(), Arc::new(FixedClock(T0)));
        let token = authority.issue(&email()).unwrap();

        let other = TokenAuthority::with_clock(
            &SecretString::from("another-signing-key-entirely-0123456789"),
            Arc::new(FixedClock(T0)),
        );

        assert!(matches!(
            other.verify(&token),
            Err(AuthError::InvalidToken)
        ));
    }

    #[test]
    fn test_verify_rejects_garbage() {
        let authority = TokenAuthority::with_clock(&secret(), Arc::new(FixedClock(T0)));

        assert!(matches!(
            authority.verify("not-a-token"),
            Err(AuthError::InvalidToken)
        ));
        assert!(matches!(authority.verify(""), Err(AuthError::InvalidToken)));
    }

    #[test]
    fn test_password_hash_roundtrip() {
        let hash = hash_password("hunter22").unwrap();

        assert_ne!(hash, "hunter22");
        assert!(verify_password("hunter22", &hash).is_ok());
        assert!(matches!(
            verify_password("wrong", &hash),
            Err(AuthError::InvalidCredentials)
        ));
    }

    #[test]
    fn test_hashes_are_salted() {
        let first = hash_password("hunter22").unwrap();
        let second = hash_password("hunter22").unwrap();

        assert_ne!(first, second);
    }
}
