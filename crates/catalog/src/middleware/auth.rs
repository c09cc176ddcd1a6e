//! Authentication middleware and extractors.
//!
//! The token gate: protected handlers take [`RequireAuth`], which reads the
//! signed token from the request's cookie and verifies it against the
//! process-wide [`crate::services::auth::TokenAuthority`]. The token is the
//! complete authorization state; no session is consulted.

use axum::{extract::FromRequestParts, http::request::Parts};
use axum_extra::extract::{
    CookieJar,
    cookie::{Cookie, SameSite},
};
use time::{Duration, OffsetDateTime};

use crate::error::AppError;
use crate::services::auth::AuthError;
use crate::state::AppState;

/// Name of the cookie carrying the signed token.
pub const TOKEN_COOKIE: &str = "token";

/// The identity a verified token was issued for.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    /// Email the token's subject claim names.
    pub email: String,
}

/// Extractor that requires a valid token cookie.
///
/// Rejects with 401 before the handler body runs: `MissingToken` when no
/// cookie is present, `InvalidToken`/`TokenExpired` when verification fails.
///
/// # Example
///
/// ```rust,ignore
/// async fn protected_handler(
///     RequireAuth(user): RequireAuth,
/// ) -> impl IntoResponse {
///     format!("Hello, {}!", user.email)
/// }
/// ```
pub struct RequireAuth(pub AuthenticatedUser);

impl FromRequestParts<AppState> for RequireAuth {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let jar = CookieJar::from_headers(&parts.headers);

        let token = jar.get(TOKEN_COOKIE).ok_or(AuthError::MissingToken)?;
        let email = state.tokens().verify(token.value())?;

        Ok(Self(AuthenticatedUser { email }))
    }
}

/// Build the cookie that carries a freshly issued token.
///
/// `HttpOnly` keeps the token away from scripts; `SameSite=Strict` keeps it
/// off cross-site requests. Cookie expiry mirrors the token's own lifetime.
#[must_use]
pub fn auth_cookie(token: String, ttl_secs: i64) -> Cookie<'static> {
    Cookie::build((TOKEN_COOKIE, token))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Strict)
        .expires(OffsetDateTime::now_utc() + Duration::seconds(ttl_secs))
        .build()
}

/// Build the cookie that clears the token on logout.
///
/// Empty value, expiry in the past; browsers drop the cookie on receipt.
#[must_use]
pub fn expired_cookie() -> Cookie<'static> {
    Cookie::build((TOKEN_COOKIE, ""))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Strict)
        .expires(OffsetDateTime::now_utc() - Duration::hours(1))
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auth_cookie_attributes() {
        let cookie = auth_cookie("tok".to_owned(), 7200);

        assert_eq!(cookie.name(), TOKEN_COOKIE);
        assert_eq!(cookie.value(), "tok");
        assert_eq!(cookie.path(), Some("/"));
        assert_eq!(cookie.http_only(), Some(true));
        assert_eq!(cookie.same_site(), Some(SameSite::Strict));

        let expires = cookie
            .expires_datetime()
            .expect("auth cookie must carry an expiry");
        assert!(expires > OffsetDateTime::now_utc());
    }

    #[test]
    fn test_expired_cookie_clears_token() {
        let cookie = expired_cookie();

        assert_eq!(cookie.name(), TOKEN_COOKIE);
        assert_eq!(cookie.value(), "");

        let expires = cookie
            .expires_datetime()
            .expect("logout cookie must carry an expiry");
        assert!(expires < OffsetDateTime::now_utc());
    }
}
