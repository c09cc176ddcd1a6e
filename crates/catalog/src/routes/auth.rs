//! Registration, login, logout, and user listing handlers.

use axum::{Json, extract::State, http::StatusCode};
use axum_extra::extract::CookieJar;
use serde::Deserialize;
use serde_json::{Value, json};

use crate::db::UserRepository;
use crate::error::{AppError, AppJson};
use crate::middleware::{RequireAuth, auth_cookie, expired_cookie};
use crate::models::User;
use crate::services::auth::AuthService;
use crate::state::AppState;

/// Registration payload.
#[derive(Debug, Deserialize)]
pub struct RegisterInput {
    pub name: String,
    pub email: String,
    pub password: String,
}

/// Login payload.
#[derive(Debug, Deserialize)]
pub struct LoginInput {
    pub email: String,
    pub password: String,
}

/// Register a new user account.
pub async fn register(
    State(state): State<AppState>,
    AppJson(input): AppJson<RegisterInput>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    let service = AuthService::new(state.pool(), state.tokens());
    let user = service
        .register(&input.name, &input.email, &input.password)
        .await?;

    tracing::info!(user_id = %user.id, "user registered");

    Ok((
        StatusCode::CREATED,
        Json(json!({ "message": "User created", "user": user })),
    ))
}

/// Login with email and password, setting the token cookie.
///
/// The token is returned in the body as well so non-browser clients can
/// carry it themselves.
pub async fn login(
    State(state): State<AppState>,
    AppJson(input): AppJson<LoginInput>,
) -> Result<(CookieJar, Json<Value>), AppError> {
    let service = AuthService::new(state.pool(), state.tokens());
    let (user, token) = service.login(&input.email, &input.password).await?;

    tracing::info!(user_id = %user.id, "user logged in");

    let jar = CookieJar::new().add(auth_cookie(token.clone(), state.tokens().ttl_secs()));

    Ok((
        jar,
        Json(json!({ "message": "Login successful", "token": token })),
    ))
}

/// Logout by expiring the token cookie.
///
/// Stateless: nothing is revoked server-side, the browser just drops the
/// cookie. An attacker holding a copied token keeps it until expiry.
pub async fn logout(RequireAuth(_user): RequireAuth) -> (CookieJar, Json<Value>) {
    let jar = CookieJar::new().add(expired_cookie());

    (jar, Json(json!({ "message": "Logout successful" })))
}

/// List all user accounts. Requires a valid token.
pub async fn list_users(
    RequireAuth(_user): RequireAuth,
    State(state): State<AppState>,
) -> Result<Json<Vec<User>>, AppError> {
    let users = UserRepository::new(state.pool()).list().await?;

    Ok(Json(users))
}
