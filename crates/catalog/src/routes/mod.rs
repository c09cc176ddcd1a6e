//! HTTP route handlers for the catalog API.
//!
//! # Route Structure
//!
//! ```text
//! GET    /              - Welcome message
//! GET    /health        - Liveness check
//! GET    /health/ready  - Readiness check (database ping)
//!
//! # Auth
//! POST   /register      - Create a user account
//! POST   /login         - Login, sets the token cookie
//! POST   /auth/logout   - Logout, clears the token cookie (requires token)
//! GET    /users         - List users (requires token)
//!
//! # Makes
//! GET    /makes         - List makes with their cars (cached)
//! POST   /makes         - Create a make
//! GET    /makes/{id}    - Get a make with its cars
//! PUT    /makes/{id}    - Update a make
//! DELETE /makes/{id}    - Soft-delete a make
//!
//! # Cars
//! GET    /cars          - List cars (cached)
//! POST   /cars          - Create a car (make must exist)
//! GET    /cars/{id}     - Get a car
//! PUT    /cars/{id}     - Update a car (make must exist)
//! DELETE /cars/{id}     - Soft-delete a car
//! ```

pub mod auth;
pub mod cars;
pub mod makes;

use axum::{
    Json, Router,
    routing::{get, post},
};
use serde_json::json;

use crate::state::AppState;

/// Create the API router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(home))
        .route("/register", post(auth::register))
        .route("/login", post(auth::login))
        .route("/users", get(auth::list_users))
        .route("/auth/logout", post(auth::logout))
        .nest("/makes", make_routes())
        .nest("/cars", car_routes())
}

fn make_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(makes::index).post(makes::create))
        .route(
            "/{id}",
            get(makes::show).put(makes::update).delete(makes::destroy),
        )
}

fn car_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cars::index).post(cars::create))
        .route(
            "/{id}",
            get(cars::show).put(cars::update).delete(cars::destroy),
        )
}

/// Welcome handler for the API root.
async fn home() -> Json<serde_json::Value> {
    Json(json!({ "message": "Welcome to CarVault" }))
}
