//! Car CRUD handlers.
//!
//! Every mutation that sets `make_id` runs the referential-integrity guard
//! first; a car is never persisted pointing at an absent make.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::Deserialize;

use carvault_core::{CarId, MakeId};

use crate::cache;
use crate::db::{CarRepository, MakeRepository};
use crate::error::{AppError, AppJson};
use crate::models::Car;
use crate::services::integrity::ensure_make_exists;
use crate::services::listing::cached_listing;
use crate::state::AppState;

/// Client-supplied car fields.
///
/// Carries no id: identity always comes from the path, so a payload can
/// never re-point a record.
#[derive(Debug, Deserialize)]
pub struct CarInput {
    pub name: String,
    pub make_id: MakeId,
    pub year: i32,
    pub price: i32,
}

/// List all cars, served through the listing cache.
pub async fn index(State(state): State<AppState>) -> Result<Json<Vec<Car>>, AppError> {
    let repo = CarRepository::new(state.pool());
    let cars = cached_listing(state.cache(), cache::ALL_CARS, || async { repo.list().await }).await?;

    Ok(Json(cars))
}

/// Get a single car.
pub async fn show(
    State(state): State<AppState>,
    Path(id): Path<CarId>,
) -> Result<Json<Car>, AppError> {
    let car = CarRepository::new(state.pool())
        .get(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Car not found".to_owned()))?;

    Ok(Json(car))
}

/// Create a car after validating its make reference.
pub async fn create(
    State(state): State<AppState>,
    AppJson(input): AppJson<CarInput>,
) -> Result<(StatusCode, Json<Car>), AppError> {
    let makes = MakeRepository::new(state.pool());
    ensure_make_exists(&makes, input.make_id).await?;

    let car = CarRepository::new(state.pool())
        .create(&input.name, input.make_id, input.year, input.price)
        .await?;

    Ok((StatusCode::CREATED, Json(car)))
}

/// Replace a car's fields after validating the new make reference.
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<CarId>,
    AppJson(input): AppJson<CarInput>,
) -> Result<Json<Car>, AppError> {
    let cars = CarRepository::new(state.pool());

    // The car must exist before its new make reference is even considered.
    let existing = cars
        .get(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Car not found".to_owned()))?;

    let makes = MakeRepository::new(state.pool());
    ensure_make_exists(&makes, input.make_id).await?;

    let car = cars
        .update(
            existing.id,
            &input.name,
            input.make_id,
            input.year,
            input.price,
        )
        .await?
        .ok_or_else(|| AppError::NotFound("Car not found".to_owned()))?;

    Ok(Json(car))
}

/// Soft-delete a car.
pub async fn destroy(
    State(state): State<AppState>,
    Path(id): Path<CarId>,
) -> Result<StatusCode, AppError> {
    let deleted = CarRepository::new(state.pool()).soft_delete(id).await?;

    if deleted {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::NotFound("Car not found".to_owned()))
    }
}
