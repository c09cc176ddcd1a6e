//! Make CRUD handlers.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::Deserialize;

use carvault_core::MakeId;

use crate::cache;
use crate::db::MakeRepository;
use crate::error::{AppError, AppJson};
use crate::models::Make;
use crate::services::listing::cached_listing;
use crate::state::AppState;

/// Client-supplied make fields.
///
/// Carries no id: identity always comes from the path, so a payload can
/// never re-point a record.
#[derive(Debug, Deserialize)]
pub struct MakeInput {
    pub name: String,
    pub foundation_year: i32,
}

/// List all makes with their cars, served through the listing cache.
pub async fn index(State(state): State<AppState>) -> Result<Json<Vec<Make>>, AppError> {
    let repo = MakeRepository::new(state.pool());
    let makes = cached_listing(state.cache(), cache::ALL_MAKES, || async {
        repo.list_with_cars().await
    })
    .await?;

    Ok(Json(makes))
}

/// Get a single make with its cars.
pub async fn show(
    State(state): State<AppState>,
    Path(id): Path<MakeId>,
) -> Result<Json<Make>, AppError> {
    let make = MakeRepository::new(state.pool())
        .get(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Make not found".to_owned()))?;

    Ok(Json(make))
}

/// Create a make.
pub async fn create(
    State(state): State<AppState>,
    AppJson(input): AppJson<MakeInput>,
) -> Result<(StatusCode, Json<Make>), AppError> {
    let make = MakeRepository::new(state.pool())
        .create(&input.name, input.foundation_year)
        .await?;

    Ok((StatusCode::CREATED, Json(make)))
}

/// Replace a make's fields.
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<MakeId>,
    AppJson(input): AppJson<MakeInput>,
) -> Result<Json<Make>, AppError> {
    let make = MakeRepository::new(state.pool())
        .update(id, &input.name, input.foundation_year)
        .await?
        .ok_or_else(|| AppError::NotFound("Make not found".to_owned()))?;

    Ok(Json(make))
}

/// Soft-delete a make.
pub async fn destroy(
    State(state): State<AppState>,
    Path(id): Path<MakeId>,
) -> Result<StatusCode, AppError> {
    let deleted = MakeRepository::new(state.pool()).soft_delete(id).await?;

    if deleted {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::NotFound("Make not found".to_owned()))
    }
}
