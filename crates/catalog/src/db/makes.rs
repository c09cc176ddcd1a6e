//! Make repository for database operations.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};

use carvault_core::MakeId;

use super::RepositoryError;
use crate::models::{Car, Make};
use crate::services::integrity::MakeLookup;

/// Row shape shared by every make query.
#[derive(Debug, FromRow)]
struct MakeRow {
    id: MakeId,
    name: String,
    foundation_year: i32,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl MakeRow {
    fn into_make(self, cars: Vec<Car>) -> Make {
        Make {
            id: self.id,
            name: self.name,
            foundation_year: self.foundation_year,
            cars,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

/// Repository for make database operations.
pub struct MakeRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> MakeRepository<'a> {
    /// Create a new make repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List all makes ordered by id ascending, with their cars eagerly loaded.
    ///
    /// Cars are fetched in a single second query and bucketed by `make_id`.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails.
    pub async fn list_with_cars(&self) -> Result<Vec<Make>, RepositoryError> {
        let rows = sqlx::query_as::<_, MakeRow>(
            "SELECT id, name, foundation_year, created_at, updated_at
             FROM makes
             WHERE deleted_at IS NULL
             ORDER BY id ASC",
        )
        .fetch_all(self.pool)
        .await?;

        let cars = sqlx::query_as::<_, Car>(
            "SELECT id, name, make_id, year, price, created_at, updated_at
             FROM cars
             WHERE deleted_at IS NULL
             ORDER BY id ASC",
        )
        .fetch_all(self.pool)
        .await?;

        let mut by_make: HashMap<MakeId, Vec<Car>> = HashMap::new();
        for car in cars {
            by_make.entry(car.make_id).or_default().push(car);
        }

        Ok(rows
            .into_iter()
            .map(|row| {
                let cars = by_make.remove(&row.id).unwrap_or_default();
                row.into_make(cars)
            })
            .collect())
    }

    /// Get a make by id with its cars eagerly loaded.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails.
    pub async fn get(&self, id: MakeId) -> Result<Option<Make>, RepositoryError> {
        let row = sqlx::query_as::<_, MakeRow>(
            "SELECT id, name, foundation_year, created_at, updated_at
             FROM makes
             WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        match row {
            Some(row) => {
                let cars = self.cars_of(row.id).await?;
                Ok(Some(row.into_make(cars)))
            }
            None => Ok(None),
        }
    }

    /// Create a new make.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    pub async fn create(&self, name: &str, foundation_year: i32) -> Result<Make, RepositoryError> {
        let row = sqlx::query_as::<_, MakeRow>(
            "INSERT INTO makes (name, foundation_year)
             VALUES ($1, $2)
             RETURNING id, name, foundation_year, created_at, updated_at",
        )
        .bind(name)
        .bind(foundation_year)
        .fetch_one(self.pool)
        .await?;

        Ok(row.into_make(Vec::new()))
    }

    /// Replace a make's fields, preserving its identity.
    ///
    /// Returns `None` if the make does not exist or is soft-deleted.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the update fails.
    pub async fn update(
        &self,
        id: MakeId,
        name: &str,
        foundation_year: i32,
    ) -> Result<Option<Make>, RepositoryError> {
        let row = sqlx::query_as::<_, MakeRow>(
            "UPDATE makes
             SET name = $1, foundation_year = $2, updated_at = now()
             WHERE id = $3 AND deleted_at IS NULL
             RETURNING id, name, foundation_year, created_at, updated_at",
        )
        .bind(name)
        .bind(foundation_year)
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        match row {
            Some(row) => {
                let cars = self.cars_of(row.id).await?;
                Ok(Some(row.into_make(cars)))
            }
            None => Ok(None),
        }
    }

    /// Soft-delete a make by stamping `deleted_at`.
    ///
    /// Returns `true` if a live make was deleted, `false` if none matched.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the update fails.
    pub async fn soft_delete(&self, id: MakeId) -> Result<bool, RepositoryError> {
        let result = sqlx::query(
            "UPDATE makes
             SET deleted_at = now(), updated_at = now()
             WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(id)
        .execute(self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn cars_of(&self, id: MakeId) -> Result<Vec<Car>, RepositoryError> {
        let cars = sqlx::query_as::<_, Car>(
            "SELECT id, name, make_id, year, price, created_at, updated_at
             FROM cars
             WHERE make_id = $1 AND deleted_at IS NULL
             ORDER BY id ASC",
        )
        .bind(id)
        .fetch_all(self.pool)
        .await?;

        Ok(cars)
    }
}

#[async_trait]
impl MakeLookup for MakeRepository<'_> {
    async fn make_exists(&self, id: MakeId) -> Result<bool, RepositoryError> {
        let exists: bool = sqlx::query_scalar(
            "SELECT EXISTS (SELECT 1 FROM makes WHERE id = $1 AND deleted_at IS NULL)",
        )
        .bind(id)
        .fetch_one(self.pool)
        .await?;

        Ok(exists)
    }
}
