//! Car repository for database operations.

use sqlx::PgPool;

use carvault_core::{CarId, MakeId};

use super::RepositoryError;
use crate::models::Car;

/// Repository for car database operations.
pub struct CarRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> CarRepository<'a> {
    /// Create a new car repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List all cars ordered by id ascending.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(&self) -> Result<Vec<Car>, RepositoryError> {
        let cars = sqlx::query_as::<_, Car>(
            "SELECT id, name, make_id, year, price, created_at, updated_at
             FROM cars
             WHERE deleted_at IS NULL
             ORDER BY id ASC",
        )
        .fetch_all(self.pool)
        .await?;

        Ok(cars)
    }

    /// Get a car by id.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get(&self, id: CarId) -> Result<Option<Car>, RepositoryError> {
        let car = sqlx::query_as::<_, Car>(
            "SELECT id, name, make_id, year, price, created_at, updated_at
             FROM cars
             WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(car)
    }

    /// Create a new car.
    ///
    /// The make reference must already have been validated; this is a plain
    /// insert.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    pub async fn create(
        &self,
        name: &str,
        make_id: MakeId,
        year: i32,
        price: i32,
    ) -> Result<Car, RepositoryError> {
        let car = sqlx::query_as::<_, Car>(
            "INSERT INTO cars (name, make_id, year, price)
             VALUES ($1, $2, $3, $4)
             RETURNING id, name, make_id, year, price, created_at, updated_at",
        )
        .bind(name)
        .bind(make_id)
        .bind(year)
        .bind(price)
        .fetch_one(self.pool)
        .await?;

        Ok(car)
    }

    /// Replace a car's fields, preserving its identity.
    ///
    /// The row id comes from the `id` argument (taken from the pre-existing
    /// record), never from client input. Returns `None` if the car does not
    /// exist or is soft-deleted.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the update fails.
    pub async fn update(
        &self,
        id: CarId,
        name: &str,
        make_id: MakeId,
        year: i32,
        price: i32,
    ) -> Result<Option<Car>, RepositoryError> {
        let car = sqlx::query_as::<_, Car>(
            "UPDATE cars
             SET name = $1, make_id = $2, year = $3, price = $4, updated_at = now()
             WHERE id = $5 AND deleted_at IS NULL
             RETURNING id, name, make_id, year, price, created_at, updated_at",
        )
        .bind(name)
        .bind(make_id)
        .bind(year)
        .bind(price)
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(car)
    }

    /// Soft-delete a car by stamping `deleted_at`.
    ///
    /// Returns `true` if a live car was deleted, `false` if none matched.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the update fails.
    pub async fn soft_delete(&self, id: CarId) -> Result<bool, RepositoryError> {
        let result = sqlx::query(
            "UPDATE cars
             SET deleted_at = now(), updated_at = now()
             WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(id)
        .execute(self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}
