//! Make domain type.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use carvault_core::MakeId;

use super::Car;

/// A vehicle make, owning a collection of cars.
///
/// Listings carry the cars eagerly loaded, ordered by id ascending.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Make {
    /// Unique make ID.
    pub id: MakeId,
    /// Make name (e.g., "Toyota").
    pub name: String,
    /// Year the make was founded.
    pub foundation_year: i32,
    /// Cars belonging to this make.
    pub cars: Vec<Car>,
    /// When the make was created.
    pub created_at: DateTime<Utc>,
    /// When the make was last updated.
    pub updated_at: DateTime<Utc>,
}
