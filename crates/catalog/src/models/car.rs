//! Car domain type.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use carvault_core::{CarId, MakeId};

/// A car in the catalog.
///
/// `Deserialize` is required because cached listing snapshots round-trip
/// through JSON.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Car {
    /// Unique car ID.
    pub id: CarId,
    /// Model name (e.g., "Corolla").
    pub name: String,
    /// The make this car belongs to.
    pub make_id: MakeId,
    /// Model year.
    pub year: i32,
    /// List price.
    pub price: i32,
    /// When the car was created.
    pub created_at: DateTime<Utc>,
    /// When the car was last updated.
    pub updated_at: DateTime<Utc>,
}
