//! Referential-integrity guard for Car → Make references.
//!
//! Invoked before every car create and update so that no car is ever
//! persisted pointing at an absent or soft-deleted make. The guard runs
//! strictly before the write; validation and write are not wrapped in a
//! transaction, so the only remaining failure window is the store itself
//! failing after validation succeeds.

use async_trait::async_trait;

use carvault_core::MakeId;

use crate::db::RepositoryError;
use crate::error::AppError;

/// Lookup seam for make existence, substitutable in tests.
#[async_trait]
pub trait MakeLookup: Send + Sync {
    /// Whether a live (non-soft-deleted) make with this id exists.
    async fn make_exists(&self, id: MakeId) -> Result<bool, RepositoryError>;
}

/// Reject the mutation if `make_id` does not reference a live make.
///
/// # Errors
///
/// Returns `AppError::NotFound` ("Make not found") for an absent or
/// soft-deleted make, or `AppError::Repository` if the lookup itself fails.
pub async fn ensure_make_exists(lookup: &impl MakeLookup, id: MakeId) -> Result<(), AppError> {
    if lookup.make_exists(id).await? {
        Ok(())
    } else {
        Err(AppError::NotFound("Make not found".to_owned()))
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    struct FakeMakes(HashSet<i32>);

    #[async_trait]
    impl MakeLookup for FakeMakes {
        async fn make_exists(&self, id: MakeId) -> Result<bool, RepositoryError> {
            Ok(self.0.contains(&id.as_i32()))
        }
    }

    struct BrokenMakes;

    #[async_trait]
    impl MakeLookup for BrokenMakes {
        async fn make_exists(&self, _id: MakeId) -> Result<bool, RepositoryError> {
            Err(RepositoryError::DataCorruption("boom".to_owned()))
        }
    }

    #[tokio::test]
    async fn test_existing_make_passes() {
        let makes = FakeMakes(HashSet::from([1, 2]));
        assert!(ensure_make_exists(&makes, MakeId::new(1)).await.is_ok());
    }

    #[tokio::test]
    async fn test_missing_make_is_not_found() {
        let makes = FakeMakes(HashSet::from([1]));
        let err = ensure_make_exists(&makes, MakeId::new(9999))
            .await
            .unwrap_err();

        match err {
            AppError::NotFound(msg) => assert_eq!(msg, "Make not found"),
            other => panic!("expected NotFound, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_lookup_failure_propagates() {
        let err = ensure_make_exists(&BrokenMakes, MakeId::new(1))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Repository(_)));
    }
}
