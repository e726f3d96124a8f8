//! Household resolver: maps an authenticated user to their household.

use sea_orm::{ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter};
use uuid::Uuid;

use crate::entities::households;

/// Error types for household resolution.
#[derive(Debug, thiserror::Error)]
pub enum HouseholdError {
    /// No household exists for this user.
    #[error("No household for user: {0}")]
    NotFound(Uuid),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Repository resolving users to their single household.
#[derive(Debug, Clone)]
pub struct HouseholdRepository {
    db: DatabaseConnection,
}

impl HouseholdRepository {
    /// Creates a new household repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Finds the household owned by a user. Exactly one exists per user.
    ///
    /// # Errors
    ///
    /// Returns `HouseholdError::NotFound` if the user has no household.
    pub async fn find_by_user(&self, user_id: Uuid) -> Result<households::Model, HouseholdError> {
        households::Entity::find()
            .filter(households::Column::UserId.eq(user_id))
            .one(&self.db)
            .await?
            .ok_or(HouseholdError::NotFound(user_id))
    }
}
