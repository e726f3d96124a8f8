//! Household member repository.

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, QueryOrder,
    Set,
};
use uuid::Uuid;

use crate::entities::household_members;

/// Error types for member operations.
#[derive(Debug, thiserror::Error)]
pub enum MemberError {
    /// Member not found in this household.
    #[error("Household member not found: {0}")]
    NotFound(Uuid),

    /// Member name is empty after trimming.
    #[error("Member name must not be empty")]
    EmptyName,

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Repository for household member CRUD.
///
/// Members are only ever soft-deleted (`is_active = false`) because incomes
/// keep referencing them.
#[derive(Debug, Clone)]
pub struct MemberRepository {
    db: DatabaseConnection,
}

impl MemberRepository {
    /// Creates a new member repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Creates a member in a household.
    ///
    /// # Errors
    ///
    /// Returns an error if the name is empty or the insert fails.
    pub async fn create(
        &self,
        household_id: Uuid,
        full_name: &str,
    ) -> Result<household_members::Model, MemberError> {
        let full_name = full_name.trim();
        if full_name.is_empty() {
            return Err(MemberError::EmptyName);
        }

        let now = Utc::now().into();
        let member = household_members::ActiveModel {
            id: Set(Uuid::new_v4()),
            household_id: Set(household_id),
            full_name: Set(full_name.to_string()),
            is_active: Set(true),
            created_at: Set(now),
            updated_at: Set(now),
        };

        Ok(member.insert(&self.db).await?)
    }

    /// Lists members of a household, optionally including deactivated ones.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub async fn list(
        &self,
        household_id: Uuid,
        include_inactive: bool,
    ) -> Result<Vec<household_members::Model>, MemberError> {
        let mut query = household_members::Entity::find()
            .filter(household_members::Column::HouseholdId.eq(household_id));

        if !include_inactive {
            query = query.filter(household_members::Column::IsActive.eq(true));
        }

        Ok(query
            .order_by_asc(household_members::Column::FullName)
            .all(&self.db)
            .await?)
    }

    /// Renames a member.
    ///
    /// # Errors
    ///
    /// Returns an error if the member is not found or the update fails.
    pub async fn rename(
        &self,
        household_id: Uuid,
        member_id: Uuid,
        full_name: &str,
    ) -> Result<household_members::Model, MemberError> {
        let full_name = full_name.trim();
        if full_name.is_empty() {
            return Err(MemberError::EmptyName);
        }

        let member = self.get(household_id, member_id).await?;

        let mut active: household_members::ActiveModel = member.into();
        active.full_name = Set(full_name.to_string());
        active.updated_at = Set(Utc::now().into());

        Ok(active.update(&self.db).await?)
    }

    /// Soft-deletes a member by setting `is_active = false`.
    ///
    /// # Errors
    ///
    /// Returns an error if the member is not found or the update fails.
    pub async fn deactivate(
        &self,
        household_id: Uuid,
        member_id: Uuid,
    ) -> Result<household_members::Model, MemberError> {
        let member = self.get(household_id, member_id).await?;

        let mut active: household_members::ActiveModel = member.into();
        active.is_active = Set(false);
        active.updated_at = Set(Utc::now().into());

        Ok(active.update(&self.db).await?)
    }

    async fn get(
        &self,
        household_id: Uuid,
        member_id: Uuid,
    ) -> Result<household_members::Model, MemberError> {
        household_members::Entity::find_by_id(member_id)
            .filter(household_members::Column::HouseholdId.eq(household_id))
            .one(&self.db)
            .await?
            .ok_or(MemberError::NotFound(member_id))
    }
}
