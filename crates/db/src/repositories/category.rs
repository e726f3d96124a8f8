//! Category repository with per-household, case-insensitive name uniqueness.

use chrono::Utc;
use sea_orm::sea_query::{Expr, ExprTrait, Func};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, QueryOrder,
    Set, SqlErr,
};
use uuid::Uuid;

use crate::entities::categories;

/// Error types for category operations.
#[derive(Debug, thiserror::Error)]
pub enum CategoryError {
    /// Category not found in this household.
    #[error("Category not found: {0}")]
    NotFound(Uuid),

    /// Category name already exists in this household.
    #[error("Category name '{0}' already exists")]
    DuplicateName(String),

    /// Category name is empty after trimming.
    #[error("Category name must not be empty")]
    EmptyName,

    /// Category is referenced by planned expenses or transactions.
    #[error("Category is in use and cannot be deleted")]
    InUse,

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Repository for category CRUD.
#[derive(Debug, Clone)]
pub struct CategoryRepository {
    db: DatabaseConnection,
}

impl CategoryRepository {
    /// Creates a new category repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Creates a category. Name is unique per household, case-insensitively.
    ///
    /// # Errors
    ///
    /// Returns `CategoryError::DuplicateName` when a category with the same
    /// name (ignoring case) already exists.
    pub async fn create(
        &self,
        household_id: Uuid,
        name: &str,
    ) -> Result<categories::Model, CategoryError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(CategoryError::EmptyName);
        }

        self.check_name_available(household_id, name).await?;

        let now = Utc::now().into();
        let category = categories::ActiveModel {
            id: Set(Uuid::new_v4()),
            household_id: Set(household_id),
            name: Set(name.to_string()),
            created_at: Set(now),
            updated_at: Set(now),
        };

        // The unique index on (household_id, lower(name)) closes the race
        // between the check above and this insert.
        category.insert(&self.db).await.map_err(|e| {
            if matches!(e.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) {
                CategoryError::DuplicateName(name.to_string())
            } else {
                CategoryError::Database(e)
            }
        })
    }

    /// Lists categories of a household.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub async fn list(&self, household_id: Uuid) -> Result<Vec<categories::Model>, CategoryError> {
        Ok(categories::Entity::find()
            .filter(categories::Column::HouseholdId.eq(household_id))
            .order_by_asc(categories::Column::Name)
            .all(&self.db)
            .await?)
    }

    /// Renames a category, keeping the uniqueness rule.
    ///
    /// # Errors
    ///
    /// Returns an error if the category is missing or the name collides.
    pub async fn rename(
        &self,
        household_id: Uuid,
        category_id: Uuid,
        name: &str,
    ) -> Result<categories::Model, CategoryError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(CategoryError::EmptyName);
        }

        let category = categories::Entity::find_by_id(category_id)
            .filter(categories::Column::HouseholdId.eq(household_id))
            .one(&self.db)
            .await?
            .ok_or(CategoryError::NotFound(category_id))?;

        if !category.name.eq_ignore_ascii_case(name) {
            self.check_name_available(household_id, name).await?;
        }

        let mut active: categories::ActiveModel = category.into();
        active.name = Set(name.to_string());
        active.updated_at = Set(Utc::now().into());

        active.update(&self.db).await.map_err(|e| {
            if matches!(e.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) {
                CategoryError::DuplicateName(name.to_string())
            } else {
                CategoryError::Database(e)
            }
        })
    }

    /// Deletes a category. Fails while planned expenses or transactions
    /// still reference it (restrict FKs).
    ///
    /// # Errors
    ///
    /// Returns `CategoryError::InUse` when references remain.
    pub async fn delete(&self, household_id: Uuid, category_id: Uuid) -> Result<(), CategoryError> {
        let result = categories::Entity::delete_by_id(category_id)
            .filter(categories::Column::HouseholdId.eq(household_id))
            .exec(&self.db)
            .await
            .map_err(|e| {
                if matches!(e.sql_err(), Some(SqlErr::ForeignKeyConstraintViolation(_))) {
                    CategoryError::InUse
                } else {
                    CategoryError::Database(e)
                }
            })?;

        if result.rows_affected == 0 {
            return Err(CategoryError::NotFound(category_id));
        }

        Ok(())
    }

    async fn check_name_available(
        &self,
        household_id: Uuid,
        name: &str,
    ) -> Result<(), CategoryError> {
        let existing = categories::Entity::find()
            .filter(categories::Column::HouseholdId.eq(household_id))
            .filter(
                Expr::expr(Func::lower(Expr::col(categories::Column::Name)))
                    .eq(name.to_lowercase()),
            )
            .one(&self.db)
            .await?;

        if existing.is_some() {
            return Err(CategoryError::DuplicateName(name.to_string()));
        }

        Ok(())
    }
}
