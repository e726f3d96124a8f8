//! Transaction repository: actual spending recorded against a budget.

use chrono::{NaiveDate, Utc};
use hearth_core::budget::{normalize_note, validate_amount, PayloadError};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, QueryOrder,
    Set,
};
use uuid::Uuid;

use crate::entities::{budgets, categories, transactions};

/// Error types for transaction operations.
#[derive(Debug, thiserror::Error)]
pub enum TransactionError {
    /// Transaction not found in this household.
    #[error("Transaction not found: {0}")]
    NotFound(Uuid),

    /// Budget the transaction targets does not exist in this household.
    #[error("Budget not found: {0}")]
    BudgetNotFound(Uuid),

    /// Category does not exist in this household.
    #[error("Invalid category reference: {0}")]
    InvalidCategory(Uuid),

    /// Amount or note failed validation.
    #[error("{0}")]
    InvalidPayload(String),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

impl From<PayloadError> for TransactionError {
    fn from(e: PayloadError) -> Self {
        Self::InvalidPayload(e.to_string())
    }
}

/// Input for recording a transaction.
#[derive(Debug, Clone)]
pub struct CreateTransactionInput {
    pub budget_id: Uuid,
    pub category_id: Uuid,
    pub amount: Decimal,
    pub transaction_date: NaiveDate,
    pub note: Option<String>,
}

/// Repository for recording and listing actual spend.
#[derive(Debug, Clone)]
pub struct TransactionRepository {
    db: DatabaseConnection,
}

impl TransactionRepository {
    /// Creates a new transaction repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Records a transaction against a budget and category. Both references
    /// must belong to the caller's household.
    ///
    /// # Errors
    ///
    /// Returns an error when a reference is missing, the amount is invalid,
    /// or the insert fails.
    pub async fn create(
        &self,
        household_id: Uuid,
        input: CreateTransactionInput,
    ) -> Result<transactions::Model, TransactionError> {
        validate_amount(input.amount)?;

        let budget = budgets::Entity::find_by_id(input.budget_id)
            .filter(budgets::Column::HouseholdId.eq(household_id))
            .one(&self.db)
            .await?;
        if budget.is_none() {
            return Err(TransactionError::BudgetNotFound(input.budget_id));
        }

        let category = categories::Entity::find_by_id(input.category_id)
            .filter(categories::Column::HouseholdId.eq(household_id))
            .one(&self.db)
            .await?;
        if category.is_none() {
            return Err(TransactionError::InvalidCategory(input.category_id));
        }

        let now = Utc::now().into();
        let transaction = transactions::ActiveModel {
            id: Set(Uuid::new_v4()),
            household_id: Set(household_id),
            budget_id: Set(input.budget_id),
            category_id: Set(input.category_id),
            amount: Set(input.amount),
            transaction_date: Set(input.transaction_date),
            note: Set(normalize_note(input.note.as_deref())),
            created_at: Set(now),
            updated_at: Set(now),
        };

        Ok(transaction.insert(&self.db).await?)
    }

    /// Lists a budget's transactions, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub async fn list_for_budget(
        &self,
        household_id: Uuid,
        budget_id: Uuid,
    ) -> Result<Vec<transactions::Model>, TransactionError> {
        Ok(transactions::Entity::find()
            .filter(transactions::Column::HouseholdId.eq(household_id))
            .filter(transactions::Column::BudgetId.eq(budget_id))
            .order_by_desc(transactions::Column::TransactionDate)
            .order_by_desc(transactions::Column::CreatedAt)
            .all(&self.db)
            .await?)
    }

    /// Deletes a transaction.
    ///
    /// # Errors
    ///
    /// Returns `TransactionError::NotFound` when nothing was deleted.
    pub async fn delete(
        &self,
        household_id: Uuid,
        transaction_id: Uuid,
    ) -> Result<(), TransactionError> {
        let result = transactions::Entity::delete_by_id(transaction_id)
            .filter(transactions::Column::HouseholdId.eq(household_id))
            .exec(&self.db)
            .await?;

        if result.rows_affected == 0 {
            return Err(TransactionError::NotFound(transaction_id));
        }

        Ok(())
    }
}
