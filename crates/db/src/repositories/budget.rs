//! Budget repository: atomic creation, computed summaries, listings, and
//! lifecycle updates.
//!
//! Aggregation math lives in `hearth-core`; this module owns query shape,
//! tenant scoping, and transaction boundaries.

use std::collections::{HashMap, HashSet};

use chrono::{NaiveDate, Utc};
use hearth_core::budget::{
    batch_totals, budget_summary, category_breakdown, current_month_start, normalize_note,
    parse_month, summary_totals, validate_amount, BudgetSort, BudgetStatusFilter,
    BudgetSummary, IncomeInput, PayloadError, PlannedCategory, PlannedExpenseInput, SummaryTotals,
};
use hearth_shared::types::{PageRequest, PageResponse};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Set, SqlErr, TransactionTrait,
};
use serde::Serialize;
use uuid::Uuid;

use crate::entities::{
    budgets, categories, household_members, incomes, planned_expenses, transactions,
};

/// Error types for budget operations.
#[derive(Debug, thiserror::Error)]
pub enum BudgetError {
    /// Budget not found in this household.
    #[error("Budget not found: {0}")]
    NotFound(Uuid),

    /// A budget for this month already exists in this household.
    #[error("Budget already exists for month {0}")]
    AlreadyExists(NaiveDate),

    /// An income references a member outside this household, or one that
    /// has been deactivated.
    #[error("Invalid household member reference: {0}")]
    InvalidMember(Uuid),

    /// A planned expense references a category outside this household.
    #[error("Invalid category reference: {0}")]
    InvalidCategory(Uuid),

    /// A month, amount, or note failed validation.
    #[error("{0}")]
    InvalidPayload(String),

    /// An income row was not found within the budget.
    #[error("Income not found: {0}")]
    IncomeNotFound(Uuid),

    /// A planned expense row was not found within the budget.
    #[error("Planned expense not found: {0}")]
    PlannedExpenseNotFound(Uuid),

    /// Budget creation failed.
    #[error("Failed to create budget")]
    CreateFailed,

    /// Budget fetch failed.
    #[error("Failed to fetch budget")]
    FetchFailed,

    /// Budget listing failed.
    #[error("Failed to list budgets")]
    ListFailed,

    /// Budget update failed.
    #[error("Failed to update budget")]
    UpdateFailed,

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

impl From<PayloadError> for BudgetError {
    fn from(e: PayloadError) -> Self {
        Self::InvalidPayload(e.to_string())
    }
}

/// Input for creating a budget together with its incomes and planned
/// expenses.
#[derive(Debug, Clone)]
pub struct CreateBudgetInput {
    /// Target month; accepts `YYYY-MM`, `YYYY-MM-DD`, and timestamp forms.
    pub month: String,
    /// Optional free-form note.
    pub note: Option<String>,
    /// Income lines, one per contributing member.
    pub incomes: Vec<IncomeInput>,
    /// Planned spending limits, one per category.
    pub planned_expenses: Vec<PlannedExpenseInput>,
}

/// Minimal creation acknowledgement.
#[derive(Debug, Clone, Serialize)]
pub struct CreatedBudget {
    pub id: Uuid,
    pub month: NaiveDate,
    pub created_at: sea_orm::prelude::DateTimeWithTimeZone,
}

/// Options for the single-budget detail fetch.
#[derive(Debug, Clone, Copy, Default)]
pub struct DetailOptions {
    /// Fetch transactions: embeds the raw rows, fills `total_spent`, and
    /// computes the per-category breakdown. Off, `total_spent` is 0 and the
    /// breakdown is absent.
    pub include_transactions: bool,
    /// Include income lines from deactivated members. Off, they are
    /// excluded from both the income list and the totals.
    pub include_inactive_members: bool,
}

/// Options for budget listings.
#[derive(Debug, Clone, Default)]
pub struct ListOptions {
    /// Exact-month filter; same accepted forms as budget creation.
    pub month: Option<String>,
    /// Month-relative filter against the current calendar month.
    pub status: BudgetStatusFilter,
    /// Attach computed totals to every listed budget.
    pub include_summary: bool,
    /// Page selection.
    pub page: PageRequest,
    /// Sort order.
    pub sort: BudgetSort,
}

/// One income line joined to its member's name.
#[derive(Debug, Clone, Serialize)]
pub struct IncomeDetail {
    pub id: Uuid,
    pub household_member_id: Uuid,
    pub member_name: String,
    pub amount: Decimal,
}

/// One planned expense joined to its category name.
#[derive(Debug, Clone, Serialize)]
pub struct PlannedExpenseDetail {
    pub id: Uuid,
    pub category_id: Uuid,
    pub category_name: String,
    pub limit_amount: Decimal,
}

/// Full single-budget view with computed summary.
#[derive(Debug, Clone, Serialize)]
pub struct BudgetDetail {
    #[serde(flatten)]
    pub budget: budgets::Model,
    pub incomes: Vec<IncomeDetail>,
    pub planned_expenses: Vec<PlannedExpenseDetail>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transactions: Option<Vec<transactions::Model>>,
    pub summary: BudgetSummary,
}

/// One row of a budget listing, with totals when requested.
#[derive(Debug, Clone, Serialize)]
pub struct BudgetListItem {
    #[serde(flatten)]
    pub budget: budgets::Model,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<SummaryTotals>,
}

/// Repository for budget lifecycle and aggregation queries.
#[derive(Debug, Clone)]
pub struct BudgetRepository {
    db: DatabaseConnection,
}

impl BudgetRepository {
    /// Creates a new budget repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Creates a budget with its income and planned-expense sets in one
    /// transaction. Either everything lands or nothing does.
    ///
    /// # Errors
    ///
    /// Returns an error when the month or an amount is invalid, a reference
    /// points outside the household, a budget for the month already exists,
    /// or the writes fail.
    pub async fn create_budget(
        &self,
        household_id: Uuid,
        input: CreateBudgetInput,
    ) -> Result<CreatedBudget, BudgetError> {
        let month = parse_month(&input.month)?;
        let note = normalize_note(input.note.as_deref());

        for income in &input.incomes {
            validate_amount(income.amount)?;
        }
        for planned in &input.planned_expenses {
            validate_amount(planned.limit_amount)?;
        }
        self.validate_references(household_id, &input.incomes, &input.planned_expenses)
            .await?;

        let txn = self.db.begin().await.map_err(|e| {
            tracing::error!(error = %e, "failed to open budget transaction");
            BudgetError::CreateFailed
        })?;

        let now = Utc::now().into();
        let budget_id = Uuid::new_v4();
        let budget = budgets::ActiveModel {
            id: Set(budget_id),
            household_id: Set(household_id),
            month: Set(month),
            note: Set(note),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let created = budget.insert(&txn).await.map_err(|e| {
            if matches!(e.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) {
                BudgetError::AlreadyExists(month)
            } else {
                tracing::error!(error = %e, %household_id, "failed to insert budget");
                BudgetError::CreateFailed
            }
        })?;

        if !input.incomes.is_empty() {
            let rows = input.incomes.iter().map(|i| incomes::ActiveModel {
                id: Set(Uuid::new_v4()),
                household_id: Set(household_id),
                budget_id: Set(budget_id),
                household_member_id: Set(i.household_member_id),
                amount: Set(i.amount),
                created_at: Set(now),
                updated_at: Set(now),
            });
            incomes::Entity::insert_many(rows).exec(&txn).await.map_err(|e| {
                // Dropping the transaction rolls the budget row back.
                tracing::error!(error = %e, %budget_id, "failed to insert incomes");
                BudgetError::CreateFailed
            })?;
        }

        if !input.planned_expenses.is_empty() {
            let rows = input
                .planned_expenses
                .iter()
                .map(|p| planned_expenses::ActiveModel {
                    id: Set(Uuid::new_v4()),
                    household_id: Set(household_id),
                    budget_id: Set(budget_id),
                    category_id: Set(p.category_id),
                    limit_amount: Set(p.limit_amount),
                    created_at: Set(now),
                    updated_at: Set(now),
                });
            planned_expenses::Entity::insert_many(rows)
                .exec(&txn)
                .await
                .map_err(|e| {
                    tracing::error!(error = %e, %budget_id, "failed to insert planned expenses");
                    BudgetError::CreateFailed
                })?;
        }

        txn.commit().await.map_err(|e| {
            tracing::error!(error = %e, %budget_id, "failed to commit budget transaction");
            BudgetError::CreateFailed
        })?;

        Ok(CreatedBudget {
            id: created.id,
            month: created.month,
            created_at: created.created_at,
        })
    }

    /// Fetches a single budget with joined incomes, planned expenses, and a
    /// computed summary. Related rows are fetched concurrently.
    ///
    /// # Errors
    ///
    /// Returns `BudgetError::NotFound` for a missing or foreign budget, or
    /// `BudgetError::FetchFailed` when a query fails.
    pub async fn get_budget_detail(
        &self,
        household_id: Uuid,
        budget_id: Uuid,
        opts: DetailOptions,
    ) -> Result<BudgetDetail, BudgetError> {
        let budget = budgets::Entity::find_by_id(budget_id)
            .filter(budgets::Column::HouseholdId.eq(household_id))
            .one(&self.db)
            .await
            .map_err(|e| {
                tracing::error!(error = %e, %budget_id, "failed to fetch budget");
                BudgetError::FetchFailed
            })?
            .ok_or(BudgetError::NotFound(budget_id))?;

        let mut income_query = incomes::Entity::find()
            .filter(incomes::Column::BudgetId.eq(budget_id))
            .find_also_related(household_members::Entity);
        if !opts.include_inactive_members {
            income_query = income_query.filter(household_members::Column::IsActive.eq(true));
        }

        let (income_rows, planned_rows, transaction_rows) = tokio::try_join!(
            income_query.all(&self.db),
            planned_expenses::Entity::find()
                .filter(planned_expenses::Column::BudgetId.eq(budget_id))
                .find_also_related(categories::Entity)
                .all(&self.db),
            async {
                if opts.include_transactions {
                    transactions::Entity::find()
                        .filter(transactions::Column::BudgetId.eq(budget_id))
                        .order_by_desc(transactions::Column::TransactionDate)
                        .order_by_desc(transactions::Column::CreatedAt)
                        .all(&self.db)
                        .await
                } else {
                    Ok(Vec::new())
                }
            },
        )
        .map_err(|e| {
            tracing::error!(error = %e, %budget_id, "failed to fetch budget relations");
            BudgetError::FetchFailed
        })?;

        let total_income: Decimal = income_rows.iter().map(|(i, _)| i.amount).sum();
        let total_planned: Decimal = planned_rows.iter().map(|(p, _)| p.limit_amount).sum();
        // Zero when transactions were not fetched.
        let total_spent: Decimal = transaction_rows.iter().map(|t| t.amount).sum();

        let per_category = opts.include_transactions.then(|| {
            let planned_categories: Vec<PlannedCategory> = planned_rows
                .iter()
                .map(|(p, category)| PlannedCategory {
                    category_id: p.category_id,
                    name: category.as_ref().map(|c| c.name.clone()).unwrap_or_default(),
                    limit_amount: p.limit_amount,
                })
                .collect();
            let spent_rows: Vec<(Uuid, Decimal)> = transaction_rows
                .iter()
                .map(|t| (t.category_id, t.amount))
                .collect();

            category_breakdown(&planned_categories, &sum_by_category(&spent_rows))
        });

        let summary = budget_summary(
            summary_totals(total_income, total_planned, total_spent),
            per_category,
        );

        let income_details = income_rows
            .into_iter()
            .map(|(income, member)| IncomeDetail {
                id: income.id,
                household_member_id: income.household_member_id,
                member_name: member.map(|m| m.full_name).unwrap_or_default(),
                amount: income.amount,
            })
            .collect();

        let planned_details = planned_rows
            .into_iter()
            .map(|(planned, category)| PlannedExpenseDetail {
                id: planned.id,
                category_id: planned.category_id,
                category_name: category.map(|c| c.name).unwrap_or_default(),
                limit_amount: planned.limit_amount,
            })
            .collect();

        Ok(BudgetDetail {
            budget,
            incomes: income_details,
            planned_expenses: planned_details,
            transactions: opts.include_transactions.then_some(transaction_rows),
            summary,
        })
    }

    /// Lists a household's budgets with optional month/status filters,
    /// pagination, and batch-computed totals.
    ///
    /// # Errors
    ///
    /// Returns an error when the month filter is unparseable or a query
    /// fails.
    pub async fn list_budgets(
        &self,
        household_id: Uuid,
        opts: ListOptions,
    ) -> Result<PageResponse<BudgetListItem>, BudgetError> {
        let mut query =
            budgets::Entity::find().filter(budgets::Column::HouseholdId.eq(household_id));

        if let Some(month) = opts.month.as_deref() {
            let month = parse_month(month)?;
            query = query.filter(budgets::Column::Month.eq(month));
        }

        let current = current_month_start(Utc::now().date_naive());
        query = match opts.status {
            BudgetStatusFilter::Current => query.filter(budgets::Column::Month.eq(current)),
            BudgetStatusFilter::Past => query.filter(budgets::Column::Month.lt(current)),
            BudgetStatusFilter::Upcoming => query.filter(budgets::Column::Month.gt(current)),
            BudgetStatusFilter::All => query,
        };

        query = match opts.sort {
            BudgetSort::MonthAsc => query.order_by_asc(budgets::Column::Month),
            BudgetSort::MonthDesc => query.order_by_desc(budgets::Column::Month),
        };

        let page = opts.page.page.max(1);
        let per_page = opts.page.per_page.max(1);
        let paginator = query.paginate(&self.db, u64::from(per_page));

        let total = paginator.num_items().await.map_err(|e| {
            tracing::error!(error = %e, %household_id, "failed to count budgets");
            BudgetError::ListFailed
        })?;
        let rows = paginator.fetch_page(u64::from(page - 1)).await.map_err(|e| {
            tracing::error!(error = %e, %household_id, "failed to fetch budget page");
            BudgetError::ListFailed
        })?;

        let mut totals = if opts.include_summary && !rows.is_empty() {
            let ids: Vec<Uuid> = rows.iter().map(|b| b.id).collect();
            self.batch_budget_totals(&ids).await?
        } else {
            HashMap::new()
        };

        let items = rows
            .into_iter()
            .map(|budget| {
                let summary = opts.include_summary.then(|| {
                    totals
                        .remove(&budget.id)
                        .unwrap_or_else(|| summary_totals(Decimal::ZERO, Decimal::ZERO, Decimal::ZERO))
                });
                BudgetListItem { budget, summary }
            })
            .collect();

        Ok(PageResponse::new(items, page, per_page, total))
    }

    /// Updates a budget's note and re-renders the detail view. Month and
    /// household are immutable. The returned summary has `total_spent`
    /// fixed at 0 and excludes inactive members, since transactions are
    /// not re-fetched here.
    ///
    /// # Errors
    ///
    /// Returns an error when the budget is missing or the update fails.
    pub async fn update_note(
        &self,
        household_id: Uuid,
        budget_id: Uuid,
        note: Option<&str>,
    ) -> Result<BudgetDetail, BudgetError> {
        let budget = budgets::Entity::find_by_id(budget_id)
            .filter(budgets::Column::HouseholdId.eq(household_id))
            .one(&self.db)
            .await?
            .ok_or(BudgetError::NotFound(budget_id))?;

        let mut active: budgets::ActiveModel = budget.into();
        active.note = Set(normalize_note(note));
        active.updated_at = Set(Utc::now().into());

        active.update(&self.db).await.map_err(|e| {
            if matches!(e.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) {
                BudgetError::InvalidPayload(e.to_string())
            } else {
                tracing::error!(error = %e, %budget_id, "failed to update budget note");
                BudgetError::UpdateFailed
            }
        })?;

        self.get_budget_detail(household_id, budget_id, DetailOptions::default())
            .await
            .map_err(|e| match e {
                BudgetError::NotFound(id) => BudgetError::NotFound(id),
                _ => BudgetError::UpdateFailed,
            })
    }

    /// Replaces a budget's full income set in one transaction.
    ///
    /// # Errors
    ///
    /// Returns an error when the budget is missing, a member reference or
    /// amount is invalid, or the writes fail.
    pub async fn replace_incomes(
        &self,
        household_id: Uuid,
        budget_id: Uuid,
        new_incomes: Vec<IncomeInput>,
    ) -> Result<BudgetDetail, BudgetError> {
        self.require_budget(household_id, budget_id).await?;
        for income in &new_incomes {
            validate_amount(income.amount)?;
        }
        self.validate_references(household_id, &new_incomes, &[]).await?;

        let txn = self.db.begin().await?;
        incomes::Entity::delete_many()
            .filter(incomes::Column::BudgetId.eq(budget_id))
            .exec(&txn)
            .await?;
        if !new_incomes.is_empty() {
            let now = Utc::now().into();
            let rows = new_incomes.iter().map(|i| incomes::ActiveModel {
                id: Set(Uuid::new_v4()),
                household_id: Set(household_id),
                budget_id: Set(budget_id),
                household_member_id: Set(i.household_member_id),
                amount: Set(i.amount),
                created_at: Set(now),
                updated_at: Set(now),
            });
            incomes::Entity::insert_many(rows).exec(&txn).await?;
        }
        txn.commit().await?;

        self.get_budget_detail(household_id, budget_id, DetailOptions::default())
            .await
    }

    /// Replaces a budget's full planned-expense set in one transaction.
    ///
    /// # Errors
    ///
    /// Returns an error when the budget is missing, a category reference or
    /// amount is invalid, or the writes fail.
    pub async fn replace_planned_expenses(
        &self,
        household_id: Uuid,
        budget_id: Uuid,
        new_planned: Vec<PlannedExpenseInput>,
    ) -> Result<BudgetDetail, BudgetError> {
        self.require_budget(household_id, budget_id).await?;
        for planned in &new_planned {
            validate_amount(planned.limit_amount)?;
        }
        self.validate_references(household_id, &[], &new_planned).await?;

        let txn = self.db.begin().await?;
        planned_expenses::Entity::delete_many()
            .filter(planned_expenses::Column::BudgetId.eq(budget_id))
            .exec(&txn)
            .await?;
        if !new_planned.is_empty() {
            let now = Utc::now().into();
            let rows = new_planned.iter().map(|p| planned_expenses::ActiveModel {
                id: Set(Uuid::new_v4()),
                household_id: Set(household_id),
                budget_id: Set(budget_id),
                category_id: Set(p.category_id),
                limit_amount: Set(p.limit_amount),
                created_at: Set(now),
                updated_at: Set(now),
            });
            planned_expenses::Entity::insert_many(rows).exec(&txn).await?;
        }
        txn.commit().await?;

        self.get_budget_detail(household_id, budget_id, DetailOptions::default())
            .await
    }

    /// Updates one income line's amount.
    ///
    /// # Errors
    ///
    /// Returns an error when the amount is invalid or the income is not
    /// found within the budget.
    pub async fn update_income(
        &self,
        household_id: Uuid,
        budget_id: Uuid,
        income_id: Uuid,
        amount: Decimal,
    ) -> Result<incomes::Model, BudgetError> {
        validate_amount(amount)?;

        let income = incomes::Entity::find_by_id(income_id)
            .filter(incomes::Column::HouseholdId.eq(household_id))
            .filter(incomes::Column::BudgetId.eq(budget_id))
            .one(&self.db)
            .await?
            .ok_or(BudgetError::IncomeNotFound(income_id))?;

        let mut active: incomes::ActiveModel = income.into();
        active.amount = Set(amount);
        active.updated_at = Set(Utc::now().into());

        Ok(active.update(&self.db).await?)
    }

    /// Updates one planned expense's limit.
    ///
    /// # Errors
    ///
    /// Returns an error when the amount is invalid or the planned expense is
    /// not found within the budget.
    pub async fn update_planned_expense(
        &self,
        household_id: Uuid,
        budget_id: Uuid,
        planned_expense_id: Uuid,
        limit_amount: Decimal,
    ) -> Result<planned_expenses::Model, BudgetError> {
        validate_amount(limit_amount)?;

        let planned = planned_expenses::Entity::find_by_id(planned_expense_id)
            .filter(planned_expenses::Column::HouseholdId.eq(household_id))
            .filter(planned_expenses::Column::BudgetId.eq(budget_id))
            .one(&self.db)
            .await?
            .ok_or(BudgetError::PlannedExpenseNotFound(planned_expense_id))?;

        let mut active: planned_expenses::ActiveModel = planned.into();
        active.limit_amount = Set(limit_amount);
        active.updated_at = Set(Utc::now().into());

        Ok(active.update(&self.db).await?)
    }

    /// Deletes a budget. Incomes, planned expenses, and transactions go
    /// with it via cascade.
    ///
    /// # Errors
    ///
    /// Returns `BudgetError::NotFound` when nothing was deleted.
    pub async fn delete_budget(
        &self,
        household_id: Uuid,
        budget_id: Uuid,
    ) -> Result<(), BudgetError> {
        let result = budgets::Entity::delete_by_id(budget_id)
            .filter(budgets::Column::HouseholdId.eq(household_id))
            .exec(&self.db)
            .await?;

        if result.rows_affected == 0 {
            return Err(BudgetError::NotFound(budget_id));
        }

        Ok(())
    }

    async fn require_budget(
        &self,
        household_id: Uuid,
        budget_id: Uuid,
    ) -> Result<(), BudgetError> {
        let exists = budgets::Entity::find_by_id(budget_id)
            .filter(budgets::Column::HouseholdId.eq(household_id))
            .one(&self.db)
            .await?
            .is_some();

        if exists {
            Ok(())
        } else {
            Err(BudgetError::NotFound(budget_id))
        }
    }

    /// Verifies every income member and planned-expense category belongs to
    /// the household. Members must also be active.
    async fn validate_references(
        &self,
        household_id: Uuid,
        income_inputs: &[IncomeInput],
        planned_inputs: &[PlannedExpenseInput],
    ) -> Result<(), BudgetError> {
        if !income_inputs.is_empty() {
            let requested: Vec<Uuid> =
                income_inputs.iter().map(|i| i.household_member_id).collect();
            let found: HashSet<Uuid> = household_members::Entity::find()
                .filter(household_members::Column::HouseholdId.eq(household_id))
                .filter(household_members::Column::IsActive.eq(true))
                .filter(household_members::Column::Id.is_in(requested.clone()))
                .select_only()
                .column(household_members::Column::Id)
                .into_tuple::<Uuid>()
                .all(&self.db)
                .await?
                .into_iter()
                .collect();

            if let Some(missing) = missing_reference(&requested, &found) {
                return Err(BudgetError::InvalidMember(missing));
            }
        }

        if !planned_inputs.is_empty() {
            let requested: Vec<Uuid> = planned_inputs.iter().map(|p| p.category_id).collect();
            let found: HashSet<Uuid> = categories::Entity::find()
                .filter(categories::Column::HouseholdId.eq(household_id))
                .filter(categories::Column::Id.is_in(requested.clone()))
                .select_only()
                .column(categories::Column::Id)
                .into_tuple::<Uuid>()
                .all(&self.db)
                .await?
                .into_iter()
                .collect();

            if let Some(missing) = missing_reference(&requested, &found) {
                return Err(BudgetError::InvalidCategory(missing));
            }
        }

        Ok(())
    }

    /// Computes totals for a set of budgets with three grouped-sum queries
    /// run concurrently, folded in memory.
    async fn batch_budget_totals(
        &self,
        ids: &[Uuid],
    ) -> Result<HashMap<Uuid, SummaryTotals>, BudgetError> {
        let (income_rows, planned_rows, spent_rows) = tokio::try_join!(
            incomes::Entity::find()
                .filter(incomes::Column::BudgetId.is_in(ids.to_vec()))
                .select_only()
                .column(incomes::Column::BudgetId)
                .column(incomes::Column::Amount)
                .into_tuple::<(Uuid, Decimal)>()
                .all(&self.db),
            planned_expenses::Entity::find()
                .filter(planned_expenses::Column::BudgetId.is_in(ids.to_vec()))
                .select_only()
                .column(planned_expenses::Column::BudgetId)
                .column(planned_expenses::Column::LimitAmount)
                .into_tuple::<(Uuid, Decimal)>()
                .all(&self.db),
            transactions::Entity::find()
                .filter(transactions::Column::BudgetId.is_in(ids.to_vec()))
                .select_only()
                .column(transactions::Column::BudgetId)
                .column(transactions::Column::Amount)
                .into_tuple::<(Uuid, Decimal)>()
                .all(&self.db),
        )
        .map_err(|e| {
            tracing::error!(error = %e, "failed to fetch budget totals");
            BudgetError::ListFailed
        })?;

        Ok(batch_totals(ids, &income_rows, &planned_rows, &spent_rows))
    }
}

/// First requested id that the lookup did not return, in request order.
fn missing_reference(requested: &[Uuid], found: &HashSet<Uuid>) -> Option<Uuid> {
    requested.iter().find(|id| !found.contains(id)).copied()
}

/// Folds `(category_id, amount)` rows into per-category sums.
fn sum_by_category(rows: &[(Uuid, Decimal)]) -> HashMap<Uuid, Decimal> {
    let mut sums: HashMap<Uuid, Decimal> = HashMap::new();
    for (category_id, amount) in rows {
        *sums.entry(*category_id).or_default() += *amount;
    }
    sums
}

#[cfg(test)]
#[path = "budget_tests.rs"]
mod tests;
