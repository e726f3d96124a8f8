//! Budget domain types.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One household member's contribution to a budget.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IncomeInput {
    /// Household member contributing this income.
    pub household_member_id: Uuid,
    /// Contribution amount.
    pub amount: Decimal,
}

/// A spending limit for one category within a budget.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlannedExpenseInput {
    /// Category the limit applies to.
    pub category_id: Uuid,
    /// Spending limit.
    pub limit_amount: Decimal,
}

/// A planned expense joined to its category name, as input to the
/// per-category breakdown.
#[derive(Debug, Clone)]
pub struct PlannedCategory {
    /// Category ID.
    pub category_id: Uuid,
    /// Category name.
    pub name: String,
    /// Spending limit for the category.
    pub limit_amount: Decimal,
}

/// Computed budget totals. Never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummaryTotals {
    /// Sum of all income amounts.
    pub total_income: Decimal,
    /// Sum of all planned-expense limits.
    pub total_planned: Decimal,
    /// Sum of all transaction amounts.
    pub total_spent: Decimal,
    /// `total_income - total_planned`.
    pub free_funds: Decimal,
}

/// Full budget summary: totals plus overall progress and an optional
/// per-category breakdown.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BudgetSummary {
    /// Sum of all income amounts.
    pub total_income: Decimal,
    /// Sum of all planned-expense limits.
    pub total_planned: Decimal,
    /// Sum of all transaction amounts.
    pub total_spent: Decimal,
    /// `total_income - total_planned`.
    pub free_funds: Decimal,
    /// Spent-to-income percentage, 0 when there is no income.
    pub progress: Decimal,
    /// Per-category breakdown, present only when transactions were fetched.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub per_category: Option<Vec<CategorySummary>>,
}

/// Spending status of one category against its planned limit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CategoryStatus {
    /// Below the warning threshold.
    Ok,
    /// At or above 80% of the limit.
    Warning,
    /// At or above the limit.
    Over,
}

/// Per-category spending summary within a budget.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategorySummary {
    /// Category ID.
    pub category_id: Uuid,
    /// Category name.
    pub name: String,
    /// Total spent against this category.
    pub spent: Decimal,
    /// Planned spending limit.
    pub limit_amount: Decimal,
    /// Spent-to-limit percentage, 0 when the limit is zero.
    pub progress: Decimal,
    /// Status classification for the category.
    pub status: CategoryStatus,
}

/// Month-relative status filter for budget listings.
///
/// Resolved against the first day of the current calendar month at request
/// time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BudgetStatusFilter {
    /// Budget month equals the current month.
    Current,
    /// Budget month is strictly before the current month.
    Past,
    /// Budget month is strictly after the current month.
    Upcoming,
    /// No month filter.
    #[default]
    All,
}

/// Sort order for budget listings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BudgetSort {
    /// Oldest month first.
    MonthAsc,
    /// Newest month first.
    #[default]
    MonthDesc,
}

impl BudgetSort {
    /// Parses a sort parameter, falling back to the default for anything
    /// unrecognized.
    #[must_use]
    pub fn parse(value: Option<&str>) -> Self {
        match value {
            Some("month_asc") => Self::MonthAsc,
            _ => Self::default(),
        }
    }
}
