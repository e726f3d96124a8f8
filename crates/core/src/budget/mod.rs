//! Household budget summary aggregation and validation.

pub mod error;
pub mod month;
pub mod summary;
pub mod types;
pub mod validate;

#[cfg(test)]
mod tests;

pub use error::PayloadError;
pub use month::{current_month_start, normalize_month, parse_month};
pub use summary::{batch_totals, budget_summary, category_breakdown, progress_percent, summary_totals};
pub use types::{
    BudgetSort, BudgetStatusFilter, BudgetSummary, CategoryStatus, CategorySummary, IncomeInput,
    PlannedCategory, PlannedExpenseInput, SummaryTotals,
};
pub use validate::{normalize_note, validate_amount, MAX_NOTE_CHARS};
