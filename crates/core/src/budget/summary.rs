//! Summary aggregation: totals, progress, and per-category status.
//!
//! Everything here is pure computation over rows the database layer has
//! already fetched; query shape and tenant scoping live in `hearth-db`.

use std::collections::HashMap;

use rust_decimal::Decimal;
use uuid::Uuid;

use super::types::{BudgetSummary, CategoryStatus, CategorySummary, PlannedCategory, SummaryTotals};

/// Exact spent-to-base ratio as a percentage, without rounding.
/// Zero when the base is zero, never a division error.
fn raw_progress(spent: Decimal, base: Decimal) -> Decimal {
    if base.is_zero() {
        Decimal::ZERO
    } else {
        spent / base * Decimal::ONE_HUNDRED
    }
}

/// Spent-to-base percentage rounded to 2 decimal places for display.
#[must_use]
pub fn progress_percent(spent: Decimal, base: Decimal) -> Decimal {
    raw_progress(spent, base).round_dp(2)
}

impl CategoryStatus {
    /// Classifies an exact (unrounded) progress percentage.
    ///
    /// Thresholds are compared before display rounding: 79.999 is `Ok`
    /// even though it renders as 80.00.
    #[must_use]
    pub fn from_progress(progress: Decimal) -> Self {
        if progress >= Decimal::ONE_HUNDRED {
            Self::Over
        } else if progress >= Decimal::from(80) {
            Self::Warning
        } else {
            Self::Ok
        }
    }
}

/// Assembles totals from the three independent sums.
#[must_use]
pub fn summary_totals(
    total_income: Decimal,
    total_planned: Decimal,
    total_spent: Decimal,
) -> SummaryTotals {
    SummaryTotals {
        total_income,
        total_planned,
        total_spent,
        free_funds: total_income - total_planned,
    }
}

/// Assembles a full budget summary from totals and an optional breakdown.
#[must_use]
pub fn budget_summary(
    totals: SummaryTotals,
    per_category: Option<Vec<CategorySummary>>,
) -> BudgetSummary {
    BudgetSummary {
        total_income: totals.total_income,
        total_planned: totals.total_planned,
        total_spent: totals.total_spent,
        free_funds: totals.free_funds,
        progress: progress_percent(totals.total_spent, totals.total_income),
        per_category,
    }
}

/// Builds the per-category breakdown for a budget.
///
/// The breakdown is planned-expense-centric: every planned expense produces
/// an entry; categories with transactions but no planned expense are
/// excluded.
#[must_use]
pub fn category_breakdown(
    planned: &[PlannedCategory],
    spent_by_category: &HashMap<Uuid, Decimal>,
) -> Vec<CategorySummary> {
    planned
        .iter()
        .map(|p| {
            let spent = spent_by_category
                .get(&p.category_id)
                .copied()
                .unwrap_or(Decimal::ZERO);
            let exact = raw_progress(spent, p.limit_amount);

            CategorySummary {
                category_id: p.category_id,
                name: p.name.clone(),
                spent,
                limit_amount: p.limit_amount,
                progress: exact.round_dp(2),
                status: CategoryStatus::from_progress(exact),
            }
        })
        .collect()
}

/// Per-budget sum accumulator used by the batch fold.
#[derive(Debug, Default, Clone, Copy)]
struct TotalsAccumulator {
    income: Decimal,
    planned: Decimal,
    spent: Decimal,
}

/// Computes totals for a batch of budgets in one pass.
///
/// The map is seeded with zeros for every requested id, so budgets with no
/// related rows still report zero totals instead of being absent. Rows are
/// folded as `(budget_id, amount)` pairs; `free_funds` is derived last,
/// after all folds, so it never depends on the order rows arrive in.
#[must_use]
pub fn batch_totals(
    budget_ids: &[Uuid],
    incomes: &[(Uuid, Decimal)],
    planned: &[(Uuid, Decimal)],
    spent: &[(Uuid, Decimal)],
) -> HashMap<Uuid, SummaryTotals> {
    let mut acc: HashMap<Uuid, TotalsAccumulator> = budget_ids
        .iter()
        .map(|id| (*id, TotalsAccumulator::default()))
        .collect();

    for (budget_id, amount) in incomes {
        if let Some(entry) = acc.get_mut(budget_id) {
            entry.income += *amount;
        }
    }
    for (budget_id, amount) in planned {
        if let Some(entry) = acc.get_mut(budget_id) {
            entry.planned += *amount;
        }
    }
    for (budget_id, amount) in spent {
        if let Some(entry) = acc.get_mut(budget_id) {
            entry.spent += *amount;
        }
    }

    acc.into_iter()
        .map(|(id, a)| (id, summary_totals(a.income, a.planned, a.spent)))
        .collect()
}
