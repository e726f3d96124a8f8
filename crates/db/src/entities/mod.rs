//! `SeaORM` entity definitions.
//!
//! Every table is household-scoped: each row carries a `household_id`
//! foreign key, and repositories always filter on it.

pub mod budgets;
pub mod categories;
pub mod household_members;
pub mod households;
pub mod incomes;
pub mod planned_expenses;
pub mod transactions;
