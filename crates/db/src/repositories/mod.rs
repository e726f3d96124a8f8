//! Repository abstractions for data access.
//!
//! Repositories provide a clean interface for database operations,
//! hiding the `SeaORM` implementation details from the rest of the
//! application. Every method takes the caller's household id explicitly;
//! there is no ambient tenant state.

pub mod budget;
pub mod category;
pub mod household;
pub mod member;
pub mod transaction;

pub use budget::{
    BudgetDetail, BudgetError, BudgetListItem, BudgetRepository, CreateBudgetInput, CreatedBudget,
    DetailOptions, ListOptions,
};
pub use category::{CategoryError, CategoryRepository};
pub use household::{HouseholdError, HouseholdRepository};
pub use member::{MemberError, MemberRepository};
pub use transaction::{CreateTransactionInput, TransactionError, TransactionRepository};
