//! `SeaORM` Entity for the budgets table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// A household's financial plan for one calendar month.
///
/// `month` is a first-of-month date, unique per `(household_id, month)`.
/// Month and household are immutable after creation; only the note may
/// change.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "budgets")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub household_id: Uuid,
    pub month: Date,
    pub note: Option<String>,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::households::Entity",
        from = "Column::HouseholdId",
        to = "super::households::Column::Id"
    )]
    Households,
    #[sea_orm(has_many = "super::incomes::Entity")]
    Incomes,
    #[sea_orm(has_many = "super::planned_expenses::Entity")]
    PlannedExpenses,
    #[sea_orm(has_many = "super::transactions::Entity")]
    Transactions,
}

impl Related<super::households::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Households.def()
    }
}

impl Related<super::incomes::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Incomes.def()
    }
}

impl Related<super::planned_expenses::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PlannedExpenses.def()
    }
}

impl Related<super::transactions::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Transactions.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
