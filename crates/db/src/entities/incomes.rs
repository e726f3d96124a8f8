//! `SeaORM` Entity for the incomes table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// One household member's contribution within one budget.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "incomes")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub household_id: Uuid,
    pub budget_id: Uuid,
    pub household_member_id: Uuid,
    pub amount: Decimal,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::budgets::Entity",
        from = "Column::BudgetId",
        to = "super::budgets::Column::Id"
    )]
    Budgets,
    #[sea_orm(
        belongs_to = "super::household_members::Entity",
        from = "Column::HouseholdMemberId",
        to = "super::household_members::Column::Id"
    )]
    HouseholdMembers,
}

impl Related<super::budgets::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Budgets.def()
    }
}

impl Related<super::household_members::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::HouseholdMembers.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
