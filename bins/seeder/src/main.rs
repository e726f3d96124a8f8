//! Database seeder for Hearth development and testing.
//!
//! Seeds a demo household with members, categories, a current-month budget,
//! and a handful of transactions, then prints a development bearer token.
//!
//! Usage: cargo run --bin seeder

use chrono::{Datelike, Duration, Utc};
use rust_decimal_macros::dec;
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set};
use uuid::Uuid;

use hearth_db::entities::{
    budgets, categories, household_members, households, incomes, planned_expenses, transactions,
};
use hearth_shared::JwtService;

/// Demo user ID (consistent for all seeds)
const DEMO_USER_ID: &str = "00000000-0000-0000-0000-000000000001";
/// Demo household ID (consistent for all seeds)
const DEMO_HOUSEHOLD_ID: &str = "00000000-0000-0000-0000-000000000002";

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    let database_url =
        std::env::var("DATABASE_URL").expect("DATABASE_URL must be set in environment");

    println!("Connecting to database...");
    let db = hearth_db::connect(&database_url)
        .await
        .expect("Failed to connect to database");

    println!("Seeding demo household...");
    seed_household(&db).await;

    println!("Seeding members...");
    let (alex, sam) = seed_members(&db).await;

    println!("Seeding categories...");
    let category_ids = seed_categories(&db).await;

    println!("Seeding current-month budget...");
    seed_budget(&db, alex, sam, &category_ids).await;

    print_dev_token();

    println!("Seeding complete!");
}

fn demo_user_id() -> Uuid {
    Uuid::parse_str(DEMO_USER_ID).unwrap()
}

fn demo_household_id() -> Uuid {
    Uuid::parse_str(DEMO_HOUSEHOLD_ID).unwrap()
}

/// Seeds the demo household.
async fn seed_household(db: &DatabaseConnection) {
    if households::Entity::find_by_id(demo_household_id())
        .one(db)
        .await
        .ok()
        .flatten()
        .is_some()
    {
        println!("  Demo household already exists, skipping...");
        return;
    }

    let household = households::ActiveModel {
        id: Set(demo_household_id()),
        user_id: Set(demo_user_id()),
        name: Set("Demo Household".to_string()),
        created_at: Set(Utc::now().into()),
        updated_at: Set(Utc::now().into()),
    };

    if let Err(e) = household.insert(db).await {
        eprintln!("Failed to insert demo household: {e}");
    } else {
        println!("  Created demo household");
    }
}

/// Seeds two members, returning their ids.
async fn seed_members(db: &DatabaseConnection) -> (Uuid, Uuid) {
    let existing = household_members::Entity::find()
        .filter(household_members::Column::HouseholdId.eq(demo_household_id()))
        .all(db)
        .await
        .unwrap_or_default();

    if existing.len() >= 2 {
        println!("  Members already exist, skipping...");
        return (existing[0].id, existing[1].id);
    }

    let mut ids = Vec::new();
    for name in ["Alex", "Sam"] {
        let id = Uuid::new_v4();
        let member = household_members::ActiveModel {
            id: Set(id),
            household_id: Set(demo_household_id()),
            full_name: Set(name.to_string()),
            is_active: Set(true),
            created_at: Set(Utc::now().into()),
            updated_at: Set(Utc::now().into()),
        };
        member.insert(db).await.expect("Failed to insert member");
        println!("  Created member: {name}");
        ids.push(id);
    }

    (ids[0], ids[1])
}

/// Seeds the standard category set, returning the ids in order.
async fn seed_categories(db: &DatabaseConnection) -> Vec<Uuid> {
    let existing = categories::Entity::find()
        .filter(categories::Column::HouseholdId.eq(demo_household_id()))
        .all(db)
        .await
        .unwrap_or_default();

    if !existing.is_empty() {
        println!("  Categories already exist, skipping...");
        return existing.into_iter().map(|c| c.id).collect();
    }

    let mut ids = Vec::new();
    for name in ["Groceries", "Transport", "Utilities", "Leisure"] {
        let id = Uuid::new_v4();
        let category = categories::ActiveModel {
            id: Set(id),
            household_id: Set(demo_household_id()),
            name: Set(name.to_string()),
            created_at: Set(Utc::now().into()),
            updated_at: Set(Utc::now().into()),
        };
        category.insert(db).await.expect("Failed to insert category");
        println!("  Created category: {name}");
        ids.push(id);
    }

    ids
}

/// Seeds a budget for the current month with incomes, planned expenses,
/// and a few transactions.
async fn seed_budget(db: &DatabaseConnection, alex: Uuid, sam: Uuid, category_ids: &[Uuid]) {
    let today = Utc::now().date_naive();
    let month = today.with_day(1).unwrap();

    if budgets::Entity::find()
        .filter(budgets::Column::HouseholdId.eq(demo_household_id()))
        .filter(budgets::Column::Month.eq(month))
        .one(db)
        .await
        .ok()
        .flatten()
        .is_some()
    {
        println!("  Budget for {month} already exists, skipping...");
        return;
    }

    let budget_id = Uuid::new_v4();
    let budget = budgets::ActiveModel {
        id: Set(budget_id),
        household_id: Set(demo_household_id()),
        month: Set(month),
        note: Set(Some("Seeded demo budget".to_string())),
        created_at: Set(Utc::now().into()),
        updated_at: Set(Utc::now().into()),
    };
    budget.insert(db).await.expect("Failed to insert budget");

    for (member_id, amount) in [(alex, dec!(5500.00)), (sam, dec!(4000.00))] {
        let income = incomes::ActiveModel {
            id: Set(Uuid::new_v4()),
            household_id: Set(demo_household_id()),
            budget_id: Set(budget_id),
            household_member_id: Set(member_id),
            amount: Set(amount),
            created_at: Set(Utc::now().into()),
            updated_at: Set(Utc::now().into()),
        };
        income.insert(db).await.expect("Failed to insert income");
    }

    let limits = [dec!(900.00), dec!(300.00), dec!(450.00), dec!(650.00)];
    for (category_id, limit) in category_ids.iter().zip(limits) {
        let planned = planned_expenses::ActiveModel {
            id: Set(Uuid::new_v4()),
            household_id: Set(demo_household_id()),
            budget_id: Set(budget_id),
            category_id: Set(*category_id),
            limit_amount: Set(limit),
            created_at: Set(Utc::now().into()),
            updated_at: Set(Utc::now().into()),
        };
        planned
            .insert(db)
            .await
            .expect("Failed to insert planned expense");
    }

    let spends = [dec!(120.35), dec!(45.00), dec!(78.20)];
    for (category_id, amount) in category_ids.iter().zip(spends) {
        let transaction = transactions::ActiveModel {
            id: Set(Uuid::new_v4()),
            household_id: Set(demo_household_id()),
            budget_id: Set(budget_id),
            category_id: Set(*category_id),
            amount: Set(amount),
            transaction_date: Set(today),
            note: Set(None),
            created_at: Set(Utc::now().into()),
            updated_at: Set(Utc::now().into()),
        };
        transaction
            .insert(db)
            .await
            .expect("Failed to insert transaction");
    }

    println!("  Created budget for {month} with incomes, limits, and transactions");
}

/// Prints a bearer token for the demo user, signed with the configured
/// secret.
fn print_dev_token() {
    let secret = std::env::var("HEARTH__AUTH__SECRET")
        .unwrap_or_else(|_| "dev-secret-change-me".to_string());
    let jwt = JwtService::new(&secret);

    match jwt.generate_token(demo_user_id(), Duration::days(30)) {
        Ok(token) => {
            println!("Dev token (30 days):");
            println!("  Authorization: Bearer {token}");
        }
        Err(e) => eprintln!("Failed to generate dev token: {e}"),
    }
}
