use std::collections::HashSet;

use chrono::Utc;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use sea_orm::{DatabaseBackend, DbErr, MockDatabase};
use uuid::Uuid;

use super::{
    missing_reference, sum_by_category, BudgetError, BudgetRepository, CreateBudgetInput,
};
use crate::entities::{budgets, categories, household_members};
use hearth_core::budget::{IncomeInput, PayloadError, PlannedExpenseInput};

#[test]
fn test_missing_reference_none_when_all_found() {
    let ids = [Uuid::new_v4(), Uuid::new_v4()];
    let found: HashSet<Uuid> = ids.iter().copied().collect();
    assert_eq!(missing_reference(&ids, &found), None);
}

#[test]
fn test_missing_reference_reports_first_in_request_order() {
    let known = Uuid::new_v4();
    let missing_a = Uuid::new_v4();
    let missing_b = Uuid::new_v4();
    let found: HashSet<Uuid> = [known].into_iter().collect();

    let requested = [known, missing_a, missing_b];
    assert_eq!(missing_reference(&requested, &found), Some(missing_a));
}

#[test]
fn test_missing_reference_empty_request() {
    let found = HashSet::new();
    assert_eq!(missing_reference(&[], &found), None);
}

#[test]
fn test_sum_by_category_folds_duplicates() {
    let groceries = Uuid::new_v4();
    let transport = Uuid::new_v4();
    let rows = [
        (groceries, dec!(120.50)),
        (transport, dec!(40)),
        (groceries, dec!(79.50)),
    ];

    let sums = sum_by_category(&rows);
    assert_eq!(sums.get(&groceries), Some(&dec!(200.00)));
    assert_eq!(sums.get(&transport), Some(&dec!(40)));
    assert_eq!(sums.len(), 2);
}

#[test]
fn test_sum_by_category_empty() {
    assert!(sum_by_category(&[]).is_empty());
}

#[test]
fn test_payload_error_maps_to_invalid_payload() {
    let err: BudgetError = PayloadError::NonPositiveAmount.into();
    match err {
        BudgetError::InvalidPayload(msg) => {
            assert!(msg.contains("greater than zero"), "unexpected message: {msg}");
        }
        other => panic!("expected InvalidPayload, got {other:?}"),
    }
}

#[test]
fn test_already_exists_message_names_month() {
    let month = chrono::NaiveDate::from_ymd_opt(2026, 3, 1).unwrap();
    let err = BudgetError::AlreadyExists(month);
    assert_eq!(err.to_string(), "Budget already exists for month 2026-03-01");
}

#[test]
fn test_sum_by_category_keeps_two_decimal_scale() {
    let id = Uuid::new_v4();
    let rows = [(id, dec!(0.10)), (id, dec!(0.20))];
    let sums = sum_by_category(&rows);
    assert_eq!(sums.get(&id), Some(&Decimal::new(30, 2)));
}

fn member_row(id: Uuid, household_id: Uuid) -> household_members::Model {
    let now = Utc::now().into();
    household_members::Model {
        id,
        household_id,
        full_name: "Alex".to_string(),
        is_active: true,
        created_at: now,
        updated_at: now,
    }
}

#[tokio::test]
async fn test_invalid_member_rejected_before_any_write() {
    let household_id = Uuid::new_v4();
    let unknown_member = Uuid::new_v4();

    // The member lookup comes back empty; nothing else may be touched,
    // even though the month would also collide with an existing budget.
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([Vec::<household_members::Model>::new()])
        .into_connection();
    let repo = BudgetRepository::new(db.clone());

    let input = CreateBudgetInput {
        month: "2026-04".to_string(),
        note: None,
        incomes: vec![IncomeInput {
            household_member_id: unknown_member,
            amount: dec!(1000),
        }],
        planned_expenses: vec![],
    };

    let err = repo.create_budget(household_id, input).await.unwrap_err();
    assert!(matches!(err, BudgetError::InvalidMember(id) if id == unknown_member));

    // Only the member lookup ran: no transaction, no inserts.
    assert_eq!(db.into_transaction_log().len(), 1);
}

#[tokio::test]
async fn test_failed_income_insert_rolls_everything_back() {
    let household_id = Uuid::new_v4();
    let member_id = Uuid::new_v4();
    let category_id = Uuid::new_v4();
    let now = Utc::now().into();
    let month = chrono::NaiveDate::from_ymd_opt(2026, 4, 1).unwrap();

    let db = MockDatabase::new(DatabaseBackend::Postgres)
        // Reference checks pass.
        .append_query_results([vec![member_row(member_id, household_id)]])
        .append_query_results([vec![categories::Model {
            id: category_id,
            household_id,
            name: "Groceries".to_string(),
            created_at: now,
            updated_at: now,
        }]])
        // Budget row lands, then the income insert blows up.
        .append_query_results([vec![budgets::Model {
            id: Uuid::new_v4(),
            household_id,
            month,
            note: None,
            created_at: now,
            updated_at: now,
        }]])
        .append_query_errors([DbErr::Custom("income insert failed".to_string())])
        // A follow-up fetch sees no trace of the budget.
        .append_query_results([Vec::<budgets::Model>::new()])
        .into_connection();
    let repo = BudgetRepository::new(db.clone());

    let input = CreateBudgetInput {
        month: "2026-04".to_string(),
        note: None,
        incomes: vec![IncomeInput {
            household_member_id: member_id,
            amount: dec!(1000),
        }],
        planned_expenses: vec![PlannedExpenseInput {
            category_id,
            limit_amount: dec!(200),
        }],
    };

    let err = repo.create_budget(household_id, input).await.unwrap_err();
    assert!(matches!(err, BudgetError::CreateFailed));

    let detail = repo
        .get_budget_detail(household_id, Uuid::new_v4(), super::DetailOptions::default())
        .await;
    assert!(matches!(detail, Err(BudgetError::NotFound(_))));

    // The planned-expense insert never ran; the unit stopped at the
    // income failure and the transaction rolled back.
    let log = format!("{:?}", db.into_transaction_log());
    assert!(!log.contains("planned_expenses"));
}

proptest::proptest! {
    #![proptest_config(proptest::prelude::ProptestConfig::with_cases(50))]

    /// Folding rows into per-category sums never loses or invents money.
    #[test]
    fn prop_sum_by_category_preserves_total(
        amounts in proptest::collection::vec((0u8..4, 1i64..=1_000_000i64), 0..20),
    ) {
        let ids = [Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4()];
        let rows: Vec<(Uuid, Decimal)> = amounts
            .iter()
            .map(|(idx, cents)| (ids[*idx as usize], Decimal::new(*cents, 2)))
            .collect();

        let grand_total: Decimal = rows.iter().map(|(_, a)| *a).sum();
        let folded_total: Decimal = sum_by_category(&rows).values().copied().sum();
        proptest::prop_assert_eq!(grand_total, folded_total);
    }
}
