//! Tests for month normalization, validation, and summary aggregation.

use std::collections::HashMap;

use chrono::NaiveDate;
use proptest::prelude::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use uuid::Uuid;

use super::error::PayloadError;
use super::month::{current_month_start, normalize_month, parse_month};
use super::summary::{batch_totals, budget_summary, category_breakdown, summary_totals};
use super::types::{BudgetSort, CategoryStatus, PlannedCategory};
use super::validate::{MAX_NOTE_CHARS, normalize_note, validate_amount};

// ============================================================================
// Month normalization
// ============================================================================

#[test]
fn test_year_month_gets_day_appended() {
    assert_eq!(normalize_month("2025-03"), "2025-03-01");
}

#[test]
fn test_first_of_month_passes_through() {
    assert_eq!(normalize_month("2025-03-01"), "2025-03-01");
}

#[test]
fn test_mid_month_date_truncates() {
    assert_eq!(normalize_month("2025-03-17"), "2025-03-01");
}

#[test]
fn test_iso_timestamp_truncates() {
    assert_eq!(normalize_month("2025-03-17T10:30:00Z"), "2025-03-01");
    assert_eq!(normalize_month("2025-11-05 08:00:00"), "2025-11-01");
}

#[test]
fn test_whitespace_is_trimmed() {
    assert_eq!(normalize_month("  2025-07  "), "2025-07-01");
}

#[test]
fn test_unparseable_input_passes_through_unchanged() {
    assert_eq!(normalize_month("not-a-month"), "not-a-month");
    assert_eq!(normalize_month(""), "");
    assert_eq!(normalize_month("March 2025"), "March 2025");
}

#[test]
fn test_parse_month_accepts_canonical_forms() {
    let expected = NaiveDate::from_ymd_opt(2025, 3, 1).unwrap();
    assert_eq!(parse_month("2025-03").unwrap(), expected);
    assert_eq!(parse_month("2025-03-17").unwrap(), expected);
}

#[test]
fn test_parse_month_snaps_unpadded_dates_to_first_of_month() {
    // "2025-3-17" dodges the digit-shape checks but still parses; the
    // result must land on day 1, not mid-month.
    let expected = NaiveDate::from_ymd_opt(2025, 3, 1).unwrap();
    assert_eq!(parse_month("2025-3-17").unwrap(), expected);
    assert_eq!(parse_month("2025-3").unwrap_err(), PayloadError::InvalidMonth("2025-3".to_string()));
}

#[test]
fn test_parse_month_rejects_impossible_month() {
    // The permissive normalizer turns 2025-13 into 2025-13-01; strict
    // parsing is where it gets rejected.
    assert!(matches!(
        parse_month("2025-13"),
        Err(PayloadError::InvalidMonth(_))
    ));
    assert!(matches!(
        parse_month("garbage"),
        Err(PayloadError::InvalidMonth(_))
    ));
}

#[test]
fn test_current_month_start() {
    let today = NaiveDate::from_ymd_opt(2025, 3, 17).unwrap();
    assert_eq!(
        current_month_start(today),
        NaiveDate::from_ymd_opt(2025, 3, 1).unwrap()
    );
}

// ============================================================================
// Payload validation
// ============================================================================

#[test]
fn test_amount_must_be_positive() {
    assert_eq!(
        validate_amount(dec!(0)),
        Err(PayloadError::NonPositiveAmount)
    );
    assert_eq!(
        validate_amount(dec!(-1.50)),
        Err(PayloadError::NonPositiveAmount)
    );
    assert!(validate_amount(dec!(0.01)).is_ok());
}

#[test]
fn test_amount_scale_limit() {
    assert!(validate_amount(dec!(12.34)).is_ok());
    // Trailing zeros do not count as precision.
    assert!(validate_amount(dec!(12.3400)).is_ok());
    assert_eq!(
        validate_amount(dec!(12.345)),
        Err(PayloadError::TooManyFractionDigits)
    );
}

#[test]
fn test_amount_upper_bound() {
    assert!(validate_amount(dec!(9999999.99)).is_ok());
    assert_eq!(
        validate_amount(dec!(10000000.00)),
        Err(PayloadError::AmountTooLarge)
    );
}

#[test]
fn test_note_trim_and_empty_coercion() {
    assert_eq!(normalize_note(None), None);
    assert_eq!(normalize_note(Some("   ")), None);
    assert_eq!(
        normalize_note(Some("  groceries  ")),
        Some("groceries".to_string())
    );
}

#[test]
fn test_note_truncated_at_cap() {
    let long = "x".repeat(MAX_NOTE_CHARS + 50);
    let result = normalize_note(Some(&long)).unwrap();
    assert_eq!(result.chars().count(), MAX_NOTE_CHARS);
}

#[test]
fn test_note_truncation_respects_char_boundaries() {
    let long = "ä".repeat(MAX_NOTE_CHARS + 10);
    let result = normalize_note(Some(&long)).unwrap();
    assert_eq!(result.chars().count(), MAX_NOTE_CHARS);
}

// ============================================================================
// Status thresholds
// ============================================================================

#[rstest::rstest]
#[case(dec!(0), CategoryStatus::Ok)]
#[case(dec!(79.999), CategoryStatus::Ok)]
#[case(dec!(80), CategoryStatus::Warning)]
#[case(dec!(99.999), CategoryStatus::Warning)]
#[case(dec!(100), CategoryStatus::Over)]
#[case(dec!(250), CategoryStatus::Over)]
fn test_status_thresholds(#[case] progress: Decimal, #[case] expected: CategoryStatus) {
    assert_eq!(CategoryStatus::from_progress(progress), expected);
}

#[test]
fn test_classification_happens_before_rounding() {
    // spent 79.999 of limit 100: renders as 80.00 but is still Ok.
    let planned = vec![PlannedCategory {
        category_id: Uuid::new_v4(),
        name: "food".to_string(),
        limit_amount: dec!(100),
    }];
    let spent: HashMap<Uuid, Decimal> = [(planned[0].category_id, dec!(79.999))]
        .into_iter()
        .collect();

    let breakdown = category_breakdown(&planned, &spent);
    assert_eq!(breakdown[0].progress, dec!(80.00));
    assert_eq!(breakdown[0].status, CategoryStatus::Ok);
}

// ============================================================================
// Summary math
// ============================================================================

#[test]
fn test_zero_income_yields_zero_progress() {
    let summary = budget_summary(summary_totals(dec!(0), dec!(0), dec!(500)), None);
    assert_eq!(summary.progress, dec!(0));
}

#[test]
fn test_create_scenario_totals() {
    // Incomes 5000 + 4500, planned 1500 + 800, no transactions.
    let summary = budget_summary(summary_totals(dec!(9500), dec!(2300), dec!(0)), None);

    assert_eq!(summary.total_income, dec!(9500));
    assert_eq!(summary.total_planned, dec!(2300));
    assert_eq!(summary.total_spent, dec!(0));
    assert_eq!(summary.free_funds, dec!(7200));
    assert_eq!(summary.progress, dec!(0));
}

#[test]
fn test_category_breakdown_scenario() {
    let food = Uuid::new_v4();
    let transport = Uuid::new_v4();
    let planned = vec![
        PlannedCategory {
            category_id: food,
            name: "food".to_string(),
            limit_amount: dec!(1500),
        },
        PlannedCategory {
            category_id: transport,
            name: "transport".to_string(),
            limit_amount: dec!(800),
        },
    ];

    // No spend yet: both ok.
    let breakdown = category_breakdown(&planned, &HashMap::new());
    assert_eq!(breakdown.len(), 2);
    assert!(breakdown.iter().all(|c| c.status == CategoryStatus::Ok));

    // 1300 against food: 86.67%, warning.
    let spent: HashMap<Uuid, Decimal> = [(food, dec!(1300))].into_iter().collect();
    let breakdown = category_breakdown(&planned, &spent);
    let food_entry = breakdown.iter().find(|c| c.category_id == food).unwrap();
    assert_eq!(food_entry.spent, dec!(1300));
    assert_eq!(food_entry.limit_amount, dec!(1500));
    assert_eq!(food_entry.progress, dec!(86.67));
    assert_eq!(food_entry.status, CategoryStatus::Warning);
}

#[test]
fn test_breakdown_excludes_unplanned_categories() {
    let planned_cat = Uuid::new_v4();
    let stray_cat = Uuid::new_v4();
    let planned = vec![PlannedCategory {
        category_id: planned_cat,
        name: "rent".to_string(),
        limit_amount: dec!(2000),
    }];
    let spent: HashMap<Uuid, Decimal> = [(planned_cat, dec!(100)), (stray_cat, dec!(999))]
        .into_iter()
        .collect();

    let breakdown = category_breakdown(&planned, &spent);
    assert_eq!(breakdown.len(), 1);
    assert_eq!(breakdown[0].category_id, planned_cat);
}

#[test]
fn test_zero_limit_category_has_zero_progress() {
    let planned = vec![PlannedCategory {
        category_id: Uuid::new_v4(),
        name: "misc".to_string(),
        limit_amount: dec!(0),
    }];
    let spent: HashMap<Uuid, Decimal> =
        [(planned[0].category_id, dec!(50))].into_iter().collect();

    let breakdown = category_breakdown(&planned, &spent);
    assert_eq!(breakdown[0].progress, dec!(0));
    assert_eq!(breakdown[0].status, CategoryStatus::Ok);
}

// ============================================================================
// Batch totals
// ============================================================================

#[test]
fn test_batch_seeds_zeros_for_empty_budgets() {
    let empty_budget = Uuid::new_v4();
    let totals = batch_totals(&[empty_budget], &[], &[], &[]);

    let t = totals.get(&empty_budget).unwrap();
    assert_eq!(t.total_income, dec!(0));
    assert_eq!(t.total_planned, dec!(0));
    assert_eq!(t.total_spent, dec!(0));
    assert_eq!(t.free_funds, dec!(0));
}

#[test]
fn test_batch_folds_per_budget() {
    let a = Uuid::new_v4();
    let b = Uuid::new_v4();

    let totals = batch_totals(
        &[a, b],
        &[(a, dec!(5000)), (a, dec!(4500)), (b, dec!(1000))],
        &[(a, dec!(1500)), (b, dec!(300)), (b, dec!(200))],
        &[(a, dec!(700))],
    );

    let ta = totals.get(&a).unwrap();
    assert_eq!(ta.total_income, dec!(9500));
    assert_eq!(ta.total_planned, dec!(1500));
    assert_eq!(ta.total_spent, dec!(700));
    assert_eq!(ta.free_funds, dec!(8000));

    let tb = totals.get(&b).unwrap();
    assert_eq!(tb.total_income, dec!(1000));
    assert_eq!(tb.total_planned, dec!(500));
    assert_eq!(tb.free_funds, dec!(500));
}

#[test]
fn test_batch_ignores_rows_for_unrequested_budgets() {
    let requested = Uuid::new_v4();
    let stray = Uuid::new_v4();

    let totals = batch_totals(&[requested], &[(stray, dec!(100))], &[], &[]);
    assert_eq!(totals.len(), 1);
    assert_eq!(totals.get(&requested).unwrap().total_income, dec!(0));
}

// ============================================================================
// Sort parsing
// ============================================================================

#[test]
fn test_sort_parse_fallback() {
    assert_eq!(BudgetSort::parse(Some("month_asc")), BudgetSort::MonthAsc);
    assert_eq!(BudgetSort::parse(Some("month_desc")), BudgetSort::MonthDesc);
    assert_eq!(BudgetSort::parse(Some("bogus")), BudgetSort::MonthDesc);
    assert_eq!(BudgetSort::parse(None), BudgetSort::MonthDesc);
}

// ============================================================================
// Properties
// ============================================================================

/// Strategy for 2-dp amounts within the storable range.
fn amount_strategy() -> impl Strategy<Value = Decimal> {
    (0i64..=999_999_999i64).prop_map(|n| Decimal::new(n, 2))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// free_funds is exactly income minus planned, for any inputs.
    #[test]
    fn prop_free_funds_identity(
        income in amount_strategy(),
        planned in amount_strategy(),
        spent in amount_strategy(),
    ) {
        let totals = summary_totals(income, planned, spent);
        prop_assert_eq!(totals.free_funds, income - planned);
    }

    /// Progress is never negative and zero income never divides.
    #[test]
    fn prop_progress_is_defined(
        income in amount_strategy(),
        spent in amount_strategy(),
    ) {
        let summary = budget_summary(summary_totals(income, Decimal::ZERO, spent), None);
        prop_assert!(summary.progress >= Decimal::ZERO);
        if income.is_zero() {
            prop_assert_eq!(summary.progress, Decimal::ZERO);
        }
    }

    /// Batch folding is order-independent: reversing row order produces
    /// identical totals.
    #[test]
    fn prop_batch_fold_order_independent(
        amounts in proptest::collection::vec(amount_strategy(), 1..8),
    ) {
        let id = Uuid::new_v4();
        let rows: Vec<(Uuid, Decimal)> = amounts.iter().map(|a| (id, *a)).collect();
        let mut reversed = rows.clone();
        reversed.reverse();

        let forward = batch_totals(&[id], &rows, &rows, &rows);
        let backward = batch_totals(&[id], &reversed, &reversed, &reversed);

        prop_assert_eq!(forward.get(&id).unwrap(), backward.get(&id).unwrap());
    }

    /// Normalizing twice is the same as normalizing once.
    #[test]
    fn prop_normalize_month_idempotent(s in "\\PC{0,20}") {
        let once = normalize_month(&s);
        let twice = normalize_month(&once);
        prop_assert_eq!(once, twice);
    }
}
