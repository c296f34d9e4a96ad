//! Budget engine tests, example-based and property-based.

use proptest::prelude::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use tripwise_shared::Money;

use super::analysis::BudgetAnalyzer;
use super::types::SpendRecord;
use crate::expense::{CategoryKey, ExpenseCategory};

fn money(value: Decimal) -> Money {
    Money::new(value)
}

#[test]
fn test_report_for_sample_plan() {
    let report = BudgetAnalyzer::default().analyze(
        money(dec!(1000.00)),
        &[
            SpendRecord::new(ExpenseCategory::Transport, money(dec!(200.00))),
            SpendRecord::new(ExpenseCategory::Food, money(dec!(50.00))),
        ],
    );

    let transport = report.category(ExpenseCategory::Transport).unwrap();
    assert_eq!(transport.budgeted.amount(), dec!(300.00));
    assert_eq!(transport.spent.amount(), dec!(200.00));
    assert_eq!(transport.remaining.amount(), dec!(100.00));
    assert_eq!(transport.percentage, dec!(66.67));

    let food = report.category(ExpenseCategory::Food).unwrap();
    assert_eq!(food.budgeted.amount(), dec!(200.00));
    assert_eq!(food.spent.amount(), dec!(50.00));
    assert_eq!(food.remaining.amount(), dec!(150.00));
    assert_eq!(food.percentage, dec!(25.00));

    for category in [
        ExpenseCategory::Accommodation,
        ExpenseCategory::Attraction,
        ExpenseCategory::Shopping,
        ExpenseCategory::Other,
    ] {
        let entry = report.category(category).unwrap();
        assert_eq!(entry.spent, Money::ZERO);
        assert_eq!(entry.remaining, entry.budgeted);
        assert_eq!(entry.percentage, Decimal::ZERO);
    }

    assert_eq!(report.total_budget.amount(), dec!(1000.00));
    assert_eq!(report.total_spent.amount(), dec!(250.00));
    assert_eq!(report.remaining.amount(), dec!(750.00));
    assert_eq!(report.percentage_used, dec!(25.00));
}

#[test]
fn test_zero_budget_reports_zero_percentages() {
    let report = BudgetAnalyzer::default().analyze(
        Money::ZERO,
        &[SpendRecord::new(
            ExpenseCategory::Transport,
            money(dec!(10.00)),
        )],
    );

    let transport = report.category(ExpenseCategory::Transport).unwrap();
    assert_eq!(transport.budgeted, Money::ZERO);
    assert_eq!(transport.percentage, Decimal::ZERO);
    assert_eq!(transport.remaining.amount(), dec!(-10.00));
    assert_eq!(report.percentage_used, Decimal::ZERO);
    assert_eq!(report.remaining.amount(), dec!(-10.00));
}

#[test]
fn test_breakdown_in_fixed_order() {
    let report = BudgetAnalyzer::default().analyze(money(dec!(10)), &[]);
    let order: Vec<ExpenseCategory> = report
        .category_breakdown
        .iter()
        .map(|b| b.category)
        .collect();
    assert_eq!(order, ExpenseCategory::ALL.to_vec());
}

#[test]
fn test_unrecognized_category_is_excluded() {
    let report = BudgetAnalyzer::default().analyze(
        money(dec!(100)),
        &[
            SpendRecord {
                category: CategoryKey::parse("souvenir"),
                amount: money(dec!(40)),
            },
            SpendRecord::new(ExpenseCategory::Other, money(dec!(1))),
        ],
    );

    assert_eq!(report.category_breakdown.len(), 6);
    assert_eq!(report.total_spent.amount(), dec!(1.00));
    assert_eq!(report.remaining.amount(), dec!(99.00));
    assert_eq!(report.percentage_used, dec!(1.00));
}

#[test]
fn test_differently_cased_category_is_excluded() {
    let report = BudgetAnalyzer::default().analyze(
        money(dec!(100)),
        &[SpendRecord {
            category: CategoryKey::parse("FOOD"),
            amount: money(dec!(40)),
        }],
    );

    assert_eq!(report.total_spent.amount(), dec!(0.00));
    assert_eq!(report.remaining.amount(), dec!(100.00));
    assert!(report.category_breakdown.iter().all(|b| b.spent.is_zero()));
}

#[test]
fn test_overspend_goes_negative() {
    let report = BudgetAnalyzer::default().analyze(
        money(dec!(100)),
        &[SpendRecord::new(ExpenseCategory::Shopping, money(dec!(9)))],
    );
    let shopping = report.category(ExpenseCategory::Shopping).unwrap();
    assert_eq!(shopping.budgeted.amount(), dec!(3.00));
    assert_eq!(shopping.remaining.amount(), dec!(-6.00));
    assert_eq!(shopping.percentage, dec!(300.00));
}

#[test]
fn test_report_serializes_numbers() {
    let report = BudgetAnalyzer::default().analyze(
        money(dec!(1000)),
        &[SpendRecord::new(
            ExpenseCategory::Transport,
            money(dec!(200)),
        )],
    );
    let json = serde_json::to_value(&report).unwrap();

    assert_eq!(json["total_budget"], serde_json::json!(1000.0));
    assert_eq!(json["percentage_used"], serde_json::json!(20.0));
    assert_eq!(json["category_breakdown"][0]["category"], "transport");
    assert_eq!(
        json["category_breakdown"][0]["percentage"],
        serde_json::json!(66.67)
    );
}

fn arb_category() -> impl Strategy<Value = ExpenseCategory> {
    prop::sample::select(ExpenseCategory::ALL.to_vec())
}

fn arb_records() -> impl Strategy<Value = Vec<SpendRecord>> {
    prop::collection::vec(
        (arb_category(), 0i64..100_000_000)
            .prop_map(|(c, cents)| SpendRecord::new(c, Money::new(Decimal::new(cents, 2)))),
        0..30,
    )
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// No expenses: nothing spent, everything remaining.
    #[test]
    fn test_empty_expenses(budget_cents in 0i64..1_000_000_000) {
        let budget = Money::new(Decimal::new(budget_cents, 2));
        let report = BudgetAnalyzer::default().analyze(budget, &[]);

        prop_assert_eq!(report.total_spent, Money::ZERO);
        prop_assert_eq!(report.percentage_used, Decimal::ZERO);
        prop_assert_eq!(report.remaining, budget);
        for entry in &report.category_breakdown {
            prop_assert_eq!(entry.spent, Money::ZERO);
        }
    }

    /// remaining = budgeted - spent per category, overspend included.
    #[test]
    fn test_remaining_is_budgeted_minus_spent(
        budget_cents in 0i64..1_000_000_000,
        records in arb_records(),
    ) {
        let report = BudgetAnalyzer::default()
            .analyze(Money::new(Decimal::new(budget_cents, 2)), &records);

        for entry in &report.category_breakdown {
            prop_assert_eq!(entry.remaining, entry.budgeted - entry.spent);
        }
    }

    /// total_spent is the exact sum of per-category spend and of the input.
    #[test]
    fn test_total_spent_is_exact_sum(
        budget_cents in 0i64..1_000_000_000,
        records in arb_records(),
    ) {
        let budget = Money::new(Decimal::new(budget_cents, 2));
        let report = BudgetAnalyzer::default().analyze(budget, &records);

        let from_breakdown: Money = report.category_breakdown.iter().map(|b| b.spent).sum();
        let from_input: Money = records.iter().map(|r| r.amount).sum();
        prop_assert_eq!(report.total_spent, from_breakdown);
        prop_assert_eq!(report.total_spent, from_input);
        prop_assert_eq!(report.remaining, budget - report.total_spent);
    }

    /// Input order does not change the report.
    #[test]
    fn test_order_independent(
        budget_cents in 0i64..1_000_000_000,
        records in arb_records(),
    ) {
        let budget = Money::new(Decimal::new(budget_cents, 2));
        let mut reversed = records.clone();
        reversed.reverse();

        let analyzer = BudgetAnalyzer::default();
        prop_assert_eq!(analyzer.analyze(budget, &records), analyzer.analyze(budget, &reversed));
    }

    /// Percentages carry two decimal places.
    #[test]
    fn test_percentages_have_two_places(
        budget_cents in 1i64..1_000_000_000,
        records in arb_records(),
    ) {
        let report = BudgetAnalyzer::default()
            .analyze(Money::new(Decimal::new(budget_cents, 2)), &records);

        prop_assert!(report.percentage_used.scale() <= 2);
        for entry in &report.category_breakdown {
            prop_assert!(entry.percentage.scale() <= 2);
        }
    }
}
