#![allow(clippy::unwrap_used)]

use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::*;
use crate::models::{BudgetDraft, TransactionDraft};

fn txn(id: &str, kind: TransactionType, amount: Decimal, category: &str, date: &str) -> Transaction {
    Transaction::from_draft(
        id.into(),
        TransactionDraft {
            kind,
            amount,
            category: category.into(),
            description: format!("{category} {date}"),
            date: NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(),
            notes: None,
        },
    )
}

fn income(amount: Decimal, category: &str, date: &str) -> Transaction {
    txn("i", TransactionType::Income, amount, category, date)
}

fn expense(amount: Decimal, category: &str, date: &str) -> Transaction {
    txn("e", TransactionType::Expense, amount, category, date)
}

fn sample() -> Vec<Transaction> {
    vec![
        income(dec!(7500000), "Gaji", "2024-01-01"),
        expense(dec!(50000), "Makanan", "2024-01-10"),
        expense(dec!(150000), "Transportasi", "2024-01-20"),
        income(dec!(500000), "Bonus", "2024-03-05"),
        expense(dec!(50000), "Makanan", "2024-03-15"),
        expense(dec!(25000), "Makanan", "2024-03-16"),
        expense(dec!(300000), "Hiburan", "2023-12-31"),
    ]
}

// ── Totals ────────────────────────────────────────────────────

#[test]
fn test_totals_on_empty_list() {
    let empty: Vec<Transaction> = Vec::new();
    assert_eq!(total_by_type(&empty, TransactionType::Income), Decimal::ZERO);
    assert_eq!(total_by_type(&empty, TransactionType::Expense), Decimal::ZERO);
    assert_eq!(balance(&empty), Decimal::ZERO);
}

#[test]
fn test_total_by_type() {
    let list = sample();
    assert_eq!(total_by_type(&list, TransactionType::Income), dec!(8000000));
    assert_eq!(total_by_type(&list, TransactionType::Expense), dec!(575000));
}

#[test]
fn test_balance_is_income_minus_expense() {
    let lists = vec![
        sample(),
        Vec::new(),
        vec![expense(dec!(10), "Makanan", "2024-01-01")],
        vec![income(dec!(0.01), "Gaji", "2024-01-01"), expense(dec!(0.02), "Makanan", "2024-01-01")],
    ];
    for list in &lists {
        assert_eq!(
            balance(list),
            total_by_type(list, TransactionType::Income) - total_by_type(list, TransactionType::Expense)
        );
    }
}

#[test]
fn test_filter_by_month_is_zero_indexed() {
    let list = sample();
    let march = filter_by_month(&list, 2024, 2);
    assert_eq!(march.len(), 3);
    assert!(march.iter().all(|t| t.date.format("%Y-%m").to_string() == "2024-03"));
    assert!(filter_by_month(&list, 2024, 1).is_empty());
    assert_eq!(filter_by_month(&list, 2023, 11).len(), 1);
}

#[test]
fn test_total_for_category() {
    let mut list = sample();
    list.push(income(dec!(1000), "Makanan", "2024-02-01"));
    assert_eq!(total_for_category(&list, "Makanan", None), dec!(126000));
    assert_eq!(
        total_for_category(&list, "Makanan", Some(TransactionType::Expense)),
        dec!(125000)
    );
    assert_eq!(total_for_category(&list, "Nothing", None), Decimal::ZERO);
}

// ── Series ────────────────────────────────────────────────────

#[test]
fn test_monthly_series_always_twelve_entries() {
    let empty: Vec<Transaction> = Vec::new();
    let series = monthly_series(&empty, 2024);
    assert_eq!(series.len(), 12);
    assert!(series
        .iter()
        .all(|m| m.income.is_zero() && m.expense.is_zero() && m.balance.is_zero()));
    assert_eq!(series[0].label, "Jan");
    assert_eq!(series[11].label, "Dec");

    assert_eq!(monthly_series(&sample(), 1999).len(), 12);
}

#[test]
fn test_monthly_series_buckets_by_month() {
    let series = monthly_series(&sample(), 2024);
    assert_eq!(series[0].income, dec!(7500000));
    assert_eq!(series[0].expense, dec!(200000));
    assert_eq!(series[0].balance, dec!(7300000));
    assert_eq!(series[2].income, dec!(500000));
    assert_eq!(series[2].expense, dec!(75000));
    assert_eq!(series[2].balance, dec!(425000));
    // the 2023-12-31 expense stays out of 2024
    assert!(series[11].expense.is_zero());
}

#[test]
fn test_lunch_scenario() {
    let list = vec![expense(dec!(50000), "Makanan", "2024-03-15")];
    assert_eq!(total_by_type(&list, TransactionType::Expense), dec!(50000));
    assert_eq!(monthly_series(&list, 2024)[2].expense, dec!(50000));
}

#[test]
fn test_quarterly_series() {
    let quarters = quarterly_series(&sample(), 2024);
    assert_eq!(quarters.len(), 4);
    assert_eq!(quarters[0].label, "Q1");
    assert_eq!(quarters[0].income, dec!(8000000));
    assert_eq!(quarters[0].expense, dec!(275000));
    assert_eq!(quarters[0].balance, dec!(7725000));
    assert!(quarters[3].income.is_zero());
}

// ── Distribution ──────────────────────────────────────────────

#[test]
fn test_category_distribution_sorted_and_grouped() {
    let dist = category_distribution(&sample(), TransactionType::Expense, None);
    let names: Vec<&str> = dist.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, vec!["Hiburan", "Transportasi", "Makanan"]);
    assert_eq!(dist[2].value, dec!(125000));
}

#[test]
fn test_category_distribution_percentages_sum_to_100() {
    for kind in TransactionType::all() {
        let dist = category_distribution(&sample(), *kind, None);
        let sum: f64 = dist.iter().map(|c| c.percentage).sum();
        assert!((sum - 100.0).abs() < 1e-9, "{kind}: {sum}");
    }

    let thirds = vec![
        expense(dec!(1), "A", "2024-01-01"),
        expense(dec!(1), "B", "2024-01-01"),
        expense(dec!(1), "C", "2024-01-01"),
    ];
    let sum: f64 = category_distribution(&thirds, TransactionType::Expense, None)
        .iter()
        .map(|c| c.percentage)
        .sum();
    assert!((sum - 100.0).abs() < 1e-9);
}

#[test]
fn test_category_distribution_ties_keep_first_seen_order() {
    let list = vec![
        expense(dec!(10), "Zeta", "2024-01-01"),
        expense(dec!(30), "Alpha", "2024-01-02"),
        expense(dec!(10), "Beta", "2024-01-03"),
        expense(dec!(10), "Gamma", "2024-01-04"),
    ];
    let names: Vec<String> = category_distribution(&list, TransactionType::Expense, None)
        .into_iter()
        .map(|c| c.name)
        .collect();
    assert_eq!(names, vec!["Alpha", "Zeta", "Beta", "Gamma"]);
}

#[test]
fn test_category_distribution_zero_total_has_no_nan() {
    let list = vec![
        expense(Decimal::ZERO, "Makanan", "2024-01-01"),
        expense(Decimal::ZERO, "Hiburan", "2024-01-02"),
    ];
    let dist = category_distribution(&list, TransactionType::Expense, None);
    assert_eq!(dist.len(), 2);
    assert!(dist.iter().all(|c| c.percentage == 0.0));

    let empty: Vec<Transaction> = Vec::new();
    assert!(category_distribution(&empty, TransactionType::Income, None).is_empty());
}

#[test]
fn test_category_distribution_month_filter() {
    let march = YearMonth::parse("2024-03").unwrap();
    let dist = category_distribution(&sample(), TransactionType::Expense, Some(march));
    assert_eq!(dist.len(), 1);
    assert_eq!(dist[0].name, "Makanan");
    assert_eq!(dist[0].value, dec!(75000));
    assert!((dist[0].percentage - 100.0).abs() < 1e-9);
}

// ── Budgets ───────────────────────────────────────────────────

#[test]
fn test_budget_status_thresholds_are_strict() {
    assert_eq!(budget_status(dec!(0), dec!(100)), BudgetStatus::Safe);
    assert_eq!(budget_status(dec!(80), dec!(100)), BudgetStatus::Safe);
    assert_eq!(budget_status(dec!(80.01), dec!(100)), BudgetStatus::Warning);
    assert_eq!(budget_status(dec!(81), dec!(100)), BudgetStatus::Warning);
    assert_eq!(budget_status(dec!(100), dec!(100)), BudgetStatus::Warning);
    assert_eq!(budget_status(dec!(100.01), dec!(100)), BudgetStatus::Exceeded);
    assert_eq!(budget_status(dec!(250000), dec!(200000)), BudgetStatus::Exceeded);
}

#[test]
fn test_budget_status_zero_limit_does_not_panic() {
    assert_eq!(budget_status(dec!(1), Decimal::ZERO), BudgetStatus::Exceeded);
    assert_eq!(budget_status(Decimal::ZERO, Decimal::ZERO), BudgetStatus::Safe);
}

#[test]
fn test_budget_status_huge_ratio_is_exceeded() {
    let spent = dec!(50000000000000000000000000000);
    assert_eq!(budget_status(spent, dec!(1)), BudgetStatus::Exceeded);
}

#[test]
fn test_oversized_stored_amounts_saturate() {
    let huge = dec!(50000000000000000000000000000);
    let list = vec![
        expense(huge, "Makanan", "2024-03-15"),
        expense(huge, "Makanan", "2024-03-16"),
        income(huge, "Gaji", "2024-03-01"),
        income(huge, "Gaji", "2024-03-02"),
    ];
    assert_eq!(total_by_type(&list, TransactionType::Expense), Decimal::MAX);
    let _ = balance(&list);
    assert_eq!(monthly_series(&list, 2024)[2].expense, Decimal::MAX);
    assert_eq!(quarterly_series(&list, 2024)[0].income, Decimal::MAX);

    let shares = category_distribution(&list, TransactionType::Expense, None);
    assert_eq!(shares[0].value, Decimal::MAX);
    assert!((shares[0].percentage - 100.0).abs() < 1e-9);
    assert!(savings_rate(&list).abs() < f64::EPSILON);

    let march = YearMonth::parse("2024-03").unwrap();
    let budget = Budget::from_draft(
        "b".into(),
        BudgetDraft::new("Makanan".into(), dec!(1), march),
    );
    let overview = budget_overview(&[budget], &list, march);
    assert_eq!(overview.items[0].status, BudgetStatus::Exceeded);
    assert_eq!(overview.total_spent, Decimal::MAX);
}

#[test]
fn test_budget_overview_scopes_spend_to_month() {
    let march = YearMonth::parse("2024-03").unwrap();
    let budgets = vec![
        Budget::from_draft("b1".into(), BudgetDraft::new("Makanan".into(), dec!(80000), march)),
        Budget::from_draft("b2".into(), BudgetDraft::new("Hiburan".into(), dec!(100000), march)),
        Budget::from_draft("b3".into(), BudgetDraft::new("Makanan".into(), dec!(1), march.next())),
    ];
    let overview = budget_overview(&budgets, &sample(), march);

    assert_eq!(overview.items.len(), 2);
    let food = &overview.items[0];
    assert_eq!(food.spent, dec!(75000));
    assert_eq!(food.status, BudgetStatus::Warning);
    assert_eq!(food.remaining(), dec!(5000));
    assert!(!food.is_over());

    let fun = &overview.items[1];
    assert!(fun.spent.is_zero());
    assert_eq!(fun.status, BudgetStatus::Safe);

    assert_eq!(overview.total_limit, dec!(180000));
    assert_eq!(overview.total_spent, dec!(75000));
}

#[test]
fn test_budget_overview_duplicates_share_spend_and_cap_percentage() {
    let march = YearMonth::parse("2024-03").unwrap();
    let budgets = vec![
        Budget::from_draft("b1".into(), BudgetDraft::new("Makanan".into(), dec!(50000), march)),
        Budget::from_draft("b2".into(), BudgetDraft::new("Makanan".into(), dec!(50000), march)),
    ];
    let overview = budget_overview(&budgets, &sample(), march);
    assert_eq!(overview.items.len(), 2);
    for item in &overview.items {
        assert_eq!(item.spent, dec!(75000));
        assert_eq!(item.status, BudgetStatus::Exceeded);
        assert_eq!(item.percentage, 100.0);
        assert!(item.is_over());
        assert_eq!(item.remaining(), dec!(-25000));
    }
}

// ── Misc ──────────────────────────────────────────────────────

#[test]
fn test_year_range() {
    assert_eq!(year_range(&sample(), 2025), vec![2023, 2024, 2025]);
    assert_eq!(year_range(&[], 2025), vec![2025]);
}

#[test]
fn test_sorted_by_date_desc_is_stable_and_filters() {
    let list = vec![
        expense(dec!(1), "A", "2024-01-01"),
        txn("same-1", TransactionType::Income, dec!(2), "B", "2024-02-01"),
        txn("same-2", TransactionType::Expense, dec!(3), "C", "2024-02-01"),
    ];
    let ids: Vec<&str> = sorted_by_date_desc(&list, None).into_iter().map(|t| t.id.as_str()).collect();
    assert_eq!(ids, vec!["same-1", "same-2", "e"]);

    let expenses = sorted_by_date_desc(&list, Some(TransactionType::Expense));
    assert_eq!(expenses.len(), 2);
    assert!(expenses.iter().all(|t| t.is_expense()));
}

#[test]
fn test_savings_rate() {
    let list = vec![
        income(dec!(1000), "Gaji", "2024-01-01"),
        expense(dec!(250), "Makanan", "2024-01-02"),
    ];
    assert!((savings_rate(&list) - 75.0).abs() < 1e-9);

    let overspent = vec![
        income(dec!(100), "Gaji", "2024-01-01"),
        expense(dec!(250), "Makanan", "2024-01-02"),
    ];
    assert_eq!(savings_rate(&overspent), 0.0);
    assert_eq!(savings_rate(&[]), 0.0);
}

#[test]
fn test_overview_spent_percentage() {
    assert_eq!(BudgetOverview::default().spent_percentage(), None);
    let overview = BudgetOverview {
        items: Vec::new(),
        total_limit: dec!(200),
        total_spent: dec!(50),
    };
    assert_eq!(overview.spent_percentage(), Some(25.0));
}
