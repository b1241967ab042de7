//! Aggregations over the transaction list: totals, per-month and per-quarter
//! rollups, category distributions and budget status.
//!
//! Every function here is pure. Inputs are anything that yields
//! `&Transaction`, so callers can pass the full collection (`&store_vec`) or
//! the output of [`filter_by_month`] without cloning.

use std::collections::HashMap;

use chrono::{Datelike, NaiveDate};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

use crate::models::{Budget, Transaction, TransactionType, YearMonth};

/// Warning threshold, in percent of the limit. Strictly greater triggers.
const WARNING_PERCENT: Decimal = Decimal::from_parts(80, 0, 0, false, 0);
const EXCEEDED_PERCENT: Decimal = Decimal::ONE_HUNDRED;

#[derive(Debug, Clone, PartialEq, Default)]
pub struct PeriodTotals {
    pub label: String,
    pub income: Decimal,
    pub expense: Decimal,
    pub balance: Decimal,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CategoryShare {
    pub name: String,
    pub value: Decimal,
    /// Percent of the group total, 0.0 when the group total is zero.
    pub percentage: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BudgetStatus {
    Safe,
    Warning,
    Exceeded,
}

impl BudgetStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Safe => "safe",
            Self::Warning => "warning",
            Self::Exceeded => "exceeded",
        }
    }
}

impl std::fmt::Display for BudgetStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BudgetProgress {
    pub budget: Budget,
    pub spent: Decimal,
    /// Spent as percent of the limit, capped at 100 for progress bars.
    pub percentage: f64,
    pub status: BudgetStatus,
}

impl BudgetProgress {
    /// Positive while under the limit, negative once over it.
    pub fn remaining(&self) -> Decimal {
        self.budget.limit - self.spent
    }

    pub fn is_over(&self) -> bool {
        self.spent > self.budget.limit
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct BudgetOverview {
    pub items: Vec<BudgetProgress>,
    pub total_limit: Decimal,
    pub total_spent: Decimal,
}

impl BudgetOverview {
    /// Total spent as a percentage of the total limit, when any limit is set.
    pub fn spent_percentage(&self) -> Option<f64> {
        (self.total_limit > Decimal::ZERO).then(|| percent_of(self.total_spent, self.total_limit))
    }
}

pub fn total_by_type<'a>(
    transactions: impl IntoIterator<Item = &'a Transaction>,
    kind: TransactionType,
) -> Decimal {
    sum(transactions
        .into_iter()
        .filter(|t| t.kind == kind)
        .map(|t| t.amount))
}

pub fn balance<'a>(transactions: impl IntoIterator<Item = &'a Transaction>) -> Decimal {
    sum(transactions.into_iter().map(Transaction::signed_amount))
}

/// Transactions dated within `year`/`month0`. `month0` is 0-indexed.
pub fn filter_by_month<'a>(
    transactions: impl IntoIterator<Item = &'a Transaction>,
    year: i32,
    month0: u32,
) -> Vec<&'a Transaction> {
    transactions
        .into_iter()
        .filter(|t| t.falls_in(year, month0))
        .collect()
}

pub fn total_for_category<'a>(
    transactions: impl IntoIterator<Item = &'a Transaction>,
    category: &str,
    kind: Option<TransactionType>,
) -> Decimal {
    sum(transactions
        .into_iter()
        .filter(|t| t.category == category && kind.map_or(true, |k| t.kind == k))
        .map(|t| t.amount))
}

/// Twelve entries for `year`, January first, zero-filled.
pub fn monthly_series<'a>(
    transactions: impl IntoIterator<Item = &'a Transaction>,
    year: i32,
) -> Vec<PeriodTotals> {
    let mut income = [Decimal::ZERO; 12];
    let mut expense = [Decimal::ZERO; 12];
    for t in transactions.into_iter().filter(|t| t.date.year() == year) {
        let slot = t.date.month0() as usize;
        match t.kind {
            TransactionType::Income => income[slot] = income[slot].saturating_add(t.amount),
            TransactionType::Expense => expense[slot] = expense[slot].saturating_add(t.amount),
        }
    }

    (0..12u32)
        .map(|m| {
            let i = m as usize;
            PeriodTotals {
                label: month_label(year, m),
                income: income[i],
                expense: expense[i],
                balance: income[i] - expense[i],
            }
        })
        .collect()
}

/// Four entries for `year`, labelled "Q1".."Q4".
pub fn quarterly_series<'a>(
    transactions: impl IntoIterator<Item = &'a Transaction>,
    year: i32,
) -> Vec<PeriodTotals> {
    let monthly = monthly_series(transactions, year);
    monthly
        .chunks(3)
        .enumerate()
        .map(|(q, months)| {
            let income = sum(months.iter().map(|m| m.income));
            let expense = sum(months.iter().map(|m| m.expense));
            PeriodTotals {
                label: format!("Q{}", q + 1),
                income,
                expense,
                balance: income - expense,
            }
        })
        .collect()
}

/// Totals saturate instead of overflowing, since stored data may predate the
/// amount cap.
fn sum(values: impl IntoIterator<Item = Decimal>) -> Decimal {
    values.into_iter().fold(Decimal::ZERO, Decimal::saturating_add)
}

fn month_label(year: i32, month0: u32) -> String {
    NaiveDate::from_ymd_opt(year, month0 + 1, 1)
        .map(|d| d.format("%b").to_string())
        .unwrap_or_default()
}

/// Group `kind` transactions by category name, largest first.
pub fn category_distribution<'a>(
    transactions: impl IntoIterator<Item = &'a Transaction>,
    kind: TransactionType,
    month: Option<YearMonth>,
) -> Vec<CategoryShare> {
    let mut order: Vec<(&str, Decimal)> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();

    for t in transactions
        .into_iter()
        .filter(|t| t.kind == kind && month.map_or(true, |m| m.contains(t.date)))
    {
        match index.get(t.category.as_str()) {
            Some(&i) => order[i].1 = order[i].1.saturating_add(t.amount),
            None => {
                index.insert(t.category.as_str(), order.len());
                order.push((t.category.as_str(), t.amount));
            }
        }
    }

    let total = sum(order.iter().map(|(_, v)| *v));
    let mut shares: Vec<CategoryShare> = order
        .into_iter()
        .map(|(name, value)| CategoryShare {
            name: name.to_string(),
            value,
            percentage: percent_of(value, total),
        })
        .collect();
    // sort_by is stable: ties keep first-seen order
    shares.sort_by(|a, b| b.value.cmp(&a.value));
    shares
}

fn percent_of(value: Decimal, total: Decimal) -> f64 {
    if total > Decimal::ZERO {
        value
            .checked_div(total)
            .and_then(|r| r.checked_mul(Decimal::ONE_HUNDRED))
            .and_then(|p| p.to_f64())
            .unwrap_or(0.0)
    } else {
        0.0
    }
}

/// Classify spending against a limit.
///
/// A zero limit cannot be divided by: any positive spend counts as exceeded,
/// anything else as safe.
pub fn budget_status(spent: Decimal, limit: Decimal) -> BudgetStatus {
    let Some(ratio) = spent.checked_div(limit) else {
        return if spent > Decimal::ZERO {
            BudgetStatus::Exceeded
        } else {
            BudgetStatus::Safe
        };
    };
    let Some(percent) = ratio.checked_mul(Decimal::ONE_HUNDRED) else {
        return BudgetStatus::Exceeded;
    };
    if percent > EXCEEDED_PERCENT {
        BudgetStatus::Exceeded
    } else if percent > WARNING_PERCENT {
        BudgetStatus::Warning
    } else {
        BudgetStatus::Safe
    }
}

/// Spend against every budget set for `month`. Spend is the expense total for
/// the budget's category within that month; all-time spend in the category is
/// not counted. Duplicate budgets each see the same total.
pub fn budget_overview(
    budgets: &[Budget],
    transactions: &[Transaction],
    month: YearMonth,
) -> BudgetOverview {
    let in_month = filter_by_month(transactions, month.year, month.month0);
    let items: Vec<BudgetProgress> = budgets
        .iter()
        .filter(|b| b.is_for(month))
        .map(|b| {
            let spent = total_for_category(
                in_month.iter().copied(),
                &b.category,
                Some(TransactionType::Expense),
            );
            BudgetProgress {
                budget: b.clone(),
                spent,
                percentage: percent_of(spent, b.limit).min(100.0),
                status: budget_status(spent, b.limit),
            }
        })
        .collect();

    BudgetOverview {
        total_limit: sum(items.iter().map(|p| p.budget.limit)),
        total_spent: sum(items.iter().map(|p| p.spent)),
        items,
    }
}

/// Share of income left over after expenses, in percent. Zero unless the
/// balance is positive.
pub fn savings_rate<'a>(transactions: impl IntoIterator<Item = &'a Transaction>) -> f64 {
    let (income, expense) = transactions.into_iter().fold(
        (Decimal::ZERO, Decimal::ZERO),
        |(income, expense), t| match t.kind {
            TransactionType::Income => (income.saturating_add(t.amount), expense),
            TransactionType::Expense => (income, expense.saturating_add(t.amount)),
        },
    );
    let balance = income - expense;
    if balance > Decimal::ZERO {
        percent_of(balance, income)
    } else {
        0.0
    }
}

/// Years from the earliest transaction through `current_year`, ascending.
pub fn year_range(transactions: &[Transaction], current_year: i32) -> Vec<i32> {
    let first = transactions
        .iter()
        .map(|t| t.date.year())
        .min()
        .unwrap_or(current_year)
        .min(current_year);
    (first..=current_year).collect()
}

/// Transactions of an optional type, newest first. Equal dates keep
/// insertion order.
pub fn sorted_by_date_desc<'a>(
    transactions: &'a [Transaction],
    kind: Option<TransactionType>,
) -> Vec<&'a Transaction> {
    let mut list: Vec<&Transaction> = transactions
        .iter()
        .filter(|t| kind.map_or(true, |k| t.kind == k))
        .collect();
    list.sort_by(|a, b| b.date.cmp(&a.date));
    list
}

#[cfg(test)]
mod tests;
