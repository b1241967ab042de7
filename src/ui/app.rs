use chrono::Datelike;
use rust_decimal::Decimal;
use std::cell::Cell;
use std::path::PathBuf;
use std::rc::Rc;

use crate::analytics::{self, BudgetOverview, CategoryShare, PeriodTotals};
use crate::models::{Category, Transaction, TransactionType, YearMonth};
use crate::store::Store;

/// Rows shown in the dashboard's recent list and the analytics top lists.
pub(crate) const TOP_N: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Screen {
    Dashboard,
    Transactions,
    Analytics,
    Budgets,
    Categories,
}

impl Screen {
    pub(crate) fn all() -> &'static [Screen] {
        &[
            Self::Dashboard,
            Self::Transactions,
            Self::Analytics,
            Self::Budgets,
            Self::Categories,
        ]
    }
}

impl std::fmt::Display for Screen {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Dashboard => write!(f, "Dashboard"),
            Self::Transactions => write!(f, "Transactions"),
            Self::Analytics => write!(f, "Analytics"),
            Self::Budgets => write!(f, "Budgets"),
            Self::Categories => write!(f, "Categories"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum InputMode {
    Normal,
    Command,
    Search,
    Editing,
    Confirm,
}

impl std::fmt::Display for InputMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Normal => write!(f, "NORMAL"),
            Self::Command => write!(f, "COMMAND"),
            Self::Search => write!(f, "SEARCH"),
            Self::Editing => write!(f, "EDIT"),
            Self::Confirm => write!(f, "CONFIRM"),
        }
    }
}

/// Analytics chart granularity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Period {
    Monthly,
    Quarterly,
}

impl Period {
    pub(crate) fn toggled(self) -> Self {
        match self {
            Self::Monthly => Self::Quarterly,
            Self::Quarterly => Self::Monthly,
        }
    }
}

impl std::fmt::Display for Period {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Monthly => write!(f, "Monthly"),
            Self::Quarterly => write!(f, "Quarterly"),
        }
    }
}

/// Pending action that requires user confirmation.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum PendingAction {
    DeleteTransaction { id: String, description: String },
    DeleteBudget { id: String, name: String },
    DeleteCategory { id: String, name: String, in_use: usize },
}

/// The record an `Editing` prompt will overwrite on Enter.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum EditTarget {
    Transaction(String),
    Budget(String),
    Category(String),
}

pub(crate) struct App {
    pub(crate) running: bool,
    pub(crate) screen: Screen,
    pub(crate) input_mode: InputMode,
    pub(crate) command_input: String,
    pub(crate) search_input: String,
    pub(crate) status_message: String,
    pub(crate) show_help: bool,
    pub(crate) month: YearMonth,
    pub(crate) currency: String,
    pub(crate) persist_error: Option<String>,
    /// Default destination directory for `:export`.
    pub(crate) export_dir: PathBuf,

    // Dashboard
    pub(crate) total_income: Decimal,
    pub(crate) total_expense: Decimal,
    pub(crate) total_balance: Decimal,
    pub(crate) savings_rate: f64,
    pub(crate) month_totals: PeriodTotals,
    pub(crate) expense_shares: Vec<CategoryShare>,
    pub(crate) income_shares: Vec<CategoryShare>,
    pub(crate) year_series: Vec<PeriodTotals>,
    pub(crate) recent: Vec<Transaction>,

    // Transactions
    pub(crate) type_filter: Option<TransactionType>,
    pub(crate) transactions: Vec<Transaction>,
    pub(crate) transaction_index: usize,
    pub(crate) transaction_scroll: usize,
    pub(crate) transaction_count: usize,

    // Analytics
    pub(crate) analytics_year: i32,
    pub(crate) years: Vec<i32>,
    pub(crate) period: Period,
    pub(crate) series: Vec<PeriodTotals>,
    pub(crate) top_expenses: Vec<CategoryShare>,
    pub(crate) top_incomes: Vec<CategoryShare>,

    // Budgets
    pub(crate) budget_overview: BudgetOverview,
    pub(crate) budget_index: usize,
    pub(crate) budget_scroll: usize,

    // Categories
    pub(crate) categories: Vec<Category>,
    pub(crate) category_index: usize,
    pub(crate) category_scroll: usize,

    // Confirmation and in-place editing
    pub(crate) pending_action: Option<PendingAction>,
    pub(crate) confirm_message: String,
    pub(crate) editing: Option<EditTarget>,

    // Layout (updated each render frame)
    pub(crate) visible_rows: usize,

    dirty: Rc<Cell<bool>>,
}

impl App {
    /// Builds the view state and subscribes it to store changes.
    pub(crate) fn new(store: &mut Store, export_dir: PathBuf) -> Self {
        let month = YearMonth::current();
        let dirty = Rc::new(Cell::new(false));
        let flag = Rc::clone(&dirty);
        store.subscribe(move |_| flag.set(true));

        let mut app = Self {
            running: true,
            screen: Screen::Dashboard,
            input_mode: InputMode::Normal,
            command_input: String::new(),
            search_input: String::new(),
            status_message: String::new(),
            show_help: false,
            month,
            currency: String::new(),
            persist_error: None,
            export_dir,

            total_income: Decimal::ZERO,
            total_expense: Decimal::ZERO,
            total_balance: Decimal::ZERO,
            savings_rate: 0.0,
            month_totals: PeriodTotals::default(),
            expense_shares: Vec::new(),
            income_shares: Vec::new(),
            year_series: Vec::new(),
            recent: Vec::new(),

            type_filter: None,
            transactions: Vec::new(),
            transaction_index: 0,
            transaction_scroll: 0,
            transaction_count: 0,

            analytics_year: month.year,
            years: Vec::new(),
            period: Period::Monthly,
            series: Vec::new(),
            top_expenses: Vec::new(),
            top_incomes: Vec::new(),

            budget_overview: BudgetOverview::default(),
            budget_index: 0,
            budget_scroll: 0,

            categories: Vec::new(),
            category_index: 0,
            category_scroll: 0,

            pending_action: None,
            confirm_message: String::new(),
            editing: None,

            visible_rows: 20,
            dirty,
        };
        app.refresh_all(store);
        app
    }

    /// Re-derives view state if the store changed since the last call.
    pub(crate) fn sync(&mut self, store: &Store) {
        if self.dirty.replace(false) {
            self.refresh_all(store);
        }
    }

    pub(crate) fn refresh_all(&mut self, store: &Store) {
        self.currency = store.currency().to_string();
        self.persist_error = store.last_persist_error().map(str::to_string);
        self.refresh_dashboard(store);
        self.refresh_transactions(store);
        self.refresh_analytics(store);
        self.refresh_budgets(store);
        self.refresh_categories(store);
    }

    pub(crate) fn refresh_dashboard(&mut self, store: &Store) {
        let all = store.transactions();
        self.total_income = analytics::total_by_type(all, TransactionType::Income);
        self.total_expense = analytics::total_by_type(all, TransactionType::Expense);
        self.total_balance = analytics::balance(all);
        self.savings_rate = analytics::savings_rate(all);
        self.transaction_count = all.len();

        let in_month = analytics::filter_by_month(all, self.month.year, self.month.month0);
        let income = analytics::total_by_type(in_month.iter().copied(), TransactionType::Income);
        let expense = analytics::total_by_type(in_month.iter().copied(), TransactionType::Expense);
        self.month_totals = PeriodTotals {
            label: self.month.label(),
            income,
            expense,
            balance: income - expense,
        };
        self.expense_shares =
            analytics::category_distribution(all, TransactionType::Expense, Some(self.month));
        self.income_shares =
            analytics::category_distribution(all, TransactionType::Income, Some(self.month));
        self.year_series = analytics::monthly_series(all, self.month.year);
        self.recent = analytics::sorted_by_date_desc(all, None)
            .into_iter()
            .take(TOP_N)
            .cloned()
            .collect();
    }

    pub(crate) fn refresh_transactions(&mut self, store: &Store) {
        let needle = self.search_input.to_lowercase();
        self.transactions = analytics::sorted_by_date_desc(store.transactions(), self.type_filter)
            .into_iter()
            .filter(|t| needle.is_empty() || matches_search(t, &needle))
            .cloned()
            .collect();
        if self.transaction_index >= self.transactions.len() {
            self.transaction_index = self.transactions.len().saturating_sub(1);
        }
        if self.transaction_scroll > self.transaction_index {
            self.transaction_scroll = self.transaction_index;
        }
    }

    pub(crate) fn refresh_analytics(&mut self, store: &Store) {
        let all = store.transactions();
        let current_year = chrono::Local::now().year();
        self.years = analytics::year_range(all, current_year.max(self.analytics_year));
        self.series = match self.period {
            Period::Monthly => analytics::monthly_series(all, self.analytics_year),
            Period::Quarterly => analytics::quarterly_series(all, self.analytics_year),
        };
        self.top_expenses = top(analytics::category_distribution(
            all,
            TransactionType::Expense,
            None,
        ));
        self.top_incomes = top(analytics::category_distribution(
            all,
            TransactionType::Income,
            None,
        ));
    }

    pub(crate) fn refresh_budgets(&mut self, store: &Store) {
        self.budget_overview =
            analytics::budget_overview(store.budgets(), store.transactions(), self.month);
        if self.budget_index >= self.budget_overview.items.len() {
            self.budget_index = self.budget_overview.items.len().saturating_sub(1);
        }
        self.budget_scroll = self.budget_scroll.min(self.budget_index);
    }

    pub(crate) fn refresh_categories(&mut self, store: &Store) {
        // Income first, then expense, each in stored order
        let mut categories = store.categories().to_vec();
        categories.sort_by_key(|c| c.kind != TransactionType::Income);
        self.categories = categories;
        if self.category_index >= self.categories.len() {
            self.category_index = self.categories.len().saturating_sub(1);
        }
        self.category_scroll = self.category_scroll.min(self.category_index);
    }

    /// Moves the month shown on the dashboard and budgets screens.
    pub(crate) fn set_month(&mut self, month: YearMonth, store: &Store) {
        self.month = month;
        self.budget_index = 0;
        self.budget_scroll = 0;
        self.refresh_dashboard(store);
        self.refresh_budgets(store);
    }

    pub(crate) fn set_analytics_year(&mut self, year: i32, store: &Store) {
        self.analytics_year = year;
        self.refresh_analytics(store);
    }

    pub(crate) fn set_type_filter(&mut self, filter: Option<TransactionType>, store: &Store) {
        self.type_filter = filter;
        self.transaction_index = 0;
        self.transaction_scroll = 0;
        self.refresh_transactions(store);
    }

    pub(crate) fn selected_transaction(&self) -> Option<&Transaction> {
        self.transactions.get(self.transaction_index)
    }

    pub(crate) fn selected_category(&self) -> Option<&Category> {
        self.categories.get(self.category_index)
    }

    pub(crate) fn category_icon(&self, name: &str) -> &str {
        Category::icon_for(&self.categories, name)
    }

    pub(crate) fn set_status(&mut self, msg: impl Into<String>) {
        self.status_message = msg.into();
    }
}

fn matches_search(t: &Transaction, needle: &str) -> bool {
    t.description.to_lowercase().contains(needle)
        || t.category.to_lowercase().contains(needle)
        || t
            .notes
            .as_deref()
            .is_some_and(|n| n.to_lowercase().contains(needle))
}

fn top(mut shares: Vec<CategoryShare>) -> Vec<CategoryShare> {
    shares.truncate(TOP_N);
    shares
}

#[cfg(test)]
#[path = "app_tests.rs"]
mod tests;
