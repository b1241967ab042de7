use std::collections::HashMap;
use std::sync::LazyLock;

use super::app::{App, EditTarget, InputMode, PendingAction, Screen};
use crate::export;
use crate::forms;
use crate::models::{
    parse_currency_code, Category, ValidationError, YearMonth, COLOR_CHOICES,
    ICON_CHOICES, SUPPORTED_CURRENCIES,
};
use crate::store::Store;

pub(crate) struct Command {
    pub(crate) description: &'static str,
    pub(crate) run: fn(&str, &mut App, &mut Store) -> anyhow::Result<()>,
}

macro_rules! register_command {
    ($name:expr, $desc:expr, $func:expr, $registry:expr) => {{
        $registry.insert(
            $name,
            Command {
                description: $desc,
                run: $func,
            },
        );
    }};
}

pub(crate) static COMMANDS: LazyLock<HashMap<&str, Command>> = LazyLock::new(|| {
    let mut r: HashMap<&str, Command> = HashMap::new();

    register_command!("q", "Quit Dompet", cmd_quit, r);
    register_command!("quit", "Quit Dompet", cmd_quit, r);
    register_command!("d", "Go to Dashboard", cmd_dashboard, r);
    register_command!("dashboard", "Go to Dashboard", cmd_dashboard, r);
    register_command!("t", "Go to Transactions", cmd_transactions, r);
    register_command!("transactions", "Go to Transactions", cmd_transactions, r);
    register_command!("a", "Go to Analytics", cmd_analytics, r);
    register_command!("analytics", "Go to Analytics", cmd_analytics, r);
    register_command!("b", "Go to Budgets", cmd_budgets, r);
    register_command!("budgets", "Go to Budgets", cmd_budgets, r);
    register_command!("c", "Go to Categories", cmd_categories, r);
    register_command!("categories", "Go to Categories", cmd_categories, r);
    register_command!("help", "Show available commands", cmd_help, r);
    register_command!("h", "Show available commands", cmd_help, r);
    register_command!("month", "Set month (e.g. :month 2024-01)", cmd_month, r);
    register_command!("m", "Set month (e.g. :m 2024-01)", cmd_month, r);
    register_command!("next-month", "Go to next month", cmd_next_month, r);
    register_command!("prev-month", "Go to previous month", cmd_prev_month, r);
    register_command!("year", "Set analytics year (e.g. :year 2024)", cmd_year, r);
    register_command!("period", "Toggle monthly/quarterly analytics", cmd_period, r);
    register_command!(
        "filter",
        "Filter transactions (e.g. :filter expense, :filter all)",
        cmd_filter,
        r
    );
    register_command!("f", "Filter transactions by type", cmd_filter, r);
    register_command!(
        "search",
        "Search transactions (e.g. :search coffee)",
        cmd_search,
        r
    );
    register_command!("s", "Search transactions (e.g. :s coffee)", cmd_search, r);
    register_command!(
        "add-txn",
        "Add transaction (e.g. :add-txn expense 2024-03-15 50000 Makanan | Lunch)",
        cmd_add_txn,
        r
    );
    register_command!(
        "edit-txn",
        "Edit selected transaction",
        cmd_edit_txn,
        r
    );
    register_command!(
        "delete-txn",
        "Delete selected transaction",
        cmd_delete_txn,
        r
    );
    register_command!(
        "budget",
        "Set budget (e.g. :budget Makanan 1500000 [2024-03])",
        cmd_budget,
        r
    );
    register_command!(
        "edit-budget",
        "Edit selected budget",
        cmd_edit_budget,
        r
    );
    register_command!(
        "delete-budget",
        "Delete selected budget",
        cmd_delete_budget,
        r
    );
    register_command!(
        "category",
        "Create category (e.g. :category expense Hobi | 🎮 #ec4899)",
        cmd_category,
        r
    );
    register_command!(
        "edit-category",
        "Edit selected category",
        cmd_edit_category,
        r
    );
    register_command!(
        "delete-category",
        "Delete selected category",
        cmd_delete_category,
        r
    );
    register_command!("icons", "List icon and color choices", cmd_icons, r);
    register_command!(
        "currency",
        "Show or set display currency (e.g. :currency USD)",
        cmd_currency,
        r
    );
    register_command!(
        "export",
        "Export transactions to CSV (e.g. :export ~/report.csv)",
        cmd_export,
        r
    );

    r
});

pub(crate) fn handle_command(input: &str, app: &mut App, store: &mut Store) -> anyhow::Result<()> {
    let trimmed = input.trim();
    let mut parts = trimmed.splitn(2, ' ');
    let cmd_name = parts.next().unwrap_or("");
    let args = parts.next().unwrap_or("").trim();

    if let Some(cmd) = COMMANDS.get(cmd_name) {
        tracing::debug!(command = cmd_name, "running command");
        (cmd.run)(args, app, store)?;
    } else {
        let suggestion = find_closest(cmd_name);
        app.set_status(format!(
            "Unknown command: :{cmd_name}. Did you mean :{suggestion}?"
        ));
    }

    Ok(())
}

fn find_closest(input: &str) -> String {
    COMMANDS
        .keys()
        .filter(|k| k.len() > 1) // skip single-letter aliases for suggestions
        .min_by_key(|k| levenshtein(input, k))
        .unwrap_or(&"help")
        .to_string()
}

fn levenshtein(a: &str, b: &str) -> usize {
    let (a, b) = (a.as_bytes(), b.as_bytes());
    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut curr = vec![0; b.len() + 1];

    for i in 1..=a.len() {
        curr[0] = i;
        for j in 1..=b.len() {
            let cost = if a[i - 1] == b[j - 1] { 0 } else { 1 };
            curr[j] = (prev[j] + 1).min(curr[j - 1] + 1).min(prev[j - 1] + cost);
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[b.len()]
}

fn invalid(app: &mut App, err: ValidationError) {
    app.set_status(format!("Invalid input: {err}"));
}

// ── Navigation ───────────────────────────────────────────────

fn cmd_quit(_args: &str, app: &mut App, _store: &mut Store) -> anyhow::Result<()> {
    app.running = false;
    Ok(())
}

fn cmd_dashboard(_args: &str, app: &mut App, store: &mut Store) -> anyhow::Result<()> {
    app.screen = Screen::Dashboard;
    app.refresh_dashboard(store);
    Ok(())
}

fn cmd_transactions(_args: &str, app: &mut App, store: &mut Store) -> anyhow::Result<()> {
    app.screen = Screen::Transactions;
    app.refresh_transactions(store);
    Ok(())
}

fn cmd_analytics(_args: &str, app: &mut App, store: &mut Store) -> anyhow::Result<()> {
    app.screen = Screen::Analytics;
    app.refresh_analytics(store);
    Ok(())
}

fn cmd_budgets(_args: &str, app: &mut App, store: &mut Store) -> anyhow::Result<()> {
    app.screen = Screen::Budgets;
    app.refresh_budgets(store);
    Ok(())
}

fn cmd_categories(_args: &str, app: &mut App, store: &mut Store) -> anyhow::Result<()> {
    app.screen = Screen::Categories;
    app.refresh_categories(store);
    Ok(())
}

fn cmd_help(_args: &str, app: &mut App, _store: &mut Store) -> anyhow::Result<()> {
    app.show_help = true;
    Ok(())
}

fn cmd_month(args: &str, app: &mut App, store: &mut Store) -> anyhow::Result<()> {
    if args.is_empty() {
        app.set_month(YearMonth::current(), store);
        app.set_status(format!("Month: {}", app.month.label()));
        return Ok(());
    }

    // Accept "2024-01", "2024-1", "01" and "1"; bare months stay in the current year
    let token = if args.len() <= 2 {
        format!("{}-{args:0>2}", app.month.year)
    } else {
        args.to_string()
    };

    match YearMonth::parse(&token) {
        Ok(month) => {
            app.set_month(month, store);
            app.set_status(format!("Month: {}", month.label()));
        }
        Err(e) => invalid(app, e),
    }
    Ok(())
}

fn cmd_next_month(_args: &str, app: &mut App, store: &mut Store) -> anyhow::Result<()> {
    let month = app.month.next();
    app.set_month(month, store);
    app.set_status(format!("Month: {}", month.label()));
    Ok(())
}

fn cmd_prev_month(_args: &str, app: &mut App, store: &mut Store) -> anyhow::Result<()> {
    let month = app.month.prev();
    app.set_month(month, store);
    app.set_status(format!("Month: {}", month.label()));
    Ok(())
}

fn cmd_year(args: &str, app: &mut App, store: &mut Store) -> anyhow::Result<()> {
    if args.is_empty() {
        let years: Vec<String> = app.years.iter().map(i32::to_string).collect();
        app.set_status(format!(
            "Analytics year: {}. Available: {}",
            app.analytics_year,
            years.join(", ")
        ));
        return Ok(());
    }

    match args.parse::<i32>() {
        Ok(year) if (1000..=9999).contains(&year) => {
            app.set_analytics_year(year, store);
            app.screen = Screen::Analytics;
            app.set_status(format!("Analytics year: {year}"));
        }
        _ => app.set_status(format!("Invalid year: {args}")),
    }
    Ok(())
}

fn cmd_period(_args: &str, app: &mut App, store: &mut Store) -> anyhow::Result<()> {
    app.period = app.period.toggled();
    app.refresh_analytics(store);
    app.set_status(format!("Period: {}", app.period));
    Ok(())
}

fn cmd_filter(args: &str, app: &mut App, store: &mut Store) -> anyhow::Result<()> {
    let filter = match args {
        "" | "all" => None,
        other => match forms::parse_kind(other) {
            Ok(kind) => Some(kind),
            Err(e) => {
                invalid(app, e);
                return Ok(());
            }
        },
    };
    app.screen = Screen::Transactions;
    app.set_type_filter(filter, store);
    app.set_status(match filter {
        Some(kind) => format!("Showing {kind} only"),
        None => "Showing all transactions".to_string(),
    });
    Ok(())
}

fn cmd_search(args: &str, app: &mut App, store: &mut Store) -> anyhow::Result<()> {
    app.search_input = args.to_string();
    app.screen = Screen::Transactions;
    app.transaction_index = 0;
    app.transaction_scroll = 0;
    app.refresh_transactions(store);

    if args.is_empty() {
        app.set_status("Search cleared");
    } else {
        app.set_status(format!("Searching: {args}"));
    }

    Ok(())
}

// ── Transactions ─────────────────────────────────────────────

fn cmd_add_txn(args: &str, app: &mut App, store: &mut Store) -> anyhow::Result<()> {
    if args.is_empty() {
        app.set_status(format!("Usage: :add-txn {}", forms::TRANSACTION_USAGE));
        return Ok(());
    }

    match forms::transaction_draft(args, store.categories()) {
        Ok(draft) => {
            let description = draft.description.clone();
            store.add_transaction(draft);
            app.screen = Screen::Transactions;
            app.set_status(format!("Added transaction: {description}"));
        }
        Err(e) => invalid(app, e),
    }
    Ok(())
}

fn cmd_edit_txn(args: &str, app: &mut App, store: &mut Store) -> anyhow::Result<()> {
    if app.screen != Screen::Transactions {
        app.set_status("Navigate to Transactions and select one first");
        return Ok(());
    }
    let Some((id, prefill)) = app
        .selected_transaction()
        .map(|t| (t.id.clone(), forms::transaction_args(t)))
    else {
        app.set_status("No transaction selected");
        return Ok(());
    };

    if args.is_empty() {
        app.command_input = prefill;
        app.editing = Some(EditTarget::Transaction(id));
        app.input_mode = InputMode::Editing;
        app.set_status("Edit the fields, Enter to save, Esc to cancel");
        return Ok(());
    }

    submit_edit(EditTarget::Transaction(id), args, app, store);
    Ok(())
}

fn cmd_delete_txn(_args: &str, app: &mut App, _store: &mut Store) -> anyhow::Result<()> {
    if app.screen != Screen::Transactions || app.transactions.is_empty() {
        app.set_status("Navigate to Transactions and select one first");
        return Ok(());
    }

    if let Some(txn) = app.selected_transaction() {
        let id = txn.id.clone();
        let description = txn.description.clone();
        app.confirm_message = format!("Delete '{description}'?");
        app.pending_action = Some(PendingAction::DeleteTransaction { id, description });
        app.input_mode = InputMode::Confirm;
    }

    Ok(())
}

// ── Budgets ──────────────────────────────────────────────────

fn cmd_budget(args: &str, app: &mut App, store: &mut Store) -> anyhow::Result<()> {
    if args.is_empty() {
        app.set_status(format!("Usage: :budget {}", forms::BUDGET_USAGE));
        return Ok(());
    }

    match forms::budget_draft(args, store.categories(), app.month) {
        Ok(draft) => {
            let summary = format!("{} for {}", draft.category, draft.month);
            if let Ok(month) = YearMonth::parse(&draft.month) {
                app.set_month(month, store);
            }
            store.add_budget(draft);
            app.screen = Screen::Budgets;
            app.set_status(format!("Budget set: {summary}"));
        }
        Err(e) => invalid(app, e),
    }
    Ok(())
}

fn cmd_edit_budget(args: &str, app: &mut App, store: &mut Store) -> anyhow::Result<()> {
    if app.screen != Screen::Budgets {
        app.set_status("Navigate to Budgets and select one first");
        return Ok(());
    }
    let Some(id) = app
        .budget_overview
        .items
        .get(app.budget_index)
        .map(|item| item.budget.id.clone())
    else {
        app.set_status("No budget selected");
        return Ok(());
    };
    let Some(budget) = store.budget(&id) else {
        app.set_status("That record no longer exists");
        return Ok(());
    };

    if args.is_empty() {
        app.command_input = format!(
            "{} {} {}",
            budget.category,
            budget.limit.normalize(),
            budget.month
        );
        app.editing = Some(EditTarget::Budget(id));
        app.input_mode = InputMode::Editing;
        app.set_status("Edit the budget, Enter to save, Esc to cancel");
        return Ok(());
    }

    submit_edit(EditTarget::Budget(id), args, app, store);
    Ok(())
}

fn cmd_delete_budget(_args: &str, app: &mut App, _store: &mut Store) -> anyhow::Result<()> {
    if app.budget_overview.items.is_empty() {
        app.set_status("No budgets to delete");
        return Ok(());
    }

    if let Some(item) = app.budget_overview.items.get(app.budget_index) {
        let id = item.budget.id.clone();
        let name = item.budget.category.clone();
        app.confirm_message = format!("Delete budget for '{name}'?");
        app.pending_action = Some(PendingAction::DeleteBudget { id, name });
        app.input_mode = InputMode::Confirm;
    }

    Ok(())
}

// ── Categories ───────────────────────────────────────────────

fn cmd_category(args: &str, app: &mut App, store: &mut Store) -> anyhow::Result<()> {
    if args.is_empty() {
        app.set_status(format!("Usage: :category {}", forms::CATEGORY_USAGE));
        return Ok(());
    }

    match forms::category_draft(args) {
        Ok(draft) => {
            let label = format!("{} {}", draft.icon, draft.name);
            let duplicate = Category::find_by_name_loose(store.categories(), &draft.name).is_some();
            store.add_category(draft);
            app.screen = Screen::Categories;
            if duplicate {
                app.set_status(format!("Created category: {label} (name already in use)"));
            } else {
                app.set_status(format!("Created category: {label}"));
            }
        }
        Err(e) => invalid(app, e),
    }
    Ok(())
}

fn cmd_edit_category(args: &str, app: &mut App, store: &mut Store) -> anyhow::Result<()> {
    if app.screen != Screen::Categories {
        app.set_status("Navigate to Categories and select one first");
        return Ok(());
    }
    let Some(id) = app.selected_category().map(|c| c.id.clone()) else {
        app.set_status("No category selected");
        return Ok(());
    };
    let Some(category) = store.category(&id) else {
        app.set_status("That record no longer exists");
        return Ok(());
    };

    if args.is_empty() {
        app.command_input = forms::category_args(category);
        app.editing = Some(EditTarget::Category(id));
        app.input_mode = InputMode::Editing;
        app.set_status("Renaming does not update existing transactions. Enter to save");
        return Ok(());
    }

    submit_edit(EditTarget::Category(id), args, app, store);
    Ok(())
}

fn cmd_delete_category(_args: &str, app: &mut App, store: &mut Store) -> anyhow::Result<()> {
    if app.screen != Screen::Categories || app.categories.is_empty() {
        app.set_status("Navigate to Categories and select one first");
        return Ok(());
    }

    if let Some(category) = app.selected_category() {
        let id = category.id.clone();
        let name = category.name.clone();
        let in_use = store
            .transactions()
            .iter()
            .filter(|t| t.category == name)
            .count();
        app.confirm_message = if in_use > 0 {
            format!("Delete category '{name}'? {in_use} transactions keep the name")
        } else {
            format!("Delete category '{name}'?")
        };
        app.pending_action = Some(PendingAction::DeleteCategory { id, name, in_use });
        app.input_mode = InputMode::Confirm;
    }

    Ok(())
}

fn cmd_icons(_args: &str, app: &mut App, _store: &mut Store) -> anyhow::Result<()> {
    app.set_status(format!(
        "Icons: {}  Colors: {}",
        ICON_CHOICES.join(" "),
        COLOR_CHOICES.join(" ")
    ));
    Ok(())
}

// ── Settings and export ──────────────────────────────────────

fn cmd_currency(args: &str, app: &mut App, store: &mut Store) -> anyhow::Result<()> {
    if args.is_empty() {
        let codes: Vec<&str> = SUPPORTED_CURRENCIES.iter().map(|(code, _)| *code).collect();
        app.set_status(format!(
            "Currency: {}. Choices: {}",
            store.currency(),
            codes.join(", ")
        ));
        return Ok(());
    }

    match parse_currency_code(args) {
        Ok(code) => {
            store.set_currency(&code);
            app.set_status(format!("Currency set to {code}"));
        }
        Err(e) => invalid(app, e),
    }
    Ok(())
}

fn cmd_export(args: &str, app: &mut App, store: &mut Store) -> anyhow::Result<()> {
    let explicit = (!args.is_empty()).then(|| expand_home(args, &app.export_dir));
    let today = chrono::Local::now().date_naive();
    let path = export::resolve_path(explicit.as_deref(), &app.export_dir, today);

    match export::export_to_path(&path, store.transactions()) {
        Ok(0) => app.set_status(format!("No transactions; wrote header to {}", path.display())),
        Ok(count) => app.set_status(format!(
            "Exported {count} transactions to {}",
            path.display()
        )),
        Err(e) => {
            tracing::warn!(error = %format!("{e:#}"), "export failed");
            app.set_status(format!("Export failed: {e:#}"));
        }
    }
    Ok(())
}

/// `~/x` becomes `<home>/x`.
pub(crate) fn expand_home(path: &str, home: &std::path::Path) -> String {
    match path.strip_prefix("~/") {
        Some(rest) => home.join(rest).display().to_string(),
        None => path.to_string(),
    }
}

// ── Edits and confirmations ──────────────────────────────────

/// Applies the form text from an `Editing` prompt to the record it targets.
pub(crate) fn submit_edit(target: EditTarget, input: &str, app: &mut App, store: &mut Store) {
    let result = match &target {
        EditTarget::Transaction(id) => forms::transaction_draft(input, store.categories())
            .map(|draft| store.update_transaction(id, draft)),
        EditTarget::Budget(id) => forms::budget_draft(input, store.categories(), app.month)
            .map(|draft| store.update_budget(id, draft)),
        EditTarget::Category(id) => {
            forms::category_draft(input).map(|draft| store.update_category(id, draft))
        }
    };

    match result {
        Ok(true) => app.set_status("Saved"),
        Ok(false) => app.set_status("That record no longer exists"),
        Err(e) => invalid(app, e),
    }
}

/// Carries out a confirmed action.
pub(crate) fn confirm(action: PendingAction, app: &mut App, store: &mut Store) {
    match action {
        PendingAction::DeleteTransaction { id, description } => {
            store.delete_transaction(&id);
            app.set_status(format!("Deleted: {description}"));
        }
        PendingAction::DeleteBudget { id, name } => {
            store.delete_budget(&id);
            app.set_status(format!("Deleted budget: {name}"));
        }
        PendingAction::DeleteCategory { id, name, in_use } => {
            store.delete_category(&id);
            if in_use > 0 {
                app.set_status(format!(
                    "Deleted category: {name} ({in_use} transactions still reference it)"
                ));
            } else {
                app.set_status(format!("Deleted category: {name}"));
            }
        }
    }
}

#[cfg(test)]
#[path = "commands_tests.rs"]
mod tests;
