use anyhow::{Context, Result};

use crate::analytics;
use crate::config::Config;
use crate::export;
use crate::forms;
use crate::models::{parse_currency_code, Category, TransactionType, YearMonth};
use crate::store::Store;
use crate::ui::commands::expand_home;
use crate::ui::util::{format_currency, format_percent, progress_bar, truncate};

pub(crate) fn as_cli(args: &[String], store: &mut Store, config: &Config) -> Result<()> {
    let rest = &args[2..];
    match args[1].as_str() {
        "add" => cli_add(rest, store),
        "list" | "ls" => cli_list(rest, store),
        "summary" | "s" => cli_summary(rest, store),
        "series" => cli_series(rest, store),
        "budgets" => cli_budgets(rest, store),
        "categories" => cli_categories(store),
        "currency" => cli_currency(rest, store),
        "export" => cli_export(rest, store, config),
        "delete" => cli_delete(rest, store),
        "--help" | "-h" | "help" => {
            print_usage();
            Ok(())
        }
        "--version" | "-V" | "version" => {
            println!("dompet {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
        other => {
            print_usage();
            anyhow::bail!("Unknown command: {other}");
        }
    }
}

fn print_usage() {
    println!("Dompet - local-only personal finance tracker");
    println!();
    println!("Usage: dompet [command]");
    println!();
    println!("Commands:");
    println!("  (none)                        Launch interactive TUI");
    println!("  add {}", forms::TRANSACTION_USAGE);
    println!("                                Record a transaction");
    println!("  list [income|expense]         List transactions, newest first");
    println!("  summary [YYYY-MM]             Print a monthly summary");
    println!("  series [YYYY] [--quarterly]   Print income/expense per month or quarter");
    println!("  budgets [YYYY-MM]             Print budget progress for a month");
    println!("  categories                    List categories");
    println!("  currency [CODE]               Show or set the display currency");
    println!("  export [path]                 Export all transactions to CSV");
    println!("  delete <id>                   Delete a transaction");
    println!("  --help, -h                    Show this help");
    println!("  --version, -V                 Show version");
}

fn month_arg(args: &[String]) -> Result<YearMonth> {
    match args.first().filter(|a| !a.starts_with('-')) {
        Some(arg) => Ok(YearMonth::parse(arg)?),
        None => Ok(YearMonth::current()),
    }
}

fn cli_add(args: &[String], store: &mut Store) -> Result<()> {
    if args.is_empty() {
        anyhow::bail!("Usage: dompet add {}", forms::TRANSACTION_USAGE);
    }

    let draft = forms::transaction_draft(&args.join(" "), store.categories())?;
    let summary = format!(
        "{} {} {} ({})",
        draft.date,
        draft.kind,
        format_currency(draft.amount, store.currency()),
        draft.category
    );
    let id = store.add_transaction(draft);
    report_persist_error(store);
    println!("Added {id}: {summary}");
    Ok(())
}

fn cli_list(args: &[String], store: &Store) -> Result<()> {
    let kind = match args.first().map(String::as_str) {
        None | Some("all") => None,
        Some(other) => Some(forms::parse_kind(other)?),
    };

    let list = analytics::sorted_by_date_desc(store.transactions(), kind);
    if list.is_empty() {
        println!("No transactions");
        return Ok(());
    }

    let currency = store.currency();
    println!(
        "{:<14} {:<10} {:<8} {:<16} {:<28} {:>16}",
        "ID", "Date", "Type", "Category", "Description", "Amount"
    );
    println!("{}", "─".repeat(97));
    for t in list {
        println!(
            "{:<14} {:<10} {:<8} {:<16} {:<28} {:>16}",
            truncate(&t.id, 14),
            t.date,
            t.kind.as_str(),
            truncate(&t.category, 16),
            truncate(&t.description, 28),
            format_currency(t.signed_amount(), currency),
        );
    }
    Ok(())
}

fn cli_summary(args: &[String], store: &Store) -> Result<()> {
    let month = month_arg(args)?;
    let currency = store.currency();
    let all = store.transactions();
    let in_month = analytics::filter_by_month(all, month.year, month.month0);
    let income = analytics::total_by_type(in_month.iter().copied(), TransactionType::Income);
    let expense = analytics::total_by_type(in_month.iter().copied(), TransactionType::Expense);

    println!("Dompet - {}", month.label());
    println!("{}", "─".repeat(40));
    println!("  Income:       {}", format_currency(income, currency));
    println!("  Expenses:     {}", format_currency(expense, currency));
    println!("  Balance:      {}", format_currency(income - expense, currency));
    println!("  Transactions: {}", in_month.len());
    println!(
        "  All-time balance: {} (savings rate {})",
        format_currency(analytics::balance(all), currency),
        format_percent(analytics::savings_rate(all))
    );

    let shares = analytics::category_distribution(all, TransactionType::Expense, Some(month));
    if !shares.is_empty() {
        println!();
        println!("Expenses by Category:");
        for share in &shares {
            println!(
                "  {} {:<20} {:>16} {:>7}",
                Category::icon_for(store.categories(), &share.name),
                truncate(&share.name, 20),
                format_currency(share.value, currency),
                format_percent(share.percentage)
            );
        }
    }

    Ok(())
}

fn cli_series(args: &[String], store: &Store) -> Result<()> {
    let quarterly = args.iter().any(|a| a == "--quarterly" || a == "-q");
    let year = match args.iter().find(|a| !a.starts_with('-')) {
        Some(arg) => arg
            .parse::<i32>()
            .with_context(|| format!("Invalid year: {arg}"))?,
        None => YearMonth::current().year,
    };

    let all = store.transactions();
    let series = if quarterly {
        analytics::quarterly_series(all, year)
    } else {
        analytics::monthly_series(all, year)
    };

    let currency = store.currency();
    println!("Dompet - {year}");
    println!(
        "{:<6} {:>18} {:>18} {:>18}",
        "Period", "Income", "Expense", "Balance"
    );
    println!("{}", "─".repeat(63));
    for point in &series {
        println!(
            "{:<6} {:>18} {:>18} {:>18}",
            point.label,
            format_currency(point.income, currency),
            format_currency(point.expense, currency),
            format_currency(point.balance, currency),
        );
    }
    Ok(())
}

fn cli_budgets(args: &[String], store: &Store) -> Result<()> {
    let month = month_arg(args)?;
    let overview = analytics::budget_overview(store.budgets(), store.transactions(), month);
    if overview.items.is_empty() {
        println!("No budgets for {}", month.label());
        return Ok(());
    }

    let currency = store.currency();
    println!("Budgets - {}", month.label());
    println!("{}", "─".repeat(80));
    for item in &overview.items {
        println!(
            "  {} {:<18} {} {:>16} / {:<16} {}",
            Category::icon_for(store.categories(), &item.budget.category),
            truncate(&item.budget.category, 18),
            progress_bar(item.percentage, 12),
            format_currency(item.spent, currency),
            format_currency(item.budget.limit, currency),
            item.status,
        );
    }
    println!("{}", "─".repeat(80));
    println!(
        "  Total: {} of {}",
        format_currency(overview.total_spent, currency),
        format_currency(overview.total_limit, currency)
    );
    Ok(())
}

fn cli_categories(store: &Store) -> Result<()> {
    println!("{:<14} {:<4} {:<20} {:<8} Color", "ID", "Icon", "Name", "Type");
    println!("{}", "─".repeat(60));
    for kind in TransactionType::all() {
        for c in store.categories().iter().filter(|c| c.kind == *kind) {
            println!(
                "{:<14} {:<4} {:<20} {:<8} {}",
                truncate(&c.id, 14),
                c.icon,
                truncate(&c.name, 20),
                c.kind.as_str(),
                c.color
            );
        }
    }
    Ok(())
}

fn cli_currency(args: &[String], store: &mut Store) -> Result<()> {
    match args.first() {
        None => println!("{}", store.currency()),
        Some(code) => {
            let code = parse_currency_code(code)?;
            store.set_currency(&code);
            report_persist_error(store);
            println!("Currency set to {code}");
        }
    }
    Ok(())
}

fn cli_export(args: &[String], store: &Store, config: &Config) -> Result<()> {
    let explicit = args.first().map(|a| expand_home(a, &config.export_dir));
    let today = chrono::Local::now().date_naive();
    let path = export::resolve_path(explicit.as_deref(), &config.export_dir, today);

    let count = export::export_to_path(&path, store.transactions())?;
    if count == 0 {
        println!("No transactions; wrote header to {}", path.display());
    } else {
        println!("Exported {count} transactions to {}", path.display());
    }
    Ok(())
}

fn cli_delete(args: &[String], store: &mut Store) -> Result<()> {
    let Some(id) = args.first() else {
        anyhow::bail!("Usage: dompet delete <id>");
    };
    let description = store.transaction(id).map(|t| t.description.clone());
    if !store.delete_transaction(id) {
        anyhow::bail!("No transaction with id {id}");
    }
    report_persist_error(store);
    println!("Deleted {id}: {}", description.unwrap_or_default());
    Ok(())
}

fn report_persist_error(store: &Store) {
    if let Some(err) = store.last_persist_error() {
        eprintln!("Warning: change not saved: {err}");
    }
}
