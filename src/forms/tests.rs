#![allow(clippy::unwrap_used)]

use super::*;
use chrono::NaiveDate;
use rust_decimal_macros::dec;

fn categories() -> Vec<Category> {
    Category::defaults()
}

fn march() -> YearMonth {
    YearMonth::new(2024, 2).unwrap()
}

// ── Amounts and types ─────────────────────────────────────────

#[test]
fn test_parse_amount_accepts_separators() {
    assert_eq!(parse_amount("50000").unwrap(), dec!(50000));
    assert_eq!(parse_amount("50,000").unwrap(), dec!(50000));
    assert_eq!(parse_amount("1_250.75").unwrap(), dec!(1250.75));
}

#[test]
fn test_parse_amount_rejects_garbage() {
    assert_eq!(
        parse_amount("lima ribu"),
        Err(ValidationError::InvalidAmount("lima ribu".into()))
    );
    assert_eq!(parse_amount("  "), Err(ValidationError::MissingField("amount")));
}

#[test]
fn test_parse_kind() {
    assert_eq!(parse_kind("Expense").unwrap(), TransactionType::Expense);
    assert_eq!(parse_kind("in").unwrap(), TransactionType::Income);
    assert_eq!(parse_kind("transfer"), Err(ValidationError::InvalidType("transfer".into())));
}

// ── Transactions ──────────────────────────────────────────────

#[test]
fn test_transaction_draft_full_form() {
    let draft = transaction_draft(
        "expense 2024-03-15 50000 makanan | Lunch | with the team",
        &categories(),
    )
    .unwrap();
    assert_eq!(draft.kind, TransactionType::Expense);
    assert_eq!(draft.date, NaiveDate::from_ymd_opt(2024, 3, 15).unwrap());
    assert_eq!(draft.amount, dec!(50000));
    assert_eq!(draft.category, "Makanan");
    assert_eq!(draft.description, "Lunch");
    assert_eq!(draft.notes.as_deref(), Some("with the team"));
}

#[test]
fn test_transaction_draft_without_notes() {
    let draft = transaction_draft("income 2024-03-01 7500000 Gaji | March salary", &categories()).unwrap();
    assert_eq!(draft.notes, None);

    let draft = transaction_draft("income 2024-03-01 7500000 Gaji | March salary |  ", &categories()).unwrap();
    assert_eq!(draft.notes, None);
}

#[test]
fn test_transaction_draft_keeps_unknown_category_names() {
    let draft =
        transaction_draft("expense 2024-03-15 20000 Kopi Pagi | Coffee", &categories()).unwrap();
    assert_eq!(draft.category, "Kopi Pagi");
}

#[test]
fn test_transaction_draft_reports_first_problem() {
    let cats = categories();
    assert_eq!(
        transaction_draft("", &cats),
        Err(ValidationError::MissingField("type"))
    );
    assert_eq!(
        transaction_draft("expense", &cats),
        Err(ValidationError::MissingField("date"))
    );
    assert_eq!(
        transaction_draft("expense 15/03/2024 100 Makanan | x", &cats),
        Err(ValidationError::InvalidDate("15/03/2024".into()))
    );
    assert_eq!(
        transaction_draft("expense 2024-03-15", &cats),
        Err(ValidationError::MissingField("amount"))
    );
    assert_eq!(
        transaction_draft("expense 2024-03-15 100 | Lunch", &cats),
        Err(ValidationError::MissingField("category"))
    );
    assert_eq!(
        transaction_draft("expense 2024-03-15 100 Makanan", &cats),
        Err(ValidationError::MissingField("description"))
    );
}

#[test]
fn test_transaction_draft_rejects_non_positive_amounts() {
    let err = transaction_draft("expense 2024-03-15 0 Makanan | Free lunch", &categories());
    assert_eq!(
        err,
        Err(ValidationError::NonPositive {
            field: "amount",
            value: dec!(0)
        })
    );
    assert!(transaction_draft("expense 2024-03-15 -10 Makanan | Refund", &categories()).is_err());
}

#[test]
fn test_transaction_args_prefill_parses_back() {
    let t = Transaction::from_draft(
        "1".into(),
        transaction_draft("expense 2024-03-15 50000.50 Makanan | Lunch | team", &categories()).unwrap(),
    );
    let args = transaction_args(&t);
    assert_eq!(args, "expense 2024-03-15 50000.5 Makanan | Lunch | team");
    assert_eq!(transaction_draft(&args, &categories()).unwrap(), t.to_draft());
}

#[test]
fn test_escaped_bar_stays_in_field() {
    let draft = transaction_draft(
        r"expense 2024-03-15 75000 Makanan | Nasi \| teh | split 50\|50",
        &categories(),
    )
    .unwrap();
    assert_eq!(draft.description, "Nasi | teh");
    assert_eq!(draft.notes.as_deref(), Some("split 50|50"));
}

#[test]
fn test_prefill_escapes_bars_from_stored_records() {
    let mut draft = transaction_draft("expense 2024-03-15 75000 Makanan | x", &categories()).unwrap();
    draft.description = "Kopi | roti".into();
    draft.notes = Some(r"a|b \ c".into());
    let t = Transaction::from_draft("1".into(), draft);

    let args = transaction_args(&t);
    assert_eq!(args, r"expense 2024-03-15 75000 Makanan | Kopi \| roti | a\|b \ c");
    assert_eq!(transaction_draft(&args, &categories()).unwrap(), t.to_draft());

    let odd = Category::from_draft(
        "c".into(),
        CategoryDraft::new("Kopi|Teh".into(), TransactionType::Expense),
    );
    assert_eq!(category_draft(&category_args(&odd)).unwrap(), odd.to_draft());
}

#[test]
fn test_transaction_draft_rejects_oversized_amount() {
    assert!(matches!(
        transaction_draft(
            "expense 2024-03-15 50,000,000,000,000,000,000,000,000,000 Makanan | Yacht",
            &categories()
        ),
        Err(ValidationError::TooLarge { field: "amount", .. })
    ));
    assert!(matches!(
        budget_draft("makanan 2000000000000000", &categories(), march()),
        Err(ValidationError::TooLarge { field: "limit", .. })
    ));
}

// ── Budgets ───────────────────────────────────────────────────

#[test]
fn test_budget_draft_defaults_to_given_month() {
    let draft = budget_draft("belanja 500000", &categories(), march()).unwrap();
    assert_eq!(draft.category, "Belanja");
    assert_eq!(draft.limit, dec!(500000));
    assert_eq!(draft.month, "2024-03");
}

#[test]
fn test_budget_draft_explicit_month_and_multiword_category() {
    let draft = budget_draft("Makan Siang 250,000 2024-07", &categories(), march()).unwrap();
    assert_eq!(draft.category, "Makan Siang");
    assert_eq!(draft.limit, dec!(250000));
    assert_eq!(draft.month, "2024-07");
}

#[test]
fn test_budget_draft_errors() {
    let cats = categories();
    assert_eq!(
        budget_draft("Makanan 100 2024-13", &cats, march()),
        Err(ValidationError::InvalidMonth("2024-13".into()))
    );
    assert_eq!(
        budget_draft("", &cats, march()),
        Err(ValidationError::MissingField("limit"))
    );
    assert_eq!(
        budget_draft("500000", &cats, march()),
        Err(ValidationError::MissingField("category"))
    );
    assert!(matches!(
        budget_draft("Makanan 0", &cats, march()),
        Err(ValidationError::NonPositive { field: "limit", .. })
    ));
}

// ── Categories ────────────────────────────────────────────────

#[test]
fn test_category_draft_defaults_style() {
    let draft = category_draft("expense Pendidikan Anak").unwrap();
    assert_eq!(draft.name, "Pendidikan Anak");
    assert_eq!(draft.kind, TransactionType::Expense);
    assert_eq!(draft.icon, DEFAULT_ICON);
    assert_eq!(draft.color, DEFAULT_COLOR);
}

#[test]
fn test_category_draft_with_icon_and_color() {
    let draft = category_draft("income Freelance | 💳 #3B82F6").unwrap();
    assert_eq!(draft.name, "Freelance");
    assert_eq!(draft.icon, "💳");
    assert_eq!(draft.color, "#3b82f6");
}

#[test]
fn test_category_draft_errors() {
    assert_eq!(category_draft("expense"), Err(ValidationError::MissingField("name")));
    assert_eq!(
        category_draft("expense Hobi | 🎮 blue"),
        Err(ValidationError::InvalidColor("blue".into()))
    );
    assert_eq!(
        category_draft("saving Hobi"),
        Err(ValidationError::InvalidType("saving".into()))
    );
}

#[test]
fn test_category_args_prefill() {
    let gaji = &categories()[0];
    let args = category_args(gaji);
    assert_eq!(args, "income Gaji | 💼 #10b981");
    assert_eq!(category_draft(&args).unwrap(), gaji.to_draft());
}

#[test]
fn test_resolve_category_prefers_matching_kind() {
    let mut cats = categories();
    cats.push(Category::from_draft(
        "x".into(),
        CategoryDraft::new("gaji".into(), TransactionType::Expense),
    ));
    assert_eq!(resolve_category("GAJI", &cats, Some(TransactionType::Expense)), "gaji");
    assert_eq!(resolve_category("GAJI", &cats, Some(TransactionType::Income)), "Gaji");
    assert_eq!(resolve_category(" Lainnya ", &cats, None), "Lainnya");
}
