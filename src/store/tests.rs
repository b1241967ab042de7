#![allow(clippy::unwrap_used)]

use super::*;
use crate::db::Database;
use crate::models::{TransactionType, YearMonth};
use anyhow::anyhow;
use chrono::NaiveDate;
use rust_decimal_macros::dec;
use std::cell::RefCell;
use std::rc::Rc;

fn date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

fn lunch() -> TransactionDraft {
    TransactionDraft {
        kind: TransactionType::Expense,
        amount: dec!(50000),
        category: "Makanan".into(),
        description: "Lunch".into(),
        date: date("2024-03-15"),
        notes: None,
    }
}

fn salary() -> TransactionDraft {
    TransactionDraft {
        kind: TransactionType::Income,
        amount: dec!(8000000),
        category: "Gaji".into(),
        description: "March salary".into(),
        date: date("2024-03-01"),
        notes: Some("net".into()),
    }
}

fn empty_store() -> Store {
    Store::load(Box::new(MemoryStorage::new()))
}

/// Accepts reads, rejects every write.
struct ReadOnlyStorage;

impl Storage for ReadOnlyStorage {
    fn get(&self, _key: &str) -> Result<Option<String>> {
        Ok(None)
    }

    fn set(&mut self, key: &str, _value: &str) -> Result<()> {
        Err(anyhow!("storage is read-only ({key})"))
    }
}

/// Fails every operation.
struct BrokenStorage;

impl Storage for BrokenStorage {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Err(anyhow!("cannot read {key}"))
    }

    fn set(&mut self, key: &str, _value: &str) -> Result<()> {
        Err(anyhow!("cannot write {key}"))
    }
}

// ── Loading ───────────────────────────────────────────────────

#[test]
fn test_empty_storage_loads_defaults() {
    let store = empty_store();
    assert!(store.transactions().is_empty());
    assert!(store.budgets().is_empty());
    assert_eq!(store.categories().len(), 10);
    assert_eq!(store.categories()[0].name, "Gaji");
    assert_eq!(store.currency(), "IDR");
    assert_eq!(store.last_persist_error(), None);
}

#[test]
fn test_malformed_values_fall_back_per_key() {
    let storage = MemoryStorage::with_values([
        (TRANSACTIONS_KEY, "not json"),
        (CATEGORIES_KEY, "[]"),
        (BUDGETS_KEY, "{\"oops\": true}"),
        (CURRENCY_KEY, "\"USD\""),
    ]);
    let store = Store::load(Box::new(storage));
    assert!(store.transactions().is_empty());
    // An explicitly empty category list is a valid value, not a failure.
    assert!(store.categories().is_empty());
    assert!(store.budgets().is_empty());
    assert_eq!(store.currency(), "USD");
}

#[test]
fn test_unreadable_storage_loads_defaults() {
    let store = Store::load(Box::new(BrokenStorage));
    assert_eq!(store.categories().len(), 10);
    assert_eq!(store.currency(), "IDR");
}

#[test]
fn test_bare_currency_value_is_accepted() {
    let storage = MemoryStorage::with_values([(CURRENCY_KEY, "eur")]);
    assert_eq!(Store::load(Box::new(storage)).currency(), "EUR");
}

#[test]
fn test_invalid_currency_value_uses_default() {
    let storage = MemoryStorage::with_values([(CURRENCY_KEY, "\"dollars\"")]);
    assert_eq!(Store::load(Box::new(storage)).currency(), "IDR");
}

#[test]
fn test_loads_values_written_by_browser_build() {
    let storage = MemoryStorage::with_values([(
        TRANSACTIONS_KEY,
        r#"[{"id":"1710460800000","type":"expense","amount":50000,"category":"Makanan","description":"Lunch","date":"2024-03-15"}]"#,
    )]);
    let store = Store::load(Box::new(storage));
    assert_eq!(store.transactions().len(), 1);
    let t = store.transaction("1710460800000").unwrap();
    assert_eq!(t.amount, dec!(50000));
    assert_eq!(t.notes, None);
}

#[test]
fn test_loads_fractional_json_numbers() {
    let storage = MemoryStorage::with_values([(
        BUDGETS_KEY,
        r#"[{"id":"1","category":"Makanan","limit":12.75,"month":"2024-03"}]"#,
    )]);
    let store = Store::load(Box::new(storage));
    assert_eq!(store.budgets()[0].limit, dec!(12.75));
}

// ── Round trip ────────────────────────────────────────────────

#[test]
fn test_persist_and_reload_reproduces_collections() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("dompet.db");

    let mut store = Store::load(Box::new(Database::open(&path).unwrap()));
    store.add_transaction(lunch());
    store.add_transaction(salary());
    store.add_category(CategoryDraft::new("Pendidikan".into(), TransactionType::Expense));
    store.add_budget(BudgetDraft::new(
        "Makanan".into(),
        dec!(1500000),
        YearMonth::new(2024, 2).unwrap(),
    ));
    store.set_currency("USD");

    let transactions = store.transactions().to_vec();
    let categories = store.categories().to_vec();
    let budgets = store.budgets().to_vec();
    drop(store);

    let reloaded = Store::load(Box::new(Database::open(&path).unwrap()));
    assert_eq!(reloaded.transactions(), transactions.as_slice());
    assert_eq!(reloaded.categories(), categories.as_slice());
    assert_eq!(reloaded.budgets(), budgets.as_slice());
    assert_eq!(reloaded.currency(), "USD");
}

#[test]
fn test_reload_keeps_every_decimal_digit() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("dompet.db");

    let mut store = Store::load(Box::new(Database::open(&path).unwrap()));
    let mut precise = lunch();
    precise.amount = dec!(1234567890.123456789);
    let id = store.add_transaction(precise);
    store.add_budget(BudgetDraft::new(
        "Makanan".into(),
        dec!(0.1),
        YearMonth::new(2024, 2).unwrap(),
    ));
    let before = store.transactions().to_vec();
    drop(store);

    let raw = Database::open(&path)
        .unwrap()
        .get(TRANSACTIONS_KEY)
        .unwrap()
        .unwrap();
    assert!(raw.contains(r#""amount":1234567890.123456789"#), "{raw}");

    let reloaded = Store::load(Box::new(Database::open(&path).unwrap()));
    assert_eq!(reloaded.transactions(), before.as_slice());
    assert_eq!(reloaded.transaction(&id).unwrap().amount, dec!(1234567890.123456789));
    assert_eq!(reloaded.budgets()[0].limit, dec!(0.1));
}

#[test]
fn test_every_mutation_persists_whole_collection() {
    let mut store = Store::load(Box::new(Database::open_in_memory().unwrap()));
    store.add_transaction(lunch());
    store.add_transaction(salary());

    let raw = store.storage.get(TRANSACTIONS_KEY).unwrap().unwrap();
    let stored: Vec<Transaction> = serde_json::from_str(&raw).unwrap();
    assert_eq!(stored.len(), 2);
    assert_eq!(stored, store.transactions());

    // Untouched collections are not written.
    assert_eq!(store.storage.get(CURRENCY_KEY).unwrap(), None);
    store.set_currency("USD");
    assert_eq!(
        store.storage.get(CURRENCY_KEY).unwrap().as_deref(),
        Some("\"USD\"")
    );
}

// ── Mutations ─────────────────────────────────────────────────

#[test]
fn test_add_assigns_id_and_appends() {
    let mut store = empty_store();
    let id = store.add_transaction(lunch());
    assert!(!id.is_empty());
    let t = store.transaction(&id).unwrap();
    assert_eq!(t.description, "Lunch");
    assert_eq!(t.to_draft(), lunch());
}

#[test]
fn test_ids_are_unique_and_increasing() {
    let mut store = empty_store();
    let ids: Vec<i64> = (0..50)
        .map(|_| store.add_transaction(lunch()).parse().unwrap())
        .collect();
    assert!(ids.windows(2).all(|w| w[0] < w[1]));
}

#[test]
fn test_ids_never_collide_with_loaded_ids() {
    let far_future = "99999999999999";
    let json = format!(
        r#"[{{"id":"{far_future}","type":"expense","amount":1,"category":"Makanan","description":"x","date":"2024-01-01"}}]"#
    );
    let storage = MemoryStorage::with_values([(TRANSACTIONS_KEY, json.as_str())]);
    let mut store = Store::load(Box::new(storage));
    let id: i64 = store.add_budget(BudgetDraft::new(
        "Makanan".into(),
        dec!(10),
        YearMonth::new(2024, 0).unwrap(),
    ))
    .parse()
    .unwrap();
    assert!(id > far_future.parse::<i64>().unwrap());
}

#[test]
fn test_update_preserves_id() {
    let mut store = empty_store();
    let id = store.add_transaction(lunch());
    let mut draft = lunch();
    draft.amount = dec!(65000);
    draft.notes = Some("with drinks".into());

    assert!(store.update_transaction(&id, draft));
    assert_eq!(store.transactions().len(), 1);
    let t = store.transaction(&id).unwrap();
    assert_eq!(t.amount, dec!(65000));
    assert_eq!(t.notes.as_deref(), Some("with drinks"));
}

#[test]
fn test_update_unknown_id_is_a_noop() {
    let mut store = empty_store();
    store.add_transaction(lunch());
    let before = store.transactions().to_vec();

    assert!(!store.update_transaction("does-not-exist", salary()));
    assert_eq!(store.transactions(), before.as_slice());
}

#[test]
fn test_delete_removes_only_matching_record() {
    let mut store = empty_store();
    let keep = store.add_transaction(salary());
    let gone = store.add_transaction(lunch());

    assert!(store.delete_transaction(&gone));
    assert!(store.transaction(&gone).is_none());
    assert!(store.transaction(&keep).is_some());
    assert!(!store.delete_transaction(&gone));
}

#[test]
fn test_deleting_category_leaves_transactions_and_budgets() {
    let mut store = empty_store();
    store.add_transaction(lunch());
    store.add_budget(BudgetDraft::new(
        "Makanan".into(),
        dec!(100000),
        YearMonth::new(2024, 2).unwrap(),
    ));
    let makanan = Category::find_by_name(store.categories(), "Makanan")
        .unwrap()
        .id
        .clone();

    assert!(store.delete_category(&makanan));
    assert_eq!(store.transactions()[0].category, "Makanan");
    assert_eq!(store.budgets()[0].category, "Makanan");
    assert_eq!(
        Category::icon_for(store.categories(), "Makanan"),
        crate::models::FALLBACK_ICON
    );
}

#[test]
fn test_update_and_delete_category() {
    let mut store = empty_store();
    let id = store.add_category(CategoryDraft::new("Hobi".into(), TransactionType::Expense));
    let mut draft = store.category(&id).unwrap().to_draft();
    draft.icon = "🎨".into();
    assert!(store.update_category(&id, draft));
    assert_eq!(store.category(&id).unwrap().icon, "🎨");
    assert!(store.delete_category(&id));
    assert!(store.category(&id).is_none());
}

#[test]
fn test_update_and_delete_budget() {
    let mut store = empty_store();
    let month = YearMonth::new(2024, 2).unwrap();
    let id = store.add_budget(BudgetDraft::new("Belanja".into(), dec!(500000), month));
    assert!(store.update_budget(&id, BudgetDraft::new("Belanja".into(), dec!(750000), month)));
    assert_eq!(store.budget(&id).unwrap().limit, dec!(750000));
    assert!(!store.update_budget("nope", BudgetDraft::new("x".into(), dec!(1), month)));
    assert!(store.delete_budget(&id));
    assert!(store.budgets().is_empty());
}

#[test]
fn test_set_currency_applies_immediately() {
    let mut store = empty_store();
    store.set_currency("SGD");
    assert_eq!(store.currency(), "SGD");
}

// ── Failure handling ──────────────────────────────────────────

#[test]
fn test_write_failure_keeps_change_in_memory() {
    let mut store = Store::load(Box::new(ReadOnlyStorage));
    let id = store.add_transaction(lunch());

    assert!(store.transaction(&id).is_some());
    let err = store.last_persist_error().unwrap();
    assert!(err.contains("read-only"), "{err}");
}

#[test]
fn test_successful_write_clears_persist_error() {
    let mut store = Store::load(Box::new(ReadOnlyStorage));
    store.set_currency("USD");
    assert!(store.last_persist_error().is_some());

    store.storage = Box::new(MemoryStorage::new());
    store.set_currency("EUR");
    assert_eq!(store.last_persist_error(), None);
}

// ── Subscriptions ─────────────────────────────────────────────

#[test]
fn test_subscribers_see_each_mutation() {
    let seen = Rc::new(RefCell::new(Vec::new()));
    let mut store = empty_store();
    let sink = Rc::clone(&seen);
    store.subscribe(move |c| sink.borrow_mut().push(c));

    let id = store.add_transaction(lunch());
    store.add_category(CategoryDraft::new("Hobi".into(), TransactionType::Expense));
    store.set_currency("USD");
    store.delete_transaction(&id);

    assert_eq!(
        *seen.borrow(),
        vec![
            Collection::Transactions,
            Collection::Categories,
            Collection::Currency,
            Collection::Transactions,
        ]
    );
}

#[test]
fn test_noop_mutations_do_not_notify() {
    let count = Rc::new(RefCell::new(0));
    let mut store = empty_store();
    let sink = Rc::clone(&count);
    store.subscribe(move |_| *sink.borrow_mut() += 1);

    store.delete_budget("missing");
    store.update_transaction("missing", lunch());
    assert_eq!(*count.borrow(), 0);
}

#[test]
fn test_subscribers_notified_even_when_write_fails() {
    let count = Rc::new(RefCell::new(0));
    let mut store = Store::load(Box::new(ReadOnlyStorage));
    let sink = Rc::clone(&count);
    store.subscribe(move |_| *sink.borrow_mut() += 1);
    store.add_transaction(lunch());
    assert_eq!(*count.borrow(), 1);
}

#[test]
fn test_collection_keys() {
    assert_eq!(Collection::Transactions.key(), "finance_transactions");
    assert_eq!(Collection::Categories.key(), "finance_categories");
    assert_eq!(Collection::Budgets.key(), "finance_budgets");
    assert_eq!(Collection::Currency.key(), "finance_currency");
}
