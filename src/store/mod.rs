mod ids;
mod storage;

pub(crate) use storage::{MemoryStorage, Storage};

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::models::{
    parse_currency_code, Budget, BudgetDraft, Category, CategoryDraft, Transaction,
    TransactionDraft, DEFAULT_CURRENCY,
};
use ids::IdGenerator;

pub(crate) const TRANSACTIONS_KEY: &str = "finance_transactions";
pub(crate) const CATEGORIES_KEY: &str = "finance_categories";
pub(crate) const BUDGETS_KEY: &str = "finance_budgets";
pub(crate) const CURRENCY_KEY: &str = "finance_currency";

/// One independently persisted value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Collection {
    Transactions,
    Categories,
    Budgets,
    Currency,
}

impl Collection {
    pub(crate) fn key(&self) -> &'static str {
        match self {
            Self::Transactions => TRANSACTIONS_KEY,
            Self::Categories => CATEGORIES_KEY,
            Self::Budgets => BUDGETS_KEY,
            Self::Currency => CURRENCY_KEY,
        }
    }
}

type Listener = Box<dyn FnMut(Collection)>;

trait Keyed {
    fn key_id(&self) -> &str;
}

impl Keyed for Transaction {
    fn key_id(&self) -> &str {
        &self.id
    }
}

impl Keyed for Category {
    fn key_id(&self) -> &str {
        &self.id
    }
}

impl Keyed for Budget {
    fn key_id(&self) -> &str {
        &self.id
    }
}

/// Owns the four collections and is the only write path to them. Every
/// mutation writes the whole collection back to storage and then notifies
/// subscribers.
pub(crate) struct Store {
    storage: Box<dyn Storage>,
    transactions: Vec<Transaction>,
    categories: Vec<Category>,
    budgets: Vec<Budget>,
    currency: String,
    ids: IdGenerator,
    listeners: Vec<Listener>,
    last_persist_error: Option<String>,
}

impl Store {
    /// Hydrates from storage. Anything absent or unreadable falls back to its default.
    pub(crate) fn load(storage: Box<dyn Storage>) -> Self {
        let transactions: Vec<Transaction> =
            load_json(storage.as_ref(), TRANSACTIONS_KEY).unwrap_or_default();
        let categories: Vec<Category> =
            load_json(storage.as_ref(), CATEGORIES_KEY).unwrap_or_else(Category::defaults);
        let budgets: Vec<Budget> = load_json(storage.as_ref(), BUDGETS_KEY).unwrap_or_default();
        let currency = load_currency(storage.as_ref());

        let ids = IdGenerator::seeded(
            transactions
                .iter()
                .map(|t| t.id.as_str())
                .chain(categories.iter().map(|c| c.id.as_str()))
                .chain(budgets.iter().map(|b| b.id.as_str())),
        );

        tracing::info!(
            transactions = transactions.len(),
            categories = categories.len(),
            budgets = budgets.len(),
            currency = %currency,
            "store loaded"
        );

        Self {
            storage,
            transactions,
            categories,
            budgets,
            currency,
            ids,
            listeners: Vec::new(),
            last_persist_error: None,
        }
    }

    // ── Accessors ─────────────────────────────────────────────

    pub(crate) fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    pub(crate) fn categories(&self) -> &[Category] {
        &self.categories
    }

    pub(crate) fn budgets(&self) -> &[Budget] {
        &self.budgets
    }

    pub(crate) fn currency(&self) -> &str {
        &self.currency
    }

    pub(crate) fn transaction(&self, id: &str) -> Option<&Transaction> {
        self.transactions.iter().find(|t| t.id == id)
    }

    pub(crate) fn category(&self, id: &str) -> Option<&Category> {
        Category::find_by_id(&self.categories, id)
    }

    pub(crate) fn budget(&self, id: &str) -> Option<&Budget> {
        self.budgets.iter().find(|b| b.id == id)
    }

    /// The most recent storage failure, cleared by the next successful write.
    pub(crate) fn last_persist_error(&self) -> Option<&str> {
        self.last_persist_error.as_deref()
    }

    pub(crate) fn subscribe(&mut self, listener: impl FnMut(Collection) + 'static) {
        self.listeners.push(Box::new(listener));
    }

    // ── Transactions ──────────────────────────────────────────

    pub(crate) fn add_transaction(&mut self, draft: TransactionDraft) -> String {
        let id = self.ids.next_id();
        self.transactions.push(Transaction::from_draft(id.clone(), draft));
        self.commit(Collection::Transactions);
        id
    }

    pub(crate) fn update_transaction(&mut self, id: &str, draft: TransactionDraft) -> bool {
        let changed = replace_by_id(&mut self.transactions, id, |id| {
            Transaction::from_draft(id, draft.clone())
        });
        if changed {
            self.commit(Collection::Transactions);
        }
        changed
    }

    pub(crate) fn delete_transaction(&mut self, id: &str) -> bool {
        let changed = remove_by_id(&mut self.transactions, id);
        if changed {
            self.commit(Collection::Transactions);
        }
        changed
    }

    // ── Categories ────────────────────────────────────────────

    pub(crate) fn add_category(&mut self, draft: CategoryDraft) -> String {
        let id = self.ids.next_id();
        self.categories.push(Category::from_draft(id.clone(), draft));
        self.commit(Collection::Categories);
        id
    }

    pub(crate) fn update_category(&mut self, id: &str, draft: CategoryDraft) -> bool {
        let changed = replace_by_id(&mut self.categories, id, |id| {
            Category::from_draft(id, draft.clone())
        });
        if changed {
            self.commit(Collection::Categories);
        }
        changed
    }

    /// Transactions and budgets naming the category are left as they are.
    pub(crate) fn delete_category(&mut self, id: &str) -> bool {
        let changed = remove_by_id(&mut self.categories, id);
        if changed {
            self.commit(Collection::Categories);
        }
        changed
    }

    // ── Budgets ───────────────────────────────────────────────

    pub(crate) fn add_budget(&mut self, draft: BudgetDraft) -> String {
        let id = self.ids.next_id();
        self.budgets.push(Budget::from_draft(id.clone(), draft));
        self.commit(Collection::Budgets);
        id
    }

    pub(crate) fn update_budget(&mut self, id: &str, draft: BudgetDraft) -> bool {
        let changed =
            replace_by_id(&mut self.budgets, id, |id| Budget::from_draft(id, draft.clone()));
        if changed {
            self.commit(Collection::Budgets);
        }
        changed
    }

    pub(crate) fn delete_budget(&mut self, id: &str) -> bool {
        let changed = remove_by_id(&mut self.budgets, id);
        if changed {
            self.commit(Collection::Budgets);
        }
        changed
    }

    // ── Preferences ───────────────────────────────────────────

    pub(crate) fn set_currency(&mut self, code: &str) {
        self.currency = code.to_string();
        self.commit(Collection::Currency);
    }

    // ── Persistence ───────────────────────────────────────────

    fn commit(&mut self, collection: Collection) {
        match self.persist(collection) {
            Ok(()) => {
                self.last_persist_error = None;
                tracing::debug!(key = collection.key(), "persisted");
            }
            Err(e) => {
                tracing::warn!(
                    key = collection.key(),
                    error = %format!("{e:#}"),
                    "write failed, keeping changes in memory"
                );
                self.last_persist_error = Some(format!("{e:#}"));
            }
        }
        for listener in &mut self.listeners {
            listener(collection);
        }
    }

    fn persist(&mut self, collection: Collection) -> Result<()> {
        let json = match collection {
            Collection::Transactions => encode(&self.transactions)?,
            Collection::Categories => encode(&self.categories)?,
            Collection::Budgets => encode(&self.budgets)?,
            Collection::Currency => encode(&self.currency)?,
        };
        self.storage.set(collection.key(), &json)
    }
}

fn encode<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    serde_json::to_string(value).context("Failed to encode value")
}

fn load_json<T: DeserializeOwned>(storage: &dyn Storage, key: &str) -> Option<T> {
    let raw = match storage.get(key) {
        Ok(Some(raw)) => raw,
        Ok(None) => return None,
        Err(e) => {
            tracing::warn!(key, error = %format!("{e:#}"), "read failed, using defaults");
            return None;
        }
    };
    match serde_json::from_str(&raw) {
        Ok(value) => Some(value),
        Err(e) => {
            tracing::warn!(key, error = %e, "stored value is malformed, using defaults");
            None
        }
    }
}

/// Accepts both the JSON-encoded form (`"USD"`) and a bare code (`USD`).
fn load_currency(storage: &dyn Storage) -> String {
    let raw = match storage.get(CURRENCY_KEY) {
        Ok(Some(raw)) => raw,
        Ok(None) => return DEFAULT_CURRENCY.to_string(),
        Err(e) => {
            tracing::warn!(error = %format!("{e:#}"), "currency read failed, using default");
            return DEFAULT_CURRENCY.to_string();
        }
    };
    let candidate = serde_json::from_str::<String>(&raw).unwrap_or(raw);
    match parse_currency_code(&candidate) {
        Ok(code) => code,
        Err(_) => {
            tracing::warn!(value = %candidate, "stored currency is invalid, using default");
            DEFAULT_CURRENCY.to_string()
        }
    }
}

fn replace_by_id<T: Keyed>(items: &mut [T], id: &str, make: impl Fn(String) -> T) -> bool {
    let mut changed = false;
    for item in items.iter_mut().filter(|item| item.key_id() == id) {
        *item = make(id.to_string());
        changed = true;
    }
    changed
}

fn remove_by_id<T: Keyed>(items: &mut Vec<T>, id: &str) -> bool {
    let before = items.len();
    items.retain(|item| item.key_id() != id);
    items.len() != before
}

#[cfg(test)]
mod tests;
