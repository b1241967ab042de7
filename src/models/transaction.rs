use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::error::check_amount;
use super::ValidationError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    Income,
    Expense,
}

impl TransactionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Income => "income",
            Self::Expense => "expense",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "income" | "in" | "i" => Some(Self::Income),
            "expense" | "out" | "e" => Some(Self::Expense),
            _ => None,
        }
    }

    pub fn all() -> &'static [TransactionType] {
        &[Self::Income, Self::Expense]
    }
}

impl std::fmt::Display for TransactionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: TransactionType,
    pub amount: Decimal,
    pub category: String,
    pub description: String,
    pub date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl Transaction {
    pub fn from_draft(id: String, draft: TransactionDraft) -> Self {
        Self {
            id,
            kind: draft.kind,
            amount: draft.amount,
            category: draft.category,
            description: draft.description,
            date: draft.date,
            notes: draft.notes,
        }
    }

    pub fn is_income(&self) -> bool {
        self.kind == TransactionType::Income
    }

    pub fn is_expense(&self) -> bool {
        self.kind == TransactionType::Expense
    }

    /// Calendar month of the transaction, 0-indexed.
    pub fn falls_in(&self, year: i32, month0: u32) -> bool {
        self.date.year() == year && self.date.month0() == month0
    }

    /// Amount with income positive and expense negative.
    pub fn signed_amount(&self) -> Decimal {
        match self.kind {
            TransactionType::Income => self.amount,
            TransactionType::Expense => -self.amount,
        }
    }

    #[cfg(test)]
    pub fn to_draft(&self) -> TransactionDraft {
        TransactionDraft {
            kind: self.kind,
            amount: self.amount,
            category: self.category.clone(),
            description: self.description.clone(),
            date: self.date,
            notes: self.notes.clone(),
        }
    }
}

/// A transaction as entered by the user, before the store assigns an id.
#[derive(Debug, Clone, PartialEq)]
pub struct TransactionDraft {
    pub kind: TransactionType,
    pub amount: Decimal,
    pub category: String,
    pub description: String,
    pub date: NaiveDate,
    pub notes: Option<String>,
}

impl TransactionDraft {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.category.trim().is_empty() {
            return Err(ValidationError::MissingField("category"));
        }
        if self.description.trim().is_empty() {
            return Err(ValidationError::MissingField("description"));
        }
        check_amount("amount", self.amount)
    }
}
