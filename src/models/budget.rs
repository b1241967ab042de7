use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::error::check_amount;
use super::{ValidationError, YearMonth};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Budget {
    pub id: String,
    pub category: String,
    pub limit: Decimal,
    /// Format: "YYYY-MM"
    pub month: String,
}

impl Budget {
    pub fn from_draft(id: String, draft: BudgetDraft) -> Self {
        Self {
            id,
            category: draft.category,
            limit: draft.limit,
            month: draft.month,
        }
    }

    pub fn is_for(&self, month: YearMonth) -> bool {
        self.month == month.to_string()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BudgetDraft {
    pub category: String,
    pub limit: Decimal,
    pub month: String,
}

impl BudgetDraft {
    pub fn new(category: String, limit: Decimal, month: YearMonth) -> Self {
        Self {
            category,
            limit,
            month: month.to_string(),
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.category.trim().is_empty() {
            return Err(ValidationError::MissingField("category"));
        }
        check_amount("limit", self.limit)?;
        YearMonth::parse(&self.month)?;
        Ok(())
    }
}
