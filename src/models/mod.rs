mod budget;
mod category;
mod currency;
mod error;
mod month;
mod transaction;

pub use budget::{Budget, BudgetDraft};
pub use category::{
    Category, CategoryDraft, COLOR_CHOICES, DEFAULT_COLOR, DEFAULT_ICON, FALLBACK_ICON, ICON_CHOICES,
};
pub use currency::{parse_currency_code, DEFAULT_CURRENCY, SUPPORTED_CURRENCIES};
pub use error::{ValidationError, MAX_AMOUNT};
pub use month::{parse_date, YearMonth};
pub use transaction::{Transaction, TransactionDraft, TransactionType};
