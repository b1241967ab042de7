use rust_decimal::Decimal;
use thiserror::Error;

/// Largest amount or limit a form accepts: one quadrillion.
pub const MAX_AMOUNT: Decimal = Decimal::from_parts(2_764_472_320, 232_830, 0, false, 0);

/// Form-level rejection of a draft. Blocks the mutation and is shown to the user.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("{0} is required")]
    MissingField(&'static str),
    #[error("{field} must be greater than zero (got {value})")]
    NonPositive { field: &'static str, value: Decimal },
    #[error("{field} must not exceed {max} (got {value})", max = MAX_AMOUNT)]
    TooLarge { field: &'static str, value: Decimal },
    #[error("invalid amount: {0}")]
    InvalidAmount(String),
    #[error("invalid date '{0}', expected YYYY-MM-DD")]
    InvalidDate(String),
    #[error("invalid month '{0}', expected YYYY-MM")]
    InvalidMonth(String),
    #[error("invalid type '{0}', expected income or expense")]
    InvalidType(String),
    #[error("invalid currency code '{0}'")]
    InvalidCurrency(String),
    #[error("invalid color '{0}', expected #rrggbb")]
    InvalidColor(String),
}

/// Money fields must be positive and no larger than [`MAX_AMOUNT`].
pub(super) fn check_amount(field: &'static str, value: Decimal) -> Result<(), ValidationError> {
    if value <= Decimal::ZERO {
        return Err(ValidationError::NonPositive { field, value });
    }
    if value > MAX_AMOUNT {
        return Err(ValidationError::TooLarge { field, value });
    }
    Ok(())
}
