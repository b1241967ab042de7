use super::ValidationError;

pub const DEFAULT_CURRENCY: &str = "IDR";

/// Currencies offered in settings, with their display names.
pub const SUPPORTED_CURRENCIES: &[(&str, &str)] = &[
    ("IDR", "Rupiah"),
    ("USD", "US Dollar"),
    ("EUR", "Euro"),
    ("SGD", "Singapore Dollar"),
    ("MYR", "Malaysian Ringgit"),
    ("THB", "Thai Baht"),
];

/// Normalize a user-typed currency code. Any three-letter alphabetic code is
/// accepted; only the supported ones get dedicated symbols when formatted.
pub fn parse_currency_code(s: &str) -> Result<String, ValidationError> {
    let code = s.trim().to_ascii_uppercase();
    if code.len() == 3 && code.chars().all(|c| c.is_ascii_alphabetic()) {
        Ok(code)
    } else {
        Err(ValidationError::InvalidCurrency(s.trim().to_string()))
    }
}
