use chrono::{Datelike, Months, NaiveDate};

use super::ValidationError;

/// A calendar month. `month0` is 0-indexed (0 = January) to line up with
/// `chrono::Datelike::month0`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct YearMonth {
    pub year: i32,
    pub month0: u32,
}

impl YearMonth {
    #[cfg(test)]
    pub fn new(year: i32, month0: u32) -> Option<Self> {
        (month0 < 12).then_some(Self { year, month0 })
    }

    pub fn of(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month0: date.month0(),
        }
    }

    pub fn current() -> Self {
        Self::of(chrono::Local::now().date_naive())
    }

    /// Parse a "YYYY-MM" token. Single-digit months ("2024-3") are accepted.
    pub fn parse(s: &str) -> Result<Self, ValidationError> {
        let s = s.trim();
        NaiveDate::parse_from_str(&format!("{s}-01"), "%Y-%m-%d")
            .map(Self::of)
            .map_err(|_| ValidationError::InvalidMonth(s.to_string()))
    }

    pub fn first_day(&self) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.year, self.month0 + 1, 1)
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date.year() == self.year && date.month0() == self.month0
    }

    pub fn next(&self) -> Self {
        self.shift(1)
    }

    pub fn prev(&self) -> Self {
        self.shift(-1)
    }

    fn shift(&self, delta: i32) -> Self {
        let shifted = self.first_day().and_then(|d| {
            if delta > 0 {
                d.checked_add_months(Months::new(delta.unsigned_abs()))
            } else {
                d.checked_sub_months(Months::new(delta.unsigned_abs()))
            }
        });
        shifted.map(Self::of).unwrap_or(*self)
    }

    /// Long label for headers, e.g. "March 2024".
    pub fn label(&self) -> String {
        self.first_day()
            .map(|d| d.format("%B %Y").to_string())
            .unwrap_or_else(|| self.to_string())
    }
}

impl std::fmt::Display for YearMonth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month0 + 1)
    }
}

/// Parse a "YYYY-MM-DD" date as typed in forms.
pub fn parse_date(s: &str) -> Result<NaiveDate, ValidationError> {
    let s = s.trim();
    NaiveDate::parse_from_str(s, "%Y-%m-%d").map_err(|_| ValidationError::InvalidDate(s.to_string()))
}
