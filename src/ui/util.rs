use rust_decimal::{Decimal, RoundingStrategy};

/// Format an amount for display in the given currency.
///
/// IDR follows Indonesian conventions with no minor units (`Rp 50.000`).
/// Everything else uses US grouping with two decimals, a symbol where one is
/// common (`$1,234.56`, `€1,234.56`) and the code otherwise (`SGD 1,234.56`).
pub(crate) fn format_currency(val: Decimal, code: &str) -> String {
    let sign = if val < Decimal::ZERO { "-" } else { "" };
    let abs = val.abs();

    if code == "IDR" {
        let whole = abs.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero);
        return format!("{sign}Rp {}", group_digits(&whole.trunc().to_string(), '.'));
    }

    let formatted = format!(
        "{:.2}",
        abs.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
    );
    let (int_part, dec_part) = formatted.split_once('.').unwrap_or((&formatted, "00"));
    let grouped = group_digits(int_part, ',');

    match code {
        "USD" => format!("{sign}${grouped}.{dec_part}"),
        "EUR" => format!("{sign}€{grouped}.{dec_part}"),
        other => format!("{sign}{other} {grouped}.{dec_part}"),
    }
}

/// Insert `sep` between every group of three digits, counting from the right.
fn group_digits(digits: &str, sep: char) -> String {
    digits
        .as_bytes()
        .rchunks(3)
        .rev()
        .map(|chunk| std::str::from_utf8(chunk).unwrap_or(""))
        .collect::<Vec<_>>()
        .join(&sep.to_string())
}

/// Percentage with one decimal, e.g. `42.5%`.
pub(crate) fn format_percent(value: f64) -> String {
    format!("{value:.1}%")
}

/// A fixed-width text bar for a 0–100 percentage.
pub(crate) fn progress_bar(percent: f64, width: usize) -> String {
    let ratio = (percent / 100.0).clamp(0.0, 1.0);
    let filled = (ratio * width as f64).round() as usize;
    let empty = width.saturating_sub(filled);
    format!("[{}{}]", "█".repeat(filled), "░".repeat(empty))
}

/// Truncate a string to `max` visible characters, appending "…" if truncated.
/// The result is guaranteed to be at most `max` characters (counting "…" as one).
/// Safe for multi-byte UTF-8 characters.
pub(crate) fn truncate(s: &str, max: usize) -> String {
    if max == 0 {
        return String::new();
    }
    let char_count = s.chars().count();
    if char_count <= max {
        return s.to_string();
    }
    let truncated: String = s.chars().take(max.saturating_sub(1)).collect();
    format!("{truncated}…")
}

/// Move a list cursor down by one, adjusting scroll to keep cursor visible.
pub(crate) fn scroll_down(index: &mut usize, scroll: &mut usize, len: usize, page: usize) {
    if *index + 1 < len {
        *index += 1;
        if *index >= *scroll + page {
            *scroll = index.saturating_sub(page - 1);
        }
    }
}

/// Move a list cursor up by one, adjusting scroll to keep cursor visible.
pub(crate) fn scroll_up(index: &mut usize, scroll: &mut usize) {
    *index = index.saturating_sub(1);
    if *index < *scroll {
        *scroll = *index;
    }
}

/// Jump cursor to the top of a list.
pub(crate) fn scroll_to_top(index: &mut usize, scroll: &mut usize) {
    *index = 0;
    *scroll = 0;
}

/// Jump cursor to the bottom of a list.
pub(crate) fn scroll_to_bottom(index: &mut usize, scroll: &mut usize, len: usize, page: usize) {
    if len > 0 {
        *index = len - 1;
        *scroll = index.saturating_sub(page.saturating_sub(1));
    }
}
