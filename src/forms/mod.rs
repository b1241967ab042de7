//! Parsing of one-line record forms, shared by the `:` commands in the TUI and
//! the one-shot CLI. Every parser returns a validated draft or the first
//! [`ValidationError`] it hits.
//!
//! ```text
//! transaction  <income|expense> <YYYY-MM-DD> <amount> <category> | <description> [| <notes>]
//! budget       <category> <limit> [YYYY-MM]
//! category     <income|expense> <name> [| <icon> [<#color>]]
//! ```
//!
//! `|` separates sections; write `\|` for a literal bar inside a field.

use rust_decimal::Decimal;
use std::str::FromStr;

use crate::models::{
    parse_date, BudgetDraft, Category, CategoryDraft, Transaction, TransactionDraft,
    TransactionType, ValidationError, YearMonth, DEFAULT_COLOR, DEFAULT_ICON,
};

pub(crate) const TRANSACTION_USAGE: &str =
    "<income|expense> <YYYY-MM-DD> <amount> <category> | <description> [| <notes>]";
pub(crate) const BUDGET_USAGE: &str = "<category> <limit> [YYYY-MM]";
pub(crate) const CATEGORY_USAGE: &str = "<income|expense> <name> [| <icon> [<#color>]]";

/// Amounts may use `,` or `_` as digit separators; `.` is the decimal point.
pub(crate) fn parse_amount(s: &str) -> Result<Decimal, ValidationError> {
    let cleaned: String = s.trim().chars().filter(|c| *c != ',' && *c != '_').collect();
    if cleaned.is_empty() {
        return Err(ValidationError::MissingField("amount"));
    }
    Decimal::from_str(&cleaned).map_err(|_| ValidationError::InvalidAmount(s.trim().to_string()))
}

pub(crate) fn parse_kind(s: &str) -> Result<TransactionType, ValidationError> {
    TransactionType::parse(s).ok_or_else(|| ValidationError::InvalidType(s.trim().to_string()))
}

/// The stored spelling of a category name when one matches, preferring a
/// category of `kind`. Unknown names pass through unchanged.
pub(crate) fn resolve_category(
    name: &str,
    categories: &[Category],
    kind: Option<TransactionType>,
) -> String {
    let name = name.trim();
    let same_kind = categories
        .iter()
        .filter(|c| kind.map_or(true, |k| c.kind == k))
        .find(|c| c.name.eq_ignore_ascii_case(name));
    same_kind
        .or_else(|| Category::find_by_name_loose(categories, name))
        .map(|c| c.name.clone())
        .unwrap_or_else(|| name.to_string())
}

pub(crate) fn transaction_draft(
    args: &str,
    categories: &[Category],
) -> Result<TransactionDraft, ValidationError> {
    let mut sections = split_sections(args, 3).into_iter();
    let head = sections.next().unwrap_or_default();
    let description = sections.next().unwrap_or_default().trim().to_string();
    let notes = sections
        .next()
        .map(|n| n.trim().to_string())
        .filter(|n| !n.is_empty());

    let mut fields = head.split_whitespace();
    let kind = parse_kind(fields.next().ok_or(ValidationError::MissingField("type"))?)?;
    let date = parse_date(fields.next().ok_or(ValidationError::MissingField("date"))?)?;
    let amount = parse_amount(fields.next().ok_or(ValidationError::MissingField("amount"))?)?;
    let category_name = fields.collect::<Vec<_>>().join(" ");

    let draft = TransactionDraft {
        kind,
        amount,
        category: resolve_category(&category_name, categories, Some(kind)),
        description,
        date,
        notes,
    };
    draft.validate()?;
    Ok(draft)
}

pub(crate) fn budget_draft(
    args: &str,
    categories: &[Category],
    default_month: YearMonth,
) -> Result<BudgetDraft, ValidationError> {
    let mut tokens: Vec<&str> = args.split_whitespace().collect();

    let month = match tokens.last() {
        Some(last) if looks_like_month(last) => {
            let month = YearMonth::parse(last)?;
            tokens.pop();
            month
        }
        _ => default_month,
    };
    let limit = parse_amount(tokens.pop().ok_or(ValidationError::MissingField("limit"))?)?;
    let category_name = tokens.join(" ");

    let draft = BudgetDraft::new(
        resolve_category(&category_name, categories, Some(TransactionType::Expense)),
        limit,
        month,
    );
    draft.validate()?;
    Ok(draft)
}

pub(crate) fn category_draft(args: &str) -> Result<CategoryDraft, ValidationError> {
    let mut sections = split_sections(args, 2).into_iter();
    let head = sections.next().unwrap_or_default();
    let style = sections.next().unwrap_or_default();

    let mut fields = head.split_whitespace();
    let kind = parse_kind(fields.next().ok_or(ValidationError::MissingField("type"))?)?;
    let name = fields.collect::<Vec<_>>().join(" ");

    let mut style = style.split_whitespace();
    let icon = style.next().unwrap_or(DEFAULT_ICON).to_string();
    let color = match style.next() {
        Some(c) => parse_color(c)?,
        None => DEFAULT_COLOR.to_string(),
    };

    let draft = CategoryDraft {
        name,
        kind,
        icon,
        color,
    };
    draft.validate()?;
    Ok(draft)
}

/// `#rrggbb`, lowercased.
pub(crate) fn parse_color(s: &str) -> Result<String, ValidationError> {
    let s = s.trim();
    match s.strip_prefix('#') {
        Some(hex) if hex.len() == 6 && hex.chars().all(|c| c.is_ascii_hexdigit()) => {
            Ok(s.to_ascii_lowercase())
        }
        _ => Err(ValidationError::InvalidColor(s.to_string())),
    }
}

/// Split on unescaped `|` into at most `limit` sections, unescaping `\|`.
/// Past the limit a bar is kept as text.
fn split_sections(args: &str, limit: usize) -> Vec<String> {
    let mut sections = vec![String::new()];
    let mut chars = args.chars().peekable();
    while let Some(c) = chars.next() {
        let literal = match c {
            '\\' if chars.peek() == Some(&'|') => chars.next(),
            '|' if sections.len() < limit => {
                sections.push(String::new());
                None
            }
            other => Some(other),
        };
        if let (Some(c), Some(section)) = (literal, sections.last_mut()) {
            section.push(c);
        }
    }
    sections
}

fn escape(field: &str) -> String {
    field.replace('|', "\\|")
}

fn looks_like_month(token: &str) -> bool {
    let bytes = token.as_bytes();
    bytes.len() >= 6 && bytes[4] == b'-' && bytes[..4].iter().all(u8::is_ascii_digit)
}

// ── Prefill ───────────────────────────────────────────────────

/// Render a transaction back into form syntax, for editing in place.
pub(crate) fn transaction_args(t: &Transaction) -> String {
    let mut args = format!(
        "{} {} {} {} | {}",
        t.kind,
        t.date.format("%Y-%m-%d"),
        t.amount.normalize(),
        escape(&t.category),
        escape(&t.description)
    );
    if let Some(notes) = &t.notes {
        args.push_str(" | ");
        args.push_str(&escape(notes));
    }
    args
}

pub(crate) fn category_args(c: &Category) -> String {
    format!("{} {} | {} {}", c.kind, escape(&c.name), c.icon, c.color)
}

#[cfg(test)]
mod tests;
