use anyhow::{Context, Result};
use chrono::NaiveDate;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::analytics;
use crate::models::Transaction;

pub(crate) const HEADER: [&str; 6] = ["Date", "Type", "Category", "Description", "Amount", "Notes"];

/// `finance-report-YYYY-MM-DD.csv`
pub(crate) fn default_file_name(today: NaiveDate) -> String {
    format!("finance-report-{}.csv", today.format("%Y-%m-%d"))
}

/// Writes every transaction, newest first, as CSV. Returns the row count.
pub(crate) fn write_report<W: Write>(writer: W, transactions: &[Transaction]) -> Result<usize> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(HEADER).context("Failed to write CSV header")?;

    let rows = analytics::sorted_by_date_desc(transactions, None);
    for t in &rows {
        let date = t.date.format("%Y-%m-%d").to_string();
        let amount = t.amount.normalize().to_string();
        wtr.write_record([
            date.as_str(),
            t.kind.as_str(),
            t.category.as_str(),
            t.description.as_str(),
            amount.as_str(),
            t.notes.as_deref().unwrap_or(""),
        ])
        .with_context(|| format!("Failed to write transaction {}", t.id))?;
    }

    wtr.flush().context("Failed to flush CSV output")?;
    Ok(rows.len())
}

/// Writes the report to `path`, creating or truncating the file.
pub(crate) fn export_to_path(path: &Path, transactions: &[Transaction]) -> Result<usize> {
    let file = std::fs::File::create(path)
        .with_context(|| format!("Failed to create {}", path.display()))?;
    let count = write_report(file, transactions)?;
    tracing::info!(path = %path.display(), rows = count, "report exported");
    Ok(count)
}

/// Resolves the destination: an explicit path as given, otherwise the default
/// file name inside `dir`. A directory argument gets the default name appended.
pub(crate) fn resolve_path(explicit: Option<&str>, dir: &Path, today: NaiveDate) -> PathBuf {
    match explicit {
        Some(p) => {
            let path = PathBuf::from(p);
            if path.is_dir() {
                path.join(default_file_name(today))
            } else {
                path
            }
        }
        None => dir.join(default_file_name(today)),
    }
}
