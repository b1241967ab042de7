mod schema;

use anyhow::{Context, Result};
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;

use crate::store::{MemoryStorage, Storage};

pub(crate) const DB_FILE: &str = "dompet.db";

/// The SQLite file in `data_dir` when it opens; otherwise an in-memory
/// session that is lost on exit.
pub(crate) fn open_storage(data_dir: Option<&Path>) -> Box<dyn Storage> {
    let Some(dir) = data_dir else {
        return Box::new(MemoryStorage::new());
    };
    let path = dir.join(DB_FILE);
    match Database::open(&path) {
        Ok(db) => Box::new(db),
        Err(e) => {
            tracing::warn!(
                path = %path.display(),
                error = %format!("{e:#}"),
                "database unavailable, changes will not be saved"
            );
            eprintln!("Warning: {e:#}. Changes will not be saved.");
            Box::new(MemoryStorage::new())
        }
    }
}

/// Local key/value storage backed by a single SQLite file.
pub(crate) struct Database {
    conn: Connection,
}

impl Database {
    pub(crate) fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)
            .with_context(|| format!("Failed to open database: {}", path.display()))?;
        conn.execute_batch("PRAGMA journal_mode=WAL;")
            .context("Failed to set database pragmas")?;
        let mut db = Self { conn };
        db.migrate().context("Database migration failed")?;
        tracing::debug!(path = %path.display(), "database opened");
        Ok(db)
    }

    #[cfg(test)]
    pub(crate) fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let mut db = Self { conn };
        db.migrate()?;
        Ok(db)
    }

    fn migrate(&mut self) -> Result<()> {
        let has_version_table: bool = self.conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM sqlite_master WHERE type='table' AND name='schema_version')",
            [],
            |row| row.get(0),
        )?;

        if !has_version_table {
            self.conn.execute_batch(schema::SCHEMA_V1)?;
            self.conn.execute(
                "INSERT INTO schema_version (version) VALUES (?1)",
                params![schema::CURRENT_VERSION],
            )?;
            return Ok(());
        }

        let current: i32 = self
            .conn
            .query_row("SELECT version FROM schema_version LIMIT 1", [], |row| {
                row.get(0)
            })
            .unwrap_or(0);

        for &(from_version, sql) in schema::MIGRATIONS {
            if current <= from_version {
                self.conn.execute_batch(sql)?;
            }
        }

        if current < schema::CURRENT_VERSION {
            self.conn.execute(
                "UPDATE schema_version SET version = ?1",
                params![schema::CURRENT_VERSION],
            )?;
        }

        Ok(())
    }
}

impl Storage for Database {
    fn get(&self, key: &str) -> Result<Option<String>> {
        self.conn
            .query_row("SELECT value FROM kv WHERE key = ?1", params![key], |row| {
                row.get(0)
            })
            .optional()
            .with_context(|| format!("Failed to read '{key}'"))
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.conn
            .execute(
                "INSERT INTO kv (key, value, updated_at) VALUES (?1, ?2, ?3)
                 ON CONFLICT(key) DO UPDATE SET value = ?2, updated_at = ?3",
                params![key, value, chrono::Utc::now().to_rfc3339()],
            )
            .with_context(|| format!("Failed to write '{key}'"))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests;
