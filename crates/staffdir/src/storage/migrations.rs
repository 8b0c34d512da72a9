//! Database migration system for staffdir.
//!
//! Tracks the schema version in the metadata table and upgrades older
//! stores in place.

use rusqlite::{Connection, OptionalExtension};
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::error::{Error, Result};

use super::schema::SCHEMA_STATEMENTS;
use super::EMPLOYEES_KEY;

/// The current schema version.
pub const CURRENT_VERSION: i32 = 2;

/// Key used to store the schema version in the metadata table.
const VERSION_KEY: &str = "schema_version";

/// Initialize the database schema.
///
/// Creates all tables if they don't exist, then runs any pending migrations
/// to bring the schema up to the current version.
///
/// # Errors
///
/// Returns an error if schema creation or migration fails.
pub fn initialize_schema(conn: &Connection) -> Result<()> {
    for statement in SCHEMA_STATEMENTS {
        conn.execute(statement, [])?;
    }

    let version = get_schema_version(conn)?;
    if version < CURRENT_VERSION {
        run_migrations(conn, version)?;
    }

    Ok(())
}

/// Get the current schema version from the database.
///
/// Returns 0 if no version is set (fresh database).
fn get_schema_version(conn: &Connection) -> Result<i32> {
    let value: Option<String> = conn
        .query_row(
            "SELECT value FROM metadata WHERE key = ?1",
            [VERSION_KEY],
            |row| row.get(0),
        )
        .optional()?;

    match value {
        Some(value) => value.parse().map_err(|_| Error::DatabaseMigration {
            message: format!("invalid schema version: {value}"),
        }),
        None => Ok(0),
    }
}

/// Set the schema version in the database.
fn set_schema_version(conn: &Connection, version: i32) -> Result<()> {
    conn.execute(
        "INSERT OR REPLACE INTO metadata (key, value) VALUES (?1, ?2)",
        (VERSION_KEY, version.to_string()),
    )?;
    Ok(())
}

/// Run migrations from the given version to the current version.
fn run_migrations(conn: &Connection, from_version: i32) -> Result<()> {
    let mut current = from_version;

    while current < CURRENT_VERSION {
        current += 1;
        run_migration(conn, current)?;
        set_schema_version(conn, current)?;
        info!(version = current, "Applied store migration");
    }

    Ok(())
}

/// Run a specific migration version.
fn run_migration(conn: &Connection, version: i32) -> Result<()> {
    match version {
        1 => Ok(()),
        2 => migrate_v2(conn),
        _ => Err(Error::DatabaseMigration {
            message: format!("unknown migration version: {version}"),
        }),
    }
}

/// Version 2 rewrites the stored collection so every id is a string and no
/// record carries a persisted selection flag.
///
/// A collection that is not valid JSON is left alone; the directory falls
/// back to its seed data when it reads it.
fn migrate_v2(conn: &Connection) -> Result<()> {
    let stored: Option<String> = conn
        .query_row(
            "SELECT value FROM entries WHERE key = ?1",
            [EMPLOYEES_KEY],
            |row| row.get(0),
        )
        .optional()?;

    let Some(stored) = stored else {
        return Ok(());
    };

    let mut collection: Value = match serde_json::from_str(&stored) {
        Ok(value) => value,
        Err(e) => {
            warn!(error = %e, "Stored collection is not valid JSON, skipping migration");
            return Ok(());
        }
    };

    let Some(records) = collection.as_array_mut() else {
        return Ok(());
    };

    let mut changed = 0usize;
    for record in records.iter_mut().filter_map(Value::as_object_mut) {
        let mut touched = record.remove("selected").is_some();
        if let Some(id) = record.get_mut("id") {
            let numeric = match &*id {
                Value::Number(n) => Some(n.to_string()),
                _ => None,
            };
            if let Some(numeric) = numeric {
                *id = Value::String(numeric);
                touched = true;
            }
        }
        if touched {
            changed += 1;
        }
    }

    if changed > 0 {
        conn.execute(
            "UPDATE entries SET value = ?1, updated_at = datetime('now') WHERE key = ?2",
            (serde_json::to_string(&collection)?, EMPLOYEES_KEY),
        )?;
        debug!(records = changed, "Normalized stored employee records");
    }
    Ok(())
}
