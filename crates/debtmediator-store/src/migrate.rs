use crate::error::{Result, StoreError};
use rusqlite::{Connection, OptionalExtension, Transaction};
use tracing::debug;

const SCHEMA_TABLE_DDL: &str =
    "CREATE TABLE IF NOT EXISTS debtmediator_schema (version INTEGER NOT NULL);";

const MIGRATIONS: &[(&str, &str)] = &[(
    "001_init.sql",
    include_str!("../migrations/001_init.sql"),
)];

pub fn latest_version() -> i64 {
    MIGRATIONS.len() as i64
}

pub fn run_migrations(conn: &Connection) -> Result<()> {
    let tx = conn.unchecked_transaction()?;
    let current = ensure_schema_row(&tx)?;

    if current > latest_version() {
        return Err(StoreError::Migration(format!(
            "db version {} newer than available migrations {}",
            current,
            latest_version()
        )));
    }

    for (version, (name, sql)) in (1_i64..).zip(MIGRATIONS.iter()) {
        if current >= version {
            continue;
        }
        tx.execute_batch(sql)
            .map_err(|err| StoreError::Migration(format!("{name}: {err}")))?;
        set_version(&tx, version)?;
        debug!(migration = name, version, "migration applied");
    }

    tx.commit()?;
    Ok(())
}

/// Applied schema version, or 0 for a database that was never migrated.
pub fn schema_version(conn: &Connection) -> Result<i64> {
    let has_table: bool = conn.query_row(
        "SELECT EXISTS (SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = 'debtmediator_schema');",
        [],
        |row| row.get(0),
    )?;
    if !has_table {
        return Ok(0);
    }
    Ok(schema_version_row(conn)?.unwrap_or(0))
}

fn ensure_schema_row(tx: &Transaction<'_>) -> Result<i64> {
    tx.execute_batch(SCHEMA_TABLE_DDL)?;
    match schema_version_row(tx)? {
        Some(version) => Ok(version),
        None => {
            tx.execute("INSERT INTO debtmediator_schema (version) VALUES (0);", [])?;
            Ok(0)
        }
    }
}

fn schema_version_row(conn: &Connection) -> Result<Option<i64>> {
    Ok(conn
        .query_row("SELECT version FROM debtmediator_schema LIMIT 1;", [], |row| {
            row.get(0)
        })
        .optional()?)
}

fn set_version(tx: &Transaction<'_>, version: i64) -> Result<()> {
    let updated = tx.execute("UPDATE debtmediator_schema SET version = ?1;", [version])?;
    if updated != 1 {
        return Err(StoreError::Migration(format!(
            "expected single schema row, updated {updated}"
        )));
    }
    Ok(())
}
