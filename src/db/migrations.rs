//! Database schema migration management and versioning.
//!
//! Maintains a precise record of applied migrations and brings the schema up
//! to date during database initialization. Each run is wrapped in a
//! transaction, so a failed migration leaves the schema untouched.
//!
//! The ordering backfill (version 2) is the one-time step that assigns
//! `position` values to legacy rows by ascending creation time, which removes
//! any need for per-request fallback branching in ordered reads.

use anyhow::Result;
use rusqlite::{params, Connection, Transaction};

/// Tracking table recording every applied migration with its version,
/// name, and application timestamp.
const MIGRATIONS_TABLE: &str = "
CREATE TABLE IF NOT EXISTS migrations (
    id INTEGER PRIMARY KEY,
    version INTEGER NOT NULL UNIQUE,
    name TEXT NOT NULL,
    applied_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP
)";

/// A single schema change: version for ordering, name for the audit trail,
/// and the transformation applied within the surrounding transaction.
#[derive(Debug, Clone)]
struct Migration {
    version: u32,
    name: &'static str,
    up: fn(&Transaction) -> Result<()>,
}

/// Registry of all migrations in version order, plus the logic to apply
/// the pending ones. Designed for single-threaded use during startup.
pub struct MigrationManager {
    migrations: Vec<Migration>,
}

impl MigrationManager {
    pub fn new() -> Self {
        let mut manager = Self { migrations: Vec::new() };
        manager.register_migrations();
        manager
    }

    /// Defines the complete schema evolution history. Migrations must be
    /// registered in sequential version order.
    fn register_migrations(&mut self) {
        // Version 1: the tasks table.
        //
        // Timer fields are stored whether or not the timer is enabled; the
        // `timer_enabled` flag gates whether they are meaningful. `position`
        // arrives in version 2, mirroring how the schema actually evolved.
        self.add_migration(1, "create_tasks_table", |tx| {
            tx.execute(
                "CREATE TABLE IF NOT EXISTS tasks (
                    id INTEGER NOT NULL PRIMARY KEY,
                    title TEXT NOT NULL,
                    timer_enabled BOOLEAN NOT NULL ON CONFLICT REPLACE DEFAULT FALSE,
                    hours INTEGER NOT NULL ON CONFLICT REPLACE DEFAULT 0,
                    minutes INTEGER NOT NULL ON CONFLICT REPLACE DEFAULT 0,
                    seconds INTEGER NOT NULL ON CONFLICT REPLACE DEFAULT 0,
                    created_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP,
                    updated_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP
                )",
                [],
            )?;

            // Index for chronological queries and ordering tie-breaks
            tx.execute("CREATE INDEX IF NOT EXISTS idx_tasks_created_at ON tasks(created_at)", [])?;

            Ok(())
        });

        // Version 2: display ordering.
        //
        // Adds the `position` column and backfills existing rows by ascending
        // creation time (id as the final tie-break), so every ordered read
        // can rely on the column being populated.
        self.add_migration(2, "add_position_with_backfill", |tx| {
            tx.execute("ALTER TABLE tasks ADD COLUMN position INTEGER", [])?;
            tx.execute(
                "UPDATE tasks SET position = (
                    SELECT COUNT(*) FROM tasks AS earlier
                    WHERE earlier.created_at < tasks.created_at
                       OR (earlier.created_at = tasks.created_at AND earlier.id < tasks.id)
                ) WHERE position IS NULL",
                [],
            )?;
            tx.execute("CREATE INDEX IF NOT EXISTS idx_tasks_position ON tasks(position)", [])?;
            Ok(())
        });
    }

    fn add_migration(&mut self, version: u32, name: &'static str, up: fn(&Transaction) -> Result<()>) {
        self.migrations.push(Migration { version, name, up });
    }

    /// Applies all pending migrations within a single transaction and records
    /// each one in the tracking table. A failure rolls everything back.
    pub fn run_migrations(&self, conn: &mut Connection) -> Result<()> {
        conn.execute(MIGRATIONS_TABLE, [])?;

        let current_version = self.get_current_version(conn)?;
        let pending: Vec<&Migration> = self.migrations.iter().filter(|m| m.version > current_version).collect();

        if pending.is_empty() {
            tracing::debug!("database schema is up to date");
            return Ok(());
        }

        tracing::info!(count = pending.len(), "applying pending migrations");

        let tx = conn.transaction()?;

        for migration in pending {
            tracing::info!(version = migration.version, name = migration.name, "running migration");

            match (migration.up)(&tx) {
                Ok(()) => {
                    tx.execute("INSERT INTO migrations (version, name) VALUES (?1, ?2)", params![migration.version, migration.name])?;
                }
                Err(e) => {
                    tracing::error!(version = migration.version, error = %e, "migration failed");
                    return Err(e);
                }
            }
        }

        tx.commit()?;
        tracing::debug!("all migrations applied");

        Ok(())
    }

    /// Highest version recorded in the tracking table, or 0 for a fresh
    /// database.
    fn get_current_version(&self, conn: &Connection) -> Result<u32> {
        let version: Option<u32> = conn.query_row("SELECT MAX(version) FROM migrations", [], |row| row.get(0)).unwrap_or(Some(0));

        Ok(version.unwrap_or(0))
    }
}

impl Default for MigrationManager {
    fn default() -> Self {
        Self::new()
    }
}

/// Brings a connection up to the latest schema version. The recommended way
/// to initialize any database handle.
pub fn init_with_migrations(conn: &mut Connection) -> Result<()> {
    let manager = MigrationManager::new();
    manager.run_migrations(conn)?;
    Ok(())
}

/// Current schema version of the given database.
pub fn get_db_version(conn: &Connection) -> Result<u32> {
    let manager = MigrationManager::new();
    manager.get_current_version(conn)
}
