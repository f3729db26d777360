//! Database schema migration management and versioning.
//!
//! Evolves the journal schema over time while keeping initialization
//! idempotent: every table and index is created with `IF NOT EXISTS`
//! semantics, applied versions are recorded in a tracking table, and
//! re-running the manager against an up-to-date store is a no-op. All
//! pending migrations are applied inside one transaction, so a failed
//! migration leaves the store at its previous version.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use moodlog::db::migrations::{get_db_version, init_with_migrations};
//! use rusqlite::Connection;
//!
//! # fn main() -> Result<(), moodlog::libs::error::StoreError> {
//! let mut conn = Connection::open("moodlog.db")?;
//! init_with_migrations(&mut conn)?;
//! let version = get_db_version(&conn)?;
//! # Ok(())
//! # }
//! ```

use crate::libs::error::StoreResult;
use rusqlite::{params, Connection, Transaction};
use tracing::{debug, error, info};

/// Tracking table recording every applied migration with its version, name,
/// and application timestamp.
const MIGRATIONS_TABLE: &str = "
CREATE TABLE IF NOT EXISTS migrations (
    id INTEGER PRIMARY KEY,
    version INTEGER NOT NULL UNIQUE,
    name TEXT NOT NULL,
    applied_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP
)";

/// A single schema change: version, descriptive name, and the transformation
/// applied within a transaction.
#[derive(Debug, Clone)]
struct Migration {
    version: u32,
    name: &'static str,
    up: fn(&Transaction) -> rusqlite::Result<()>,
}

/// Registry of all migrations in version order, plus the logic to apply the
/// pending ones and track their completion.
pub struct MigrationManager {
    migrations: Vec<Migration>,
}

impl MigrationManager {
    pub fn new() -> Self {
        let mut manager = Self { migrations: Vec::new() };
        manager.register_migrations();
        manager
    }

    /// Registers the complete schema evolution history in version order.
    fn register_migrations(&mut self) {
        // Version 1: the mood journal core - entries, tag and activity link
        // tables, and the entry_time index pagination depends on.
        self.add_migration(1, "create_mood_journal", |tx| {
            tx.execute(
                "CREATE TABLE IF NOT EXISTS mood_entries (
                    id TEXT PRIMARY KEY,
                    entry_time INTEGER NOT NULL,
                    rating INTEGER NOT NULL,
                    emotion TEXT NOT NULL,
                    notes TEXT,
                    location TEXT,
                    social_context TEXT,
                    weather TEXT,
                    location_meta TEXT,
                    created_at INTEGER NOT NULL,
                    updated_at INTEGER NOT NULL
                )",
                [],
            )?;
            tx.execute(
                "CREATE TABLE IF NOT EXISTS mood_tags (
                    id INTEGER PRIMARY KEY,
                    mood_id TEXT NOT NULL,
                    tag_name TEXT NOT NULL,
                    UNIQUE (mood_id, tag_name),
                    FOREIGN KEY (mood_id) REFERENCES mood_entries(id) ON DELETE CASCADE
                )",
                [],
            )?;
            tx.execute(
                "CREATE TABLE IF NOT EXISTS mood_activities (
                    id INTEGER PRIMARY KEY,
                    mood_id TEXT NOT NULL,
                    activity_type TEXT NOT NULL,
                    activity_name TEXT NOT NULL,
                    UNIQUE (mood_id, activity_type),
                    FOREIGN KEY (mood_id) REFERENCES mood_entries(id) ON DELETE CASCADE
                )",
                [],
            )?;

            tx.execute("CREATE INDEX IF NOT EXISTS idx_mood_entries_entry_time ON mood_entries(entry_time)", [])?;
            tx.execute("CREATE INDEX IF NOT EXISTS idx_mood_tags_mood_id ON mood_tags(mood_id)", [])?;
            tx.execute("CREATE INDEX IF NOT EXISTS idx_mood_activities_mood_id ON mood_activities(mood_id)", [])?;

            Ok(())
        });

        // Version 2: people registry with typed hobby/interest tag rows.
        self.add_migration(2, "add_people", |tx| {
            tx.execute(
                "CREATE TABLE IF NOT EXISTS people (
                    id TEXT PRIMARY KEY,
                    name TEXT NOT NULL,
                    relationship TEXT,
                    status TEXT,
                    birth_date TEXT,
                    deceased INTEGER NOT NULL DEFAULT 0,
                    deceased_date TEXT,
                    phone TEXT,
                    email TEXT,
                    created_at INTEGER NOT NULL,
                    updated_at INTEGER NOT NULL
                )",
                [],
            )?;
            tx.execute(
                "CREATE TABLE IF NOT EXISTS person_tags (
                    id INTEGER PRIMARY KEY,
                    person_id TEXT NOT NULL,
                    kind TEXT NOT NULL,
                    value TEXT NOT NULL,
                    UNIQUE (person_id, kind, value),
                    FOREIGN KEY (person_id) REFERENCES people(id) ON DELETE CASCADE
                )",
                [],
            )?;
            tx.execute("CREATE INDEX IF NOT EXISTS idx_person_tags_person_id ON person_tags(person_id)", [])?;
            Ok(())
        });

        // Version 3: places and the place<->mood link table.
        self.add_migration(3, "add_places", |tx| {
            tx.execute(
                "CREATE TABLE IF NOT EXISTS places (
                    id TEXT PRIMARY KEY,
                    name TEXT NOT NULL,
                    address TEXT,
                    latitude REAL,
                    longitude REAL,
                    notes TEXT,
                    created_at INTEGER NOT NULL,
                    updated_at INTEGER NOT NULL
                )",
                [],
            )?;
            tx.execute(
                "CREATE TABLE IF NOT EXISTS place_moods (
                    place_id TEXT NOT NULL,
                    mood_id TEXT NOT NULL,
                    PRIMARY KEY (place_id, mood_id),
                    FOREIGN KEY (place_id) REFERENCES places(id) ON DELETE CASCADE,
                    FOREIGN KEY (mood_id) REFERENCES mood_entries(id) ON DELETE CASCADE
                )",
                [],
            )?;
            Ok(())
        });

        // Version 4: food log with people links and an optional place.
        self.add_migration(4, "add_food_log", |tx| {
            tx.execute(
                "CREATE TABLE IF NOT EXISTS food_entries (
                    id TEXT PRIMARY KEY,
                    entry_time INTEGER NOT NULL,
                    meal_type TEXT NOT NULL,
                    calories REAL NOT NULL DEFAULT 0,
                    protein REAL NOT NULL DEFAULT 0,
                    carbs REAL NOT NULL DEFAULT 0,
                    fat REAL NOT NULL DEFAULT 0,
                    notes TEXT,
                    image_ref TEXT,
                    rating INTEGER,
                    emotion TEXT,
                    restaurant INTEGER NOT NULL DEFAULT 0,
                    place_id TEXT,
                    created_at INTEGER NOT NULL,
                    updated_at INTEGER NOT NULL,
                    FOREIGN KEY (place_id) REFERENCES places(id) ON DELETE SET NULL
                )",
                [],
            )?;
            tx.execute(
                "CREATE TABLE IF NOT EXISTS food_people (
                    food_id TEXT NOT NULL,
                    person_id TEXT NOT NULL,
                    PRIMARY KEY (food_id, person_id),
                    FOREIGN KEY (food_id) REFERENCES food_entries(id) ON DELETE CASCADE,
                    FOREIGN KEY (person_id) REFERENCES people(id) ON DELETE CASCADE
                )",
                [],
            )?;
            tx.execute("CREATE INDEX IF NOT EXISTS idx_food_entries_entry_time ON food_entries(entry_time)", [])?;
            Ok(())
        });
    }

    fn add_migration(&mut self, version: u32, name: &'static str, up: fn(&Transaction) -> rusqlite::Result<()>) {
        self.migrations.push(Migration { version, name, up });
    }

    /// Applies all pending migrations in order, recording each in the
    /// tracking table. A no-op when the store is up to date.
    pub fn run_migrations(&self, conn: &mut Connection) -> StoreResult<()> {
        conn.execute(MIGRATIONS_TABLE, [])?;

        let current_version = self.get_current_version(conn)?;
        let pending: Vec<&Migration> = self.migrations.iter().filter(|m| m.version > current_version).collect();

        if pending.is_empty() {
            debug!("database schema is up to date");
            return Ok(());
        }

        info!(count = pending.len(), "applying pending schema migrations");

        let tx = conn.transaction()?;
        for migration in pending {
            debug!(version = migration.version, name = migration.name, "running migration");
            match (migration.up)(&tx) {
                Ok(()) => {
                    tx.execute(
                        "INSERT INTO migrations (version, name) VALUES (?1, ?2)",
                        params![migration.version, migration.name],
                    )?;
                }
                Err(e) => {
                    error!(version = migration.version, error = %e, "migration failed");
                    return Err(e.into());
                }
            }
        }
        tx.commit()?;
        info!("schema migrations completed");

        Ok(())
    }

    fn get_current_version(&self, conn: &Connection) -> StoreResult<u32> {
        let version: Option<u32> = conn
            .query_row("SELECT MAX(version) FROM migrations", [], |row| row.get(0))
            .unwrap_or(Some(0));
        Ok(version.unwrap_or(0))
    }

    /// Whether a specific migration version has been applied.
    pub fn is_migration_applied(&self, conn: &Connection, version: u32) -> StoreResult<bool> {
        let count: i32 = conn.query_row("SELECT COUNT(*) FROM migrations WHERE version = ?1", params![version], |row| row.get(0))?;
        Ok(count > 0)
    }

    /// Chronological list of applied migrations as (version, name, applied_at).
    pub fn get_migration_history(&self, conn: &Connection) -> StoreResult<Vec<(u32, String, String)>> {
        let mut stmt = conn.prepare("SELECT version, name, applied_at FROM migrations ORDER BY version")?;
        let history = stmt
            .query_map([], |row| Ok((row.get::<_, u32>(0)?, row.get::<_, String>(1)?, row.get::<_, String>(2)?)))?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(history)
    }

    /// Development-time rollback: drops migration records beyond the target
    /// version. Does not reverse schema changes.
    #[cfg(debug_assertions)]
    pub fn rollback_to(&self, conn: &mut Connection, target_version: u32) -> StoreResult<()> {
        let current_version = self.get_current_version(conn)?;
        if target_version >= current_version {
            debug!("nothing to roll back");
            return Ok(());
        }
        conn.execute("DELETE FROM migrations WHERE version > ?1", params![target_version])?;
        info!(from = current_version, to = target_version, "rolled back migration records");
        Ok(())
    }
}

impl Default for MigrationManager {
    fn default() -> Self {
        Self::new()
    }
}

/// Applies all pending migrations to the connection.
pub fn init_with_migrations(conn: &mut Connection) -> StoreResult<()> {
    let manager = MigrationManager::new();
    manager.run_migrations(conn)?;
    Ok(())
}

/// Current schema version, 0 for a fresh store.
pub fn get_db_version(conn: &Connection) -> StoreResult<u32> {
    let manager = MigrationManager::new();
    manager.get_current_version(conn)
}

/// Whether the store is behind the latest registered migration.
pub fn needs_migration(conn: &Connection) -> StoreResult<bool> {
    let manager = MigrationManager::new();
    let current = manager.get_current_version(conn)?;
    let latest = manager.migrations.last().map(|m| m.version).unwrap_or(0);
    Ok(current < latest)
}
