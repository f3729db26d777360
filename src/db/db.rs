//! Database connection handle with an explicit lifecycle.
//!
//! A [`Db`] is constructed by the caller and handed to each repository, so
//! there is no hidden global store state. Opening a handle enables foreign
//! key enforcement (link-table cascades depend on it) and applies any
//! pending schema migrations; both are idempotent, so opening before every
//! operation is safe.

use crate::db::migrations;
use crate::libs::config::Config;
use crate::libs::error::StoreResult;
use rusqlite::Connection;
use std::fs;
use std::path::{Path, PathBuf};

pub const DB_FILE_NAME: &str = "moodlog.db";

pub struct Db {
    pub conn: Connection,
}

impl Db {
    /// Opens the store at the configured data directory.
    pub fn new() -> StoreResult<Db> {
        Self::open(&Self::default_path()?)
    }

    /// Opens the store at an explicit path, creating the schema if needed.
    pub fn open(path: &Path) -> StoreResult<Db> {
        let conn = Connection::open(path)?;
        conn.pragma_update(None, "foreign_keys", true)?;
        let mut db = Db { conn };
        migrations::init_with_migrations(&mut db.conn)?;
        Ok(db)
    }

    /// Opens a connection without running migrations. Used by migration
    /// tooling and tests that drive the manager directly.
    pub fn open_without_migrations(path: &Path) -> StoreResult<Connection> {
        let conn = Connection::open(path)?;
        conn.pragma_update(None, "foreign_keys", true)?;
        Ok(conn)
    }

    /// Deletes the store file and re-creates an empty schema. Irreversible;
    /// confirmation is the caller's responsibility.
    pub fn reset(path: &Path) -> StoreResult<Db> {
        if path.exists() {
            fs::remove_file(path)?;
        }
        Self::open(path)
    }

    /// [`Db::reset`] against the configured data directory.
    pub fn reset_default() -> StoreResult<Db> {
        Self::reset(&Self::default_path()?)
    }

    /// Resolves the store file path from the configuration, falling back to
    /// the platform data directory.
    pub fn default_path() -> StoreResult<PathBuf> {
        let config = Config::read().unwrap_or_default();
        match config.data_dir {
            Some(dir) => {
                if !dir.exists() {
                    fs::create_dir_all(&dir)?;
                }
                Ok(dir.join(DB_FILE_NAME))
            }
            None => Ok(crate::libs::data_storage::DataStorage::new().get_path(DB_FILE_NAME)?),
        }
    }
}
