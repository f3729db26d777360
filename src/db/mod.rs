//! Database layer for the moodlog crate.
//!
//! Provides the persistence layer built on SQLite: an explicitly constructed
//! [`db::Db`] handle, a versioned migration system, and one repository module
//! per entity family. All SQL is parameterized; link tables cascade when
//! their parent rows are deleted.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use moodlog::db::{db::Db, moods::Moods};
//! use moodlog::libs::mood::{Emotion, NewMoodEntry};
//!
//! # fn main() -> Result<(), moodlog::libs::error::StoreError> {
//! let mut moods = Moods::new(Db::new()?);
//! let entry = moods.save(&NewMoodEntry::new(4, Emotion::Calm))?;
//! let page = moods.get_page(20, 0)?;
//! # Ok(())
//! # }
//! ```

/// Core database connection handle and lifecycle (open, reset).
pub mod db;

/// Versioned schema migration system with a tracking table.
pub mod migrations;

/// Mood entry repository: validated saves, stable pagination, partial
/// updates, cascade deletes.
pub mod moods;

/// Food entry repository with people links and an optional place reference.
pub mod foods;

/// People registry with typed hobby/interest tag rows.
pub mod people;

/// Place registry and the place-to-mood link table.
pub mod places;

/// Aggregate counters over the stored entries.
pub mod stats;
