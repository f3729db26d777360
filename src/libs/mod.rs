//! Core library modules for the moodlog crate.
//!
//! Serves as the entry point for the domain types, the insight engine, and
//! the supporting infrastructure (configuration, storage paths, identifiers,
//! error types).
//!
//! ## Usage
//!
//! ```rust,no_run
//! use moodlog::db::{db::Db, moods::Moods};
//! use moodlog::libs::mood::{Emotion, NewMoodEntry};
//!
//! # fn main() -> Result<(), moodlog::libs::error::StoreError> {
//! let mut moods = Moods::new(Db::new()?);
//! moods.save(&NewMoodEntry::new(5, Emotion::Happy))?;
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod data_storage;
pub mod error;
pub mod food;
pub mod id;
pub mod insights;
pub mod mood;
pub mod person;
pub mod place;
