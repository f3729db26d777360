//! # Moodlog - Local Journaling Store and Insight Engine
//!
//! A library for recording subjective life-tracking entries and deriving
//! statistical insights from them. All data lives in a local SQLite store;
//! there is no networking, sync, or multi-user support.
//!
//! ## Features
//!
//! - **Mood Journal**: Rated mood samples with emotions, tags, contextual
//!   labels (location, social context, weather) and activity intensities
//! - **Food Log**: Meals with macros, linked people and places
//! - **People & Places**: Relationship and location registries with link tables
//! - **Paginated Retrieval**: Stable, gap-free pages ordered by entry time
//! - **Insight Engine**: Rule-based statistical observations (averages,
//!   trends, factor correlations, day-of-week patterns)
//!
//! ## Usage
//!
//! ```rust,no_run
//! use moodlog::db::{db::Db, moods::Moods, stats::Stats};
//! use moodlog::libs::insights::generate_insights;
//! use moodlog::libs::mood::{Emotion, NewMoodEntry};
//!
//! # fn main() -> Result<(), moodlog::libs::error::StoreError> {
//! let mut moods = Moods::new(Db::new()?);
//! moods.save(&NewMoodEntry::new(4, Emotion::Calm))?;
//!
//! let page = moods.get_page(50, 0)?;
//! let summary = Stats::new(Db::new()?).summary()?;
//! for line in generate_insights(&page, &summary) {
//!     println!("{line}");
//! }
//! # Ok(())
//! # }
//! ```

pub mod db;
pub mod libs;
