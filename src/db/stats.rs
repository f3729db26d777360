//! Aggregate counters over the stored mood entries.
//!
//! A pure read used as summary input to the insight engine and for simple
//! UI counters.

use crate::db::db::Db;
use crate::libs::error::StoreResult;
use rusqlite::Connection;

const SELECT_ENTRY_STATS: &str = "SELECT COUNT(*), MIN(entry_time), MAX(entry_time) FROM mood_entries";
const SELECT_TAG_COUNT: &str = "SELECT COUNT(*) FROM mood_tags";
const SELECT_ACTIVITY_COUNT: &str = "SELECT COUNT(*) FROM mood_activities";

/// Store-wide counters for the mood journal.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Summary {
    pub entry_count: i64,
    /// Epoch ms of the earliest entry, `None` for an empty journal.
    pub first_entry_time: Option<i64>,
    /// Epoch ms of the latest entry.
    pub last_entry_time: Option<i64>,
    pub tag_count: i64,
    pub activity_count: i64,
}

pub struct Stats {
    conn: Connection,
}

impl Stats {
    pub fn new(db: Db) -> Self {
        Stats { conn: db.conn }
    }

    pub fn summary(&self) -> StoreResult<Summary> {
        let (entry_count, first_entry_time, last_entry_time) = self.conn.query_row(SELECT_ENTRY_STATS, [], |row| {
            Ok((row.get::<_, i64>(0)?, row.get::<_, Option<i64>>(1)?, row.get::<_, Option<i64>>(2)?))
        })?;
        let tag_count: i64 = self.conn.query_row(SELECT_TAG_COUNT, [], |row| row.get(0))?;
        let activity_count: i64 = self.conn.query_row(SELECT_ACTIVITY_COUNT, [], |row| row.get(0))?;

        Ok(Summary {
            entry_count,
            first_entry_time,
            last_entry_time,
            tag_count,
            activity_count,
        })
    }
}
