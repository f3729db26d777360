//! Mood entry repository.
//!
//! CRUD and paginated retrieval over `mood_entries` plus its two link tables
//! (`mood_tags`, `mood_activities`). Saves validate before any write; child
//! rows are written independently so one bad tag does not block the others,
//! though the first failure is still surfaced after all attempts. Pages are
//! ordered by `entry_time` descending with the id as a tie-break, which
//! keeps repeated fetches over a stable dataset gap-free and
//! duplicate-free.

use crate::db::db::Db;
use crate::libs::error::{StoreError, StoreResult};
use crate::libs::mood::{
    now_ms, Activity, Emotion, Intensity, LocationMeta, MoodEntry, MoodPatch, NewMoodEntry, SocialContext, Weather,
};
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::collections::BTreeMap;
use tracing::warn;

const INSERT_ENTRY: &str = "INSERT INTO mood_entries
    (id, entry_time, rating, emotion, notes, location, social_context, weather, location_meta, created_at, updated_at)
    VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)";
const UPDATE_ENTRY: &str = "UPDATE mood_entries SET
    entry_time = ?2, rating = ?3, emotion = ?4, notes = ?5, location = ?6,
    social_context = ?7, weather = ?8, location_meta = ?9, updated_at = ?10
    WHERE id = ?1";
const DELETE_ENTRY: &str = "DELETE FROM mood_entries WHERE id = ?1";
const SELECT_ENTRY: &str = "SELECT id, entry_time, rating, emotion, notes, location, social_context, weather, location_meta, created_at, updated_at
    FROM mood_entries WHERE id = ?1";
const SELECT_PAGE: &str = "SELECT id, entry_time, rating, emotion, notes, location, social_context, weather, location_meta, created_at, updated_at
    FROM mood_entries ORDER BY entry_time DESC, id DESC LIMIT ?1 OFFSET ?2";

const INSERT_TAG: &str = "INSERT OR IGNORE INTO mood_tags (mood_id, tag_name) VALUES (?1, ?2)";
const SELECT_TAGS: &str = "SELECT tag_name FROM mood_tags WHERE mood_id = ?1 ORDER BY tag_name";
const DELETE_TAGS: &str = "DELETE FROM mood_tags WHERE mood_id = ?1";

const INSERT_ACTIVITY: &str = "INSERT OR REPLACE INTO mood_activities (mood_id, activity_type, activity_name) VALUES (?1, ?2, ?3)";
const SELECT_ACTIVITIES: &str = "SELECT activity_type, activity_name FROM mood_activities WHERE mood_id = ?1";
const DELETE_ACTIVITIES: &str = "DELETE FROM mood_activities WHERE mood_id = ?1";

pub struct Moods {
    conn: Connection,
}

impl Moods {
    pub fn new(db: Db) -> Self {
        Moods { conn: db.conn }
    }

    /// Validates and stores a new entry with its tag and activity rows,
    /// returning the fully populated stored entry.
    pub fn save(&mut self, draft: &NewMoodEntry) -> StoreResult<MoodEntry> {
        validate_rating(draft.rating)?;
        validate_emotion(draft.emotion.as_ref())?;

        let entry = draft.into_entry(now_ms());
        let meta = encode_meta(entry.location_meta.as_ref())?;
        self.conn.execute(
            INSERT_ENTRY,
            params![
                entry.id,
                entry.entry_time,
                entry.rating,
                entry.emotion.label(),
                entry.notes,
                entry.location,
                entry.social_context.as_ref().map(|c| c.label()),
                entry.weather.as_ref().map(|w| w.label()),
                meta,
                entry.created_at,
                entry.updated_at,
            ],
        )?;

        self.insert_children(&entry.id, &entry.tags, &entry.activities)?;
        self.get_by_id(&entry.id)?.ok_or_else(|| StoreError::not_found("mood entry", &entry.id))
    }

    /// Returns the entry with its tags and activities reassembled, or
    /// `Ok(None)` when the id is unknown.
    pub fn get_by_id(&mut self, id: &str) -> StoreResult<Option<MoodEntry>> {
        let entry = self.conn.query_row(SELECT_ENTRY, params![id], map_entry_row).optional()?;
        match entry {
            Some(mut entry) => {
                self.attach_children(&mut entry)?;
                Ok(Some(entry))
            }
            None => Ok(None),
        }
    }

    /// One page of entries, newest first. Stepping `offset` by `limit` over
    /// an unmodified dataset partitions all entries without gaps or
    /// duplicates.
    pub fn get_page(&mut self, limit: u32, offset: u32) -> StoreResult<Vec<MoodEntry>> {
        let mut entries = {
            let mut stmt = self.conn.prepare(SELECT_PAGE)?;
            let entry_iter = stmt.query_map(params![limit, offset], map_entry_row)?;
            let mut entries = Vec::new();
            for entry in entry_iter {
                entries.push(entry?);
            }
            entries
        };
        for entry in &mut entries {
            self.attach_children(entry)?;
        }
        Ok(entries)
    }

    /// Applies a partial update. Fields absent from the patch are left
    /// untouched; a `tags` or `activities` field fully replaces the stored
    /// child rows. Fails with `NotFound` when the id does not exist.
    pub fn update(&mut self, id: &str, patch: &MoodPatch) -> StoreResult<MoodEntry> {
        let mut entry = self.get_by_id(id)?.ok_or_else(|| StoreError::not_found("mood entry", id))?;

        if let Some(entry_time) = patch.entry_time {
            entry.entry_time = entry_time;
        }
        if let Some(rating) = patch.rating {
            entry.rating = rating;
        }
        if let Some(emotion) = &patch.emotion {
            entry.emotion = emotion.clone();
        }
        if let Some(notes) = &patch.notes {
            entry.notes = notes.clone();
        }
        if let Some(location) = &patch.location {
            entry.location = location.clone();
        }
        if let Some(context) = &patch.social_context {
            entry.social_context = context.clone();
        }
        if let Some(weather) = &patch.weather {
            entry.weather = weather.clone();
        }
        if let Some(meta) = &patch.location_meta {
            entry.location_meta = meta.clone();
        }

        validate_rating(entry.rating)?;
        validate_emotion(Some(&entry.emotion))?;
        entry.updated_at = now_ms();

        let meta = encode_meta(entry.location_meta.as_ref())?;
        self.conn.execute(
            UPDATE_ENTRY,
            params![
                entry.id,
                entry.entry_time,
                entry.rating,
                entry.emotion.label(),
                entry.notes,
                entry.location,
                entry.social_context.as_ref().map(|c| c.label()),
                entry.weather.as_ref().map(|w| w.label()),
                meta,
                entry.updated_at,
            ],
        )?;

        if let Some(tags) = &patch.tags {
            let mut tags = tags.clone();
            tags.sort();
            tags.dedup();
            self.conn.execute(DELETE_TAGS, params![id])?;
            self.insert_children(id, &tags, &BTreeMap::new())?;
        }
        if let Some(activities) = &patch.activities {
            self.conn.execute(DELETE_ACTIVITIES, params![id])?;
            self.insert_children(id, &[], activities)?;
        }

        self.get_by_id(id)?.ok_or_else(|| StoreError::not_found("mood entry", id))
    }

    /// Deletes the entry; tag and activity rows cascade. Returns whether a
    /// row was actually removed.
    pub fn delete(&mut self, id: &str) -> StoreResult<bool> {
        let affected = self.conn.execute(DELETE_ENTRY, params![id])?;
        Ok(affected > 0)
    }

    /// Inserts tag and activity rows independently: a failed child insert is
    /// logged and the remaining children are still attempted, but the first
    /// error is surfaced once all attempts are done.
    fn insert_children(&self, id: &str, tags: &[String], activities: &BTreeMap<Activity, Intensity>) -> StoreResult<()> {
        let mut first_err: Option<rusqlite::Error> = None;
        for tag in tags {
            if let Err(e) = self.conn.execute(INSERT_TAG, params![id, tag]) {
                warn!(mood_id = id, tag = %tag, error = %e, "failed to insert mood tag");
                first_err.get_or_insert(e);
            }
        }
        for (activity, level) in activities {
            if let Err(e) = self.conn.execute(INSERT_ACTIVITY, params![id, activity.label(), level.label()]) {
                warn!(mood_id = id, activity = activity.label(), error = %e, "failed to insert mood activity");
                first_err.get_or_insert(e);
            }
        }
        match first_err {
            Some(e) => Err(e.into()),
            None => Ok(()),
        }
    }

    fn attach_children(&self, entry: &mut MoodEntry) -> StoreResult<()> {
        let mut stmt = self.conn.prepare(SELECT_TAGS)?;
        let tag_iter = stmt.query_map(params![entry.id], |row| row.get::<_, String>(0))?;
        entry.tags = tag_iter.collect::<Result<Vec<_>, _>>()?;

        let mut stmt = self.conn.prepare(SELECT_ACTIVITIES)?;
        let activity_iter = stmt.query_map(params![entry.id], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
        })?;
        entry.activities = BTreeMap::new();
        for pair in activity_iter {
            let (activity, level) = pair?;
            match (Activity::from_label(&activity), Intensity::from_label(&level)) {
                (Some(activity), Some(level)) => {
                    entry.activities.insert(activity, level);
                }
                _ => {
                    // Unknown vocabulary from a newer schema; skip rather than fail the read.
                    warn!(mood_id = %entry.id, activity = %activity, level = %level, "skipping unrecognized activity row");
                }
            }
        }
        Ok(())
    }
}

fn map_entry_row(row: &Row) -> rusqlite::Result<MoodEntry> {
    Ok(MoodEntry {
        id: row.get(0)?,
        entry_time: row.get(1)?,
        rating: row.get(2)?,
        emotion: Emotion::from_label(&row.get::<_, String>(3)?),
        notes: row.get(4)?,
        location: row.get(5)?,
        social_context: row.get::<_, Option<String>>(6)?.map(|s| SocialContext::from_label(&s)),
        weather: row.get::<_, Option<String>>(7)?.map(|s| Weather::from_label(&s)),
        location_meta: row
            .get::<_, Option<String>>(8)?
            .and_then(|s| serde_json::from_str::<LocationMeta>(&s).ok()),
        tags: Vec::new(),
        activities: BTreeMap::new(),
        created_at: row.get(9)?,
        updated_at: row.get(10)?,
    })
}

fn encode_meta(meta: Option<&LocationMeta>) -> StoreResult<Option<String>> {
    match meta {
        Some(meta) => serde_json::to_string(meta)
            .map(Some)
            .map_err(|e| StoreError::Validation(format!("location metadata could not be encoded: {e}"))),
        None => Ok(None),
    }
}

pub(crate) fn validate_rating(rating: i64) -> StoreResult<()> {
    if !(1..=5).contains(&rating) {
        return Err(StoreError::Validation(format!("rating must be between 1 and 5, got {rating}")));
    }
    Ok(())
}

pub(crate) fn validate_optional_rating(rating: Option<i64>) -> StoreResult<()> {
    match rating {
        Some(rating) => validate_rating(rating),
        None => Ok(()),
    }
}

pub(crate) fn validate_emotion(emotion: Option<&Emotion>) -> StoreResult<()> {
    match emotion {
        Some(emotion) if !emotion.label().trim().is_empty() => Ok(()),
        Some(_) => Err(StoreError::Validation("emotion must be non-empty".to_string())),
        None => Err(StoreError::Validation("emotion is required".to_string())),
    }
}
