//! Food entry repository.
//!
//! Structurally parallel to [`crate::db::moods`]: validated saves, stable
//! descending pagination, partial updates, cascade deletes. The child rows
//! here are people links (`food_people`); the optional place reference is a
//! foreign-key column enforced by SQLite.

use crate::db::db::Db;
use crate::libs::error::{StoreError, StoreResult};
use crate::db::moods::validate_optional_rating;
use crate::libs::food::{FoodEntry, FoodPatch, MealType, NewFoodEntry};
use crate::libs::mood::{now_ms, Emotion};
use rusqlite::{params, Connection, OptionalExtension, Row};
use tracing::warn;

const INSERT_ENTRY: &str = "INSERT INTO food_entries
    (id, entry_time, meal_type, calories, protein, carbs, fat, notes, image_ref, rating, emotion, restaurant, place_id, created_at, updated_at)
    VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15)";
const UPDATE_ENTRY: &str = "UPDATE food_entries SET
    entry_time = ?2, meal_type = ?3, calories = ?4, protein = ?5, carbs = ?6, fat = ?7,
    notes = ?8, image_ref = ?9, rating = ?10, emotion = ?11, restaurant = ?12, place_id = ?13, updated_at = ?14
    WHERE id = ?1";
const DELETE_ENTRY: &str = "DELETE FROM food_entries WHERE id = ?1";
const SELECT_ENTRY: &str = "SELECT id, entry_time, meal_type, calories, protein, carbs, fat, notes, image_ref, rating, emotion, restaurant, place_id, created_at, updated_at
    FROM food_entries WHERE id = ?1";
const SELECT_PAGE: &str = "SELECT id, entry_time, meal_type, calories, protein, carbs, fat, notes, image_ref, rating, emotion, restaurant, place_id, created_at, updated_at
    FROM food_entries ORDER BY entry_time DESC, id DESC LIMIT ?1 OFFSET ?2";

const INSERT_PERSON_LINK: &str = "INSERT OR IGNORE INTO food_people (food_id, person_id) VALUES (?1, ?2)";
const SELECT_PERSON_LINKS: &str = "SELECT person_id FROM food_people WHERE food_id = ?1 ORDER BY person_id";
const DELETE_PERSON_LINKS: &str = "DELETE FROM food_people WHERE food_id = ?1";

pub struct Foods {
    conn: Connection,
}

impl Foods {
    pub fn new(db: Db) -> Self {
        Foods { conn: db.conn }
    }

    /// Validates and stores a new food entry with its people links.
    pub fn save(&mut self, draft: &NewFoodEntry) -> StoreResult<FoodEntry> {
        validate_macros(draft.calories, draft.protein, draft.carbs, draft.fat)?;
        validate_optional_rating(draft.rating)?;

        let entry = draft.into_entry(now_ms());
        self.conn.execute(
            INSERT_ENTRY,
            params![
                entry.id,
                entry.entry_time,
                entry.meal_type.label(),
                entry.calories,
                entry.protein,
                entry.carbs,
                entry.fat,
                entry.notes,
                entry.image_ref,
                entry.rating,
                entry.emotion.as_ref().map(|e| e.label()),
                entry.restaurant,
                entry.place_id,
                entry.created_at,
                entry.updated_at,
            ],
        )?;

        self.insert_people(&entry.id, &entry.people)?;
        self.get_by_id(&entry.id)?.ok_or_else(|| StoreError::not_found("food entry", &entry.id))
    }

    /// Returns the entry with its people links reassembled, or `Ok(None)`.
    pub fn get_by_id(&mut self, id: &str) -> StoreResult<Option<FoodEntry>> {
        let entry = self.conn.query_row(SELECT_ENTRY, params![id], map_entry_row).optional()?;
        match entry {
            Some(mut entry) => {
                entry.people = self.people_for(&entry.id)?;
                Ok(Some(entry))
            }
            None => Ok(None),
        }
    }

    /// One page of food entries, newest first.
    pub fn get_page(&mut self, limit: u32, offset: u32) -> StoreResult<Vec<FoodEntry>> {
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
            entry.people = self.people_for(&entry.id)?;
        }
        Ok(entries)
    }

    /// Partial update; a `people` or `place_id` field in the patch fully
    /// replaces the stored association.
    pub fn update(&mut self, id: &str, patch: &FoodPatch) -> StoreResult<FoodEntry> {
        let mut entry = self.get_by_id(id)?.ok_or_else(|| StoreError::not_found("food entry", id))?;

        if let Some(entry_time) = patch.entry_time {
            entry.entry_time = entry_time;
        }
        if let Some(meal_type) = patch.meal_type {
            entry.meal_type = meal_type;
        }
        if let Some(calories) = patch.calories {
            entry.calories = calories;
        }
        if let Some(protein) = patch.protein {
            entry.protein = protein;
        }
        if let Some(carbs) = patch.carbs {
            entry.carbs = carbs;
        }
        if let Some(fat) = patch.fat {
            entry.fat = fat;
        }
        if let Some(notes) = &patch.notes {
            entry.notes = notes.clone();
        }
        if let Some(image_ref) = &patch.image_ref {
            entry.image_ref = image_ref.clone();
        }
        if let Some(rating) = patch.rating {
            entry.rating = rating;
        }
        if let Some(emotion) = &patch.emotion {
            entry.emotion = emotion.clone();
        }
        if let Some(restaurant) = patch.restaurant {
            entry.restaurant = restaurant;
        }
        if let Some(place_id) = &patch.place_id {
            entry.place_id = place_id.clone();
        }

        validate_macros(entry.calories, entry.protein, entry.carbs, entry.fat)?;
        validate_optional_rating(entry.rating)?;
        entry.updated_at = now_ms();

        self.conn.execute(
            UPDATE_ENTRY,
            params![
                entry.id,
                entry.entry_time,
                entry.meal_type.label(),
                entry.calories,
                entry.protein,
                entry.carbs,
                entry.fat,
                entry.notes,
                entry.image_ref,
                entry.rating,
                entry.emotion.as_ref().map(|e| e.label()),
                entry.restaurant,
                entry.place_id,
                entry.updated_at,
            ],
        )?;

        if let Some(people) = &patch.people {
            let mut people = people.clone();
            people.sort();
            people.dedup();
            self.conn.execute(DELETE_PERSON_LINKS, params![id])?;
            self.insert_people(id, &people)?;
        }

        self.get_by_id(id)?.ok_or_else(|| StoreError::not_found("food entry", id))
    }

    /// Deletes the entry; people links cascade. Returns whether a row was
    /// removed.
    pub fn delete(&mut self, id: &str) -> StoreResult<bool> {
        let affected = self.conn.execute(DELETE_ENTRY, params![id])?;
        Ok(affected > 0)
    }

    fn insert_people(&self, id: &str, people: &[String]) -> StoreResult<()> {
        let mut first_err: Option<rusqlite::Error> = None;
        for person_id in people {
            if let Err(e) = self.conn.execute(INSERT_PERSON_LINK, params![id, person_id]) {
                warn!(food_id = id, person_id = %person_id, error = %e, "failed to link person to food entry");
                first_err.get_or_insert(e);
            }
        }
        match first_err {
            Some(e) => Err(e.into()),
            None => Ok(()),
        }
    }

    fn people_for(&self, id: &str) -> StoreResult<Vec<String>> {
        let mut stmt = self.conn.prepare(SELECT_PERSON_LINKS)?;
        let people = stmt
            .query_map(params![id], |row| row.get::<_, String>(0))?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(people)
    }
}

fn map_entry_row(row: &Row) -> rusqlite::Result<FoodEntry> {
    let meal_label: String = row.get(2)?;
    let meal_type = MealType::from_label(&meal_label).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(2, rusqlite::types::Type::Text, format!("unknown meal type: {meal_label}").into())
    })?;
    Ok(FoodEntry {
        id: row.get(0)?,
        entry_time: row.get(1)?,
        meal_type,
        calories: row.get(3)?,
        protein: row.get(4)?,
        carbs: row.get(5)?,
        fat: row.get(6)?,
        notes: row.get(7)?,
        image_ref: row.get(8)?,
        rating: row.get(9)?,
        emotion: row.get::<_, Option<String>>(10)?.map(|s| Emotion::from_label(&s)),
        restaurant: row.get(11)?,
        place_id: row.get(12)?,
        people: Vec::new(),
        created_at: row.get(13)?,
        updated_at: row.get(14)?,
    })
}

fn validate_macros(calories: f64, protein: f64, carbs: f64, fat: f64) -> StoreResult<()> {
    for (name, value) in [("calories", calories), ("protein", protein), ("carbs", carbs), ("fat", fat)] {
        if value < 0.0 || !value.is_finite() {
            return Err(StoreError::Validation(format!("{name} must be a non-negative number, got {value}")));
        }
    }
    Ok(())
}
