//! Place registry repository and the place-to-mood link table.

use crate::db::db::Db;
use crate::libs::error::{StoreError, StoreResult};
use crate::libs::mood::now_ms;
use crate::libs::place::{NewPlace, Place, PlacePatch};
use rusqlite::{params, Connection, OptionalExtension, Row};

const INSERT_PLACE: &str = "INSERT INTO places (id, name, address, latitude, longitude, notes, created_at, updated_at)
    VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)";
const UPDATE_PLACE: &str = "UPDATE places SET name = ?2, address = ?3, latitude = ?4, longitude = ?5, notes = ?6, updated_at = ?7
    WHERE id = ?1";
const DELETE_PLACE: &str = "DELETE FROM places WHERE id = ?1";
const SELECT_PLACE: &str = "SELECT id, name, address, latitude, longitude, notes, created_at, updated_at FROM places WHERE id = ?1";
const SELECT_ALL: &str = "SELECT id, name, address, latitude, longitude, notes, created_at, updated_at FROM places ORDER BY name, id";

const INSERT_MOOD_LINK: &str = "INSERT OR IGNORE INTO place_moods (place_id, mood_id) VALUES (?1, ?2)";
const DELETE_MOOD_LINK: &str = "DELETE FROM place_moods WHERE place_id = ?1 AND mood_id = ?2";
const SELECT_MOODS_BY_PLACE: &str = "
    SELECT m.id FROM mood_entries m
    JOIN place_moods pm ON m.id = pm.mood_id
    WHERE pm.place_id = ?1
    ORDER BY m.entry_time DESC, m.id DESC
";

pub struct Places {
    conn: Connection,
}

impl Places {
    pub fn new(db: Db) -> Self {
        Places { conn: db.conn }
    }

    pub fn create(&mut self, draft: &NewPlace) -> StoreResult<Place> {
        if draft.name.trim().is_empty() {
            return Err(StoreError::Validation("place name is required".to_string()));
        }

        let place = draft.into_place(now_ms());
        self.conn.execute(
            INSERT_PLACE,
            params![
                place.id,
                place.name,
                place.address,
                place.latitude,
                place.longitude,
                place.notes,
                place.created_at,
                place.updated_at,
            ],
        )?;
        Ok(place)
    }

    pub fn get_by_id(&mut self, id: &str) -> StoreResult<Option<Place>> {
        let place = self.conn.query_row(SELECT_PLACE, params![id], map_place_row).optional()?;
        Ok(place)
    }

    pub fn list(&mut self) -> StoreResult<Vec<Place>> {
        let mut stmt = self.conn.prepare(SELECT_ALL)?;
        let place_iter = stmt.query_map([], map_place_row)?;
        let mut places = Vec::new();
        for place in place_iter {
            places.push(place?);
        }
        Ok(places)
    }

    pub fn update(&mut self, id: &str, patch: &PlacePatch) -> StoreResult<Place> {
        let mut place = self.get_by_id(id)?.ok_or_else(|| StoreError::not_found("place", id))?;

        if let Some(name) = &patch.name {
            place.name = name.clone();
        }
        if let Some(address) = &patch.address {
            place.address = address.clone();
        }
        if let Some(latitude) = patch.latitude {
            place.latitude = latitude;
        }
        if let Some(longitude) = patch.longitude {
            place.longitude = longitude;
        }
        if let Some(notes) = &patch.notes {
            place.notes = notes.clone();
        }

        if place.name.trim().is_empty() {
            return Err(StoreError::Validation("place name is required".to_string()));
        }
        place.updated_at = now_ms();

        self.conn.execute(
            UPDATE_PLACE,
            params![place.id, place.name, place.address, place.latitude, place.longitude, place.notes, place.updated_at],
        )?;
        Ok(place)
    }

    /// Deletes the place; `place_moods` links cascade and food entries keep
    /// their rows with the place reference cleared.
    pub fn delete(&mut self, id: &str) -> StoreResult<bool> {
        let affected = self.conn.execute(DELETE_PLACE, params![id])?;
        Ok(affected > 0)
    }

    /// Links a mood entry to this place. Both rows must exist; SQLite
    /// enforces the foreign keys.
    pub fn link_mood(&mut self, place_id: &str, mood_id: &str) -> StoreResult<()> {
        self.conn.execute(INSERT_MOOD_LINK, params![place_id, mood_id])?;
        Ok(())
    }

    pub fn unlink_mood(&mut self, place_id: &str, mood_id: &str) -> StoreResult<bool> {
        let affected = self.conn.execute(DELETE_MOOD_LINK, params![place_id, mood_id])?;
        Ok(affected > 0)
    }

    /// Ids of mood entries linked to this place, newest first.
    pub fn moods_for_place(&mut self, place_id: &str) -> StoreResult<Vec<String>> {
        let mut stmt = self.conn.prepare(SELECT_MOODS_BY_PLACE)?;
        let ids = stmt
            .query_map(params![place_id], |row| row.get::<_, String>(0))?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(ids)
    }
}

fn map_place_row(row: &Row) -> rusqlite::Result<Place> {
    Ok(Place {
        id: row.get(0)?,
        name: row.get(1)?,
        address: row.get(2)?,
        latitude: row.get(3)?,
        longitude: row.get(4)?,
        notes: row.get(5)?,
        created_at: row.get(6)?,
        updated_at: row.get(7)?,
    })
}
