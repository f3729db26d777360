//! People registry repository.
//!
//! Persons carry two tag lists (hobbies and interests) stored as typed rows
//! in `person_tags`, keyed by (person_id, kind, value). Updating either list
//! replaces the stored rows for that kind; deleting a person cascades to its
//! tag rows and any `food_people` links.

use crate::db::db::Db;
use crate::libs::error::{StoreError, StoreResult};
use crate::libs::mood::now_ms;
use crate::libs::person::{NewPerson, Person, PersonPatch, Relationship};
use chrono::NaiveDate;
use rusqlite::{params, Connection, OptionalExtension, Row};

const INSERT_PERSON: &str = "INSERT INTO people
    (id, name, relationship, status, birth_date, deceased, deceased_date, phone, email, created_at, updated_at)
    VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)";
const UPDATE_PERSON: &str = "UPDATE people SET
    name = ?2, relationship = ?3, status = ?4, birth_date = ?5, deceased = ?6,
    deceased_date = ?7, phone = ?8, email = ?9, updated_at = ?10
    WHERE id = ?1";
const DELETE_PERSON: &str = "DELETE FROM people WHERE id = ?1";
const SELECT_PERSON: &str = "SELECT id, name, relationship, status, birth_date, deceased, deceased_date, phone, email, created_at, updated_at
    FROM people WHERE id = ?1";
const SELECT_ALL: &str = "SELECT id, name, relationship, status, birth_date, deceased, deceased_date, phone, email, created_at, updated_at
    FROM people ORDER BY name, id";

const INSERT_TAG: &str = "INSERT OR IGNORE INTO person_tags (person_id, kind, value) VALUES (?1, ?2, ?3)";
const SELECT_TAGS: &str = "SELECT value FROM person_tags WHERE person_id = ?1 AND kind = ?2 ORDER BY value";
const DELETE_TAGS: &str = "DELETE FROM person_tags WHERE person_id = ?1 AND kind = ?2";

const KIND_HOBBY: &str = "hobby";
const KIND_INTEREST: &str = "interest";

const DATE_FORMAT: &str = "%Y-%m-%d";

pub struct People {
    conn: Connection,
}

impl People {
    pub fn new(db: Db) -> Self {
        People { conn: db.conn }
    }

    pub fn create(&mut self, draft: &NewPerson) -> StoreResult<Person> {
        if draft.name.trim().is_empty() {
            return Err(StoreError::Validation("person name is required".to_string()));
        }

        let person = draft.into_person(now_ms());
        self.conn.execute(
            INSERT_PERSON,
            params![
                person.id,
                person.name,
                person.relationship.as_ref().map(|r| r.label()),
                person.status,
                person.birth_date.map(|d| d.format(DATE_FORMAT).to_string()),
                person.deceased,
                person.deceased_date.map(|d| d.format(DATE_FORMAT).to_string()),
                person.phone,
                person.email,
                person.created_at,
                person.updated_at,
            ],
        )?;
        self.replace_tags(&person.id, KIND_HOBBY, &person.hobbies)?;
        self.replace_tags(&person.id, KIND_INTEREST, &person.interests)?;

        self.get_by_id(&person.id)?.ok_or_else(|| StoreError::not_found("person", &person.id))
    }

    pub fn get_by_id(&mut self, id: &str) -> StoreResult<Option<Person>> {
        let person = self.conn.query_row(SELECT_PERSON, params![id], map_person_row).optional()?;
        match person {
            Some(mut person) => {
                self.attach_tags(&mut person)?;
                Ok(Some(person))
            }
            None => Ok(None),
        }
    }

    pub fn list(&mut self) -> StoreResult<Vec<Person>> {
        let mut people = {
            let mut stmt = self.conn.prepare(SELECT_ALL)?;
            let person_iter = stmt.query_map([], map_person_row)?;
            let mut people = Vec::new();
            for person in person_iter {
                people.push(person?);
            }
            people
        };
        for person in &mut people {
            self.attach_tags(person)?;
        }
        Ok(people)
    }

    /// Partial update; `hobbies` or `interests` in the patch replace the
    /// stored rows of that kind.
    pub fn update(&mut self, id: &str, patch: &PersonPatch) -> StoreResult<Person> {
        let mut person = self.get_by_id(id)?.ok_or_else(|| StoreError::not_found("person", id))?;

        if let Some(name) = &patch.name {
            person.name = name.clone();
        }
        if let Some(relationship) = &patch.relationship {
            person.relationship = relationship.clone();
        }
        if let Some(status) = &patch.status {
            person.status = status.clone();
        }
        if let Some(birth_date) = patch.birth_date {
            person.birth_date = birth_date;
        }
        if let Some(deceased) = patch.deceased {
            person.deceased = deceased;
        }
        if let Some(deceased_date) = patch.deceased_date {
            person.deceased_date = deceased_date;
        }
        if let Some(phone) = &patch.phone {
            person.phone = phone.clone();
        }
        if let Some(email) = &patch.email {
            person.email = email.clone();
        }

        if person.name.trim().is_empty() {
            return Err(StoreError::Validation("person name is required".to_string()));
        }
        person.updated_at = now_ms();

        self.conn.execute(
            UPDATE_PERSON,
            params![
                person.id,
                person.name,
                person.relationship.as_ref().map(|r| r.label()),
                person.status,
                person.birth_date.map(|d| d.format(DATE_FORMAT).to_string()),
                person.deceased,
                person.deceased_date.map(|d| d.format(DATE_FORMAT).to_string()),
                person.phone,
                person.email,
                person.updated_at,
            ],
        )?;

        if let Some(hobbies) = &patch.hobbies {
            self.replace_tags(id, KIND_HOBBY, hobbies)?;
        }
        if let Some(interests) = &patch.interests {
            self.replace_tags(id, KIND_INTEREST, interests)?;
        }

        self.get_by_id(id)?.ok_or_else(|| StoreError::not_found("person", id))
    }

    /// Deletes the person; tag rows and food links cascade.
    pub fn delete(&mut self, id: &str) -> StoreResult<bool> {
        let affected = self.conn.execute(DELETE_PERSON, params![id])?;
        Ok(affected > 0)
    }

    fn replace_tags(&self, id: &str, kind: &str, values: &[String]) -> StoreResult<()> {
        self.conn.execute(DELETE_TAGS, params![id, kind])?;
        for value in values {
            self.conn.execute(INSERT_TAG, params![id, kind, value])?;
        }
        Ok(())
    }

    fn attach_tags(&self, person: &mut Person) -> StoreResult<()> {
        person.hobbies = self.tags_for(&person.id, KIND_HOBBY)?;
        person.interests = self.tags_for(&person.id, KIND_INTEREST)?;
        Ok(())
    }

    fn tags_for(&self, id: &str, kind: &str) -> StoreResult<Vec<String>> {
        let mut stmt = self.conn.prepare(SELECT_TAGS)?;
        let values = stmt
            .query_map(params![id, kind], |row| row.get::<_, String>(0))?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(values)
    }
}

fn map_person_row(row: &Row) -> rusqlite::Result<Person> {
    let parse_date = |value: Option<String>| value.and_then(|s| NaiveDate::parse_from_str(&s, DATE_FORMAT).ok());
    Ok(Person {
        id: row.get(0)?,
        name: row.get(1)?,
        relationship: row.get::<_, Option<String>>(2)?.map(|s| Relationship::from_label(&s)),
        status: row.get(3)?,
        birth_date: parse_date(row.get(4)?),
        deceased: row.get(5)?,
        deceased_date: parse_date(row.get(6)?),
        phone: row.get(7)?,
        email: row.get(8)?,
        hobbies: Vec::new(),
        interests: Vec::new(),
        created_at: row.get(9)?,
        updated_at: row.get(10)?,
    })
}
