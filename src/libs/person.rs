//! Person registry domain types.

use crate::libs::id::new_id;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Relationship context for a person, with a fallback for ad hoc labels.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Relationship {
    Family,
    Friend,
    Partner,
    Colleague,
    Acquaintance,
    Other(String),
}

impl Relationship {
    pub fn label(&self) -> &str {
        match self {
            Relationship::Family => "Family",
            Relationship::Friend => "Friend",
            Relationship::Partner => "Partner",
            Relationship::Colleague => "Colleague",
            Relationship::Acquaintance => "Acquaintance",
            Relationship::Other(label) => label,
        }
    }

    pub fn from_label(label: &str) -> Self {
        match label {
            "Family" => Relationship::Family,
            "Friend" => Relationship::Friend,
            "Partner" => Relationship::Partner,
            "Colleague" => Relationship::Colleague,
            "Acquaintance" => Relationship::Acquaintance,
            other => Relationship::Other(other.to_string()),
        }
    }
}

impl fmt::Display for Relationship {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One person a journal entry can reference.
#[derive(Debug, Clone, PartialEq)]
pub struct Person {
    pub id: String,
    pub name: String,
    pub relationship: Option<Relationship>,
    pub status: Option<String>,
    pub birth_date: Option<NaiveDate>,
    pub deceased: bool,
    pub deceased_date: Option<NaiveDate>,
    pub phone: Option<String>,
    pub email: Option<String>,
    /// Stored as typed rows in `person_tags` (kind = "hobby").
    pub hobbies: Vec<String>,
    /// Stored as typed rows in `person_tags` (kind = "interest").
    pub interests: Vec<String>,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Input for [`crate::db::people::People::create`].
#[derive(Debug, Clone, Default)]
pub struct NewPerson {
    pub id: Option<String>,
    pub name: String,
    pub relationship: Option<Relationship>,
    pub status: Option<String>,
    pub birth_date: Option<NaiveDate>,
    pub deceased: bool,
    pub deceased_date: Option<NaiveDate>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub hobbies: Vec<String>,
    pub interests: Vec<String>,
}

impl NewPerson {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Self::default()
        }
    }

    pub(crate) fn into_person(&self, now_ms: i64) -> Person {
        let dedup = |list: &[String]| {
            let mut v = list.to_vec();
            v.sort();
            v.dedup();
            v
        };
        Person {
            id: self.id.clone().unwrap_or_else(new_id),
            name: self.name.clone(),
            relationship: self.relationship.clone(),
            status: self.status.clone(),
            birth_date: self.birth_date,
            deceased: self.deceased,
            deceased_date: self.deceased_date,
            phone: self.phone.clone(),
            email: self.email.clone(),
            hobbies: dedup(&self.hobbies),
            interests: dedup(&self.interests),
            created_at: now_ms,
            updated_at: now_ms,
        }
    }
}

/// Partial update for a person. Hobby and interest lists, when present,
/// fully replace the stored rows.
#[derive(Debug, Clone, Default)]
pub struct PersonPatch {
    pub name: Option<String>,
    pub relationship: Option<Option<Relationship>>,
    pub status: Option<Option<String>>,
    pub birth_date: Option<Option<NaiveDate>>,
    pub deceased: Option<bool>,
    pub deceased_date: Option<Option<NaiveDate>>,
    pub phone: Option<Option<String>>,
    pub email: Option<Option<String>>,
    pub hobbies: Option<Vec<String>>,
    pub interests: Option<Vec<String>>,
}
