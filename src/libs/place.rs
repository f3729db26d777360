//! Place registry domain types.

use crate::libs::id::new_id;

/// One named place that mood and food entries can reference.
#[derive(Debug, Clone, PartialEq)]
pub struct Place {
    pub id: String,
    pub name: String,
    pub address: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub notes: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Input for [`crate::db::places::Places::create`].
#[derive(Debug, Clone, Default)]
pub struct NewPlace {
    pub id: Option<String>,
    pub name: String,
    pub address: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub notes: Option<String>,
}

impl NewPlace {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Self::default()
        }
    }

    pub(crate) fn into_place(&self, now_ms: i64) -> Place {
        Place {
            id: self.id.clone().unwrap_or_else(new_id),
            name: self.name.clone(),
            address: self.address.clone(),
            latitude: self.latitude,
            longitude: self.longitude,
            notes: self.notes.clone(),
            created_at: now_ms,
            updated_at: now_ms,
        }
    }
}

/// Partial update for a place.
#[derive(Debug, Clone, Default)]
pub struct PlacePatch {
    pub name: Option<String>,
    pub address: Option<Option<String>>,
    pub latitude: Option<Option<f64>>,
    pub longitude: Option<Option<f64>>,
    pub notes: Option<Option<String>>,
}
