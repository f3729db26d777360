//! Opaque identifier generation for stored entities.
//!
//! Every entity row (mood entry, food entry, person, place) is keyed by a
//! unique string id that carries no meaning beyond identity. Ids are UUID v4
//! in canonical string form; they are generated once at save time and never
//! reused.

use uuid::Uuid;

/// Generates a fresh opaque entity id.
pub fn new_id() -> String {
    Uuid::new_v4().to_string()
}
