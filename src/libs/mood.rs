//! Mood entry domain types.
//!
//! A [`MoodEntry`] is one user-reported mood sample: a 1-5 rating, an emotion
//! label, optional notes and contextual labels, a set of free-text tags, and
//! a map of activity categories to intensity levels. The contextual labels
//! that allow ad hoc user input (social context, weather) are closed enums
//! with an `Other` fallback so unknown labels survive a round trip through
//! the store.

use crate::libs::id::new_id;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Fixed emotion vocabulary, with a fallback for labels added later.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Emotion {
    Happy,
    Excited,
    Grateful,
    Calm,
    Neutral,
    Bored,
    Anxious,
    Stressed,
    Sad,
    Angry,
    Tired,
    Other(String),
}

impl Emotion {
    pub fn label(&self) -> &str {
        match self {
            Emotion::Happy => "Happy",
            Emotion::Excited => "Excited",
            Emotion::Grateful => "Grateful",
            Emotion::Calm => "Calm",
            Emotion::Neutral => "Neutral",
            Emotion::Bored => "Bored",
            Emotion::Anxious => "Anxious",
            Emotion::Stressed => "Stressed",
            Emotion::Sad => "Sad",
            Emotion::Angry => "Angry",
            Emotion::Tired => "Tired",
            Emotion::Other(label) => label,
        }
    }

    pub fn from_label(label: &str) -> Self {
        match label {
            "Happy" => Emotion::Happy,
            "Excited" => Emotion::Excited,
            "Grateful" => Emotion::Grateful,
            "Calm" => Emotion::Calm,
            "Neutral" => Emotion::Neutral,
            "Bored" => Emotion::Bored,
            "Anxious" => Emotion::Anxious,
            "Stressed" => Emotion::Stressed,
            "Sad" => Emotion::Sad,
            "Angry" => Emotion::Angry,
            "Tired" => Emotion::Tired,
            other => Emotion::Other(other.to_string()),
        }
    }
}

impl fmt::Display for Emotion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Social setting of a mood sample.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SocialContext {
    Alone,
    Family,
    Friends,
    Partner,
    Colleagues,
    Crowd,
    Other(String),
}

impl SocialContext {
    pub fn label(&self) -> &str {
        match self {
            SocialContext::Alone => "Alone",
            SocialContext::Family => "Family",
            SocialContext::Friends => "Friends",
            SocialContext::Partner => "Partner",
            SocialContext::Colleagues => "Colleagues",
            SocialContext::Crowd => "Crowd",
            SocialContext::Other(label) => label,
        }
    }

    pub fn from_label(label: &str) -> Self {
        match label {
            "Alone" => SocialContext::Alone,
            "Family" => SocialContext::Family,
            "Friends" => SocialContext::Friends,
            "Partner" => SocialContext::Partner,
            "Colleagues" => SocialContext::Colleagues,
            "Crowd" => SocialContext::Crowd,
            other => SocialContext::Other(other.to_string()),
        }
    }
}

impl fmt::Display for SocialContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Weather condition at entry time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Weather {
    Sunny,
    Cloudy,
    Rainy,
    Snowy,
    Stormy,
    Foggy,
    Other(String),
}

impl Weather {
    pub fn label(&self) -> &str {
        match self {
            Weather::Sunny => "Sunny",
            Weather::Cloudy => "Cloudy",
            Weather::Rainy => "Rainy",
            Weather::Snowy => "Snowy",
            Weather::Stormy => "Stormy",
            Weather::Foggy => "Foggy",
            Weather::Other(label) => label,
        }
    }

    pub fn from_label(label: &str) -> Self {
        match label {
            "Sunny" => Weather::Sunny,
            "Cloudy" => Weather::Cloudy,
            "Rainy" => Weather::Rainy,
            "Snowy" => Weather::Snowy,
            "Stormy" => Weather::Stormy,
            "Foggy" => Weather::Foggy,
            other => Weather::Other(other.to_string()),
        }
    }
}

impl fmt::Display for Weather {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Closed activity category vocabulary. Each entry carries at most one
/// intensity per category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Activity {
    Exercise,
    Work,
    Study,
    Social,
    Outdoors,
    Creative,
    Chores,
    Rest,
    Screen,
    Travel,
}

impl Activity {
    pub fn label(&self) -> &'static str {
        match self {
            Activity::Exercise => "Exercise",
            Activity::Work => "Work",
            Activity::Study => "Study",
            Activity::Social => "Social",
            Activity::Outdoors => "Outdoors",
            Activity::Creative => "Creative",
            Activity::Chores => "Chores",
            Activity::Rest => "Rest",
            Activity::Screen => "Screen",
            Activity::Travel => "Travel",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        match label {
            "Exercise" => Some(Activity::Exercise),
            "Work" => Some(Activity::Work),
            "Study" => Some(Activity::Study),
            "Social" => Some(Activity::Social),
            "Outdoors" => Some(Activity::Outdoors),
            "Creative" => Some(Activity::Creative),
            "Chores" => Some(Activity::Chores),
            "Rest" => Some(Activity::Rest),
            "Screen" => Some(Activity::Screen),
            "Travel" => Some(Activity::Travel),
            _ => None,
        }
    }
}

impl fmt::Display for Activity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Intensity level recorded for an activity category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Intensity {
    Low,
    Medium,
    High,
}

impl Intensity {
    pub fn label(&self) -> &'static str {
        match self {
            Intensity::Low => "Low",
            Intensity::Medium => "Medium",
            Intensity::High => "High",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        match label {
            "Low" => Some(Intensity::Low),
            "Medium" => Some(Intensity::Medium),
            "High" => Some(Intensity::High),
            _ => None,
        }
    }
}

impl fmt::Display for Intensity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Structured payload behind a free-text location label.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LocationMeta {
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub description: Option<String>,
}

/// One stored mood sample, with its child rows reassembled.
#[derive(Debug, Clone, PartialEq)]
pub struct MoodEntry {
    pub id: String,
    /// Epoch milliseconds; the sole ordering key for pagination.
    pub entry_time: i64,
    /// Rating in `[1, 5]`.
    pub rating: i64,
    pub emotion: Emotion,
    pub notes: Option<String>,
    pub location: Option<String>,
    pub social_context: Option<SocialContext>,
    pub weather: Option<Weather>,
    pub location_meta: Option<LocationMeta>,
    pub tags: Vec<String>,
    pub activities: BTreeMap<Activity, Intensity>,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Input for [`crate::db::moods::Moods::save`]. Missing id and entry time are
/// filled in at save time.
#[derive(Debug, Clone, Default)]
pub struct NewMoodEntry {
    pub id: Option<String>,
    pub entry_time: Option<i64>,
    pub rating: i64,
    pub emotion: Option<Emotion>,
    pub notes: Option<String>,
    pub location: Option<String>,
    pub social_context: Option<SocialContext>,
    pub weather: Option<Weather>,
    pub location_meta: Option<LocationMeta>,
    pub tags: Vec<String>,
    pub activities: BTreeMap<Activity, Intensity>,
}

impl NewMoodEntry {
    pub fn new(rating: i64, emotion: Emotion) -> Self {
        Self {
            rating,
            emotion: Some(emotion),
            ..Self::default()
        }
    }

    /// Materializes the draft into a stored entry, generating the id and
    /// defaulting the entry time to now.
    pub(crate) fn into_entry(&self, now_ms: i64) -> MoodEntry {
        let mut tags = self.tags.clone();
        tags.sort();
        tags.dedup();
        MoodEntry {
            id: self.id.clone().unwrap_or_else(new_id),
            entry_time: self.entry_time.unwrap_or(now_ms),
            rating: self.rating,
            emotion: self.emotion.clone().unwrap_or(Emotion::Other(String::new())),
            notes: self.notes.clone(),
            location: self.location.clone(),
            social_context: self.social_context.clone(),
            weather: self.weather.clone(),
            location_meta: self.location_meta.clone(),
            tags,
            activities: self.activities.clone(),
            created_at: now_ms,
            updated_at: now_ms,
        }
    }
}

/// Partial update for a stored entry. `None` leaves a field untouched; the
/// double `Option` on nullable fields distinguishes "leave as is" from
/// "clear". Tags and activities, when present, fully replace the stored sets.
#[derive(Debug, Clone, Default)]
pub struct MoodPatch {
    pub entry_time: Option<i64>,
    pub rating: Option<i64>,
    pub emotion: Option<Emotion>,
    pub notes: Option<Option<String>>,
    pub location: Option<Option<String>>,
    pub social_context: Option<Option<SocialContext>>,
    pub weather: Option<Option<Weather>>,
    pub location_meta: Option<Option<LocationMeta>>,
    pub tags: Option<Vec<String>>,
    pub activities: Option<BTreeMap<Activity, Intensity>>,
}

/// Current time as epoch milliseconds.
pub fn now_ms() -> i64 {
    Utc::now().timestamp_millis()
}
