//! Food entry domain types, structurally parallel to the mood journal.

use crate::libs::id::new_id;
use crate::libs::mood::Emotion;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Meal classification for a logged food entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MealType {
    Breakfast,
    Lunch,
    Dinner,
    Snack,
    Drink,
}

impl MealType {
    pub fn label(&self) -> &'static str {
        match self {
            MealType::Breakfast => "Breakfast",
            MealType::Lunch => "Lunch",
            MealType::Dinner => "Dinner",
            MealType::Snack => "Snack",
            MealType::Drink => "Drink",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        match label {
            "Breakfast" => Some(MealType::Breakfast),
            "Lunch" => Some(MealType::Lunch),
            "Dinner" => Some(MealType::Dinner),
            "Snack" => Some(MealType::Snack),
            "Drink" => Some(MealType::Drink),
            _ => None,
        }
    }
}

impl fmt::Display for MealType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One logged meal or snack, with linked people and an optional place.
#[derive(Debug, Clone, PartialEq)]
pub struct FoodEntry {
    pub id: String,
    /// Epoch milliseconds; ordering key for pagination.
    pub entry_time: i64,
    pub meal_type: MealType,
    pub calories: f64,
    pub protein: f64,
    pub carbs: f64,
    pub fat: f64,
    pub notes: Option<String>,
    pub image_ref: Option<String>,
    /// Optional mood attached to the meal, same `[1, 5]` scale.
    pub rating: Option<i64>,
    pub emotion: Option<Emotion>,
    pub restaurant: bool,
    /// Ids of linked people, via the `food_people` link table.
    pub people: Vec<String>,
    pub place_id: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Input for [`crate::db::foods::Foods::save`].
#[derive(Debug, Clone)]
pub struct NewFoodEntry {
    pub id: Option<String>,
    pub entry_time: Option<i64>,
    pub meal_type: MealType,
    pub calories: f64,
    pub protein: f64,
    pub carbs: f64,
    pub fat: f64,
    pub notes: Option<String>,
    pub image_ref: Option<String>,
    pub rating: Option<i64>,
    pub emotion: Option<Emotion>,
    pub restaurant: bool,
    pub people: Vec<String>,
    pub place_id: Option<String>,
}

impl NewFoodEntry {
    pub fn new(meal_type: MealType) -> Self {
        Self {
            id: None,
            entry_time: None,
            meal_type,
            calories: 0.0,
            protein: 0.0,
            carbs: 0.0,
            fat: 0.0,
            notes: None,
            image_ref: None,
            rating: None,
            emotion: None,
            restaurant: false,
            people: Vec::new(),
            place_id: None,
        }
    }

    pub(crate) fn into_entry(&self, now_ms: i64) -> FoodEntry {
        let mut people = self.people.clone();
        people.sort();
        people.dedup();
        FoodEntry {
            id: self.id.clone().unwrap_or_else(new_id),
            entry_time: self.entry_time.unwrap_or(now_ms),
            meal_type: self.meal_type,
            calories: self.calories,
            protein: self.protein,
            carbs: self.carbs,
            fat: self.fat,
            notes: self.notes.clone(),
            image_ref: self.image_ref.clone(),
            rating: self.rating,
            emotion: self.emotion.clone(),
            restaurant: self.restaurant,
            people,
            place_id: self.place_id.clone(),
            created_at: now_ms,
            updated_at: now_ms,
        }
    }
}

/// Partial update for a stored food entry. `people` and `place_id`, when
/// present, fully replace the stored associations.
#[derive(Debug, Clone, Default)]
pub struct FoodPatch {
    pub entry_time: Option<i64>,
    pub meal_type: Option<MealType>,
    pub calories: Option<f64>,
    pub protein: Option<f64>,
    pub carbs: Option<f64>,
    pub fat: Option<f64>,
    pub notes: Option<Option<String>>,
    pub image_ref: Option<Option<String>>,
    pub rating: Option<Option<i64>>,
    pub emotion: Option<Option<Emotion>>,
    pub restaurant: Option<bool>,
    pub people: Option<Vec<String>>,
    pub place_id: Option<Option<String>>,
}
