use crate::models::food::{Food, Macros};
use crate::models::new_id;
use crate::models::numbers::{lenient_f64, lenient_string};
use serde::{Deserialize, Serialize};

/// Maximum number of favorites kept; the oldest drop off first.
pub const MAX_FAVORITES: usize = 12;

/// A food saved for one-step logging.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Favorite {
    #[serde(default, deserialize_with = "lenient_string")]
    pub id: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub food: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub brand: String,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub serving_size: f64,
    #[serde(default, deserialize_with = "lenient_string")]
    pub serving_unit: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub notes: String,
    #[serde(default)]
    pub per_serving: Macros,
}

impl Favorite {
    pub fn from_food(food: &Food) -> Self {
        Self {
            id: new_id(),
            food: food.food.clone(),
            brand: food.brand.clone(),
            serving_size: food.serving_size,
            serving_unit: food.serving_unit.clone(),
            notes: food.notes.clone(),
            per_serving: food.per_serving(),
        }
    }

    /// Case-insensitive name match used to keep favorites unique.
    pub fn matches(&self, name: &str) -> bool {
        self.food.trim().eq_ignore_ascii_case(name.trim())
    }
}
