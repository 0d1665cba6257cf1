use crate::core::units;
use crate::models::new_id;
use crate::models::numbers::{lenient_f64, lenient_from_string, lenient_i64, lenient_string, lenient_vec};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, AddAssign};

/// Calories and macro grams. Used both for per-serving values and for
/// the totals of a logged entry.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Macros {
    #[serde(default, deserialize_with = "lenient_f64")]
    pub calories: f64,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub protein: f64,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub fat: f64,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub carbs: f64,
}

impl Macros {
    pub fn new(calories: f64, protein: f64, fat: f64, carbs: f64) -> Self {
        Self {
            calories,
            protein,
            fat,
            carbs,
        }
    }

    pub fn calories_only(calories: f64) -> Self {
        Self::new(calories, 0.0, 0.0, 0.0)
    }

    pub fn scaled(&self, factor: f64) -> Self {
        Self::new(
            self.calories * factor,
            self.protein * factor,
            self.fat * factor,
            self.carbs * factor,
        )
    }

    pub fn has_negative(&self) -> bool {
        self.calories < 0.0 || self.protein < 0.0 || self.fat < 0.0 || self.carbs < 0.0
    }

    fn clamped(&self) -> Self {
        Self::new(
            self.calories.max(0.0),
            self.protein.max(0.0),
            self.fat.max(0.0),
            self.carbs.max(0.0),
        )
    }
}

impl Add for Macros {
    type Output = Macros;

    fn add(self, rhs: Macros) -> Macros {
        Macros::new(
            self.calories + rhs.calories,
            self.protein + rhs.protein,
            self.fat + rhs.fat,
            self.carbs + rhs.carbs,
        )
    }
}

impl AddAssign for Macros {
    fn add_assign(&mut self, rhs: Macros) {
        *self = *self + rhs;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, ValueEnum)]
#[serde(into = "String")]
pub enum Meal {
    Breakfast,
    Lunch,
    Dinner,
    Snack,
}

impl Meal {
    pub const ALL: [Meal; 4] = [Meal::Breakfast, Meal::Lunch, Meal::Dinner, Meal::Snack];

    pub fn as_str(&self) -> &'static str {
        match self {
            Meal::Breakfast => "Breakfast",
            Meal::Lunch => "Lunch",
            Meal::Dinner => "Dinner",
            Meal::Snack => "Snack",
        }
    }

    /// Meal suggested for a local hour of the day.
    pub fn for_hour(hour: u32) -> Self {
        match hour {
            h if h < 11 => Meal::Breakfast,
            h if h < 15 => Meal::Lunch,
            h if h < 19 => Meal::Dinner,
            _ => Meal::Snack,
        }
    }
}

impl From<String> for Meal {
    fn from(s: String) -> Self {
        match s.trim().to_lowercase().as_str() {
            "breakfast" => Meal::Breakfast,
            "lunch" => Meal::Lunch,
            "dinner" => Meal::Dinner,
            _ => Meal::Snack,
        }
    }
}

impl From<Meal> for String {
    fn from(m: Meal) -> Self {
        m.as_str().to_string()
    }
}

impl fmt::Display for Meal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where a logged entry came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, ValueEnum)]
#[serde(into = "String")]
pub enum FoodSource {
    Manual,
    Custom,
    Quick,
    Usda,
    Barcode,
    Recipe,
    Plan,
    Favorite,
}

impl FoodSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            FoodSource::Manual => "manual",
            FoodSource::Custom => "custom",
            FoodSource::Quick => "quick",
            FoodSource::Usda => "usda",
            FoodSource::Barcode => "barcode",
            FoodSource::Recipe => "recipe",
            FoodSource::Plan => "plan",
            FoodSource::Favorite => "favorite",
        }
    }
}

impl From<String> for FoodSource {
    fn from(s: String) -> Self {
        match s.trim().to_lowercase().as_str() {
            "custom" => FoodSource::Custom,
            "quick" => FoodSource::Quick,
            "usda" => FoodSource::Usda,
            "barcode" => FoodSource::Barcode,
            "recipe" => FoodSource::Recipe,
            "plan" => FoodSource::Plan,
            "favorite" => FoodSource::Favorite,
            _ => FoodSource::Manual,
        }
    }
}

impl From<FoodSource> for String {
    fn from(s: FoodSource) -> Self {
        s.as_str().to_string()
    }
}

impl fmt::Display for FoodSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One logged food entry. `totals` holds the values for the logged amount,
/// `per_serving` the values of a single serving.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Food {
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
    #[serde(default, deserialize_with = "lenient_vec")]
    pub tags: Vec<String>,
    #[serde(flatten)]
    pub totals: Macros,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub servings: f64,
    /// Legacy multiplier written by early versions; folded into `servings`.
    #[serde(default, deserialize_with = "lenient_f64", skip_serializing)]
    pub items: f64,
    #[serde(default)]
    pub per_serving: Option<Macros>,
    #[serde(default = "default_meal", deserialize_with = "lenient_from_string")]
    pub meal: Meal,
    #[serde(default, deserialize_with = "lenient_i64")]
    pub created_at: i64,
    #[serde(default = "default_source", deserialize_with = "lenient_from_string")]
    pub source: FoodSource,
}

fn default_meal() -> Meal {
    Meal::Snack
}

fn default_source() -> FoodSource {
    FoodSource::Manual
}

impl Food {
    /// A new entry of `servings` servings; totals are derived from `per_serving`.
    pub fn logged(
        name: &str,
        per_serving: Macros,
        servings: f64,
        meal: Meal,
        source: FoodSource,
        created_at: i64,
    ) -> Self {
        Self {
            id: new_id(),
            food: name.to_string(),
            brand: String::new(),
            serving_size: 0.0,
            serving_unit: String::new(),
            notes: String::new(),
            tags: Vec::new(),
            totals: per_serving.scaled(servings),
            servings,
            items: 0.0,
            per_serving: Some(per_serving),
            meal,
            created_at,
            source,
        }
    }

    /// Per-serving values, derived from the totals when missing.
    pub fn per_serving(&self) -> Macros {
        self.per_serving.unwrap_or_else(|| {
            if self.servings > 0.0 {
                self.totals.scaled(1.0 / self.servings)
            } else {
                self.totals
            }
        })
    }

    /// Bring a stored or imported entry to the current shape.
    pub fn normalize(mut self, now_ms: i64) -> Self {
        let base = if self.servings > 0.0 { self.servings } else { 1.0 };
        let legacy = if self.items > 0.0 { self.items } else { 1.0 };
        self.servings = base * legacy;
        self.items = 0.0;
        self.totals = self.totals.clamped();
        self.per_serving = Some(
            self.per_serving
                .map(|m| m.clamped())
                .unwrap_or_else(|| self.totals.scaled(1.0 / self.servings)),
        );
        if self.id.trim().is_empty() {
            self.id = new_id();
        }
        if self.food.trim().is_empty() {
            self.food = "Unknown".to_string();
        }
        self.serving_size = self.serving_size.max(0.0);
        if let Some(unit) = units::normalize_unit(&self.serving_unit) {
            self.serving_unit = unit.as_str().to_string();
        }
        if self.created_at <= 0 {
            self.created_at = now_ms;
        }
        self
    }

    /// `100 g` / `1 cup` style label, empty when no serving size is known.
    pub fn serving_label(&self) -> String {
        if self.serving_size > 0.0 && !self.serving_unit.is_empty() {
            format!("{} {}", units::format_count(self.serving_size), self.serving_unit)
        } else {
            String::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn legacy_entries_normalize() {
        let raw = json!({
            "food": "Oats",
            "calories": "300",
            "protein": 10,
            "fat": null,
            "carbs": 54,
            "servings": 2,
            "items": 1.5,
            "servingUnit": "Grams",
            "meal": "brunch",
            "source": "something-new"
        });
        let food: Food = serde_json::from_value(raw).unwrap();
        let food = food.normalize(42);

        assert_eq!(food.servings, 3.0);
        assert_eq!(food.totals.calories, 300.0);
        assert_eq!(food.per_serving().calories, 100.0);
        assert_eq!(food.serving_unit, "g");
        assert_eq!(food.meal, Meal::Snack);
        assert_eq!(food.source, FoodSource::Manual);
        assert_eq!(food.created_at, 42);
        assert!(!food.id.is_empty());
    }

    #[test]
    fn serializes_flat_camel_case() {
        let f = Food::logged("Apple", Macros::calories_only(95.0), 2.0, Meal::Lunch, FoodSource::Quick, 1);
        let v = serde_json::to_value(&f).unwrap();
        assert_eq!(v["calories"], json!(190.0));
        assert_eq!(v["perServing"]["calories"], json!(95.0));
        assert_eq!(v["meal"], json!("Lunch"));
        assert_eq!(v["source"], json!("quick"));
        assert!(v.get("items").is_none());
        assert!(v.get("createdAt").is_some());
    }

    #[test]
    fn meals_follow_the_clock() {
        assert_eq!(Meal::for_hour(7), Meal::Breakfast);
        assert_eq!(Meal::for_hour(12), Meal::Lunch);
        assert_eq!(Meal::for_hour(18), Meal::Dinner);
        assert_eq!(Meal::for_hour(22), Meal::Snack);
    }
}
