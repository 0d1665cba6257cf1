use crate::models::day::GoalOverrides;
use crate::models::numbers::lenient_f64;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Global daily goals.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Goals {
    #[serde(default = "default_calories", deserialize_with = "lenient_f64")]
    pub calories: f64,
    #[serde(default = "default_protein", deserialize_with = "lenient_f64")]
    pub protein: f64,
    #[serde(default = "default_fat", deserialize_with = "lenient_f64")]
    pub fat: f64,
    #[serde(default = "default_carbs", deserialize_with = "lenient_f64")]
    pub carbs: f64,
    #[serde(default = "default_water", deserialize_with = "lenient_f64")]
    pub water_oz: f64,
}

fn default_calories() -> f64 {
    2000.0
}
fn default_protein() -> f64 {
    150.0
}
fn default_fat() -> f64 {
    70.0
}
fn default_carbs() -> f64 {
    250.0
}
fn default_water() -> f64 {
    64.0
}

impl Default for Goals {
    fn default() -> Self {
        Self {
            calories: default_calories(),
            protein: default_protein(),
            fat: default_fat(),
            carbs: default_carbs(),
            water_oz: default_water(),
        }
    }
}

impl Goals {
    /// Global goals overlaid with a day's overrides.
    pub fn effective(&self, overrides: &GoalOverrides) -> Goals {
        Goals {
            calories: overrides.calories.unwrap_or(self.calories),
            protein: overrides.protein.unwrap_or(self.protein),
            fat: overrides.fat.unwrap_or(self.fat),
            carbs: overrides.carbs.unwrap_or(self.carbs),
            water_oz: overrides.water_oz.unwrap_or(self.water_oz),
        }
    }

    /// Derive macro grams from the calorie goal. Returns false (and leaves the
    /// goals untouched) when there is no calorie goal to split.
    pub fn apply_preset(&mut self, preset: MacroPreset) -> bool {
        if self.calories <= 0.0 {
            return false;
        }
        let (protein, carbs, fat) = preset.ratios();
        self.protein = (self.calories * protein / 4.0).round();
        self.carbs = (self.calories * carbs / 4.0).round();
        self.fat = (self.calories * fat / 9.0).round();
        true
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum MacroPreset {
    Balanced,
    HighProtein,
    LowCarb,
    Endurance,
    Keto,
}

impl MacroPreset {
    /// Calorie share of (protein, carbs, fat).
    pub fn ratios(&self) -> (f64, f64, f64) {
        match self {
            MacroPreset::Balanced => (0.3, 0.4, 0.3),
            MacroPreset::HighProtein => (0.4, 0.3, 0.3),
            MacroPreset::LowCarb => (0.35, 0.25, 0.4),
            MacroPreset::Endurance => (0.25, 0.5, 0.25),
            MacroPreset::Keto => (0.25, 0.05, 0.7),
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            MacroPreset::Balanced => "Balanced",
            MacroPreset::HighProtein => "High Protein",
            MacroPreset::LowCarb => "Low Carb",
            MacroPreset::Endurance => "Endurance",
            MacroPreset::Keto => "Keto",
        }
    }
}
