use crate::models::food::Meal;
use crate::models::numbers::{lenient_f64, lenient_from_string};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Milliliters in one US fluid ounce.
pub const WATER_ML_PER_OZ: f64 = 29.5735;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ValueEnum)]
#[serde(into = "String")]
pub enum WaterUnit {
    Oz,
    Ml,
}

impl WaterUnit {
    pub fn as_str(&self) -> &'static str {
        match self {
            WaterUnit::Oz => "oz",
            WaterUnit::Ml => "ml",
        }
    }

    /// Stored ounces → rounded display amount.
    pub fn display(&self, oz: f64) -> f64 {
        match self {
            WaterUnit::Oz => oz.round(),
            WaterUnit::Ml => (oz * WATER_ML_PER_OZ).round(),
        }
    }

    /// Amount typed in this unit → ounces.
    pub fn to_oz(&self, value: f64) -> f64 {
        match self {
            WaterUnit::Oz => value,
            WaterUnit::Ml => value / WATER_ML_PER_OZ,
        }
    }
}

impl From<String> for WaterUnit {
    fn from(s: String) -> Self {
        if s.trim().eq_ignore_ascii_case("ml") {
            WaterUnit::Ml
        } else {
            WaterUnit::Oz
        }
    }
}

impl From<WaterUnit> for String {
    fn from(u: WaterUnit) -> Self {
        u.as_str().to_string()
    }
}

/// Color preset; picks the accent used for section headers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ValueEnum)]
#[serde(into = "String")]
pub enum Theme {
    Aurora,
    Sunset,
    Tide,
    Mono,
}

impl From<String> for Theme {
    fn from(s: String) -> Self {
        match s.trim().to_lowercase().as_str() {
            "sunset" => Theme::Sunset,
            "tide" => Theme::Tide,
            "mono" => Theme::Mono,
            _ => Theme::Aurora,
        }
    }
}

impl From<Theme> for String {
    fn from(t: Theme) -> Self {
        match t {
            Theme::Aurora => "aurora",
            Theme::Sunset => "sunset",
            Theme::Tide => "tide",
            Theme::Mono => "mono",
        }
        .to_string()
    }
}

/// Table layout: compact drops separators and the notes column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ValueEnum)]
#[serde(into = "String")]
pub enum Density {
    Comfy,
    Compact,
}

impl From<String> for Density {
    fn from(s: String) -> Self {
        if s.trim().eq_ignore_ascii_case("compact") {
            Density::Compact
        } else {
            Density::Comfy
        }
    }
}

impl From<Density> for String {
    fn from(d: Density) -> Self {
        match d {
            Density::Comfy => "comfy",
            Density::Compact => "compact",
        }
        .to_string()
    }
}

/// Meal preselected for new entries: a fixed meal, or `Auto` (by hour).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(into = "String")]
pub enum MealChoice {
    Auto,
    Fixed(Meal),
}

impl MealChoice {
    pub fn resolve(&self, hour: u32) -> Meal {
        match self {
            MealChoice::Auto => Meal::for_hour(hour),
            MealChoice::Fixed(m) => *m,
        }
    }
}

impl From<String> for MealChoice {
    fn from(s: String) -> Self {
        match s.trim().to_lowercase().as_str() {
            "breakfast" | "lunch" | "dinner" | "snack" => MealChoice::Fixed(Meal::from(s)),
            _ => MealChoice::Auto,
        }
    }
}

impl From<MealChoice> for String {
    fn from(c: MealChoice) -> Self {
        match c {
            MealChoice::Auto => "Auto".to_string(),
            MealChoice::Fixed(m) => m.as_str().to_string(),
        }
    }
}

impl fmt::Display for MealChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&String::from(*self))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Prefs {
    #[serde(default = "default_water_step", deserialize_with = "lenient_f64")]
    pub water_step: f64,
    #[serde(default = "default_water_unit", deserialize_with = "lenient_from_string")]
    pub water_unit: WaterUnit,
    #[serde(default = "default_theme", deserialize_with = "lenient_from_string")]
    pub theme: Theme,
    #[serde(default = "default_density", deserialize_with = "lenient_from_string")]
    pub density: Density,
    #[serde(default = "default_meal_choice", deserialize_with = "lenient_from_string")]
    pub default_meal: MealChoice,
}

fn default_water_step() -> f64 {
    8.0
}
fn default_water_unit() -> WaterUnit {
    WaterUnit::Oz
}
fn default_theme() -> Theme {
    Theme::Aurora
}
fn default_density() -> Density {
    Density::Comfy
}
fn default_meal_choice() -> MealChoice {
    MealChoice::Auto
}

impl Default for Prefs {
    fn default() -> Self {
        Self {
            water_step: default_water_step(),
            water_unit: default_water_unit(),
            theme: default_theme(),
            density: default_density(),
            default_meal: default_meal_choice(),
        }
    }
}
