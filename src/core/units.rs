//! Serving unit table: alias normalization, gram factors and the helper text
//! shown next to serving sizes.

use std::fmt;
use std::str::FromStr;

use crate::errors::AppError;

/// Pseudo unit meaning "the amount is already a number of servings".
pub const SERVINGS: &str = "servings";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Unit {
    Gram,
    Kilogram,
    Ounce,
    Pound,
    Milliliter,
    Liter,
    Cup,
    Tablespoon,
    Teaspoon,
    FluidOunce,
    Pint,
    Quart,
    Gallon,
}

impl Unit {
    pub const ALL: [Unit; 13] = [
        Unit::Gram,
        Unit::Kilogram,
        Unit::Ounce,
        Unit::Pound,
        Unit::Milliliter,
        Unit::Liter,
        Unit::Cup,
        Unit::Tablespoon,
        Unit::Teaspoon,
        Unit::FluidOunce,
        Unit::Pint,
        Unit::Quart,
        Unit::Gallon,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Unit::Gram => "g",
            Unit::Kilogram => "kg",
            Unit::Ounce => "oz",
            Unit::Pound => "lb",
            Unit::Milliliter => "ml",
            Unit::Liter => "l",
            Unit::Cup => "cup",
            Unit::Tablespoon => "tbsp",
            Unit::Teaspoon => "tsp",
            Unit::FluidOunce => "fl oz",
            Unit::Pint => "pint",
            Unit::Quart => "quart",
            Unit::Gallon => "gal",
        }
    }

    /// Grams (or milliliters, treated as equal) per unit.
    pub fn grams(&self) -> f64 {
        match self {
            Unit::Gram => 1.0,
            Unit::Kilogram => 1000.0,
            Unit::Ounce => 28.3495,
            Unit::Pound => 453.592,
            Unit::Milliliter => 1.0,
            Unit::Liter => 1000.0,
            Unit::Cup => 236.588,
            Unit::Tablespoon => 14.7868,
            Unit::Teaspoon => 4.92892,
            Unit::FluidOunce => 29.5735,
            Unit::Pint => 473.176,
            Unit::Quart => 946.353,
            Unit::Gallon => 3785.41,
        }
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Unit {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        normalize_unit(s).ok_or_else(|| AppError::InvalidUnit(s.to_string()))
    }
}

/// Resolve a free-form unit name (`Grams`, `fl-oz`, `tablespoons`).
pub fn normalize_unit(raw: &str) -> Option<Unit> {
    let cleaned = raw
        .trim()
        .to_lowercase()
        .replace(['_', '-'], " ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");

    let unit = match cleaned.as_str() {
        "g" | "gram" | "grams" | "grm" => Unit::Gram,
        "kg" | "kilogram" | "kilograms" => Unit::Kilogram,
        "oz" | "ounce" | "ounces" => Unit::Ounce,
        "lb" | "lbs" | "pound" | "pounds" => Unit::Pound,
        "ml" | "milliliter" | "milliliters" | "millilitre" | "millilitres" => Unit::Milliliter,
        "l" | "liter" | "liters" | "litre" | "litres" => Unit::Liter,
        "cup" | "cups" => Unit::Cup,
        "tbsp" | "tablespoon" | "tablespoons" => Unit::Tablespoon,
        "tsp" | "teaspoon" | "teaspoons" => Unit::Teaspoon,
        "floz" | "fl oz" | "fluid ounce" | "fluid ounces" => Unit::FluidOunce,
        "pint" | "pints" | "pt" | "pts" => Unit::Pint,
        "quart" | "quarts" | "qt" | "qts" => Unit::Quart,
        "gal" | "gallon" | "gallons" => Unit::Gallon,
        _ => return None,
    };
    Some(unit)
}

/// Convert `value` between two unit names.
/// The value comes back unchanged when it is zero, a unit is unknown or
/// both units are the same.
pub fn convert_amount(value: f64, from: &str, to: &str) -> f64 {
    if value == 0.0 || !value.is_finite() {
        return value;
    }
    match (normalize_unit(from), normalize_unit(to)) {
        (Some(f), Some(t)) if f != t => value * f.grams() / t.grams(),
        _ => value,
    }
}

/// How many servings `amount` (in `amount_unit`) represents for a food whose
/// serving is `serving_size` `serving_unit`.
pub fn servings_from_amount(
    amount: f64,
    amount_unit: &str,
    serving_size: f64,
    serving_unit: &str,
) -> Option<f64> {
    if amount == 0.0 || !amount.is_finite() {
        return None;
    }
    if amount_unit == SERVINGS {
        return Some(amount);
    }
    let unit = normalize_unit(serving_unit)?;
    if serving_size <= 0.0 || !serving_size.is_finite() {
        return None;
    }
    let converted = convert_amount(amount, amount_unit, unit.as_str());
    if converted == 0.0 {
        return None;
    }
    Some(converted / serving_size)
}

/// Integers print bare, everything else with at most two decimals.
pub fn format_count(value: f64) -> String {
    if !value.is_finite() {
        return "0".to_string();
    }
    if value.fract() == 0.0 {
        return format!("{value:.0}");
    }
    let fixed = format!("{value:.2}");
    let trimmed = fixed.trim_end_matches('0').trim_end_matches('.');
    if trimmed == "-0" {
        "0".to_string()
    } else {
        trimmed.to_string()
    }
}

/// `approx 100 g | 3.53 oz | 0.22 lb | 100 ml | 0.42 cup`; empty when the
/// size or unit is unusable.
pub fn serving_conversions(size: f64, unit: &str) -> String {
    if !(size > 0.0) || !size.is_finite() {
        return String::new();
    }
    let Some(unit) = normalize_unit(unit) else {
        return String::new();
    };
    let grams = size * unit.grams();
    let ml = grams / Unit::Milliliter.grams();
    let ml_display = if ml >= 1000.0 {
        format!("{} l", format_count(ml / 1000.0))
    } else {
        format!("{} ml", format_count(ml))
    };
    format!(
        "approx {} g | {} oz | {} lb | {} | {} cup",
        format_count(grams),
        format_count(grams / Unit::Ounce.grams()),
        format_count(grams / Unit::Pound.grams()),
        ml_display,
        format_count(grams / Unit::Cup.grams()),
    )
}
