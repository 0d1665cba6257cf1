//! FoodData Central search.

use crate::api::http_client;
use crate::config::Config;
use crate::core::tracker::MIN_SERVINGS;
use crate::core::units::{self, SERVINGS, format_count};
use crate::errors::{AppError, AppResult};
use crate::models::food::{Food, FoodSource, Macros, Meal};
use crate::models::numbers::{lenient_f64, lenient_i64, lenient_string, lenient_vec};
use reqwest::blocking::Client;
use serde::Deserialize;

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FoodPortion {
    #[serde(default, deserialize_with = "lenient_f64")]
    pub gram_weight: f64,
    #[serde(default, deserialize_with = "lenient_string")]
    pub portion_description: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub modifier: String,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FoodNutrient {
    #[serde(default, deserialize_with = "lenient_string")]
    pub nutrient_name: String,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub value: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UsdaFood {
    #[serde(default, deserialize_with = "lenient_i64")]
    pub fdc_id: i64,
    #[serde(default, deserialize_with = "lenient_string")]
    pub description: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub brand_owner: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub brand_name: String,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub serving_size: f64,
    #[serde(default, deserialize_with = "lenient_string")]
    pub serving_size_unit: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub household_serving_full_text: String,
    #[serde(default, deserialize_with = "lenient_vec")]
    pub food_portions: Vec<FoodPortion>,
    #[serde(default, deserialize_with = "lenient_vec")]
    pub food_nutrients: Vec<FoodNutrient>,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default, deserialize_with = "lenient_vec")]
    foods: Vec<UsdaFood>,
}

impl UsdaFood {
    pub fn brand(&self) -> &str {
        if self.brand_owner.is_empty() {
            &self.brand_name
        } else {
            &self.brand_owner
        }
    }

    fn nutrient(&self, name: &str) -> f64 {
        self.food_nutrients
            .iter()
            .find(|n| n.nutrient_name == name)
            .map(|n| n.value)
            .unwrap_or(0.0)
    }

    /// Nutrients as reported, i.e. for the base serving.
    pub fn macros(&self) -> Macros {
        Macros::new(
            self.nutrient("Energy"),
            self.nutrient("Protein"),
            self.nutrient("Total lipid (fat)"),
            self.nutrient("Carbohydrate, by difference"),
        )
    }

    /// Base serving unit, normalized when it is a known unit.
    pub fn base_unit(&self) -> String {
        units::normalize_unit(&self.serving_size_unit)
            .map(|u| u.as_str().to_string())
            .unwrap_or_else(|| self.serving_size_unit.clone())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ServingOption {
    pub label: String,
    pub size: f64,
    pub unit: String,
}

/// The base serving, then each portion with a gram weight. A food with
/// neither gets a single "not listed" option of one serving.
pub fn serving_options(food: &UsdaFood) -> Vec<ServingOption> {
    let mut options = Vec::new();
    let base_unit = food.base_unit();
    if food.serving_size > 0.0 && !base_unit.is_empty() {
        let size = format!("{} {}", format_count(food.serving_size), base_unit);
        let label = if food.household_serving_full_text.is_empty() {
            size
        } else {
            format!("{} ({size})", food.household_serving_full_text)
        };
        options.push(ServingOption {
            label,
            size: food.serving_size,
            unit: base_unit,
        });
    }
    for portion in &food.food_portions {
        if portion.gram_weight <= 0.0 {
            continue;
        }
        let desc = [portion.portion_description.as_str(), portion.modifier.as_str()]
            .iter()
            .filter(|s| !s.is_empty())
            .copied()
            .collect::<Vec<_>>()
            .join(" ");
        let desc = if desc.is_empty() { "Portion" } else { desc.as_str() };
        options.push(ServingOption {
            label: format!("{desc} ({} g)", format_count(portion.gram_weight)),
            size: portion.gram_weight,
            unit: "g".into(),
        });
    }
    if options.is_empty() {
        options.push(ServingOption {
            label: "Serving size not listed".into(),
            size: 1.0,
            unit: SERVINGS.into(),
        });
    }
    options
}

/// How much of a search result to log.
#[derive(Debug, Clone, PartialEq)]
pub struct UsdaPick {
    /// Index into `serving_options`; out of range falls back to the first.
    pub option: usize,
    /// 0 means one serving.
    pub amount: f64,
    pub amount_unit: String,
    pub meal: Meal,
}

/// Turn a search result into a logged entry. Nutrients are rescaled from the
/// base serving to the chosen serving option.
pub fn build_food(food: &UsdaFood, pick: &UsdaPick, now_ms: i64) -> AppResult<Food> {
    let options = serving_options(food);
    let chosen = options.get(pick.option).unwrap_or(&options[0]);

    let base_size = food.serving_size;
    let base_unit = food.base_unit();
    let size = if chosen.size > 0.0 { chosen.size } else { base_size };
    let unit = units::normalize_unit(&chosen.unit)
        .map(|u| u.as_str().to_string())
        .unwrap_or_else(|| chosen.unit.clone());

    if pick.amount < 0.0 {
        return Err(AppError::invalid("Amount cannot be negative."));
    }
    let amount_unit = pick.amount_unit.trim();
    let requested = if amount_unit.is_empty() || amount_unit == SERVINGS {
        if pick.amount > 0.0 { pick.amount } else { 1.0 }
    } else {
        if units::normalize_unit(amount_unit).is_none() {
            return Err(AppError::InvalidUnit(amount_unit.to_string()));
        }
        if size <= 0.0 || unit.is_empty() || unit == SERVINGS {
            return Err(AppError::invalid("Select a serving size to convert units."));
        }
        units::servings_from_amount(pick.amount, amount_unit, size, &unit)
            .ok_or_else(|| AppError::invalid("Conversion failed: check the serving size."))?
    };
    let servings = requested.max(MIN_SERVINGS);

    let mut per_serving = food.macros();
    if base_size > 0.0 && !base_unit.is_empty() && size > 0.0 && !unit.is_empty() {
        let ratio = units::convert_amount(size, &unit, &base_unit) / base_size;
        if ratio.is_finite() && ratio > 0.0 {
            per_serving = per_serving.scaled(ratio);
        }
    }

    let name = if food.description.trim().is_empty() {
        "Unknown"
    } else {
        food.description.trim()
    };
    let mut entry = Food::logged(name, per_serving, servings, pick.meal, FoodSource::Usda, now_ms);
    entry.brand = food.brand().to_string();
    entry.serving_size = size;
    entry.serving_unit = unit;
    Ok(entry)
}

pub struct UsdaClient {
    client: Client,
    base_url: String,
    api_key: String,
}

impl UsdaClient {
    pub fn new(cfg: &Config) -> AppResult<Self> {
        Ok(Self {
            client: http_client(cfg.http_timeout_secs)?,
            base_url: cfg.usda_base_url.trim_end_matches('/').to_string(),
            api_key: cfg.usda_key(),
        })
    }

    pub fn search(&self, term: &str) -> AppResult<Vec<UsdaFood>> {
        let url = format!("{}/fdc/v1/foods/search", self.base_url);
        let resp: SearchResponse = self
            .client
            .get(url)
            .query(&[("query", term.trim()), ("api_key", self.api_key.as_str())])
            .send()?
            .error_for_status()?
            .json()?;
        Ok(resp.foods)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn yogurt() -> UsdaFood {
        serde_json::from_value(json!({
            "fdcId": 123,
            "description": "Greek Yogurt",
            "brandName": "Acme",
            "servingSize": 170,
            "servingSizeUnit": "GRM",
            "householdServingFullText": "1 container",
            "foodPortions": [
                {"gramWeight": 85, "portionDescription": "half", "modifier": "container"},
                {"gramWeight": 0, "portionDescription": "ignored"}
            ],
            "foodNutrients": [
                {"nutrientName": "Energy", "value": 100},
                {"nutrientName": "Protein", "value": "17"},
                {"nutrientName": "Total lipid (fat)", "value": 0.7},
                {"nutrientName": "Carbohydrate, by difference", "value": 6}
            ]
        }))
        .unwrap()
    }

    fn pick(option: usize, amount: f64, unit: &str) -> UsdaPick {
        UsdaPick {
            option,
            amount,
            amount_unit: unit.into(),
            meal: Meal::Breakfast,
        }
    }

    #[test]
    fn options_list_base_and_portions() {
        let opts = serving_options(&yogurt());
        assert_eq!(opts.len(), 2);
        assert_eq!(opts[0].label, "1 container (170 g)");
        assert_eq!(opts[1].label, "half container (85 g)");

        let bare = UsdaFood::default();
        let opts = serving_options(&bare);
        assert_eq!(opts[0].label, "Serving size not listed");
        assert_eq!(opts[0].unit, SERVINGS);
    }

    #[test]
    fn portion_rescales_nutrients() {
        let food = build_food(&yogurt(), &pick(1, 2.0, "servings"), 5).unwrap();
        assert_eq!(food.per_serving().calories, 50.0);
        assert_eq!(food.totals.calories, 100.0);
        assert_eq!(food.serving_size, 85.0);
        assert_eq!(food.serving_unit, "g");
        assert_eq!(food.brand, "Acme");
        assert_eq!(food.source, FoodSource::Usda);
    }

    #[test]
    fn unit_amounts_convert_through_the_serving() {
        let food = build_food(&yogurt(), &pick(0, 340.0, "g"), 5).unwrap();
        assert_eq!(food.servings, 2.0);
        assert_eq!(food.totals.protein, 34.0);

        let err = build_food(&UsdaFood::default(), &pick(0, 100.0, "g"), 5).unwrap_err();
        assert_eq!(err.to_string(), "Select a serving size to convert units.");
    }

    #[test]
    fn tiny_amounts_floor_at_a_quarter() {
        let food = build_food(&yogurt(), &pick(0, 0.1, "servings"), 5).unwrap();
        assert_eq!(food.servings, MIN_SERVINGS);
    }
}
