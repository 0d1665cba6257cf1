//! Open Food Facts product lookup by barcode.

use crate::api::barcode::Barcode;
use crate::api::http_client;
use crate::config::Config;
use crate::errors::{AppError, AppResult};
use crate::models::food::{Food, FoodSource, Macros, Meal};
use crate::models::numbers::{lenient_f64, lenient_i64, lenient_string};
use reqwest::blocking::Client;
use serde::Deserialize;

/// Nutrients per 100 g.
#[derive(Debug, Clone, Copy, Default, PartialEq, Deserialize)]
pub struct Nutriments {
    #[serde(rename = "energy-kcal_100g", default, deserialize_with = "lenient_f64")]
    pub energy_kcal_100g: f64,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub proteins_100g: f64,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub fat_100g: f64,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub carbohydrates_100g: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Product {
    #[serde(default, deserialize_with = "lenient_string")]
    pub product_name: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub brands: String,
    #[serde(default)]
    pub nutriments: Nutriments,
}

#[derive(Debug, Deserialize)]
struct ProductResponse {
    #[serde(default, deserialize_with = "lenient_i64")]
    status: i64,
    #[serde(default)]
    product: Option<Product>,
}

impl Product {
    pub fn name(&self) -> &str {
        let name = self.product_name.trim();
        if name.is_empty() { "Unknown" } else { name }
    }

    /// One serving of `grams` grams.
    pub fn to_food(&self, grams: f64, meal: Meal, now_ms: i64) -> AppResult<Food> {
        if !grams.is_finite() || grams <= 0.0 {
            return Err(AppError::invalid("Serving size (g) must be greater than 0."));
        }
        let n = self.nutriments;
        let per_serving = Macros::new(
            n.energy_kcal_100g,
            n.proteins_100g,
            n.fat_100g,
            n.carbohydrates_100g,
        )
        .scaled(grams / 100.0);

        let mut food = Food::logged(self.name(), per_serving, 1.0, meal, FoodSource::Barcode, now_ms);
        food.brand = self.brands.trim().to_string();
        food.serving_size = grams;
        food.serving_unit = "g".into();
        Ok(food)
    }
}

pub struct OpenFoodFactsClient {
    client: Client,
    base_url: String,
}

impl OpenFoodFactsClient {
    pub fn new(cfg: &Config) -> AppResult<Self> {
        Ok(Self {
            client: http_client(cfg.http_timeout_secs)?,
            base_url: cfg.openfoodfacts_base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn product(&self, code: &Barcode) -> AppResult<Product> {
        let url = format!("{}/api/v2/product/{}.json", self.base_url, code);
        let resp: ProductResponse = self.client.get(url).send()?.error_for_status()?.json()?;
        match resp.product {
            Some(p) if resp.status != 0 => Ok(p),
            _ => Err(AppError::NotFound(format!("product {code}"))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn nutriments_scale_by_grams() {
        let resp: ProductResponse = serde_json::from_value(json!({
            "status": 1,
            "product": {
                "product_name": "Hazelnut spread",
                "brands": "Acme",
                "nutriments": {
                    "energy-kcal_100g": 539,
                    "proteins_100g": "6.3",
                    "fat_100g": 30.9,
                    "carbohydrates_100g": 57.5
                }
            }
        }))
        .unwrap();
        let product = resp.product.unwrap();
        let food = product.to_food(15.0, Meal::Snack, 1).unwrap();
        assert!((food.totals.calories - 80.85).abs() < 1e-9);
        assert!((food.totals.protein - 0.945).abs() < 1e-9);
        assert_eq!(food.servings, 1.0);
        assert_eq!(food.serving_label(), "15 g");
        assert_eq!(food.source, FoodSource::Barcode);
    }

    #[test]
    fn unnamed_products_are_unknown() {
        let p = Product::default();
        assert_eq!(p.to_food(100.0, Meal::Lunch, 1).unwrap().food, "Unknown");
        assert!(p.to_food(0.0, Meal::Lunch, 1).is_err());
    }
}
