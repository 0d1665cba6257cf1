use crate::models::food::{Macros, Meal};
use crate::models::numbers::{lenient_f64, lenient_from_string, lenient_string};
use serde::{Deserialize, Serialize};

/// One planned item for a future (or past) date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanItem {
    #[serde(default, deserialize_with = "lenient_string")]
    pub id: String,
    #[serde(rename = "dateISO", default, deserialize_with = "lenient_string")]
    pub date_iso: String,
    #[serde(default = "snack", deserialize_with = "lenient_from_string")]
    pub meal: Meal,
    #[serde(default, deserialize_with = "lenient_string")]
    pub name: String,
    #[serde(flatten)]
    pub per_serving: Macros,
    #[serde(default = "one", deserialize_with = "lenient_f64")]
    pub servings: f64,
    #[serde(default, deserialize_with = "lenient_string")]
    pub notes: String,
}

fn snack() -> Meal {
    Meal::Snack
}

fn one() -> f64 {
    1.0
}
