use crate::models::food::Macros;
use crate::models::numbers::{lenient_f64, lenient_i64, lenient_string, lenient_vec};
use serde::{Deserialize, Serialize};

/// A saved recipe: per-serving values plus free-form ingredient lines.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recipe {
    #[serde(default, deserialize_with = "lenient_string")]
    pub id: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub name: String,
    #[serde(default = "one", deserialize_with = "lenient_f64")]
    pub servings: f64,
    #[serde(flatten)]
    pub per_serving: Macros,
    #[serde(default, deserialize_with = "lenient_vec")]
    pub ingredients: Vec<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub notes: String,
    #[serde(default, deserialize_with = "lenient_i64")]
    pub created_at: i64,
}

fn one() -> f64 {
    1.0
}

/// Trim ingredient lines and drop the blank ones.
pub fn clean_ingredients<I, S>(lines: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    lines
        .into_iter()
        .map(|l| l.as_ref().trim().to_string())
        .filter(|l| !l.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn recipe_reads_flat_macros() {
        let r: Recipe = serde_json::from_value(json!({
            "id": "r1",
            "name": "Chili",
            "servings": "4",
            "calories": 420,
            "protein": 30,
            "ingredients": ["beans", 5, "  tomato "]
        }))
        .unwrap();
        assert_eq!(r.servings, 4.0);
        assert_eq!(r.per_serving.calories, 420.0);
        assert_eq!(r.per_serving.fat, 0.0);
        assert_eq!(r.ingredients.len(), 2);
        assert_eq!(clean_ingredients(["a", "  ", " b "]), vec!["a", "b"]);
    }
}
