use crate::models::food::Food;
use crate::models::numbers::{lenient_f64, lenient_string, lenient_vec, number_or_zero};
use crate::utils::date;
use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Per-day goal overrides. Only strictly positive values are kept.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GoalOverrides {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub calories: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub protein: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fat: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub carbs: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub water_oz: Option<f64>,
}

fn positive(v: Option<f64>) -> Option<f64> {
    v.filter(|x| x.is_finite() && *x > 0.0)
}

impl GoalOverrides {
    pub fn is_empty(&self) -> bool {
        self.calories.is_none()
            && self.protein.is_none()
            && self.fat.is_none()
            && self.carbs.is_none()
            && self.water_oz.is_none()
    }

    /// Drop zero, negative and non-finite values.
    pub fn normalized(self) -> Self {
        Self {
            calories: positive(self.calories),
            protein: positive(self.protein),
            fat: positive(self.fat),
            carbs: positive(self.carbs),
            water_oz: positive(self.water_oz),
        }
    }
}

impl<'de> Deserialize<'de> for GoalOverrides {
    fn deserialize<D: Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
        let v = Value::deserialize(d)?;
        let Value::Object(map) = v else {
            return Ok(Self::default());
        };
        let field = |key: &str| map.get(key).map(number_or_zero);
        Ok(Self {
            calories: field("calories"),
            protein: field("protein"),
            fat: field("fat"),
            carbs: field("carbs"),
            water_oz: field("waterOz"),
        }
        .normalized())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Day {
    /// Human readable date captured when the day was created.
    #[serde(default, deserialize_with = "lenient_string")]
    pub date: String,
    #[serde(rename = "dateISO", default, deserialize_with = "lenient_string")]
    pub date_iso: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub date_label: String,
    #[serde(default, deserialize_with = "lenient_vec")]
    pub foods: Vec<Food>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub notes: String,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub water_oz: f64,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub burned_calories: f64,
    #[serde(default)]
    pub goal_overrides: GoalOverrides,
}

impl Day {
    pub fn new(today: NaiveDate) -> Self {
        Self {
            date: date::to_display(today),
            date_iso: date::to_iso(today),
            date_label: String::new(),
            foods: Vec::new(),
            notes: String::new(),
            water_oz: 0.0,
            burned_calories: 0.0,
            goal_overrides: GoalOverrides::default(),
        }
    }

    /// Bring a stored or imported day to the current shape.
    pub fn normalize(mut self, today: NaiveDate, now_ms: i64) -> Self {
        self.foods = self.foods.into_iter().map(|f| f.normalize(now_ms)).collect();
        self.water_oz = self.water_oz.max(0.0);
        self.burned_calories = self.burned_calories.max(0.0);
        self.goal_overrides = self.goal_overrides.normalized();

        if date::parse_date(&self.date_iso).is_none() {
            let derived = date::parse_loose_date(&self.date).unwrap_or(today);
            self.date_iso = date::to_iso(derived);
        }
        if self.date.trim().is_empty() {
            self.date = date::parse_date(&self.date_iso)
                .map(date::to_display)
                .unwrap_or_default();
        }
        self
    }

    /// Label, then the ISO date, then whatever was captured at creation.
    pub fn display_date(&self) -> String {
        if !self.date_label.trim().is_empty() {
            return self.date_label.clone();
        }
        date::parse_date(&self.date_iso)
            .map(date::to_display)
            .unwrap_or_else(|| self.date.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 18).unwrap()
    }

    #[test]
    fn missing_iso_date_is_derived() {
        let day: Day = serde_json::from_value(json!({
            "date": "9/30/2026",
            "foods": [{"food": "Tea", "calories": 2}],
            "waterOz": "-4",
            "goalOverrides": {"calories": 1800, "protein": 0, "fat": "x"}
        }))
        .unwrap();
        let day = day.normalize(today(), 1);

        assert_eq!(day.date_iso, "2026-09-30");
        assert_eq!(day.water_oz, 0.0);
        assert_eq!(day.goal_overrides.calories, Some(1800.0));
        assert_eq!(day.goal_overrides.protein, None);
        assert_eq!(day.goal_overrides.fat, None);
        assert_eq!(day.foods.len(), 1);
    }

    #[test]
    fn unparseable_dates_fall_back_to_today() {
        let day: Day = serde_json::from_value(json!({"date": "sometime"})).unwrap();
        let day = day.normalize(today(), 1);
        assert_eq!(day.date_iso, "2026-10-18");
        assert_eq!(day.display_date(), "10/18/2026");
    }

    #[test]
    fn overrides_serialize_only_set_fields() {
        let mut day = Day::new(today());
        day.goal_overrides.water_oz = Some(80.0);
        let v = serde_json::to_value(&day).unwrap();
        assert_eq!(v["goalOverrides"], json!({"waterOz": 80.0}));
        assert_eq!(v["dateISO"], json!("2026-10-18"));
    }
}
