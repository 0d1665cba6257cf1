use crate::models::numbers::{lenient_opt_f64, lenient_string};
use serde::{Deserialize, Serialize};

/// Body measurement snapshot; every metric is optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Measurement {
    #[serde(default, deserialize_with = "lenient_string")]
    pub id: String,
    #[serde(rename = "dateISO", default, deserialize_with = "lenient_string")]
    pub date_iso: String,
    #[serde(default, deserialize_with = "lenient_opt_f64")]
    pub weight: Option<f64>,
    #[serde(default, deserialize_with = "lenient_opt_f64")]
    pub body_fat: Option<f64>,
    #[serde(default, deserialize_with = "lenient_opt_f64")]
    pub waist: Option<f64>,
    #[serde(default, deserialize_with = "lenient_opt_f64")]
    pub hips: Option<f64>,
    #[serde(default, deserialize_with = "lenient_opt_f64")]
    pub chest: Option<f64>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub notes: String,
}

/// Metrics tracked on a measurement, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Metric {
    Weight,
    BodyFat,
    Waist,
    Hips,
    Chest,
}

impl Metric {
    pub const ALL: [Metric; 5] = [
        Metric::Weight,
        Metric::BodyFat,
        Metric::Waist,
        Metric::Hips,
        Metric::Chest,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Metric::Weight => "Weight",
            Metric::BodyFat => "Body fat",
            Metric::Waist => "Waist",
            Metric::Hips => "Hips",
            Metric::Chest => "Chest",
        }
    }
}

impl Measurement {
    pub fn get(&self, metric: Metric) -> Option<f64> {
        match metric {
            Metric::Weight => self.weight,
            Metric::BodyFat => self.body_fat,
            Metric::Waist => self.waist,
            Metric::Hips => self.hips,
            Metric::Chest => self.chest,
        }
    }

    pub fn has_any_metric(&self) -> bool {
        Metric::ALL.iter().any(|m| self.get(*m).is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn blank_metrics_stay_empty() {
        let m: Measurement = serde_json::from_value(json!({
            "dateISO": "2026-10-01",
            "weight": "81.2",
            "waist": "",
            "hips": null
        }))
        .unwrap();
        assert_eq!(m.weight, Some(81.2));
        assert_eq!(m.waist, None);
        assert_eq!(m.hips, None);
        assert!(m.has_any_metric());
        assert!(!Measurement::default().has_any_metric());
    }
}
