use crate::models::numbers::{lenient_f64, lenient_string, lenient_vec};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Exercise {
    #[serde(default, deserialize_with = "lenient_string")]
    pub name: String,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub sets: f64,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub reps: f64,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub weight: f64,
}

impl Exercise {
    /// Parse `name[:sets[:reps[:weight]]]`, e.g. `Squat:5:5:100`.
    pub fn parse(raw: &str) -> Option<Self> {
        let mut parts = raw.split(':').map(str::trim);
        let name = parts.next().filter(|n| !n.is_empty())?.to_string();
        let mut num = || {
            parts
                .next()
                .and_then(|p| p.parse::<f64>().ok())
                .filter(|v| v.is_finite() && *v >= 0.0)
                .unwrap_or(0.0)
        };
        Some(Self {
            name,
            sets: num(),
            reps: num(),
            weight: num(),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Workout {
    #[serde(default, deserialize_with = "lenient_string")]
    pub id: String,
    #[serde(rename = "dateISO", default, deserialize_with = "lenient_string")]
    pub date_iso: String,
    #[serde(default = "default_title", deserialize_with = "lenient_string")]
    pub title: String,
    /// Minutes.
    #[serde(default, deserialize_with = "lenient_f64")]
    pub duration: f64,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub calories: f64,
    #[serde(default, deserialize_with = "lenient_string")]
    pub notes: String,
    #[serde(default, deserialize_with = "lenient_vec")]
    pub exercises: Vec<Exercise>,
}

pub fn default_title() -> String {
    "Workout".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exercise_parses_partial_specs() {
        let e = Exercise::parse("Squat:5:5:100").unwrap();
        assert_eq!((e.sets, e.reps, e.weight), (5.0, 5.0, 100.0));
        let e = Exercise::parse(" Plank ").unwrap();
        assert_eq!(e.name, "Plank");
        assert_eq!(e.sets, 0.0);
        assert!(Exercise::parse(":3").is_none());
    }
}
