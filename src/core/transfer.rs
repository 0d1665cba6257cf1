//! Tracker export and import.
//!
//! The export file is a versioned JSON object. Import also accepts the bare
//! array of days written by the first releases.

use crate::core::tracker::Tracker;
use crate::db::kv::keys;
use crate::errors::{AppError, AppResult};
use crate::models::day::Day;
use crate::models::favorite::Favorite;
use crate::models::goals::Goals;
use crate::models::measurement::Measurement;
use crate::models::plan::PlanItem;
use crate::models::prefs::Prefs;
use crate::models::recipe::Recipe;
use crate::models::workout::Workout;
use crate::utils::date;
use chrono::NaiveDate;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

pub const EXPORT_VERSION: u32 = 2;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportPayload<'a> {
    pub version: u32,
    pub exported_at: String,
    pub days: &'a [Day],
    pub goals: &'a Goals,
    pub favorites: &'a [Favorite],
    pub prefs: &'a Prefs,
    pub recipes: &'a [Recipe],
    pub plans: &'a [PlanItem],
    pub measurements: &'a [Measurement],
    pub workouts: &'a [Workout],
}

impl<'a> ExportPayload<'a> {
    pub fn of(t: &'a Tracker, exported_at: String) -> Self {
        Self {
            version: EXPORT_VERSION,
            exported_at,
            days: &t.days,
            goals: &t.goals,
            favorites: &t.favorites,
            prefs: &t.prefs,
            recipes: &t.recipes,
            plans: &t.plans,
            measurements: &t.measurements,
            workouts: &t.workouts,
        }
    }
}

pub fn default_file_name(day: NaiveDate) -> String {
    format!("calorie-counter-{}.json", date::to_iso(day))
}

pub fn export_json(t: &Tracker) -> AppResult<String> {
    let payload = ExportPayload::of(t, date::now_rfc3339());
    Ok(serde_json::to_string_pretty(&payload)?)
}

/// What an import replaced.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ImportSummary {
    pub days: usize,
    pub replaced: Vec<&'static str>,
}

fn list_of<T: DeserializeOwned>(v: &Value) -> Option<Vec<T>> {
    let Value::Array(items) = v else {
        return None;
    };
    Some(
        items
            .iter()
            .filter_map(|item| serde_json::from_value(item.clone()).ok())
            .collect(),
    )
}

fn parse_days(t: &Tracker, raw: &[Value]) -> Vec<Day> {
    let clock = t.clock;
    raw.iter()
        .filter_map(|v| serde_json::from_value::<Day>(v.clone()).ok())
        .map(|d| d.normalize(clock.today, clock.now_ms))
        .collect()
}

fn replace_days(t: &mut Tracker, mut days: Vec<Day>) -> usize {
    let imported = days.len();
    if days.is_empty() {
        days.push(Day::new(t.clock.today));
    }
    t.current = days.len() - 1;
    t.days = days;
    t.last_removal = None;
    t.touch(keys::DAYS);
    t.touch(keys::CURRENT_DAY);
    t.touch(keys::LAST_REMOVAL);
    imported
}

fn import_object(t: &mut Tracker, map: &Map<String, Value>, summary: &mut ImportSummary) {
    // an empty day list in an export object leaves the log alone
    if let Some(Value::Array(raw)) = map.get("days") {
        let days = parse_days(t, raw);
        if !days.is_empty() {
            summary.days = replace_days(t, days);
            summary.replaced.push(keys::DAYS);
        }
    }
    if let Some(v @ Value::Object(_)) = map.get("goals")
        && let Ok(goals) = serde_json::from_value::<Goals>(v.clone())
    {
        t.goals = goals;
        t.touch(keys::GOALS);
        summary.replaced.push(keys::GOALS);
    }
    if let Some(v @ Value::Object(_)) = map.get("prefs")
        && let Ok(prefs) = serde_json::from_value::<Prefs>(v.clone())
    {
        t.prefs = prefs;
        t.touch(keys::PREFS);
        summary.replaced.push(keys::PREFS);
    }

    macro_rules! replace_list {
        ($field:ident, $json:literal, $key:expr) => {
            if let Some(list) = map.get($json).and_then(list_of) {
                t.$field = list;
                t.touch($key);
                summary.replaced.push($key);
            }
        };
    }
    replace_list!(favorites, "favorites", keys::FAVORITES);
    replace_list!(recipes, "recipes", keys::RECIPES);
    replace_list!(plans, "plans", keys::PLANS);
    replace_list!(measurements, "measurements", keys::MEASUREMENTS);
    replace_list!(workouts, "workouts", keys::WORKOUTS);
}

/// Parse an export file without touching the tracker.
pub fn parse_import(raw: &str) -> AppResult<Value> {
    let parsed: Value =
        serde_json::from_str(raw).map_err(|_| AppError::Import("invalid JSON file".into()))?;
    match parsed {
        Value::Array(_) | Value::Object(_) => Ok(parsed),
        _ => Err(AppError::Import(
            "expected a list of days or an export object".into(),
        )),
    }
}

/// Replace tracker state with a parsed export file.
pub fn apply_import(t: &mut Tracker, parsed: &Value) -> ImportSummary {
    let mut summary = ImportSummary::default();
    match parsed {
        Value::Array(raw) => {
            let days = parse_days(t, raw);
            summary.days = replace_days(t, days);
            summary.replaced.push(keys::DAYS);
        }
        Value::Object(map) => import_object(t, map, &mut summary),
        _ => {}
    }
    summary
}

/// Replace tracker state with the content of an export file.
pub fn import_json(t: &mut Tracker, raw: &str) -> AppResult<ImportSummary> {
    let parsed = parse_import(raw)?;
    Ok(apply_import(t, &parsed))
}

/// One logged food, flattened for CSV.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FoodRow {
    pub date: String,
    pub label: String,
    pub meal: String,
    pub food: String,
    pub brand: String,
    pub servings: f64,
    pub serving: String,
    pub calories: f64,
    pub protein: f64,
    pub fat: f64,
    pub carbs: f64,
    pub source: String,
    pub notes: String,
}

pub fn food_rows(days: &[Day]) -> Vec<FoodRow> {
    days.iter()
        .flat_map(|day| {
            day.foods.iter().map(move |f| FoodRow {
                date: day.date_iso.clone(),
                label: day.date_label.clone(),
                meal: f.meal.as_str().to_string(),
                food: f.food.clone(),
                brand: f.brand.clone(),
                servings: f.servings,
                serving: f.serving_label(),
                calories: f.totals.calories,
                protein: f.totals.protein,
                fat: f.totals.fat,
                carbs: f.totals.carbs,
                source: f.source.as_str().to_string(),
                notes: f.notes.clone(),
            })
        })
        .collect()
}
