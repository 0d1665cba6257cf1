//! Calorie tracker state.
//!
//! `Tracker` holds every tracker collection in memory. Commands load it from
//! storage, apply one operation, and `save` writes back only the keys the
//! operation touched.

use crate::core::select_index;
use crate::core::units::{self, SERVINGS};
use crate::db::kv::{Storage, keys};
use crate::errors::{AppError, AppResult};
use crate::models::day::{Day, GoalOverrides};
use crate::models::favorite::Favorite;
use crate::models::food::{Food, FoodSource, Macros, Meal};
use crate::models::goals::{Goals, MacroPreset};
use crate::models::measurement::Measurement;
use crate::models::new_id;
use crate::models::plan::PlanItem;
use crate::models::prefs::Prefs;
use crate::models::recipe::Recipe;
use crate::models::workout::Workout;
use crate::utils::date::{self, Clock};
use chrono::NaiveDate;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::cmp::Ordering;
use std::collections::BTreeSet;

/// Smallest amount that can be logged.
pub const MIN_SERVINGS: f64 = 0.25;

/// A removed food, kept so the removal can be undone in place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Removal {
    pub item: Food,
    pub index: usize,
    pub day_index: usize,
}

/// Values entered for a new or edited food.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FoodForm {
    pub name: String,
    pub brand: String,
    pub serving_size: f64,
    pub serving_unit: String,
    pub per_serving: Macros,
    /// Amount consumed; 0 means one serving.
    pub amount: f64,
    /// `servings` or any unit name.
    pub amount_unit: String,
    pub notes: String,
    pub meal: Option<Meal>,
}

impl FoodForm {
    /// Validate the form and work out the number of servings.
    pub fn servings(&self) -> AppResult<f64> {
        if self.name.trim().is_empty() {
            return Err(AppError::invalid("Food name is required"));
        }
        if self.serving_size < 0.0 || self.per_serving.has_negative() {
            return Err(AppError::invalid("Values cannot be negative."));
        }
        if self.amount < 0.0 {
            return Err(AppError::invalid("Amount cannot be negative."));
        }
        let unit = self.amount_unit_or_servings();
        if unit != SERVINGS && units::normalize_unit(unit).is_none() {
            return Err(AppError::InvalidUnit(unit.to_string()));
        }
        if !self.serving_unit.trim().is_empty() && units::normalize_unit(&self.serving_unit).is_none() {
            return Err(AppError::InvalidUnit(self.serving_unit.clone()));
        }
        if self.amount == 0.0 {
            return Ok(1.0);
        }
        match units::servings_from_amount(self.amount, unit, self.serving_size, &self.serving_unit) {
            Some(s) => Ok(s.max(MIN_SERVINGS)),
            None => Err(AppError::invalid("Enter a serving size to convert g/oz/cup.")),
        }
    }

    fn amount_unit_or_servings(&self) -> &str {
        let u = self.amount_unit.trim();
        if u.is_empty() { SERVINGS } else { u }
    }

    fn normalized_unit(&self) -> String {
        units::normalize_unit(&self.serving_unit)
            .map(|u| u.as_str().to_string())
            .unwrap_or_default()
    }
}

/// Partial update of a logged food; unset fields keep their value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FoodPatch {
    pub name: Option<String>,
    pub brand: Option<String>,
    pub meal: Option<Meal>,
    pub serving_size: Option<f64>,
    pub serving_unit: Option<String>,
    pub calories: Option<f64>,
    pub protein: Option<f64>,
    pub fat: Option<f64>,
    pub carbs: Option<f64>,
    pub amount: Option<f64>,
    pub amount_unit: Option<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum SortKey {
    #[default]
    CreatedAt,
    Food,
    Meal,
    Calories,
    Protein,
    Fat,
    Carbs,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum SortDir {
    Asc,
    #[default]
    Desc,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FoodQuery {
    pub meal: Option<Meal>,
    pub source: Option<FoodSource>,
    pub sort: SortKey,
    pub dir: SortDir,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum GoalField {
    Calories,
    Protein,
    Fat,
    Carbs,
    Water,
}

pub struct Tracker {
    pub days: Vec<Day>,
    pub current: usize,
    pub goals: Goals,
    pub prefs: Prefs,
    pub saved_tdee: Option<f64>,
    pub favorites: Vec<Favorite>,
    pub search_history: Vec<String>,
    pub recipes: Vec<Recipe>,
    pub plans: Vec<PlanItem>,
    pub measurements: Vec<Measurement>,
    pub workouts: Vec<Workout>,
    pub last_removal: Option<Removal>,
    pub clock: Clock,
    dirty: BTreeSet<&'static str>,
}

/// Decode a list blob element by element, dropping malformed entries.
fn load_list<T: serde::de::DeserializeOwned>(store: &Storage<'_>, key: &str) -> AppResult<Vec<T>> {
    let raw: Value = store.load(key, || Value::Null)?;
    Ok(match raw {
        Value::Array(items) => items
            .into_iter()
            .filter_map(|v| serde_json::from_value(v).ok())
            .collect(),
        _ => Vec::new(),
    })
}

impl Tracker {
    /// Fresh state with a single empty day.
    pub fn new(clock: Clock) -> Self {
        Self {
            days: vec![Day::new(clock.today)],
            current: 0,
            goals: Goals::default(),
            prefs: Prefs::default(),
            saved_tdee: None,
            favorites: Vec::new(),
            search_history: Vec::new(),
            recipes: Vec::new(),
            plans: Vec::new(),
            measurements: Vec::new(),
            workouts: Vec::new(),
            last_removal: None,
            clock,
            dirty: BTreeSet::new(),
        }
    }

    pub fn load(store: &Storage<'_>, clock: Clock) -> AppResult<Self> {
        let mut t = Self::new(clock);

        let days: Vec<Day> = load_list(store, keys::DAYS)?;
        if !days.is_empty() {
            t.days = days
                .into_iter()
                .map(|d| d.normalize(clock.today, clock.now_ms))
                .collect();
        }
        let idx: f64 = store.load(keys::CURRENT_DAY, || 0.0)?;
        t.current = if idx.is_finite() && idx > 0.0 { idx as usize } else { 0 };
        t.clamp_current();

        t.goals = store.load(keys::GOALS, Goals::default)?;
        t.prefs = store.load(keys::PREFS, Prefs::default)?;
        let tdee: f64 = store.load(keys::TDEE, || 0.0)?;
        t.saved_tdee = (tdee.is_finite() && tdee > 0.0).then_some(tdee);
        t.favorites = load_list(store, keys::FAVORITES)?;
        t.search_history = load_list(store, keys::SEARCH_HISTORY)?;
        t.recipes = load_list(store, keys::RECIPES)?;
        t.plans = load_list(store, keys::PLANS)?;
        t.measurements = load_list(store, keys::MEASUREMENTS)?;
        t.workouts = load_list(store, keys::WORKOUTS)?;
        t.last_removal = store.load(keys::LAST_REMOVAL, || None)?;
        Ok(t)
    }

    /// Persist every key changed since load in one transaction. Returns the
    /// keys written; on failure nothing is written and the keys stay dirty.
    pub fn save(&mut self, store: &Storage<'_>) -> AppResult<Vec<&'static str>> {
        let dirty: Vec<&'static str> = self.dirty.iter().copied().collect();
        if dirty.is_empty() {
            return Ok(dirty);
        }
        let tx = store.transaction()?;
        for key in &dirty {
            self.write_key(store, key)?;
        }
        tx.commit()?;
        self.dirty.clear();
        Ok(dirty)
    }

    fn write_key(&self, store: &Storage<'_>, key: &str) -> AppResult<()> {
        match key {
            keys::DAYS => store.save(key, &self.days)?,
            keys::CURRENT_DAY => store.save(key, &self.current)?,
            keys::GOALS => store.save(key, &self.goals)?,
            keys::PREFS => store.save(key, &self.prefs)?,
            keys::TDEE => match self.saved_tdee {
                Some(v) => store.save(key, &v)?,
                None => {
                    store.remove(key)?;
                }
            },
            keys::FAVORITES => store.save(key, &self.favorites)?,
            keys::SEARCH_HISTORY => store.save(key, &self.search_history)?,
            keys::RECIPES => store.save(key, &self.recipes)?,
            keys::PLANS => store.save(key, &self.plans)?,
            keys::MEASUREMENTS => store.save(key, &self.measurements)?,
            keys::WORKOUTS => store.save(key, &self.workouts)?,
            keys::LAST_REMOVAL => match &self.last_removal {
                Some(r) => store.save(key, r)?,
                None => {
                    store.remove(key)?;
                }
            },
            _ => {}
        }
        Ok(())
    }

    pub(crate) fn touch(&mut self, key: &'static str) {
        self.dirty.insert(key);
    }

    pub fn is_dirty(&self) -> bool {
        !self.dirty.is_empty()
    }

    fn clamp_current(&mut self) {
        self.current = self.current.min(self.days.len().saturating_sub(1));
    }

    // ---------------------------------------------------------------
    // Days
    // ---------------------------------------------------------------

    pub fn active(&self) -> &Day {
        &self.days[self.current]
    }

    pub fn active_mut(&mut self) -> &mut Day {
        self.touch(keys::DAYS);
        &mut self.days[self.current]
    }

    /// Meal for a new entry: the explicit choice, else the preference.
    pub fn resolve_meal(&self, meal: Option<Meal>) -> Meal {
        meal.unwrap_or_else(|| self.prefs.default_meal.resolve(self.clock.hour))
    }

    fn push_day(&mut self, day: Day) -> usize {
        self.days.push(day);
        self.current = self.days.len() - 1;
        self.touch(keys::DAYS);
        self.touch(keys::CURRENT_DAY);
        self.current
    }

    pub fn new_day(&mut self) -> usize {
        let day = Day::new(self.clock.today);
        self.push_day(day)
    }

    /// New day carrying the active day's foods (with fresh ids), notes,
    /// water, burned calories and overrides.
    pub fn copy_day(&mut self) -> usize {
        let src = self.active().clone();
        let now = self.clock.now_ms;
        let mut day = Day::new(self.clock.today);
        day.foods = src
            .foods
            .into_iter()
            .map(|mut f| {
                f.id = new_id();
                f.created_at = now;
                f
            })
            .collect();
        day.notes = src.notes;
        day.water_oz = src.water_oz;
        day.burned_calories = src.burned_calories;
        day.goal_overrides = src.goal_overrides;
        self.push_day(day)
    }

    /// Remove foods, notes, water and burned calories from the active day.
    pub fn clear_day(&mut self) {
        let day = self.active_mut();
        day.foods.clear();
        day.notes.clear();
        day.water_oz = 0.0;
        day.burned_calories = 0.0;
    }

    pub fn delete_day(&mut self) -> AppResult<Day> {
        if self.days.len() <= 1 {
            return Err(AppError::invalid("You must keep at least one day."));
        }
        let deleted = self.current;
        let removed = self.days.remove(deleted);
        self.clamp_current();
        // keep a pending undo pointing at the same day, or drop it with its day
        if let Some(removal) = self.last_removal.take() {
            self.last_removal = match removal.day_index.cmp(&deleted) {
                Ordering::Less => Some(removal),
                Ordering::Equal => None,
                Ordering::Greater => Some(Removal {
                    day_index: removal.day_index - 1,
                    ..removal
                }),
            };
            self.touch(keys::LAST_REMOVAL);
        }
        self.touch(keys::DAYS);
        self.touch(keys::CURRENT_DAY);
        Ok(removed)
    }

    /// Switch to a 0-based day index.
    pub fn switch_day(&mut self, index: usize) -> AppResult<()> {
        if index >= self.days.len() {
            return Err(AppError::NotFound(format!("day #{}", index + 1)));
        }
        self.current = index;
        self.touch(keys::CURRENT_DAY);
        Ok(())
    }

    pub fn set_notes(&mut self, notes: &str) {
        self.active_mut().notes = notes.trim().to_string();
    }

    pub fn set_burned(&mut self, calories: f64) -> AppResult<()> {
        if !calories.is_finite() || calories < 0.0 {
            return Err(AppError::invalid("Burned calories cannot be negative."));
        }
        self.active_mut().burned_calories = calories;
        Ok(())
    }

    pub fn set_label(&mut self, label: &str) {
        self.active_mut().date_label = label.trim().to_string();
    }

    pub fn set_date(&mut self, d: NaiveDate) {
        let day = self.active_mut();
        day.date_iso = date::to_iso(d);
        day.date = date::to_display(d);
    }

    /// Set one per-day override; values <= 0 remove it. Water is taken in the
    /// preferred unit.
    pub fn set_override(&mut self, field: GoalField, value: f64) {
        let value = if field == GoalField::Water {
            self.prefs.water_unit.to_oz(value)
        } else {
            value
        };
        let v = (value.is_finite() && value > 0.0).then_some(value);
        let o = &mut self.active_mut().goal_overrides;
        match field {
            GoalField::Calories => o.calories = v,
            GoalField::Protein => o.protein = v,
            GoalField::Fat => o.fat = v,
            GoalField::Carbs => o.carbs = v,
            GoalField::Water => o.water_oz = v,
        }
    }

    /// Seed the active day's overrides with the currently effective goals.
    pub fn enable_overrides(&mut self) {
        let e = self.effective_goals();
        self.active_mut().goal_overrides = GoalOverrides {
            calories: Some(e.calories),
            protein: Some(e.protein),
            fat: Some(e.fat),
            carbs: Some(e.carbs),
            water_oz: Some(e.water_oz),
        }
        .normalized();
    }

    pub fn clear_overrides(&mut self) {
        self.active_mut().goal_overrides = GoalOverrides::default();
    }

    pub fn effective_goals(&self) -> Goals {
        self.goals.effective(&self.active().goal_overrides)
    }

    // ---------------------------------------------------------------
    // Foods
    // ---------------------------------------------------------------

    /// Append to the active day; returns the new entry's id.
    pub fn log_food(&mut self, food: Food) -> String {
        let food = food.normalize(self.clock.now_ms);
        let id = food.id.clone();
        self.active_mut().foods.push(food);
        id
    }

    fn entry(&self, name: &str, per_serving: Macros, servings: f64, meal: Option<Meal>, source: FoodSource) -> Food {
        Food::logged(
            name.trim(),
            per_serving,
            servings,
            self.resolve_meal(meal),
            source,
            self.clock.now_ms,
        )
    }

    pub fn add_custom(&mut self, form: &FoodForm) -> AppResult<Food> {
        let servings = form.servings()?;
        let mut food = self.entry(&form.name, form.per_serving, servings, form.meal, FoodSource::Custom);
        food.brand = form.brand.trim().to_string();
        food.serving_size = form.serving_size;
        food.serving_unit = form.normalized_unit();
        food.notes = form.notes.trim().to_string();
        self.log_food(food.clone());
        Ok(food)
    }

    pub fn quick_add(&mut self, label: &str, calories: f64, notes: &str, meal: Option<Meal>) -> AppResult<Food> {
        if !calories.is_finite() || calories <= 0.0 {
            return Err(AppError::invalid("Calories are required"));
        }
        let name = if label.trim().is_empty() { "Quick Add" } else { label };
        let mut food = self.entry(name, Macros::calories_only(calories), 1.0, meal, FoodSource::Quick);
        food.notes = notes.trim().to_string();
        self.log_food(food.clone());
        Ok(food)
    }

    /// Resolve a 1-based position or id prefix in the active day.
    pub fn find_food(&self, selector: &str) -> AppResult<usize> {
        select_index(&self.active().foods, |f| f.id.as_str(), selector, "food")
    }

    pub fn edit_food(&mut self, selector: &str, patch: &FoodPatch) -> AppResult<Food> {
        let idx = self.find_food(selector)?;
        let current = self.active().foods[idx].clone();
        let ps = current.per_serving();

        let form = FoodForm {
            name: patch.name.clone().unwrap_or_else(|| current.food.clone()),
            brand: patch.brand.clone().unwrap_or_else(|| current.brand.clone()),
            serving_size: patch.serving_size.unwrap_or(current.serving_size),
            serving_unit: patch
                .serving_unit
                .clone()
                .unwrap_or_else(|| current.serving_unit.clone()),
            per_serving: Macros::new(
                patch.calories.unwrap_or(ps.calories),
                patch.protein.unwrap_or(ps.protein),
                patch.fat.unwrap_or(ps.fat),
                patch.carbs.unwrap_or(ps.carbs),
            ),
            amount: patch.amount.unwrap_or(current.servings),
            amount_unit: patch.amount_unit.clone().unwrap_or_else(|| SERVINGS.to_string()),
            notes: patch.notes.clone().unwrap_or_else(|| current.notes.clone()),
            meal: Some(patch.meal.unwrap_or(current.meal)),
        };
        let servings = form.servings()?;

        let food = &mut self.active_mut().foods[idx];
        food.food = form.name.trim().to_string();
        food.brand = form.brand.trim().to_string();
        food.meal = form.meal.unwrap_or(food.meal);
        food.serving_size = form.serving_size;
        food.serving_unit = form.normalized_unit();
        food.notes = form.notes.trim().to_string();
        food.servings = servings;
        food.per_serving = Some(form.per_serving);
        food.totals = form.per_serving.scaled(servings);
        Ok(food.clone())
    }

    /// Remove a food and remember it for `undo_remove`.
    pub fn remove_food(&mut self, selector: &str) -> AppResult<Food> {
        let idx = self.find_food(selector)?;
        let day_index = self.current;
        let item = self.active_mut().foods.remove(idx);
        self.last_removal = Some(Removal {
            item: item.clone(),
            index: idx,
            day_index,
        });
        self.touch(keys::LAST_REMOVAL);
        Ok(item)
    }

    /// Put the last removed food back where it was.
    pub fn undo_remove(&mut self) -> AppResult<Food> {
        let Some(removal) = self.last_removal.take() else {
            return Err(AppError::NotFound("nothing to undo".into()));
        };
        self.touch(keys::LAST_REMOVAL);
        let Some(day) = self.days.get_mut(removal.day_index) else {
            return Err(AppError::NotFound("the day of the removed food no longer exists".into()));
        };
        let at = removal.index.min(day.foods.len());
        day.foods.insert(at, removal.item.clone());
        self.touch(keys::DAYS);
        Ok(removal.item)
    }

    pub fn duplicate_food(&mut self, selector: &str) -> AppResult<Food> {
        let idx = self.find_food(selector)?;
        let mut copy = self.active().foods[idx].clone();
        copy.id = new_id();
        copy.created_at = self.clock.now_ms;
        self.log_food(copy.clone());
        Ok(copy)
    }

    /// Foods of the active day with their positions, filtered and sorted.
    pub fn list_foods(&self, q: &FoodQuery) -> Vec<(usize, &Food)> {
        let mut list: Vec<(usize, &Food)> = self
            .active()
            .foods
            .iter()
            .enumerate()
            .filter(|(_, f)| q.meal.is_none_or(|m| f.meal == m))
            .filter(|(_, f)| q.source.is_none_or(|s| f.source == s))
            .collect();

        list.sort_by(|(_, a), (_, b)| compare_foods(a, b, q.sort));
        if q.dir == SortDir::Desc {
            list.reverse();
        }
        list
    }

    // ---------------------------------------------------------------
    // Water, goals, prefs
    // ---------------------------------------------------------------

    /// Add `delta` (in the preferred unit) to today's water; never below 0.
    pub fn adjust_water(&mut self, delta: f64) -> f64 {
        let delta_oz = self.prefs.water_unit.to_oz(delta);
        let day = self.active_mut();
        day.water_oz = (day.water_oz + delta_oz).max(0.0);
        day.water_oz
    }

    /// Set a global goal; water is taken in the preferred unit.
    pub fn set_goal(&mut self, field: GoalField, value: f64) {
        let value = if value.is_finite() { value.max(0.0) } else { 0.0 };
        match field {
            GoalField::Calories => self.goals.calories = value,
            GoalField::Protein => self.goals.protein = value,
            GoalField::Fat => self.goals.fat = value,
            GoalField::Carbs => self.goals.carbs = value,
            GoalField::Water => self.goals.water_oz = self.prefs.water_unit.to_oz(value),
        }
        self.touch(keys::GOALS);
    }

    pub fn apply_preset(&mut self, preset: MacroPreset) -> bool {
        let applied = self.goals.apply_preset(preset);
        if applied {
            self.touch(keys::GOALS);
        }
        applied
    }

    pub fn save_tdee(&mut self, tdee: f64) {
        self.saved_tdee = Some(tdee.round());
        self.touch(keys::TDEE);
    }

    /// Use the saved TDEE as the daily calorie goal.
    pub fn apply_saved_tdee(&mut self) -> AppResult<f64> {
        let tdee = self
            .saved_tdee
            .ok_or_else(|| AppError::NotFound("saved TDEE (run `cal tdee --save` first)".into()))?;
        self.goals.calories = tdee.round();
        self.touch(keys::GOALS);
        Ok(self.goals.calories)
    }

    pub fn set_prefs(&mut self, prefs: Prefs) -> AppResult<()> {
        if !prefs.water_step.is_finite() || prefs.water_step <= 0.0 {
            return Err(AppError::invalid("Water step must be positive."));
        }
        self.prefs = prefs;
        self.touch(keys::PREFS);
        Ok(())
    }
}

fn compare_foods(a: &Food, b: &Food, key: SortKey) -> Ordering {
    let num = |x: f64, y: f64| x.partial_cmp(&y).unwrap_or(Ordering::Equal);
    match key {
        SortKey::CreatedAt => a.created_at.cmp(&b.created_at),
        SortKey::Food => a.food.to_lowercase().cmp(&b.food.to_lowercase()),
        SortKey::Meal => a.meal.as_str().cmp(b.meal.as_str()),
        SortKey::Calories => num(a.totals.calories, b.totals.calories),
        SortKey::Protein => num(a.totals.protein, b.totals.protein),
        SortKey::Fat => num(a.totals.fat, b.totals.fat),
        SortKey::Carbs => num(a.totals.carbs, b.totals.carbs),
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::db::pool::DbPool;

    pub fn clock() -> Clock {
        Clock {
            today: NaiveDate::from_ymd_opt(2026, 10, 18).unwrap(),
            hour: 8,
            now_ms: 1_000,
        }
    }

    fn form(name: &str, calories: f64) -> FoodForm {
        FoodForm {
            name: name.into(),
            per_serving: Macros::new(calories, 10.0, 5.0, 20.0),
            ..Default::default()
        }
    }

    #[test]
    fn custom_food_converts_amounts() {
        let mut t = Tracker::new(clock());
        let mut f = form("Rice", 130.0);
        f.serving_size = 100.0;
        f.serving_unit = "grams".into();
        f.amount = 250.0;
        f.amount_unit = "g".into();
        let food = t.add_custom(&f).unwrap();

        assert_eq!(food.servings, 2.5);
        assert_eq!(food.totals.calories, 325.0);
        assert_eq!(food.serving_unit, "g");
        assert_eq!(food.meal, Meal::Breakfast);
        assert_eq!(food.source, FoodSource::Custom);

        let mut tiny = form("Salt", 0.0);
        tiny.amount = 0.1;
        tiny.amount_unit = SERVINGS.into();
        assert_eq!(t.add_custom(&tiny).unwrap().servings, MIN_SERVINGS);
    }

    #[test]
    fn custom_food_validation() {
        let mut t = Tracker::new(clock());
        assert!(t.add_custom(&form("  ", 10.0)).is_err());
        assert!(t.add_custom(&form("Bad", -1.0)).is_err());

        let mut f = form("Juice", 50.0);
        f.amount = 2.0;
        f.amount_unit = "cup".into();
        let err = t.add_custom(&f).unwrap_err().to_string();
        assert!(err.contains("serving size"));
        assert!(t.active().foods.is_empty());
    }

    #[test]
    fn quick_add_needs_calories() {
        let mut t = Tracker::new(clock());
        assert!(t.quick_add("", 0.0, "", None).is_err());
        let f = t.quick_add("", 250.0, " coffee ", Some(Meal::Snack)).unwrap();
        assert_eq!(f.food, "Quick Add");
        assert_eq!(f.notes, "coffee");
        assert_eq!(f.source, FoodSource::Quick);
    }

    #[test]
    fn remove_then_undo_restores_position() {
        let mut t = Tracker::new(clock());
        t.quick_add("a", 100.0, "", None).unwrap();
        t.quick_add("b", 200.0, "", None).unwrap();
        t.quick_add("c", 300.0, "", None).unwrap();

        let removed = t.remove_food("2").unwrap();
        assert_eq!(removed.food, "b");
        assert_eq!(t.active().foods.len(), 2);

        t.undo_remove().unwrap();
        let names: Vec<_> = t.active().foods.iter().map(|f| f.food.as_str()).collect();
        assert_eq!(names, ["a", "b", "c"]);
        assert!(t.undo_remove().is_err());
    }

    #[test]
    fn undo_follows_its_day_when_an_earlier_day_is_deleted() {
        let mut t = Tracker::new(clock());
        t.new_day();
        t.quick_add("Pizza", 800.0, "", None).unwrap();
        t.new_day();
        t.switch_day(1).unwrap();
        t.remove_food("1").unwrap();

        t.switch_day(0).unwrap();
        t.delete_day().unwrap();
        assert_eq!(t.last_removal.as_ref().map(|r| r.day_index), Some(0));

        assert_eq!(t.undo_remove().unwrap().food, "Pizza");
        let counts: Vec<_> = t.days.iter().map(|d| d.foods.len()).collect();
        assert_eq!(counts, [1, 0]);
    }

    #[test]
    fn deleting_the_day_of_a_removal_drops_the_undo() {
        let mut t = Tracker::new(clock());
        t.quick_add("Tea", 5.0, "", None).unwrap();
        t.remove_food("1").unwrap();
        t.new_day();
        t.switch_day(0).unwrap();
        t.delete_day().unwrap();

        assert!(t.last_removal.is_none());
        assert!(t.undo_remove().is_err());
        assert!(t.days.iter().all(|d| d.foods.is_empty()));
    }

    #[test]
    fn edit_recomputes_totals() {
        let mut t = Tracker::new(clock());
        let f = t.add_custom(&form("Bread", 80.0)).unwrap();
        let patch = FoodPatch {
            amount: Some(3.0),
            calories: Some(90.0),
            meal: Some(Meal::Dinner),
            ..Default::default()
        };
        let edited = t.edit_food(&f.id[..8], &patch).unwrap();
        assert_eq!(edited.totals.calories, 270.0);
        assert_eq!(edited.totals.protein, 30.0);
        assert_eq!(edited.meal, Meal::Dinner);
        assert_eq!(edited.id, f.id);
    }

    #[test]
    fn days_copy_clear_delete() {
        let mut t = Tracker::new(clock());
        t.quick_add("x", 100.0, "", None).unwrap();
        t.set_notes("hi");
        t.adjust_water(16.0);
        t.set_override(GoalField::Calories, 1800.0);

        t.copy_day();
        assert_eq!(t.current, 1);
        assert_eq!(t.active().foods.len(), 1);
        assert_ne!(t.days[0].foods[0].id, t.days[1].foods[0].id);
        assert_eq!(t.active().goal_overrides.calories, Some(1800.0));
        assert_eq!(t.active().water_oz, 16.0);

        t.clear_day();
        assert!(t.active().foods.is_empty());
        assert_eq!(t.active().notes, "");
        assert_eq!(t.active().goal_overrides.calories, Some(1800.0));

        t.delete_day().unwrap();
        assert_eq!(t.current, 0);
        assert!(t.delete_day().is_err());
    }

    #[test]
    fn water_never_negative_and_respects_unit() {
        let mut t = Tracker::new(clock());
        t.adjust_water(8.0);
        assert_eq!(t.adjust_water(-20.0), 0.0);

        t.prefs.water_unit = crate::models::prefs::WaterUnit::Ml;
        let oz = t.adjust_water(29.5735);
        assert!((oz - 1.0).abs() < 1e-9);
        t.set_goal(GoalField::Water, 2000.0);
        assert!((t.goals.water_oz - 67.628).abs() < 0.001);
    }

    #[test]
    fn list_filters_and_sorts() {
        let mut t = Tracker::new(clock());
        t.quick_add("b", 300.0, "", Some(Meal::Lunch)).unwrap();
        t.quick_add("a", 100.0, "", Some(Meal::Lunch)).unwrap();
        t.quick_add("c", 200.0, "", Some(Meal::Dinner)).unwrap();

        let q = FoodQuery {
            meal: Some(Meal::Lunch),
            sort: SortKey::Calories,
            dir: SortDir::Asc,
            ..Default::default()
        };
        let names: Vec<_> = t.list_foods(&q).iter().map(|(_, f)| f.food.as_str()).collect();
        assert_eq!(names, ["a", "b"]);

        let q = FoodQuery {
            sort: SortKey::Food,
            dir: SortDir::Desc,
            ..Default::default()
        };
        let list = t.list_foods(&q);
        assert_eq!(list[0].1.food, "c");
        assert_eq!(list[0].0, 2);
    }

    #[test]
    fn state_round_trips_through_storage() {
        let pool = DbPool::in_memory().unwrap();
        let store = pool.storage();
        let mut t = Tracker::new(clock());
        t.quick_add("Tea", 5.0, "", None).unwrap();
        t.new_day();
        t.set_goal(GoalField::Calories, 2200.0);
        t.save_tdee(2345.6);
        let written = t.save(&store).unwrap();
        assert!(written.contains(&keys::DAYS));
        assert!(!t.is_dirty());

        let loaded = Tracker::load(&store, clock()).unwrap();
        assert_eq!(loaded.days.len(), 2);
        assert_eq!(loaded.current, 1);
        assert_eq!(loaded.days[0].foods[0].food, "Tea");
        assert_eq!(loaded.goals.calories, 2200.0);
        assert_eq!(loaded.saved_tdee, Some(2346.0));
    }

    #[test]
    fn failed_save_writes_nothing() {
        let pool = DbPool::in_memory().unwrap();
        pool.conn
            .execute_batch(
                "CREATE TRIGGER block_goals BEFORE INSERT ON storage
                 WHEN NEW.key = 'calorieGoals'
                 BEGIN SELECT RAISE(ABORT, 'blocked'); END;",
            )
            .unwrap();
        let store = pool.storage();
        let mut t = Tracker::new(clock());
        t.quick_add("Tea", 5.0, "", None).unwrap();
        t.set_goal(GoalField::Calories, 1800.0);

        assert!(t.save(&store).is_err());
        assert_eq!(store.get_raw(keys::DAYS).unwrap(), None);
        assert!(t.is_dirty());
    }

    #[test]
    fn stale_index_is_clamped_on_load() {
        let pool = DbPool::in_memory().unwrap();
        let store = pool.storage();
        store.set_raw(keys::CURRENT_DAY, "9").unwrap();
        store.set_raw(keys::DAYS, "garbage").unwrap();
        let t = Tracker::load(&store, clock()).unwrap();
        assert_eq!(t.days.len(), 1);
        assert_eq!(t.current, 0);
        assert_eq!(t.active().date_iso, "2026-10-18");
    }
}
