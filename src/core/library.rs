//! Saved collections around the tracker: favorites, recipes, meal plans,
//! body measurements, workouts and search history.

use crate::core::select_index;
use crate::core::tracker::{MIN_SERVINGS, Tracker};
use crate::db::kv::keys;
use crate::errors::{AppError, AppResult};
use crate::models::favorite::{Favorite, MAX_FAVORITES};
use crate::models::food::{Food, FoodSource, Macros, Meal};
use crate::models::measurement::Measurement;
use crate::models::new_id;
use crate::models::plan::PlanItem;
use crate::models::recipe::{Recipe, clean_ingredients};
use crate::models::workout::{Exercise, Workout, default_title};
use crate::utils::date;

pub const MAX_SEARCH_HISTORY: usize = 8;

/// Key used to group plan items without a date.
pub const UNSCHEDULED: &str = "unscheduled";

fn servings_floor(servings: f64) -> f64 {
    if servings.is_finite() {
        servings.max(MIN_SERVINGS)
    } else {
        MIN_SERVINGS
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecipeForm {
    pub name: String,
    pub servings: f64,
    pub per_serving: Macros,
    pub ingredients: Vec<String>,
    pub notes: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlanForm {
    pub date_iso: String,
    pub meal: Option<Meal>,
    pub name: String,
    pub per_serving: Macros,
    pub servings: f64,
    pub notes: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct WorkoutForm {
    pub date_iso: String,
    pub title: String,
    pub duration: f64,
    pub calories: f64,
    pub notes: String,
    pub exercises: Vec<Exercise>,
}

impl Tracker {
    // ---------------------------------------------------------------
    // Favorites
    // ---------------------------------------------------------------

    /// Add the food to favorites, or remove it when a favorite with the same
    /// name exists. Returns true when added.
    pub fn toggle_favorite(&mut self, food: &Food) -> bool {
        self.touch(keys::FAVORITES);
        if self.favorites.iter().any(|f| f.food == food.food) {
            self.favorites.retain(|f| f.food != food.food);
            return false;
        }
        self.favorites.insert(0, Favorite::from_food(food));
        self.favorites.truncate(MAX_FAVORITES);
        true
    }

    /// Toggle the favorite state of a food of the active day.
    pub fn toggle_favorite_food(&mut self, selector: &str) -> AppResult<bool> {
        let idx = self.find_food(selector)?;
        let food = self.active().foods[idx].clone();
        Ok(self.toggle_favorite(&food))
    }

    /// Resolve a favorite by position, id prefix or name.
    pub fn find_favorite(&self, selector: &str) -> AppResult<usize> {
        if let Some(i) = self.favorites.iter().position(|f| f.matches(selector)) {
            return Ok(i);
        }
        select_index(&self.favorites, |f| f.id.as_str(), selector, "favorite")
    }

    pub fn remove_favorite(&mut self, selector: &str) -> AppResult<Favorite> {
        let idx = self.find_favorite(selector)?;
        self.touch(keys::FAVORITES);
        Ok(self.favorites.remove(idx))
    }

    pub fn log_favorite(&mut self, selector: &str, servings: f64, meal: Option<Meal>) -> AppResult<Food> {
        let fav = self.favorites[self.find_favorite(selector)?].clone();
        let servings = servings_floor(servings);
        let mut food = Food::logged(
            &fav.food,
            fav.per_serving,
            servings,
            self.resolve_meal(meal),
            FoodSource::Favorite,
            self.clock.now_ms,
        );
        food.brand = fav.brand;
        food.serving_size = fav.serving_size;
        food.serving_unit = fav.serving_unit;
        food.notes = fav.notes;
        self.log_food(food.clone());
        Ok(food)
    }

    // ---------------------------------------------------------------
    // Recipes
    // ---------------------------------------------------------------

    pub fn add_recipe(&mut self, form: RecipeForm) -> AppResult<Recipe> {
        let name = form.name.trim();
        if name.is_empty() {
            return Err(AppError::invalid("Give your recipe a name."));
        }
        if form.per_serving.has_negative() {
            return Err(AppError::invalid("Values cannot be negative."));
        }
        let recipe = Recipe {
            id: new_id(),
            name: name.to_string(),
            servings: if form.servings.is_finite() { form.servings.max(1.0) } else { 1.0 },
            per_serving: form.per_serving,
            ingredients: clean_ingredients(&form.ingredients),
            notes: form.notes.trim().to_string(),
            created_at: self.clock.now_ms,
        };
        self.recipes.insert(0, recipe.clone());
        self.touch(keys::RECIPES);
        Ok(recipe)
    }

    pub fn find_recipe(&self, selector: &str) -> AppResult<usize> {
        if let Some(i) = self
            .recipes
            .iter()
            .position(|r| r.name.eq_ignore_ascii_case(selector.trim()))
        {
            return Ok(i);
        }
        select_index(&self.recipes, |r| r.id.as_str(), selector, "recipe")
    }

    pub fn remove_recipe(&mut self, selector: &str) -> AppResult<Recipe> {
        let idx = self.find_recipe(selector)?;
        self.touch(keys::RECIPES);
        Ok(self.recipes.remove(idx))
    }

    pub fn duplicate_recipe(&mut self, selector: &str) -> AppResult<Recipe> {
        let mut copy = self.recipes[self.find_recipe(selector)?].clone();
        copy.id = new_id();
        copy.name = format!("{} (Copy)", copy.name);
        copy.created_at = self.clock.now_ms;
        self.recipes.insert(0, copy.clone());
        self.touch(keys::RECIPES);
        Ok(copy)
    }

    /// Log a recipe; `servings` defaults to the recipe's own yield.
    pub fn log_recipe(&mut self, selector: &str, servings: Option<f64>, meal: Option<Meal>) -> AppResult<Food> {
        let recipe = self.recipes[self.find_recipe(selector)?].clone();
        let servings = servings_floor(servings.unwrap_or(recipe.servings));
        let mut food = Food::logged(
            &recipe.name,
            recipe.per_serving,
            servings,
            self.resolve_meal(meal),
            FoodSource::Recipe,
            self.clock.now_ms,
        );
        food.notes = recipe.notes;
        self.log_food(food.clone());
        Ok(food)
    }

    // ---------------------------------------------------------------
    // Plans
    // ---------------------------------------------------------------

    pub fn add_plan_item(&mut self, form: PlanForm) -> AppResult<PlanItem> {
        let name = form.name.trim();
        if name.is_empty() {
            return Err(AppError::invalid("Add a meal name first."));
        }
        let date_iso = if form.date_iso.trim().is_empty() {
            date::to_iso(self.clock.today)
        } else {
            let d = date::parse_date(&form.date_iso)
                .ok_or_else(|| AppError::InvalidDate(form.date_iso.clone()))?;
            date::to_iso(d)
        };
        let item = PlanItem {
            id: new_id(),
            date_iso,
            meal: form.meal.unwrap_or(Meal::Breakfast),
            name: name.to_string(),
            per_serving: form.per_serving,
            servings: servings_floor(form.servings),
            notes: form.notes.trim().to_string(),
        };
        self.plans.insert(0, item.clone());
        self.touch(keys::PLANS);
        Ok(item)
    }

    pub fn remove_plan_item(&mut self, selector: &str) -> AppResult<PlanItem> {
        let idx = select_index(&self.plans, |p| p.id.as_str(), selector, "plan item")?;
        self.touch(keys::PLANS);
        Ok(self.plans.remove(idx))
    }

    /// Drop every item planned for `date_iso`; returns how many were removed.
    pub fn remove_plan_date(&mut self, date_iso: &str) -> usize {
        let before = self.plans.len();
        self.plans.retain(|p| p.date_iso != date_iso);
        let removed = before - self.plans.len();
        if removed > 0 {
            self.touch(keys::PLANS);
        }
        removed
    }

    /// Log every item planned for `date_iso` into the active day.
    pub fn apply_plan(&mut self, date_iso: &str) -> AppResult<usize> {
        let items: Vec<PlanItem> = self
            .plans
            .iter()
            .filter(|p| p.date_iso == date_iso)
            .cloned()
            .collect();
        if items.is_empty() {
            return Err(AppError::NotFound(format!("No entries planned for {date_iso}.")));
        }
        for item in &items {
            let mut food = Food::logged(
                &item.name,
                item.per_serving,
                item.servings,
                item.meal,
                FoodSource::Plan,
                self.clock.now_ms,
            );
            food.notes = item.notes.clone();
            self.log_food(food);
        }
        Ok(items.len())
    }

    /// Plan items grouped by date, newest date first.
    pub fn plans_by_date(&self) -> Vec<(String, Vec<&PlanItem>)> {
        let mut groups: Vec<(String, Vec<&PlanItem>)> = Vec::new();
        for item in &self.plans {
            let key = if item.date_iso.is_empty() {
                UNSCHEDULED.to_string()
            } else {
                item.date_iso.clone()
            };
            match groups.iter_mut().find(|(k, _)| *k == key) {
                Some((_, list)) => list.push(item),
                None => groups.push((key, vec![item])),
            }
        }
        groups.sort_by(|a, b| b.0.cmp(&a.0));
        groups
    }

    // ---------------------------------------------------------------
    // Measurements & workouts
    // ---------------------------------------------------------------

    pub fn add_measurement(&mut self, mut entry: Measurement) -> AppResult<Measurement> {
        if !entry.has_any_metric() {
            return Err(AppError::invalid("Enter at least one metric."));
        }
        entry.id = new_id();
        if date::parse_date(&entry.date_iso).is_none() {
            entry.date_iso = date::to_iso(self.clock.today);
        }
        entry.notes = entry.notes.trim().to_string();
        self.measurements.insert(0, entry.clone());
        self.touch(keys::MEASUREMENTS);
        Ok(entry)
    }

    pub fn remove_measurement(&mut self, selector: &str) -> AppResult<Measurement> {
        let idx = select_index(&self.measurements, |m| m.id.as_str(), selector, "measurement")?;
        self.touch(keys::MEASUREMENTS);
        Ok(self.measurements.remove(idx))
    }

    pub fn add_workout(&mut self, form: WorkoutForm) -> AppResult<Workout> {
        let title = form.title.trim();
        if title.is_empty() && form.exercises.is_empty() {
            return Err(AppError::invalid("Add a title or exercise."));
        }
        let date_iso = date::parse_date(&form.date_iso)
            .map(date::to_iso)
            .unwrap_or_else(|| date::to_iso(self.clock.today));
        let workout = Workout {
            id: new_id(),
            date_iso,
            title: if title.is_empty() { default_title() } else { title.to_string() },
            duration: form.duration.max(0.0),
            calories: form.calories.max(0.0),
            notes: form.notes.trim().to_string(),
            exercises: form.exercises,
        };
        self.workouts.insert(0, workout.clone());
        self.touch(keys::WORKOUTS);
        Ok(workout)
    }

    pub fn remove_workout(&mut self, selector: &str) -> AppResult<Workout> {
        let idx = select_index(&self.workouts, |w| w.id.as_str(), selector, "workout")?;
        self.touch(keys::WORKOUTS);
        Ok(self.workouts.remove(idx))
    }

    pub fn workouts_newest_first(&self) -> Vec<&Workout> {
        let mut list: Vec<&Workout> = self.workouts.iter().collect();
        list.sort_by(|a, b| b.date_iso.cmp(&a.date_iso));
        list
    }

    // ---------------------------------------------------------------
    // Search history
    // ---------------------------------------------------------------

    pub fn remember_search(&mut self, term: &str) {
        let term = term.trim();
        if term.is_empty() {
            return;
        }
        self.search_history.retain(|t| t != term);
        self.search_history.insert(0, term.to_string());
        self.search_history.truncate(MAX_SEARCH_HISTORY);
        self.touch(keys::SEARCH_HISTORY);
    }

    pub fn clear_search_history(&mut self) {
        self.search_history.clear();
        self.touch(keys::SEARCH_HISTORY);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::tracker::tests::clock;

    #[test]
    fn favorites_toggle_and_cap() {
        let mut t = Tracker::new(clock());
        for i in 0..14 {
            let f = t.quick_add(&format!("food{i}"), 100.0, "", None).unwrap();
            assert!(t.toggle_favorite(&f));
        }
        assert_eq!(t.favorites.len(), MAX_FAVORITES);
        assert_eq!(t.favorites[0].food, "food13");

        let f = t.active().foods[13].clone();
        assert!(!t.toggle_favorite(&f));
        assert_eq!(t.favorites.len(), MAX_FAVORITES - 1);

        let logged = t.log_favorite("FOOD12", 0.0, Some(Meal::Lunch)).unwrap();
        assert_eq!(logged.servings, MIN_SERVINGS);
        assert_eq!(logged.totals.calories, 25.0);
        assert_eq!(logged.source, FoodSource::Favorite);
    }

    #[test]
    fn recipes_add_copy_log() {
        let mut t = Tracker::new(clock());
        assert!(t.add_recipe(RecipeForm::default()).is_err());

        let r = t
            .add_recipe(RecipeForm {
                name: " Chili ".into(),
                servings: 0.0,
                per_serving: Macros::new(400.0, 30.0, 12.0, 40.0),
                ingredients: vec!["beans".into(), " ".into()],
                notes: String::new(),
            })
            .unwrap();
        assert_eq!(r.servings, 1.0);
        assert_eq!(r.ingredients, vec!["beans"]);

        let copy = t.duplicate_recipe("chili").unwrap();
        assert_eq!(copy.name, "Chili (Copy)");
        assert_eq!(t.recipes[0].id, copy.id);

        let food = t.log_recipe("Chili", Some(2.0), None).unwrap();
        assert_eq!(food.totals.calories, 800.0);
        assert_eq!(food.source, FoodSource::Recipe);
    }

    #[test]
    fn plans_group_and_apply() {
        let mut t = Tracker::new(clock());
        let item = |date: &str, name: &str| PlanForm {
            date_iso: date.into(),
            name: name.into(),
            servings: 2.0,
            per_serving: Macros::calories_only(150.0),
            ..Default::default()
        };
        t.add_plan_item(item("2026-10-19", "Oats")).unwrap();
        t.add_plan_item(item("2026-10-20", "Soup")).unwrap();
        t.add_plan_item(item("2026-10-19", "Eggs")).unwrap();
        assert!(t.add_plan_item(item("tomorrow", "x")).is_err());

        let groups = t.plans_by_date();
        assert_eq!(groups[0].0, "2026-10-20");
        assert_eq!(groups[1].1.len(), 2);

        assert_eq!(t.apply_plan("2026-10-19").unwrap(), 2);
        assert_eq!(t.active().foods.len(), 2);
        assert_eq!(t.active().foods[0].totals.calories, 300.0);
        assert!(t.apply_plan("2030-01-01").is_err());

        assert_eq!(t.remove_plan_date("2026-10-19"), 2);
        assert_eq!(t.plans.len(), 1);
    }

    #[test]
    fn measurements_and_workouts_require_content() {
        let mut t = Tracker::new(clock());
        assert!(t.add_measurement(Measurement::default()).is_err());
        let m = t
            .add_measurement(Measurement {
                weight: Some(80.0),
                ..Default::default()
            })
            .unwrap();
        assert_eq!(m.date_iso, "2026-10-18");

        assert!(t.add_workout(WorkoutForm::default()).is_err());
        let w = t
            .add_workout(WorkoutForm {
                exercises: vec![Exercise::parse("Row:3:10").unwrap()],
                ..Default::default()
            })
            .unwrap();
        assert_eq!(w.title, "Workout");
    }

    #[test]
    fn search_history_is_recent_unique_capped() {
        let mut t = Tracker::new(clock());
        for term in ["a", "b", "c", "d", "e", "f", "g", "h", "i", "b", "  "] {
            t.remember_search(term);
        }
        assert_eq!(t.search_history.len(), MAX_SEARCH_HISTORY);
        assert_eq!(t.search_history[0], "b");
        assert_eq!(t.search_history.iter().filter(|s| *s == "b").count(), 1);
        t.clear_search_history();
        assert!(t.search_history.is_empty());
    }
}
