//! Day aggregates: food sums, per-meal sums, macro calorie split and goal
//! progress.

use crate::models::day::Day;
use crate::models::food::{Food, Macros, Meal};
use crate::models::goals::Goals;
use std::collections::BTreeMap;

pub fn sum_foods(foods: &[Food]) -> Macros {
    foods.iter().fold(Macros::default(), |acc, f| acc + f.totals)
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct MealTotal {
    pub macros: Macros,
    pub count: usize,
}

/// Sums per meal. Every meal is present, even without entries.
pub fn meal_totals(foods: &[Food]) -> BTreeMap<Meal, MealTotal> {
    let mut map: BTreeMap<Meal, MealTotal> =
        Meal::ALL.iter().map(|m| (*m, MealTotal::default())).collect();
    for food in foods {
        let entry = map.entry(food.meal).or_default();
        entry.macros += food.totals;
        entry.count += 1;
    }
    map
}

/// Share of calories coming from each macro, as rounded percentages.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MacroSplit {
    pub protein: u32,
    pub carbs: u32,
    pub fat: u32,
}

pub fn macro_split(totals: &Macros) -> MacroSplit {
    let protein = totals.protein * 4.0;
    let carbs = totals.carbs * 4.0;
    let fat = totals.fat * 9.0;
    let total = protein + carbs + fat;
    if total <= 0.0 || !total.is_finite() {
        return MacroSplit::default();
    }
    let pct = |v: f64| (v / total * 100.0).round() as u32;
    MacroSplit {
        protein: pct(protein),
        carbs: pct(carbs),
        fat: pct(fat),
    }
}

/// Progress toward a goal, capped at 100.
pub fn clamp_percent(value: f64, goal: f64) -> f64 {
    if goal <= 0.0 {
        return 0.0;
    }
    (value / goal * 100.0).min(100.0)
}

/// Everything the day summary shows.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DayProgress {
    pub eaten: Macros,
    pub goals: Goals,
    /// Effective calorie goal plus calories burned.
    pub calorie_goal: f64,
    pub remaining: f64,
    /// Positive when the goal was exceeded.
    pub over: f64,
    pub water_oz: f64,
    pub burned: f64,
}

impl DayProgress {
    pub fn for_day(day: &Day, global: &Goals) -> Self {
        let goals = global.effective(&day.goal_overrides);
        let eaten = sum_foods(&day.foods);
        let calorie_goal = goals.calories + day.burned_calories;
        Self {
            eaten,
            goals,
            calorie_goal,
            remaining: (calorie_goal - eaten.calories).max(0.0),
            over: eaten.calories - calorie_goal,
            water_oz: day.water_oz,
            burned: day.burned_calories,
        }
    }

    pub fn calories_percent(&self) -> f64 {
        clamp_percent(self.eaten.calories, self.calorie_goal)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::food::FoodSource;
    use chrono::NaiveDate;

    fn food(name: &str, m: Macros, meal: Meal) -> Food {
        Food::logged(name, m, 1.0, meal, FoodSource::Manual, 1)
    }

    #[test]
    fn sums_match_item_values() {
        let foods = vec![
            food("Eggs", Macros::new(140.0, 12.0, 10.0, 1.0), Meal::Breakfast),
            food("Rice", Macros::new(200.0, 4.0, 0.5, 45.0), Meal::Lunch),
            food("Cookie", Macros::new(160.0, 2.0, 8.0, 20.0), Meal::Lunch),
        ];
        let t = sum_foods(&foods);
        assert_eq!(t.calories, 500.0);
        assert_eq!(t.carbs, 66.0);

        let per_meal = meal_totals(&foods);
        assert_eq!(per_meal.len(), 4);
        assert_eq!(per_meal[&Meal::Lunch].count, 2);
        assert_eq!(per_meal[&Meal::Lunch].macros.calories, 360.0);
        assert_eq!(per_meal[&Meal::Dinner].count, 0);
    }

    #[test]
    fn split_is_rounded_share_of_macro_calories() {
        let s = macro_split(&Macros::new(0.0, 25.0, 10.0, 50.0));
        // 100 + 200 + 90 = 390 kcal
        assert_eq!((s.protein, s.carbs, s.fat), (26, 51, 23));
        assert_eq!(macro_split(&Macros::default()), MacroSplit::default());
    }

    #[test]
    fn progress_includes_burned_calories() {
        let mut day = Day::new(NaiveDate::from_ymd_opt(2026, 10, 18).unwrap());
        day.burned_calories = 300.0;
        day.goal_overrides.calories = Some(1800.0);
        day.foods.push(food("Pasta", Macros::calories_only(2500.0), Meal::Dinner));

        let p = DayProgress::for_day(&day, &Goals::default());
        assert_eq!(p.calorie_goal, 2100.0);
        assert_eq!(p.remaining, 0.0);
        assert_eq!(p.over, 400.0);
        assert_eq!(p.calories_percent(), 100.0);
        assert_eq!(clamp_percent(5.0, 0.0), 0.0);
        assert_eq!(clamp_percent(50.0, 200.0), 25.0);
    }
}
