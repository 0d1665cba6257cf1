//! Trends across days and body measurements.

use crate::core::totals::sum_foods;
use crate::core::units::format_count;
use crate::models::day::Day;
use crate::models::food::Macros;
use crate::models::measurement::{Measurement, Metric};

/// Days included in the rolling averages.
pub const AVERAGE_WINDOW: usize = 7;
pub const TOP_FOODS: usize = 5;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Insights {
    pub averages: Macros,
    pub average_water_oz: f64,
    /// Trailing days (from the newest) with at least one food logged.
    pub streak: usize,
    pub top_foods: Vec<(String, usize)>,
    /// Index of the day closest to the calorie goal.
    pub best_day: Option<usize>,
}

pub fn insights(days: &[Day], calorie_goal: f64) -> Insights {
    if days.is_empty() {
        return Insights::default();
    }

    let totals: Vec<Macros> = days.iter().map(|d| sum_foods(&d.foods)).collect();

    let start = days.len().saturating_sub(AVERAGE_WINDOW);
    let window = &totals[start..];
    let divisor = window.len().max(1) as f64;
    let sum = window.iter().fold(Macros::default(), |acc, t| acc + *t);
    let water: f64 = days[start..].iter().map(|d| d.water_oz).sum();

    let mut counts: Vec<(String, usize)> = Vec::new();
    for food in days.iter().flat_map(|d| d.foods.iter()) {
        let name = if food.food.is_empty() { "Unknown" } else { food.food.as_str() };
        match counts.iter_mut().find(|(n, _)| n == name) {
            Some((_, c)) => *c += 1,
            None => counts.push((name.to_string(), 1)),
        }
    }
    // stable: ties keep first-seen order
    counts.sort_by(|a, b| b.1.cmp(&a.1));
    counts.truncate(TOP_FOODS);

    let streak = days.iter().rev().take_while(|d| !d.foods.is_empty()).count();

    let mut best: Option<(usize, f64)> = None;
    for (i, t) in totals.iter().enumerate() {
        let diff = (t.calories - calorie_goal).abs();
        if best.is_none_or(|(_, d)| diff < d) {
            best = Some((i, diff));
        }
    }

    Insights {
        averages: sum.scaled(1.0 / divisor),
        average_water_oz: water / divisor,
        streak,
        top_foods: counts,
        best_day: best.map(|(i, _)| i),
    }
}

/// Measurements sorted newest first by date.
pub fn sorted_newest_first(list: &[Measurement]) -> Vec<&Measurement> {
    let mut sorted: Vec<&Measurement> = list.iter().collect();
    sorted.sort_by(|a, b| b.date_iso.cmp(&a.date_iso));
    sorted
}

/// Change of one metric between the two most recent measurements, when both
/// carry a value.
pub fn measurement_delta(list: &[Measurement], metric: Metric) -> Option<f64> {
    let sorted = sorted_newest_first(list);
    let (latest, previous) = (sorted.first()?, sorted.get(1)?);
    let delta = latest.get(metric)? - previous.get(metric)?;
    delta.is_finite().then_some(delta)
}

/// `+1.5`, `-2`, `0`.
pub fn format_delta(value: f64) -> String {
    let rounded = (value * 10.0).round() / 10.0;
    let sign = if rounded > 0.0 { "+" } else { "" };
    format!("{sign}{}", format_count(rounded))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::food::{Food, FoodSource, Meal};
    use chrono::NaiveDate;

    fn day_with(foods: &[(&str, f64)], water: f64) -> Day {
        let mut d = Day::new(NaiveDate::from_ymd_opt(2026, 10, 1).unwrap());
        d.water_oz = water;
        d.foods = foods
            .iter()
            .map(|(n, c)| Food::logged(n, Macros::calories_only(*c), 1.0, Meal::Snack, FoodSource::Quick, 1))
            .collect();
        d
    }

    #[test]
    fn insights_over_recent_days() {
        let mut days: Vec<Day> = (0..8).map(|_| day_with(&[("Toast", 100.0)], 8.0)).collect();
        days[0] = day_with(&[("Cake", 5000.0)], 0.0);
        days[3] = day_with(&[], 0.0);
        days[6] = day_with(&[("Soup", 1900.0), ("Apple", 95.0), ("Apple", 95.0)], 16.0);

        let i = insights(&days, 2000.0);
        // last 7: days 1..=7 → 100 * 5 + 0 + 2090
        assert!((i.averages.calories - 2590.0 / 7.0).abs() < 1e-9);
        assert!((i.average_water_oz - (8.0 * 5.0 + 16.0) / 7.0).abs() < 1e-9);
        assert_eq!(i.streak, 4);
        assert_eq!(i.top_foods[0], ("Toast".to_string(), 5));
        assert_eq!(i.top_foods[1], ("Apple".to_string(), 2));
        assert_eq!(i.best_day, Some(6));
    }

    #[test]
    fn empty_history_has_no_insights() {
        assert_eq!(insights(&[], 2000.0), Insights::default());
    }

    #[test]
    fn deltas_need_two_values() {
        let m = |date: &str, weight: Option<f64>, waist: Option<f64>| Measurement {
            date_iso: date.into(),
            weight,
            waist,
            ..Default::default()
        };
        let list = vec![
            m("2026-09-01", Some(82.0), None),
            m("2026-10-01", Some(80.55), Some(90.0)),
        ];
        let d = measurement_delta(&list, Metric::Weight).unwrap();
        assert_eq!(format_delta(d), "-1.5");
        assert_eq!(measurement_delta(&list, Metric::Waist), None);
        assert_eq!(format_delta(2.0), "+2");
        assert_eq!(format_delta(0.0), "0");
    }
}
