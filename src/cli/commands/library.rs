//! Favorites, recipes, meal plans, measurements and workouts.

use crate::cli::commands::cal::table;
use crate::cli::commands::commit;
use crate::cli::parser::{
    FavoriteCommand, MeasureCommand, PlanCommand, RecipeCommand, WorkoutCommand,
};
use crate::core::insights::{format_delta, measurement_delta, sorted_newest_first};
use crate::core::library::{PlanForm, RecipeForm, WorkoutForm};
use crate::core::tracker::Tracker;
use crate::core::units::format_count;
use crate::db::pool::DbPool;
use crate::errors::{AppError, AppResult};
use crate::models::measurement::{Measurement, Metric};
use crate::models::workout::Exercise;
use crate::ui::messages::{header, info, success};
use crate::utils::colors::{self, RESET, color_for_delta, colorize_optional};
use crate::utils::date;
use crate::utils::format_number;
use crate::utils::formatting::{short_id, truncate};

fn or_dash(v: Option<f64>) -> String {
    v.map(format_count).unwrap_or_else(|| "-".into())
}

pub fn favorite(pool: &DbPool, t: &mut Tracker, cmd: &FavoriteCommand) -> AppResult<()> {
    match cmd {
        FavoriteCommand::List => {
            if t.favorites.is_empty() {
                info("No favorites yet. Use `cal favorite toggle <food>` on a logged food.");
                return Ok(());
            }
            let mut tbl = table(t, vec!["#", "Food", "Serving", "kcal", "P", "F", "C"]);
            for (i, f) in t.favorites.iter().enumerate() {
                let name = if f.brand.is_empty() {
                    f.food.clone()
                } else {
                    format!("{} ({})", f.food, f.brand)
                };
                let serving = if f.serving_size > 0.0 {
                    format!("{} {}", format_count(f.serving_size), f.serving_unit)
                } else {
                    String::new()
                };
                tbl.add_row(vec![
                    (i + 1).to_string(),
                    truncate(&name, 36),
                    colorize_optional(&serving),
                    format_number(f.per_serving.calories),
                    format_number(f.per_serving.protein),
                    format_number(f.per_serving.fat),
                    format_number(f.per_serving.carbs),
                ]);
            }
            print!("{}", tbl.render());
        }
        FavoriteCommand::Toggle { selector } => {
            let name = t.active().foods[t.find_food(selector)?].food.clone();
            let added = t.toggle_favorite_food(selector)?;
            let op = if added { "add" } else { "remove" };
            commit(pool, t, op, &format!("favorite:{name}"), "Favorites updated")?;
            if added {
                success(format!("{name} added to favorites."));
            } else {
                success(format!("{name} removed from favorites."));
            }
        }
        FavoriteCommand::Remove { selector } => {
            let fav = t.remove_favorite(selector)?;
            commit(pool, t, "remove", &format!("favorite:{}", fav.food), "Favorite removed")?;
            success(format!("{} removed from favorites.", fav.food));
        }
        FavoriteCommand::Log {
            selector,
            servings,
            meal,
        } => {
            let f = t.log_favorite(selector, *servings, *meal)?;
            commit(pool, t, "log", &format!("favorite:{}", f.food), "Favorite logged")?;
            success(format!(
                "Logged {} to {}: {} kcal.",
                f.food,
                f.meal,
                format_number(f.totals.calories)
            ));
        }
    }
    Ok(())
}

pub fn recipe(pool: &DbPool, t: &mut Tracker, cmd: &RecipeCommand) -> AppResult<()> {
    match cmd {
        RecipeCommand::List => {
            if t.recipes.is_empty() {
                info("No recipes saved.");
                return Ok(());
            }
            let mut tbl = table(t, vec!["#", "Id", "Recipe", "Servings", "kcal/serving", "Ingredients"]);
            for (i, r) in t.recipes.iter().enumerate() {
                tbl.add_row(vec![
                    (i + 1).to_string(),
                    short_id(&r.id).to_string(),
                    truncate(&r.name, 36),
                    format_count(r.servings),
                    format_number(r.per_serving.calories),
                    r.ingredients.len().to_string(),
                ]);
            }
            print!("{}", tbl.render());
        }
        RecipeCommand::Show { selector } => {
            let r = &t.recipes[t.find_recipe(selector)?];
            header(&r.name, colors::accent(t.prefs.theme));
            println!("Servings : {}", format_count(r.servings));
            println!(
                "Per serving: {} kcal | P {} g | F {} g | C {} g",
                format_number(r.per_serving.calories),
                format_number(r.per_serving.protein),
                format_number(r.per_serving.fat),
                format_number(r.per_serving.carbs)
            );
            for line in &r.ingredients {
                println!("  - {line}");
            }
            if !r.notes.is_empty() {
                println!("Notes: {}", r.notes);
            }
        }
        RecipeCommand::Add {
            name,
            macros,
            servings,
            ingredients,
            notes,
        } => {
            let r = t.add_recipe(RecipeForm {
                name: name.clone(),
                servings: *servings,
                per_serving: macros.macros(),
                ingredients: ingredients.clone(),
                notes: notes.clone(),
            })?;
            commit(pool, t, "add", &format!("recipe:{}", r.name), "Recipe saved")?;
            success(format!("Recipe saved: {}.", r.name));
        }
        RecipeCommand::Remove { selector } => {
            let r = t.remove_recipe(selector)?;
            commit(pool, t, "remove", &format!("recipe:{}", r.name), "Recipe removed")?;
            success(format!("Removed {}.", r.name));
        }
        RecipeCommand::Duplicate { selector } => {
            let r = t.duplicate_recipe(selector)?;
            commit(pool, t, "add", &format!("recipe:{}", r.name), "Recipe duplicated")?;
            success(format!("Saved {}.", r.name));
        }
        RecipeCommand::Log {
            selector,
            servings,
            meal,
        } => {
            let f = t.log_recipe(selector, *servings, *meal)?;
            commit(pool, t, "log", &format!("recipe:{}", f.food), "Recipe logged")?;
            success(format!(
                "Logged {} x{} to {}: {} kcal.",
                f.food,
                format_count(f.servings),
                f.meal,
                format_number(f.totals.calories)
            ));
        }
    }
    Ok(())
}

pub fn plan(pool: &DbPool, t: &mut Tracker, cmd: &PlanCommand) -> AppResult<()> {
    match cmd {
        PlanCommand::List => {
            let groups = t.plans_by_date();
            if groups.is_empty() {
                info("Nothing planned.");
                return Ok(());
            }
            let accent = colors::accent(t.prefs.theme);
            for (date_iso, items) in groups {
                let kcal: f64 = items
                    .iter()
                    .map(|p| p.per_serving.calories * p.servings)
                    .sum();
                header(format!("{date_iso} · {} kcal", format_number(kcal)), accent);
                let mut tbl = table(t, vec!["Id", "Meal", "Name", "Servings", "kcal"]);
                for p in items {
                    tbl.add_row(vec![
                        short_id(&p.id).to_string(),
                        p.meal.to_string(),
                        truncate(&p.name, 36),
                        format_count(p.servings),
                        format_number(p.per_serving.calories * p.servings),
                    ]);
                }
                print!("{}", tbl.render());
            }
        }
        PlanCommand::Add {
            name,
            macros,
            date: date_iso,
            meal,
            servings,
            notes,
        } => {
            let item = t.add_plan_item(PlanForm {
                date_iso: date_iso.clone(),
                meal: *meal,
                name: name.clone(),
                per_serving: macros.macros(),
                servings: *servings,
                notes: notes.clone(),
            })?;
            commit(pool, t, "add", &format!("plan:{}", item.date_iso), &item.name)?;
            success(format!("Planned {} for {} ({}).", item.name, item.date_iso, item.meal));
        }
        PlanCommand::Remove { selector } => {
            let item = t.remove_plan_item(selector)?;
            commit(pool, t, "remove", &format!("plan:{}", item.date_iso), &item.name)?;
            success(format!("Removed {} from {}.", item.name, item.date_iso));
        }
        PlanCommand::ClearDate { date: raw } => {
            let d = date::parse_date(raw).ok_or_else(|| AppError::InvalidDate(raw.clone()))?;
            let iso = date::to_iso(d);
            let removed = t.remove_plan_date(&iso);
            if removed == 0 {
                info(format!("Nothing planned for {iso}."));
                return Ok(());
            }
            commit(pool, t, "clear", &format!("plan:{iso}"), &format!("{removed} item(s) removed"))?;
            success(format!("Removed {removed} planned item(s) for {iso}."));
        }
        PlanCommand::Apply { date: raw } => {
            let d = date::parse_date(raw).ok_or_else(|| AppError::InvalidDate(raw.clone()))?;
            let iso = date::to_iso(d);
            let count = t.apply_plan(&iso)?;
            commit(pool, t, "log", &format!("plan:{iso}"), &format!("{count} item(s) logged"))?;
            success(format!("Logged {count} planned item(s) into the active day."));
        }
    }
    Ok(())
}

pub fn measure(pool: &DbPool, t: &mut Tracker, cmd: &MeasureCommand) -> AppResult<()> {
    match cmd {
        MeasureCommand::List => {
            if t.measurements.is_empty() {
                info("No measurements yet.");
                return Ok(());
            }
            let deltas: Vec<String> = Metric::ALL
                .iter()
                .filter_map(|m| {
                    measurement_delta(&t.measurements, *m).map(|d| {
                        format!("{} {}{}{}", m.label(), color_for_delta(d), format_delta(d), RESET)
                    })
                })
                .collect();
            if !deltas.is_empty() {
                println!("Change since previous: {}", deltas.join(" | "));
            }
            let mut headers = vec!["#", "Date"];
            headers.extend(Metric::ALL.iter().map(|m| m.label()));
            headers.push("Notes");
            let mut tbl = table(t, headers);
            for (i, m) in sorted_newest_first(&t.measurements).into_iter().enumerate() {
                let mut row = vec![(i + 1).to_string(), m.date_iso.clone()];
                row.extend(Metric::ALL.iter().map(|metric| or_dash(m.get(*metric))));
                row.push(colorize_optional(&truncate(&m.notes, 30)));
                tbl.add_row(row);
            }
            print!("{}", tbl.render());
        }
        MeasureCommand::Add {
            date: date_iso,
            weight,
            body_fat,
            waist,
            hips,
            chest,
            notes,
        } => {
            if !date_iso.is_empty() && date::parse_date(date_iso).is_none() {
                return Err(AppError::InvalidDate(date_iso.clone()));
            }
            let m = t.add_measurement(Measurement {
                date_iso: date_iso.clone(),
                weight: *weight,
                body_fat: *body_fat,
                waist: *waist,
                hips: *hips,
                chest: *chest,
                notes: notes.clone(),
                ..Measurement::default()
            })?;
            commit(pool, t, "add", &format!("measurement:{}", m.date_iso), "Measurement saved")?;
            success(format!("Measurement saved for {}.", m.date_iso));
        }
        MeasureCommand::Remove { selector } => {
            let m = t.remove_measurement(selector)?;
            commit(pool, t, "remove", &format!("measurement:{}", m.date_iso), "Measurement removed")?;
            success(format!("Removed measurement of {}.", m.date_iso));
        }
    }
    Ok(())
}

pub fn workout(pool: &DbPool, t: &mut Tracker, cmd: &WorkoutCommand) -> AppResult<()> {
    match cmd {
        WorkoutCommand::List => {
            let list = t.workouts_newest_first();
            if list.is_empty() {
                info("No workouts yet.");
                return Ok(());
            }
            let mut tbl = table(t, vec!["#", "Date", "Title", "Min", "kcal", "Exercises"]);
            for (i, w) in list.iter().enumerate() {
                let exercises = w
                    .exercises
                    .iter()
                    .map(|e| {
                        if e.sets > 0.0 || e.reps > 0.0 {
                            format!("{} {}x{}", e.name, format_count(e.sets), format_count(e.reps))
                        } else {
                            e.name.clone()
                        }
                    })
                    .collect::<Vec<_>>()
                    .join(", ");
                tbl.add_row(vec![
                    (i + 1).to_string(),
                    w.date_iso.clone(),
                    truncate(&w.title, 30),
                    format_count(w.duration),
                    format_count(w.calories),
                    colorize_optional(&truncate(&exercises, 40)),
                ]);
            }
            print!("{}", tbl.render());
        }
        WorkoutCommand::Add {
            title,
            date: date_iso,
            duration,
            calories,
            exercises,
            notes,
        } => {
            let parsed = exercises
                .iter()
                .map(|raw| {
                    Exercise::parse(raw)
                        .ok_or_else(|| AppError::invalid(format!("Invalid exercise: '{raw}'")))
                })
                .collect::<AppResult<Vec<_>>>()?;
            if *duration < 0.0 || *calories < 0.0 {
                return Err(AppError::invalid("Values cannot be negative."));
            }
            let w = t.add_workout(WorkoutForm {
                date_iso: date_iso.clone(),
                title: title.clone(),
                duration: *duration,
                calories: *calories,
                notes: notes.clone(),
                exercises: parsed,
            })?;
            commit(pool, t, "add", &format!("workout:{}", w.date_iso), &w.title)?;
            success(format!("Workout saved: {} ({}).", w.title, w.date_iso));
        }
        WorkoutCommand::Remove { selector } => {
            let w = t.remove_workout(selector)?;
            commit(pool, t, "remove", &format!("workout:{}", w.date_iso), &w.title)?;
            success(format!("Removed {}.", w.title));
        }
    }
    Ok(())
}
