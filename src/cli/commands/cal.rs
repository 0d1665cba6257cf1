//! `cal` command group: the active day, foods, water, goals, prefs and TDEE.
//! Saved collections live in `library`, network lookups in `lookup` and
//! file transfer in `transfer`.

use crate::cli::commands::{commit, library, lookup, open_tracker, transfer};
use crate::cli::parser::{CalCommand, DayCommand, FoodCommand, GoalsCommand, TdeeArgs};
use crate::config::Config;
use crate::core::insights::{self, AVERAGE_WINDOW};
use crate::core::tdee::{self, TdeeInput};
use crate::core::totals::{DayProgress, clamp_percent, macro_split, meal_totals, sum_foods};
use crate::core::tracker::{FoodForm, FoodPatch, FoodQuery, GoalField, Tracker};
use crate::core::units::{self, format_count};
use crate::db::pool::DbPool;
use crate::errors::{AppError, AppResult};
use crate::models::food::Food;
use crate::models::prefs::{Density, MealChoice};
use crate::ui::messages::{header, info, success};
use crate::ui::prompt::confirm;
use crate::utils::colors::{self, RESET, color_for_progress, colorize_optional};
use crate::utils::date;
use crate::utils::formatting::{short_id, truncate};
use crate::utils::table::Table;
use crate::utils::{format_number, progress_bar};

const BAR_WIDTH: usize = 20;

pub fn handle(cmd: &CalCommand, cfg: &Config, assume_yes: bool) -> AppResult<()> {
    if let CalCommand::Convert { amount, unit, to } = cmd {
        return convert(*amount, unit, to.as_deref());
    }

    let (pool, mut t) = open_tracker(cfg)?;
    match cmd {
        CalCommand::Show => show(&t),
        CalCommand::Day(c) => day(&pool, &mut t, c, assume_yes),
        CalCommand::Food(c) => food(&pool, &mut t, c),
        CalCommand::Water { amount, remove } => water(&pool, &mut t, *amount, *remove),
        CalCommand::Goals(c) => goals(&pool, &mut t, c),
        CalCommand::Prefs {
            water_step,
            water_unit,
            theme,
            density,
            default_meal,
        } => {
            let mut prefs = t.prefs;
            let mut changed = false;
            if let Some(v) = water_step {
                prefs.water_step = *v;
                changed = true;
            }
            if let Some(v) = water_unit {
                prefs.water_unit = *v;
                changed = true;
            }
            if let Some(v) = theme {
                prefs.theme = *v;
                changed = true;
            }
            if let Some(v) = density {
                prefs.density = *v;
                changed = true;
            }
            if let Some(v) = default_meal {
                prefs.default_meal = MealChoice::from(v.clone());
                changed = true;
            }
            if changed {
                t.set_prefs(prefs)?;
                commit(&pool, &mut t, "set", "prefs", "Preferences updated")?;
                success("Preferences saved.");
            }
            print_prefs(&t);
            Ok(())
        }
        CalCommand::Tdee(args) => estimate_tdee(&pool, &mut t, args),
        CalCommand::Insights => print_insights(&t),
        CalCommand::Favorite(c) => library::favorite(&pool, &mut t, c),
        CalCommand::Recipe(c) => library::recipe(&pool, &mut t, c),
        CalCommand::Plan(c) => library::plan(&pool, &mut t, c),
        CalCommand::Measure(c) => library::measure(&pool, &mut t, c),
        CalCommand::Workout(c) => library::workout(&pool, &mut t, c),
        CalCommand::Search {
            term,
            pick,
            option,
            amount,
            unit,
            meal,
            limit,
        } => lookup::search(
            cfg,
            &pool,
            &mut t,
            &lookup::SearchArgs {
                term,
                pick: *pick,
                option: *option,
                amount: *amount,
                unit,
                meal: *meal,
                limit: *limit,
            },
        ),
        CalCommand::History { clear } => lookup::history(&pool, &mut t, *clear),
        CalCommand::Barcode { code, grams, meal } => {
            lookup::barcode(cfg, &pool, &mut t, code, *grams, *meal)
        }
        CalCommand::Export { format, file, force } => {
            transfer::export(&pool, &t, *format, file.as_deref(), *force || assume_yes)
        }
        CalCommand::Import { file } => transfer::import(&pool, &mut t, file, assume_yes),
        CalCommand::Convert { .. } => Ok(()),
    }
}

// ---------------------------------------------------------------
// Rendering
// ---------------------------------------------------------------

pub(crate) fn table(t: &Tracker, headers: Vec<&str>) -> Table {
    Table::new(headers).compact(t.prefs.density == Density::Compact)
}

fn food_name(f: &Food) -> String {
    if f.brand.is_empty() {
        f.food.clone()
    } else {
        format!("{} ({})", f.food, f.brand)
    }
}

/// Foods with their 1-based positions in the active day.
pub(crate) fn print_foods(t: &Tracker, rows: &[(usize, &Food)]) {
    if rows.is_empty() {
        info("No foods logged yet.");
        return;
    }
    let compact = t.prefs.density == Density::Compact;
    let mut headers = vec![
        "#", "Id", "Meal", "Food", "Serving", "Qty", "kcal", "P", "F", "C", "Source",
    ];
    if !compact {
        headers.push("Notes");
    }
    let mut tbl = table(t, headers);
    for (i, f) in rows {
        let mut row = vec![
            (i + 1).to_string(),
            short_id(&f.id).to_string(),
            f.meal.to_string(),
            truncate(&food_name(f), 36),
            colorize_optional(&f.serving_label()),
            format_count(f.servings),
            format_number(f.totals.calories),
            format_number(f.totals.protein),
            format_number(f.totals.fat),
            format_number(f.totals.carbs),
            f.source.to_string(),
        ];
        if !compact {
            row.push(colorize_optional(&truncate(&f.notes, 30)));
        }
        tbl.add_row(row);
    }
    print!("{}", tbl.render());
}

fn progress_line(label: &str, value: f64, goal: f64, unit: &str) -> String {
    format!(
        "{:<9} {}{}{} / {} {:<4} {}",
        label,
        color_for_progress(value, goal),
        format_number(value),
        RESET,
        format_number(goal),
        unit,
        progress_bar(clamp_percent(value, goal), BAR_WIDTH)
    )
}

fn show(t: &Tracker) -> AppResult<()> {
    let day = t.active();
    let accent = colors::accent(t.prefs.theme);
    header(
        format!(
            "{} (day {} of {})",
            day.display_date(),
            t.current + 1,
            t.days.len()
        ),
        accent,
    );

    let p = DayProgress::for_day(day, &t.goals);
    println!(
        "{}",
        progress_line("Calories", p.eaten.calories, p.calorie_goal, "kcal")
    );
    if p.over > 0.0 {
        println!("{}Over by {} kcal{}", colors::RED, format_number(p.over), RESET);
    } else {
        println!(
            "Remaining {} kcal ({:.0}% eaten)",
            format_number(p.remaining),
            p.calories_percent()
        );
    }
    if p.burned > 0.0 {
        println!(
            "Burned    {} kcal (goal {} + {})",
            format_number(p.burned),
            format_number(p.goals.calories),
            format_number(p.burned)
        );
    }
    println!("{}", progress_line("Protein", p.eaten.protein, p.goals.protein, "g"));
    println!("{}", progress_line("Fat", p.eaten.fat, p.goals.fat, "g"));
    println!("{}", progress_line("Carbs", p.eaten.carbs, p.goals.carbs, "g"));

    let wu = t.prefs.water_unit;
    println!(
        "{}",
        progress_line(
            "Water",
            wu.display(p.water_oz),
            wu.display(p.goals.water_oz),
            wu.as_str()
        )
    );

    let split = macro_split(&p.eaten);
    println!(
        "Split     protein {}% | carbs {}% | fat {}%",
        split.protein, split.carbs, split.fat
    );
    if !day.goal_overrides.is_empty() {
        info("Goal overrides active for this day.");
    }

    println!();
    for (meal, mt) in meal_totals(&day.foods) {
        if mt.count > 0 {
            println!(
                "  {:<10} {:>8} kcal  {} item{}",
                meal.as_str(),
                format_number(mt.macros.calories),
                mt.count,
                if mt.count == 1 { "" } else { "s" }
            );
        }
    }

    let rows: Vec<(usize, &Food)> = day.foods.iter().enumerate().collect();
    print_foods(t, &rows);

    if !day.notes.is_empty() {
        println!("\nNotes: {}", day.notes);
    }
    Ok(())
}

fn print_prefs(t: &Tracker) {
    let p = &t.prefs;
    println!("Water step   : {} {}", format_count(p.water_step), p.water_unit.as_str());
    println!("Water unit   : {}", p.water_unit.as_str());
    println!("Theme        : {}", String::from(p.theme));
    println!("Density      : {}", String::from(p.density));
    println!("Default meal : {}", p.default_meal);
}

fn field_name(field: GoalField) -> &'static str {
    match field {
        GoalField::Calories => "calories",
        GoalField::Protein => "protein",
        GoalField::Fat => "fat",
        GoalField::Carbs => "carbs",
        GoalField::Water => "water",
    }
}

// ---------------------------------------------------------------
// Days
// ---------------------------------------------------------------

fn day(pool: &DbPool, t: &mut Tracker, cmd: &DayCommand, assume_yes: bool) -> AppResult<()> {
    match cmd {
        DayCommand::List => {
            let mut tbl = table(t, vec!["", "#", "Date", "Foods", "kcal", "Water", "Burned"]);
            let wu = t.prefs.water_unit;
            for (i, d) in t.days.iter().enumerate() {
                tbl.add_row(vec![
                    if i == t.current { "*".into() } else { String::new() },
                    (i + 1).to_string(),
                    d.display_date(),
                    d.foods.len().to_string(),
                    format_number(sum_foods(&d.foods).calories),
                    format!("{} {}", format_count(wu.display(d.water_oz)), wu.as_str()),
                    format_number(d.burned_calories),
                ]);
            }
            print!("{}", tbl.render());
            return Ok(());
        }
        DayCommand::New => {
            let n = t.new_day() + 1;
            commit(pool, t, "create", "day", &format!("Day #{n} started"))?;
            success(format!("Started day #{n}."));
        }
        DayCommand::Copy => {
            let n = t.copy_day() + 1;
            commit(pool, t, "create", "day", &format!("Day #{n} copied"))?;
            success(format!("Copied into day #{n}."));
        }
        DayCommand::Clear => {
            if !confirm("Clear foods, notes, water and burned calories of this day?", assume_yes) {
                info("Operation cancelled.");
                return Ok(());
            }
            t.clear_day();
            let target = t.active().date_iso.clone();
            commit(pool, t, "clear", &target, "Day cleared")?;
            success("Day cleared.");
        }
        DayCommand::Delete => {
            if !confirm("Delete this day? This action is irreversible.", assume_yes) {
                info("Operation cancelled.");
                return Ok(());
            }
            let removed = t.delete_day()?;
            commit(pool, t, "delete", &removed.date_iso, "Day deleted")?;
            success(format!("Deleted {}.", removed.display_date()));
        }
        DayCommand::Switch { index } => {
            if *index == 0 {
                return Err(AppError::invalid("Day numbers start at 1."));
            }
            t.switch_day(index - 1)?;
            commit(pool, t, "set", "day", &format!("Switched to day #{index}"))?;
            success(format!("Active day: {}", t.active().display_date()));
        }
        DayCommand::Notes { text } => {
            t.set_notes(text);
            commit(pool, t, "edit", "notes", "Day notes updated")?;
            success("Notes saved.");
        }
        DayCommand::Burned { calories } => {
            t.set_burned(*calories)?;
            commit(pool, t, "set", "burned", &format!("{} kcal", format_number(*calories)))?;
            success(format!("Burned calories: {}", format_number(*calories)));
        }
        DayCommand::Label { text } => {
            t.set_label(text);
            commit(pool, t, "edit", "label", text)?;
            success(format!("Day label: {}", t.active().display_date()));
        }
        DayCommand::Date { date: raw } => {
            let d = date::parse_date(raw).ok_or_else(|| AppError::InvalidDate(raw.clone()))?;
            t.set_date(d);
            commit(pool, t, "edit", "date", raw)?;
            success(format!("Day date: {}", date::to_display(d)));
        }
        DayCommand::Override { field, value } => {
            t.set_override(*field, *value);
            let name = field_name(*field);
            commit(pool, t, "set", "override", &format!("{name} = {value}"))?;
            if *value > 0.0 {
                success(format!("Override {name}: {}", format_count(*value)));
            } else {
                success(format!("Override {name} removed."));
            }
        }
        DayCommand::EnableOverrides => {
            t.enable_overrides();
            commit(pool, t, "set", "override", "Overrides seeded from goals")?;
            success("Overrides enabled for this day.");
        }
        DayCommand::ClearOverrides => {
            t.clear_overrides();
            commit(pool, t, "clear", "override", "Overrides removed")?;
            success("Overrides cleared.");
        }
    }
    Ok(())
}

// ---------------------------------------------------------------
// Foods
// ---------------------------------------------------------------

fn logged_message(f: &Food) -> String {
    format!(
        "Logged {} to {}: {} kcal ({} serving{}).",
        f.food,
        f.meal,
        format_number(f.totals.calories),
        format_count(f.servings),
        if f.servings == 1.0 { "" } else { "s" }
    )
}

fn food(pool: &DbPool, t: &mut Tracker, cmd: &FoodCommand) -> AppResult<()> {
    match cmd {
        FoodCommand::Add {
            name,
            macros,
            brand,
            serving_size,
            serving_unit,
            amount,
            unit,
            notes,
            meal,
        } => {
            let form = FoodForm {
                name: name.clone(),
                brand: brand.clone(),
                serving_size: *serving_size,
                serving_unit: serving_unit.clone(),
                per_serving: macros.macros(),
                amount: *amount,
                amount_unit: unit.clone(),
                notes: notes.clone(),
                meal: *meal,
            };
            let f = t.add_custom(&form)?;
            commit(pool, t, "add", &format!("food:{}", f.food), &logged_message(&f))?;
            success(logged_message(&f));
        }
        FoodCommand::Quick {
            calories,
            label,
            notes,
            meal,
        } => {
            let f = t.quick_add(label, *calories, notes, *meal)?;
            commit(pool, t, "add", &format!("food:{}", f.food), &logged_message(&f))?;
            success(logged_message(&f));
        }
        FoodCommand::Edit {
            selector,
            name,
            brand,
            meal,
            serving_size,
            serving_unit,
            calories,
            protein,
            fat,
            carbs,
            amount,
            unit,
            notes,
        } => {
            let patch = FoodPatch {
                name: name.clone(),
                brand: brand.clone(),
                meal: *meal,
                serving_size: *serving_size,
                serving_unit: serving_unit.clone(),
                calories: *calories,
                protein: *protein,
                fat: *fat,
                carbs: *carbs,
                amount: *amount,
                amount_unit: unit.clone(),
                notes: notes.clone(),
            };
            let f = t.edit_food(selector, &patch)?;
            commit(pool, t, "edit", &format!("food:{}", f.food), "Food updated")?;
            success(format!(
                "Updated {}: {} kcal.",
                f.food,
                format_number(f.totals.calories)
            ));
        }
        FoodCommand::Remove { selector } => {
            let f = t.remove_food(selector)?;
            commit(pool, t, "remove", &format!("food:{}", f.food), "Food removed")?;
            success(format!("Removed {}.", f.food));
            info("Run `calstudy cal food undo` to put it back.");
        }
        FoodCommand::Undo => {
            let f = t.undo_remove()?;
            commit(pool, t, "undo", &format!("food:{}", f.food), "Removal undone")?;
            success(format!("Restored {}.", f.food));
        }
        FoodCommand::Duplicate { selector } => {
            let f = t.duplicate_food(selector)?;
            commit(pool, t, "add", &format!("food:{}", f.food), "Food duplicated")?;
            success(logged_message(&f));
        }
        FoodCommand::List {
            meal,
            source,
            sort,
            dir,
        } => {
            let q = FoodQuery {
                meal: *meal,
                source: *source,
                sort: *sort,
                dir: *dir,
            };
            let rows = t.list_foods(&q);
            print_foods(t, &rows);
        }
    }
    Ok(())
}

// ---------------------------------------------------------------
// Water, goals, TDEE
// ---------------------------------------------------------------

fn water(pool: &DbPool, t: &mut Tracker, amount: Option<f64>, remove: bool) -> AppResult<()> {
    let step = amount.unwrap_or(t.prefs.water_step);
    if !step.is_finite() {
        return Err(AppError::invalid("Enter a valid amount of water."));
    }
    let delta = if remove { -step.abs() } else { step };
    let oz = t.adjust_water(delta);
    let wu = t.prefs.water_unit;
    let goal = t.effective_goals().water_oz;
    commit(
        pool,
        t,
        "set",
        "water",
        &format!("{} {}", format_count(delta), wu.as_str()),
    )?;
    success(format!(
        "Water: {} / {} {}",
        format_count(wu.display(oz)),
        format_count(wu.display(goal)),
        wu.as_str()
    ));
    Ok(())
}

fn print_goals(t: &Tracker) {
    let wu = t.prefs.water_unit;
    let effective = t.effective_goals();
    let has_overrides = !t.active().goal_overrides.is_empty();
    let mut headers = vec!["Goal", "Global"];
    if has_overrides {
        headers.push("Today");
    }
    let mut tbl = table(t, headers);
    let rows = [
        ("Calories (kcal)", t.goals.calories, effective.calories),
        ("Protein (g)", t.goals.protein, effective.protein),
        ("Fat (g)", t.goals.fat, effective.fat),
        ("Carbs (g)", t.goals.carbs, effective.carbs),
    ];
    for (label, global, today) in rows {
        let mut row = vec![label.to_string(), format_count(global)];
        if has_overrides {
            row.push(format_count(today));
        }
        tbl.add_row(row);
    }
    let mut water = vec![
        format!("Water ({})", wu.as_str()),
        format_count(wu.display(t.goals.water_oz)),
    ];
    if has_overrides {
        water.push(format_count(wu.display(effective.water_oz)));
    }
    tbl.add_row(water);
    print!("{}", tbl.render());
    if let Some(tdee) = t.saved_tdee {
        println!("Saved TDEE: {} kcal", format_count(tdee));
    }
}

fn goals(pool: &DbPool, t: &mut Tracker, cmd: &GoalsCommand) -> AppResult<()> {
    match cmd {
        GoalsCommand::Show => {}
        GoalsCommand::Set { field, value } => {
            if !value.is_finite() || *value < 0.0 {
                return Err(AppError::invalid("Goals cannot be negative."));
            }
            t.set_goal(*field, *value);
            let name = field_name(*field);
            commit(pool, t, "set", "goals", &format!("{name} = {value}"))?;
            success(format!("Goal {name} set to {}.", format_count(*value)));
        }
        GoalsCommand::Preset { preset } => {
            if !t.apply_preset(*preset) {
                return Err(AppError::invalid("Set a calorie goal first."));
            }
            commit(pool, t, "set", "goals", &format!("Preset {}", preset.label()))?;
            success(format!("{} preset applied.", preset.label()));
        }
        GoalsCommand::ApplyTdee => {
            let kcal = t.apply_saved_tdee()?;
            commit(pool, t, "set", "goals", "Calorie goal from saved TDEE")?;
            success(format!("Calorie goal set to {} kcal.", format_count(kcal)));
        }
    }
    print_goals(t);
    Ok(())
}

fn estimate_tdee(pool: &DbPool, t: &mut Tracker, args: &TdeeArgs) -> AppResult<()> {
    let input = TdeeInput {
        formula: args.formula,
        sex: args.sex,
        age: args.age,
        weight: args.weight,
        weight_unit: args.weight_unit,
        height: args.height,
        height_unit: args.height_unit,
        body_fat: args.body_fat,
        activity: args.activity,
    };
    let profile = input.validate()?;
    let est = tdee::calculate(&profile)
        .ok_or_else(|| AppError::Calculation("check the values entered".into()))?;

    println!("Formula : {}", args.formula.label());
    println!("BMR     : {} kcal/day", format_count(est.bmr.round()));
    println!("TDEE    : {} kcal/day", format_count(est.tdee.round()));

    if args.save {
        t.save_tdee(est.tdee);
        commit(
            pool,
            t,
            "set",
            "tdee",
            &format!("{} kcal ({})", format_count(est.tdee.round()), args.formula.label()),
        )?;
        success("TDEE saved. Run `calstudy cal goals apply-tdee` to use it as your goal.");
    }
    Ok(())
}

// ---------------------------------------------------------------
// Insights, conversions
// ---------------------------------------------------------------

fn print_insights(t: &Tracker) -> AppResult<()> {
    let accent = colors::accent(t.prefs.theme);
    let ins = insights::insights(&t.days, t.goals.calories);
    let wu = t.prefs.water_unit;

    header(format!("Averages (last {AVERAGE_WINDOW} days)"), accent);
    println!("Calories : {}", format_number(ins.averages.calories));
    println!("Protein  : {} g", format_number(ins.averages.protein));
    println!("Fat      : {} g", format_number(ins.averages.fat));
    println!("Carbs    : {} g", format_number(ins.averages.carbs));
    println!(
        "Water    : {} {}",
        format_count(wu.display(ins.average_water_oz)),
        wu.as_str()
    );
    println!(
        "Streak   : {} day{}",
        ins.streak,
        if ins.streak == 1 { "" } else { "s" }
    );

    header("Top foods", accent);
    if ins.top_foods.is_empty() {
        info("No foods logged yet.");
    }
    for (name, count) in &ins.top_foods {
        println!("  {name} ×{count}");
    }

    header("Closest day to goal", accent);
    match ins.best_day.and_then(|i| t.days.get(i)) {
        Some(d) => println!(
            "  {} · {} kcal",
            d.display_date(),
            format_number(sum_foods(&d.foods).calories)
        ),
        None => info("No days yet."),
    }
    Ok(())
}

fn convert(amount: f64, unit: &str, to: Option<&str>) -> AppResult<()> {
    let from = units::normalize_unit(unit).ok_or_else(|| AppError::InvalidUnit(unit.to_string()))?;
    match to {
        Some(target) => {
            let target = units::normalize_unit(target)
                .ok_or_else(|| AppError::InvalidUnit(target.to_string()))?;
            let value = units::convert_amount(amount, from.as_str(), target.as_str());
            println!(
                "{} {} = {} {}",
                format_count(amount),
                from,
                format_count(value),
                target
            );
        }
        None => {
            let line = units::serving_conversions(amount, from.as_str());
            if line.is_empty() {
                return Err(AppError::invalid("Amount must be greater than 0."));
            }
            println!("{} {}: {}", format_count(amount), from, line);
        }
    }
    Ok(())
}
