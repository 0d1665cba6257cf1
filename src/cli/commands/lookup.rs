//! Network lookups: FoodData Central search and Open Food Facts barcodes.

use crate::api::barcode::Barcode;
use crate::api::openfoodfacts::OpenFoodFactsClient;
use crate::api::usda::{UsdaClient, UsdaFood, UsdaPick, build_food, serving_options};
use crate::cli::commands::cal::table;
use crate::cli::commands::commit;
use crate::config::Config;
use crate::core::tracker::Tracker;
use crate::db::pool::DbPool;
use crate::errors::{AppError, AppResult};
use crate::models::food::{Food, Meal};
use crate::ui::messages::{info, success, warning};
use crate::utils::format_number;
use crate::utils::formatting::truncate;

pub struct SearchArgs<'a> {
    pub term: &'a str,
    pub pick: Option<usize>,
    /// 1-based serving option.
    pub option: usize,
    pub amount: f64,
    pub unit: &'a str,
    pub meal: Option<Meal>,
    pub limit: usize,
}

fn print_results(t: &Tracker, foods: &[UsdaFood]) {
    let mut tbl = table(t, vec!["#", "Food", "Brand", "kcal", "P", "F", "C", "Servings"]);
    for (i, f) in foods.iter().enumerate() {
        let m = f.macros();
        let options = serving_options(f)
            .iter()
            .enumerate()
            .map(|(n, o)| format!("{}) {}", n + 1, o.label))
            .collect::<Vec<_>>()
            .join("; ");
        tbl.add_row(vec![
            (i + 1).to_string(),
            truncate(&f.description, 40),
            truncate(f.brand(), 24),
            format_number(m.calories),
            format_number(m.protein),
            format_number(m.fat),
            format_number(m.carbs),
            truncate(&options, 60),
        ]);
    }
    print!("{}", tbl.render());
}

fn logged(pool: &DbPool, t: &mut Tracker, food: Food, source: &str) -> AppResult<()> {
    let summary = format!(
        "Logged {} to {}: {} kcal.",
        food.food,
        food.meal,
        format_number(food.totals.calories)
    );
    let target = format!("{source}:{}", food.food);
    t.log_food(food);
    commit(pool, t, "log", &target, &summary)?;
    success(summary);
    Ok(())
}

pub fn search(cfg: &Config, pool: &DbPool, t: &mut Tracker, args: &SearchArgs<'_>) -> AppResult<()> {
    let term = args.term.trim();
    if term.is_empty() {
        return Err(AppError::invalid("Enter a search term."));
    }
    if let Some(0) = args.pick {
        return Err(AppError::invalid("Results are numbered from 1."));
    }
    if args.option == 0 {
        return Err(AppError::invalid("Serving options are numbered from 1."));
    }

    // The term is kept even when the request fails.
    t.remember_search(term);
    commit(pool, t, "set", "search", term)?;

    let client = UsdaClient::new(cfg)?;
    let mut foods = client.search(term)?;

    match args.pick {
        None => {
            if foods.is_empty() {
                warning(format!("No results for '{term}'."));
                return Ok(());
            }
            foods.truncate(args.limit.max(1));
            print_results(t, &foods);
            info("Log one with --pick <n> [--option <n>] [--amount <n> --unit <unit>].");
            Ok(())
        }
        Some(n) => {
            let chosen = foods
                .get(n - 1)
                .ok_or_else(|| AppError::NotFound(format!("result #{n} for '{term}'")))?;
            let meal = t.resolve_meal(args.meal);
            let pick = UsdaPick {
                option: args.option - 1,
                amount: args.amount,
                amount_unit: args.unit.to_string(),
                meal,
            };
            let food = build_food(chosen, &pick, t.clock.now_ms)?;
            logged(pool, t, food, "usda")
        }
    }
}

pub fn history(pool: &DbPool, t: &mut Tracker, clear: bool) -> AppResult<()> {
    if clear {
        t.clear_search_history();
        commit(pool, t, "clear", "search", "Search history cleared")?;
        success("Search history cleared.");
        return Ok(());
    }
    if t.search_history.is_empty() {
        info("No recent searches.");
    }
    for (i, term) in t.search_history.iter().enumerate() {
        println!("{:>2}. {term}", i + 1);
    }
    Ok(())
}

pub fn barcode(
    cfg: &Config,
    pool: &DbPool,
    t: &mut Tracker,
    raw: &str,
    grams: f64,
    meal: Option<Meal>,
) -> AppResult<()> {
    let code = Barcode::parse(raw)?;
    if !grams.is_finite() || grams <= 0.0 {
        return Err(AppError::invalid("Serving size (g) must be greater than 0."));
    }
    let product = OpenFoodFactsClient::new(cfg)?.product(&code)?;
    let meal = t.resolve_meal(meal);
    let food = product.to_food(grams, meal, t.clock.now_ms)?;
    logged(pool, t, food, "barcode")
}
