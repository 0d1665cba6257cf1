use predicates::prelude::*;
use predicates::str::contains;
use std::fs;

mod common;
use common::{init_db, init_db_with_foods, run, setup_test_db, temp_out};

#[test]
fn test_show_lists_foods_and_remaining() {
    let db_path = setup_test_db("cal_show");
    init_db_with_foods(&db_path);

    run(&db_path, &["cal", "show"])
        .success()
        .stdout(contains("Oats"))
        .stdout(contains("Cookie"))
        .stdout(contains("Remaining 1650.0 kcal"))
        .stdout(contains("40 g"));
}

#[test]
fn test_food_remove_and_undo() {
    let db_path = setup_test_db("cal_remove_undo");
    init_db_with_foods(&db_path);

    run(&db_path, &["cal", "food", "remove", "1"])
        .success()
        .stdout(contains("Removed Oats."));

    run(&db_path, &["cal", "food", "list"])
        .success()
        .stdout(contains("Cookie"))
        .stdout(contains("Oats").not());

    run(&db_path, &["cal", "food", "undo"])
        .success()
        .stdout(contains("Restored Oats."));

    run(&db_path, &["cal", "food", "undo"])
        .failure()
        .stderr(contains("Not found"));
}

#[test]
fn test_food_add_converts_grams_to_servings() {
    let db_path = setup_test_db("cal_add_grams");
    init_db(&db_path);

    run(
        &db_path,
        &[
            "cal", "food", "add", "Rice", "--calories", "130", "--serving-size", "100",
            "--serving-unit", "g", "--amount", "200", "--unit", "g",
        ],
    )
    .success()
    .stdout(contains("Logged Rice"))
    .stdout(contains("260.0 kcal (2 servings)"));
}

#[test]
fn test_food_add_rejects_unknown_unit() {
    let db_path = setup_test_db("cal_add_bad_unit");
    init_db(&db_path);

    run(
        &db_path,
        &["cal", "food", "add", "Rice", "--calories", "130", "--amount", "2", "--unit", "bucket"],
    )
    .failure()
    .stderr(contains("Unknown unit: bucket"));
}

#[test]
fn test_food_edit_recomputes_totals() {
    let db_path = setup_test_db("cal_edit");
    init_db_with_foods(&db_path);

    run(&db_path, &["cal", "food", "edit", "2", "--calories", "250"])
        .success()
        .stdout(contains("Updated Cookie: 250.0 kcal."));
}

#[test]
fn test_water_adds_default_step_and_never_goes_negative() {
    let db_path = setup_test_db("cal_water");
    init_db(&db_path);

    run(&db_path, &["cal", "water"])
        .success()
        .stdout(contains("Water: 8 / 64 oz"));

    run(&db_path, &["cal", "water", "50", "--remove"])
        .success()
        .stdout(contains("Water: 0 / 64 oz"));
}

#[test]
fn test_goals_set_and_preset() {
    let db_path = setup_test_db("cal_goals");
    init_db(&db_path);

    run(&db_path, &["cal", "goals", "set", "calories", "2500"])
        .success()
        .stdout(contains("Goal calories set to 2500."));

    run(&db_path, &["cal", "goals", "preset", "balanced"])
        .success()
        .stdout(contains("Balanced preset applied."))
        .stdout(contains("188"));

    run(&db_path, &["cal", "goals", "set", "calories", "0"]).success();
    run(&db_path, &["cal", "goals", "preset", "keto"])
        .failure()
        .stderr(contains("Set a calorie goal first."));
}

#[test]
fn test_day_overrides_change_effective_goal() {
    let db_path = setup_test_db("cal_overrides");
    init_db_with_foods(&db_path);

    run(&db_path, &["cal", "day", "override", "calories", "1000"]).success();
    run(&db_path, &["cal", "show"])
        .success()
        .stdout(contains("Remaining 650.0 kcal"))
        .stdout(contains("Goal overrides active"));

    run(&db_path, &["cal", "day", "burned", "300"]).success();
    run(&db_path, &["cal", "show"])
        .success()
        .stdout(contains("Remaining 950.0 kcal"));

    run(&db_path, &["cal", "day", "clear-overrides"]).success();
    run(&db_path, &["cal", "show"])
        .success()
        .stdout(contains("Remaining 1950.0 kcal"));
}

#[test]
fn test_days_new_switch_delete() {
    let db_path = setup_test_db("cal_days");
    init_db_with_foods(&db_path);

    run(&db_path, &["cal", "day", "new"])
        .success()
        .stdout(contains("Started day #2."));

    run(&db_path, &["cal", "food", "list"])
        .success()
        .stdout(contains("No foods logged yet."));

    run(&db_path, &["cal", "day", "switch", "1"]).success();
    run(&db_path, &["cal", "food", "list"])
        .success()
        .stdout(contains("Oats"));

    run(&db_path, &["-y", "cal", "day", "delete"]).success();
    run(&db_path, &["cal", "day", "list"])
        .success()
        .stdout(contains("350.0").not());

    run(&db_path, &["cal", "day", "switch", "5"]).failure();
}

#[test]
fn test_day_delete_without_confirmation_is_cancelled() {
    let db_path = setup_test_db("cal_day_cancel");
    init_db_with_foods(&db_path);

    run(&db_path, &["cal", "day", "delete"])
        .success()
        .stdout(contains("Operation cancelled."));

    run(&db_path, &["cal", "food", "list"])
        .success()
        .stdout(contains("Oats"));
}

#[test]
fn test_tdee_estimate_and_apply() {
    let db_path = setup_test_db("cal_tdee");
    init_db(&db_path);

    run(
        &db_path,
        &[
            "cal", "tdee", "--sex", "male", "--age", "30", "--weight", "70", "--height", "175",
            "--save",
        ],
    )
    .success()
    .stdout(contains("BMR     : 1649 kcal/day"))
    .stdout(contains("TDEE saved."));

    run(&db_path, &["cal", "goals", "apply-tdee"])
        .success()
        .stdout(contains("Calorie goal set to"));

    run(&db_path, &["cal", "tdee", "--age", "30", "--weight", "70", "--height", "175"])
        .failure()
        .stderr(contains("Select a sex."));
}

#[test]
fn test_convert_units() {
    let db_path = setup_test_db("cal_convert");

    run(&db_path, &["cal", "convert", "1", "kg", "--to", "g"])
        .success()
        .stdout(contains("1 kg = 1000 g"));

    run(&db_path, &["cal", "convert", "100", "grams"])
        .success()
        .stdout(contains("approx 100 g | 3.53 oz"));

    run(&db_path, &["cal", "convert", "1", "parsec"])
        .failure()
        .stderr(contains("Unknown unit: parsec"));
}

#[test]
fn test_library_recipe_and_plan() {
    let db_path = setup_test_db("cal_library");
    init_db(&db_path);

    run(
        &db_path,
        &[
            "cal", "recipe", "add", "Chili", "--calories", "400", "--protein", "30", "--servings",
            "2", "--ingredient", " beans ",
        ],
    )
    .success()
    .stdout(contains("Recipe saved: Chili."));

    run(&db_path, &["cal", "recipe", "show", "chili"])
        .success()
        .stdout(contains("- beans"));

    run(&db_path, &["cal", "recipe", "log", "1", "--servings", "1"])
        .success()
        .stdout(contains("400.0 kcal"));

    run(
        &db_path,
        &["cal", "plan", "add", "Salad", "--calories", "300", "--date", "2030-01-02", "--meal", "lunch"],
    )
    .success();

    run(&db_path, &["cal", "plan", "list"])
        .success()
        .stdout(contains("2030-01-02"))
        .stdout(contains("Salad"));

    run(&db_path, &["cal", "plan", "apply", "2030-01-02"])
        .success()
        .stdout(contains("Logged 1 planned item(s)"));

    run(&db_path, &["cal", "plan", "apply", "2030-01-03"])
        .failure()
        .stderr(contains("No entries planned"));
}

#[test]
fn test_favorites_toggle_and_log() {
    let db_path = setup_test_db("cal_favorites");
    init_db_with_foods(&db_path);

    run(&db_path, &["cal", "favorite", "toggle", "1"])
        .success()
        .stdout(contains("Oats added to favorites."));

    run(&db_path, &["cal", "favorite", "log", "oats", "--servings", "2"])
        .success()
        .stdout(contains("300.0 kcal"));

    run(&db_path, &["cal", "favorite", "toggle", "1"])
        .success()
        .stdout(contains("Oats removed from favorites."));
}

#[test]
fn test_measurements_and_workouts() {
    let db_path = setup_test_db("cal_body");
    init_db(&db_path);

    run(&db_path, &["cal", "measure", "add"])
        .failure()
        .stderr(contains("Enter at least one metric."));

    run(&db_path, &["cal", "measure", "add", "--date", "2026-01-01", "--weight", "80"]).success();
    run(&db_path, &["cal", "measure", "add", "--date", "2026-02-01", "--weight", "78.5"]).success();
    run(&db_path, &["cal", "measure", "list"])
        .success()
        .stdout(contains("-1.5"));

    run(
        &db_path,
        &["cal", "workout", "add", "--exercise", "Squat:5:5:100", "--duration", "45"],
    )
    .success()
    .stdout(contains("Workout saved"));

    run(&db_path, &["cal", "workout", "list"])
        .success()
        .stdout(contains("Squat 5x5"));
}

#[test]
fn test_export_json_then_import_into_fresh_db() {
    let db_path = setup_test_db("cal_export_src");
    init_db_with_foods(&db_path);
    let out = temp_out("cal_export_json", "json");

    run(&db_path, &["cal", "export", "--file", &out])
        .success()
        .stdout(contains("JSON export completed"));

    let content = fs::read_to_string(&out).expect("export file");
    assert!(content.contains("\"version\": 2"));
    assert!(content.contains("Oats"));

    let dest = setup_test_db("cal_export_dest");
    init_db(&dest);
    run(&dest, &["-y", "cal", "import", &out])
        .success()
        .stdout(contains("Imported 1 day(s)."));

    run(&dest, &["cal", "food", "list"])
        .success()
        .stdout(contains("Oats"))
        .stdout(contains("Cookie"));
}

#[test]
fn test_export_csv_rows() {
    let db_path = setup_test_db("cal_export_csv");
    init_db_with_foods(&db_path);
    let out = temp_out("cal_export_csv", "csv");

    run(&db_path, &["cal", "export", "--format", "csv", "--file", &out])
        .success()
        .stdout(contains("2 food row(s) written."));

    let content = fs::read_to_string(&out).expect("csv file");
    let mut lines = content.lines();
    assert!(lines.next().unwrap().starts_with("date,label,meal,food"));
    assert!(content.contains("Oats"));
    assert!(content.contains("Cookie"));
}

#[test]
fn test_import_rejects_malformed_files() {
    let db_path = setup_test_db("cal_import_bad");
    init_db(&db_path);
    let bad = temp_out("cal_import_bad", "json");
    fs::write(&bad, "\"just a string\"").unwrap();

    run(&db_path, &["-y", "cal", "import", &bad])
        .failure()
        .stderr(contains("Import failed"));

    // Parsed before the confirmation, so no -y is needed to see the error.
    let binary = temp_out("cal_import_binary", "json");
    fs::write(&binary, [0xff, 0xfe, 0x00, 0x7b]).unwrap();
    run(&db_path, &["cal", "import", &binary])
        .failure()
        .stderr(contains("Import failed: invalid JSON file"));
}

#[test]
fn test_barcode_and_search_validate_before_network() {
    let db_path = setup_test_db("cal_lookup_invalid");
    init_db(&db_path);

    run(&db_path, &["cal", "barcode", "12345"])
        .failure()
        .stderr(contains("Invalid barcode"));

    run(&db_path, &["cal", "barcode", "4006381333932"])
        .failure()
        .stderr(contains("wrong check digit"));

    run(&db_path, &["cal", "search", "  "])
        .failure()
        .stderr(contains("Enter a search term."));
}

#[test]
fn test_prefs_change_water_unit() {
    let db_path = setup_test_db("cal_prefs");
    init_db(&db_path);

    run(&db_path, &["cal", "prefs", "--water-unit", "ml", "--water-step", "250"])
        .success()
        .stdout(contains("Preferences saved."))
        .stdout(contains("Water step   : 250 ml"));

    run(&db_path, &["cal", "water"])
        .success()
        .stdout(contains("Water: 250 / "));

    run(&db_path, &["cal", "prefs", "--water-step", "0"])
        .failure()
        .stderr(contains("Water step must be positive."));
}
