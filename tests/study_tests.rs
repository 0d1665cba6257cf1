use predicates::prelude::*;
use predicates::str::contains;
use std::fs;

mod common;
use common::{cs, init_db, run, setup_test_db, temp_out};

fn add_cards(db_path: &str) {
    run(db_path, &["study", "card", "add", "Capital of Italy", "Rome"]).success();
    run(
        db_path,
        &["study", "card", "add", "2+2", "4", "--choice", "3", "--choice", "4", "--choice", "5"],
    )
    .success();
}

#[test]
fn test_default_deck_exists() {
    let db_path = setup_test_db("study_default");
    init_db(&db_path);

    run(&db_path, &["study", "deck", "list"])
        .success()
        .stdout(contains("Default"));
}

#[test]
fn test_deck_create_rename_switch_delete() {
    let db_path = setup_test_db("study_decks");
    init_db(&db_path);

    run(&db_path, &["study", "deck", "create", "Spanish"])
        .success()
        .stdout(contains("Deck 'Spanish' created and selected."));

    run(&db_path, &["study", "deck", "create", "Spanish"])
        .failure()
        .stderr(contains("already exists"));

    run(&db_path, &["study", "deck", "rename", "Español"])
        .success()
        .stdout(contains("renamed to 'Español'"));

    run(&db_path, &["study", "deck", "switch", "Default"])
        .success()
        .stdout(contains("Current deck: Default"));

    run(&db_path, &["study", "deck", "switch", "Missing"])
        .failure()
        .stderr(contains("Not found: deck 'Missing'"));

    run(&db_path, &["-y", "study", "deck", "delete", "Español"])
        .success()
        .stdout(contains("Deck 'Español' deleted"));

    run(&db_path, &["study", "deck", "list"])
        .success()
        .stdout(contains("Español").not());
}

#[test]
fn test_cards_add_list_search_edit_delete() {
    let db_path = setup_test_db("study_cards");
    init_db(&db_path);
    add_cards(&db_path);

    run(&db_path, &["study", "card", "list"])
        .success()
        .stdout(contains("2 card(s)"))
        .stdout(contains("3 | 4 | 5"));

    run(&db_path, &["study", "card", "list", "--search", "ROME"])
        .success()
        .stdout(contains("Capital of Italy"))
        .stdout(contains("2+2").not());

    // Newest cards come first: #2 is the written card.
    run(&db_path, &["study", "card", "edit", "2", "Capital of France", "Paris"])
        .success()
        .stdout(contains("Card updated."));

    run(&db_path, &["study", "card", "list"])
        .success()
        .stdout(contains("Capital of France"));

    run(&db_path, &["study", "card", "delete", "1"])
        .success()
        .stdout(contains("Deleted card '2+2'."));
}

#[test]
fn test_card_validation() {
    let db_path = setup_test_db("study_card_validation");
    init_db(&db_path);

    run(&db_path, &["study", "card", "add", "Question", "Answer", "--choice", "Answer"])
        .failure()
        .stderr(contains("At least 2 choices required"));

    run(
        &db_path,
        &["study", "card", "add", "Question", "Answer", "--choice", "A", "--choice", "B"],
    )
    .failure()
    .stderr(contains("Answer must match one of the choices"));
}

#[test]
fn test_test_needs_cards() {
    let db_path = setup_test_db("study_empty");
    init_db(&db_path);

    run(&db_path, &["study", "test"])
        .failure()
        .stderr(contains("Add some cards first!"));
}

#[test]
fn test_scored_test_reads_answers_from_stdin() {
    let db_path = setup_test_db("study_test_run");
    init_db(&db_path);
    add_cards(&db_path);

    cs().args(["--db", &db_path, "study", "test"])
        .write_stdin("2\nrome\n")
        .assert()
        .success()
        .stdout(contains("Correct!"))
        .stdout(contains("Score:"))
        .stdout(contains("2/2 (100%)"));

    run(&db_path, &["log", "--print"])
        .success()
        .stdout(contains("(deck:Default)"));
}

#[test]
fn test_timer_limits_are_checked() {
    let db_path = setup_test_db("study_timer");
    init_db(&db_path);
    add_cards(&db_path);

    run(&db_path, &["study", "test", "--per-question", "2"])
        .failure()
        .stderr(contains("between 5 and 300"));

    run(&db_path, &["study", "test", "--total", "500"])
        .failure()
        .stderr(contains("between 1 and 180"));
}

#[test]
fn test_review_walks_until_input_ends() {
    let db_path = setup_test_db("study_review");
    init_db(&db_path);
    add_cards(&db_path);

    cs().args(["--db", &db_path, "study", "review"])
        .write_stdin("\nn\nn\n")
        .assert()
        .success()
        .stdout(contains("(front) 2+2"))
        .stdout(contains("(back) 4"))
        .stdout(contains("End of deck."));
}

#[test]
fn test_deck_export_then_import() {
    let db_path = setup_test_db("study_export");
    init_db(&db_path);
    add_cards(&db_path);
    let out = temp_out("study_export", "json");

    run(&db_path, &["study", "deck", "export", "--file", &out])
        .success()
        .stdout(contains("Deck export completed"));

    let content = fs::read_to_string(&out).expect("deck file");
    assert!(content.trim_start().starts_with('['));
    assert!(content.contains("Capital of Italy"));

    run(&db_path, &["study", "deck", "import", &out, "--name", "Copy"])
        .success()
        .stdout(contains("Imported 2 card(s) into 'Copy'."));

    run(&db_path, &["study", "card", "list"])
        .success()
        .stdout(contains("Deck: Copy (2 card(s))"));

    let bad = temp_out("study_import_bad", "json");
    fs::write(&bad, "{\"not\": \"a list\"}").unwrap();
    run(&db_path, &["study", "deck", "import", &bad])
        .failure()
        .stderr(contains("Invalid deck JSON format"));
}

#[test]
fn test_clear_deck_requires_confirmation() {
    let db_path = setup_test_db("study_clear");
    init_db(&db_path);
    add_cards(&db_path);

    run(&db_path, &["study", "card", "clear"])
        .success()
        .stdout(contains("Operation cancelled."));

    run(&db_path, &["-y", "study", "card", "clear"])
        .success()
        .stdout(contains("Removed 2 card(s)."));
}
