#![allow(dead_code)]
use assert_cmd::{Command, cargo_bin_cmd};
use std::env;
use std::fs;
use std::path::PathBuf;

pub fn cs() -> Command {
    cargo_bin_cmd!("calstudy")
}

/// Create a unique test DB path inside the system temp dir and remove any existing file
pub fn setup_test_db(name: &str) -> String {
    let mut path: PathBuf = env::temp_dir();
    path.push(format!("{}_calstudy.sqlite", name));
    let db_path = path.to_string_lossy().to_string();
    fs::remove_file(&db_path).ok();
    db_path
}

/// Create a temporary output file path inside tempdir and ensure it's removed
pub fn temp_out(name: &str, ext: &str) -> String {
    let mut path: PathBuf = env::temp_dir();
    path.push(format!("{}_out.{}", name, ext));
    let p = path.to_string_lossy().to_string();
    fs::remove_file(&p).ok();
    p
}

/// Run calstudy against `db_path` with the given arguments.
pub fn run(db_path: &str, args: &[&str]) -> assert_cmd::assert::Assert {
    cs().arg("--db").arg(db_path).args(args).assert()
}

/// Initialize the DB in test mode (no config file is written).
pub fn init_db(db_path: &str) {
    cs().args(["--db", db_path, "--test", "init"])
        .assert()
        .success();
}

/// Initialize the DB and log a small day: oats for breakfast, a quick snack.
pub fn init_db_with_foods(db_path: &str) {
    init_db(db_path);
    run(
        db_path,
        &[
            "cal", "food", "add", "Oats", "--calories", "150", "--protein", "5", "--fat", "3",
            "--carbs", "27", "--serving-size", "40", "--serving-unit", "g", "--meal", "breakfast",
        ],
    )
    .success();
    run(
        db_path,
        &["cal", "food", "quick", "200", "--label", "Cookie", "--meal", "snack"],
    )
    .success();
}
