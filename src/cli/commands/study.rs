//! `study` command group: decks, cards, review and timed tests.

use crate::cli::parser::{CardCommand, DeckCommand, StudyCommand};
use crate::config::Config;
use crate::core::quiz::{Outcome, QuizResult, QuizSession, Review, TimerMode, arrange};
use crate::core::study::{CardForm, DeckBook};
use crate::db::log::audit;
use crate::db::pool::DbPool;
use crate::errors::AppResult;
use crate::export::{ensure_writable, notify_export_success, write_json};
use crate::models::deck::Flashcard;
use crate::ui::messages::{header, info, success, warning};
use crate::ui::prompt::confirm;
use crate::utils::colors::{CYAN, GREEN, RED, RESET, YELLOW};
use crate::utils::formatting::{short_id, truncate};
use crate::utils::path::expand_tilde;
use crate::utils::table::Table;
use std::fs;
use std::io::{self, BufRead, Write};
use std::time::Instant;

pub fn handle(cmd: &StudyCommand, cfg: &Config, assume_yes: bool) -> AppResult<()> {
    let pool = DbPool::new(&cfg.database)?;
    let mut book = DeckBook::load(&pool.storage(), &cfg.default_deck)?;

    match cmd {
        StudyCommand::Deck(c) => deck(&pool, &mut book, c, assume_yes),
        StudyCommand::Card(c) => card(&pool, &mut book, c, assume_yes),
        StudyCommand::Review { shuffle } => {
            let cards = arrange(book.cards(), *shuffle)?;
            header(format!("Review: {}", book.current), CYAN);
            let stdin = io::stdin();
            run_review(Review::new(cards), &mut stdin.lock(), &mut io::stdout())
        }
        StudyCommand::Test {
            shuffle,
            per_question,
            total,
        } => {
            let timer = match (per_question, total) {
                (Some(secs), _) => TimerMode::per_question(*secs)?,
                (None, Some(min)) => TimerMode::total(*min)?,
                (None, None) => TimerMode::None,
            };
            let cards = arrange(book.cards(), *shuffle)?;
            header(format!("Test: {} ({})", book.current, timer.describe()), CYAN);
            let stdin = io::stdin();
            let result = run_test(
                QuizSession::new(cards, timer),
                &mut stdin.lock(),
                &mut io::stdout(),
            )?;
            print_result(&result);
            audit(
                &pool.conn,
                "test",
                &book.current,
                &format!("{}/{} ({}%)", result.score, result.total, result.percent()),
            );
            Ok(())
        }
    }
}

/// Persist the deck book and record the operation when something changed.
fn persist(pool: &DbPool, book: &mut DeckBook, operation: &str, target: &str, message: &str) -> AppResult<()> {
    if book.save(&pool.storage())? {
        audit(&pool.conn, operation, target, message);
    }
    Ok(())
}

// ---------------------------------------------------------------
// Decks
// ---------------------------------------------------------------

fn deck(pool: &DbPool, book: &mut DeckBook, cmd: &DeckCommand, assume_yes: bool) -> AppResult<()> {
    match cmd {
        DeckCommand::List => {
            let mut tbl = Table::new(vec!["", "Deck", "Cards"]);
            for (name, cards) in &book.decks {
                tbl.add_row(vec![
                    if *name == book.current { "*".into() } else { String::new() },
                    name.clone(),
                    cards.len().to_string(),
                ]);
            }
            print!("{}", tbl.render());
        }
        DeckCommand::Create { name } => {
            book.create_deck(name)?;
            let current = book.current.clone();
            persist(pool, book, "create", &format!("deck:{current}"), "Deck created")?;
            success(format!("Deck '{current}' created and selected."));
        }
        DeckCommand::Rename { name } => {
            let old = book.current.clone();
            if !book.rename_deck(name)? {
                info("Deck name unchanged.");
                return Ok(());
            }
            let current = book.current.clone();
            persist(pool, book, "rename", &format!("deck:{old}"), &current)?;
            success(format!("Deck '{old}' renamed to '{current}'."));
        }
        DeckCommand::Delete { name } => {
            let target = name.clone().unwrap_or_else(|| book.current.clone());
            if !confirm(
                &format!("Delete deck '{target}' and all its cards?"),
                assume_yes,
            ) {
                info("Operation cancelled.");
                return Ok(());
            }
            let removed = book.delete_deck(name.as_deref())?;
            persist(
                pool,
                book,
                "delete",
                &format!("deck:{target}"),
                &format!("{removed} card(s) removed"),
            )?;
            success(format!(
                "Deck '{target}' deleted ({removed} card(s)). Current deck: {}",
                book.current
            ));
        }
        DeckCommand::Switch { name } => {
            book.switch_deck(name)?;
            let current = book.current.clone();
            persist(pool, book, "set", &format!("deck:{current}"), "Deck selected")?;
            success(format!("Current deck: {current}"));
        }
        DeckCommand::Export { name, file } => {
            let json = book.export_deck(name.as_deref())?;
            match file {
                None => println!("{json}"),
                Some(f) => {
                    let path = expand_tilde(f);
                    ensure_writable(&path, assume_yes)?;
                    write_json(&path, &json)?;
                    notify_export_success("Deck", &path);
                    let deck_name = name.as_deref().unwrap_or(&book.current);
                    audit(
                        &pool.conn,
                        "export",
                        &format!("deck:{deck_name}"),
                        &path.display().to_string(),
                    );
                }
            }
        }
        DeckCommand::Import { file, name } => {
            let path = expand_tilde(file);
            let raw = fs::read_to_string(&path)?;
            let count = book.import_deck(&raw, name.as_deref())?;
            let current = book.current.clone();
            persist(
                pool,
                book,
                "import",
                &format!("deck:{current}"),
                &format!("{count} card(s) from {}", path.display()),
            )?;
            success(format!("Imported {count} card(s) into '{current}'."));
        }
    }
    Ok(())
}

// ---------------------------------------------------------------
// Cards
// ---------------------------------------------------------------

fn card_form(front: &str, back: &str, choices: &[String]) -> CardForm {
    CardForm {
        front: front.to_string(),
        back: back.to_string(),
        multiple: !choices.is_empty(),
        choices: choices.to_vec(),
    }
}

fn print_cards(rows: &[(usize, &Flashcard)]) {
    let mut tbl = Table::new(vec!["#", "Id", "Front", "Back", "Choices"]);
    for (i, c) in rows {
        tbl.add_row(vec![
            (i + 1).to_string(),
            short_id(&c.id).to_string(),
            truncate(&c.front, 40),
            truncate(&c.back, 30),
            truncate(&c.choices.join(" | "), 40),
        ]);
    }
    print!("{}", tbl.render());
}

fn card(pool: &DbPool, book: &mut DeckBook, cmd: &CardCommand, assume_yes: bool) -> AppResult<()> {
    let deck_target = format!("deck:{}", book.current);
    match cmd {
        CardCommand::List { search } => {
            let rows: Vec<(usize, &Flashcard)> = match search {
                Some(term) => book.search(term),
                None => book.cards().iter().enumerate().collect(),
            };
            if rows.is_empty() {
                info(match search {
                    Some(_) => "No cards match.",
                    None => "No cards in this deck.",
                });
                return Ok(());
            }
            println!("Deck: {} ({} card(s))", book.current, book.cards().len());
            print_cards(&rows);
        }
        CardCommand::Add {
            front,
            back,
            choices,
        } => {
            let c = book.add_card(&card_form(front, back, choices))?;
            persist(pool, book, "add", &deck_target, &c.front)?;
            success(format!("Card added to '{}'.", book.current));
        }
        CardCommand::Edit {
            selector,
            front,
            back,
            choices,
        } => {
            let c = book.edit_card(selector, &card_form(front, back, choices))?;
            persist(pool, book, "edit", &deck_target, &c.front)?;
            success("Card updated.");
        }
        CardCommand::Delete { selector } => {
            let c = book.delete_card(selector)?;
            persist(pool, book, "delete", &deck_target, &c.front)?;
            success(format!("Deleted card '{}'.", truncate(&c.front, 40)));
        }
        CardCommand::Clear => {
            if book.cards().is_empty() {
                info("No cards in this deck.");
                return Ok(());
            }
            if !confirm(
                &format!("Remove every card of '{}'?", book.current),
                assume_yes,
            ) {
                info("Operation cancelled.");
                return Ok(());
            }
            let n = book.clear_deck();
            persist(pool, book, "clear", &deck_target, &format!("{n} card(s) removed"))?;
            success(format!("Removed {n} card(s)."));
        }
    }
    Ok(())
}

// ---------------------------------------------------------------
// Sessions
// ---------------------------------------------------------------

/// Next input line, trimmed; `None` at end of input.
fn read_answer<R: BufRead>(input: &mut R) -> AppResult<Option<String>> {
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim().to_string()))
}

/// Interactive review: Enter flips, `n` next, `p` previous, `q` quits.
pub fn run_review<R: BufRead, W: Write>(mut review: Review, input: &mut R, out: &mut W) -> AppResult<()> {
    loop {
        let Some(card) = review.current() else {
            writeln!(out, "{GREEN}End of deck.{RESET}")?;
            return Ok(());
        };
        let (pos, total) = review.position();
        let face = if review.flipped { &card.back } else { &card.front };
        let side = if review.flipped { "back" } else { "front" };
        writeln!(out, "\n[{pos}/{total}] ({side}) {face}")?;
        if !review.flipped && card.is_multiple() {
            for (i, c) in card.choices.iter().enumerate() {
                writeln!(out, "   {}. {c}", i + 1)?;
            }
        }
        write!(out, "[Enter] flip  [n]ext  [p]rev  [q]uit > ")?;
        out.flush()?;

        let Some(cmd) = read_answer(input)? else {
            writeln!(out)?;
            return Ok(());
        };
        match cmd.to_lowercase().as_str() {
            "" | "f" => review.flip(),
            "n" => {
                review.next();
            }
            "p" => review.prev(),
            "q" => return Ok(()),
            other => writeln!(out, "{YELLOW}Unknown key '{other}'{RESET}")?,
        }
    }
}

/// Ask every card once. An empty line skips, `q` ends the test, end of input
/// ends it too.
pub fn run_test<R: BufRead, W: Write>(
    mut session: QuizSession,
    input: &mut R,
    out: &mut W,
) -> AppResult<QuizResult> {
    while !session.is_finished() {
        let Some(card) = session.current() else {
            break;
        };
        let (pos, total) = session.position();
        writeln!(out, "\n[{pos}/{total}] {}", card.front)?;
        let multiple = card.is_multiple();
        if multiple {
            for (i, c) in card.choices.iter().enumerate() {
                writeln!(out, "   {}. {c}", i + 1)?;
            }
        }
        let expected = match card.answer_index() {
            Some(i) if multiple => format!("{}. {}", i + 1, card.back),
            _ => card.back.clone(),
        };
        if let Some(left) = session.time_left() {
            writeln!(out, "({}s left)", left.as_secs())?;
        }
        write!(out, "Answer > ")?;
        out.flush()?;

        let started = Instant::now();
        let Some(answer) = read_answer(input)? else {
            writeln!(out)?;
            session.end();
            break;
        };
        if answer.eq_ignore_ascii_case("q") {
            session.end();
            break;
        }
        match session.submit(&answer, started.elapsed()) {
            Outcome::Correct => writeln!(out, "{GREEN}Correct!{RESET}")?,
            Outcome::Incorrect => writeln!(out, "{RED}Wrong.{RESET} Answer: {expected}")?,
            Outcome::TimedOut => writeln!(out, "{YELLOW}Time's up.{RESET} Answer: {expected}")?,
            Outcome::Unanswered => {
                writeln!(out, "{YELLOW}Time's up for the test.{RESET}")?;
                break;
            }
        }
    }
    Ok(session.result())
}

fn print_result(r: &QuizResult) {
    println!();
    let color = match r.percent() {
        80.. => GREEN,
        50..=79 => YELLOW,
        _ => RED,
    };
    println!(
        "Score: {color}{}/{} ({}%){RESET}",
        r.score,
        r.total,
        r.percent()
    );
    if r.timed_out > 0 {
        warning(format!("{} question(s) timed out.", r.timed_out));
    }
    if r.unanswered > 0 {
        info(format!("{} question(s) unanswered.", r.unanswered));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cards() -> Vec<Flashcard> {
        let mut written = CardForm::written("Capital of Italy", "Rome").build().unwrap();
        written.id = "a".into();
        let mut multiple = CardForm {
            front: "2+2".into(),
            back: "4".into(),
            multiple: true,
            choices: vec!["3".into(), "4".into(), "5".into()],
        }
        .build()
        .unwrap();
        multiple.id = "b".into();
        vec![written, multiple]
    }

    #[test]
    fn test_scores_written_and_choice_answers() {
        let session = QuizSession::new(cards(), TimerMode::None);
        let mut out = Vec::new();
        let result = run_test(session, &mut "rome\n2\n".as_bytes(), &mut out).unwrap();
        assert_eq!(result.score, 2);
        assert_eq!(result.percent(), 100);
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("[1/2] Capital of Italy"));
        assert!(text.contains("   2. 4"));
    }

    #[test]
    fn wrong_answers_show_the_expected_one() {
        let session = QuizSession::new(cards(), TimerMode::None);
        let mut out = Vec::new();
        let result = run_test(session, &mut "Milan\n3\n".as_bytes(), &mut out).unwrap();
        assert_eq!(result.score, 0);
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("Answer: Rome"));
        assert!(text.contains("Answer: 2. 4"));
    }

    #[test]
    fn quitting_leaves_the_rest_unanswered() {
        let session = QuizSession::new(cards(), TimerMode::None);
        let mut out = Vec::new();
        let result = run_test(session, &mut "rome\nq\n".as_bytes(), &mut out).unwrap();
        assert_eq!(result.score, 1);
        assert_eq!(result.unanswered, 1);

        let session = QuizSession::new(cards(), TimerMode::None);
        let result = run_test(session, &mut "".as_bytes(), &mut Vec::new()).unwrap();
        assert_eq!(result.unanswered, 2);
    }

    #[test]
    fn timed_tests_show_the_clock() {
        let timer = TimerMode::per_question(30).unwrap();
        let mut out = Vec::new();
        run_test(QuizSession::new(cards(), timer), &mut "rome\n2\n".as_bytes(), &mut out).unwrap();
        assert!(String::from_utf8(out).unwrap().contains("(30s left)"));
    }

    #[test]
    fn review_flips_and_walks_the_deck() {
        let mut out = Vec::new();
        run_review(Review::new(cards()), &mut "\nn\np\nn\nn\n".as_bytes(), &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("[1/2] (front) Capital of Italy"));
        assert!(text.contains("[1/2] (back) Rome"));
        assert!(text.contains("[2/2] (front) 2+2"));
        assert!(text.contains("End of deck."));
    }

    #[test]
    fn review_stops_at_end_of_input() {
        let mut out = Vec::new();
        run_review(Review::new(cards()), &mut "q\n".as_bytes(), &mut out).unwrap();
        assert!(!String::from_utf8(out).unwrap().contains("End of deck."));
    }
}
