//! Review and test sessions over a deck.

use crate::errors::{AppError, AppResult};
use crate::models::deck::Flashcard;
use rand::seq::SliceRandom;
use std::time::Duration;

pub const PER_QUESTION_SECS: std::ops::RangeInclusive<u64> = 5..=300;
pub const TOTAL_MINUTES: std::ops::RangeInclusive<u64> = 1..=180;

/// Cards in deck order, or shuffled.
pub fn arrange(cards: &[Flashcard], shuffle: bool) -> AppResult<Vec<Flashcard>> {
    if cards.is_empty() {
        return Err(AppError::invalid("Add some cards first!"));
    }
    let mut order = cards.to_vec();
    if shuffle {
        order.shuffle(&mut rand::rng());
    }
    Ok(order)
}

/// Multiple-choice cards take the choice text or, when no choice reads like
/// the answer, a 1-based choice number; written cards compare trimmed and
/// case-insensitive.
pub fn check_answer(card: &Flashcard, answer: &str) -> bool {
    let answer = answer.trim();
    if card.is_multiple() {
        let Some(correct) = card.answer_index() else {
            return false;
        };
        if let Some(i) = card
            .choices
            .iter()
            .position(|c| c.trim().eq_ignore_ascii_case(answer))
        {
            return i == correct;
        }
        return answer
            .parse::<usize>()
            .is_ok_and(|n| (1..=card.choices.len()).contains(&n) && n - 1 == correct);
    }
    answer.to_lowercase() == card.back.trim().to_lowercase()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TimerMode {
    #[default]
    None,
    PerQuestion(Duration),
    Total(Duration),
}

impl TimerMode {
    pub fn per_question(secs: u64) -> AppResult<Self> {
        if !PER_QUESTION_SECS.contains(&secs) {
            return Err(AppError::invalid(format!(
                "Seconds per question must be between {} and {}",
                PER_QUESTION_SECS.start(),
                PER_QUESTION_SECS.end()
            )));
        }
        Ok(TimerMode::PerQuestion(Duration::from_secs(secs)))
    }

    pub fn total(minutes: u64) -> AppResult<Self> {
        if !TOTAL_MINUTES.contains(&minutes) {
            return Err(AppError::invalid(format!(
                "Minutes for test must be between {} and {}",
                TOTAL_MINUTES.start(),
                TOTAL_MINUTES.end()
            )));
        }
        Ok(TimerMode::Total(Duration::from_secs(minutes * 60)))
    }

    pub fn describe(&self) -> String {
        match self {
            TimerMode::None => "no timer".into(),
            TimerMode::PerQuestion(d) => format!("{}s per question", d.as_secs()),
            TimerMode::Total(d) => format!("{} min total", d.as_secs() / 60),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Correct,
    Incorrect,
    TimedOut,
    Unanswered,
}

/// Steps through cards front to back; nothing is scored.
#[derive(Debug, Clone)]
pub struct Review {
    cards: Vec<Flashcard>,
    index: usize,
    pub flipped: bool,
}

impl Review {
    pub fn new(cards: Vec<Flashcard>) -> Self {
        Self {
            cards,
            index: 0,
            flipped: false,
        }
    }

    pub fn current(&self) -> Option<&Flashcard> {
        self.cards.get(self.index)
    }

    pub fn position(&self) -> (usize, usize) {
        (self.index + 1, self.cards.len())
    }

    pub fn flip(&mut self) {
        self.flipped = !self.flipped;
    }

    /// Returns false once past the last card.
    pub fn next(&mut self) -> bool {
        self.flipped = false;
        if self.index + 1 < self.cards.len() {
            self.index += 1;
            true
        } else {
            self.index = self.cards.len();
            false
        }
    }

    pub fn prev(&mut self) {
        self.flipped = false;
        self.index = self.index.saturating_sub(1);
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QuizResult {
    pub score: usize,
    pub total: usize,
    pub timed_out: usize,
    pub unanswered: usize,
}

impl QuizResult {
    pub fn percent(&self) -> u32 {
        if self.total == 0 {
            return 0;
        }
        (self.score as f64 / self.total as f64 * 100.0).round() as u32
    }
}

/// A scored test. Answers are submitted with the time spent on them.
#[derive(Debug, Clone)]
pub struct QuizSession {
    cards: Vec<Flashcard>,
    timer: TimerMode,
    elapsed: Duration,
    outcomes: Vec<Outcome>,
    ended: bool,
}

impl QuizSession {
    pub fn new(cards: Vec<Flashcard>, timer: TimerMode) -> Self {
        Self {
            cards,
            timer,
            elapsed: Duration::ZERO,
            outcomes: Vec::new(),
            ended: false,
        }
    }

    pub fn timer(&self) -> TimerMode {
        self.timer
    }

    pub fn current(&self) -> Option<&Flashcard> {
        if self.ended {
            return None;
        }
        self.cards.get(self.outcomes.len())
    }

    /// 1-based number of the current card and the card count.
    pub fn position(&self) -> (usize, usize) {
        (self.outcomes.len() + 1, self.cards.len())
    }

    pub fn is_finished(&self) -> bool {
        self.ended || self.outcomes.len() >= self.cards.len()
    }

    /// Time left on the clock for the current question, if timed.
    pub fn time_left(&self) -> Option<Duration> {
        match self.timer {
            TimerMode::None => None,
            TimerMode::PerQuestion(limit) => Some(limit),
            TimerMode::Total(limit) => Some(limit.saturating_sub(self.elapsed)),
        }
    }

    pub fn submit(&mut self, answer: &str, took: Duration) -> Outcome {
        let Some(card) = self.current() else {
            return Outcome::Unanswered;
        };
        let correct = check_answer(card, answer);
        self.elapsed += took;

        let outcome = match self.timer {
            TimerMode::PerQuestion(limit) if took > limit => Outcome::TimedOut,
            TimerMode::Total(limit) if self.elapsed > limit => {
                self.ended = true;
                Outcome::Unanswered
            }
            _ if correct => Outcome::Correct,
            _ => Outcome::Incorrect,
        };
        self.outcomes.push(outcome);
        if self.outcomes.len() >= self.cards.len() {
            self.ended = true;
        }
        outcome
    }

    /// Stop early; remaining cards count as unanswered.
    pub fn end(&mut self) {
        self.ended = true;
    }

    pub fn result(&self) -> QuizResult {
        let count = |o: Outcome| self.outcomes.iter().filter(|x| **x == o).count();
        let answered = self.outcomes.len();
        QuizResult {
            score: count(Outcome::Correct),
            total: self.cards.len(),
            timed_out: count(Outcome::TimedOut),
            unanswered: count(Outcome::Unanswered) + self.cards.len().saturating_sub(answered),
        }
    }
}
