//! Flashcard decks.
//!
//! All decks live in one JSON object under `flashcardDecks`; the name of the
//! deck in use is stored next to it.

use crate::core::select_index;
use crate::db::kv::{Storage, keys};
use crate::errors::{AppError, AppResult};
use crate::models::deck::{CardKind, DEFAULT_DECK, Decks, Flashcard, default_decks};
use crate::models::new_id;
use serde_json::Value;

pub const IMPORTED_DECK: &str = "Imported";

/// Values entered for a new or edited card.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CardForm {
    pub front: String,
    pub back: String,
    pub multiple: bool,
    pub choices: Vec<String>,
}

impl CardForm {
    pub fn written(front: &str, back: &str) -> Self {
        Self {
            front: front.into(),
            back: back.into(),
            ..Default::default()
        }
    }

    /// Validate and build the card. The id is left empty.
    pub fn build(&self) -> AppResult<Flashcard> {
        let front = self.front.trim();
        let back = self.back.trim();
        if front.is_empty() || back.is_empty() {
            return Err(AppError::invalid("Front and back are required!"));
        }
        let mut card = Flashcard {
            id: String::new(),
            front: front.to_string(),
            back: back.to_string(),
            kind: CardKind::Written,
            choices: Vec::new(),
            correct_index: None,
        };
        if self.multiple {
            let choices: Vec<String> = self
                .choices
                .iter()
                .map(|c| c.trim())
                .filter(|c| !c.is_empty())
                .map(str::to_string)
                .collect();
            if choices.len() < 2 {
                return Err(AppError::invalid(
                    "At least 2 choices required for multiple choice!",
                ));
            }
            let Some(idx) = choices.iter().position(|c| c == back) else {
                return Err(AppError::invalid(
                    "Answer must match one of the choices exactly!",
                ));
            };
            card.kind = CardKind::Multiple;
            card.choices = choices;
            card.correct_index = Some(idx);
        }
        Ok(card)
    }
}

fn require_name(name: &str) -> AppResult<&str> {
    let name = name.trim();
    if name.is_empty() {
        return Err(AppError::invalid("Deck name is required"));
    }
    Ok(name)
}

pub struct DeckBook {
    pub decks: Decks,
    pub current: String,
    dirty: bool,
}

impl DeckBook {
    /// Load decks; `preferred` is used when no current deck was stored.
    pub fn load(store: &Storage<'_>, preferred: &str) -> AppResult<Self> {
        let raw: Value = store.load(keys::DECKS, || Value::Null)?;
        let decks = match raw {
            Value::Object(map) => {
                let mut decks = Decks::new();
                for (name, cards) in map {
                    let Value::Array(items) = cards else {
                        continue;
                    };
                    let cards = items
                        .into_iter()
                        .filter_map(|c| serde_json::from_value::<Flashcard>(c).ok())
                        .collect();
                    decks.insert(name, cards);
                }
                if decks.is_empty() { default_decks() } else { decks }
            }
            _ => default_decks(),
        };
        let stored: Option<String> = store.load(keys::CURRENT_DECK, || None)?;
        let mut book = Self {
            decks,
            current: stored.unwrap_or_else(|| preferred.to_string()),
            dirty: false,
        };
        book.fix_current();
        Ok(book)
    }

    pub fn save(&mut self, store: &Storage<'_>) -> AppResult<bool> {
        if !self.dirty {
            return Ok(false);
        }
        let tx = store.transaction()?;
        store.save(keys::DECKS, &self.decks)?;
        store.save(keys::CURRENT_DECK, &self.current)?;
        tx.commit()?;
        self.dirty = false;
        Ok(true)
    }

    fn fix_current(&mut self) {
        if !self.decks.contains_key(&self.current) {
            self.current = self
                .decks
                .keys()
                .next()
                .cloned()
                .unwrap_or_else(|| DEFAULT_DECK.to_string());
        }
    }

    pub fn cards(&self) -> &[Flashcard] {
        self.decks.get(&self.current).map(Vec::as_slice).unwrap_or(&[])
    }

    fn cards_mut(&mut self) -> &mut Vec<Flashcard> {
        self.dirty = true;
        self.decks.entry(self.current.clone()).or_default()
    }

    pub fn deck(&self, name: &str) -> AppResult<&[Flashcard]> {
        self.decks
            .get(name)
            .map(Vec::as_slice)
            .ok_or_else(|| AppError::NotFound(format!("deck '{name}'")))
    }

    // ---------------------------------------------------------------
    // Decks
    // ---------------------------------------------------------------

    pub fn create_deck(&mut self, name: &str) -> AppResult<()> {
        let name = require_name(name)?;
        if self.decks.contains_key(name) {
            return Err(AppError::invalid("A deck with that name already exists"));
        }
        self.decks.insert(name.to_string(), Vec::new());
        self.current = name.to_string();
        self.dirty = true;
        Ok(())
    }

    /// Rename the current deck. Returns false when the name is unchanged.
    pub fn rename_deck(&mut self, name: &str) -> AppResult<bool> {
        let name = require_name(name)?;
        if name == self.current {
            return Ok(false);
        }
        if self.decks.contains_key(name) {
            return Err(AppError::invalid("A deck with that name already exists"));
        }
        let cards = self.decks.remove(&self.current).unwrap_or_default();
        self.decks.insert(name.to_string(), cards);
        self.current = name.to_string();
        self.dirty = true;
        Ok(true)
    }

    /// Delete a deck (the current one by default). Returns its card count.
    pub fn delete_deck(&mut self, name: Option<&str>) -> AppResult<usize> {
        let name = name.map(str::trim).unwrap_or(&self.current).to_string();
        let Some(cards) = self.decks.remove(&name) else {
            return Err(AppError::NotFound(format!("deck '{name}'")));
        };
        if self.decks.is_empty() {
            self.decks = default_decks();
        }
        self.fix_current();
        self.dirty = true;
        Ok(cards.len())
    }

    pub fn switch_deck(&mut self, name: &str) -> AppResult<()> {
        let name = name.trim();
        if !self.decks.contains_key(name) {
            return Err(AppError::NotFound(format!("deck '{name}'")));
        }
        if self.current != name {
            self.current = name.to_string();
            self.dirty = true;
        }
        Ok(())
    }

    // ---------------------------------------------------------------
    // Cards
    // ---------------------------------------------------------------

    pub fn find_card(&self, selector: &str) -> AppResult<usize> {
        select_index(self.cards(), |c| c.id.as_str(), selector, "card")
    }

    /// New cards go to the front of the deck.
    pub fn add_card(&mut self, form: &CardForm) -> AppResult<Flashcard> {
        let mut card = form.build()?;
        card.id = new_id();
        self.cards_mut().insert(0, card.clone());
        Ok(card)
    }

    /// Replace a card in place, keeping its id.
    pub fn edit_card(&mut self, selector: &str, form: &CardForm) -> AppResult<Flashcard> {
        let idx = self.find_card(selector)?;
        let mut card = form.build()?;
        card.id = self.cards()[idx].id.clone();
        self.cards_mut()[idx] = card.clone();
        Ok(card)
    }

    pub fn delete_card(&mut self, selector: &str) -> AppResult<Flashcard> {
        let idx = self.find_card(selector)?;
        Ok(self.cards_mut().remove(idx))
    }

    /// Remove every card of the current deck; returns how many were removed.
    pub fn clear_deck(&mut self) -> usize {
        let n = self.cards().len();
        if n > 0 {
            self.cards_mut().clear();
        }
        n
    }

    /// Case-insensitive match on front or back, with deck positions.
    pub fn search(&self, term: &str) -> Vec<(usize, &Flashcard)> {
        let needle = term.trim().to_lowercase();
        self.cards()
            .iter()
            .enumerate()
            .filter(|(_, c)| {
                c.front.to_lowercase().contains(&needle) || c.back.to_lowercase().contains(&needle)
            })
            .collect()
    }

    // ---------------------------------------------------------------
    // Transfer
    // ---------------------------------------------------------------

    pub fn export_deck(&self, name: Option<&str>) -> AppResult<String> {
        let cards = self.deck(name.unwrap_or(&self.current))?;
        Ok(serde_json::to_string_pretty(cards)?)
    }

    /// Store a JSON array of cards under `name` (replacing a deck of the
    /// same name) and make it current. Returns the card count.
    pub fn import_deck(&mut self, raw: &str, name: Option<&str>) -> AppResult<usize> {
        let invalid = || AppError::Import("Invalid deck JSON format".into());
        let Value::Array(items) = serde_json::from_str::<Value>(raw).map_err(|_| invalid())? else {
            return Err(invalid());
        };
        let name = name
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .unwrap_or(IMPORTED_DECK)
            .to_string();
        let cards: Vec<Flashcard> = items
            .into_iter()
            .filter_map(|c| serde_json::from_value::<Flashcard>(c).ok())
            .map(|mut c| {
                if c.id.trim().is_empty() {
                    c.id = new_id();
                }
                c
            })
            .collect();
        let n = cards.len();
        self.decks.insert(name.clone(), cards);
        self.current = name;
        self.dirty = true;
        Ok(n)
    }
}
