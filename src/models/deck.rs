use crate::models::numbers::{lenient_string, lenient_vec, optional_number};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Deck name → cards, front of the list first.
pub type Decks = BTreeMap<String, Vec<Flashcard>>;

pub const DEFAULT_DECK: &str = "Default";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum CardKind {
    #[default]
    Written,
    Multiple,
}

impl<'de> Deserialize<'de> for CardKind {
    fn deserialize<D: Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
        let s = lenient_string(d)?;
        Ok(if s.trim().eq_ignore_ascii_case("multiple") {
            CardKind::Multiple
        } else {
            CardKind::Written
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Flashcard {
    #[serde(default, deserialize_with = "lenient_string")]
    pub id: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub front: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub back: String,
    #[serde(rename = "type", default)]
    pub kind: CardKind,
    #[serde(default, deserialize_with = "lenient_vec", skip_serializing_if = "Vec::is_empty")]
    pub choices: Vec<String>,
    #[serde(default, deserialize_with = "lenient_index", skip_serializing_if = "Option::is_none")]
    pub correct_index: Option<usize>,
}

fn lenient_index<'de, D: Deserializer<'de>>(d: D) -> Result<Option<usize>, D::Error> {
    let v = Value::deserialize(d)?;
    Ok(optional_number(&v)
        .filter(|n| *n >= 0.0)
        .map(|n| n.trunc() as usize))
}

impl Flashcard {
    pub fn is_multiple(&self) -> bool {
        self.kind == CardKind::Multiple && !self.choices.is_empty()
    }

    /// Index of the right choice: the stored index when valid, else the
    /// position of the back text among the choices.
    pub fn answer_index(&self) -> Option<usize> {
        self.correct_index
            .filter(|i| *i < self.choices.len())
            .or_else(|| self.choices.iter().position(|c| c == &self.back))
    }
}

/// Deck map used when nothing (or garbage) is stored.
pub fn default_decks() -> Decks {
    let mut decks = Decks::new();
    decks.insert(DEFAULT_DECK.to_string(), Vec::new());
    decks
}
