//! Phrase data model: letters, phrases, phrase sets and truth tables.
//!
//! A search binds up to six phrases to the letters `A`-`F`. Formulas refer
//! to phrases by letter only; the truth table is the bridge between a piece
//! of text and the formula evaluator.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// A phrase variable identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Letter {
    A,
    B,
    C,
    D,
    E,
    F,
}

impl Letter {
    /// All letters in formula order.
    pub const ALL: [Letter; 6] = [
        Letter::A,
        Letter::B,
        Letter::C,
        Letter::D,
        Letter::E,
        Letter::F,
    ];

    /// Zero-based slot of this letter in a [`TruthTable`].
    pub fn index(self) -> usize {
        self as usize
    }

    /// The uppercase character for this letter.
    pub fn as_char(self) -> char {
        (b'A' + self as u8) as char
    }

    /// Parse a letter from a single character, ignoring case.
    pub fn from_char(c: char) -> Option<Letter> {
        match c.to_ascii_uppercase() {
            'A' => Some(Letter::A),
            'B' => Some(Letter::B),
            'C' => Some(Letter::C),
            'D' => Some(Letter::D),
            'E' => Some(Letter::E),
            'F' => Some(Letter::F),
            _ => None,
        }
    }
}

impl fmt::Display for Letter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

impl FromStr for Letter {
    type Err = FormulaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let mut chars = trimmed.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => {
                Letter::from_char(c).ok_or_else(|| FormulaError::InvalidLetter(trimmed.to_string()))
            }
            _ => Err(FormulaError::InvalidLetter(trimmed.to_string())),
        }
    }
}

impl TryFrom<String> for Letter {
    type Error = FormulaError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Letter> for String {
    fn from(letter: Letter) -> Self {
        letter.to_string()
    }
}

/// One user-supplied search term and its case policy.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Phrase {
    /// The text to look for.
    pub text: String,

    /// Match with exact case instead of lowercase comparison.
    #[serde(default)]
    pub case_sensitive: bool,
}

impl Phrase {
    pub fn new(text: impl Into<String>, case_sensitive: bool) -> Self {
        Self {
            text: text.into(),
            case_sensitive,
        }
    }

    /// A phrase matched without regard to case.
    pub fn insensitive(text: impl Into<String>) -> Self {
        Self::new(text, false)
    }

    /// A phrase matched with exact case.
    pub fn sensitive(text: impl Into<String>) -> Self {
        Self::new(text, true)
    }

    /// Whitespace-only phrases are treated as absent.
    pub fn is_active(&self) -> bool {
        !self.text.trim().is_empty()
    }

    /// Returns `true` if this phrase occurs in `haystack`.
    ///
    /// Inactive phrases never match.
    pub fn matches(&self, haystack: &str) -> bool {
        if !self.is_active() {
            return false;
        }
        if self.case_sensitive {
            haystack.contains(self.text.as_str())
        } else {
            haystack
                .to_lowercase()
                .contains(self.text.to_lowercase().as_str())
        }
    }
}

/// The phrases of one search, keyed by letter.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PhraseSet {
    phrases: BTreeMap<Letter, Phrase>,
}

impl PhraseSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `phrase` to `letter`, replacing any previous binding.
    pub fn set(&mut self, letter: Letter, phrase: Phrase) -> Option<Phrase> {
        self.phrases.insert(letter, phrase)
    }

    /// Builder-style variant of [`PhraseSet::set`].
    pub fn with(mut self, letter: Letter, phrase: Phrase) -> Self {
        self.set(letter, phrase);
        self
    }

    pub fn get(&self, letter: Letter) -> Option<&Phrase> {
        self.phrases.get(&letter)
    }

    pub fn remove(&mut self, letter: Letter) -> Option<Phrase> {
        self.phrases.remove(&letter)
    }

    /// Returns `true` if `letter` is bound to a non-empty phrase.
    pub fn is_active(&self, letter: Letter) -> bool {
        self.get(letter).is_some_and(Phrase::is_active)
    }

    /// Letters bound to non-empty phrases, in formula order.
    pub fn active_letters(&self) -> Vec<Letter> {
        Letter::ALL
            .into_iter()
            .filter(|l| self.is_active(*l))
            .collect()
    }

    pub fn has_active(&self) -> bool {
        self.phrases.values().any(Phrase::is_active)
    }

    pub fn iter(&self) -> impl Iterator<Item = (Letter, &Phrase)> {
        self.phrases.iter().map(|(l, p)| (*l, p))
    }

    pub fn is_empty(&self) -> bool {
        self.phrases.is_empty()
    }

    /// Overlay `other` on top of this set; bindings in `other` win.
    pub fn merge(&mut self, other: &PhraseSet) {
        for (letter, phrase) in other.iter() {
            self.set(letter, phrase.clone());
        }
    }

    /// Compute which phrases occur in `text`.
    ///
    /// The lowercase copy of `text` is built at most once, so this is the
    /// preferred path when several phrases are checked against one line.
    pub fn truth_table(&self, text: &str) -> TruthTable {
        let mut table = TruthTable::default();
        let mut lowered: Option<String> = None;
        for (letter, phrase) in self.iter() {
            if !phrase.is_active() {
                continue;
            }
            let present = if phrase.case_sensitive {
                text.contains(phrase.text.as_str())
            } else {
                let haystack = lowered.get_or_insert_with(|| text.to_lowercase());
                haystack.contains(phrase.text.to_lowercase().as_str())
            };
            table.set(letter, present);
        }
        table
    }
}

impl FromIterator<(Letter, Phrase)> for PhraseSet {
    fn from_iter<I: IntoIterator<Item = (Letter, Phrase)>>(iter: I) -> Self {
        Self {
            phrases: iter.into_iter().collect(),
        }
    }
}

/// Presence of each phrase in one piece of text.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TruthTable {
    values: [bool; 6],
}

impl TruthTable {
    pub fn get(&self, letter: Letter) -> bool {
        self.values[letter.index()]
    }

    pub fn set(&mut self, letter: Letter, value: bool) {
        self.values[letter.index()] = value;
    }

    /// Build a table from explicit assignments; unlisted letters are false.
    pub fn from_pairs(pairs: &[(Letter, bool)]) -> Self {
        let mut table = Self::default();
        for (letter, value) in pairs {
            table.set(*letter, *value);
        }
        table
    }
}

/// Errors produced while reading a formula.
///
/// Positions are 1-based character offsets into the normalized formula.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FormulaError {
    #[error("formula is empty")]
    Empty,

    #[error("invalid phrase letter '{0}' (expected one of A-F)")]
    InvalidLetter(String),

    #[error("unexpected character '{ch}' at position {pos}")]
    UnexpectedChar { ch: char, pos: usize },

    #[error("unknown variable '{name}' at position {pos} (only A-F are supported)")]
    UnknownVariable { name: String, pos: usize },

    #[error("unknown word '{word}' at position {pos}")]
    UnknownWord { word: String, pos: usize },

    #[error("unexpected '{found}' at position {pos}")]
    UnexpectedToken { found: String, pos: usize },

    #[error("formula ends where an operand was expected")]
    UnexpectedEnd,

    #[error("unclosed '{open}' at position {pos}")]
    UnclosedBracket { open: char, pos: usize },

    #[error("'{open}' closed by '{close}' at position {pos}")]
    MismatchedBracket { open: char, close: char, pos: usize },

    #[error(
        "formula nests deeper than {} levels at position {pos}",
        crate::parser::MAX_DEPTH
    )]
    TooDeep { pos: usize },
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn letter_parsing_ignores_case() {
        assert_eq!("a".parse::<Letter>().unwrap(), Letter::A);
        assert_eq!(" F ".parse::<Letter>().unwrap(), Letter::F);
        assert!("G".parse::<Letter>().is_err());
        assert!("AB".parse::<Letter>().is_err());
        assert!("".parse::<Letter>().is_err());
    }

    #[test]
    fn letter_round_trips_through_char() {
        for letter in Letter::ALL {
            assert_eq!(Letter::from_char(letter.as_char()), Some(letter));
        }
        assert_eq!(Letter::C.to_string(), "C");
        assert_eq!(Letter::E.index(), 4);
    }

    #[test]
    fn case_sensitive_phrase_respects_case() {
        let phrase = Phrase::sensitive("Python");
        assert!(phrase.matches("I like Python"));
        assert!(!phrase.matches("I like python"));
    }

    #[test]
    fn case_insensitive_phrase_ignores_case() {
        let phrase = Phrase::insensitive("python");
        assert!(phrase.matches("Python"));
        assert!(phrase.matches("PYTHON"));
        assert!(!phrase.matches("Java"));
    }

    #[test]
    fn blank_phrase_never_matches() {
        assert!(!Phrase::insensitive("").matches("anything"));
        assert!(!Phrase::insensitive("   ").matches("   spaced   "));
        assert!(!Phrase::sensitive("\t").matches("\t"));
    }

    #[test]
    fn truth_table_marks_present_phrases() {
        let phrases = PhraseSet::new()
            .with(Letter::A, Phrase::insensitive("python"))
            .with(Letter::B, Phrase::sensitive("Java"))
            .with(Letter::C, Phrase::insensitive(""));
        let table = phrases.truth_table("Python and java");
        assert!(table.get(Letter::A));
        assert!(!table.get(Letter::B));
        assert!(!table.get(Letter::C));
        assert!(!table.get(Letter::D));
    }

    #[test]
    fn active_letters_skip_blank_phrases() {
        let phrases = PhraseSet::new()
            .with(Letter::C, Phrase::insensitive("c"))
            .with(Letter::A, Phrase::insensitive("a"))
            .with(Letter::B, Phrase::insensitive(" "));
        assert_eq!(phrases.active_letters(), vec![Letter::A, Letter::C]);
        assert!(phrases.has_active());
        assert!(!PhraseSet::new().has_active());
    }

    #[test]
    fn phrase_set_serializes_as_letter_map() {
        let phrases = PhraseSet::new().with(Letter::B, Phrase::sensitive("Rust"));
        let json = serde_json::to_string(&phrases).unwrap();
        assert_eq!(json, r#"{"B":{"text":"Rust","case_sensitive":true}}"#);

        let back: PhraseSet = serde_json::from_str(r#"{"b":{"text":"x"}}"#).unwrap();
        assert_eq!(back.get(Letter::B), Some(&Phrase::insensitive("x")));
    }

    #[test]
    fn merge_overrides_existing_bindings() {
        let mut base = PhraseSet::new()
            .with(Letter::A, Phrase::insensitive("old"))
            .with(Letter::B, Phrase::insensitive("keep"));
        let overlay = PhraseSet::new().with(Letter::A, Phrase::sensitive("new"));
        base.merge(&overlay);
        assert_eq!(base.get(Letter::A), Some(&Phrase::sensitive("new")));
        assert_eq!(base.get(Letter::B), Some(&Phrase::insensitive("keep")));
    }
}
