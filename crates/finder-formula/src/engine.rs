//! Formula evaluation against text: the parsed [`Formula`], the permissive
//! [`evaluate_formula`] entry point, and formula auto-construction.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use crate::lexer::normalize_operators;
use crate::parser::{Expr, parse};
use crate::types::{FormulaError, Letter, PhraseSet, TruthTable};

/// Whether a formula can be satisfied at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Satisfiability {
    /// False under every assignment.
    Contradiction,
    /// True under every assignment.
    Tautology,
    /// Depends on which phrases are present.
    Contingent,
}

/// A parsed formula together with the text it was parsed from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Formula {
    source: String,
    expr: Expr,
}

impl Formula {
    /// Parse formula text, reporting the first problem found.
    pub fn parse(source: &str) -> Result<Self, FormulaError> {
        if source.trim().is_empty() {
            return Err(FormulaError::Empty);
        }
        let expr = parse(source)?;
        Ok(Self {
            source: source.trim().to_string(),
            expr,
        })
    }

    /// The formula as the user wrote it (trimmed).
    pub fn source(&self) -> &str {
        &self.source
    }

    /// The formula with shorthand operators rewritten to words.
    pub fn normalized(&self) -> String {
        normalize_operators(&self.source)
    }

    pub fn expr(&self) -> &Expr {
        &self.expr
    }

    pub fn variables(&self) -> BTreeSet<Letter> {
        self.expr.variables()
    }

    /// Evaluate against `text` with the given phrases.
    pub fn evaluate(&self, text: &str, phrases: &PhraseSet) -> bool {
        self.expr.eval(&phrases.truth_table(text))
    }

    /// Evaluate against a precomputed truth table.
    pub fn evaluate_table(&self, table: &TruthTable) -> bool {
        self.expr.eval(table)
    }

    /// Classify the formula by enumerating every assignment of the letters
    /// it uses (at most 2^6).
    pub fn classify(&self) -> Satisfiability {
        let vars: Vec<Letter> = self.variables().into_iter().collect();
        let mut seen_true = false;
        let mut seen_false = false;
        for mask in 0u32..(1 << vars.len()) {
            let mut table = TruthTable::default();
            for (bit, letter) in vars.iter().enumerate() {
                table.set(*letter, mask & (1 << bit) != 0);
            }
            if self.evaluate_table(&table) {
                seen_true = true;
            } else {
                seen_false = true;
            }
            if seen_true && seen_false {
                return Satisfiability::Contingent;
            }
        }
        if seen_true {
            Satisfiability::Tautology
        } else {
            Satisfiability::Contradiction
        }
    }
}

impl FromStr for Formula {
    type Err = FormulaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Formula::parse(s)
    }
}

impl fmt::Display for Formula {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

/// Evaluate `formula` against `text`, treating any problem as "no match".
///
/// An empty or malformed formula yields `false`. Use [`Formula::parse`]
/// when the caller needs to tell a non-match from a broken formula.
pub fn evaluate_formula(text: &str, phrases: &PhraseSet, formula: &str) -> bool {
    match Formula::parse(formula) {
        Ok(parsed) => parsed.evaluate(text, phrases),
        Err(_) => false,
    }
}

/// Build the default formula for a phrase set: every active letter joined
/// with `AND`. Returns an empty string when no phrase is active.
pub fn auto_formula(phrases: &PhraseSet) -> String {
    phrases
        .active_letters()
        .iter()
        .map(Letter::to_string)
        .collect::<Vec<_>>()
        .join(" AND ")
}
