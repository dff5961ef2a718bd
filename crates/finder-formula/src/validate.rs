//! Formula validation report.
//!
//! Unlike [`Formula::parse`](crate::engine::Formula::parse), which stops at
//! the first problem, [`validate`] collects every error and warning it can
//! find so the user can fix a formula in one pass. Errors make a formula
//! unusable; a contradiction warning blocks a search (the formula can never
//! match); other warnings are informational.

use std::collections::BTreeSet;
use std::fmt;

use serde::Serialize;

use crate::engine::{Formula, Satisfiability};
use crate::lexer::{Bracket, Lexeme, Spanned, Token, normalize_operators, scan};
use crate::types::{FormulaError, Letter, PhraseSet};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
}

/// What a diagnostic is about. Drives suggestions and blocking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum DiagnosticKind {
    EmptyFormula,
    UnmatchedClosing,
    MismatchedBrackets,
    UnclosedBracket,
    EmptyBrackets,
    InvalidCharacters,
    UnknownVariable,
    UnknownWord,
    MissingOperator,
    ConsecutiveOperators,
    MissingOperand,
    Unparseable,
    TooDeep,
    MissingPhrase,
    Contradiction,
    Tautology,
}

impl DiagnosticKind {
    /// A fix-it hint for this kind of problem.
    pub fn suggestion(self) -> &'static str {
        match self {
            DiagnosticKind::EmptyFormula => {
                "Add phrases (A-F) or enter an expression such as 'A AND B'."
            }
            DiagnosticKind::UnmatchedClosing
            | DiagnosticKind::MismatchedBrackets
            | DiagnosticKind::UnclosedBracket => {
                "Balance parentheses/brackets so every opening symbol has a matching close."
            }
            DiagnosticKind::EmptyBrackets => {
                "Add content inside the empty parentheses or remove them entirely."
            }
            DiagnosticKind::InvalidCharacters | DiagnosticKind::UnknownWord => {
                "Replace unsupported characters with AND/OR/NOT/XOR operators or parentheses."
            }
            DiagnosticKind::UnknownVariable => "Use only the phrase letters A through F.",
            DiagnosticKind::MissingOperator => {
                "Ensure each variable is separated by an operator, e.g. 'A AND B'."
            }
            DiagnosticKind::ConsecutiveOperators | DiagnosticKind::MissingOperand => {
                "Provide values on both sides of each operator, such as 'A OR (B AND C)'."
            }
            DiagnosticKind::Unparseable => {
                "Check the formula structure around the reported position."
            }
            DiagnosticKind::TooDeep => {
                "Remove doubled NOTs and redundant brackets to flatten the formula."
            }
            DiagnosticKind::MissingPhrase => {
                "Fill in phrases for the listed variables or remove those letters from the formula."
            }
            DiagnosticKind::Contradiction => {
                "Remove contradictory terms like 'A AND NOT A', or split them into separate conditions."
            }
            DiagnosticKind::Tautology => {
                "Simplify tautologies such as 'A OR NOT A' to reduce unnecessary matches."
            }
        }
    }
}

/// One finding about a formula.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    pub severity: Severity,
    pub message: String,
}

impl Diagnostic {
    fn error(kind: DiagnosticKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            severity: Severity::Error,
            message: message.into(),
        }
    }

    fn warning(kind: DiagnosticKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            severity: Severity::Warning,
            message: message.into(),
        }
    }

    /// Errors and contradictions stop a search.
    pub fn is_blocking(&self) -> bool {
        self.severity == Severity::Error || self.kind == DiagnosticKind::Contradiction
    }
}

/// Everything [`validate`] found about one formula.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationReport {
    pub formula: String,
    pub diagnostics: Vec<Diagnostic>,
}

impl ValidationReport {
    pub fn errors(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics
            .iter()
            .filter(|d| d.severity == Severity::Error)
    }

    pub fn warnings(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics
            .iter()
            .filter(|d| d.severity == Severity::Warning)
    }

    /// No errors (warnings allowed).
    pub fn is_valid(&self) -> bool {
        self.errors().next().is_none()
    }

    /// Any error or blocking warning.
    pub fn is_blocked(&self) -> bool {
        self.diagnostics.iter().any(Diagnostic::is_blocking)
    }

    pub fn is_clean(&self) -> bool {
        self.diagnostics.is_empty()
    }

    pub fn has(&self, kind: DiagnosticKind) -> bool {
        self.diagnostics.iter().any(|d| d.kind == kind)
    }

    /// One suggestion per distinct problem kind, in report order.
    pub fn suggestions(&self) -> Vec<&'static str> {
        let mut seen = BTreeSet::new();
        self.diagnostics
            .iter()
            .map(|d| d.kind.suggestion())
            .filter(|s| seen.insert(*s))
            .collect()
    }
}

/// Check `formula` for structural and logical problems.
///
/// `phrases` is used to warn about letters that have no phrase bound.
pub fn validate(formula: &str, phrases: &PhraseSet) -> ValidationReport {
    let formula = formula.trim();
    let mut diagnostics = Vec::new();

    if formula.is_empty() {
        diagnostics.push(Diagnostic::error(
            DiagnosticKind::EmptyFormula,
            "The formula is empty. Add phrases (A-F) or enter a custom expression.",
        ));
        return ValidationReport {
            formula: String::new(),
            diagnostics,
        };
    }

    check_brackets(formula, &mut diagnostics);
    check_empty_brackets(formula, &mut diagnostics);

    let lexemes = scan(&normalize_operators(formula));
    check_lexemes(&lexemes, &mut diagnostics);
    check_structure(&lexemes, &mut diagnostics);

    if diagnostics.is_empty() {
        match Formula::parse(formula) {
            Ok(parsed) => check_logic(&parsed, phrases, &mut diagnostics),
            Err(e @ FormulaError::TooDeep { .. }) => diagnostics.push(Diagnostic::error(
                DiagnosticKind::TooDeep,
                format!("Formula cannot be parsed: {}", e),
            )),
            Err(e) => diagnostics.push(Diagnostic::error(
                DiagnosticKind::Unparseable,
                format!("Formula cannot be parsed: {}", e),
            )),
        }
    }

    ValidationReport {
        formula: formula.to_string(),
        diagnostics,
    }
}

// ---------------------------------------------------------------------------
// Individual checks
// ---------------------------------------------------------------------------

/// Bracket balance over the raw formula, 1-based positions.
fn check_brackets(formula: &str, out: &mut Vec<Diagnostic>) {
    let mut stack: Vec<(Bracket, usize)> = Vec::new();
    for (i, c) in formula.chars().enumerate() {
        let pos = i + 1;
        if let Some(open) = Bracket::from_open(c) {
            stack.push((open, pos));
        } else if let Some(close) = Bracket::from_close(c) {
            match stack.pop() {
                None => out.push(Diagnostic::error(
                    DiagnosticKind::UnmatchedClosing,
                    format!("Unmatched closing '{}' at position {}", c, pos),
                )),
                Some((open, open_pos)) if open != close => out.push(Diagnostic::error(
                    DiagnosticKind::MismatchedBrackets,
                    format!(
                        "Mismatched parentheses: '{}' at position {} closed by '{}' at position {}",
                        open.open_char(),
                        open_pos,
                        c,
                        pos
                    ),
                )),
                Some(_) => {}
            }
        }
    }
    for (open, pos) in stack {
        out.push(Diagnostic::error(
            DiagnosticKind::UnclosedBracket,
            format!("Unclosed '{}' at position {}", open.open_char(), pos),
        ));
    }
}

fn check_empty_brackets(formula: &str, out: &mut Vec<Diagnostic>) {
    let compact: String = formula.chars().filter(|c| !c.is_whitespace()).collect();
    if ["()", "[]", "{}"].iter().any(|pair| compact.contains(pair)) {
        out.push(Diagnostic::error(
            DiagnosticKind::EmptyBrackets,
            "Empty parentheses/brackets found - they must contain expressions",
        ));
    }
}

/// Characters and words outside the language.
fn check_lexemes(lexemes: &[Spanned<Lexeme>], out: &mut Vec<Diagnostic>) {
    let mut invalid_chars = BTreeSet::new();
    for lexeme in lexemes {
        match &lexeme.value {
            Lexeme::Char(c) => {
                invalid_chars.insert(*c);
            }
            Lexeme::Word(word) => out.push(describe_word(word)),
            Lexeme::Token(_) => {}
        }
    }
    if !invalid_chars.is_empty() {
        let listed: Vec<String> = invalid_chars.iter().map(char::to_string).collect();
        out.push(Diagnostic::error(
            DiagnosticKind::InvalidCharacters,
            format!("Invalid characters found: {}", listed.join(", ")),
        ));
    }
}

fn describe_word(word: &str) -> Diagnostic {
    let letters: Option<Vec<Letter>> = word.chars().map(Letter::from_char).collect();
    match letters {
        Some(letters) if letters.len() > 1 => {
            let spaced: Vec<String> = letters.iter().map(Letter::to_string).collect();
            Diagnostic::error(
                DiagnosticKind::MissingOperator,
                format!(
                    "Invalid sequence: '{}' - missing operator between variables",
                    spaced.join(" ")
                ),
            )
        }
        _ if word.chars().count() == 1 && word.chars().all(|c| c.is_ascii_alphabetic()) => {
            Diagnostic::error(
                DiagnosticKind::UnknownVariable,
                format!("Unknown variable '{}' - only A-F are supported", word),
            )
        }
        _ => Diagnostic::error(
            DiagnosticKind::UnknownWord,
            format!("Unrecognized word '{}'", word),
        ),
    }
}

/// A scanned item as seen by the placement check. Unknown words stand in
/// for operands; stray characters are skipped.
#[derive(Clone, Copy)]
enum Slot<'a> {
    Token(Token),
    Word(&'a str),
}

impl Slot<'_> {
    fn is_binary(self) -> bool {
        matches!(self, Slot::Token(t) if t.is_binary())
    }

    fn ends_operand(self) -> bool {
        matches!(
            self,
            Slot::Word(_) | Slot::Token(Token::Var(_)) | Slot::Token(Token::Close(_))
        )
    }

    fn starts_operand(self) -> bool {
        matches!(
            self,
            Slot::Word(_)
                | Slot::Token(Token::Var(_))
                | Slot::Token(Token::Open(_))
                | Slot::Token(Token::Not)
        )
    }
}

impl fmt::Display for Slot<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Slot::Token(t) => write!(f, "{}", t),
            Slot::Word(w) => f.write_str(w),
        }
    }
}

/// Operator/operand placement over the scanned formula.
fn check_structure(lexemes: &[Spanned<Lexeme>], out: &mut Vec<Diagnostic>) {
    let slots: Vec<Slot<'_>> = lexemes
        .iter()
        .filter_map(|l| match &l.value {
            Lexeme::Token(t) => Some(Slot::Token(*t)),
            Lexeme::Word(w) => Some(Slot::Word(w.as_str())),
            Lexeme::Char(_) => None,
        })
        .collect();

    for (i, slot) in slots.iter().copied().enumerate() {
        let prev = i.checked_sub(1).map(|p| slots[p]);
        let next = slots.get(i + 1).copied();

        match slot {
            s if s.is_binary() => {
                match prev {
                    None => out.push(Diagnostic::error(
                        DiagnosticKind::MissingOperand,
                        format!("'{}' operator at start of formula needs left operand", s),
                    )),
                    Some(p) if p.is_binary() => out.push(Diagnostic::error(
                        DiagnosticKind::ConsecutiveOperators,
                        format!("Invalid sequence: '{} {}' - consecutive operators", p, s),
                    )),
                    Some(p) if !p.ends_operand() => out.push(Diagnostic::error(
                        DiagnosticKind::MissingOperand,
                        format!("'{}' operator missing valid left operand", s),
                    )),
                    _ => {}
                }
                match next {
                    None => out.push(Diagnostic::error(
                        DiagnosticKind::MissingOperand,
                        format!("'{}' operator at end of formula needs right operand", s),
                    )),
                    Some(Slot::Token(Token::Close(_))) => out.push(Diagnostic::error(
                        DiagnosticKind::MissingOperand,
                        format!("'{}' operator missing valid right operand", s),
                    )),
                    _ => {}
                }
            }
            Slot::Token(Token::Not) => match next {
                None => out.push(Diagnostic::error(
                    DiagnosticKind::MissingOperand,
                    "'NOT' operator at end of formula needs operand",
                )),
                Some(n) if !n.starts_operand() => out.push(Diagnostic::error(
                    DiagnosticKind::MissingOperand,
                    "'NOT' operator missing valid operand",
                )),
                _ => {}
            },
            s if s.ends_operand() => {
                if let Some(n) = next.filter(|n| n.starts_operand()) {
                    // joined letters already reported by the word check
                    if matches!((s, n), (Slot::Word(_), _) | (_, Slot::Word(_))) {
                        continue;
                    }
                    out.push(Diagnostic::error(
                        DiagnosticKind::MissingOperator,
                        format!("Invalid sequence: '{} {}' - missing operator", s, n),
                    ));
                }
            }
            _ => {}
        }
    }
}

/// Semantic checks on a formula that parsed cleanly.
fn check_logic(formula: &Formula, phrases: &PhraseSet, out: &mut Vec<Diagnostic>) {
    let missing: Vec<String> = formula
        .variables()
        .into_iter()
        .filter(|l| !phrases.is_active(*l))
        .map(|l| l.to_string())
        .collect();
    if !missing.is_empty() {
        out.push(Diagnostic::warning(
            DiagnosticKind::MissingPhrase,
            format!(
                "Variables {} are used in formula but have no corresponding phrases",
                missing.join(", ")
            ),
        ));
    }

    match formula.classify() {
        Satisfiability::Contradiction => out.push(Diagnostic::warning(
            DiagnosticKind::Contradiction,
            format!(
                "Logical paradox detected: '{}' - this will always be false",
                formula.source()
            ),
        )),
        Satisfiability::Tautology => out.push(Diagnostic::warning(
            DiagnosticKind::Tautology,
            format!(
                "Tautology detected: '{}' - this will always be true",
                formula.source()
            ),
        )),
        Satisfiability::Contingent => {}
    }
}
