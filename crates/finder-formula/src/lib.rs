//! Boolean formula engine for phrase search.
//!
//! A search binds up to six phrases to the letters `A`-`F` and combines them
//! with a formula such as `(A | B) & !C`. This crate normalizes and parses
//! formulas, evaluates them against text, and validates them for structural
//! and logical problems before a search runs.

pub mod engine;
pub mod lexer;
pub mod parser;
pub mod types;
pub mod validate;

pub use engine::{Formula, Satisfiability, auto_formula, evaluate_formula};
pub use lexer::{Token, normalize_operators, tokenize};
pub use parser::{BinaryOp, Expr, MAX_DEPTH};
pub use types::{FormulaError, Letter, Phrase, PhraseSet, TruthTable};
pub use validate::{Diagnostic, DiagnosticKind, Severity, ValidationReport, validate};
