//! Operator normalization and tokenization of formula text.
//!
//! Formulas accept symbolic shorthands (`&`, `||`, `!`, ...) alongside the
//! word operators. [`normalize_operators`] rewrites the symbols to words by
//! plain sequential string replacement; [`tokenize`] then splits the
//! normalized text into a token stream for the parser.

use std::fmt;

use crate::types::{FormulaError, Letter};

/// Symbol rewrites, applied in this order. Longer symbols come first so
/// `&&` is not rewritten as two `&`.
pub const OPERATOR_REWRITES: [(&str, &str); 7] = [
    ("&&", " AND "),
    ("||", " OR "),
    ("&", " AND "),
    ("|", " OR "),
    ("!", " NOT "),
    ("~", " NOT "),
    ("^", " XOR "),
];

/// Rewrite shorthand operators into word operators and collapse whitespace.
///
/// This is a textual rewrite: symbols are replaced wherever they occur,
/// including inside words.
pub fn normalize_operators(formula: &str) -> String {
    let mut normalized = formula.to_string();
    for (symbol, word) in OPERATOR_REWRITES {
        normalized = normalized.replace(symbol, word);
    }
    normalized.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Bracket kinds accepted for grouping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bracket {
    Round,
    Square,
    Curly,
}

impl Bracket {
    pub fn open_char(self) -> char {
        match self {
            Bracket::Round => '(',
            Bracket::Square => '[',
            Bracket::Curly => '{',
        }
    }

    pub fn close_char(self) -> char {
        match self {
            Bracket::Round => ')',
            Bracket::Square => ']',
            Bracket::Curly => '}',
        }
    }

    /// Classify `c` as an opening bracket.
    pub fn from_open(c: char) -> Option<Bracket> {
        match c {
            '(' => Some(Bracket::Round),
            '[' => Some(Bracket::Square),
            '{' => Some(Bracket::Curly),
            _ => None,
        }
    }

    /// Classify `c` as a closing bracket.
    pub fn from_close(c: char) -> Option<Bracket> {
        match c {
            ')' => Some(Bracket::Round),
            ']' => Some(Bracket::Square),
            '}' => Some(Bracket::Curly),
            _ => None,
        }
    }
}

/// A formula token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Token {
    Var(Letter),
    And,
    Or,
    Xor,
    Nor,
    Xnor,
    Not,
    Open(Bracket),
    Close(Bracket),
}

impl Token {
    /// Returns `true` for operators that take two operands.
    pub fn is_binary(self) -> bool {
        matches!(
            self,
            Token::And | Token::Or | Token::Xor | Token::Nor | Token::Xnor
        )
    }

    fn from_word(word: &str) -> Option<Token> {
        match word {
            "AND" => Some(Token::And),
            "OR" => Some(Token::Or),
            "XOR" => Some(Token::Xor),
            "NOR" => Some(Token::Nor),
            "XNOR" => Some(Token::Xnor),
            "NOT" => Some(Token::Not),
            _ => None,
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Var(letter) => write!(f, "{}", letter),
            Token::And => f.write_str("AND"),
            Token::Or => f.write_str("OR"),
            Token::Xor => f.write_str("XOR"),
            Token::Nor => f.write_str("NOR"),
            Token::Xnor => f.write_str("XNOR"),
            Token::Not => f.write_str("NOT"),
            Token::Open(b) => write!(f, "{}", b.open_char()),
            Token::Close(b) => write!(f, "{}", b.close_char()),
        }
    }
}

/// A value tagged with its 1-based character position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Spanned<T> {
    pub value: T,
    pub pos: usize,
}

/// Output of the lenient scanner: either a token or something that is not
/// part of the language.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Lexeme {
    Token(Token),
    /// An alphanumeric run that is neither a letter A-F nor an operator,
    /// uppercased.
    Word(String),
    /// A character outside the formula alphabet.
    Char(char),
}

/// Scan already-normalized formula text without failing.
///
/// Words are matched case-insensitively. Validation uses this to report
/// every problem at once; [`tokenize`] stops at the first one.
pub fn scan(normalized: &str) -> Vec<Spanned<Lexeme>> {
    let chars: Vec<char> = normalized.chars().collect();
    let mut out = Vec::new();
    let mut i = 0;
    while i < chars.len() {
        let c = chars[i];
        let pos = i + 1;
        if c.is_whitespace() {
            i += 1;
            continue;
        }
        if let Some(b) = Bracket::from_open(c) {
            out.push(Spanned { value: Lexeme::Token(Token::Open(b)), pos });
            i += 1;
            continue;
        }
        if let Some(b) = Bracket::from_close(c) {
            out.push(Spanned { value: Lexeme::Token(Token::Close(b)), pos });
            i += 1;
            continue;
        }
        if is_word_char(c) {
            let start = i;
            while i < chars.len() && is_word_char(chars[i]) {
                i += 1;
            }
            let word: String = chars[start..i].iter().collect::<String>().to_uppercase();
            out.push(Spanned { value: classify_word(word), pos });
            continue;
        }
        out.push(Spanned { value: Lexeme::Char(c), pos });
        i += 1;
    }
    out
}

/// Normalize `formula` and split it into tokens.
pub fn tokenize(formula: &str) -> Result<Vec<Spanned<Token>>, FormulaError> {
    let normalized = normalize_operators(formula);
    scan(&normalized)
        .into_iter()
        .map(|lexeme| match lexeme.value {
            Lexeme::Token(token) => Ok(Spanned {
                value: token,
                pos: lexeme.pos,
            }),
            Lexeme::Word(word) => Err(unknown_word_error(word, lexeme.pos)),
            Lexeme::Char(ch) => Err(FormulaError::UnexpectedChar { ch, pos: lexeme.pos }),
        })
        .collect()
}

fn classify_word(word: String) -> Lexeme {
    if let Some(token) = Token::from_word(&word) {
        return Lexeme::Token(token);
    }
    let mut chars = word.chars();
    if let (Some(c), None) = (chars.next(), chars.next()) {
        if let Some(letter) = Letter::from_char(c) {
            return Lexeme::Token(Token::Var(letter));
        }
    }
    Lexeme::Word(word)
}

fn unknown_word_error(word: String, pos: usize) -> FormulaError {
    if word.chars().count() == 1 && word.chars().all(|c| c.is_ascii_alphabetic()) {
        FormulaError::UnknownVariable { name: word, pos }
    } else {
        FormulaError::UnknownWord { word, pos }
    }
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn tokens(formula: &str) -> Vec<Token> {
        tokenize(formula)
            .unwrap()
            .into_iter()
            .map(|t| t.value)
            .collect()
    }

    // -- normalize_operators ---------------------------------------------

    #[test]
    fn normalize_symbol_operators() {
        assert_eq!(normalize_operators("A & B"), "A AND B");
        assert_eq!(normalize_operators("A && B"), "A AND B");
        assert_eq!(normalize_operators("A | B"), "A OR B");
        assert_eq!(normalize_operators("A || B"), "A OR B");
        assert_eq!(normalize_operators("!A"), "NOT A");
        assert_eq!(normalize_operators("~A"), "NOT A");
        assert_eq!(normalize_operators("A ^ B"), "A XOR B");
    }

    #[test]
    fn normalize_mixed_and_nested() {
        assert_eq!(normalize_operators("A & B | C"), "A AND B OR C");
        assert_eq!(normalize_operators("!(A | B)"), "NOT (A OR B)");
        assert_eq!(normalize_operators("A&!B"), "A AND NOT B");
    }

    #[test]
    fn normalize_collapses_whitespace() {
        assert_eq!(normalize_operators("  A   AND\tB  "), "A AND B");
        assert_eq!(normalize_operators(""), "");
    }

    #[test]
    fn normalize_leaves_words_untouched() {
        assert_eq!(normalize_operators("A and not B"), "A and not B");
    }

    // -- tokenize --------------------------------------------------------

    #[test]
    fn tokenize_words_case_insensitively() {
        assert_eq!(
            tokens("a and not b"),
            vec![Token::Var(Letter::A), Token::And, Token::Not, Token::Var(Letter::B)]
        );
    }

    #[test]
    fn tokenize_all_bracket_kinds() {
        assert_eq!(
            tokens("[A] | {B}"),
            vec![
                Token::Open(Bracket::Square),
                Token::Var(Letter::A),
                Token::Close(Bracket::Square),
                Token::Or,
                Token::Open(Bracket::Curly),
                Token::Var(Letter::B),
                Token::Close(Bracket::Curly),
            ]
        );
    }

    #[test]
    fn tokenize_extended_operators() {
        assert_eq!(
            tokens("A NOR B XNOR C"),
            vec![
                Token::Var(Letter::A),
                Token::Nor,
                Token::Var(Letter::B),
                Token::Xnor,
                Token::Var(Letter::C),
            ]
        );
    }

    #[test]
    fn tokenize_positions_refer_to_normalized_text() {
        let spanned = tokenize("A&B").unwrap();
        // normalized: "A AND B"
        assert_eq!(spanned[0].pos, 1);
        assert_eq!(spanned[1].pos, 3);
        assert_eq!(spanned[2].pos, 7);
    }

    #[test]
    fn tokenize_rejects_unknown_letter() {
        assert_eq!(
            tokenize("A AND G").unwrap_err(),
            FormulaError::UnknownVariable {
                name: "G".to_string(),
                pos: 7
            }
        );
    }

    #[test]
    fn tokenize_rejects_joined_letters_as_word() {
        assert!(matches!(
            tokenize("AB").unwrap_err(),
            FormulaError::UnknownWord { .. }
        ));
    }

    #[test]
    fn tokenize_rejects_stray_characters() {
        assert_eq!(
            tokenize("A + B").unwrap_err(),
            FormulaError::UnexpectedChar { ch: '+', pos: 3 }
        );
    }

    #[test]
    fn scan_reports_every_lexeme() {
        let lexemes: Vec<Lexeme> = scan("A FOO + b").into_iter().map(|l| l.value).collect();
        assert_eq!(
            lexemes,
            vec![
                Lexeme::Token(Token::Var(Letter::A)),
                Lexeme::Word("FOO".to_string()),
                Lexeme::Char('+'),
                Lexeme::Token(Token::Var(Letter::B)),
            ]
        );
    }
}
