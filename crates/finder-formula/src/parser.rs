//! Precedence-climbing parser producing a boolean expression tree.
//!
//! Binding strength, tightest first: `NOT`, then `XOR`/`XNOR`, then `AND`,
//! then `OR`/`NOR`. Binary operators associate to the left and any bracket
//! kind groups, as long as it is closed by the same kind.

use std::collections::BTreeSet;
use std::fmt;

use crate::lexer::{Bracket, Spanned, Token, tokenize};
use crate::types::{FormulaError, Letter, TruthTable};

/// Deepest nesting of `NOT` and brackets a formula may use.
pub const MAX_DEPTH: usize = 256;

/// Binary boolean operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    And,
    Or,
    Xor,
    Nor,
    Xnor,
}

impl BinaryOp {
    /// Higher binds tighter.
    pub fn precedence(self) -> u8 {
        match self {
            BinaryOp::Or | BinaryOp::Nor => 1,
            BinaryOp::And => 2,
            BinaryOp::Xor | BinaryOp::Xnor => 3,
        }
    }

    pub fn apply(self, lhs: bool, rhs: bool) -> bool {
        match self {
            BinaryOp::And => lhs && rhs,
            BinaryOp::Or => lhs || rhs,
            BinaryOp::Xor => lhs != rhs,
            BinaryOp::Nor => !(lhs || rhs),
            BinaryOp::Xnor => lhs == rhs,
        }
    }

    pub fn keyword(self) -> &'static str {
        match self {
            BinaryOp::And => "AND",
            BinaryOp::Or => "OR",
            BinaryOp::Xor => "XOR",
            BinaryOp::Nor => "NOR",
            BinaryOp::Xnor => "XNOR",
        }
    }

    fn from_token(token: Token) -> Option<BinaryOp> {
        match token {
            Token::And => Some(BinaryOp::And),
            Token::Or => Some(BinaryOp::Or),
            Token::Xor => Some(BinaryOp::Xor),
            Token::Nor => Some(BinaryOp::Nor),
            Token::Xnor => Some(BinaryOp::Xnor),
            _ => None,
        }
    }
}

/// A parsed boolean expression over phrase letters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expr {
    Var(Letter),
    Not(Box<Expr>),
    Binary {
        op: BinaryOp,
        lhs: Box<Expr>,
        rhs: Box<Expr>,
    },
}

impl Expr {
    /// Evaluate against a truth table.
    pub fn eval(&self, table: &TruthTable) -> bool {
        match self {
            Expr::Var(letter) => table.get(*letter),
            Expr::Not(inner) => !inner.eval(table),
            Expr::Binary { op, lhs, rhs } => op.apply(lhs.eval(table), rhs.eval(table)),
        }
    }

    /// Letters referenced anywhere in the expression.
    pub fn variables(&self) -> BTreeSet<Letter> {
        let mut vars = BTreeSet::new();
        self.collect_variables(&mut vars);
        vars
    }

    fn collect_variables(&self, vars: &mut BTreeSet<Letter>) {
        match self {
            Expr::Var(letter) => {
                vars.insert(*letter);
            }
            Expr::Not(inner) => inner.collect_variables(vars),
            Expr::Binary { lhs, rhs, .. } => {
                lhs.collect_variables(vars);
                rhs.collect_variables(vars);
            }
        }
    }
}

/// Canonical, fully bracketed rendering.
impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Var(letter) => write!(f, "{}", letter),
            Expr::Not(inner) => write!(f, "NOT {}", inner),
            Expr::Binary { op, lhs, rhs } => write!(f, "({} {} {})", lhs, op.keyword(), rhs),
        }
    }
}

/// Parse formula text into an expression tree.
pub fn parse(formula: &str) -> Result<Expr, FormulaError> {
    let tokens = tokenize(formula)?;
    parse_tokens(&tokens)
}

/// Parse an already tokenized formula.
pub fn parse_tokens(tokens: &[Spanned<Token>]) -> Result<Expr, FormulaError> {
    if tokens.is_empty() {
        return Err(FormulaError::Empty);
    }
    let mut parser = Parser {
        tokens,
        cursor: 0,
        depth: 0,
    };
    let expr = parser.expression(0)?;
    match parser.peek() {
        None => Ok(expr),
        Some(extra) => Err(unexpected(extra)),
    }
}

struct Parser<'t> {
    tokens: &'t [Spanned<Token>],
    cursor: usize,
    depth: usize,
}

impl<'t> Parser<'t> {
    fn peek(&self) -> Option<&'t Spanned<Token>> {
        self.tokens.get(self.cursor)
    }

    fn next(&mut self) -> Option<&'t Spanned<Token>> {
        let token = self.tokens.get(self.cursor);
        if token.is_some() {
            self.cursor += 1;
        }
        token
    }

    fn expression(&mut self, min_precedence: u8) -> Result<Expr, FormulaError> {
        let mut lhs = self.unary()?;
        while let Some(op) = self.peek().and_then(|t| BinaryOp::from_token(t.value)) {
            if op.precedence() < min_precedence {
                break;
            }
            self.cursor += 1;
            let rhs = self.expression(op.precedence() + 1)?;
            lhs = Expr::Binary {
                op,
                lhs: Box::new(lhs),
                rhs: Box::new(rhs),
            };
        }
        Ok(lhs)
    }

    /// Enter one level of `NOT` or bracket nesting.
    fn descend(&mut self, pos: usize) -> Result<(), FormulaError> {
        if self.depth >= MAX_DEPTH {
            return Err(FormulaError::TooDeep { pos });
        }
        self.depth += 1;
        Ok(())
    }

    fn unary(&mut self) -> Result<Expr, FormulaError> {
        if let Some(token) = self.peek().filter(|t| t.value == Token::Not) {
            self.cursor += 1;
            self.descend(token.pos)?;
            let operand = self.unary()?;
            self.depth -= 1;
            return Ok(Expr::Not(Box::new(operand)));
        }
        self.primary()
    }

    fn primary(&mut self) -> Result<Expr, FormulaError> {
        let token = self.next().ok_or(FormulaError::UnexpectedEnd)?;
        match token.value {
            Token::Var(letter) => Ok(Expr::Var(letter)),
            Token::Open(open) => {
                self.descend(token.pos)?;
                let inner = self.expression(0)?;
                self.close(open, token.pos)?;
                self.depth -= 1;
                Ok(inner)
            }
            _ => Err(unexpected(token)),
        }
    }

    fn close(&mut self, open: Bracket, open_pos: usize) -> Result<(), FormulaError> {
        match self.next() {
            Some(Spanned {
                value: Token::Close(close),
                pos,
            }) => {
                if *close == open {
                    Ok(())
                } else {
                    Err(FormulaError::MismatchedBracket {
                        open: open.open_char(),
                        close: close.close_char(),
                        pos: *pos,
                    })
                }
            }
            Some(other) => Err(unexpected(other)),
            None => Err(FormulaError::UnclosedBracket {
                open: open.open_char(),
                pos: open_pos,
            }),
        }
    }
}

fn unexpected(token: &Spanned<Token>) -> FormulaError {
    FormulaError::UnexpectedToken {
        found: token.value.to_string(),
        pos: token.pos,
    }
}
