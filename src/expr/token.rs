//! Expression tokenizer
//!
//! Splits an arithmetic expression into numbers, identifiers, operators,
//! and punctuation. No meaning is assigned here; variable binding and
//! evaluation happen in `eval`.

use super::eval::ParseErrorKind;

/// Binary operators of the curve formula grammar
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Op {
    Add,
    Sub,
    Mul,
    Div,
    Pow,
}

impl Op {
    /// Binding strength: `^` over `*`/`/` over `+`/`-`
    pub fn precedence(self) -> u8 {
        match self {
            Op::Pow => 3,
            Op::Mul | Op::Div => 2,
            Op::Add | Op::Sub => 1,
        }
    }

    /// Only exponentiation associates to the right (`2^3^2 == 2^(3^2)`)
    pub fn right_assoc(self) -> bool {
        matches!(self, Op::Pow)
    }

    /// Source character for messages
    pub fn symbol(self) -> char {
        match self {
            Op::Add => '+',
            Op::Sub => '-',
            Op::Mul => '*',
            Op::Div => '/',
            Op::Pow => '^',
        }
    }
}

/// One lexical unit of an expression
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    Number(f64),
    Ident(String),
    Op(Op),
    LParen,
    RParen,
    Comma,
}

/// Tokenize an expression into numbers, identifiers and punctuation.
///
/// Identifiers are left unresolved; whether one is the bound variable or a
/// builtin function is decided during evaluation.
pub fn tokenize(expr: &str) -> Result<Vec<Token>, ParseErrorKind> {
    let mut tokens = Vec::new();
    let mut chars = expr.chars().peekable();

    while let Some(&c) = chars.peek() {
        match c {
            c if c.is_whitespace() => {
                chars.next();
            }
            '0'..='9' | '.' => {
                let mut text = String::new();
                while let Some(&d) = chars.peek() {
                    if d.is_ascii_digit() || d == '.' {
                        text.push(d);
                        chars.next();
                    } else {
                        break;
                    }
                }
                let value = text
                    .parse::<f64>()
                    .map_err(|_| ParseErrorKind::InvalidNumber(text.clone()))?;
                tokens.push(Token::Number(value));
            }
            c if c.is_ascii_alphabetic() || c == '_' => {
                let mut name = String::new();
                while let Some(&d) = chars.peek() {
                    if d.is_ascii_alphanumeric() || d == '_' {
                        name.push(d);
                        chars.next();
                    } else {
                        break;
                    }
                }
                tokens.push(Token::Ident(name));
            }
            '+' | '-' | '*' | '/' | '^' => {
                chars.next();
                let op = match c {
                    '+' => Op::Add,
                    '-' => Op::Sub,
                    '*' => Op::Mul,
                    '/' => Op::Div,
                    _ => Op::Pow,
                };
                tokens.push(Token::Op(op));
            }
            '(' => {
                chars.next();
                tokens.push(Token::LParen);
            }
            ')' => {
                chars.next();
                tokens.push(Token::RParen);
            }
            ',' => {
                chars.next();
                tokens.push(Token::Comma);
            }
            other => return Err(ParseErrorKind::InvalidCharacter(other)),
        }
    }

    if tokens.is_empty() {
        return Err(ParseErrorKind::Empty);
    }
    Ok(tokens)
}
