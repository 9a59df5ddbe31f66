//! Expression evaluation
//!
//! Evaluates one arithmetic expression with a single bound variable and the
//! builtin functions `pow`, `sqrt`, `floor` and `ceil`. The pipeline:
//!
//! 1. Tokenize (see `token`).
//! 2. Bind the variable by exact token match. Binding happens on tokens, not
//!    by text substitution, so a variable name that is a substring of another
//!    identifier can never corrupt it.
//! 3. Resolve builtin calls innermost-first: arguments are split on
//!    top-level commas and evaluated recursively, then the whole call is
//!    replaced by its numeric result.
//! 4. Convert the remaining infix stream to postfix (shunting-yard).
//! 5. Fold the postfix stream with an operand stack.
//!
//! Pure functions throughout; safe to call from any thread.

use thiserror::Error;

use super::token::{tokenize, Op, Token};

/// Ways an expression can fail to parse
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParseErrorKind {
    #[error("invalid character '{0}'")]
    InvalidCharacter(char),
    #[error("invalid number literal '{0}'")]
    InvalidNumber(String),
    #[error("unknown identifier '{0}'")]
    UnknownIdentifier(String),
    #[error("unknown function '{0}'")]
    UnknownFunction(String),
    #[error("{function}() takes {expected} argument(s), got {found}")]
    WrongArgCount {
        function: String,
        expected: usize,
        found: usize,
    },
    #[error("unmatched parenthesis")]
    UnmatchedParen,
    #[error("comma outside a function call")]
    MisplacedComma,
    #[error("empty expression")]
    Empty,
}

/// Ways a well-formed expression can fail to produce a value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum EvalErrorKind {
    #[error("division by zero")]
    DivisionByZero,
    #[error("operator ran out of operands")]
    StackUnderflow,
    #[error("expression left extra operands behind")]
    LeftoverOperands,
}

/// Evaluation failure, carrying the offending expression text
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ExprError {
    #[error("cannot parse '{expr}': {kind}")]
    Parse { expr: String, kind: ParseErrorKind },
    #[error("cannot evaluate '{expr}': {kind}")]
    Eval { expr: String, kind: EvalErrorKind },
}

impl ExprError {
    /// The expression that failed
    pub fn expression(&self) -> &str {
        match self {
            ExprError::Parse { expr, .. } | ExprError::Eval { expr, .. } => expr,
        }
    }
}

/// Internal error carrier; the expression text is attached once at the top.
#[derive(Debug, Clone, PartialEq)]
enum ErrorKind {
    Parse(ParseErrorKind),
    Eval(EvalErrorKind),
}

impl From<ParseErrorKind> for ErrorKind {
    fn from(kind: ParseErrorKind) -> ErrorKind {
        ErrorKind::Parse(kind)
    }
}

impl From<EvalErrorKind> for ErrorKind {
    fn from(kind: EvalErrorKind) -> ErrorKind {
        ErrorKind::Eval(kind)
    }
}

impl ErrorKind {
    fn into_error(self, expr: &str) -> ExprError {
        match self {
            ErrorKind::Parse(kind) => ExprError::Parse {
                expr: expr.to_string(),
                kind,
            },
            ErrorKind::Eval(kind) => ExprError::Eval {
                expr: expr.to_string(),
                kind,
            },
        }
    }
}

/// Evaluate `expr` with `variable` bound to `value`.
///
/// Division by zero is an error, never a silent `inf`/`NaN`. Malformed
/// expressions report what went wrong together with the expression text.
pub fn evaluate(expr: &str, variable: &str, value: f64) -> Result<f64, ExprError> {
    run(expr, variable, value).map_err(|kind| kind.into_error(expr))
}

fn run(expr: &str, variable: &str, value: f64) -> Result<f64, ErrorKind> {
    let mut tokens = tokenize(expr)?;
    bind_variable(&mut tokens, variable, value);
    eval_tokens(&tokens)
}

/// Replace every identifier token exactly equal to `variable` with its value.
fn bind_variable(tokens: &mut [Token], variable: &str, value: f64) {
    for token in tokens.iter_mut() {
        if matches!(token, Token::Ident(name) if name == variable) {
            *token = Token::Number(value);
        }
    }
}

fn eval_tokens(tokens: &[Token]) -> Result<f64, ErrorKind> {
    if tokens.is_empty() {
        return Err(ParseErrorKind::Empty.into());
    }
    let resolved = resolve_functions(tokens.to_vec())?;
    let postfix = to_postfix(resolved)?;
    eval_postfix(&postfix)
}

/// Replace builtin calls with their numeric results until none remain.
///
/// Each round finds the first function identifier, scans to its balanced
/// closing parenthesis, evaluates the arguments recursively (which handles
/// nested calls), and splices the result back into the stream.
fn resolve_functions(mut tokens: Vec<Token>) -> Result<Vec<Token>, ErrorKind> {
    loop {
        let mut call = None;
        for (i, token) in tokens.iter().enumerate() {
            if let Token::Ident(name) = token {
                call = Some((i, name.clone()));
                break;
            }
        }
        let Some((start, name)) = call else {
            return Ok(tokens);
        };

        if !matches!(tokens.get(start + 1), Some(Token::LParen)) {
            // bare identifier: not the bound variable, not a call
            return Err(ParseErrorKind::UnknownIdentifier(name).into());
        }
        let close = matching_paren(&tokens, start + 1)?;

        let args = split_args(&tokens[start + 2..close]);
        let mut values = Vec::with_capacity(args.len());
        for arg in &args {
            values.push(eval_tokens(arg)?);
        }
        let result = apply_function(&name, &values)?;
        tokens.splice(start..=close, std::iter::once(Token::Number(result)));
    }
}

/// Index of the parenthesis matching the one at `open`.
fn matching_paren(tokens: &[Token], open: usize) -> Result<usize, ErrorKind> {
    let mut depth = 0usize;
    for (i, token) in tokens.iter().enumerate().skip(open) {
        match token {
            Token::LParen => depth += 1,
            Token::RParen => {
                depth -= 1;
                if depth == 0 {
                    return Ok(i);
                }
            }
            _ => {}
        }
    }
    Err(ParseErrorKind::UnmatchedParen.into())
}

/// Split an argument list on top-level commas. Commas nested inside inner
/// parentheses do not separate arguments.
fn split_args(tokens: &[Token]) -> Vec<&[Token]> {
    if tokens.is_empty() {
        return Vec::new();
    }
    let mut args = Vec::new();
    let mut depth = 0usize;
    let mut start = 0usize;
    for (i, token) in tokens.iter().enumerate() {
        match token {
            Token::LParen => depth += 1,
            Token::RParen => depth = depth.saturating_sub(1),
            Token::Comma if depth == 0 => {
                args.push(&tokens[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    args.push(&tokens[start..]);
    args
}

fn apply_function(name: &str, args: &[f64]) -> Result<f64, ErrorKind> {
    match (name, args) {
        ("pow", [base, exp]) => Ok(base.powf(*exp)),
        ("sqrt", [x]) => Ok(x.sqrt()),
        ("floor", [x]) => Ok(x.floor()),
        ("ceil", [x]) => Ok(x.ceil()),
        ("pow", _) => Err(wrong_args("pow", 2, args.len())),
        ("sqrt", _) => Err(wrong_args("sqrt", 1, args.len())),
        ("floor", _) => Err(wrong_args("floor", 1, args.len())),
        ("ceil", _) => Err(wrong_args("ceil", 1, args.len())),
        _ => Err(ParseErrorKind::UnknownFunction(name.to_string()).into()),
    }
}

fn wrong_args(function: &str, expected: usize, found: usize) -> ErrorKind {
    ParseErrorKind::WrongArgCount {
        function: function.to_string(),
        expected,
        found,
    }
    .into()
}

/// Shunting-yard: infix tokens to postfix order.
fn to_postfix(tokens: Vec<Token>) -> Result<Vec<Token>, ErrorKind> {
    let mut output = Vec::with_capacity(tokens.len());
    let mut ops: Vec<Token> = Vec::new();

    for token in tokens {
        match token {
            Token::Number(_) => output.push(token),
            Token::Op(op) => {
                while let Some(&Token::Op(top)) = ops.last() {
                    let binds_tighter = top.precedence() > op.precedence()
                        || (top.precedence() == op.precedence() && !op.right_assoc());
                    if binds_tighter {
                        output.push(Token::Op(top));
                        ops.pop();
                    } else {
                        break;
                    }
                }
                ops.push(Token::Op(op));
            }
            Token::LParen => ops.push(Token::LParen),
            Token::RParen => loop {
                match ops.pop() {
                    Some(Token::LParen) => break,
                    Some(stacked) => output.push(stacked),
                    None => return Err(ParseErrorKind::UnmatchedParen.into()),
                }
            },
            Token::Comma => return Err(ParseErrorKind::MisplacedComma.into()),
            // function calls were resolved before this stage
            Token::Ident(name) => return Err(ParseErrorKind::UnknownIdentifier(name).into()),
        }
    }

    while let Some(stacked) = ops.pop() {
        if matches!(stacked, Token::LParen) {
            return Err(ParseErrorKind::UnmatchedParen.into());
        }
        output.push(stacked);
    }
    Ok(output)
}

/// Fold a postfix stream with an operand stack.
fn eval_postfix(tokens: &[Token]) -> Result<f64, ErrorKind> {
    let mut stack: Vec<f64> = Vec::new();
    for token in tokens {
        match token {
            Token::Number(value) => stack.push(*value),
            Token::Op(op) => {
                let rhs = stack.pop().ok_or(EvalErrorKind::StackUnderflow)?;
                let lhs = stack.pop().ok_or(EvalErrorKind::StackUnderflow)?;
                stack.push(apply_op(*op, lhs, rhs)?);
            }
            // postfix output holds numbers and operators only
            _ => return Err(EvalErrorKind::StackUnderflow.into()),
        }
    }
    let result = stack.pop().ok_or(EvalErrorKind::StackUnderflow)?;
    if !stack.is_empty() {
        return Err(EvalErrorKind::LeftoverOperands.into());
    }
    Ok(result)
}

fn apply_op(op: Op, lhs: f64, rhs: f64) -> Result<f64, ErrorKind> {
    match op {
        Op::Add => Ok(lhs + rhs),
        Op::Sub => Ok(lhs - rhs),
        Op::Mul => Ok(lhs * rhs),
        Op::Div => {
            if rhs == 0.0 {
                Err(EvalErrorKind::DivisionByZero.into())
            } else {
                Ok(lhs / rhs)
            }
        }
        Op::Pow => Ok(lhs.powf(rhs)),
    }
}
