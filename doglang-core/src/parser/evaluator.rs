//! Expression evaluator
//!
//! Evaluates a flat token run directly with precedence climbing. There is no
//! intermediate expression tree: operands are reduced to values as soon as the
//! operator between them is known.

use crate::parser::ast::TokenRun;
use crate::parser::environment::Environment;
use crate::parser::error::{DogError, DogResult, RuntimeError, SemanticError};
use crate::parser::lexer::{Token, TokenKind};
use std::fmt;

/// Runtime value
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Value {
    Int(i64),
    Float(f64),
    Bool(bool),
    Str(String),
}

impl Value {
    /// Name used in error messages
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::Bool(_) => "bool",
            Value::Str(_) => "string",
        }
    }

    /// Truthiness used by loop conditions: zero, the empty string and false end a loop
    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Int(n) => *n != 0,
            Value::Float(x) => *x != 0.0,
            Value::Bool(b) => *b,
            Value::Str(s) => !s.is_empty(),
        }
    }

    fn as_float(&self) -> Option<f64> {
        match self {
            Value::Int(n) => Some(*n as f64),
            Value::Float(f) => Some(*f),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int(n) => write!(f, "{}", n),
            Value::Float(x) if x.is_finite() && x.fract() == 0.0 => write!(f, "{:.1}", x),
            Value::Float(x) => write!(f, "{}", x),
            Value::Bool(true) => write!(f, "True"),
            Value::Bool(false) => write!(f, "False"),
            Value::Str(s) => write!(f, "{}", s),
        }
    }
}

/// Binary operators, lowest precedence first
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Or,
    And,
    Equal,
    NotEqual,
    Less,
    Greater,
    LessEqual,
    GreaterEqual,
    Add,
    Subtract,
    Multiply,
    Divide,
    Modulo,
}

impl BinaryOp {
    /// Map an operator token to its binary operator, if it is one
    pub fn from_token(token: &Token) -> Option<Self> {
        if !matches!(
            token.kind,
            TokenKind::ArithmeticOp | TokenKind::ComparisonOp | TokenKind::LogicalOp
        ) {
            return None;
        }

        let op = match token.text.as_str() {
            "||" => BinaryOp::Or,
            "&&" => BinaryOp::And,
            "==" => BinaryOp::Equal,
            "!=" => BinaryOp::NotEqual,
            "<" => BinaryOp::Less,
            ">" => BinaryOp::Greater,
            "<=" => BinaryOp::LessEqual,
            ">=" => BinaryOp::GreaterEqual,
            "+" => BinaryOp::Add,
            "-" => BinaryOp::Subtract,
            "*" => BinaryOp::Multiply,
            "/" => BinaryOp::Divide,
            "%" => BinaryOp::Modulo,
            _ => return None,
        };
        Some(op)
    }

    pub fn precedence(&self) -> u8 {
        match self {
            BinaryOp::Or => 1,
            BinaryOp::And => 2,
            BinaryOp::Equal | BinaryOp::NotEqual => 3,
            BinaryOp::Less | BinaryOp::Greater | BinaryOp::LessEqual | BinaryOp::GreaterEqual => 4,
            BinaryOp::Add | BinaryOp::Subtract => 5,
            BinaryOp::Multiply | BinaryOp::Divide | BinaryOp::Modulo => 6,
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            BinaryOp::Or => "||",
            BinaryOp::And => "&&",
            BinaryOp::Equal => "==",
            BinaryOp::NotEqual => "!=",
            BinaryOp::Less => "<",
            BinaryOp::Greater => ">",
            BinaryOp::LessEqual => "<=",
            BinaryOp::GreaterEqual => ">=",
            BinaryOp::Add => "+",
            BinaryOp::Subtract => "-",
            BinaryOp::Multiply => "*",
            BinaryOp::Divide => "/",
            BinaryOp::Modulo => "%",
        }
    }

    /// Apply the operator to two already evaluated operands
    pub fn apply(&self, left: Value, right: Value) -> DogResult<Value> {
        match self {
            BinaryOp::Or | BinaryOp::And => self.logical(left, right),
            BinaryOp::Equal => Ok(Value::Bool(values_equal(&left, &right))),
            BinaryOp::NotEqual => Ok(Value::Bool(!values_equal(&left, &right))),
            BinaryOp::Less | BinaryOp::Greater | BinaryOp::LessEqual | BinaryOp::GreaterEqual => {
                self.compare(left, right)
            }
            BinaryOp::Add => match (left, right) {
                (Value::Str(mut a), Value::Str(b)) => {
                    a.push_str(&b);
                    Ok(Value::Str(a))
                }
                (left, right) => self.arithmetic(left, right),
            },
            _ => self.arithmetic(left, right),
        }
    }

    fn mismatch(&self, left: &Value, right: &Value) -> DogError {
        RuntimeError::TypeMismatch {
            op: self.symbol().to_string(),
            left: left.type_name(),
            right: right.type_name(),
        }
        .into()
    }

    fn overflow(&self) -> DogError {
        RuntimeError::Overflow {
            op: self.symbol().to_string(),
        }
        .into()
    }

    fn logical(&self, left: Value, right: Value) -> DogResult<Value> {
        match (&left, &right) {
            (Value::Bool(a), Value::Bool(b)) => Ok(Value::Bool(match self {
                BinaryOp::And => *a && *b,
                _ => *a || *b,
            })),
            _ => Err(self.mismatch(&left, &right)),
        }
    }

    fn compare(&self, left: Value, right: Value) -> DogResult<Value> {
        let ordering = match (&left, &right) {
            (Value::Int(a), Value::Int(b)) => a.partial_cmp(b),
            (Value::Str(a), Value::Str(b)) => a.partial_cmp(b),
            _ => match (left.as_float(), right.as_float()) {
                (Some(a), Some(b)) => a.partial_cmp(&b),
                _ => return Err(self.mismatch(&left, &right)),
            },
        };

        // NaN compares false against everything
        let result = match ordering {
            None => false,
            Some(ordering) => match self {
                BinaryOp::Less => ordering.is_lt(),
                BinaryOp::Greater => ordering.is_gt(),
                BinaryOp::LessEqual => ordering.is_le(),
                _ => ordering.is_ge(),
            },
        };
        Ok(Value::Bool(result))
    }

    fn arithmetic(&self, left: Value, right: Value) -> DogResult<Value> {
        if let (Value::Int(a), Value::Int(b)) = (&left, &right) {
            return self.int_arithmetic(*a, *b);
        }

        match (left.as_float(), right.as_float()) {
            (Some(a), Some(b)) => self.float_arithmetic(a, b),
            _ => Err(self.mismatch(&left, &right)),
        }
    }

    fn int_arithmetic(&self, a: i64, b: i64) -> DogResult<Value> {
        let result = match self {
            BinaryOp::Add => a.checked_add(b),
            BinaryOp::Subtract => a.checked_sub(b),
            BinaryOp::Multiply => a.checked_mul(b),
            BinaryOp::Divide => {
                if b == 0 {
                    return Err(RuntimeError::DivisionByZero.into());
                }
                // Floor division: round toward negative infinity
                a.checked_div(b).map(|q| {
                    if a % b != 0 && (a < 0) != (b < 0) {
                        q - 1
                    } else {
                        q
                    }
                })
            }
            BinaryOp::Modulo => {
                if b == 0 {
                    return Err(RuntimeError::ModuloByZero.into());
                }
                // Remainder takes the sign of the divisor
                a.checked_rem(b).map(|r| {
                    if r != 0 && (r < 0) != (b < 0) {
                        r + b
                    } else {
                        r
                    }
                })
            }
            _ => None,
        };

        result.map(Value::Int).ok_or_else(|| self.overflow())
    }

    fn float_arithmetic(&self, a: f64, b: f64) -> DogResult<Value> {
        let result = match self {
            BinaryOp::Add => a + b,
            BinaryOp::Subtract => a - b,
            BinaryOp::Multiply => a * b,
            BinaryOp::Divide => {
                if b == 0.0 {
                    return Err(RuntimeError::DivisionByZero.into());
                }
                a / b
            }
            BinaryOp::Modulo => {
                if b == 0.0 {
                    return Err(RuntimeError::ModuloByZero.into());
                }
                let r = a % b;
                if r != 0.0 && (r < 0.0) != (b < 0.0) {
                    r + b
                } else {
                    r
                }
            }
            _ => return Err(self.mismatch(&Value::Float(a), &Value::Float(b))),
        };
        Ok(Value::Float(result))
    }
}

/// Equality across any pair of values; numbers compare across int/float
fn values_equal(left: &Value, right: &Value) -> bool {
    match (left, right) {
        (Value::Int(a), Value::Int(b)) => a == b,
        (Value::Bool(a), Value::Bool(b)) => a == b,
        (Value::Str(a), Value::Str(b)) => a == b,
        _ => match (left.as_float(), right.as_float()) {
            (Some(a), Some(b)) => a == b,
            _ => false,
        },
    }
}

/// Precedence-climbing evaluator over one token run
pub struct Evaluator<'a> {
    tokens: &'a [Token],
    position: usize,
    line: usize,
    bindings: &'a Environment,
}

impl<'a> Evaluator<'a> {
    pub fn new(run: &'a TokenRun, bindings: &'a Environment) -> Self {
        Evaluator {
            tokens: &run.tokens,
            position: 0,
            line: run.line,
            bindings,
        }
    }

    /// Evaluate the whole run. Every token must be consumed.
    pub fn evaluate(&mut self) -> DogResult<Value> {
        let value = self.parse_expression(0)?;

        if let Some(token) = self.current() {
            return Err(DogError::syntax(
                format!(
                    "Unexpected token '{}' after expression. Missing operator between operands?",
                    token.text
                ),
                token.line,
            ));
        }

        Ok(value)
    }

    fn current(&self) -> Option<&'a Token> {
        self.tokens.get(self.position)
    }

    fn advance(&mut self) {
        self.position += 1;
    }

    /// Line of the current token, or of the last one when the run is exhausted
    fn current_line(&self) -> usize {
        self.current()
            .or_else(|| self.tokens.last())
            .map_or(self.line, |t| t.line)
    }

    fn parse_expression(&mut self, min_precedence: u8) -> DogResult<Value> {
        let mut left = self.parse_primary()?;

        while let Some(token) = self.current() {
            let op = match BinaryOp::from_token(token) {
                Some(op) => op,
                None => break,
            };
            if op.precedence() < min_precedence {
                break;
            }

            self.advance();
            let right = self.parse_expression(op.precedence() + 1)?;
            left = op.apply(left, right)?;
        }

        Ok(left)
    }

    fn parse_primary(&mut self) -> DogResult<Value> {
        let token = match self.current() {
            Some(token) => token,
            None => {
                return Err(DogError::syntax(
                    "Unexpected end of expression",
                    self.current_line(),
                ))
            }
        };

        match token.kind {
            TokenKind::Parenthesis if token.text == "(" => {
                self.advance();
                let value = self.parse_expression(0)?;
                match self.current() {
                    Some(close) if close.is(TokenKind::Parenthesis, ")") => {
                        self.advance();
                        Ok(value)
                    }
                    _ => Err(DogError::syntax(
                        "Missing closing parenthesis",
                        self.current_line(),
                    )),
                }
            }
            TokenKind::ArithmeticOp if token.text == "-" => {
                self.advance();
                match self.parse_primary()? {
                    Value::Int(n) => n.checked_neg().map(Value::Int).ok_or_else(|| {
                        RuntimeError::Overflow {
                            op: "-".to_string(),
                        }
                        .into()
                    }),
                    Value::Float(x) => Ok(Value::Float(-x)),
                    other => Err(RuntimeError::InvalidOperand {
                        op: "-".to_string(),
                        operand: other.type_name(),
                    }
                    .into()),
                }
            }
            TokenKind::LogicalOp if token.text == "!" => {
                self.advance();
                match self.parse_primary()? {
                    Value::Bool(b) => Ok(Value::Bool(!b)),
                    other => Err(RuntimeError::InvalidOperand {
                        op: "!".to_string(),
                        operand: other.type_name(),
                    }
                    .into()),
                }
            }
            TokenKind::IntLiteral => {
                self.advance();
                token.text.parse::<i64>().map(Value::Int).map_err(|_| {
                    RuntimeError::Overflow {
                        op: token.text.clone(),
                    }
                    .into()
                })
            }
            TokenKind::StringLiteral => {
                self.advance();
                Ok(Value::Str(token.text.clone()))
            }
            TokenKind::Identifier => {
                self.advance();
                self.bindings.get(&token.text).cloned().ok_or_else(|| {
                    SemanticError::NotDeclared {
                        name: token.text.clone(),
                        line: token.line,
                    }
                    .into()
                })
            }
            _ => Err(DogError::syntax(
                format!("Unexpected token in expression: {}", token),
                token.line,
            )),
        }
    }
}

/// Convenience function to evaluate one token run against a binding store
pub fn evaluate(run: &TokenRun, bindings: &Environment) -> DogResult<Value> {
    Evaluator::new(run, bindings).evaluate()
}
