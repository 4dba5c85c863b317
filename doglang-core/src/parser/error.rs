//! Error taxonomy for the DogLang pipeline
//!
//! Every stage reports failures through [`DogError`]. Nothing is retried or
//! recovered internally: the first error aborts the current execution.

use thiserror::Error;

/// Result alias used throughout the core
pub type DogResult<T> = Result<T, DogError>;

/// Any failure raised while lexing, parsing or running a program
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DogError {
    /// Unrecognized character sequence in the source
    #[error("Unrecognized input '{text}' at line {line}")]
    Lex { text: String, line: usize },

    /// Token stream does not match the grammar
    #[error("{message} at line {line}")]
    Syntax { message: String, line: usize },

    /// Program is well-formed but meaningless (undeclared names, bad conditions)
    #[error(transparent)]
    Semantic(#[from] SemanticError),

    /// Failure while executing an otherwise valid program
    #[error(transparent)]
    Runtime(#[from] RuntimeError),
}

/// Semantic failures
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SemanticError {
    #[error("Variable '{name}' not declared (line {line})")]
    NotDeclared { name: String, line: usize },

    #[error("Value inside {construct} is not boolean: got {found} (line {line})")]
    NonBooleanCondition {
        construct: &'static str,
        found: &'static str,
        line: usize,
    },

    #[error("{keyword} statement must be inside a loop (line {line})")]
    LoopControlOutsideLoop { keyword: &'static str, line: usize },
}

/// Runtime failures
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RuntimeError {
    #[error("Division by zero")]
    DivisionByZero,

    #[error("Modulo by zero")]
    ModuloByZero,

    #[error("Integer overflow in '{op}'")]
    Overflow { op: String },

    #[error("Unsupported operand types for '{op}': {left} and {right}")]
    TypeMismatch {
        op: String,
        left: &'static str,
        right: &'static str,
    },

    #[error("Bad operand type for unary '{op}': {operand}")]
    InvalidOperand { op: String, operand: &'static str },

    #[error("Input error: {0}")]
    Input(String),

    #[error("Output error: {0}")]
    Output(String),
}

impl DogError {
    /// Build a syntax error
    pub fn syntax(message: impl Into<String>, line: usize) -> Self {
        DogError::Syntax {
            message: message.into(),
            line,
        }
    }

    /// Short category name, used when reporting to the user
    pub fn kind(&self) -> &'static str {
        match self {
            DogError::Lex { .. } => "lex",
            DogError::Syntax { .. } => "syntax",
            DogError::Semantic(_) => "semantic",
            DogError::Runtime(_) => "runtime",
        }
    }

    /// Source line the error points at, when known
    pub fn line(&self) -> Option<usize> {
        match self {
            DogError::Lex { line, .. } | DogError::Syntax { line, .. } => Some(*line),
            DogError::Semantic(SemanticError::NotDeclared { line, .. })
            | DogError::Semantic(SemanticError::NonBooleanCondition { line, .. })
            | DogError::Semantic(SemanticError::LoopControlOutsideLoop { line, .. }) => {
                Some(*line)
            }
            DogError::Runtime(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_names() {
        assert_eq!(DogError::syntax("x", 1).kind(), "syntax");
        assert_eq!(
            DogError::Lex {
                text: "@".to_string(),
                line: 2
            }
            .kind(),
            "lex"
        );
        assert_eq!(DogError::from(RuntimeError::DivisionByZero).kind(), "runtime");
    }

    #[test]
    fn test_line_lookup() {
        let err: DogError = SemanticError::NotDeclared {
            name: "a".to_string(),
            line: 7,
        }
        .into();
        assert_eq!(err.line(), Some(7));
        assert_eq!(DogError::from(RuntimeError::ModuloByZero).line(), None);
    }

    #[test]
    fn test_messages() {
        let err: DogError = SemanticError::NotDeclared {
            name: "counter".to_string(),
            line: 1,
        }
        .into();
        assert!(err.to_string().contains("not declared"));
        assert_eq!(
            DogError::from(RuntimeError::DivisionByZero).to_string(),
            "Division by zero"
        );
        assert_eq!(
            DogError::syntax("Unknown keyword 'barkk'", 3).to_string(),
            "Unknown keyword 'barkk' at line 3"
        );
    }
}
