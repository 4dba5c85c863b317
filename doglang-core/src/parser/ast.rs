//! Abstract syntax tree for DogLang programs
//!
//! Statements are fully structured; expressions are kept as flat token runs and
//! handed to the evaluator, which applies operator precedence itself.

use crate::parser::lexer::{Token, TokenKind};
use std::fmt;

/// A complete program: the root of the tree
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Program {
    pub statements: Vec<Statement>,
}

/// Statements that can appear at top level or inside a block
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Statement {
    /// name = expression
    Assignment {
        name: String,
        value: Expression,
        line: usize,
    },

    /// bark expression
    Print { value: Expression, line: usize },

    /// wagtail condition { ... }
    Loop {
        condition: Expression,
        body: Block,
        line: usize,
    },

    /// sniff condition { ... } [else { ... }]
    Conditional {
        condition: Expression,
        then_block: Block,
        else_block: Option<ElseBlock>,
        line: usize,
    },

    /// heel: leave the innermost loop
    Heel { line: usize },

    /// stay: skip to the next iteration of the innermost loop
    Stay { line: usize },
}

/// Statements between a pair of curly braces
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Block {
    pub statements: Vec<Statement>,
}

/// The optional `else { ... }` branch of a conditional
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ElseBlock {
    pub block: Block,
}

/// Right-hand side of an assignment, body of a print, or a condition
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Expression {
    /// fetch prompt: print the prompt and read one line of input
    Fetch { prompt: Box<Expression>, line: usize },

    /// Raw operator/operand tokens, precedence not yet applied
    Run(TokenRun),
}

/// A contiguous run of leaf tokens forming one expression
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TokenRun {
    pub tokens: Vec<Token>,
    /// Line where the expression starts (used when the run is empty)
    pub line: usize,
}

impl Program {
    pub fn new() -> Self {
        Program {
            statements: Vec::new(),
        }
    }

    pub fn push(&mut self, statement: Statement) {
        self.statements.push(statement);
    }

    pub fn len(&self) -> usize {
        self.statements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.statements.is_empty()
    }
}

impl Block {
    pub fn new(statements: Vec<Statement>) -> Self {
        Block { statements }
    }
}

impl Statement {
    /// Line of the token that started the statement
    pub fn line(&self) -> usize {
        match self {
            Statement::Assignment { line, .. }
            | Statement::Print { line, .. }
            | Statement::Loop { line, .. }
            | Statement::Conditional { line, .. }
            | Statement::Heel { line }
            | Statement::Stay { line } => *line,
        }
    }
}

impl Expression {
    /// Helper constructor for fetch expressions
    pub fn fetch(prompt: Expression, line: usize) -> Self {
        Expression::Fetch {
            prompt: Box::new(prompt),
            line,
        }
    }

    /// Helper constructor for token runs
    pub fn run(tokens: Vec<Token>, line: usize) -> Self {
        Expression::Run(TokenRun { tokens, line })
    }

    pub fn line(&self) -> usize {
        match self {
            Expression::Fetch { line, .. } => *line,
            Expression::Run(run) => run.line,
        }
    }
}

impl TokenRun {
    /// The run as it appeared in source, tokens separated by single spaces
    pub fn source_text(&self) -> String {
        self.tokens
            .iter()
            .map(|t| match t.kind {
                TokenKind::StringLiteral => format!("\"{}\"", t.text),
                _ => t.text.clone(),
            })
            .collect::<Vec<_>>()
            .join(" ")
    }
}

// Tree dump, one node per line, children indented by four spaces

fn write_indent(f: &mut fmt::Formatter<'_>, depth: usize) -> fmt::Result {
    write!(f, "{:width$}", "", width = depth * 4)
}

fn write_statements(
    f: &mut fmt::Formatter<'_>,
    statements: &[Statement],
    depth: usize,
) -> fmt::Result {
    for statement in statements {
        write_statement(f, statement, depth)?;
    }
    Ok(())
}

fn write_expression(f: &mut fmt::Formatter<'_>, expr: &Expression, depth: usize) -> fmt::Result {
    write_indent(f, depth)?;
    match expr {
        Expression::Run(run) => writeln!(f, "Expression [{}]", run.source_text()),
        Expression::Fetch { prompt, .. } => {
            writeln!(f, "Fetch")?;
            write_expression(f, prompt, depth + 1)
        }
    }
}

fn write_statement(f: &mut fmt::Formatter<'_>, statement: &Statement, depth: usize) -> fmt::Result {
    write_indent(f, depth)?;
    match statement {
        Statement::Assignment { name, value, .. } => {
            writeln!(f, "Assignment {}", name)?;
            write_expression(f, value, depth + 1)
        }
        Statement::Print { value, .. } => {
            writeln!(f, "Print")?;
            write_expression(f, value, depth + 1)
        }
        Statement::Loop {
            condition, body, ..
        } => {
            writeln!(f, "Loop")?;
            write_expression(f, condition, depth + 1)?;
            write_indent(f, depth + 1)?;
            writeln!(f, "Block")?;
            write_statements(f, &body.statements, depth + 2)
        }
        Statement::Conditional {
            condition,
            then_block,
            else_block,
            ..
        } => {
            writeln!(f, "Conditional")?;
            write_expression(f, condition, depth + 1)?;
            write_indent(f, depth + 1)?;
            writeln!(f, "Block")?;
            write_statements(f, &then_block.statements, depth + 2)?;
            if let Some(else_block) = else_block {
                write_indent(f, depth + 1)?;
                writeln!(f, "ElseBlock")?;
                write_statements(f, &else_block.block.statements, depth + 2)?;
            }
            Ok(())
        }
        Statement::Heel { .. } => writeln!(f, "Heel"),
        Statement::Stay { .. } => writeln!(f, "Stay"),
    }
}

impl fmt::Display for Program {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Program")?;
        write_statements(f, &self.statements, 1)
    }
}

impl fmt::Display for Statement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_statement(f, self, 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn int(text: &str) -> Token {
        Token::new(TokenKind::IntLiteral, text, 1)
    }

    #[test]
    fn test_program_display() {
        let mut program = Program::new();
        program.push(Statement::Assignment {
            name: "a".to_string(),
            value: Expression::run(
                vec![int("5"), Token::new(TokenKind::ArithmeticOp, "+", 1), int("3")],
                1,
            ),
            line: 1,
        });
        program.push(Statement::Loop {
            condition: Expression::run(vec![Token::new(TokenKind::Identifier, "a", 2)], 2),
            body: Block::new(vec![Statement::Heel { line: 3 }]),
            line: 2,
        });

        let dump = program.to_string();
        assert_eq!(
            dump,
            "Program\n    Assignment a\n        Expression [5 + 3]\n    Loop\n        Expression [a]\n        Block\n            Heel\n"
        );
    }

    #[test]
    fn test_conditional_display_includes_else() {
        let statement = Statement::Conditional {
            condition: Expression::run(vec![Token::new(TokenKind::Identifier, "ok", 1)], 1),
            then_block: Block::default(),
            else_block: Some(ElseBlock {
                block: Block::new(vec![Statement::Print {
                    value: Expression::run(
                        vec![Token::new(TokenKind::StringLiteral, "no", 1)],
                        1,
                    ),
                    line: 1,
                }]),
            }),
            line: 1,
        };

        let dump = statement.to_string();
        assert!(dump.contains("ElseBlock"));
        assert!(dump.contains("Expression [\"no\"]"));
    }

    #[test]
    fn test_fetch_display() {
        let expr = Expression::fetch(
            Expression::run(vec![Token::new(TokenKind::StringLiteral, "name? ", 4)], 4),
            4,
        );
        let statement = Statement::Assignment {
            name: "who".to_string(),
            value: expr,
            line: 4,
        };

        assert_eq!(statement.line(), 4);
        assert!(statement.to_string().contains("Fetch"));
    }
}
