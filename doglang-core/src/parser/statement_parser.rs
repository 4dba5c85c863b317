//! Statement parser
//!
//! Recursive descent over the token list with a single forward cursor. Parses
//! statements like:
//! - `a = 5 + 3;`
//! - `bark(a);`
//! - `wagtail(a < 3) { ... }`
//! - `sniff(a > 5) { ... } else { ... }`
//! - `name = fetch "Who? ";`
//!
//! Expressions are not structured here: they are collected as raw token runs
//! and evaluated later with precedence climbing.

use crate::parser::ast::{Block, ElseBlock, Expression, Program, Statement};
use crate::parser::error::{DogError, DogResult};
use crate::parser::lexer::{Lexer, Token, TokenKind};

/// Parses a token list into a [`Program`]
pub struct StatementParser {
    tokens: Vec<Token>,
    position: usize,
}

impl StatementParser {
    /// Create a new statement parser by tokenizing the input string
    pub fn new(input: &str) -> DogResult<Self> {
        let tokens = Lexer::new(input).tokenize()?;
        Ok(Self::from_tokens(tokens))
    }

    /// Create a parser over an existing token list
    pub fn from_tokens(tokens: Vec<Token>) -> Self {
        StatementParser {
            tokens,
            position: 0,
        }
    }

    /// Current token, if any remain
    fn current(&self) -> Option<&Token> {
        self.tokens.get(self.position)
    }

    /// Token after the current one
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.position + 1)
    }

    fn advance(&mut self) {
        if self.position < self.tokens.len() {
            self.position += 1;
        }
    }

    /// Line of the current token, falling back to the last token's line
    fn current_line(&self) -> usize {
        self.current()
            .or_else(|| self.tokens.last())
            .map(|t| t.line)
            .unwrap_or(1)
    }

    fn describe(kind: TokenKind, value: Option<&str>) -> String {
        match value {
            Some(value) => format!("{} '{}'", kind, value),
            None => kind.to_string(),
        }
    }

    /// Consume the current token if its kind (and value, when given) match
    fn expect(&mut self, kind: TokenKind, value: Option<&str>) -> DogResult<Token> {
        let token = match self.current() {
            Some(token) => token.clone(),
            None => {
                return Err(DogError::syntax(
                    format!(
                        "Unexpected end of input. Expected {}",
                        Self::describe(kind, value)
                    ),
                    self.current_line(),
                ))
            }
        };

        let value_matches = value.map_or(true, |v| token.text == v);
        if token.kind != kind || !value_matches {
            return Err(DogError::syntax(
                format!("Expected {} but got {}", Self::describe(kind, value), token),
                token.line,
            ));
        }

        self.advance();
        Ok(token)
    }

    /// Check the current token without consuming it
    fn check(&self, kind: TokenKind, value: &str) -> bool {
        self.current().is_some_and(|t| t.is(kind, value))
    }

    /// Parse a complete program (sequence of statements)
    pub fn parse_program(&mut self) -> DogResult<Program> {
        let mut program = Program::new();

        while self.current().is_some() {
            let statement = self.parse_statement()?;
            program.push(statement);
        }

        tracing::debug!(statements = program.len(), "parsed program");
        Ok(program)
    }

    /// Parse a single statement
    pub fn parse_statement(&mut self) -> DogResult<Statement> {
        let token = match self.current() {
            Some(token) => token.clone(),
            None => {
                return Err(DogError::syntax(
                    "Unexpected end of input. Expected a statement",
                    self.current_line(),
                ))
            }
        };

        match token.kind {
            TokenKind::Keyword => match token.text.as_str() {
                "bark" => self.parse_print_statement(),
                "wagtail" => self.parse_loop_statement(),
                "sniff" => self.parse_conditional_statement(),
                "heel" | "stay" => self.parse_loop_control(),
                _ => Err(DogError::syntax(
                    format!("Unexpected token '{}'", token.text),
                    token.line,
                )),
            },
            TokenKind::Identifier => {
                let assigns = self
                    .peek()
                    .is_some_and(|next| next.kind == TokenKind::AssignmentOp);
                if assigns {
                    self.parse_assignment()
                } else {
                    // Keyword-shaped word that isn't a keyword: most likely a typo
                    Err(DogError::syntax(
                        format!("Unknown keyword '{}'", token.text),
                        token.line,
                    ))
                }
            }
            _ => Err(DogError::syntax(
                format!("Unexpected token '{}'", token.text),
                token.line,
            )),
        }
    }

    /// Parse: <name> = <expression>
    fn parse_assignment(&mut self) -> DogResult<Statement> {
        let name = self.expect(TokenKind::Identifier, None)?;
        self.expect(TokenKind::AssignmentOp, Some("="))?;
        let value = self.parse_expression()?;

        Ok(Statement::Assignment {
            name: name.text,
            value,
            line: name.line,
        })
    }

    /// Parse: bark <expression>
    fn parse_print_statement(&mut self) -> DogResult<Statement> {
        let keyword = self.expect(TokenKind::Keyword, Some("bark"))?;
        let value = self.parse_expression()?;

        Ok(Statement::Print {
            value,
            line: keyword.line,
        })
    }

    /// Parse: wagtail <condition> { statements }
    fn parse_loop_statement(&mut self) -> DogResult<Statement> {
        let keyword = self.expect(TokenKind::Keyword, Some("wagtail"))?;
        let condition = self.parse_expression()?;
        let body = self.parse_block()?;

        Ok(Statement::Loop {
            condition,
            body,
            line: keyword.line,
        })
    }

    /// Parse: sniff <condition> { statements } [else { statements }]
    fn parse_conditional_statement(&mut self) -> DogResult<Statement> {
        let keyword = self.expect(TokenKind::Keyword, Some("sniff"))?;
        let condition = self.parse_expression()?;
        let then_block = self.parse_block()?;

        let else_block = if self.check(TokenKind::Keyword, "else") {
            self.advance();
            Some(ElseBlock {
                block: self.parse_block()?,
            })
        } else {
            None
        };

        Ok(Statement::Conditional {
            condition,
            then_block,
            else_block,
            line: keyword.line,
        })
    }

    /// Parse: heel; | stay;
    fn parse_loop_control(&mut self) -> DogResult<Statement> {
        let keyword = self.expect(TokenKind::Keyword, None)?;

        // The semicolon may only be left out right before a closing brace or at the end
        let at_block_end = match self.current() {
            None => true,
            Some(token) => token.is(TokenKind::CurlyBrace, "}"),
        };
        if !at_block_end {
            self.expect(TokenKind::Semicolon, Some(";"))?;
        }

        let line = keyword.line;
        Ok(match keyword.text.as_str() {
            "heel" => Statement::Heel { line },
            _ => Statement::Stay { line },
        })
    }

    /// Parse a block: { statement* }
    fn parse_block(&mut self) -> DogResult<Block> {
        self.expect(TokenKind::CurlyBrace, Some("{"))?;

        let mut statements = Vec::new();
        loop {
            match self.current() {
                None => {
                    return Err(DogError::syntax(
                        "Unexpected end of input. Expected CurlyBrace '}'",
                        self.current_line(),
                    ))
                }
                Some(token) if token.is(TokenKind::CurlyBrace, "}") => break,
                Some(_) => statements.push(self.parse_statement()?),
            }
        }

        self.expect(TokenKind::CurlyBrace, Some("}"))?;
        Ok(Block::new(statements))
    }

    /// Parse an expression: `fetch <expression>` or a raw token run.
    ///
    /// A run ends at a semicolon (consumed) or at a curly brace (left for the
    /// enclosing block reader).
    fn parse_expression(&mut self) -> DogResult<Expression> {
        let line = self.current_line();

        if self.check(TokenKind::Keyword, "fetch") {
            self.advance();
            let prompt = self.parse_expression()?;
            return Ok(Expression::fetch(prompt, line));
        }

        let mut tokens = Vec::new();
        while let Some(token) = self.current() {
            match token.kind {
                TokenKind::Semicolon => {
                    self.advance();
                    break;
                }
                TokenKind::CurlyBrace => break,
                _ => {
                    tokens.push(token.clone());
                    self.advance();
                }
            }
        }

        Ok(Expression::run(tokens, line))
    }
}

/// Convenience function to parse a string into a program
pub fn parse_program(input: &str) -> DogResult<Program> {
    StatementParser::new(input)?.parse_program()
}
