//! Lexical scanner
//!
//! Turns source text into a flat list of [`Token`]s. The source is scanned one
//! line at a time so that every token remembers the 1-based line it came from.

use crate::parser::error::{DogError, DogResult};
use std::fmt;

/// Reserved words. Keyword status is purely lexical.
pub const KEYWORDS: [&str; 7] = ["bark", "wagtail", "fetch", "sniff", "else", "heel", "stay"];

/// Category of a token
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TokenKind {
    Keyword,
    Identifier,
    AssignmentOp,
    IntLiteral,
    StringLiteral,
    ArithmeticOp,
    ComparisonOp,
    LogicalOp,
    Parenthesis,
    CurlyBrace,
    Semicolon,
    Separator,
}

impl TokenKind {
    pub fn name(&self) -> &'static str {
        match self {
            TokenKind::Keyword => "Keyword",
            TokenKind::Identifier => "Identifier",
            TokenKind::AssignmentOp => "AssignmentOp",
            TokenKind::IntLiteral => "IntLiteral",
            TokenKind::StringLiteral => "StringLiteral",
            TokenKind::ArithmeticOp => "ArithmeticOp",
            TokenKind::ComparisonOp => "ComparisonOp",
            TokenKind::LogicalOp => "LogicalOp",
            TokenKind::Parenthesis => "Parenthesis",
            TokenKind::CurlyBrace => "CurlyBrace",
            TokenKind::Semicolon => "Semicolon",
            TokenKind::Separator => "Separator",
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// A single lexeme with its category and source line
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Token {
    pub kind: TokenKind,
    /// Source text. String literals hold their contents exactly as written, without quotes.
    pub text: String,
    pub line: usize,
}

impl Token {
    pub fn new(kind: TokenKind, text: impl Into<String>, line: usize) -> Self {
        Token {
            kind,
            text: text.into(),
            line,
        }
    }

    /// True when both kind and text match
    pub fn is(&self, kind: TokenKind, text: &str) -> bool {
        self.kind == kind && self.text == text
    }

    pub fn is_keyword(&self, word: &str) -> bool {
        self.is(TokenKind::Keyword, word)
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            TokenKind::StringLiteral => write!(f, "{} \"{}\"", self.kind, self.text),
            _ => write!(f, "{} '{}'", self.kind, self.text),
        }
    }
}

/// Tokenizes source text, one line at a time
pub struct Lexer<'a> {
    source: &'a str,
    input: Vec<char>,
    position: usize,
    current_char: Option<char>,
    line: usize,
}

impl<'a> Lexer<'a> {
    /// Create a new lexer for the given source
    pub fn new(source: &'a str) -> Self {
        Lexer {
            source,
            input: Vec::new(),
            position: 0,
            current_char: None,
            line: 0,
        }
    }

    /// Tokenize the entire source
    pub fn tokenize(&mut self) -> DogResult<Vec<Token>> {
        let mut tokens = Vec::new();

        for (index, line) in self.source.lines().enumerate() {
            self.start_line(line, index + 1);
            while let Some(token) = self.next_token()? {
                tokens.push(token);
            }
        }

        tracing::debug!(count = tokens.len(), "tokenized source");
        Ok(tokens)
    }

    fn start_line(&mut self, line: &str, number: usize) {
        self.input = line.chars().collect();
        self.position = 0;
        self.current_char = self.input.first().copied();
        self.line = number;
    }

    /// Advance to the next character
    fn advance(&mut self) {
        self.position += 1;
        self.current_char = self.input.get(self.position).copied();
    }

    /// Peek at the next character without advancing
    fn peek(&self) -> Option<char> {
        self.input.get(self.position + 1).copied()
    }

    fn skip_whitespace(&mut self) {
        while let Some(ch) = self.current_char {
            if ch.is_whitespace() {
                self.advance();
            } else {
                break;
            }
        }
    }

    fn token(&self, kind: TokenKind, text: impl Into<String>) -> Token {
        Token::new(kind, text, self.line)
    }

    /// Read a double-quoted string literal.
    ///
    /// Contents are kept exactly as written; a backslash only stops the next
    /// character from closing the literal.
    fn read_string(&mut self) -> DogResult<Token> {
        let start = self.position;
        self.advance(); // opening quote

        let mut contents = String::new();
        loop {
            match self.current_char {
                None => {
                    let text: String = self.input[start..].iter().collect();
                    return Err(DogError::Lex {
                        text,
                        line: self.line,
                    });
                }
                Some('"') => {
                    self.advance();
                    return Ok(self.token(TokenKind::StringLiteral, contents));
                }
                Some('\\') => {
                    let escaped = match self.peek() {
                        Some(ch) => ch,
                        None => {
                            let text: String = self.input[start..].iter().collect();
                            return Err(DogError::Lex {
                                text,
                                line: self.line,
                            });
                        }
                    };
                    contents.push('\\');
                    contents.push(escaped);
                    self.advance();
                    self.advance();
                }
                Some(ch) => {
                    contents.push(ch);
                    self.advance();
                }
            }
        }
    }

    /// Read a keyword or identifier
    fn read_word(&mut self) -> Token {
        let mut word = String::new();
        while let Some(ch) = self.current_char {
            if ch.is_ascii_alphanumeric() || ch == '_' {
                word.push(ch);
                self.advance();
            } else {
                break;
            }
        }

        if KEYWORDS.contains(&word.as_str()) {
            self.token(TokenKind::Keyword, word)
        } else {
            self.token(TokenKind::Identifier, word)
        }
    }

    fn read_integer(&mut self) -> Token {
        let mut digits = String::new();
        while let Some(ch) = self.current_char {
            if ch.is_ascii_digit() {
                digits.push(ch);
                self.advance();
            } else {
                break;
            }
        }
        self.token(TokenKind::IntLiteral, digits)
    }

    /// Two-character operators, tried before single characters
    fn read_double_operator(&mut self) -> Option<Token> {
        let pair: String = [self.current_char?, self.peek()?].iter().collect();
        let kind = match pair.as_str() {
            "==" | "!=" | ">=" | "<=" => TokenKind::ComparisonOp,
            "&&" | "||" => TokenKind::LogicalOp,
            _ => return None,
        };
        self.advance();
        self.advance();
        Some(self.token(kind, pair))
    }

    fn single_char_kind(ch: char) -> Option<TokenKind> {
        match ch {
            '+' | '-' | '*' | '/' | '%' => Some(TokenKind::ArithmeticOp),
            '<' | '>' => Some(TokenKind::ComparisonOp),
            '!' => Some(TokenKind::LogicalOp),
            '=' => Some(TokenKind::AssignmentOp),
            '(' | ')' => Some(TokenKind::Parenthesis),
            '{' | '}' => Some(TokenKind::CurlyBrace),
            ';' => Some(TokenKind::Semicolon),
            ',' | '.' => Some(TokenKind::Separator),
            _ => None,
        }
    }

    /// Get the next token on the current line, or `None` at end of line
    pub fn next_token(&mut self) -> DogResult<Option<Token>> {
        self.skip_whitespace();

        let ch = match self.current_char {
            None => return Ok(None),
            Some(ch) => ch,
        };

        if ch == '"' {
            return self.read_string().map(Some);
        }

        if ch.is_ascii_alphabetic() || ch == '_' {
            return Ok(Some(self.read_word()));
        }

        if ch.is_ascii_digit() {
            return Ok(Some(self.read_integer()));
        }

        if let Some(token) = self.read_double_operator() {
            return Ok(Some(token));
        }

        match Self::single_char_kind(ch) {
            Some(kind) => {
                self.advance();
                Ok(Some(self.token(kind, ch.to_string())))
            }
            None => Err(DogError::Lex {
                text: ch.to_string(),
                line: self.line,
            }),
        }
    }
}

/// Convenience function to tokenize a source string
pub fn tokenize(source: &str) -> DogResult<Vec<Token>> {
    Lexer::new(source).tokenize()
}
