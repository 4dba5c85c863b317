// doglang-core/src/parser/mod.rs

pub mod ast;
pub mod environment;
pub mod error;
pub mod evaluator;
pub mod interpreter;
pub mod lexer;
pub mod statement_parser;


pub use ast::{Block, ElseBlock, Expression, Program, Statement, TokenRun};
pub use environment::{Entry, Environment, InferredType};
pub use error::{DogError, DogResult, RuntimeError, SemanticError};
pub use evaluator::{evaluate, BinaryOp, Evaluator, Value};
pub use interpreter::{ControlFlow, Interpreter};
pub use lexer::{tokenize, Lexer, Token, TokenKind, KEYWORDS};
pub use statement_parser::{parse_program, StatementParser};

use std::io::{BufRead, Write};

/// Lex, parse and execute source text with a fresh interpreter.
///
/// Returns the final bindings. Output already written stays written when an
/// error aborts the run.
pub fn run<R: BufRead, W: Write>(source: &str, input: R, output: W) -> DogResult<Environment> {
    let program = parse_program(source)?;
    let mut interpreter = Interpreter::new(input, output);
    interpreter.run_program(&program)?;
    Ok(interpreter.into_environment())
}
