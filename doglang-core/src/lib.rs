//! # DogLang Core
//!
//! Language core for DogLang, a tiny dog-themed scripting language.
//! Provides lexing, parsing and execution without any terminal dependencies.
//!
//! ## Features
//!
//! - **serde**: Derive `Serialize`/`Deserialize` for tokens, the syntax tree and values
//!
//! ## Example
//!
//! ```
//! use doglang_core::parser::run;
//! use std::io::Cursor;
//!
//! let mut output = Vec::new();
//! let env = run("a = 5 + 3 * 2; bark(a);", Cursor::new(""), &mut output).unwrap();
//! assert_eq!(String::from_utf8(output).unwrap(), "11\n");
//! assert!(env.is_defined("a"));
//! ```

pub mod parser;

// Re-export commonly used types
pub use parser::{
    parse_program, run, tokenize, DogError, DogResult, Environment, Interpreter, Program, Token,
    Value,
};
