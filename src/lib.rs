//! # DogLang
//!
//! Command-line front end for DogLang, a tiny dog-themed scripting language.
//! The language itself lives in `doglang-core`; this crate adds file running,
//! debugging dumps and the interactive shell.
//!
//! ## Modules
//!
//! - `cli`: Command-line arguments.
//! - `commands`: Shell commands (`help`, `vars`, `load`, ...).
//! - `repl`: The Read-Eval-Print Loop.

pub mod cli;
pub mod commands;
pub mod repl;

use anyhow::{anyhow, Result};
use std::io::{self, BufRead, Write};
use std::path::Path;

// Re-export commonly used types and functions for convenience
pub use doglang_core::parser::{parse_program, run, tokenize, DogError, Environment, Value};

fn read_source(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).map_err(|e| anyhow!("Failed to read '{}': {}", path.display(), e))
}

/// Run a source file with the given input and output handles
pub fn run_file_with<R: BufRead, W: Write>(path: &Path, input: R, output: W) -> Result<Environment> {
    let source = read_source(path)?;
    tracing::debug!(path = %path.display(), bytes = source.len(), "running file");
    Ok(run(&source, input, output)?)
}

/// Run a source file against the process's stdin and stdout
pub fn run_file(path: &Path) -> Result<()> {
    run_file_with(path, io::stdin().lock(), io::stdout())?;
    Ok(())
}

/// Token stream of a source file as pretty-printed JSON
pub fn dump_tokens(path: &Path) -> Result<String> {
    let tokens = tokenize(&read_source(path)?)?;
    Ok(serde_json::to_string_pretty(&tokens)?)
}

/// Indented syntax tree of a source file
pub fn dump_ast(path: &Path) -> Result<String> {
    let program = parse_program(&read_source(path)?)?;
    Ok(program.to_string())
}
