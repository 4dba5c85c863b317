use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// doglang runs DogLang programs and hosts an interactive shell
#[derive(Debug, Parser)]
#[command(name = "doglang", author, version)]
pub struct DoglangArgs {
    /// The subcommand to run (defaults to the interactive shell)
    #[command(subcommand)]
    pub subcommand: Option<DoglangSubcommand>,

    /// Enable debug logging (overrides DOGLANG_LOG)
    #[arg(short = 'v', long, global = true)]
    pub verbose: bool,
}

/// Available subcommands
#[derive(Debug, Subcommand)]
pub enum DoglangSubcommand {
    /// Execute a source file
    #[command(name = "run")]
    Run {
        /// Path to the program
        file: PathBuf,
    },

    /// Print the token stream of a source file as JSON
    #[command(name = "tokens")]
    Tokens {
        /// Path to the program
        file: PathBuf,
    },

    /// Print the syntax tree of a source file
    #[command(name = "ast")]
    Ast {
        /// Path to the program
        file: PathBuf,
    },

    /// Start the interactive shell
    #[command(name = "repl")]
    Repl,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_subcommand_means_shell() {
        let args = DoglangArgs::try_parse_from(["doglang"]).unwrap();
        assert!(args.subcommand.is_none());
        assert!(!args.verbose);
    }

    #[test]
    fn test_run_with_verbose() {
        let args = DoglangArgs::try_parse_from(["doglang", "run", "hello.dog", "-v"]).unwrap();
        assert!(args.verbose);
        match args.subcommand {
            Some(DoglangSubcommand::Run { file }) => assert_eq!(file, PathBuf::from("hello.dog")),
            other => panic!("Expected run, got {:?}", other),
        }
    }

    #[test]
    fn test_file_is_required() {
        assert!(DoglangArgs::try_parse_from(["doglang", "tokens"]).is_err());
    }
}
