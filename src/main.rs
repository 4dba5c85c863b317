use clap::Parser;
use colored::*;
use doglang::{
    cli::{DoglangArgs, DoglangSubcommand},
    commands::describe_error,
    dump_ast, dump_tokens, repl, run_file, DogError,
};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    // Parse command line arguments
    let args = DoglangArgs::parse();

    // Initialize logging; stdout stays reserved for program output
    init_logging(args.verbose);

    match dispatch(args.subcommand) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            report(&err);
            ExitCode::FAILURE
        }
    }
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_env("DOGLANG_LOG").unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn dispatch(subcommand: Option<DoglangSubcommand>) -> anyhow::Result<()> {
    match subcommand {
        Some(DoglangSubcommand::Run { file }) => run_file(&file),
        Some(DoglangSubcommand::Tokens { file }) => {
            println!("{}", dump_tokens(&file)?);
            Ok(())
        }
        Some(DoglangSubcommand::Ast { file }) => {
            print!("{}", dump_ast(&file)?);
            Ok(())
        }
        Some(DoglangSubcommand::Repl) | None => repl::start(),
    }
}

fn report(err: &anyhow::Error) {
    let message = match err.downcast_ref::<DogError>() {
        Some(dog_error) => describe_error(dog_error),
        None => format!("error: {:#}", err),
    };
    eprintln!("{}", message.red());
}
