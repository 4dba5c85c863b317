//! REPL (Read-Eval-Print Loop) for the DogLang language

use crate::commands::{create_registry, describe_error, CommandContext, CommandRegistry, CommandResult};
use anyhow::Result;
use colored::*;
use rustyline::error::ReadlineError;
use rustyline::{DefaultEditor, Result as RustylineResult};

/// Interactive REPL for the DogLang language
pub struct Repl {
    editor: DefaultEditor,
    registry: CommandRegistry,
    /// Session state shared with the commands
    ctx: CommandContext,
}

impl Repl {
    /// Create a new REPL instance
    pub fn new() -> RustylineResult<Self> {
        let editor = DefaultEditor::new()?;

        Ok(Repl {
            editor,
            registry: create_registry(),
            ctx: CommandContext::stdio(),
        })
    }

    /// Start the REPL loop
    pub fn run(&mut self) -> Result<()> {
        println!(
            "{} {}",
            "🐶".bright_yellow(),
            "DogLang".bright_cyan().bold()
        );
        println!(
            "Type statements like: {}, {}",
            "a = 5 + 3;".cyan(),
            "bark(a);".cyan()
        );
        println!(
            "Type '{}' for more information, '{}' or {} to exit.\n",
            "help".bright_green(),
            "quit".bright_red(),
            "Ctrl+C".bright_red()
        );

        loop {
            let prompt = format!("{} ", "doglang>".bright_magenta().bold());
            match self.editor.readline(&prompt) {
                Ok(line) => {
                    let line = line.trim();
                    if line.is_empty() {
                        continue;
                    }
                    self.editor.add_history_entry(line.to_owned())?;

                    match process_line(&self.registry, &mut self.ctx, line) {
                        CommandResult::Success | CommandResult::NotACommand => {}
                        CommandResult::Message(msg) => {
                            println!("{}", msg);
                        }
                        CommandResult::Exit => {
                            println!("{} 🐾", "Goodbye!".bright_cyan());
                            break;
                        }
                        CommandResult::Error(e) => {
                            println!("{} {}", "Error:".bright_red().bold(), e.red());
                        }
                    }
                }
                Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => {
                    println!("{} 🐾", "Goodbye!".bright_cyan());
                    break;
                }
                Err(err) => {
                    println!(
                        "{} {}",
                        "Error reading input:".bright_red().bold(),
                        err.to_string().red()
                    );
                }
            }
        }

        Ok(())
    }
}

/// Handle one line of shell input: a command, or DogLang source to run
pub fn process_line(
    registry: &CommandRegistry,
    ctx: &mut CommandContext,
    line: &str,
) -> CommandResult {
    // Lines that end like a statement are always source, even when they start
    // with a command name (`vars = 3;`)
    let looks_like_source = line.ends_with(';') || line.ends_with('}');
    if !looks_like_source {
        match registry.execute(line, ctx) {
            CommandResult::NotACommand => {}
            result => return result,
        }
    }

    match ctx.run_source(line) {
        Ok(()) => CommandResult::Success,
        Err(e) => CommandResult::Error(describe_error(&e)),
    }
}

/// Convenience function to start the REPL
pub fn start() -> Result<()> {
    let mut repl = Repl::new().map_err(|e| anyhow::anyhow!("Failed to initialize REPL: {}", e))?;
    repl.run()
}

#[cfg(test)]
mod tests {
    use super::*;
    use doglang_core::parser::Interpreter;
    use std::io::{self, BufRead, Cursor, Write};

    fn session() -> (CommandRegistry, CommandContext) {
        let input: Box<dyn BufRead> = Box::new(Cursor::new(Vec::new()));
        let output: Box<dyn Write> = Box::new(io::sink());
        (
            create_registry(),
            CommandContext::new(Interpreter::new(input, output)),
        )
    }

    #[test]
    fn test_bindings_persist_across_lines() {
        let (registry, mut ctx) = session();

        assert_eq!(
            process_line(&registry, &mut ctx, "a = 2;"),
            CommandResult::Success
        );
        assert_eq!(
            process_line(&registry, &mut ctx, "a = a * 21;"),
            CommandResult::Success
        );
        assert_eq!(
            ctx.interpreter.environment().get("a").map(|v| v.to_string()),
            Some("42".to_string())
        );
    }

    #[test]
    fn test_commands_take_priority() {
        let (registry, mut ctx) = session();

        assert_eq!(process_line(&registry, &mut ctx, "quit"), CommandResult::Exit);
    }

    #[test]
    fn test_statement_named_like_command() {
        let (registry, mut ctx) = session();

        assert_eq!(
            process_line(&registry, &mut ctx, "vars = 3;"),
            CommandResult::Success
        );
        assert!(ctx.interpreter.environment().is_defined("vars"));
    }

    #[test]
    fn test_errors_are_reported() {
        let (registry, mut ctx) = session();

        assert_eq!(
            process_line(&registry, &mut ctx, "bark(nope);"),
            CommandResult::Error("semantic error: Variable 'nope' not declared (line 1)".to_string())
        );
        assert!(matches!(
            process_line(&registry, &mut ctx, "barkk(1)"),
            CommandResult::Error(msg) if msg.starts_with("syntax error:")
        ));
    }

    #[test]
    fn test_session_survives_errors() {
        let (registry, mut ctx) = session();

        process_line(&registry, &mut ctx, "a = 1;");
        process_line(&registry, &mut ctx, "a = 1 / 0;");

        assert_eq!(
            ctx.interpreter.environment().get("a").map(|v| v.to_string()),
            Some("1".to_string())
        );
    }
}
