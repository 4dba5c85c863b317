//! Command registry for REPL commands
//!
//! Provides a clean, extensible pattern for handling REPL commands.

pub mod general;

use doglang_core::parser::{DogError, Interpreter};
use std::io::{self, BufRead, Read, Write};

/// Interpreter type used by the shell: boxed handles so tests can swap them out
pub type ShellInterpreter = Interpreter<Box<dyn BufRead>, Box<dyn Write>>;

/// Stdin reader that locks stdin only while pulling in one line.
///
/// The line editor locks stdin itself when input is not a terminal, so the
/// session must never hold the lock between reads. Buffering stops at a line
/// end to leave later lines for the editor.
#[derive(Debug, Default)]
pub struct StdinLines {
    buffer: Vec<u8>,
    position: usize,
}

impl StdinLines {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Read for StdinLines {
    fn read(&mut self, out: &mut [u8]) -> io::Result<usize> {
        let count = {
            let available = self.fill_buf()?;
            let count = available.len().min(out.len());
            out[..count].copy_from_slice(&available[..count]);
            count
        };
        self.consume(count);
        Ok(count)
    }
}

impl BufRead for StdinLines {
    fn fill_buf(&mut self) -> io::Result<&[u8]> {
        if self.position >= self.buffer.len() {
            self.buffer.clear();
            self.position = 0;
            io::stdin().lock().read_until(b'\n', &mut self.buffer)?;
        }
        Ok(&self.buffer[self.position..])
    }

    fn consume(&mut self, amount: usize) {
        self.position = (self.position + amount).min(self.buffer.len());
    }
}

/// Result of executing a command
#[derive(Debug, PartialEq)]
pub enum CommandResult {
    /// Command executed successfully, continue REPL
    Success,
    /// Command executed, show this message
    Message(String),
    /// Exit the REPL
    Exit,
    /// Not a command, try running as DogLang source
    NotACommand,
    /// Error occurred
    Error(String),
}

/// Context passed to command handlers
pub struct CommandContext {
    /// Long-lived interpreter: bindings persist for the whole session
    pub interpreter: ShellInterpreter,
}

impl CommandContext {
    pub fn new(interpreter: ShellInterpreter) -> Self {
        Self { interpreter }
    }

    /// Context whose interpreter reads stdin and writes stdout
    pub fn stdio() -> Self {
        let input: Box<dyn BufRead> = Box::new(StdinLines::new());
        let output: Box<dyn Write> = Box::new(io::stdout());
        Self::new(Interpreter::new(input, output))
    }

    /// Run DogLang source in the session interpreter
    pub fn run_source(&mut self, source: &str) -> Result<(), DogError> {
        self.interpreter.run_source(source)
    }
}

/// Format a language error the way the shell and the binary report it
pub fn describe_error(err: &DogError) -> String {
    format!("{} error: {}", err.kind(), err)
}

/// A command handler function
pub type CommandHandler = fn(&str, &mut CommandContext) -> CommandResult;

/// Registry of available commands
pub struct CommandRegistry {
    /// Commands indexed by their prefix, longest first
    commands: Vec<(String, CommandHandler)>,
}

impl CommandRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self {
            commands: Vec::new(),
        }
    }

    /// Register a command with its prefix
    pub fn register(&mut self, prefix: &str, handler: CommandHandler) {
        self.commands.push((prefix.to_string(), handler));
        // Sort by prefix length descending for longest-match-first
        self.commands.sort_by(|a, b| b.0.len().cmp(&a.0.len()));
    }

    /// Execute a command, returning NotACommand if no match found
    pub fn execute(&self, input: &str, ctx: &mut CommandContext) -> CommandResult {
        for (prefix, handler) in &self.commands {
            if input == prefix || input.starts_with(&format!("{} ", prefix)) {
                let args = if input.len() > prefix.len() {
                    input[prefix.len()..].trim()
                } else {
                    ""
                };
                return handler(args, ctx);
            }
        }
        CommandResult::NotACommand
    }

    /// Get all registered command prefixes
    pub fn list_commands(&self) -> Vec<&str> {
        self.commands.iter().map(|(p, _)| p.as_str()).collect()
    }
}

impl Default for CommandRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Create a fully populated command registry with all built-in commands
pub fn create_registry() -> CommandRegistry {
    let mut registry = CommandRegistry::new();

    registry.register("help", general::cmd_help);
    registry.register("quit", general::cmd_quit);
    registry.register("exit", general::cmd_quit);
    registry.register("vars", general::cmd_vars);
    registry.register("reset", general::cmd_reset);
    registry.register("load", general::cmd_load);

    registry
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    pub(crate) fn test_context() -> CommandContext {
        let input: Box<dyn BufRead> = Box::new(Cursor::new(Vec::new()));
        let output: Box<dyn Write> = Box::new(io::sink());
        CommandContext::new(Interpreter::new(input, output))
    }

    fn cmd_echo(args: &str, _ctx: &mut CommandContext) -> CommandResult {
        CommandResult::Message(args.to_string())
    }

    fn cmd_echo_loud(args: &str, _ctx: &mut CommandContext) -> CommandResult {
        CommandResult::Message(args.to_uppercase())
    }

    #[test]
    fn test_prefix_matching() {
        let mut registry = CommandRegistry::new();
        registry.register("echo", cmd_echo);
        let mut ctx = test_context();

        assert_eq!(
            registry.execute("echo hello there", &mut ctx),
            CommandResult::Message("hello there".to_string())
        );
        assert_eq!(
            registry.execute("echo", &mut ctx),
            CommandResult::Message(String::new())
        );
        // Prefix must be a whole word
        assert_eq!(
            registry.execute("echoes", &mut ctx),
            CommandResult::NotACommand
        );
    }

    #[test]
    fn test_longest_prefix_wins() {
        let mut registry = CommandRegistry::new();
        registry.register("echo", cmd_echo);
        registry.register("echo loud", cmd_echo_loud);
        let mut ctx = test_context();

        assert_eq!(
            registry.execute("echo loud woof", &mut ctx),
            CommandResult::Message("WOOF".to_string())
        );
        assert_eq!(registry.list_commands(), vec!["echo loud", "echo"]);
    }

    #[test]
    fn test_builtin_commands_registered() {
        let registry = create_registry();
        let commands = registry.list_commands();

        for name in ["help", "quit", "exit", "vars", "reset", "load"] {
            assert!(commands.contains(&name), "missing command {}", name);
        }
    }

    #[test]
    fn test_source_is_not_a_command() {
        let registry = create_registry();
        let mut ctx = test_context();

        assert_eq!(
            registry.execute("bark(1);", &mut ctx),
            CommandResult::NotACommand
        );
    }

    #[test]
    fn test_describe_error() {
        let mut ctx = test_context();
        let err = ctx.run_source("bark(1 / 0);").unwrap_err();

        assert_eq!(describe_error(&err), "runtime error: Division by zero");
    }
}
