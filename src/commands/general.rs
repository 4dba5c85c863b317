//! General REPL commands (help, quit, vars, reset, load)

use crate::commands::{describe_error, CommandContext, CommandResult};
use colored::*;

/// Handle `help` command
pub fn cmd_help(_args: &str, _ctx: &mut CommandContext) -> CommandResult {
    print_help();
    CommandResult::Success
}

/// Handle `quit` or `exit` command
pub fn cmd_quit(_args: &str, _ctx: &mut CommandContext) -> CommandResult {
    CommandResult::Exit
}

/// Handle `vars` command: list bindings in declaration order
pub fn cmd_vars(_args: &str, ctx: &mut CommandContext) -> CommandResult {
    let env = ctx.interpreter.environment();
    if env.is_empty() {
        return CommandResult::Message("No variables defined".to_string());
    }

    let lines: Vec<String> = env
        .entries()
        .iter()
        .map(|entry| {
            format!(
                "  {}: {} = {}",
                entry.name.cyan(),
                entry.inferred_type.to_string().yellow(),
                entry.value
            )
        })
        .collect();
    CommandResult::Message(lines.join("\n"))
}

/// Handle `reset` command
pub fn cmd_reset(_args: &str, ctx: &mut CommandContext) -> CommandResult {
    ctx.interpreter.reset();
    CommandResult::Message("Bindings cleared".bright_green().to_string())
}

/// Handle `load <file>` command: run a source file in this session
pub fn cmd_load(args: &str, ctx: &mut CommandContext) -> CommandResult {
    if args.is_empty() {
        return CommandResult::Error("Usage: load <file>".to_string());
    }

    let source = match std::fs::read_to_string(args) {
        Ok(source) => source,
        Err(e) => return CommandResult::Error(format!("Failed to load '{}': {}", args, e)),
    };

    tracing::debug!(path = args, "loading file into session");
    match ctx.run_source(&source) {
        Ok(()) => CommandResult::Message(format!("Loaded: {}", args)),
        Err(e) => CommandResult::Error(describe_error(&e)),
    }
}

/// Print help information
fn print_help() {
    println!("{}", "🐶 DogLang Help".bold());
    println!("{}", "===============".bold());
    println!();
    println!("{}", "Statements:".green());
    println!("  {}                  - Assign a variable", "a = 5 + 3;".cyan());
    println!("  {}                   - Print a value", "bark(a);".cyan());
    println!(
        "  {}  - Loop while the condition holds",
        "wagtail(a < 3) { ... }".cyan()
    );
    println!(
        "  {} - Conditional",
        "sniff(a > 5) { ... } else { ... }".cyan()
    );
    println!(
        "  {}    - Read a line of input",
        "name = fetch \"Name? \";".cyan()
    );
    println!(
        "  {} / {}             - Leave / skip to next iteration of a loop",
        "heel;".cyan(),
        "stay;".cyan()
    );
    println!();
    println!("{}", "Operators:".green());
    println!("  {}", "+ - * / %   < > <= >= == !=   && || !".cyan());
    println!();
    println!("{}", "Shell Commands:".green());
    println!("  {}         - Show this help", "help".cyan());
    println!("  {}         - List variables and their types", "vars".cyan());
    println!("  {}        - Forget all variables", "reset".cyan());
    println!("  {}  - Run a file in this session", "load <file>".cyan());
    println!("  {}  - Leave the shell", "quit, exit".cyan());
}
