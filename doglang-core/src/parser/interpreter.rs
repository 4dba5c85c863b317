//! Interpreter for executing DogLang programs
//!
//! Walks the statement tree, evaluating expressions against its own binding
//! store and talking to the outside world through the input and output
//! handles it was built with.

use crate::parser::ast::{Block, Expression, Program, Statement};
use crate::parser::environment::{Environment, InferredType};
use crate::parser::error::{DogResult, RuntimeError, SemanticError};
use crate::parser::evaluator::{evaluate, Value};
use crate::parser::statement_parser::parse_program;
use std::io::{self, BufRead, Write};
use tracing::trace;

/// Control flow signals for heel/stay
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlFlow {
    /// Carry on with the next statement
    Next,
    /// Leave the innermost loop
    Break { line: usize },
    /// Start the next iteration of the innermost loop
    Continue { line: usize },
}

/// Interpreter for executing DogLang statements
pub struct Interpreter<R, W> {
    /// Variable bindings for this execution only
    environment: Environment,
    input: R,
    output: W,
}

impl Interpreter<io::StdinLock<'static>, io::Stdout> {
    /// Interpreter bound to the process's stdin and stdout
    pub fn stdio() -> Self {
        Interpreter::new(io::stdin().lock(), io::stdout())
    }
}

impl<R: BufRead, W: Write> Interpreter<R, W> {
    /// Create a new interpreter with an empty binding store
    pub fn new(input: R, output: W) -> Self {
        Interpreter {
            environment: Environment::new(),
            input,
            output,
        }
    }

    /// Read-only view of the bindings
    pub fn environment(&self) -> &Environment {
        &self.environment
    }

    /// Consume the interpreter, returning its output handle
    pub fn into_output(self) -> W {
        self.output
    }

    /// Consume the interpreter, returning its final bindings
    pub fn into_environment(self) -> Environment {
        self.environment
    }

    /// Replace the binding store with a fresh one
    pub fn reset(&mut self) {
        self.environment = Environment::new();
    }

    /// Parse and run source text against the current bindings
    pub fn run_source(&mut self, source: &str) -> DogResult<()> {
        let program = parse_program(source)?;
        self.run_program(&program)
    }

    /// Run a complete program
    pub fn run_program(&mut self, program: &Program) -> DogResult<()> {
        for stmt in &program.statements {
            match self.run_statement(stmt)? {
                ControlFlow::Next => {}
                ControlFlow::Break { line } => {
                    return Err(SemanticError::LoopControlOutsideLoop {
                        keyword: "heel",
                        line,
                    }
                    .into())
                }
                ControlFlow::Continue { line } => {
                    return Err(SemanticError::LoopControlOutsideLoop {
                        keyword: "stay",
                        line,
                    }
                    .into())
                }
            }
        }

        self.flush()?;
        Ok(())
    }

    /// Run a single statement
    pub fn run_statement(&mut self, stmt: &Statement) -> DogResult<ControlFlow> {
        trace!(line = stmt.line(), "executing statement");

        match stmt {
            Statement::Assignment { name, value, line } => {
                let val = self.eval_expression(value)?;
                if self.environment.is_defined(name) {
                    self.environment.modify(name, val, *line)?;
                } else {
                    self.environment.insert(name, InferredType::of(&val), val);
                }
                Ok(ControlFlow::Next)
            }

            Statement::Print { value, .. } => {
                let val = self.eval_expression(value)?;
                writeln!(self.output, "{}", val).map_err(output_error)?;
                Ok(ControlFlow::Next)
            }

            Statement::Loop {
                condition,
                body,
                line,
            } => {
                let mut iteration = 0usize;
                while self.eval_expression(condition)?.is_truthy() {
                    trace!(line, iteration, "loop iteration");
                    iteration += 1;

                    match self.run_block(body)? {
                        ControlFlow::Break { .. } => break,
                        ControlFlow::Continue { .. } | ControlFlow::Next => {}
                    }
                }
                Ok(ControlFlow::Next)
            }

            Statement::Conditional {
                condition,
                then_block,
                else_block,
                line,
            } => {
                if self.eval_condition(condition, *line)? {
                    self.run_block(then_block)
                } else {
                    match else_block {
                        Some(else_block) => self.run_block(&else_block.block),
                        None => Ok(ControlFlow::Next),
                    }
                }
            }

            Statement::Heel { line } => Ok(ControlFlow::Break { line: *line }),

            Statement::Stay { line } => Ok(ControlFlow::Continue { line: *line }),
        }
    }

    /// Run the statements of a block, stopping at the first loop control signal
    fn run_block(&mut self, block: &Block) -> DogResult<ControlFlow> {
        for stmt in &block.statements {
            match self.run_statement(stmt)? {
                ControlFlow::Next => {}
                flow => return Ok(flow),
            }
        }
        Ok(ControlFlow::Next)
    }

    /// Evaluate an expression, performing input for fetch
    fn eval_expression(&mut self, expr: &Expression) -> DogResult<Value> {
        match expr {
            Expression::Run(run) => evaluate(run, &self.environment),
            Expression::Fetch { prompt, .. } => {
                let prompt = self.eval_expression(prompt)?;
                write!(self.output, "{}", prompt).map_err(output_error)?;
                self.flush()?;
                self.read_line().map(Value::Str)
            }
        }
    }

    /// Conditional tests must be real booleans
    fn eval_condition(&mut self, condition: &Expression, line: usize) -> DogResult<bool> {
        match self.eval_expression(condition)? {
            Value::Bool(b) => Ok(b),
            other => Err(SemanticError::NonBooleanCondition {
                construct: "sniff",
                found: other.type_name(),
                line,
            }
            .into()),
        }
    }

    /// Read one line of input without its terminator
    fn read_line(&mut self) -> DogResult<String> {
        let mut buffer = String::new();
        let read = self
            .input
            .read_line(&mut buffer)
            .map_err(|e| RuntimeError::Input(e.to_string()))?;
        if read == 0 {
            return Err(RuntimeError::Input("unexpected end of input".to_string()).into());
        }

        if buffer.ends_with('\n') {
            buffer.pop();
            if buffer.ends_with('\r') {
                buffer.pop();
            }
        }
        Ok(buffer)
    }

    fn flush(&mut self) -> DogResult<()> {
        self.output.flush().map_err(output_error)?;
        Ok(())
    }
}

fn output_error(e: io::Error) -> RuntimeError {
    RuntimeError::Output(e.to_string())
}
