//! Binding store
//!
//! One flat namespace mapping variable names to their current value and the
//! type inferred when they were written. Entries keep insertion order so the
//! shell can list them the way they were declared.

use crate::parser::error::{DogResult, SemanticError};
use crate::parser::evaluator::Value;
use std::collections::HashMap;
use std::fmt;

/// Type recorded for a binding, derived from the value it holds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InferredType {
    Int,
    Bool,
    String,
    Float,
}

impl InferredType {
    pub fn of(value: &Value) -> Self {
        match value {
            Value::Int(_) => InferredType::Int,
            Value::Float(_) => InferredType::Float,
            Value::Bool(_) => InferredType::Bool,
            Value::Str(_) => InferredType::String,
        }
    }
}

impl fmt::Display for InferredType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            InferredType::Int => "int",
            InferredType::Bool => "bool",
            InferredType::String => "string",
            InferredType::Float => "float",
        };
        write!(f, "{}", name)
    }
}

/// A single binding
#[derive(Debug, Clone, PartialEq)]
pub struct Entry {
    pub name: String,
    pub inferred_type: InferredType,
    pub value: Value,
}

/// Variable storage for one program execution
#[derive(Debug, Clone, Default)]
pub struct Environment {
    entries: Vec<Entry>,
    index: HashMap<String, usize>,
}

impl Environment {
    /// Create an empty store
    pub fn new() -> Self {
        Environment {
            entries: Vec::new(),
            index: HashMap::new(),
        }
    }

    /// Drop every binding
    pub fn clear(&mut self) {
        self.entries.clear();
        self.index.clear();
    }

    /// Insert a binding, overwriting an existing one with the same name in place
    pub fn insert(&mut self, name: &str, inferred_type: InferredType, value: Value) {
        if let Some(&slot) = self.index.get(name) {
            let entry = &mut self.entries[slot];
            entry.inferred_type = inferred_type;
            entry.value = value;
            return;
        }

        self.index.insert(name.to_string(), self.entries.len());
        self.entries.push(Entry {
            name: name.to_string(),
            inferred_type,
            value,
        });
    }

    /// Look up a binding by exact name
    pub fn lookup(&self, name: &str) -> Option<&Entry> {
        self.index.get(name).map(|&slot| &self.entries[slot])
    }

    /// Replace the value of an existing binding
    pub fn modify(&mut self, name: &str, value: Value, line: usize) -> DogResult<()> {
        match self.index.get(name) {
            Some(&slot) => {
                let entry = &mut self.entries[slot];
                entry.inferred_type = InferredType::of(&value);
                entry.value = value;
                Ok(())
            }
            None => Err(SemanticError::NotDeclared {
                name: name.to_string(),
                line,
            }
            .into()),
        }
    }

    /// Get a variable's value
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.lookup(name).map(|entry| &entry.value)
    }

    pub fn is_defined(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// All bindings in the order they were first declared
    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::error::DogError;

    #[test]
    fn test_basic_insert_and_lookup() {
        let mut env = Environment::new();

        env.insert("x", InferredType::Int, Value::Int(5));

        assert!(env.is_defined("x"));
        assert!(!env.is_defined("y"));

        let entry = env.lookup("x").unwrap();
        assert_eq!(entry.name, "x");
        assert_eq!(entry.inferred_type, InferredType::Int);
        assert_eq!(entry.value, Value::Int(5));
    }

    #[test]
    fn test_insert_is_upsert() {
        let mut env = Environment::new();

        env.insert("x", InferredType::Int, Value::Int(1));
        env.insert("x", InferredType::String, Value::Str("one".to_string()));

        assert_eq!(env.len(), 1);
        let entry = env.lookup("x").unwrap();
        assert_eq!(entry.inferred_type, InferredType::String);
        assert_eq!(entry.value, Value::Str("one".to_string()));
    }

    #[test]
    fn test_modify_variable() {
        let mut env = Environment::new();

        env.insert("x", InferredType::Int, Value::Int(1));
        env.modify("x", Value::Bool(true), 2).unwrap();

        assert_eq!(env.get("x"), Some(&Value::Bool(true)));
        assert_eq!(env.lookup("x").unwrap().inferred_type, InferredType::Bool);
    }

    #[test]
    fn test_modify_undefined_fails() {
        let mut env = Environment::new();

        let result = env.modify("ghost", Value::Int(1), 4);
        assert_eq!(
            result,
            Err(DogError::Semantic(SemanticError::NotDeclared {
                name: "ghost".to_string(),
                line: 4
            }))
        );
        assert!(env.is_empty());
    }

    #[test]
    fn test_lookup_is_case_sensitive() {
        let mut env = Environment::new();

        env.insert("Count", InferredType::Int, Value::Int(3));

        assert!(env.lookup("count").is_none());
        assert!(env.lookup("Count").is_some());
    }

    #[test]
    fn test_entries_keep_insertion_order() {
        let mut env = Environment::new();

        env.insert("b", InferredType::Int, Value::Int(2));
        env.insert("a", InferredType::Int, Value::Int(1));
        env.insert("b", InferredType::Int, Value::Int(3));

        let names: Vec<&str> = env.entries().iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["b", "a"]);
    }

    #[test]
    fn test_clear() {
        let mut env = Environment::new();

        env.insert("x", InferredType::Float, Value::Float(2.5));
        env.clear();

        assert!(env.is_empty());
        assert!(!env.is_defined("x"));

        // Store is usable again after clearing
        env.insert("y", InferredType::Int, Value::Int(1));
        assert_eq!(env.len(), 1);
    }

    #[test]
    fn test_inferred_type_of_value() {
        assert_eq!(InferredType::of(&Value::Int(1)), InferredType::Int);
        assert_eq!(InferredType::of(&Value::Float(1.0)), InferredType::Float);
        assert_eq!(InferredType::of(&Value::Bool(false)), InferredType::Bool);
        assert_eq!(
            InferredType::of(&Value::Str(String::new())),
            InferredType::String
        );
        assert_eq!(InferredType::String.to_string(), "string");
    }
}
