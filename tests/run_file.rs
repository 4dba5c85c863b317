use doglang::{dump_ast, dump_tokens, run_file_with, DogError};
use std::io::{Cursor, Write};
use tempfile::NamedTempFile;

fn source_file(source: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(source.as_bytes()).unwrap();
    file
}

#[test]
fn test_run_file_prints_output() {
    let file = source_file("a = 0;\nwagtail(a < 3) {\n    bark(a);\n    a = a + 1;\n}\n");
    let mut output = Vec::new();

    let env = run_file_with(file.path(), Cursor::new(""), &mut output).unwrap();

    assert_eq!(String::from_utf8(output).unwrap(), "0\n1\n2\n");
    assert!(env.is_defined("a"));
}

#[test]
fn test_run_file_reads_input() {
    let file = source_file("name = fetch \"Name? \";\nbark(name);\n");
    let mut output = Vec::new();

    run_file_with(file.path(), Cursor::new("Biscuit\n"), &mut output).unwrap();

    assert_eq!(String::from_utf8(output).unwrap(), "Name? Biscuit\n");
}

#[test]
fn test_run_file_surfaces_language_error() {
    let file = source_file("bark(1);\nbark(1 / 0);\n");
    let mut output = Vec::new();

    let err = run_file_with(file.path(), Cursor::new(""), &mut output).unwrap_err();

    let dog_error = err.downcast_ref::<DogError>().unwrap();
    assert_eq!(dog_error.kind(), "runtime");
    assert_eq!(String::from_utf8(output).unwrap(), "1\n");
}

#[test]
fn test_run_missing_file() {
    let err = run_file_with(
        std::path::Path::new("/no/such/program.dog"),
        Cursor::new(""),
        Vec::new(),
    )
    .unwrap_err();

    assert!(err.to_string().starts_with("Failed to read"));
    assert!(err.downcast_ref::<DogError>().is_none());
}

#[test]
fn test_dump_tokens_is_json() {
    let file = source_file("bark(\"hi\");");

    let json = dump_tokens(file.path()).unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();

    let tokens = parsed.as_array().unwrap();
    assert_eq!(tokens.len(), 5);
    assert_eq!(tokens[0]["kind"], "Keyword");
    assert_eq!(tokens[0]["text"], "bark");
    assert_eq!(tokens[2]["kind"], "StringLiteral");
    assert_eq!(tokens[2]["text"], "hi");
    assert_eq!(tokens[4]["line"], 1);
}

#[test]
fn test_dump_ast() {
    let file = source_file("a = 1;\nsniff(a == 1) { bark(a); } else { heel; }\n");

    let dump = dump_ast(file.path()).unwrap();

    assert!(dump.starts_with("Program\n    Assignment a\n"));
    assert!(dump.contains("    Conditional\n"));
    assert!(dump.contains("        ElseBlock\n            Heel\n"));
}
