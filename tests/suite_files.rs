//! Loading YAML suite files from disk and resolving their declarations.

use std::path::Path;

use argsource::suite::{discover_suite_files, load_suite};
use argsource::{materialize, ErrorType, RunConfig, Value};

fn showcase_counts() -> Vec<(String, usize)> {
    let suite = load_suite(Path::new("tests/fixtures/suites/showcase.yaml")).unwrap();
    let config = RunConfig::default();
    suite
        .declarations
        .iter()
        .map(|decl| {
            let sets = materialize(&decl.source, &decl.signature, &config)
                .unwrap_or_else(|e| panic!("{} failed to resolve: {}", decl.name, e));
            (decl.name.clone(), sets.len())
        })
        .collect()
}

#[test]
fn showcase_suite_resolves_every_declaration() {
    let expected: Vec<(String, usize)> = [
        ("palindromes", 4),
        ("blank_strings", 6),
        ("chrono_units", 16),
        ("second_half", 10),
        ("fruit_ranks", 4),
        ("countries", 4),
        ("countries_with_headers", 4),
    ]
    .iter()
    .map(|(name, n)| (name.to_string(), *n))
    .collect();
    assert_eq!(showcase_counts(), expected);
}

#[test]
fn csv_file_paths_are_relative_to_the_suite() {
    let suite = load_suite(Path::new("tests/fixtures/suites/showcase.yaml")).unwrap();
    let decl = suite
        .declarations
        .iter()
        .find(|d| d.name == "countries_with_headers")
        .unwrap();
    let sets = materialize(&decl.source, &decl.signature, &RunConfig::default()).unwrap();
    assert_eq!(sets[2].values()[0], Value::from("United States of America"));
    assert_eq!(sets[3].values()[1], Value::Int(700_000));
    assert_eq!(sets[0].to_string(), "Country = Sweden, reference = 1");
}

#[test]
fn blank_strings_start_with_null_then_empty() {
    let suite = load_suite(Path::new("tests/fixtures/suites/showcase.yaml")).unwrap();
    let decl = &suite.declarations[1];
    let sets = materialize(&decl.source, &decl.signature, &RunConfig::default()).unwrap();
    assert_eq!(sets[0].values()[0], Value::Null);
    assert_eq!(sets[1].values()[0], Value::from(""));
    assert_eq!(sets[5].values()[0], Value::from("\n"));
}

#[test]
fn unconvertible_field_is_an_argument_parse_error() {
    let suite = load_suite(Path::new("tests/fixtures/broken/bad_number.yaml")).unwrap();
    let decl = &suite.declarations[0];
    let err = materialize(&decl.source, &decl.signature, &RunConfig::default()).unwrap_err();
    assert_eq!(err.error_type(), ErrorType::ArgumentParse);
    let message = err.to_string();
    assert!(message.contains("row 2"), "{}", message);
    assert!(message.contains("notanumber"), "{}", message);
}

#[test]
fn missing_suite_file_is_an_io_error() {
    let err = load_suite(Path::new("tests/fixtures/suites/nope.yaml")).unwrap_err();
    assert!(err.to_string().contains("nope.yaml"));
}

#[test]
fn discovery_finds_yaml_files_recursively_in_order() {
    let files = discover_suite_files("tests/fixtures");
    let names: Vec<String> = files
        .iter()
        .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
        .collect();
    assert_eq!(names, vec!["bad_number.yaml", "showcase.yaml"]);
}
