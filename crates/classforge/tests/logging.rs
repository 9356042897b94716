//! Tests for logging initialization
//!
//! A global subscriber can only be installed once per process, so only the
//! failure paths are asserted strictly.

use classforge::core::logging::{init_logging, LogFormat};
use std::str::FromStr;

#[test]
fn test_log_format_parsing() {
    assert_eq!(LogFormat::from_str("compact").unwrap(), LogFormat::Compact);
    assert_eq!(LogFormat::from_str("Pretty").unwrap(), LogFormat::Pretty);
    assert_eq!(LogFormat::from_str("JSON").unwrap(), LogFormat::Json);
    assert!(LogFormat::from_str("xml").is_err());
}

#[test]
fn test_log_format_variants() {
    assert_eq!(LogFormat::variants(), &["compact", "pretty", "json"]);
}

#[test]
fn test_init_logging_invalid_format() {
    let err = init_logging(Some("info"), Some("yaml")).unwrap_err();
    assert!(err.to_string().contains("Invalid log format"));
}

#[test]
fn test_second_init_fails() {
    // Whichever call installs the subscriber, the next one must be rejected.
    let _ = init_logging(Some("debug"), Some("compact"));
    assert!(init_logging(Some("info"), Some("json")).is_err());
}

#[test]
fn test_pipeline_runs_with_logging_enabled() {
    use classforge::prelude::*;

    let _ = init_logging(Some("trace"), Some("compact"));
    let mut style = StyleTree::new("root");
    style.add_cell(
        StyleCell::new("a", "root")
            .with_style("shape", "swimlane")
            .with_value("Audit"),
    );
    style.add_cell(StyleCell::new("a1", "a").with_value("+at: datetime"));
    let tree = classforge::build_syntax_tree(&style).unwrap();
    assert_eq!(classforge::render(&tree, "csharp", &GeneratorConfig::new()).unwrap().len(), 1);
}
