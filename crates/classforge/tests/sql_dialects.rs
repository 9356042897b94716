//! Tests for SQL output across dialects

use classforge::backends::sql::{dialect_for, SqlDialect, DIALECT_NAMES};
use classforge::prelude::*;

fn accounts() -> SyntaxTree {
    let mut style = StyleTree::new("root");
    style.add_cell(
        StyleCell::new("a", "root")
            .with_style("shape", "swimlane")
            .with_value("Account"),
    );
    style.add_cell(StyleCell::new("a1", "a").with_value(
        "+id: int64 {pk, identity}\n+email: string {unique, required, length:120}\n+balance: decimal {size:12:2}\n+photo: bytes {lob}",
    ));
    classforge::build_syntax_tree(&style).unwrap()
}

fn sql_config(dialect: &str) -> GeneratorConfig {
    GeneratorConfig::new().with_target(
        "sql",
        TargetConfig {
            dialect: Some(dialect.to_string()),
            ..TargetConfig::default()
        },
    )
}

fn table(dialect: &str) -> String {
    let files = classforge::render(&accounts(), "sql", &sql_config(dialect)).unwrap();
    assert_eq!(files.len(), 1);
    assert_eq!(files[0].0, "Account.sql");
    files[0].1.clone()
}

#[test]
fn test_every_dialect_renders() {
    for name in DIALECT_NAMES {
        let sql = table(name);
        assert!(sql.starts_with("CREATE TABLE "), "{}", name);
        assert!(sql.ends_with(");\n"), "{}", name);
        assert!(sql.contains("PRIMARY KEY"), "{}", name);
        // SQLite has no length-bounded text type
        assert_eq!(sql.contains("(120)"), *name != "sqlite", "{}", name);
    }
}

#[test]
fn test_identity_and_quoting() {
    let mysql = table("mysql");
    assert!(mysql.contains("`id`"));
    assert!(mysql.contains("AUTO_INCREMENT"));

    let mssql = table("sqlserver");
    assert!(mssql.contains("[id]"));
    assert!(mssql.contains("IDENTITY(1,1)"));

    let postgres = table("postgresql");
    assert!(postgres.contains("\"id\""));
    assert!(postgres.contains("GENERATED BY DEFAULT AS IDENTITY"));

    let access = table("access");
    assert!(access.contains("[id] COUNTER"));

    let sqlite = table("sqlite");
    assert!(!sqlite.contains("AUTO_INCREMENT"));
    assert!(!sqlite.contains("IDENTITY"));
}

#[test]
fn test_precision_and_lob() {
    let sql = table("ansi");
    assert!(sql.contains("(12,2)"));
    assert!(sql.contains("\"email\" VARCHAR(120) NOT NULL UNIQUE"));
    let lob = dialect_for("ansi").unwrap().lob_type(true);
    assert!(sql.contains(&format!("\"photo\" {}", lob)));
}

#[test]
fn test_dialect_aliases() {
    assert_eq!(dialect_for("postgres").unwrap().name(), "postgresql");
    assert_eq!(dialect_for("MSSQL").unwrap().name(), "sqlserver");
    assert_eq!(dialect_for("generic").unwrap().name(), "ansi");
    assert!(dialect_for("db2").is_err());
}

#[test]
fn test_single_script_with_filename() {
    let config = GeneratorConfig::new().with_target(
        "sql",
        TargetConfig {
            dialect: Some("sqlite".into()),
            single_script: true,
            filename: Some("accounts.sql".into()),
            ..TargetConfig::default()
        },
    );
    let files = classforge::render(&accounts(), "sql", &config).unwrap();
    assert_eq!(files.len(), 1);
    assert_eq!(files[0].0, "accounts.sql");
    assert!(files[0].1.contains("CREATE TABLE \"Account\""));
}
