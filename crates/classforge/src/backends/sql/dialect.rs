//! SQL dialect strategies
//!
//! A dialect owns the physical type table, the identity syntax, foreign key
//! naming and identifier quoting. Logical aliases (`int`, `boolean`, ...) are
//! folded onto their canonical name before the table lookup.

use std::fmt;

use crate::core::GenerationError;
use crate::model::ConstraintSet;

/// Default `VARCHAR` length when a bounded column has no `length:`
pub const DEFAULT_LENGTH: u32 = 255;

/// Canonical types a `lob` constraint can turn into a large object column
const LOB_TYPES: &[&str] = &["string", "wstring", "bytes"];

/// Registry names, one per dialect
pub const DIALECT_NAMES: &[&str] = &[
    "ansi",
    "mysql",
    "postgresql",
    "sqlserver",
    "oracle",
    "sqlite",
    "access",
];

/// Fold a logical alias onto its canonical name
pub fn canonical_type(logical: &str) -> String {
    let lower = logical.trim().to_lowercase();
    match lower.as_str() {
        "int" => "int32",
        "long" => "int64",
        "short" => "int16",
        "byte" => "int8",
        "boolean" => "bool",
        "float32" => "float",
        "float64" => "double",
        "text" => "string",
        _ => return lower,
    }
    .to_string()
}

pub trait SqlDialect: Send + Sync + fmt::Debug {
    /// Registry name
    fn name(&self) -> &'static str;

    /// Canonical logical type to physical column type
    fn type_table(&self) -> &'static [(&'static str, &'static str)];

    /// Physical types that take a `(length)` suffix
    fn bounded_types(&self) -> &'static [&'static str] {
        &["VARCHAR", "NVARCHAR"]
    }

    /// Physical types that take a `(precision,scale)` suffix
    fn numeric_types(&self) -> &'static [&'static str] {
        &["DECIMAL", "NUMERIC"]
    }

    /// Large-object column type for character or binary data
    fn lob_type(&self, binary: bool) -> &'static str;

    /// Type replacing the mapped one for identity columns, if the dialect has one
    fn identity_type(&self) -> Option<&'static str> {
        None
    }

    /// Clause appended to identity columns; may be empty
    fn identity_spec(&self) -> &'static str;

    fn fk_name(&self, table: &str, foreign_table: &str, index: usize) -> String {
        format!("fk_{}_{}_{}", table, foreign_table, index)
    }

    fn quote_identifier(&self, identifier: &str) -> String {
        format!("\"{}\"", identifier)
    }

    /// Physical column type for a logical type and its constraints
    fn map_type(&self, logical: &str, constraints: &ConstraintSet) -> String {
        let canonical = canonical_type(logical);
        if constraints.lob && LOB_TYPES.contains(&canonical.as_str()) {
            return self.lob_type(canonical == "bytes").to_string();
        }
        if constraints.is_auto_valued() {
            if let Some(identity) = self.identity_type() {
                return identity.to_string();
            }
        }

        let physical = self
            .type_table()
            .iter()
            .find(|(from, _)| *from == canonical)
            .map(|(_, to)| to.to_string())
            .unwrap_or_else(|| logical.trim().to_string());

        if self.bounded_types().contains(&physical.as_str()) {
            format!("{}({})", physical, constraints.length.unwrap_or(DEFAULT_LENGTH))
        } else if self.numeric_types().contains(&physical.as_str()) {
            match constraints.size {
                Some((precision, scale)) => format!("{}({},{})", physical, precision, scale),
                None => physical,
            }
        } else {
            physical
        }
    }
}

/// Look a dialect up by name, case-insensitively, aliases included
pub fn dialect_for(name: &str) -> Result<Box<dyn SqlDialect>, GenerationError> {
    match name.trim().to_lowercase().as_str() {
        "ansi" | "generic" => Ok(Box::new(Ansi)),
        "mysql" => Ok(Box::new(MySql)),
        "postgres" | "postgresql" => Ok(Box::new(PostgreSql)),
        "sqlserver" | "mssql" => Ok(Box::new(SqlServer)),
        "oracle" => Ok(Box::new(Oracle)),
        "sqlite" => Ok(Box::new(Sqlite)),
        "access" => Ok(Box::new(Access)),
        _ => Err(GenerationError::unsupported_dialect(name)),
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Ansi;

impl SqlDialect for Ansi {
    fn name(&self) -> &'static str {
        "ansi"
    }

    fn type_table(&self) -> &'static [(&'static str, &'static str)] {
        &[
            ("string", "VARCHAR"),
            ("wstring", "NVARCHAR"),
            ("char", "CHAR(1)"),
            ("bool", "BOOLEAN"),
            ("int8", "SMALLINT"),
            ("int16", "SMALLINT"),
            ("int32", "INTEGER"),
            ("int64", "BIGINT"),
            ("uint8", "SMALLINT"),
            ("uint16", "INTEGER"),
            ("uint32", "BIGINT"),
            ("uint64", "NUMERIC(20)"),
            ("float", "REAL"),
            ("double", "DOUBLE PRECISION"),
            ("decimal", "DECIMAL"),
            ("date", "DATE"),
            ("time", "TIME"),
            ("datetime", "TIMESTAMP"),
            ("uuid", "CHAR(36)"),
            ("bytes", "BLOB"),
            ("unspecified", "VARCHAR"),
        ]
    }

    fn lob_type(&self, binary: bool) -> &'static str {
        if binary {
            "BLOB"
        } else {
            "CLOB"
        }
    }

    fn identity_spec(&self) -> &'static str {
        "GENERATED BY DEFAULT AS IDENTITY"
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct MySql;

impl SqlDialect for MySql {
    fn name(&self) -> &'static str {
        "mysql"
    }

    fn type_table(&self) -> &'static [(&'static str, &'static str)] {
        &[
            ("string", "VARCHAR"),
            ("wstring", "VARCHAR"),
            ("char", "CHAR(1)"),
            ("bool", "BOOLEAN"),
            ("int8", "TINYINT"),
            ("int16", "SMALLINT"),
            ("int32", "INT"),
            ("int64", "BIGINT"),
            ("uint8", "TINYINT UNSIGNED"),
            ("uint16", "SMALLINT UNSIGNED"),
            ("uint32", "INT UNSIGNED"),
            ("uint64", "BIGINT UNSIGNED"),
            ("float", "FLOAT"),
            ("double", "DOUBLE"),
            ("decimal", "DECIMAL"),
            ("date", "DATE"),
            ("time", "TIME"),
            ("datetime", "DATETIME"),
            ("uuid", "CHAR(36)"),
            ("bytes", "BLOB"),
            ("unspecified", "TEXT"),
        ]
    }

    fn bounded_types(&self) -> &'static [&'static str] {
        &["VARCHAR"]
    }

    fn lob_type(&self, binary: bool) -> &'static str {
        if binary {
            "LONGBLOB"
        } else {
            "LONGTEXT"
        }
    }

    fn identity_spec(&self) -> &'static str {
        "AUTO_INCREMENT"
    }

    fn quote_identifier(&self, identifier: &str) -> String {
        format!("`{}`", identifier)
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct PostgreSql;

impl SqlDialect for PostgreSql {
    fn name(&self) -> &'static str {
        "postgresql"
    }

    fn type_table(&self) -> &'static [(&'static str, &'static str)] {
        &[
            ("string", "VARCHAR"),
            ("wstring", "VARCHAR"),
            ("char", "CHAR(1)"),
            ("bool", "BOOLEAN"),
            ("int8", "SMALLINT"),
            ("int16", "SMALLINT"),
            ("int32", "INTEGER"),
            ("int64", "BIGINT"),
            ("uint8", "SMALLINT"),
            ("uint16", "INTEGER"),
            ("uint32", "BIGINT"),
            ("uint64", "NUMERIC(20)"),
            ("float", "REAL"),
            ("double", "DOUBLE PRECISION"),
            ("decimal", "NUMERIC"),
            ("date", "DATE"),
            ("time", "TIME"),
            ("datetime", "TIMESTAMP"),
            ("uuid", "UUID"),
            ("bytes", "BYTEA"),
            ("unspecified", "TEXT"),
        ]
    }

    fn bounded_types(&self) -> &'static [&'static str] {
        &["VARCHAR"]
    }

    fn lob_type(&self, binary: bool) -> &'static str {
        if binary {
            "BYTEA"
        } else {
            "TEXT"
        }
    }

    fn identity_spec(&self) -> &'static str {
        "GENERATED BY DEFAULT AS IDENTITY"
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SqlServer;

impl SqlDialect for SqlServer {
    fn name(&self) -> &'static str {
        "sqlserver"
    }

    fn type_table(&self) -> &'static [(&'static str, &'static str)] {
        &[
            ("string", "VARCHAR"),
            ("wstring", "NVARCHAR"),
            ("char", "CHAR(1)"),
            ("bool", "BIT"),
            ("int8", "SMALLINT"),
            ("int16", "SMALLINT"),
            ("int32", "INT"),
            ("int64", "BIGINT"),
            ("uint8", "TINYINT"),
            ("uint16", "INT"),
            ("uint32", "BIGINT"),
            ("uint64", "DECIMAL(20,0)"),
            ("float", "REAL"),
            ("double", "FLOAT"),
            ("decimal", "DECIMAL"),
            ("date", "DATE"),
            ("time", "TIME"),
            ("datetime", "DATETIME2"),
            ("uuid", "UNIQUEIDENTIFIER"),
            ("bytes", "VARBINARY(MAX)"),
            ("unspecified", "NVARCHAR(MAX)"),
        ]
    }

    fn lob_type(&self, binary: bool) -> &'static str {
        if binary {
            "VARBINARY(MAX)"
        } else {
            "NVARCHAR(MAX)"
        }
    }

    fn identity_spec(&self) -> &'static str {
        "IDENTITY(1,1)"
    }

    fn quote_identifier(&self, identifier: &str) -> String {
        format!("[{}]", identifier)
    }
}

/// Longest identifier Oracle accepts before 12.2
const ORACLE_IDENTIFIER_LIMIT: usize = 30;

#[derive(Debug, Clone, Copy, Default)]
pub struct Oracle;

impl SqlDialect for Oracle {
    fn name(&self) -> &'static str {
        "oracle"
    }

    fn type_table(&self) -> &'static [(&'static str, &'static str)] {
        &[
            ("string", "VARCHAR2"),
            ("wstring", "NVARCHAR2"),
            ("char", "CHAR(1)"),
            ("bool", "NUMBER(1)"),
            ("int8", "NUMBER(3)"),
            ("int16", "NUMBER(5)"),
            ("int32", "NUMBER(10)"),
            ("int64", "NUMBER(19)"),
            ("uint8", "NUMBER(3)"),
            ("uint16", "NUMBER(5)"),
            ("uint32", "NUMBER(10)"),
            ("uint64", "NUMBER(20)"),
            ("float", "BINARY_FLOAT"),
            ("double", "BINARY_DOUBLE"),
            ("decimal", "NUMBER"),
            ("date", "DATE"),
            ("time", "TIMESTAMP"),
            ("datetime", "TIMESTAMP"),
            ("uuid", "RAW(16)"),
            ("bytes", "BLOB"),
            ("unspecified", "CLOB"),
        ]
    }

    fn bounded_types(&self) -> &'static [&'static str] {
        &["VARCHAR2", "NVARCHAR2"]
    }

    fn numeric_types(&self) -> &'static [&'static str] {
        &["NUMBER"]
    }

    fn lob_type(&self, binary: bool) -> &'static str {
        if binary {
            "BLOB"
        } else {
            "CLOB"
        }
    }

    fn identity_spec(&self) -> &'static str {
        "GENERATED BY DEFAULT AS IDENTITY"
    }

    /// Truncates the table part so the index suffix always survives
    fn fk_name(&self, table: &str, foreign_table: &str, index: usize) -> String {
        let suffix = format!("_{}", index);
        let room = ORACLE_IDENTIFIER_LIMIT.saturating_sub(suffix.len());
        let mut name: String = format!("FK_{}_{}", table, foreign_table)
            .to_uppercase()
            .chars()
            .take(room)
            .collect();
        name.push_str(&suffix);
        name
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Sqlite;

impl SqlDialect for Sqlite {
    fn name(&self) -> &'static str {
        "sqlite"
    }

    fn type_table(&self) -> &'static [(&'static str, &'static str)] {
        &[
            ("string", "TEXT"),
            ("wstring", "TEXT"),
            ("char", "TEXT"),
            ("bool", "INTEGER"),
            ("int8", "INTEGER"),
            ("int16", "INTEGER"),
            ("int32", "INTEGER"),
            ("int64", "INTEGER"),
            ("uint8", "INTEGER"),
            ("uint16", "INTEGER"),
            ("uint32", "INTEGER"),
            ("uint64", "INTEGER"),
            ("float", "REAL"),
            ("double", "REAL"),
            ("decimal", "NUMERIC"),
            ("date", "TEXT"),
            ("time", "TEXT"),
            ("datetime", "TEXT"),
            ("uuid", "TEXT"),
            ("bytes", "BLOB"),
            ("unspecified", "TEXT"),
        ]
    }

    fn bounded_types(&self) -> &'static [&'static str] {
        &[]
    }

    fn numeric_types(&self) -> &'static [&'static str] {
        &[]
    }

    fn lob_type(&self, binary: bool) -> &'static str {
        if binary {
            "BLOB"
        } else {
            "TEXT"
        }
    }

    // An INTEGER primary key already aliases the rowid.
    fn identity_spec(&self) -> &'static str {
        ""
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Access;

impl SqlDialect for Access {
    fn name(&self) -> &'static str {
        "access"
    }

    fn type_table(&self) -> &'static [(&'static str, &'static str)] {
        &[
            ("string", "TEXT"),
            ("wstring", "TEXT"),
            ("char", "TEXT(1)"),
            ("bool", "YESNO"),
            ("int8", "BYTE"),
            ("int16", "SHORT"),
            ("int32", "LONG"),
            ("int64", "BIGINT"),
            ("uint8", "BYTE"),
            ("uint16", "LONG"),
            ("uint32", "DECIMAL(10,0)"),
            ("uint64", "DECIMAL(20,0)"),
            ("float", "SINGLE"),
            ("double", "DOUBLE"),
            ("decimal", "DECIMAL"),
            ("date", "DATETIME"),
            ("time", "DATETIME"),
            ("datetime", "DATETIME"),
            ("uuid", "GUID"),
            ("bytes", "LONGBINARY"),
            ("unspecified", "MEMO"),
        ]
    }

    fn bounded_types(&self) -> &'static [&'static str] {
        &["TEXT"]
    }

    fn numeric_types(&self) -> &'static [&'static str] {
        &["DECIMAL"]
    }

    fn lob_type(&self, binary: bool) -> &'static str {
        if binary {
            "LONGBINARY"
        } else {
            "MEMO"
        }
    }

    fn identity_type(&self) -> Option<&'static str> {
        Some("COUNTER")
    }

    fn identity_spec(&self) -> &'static str {
        ""
    }

    fn quote_identifier(&self, identifier: &str) -> String {
        format!("[{}]", identifier)
    }
}
