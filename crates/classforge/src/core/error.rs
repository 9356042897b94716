//! Core error types for the generation pipeline
//!
//! Unknown relationship shapes and unknown constraint tokens are tolerated and
//! never surface here.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while building the syntax tree or emitting backend output
#[derive(Error, Debug)]
pub enum GenerationError {
    #[error("Malformed signature '{line}': {message}")]
    MalformedSignature { line: String, message: String },

    #[error("Unsupported target: {name}")]
    UnsupportedTarget { name: String },

    #[error("Unsupported SQL dialect: {name}")]
    UnsupportedDialect { name: String },

    #[error("IO error at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl GenerationError {
    /// Create a new malformed-signature error
    pub fn malformed(line: impl Into<String>, message: impl Into<String>) -> Self {
        Self::MalformedSignature {
            line: line.into(),
            message: message.into(),
        }
    }

    /// Create a new unsupported-target error
    pub fn unsupported_target(name: impl Into<String>) -> Self {
        Self::UnsupportedTarget { name: name.into() }
    }

    /// Create a new unsupported-dialect error
    pub fn unsupported_dialect(name: impl Into<String>) -> Self {
        Self::UnsupportedDialect { name: name.into() }
    }

    /// Wrap an IO failure with the path it happened on
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// True for errors raised while choosing a backend or dialect
    pub fn is_selection_error(&self) -> bool {
        matches!(
            self,
            Self::UnsupportedTarget { .. } | Self::UnsupportedDialect { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_malformed_signature() {
        let error = GenerationError::malformed("+name: int }", "missing opening brace");
        let error_msg = format!("{}", error);
        assert!(error_msg.contains("Malformed signature"));
        assert!(error_msg.contains("+name: int }"));
        assert!(error_msg.contains("missing opening brace"));
    }

    #[test]
    fn test_unsupported_target() {
        let error = GenerationError::unsupported_target("cobol");
        assert_eq!(error.to_string(), "Unsupported target: cobol");
        assert!(error.is_selection_error());
    }

    #[test]
    fn test_unsupported_dialect() {
        let error = GenerationError::unsupported_dialect("db2");
        assert!(error.to_string().contains("db2"));
        assert!(error.is_selection_error());
    }

    #[test]
    fn test_io_error_keeps_path() {
        use std::io;
        let io_err = io::Error::new(io::ErrorKind::PermissionDenied, "denied");
        let error = GenerationError::io("/tmp/out/Person.java", io_err);
        let error_msg = format!("{}", error);
        assert!(error_msg.contains("IO error"));
        assert!(error_msg.contains("Person.java"));
        assert!(error_msg.contains("denied"));
        assert!(!error.is_selection_error());
    }
}
