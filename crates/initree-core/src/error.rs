//! Error types for initree
//!
//! Errors are structured: each carries the source identifier and the
//! offending line where available, plus an actionable help message.
//! Callers are expected to surface the Display output verbatim.

use std::fmt;

/// Result type alias for initree operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for initree operations
#[derive(Debug, Clone)]
pub struct Error {
    /// The kind of error that occurred
    pub kind: ErrorKind,
    /// Dotted option path involved, when known (e.g. "solver.type")
    pub path: Option<String>,
    /// Source identifier (usually a file path) the input came from
    pub source: Option<String>,
    /// The offending input line, verbatim
    pub line: Option<String>,
    /// Actionable help message
    pub help: Option<String>,
    /// Underlying cause (as string for Clone compatibility)
    pub cause: Option<String>,
}

/// Categories of errors that can occur
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    /// The configuration source could not be opened or read
    ConfigNotFound,
    /// A line opens a section header without a matching ']'
    MalformedSection,
    /// A section header whose name is empty after trimming
    MissingSectionName,
    /// A key/value line whose key or value is empty after trimming
    EmptyKeyOrValue,
    /// An option was requested that is not in the store
    OptionNotFound,
    /// Type coercion failed
    TypeCoercion,
}

impl Error {
    /// Create an error for a configuration source that could not be opened
    pub fn config_not_found(source: impl Into<String>) -> Self {
        let src = source.into();
        Self {
            kind: ErrorKind::ConfigNotFound,
            path: None,
            source: Some(src.clone()),
            line: None,
            help: Some(format!("Check that '{}' exists and is readable", src)),
            cause: None,
        }
    }

    /// Create an error for a section header missing its closing bracket
    pub fn malformed_section(source: impl Into<String>, line: impl Into<String>) -> Self {
        Self {
            kind: ErrorKind::MalformedSection,
            path: None,
            source: Some(source.into()),
            line: Some(line.into()),
            help: Some("Close the section header with ']'".into()),
            cause: None,
        }
    }

    /// Create an error for a section header with no name between the brackets
    pub fn missing_section_name(source: impl Into<String>, line: impl Into<String>) -> Self {
        Self {
            kind: ErrorKind::MissingSectionName,
            path: None,
            source: Some(source.into()),
            line: Some(line.into()),
            help: Some("Give the section a name, e.g. [solver]".into()),
            cause: None,
        }
    }

    /// Create an error for a key/value line with an empty key or value
    pub fn empty_key_or_value(line: impl Into<String>) -> Self {
        Self {
            kind: ErrorKind::EmptyKeyOrValue,
            path: None,
            source: None,
            line: Some(line.into()),
            help: Some("Write the line as 'key = value', or a bare 'flag'".into()),
            cause: None,
        }
    }

    /// Create an option not found error
    pub fn option_not_found(path: impl Into<String>) -> Self {
        let p = path.into();
        Self {
            kind: ErrorKind::OptionNotFound,
            path: Some(p.clone()),
            source: None,
            line: None,
            help: Some(format!("Check that '{}' is set in the configuration", p)),
            cause: None,
        }
    }

    /// Create a type coercion error
    pub fn type_coercion(
        path: impl Into<String>,
        expected: impl Into<String>,
        got: impl Into<String>,
    ) -> Self {
        Self {
            kind: ErrorKind::TypeCoercion,
            path: Some(path.into()),
            source: None,
            line: None,
            help: Some(format!(
                "Ensure the value can be converted to {}",
                expected.into()
            )),
            cause: Some(format!("Got: {}", got.into())),
        }
    }

    /// Add the source identifier to the error
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    /// Add an underlying cause to the error
    pub fn with_cause(mut self, cause: impl Into<String>) -> Self {
        self.cause = Some(cause.into());
        self
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Main error message
        match &self.kind {
            ErrorKind::ConfigNotFound => {
                write!(f, "Options file not found")?;
                if let Some(source) = &self.source {
                    write!(f, ": {}", source)?;
                }
            }
            ErrorKind::MalformedSection => write!(f, "Missing ']' in section header")?,
            ErrorKind::MissingSectionName => write!(f, "Missing section name")?,
            ErrorKind::EmptyKeyOrValue => write!(f, "Empty key or value")?,
            ErrorKind::OptionNotFound => {
                write!(f, "Option not found")?;
                if let Some(path) = &self.path {
                    write!(f, ": {}", path)?;
                }
            }
            ErrorKind::TypeCoercion => write!(f, "Type coercion failed")?,
        }

        // Path context (skip where it is already part of the headline)
        if let Some(path) = &self.path {
            if self.kind != ErrorKind::OptionNotFound {
                write!(f, "\n  Path: {}", path)?;
            }
        }

        // Source context
        if let Some(source) = &self.source {
            if self.kind != ErrorKind::ConfigNotFound {
                write!(f, "\n  File: {}", source)?;
            }
        }

        // Offending line
        if let Some(line) = &self.line {
            write!(f, "\n  Line: {}", line)?;
        }

        // Cause
        if let Some(cause) = &self.cause {
            write!(f, "\n  {}", cause)?;
        }

        // Help
        if let Some(help) = &self.help {
            write!(f, "\n  Help: {}", help)?;
        }

        Ok(())
    }
}

impl std::error::Error for Error {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_not_found_display() {
        let err = Error::config_not_found("BOUT.inp");
        let display = format!("{}", err);

        assert!(display.contains("Options file not found: BOUT.inp"));
        assert!(display.contains("Help:"));
        assert!(display.contains("exists and is readable"));
    }

    #[test]
    fn test_malformed_section_display() {
        let err = Error::malformed_section("data/run.ini", "[solver");
        let display = format!("{}", err);

        assert!(display.contains("Missing ']'"));
        assert!(display.contains("File: data/run.ini"));
        assert!(display.contains("Line: [solver"));
    }

    #[test]
    fn test_missing_section_name_display() {
        let err = Error::missing_section_name("run.ini", "[]");
        let display = format!("{}", err);

        assert!(display.contains("Missing section name"));
        assert!(display.contains("Line: []"));
    }

    #[test]
    fn test_empty_key_or_value_carries_line() {
        let err = Error::empty_key_or_value("a=");

        assert_eq!(err.kind, ErrorKind::EmptyKeyOrValue);
        assert_eq!(err.line, Some("a=".into()));
        assert!(err.source.is_none());

        let display = format!("{}", err);
        assert!(display.contains("Empty key or value"));
        assert!(display.contains("Line: a="));
    }

    #[test]
    fn test_option_not_found_display() {
        let err = Error::option_not_found("solver.type");
        let display = format!("{}", err);

        assert!(display.contains("Option not found: solver.type"));
        assert!(display.contains("Help:"));
    }

    #[test]
    fn test_type_coercion_display() {
        let err = Error::type_coercion("mesh.nx", "integer", "string (\"lots\")");
        let display = format!("{}", err);

        assert!(display.contains("Type coercion failed"));
        assert!(display.contains("Path: mesh.nx"));
        assert!(display.contains("Got: string (\"lots\")"));
    }

    #[test]
    fn test_with_cause() {
        let err = Error::config_not_found("run.ini").with_cause("permission denied");
        let display = format!("{}", err);

        assert!(display.contains("permission denied"));
    }
}
