//! Loader error type.

use std::fmt;
use std::io;
use std::path::PathBuf;

/// A malformed or semantically invalid configuration source.
///
/// Loaders fail fast: the first problem encountered aborts the build and is
/// surfaced to the caller with the source line where it was detected.
#[derive(Debug)]
pub enum ConfigError {
    /// The source could not be read.
    Io { path: Option<PathBuf>, source: io::Error },
    /// The source text is not well-formed.
    Syntax { line: usize, message: String },
    /// A closing tag did not match the open element.
    MismatchedTag { expected: String, found: String, line: usize },
    /// The same attribute appeared twice on one element.
    DuplicateAttribute { name: String, line: usize },
    /// A `<property>` element or properties-file entry is invalid.
    InvalidProperty { line: usize, message: String },
    /// A `${key}` reference named a system property that is not set.
    UnresolvedVariable { name: String, line: usize },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io { path: Some(path), source } => {
                write!(f, "cannot read '{}': {source}", path.display())
            }
            Self::Io { path: None, source } => write!(f, "read failure: {source}"),
            Self::Syntax { line, message } => write!(f, "syntax error at line {line}: {message}"),
            Self::MismatchedTag { expected, found, line } => {
                write!(f, "mismatched tag at line {line}: expected </{expected}>, found </{found}>")
            }
            Self::DuplicateAttribute { name, line } => {
                write!(f, "duplicate attribute '{name}' at line {line}")
            }
            Self::InvalidProperty { line, message } => {
                write!(f, "invalid property at line {line}: {message}")
            }
            Self::UnresolvedVariable { name, line } => {
                write!(f, "unresolved system property '${{{name}}}' at line {line}")
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl From<io::Error> for ConfigError {
    fn from(source: io::Error) -> Self {
        Self::Io { path: None, source }
    }
}
