//! Guard clauses for API-boundary preconditions.
//!
//! Every public entry point in the keel crates validates its inputs with
//! these guards and returns the violation to the caller instead of
//! panicking. The guards hand back the validated value so they compose
//! with `?` without a second binding:
//!
//! ```
//! use keel_util::params;
//!
//! fn open(name: &str) -> Result<String, params::ParamError> {
//!     let name = params::not_empty(name, "name")?;
//!     Ok(name.to_owned())
//! }
//!
//! assert!(open("  ").is_err());
//! assert_eq!(open("config").unwrap(), "config");
//! ```

use std::fmt;
use std::time::Duration;

/// A violated precondition, named after the offending parameter.
#[derive(Debug, Clone, PartialEq)]
pub enum ParamError {
    /// The parameter was empty or all-whitespace.
    Empty { name: String },
    /// The parameter fell outside its inclusive bounds.
    OutOfRange { name: String, value: String, lo: String, hi: String },
    /// The parameter was zero where a positive quantity is required.
    Zero { name: String },
}

impl fmt::Display for ParamError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty { name } => write!(f, "parameter '{name}' is empty"),
            Self::OutOfRange { name, value, lo, hi } => {
                write!(f, "parameter '{name}' = {value} outside [{lo}, {hi}]")
            }
            Self::Zero { name } => write!(f, "parameter '{name}' must be positive"),
        }
    }
}

impl std::error::Error for ParamError {}

/// Reject empty or all-whitespace strings.
///
/// Returns the input unchanged (not trimmed) on success.
pub fn not_empty<'a>(value: &'a str, name: &str) -> Result<&'a str, ParamError> {
    if value.trim().is_empty() {
        return Err(ParamError::Empty { name: name.to_owned() });
    }
    Ok(value)
}

/// Inclusive range check.
pub fn in_range<T>(value: T, lo: T, hi: T, name: &str) -> Result<T, ParamError>
where
    T: PartialOrd + fmt::Display,
{
    if value < lo || value > hi {
        return Err(ParamError::OutOfRange {
            name: name.to_owned(),
            value: value.to_string(),
            lo: lo.to_string(),
            hi: hi.to_string(),
        });
    }
    Ok(value)
}

/// Reject the zero duration.
pub fn positive(value: Duration, name: &str) -> Result<Duration, ParamError> {
    if value.is_zero() {
        return Err(ParamError::Zero { name: name.to_owned() });
    }
    Ok(value)
}
