#![forbid(unsafe_code)]

//! Locale-aware resource handling.
//!
//! # Role in keel
//! `keel-i18n` maps a directory convention onto typed lookups:
//!
//! - [`Locale`] — a language tag limited to language plus optional country
//!   (no script, variant, or extension);
//! - [`I18nFile`] — a scanned file bound to the locale directory it came
//!   from;
//! - [`I18nRepository`] — scans a base directory whose immediate
//!   subdirectories are named by locale tag (or, in single-locale mode, the
//!   base directory itself) and yields `I18nFile`s;
//! - [`I18nPool`] — a name-keyed (optionally locale-keyed) cache filled by
//!   application code iterating a repository.
//!
//! The repository only scans; it never reads file contents. The pool only
//! caches; it never touches the filesystem.

pub mod locale;
pub mod pool;
pub mod repository;

use std::fmt;
use std::io;
use std::path::PathBuf;

pub use locale::Locale;
pub use pool::I18nPool;
pub use repository::{I18nFile, I18nRepository};

/// Errors from locale parsing, repository scans, and pool insertion.
#[derive(Debug)]
pub enum I18nError {
    /// A directory could not be read.
    Io { path: PathBuf, source: io::Error },
    /// A locale tag was not `language` or `language-COUNTRY`.
    InvalidTag(String),
    /// A multi-locale pool was given an entry without a locale.
    LocaleRequired { name: String },
    /// A single-locale pool was given a locale-tagged entry.
    LocaleForbidden { name: String },
}

impl fmt::Display for I18nError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io { path, source } => {
                write!(f, "cannot scan '{}': {source}", path.display())
            }
            Self::InvalidTag(tag) => write!(f, "invalid locale tag '{tag}'"),
            Self::LocaleRequired { name } => {
                write!(f, "entry '{name}' needs a locale in a multi-locale pool")
            }
            Self::LocaleForbidden { name } => {
                write!(f, "entry '{name}' carries a locale in a single-locale pool")
            }
        }
    }
}

impl std::error::Error for I18nError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}
