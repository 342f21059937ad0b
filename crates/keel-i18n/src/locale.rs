//! Language/country locale tags.
//!
//! Deliberately narrower than BCP 47: a locale is a language subtag (2–8
//! ASCII letters) with an optional two-letter country, nothing more. That
//! is exactly what the directory convention encodes, and it keeps tag
//! comparison a plain string equality after normalization.

use crate::I18nError;
use std::fmt;
use std::str::FromStr;

/// A normalized `language` or `language-COUNTRY` tag.
///
/// Language is lowercased, country uppercased, so `EN-us`, `en-US`, and
/// `en-us` all parse to the same value.
///
/// ```
/// use keel_i18n::Locale;
///
/// let locale: Locale = "EN-us".parse().unwrap();
/// assert_eq!(locale.to_string(), "en-US");
/// assert_eq!(locale.language(), "en");
/// assert_eq!(locale.country(), Some("US"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Locale {
    language: String,
    country: Option<String>,
}

impl Locale {
    /// Build from parts, validating and normalizing both.
    pub fn new(language: &str, country: Option<&str>) -> Result<Self, I18nError> {
        if !is_language(language) {
            return Err(I18nError::InvalidTag(render(language, country)));
        }
        if let Some(c) = country {
            if !is_country(c) {
                return Err(I18nError::InvalidTag(render(language, country)));
            }
        }
        Ok(Self {
            language: language.to_ascii_lowercase(),
            country: country.map(str::to_ascii_uppercase),
        })
    }

    /// Parse a `language` or `language-COUNTRY` tag.
    pub fn parse(tag: &str) -> Result<Self, I18nError> {
        match tag.split_once('-') {
            Some((language, country)) => Self::new(language, Some(country)),
            None => Self::new(tag, None),
        }
    }

    /// The language subtag, lowercase.
    #[must_use]
    pub fn language(&self) -> &str {
        &self.language
    }

    /// The country subtag, uppercase, if present.
    #[must_use]
    pub fn country(&self) -> Option<&str> {
        self.country.as_deref()
    }

    /// The normalized tag text.
    #[must_use]
    pub fn tag(&self) -> String {
        self.to_string()
    }

    /// This locale with the country dropped (`en-US` → `en`).
    #[must_use]
    pub fn language_only(&self) -> Locale {
        Locale {
            language: self.language.clone(),
            country: None,
        }
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.country {
            Some(country) => write!(f, "{}-{country}", self.language),
            None => write!(f, "{}", self.language),
        }
    }
}

impl FromStr for Locale {
    type Err = I18nError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

fn is_language(s: &str) -> bool {
    (2..=8).contains(&s.len()) && s.chars().all(|c| c.is_ascii_alphabetic())
}

fn is_country(s: &str) -> bool {
    s.len() == 2 && s.chars().all(|c| c.is_ascii_alphabetic())
}

fn render(language: &str, country: Option<&str>) -> String {
    match country {
        Some(c) => format!("{language}-{c}"),
        None => language.to_owned(),
    }
}
