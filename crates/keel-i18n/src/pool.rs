//! Name-keyed (optionally locale-keyed) resource cache.
//!
//! # Invariants
//!
//! 1. **Mode is fixed at construction**: a pool is single- or multi-locale
//!    for its whole life; `put` rejects entries that disagree.
//! 2. **The pool never scans**: entries come from application code, usually
//!    iterating an [`I18nRepository`](crate::I18nRepository).
//! 3. **Lookup falls back one step**: `en-US` falls back to `en`, then
//!    gives up. There is no cross-language fallback chain.

use std::collections::HashMap;

use crate::{I18nError, Locale};

/// Two-level (locale → name) or single-level (name) cache of resources.
///
/// # Example
///
/// ```
/// use keel_i18n::{I18nPool, Locale};
///
/// let en = Locale::parse("en").unwrap();
/// let en_us = Locale::parse("en-US").unwrap();
///
/// let mut pool = I18nPool::multi();
/// pool.put(Some(&en), "greeting", "Hello").unwrap();
///
/// // en-US has no entry of its own; falls back to en.
/// assert_eq!(pool.get_localized(&en_us, "greeting"), Some(&"Hello"));
/// assert_eq!(pool.get_localized(&en, "missing"), None);
/// ```
#[derive(Debug, Clone)]
pub struct I18nPool<T> {
    multi: bool,
    default: HashMap<String, T>,
    localized: HashMap<String, HashMap<String, T>>,
}

impl<T> I18nPool<T> {
    /// A pool with no locale level.
    #[must_use]
    pub fn single() -> Self {
        Self {
            multi: false,
            default: HashMap::new(),
            localized: HashMap::new(),
        }
    }

    /// A locale-keyed pool.
    #[must_use]
    pub fn multi() -> Self {
        Self {
            multi: true,
            default: HashMap::new(),
            localized: HashMap::new(),
        }
    }

    /// Whether this pool is locale-keyed.
    #[must_use]
    pub fn is_multi(&self) -> bool {
        self.multi
    }

    /// Insert an entry, returning the replaced value if the name was
    /// already present.
    ///
    /// The locale argument must agree with the pool mode: `Some` for a
    /// multi-locale pool, `None` for a single-locale one.
    pub fn put(
        &mut self,
        locale: Option<&Locale>,
        name: impl Into<String>,
        value: T,
    ) -> Result<Option<T>, I18nError> {
        let name = name.into();
        match (self.multi, locale) {
            (true, Some(locale)) => Ok(self
                .localized
                .entry(locale.tag())
                .or_default()
                .insert(name, value)),
            (false, None) => Ok(self.default.insert(name, value)),
            (true, None) => Err(I18nError::LocaleRequired { name }),
            (false, Some(_)) => Err(I18nError::LocaleForbidden { name }),
        }
    }

    /// Look up by name in the single-locale map.
    ///
    /// In a multi-locale pool this consults no locale and therefore finds
    /// nothing; use [`get_localized`](Self::get_localized).
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&T> {
        self.default.get(name)
    }

    /// Look up by locale and name.
    ///
    /// Tries the exact tag, then the language-only tag. In a single-locale
    /// pool the locale is ignored and the flat map is consulted.
    #[must_use]
    pub fn get_localized(&self, locale: &Locale, name: &str) -> Option<&T> {
        if !self.multi {
            return self.default.get(name);
        }
        if let Some(value) = self.localized.get(&locale.tag()).and_then(|m| m.get(name)) {
            return Some(value);
        }
        if locale.country().is_some() {
            let language = locale.language_only().tag();
            if let Some(value) = self.localized.get(&language).and_then(|m| m.get(name)) {
                return Some(value);
            }
        }
        None
    }

    /// All entry names, sorted and deduplicated across locales.
    #[must_use]
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = if self.multi {
            self.localized
                .values()
                .flat_map(|m| m.keys().cloned())
                .collect()
        } else {
            self.default.keys().cloned().collect()
        };
        names.sort_unstable();
        names.dedup();
        names
    }

    /// Total number of entries across all locales.
    #[must_use]
    pub fn len(&self) -> usize {
        if self.multi {
            self.localized.values().map(HashMap::len).sum()
        } else {
            self.default.len()
        }
    }

    /// Whether the pool holds no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
