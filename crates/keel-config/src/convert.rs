//! String-to-value conversion.
//!
//! [`FromValue`] is the compile-time conversion seam used by the typed
//! `Config` getters. [`ConverterRegistry`] is the runtime counterpart for
//! applications that select conversions dynamically; it is an explicitly
//! constructed and explicitly passed type-map, never process-wide state.

use std::any::{Any, TypeId, type_name};
use std::collections::HashMap;
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

/// Conversion failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConvertError {
    /// The raw text does not parse as the target type.
    Parse { target: &'static str, raw: String, message: String },
    /// No converter is registered for the target type.
    NoConverter { target: &'static str },
}

impl fmt::Display for ConvertError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Parse { target, raw, message } => {
                write!(f, "cannot convert '{raw}' to {target}: {message}")
            }
            Self::NoConverter { target } => write!(f, "no converter registered for {target}"),
        }
    }
}

impl std::error::Error for ConvertError {}

fn parse_error<T>(raw: &str, message: impl Into<String>) -> ConvertError {
    ConvertError::Parse {
        target: type_name::<T>(),
        raw: raw.to_owned(),
        message: message.into(),
    }
}

/// Types constructible from a configuration string.
pub trait FromValue: Sized {
    /// Parse the raw configuration text.
    fn from_value(raw: &str) -> Result<Self, ConvertError>;
}

impl FromValue for String {
    fn from_value(raw: &str) -> Result<Self, ConvertError> {
        Ok(raw.to_owned())
    }
}

impl FromValue for PathBuf {
    fn from_value(raw: &str) -> Result<Self, ConvertError> {
        Ok(PathBuf::from(raw))
    }
}

impl FromValue for char {
    fn from_value(raw: &str) -> Result<Self, ConvertError> {
        let mut chars = raw.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Ok(c),
            _ => Err(parse_error::<char>(raw, "expected exactly one character")),
        }
    }
}

impl FromValue for bool {
    fn from_value(raw: &str) -> Result<Self, ConvertError> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "true" | "yes" | "on" | "1" => Ok(true),
            "false" | "no" | "off" | "0" => Ok(false),
            _ => Err(parse_error::<bool>(raw, "expected true/false, yes/no, on/off, or 1/0")),
        }
    }
}

macro_rules! from_value_via_from_str {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl FromValue for $ty {
                fn from_value(raw: &str) -> Result<Self, ConvertError> {
                    raw.trim()
                        .parse::<$ty>()
                        .map_err(|e| parse_error::<$ty>(raw, e.to_string()))
                }
            }
        )+
    };
}

from_value_via_from_str!(i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize, f32, f64);

impl FromValue for Duration {
    /// Integer with an optional `ms`/`s`/`m`/`h` suffix; a bare integer is
    /// milliseconds.
    fn from_value(raw: &str) -> Result<Self, ConvertError> {
        let text = raw.trim();
        let split = text
            .find(|c: char| c.is_ascii_alphabetic())
            .unwrap_or(text.len());
        let (digits, suffix) = text.split_at(split);
        let amount: u64 = digits
            .trim()
            .parse()
            .map_err(|_| parse_error::<Duration>(raw, "expected an integer amount"))?;
        match suffix {
            "" | "ms" => Ok(Duration::from_millis(amount)),
            "s" => Ok(Duration::from_secs(amount)),
            "m" => Ok(Duration::from_secs(amount * 60)),
            "h" => Ok(Duration::from_secs(amount * 3600)),
            _ => Err(parse_error::<Duration>(raw, "expected ms, s, m, or h suffix")),
        }
    }
}

type ConvertFn = Box<dyn Fn(&str) -> Result<Box<dyn Any>, ConvertError> + Send + Sync>;

/// Runtime converter registry, keyed by target [`TypeId`].
///
/// The registry replaces a global converter table: callers construct one,
/// register what they need, and pass it down explicitly.
///
/// # Example
///
/// ```
/// use keel_config::ConverterRegistry;
///
/// let registry = ConverterRegistry::with_defaults();
/// let port: u16 = registry.convert("8080").unwrap();
/// assert_eq!(port, 8080);
/// ```
#[derive(Default)]
pub struct ConverterRegistry {
    converters: HashMap<TypeId, ConvertFn>,
}

impl ConverterRegistry {
    /// An empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self { converters: HashMap::new() }
    }

    /// A registry pre-loaded with every [`FromValue`] implementation in
    /// this crate.
    #[must_use]
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register_from_value::<String>();
        registry.register_from_value::<PathBuf>();
        registry.register_from_value::<char>();
        registry.register_from_value::<bool>();
        registry.register_from_value::<i8>();
        registry.register_from_value::<i16>();
        registry.register_from_value::<i32>();
        registry.register_from_value::<i64>();
        registry.register_from_value::<i128>();
        registry.register_from_value::<isize>();
        registry.register_from_value::<u8>();
        registry.register_from_value::<u16>();
        registry.register_from_value::<u32>();
        registry.register_from_value::<u64>();
        registry.register_from_value::<u128>();
        registry.register_from_value::<usize>();
        registry.register_from_value::<f32>();
        registry.register_from_value::<f64>();
        registry.register_from_value::<Duration>();
        registry
    }

    /// Register a converter for `T`, replacing any previous one.
    pub fn register<T, F>(&mut self, convert: F)
    where
        T: 'static,
        F: Fn(&str) -> Result<T, ConvertError> + Send + Sync + 'static,
    {
        self.converters.insert(
            TypeId::of::<T>(),
            Box::new(move |raw| convert(raw).map(|v| Box::new(v) as Box<dyn Any>)),
        );
    }

    /// Register `T`'s [`FromValue`] implementation.
    pub fn register_from_value<T: FromValue + 'static>(&mut self) {
        self.register::<T, _>(T::from_value);
    }

    /// Whether a converter for `T` is registered.
    #[must_use]
    pub fn contains<T: 'static>(&self) -> bool {
        self.converters.contains_key(&TypeId::of::<T>())
    }

    /// Convert `raw` to `T` using the registered converter.
    pub fn convert<T: 'static>(&self, raw: &str) -> Result<T, ConvertError> {
        let convert = self
            .converters
            .get(&TypeId::of::<T>())
            .ok_or(ConvertError::NoConverter { target: type_name::<T>() })?;
        let boxed = convert(raw)?;
        match boxed.downcast::<T>() {
            Ok(value) => Ok(*value),
            // A converter registered under T's TypeId always yields a T.
            Err(_) => unreachable!("converter produced a foreign type"),
        }
    }
}

impl fmt::Debug for ConverterRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConverterRegistry")
            .field("registered", &self.converters.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bool_accepts_the_usual_spellings() {
        for raw in ["true", "TRUE", "yes", "on", "1"] {
            assert_eq!(bool::from_value(raw).unwrap(), true, "{raw}");
        }
        for raw in ["false", "No", "off", "0"] {
            assert_eq!(bool::from_value(raw).unwrap(), false, "{raw}");
        }
        assert!(bool::from_value("maybe").is_err());
    }

    #[test]
    fn integers_trim_whitespace() {
        assert_eq!(i32::from_value(" 42 ").unwrap(), 42);
        assert!(u8::from_value("300").is_err());
    }

    #[test]
    fn duration_suffixes() {
        assert_eq!(Duration::from_value("250").unwrap(), Duration::from_millis(250));
        assert_eq!(Duration::from_value("250ms").unwrap(), Duration::from_millis(250));
        assert_eq!(Duration::from_value("3s").unwrap(), Duration::from_secs(3));
        assert_eq!(Duration::from_value("2m").unwrap(), Duration::from_secs(120));
        assert_eq!(Duration::from_value("1h").unwrap(), Duration::from_secs(3600));
        assert!(Duration::from_value("5d").is_err());
        assert!(Duration::from_value("fast").is_err());
    }

    #[test]
    fn char_requires_single_character() {
        assert_eq!(char::from_value(";").unwrap(), ';');
        assert!(char::from_value("ab").is_err());
        assert!(char::from_value("").is_err());
    }

    #[test]
    fn registry_converts_defaults() {
        let registry = ConverterRegistry::with_defaults();
        assert_eq!(registry.convert::<u16>("8080").unwrap(), 8080);
        assert_eq!(registry.convert::<bool>("on").unwrap(), true);
        assert!(registry.contains::<Duration>());
    }

    #[test]
    fn registry_reports_missing_converter() {
        #[derive(Debug)]
        struct Custom;
        let registry = ConverterRegistry::with_defaults();
        let err = registry.convert::<Custom>("x").unwrap_err();
        assert!(matches!(err, ConvertError::NoConverter { .. }));
    }

    #[test]
    fn registry_accepts_custom_converter() {
        #[derive(Debug, PartialEq)]
        struct Percent(u8);

        let mut registry = ConverterRegistry::new();
        registry.register::<Percent, _>(|raw| {
            let digits = raw.strip_suffix('%').unwrap_or(raw);
            let n = u8::from_value(digits)?;
            Ok(Percent(n))
        });

        assert_eq!(registry.convert::<Percent>("75%").unwrap(), Percent(75));
    }
}
