#![forbid(unsafe_code)]

//! keel: application support library.
//!
//! Umbrella crate re-exporting the member crates under stable module
//! names:
//!
//! - [`config`] — the [`Config`] tree with XML and properties loaders,
//!   typed value access, and the explicit [`ConverterRegistry`];
//! - [`i18n`] — locale-tagged resource scanning ([`I18nRepository`]) and
//!   caching ([`I18nPool`]);
//! - [`looper`] — background periodic ([`Looper`]) and one-shot
//!   ([`Timeout`]) workers;
//! - [`util`] — parameter guards, string/file helpers, Base64, and
//!   totally-ordered floats.
//!
//! Depend on the member crates directly when only one subsystem is
//! needed.

pub use keel_config as config;
pub use keel_i18n as i18n;
pub use keel_looper as looper;
pub use keel_util as util;

pub use keel_config::{Config, ConfigError, Configurable, ConverterRegistry, FromValue};
pub use keel_i18n::{I18nPool, I18nRepository, Locale};
pub use keel_looper::{Looper, Timeout};
