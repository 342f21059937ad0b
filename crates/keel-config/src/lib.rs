#![forbid(unsafe_code)]

//! Configuration tree and loaders.
//!
//! # Role in keel
//! `keel-config` models application configuration as a tree of [`Config`]
//! nodes (name, optional value, ordered attributes, flat properties,
//! children) and populates it from two source formats:
//!
//! - a small XML dialect where elements become nodes, element attributes
//!   become node attributes, nested `<property name=… value=…/>` elements
//!   become flat properties on the parent, and `${key}` references in
//!   attribute values are resolved against process-wide system properties
//!   at parse time;
//! - flat `key=value` properties files, wrapped as a single root node.
//!
//! Typed access goes through [`FromValue`]; applications that need
//! pluggable string-to-value conversion pass a [`ConverterRegistry`]
//! explicitly instead of relying on process-wide state.
//!
//! A tree is built by a loader in a single pass and treated as read-only
//! afterwards; shared (`&Config`) access is safe across threads.

pub mod config;
pub mod convert;
pub mod error;
pub mod loader;
mod xml;

pub use config::{Config, Configurable};
pub use convert::{ConvertError, ConverterRegistry, FromValue};
pub use error::ConfigError;
pub use loader::{load_properties_file, load_properties_str, load_xml_file, load_xml_str};
