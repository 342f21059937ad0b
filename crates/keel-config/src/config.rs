//! The configuration tree node.
//!
//! # Invariants
//!
//! 1. **Name is immutable**: set at construction, never reassigned.
//! 2. **No empty attribute or property values**: setting requires non-empty
//!    text; removal is an explicit operation, not an empty-string write.
//! 3. **Insertion order is preserved**: attributes, properties, and
//!    children iterate in the order they were added.
//!
//! Lifecycle: a loader builds the tree in a single pass, after which it is
//! treated as read-only. `Config` is `Send + Sync`; concurrent mutation is
//! not supported.

use indexmap::IndexMap;
use keel_util::params::{self, ParamError};

use crate::convert::{ConvertError, FromValue};
use crate::error::ConfigError;

/// An XML-like configuration element: name, optional value, ordered
/// attributes, flat properties, and child nodes.
///
/// # Example
///
/// ```
/// use keel_config::Config;
///
/// let mut server = Config::new("server").unwrap();
/// server.set_attribute("port", "8080").unwrap();
/// server.set_property("worker.count", "4").unwrap();
///
/// assert_eq!(server.attribute("port"), Some("8080"));
/// assert_eq!(server.attribute_as::<u16>("port").unwrap(), Some(8080));
/// assert_eq!(server.property_or("worker.count", 1usize).unwrap(), 4);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    name: String,
    value: Option<String>,
    attributes: IndexMap<String, String>,
    properties: IndexMap<String, String>,
    children: Vec<Config>,
}

impl Config {
    /// Create an empty node. The name must be non-blank.
    pub fn new(name: impl Into<String>) -> Result<Self, ParamError> {
        let name = name.into();
        params::not_empty(&name, "name")?;
        Ok(Self {
            name,
            value: None,
            attributes: IndexMap::new(),
            properties: IndexMap::new(),
            children: Vec::new(),
        })
    }

    /// Element name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    // -----------------------------------------------------------------
    // Value
    // -----------------------------------------------------------------

    /// Text content, if any.
    #[must_use]
    pub fn value(&self) -> Option<&str> {
        self.value.as_deref()
    }

    /// Set the text content. Blank input clears it.
    pub fn set_value(&mut self, value: impl Into<String>) {
        let value = value.into();
        if value.trim().is_empty() {
            self.value = None;
        } else {
            self.value = Some(value);
        }
    }

    /// Text content parsed as `T`. `Ok(None)` when there is no value.
    pub fn value_as<T: FromValue>(&self) -> Result<Option<T>, ConvertError> {
        self.value.as_deref().map(T::from_value).transpose()
    }

    // -----------------------------------------------------------------
    // Attributes
    // -----------------------------------------------------------------

    /// Set an attribute. Both name and value must be non-blank; removal is
    /// [`remove_attribute`](Self::remove_attribute), not an empty write.
    pub fn set_attribute(
        &mut self,
        name: impl Into<String>,
        value: impl Into<String>,
    ) -> Result<(), ParamError> {
        let name = name.into();
        let value = value.into();
        params::not_empty(&name, "attribute name")?;
        params::not_empty(&value, "attribute value")?;
        self.attributes.insert(name, value);
        Ok(())
    }

    /// Remove an attribute, returning its previous value.
    pub fn remove_attribute(&mut self, name: &str) -> Option<String> {
        self.attributes.shift_remove(name)
    }

    /// Attribute value by name.
    #[must_use]
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    /// Attribute parsed as `T`. `Ok(None)` when the attribute is absent.
    pub fn attribute_as<T: FromValue>(&self, name: &str) -> Result<Option<T>, ConvertError> {
        self.attribute(name).map(T::from_value).transpose()
    }

    /// Attribute parsed as `T`, or `default` when absent. A present but
    /// unparsable attribute is an error, never silently the default.
    pub fn attribute_or<T: FromValue>(&self, name: &str, default: T) -> Result<T, ConvertError> {
        Ok(self.attribute_as(name)?.unwrap_or(default))
    }

    /// Attribute names in insertion order.
    pub fn attribute_names(&self) -> impl Iterator<Item = &str> {
        self.attributes.keys().map(String::as_str)
    }

    // -----------------------------------------------------------------
    // Properties
    // -----------------------------------------------------------------

    /// Set a flat property. Name and value must be non-blank.
    pub fn set_property(
        &mut self,
        name: impl Into<String>,
        value: impl Into<String>,
    ) -> Result<(), ParamError> {
        let name = name.into();
        let value = value.into();
        params::not_empty(&name, "property name")?;
        params::not_empty(&value, "property value")?;
        self.properties.insert(name, value);
        Ok(())
    }

    /// Property value by name.
    #[must_use]
    pub fn property(&self, name: &str) -> Option<&str> {
        self.properties.get(name).map(String::as_str)
    }

    /// Property parsed as `T`. `Ok(None)` when absent.
    pub fn property_as<T: FromValue>(&self, name: &str) -> Result<Option<T>, ConvertError> {
        self.property(name).map(T::from_value).transpose()
    }

    /// Property parsed as `T`, or `default` when absent.
    pub fn property_or<T: FromValue>(&self, name: &str, default: T) -> Result<T, ConvertError> {
        Ok(self.property_as(name)?.unwrap_or(default))
    }

    /// `(name, value)` property pairs in insertion order.
    pub fn properties(&self) -> impl Iterator<Item = (&str, &str)> {
        self.properties
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Number of flat properties.
    #[must_use]
    pub fn property_count(&self) -> usize {
        self.properties.len()
    }

    // -----------------------------------------------------------------
    // Children
    // -----------------------------------------------------------------

    /// Append a child node.
    pub fn add_child(&mut self, child: Config) {
        self.children.push(child);
    }

    /// All children in document order.
    #[must_use]
    pub fn children(&self) -> &[Config] {
        &self.children
    }

    /// Children with the given element name.
    pub fn children_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Config> {
        self.children.iter().filter(move |c| c.name == name)
    }

    /// First child with the given element name.
    #[must_use]
    pub fn child(&self, name: &str) -> Option<&Config> {
        self.children.iter().find(|c| c.name == name)
    }

    /// Descend through `/`-separated child names, first match at each step.
    ///
    /// ```
    /// use keel_config::load_xml_str;
    ///
    /// let root = load_xml_str("<app><db><pool max=\"8\"/></db></app>").unwrap();
    /// assert_eq!(root.find("db/pool").unwrap().attribute("max"), Some("8"));
    /// assert!(root.find("db/missing").is_none());
    /// ```
    #[must_use]
    pub fn find(&self, path: &str) -> Option<&Config> {
        let mut node = self;
        for segment in keel_util::strings::split(path, '/') {
            node = node.child(segment)?;
        }
        Some(node)
    }
}

/// Implemented by components that take their settings from a [`Config`]
/// subtree.
pub trait Configurable {
    /// Apply the settings under `config` to this component.
    fn configure(&mut self, config: &Config) -> Result<(), ConfigError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn new_rejects_blank_name() {
        assert!(Config::new("").is_err());
        assert!(Config::new("  ").is_err());
        assert!(Config::new("server").is_ok());
    }

    #[test]
    fn attribute_set_get_exact() {
        let mut node = Config::new("node").unwrap();
        node.set_attribute("host", "localhost").unwrap();
        assert_eq!(node.attribute("host"), Some("localhost"));
        assert_eq!(node.attribute("missing"), None);
    }

    #[test]
    fn attribute_rejects_empty_value() {
        let mut node = Config::new("node").unwrap();
        assert!(node.set_attribute("host", "").is_err());
        assert!(node.set_attribute("host", "   ").is_err());
        assert_eq!(node.attribute("host"), None);
    }

    #[test]
    fn remove_attribute_returns_old_value() {
        let mut node = Config::new("node").unwrap();
        node.set_attribute("host", "localhost").unwrap();
        assert_eq!(node.remove_attribute("host"), Some("localhost".into()));
        assert_eq!(node.attribute("host"), None);
        assert_eq!(node.remove_attribute("host"), None);
    }

    #[test]
    fn attributes_keep_insertion_order() {
        let mut node = Config::new("node").unwrap();
        node.set_attribute("zeta", "1").unwrap();
        node.set_attribute("alpha", "2").unwrap();
        node.set_attribute("mid", "3").unwrap();
        let names: Vec<_> = node.attribute_names().collect();
        assert_eq!(names, vec!["zeta", "alpha", "mid"]);
    }

    #[test]
    fn typed_getters_and_defaults() {
        let mut node = Config::new("node").unwrap();
        node.set_attribute("timeout", "2s").unwrap();
        node.set_attribute("retries", "oops").unwrap();

        assert_eq!(
            node.attribute_as::<Duration>("timeout").unwrap(),
            Some(Duration::from_secs(2))
        );
        assert_eq!(node.attribute_or("missing", 7i32).unwrap(), 7);
        // Present but unparsable is an error, not the default.
        assert!(node.attribute_or("retries", 3i32).is_err());
    }

    #[test]
    fn value_blank_clears() {
        let mut node = Config::new("node").unwrap();
        node.set_value("hello");
        assert_eq!(node.value(), Some("hello"));
        node.set_value("  ");
        assert_eq!(node.value(), None);
    }

    #[test]
    fn child_lookup_first_match() {
        let mut root = Config::new("root").unwrap();
        let mut first = Config::new("item").unwrap();
        first.set_attribute("id", "1").unwrap();
        let mut second = Config::new("item").unwrap();
        second.set_attribute("id", "2").unwrap();
        root.add_child(first);
        root.add_child(second);

        assert_eq!(root.child("item").unwrap().attribute("id"), Some("1"));
        assert_eq!(root.children_named("item").count(), 2);
        assert!(root.child("other").is_none());
    }

    #[test]
    fn find_descends_by_path() {
        let mut root = Config::new("root").unwrap();
        let mut db = Config::new("db").unwrap();
        let pool = Config::new("pool").unwrap();
        db.add_child(pool);
        root.add_child(db);

        assert_eq!(root.find("db/pool").unwrap().name(), "pool");
        assert_eq!(root.find("db / pool").unwrap().name(), "pool"); // tokens trimmed
        assert!(root.find("db/pool/deeper").is_none());
        assert_eq!(root.find("").unwrap().name(), "root");
    }
}
