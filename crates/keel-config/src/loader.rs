//! Tree builders: XML dialect and flat properties files.
//!
//! # XML semantics
//!
//! - element → [`Config`] node; element attributes → node attributes
//! - `<property name="…" value="…"/>` children → entries in the PARENT
//!   node's flat property map (the property element never becomes a node)
//! - non-blank text content → node value, trimmed
//! - `${key}` in attribute values resolves against process-wide system
//!   properties at parse time; an unset key fails the load; `$${key}`
//!   escapes to a literal `${key}`
//!
//! # Properties semantics
//!
//! `key=value` or `key: value` per line, `#`/`!` comments, trailing-`\`
//! continuation, wrapped as one root node named `properties`.

use std::env;
use std::fs;
use std::path::Path;

use tracing::debug;

use crate::config::Config;
use crate::error::ConfigError;
use crate::xml::{Event, Reader};

/// Build a [`Config`] tree from XML source text.
pub fn load_xml_str(input: &str) -> Result<Config, ConfigError> {
    let mut reader = Reader::new(input);
    let mut stack: Vec<(Config, String)> = Vec::new(); // node + pending text
    let mut root: Option<Config> = None;

    loop {
        match reader.next_event()? {
            Event::Open { name, attributes, self_closing } => {
                if root.is_some() && stack.is_empty() {
                    return Err(ConfigError::Syntax {
                        line: reader.line(),
                        message: "content after the root element".into(),
                    });
                }
                let mut node = Config::new(name).map_err(|e| ConfigError::Syntax {
                    line: reader.line(),
                    message: e.to_string(),
                })?;
                for (attr_name, attr_value) in attributes {
                    let resolved = substitute(&attr_value, reader.line())?;
                    node.set_attribute(attr_name, resolved)
                        .map_err(|e| ConfigError::Syntax {
                            line: reader.line(),
                            message: e.to_string(),
                        })?;
                }
                if self_closing {
                    finish_node(node, &mut stack, &mut root, reader.line())?;
                } else {
                    stack.push((node, String::new()));
                }
            }
            Event::Close { name } => {
                let Some((mut node, text)) = stack.pop() else {
                    return Err(ConfigError::Syntax {
                        line: reader.line(),
                        message: format!("closing tag '</{name}>' without an open element"),
                    });
                };
                if node.name() != name {
                    return Err(ConfigError::MismatchedTag {
                        expected: node.name().to_owned(),
                        found: name,
                        line: reader.line(),
                    });
                }
                node.set_value(text.trim());
                finish_node(node, &mut stack, &mut root, reader.line())?;
            }
            Event::Text(text) => {
                // The reader drops whitespace-only runs, so any event here
                // is real content.
                let Some((_, pending)) = stack.last_mut() else {
                    return Err(ConfigError::Syntax {
                        line: reader.line(),
                        message: "text outside the root element".into(),
                    });
                };
                pending.push_str(&text);
            }
            Event::Eof => break,
        }
    }

    if let Some((node, _)) = stack.last() {
        return Err(ConfigError::Syntax {
            line: reader.line(),
            message: format!("element '<{}>' is never closed", node.name()),
        });
    }
    let root = root.ok_or(ConfigError::Syntax {
        line: reader.line(),
        message: "no root element".into(),
    })?;
    debug!(root = root.name(), children = root.children().len(), "config loaded from xml");
    Ok(root)
}

/// Build a [`Config`] tree from an XML file.
pub fn load_xml_file(path: &Path) -> Result<Config, ConfigError> {
    let input = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: Some(path.to_owned()),
        source,
    })?;
    load_xml_str(&input)
}

/// Attach a completed node to its parent, converting `<property>` elements
/// into parent property-map entries.
fn finish_node(
    node: Config,
    stack: &mut Vec<(Config, String)>,
    root: &mut Option<Config>,
    line: usize,
) -> Result<(), ConfigError> {
    match stack.last_mut() {
        Some((parent, _)) if node.name() == "property" => {
            if !node.children().is_empty() || node.value().is_some() {
                return Err(ConfigError::InvalidProperty {
                    line,
                    message: "property elements carry only name/value attributes".into(),
                });
            }
            let name = node.attribute("name").ok_or(ConfigError::InvalidProperty {
                line,
                message: "missing 'name' attribute".into(),
            })?;
            let value = node.attribute("value").ok_or(ConfigError::InvalidProperty {
                line,
                message: "missing 'value' attribute".into(),
            })?;
            parent
                .set_property(name, value)
                .map_err(|e| ConfigError::InvalidProperty { line, message: e.to_string() })?;
        }
        Some((parent, _)) => parent.add_child(node),
        None => *root = Some(node),
    }
    Ok(())
}

/// Resolve `${key}` references against process-wide system properties.
///
/// `$${key}` produces the literal text `${key}`.
fn substitute(value: &str, line: usize) -> Result<String, ConfigError> {
    if !value.contains('$') {
        return Ok(value.to_owned());
    }

    let mut out = String::with_capacity(value.len());
    let mut rest = value;
    while let Some(at) = rest.find("${") {
        let (before, reference) = rest.split_at(at);
        if before.ends_with('$') {
            // "$${" escape: emit one '$' plus the literal "${…}".
            out.push_str(&before[..before.len() - 1]);
            out.push_str("${");
            rest = &reference[2..];
            match rest.find('}') {
                Some(end) => {
                    out.push_str(&rest[..=end]);
                    rest = &rest[end + 1..];
                }
                None => break,
            }
            continue;
        }
        out.push_str(before);
        let body = &reference[2..];
        let end = body.find('}').ok_or(ConfigError::Syntax {
            line,
            message: "unterminated '${' reference".into(),
        })?;
        let key = &body[..end];
        let resolved = env::var(key).map_err(|_| ConfigError::UnresolvedVariable {
            name: key.to_owned(),
            line,
        })?;
        out.push_str(&resolved);
        rest = &body[end + 1..];
    }
    out.push_str(rest);
    Ok(out)
}

/// Parse flat properties text into a single root node named `properties`.
pub fn load_properties_str(input: &str) -> Result<Config, ConfigError> {
    let mut root = Config::new("properties").map_err(|e| ConfigError::Syntax {
        line: 0,
        message: e.to_string(),
    })?;

    let mut lines = input.lines().enumerate();
    while let Some((index, raw)) = lines.next() {
        let line_no = index + 1;
        let mut logical = raw.trim().to_owned();
        if logical.is_empty() || logical.starts_with('#') || logical.starts_with('!') {
            continue;
        }

        // Trailing backslash joins the next line.
        while logical.ends_with('\\') {
            logical.pop();
            match lines.next() {
                Some((_, continuation)) => logical.push_str(continuation.trim_start()),
                None => break,
            }
        }

        let sep = logical
            .find(['=', ':'])
            .ok_or_else(|| ConfigError::InvalidProperty {
                line: line_no,
                message: format!("missing '=' in '{logical}'"),
            })?;
        let (key, value) = logical.split_at(sep);
        let key = key.trim();
        let value = value[1..].trim();
        root.set_property(key, value)
            .map_err(|e| ConfigError::InvalidProperty { line: line_no, message: e.to_string() })?;
    }

    debug!(entries = root.property_count(), "config loaded from properties");
    Ok(root)
}

/// Parse a flat properties file.
pub fn load_properties_file(path: &Path) -> Result<Config, ConfigError> {
    let input = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: Some(path.to_owned()),
        source,
    })?;
    load_properties_str(&input)
}
