//! Pull parser for the configuration XML dialect.
//!
//! A minimal, deterministic scanner that turns source text into a sequence
//! of events for the tree builder. The dialect covers what configuration
//! files actually use:
//!
//! - elements with double- or single-quoted attributes, self-closing forms
//! - text content
//! - the XML declaration, comments, and `<!…>` markup (all skipped)
//! - the five named entities plus decimal/hex character references
//!
//! Everything else (mismatched quotes, unterminated constructs, duplicate
//! attributes, stray `<`) is a hard [`ConfigError`] with the line where it
//! was detected. There is no recovery mode.

use crate::error::ConfigError;

/// Parser output events.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Event {
    /// An opening tag with its attributes, in document order.
    Open {
        name: String,
        attributes: Vec<(String, String)>,
        self_closing: bool,
    },
    /// A closing tag.
    Close { name: String },
    /// Text between tags, entities decoded. Whitespace-only runs (the
    /// formatting between elements) never surface as events.
    Text(String),
    /// End of input.
    Eof,
}

/// Streaming reader over the source text.
#[derive(Debug)]
pub(crate) struct Reader {
    chars: Vec<char>,
    pos: usize,
    line: usize,
}

impl Reader {
    pub(crate) fn new(input: &str) -> Self {
        Self {
            chars: input.chars().collect(),
            pos: 0,
            line: 1,
        }
    }

    /// Line of the last consumed character (1-based).
    pub(crate) fn line(&self) -> usize {
        self.line
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += 1;
        if c == '\n' {
            self.line += 1;
        }
        Some(c)
    }

    fn starts_with(&self, text: &str) -> bool {
        text.chars()
            .enumerate()
            .all(|(i, c)| self.chars.get(self.pos + i) == Some(&c))
    }

    fn skip_whitespace(&mut self) {
        while self.peek().is_some_and(char::is_whitespace) {
            self.bump();
        }
    }

    fn syntax(&self, message: impl Into<String>) -> ConfigError {
        ConfigError::Syntax {
            line: self.line,
            message: message.into(),
        }
    }

    /// Next event, or [`Event::Eof`] at end of input.
    pub(crate) fn next_event(&mut self) -> Result<Event, ConfigError> {
        loop {
            let Some(c) = self.peek() else {
                return Ok(Event::Eof);
            };

            if c != '<' {
                let text = self.read_text()?;
                if text.trim().is_empty() {
                    continue;
                }
                return Ok(Event::Text(text));
            }

            if self.starts_with("<?") {
                self.skip_until("?>")?;
            } else if self.starts_with("<!--") {
                self.skip_until("-->")?;
            } else if self.starts_with("<!") {
                // DOCTYPE and friends: not modeled, skipped wholesale.
                self.skip_until(">")?;
            } else if self.starts_with("</") {
                return self.read_close();
            } else {
                return self.read_open();
            }
        }
    }

    fn skip_until(&mut self, terminator: &str) -> Result<(), ConfigError> {
        let start_line = self.line;
        while self.pos < self.chars.len() {
            if self.starts_with(terminator) {
                for _ in 0..terminator.chars().count() {
                    self.bump();
                }
                return Ok(());
            }
            self.bump();
        }
        Err(ConfigError::Syntax {
            line: start_line,
            message: format!("unterminated markup, expected '{terminator}'"),
        })
    }

    fn read_text(&mut self) -> Result<String, ConfigError> {
        let mut text = String::new();
        while let Some(c) = self.peek() {
            match c {
                '<' => break,
                '&' => text.push(self.read_entity()?),
                _ => {
                    text.push(c);
                    self.bump();
                }
            }
        }
        Ok(text)
    }

    fn read_close(&mut self) -> Result<Event, ConfigError> {
        self.bump(); // '<'
        self.bump(); // '/'
        let name = self.read_name()?;
        self.skip_whitespace();
        if self.bump() != Some('>') {
            return Err(self.syntax(format!("malformed closing tag '</{name}'")));
        }
        Ok(Event::Close { name })
    }

    fn read_open(&mut self) -> Result<Event, ConfigError> {
        self.bump(); // '<'
        let name = self.read_name()?;
        let mut attributes: Vec<(String, String)> = Vec::new();

        loop {
            self.skip_whitespace();
            match self.peek() {
                Some('>') => {
                    self.bump();
                    return Ok(Event::Open { name, attributes, self_closing: false });
                }
                Some('/') => {
                    self.bump();
                    if self.bump() != Some('>') {
                        return Err(self.syntax("expected '>' after '/'"));
                    }
                    return Ok(Event::Open { name, attributes, self_closing: true });
                }
                Some(_) => {
                    let (attr_name, attr_value) = self.read_attribute()?;
                    if attributes.iter().any(|(n, _)| *n == attr_name) {
                        return Err(ConfigError::DuplicateAttribute {
                            name: attr_name,
                            line: self.line,
                        });
                    }
                    attributes.push((attr_name, attr_value));
                }
                None => return Err(self.syntax(format!("unterminated tag '<{name}'"))),
            }
        }
    }

    fn read_attribute(&mut self) -> Result<(String, String), ConfigError> {
        let name = self.read_name()?;
        self.skip_whitespace();
        if self.bump() != Some('=') {
            return Err(self.syntax(format!("attribute '{name}' is missing '='")));
        }
        self.skip_whitespace();

        let quote = match self.bump() {
            Some(q @ ('"' | '\'')) => q,
            _ => return Err(self.syntax(format!("attribute '{name}' value is not quoted"))),
        };

        let mut value = String::new();
        loop {
            match self.peek() {
                Some(c) if c == quote => {
                    self.bump();
                    return Ok((name, value));
                }
                Some('&') => value.push(self.read_entity()?),
                Some('<') => return Err(self.syntax("'<' inside attribute value")),
                Some(c) => {
                    value.push(c);
                    self.bump();
                }
                None => {
                    return Err(self.syntax(format!("unterminated value for attribute '{name}'")));
                }
            }
        }
    }

    fn read_name(&mut self) -> Result<String, ConfigError> {
        let mut name = String::new();
        match self.peek() {
            Some(c) if c.is_ascii_alphabetic() || c == '_' => {
                name.push(c);
                self.bump();
            }
            _ => return Err(self.syntax("expected an element or attribute name")),
        }
        while let Some(c) = self.peek() {
            if c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.' | ':') {
                name.push(c);
                self.bump();
            } else {
                break;
            }
        }
        Ok(name)
    }

    /// Decode `&…;` at the current position into one character.
    fn read_entity(&mut self) -> Result<char, ConfigError> {
        self.bump(); // '&'
        let mut body = String::new();
        loop {
            match self.bump() {
                Some(';') => break,
                Some(c) if body.len() < 10 => body.push(c),
                _ => return Err(self.syntax("unterminated entity reference")),
            }
        }
        match body.as_str() {
            "amp" => Ok('&'),
            "lt" => Ok('<'),
            "gt" => Ok('>'),
            "quot" => Ok('"'),
            "apos" => Ok('\''),
            _ => {
                let code = if let Some(hex) = body.strip_prefix("#x").or(body.strip_prefix("#X")) {
                    u32::from_str_radix(hex, 16).ok()
                } else if let Some(dec) = body.strip_prefix('#') {
                    dec.parse::<u32>().ok()
                } else {
                    None
                };
                code.and_then(char::from_u32)
                    .ok_or_else(|| self.syntax(format!("unknown entity '&{body};'")))
            }
        }
    }
}
