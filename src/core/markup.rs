//! Markup mini-language for styled command responses
//!
//! Text like `plain >red|bold{warning} text` becomes a list of [`StyledSegment`]s.
//! `>` starts a name specifier, `|` separates formatter names, `{...}` holds the
//! styled text and `\` escapes the next character. Malformed markup is always an
//! error; the parser never guesses.
//!
//! Formatters are looked up in a [`FormatterRegistry`], which is assembled once
//! through [`FormatterRegistryBuilder`] and cannot change afterwards.

use crate::error::FormatError;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, trace};

/// Text colors understood by the built-in formatters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Color {
    Black,
    DarkBlue,
    DarkGreen,
    DarkAqua,
    DarkRed,
    DarkPurple,
    Gold,
    Gray,
    DarkGray,
    Blue,
    Green,
    Aqua,
    Red,
    LightPurple,
    Yellow,
    White,
}

/// Style attributes of one segment
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Style {
    pub color: Option<Color>,
    pub bold: bool,
    pub italic: bool,
    pub underlined: bool,
    pub strikethrough: bool,
    pub obfuscated: bool,
}

/// A named rule that mutates a segment's style
pub type Formatter = Arc<dyn Fn(&mut Style) + Send + Sync>;

/// A run of text with the formatters applied to it, in order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StyledSegment {
    pub text: String,
    /// Formatter names in the order they were applied
    pub formatters: Vec<String>,
    pub style: Style,
}

impl StyledSegment {
    /// An unstyled segment
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }

    pub fn is_plain(&self) -> bool {
        self.formatters.is_empty()
    }
}

impl fmt::Display for StyledSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_plain() {
            write!(f, "{:?}", self.text)
        } else {
            write!(f, "{:?} [{}]", self.text, self.formatters.join(", "))
        }
    }
}

/// Collects formatters before the registry is frozen
#[derive(Default)]
pub struct FormatterRegistryBuilder {
    formatters: HashMap<String, Formatter>,
}

impl FormatterRegistryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a formatter, replacing any earlier one with the same name
    pub fn formatter<F>(mut self, name: impl Into<String>, apply: F) -> Self
    where
        F: Fn(&mut Style) + Send + Sync + 'static,
    {
        let name = name.into();
        if self.formatters.insert(name.clone(), Arc::new(apply)).is_some() {
            debug!("Formatter '{}' replaced", name);
        }
        self
    }

    /// Freeze the registry
    pub fn build(self) -> FormatterRegistry {
        debug!("Formatter registry built with {} entries", self.formatters.len());
        FormatterRegistry {
            formatters: Arc::new(self.formatters),
        }
    }
}

/// Read-only name-to-formatter mapping shared by every parse
#[derive(Clone, Default)]
pub struct FormatterRegistry {
    formatters: Arc<HashMap<String, Formatter>>,
}

impl FormatterRegistry {
    pub fn builder() -> FormatterRegistryBuilder {
        FormatterRegistryBuilder::new()
    }

    pub fn get(&self, name: &str) -> Option<&Formatter> {
        self.formatters.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.formatters.contains_key(name)
    }

    /// Registered names, sorted
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.formatters.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.formatters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.formatters.is_empty()
    }

    /// Parse markup against this registry
    pub fn parse(&self, input: &str) -> Result<Vec<StyledSegment>, FormatError> {
        MarkupParser::new(self).parse(input)
    }
}

impl fmt::Debug for FormatterRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FormatterRegistry")
            .field("names", &self.names())
            .finish()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Plain,
    InName,
    InComponent,
}

/// Per-call parse state; nothing is shared between parses
struct Scan<'a> {
    input: &'a str,
    registry: &'a FormatterRegistry,
    state: State,
    escaping: bool,
    text: String,
    name: String,
    group: Vec<(String, &'a Formatter)>,
    segments: Vec<StyledSegment>,
}

impl<'a> Scan<'a> {
    fn new(input: &'a str, registry: &'a FormatterRegistry) -> Self {
        Self {
            input,
            registry,
            state: State::Plain,
            escaping: false,
            text: String::new(),
            name: String::new(),
            group: Vec::new(),
            segments: Vec::new(),
        }
    }

    fn error(&self, message: impl Into<String>, index: usize) -> FormatError {
        FormatError::new(message, self.input, index)
    }

    fn flush_plain(&mut self) {
        if !self.text.is_empty() {
            let text = std::mem::take(&mut self.text);
            self.segments.push(StyledSegment::plain(text));
        }
    }

    fn resolve_name(&mut self, index: usize) -> Result<(), FormatError> {
        let name = std::mem::take(&mut self.name);
        if name.is_empty() {
            return Err(self.error("Empty formatter name", index));
        }

        match self.registry.get(&name) {
            Some(formatter) => {
                self.group.push((name, formatter));
                Ok(())
            }
            None => Err(self.error(format!("Unknown formatter '{name}'"), index)),
        }
    }

    fn close_group(&mut self) {
        let mut style = Style::default();
        let mut formatters = Vec::with_capacity(self.group.len());

        for (name, apply) in self.group.drain(..) {
            apply(&mut style);
            formatters.push(name);
        }

        trace!("Styled group {:?} with {:?}", self.text, formatters);
        self.segments.push(StyledSegment {
            text: std::mem::take(&mut self.text),
            formatters,
            style,
        });
    }

    fn step(&mut self, index: usize, ch: char) -> Result<(), FormatError> {
        if self.escaping {
            self.escaping = false;
            match self.state {
                State::InName => self.name.push(ch),
                State::Plain | State::InComponent => self.text.push(ch),
            }
            return Ok(());
        }

        match (self.state, ch) {
            (_, '\\') => self.escaping = true,

            (State::Plain, '>') => {
                self.flush_plain();
                self.state = State::InName;
            }
            (State::Plain, '{') => return Err(self.error("Styled group has no formatter name", index)),
            (State::Plain, '}') => return Err(self.error("No open styled group to close", index)),
            (State::Plain, '|') => {
                return Err(self.error("Formatter separator outside of a name specifier", index));
            }
            (State::Plain, c) => self.text.push(c),

            (State::InName, '>') => return Err(self.error("Nested name specifier", index)),
            (State::InName, '{') => {
                self.resolve_name(index)?;
                self.state = State::InComponent;
            }
            (State::InName, '}') => {
                return Err(self.error("Name specifier closed before its styled group opened", index));
            }
            (State::InName, '|') => self.resolve_name(index)?,
            (State::InName, c) => self.name.push(c),

            (State::InComponent, '>') => {
                return Err(self.error("Nested name specifier inside a styled group", index));
            }
            (State::InComponent, '{') => return Err(self.error("Nested styled group", index)),
            (State::InComponent, '}') => {
                self.close_group();
                self.state = State::Plain;
            }
            (State::InComponent, '|') => {
                return Err(self.error("Formatter separator inside a styled group", index));
            }
            (State::InComponent, c) => self.text.push(c),
        }

        Ok(())
    }

    fn finish(mut self, length: usize) -> Result<Vec<StyledSegment>, FormatError> {
        if self.escaping {
            return Err(self.error("Dangling escape character", length.saturating_sub(1)));
        }

        match self.state {
            State::Plain => {
                self.flush_plain();
                Ok(self.segments)
            }
            State::InName => Err(self.error("Unterminated name specifier", length)),
            State::InComponent => Err(self.error("Unterminated styled group", length)),
        }
    }
}

/// Parses markup against a formatter registry
#[derive(Debug, Clone, Copy)]
pub struct MarkupParser<'r> {
    registry: &'r FormatterRegistry,
}

impl<'r> MarkupParser<'r> {
    pub fn new(registry: &'r FormatterRegistry) -> Self {
        Self { registry }
    }

    /// Split `input` into styled segments
    pub fn parse(&self, input: &str) -> Result<Vec<StyledSegment>, FormatError> {
        let mut scan = Scan::new(input, self.registry);
        let mut length = 0;

        for (index, ch) in input.chars().enumerate() {
            scan.step(index, ch)?;
            length = index + 1;
        }

        scan.finish(length)
    }
}
