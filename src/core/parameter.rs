//! Parameter slots and converted argument values
//!
//! A slot describes one position in a command signature: how an input token is
//! recognised, how it is converted, and what it offers for tab completion.

use crate::error::SignatureError;
use bigdecimal::BigDecimal;
use num_bigint::BigInt;
use num_traits::ToPrimitive;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// A converted argument
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ArgValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    List(Vec<ArgValue>),
    /// Arbitrary-precision integer
    BigInt(BigInt),
    /// Arbitrary-precision decimal
    Decimal(BigDecimal),
}

impl ArgValue {
    /// Borrow the string payload, if this is a string
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Integer payload, if this is an integer
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// Boolean payload, if this is a boolean
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Elements, if this is a list
    pub fn as_list(&self) -> Option<&[ArgValue]> {
        match self {
            Self::List(items) => Some(items),
            _ => None,
        }
    }

    /// Numeric view used for range comparisons
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Int(i) => Some(*i as f64),
            Self::Float(f) => Some(*f),
            Self::BigInt(i) => i.to_f64(),
            Self::Decimal(d) => d.to_f64(),
            _ => None,
        }
    }
}

impl fmt::Display for ArgValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(b) => write!(f, "{b}"),
            Self::Int(i) => write!(f, "{i}"),
            Self::Float(x) => write!(f, "{x}"),
            Self::Str(s) => f.write_str(s),
            Self::BigInt(i) => write!(f, "{i}"),
            Self::Decimal(d) => write!(f, "{d}"),
            Self::List(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{item}")?;
                }
                f.write_str("]")
            }
        }
    }
}

impl From<&str> for ArgValue {
    fn from(value: &str) -> Self {
        Self::Str(value.to_string())
    }
}

impl From<i64> for ArgValue {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

/// Turns one input token into a value, or a user-facing message on failure
pub type Converter = Arc<dyn Fn(&str) -> Result<ArgValue, String> + Send + Sync>;

/// The four kinds of slot a signature can hold
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SlotKind {
    /// Exactly one pattern-matched token
    Fixed,
    /// Exactly one token equal to a fixed word
    Literal,
    /// Zero or more trailing pattern-matched tokens
    Vararg,
    /// Zero or one pattern-matched token, with a default
    Optional,
}

#[derive(Clone)]
enum Rule {
    Pattern { source: String, regex: Regex },
    Exact(String),
}

impl Rule {
    fn pattern(source: &str) -> Result<Self, SignatureError> {
        // Whole-token matching: the pattern must cover the entire input.
        let regex = Regex::new(&format!("^(?:{source})$"))
            .map_err(|e| SignatureError::invalid_pattern(source, e))?;
        Ok(Self::Pattern {
            source: source.to_string(),
            regex,
        })
    }

    fn test(&self, input: &str) -> bool {
        match self {
            Self::Pattern { regex, .. } => regex.is_match(input),
            Self::Exact(word) => word == input,
        }
    }
}

/// One position in a command signature
///
/// Slots are immutable once built. Literal slots only ever carry an exact word,
/// and only optional slots carry a default value.
#[derive(Clone)]
pub struct ParameterSlot {
    kind: SlotKind,
    rule: Rule,
    default_value: Option<String>,
    converter: Option<Converter>,
    static_completions: Vec<String>,
    usage: String,
}

impl ParameterSlot {
    fn with_pattern(kind: SlotKind, pattern: &str, usage: impl Into<String>) -> Result<Self, SignatureError> {
        Ok(Self {
            kind,
            rule: Rule::pattern(pattern)?,
            default_value: None,
            converter: None,
            static_completions: Vec::new(),
            usage: usage.into(),
        })
    }

    /// A single regex-matched argument
    pub fn fixed(pattern: &str, usage: impl Into<String>) -> Result<Self, SignatureError> {
        Self::with_pattern(SlotKind::Fixed, pattern, usage)
    }

    /// Any number of trailing regex-matched arguments
    pub fn vararg(pattern: &str, usage: impl Into<String>) -> Result<Self, SignatureError> {
        Self::with_pattern(SlotKind::Vararg, pattern, usage)
    }

    /// A single regex-matched argument that falls back to `default` when absent
    pub fn optional(
        pattern: &str,
        usage: impl Into<String>,
        default: impl Into<String>,
    ) -> Result<Self, SignatureError> {
        let default = default.into();
        let mut slot = Self::with_pattern(SlotKind::Optional, pattern, usage)?;

        if !slot.rule.test(&default) {
            return Err(SignatureError::default_does_not_match(default, pattern));
        }

        slot.default_value = Some(default);
        Ok(slot)
    }

    /// A single argument that must equal `word` exactly (case-sensitive)
    pub fn literal(word: impl Into<String>) -> Result<Self, SignatureError> {
        let word = word.into();
        if word.is_empty() {
            return Err(SignatureError::EmptyLiteral);
        }

        Ok(Self {
            kind: SlotKind::Literal,
            usage: format!("[{word}]"),
            static_completions: vec![word.clone()],
            rule: Rule::Exact(word),
            default_value: None,
            converter: None,
        })
    }

    /// Attach a converter; without one the token is kept as [`ArgValue::Str`]
    pub fn with_converter<F>(mut self, converter: F) -> Self
    where
        F: Fn(&str) -> Result<ArgValue, String> + Send + Sync + 'static,
    {
        self.converter = Some(Arc::new(converter));
        self
    }

    /// Attach a shared converter
    pub fn with_shared_converter(mut self, converter: Converter) -> Self {
        self.converter = Some(converter);
        self
    }

    /// Replace the static completion options
    pub fn with_completions<I, S>(mut self, completions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.static_completions = completions.into_iter().map(Into::into).collect();
        self
    }

    /// Override the usage label
    pub fn with_usage(mut self, usage: impl Into<String>) -> Self {
        self.usage = usage.into();
        self
    }

    pub fn kind(&self) -> SlotKind {
        self.kind
    }

    /// Default value; always `Some` for optional slots, `None` otherwise
    pub fn default_value(&self) -> Option<&str> {
        self.default_value.as_deref()
    }

    pub fn static_completions(&self) -> &[String] {
        &self.static_completions
    }

    pub fn usage(&self) -> &str {
        &self.usage
    }

    /// Pattern source for regex-matched slots
    pub fn pattern(&self) -> Option<&str> {
        match &self.rule {
            Rule::Pattern { source, .. } => Some(source),
            Rule::Exact(_) => None,
        }
    }

    /// Exact word for literal slots
    pub fn literal_word(&self) -> Option<&str> {
        match &self.rule {
            Rule::Exact(word) => Some(word),
            Rule::Pattern { .. } => None,
        }
    }

    /// Whether `input` is acceptable for this slot
    pub fn accepts(&self, input: &str) -> bool {
        self.rule.test(input)
    }

    /// Run the converter, or wrap the input unchanged when there is none
    pub fn convert(&self, input: &str) -> Result<ArgValue, String> {
        match &self.converter {
            Some(converter) => converter(input),
            None => Ok(ArgValue::Str(input.to_string())),
        }
    }
}

impl fmt::Debug for ParameterSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ParameterSlot")
            .field("kind", &self.kind)
            .field("pattern", &self.pattern())
            .field("literal", &self.literal_word())
            .field("default_value", &self.default_value)
            .field("has_converter", &self.converter.is_some())
            .field("static_completions", &self.static_completions)
            .field("usage", &self.usage)
            .finish()
    }
}
