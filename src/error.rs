//! Error types for command matching and markup parsing
//!
//! Structural problems (bad signatures, bad markup, bad configuration) are errors.
//! No-match, conversion failure and validation failure are ordinary outcomes and
//! live in [`crate::core::signature::MatchOutcome`] and
//! [`crate::core::validator::ValidResult`] instead.

use thiserror::Error;

/// Construction-time errors raised while declaring parameter slots and signatures
#[derive(Error, Debug)]
pub enum SignatureError {
    /// A slot pattern failed to compile
    #[error("Invalid slot pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    /// A literal slot was declared with an empty match string
    #[error("Literal slots require a non-empty match string")]
    EmptyLiteral,

    /// An optional slot's default value does not satisfy its own pattern
    #[error("Default value '{default}' does not match slot pattern '{pattern}'")]
    DefaultDoesNotMatch { default: String, pattern: String },

    /// An optional slot's converter rejects its own default value
    #[error("Default value '{default}' of slot {index} fails conversion: {message}")]
    DefaultDoesNotConvert {
        index: usize,
        default: String,
        message: String,
    },

    /// A vararg slot appeared before the end of the signature
    #[error("Vararg slot at index {index} must be the last slot")]
    VarargNotLast { index: usize },

    /// A required slot followed an optional one
    #[error("Slot at index {index} cannot follow an optional slot")]
    OptionalFollowedByRequired { index: usize },

    /// Optional and vararg slots were combined in one signature
    #[error("Optional and vararg slots cannot be mixed in one signature")]
    MixedOptionalAndVararg,
}

impl SignatureError {
    /// Create a new invalid pattern error
    pub fn invalid_pattern(pattern: impl Into<String>, source: regex::Error) -> Self {
        Self::InvalidPattern {
            pattern: pattern.into(),
            source,
        }
    }

    /// Create a new default mismatch error
    pub fn default_does_not_match(default: impl Into<String>, pattern: impl Into<String>) -> Self {
        Self::DefaultDoesNotMatch {
            default: default.into(),
            pattern: pattern.into(),
        }
    }
}

/// Markup syntax error with a short excerpt around the failing character
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message} at index {index}: '{excerpt}'")]
pub struct FormatError {
    /// What went wrong
    pub message: String,
    /// Up to ten characters either side of the failure
    pub excerpt: String,
    /// Character index of the failure
    pub index: usize,
}

impl FormatError {
    const EXCERPT_RADIUS: usize = 10;

    /// Create a new format error, cutting the excerpt out of `input`
    pub fn new(message: impl Into<String>, input: &str, index: usize) -> Self {
        let start = index.saturating_sub(Self::EXCERPT_RADIUS);
        let excerpt = input
            .chars()
            .skip(start)
            .take(index - start + Self::EXCERPT_RADIUS + 1)
            .collect();

        Self {
            message: message.into(),
            excerpt,
            index,
        }
    }
}

/// Main error type for command registration and dispatch
#[derive(Error, Debug)]
pub enum CommandError {
    /// A signature could not be built
    #[error("Signature error: {0}")]
    Signature(#[from] SignatureError),

    /// Command output contained malformed markup
    #[error("Markup error: {0}")]
    Format(#[from] FormatError),

    /// A command name was registered twice
    #[error("A command named '{name}' has already been registered")]
    DuplicateCommand { name: String },

    /// No command is registered under the name
    #[error("No command named '{name}' is registered")]
    UnknownCommand { name: String },

    /// A textual slot description could not be understood
    #[error("Invalid slot spec '{spec}': {message}")]
    InvalidSlotSpec { spec: String, message: String },

    /// A ready-made validator was given unusable parameters
    #[error("Invalid validator: {message}")]
    InvalidValidator { message: String },

    /// Configuration errors
    #[error("Configuration error: {message}")]
    Config { message: String },
}

impl CommandError {
    /// Create a new duplicate command error
    pub fn duplicate_command(name: impl Into<String>) -> Self {
        Self::DuplicateCommand { name: name.into() }
    }

    /// Create a new unknown command error
    pub fn unknown_command(name: impl Into<String>) -> Self {
        Self::UnknownCommand { name: name.into() }
    }

    /// Create a new slot spec error
    pub fn invalid_slot_spec(spec: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidSlotSpec {
            spec: spec.into(),
            message: message.into(),
        }
    }

    /// Create a new invalid validator error
    pub fn invalid_validator(message: impl Into<String>) -> Self {
        Self::InvalidValidator {
            message: message.into(),
        }
    }

    /// Create a new configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }
}

/// Result type alias for convenience
pub type Result<T> = std::result::Result<T, CommandError>;
