//! Core command machinery
//!
//! Tokenizing, signature matching, validation, markup and completion, plus the
//! command registry that ties them together.

pub mod command;
pub mod completion;
pub mod markup;
pub mod parameter;
pub mod signature;
pub mod tokenizer;
pub mod validator;

pub use command::{Command, CommandForm, CommandRegistry, Dispatch, FormMatch, Response, UsagePages};
pub use completion::{ChainedCompleter, CompletionProvider, DefaultCompleter};
pub use markup::{Color, FormatterRegistry, FormatterRegistryBuilder, MarkupParser, Style, StyledSegment};
pub use parameter::{ArgValue, Converter, ParameterSlot, SlotKind};
pub use signature::{MatchFailure, MatchOutcome, Signature};
pub use tokenizer::{Tokenizer, tokenize};
pub use validator::{ValidResult, ValidationFailure, ValidationStep, ValidatorChain};
