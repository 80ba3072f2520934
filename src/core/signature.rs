//! Command signatures and the matching algorithms that run over them
//!
//! A [`Signature`] is an ordered list of [`ParameterSlot`]s checked for structural
//! sanity when it is built. [`Signature::matches`] decides whether a token array
//! satisfies it and converts every position; [`Signature::fuzzy_match`] scores
//! partial input for completion.

use crate::core::parameter::{ArgValue, ParameterSlot, SlotKind};
use crate::error::SignatureError;
use std::fmt;
use tracing::{debug, trace};

/// A conversion failure raised while matching
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchFailure {
    /// Index of the slot whose converter failed
    pub slot: usize,
    /// Position in the token array (may exceed the token count for defaults)
    pub position: usize,
    /// User-facing message from the converter
    pub message: String,
}

impl fmt::Display for MatchFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// Result of matching one token array against one signature
#[derive(Debug, Clone, PartialEq)]
pub enum MatchOutcome {
    /// The tokens do not fit this signature; try the next one
    NoMatch,
    /// The tokens fit, but a converter rejected one of them
    Failed(MatchFailure),
    /// Every position matched and converted
    Matched(Vec<ArgValue>),
}

impl MatchOutcome {
    /// True for anything other than [`MatchOutcome::NoMatch`]
    pub fn is_match(&self) -> bool {
        !matches!(self, Self::NoMatch)
    }

    /// The converted values of a successful match
    pub fn values(&self) -> Option<&[ArgValue]> {
        match self {
            Self::Matched(values) => Some(values),
            _ => None,
        }
    }
}

/// An ordered, validated sequence of parameter slots
#[derive(Debug, Clone)]
pub struct Signature {
    slots: Vec<ParameterSlot>,
    required_length: usize,
    has_optional: bool,
    has_vararg: bool,
}

impl Signature {
    /// Build a signature, rejecting ambiguous slot orderings
    ///
    /// A vararg slot must come last, nothing but optional slots may follow an
    /// optional slot, and optional and vararg slots cannot be combined. Every
    /// optional default must also survive its slot's converter.
    pub fn new(slots: Vec<ParameterSlot>) -> Result<Self, SignatureError> {
        let mut required_length = 0;
        let mut has_optional = false;
        let mut vararg_index = None;

        for (index, slot) in slots.iter().enumerate() {
            if let Some(vararg) = vararg_index {
                return Err(SignatureError::VarargNotLast { index: vararg });
            }

            match slot.kind() {
                SlotKind::Optional => has_optional = true,
                SlotKind::Vararg => {
                    if has_optional {
                        return Err(SignatureError::MixedOptionalAndVararg);
                    }
                    vararg_index = Some(index);
                }
                SlotKind::Fixed | SlotKind::Literal => {
                    if has_optional {
                        return Err(SignatureError::OptionalFollowedByRequired { index });
                    }
                    required_length += 1;
                }
            }
        }

        for (index, slot) in slots.iter().enumerate() {
            if let Some(default) = slot.default_value() {
                slot.convert(default)
                    .map_err(|message| SignatureError::DefaultDoesNotConvert {
                        index,
                        default: default.to_string(),
                        message,
                    })?;
            }
        }

        debug!(
            "Built signature with {} slots (required {}, optional {}, vararg {})",
            slots.len(),
            required_length,
            has_optional,
            vararg_index.is_some()
        );

        Ok(Self {
            slots,
            required_length,
            has_optional,
            has_vararg: vararg_index.is_some(),
        })
    }

    /// A signature that only accepts an empty token array
    pub fn empty() -> Self {
        Self {
            slots: Vec::new(),
            required_length: 0,
            has_optional: false,
            has_vararg: false,
        }
    }

    pub fn slots(&self) -> &[ParameterSlot] {
        &self.slots
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Number of fixed and literal slots
    pub fn required_length(&self) -> usize {
        self.required_length
    }

    pub fn has_optional(&self) -> bool {
        self.has_optional
    }

    pub fn has_vararg(&self) -> bool {
        self.has_vararg
    }

    /// Space-separated usage labels of every slot
    pub fn usage(&self) -> String {
        self.slots
            .iter()
            .map(ParameterSlot::usage)
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Slot governing `position`; the last slot repeats past the end
    fn slot_for(&self, position: usize) -> (usize, &ParameterSlot) {
        let index = position.min(self.slots.len() - 1);
        (index, &self.slots[index])
    }

    /// Match and convert a token array
    ///
    /// Missing trailing optional positions take their default value; a vararg
    /// slot with nothing left to consume sees the empty string. Matching stops at
    /// the first rejected token (`NoMatch`) or the first failed conversion.
    pub fn matches<S: AsRef<str>>(&self, tokens: &[S]) -> MatchOutcome {
        if tokens.is_empty() {
            return if self.slots.is_empty() {
                MatchOutcome::Matched(Vec::new())
            } else {
                MatchOutcome::NoMatch
            };
        }

        if tokens.len() < self.required_length
            || (tokens.len() > self.slots.len() && !self.has_vararg)
        {
            trace!(
                "Token count {} outside signature bounds (required {}, slots {})",
                tokens.len(),
                self.required_length,
                self.slots.len()
            );
            return MatchOutcome::NoMatch;
        }

        let iterations = tokens.len().max(self.slots.len());
        let mut values = Vec::with_capacity(iterations);

        for position in 0..iterations {
            let (index, slot) = self.slot_for(position);
            let input = match tokens.get(position) {
                Some(token) => token.as_ref(),
                None => slot.default_value().unwrap_or_default(),
            };

            if !slot.accepts(input) {
                trace!("Token {:?} rejected by slot {}", input, index);
                return MatchOutcome::NoMatch;
            }

            match slot.convert(input) {
                Ok(value) => values.push(value),
                Err(message) => {
                    debug!("Conversion of {:?} failed at slot {}: {}", input, index, message);
                    return MatchOutcome::Failed(MatchFailure {
                        slot: index,
                        position,
                        message,
                    });
                }
            }
        }

        MatchOutcome::Matched(values)
    }

    /// Count the leading tokens this signature accepts
    ///
    /// Scores 0 for an empty signature, or when there are more tokens than
    /// required and no vararg slot to take them.
    pub fn fuzzy_match<S: AsRef<str>>(&self, tokens: &[S]) -> usize {
        if self.slots.is_empty() || (tokens.len() > self.required_length && !self.has_vararg) {
            return 0;
        }

        tokens
            .iter()
            .enumerate()
            .take_while(|(position, token)| self.slot_for(*position).1.accepts(token.as_ref()))
            .count()
    }
}
