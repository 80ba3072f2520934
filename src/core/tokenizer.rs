//! Quote-aware reassembly of pre-split command tokens
//!
//! Hosts hand us arguments already split on whitespace. A token starting with `"`
//! opens a quoted span that runs until a later token ending with `"`; the span is
//! rejoined with single spaces into one logical argument.

use tracing::{debug, trace};

const QUOTE: char = '"';

/// Rejoins quoted spans in a raw token array
///
/// The scratch buffer is owned by the instance and cleared on every call, so one
/// instance must not be shared between concurrent callers. `&mut self` enforces that.
#[derive(Debug, Default)]
pub struct Tokenizer {
    buffer: String,
}

impl Tokenizer {
    /// Create a new tokenizer with an empty scratch buffer
    pub fn new() -> Self {
        Self::default()
    }

    /// Turn raw tokens into logical arguments
    ///
    /// If a quote is still open when the input ends, every raw token from the one
    /// that opened it onward is appended unchanged instead of the partial span.
    pub fn tokenize<S: AsRef<str>>(&mut self, raw: &[S]) -> Vec<String> {
        self.buffer.clear();

        let mut result = Vec::with_capacity(raw.len());
        let mut quotation = false;
        let mut opening_result = 0;
        let mut opening_arg = 0;

        for (index, arg) in raw.iter().map(|s| s.as_ref()).enumerate() {
            if quotation {
                self.buffer.push(' ');

                if let Some(head) = arg.strip_suffix(QUOTE) {
                    quotation = false;
                    self.buffer.push_str(head);
                    trace!("Closed quoted argument: {:?}", self.buffer);
                    result.push(std::mem::take(&mut self.buffer));
                } else {
                    self.buffer.push_str(arg);
                }
            } else if let Some(tail) = arg.strip_prefix(QUOTE) {
                quotation = true;
                self.buffer.push_str(tail);
                opening_result = result.len();
                opening_arg = index;
            } else {
                result.push(arg.to_string());
            }
        }

        if quotation {
            debug!(
                "Unterminated quote opened at token {}, falling back to raw tokens",
                opening_arg
            );
            self.buffer.clear();
            result.truncate(opening_result);
            result.extend(raw[opening_arg..].iter().map(|s| s.as_ref().to_string()));
        }

        result
    }
}

/// Tokenize with a fresh scratch buffer
pub fn tokenize<S: AsRef<str>>(raw: &[S]) -> Vec<String> {
    Tokenizer::new().tokenize(raw)
}
