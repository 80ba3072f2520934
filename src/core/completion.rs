//! Tab completion over candidate signatures
//!
//! Forms whose signature accepts at least one leading token are asked for
//! completions through their [`CompletionProvider`]; the answers are merged in
//! form order without duplicates.

use crate::core::signature::Signature;
use std::sync::Arc;
use tracing::trace;

/// Produces completion options for a (possibly partial) token array
pub trait CompletionProvider<C>: Send + Sync {
    fn complete(&self, context: &C, signature: &Signature, tokens: &[String]) -> Vec<String>;
}

impl<C, F> CompletionProvider<C> for F
where
    F: Fn(&C, &Signature, &[String]) -> Vec<String> + Send + Sync,
{
    fn complete(&self, context: &C, signature: &Signature, tokens: &[String]) -> Vec<String> {
        self(context, signature, tokens)
    }
}

/// Offers the static completions of the slot under the cursor that start with
/// the last token
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultCompleter;

impl<C> CompletionProvider<C> for DefaultCompleter {
    fn complete(&self, _context: &C, signature: &Signature, tokens: &[String]) -> Vec<String> {
        let slots = signature.slots();
        let Some(last) = tokens.last() else {
            return Vec::new();
        };
        if slots.is_empty() {
            return Vec::new();
        }

        let slot = &slots[(slots.len() - 1).min(tokens.len() - 1)];
        slot.static_completions()
            .iter()
            .filter(|option| option.starts_with(last.as_str()))
            .cloned()
            .collect()
    }
}

/// Runs several providers and concatenates their answers in order
pub struct ChainedCompleter<C> {
    providers: Vec<Arc<dyn CompletionProvider<C>>>,
}

impl<C> ChainedCompleter<C> {
    pub fn new() -> Self {
        Self {
            providers: Vec::new(),
        }
    }

    /// Append a provider to the chain
    pub fn then<P>(mut self, provider: P) -> Self
    where
        P: CompletionProvider<C> + 'static,
    {
        self.providers.push(Arc::new(provider));
        self
    }

    pub fn len(&self) -> usize {
        self.providers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }
}

impl<C> Default for ChainedCompleter<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C> CompletionProvider<C> for ChainedCompleter<C> {
    fn complete(&self, context: &C, signature: &Signature, tokens: &[String]) -> Vec<String> {
        self.providers
            .iter()
            .flat_map(|provider| provider.complete(context, signature, tokens))
            .collect()
    }
}

/// Merge the completions of every candidate whose signature fits the input so far
///
/// A candidate is consulted only when its fuzzy score is at least 1. An empty
/// result means there is nothing to offer.
pub fn complete<'a, C, P, I>(context: &C, candidates: I, tokens: &[String]) -> Vec<String>
where
    P: CompletionProvider<C> + ?Sized + 'a,
    I: IntoIterator<Item = (&'a Signature, &'a P)>,
{
    let mut results: Vec<String> = Vec::new();

    for (signature, provider) in candidates {
        let score = signature.fuzzy_match(tokens);
        if score == 0 {
            continue;
        }

        trace!("Completing against '{}' (score {})", signature.usage(), score);
        for option in provider.complete(context, signature, tokens) {
            if !results.contains(&option) {
                results.push(option);
            }
        }
    }

    results
}
