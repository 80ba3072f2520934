//! Chained, typed validation of converted arguments
//!
//! Each link in a [`ValidatorChain`] runs one step after the link it depends on
//! succeeds, receiving that link's payload. The first failure short-circuits the
//! rest of the chain and is returned unchanged.

use crate::core::parameter::ArgValue;
use std::fmt;
use std::sync::Arc;
use tracing::trace;

/// A failed validation, carrying the message shown to the user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationFailure {
    pub message: String,
}

impl ValidationFailure {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// Outcome of a validation step: the payload on success
pub type ValidResult<T> = Result<T, ValidationFailure>;

/// One check in a chain
///
/// `In` is the payload of the step this one depends on (`()` for the first
/// step), `Out` is what this step hands to the next. Steps must not mutate shared
/// state; a chain can be evaluated from many threads at once.
pub trait ValidationStep<C, In, Out>: Send + Sync {
    fn validate(&self, context: &C, args: &[ArgValue], upstream: In) -> ValidResult<Out>;
}

impl<C, In, Out, F> ValidationStep<C, In, Out> for F
where
    F: Fn(&C, &[ArgValue], In) -> ValidResult<Out> + Send + Sync,
{
    fn validate(&self, context: &C, args: &[ArgValue], upstream: In) -> ValidResult<Out> {
        self(context, args, upstream)
    }
}

trait Link<C, Out>: Send + Sync {
    fn run(&self, context: &C, args: &[ArgValue]) -> ValidResult<Out>;
}

struct Root<S> {
    step: S,
}

impl<C, Out, S> Link<C, Out> for Root<S>
where
    S: ValidationStep<C, (), Out>,
{
    fn run(&self, context: &C, args: &[ArgValue]) -> ValidResult<Out> {
        self.step.validate(context, args, ())
    }
}

struct Dependent<C, In, S> {
    depends: ValidatorChain<C, In>,
    step: S,
}

impl<C, In, Out, S> Link<C, Out> for Dependent<C, In, S>
where
    S: ValidationStep<C, In, Out>,
{
    fn run(&self, context: &C, args: &[ArgValue]) -> ValidResult<Out> {
        let upstream = self.depends.link.run(context, args)?;
        self.step.validate(context, args, upstream)
    }
}

struct Upcast<C, Narrow> {
    inner: ValidatorChain<C, Narrow>,
}

impl<C, Narrow, Wide> Link<C, Wide> for Upcast<C, Narrow>
where
    Narrow: Into<Wide>,
{
    fn run(&self, context: &C, args: &[ArgValue]) -> ValidResult<Wide> {
        self.inner.link.run(context, args).map(Into::into)
    }
}

/// An immutable chain of validation steps ending in a payload of type `Out`
///
/// Chains are cheap to clone and can be shared as the dependency of several
/// other chains.
pub struct ValidatorChain<C, Out> {
    link: Arc<dyn Link<C, Out>>,
    depth: usize,
}

impl<C, Out> Clone for ValidatorChain<C, Out> {
    fn clone(&self) -> Self {
        Self {
            link: Arc::clone(&self.link),
            depth: self.depth,
        }
    }
}

impl<C, Out> fmt::Debug for ValidatorChain<C, Out> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ValidatorChain")
            .field("depth", &self.depth)
            .finish_non_exhaustive()
    }
}

impl<C: 'static, Out: 'static> ValidatorChain<C, Out> {
    /// Start a chain with a step that depends on nothing
    pub fn new<F>(step: F) -> Self
    where
        F: Fn(&C, &[ArgValue]) -> ValidResult<Out> + Send + Sync + 'static,
    {
        Self::from_step(move |context: &C, args: &[ArgValue], (): ()| step(context, args))
    }

    /// Start a chain with a step implemented as its own type
    pub fn from_step<S>(step: S) -> Self
    where
        S: ValidationStep<C, (), Out> + 'static,
    {
        Self {
            link: Arc::new(Root { step }),
            depth: 1,
        }
    }

    /// Extend the chain with a step fed by this chain's payload
    pub fn then<Next, F>(&self, step: F) -> ValidatorChain<C, Next>
    where
        Next: 'static,
        F: Fn(&C, &[ArgValue], Out) -> ValidResult<Next> + Send + Sync + 'static,
    {
        self.then_step(step)
    }

    /// Extend the chain with a step implemented as its own type
    pub fn then_step<Next, S>(&self, step: S) -> ValidatorChain<C, Next>
    where
        Next: 'static,
        S: ValidationStep<C, Out, Next> + 'static,
    {
        ValidatorChain {
            link: Arc::new(Dependent {
                depends: self.clone(),
                step,
            }),
            depth: self.depth + 1,
        }
    }

    /// View this chain as producing a wider payload type
    ///
    /// Lets a step that expects `V` depend on a chain producing anything
    /// convertible into `V`.
    pub fn upcast<V>(&self) -> ValidatorChain<C, V>
    where
        V: 'static,
        Out: Into<V>,
    {
        ValidatorChain {
            link: Arc::new(Upcast {
                inner: self.clone(),
            }),
            depth: self.depth,
        }
    }

    /// Number of steps in the chain
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Run every step from the head of the chain to this link
    pub fn validate(&self, context: &C, args: &[ArgValue]) -> ValidResult<Out> {
        let result = self.link.run(context, args);
        if let Err(failure) = &result {
            trace!("Validation failed after {} step(s): {}", self.depth, failure);
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct Sender {
        name: &'static str,
        op: bool,
    }

    #[test]
    fn test_single_step() {
        let chain = ValidatorChain::new(|sender: &Sender, _args: &[ArgValue]| {
            if sender.op {
                Ok(sender.name)
            } else {
                Err(ValidationFailure::new("You must be an operator."))
            }
        });

        let op = Sender { name: "alice", op: true };
        let guest = Sender { name: "bob", op: false };
        assert_eq!(chain.validate(&op, &[]), Ok("alice"));
        assert_eq!(
            chain.validate(&guest, &[]).unwrap_err().message,
            "You must be an operator."
        );
    }

    #[test]
    fn test_payload_threads_through_chain() {
        let chain = ValidatorChain::new(|_: &(), args: &[ArgValue]| {
            args.first()
                .and_then(ArgValue::as_int)
                .ok_or_else(|| ValidationFailure::new("missing number"))
        })
        .then(|_, _, n: i64| Ok(n * 2))
        .then(|_, _, n: i64| Ok(format!("result {n}")));

        assert_eq!(chain.depth(), 3);
        assert_eq!(chain.validate(&(), &[ArgValue::Int(21)]), Ok("result 42".to_string()));
        assert_eq!(
            chain.validate(&(), &[]).unwrap_err(),
            ValidationFailure::new("missing number")
        );
    }

    #[test]
    fn test_failure_stops_downstream_steps() {
        let c_calls = Arc::new(AtomicUsize::new(0));
        let counter = c_calls.clone();

        let a = ValidatorChain::new(|_: &(), _: &[ArgValue]| Ok(1u8));
        let b = a.then(|_, _, _: u8| -> ValidResult<u16> { Err(ValidationFailure::new("B failed")) });
        let c = b.then(move |_, _, _: u16| {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok(())
        });

        assert_eq!(c.validate(&(), &[]), Err(ValidationFailure::new("B failed")));
        assert_eq!(c_calls.load(Ordering::SeqCst), 0);
    }

    #[derive(Debug, PartialEq)]
    struct Entity(&'static str);

    struct Player(&'static str);

    impl From<Player> for Entity {
        fn from(player: Player) -> Self {
            Entity(player.0)
        }
    }

    #[test]
    fn test_upcast_feeds_wider_step() {
        let player = ValidatorChain::new(|sender: &Sender, _: &[ArgValue]| Ok(Player(sender.name)));
        let describe = player
            .upcast::<Entity>()
            .then(|_, _, entity: Entity| Ok(format!("entity {}", entity.0)));

        let sender = Sender { name: "carol", op: false };
        assert_eq!(describe.validate(&sender, &[]), Ok("entity carol".to_string()));
    }

    #[test]
    fn test_shared_dependency() {
        let base = ValidatorChain::new(|_: &(), _: &[ArgValue]| Ok(10i32));
        let plus = base.then(|_, _, n: i32| Ok(n + 1));
        let minus = base.then(|_, _, n: i32| Ok(n - 1));

        assert_eq!(plus.validate(&(), &[]), Ok(11));
        assert_eq!(minus.validate(&(), &[]), Ok(9));
        assert_eq!(base.validate(&(), &[]), Ok(10));
    }

    struct AtLeast(i64);

    impl ValidationStep<(), (), i64> for AtLeast {
        fn validate(&self, _: &(), args: &[ArgValue], _: ()) -> ValidResult<i64> {
            let total = args.iter().filter_map(ArgValue::as_int).sum::<i64>();
            if total >= self.0 {
                Ok(total)
            } else {
                Err(ValidationFailure::new(format!("total must be at least {}", self.0)))
            }
        }
    }

    #[test]
    fn test_step_types() {
        let chain = ValidatorChain::from_step(AtLeast(5));
        assert_eq!(chain.validate(&(), &[ArgValue::Int(2), ArgValue::Int(3)]), Ok(5));
        assert!(chain.validate(&(), &[ArgValue::Int(1)]).is_err());
    }
}
