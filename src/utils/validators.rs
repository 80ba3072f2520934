//! Ready-made validation chains

use crate::core::parameter::ArgValue;
use crate::core::validator::{ValidationFailure, ValidatorChain};
use crate::error::{CommandError, Result};

/// Checks that every argument at `indices` lies within `[min, max]`
///
/// Non-numeric arguments and indices past the end of the argument list fail.
/// At least one index is required.
pub fn range<C: 'static>(min: f64, max: f64, indices: Vec<usize>) -> Result<ValidatorChain<C, ()>> {
    if indices.is_empty() {
        return Err(CommandError::invalid_validator(
            "range needs at least one argument index to check",
        ));
    }

    Ok(ValidatorChain::new(move |_: &C, args: &[ArgValue]| {
        for &index in &indices {
            let Some(value) = args.get(index) else {
                return Err(ValidationFailure::new(format!(
                    "No argument at index '{index}' to check against range '[{min}..{max}]'"
                )));
            };

            let within = value
                .as_number()
                .is_some_and(|n| (min..=max).contains(&n));

            if !within {
                return Err(ValidationFailure::new(format!(
                    "The provided value '{value}' at index '{index}' is not within required range '[{min}..{max}]'"
                )));
            }
        }
        Ok(())
    }))
}

/// Passes the context through when `predicate` holds, otherwise fails with `message`
pub fn require<C, P>(predicate: P, message: impl Into<String>) -> ValidatorChain<C, ()>
where
    C: 'static,
    P: Fn(&C) -> bool + Send + Sync + 'static,
{
    let message = message.into();
    ValidatorChain::new(move |context: &C, _: &[ArgValue]| {
        if predicate(context) {
            Ok(())
        } else {
            Err(ValidationFailure::new(message.clone()))
        }
    })
}
