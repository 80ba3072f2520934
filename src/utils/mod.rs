//! Ready-made building blocks for commands
//!
//! Converters for common argument types, reusable validators, the built-in
//! formatter set and string helpers for markup and slot specs.

pub mod converters;
pub mod strings;
pub mod styles;
pub mod validators;

pub use strings::{escapify, split_with_escape};
