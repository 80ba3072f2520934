//! # Regular Commands
//!
//! Declarative handling of command-style input: typed parameter signatures,
//! quote-aware tokenizing, chained validation, a small markup language for
//! styled responses and tab completion.
//!
//! ## Features
//!
//! - Signatures built from fixed, literal, optional and vararg slots
//! - Per-slot conversion into typed [`core::ArgValue`]s
//! - Validator chains that thread a payload from step to step
//! - `>red|bold{text}` markup parsed against a frozen formatter registry
//! - Completion driven by partial signature matches
//!
//! ## Example
//!
//! ```no_run
//! use regular_commands::core::{ParameterSlot, Signature};
//! use regular_commands::utils::converters;
//!
//! let signature = Signature::new(vec![
//!     ParameterSlot::literal("give")?,
//!     ParameterSlot::fixed(r"\d+", "[amount]")?.with_converter(converters::int),
//! ])?;
//! let outcome = signature.matches(&["give", "64"]);
//! println!("{:?}", outcome.values());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod cli;
pub mod config;
pub mod core;
pub mod error;
pub mod utils;

use anyhow::Result;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize logging with appropriate verbosity
///
/// Logs go to stderr; stdout carries command output.
pub fn setup_logging(debug: bool) -> Result<()> {
    let filter = if debug {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .with_level(true)
                .compact(),
        )
        .with(filter)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))?;

    Ok(())
}
