//! Command-line argument parsing and validation

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Regular Commands - declarative command signatures, validation and markup
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
#[command(name = "regcmd")]
pub struct Args {
    /// Enable debug output
    #[arg(long, global = true)]
    pub debug: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Rejoin quoted arguments and print one per line
    Tokenize {
        /// Raw, whitespace-split arguments
        #[arg(allow_hyphen_values = true)]
        args: Vec<String>,
    },

    /// Match arguments against a signature built from slot specs
    Match {
        /// Slot spec, e.g. `fixed:[0-9]+:int` or `literal:give` (repeatable)
        ///
        /// Converters: string, byte, short, int, long, float, double, bigint, decimal, bool, list, list-int
        #[arg(short = 's', long = "slot", required = true)]
        slots: Vec<String>,

        /// Command name shown in usage
        #[arg(long)]
        name: Option<String>,

        /// Usage entries per page
        #[arg(long = "per-page")]
        per_page: Option<usize>,

        /// Raw arguments to match, after `--`
        #[arg(last = true)]
        args: Vec<String>,
    },

    /// Complete partial arguments against a signature built from slot specs
    Complete {
        /// Slot spec (repeatable)
        #[arg(short = 's', long = "slot", required = true)]
        slots: Vec<String>,

        /// Command name
        #[arg(long)]
        name: Option<String>,

        /// Partial arguments, after `--`
        #[arg(last = true)]
        args: Vec<String>,
    },

    /// Parse markup and print the styled segments
    Render {
        /// Markup text
        #[arg(conflicts_with = "file")]
        text: Option<String>,

        /// Read markup from a file instead
        #[arg(short = 'f', long)]
        file: Option<PathBuf>,

        /// Print only the concatenated text
        #[arg(long)]
        plain: bool,

        /// Do not load the built-in formatters
        #[arg(long = "no-builtins")]
        no_builtins: bool,
    },
}

/// Parse command line arguments
pub fn parse_args() -> Args {
    Args::parse()
}
