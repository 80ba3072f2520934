//! Configuration management for the command toolkit
//!
//! Centralizes configuration options and provides validation.

use crate::{
    cli::{Args, Command},
    core::markup::FormatterRegistry,
    error::CommandError,
    utils::styles,
};
use serde::{Deserialize, Serialize};
use std::num::NonZeroUsize;

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Enable debug logging
    pub debug: bool,
    /// Usage listing configuration
    pub usage: UsageConfig,
    /// Markup configuration
    pub markup: MarkupConfig,
}

/// Usage listing configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UsageConfig {
    /// Usage entries per page
    pub entries_per_page: usize,
    /// Name of the command built from slot specs
    pub command_name: String,
}

/// Markup configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarkupConfig {
    /// Load the built-in formatters
    pub builtin_formatters: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            debug: false,
            usage: UsageConfig::default(),
            markup: MarkupConfig::default(),
        }
    }
}

impl Default for UsageConfig {
    fn default() -> Self {
        Self {
            entries_per_page: 8,
            command_name: "cmd".to_string(),
        }
    }
}

impl Default for MarkupConfig {
    fn default() -> Self {
        Self {
            builtin_formatters: true,
        }
    }
}

impl Config {
    /// Create configuration from command line arguments
    pub fn from_args(args: &Args) -> Result<Self, CommandError> {
        let mut config = Self {
            debug: args.debug,
            ..Self::default()
        };

        // Override with command-specific options
        match &args.command {
            Command::Match { name, per_page, .. } => {
                if let Some(name) = name {
                    config.usage.command_name = name.clone();
                }
                if let Some(per_page) = per_page {
                    config.usage.entries_per_page = *per_page;
                }
            }
            Command::Complete { name, .. } => {
                if let Some(name) = name {
                    config.usage.command_name = name.clone();
                }
            }
            Command::Render { no_builtins, .. } => {
                config.markup.builtin_formatters = !no_builtins;
            }
            Command::Tokenize { .. } => {}
        }

        config.validate()?;
        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), CommandError> {
        if self.usage.entries_per_page == 0 {
            return Err(CommandError::config("Usage entries per page must be greater than zero"));
        }

        if self.usage.command_name.trim().is_empty() {
            return Err(CommandError::config("Command name cannot be empty"));
        }

        if self.usage.command_name.chars().any(char::is_whitespace) {
            return Err(CommandError::config(format!(
                "Command name cannot contain whitespace: '{}'",
                self.usage.command_name
            )));
        }

        Ok(())
    }

    /// Usage page size
    pub fn entries_per_page(&self) -> Result<NonZeroUsize, CommandError> {
        NonZeroUsize::new(self.usage.entries_per_page)
            .ok_or_else(|| CommandError::config("Usage entries per page must be greater than zero"))
    }

    /// Formatter registry for rendering markup
    pub fn formatters(&self) -> FormatterRegistry {
        if self.markup.builtin_formatters {
            styles::builtin()
        } else {
            FormatterRegistry::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.usage.entries_per_page, 8);
        assert_eq!(config.usage.command_name, "cmd");
        assert!(config.markup.builtin_formatters);
        assert!(config.validate().is_ok());
        assert!(config.formatters().contains("red"));
    }

    #[test]
    fn test_match_overrides() {
        let args = Args::try_parse_from([
            "regcmd", "match", "--slot", "fixed:.*", "--name", "give", "--per-page", "3", "--", "x",
        ])
        .unwrap();
        let config = Config::from_args(&args).unwrap();
        assert_eq!(config.usage.command_name, "give");
        assert_eq!(config.entries_per_page().unwrap().get(), 3);
    }

    #[test]
    fn test_invalid_page_size() {
        let args = Args::try_parse_from(["regcmd", "match", "--slot", "fixed:.*", "--per-page", "0"]).unwrap();
        let err = Config::from_args(&args).unwrap_err();
        assert!(matches!(err, CommandError::Config { .. }));
    }

    #[test]
    fn test_invalid_command_name() {
        let mut config = Config::default();
        config.usage.command_name = "two words".to_string();
        assert!(config.validate().is_err());
        config.usage.command_name = "  ".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_render_without_builtins() {
        let args = Args::try_parse_from(["regcmd", "render", "--no-builtins", "text"]).unwrap();
        let config = Config::from_args(&args).unwrap();
        assert!(config.formatters().is_empty());
    }
}
