//! Command implementations for the CLI

use crate::{
    cli::Command,
    config::Config,
    core::{
        command::{self as cmd, CommandForm, CommandRegistry, Dispatch, Response},
        parameter::ParameterSlot,
        signature::Signature,
        tokenizer::Tokenizer,
    },
    error::CommandError,
    utils::{converters, split_with_escape},
};
use anyhow::Context;
use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{debug, info, instrument, warn};

/// Execute the appropriate command based on CLI arguments
#[instrument(skip(config))]
pub fn execute_command(config: &Config, command: &Command) -> anyhow::Result<ExitCode> {
    match command {
        Command::Tokenize { args } => execute_tokenize_command(args),
        Command::Match { slots, args, .. } => execute_match_command(config, slots, args),
        Command::Complete { slots, args, .. } => execute_complete_command(config, slots, args),
        Command::Render { text, file, plain, .. } => {
            execute_render_command(config, text.as_deref(), file.as_ref(), *plain)
        }
    }
}

/// Execute the tokenize command
#[instrument]
fn execute_tokenize_command(args: &[String]) -> anyhow::Result<ExitCode> {
    for token in Tokenizer::new().tokenize(args) {
        println!("{token}");
    }
    Ok(ExitCode::SUCCESS)
}

/// Execute the match command
#[instrument(skip(config))]
fn execute_match_command(config: &Config, specs: &[String], args: &[String]) -> anyhow::Result<ExitCode> {
    let registry = build_registry(config, specs)?;
    let name = &config.usage.command_name;

    let dispatch = registry
        .execute(name, &(), args)
        .with_context(|| format!("Failed to run '{name}'"))?;

    match dispatch {
        Dispatch::Usage(page) => {
            warn!("Arguments do not match the signature of '{}'", name);
            println!("{page}");
            Ok(ExitCode::FAILURE)
        }
        Dispatch::Responses(responses) => {
            let mut code = ExitCode::SUCCESS;
            for response in responses {
                match response {
                    Response::Output(segments) => {
                        for segment in segments {
                            println!("{}", segment.text);
                        }
                    }
                    Response::ConversionFailed(failure) => {
                        eprintln!("{failure}");
                        code = ExitCode::FAILURE;
                    }
                    Response::Invalid(failure) => {
                        eprintln!("{failure}");
                        code = ExitCode::FAILURE;
                    }
                    Response::Denied => {
                        eprintln!("Permission denied");
                        code = ExitCode::FAILURE;
                    }
                }
            }
            Ok(code)
        }
    }
}

/// Execute the complete command
#[instrument(skip(config))]
fn execute_complete_command(config: &Config, specs: &[String], args: &[String]) -> anyhow::Result<ExitCode> {
    let registry = build_registry(config, specs)?;
    let name = &config.usage.command_name;

    let completions = registry
        .complete(name, &(), args)
        .with_context(|| format!("Failed to complete '{name}'"))?;

    debug!("{} completion(s)", completions.len());
    for option in completions {
        println!("{option}");
    }
    Ok(ExitCode::SUCCESS)
}

/// Execute the render command
#[instrument(skip(config))]
fn execute_render_command(
    config: &Config,
    text: Option<&str>,
    file: Option<&PathBuf>,
    plain: bool,
) -> anyhow::Result<ExitCode> {
    let markup = match (text, file) {
        (Some(text), _) => text.to_string(),
        (None, Some(path)) => fs::read_to_string(path)
            .with_context(|| format!("Failed to read markup from {}", path.display()))?,
        (None, None) => anyhow::bail!("Either TEXT or --file is required"),
    };
    let markup = markup.trim_end_matches(['\r', '\n']);

    let formatters = config.formatters();
    info!("Rendering with {} formatter(s)", formatters.len());

    let segments = formatters
        .parse(markup)
        .context("Failed to render markup")?;

    if plain {
        let text: String = segments.iter().map(|segment| segment.text.as_str()).collect();
        println!("{text}");
    } else {
        for segment in &segments {
            println!("{segment}");
        }
    }

    Ok(ExitCode::SUCCESS)
}

/// Build a one-command registry whose single form uses the given slot specs
fn build_registry(config: &Config, specs: &[String]) -> anyhow::Result<CommandRegistry<()>> {
    let slots = specs
        .iter()
        .map(|spec| parse_slot_spec(spec))
        .collect::<Result<Vec<_>, _>>()
        .context("Failed to parse slot specs")?;

    let signature = Signature::new(slots).context("Failed to build signature")?;
    info!("Signature: {}", signature.usage());

    let form = CommandForm::new("", signature).executes_unchecked(|_: &(), values| {
        Some(values.iter().map(ToString::to_string).collect::<Vec<_>>().join("\n"))
    });

    let mut registry = CommandRegistry::new(config.formatters());
    registry.register(
        cmd::Command::new(config.usage.command_name.clone())
            .with_entries_per_page(config.entries_per_page()?)
            .form(form),
    )?;

    Ok(registry)
}

/// Parse one slot spec
///
/// `literal:WORD`, `fixed:PATTERN[:CONVERTER[:COMPLETIONS]]`,
/// `vararg:PATTERN[:CONVERTER[:COMPLETIONS]]` or
/// `optional:PATTERN:CONVERTER:DEFAULT[:COMPLETIONS]`. Fields split on `:`, a
/// backslash makes the next character literal and completions are comma-separated.
pub fn parse_slot_spec(spec: &str) -> Result<ParameterSlot, CommandError> {
    let parts = split_with_escape(spec, ':', '\\')
        .ok_or_else(|| CommandError::invalid_slot_spec(spec, "delimiter and escape overlap"))?;

    let Some((kind, fields)) = parts.split_first() else {
        return Err(CommandError::invalid_slot_spec(spec, "empty spec"));
    };

    let too_many = |max: usize| {
        CommandError::invalid_slot_spec(spec, format!("'{kind}' takes at most {max} field(s)"))
    };

    let slot = match kind.as_str() {
        "literal" => match fields {
            [word] => ParameterSlot::literal(word.as_str())?,
            [] => return Err(CommandError::invalid_slot_spec(spec, "missing literal word")),
            _ => return Err(too_many(1)),
        },
        "fixed" | "vararg" => {
            let [pattern, rest @ ..] = fields else {
                return Err(CommandError::invalid_slot_spec(spec, "missing pattern"));
            };
            if rest.len() > 2 {
                return Err(too_many(3));
            }

            let converter = rest.first().map(String::as_str).unwrap_or("string");
            let usage = format!("[{converter}]");
            let slot = if kind == "fixed" {
                ParameterSlot::fixed(pattern, usage)?
            } else {
                ParameterSlot::vararg(pattern, format!("{usage}..."))?
            };
            with_completions(with_converter(spec, slot, converter)?, rest.get(1))
        }
        "optional" => {
            let [pattern, converter, default, rest @ ..] = fields else {
                return Err(CommandError::invalid_slot_spec(
                    spec,
                    "optional slots need a pattern, a converter and a default",
                ));
            };
            if rest.len() > 1 {
                return Err(too_many(4));
            }

            let slot = ParameterSlot::optional(pattern, format!("[{converter}={default}]"), default.as_str())?;
            with_completions(with_converter(spec, slot, converter)?, rest.first())
        }
        other => {
            return Err(CommandError::invalid_slot_spec(spec, format!("unknown slot kind '{other}'")));
        }
    };

    debug!("Parsed slot spec '{}' as {:?}", spec, slot);
    Ok(slot)
}

fn with_converter(spec: &str, slot: ParameterSlot, name: &str) -> Result<ParameterSlot, CommandError> {
    let converter = converters::by_name(name)
        .ok_or_else(|| CommandError::invalid_slot_spec(spec, format!("unknown converter '{name}'")))?;
    Ok(slot.with_shared_converter(converter))
}

fn with_completions(slot: ParameterSlot, completions: Option<&String>) -> ParameterSlot {
    match completions {
        Some(list) => slot.with_completions(list.split(',').filter(|option| !option.is_empty())),
        None => slot,
    }
}
