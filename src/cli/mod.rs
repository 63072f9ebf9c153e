//! Command-line interface for program-options
//!
//! Parses the command-line layer, loads the optional config file layer,
//! resolves both and prints the result.

use anyhow::{Context, Result};
use clap::error::ErrorKind;
use clap::{Arg, ArgAction, ArgMatches, Command, CommandFactory, FromArgMatches, Parser, ValueEnum};
use std::ffi::OsString;
use std::path::PathBuf;
use tracing::Level;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::config::{parse_config_file, resolve};
use crate::domain::{OptionId, OptionValue, PartialConfig};
use crate::error::ParseError;
use crate::render::{render_json, report};

/// Resolve options from the command line and a configuration file
#[derive(Parser, Debug)]
#[command(name = "program-options")]
#[command(version, about, long_about = None)]
#[command(disable_version_flag = true)]
pub struct Cli {
    /// Name of a file of a configuration
    #[arg(short = 'c', long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Project language [default: C++]
    #[arg(short = 'l', long, value_name = "LANG", help_heading = "Configuration")]
    language: Option<String>,

    /// Optimization level [default: 0]
    #[arg(
        short = 'O',
        long,
        value_name = "LEVEL",
        allow_negative_numbers = true,
        help_heading = "Configuration"
    )]
    optimization_level: Option<i64>,

    /// Include path (repeatable)
    #[arg(short = 'I', long, value_name = "PATH", help_heading = "Configuration")]
    include_path: Vec<String>,

    /// Class to process (repeatable, also accepted positionally)
    #[arg(long, value_name = "CLASS", help_heading = "Configuration")]
    classes: Vec<String>,

    #[arg(long, value_name = "FILE", hide = true)]
    input_file: Vec<String>,

    #[arg(value_name = "CLASS")]
    positional_classes: Vec<String>,

    /// Report format
    #[arg(long, value_enum, default_value_t = ReportFormat::Text)]
    format: ReportFormat,

    /// Enable verbose logging (sets log level to DEBUG)
    #[arg(long)]
    verbose: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ReportFormat {
    Text,
    Json,
}

/// What the command line asked for.
#[derive(Debug)]
pub enum Invocation {
    /// Help or version text; nothing is resolved.
    Display(String),
    Resolve(CommandLine),
}

/// The command-line layer plus the control flags that steer the run.
#[derive(Debug)]
pub struct CommandLine {
    pub config_file: Option<PathBuf>,
    pub options: PartialConfig,
    pub format: ReportFormat,
    pub verbose: bool,
}

/// The derived command plus `-v`/`--version` in place of clap's `-V`.
pub fn command() -> Command {
    Cli::command().arg(
        Arg::new("version")
            .short('v')
            .long("version")
            .action(ArgAction::Version)
            .help("Print version string"),
    )
}

/// Tokenize `args` (program name first) into the command-line layer.
pub fn parse_command_line<I, T>(args: I) -> Result<Invocation, ParseError>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let matches = match command().try_get_matches_from(args) {
        Ok(matches) => matches,
        Err(err) => {
            return match err.kind() {
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => {
                    Ok(Invocation::Display(err.to_string()))
                }
                _ => Err(command_line_error(&err)),
            };
        }
    };
    let cli = Cli::from_arg_matches(&matches).map_err(|err| command_line_error(&err))?;
    let classes = classes_in_order(&matches);

    let mut options = PartialConfig::new();
    if let Some(language) = cli.language {
        options.insert(OptionId::Language, OptionValue::Text(language))?;
    }
    if let Some(level) = cli.optimization_level {
        options.insert(OptionId::OptimizationLevel, OptionValue::Integer(level))?;
    }
    options.extend(OptionId::IncludePath, cli.include_path);
    options.extend(OptionId::Classes, classes);
    options.extend(OptionId::InputFile, cli.input_file);

    Ok(Invocation::Resolve(CommandLine {
        config_file: cli.config,
        options,
        format: cli.format,
        verbose: cli.verbose,
    }))
}

/// `--classes` values and positional classes, in the order they were given.
fn classes_in_order(matches: &ArgMatches) -> Vec<String> {
    let mut indexed: Vec<(usize, String)> = Vec::new();
    for id in ["classes", "positional_classes"] {
        if let (Some(indices), Some(values)) =
            (matches.indices_of(id), matches.get_many::<String>(id))
        {
            indexed.extend(indices.zip(values.cloned()));
        }
    }
    indexed.sort_by_key(|(index, _)| *index);
    indexed.into_iter().map(|(_, value)| value).collect()
}

fn command_line_error(err: &clap::Error) -> ParseError {
    let rendered = err.to_string();
    let first = rendered.lines().next().unwrap_or_default();
    ParseError::CommandLine(first.trim_start_matches("error: ").to_string())
}

fn init_logging(verbose: bool) {
    // Only --verbose selects the level; the environment is not consulted.
    let level = if verbose { Level::DEBUG } else { Level::WARN };
    let _ = tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::default().add_directive(level.into()))
        .try_init();
}

pub fn run() -> Result<()> {
    run_with_args(std::env::args_os())
}

pub fn run_with_args<I, T>(args: I) -> Result<()>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let command_line = match parse_command_line(args)? {
        Invocation::Display(text) => {
            print!("{text}");
            return Ok(());
        }
        Invocation::Resolve(command_line) => command_line,
    };

    init_logging(command_line.verbose);

    let file_layer = match command_line.config_file.as_deref() {
        Some(path) => {
            tracing::debug!("Loading config file {}", path.display());
            parse_config_file(path)
                .with_context(|| format!("Failed reading config file: {}", path.display()))?
        }
        None => PartialConfig::new(),
    };

    let resolved = resolve(&command_line.options, &file_layer);

    match command_line.format {
        ReportFormat::Text => {
            for line in report(&resolved) {
                println!("{line}");
            }
        }
        ReportFormat::Json => {
            println!("{}", render_json(&resolved)?);
        }
    }

    Ok(())
}
