//! Command-line argument parsing.
//!
//! This module defines the command-line interface structure using the `clap` crate.

use clap::{Parser, ValueEnum};

use aws_control_core::batch::ReportMode;
use aws_control_core::config::DEFAULT_TARGET_RUNTIME;

/// How a finished batch reports its failures.
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReportArg {
    /// List every failed function
    AllFailures,
    /// Only show the most recent failure
    LastError,
}

impl From<ReportArg> for ReportMode {
    fn from(value: ReportArg) -> Self {
        match value {
            ReportArg::AllFailures => ReportMode::AllFailures,
            ReportArg::LastError => ReportMode::LastError,
        }
    }
}

/// Command-line arguments for the aws-control CLI tool.
///
/// # Examples
///
/// ```rust
/// use clap::Parser;
/// use aws_control_cli::cli_args::Args;
///
/// let args = Args::parse_from(["awsc", "--target-runtime", "python3.12"]);
/// assert_eq!(args.target_runtime, "python3.12");
/// ```
#[derive(Parser, Debug)] // requires `derive` feature
#[command(term_width = 0)] // Just to make testing across clap features easier
pub struct Args {
    /// Path to the settings YAML file.
    ///
    /// If not provided, defaults to `~/.aws-control/settings.yml`.
    #[arg(long, short = 's')]
    pub settings_path: Option<String>,

    /// Runtime identifier that upgrades move functions to.
    #[arg(long, short = 't', default_value = DEFAULT_TARGET_RUNTIME)]
    pub target_runtime: String,

    /// How failures are reported when a batch finishes.
    #[arg(long, value_enum, default_value_t = ReportArg::AllFailures)]
    pub report: ReportArg,

    /// Write log output to this file instead of discarding it.
    ///
    /// The terminal is owned by the menu, so logs are never printed to it.
    /// Use `RUST_LOG` to choose the level.
    #[arg(long)]
    pub log_file: Option<String>,
}
