//! CLI argument definitions for the preparation pipeline.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

use dprep_model::ScalerKind;

#[derive(Parser)]
#[command(
    name = "dprep",
    version,
    about = "Prepare the Pima diabetes dataset for model training",
    long_about = "Prepare the Pima diabetes dataset for model training.\n\n\
                  Replaces impossible zeros with medians, reports IQR outliers,\n\
                  derives and encodes Age, BMI and Glucose categories, scales the\n\
                  features and validates the result before writing it."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags and RUST_LOG).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,

    /// Allow row-level values in trace logs.
    #[arg(long = "log-data", global = true)]
    pub log_data: bool,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run the full pipeline and write the cleaned, processed and manifest files.
    Run(RunArgs),

    /// Resolve missing values and write only the cleaned CSV.
    Clean(CleanArgs),

    /// Print missing-value and outlier reports for the raw data.
    Report(ConfigArgs),

    /// Print the effective configuration as TOML.
    Config(ConfigArgs),
}

/// Where the configuration comes from and which paths to override.
#[derive(Args, Clone, Default)]
pub struct ConfigArgs {
    /// Configuration file (default: config/config.toml, built-in defaults if absent).
    #[arg(long = "config", value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Raw CSV to read instead of `paths.raw_data`.
    #[arg(long = "input", value_name = "PATH")]
    pub input: Option<PathBuf>,

    /// Directory for the processed CSV and manifest instead of `paths.processed_dir`.
    #[arg(long = "output-dir", value_name = "DIR")]
    pub output_dir: Option<PathBuf>,
}

#[derive(Args)]
pub struct RunArgs {
    #[command(flatten)]
    pub config: ConfigArgs,

    /// Scaling method instead of `scaling.method`.
    #[arg(long = "scaler", value_enum)]
    pub scaler: Option<ScalerArg>,

    /// Run every stage and report without writing files.
    #[arg(long = "dry-run")]
    pub dry_run: bool,

    /// Write outputs even if validation finds errors.
    ///
    /// The run still exits with status 2 so callers can tell the outputs
    /// did not pass validation.
    #[arg(long = "no-fail-on-validation")]
    pub no_fail_on_validation: bool,
}

#[derive(Args)]
pub struct CleanArgs {
    #[command(flatten)]
    pub config: ConfigArgs,

    /// Report without writing the cleaned CSV.
    #[arg(long = "dry-run")]
    pub dry_run: bool,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum ScalerArg {
    Standard,
    MinMax,
}

impl From<ScalerArg> for ScalerKind {
    fn from(value: ScalerArg) -> Self {
        match value {
            ScalerArg::Standard => Self::Standard,
            ScalerArg::MinMax => Self::MinMax,
        }
    }
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}
