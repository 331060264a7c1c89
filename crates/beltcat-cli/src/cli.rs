use std::path::PathBuf;

use beltcat::{MissingCornerPolicy, StrategyChoice};
use clap::{Args, Parser, Subcommand, ValueEnum};

/// Extract belt rating tables from catalog documents and look up rated power.
#[derive(Debug, Parser)]
#[command(name = "beltcat", about, version)]
pub struct Cli {
    /// Log pipeline stages to stderr (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Reconstruct a profile's table and write it in long format
    Extract {
        /// Path to the catalog (PDF or form-feed separated text)
        #[arg(value_name = "FILE")]
        file: PathBuf,

        #[command(flatten)]
        profile: ProfileArgs,

        /// Output format
        #[arg(long, value_enum, default_value_t = TableFormat::Csv)]
        format: TableFormat,

        /// Write to this file instead of stdout
        #[arg(short, long, value_name = "PATH")]
        output: Option<PathBuf>,
    },

    /// Look up rated power for a diameter and speed
    Lookup {
        #[command(flatten)]
        input: InputArgs,

        /// Pulley diameter
        #[arg(short, long)]
        diameter: f64,

        /// Rotational speed
        #[arg(short = 'n', long)]
        speed: f64,

        /// Interpolation strategy
        #[arg(long, value_enum, default_value_t = StrategyArg::Auto)]
        strategy: StrategyArg,

        /// Handling of grid corners absent from the table
        #[arg(long, value_enum, default_value_t = MissingCornersArg::Zero)]
        missing_corners: MissingCornersArg,

        /// Output format
        #[arg(long, value_enum, default_value_t = ReportFormat::Text)]
        format: ReportFormat,
    },

    /// Summarize a table's axes and the interpolation strategy it gets
    Grid {
        #[command(flatten)]
        input: InputArgs,

        /// Output format
        #[arg(long, value_enum, default_value_t = ReportFormat::Text)]
        format: ReportFormat,
    },

    /// List configured profiles
    Profiles {
        /// JSON profile file; built-in profiles fill in missing ids
        #[arg(long, value_name = "PATH")]
        profiles: Option<PathBuf>,

        /// Output format
        #[arg(long, value_enum, default_value_t = ReportFormat::Text)]
        format: ReportFormat,
    },
}

/// Profile selection for commands that read a catalog.
#[derive(Debug, Clone, Args)]
pub struct ProfileArgs {
    /// Profile id
    #[arg(short, long, default_value = "C")]
    pub profile: String,

    /// JSON profile file; built-in profiles fill in missing ids
    #[arg(long, value_name = "PATH")]
    pub profiles: Option<PathBuf>,

    /// Page range (e.g. '24' or '23-25'). Default: the profile's pages
    #[arg(long)]
    pub pages: Option<String>,
}

/// Table input: a catalog document or a dataset file.
#[derive(Debug, Clone, Args)]
pub struct InputArgs {
    /// Path to the catalog (PDF or form-feed separated text)
    #[arg(
        value_name = "FILE",
        required_unless_present = "dataset",
        conflicts_with = "dataset"
    )]
    pub file: Option<PathBuf>,

    /// Read a dataset file (long or wide CSV) instead of a catalog
    #[arg(long, value_name = "PATH")]
    pub dataset: Option<PathBuf>,

    #[command(flatten)]
    pub profile: ProfileArgs,
}

/// Output format for extracted tables.
#[derive(Debug, Clone, ValueEnum)]
pub enum TableFormat {
    /// Long-format CSV (diameter,speed,power)
    Csv,
    /// JSON with records, headers and warnings
    Json,
    /// Plain text (tab-separated)
    Text,
}

/// Output format for reports.
#[derive(Debug, Clone, ValueEnum)]
pub enum ReportFormat {
    /// Plain text (tab-separated)
    Text,
    /// JSON output
    Json,
}

/// Interpolation strategy.
#[derive(Debug, Clone, ValueEnum)]
pub enum StrategyArg {
    /// Bilinear on complete grids, scattered otherwise
    Auto,
    /// Always bilinear
    Bilinear,
    /// Always scattered (triangulated)
    Scattered,
}

impl From<&StrategyArg> for StrategyChoice {
    fn from(arg: &StrategyArg) -> Self {
        match arg {
            StrategyArg::Auto => StrategyChoice::Auto,
            StrategyArg::Bilinear => StrategyChoice::Bilinear,
            StrategyArg::Scattered => StrategyChoice::Scattered,
        }
    }
}

/// Missing-corner handling for bilinear lookups.
#[derive(Debug, Clone, ValueEnum)]
pub enum MissingCornersArg {
    /// Read absent corners as zero (flagged)
    Zero,
    /// Report the value as unknown
    Unknown,
    /// Fall back to scattered interpolation
    Scattered,
}

impl From<&MissingCornersArg> for MissingCornerPolicy {
    fn from(arg: &MissingCornersArg) -> Self {
        match arg {
            MissingCornersArg::Zero => MissingCornerPolicy::Zero,
            MissingCornersArg::Unknown => MissingCornerPolicy::Unknown,
            MissingCornersArg::Scattered => MissingCornerPolicy::Scattered,
        }
    }
}
