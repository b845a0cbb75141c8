use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand};
use tracing::level_filters::LevelFilter;

/// Inspect, plot and bin tabular telemetry exports.
#[derive(Parser)]
#[command(name = "voltview", version)]
pub struct Cli {
    /// Enable verbose output. (Specify more than once for more verbosity.)
    #[arg(global = true, short = 'v', long, action = ArgAction::Count, default_value_t = 0)]
    verbose: u8,

    /// Path to a TOML configuration file.
    ///
    /// Defaults to `voltview/config.toml` under the user configuration directory. Built-in defaults are used when
    /// that file does not exist.
    #[arg(global = true, short = 'c', long)]
    pub config: Option<PathBuf>,

    /// Field delimiter for CSV input (`;` unless configured otherwise). Use `tab` or `\t` for tabs.
    #[arg(global = true, short = 'd', long)]
    pub delimiter: Option<String>,

    /// Treat the first record as data instead of column names.
    #[arg(global = true, long)]
    pub no_header: bool,

    /// Subcommand to run.
    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    /// Gets the log level for the user-supplied verbosity, used when `RUST_LOG` is unset.
    pub fn log_level(&self) -> LevelFilter {
        match self.verbose {
            0 => LevelFilter::WARN,
            1 => LevelFilter::INFO,
            2 => LevelFilter::DEBUG,
            _ => LevelFilter::TRACE,
        }
    }
}

#[derive(Subcommand)]
pub enum Command {
    /// Show the columns of a file and a window of its rows.
    Inspect(InspectArgs),

    /// Emit dual-axis line chart series as JSON.
    Plot(PlotArgs),

    /// Show the percentage of rows per value range of a column.
    Distribution(BinArgs),

    /// Show row count and elapsed time per value range of a column.
    Runtime(RuntimeArgs),

    /// Table preview, distribution and runtime summary in one go (`--json` prints only the analysis).
    Report(ReportArgs),
}

/// Arguments for `inspect`.
#[derive(Args, Clone)]
pub struct InspectArgs {
    /// Telemetry file (`.csv`, `.txt` or `.tsv`).
    pub file: PathBuf,

    /// Number of rows to show.
    #[arg(short = 'n', long, default_value_t = 20)]
    pub rows: usize,

    /// Index of the first row to show.
    #[arg(short = 's', long, default_value_t = 0)]
    pub start: usize,
}

/// Arguments for `plot`.
#[derive(Args, Clone)]
pub struct PlotArgs {
    /// Telemetry file (`.csv`, `.txt` or `.tsv`).
    pub file: PathBuf,

    /// Column on the horizontal axis.
    #[arg(short = 'x', long)]
    pub x: String,

    /// Column on the left vertical axis.
    #[arg(long)]
    pub y1: String,

    /// Column on the right vertical axis.
    #[arg(long)]
    pub y2: Option<String>,
}

/// Arguments shared by the binning commands.
#[derive(Args, Clone)]
pub struct BinArgs {
    /// Telemetry file (`.csv`, `.txt` or `.tsv`).
    pub file: PathBuf,

    /// Column to bin. Defaults to the configured target column.
    #[arg(short = 'C', long)]
    pub column: Option<String>,

    /// Width of each value range.
    #[arg(long)]
    pub bucket_width: Option<f64>,

    /// Print JSON instead of a table.
    #[arg(long)]
    pub json: bool,
}

/// Arguments for `runtime`.
#[derive(Args, Clone)]
pub struct RuntimeArgs {
    #[command(flatten)]
    pub bins: BinArgs,

    /// Seconds represented by one row. Defaults to the configured interval (1/22 s).
    #[arg(short = 'i', long)]
    pub interval: Option<f64>,
}

/// Arguments for `report`.
#[derive(Args, Clone)]
pub struct ReportArgs {
    #[command(flatten)]
    pub runtime: RuntimeArgs,

    /// Number of table rows to show.
    #[arg(short = 'n', long, default_value_t = 10)]
    pub rows: usize,
}
