//! CLI argument definitions for ceres.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

use ceres_cli::pipeline::{parse_column_pair, parse_filter};
use ceres_enrich::{EventSource, Granularity};

#[derive(Parser)]
#[command(
    name = "ceres",
    version,
    about = "Enrich software development activity tables",
    long_about = "Enrich commit tables with derived columns.\n\n\
                  Detects pair programming, computes author/committer time differences,\n\
                  resolves identities against a uuid map and classifies touched files."
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

    /// Explicit log level (overrides -v/-q flags).
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
}

#[derive(Subcommand)]
pub enum Command {
    /// Apply enrichments to a commit table stored as CSV.
    Enrich(EnrichArgs),

    /// Turn raw activity items (JSON) into an event table.
    Eventize(EventizeArgs),
}

#[derive(Parser)]
pub struct EnrichArgs {
    /// Commit table to enrich.
    #[arg(value_name = "INPUT")]
    pub input: PathBuf,

    /// Where to write the enriched table (default: print a preview only).
    #[arg(long = "output", short = 'o', value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Declare columns as empty when the input lacks them.
    #[arg(long = "fill-missing", value_name = "COLUMN", value_delimiter = ',')]
    pub fill_missing: Vec<String>,

    /// Drop rows whose COLUMN equals VALUE. May be repeated.
    #[arg(long = "filter", value_name = "COLUMN=VALUE", value_parser = parse_filter)]
    pub filters: Vec<(String, String)>,

    /// Normalize free-form date columns to UTC timestamps.
    #[arg(long = "format-dates", value_name = "COLUMN", value_delimiter = ',')]
    pub format_dates: Vec<String>,

    /// Duplicate rows where the two columns differ. May be repeated.
    #[arg(
        long = "pair-programming",
        value_name = "COLUMN1,COLUMN2",
        value_parser = parse_column_pair
    )]
    pub pair_programming: Vec<(String, String)>,

    /// Add `timedifference` = COLUMN1 - COLUMN2 in seconds.
    #[arg(
        long = "time-difference",
        value_name = "COLUMN1,COLUMN2",
        value_parser = parse_column_pair
    )]
    pub time_difference: Option<(String, String)>,

    /// Identity map CSV with a `uuid` column.
    #[arg(long = "uuids", value_name = "MAP", requires = "uuid_keys")]
    pub uuids: Option<PathBuf>,

    /// Columns joined against the identity map.
    #[arg(
        long = "uuid-keys",
        value_name = "COLUMNS",
        value_delimiter = ',',
        requires = "uuids"
    )]
    pub uuid_keys: Vec<String>,

    /// Classify paths in COLUMN as code or other.
    #[arg(long = "file-type", value_name = "COLUMN")]
    pub file_type: Option<String>,

    /// Number of rows to print after enrichment.
    #[arg(long = "preview", value_name = "N", default_value_t = 10)]
    pub preview: usize,
}

#[derive(Parser)]
pub struct EventizeArgs {
    /// Items as a JSON array or one JSON document per line.
    #[arg(value_name = "ITEMS")]
    pub items: PathBuf,

    /// Tool the items were retrieved from.
    #[arg(long = "source", value_enum, default_value = "git")]
    pub source: SourceArg,

    /// Split commits into one event per commit or per touched file (git only).
    #[arg(long = "granularity", value_enum, default_value = "commit")]
    pub granularity: GranularityArg,

    /// Where to write the event table as CSV.
    #[arg(long = "output", short = 'o', value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Number of rows to print.
    #[arg(long = "preview", value_name = "N", default_value_t = 10)]
    pub preview: usize,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum GranularityArg {
    Commit,
    File,
}

impl From<GranularityArg> for Granularity {
    fn from(value: GranularityArg) -> Self {
        match value {
            GranularityArg::Commit => Granularity::Commit,
            GranularityArg::File => Granularity::File,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
pub enum SourceArg {
    Git,
    Bugzilla,
    Gerrit,
    Email,
}

impl From<SourceArg> for EventSource {
    fn from(value: SourceArg) -> Self {
        match value {
            SourceArg::Git => EventSource::Git,
            SourceArg::Bugzilla => EventSource::Bugzilla,
            SourceArg::Gerrit => EventSource::Gerrit,
            SourceArg::Email => EventSource::Email,
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
