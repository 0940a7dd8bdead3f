//! Command-line argument definitions.

use camino::Utf8PathBuf;
use clap::{Args, Parser, Subcommand};

/// Compare housing candidates by commute, cost, amenities and size.
#[derive(Debug, Parser)]
#[command(name = "nestwise", version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Score and rank a set of candidates.
    Rank(RankArgs),
    /// Drop the persisted travel-time cache.
    ClearCache(CacheArgs),
}

#[derive(Debug, Args)]
pub struct RankArgs {
    /// JSON file holding the candidate records.
    #[arg(long, value_name = "FILE")]
    pub input: Utf8PathBuf,

    /// Optional JSON file with weights and thresholds; an invalid
    /// configuration falls back to the defaults with a warning.
    #[arg(long, value_name = "FILE")]
    pub config: Option<Utf8PathBuf>,

    /// Work location latitude. Without a work location, commute
    /// scoring reports no data.
    #[arg(long, requires = "work_lng", allow_negative_numbers = true)]
    pub work_lat: Option<f64>,

    /// Work location longitude.
    #[arg(long, requires = "work_lat", allow_negative_numbers = true)]
    pub work_lng: Option<f64>,

    /// Base URL of an OSRM-style table service for travel times.
    #[arg(long, value_name = "URL")]
    pub osrm_url: Option<String>,

    /// Skip the external travel-time source and use straight-line
    /// estimates only.
    #[arg(long)]
    pub offline: bool,

    /// Directory for the persisted travel-time cache. Without it the
    /// cache lives in memory for this invocation only.
    #[arg(long, value_name = "DIR")]
    pub cache_dir: Option<Utf8PathBuf>,

    /// Emit the full report as JSON instead of a table.
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Args)]
pub struct CacheArgs {
    /// Directory holding the persisted travel-time cache.
    #[arg(long, value_name = "DIR")]
    pub cache_dir: Utf8PathBuf,
}
