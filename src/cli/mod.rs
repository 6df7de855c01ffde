//! Command-line parsing for the channel statistics ingester.
//!
//! Argument parsing and command dispatch stay separate from the ingestion code.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "channel-stats", version, about = "Daily YouTube channel statistics snapshots")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Fetch every configured channel and write today's snapshots.
    Ingest(IngestArgs),
    /// Validate the channel config and print counts per category (no network).
    Summary(ConfigArgs),
    /// Fetch a single channel and print the record without writing it.
    ///
    /// Uses `--channel-id`, or `YOUTUBE_TEST_CHANNEL_ID` when omitted.
    Probe(ProbeArgs),
}

#[derive(Debug, Args, Clone)]
pub struct ConfigArgs {
    /// Channel config CSV (`channel_id,channel_name,category`).
    #[arg(short = 'c', long, default_value = "channels.csv")]
    pub channels: PathBuf,
}

#[derive(Debug, Args, Clone)]
pub struct IngestArgs {
    #[command(flatten)]
    pub config: ConfigArgs,

    /// Root directory for snapshots.
    #[arg(short = 'o', long, default_value = "data/raw")]
    pub out_dir: PathBuf,
}

#[derive(Debug, Args, Clone)]
pub struct ProbeArgs {
    /// Channel id to fetch.
    #[arg(long)]
    pub channel_id: Option<String>,
}
