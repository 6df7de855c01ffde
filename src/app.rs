//! Command dispatch and the fatal-vs-per-channel error policy.
//!
//! Settings and channel config are checked before any network call; an error
//! there is an `AppError` with the fatal exit code. Inside the ingestion loop
//! errors belong to one channel and only show up in the `RunSummary`.

use std::io::Write;
use std::path::Path;

use chrono::Local;
use clap::Parser;

use crate::cli::{Command, ConfigArgs, IngestArgs, ProbeArgs};
use crate::data::{StatsFetcher, YouTubeClient};
use crate::error::{AppError, EXIT_CHANNEL_FAILURES};
use crate::io::channels::load_channels;
use crate::io::snapshot::SnapshotLayout;
use crate::settings::{Settings, SettingsError};

pub mod pipeline;

use pipeline::RunSummary;

/// Entry point for the `channel-stats` binary.
pub fn run() -> Result<(), AppError> {
    // A bare `channel-stats` (or one given only flags) runs the batch ingest.
    let argv = rewrite_args(std::env::args().collect());
    let cli = crate::cli::Cli::parse_from(argv);

    match cli.command {
        Command::Ingest(args) => handle_ingest(args),
        Command::Summary(args) => handle_summary(args),
        Command::Probe(args) => handle_probe(args),
    }
}

fn handle_ingest(args: IngestArgs) -> Result<(), AppError> {
    let layout = SnapshotLayout::new(args.out_dir, Local::now().date_naive());
    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    let summary = ingest(
        Settings::from_env(),
        &args.config.channels,
        &layout,
        |settings| {
            YouTubeClient::from_settings(settings)
                .map_err(|e| AppError::fatal(format!("Failed to build HTTP client: {e}")))
        },
        &mut out,
    )?;
    out.flush().ok();

    if summary.is_success() {
        Ok(())
    } else {
        Err(AppError::new(
            summary.exit_code(),
            format!("{} of {} channel(s) failed.", summary.failure_count(), summary.total()),
        ))
    }
}

/// Batch ingest with the fatal checks in order: settings, then channel
/// config, then the fetcher. Nothing is fetched or written unless all three
/// succeed; after that, failures are per channel and land in the summary.
pub fn ingest<F: StatsFetcher>(
    settings: Result<Settings, SettingsError>,
    channels_path: &Path,
    layout: &SnapshotLayout,
    connect: impl FnOnce(&Settings) -> Result<F, AppError>,
    out: &mut dyn Write,
) -> Result<RunSummary, AppError> {
    let settings = settings?;
    let channels = load_channels(channels_path)?;
    let fetcher = connect(&settings)?;

    tracing::info!(
        channels = channels.len(),
        partition = %layout.partition_dir().display(),
        "starting ingest"
    );

    pipeline::run_ingest(&fetcher, &channels, layout, out)
        .map_err(|e| AppError::fatal(format!("Failed to write to stdout: {e}")))
}

fn handle_summary(args: ConfigArgs) -> Result<(), AppError> {
    let channels = load_channels(&args.channels)?;
    println!("{}", crate::report::format_category_summary(&channels));
    Ok(())
}

fn handle_probe(args: ProbeArgs) -> Result<(), AppError> {
    let settings = Settings::from_env()?;
    let channel_id = args
        .channel_id
        .or_else(|| settings.test_channel_id.clone())
        .ok_or_else(|| {
            AppError::fatal("No channel to probe: pass --channel-id or set YOUTUBE_TEST_CHANNEL_ID.")
        })?;

    let client = YouTubeClient::from_settings(&settings)
        .map_err(|e| AppError::fatal(format!("Failed to build HTTP client: {e}")))?;
    let record = client
        .fetch(&channel_id)
        .map_err(|e| AppError::new(EXIT_CHANNEL_FAILURES, format!("[FAIL] {channel_id}: {e}")))?;

    let json = serde_json::to_string_pretty(&record)
        .map_err(|e| AppError::new(EXIT_CHANNEL_FAILURES, format!("Failed to serialize record: {e}")))?;
    println!("{json}");
    Ok(())
}

/// Insert `ingest` when argv names no subcommand.
///
/// `channel-stats` and `channel-stats -c x.csv` both run the batch ingest;
/// top-level help/version and explicit subcommands pass through untouched.
fn rewrite_args(mut argv: Vec<String>) -> Vec<String> {
    let needs_ingest = match argv.get(1).map(String::as_str) {
        None => true,
        Some("-h" | "--help" | "-V" | "--version" | "help") => false,
        Some("ingest" | "summary" | "probe") => false,
        Some(flag) => flag.starts_with('-'),
    };
    if needs_ingest {
        argv.insert(1.min(argv.len()), "ingest".to_string());
    }
    argv
}
