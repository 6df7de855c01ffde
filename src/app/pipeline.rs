//! The per-channel ingestion loop.
//!
//! fetch -> merge config metadata -> write snapshot -> tally
//!
//! Every failure inside the loop is isolated to its channel: it is recorded,
//! reported, and the loop moves on. Console lines go to the supplied sink as
//! each channel finishes.

use std::io::Write;
use std::path::PathBuf;

use crate::data::StatsFetcher;
use crate::domain::ChannelDescriptor;
use crate::error::EXIT_CHANNEL_FAILURES;
use crate::io::snapshot::{SnapshotLayout, write_snapshot};
use crate::report;

/// A channel that did not produce a snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelFailure {
    pub channel_id: String,
    pub reason: String,
}

/// Outcome of one ingestion run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub successes: usize,
    pub failures: Vec<ChannelFailure>,
    pub written: Vec<PathBuf>,
}

impl RunSummary {
    pub fn failure_count(&self) -> usize {
        self.failures.len()
    }

    pub fn total(&self) -> usize {
        self.successes + self.failures.len()
    }

    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }

    /// Process exit status for this run: 0 only when no channel failed.
    pub fn exit_code(&self) -> u8 {
        if self.is_success() { 0 } else { EXIT_CHANNEL_FAILURES }
    }
}

/// Ingest every channel in order, writing snapshots under `layout`.
///
/// Returns an error only if writing to `out` fails.
pub fn run_ingest(
    fetcher: &dyn StatsFetcher,
    channels: &[ChannelDescriptor],
    layout: &SnapshotLayout,
    out: &mut dyn Write,
) -> std::io::Result<RunSummary> {
    let mut summary = RunSummary::default();

    for channel in channels {
        let channel_id = channel.channel_id.as_str();

        let outcome = fetcher
            .fetch(channel_id)
            .map_err(|e| e.to_string())
            .and_then(|record| {
                let record = record.with_descriptor(channel);
                let path = layout.path_for(channel_id);
                write_snapshot(&record, &path).map(|()| path).map_err(|e| e.to_string())
            });

        match outcome {
            Ok(path) => {
                summary.successes += 1;
                writeln!(out, "{}", report::format_success(channel_id, &path))?;
                summary.written.push(path);
            }
            Err(reason) => {
                tracing::warn!(channel_id, %reason, "channel failed");
                writeln!(out, "{}", report::format_failure(channel_id, &reason))?;
                summary.failures.push(ChannelFailure {
                    channel_id: channel_id.to_string(),
                    reason,
                });
            }
        }
    }

    writeln!(out)?;
    writeln!(out, "{}", report::format_summary(&summary))?;
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::FetchError;
    use crate::domain::{Category, ChannelStatsRecord};
    use chrono::{NaiveDate, Utc};

    struct AlwaysNotFound;

    impl StatsFetcher for AlwaysNotFound {
        fn fetch(&self, channel_id: &str) -> Result<ChannelStatsRecord, FetchError> {
            Err(FetchError::NotFound {
                channel_id: channel_id.to_string(),
            })
        }
    }

    struct Echo;

    impl StatsFetcher for Echo {
        fn fetch(&self, channel_id: &str) -> Result<ChannelStatsRecord, FetchError> {
            Ok(ChannelStatsRecord {
                ingested_at: Utc::now(),
                channel_id: channel_id.to_string(),
                title: None,
                published_at: None,
                country: None,
                subscriber_count: 0,
                view_count: 0,
                video_count: 0,
                raw: serde_json::Value::Null,
                category: None,
                channel_name_config: None,
            })
        }
    }

    fn channel(id: &str) -> ChannelDescriptor {
        ChannelDescriptor {
            channel_id: id.to_string(),
            channel_name: "Name".to_string(),
            category: Category::Golf,
        }
    }

    #[test]
    fn exit_code_follows_failures() {
        let mut summary = RunSummary {
            successes: 3,
            ..Default::default()
        };
        assert_eq!(summary.exit_code(), 0);

        summary.failures.push(ChannelFailure {
            channel_id: "UC11111111111".to_string(),
            reason: "boom".to_string(),
        });
        assert_eq!(summary.exit_code(), EXIT_CHANNEL_FAILURES);
        assert_eq!(summary.total(), 4);
    }

    #[test]
    fn fetch_failures_are_isolated() {
        let dir = tempfile::tempdir().unwrap();
        let layout = SnapshotLayout::new(dir.path(), NaiveDate::from_ymd_opt(2025, 3, 1).unwrap());
        let mut out = Vec::new();

        let summary = run_ingest(
            &AlwaysNotFound,
            &[channel("UC11111111111"), channel("UC22222222222")],
            &layout,
            &mut out,
        )
        .unwrap();

        assert_eq!(summary.successes, 0);
        assert_eq!(summary.failure_count(), 2);
        assert!(!layout.partition_dir().exists());

        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("[FAIL] UC11111111111: no channel found for channel_id=UC11111111111"));
        assert!(text.contains("[FAIL] UC22222222222"));
        assert!(text.ends_with("successes=0 failures=2 total=2\n"));
    }

    #[test]
    fn console_lines_stream_in_loader_order() {
        let dir = tempfile::tempdir().unwrap();
        let layout = SnapshotLayout::new(dir.path(), NaiveDate::from_ymd_opt(2025, 3, 1).unwrap());
        let mut out = Vec::new();

        run_ingest(&Echo, &[channel("UC22222222222"), channel("UC11111111111")], &layout, &mut out).unwrap();

        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert!(lines[0].starts_with("[OK] UC22222222222 -> "));
        assert!(lines[1].starts_with("[OK] UC11111111111 -> "));
        assert_eq!(lines[2], "");
        assert_eq!(lines[3], "Done. successes=2 failures=0 total=2");
    }
}
