//! Date-partitioned JSON snapshots.
//!
//! Layout: `<root>/youtube/date=<YYYY-MM-DD>/channel_<channel_id>.json`.
//! All channels of a run share one partition; a rerun on the same day
//! replaces that day's files. Files are written to a temporary sibling and
//! renamed into place, so a failed write leaves the previous snapshot intact.

use std::fs::create_dir_all;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use tempfile::NamedTempFile;
use thiserror::Error;

use crate::domain::ChannelStatsRecord;

pub const PLATFORM_DIR: &str = "youtube";

#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("failed to write snapshot '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to serialize snapshot '{}': {source}", .path.display())]
    Serialize {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Output location for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnapshotLayout {
    pub root: PathBuf,
    pub run_date: NaiveDate,
}

impl SnapshotLayout {
    pub fn new(root: impl Into<PathBuf>, run_date: NaiveDate) -> Self {
        Self {
            root: root.into(),
            run_date,
        }
    }

    /// Directory shared by every snapshot of this run.
    pub fn partition_dir(&self) -> PathBuf {
        self.root
            .join(PLATFORM_DIR)
            .join(format!("date={}", self.run_date.format("%Y-%m-%d")))
    }

    pub fn path_for(&self, channel_id: &str) -> PathBuf {
        self.partition_dir().join(format!("channel_{channel_id}.json"))
    }
}

/// Write `record` as pretty JSON to `path`, creating parent directories.
pub fn write_snapshot(record: &ChannelStatsRecord, path: &Path) -> Result<(), SnapshotError> {
    let io_err = |e: std::io::Error| SnapshotError::Io {
        path: path.to_path_buf(),
        source: e,
    };

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    create_dir_all(dir).map_err(io_err)?;

    let mut tmp = NamedTempFile::new_in(dir).map_err(io_err)?;
    {
        let mut writer = BufWriter::new(tmp.as_file_mut());
        serde_json::to_writer_pretty(&mut writer, record).map_err(|e| SnapshotError::Serialize {
            path: path.to_path_buf(),
            source: e,
        })?;
        writer.write_all(b"\n").map_err(io_err)?;
        writer.flush().map_err(io_err)?;
    }
    tmp.as_file().sync_all().map_err(io_err)?;
    tmp.persist(path).map_err(|e| io_err(e.error))?;

    tracing::debug!(path = %path.display(), "wrote snapshot");
    Ok(())
}
