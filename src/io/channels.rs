//! Channel config loading and validation.
//!
//! Turns a `channel_id,channel_name,category` CSV into the ordered list of
//! channels a run will ingest.
//!
//! The load is all-or-nothing:
//! - every field is trimmed, `category` is lower-cased
//! - rows with an empty `channel_id` are blank separators and are skipped
//! - every remaining row is validated before any descriptor is returned
//! - an invalid row or an empty result fails the whole load

use std::collections::HashMap;
use std::fs::File;
use std::io::{ErrorKind, Read};
use std::path::{Path, PathBuf};

use csv::StringRecord;
use thiserror::Error;

use crate::domain::{Category, ChannelDescriptor, is_valid_channel_id};

/// Columns every channel config must carry.
pub const REQUIRED_COLUMNS: [&str; 3] = ["category", "channel_id", "channel_name"];

/// Errors from loading the channel config. All of them are fatal for a run.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("channel config '{}' not found (create it in the working directory)", .path.display())]
    NotFound { path: PathBuf },

    #[error("failed to open channel config '{}': {source}", .path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to read channel config '{}': {source}", .path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error(
        "channel config '{}' must have columns: {} (missing: {})",
        .path.display(),
        REQUIRED_COLUMNS.join(", "),
        .missing.join(", ")
    )]
    MissingColumns { path: PathBuf, missing: Vec<String> },

    #[error("invalid channel_id '{channel_id}' on line {line}")]
    InvalidChannelId { line: u64, channel_id: String },

    #[error("invalid category '{category}' on line {line}")]
    InvalidCategory { line: u64, category: String },

    #[error("channel config '{}' contained zero channels", .path.display())]
    Empty { path: PathBuf },
}

impl ConfigError {
    /// True for row-level validation failures (bad id or category).
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            ConfigError::InvalidChannelId { .. } | ConfigError::InvalidCategory { .. }
        )
    }
}

/// A non-blank config row after trimming, before validation.
#[derive(Debug, Clone)]
struct NormalizedRow {
    line: u64,
    channel_id: String,
    channel_name: String,
    category: String,
}

/// Load, normalize and validate the channel config at `path`.
pub fn load_channels(path: &Path) -> Result<Vec<ChannelDescriptor>, ConfigError> {
    let file = File::open(path).map_err(|e| match e.kind() {
        ErrorKind::NotFound => ConfigError::NotFound {
            path: path.to_path_buf(),
        },
        _ => ConfigError::Open {
            path: path.to_path_buf(),
            source: e,
        },
    })?;

    let channels = read_channels(file, path)?;
    tracing::debug!(path = %path.display(), channels = channels.len(), "loaded channel config");
    Ok(channels)
}

/// Parse channel config from any reader. `path` is only used in error messages.
pub fn read_channels<R: Read>(source: R, path: &Path) -> Result<Vec<ChannelDescriptor>, ConfigError> {
    let csv_err = |e: csv::Error| ConfigError::Csv {
        path: path.to_path_buf(),
        source: e,
    };

    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(source);

    let headers = reader.headers().map_err(csv_err)?.clone();
    let header_map = build_header_map(&headers);

    let missing: Vec<String> = REQUIRED_COLUMNS
        .iter()
        .filter(|name| !header_map.contains_key(**name))
        .map(|name| name.to_string())
        .collect();
    if !missing.is_empty() {
        return Err(ConfigError::MissingColumns {
            path: path.to_path_buf(),
            missing,
        });
    }

    let mut rows = Vec::new();
    for (idx, result) in reader.records().enumerate() {
        let record = result.map_err(csv_err)?;
        // Header is line 1; fall back to the record index if the reader has no position.
        let line = record
            .position()
            .map(|p| p.line())
            .unwrap_or(idx as u64 + 2);
        if let Some(row) = normalize_row(&record, &header_map, line) {
            rows.push(row);
        }
    }

    if rows.is_empty() {
        return Err(ConfigError::Empty {
            path: path.to_path_buf(),
        });
    }

    rows.iter().map(validate_row).collect()
}

fn build_header_map(headers: &StringRecord) -> HashMap<String, usize> {
    headers
        .iter()
        .enumerate()
        .map(|(idx, name)| (normalize_header_name(name), idx))
        .collect()
}

fn normalize_header_name(name: &str) -> String {
    // Spreadsheet exports often prefix the first header with a UTF-8 BOM.
    let name = name.trim().trim_start_matches('\u{feff}').trim();
    name.to_ascii_lowercase()
}

/// Trim all fields and lower-case the category. `None` for blank separator rows.
fn normalize_row(record: &StringRecord, header_map: &HashMap<String, usize>, line: u64) -> Option<NormalizedRow> {
    let channel_id = get_field(record, header_map, "channel_id");
    if channel_id.is_empty() {
        return None;
    }

    Some(NormalizedRow {
        line,
        channel_id: channel_id.to_string(),
        channel_name: get_field(record, header_map, "channel_name").to_string(),
        category: get_field(record, header_map, "category").to_lowercase(),
    })
}

fn validate_row(row: &NormalizedRow) -> Result<ChannelDescriptor, ConfigError> {
    if !is_valid_channel_id(&row.channel_id) {
        return Err(ConfigError::InvalidChannelId {
            line: row.line,
            channel_id: row.channel_id.clone(),
        });
    }

    let category = Category::parse(&row.category).ok_or_else(|| ConfigError::InvalidCategory {
        line: row.line,
        category: row.category.clone(),
    })?;

    Ok(ChannelDescriptor {
        channel_id: row.channel_id.clone(),
        channel_name: row.channel_name.clone(),
        category,
    })
}

/// Trimmed cell value; short rows read as empty.
fn get_field<'a>(record: &'a StringRecord, header_map: &HashMap<String, usize>, name: &str) -> &'a str {
    header_map
        .get(name)
        .and_then(|idx| record.get(*idx))
        .map(str::trim)
        .unwrap_or("")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn load_str(csv: &str) -> Result<Vec<ChannelDescriptor>, ConfigError> {
        read_channels(csv.as_bytes(), Path::new("test.csv"))
    }

    #[test]
    fn loads_valid_rows_in_file_order() {
        let channels = load_str(
            "channel_id,channel_name,category\n\
             UC11111111111111111111,Graham Stephan,finance\n\
             UC22222222222222222222,Jeff Nippard,fitness\n",
        )
        .unwrap();

        assert_eq!(channels.len(), 2);
        assert_eq!(channels[0].channel_id, "UC11111111111111111111");
        assert_eq!(channels[0].channel_name, "Graham Stephan");
        assert_eq!(channels[0].category, Category::Finance);
        assert_eq!(channels[1].category, Category::Fitness);
    }

    #[test]
    fn trims_fields_and_lowercases_category() {
        let channels = load_str(
            "channel_id,channel_name,category\n  UC33333333333 ,  Rick Shiels  , GOLF \n",
        )
        .unwrap();

        assert_eq!(channels[0].channel_id, "UC33333333333");
        assert_eq!(channels[0].channel_name, "Rick Shiels");
        assert_eq!(channels[0].category, Category::Golf);
    }

    #[test]
    fn skips_rows_with_blank_channel_id() {
        let channels = load_str(
            "channel_id,channel_name,category\n\
             UC11111111111,A,finance\n\
             ,,\n\
             \"  \",B,golf\n\
             UC22222222222,C,golf\n",
        )
        .unwrap();

        let ids: Vec<_> = channels.iter().map(|c| c.channel_id.as_str()).collect();
        assert_eq!(ids, ["UC11111111111", "UC22222222222"]);
    }

    #[test]
    fn accepts_bom_and_extra_columns() {
        let channels = load_str(
            "\u{feff}channel_id,notes,channel_name,category\nUC11111111111,ignored,,finance\n",
        )
        .unwrap();

        assert_eq!(channels.len(), 1);
        assert_eq!(channels[0].channel_name, "");
    }

    #[test]
    fn bad_channel_id_fails_whole_load() {
        let err = load_str(
            "channel_id,channel_name,category\n\
             UC11111111111,Valid,finance\n\
             XX22222222222,Wrong prefix,finance\n",
        )
        .unwrap_err();

        assert!(err.is_validation());
        assert!(matches!(
            err,
            ConfigError::InvalidChannelId { ref channel_id, line: 3 } if channel_id == "XX22222222222"
        ));
    }

    #[test]
    fn short_channel_id_fails() {
        let err = load_str("channel_id,channel_name,category\nUC1234567,Short,golf\n").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidChannelId { .. }));
    }

    #[test]
    fn unknown_category_fails_whole_load() {
        let err = load_str(
            "channel_id,channel_name,category\n\
             UC11111111111,Valid,finance\n\
             UC22222222222,Chef,Cooking\n",
        )
        .unwrap_err();

        assert!(matches!(
            err,
            ConfigError::InvalidCategory { ref category, .. } if category == "cooking"
        ));
        assert!(err.to_string().contains("cooking"));
    }

    #[test]
    fn header_only_is_empty() {
        let err = load_str("channel_id,channel_name,category\n").unwrap_err();
        assert!(matches!(err, ConfigError::Empty { .. }));
    }

    #[test]
    fn only_blank_rows_is_empty() {
        let err = load_str("channel_id,channel_name,category\n,,\n , , \n").unwrap_err();
        assert!(matches!(err, ConfigError::Empty { .. }));
    }

    #[test]
    fn missing_column_is_reported() {
        let err = load_str("channel_id,category\nUC11111111111,golf\n").unwrap_err();
        match err {
            ConfigError::MissingColumns { missing, .. } => assert_eq!(missing, ["channel_name"]),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn missing_file_is_not_found() {
        let err = load_channels(Path::new("definitely/not/here/channels.csv")).unwrap_err();
        assert!(matches!(err, ConfigError::NotFound { .. }));
    }
}
