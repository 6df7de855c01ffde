//! Shared domain types.
//!
//! These types are intentionally small and serializable so they can be:
//!
//! - produced by the config loader and the fetcher
//! - merged in memory by the run orchestrator
//! - written as JSON snapshots for downstream consumers

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Channel ids issued by the platform always start with this prefix.
pub const CHANNEL_ID_PREFIX: &str = "UC";

/// Shortest channel id accepted by the config loader.
pub const CHANNEL_ID_MIN_LEN: usize = 10;

/// Content category a channel is tracked under.
///
/// The set is closed: config rows naming anything else are rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Finance,
    Fitness,
    Golf,
}

impl Category {
    pub const ALL: [Category; 3] = [Category::Finance, Category::Fitness, Category::Golf];

    pub fn as_str(self) -> &'static str {
        match self {
            Category::Finance => "finance",
            Category::Fitness => "fitness",
            Category::Golf => "golf",
        }
    }

    /// Parse an already-normalized (trimmed, lower-cased) category name.
    pub fn parse(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.as_str() == name)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returns true when `id` has the platform's channel-id shape.
///
/// Length is measured in characters, not bytes.
pub fn is_valid_channel_id(id: &str) -> bool {
    id.starts_with(CHANNEL_ID_PREFIX) && id.chars().count() >= CHANNEL_ID_MIN_LEN
}

/// One validated row of the channel config.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelDescriptor {
    pub channel_id: String,
    /// Display name from the config; may be empty.
    pub channel_name: String,
    pub category: Category,
}

/// Point-in-time statistics for one channel, as written to a snapshot.
///
/// Count fields are never absent: upstream omissions are stored as `0`.
/// `category` and `channel_name_config` stay `None` until the record is
/// merged with its descriptor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChannelStatsRecord {
    #[serde(rename = "ingested_at_utc")]
    pub ingested_at: DateTime<Utc>,
    pub channel_id: String,
    pub title: Option<String>,
    pub published_at: Option<String>,
    pub country: Option<String>,
    pub subscriber_count: u64,
    pub view_count: u64,
    pub video_count: u64,
    /// Upstream item exactly as received.
    pub raw: serde_json::Value,
    #[serde(default)]
    pub category: Option<Category>,
    #[serde(default)]
    pub channel_name_config: Option<String>,
}

impl ChannelStatsRecord {
    /// Attach config metadata from the descriptor this record was fetched for.
    pub fn with_descriptor(self, descriptor: &ChannelDescriptor) -> Self {
        Self {
            category: Some(descriptor.category),
            channel_name_config: Some(descriptor.channel_name.clone()),
            ..self
        }
    }
}
