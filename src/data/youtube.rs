//! YouTube Data API integration for channel statistics.

use std::time::Duration;

use chrono::{DateTime, Utc};
use reqwest::StatusCode;
use reqwest::blocking::Client;
use serde_json::Value;
use thiserror::Error;

use crate::domain::ChannelStatsRecord;
use crate::settings::Settings;

pub const DEFAULT_BASE_URL: &str = "https://www.googleapis.com/youtube/v3";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

const CHANNEL_PARTS: &str = "snippet,statistics";

/// Per-channel fetch failures. None of these abort a run.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request failed: {0}")]
    Transport(#[source] reqwest::Error),

    #[error("upstream returned status {status}")]
    Upstream { status: StatusCode },

    #[error("no channel found for channel_id={channel_id}")]
    NotFound { channel_id: String },

    #[error("malformed response: {0}")]
    Malformed(String),
}

/// Source of channel statistics, one lookup per call.
pub trait StatsFetcher {
    fn fetch(&self, channel_id: &str) -> Result<ChannelStatsRecord, FetchError>;
}

pub struct YouTubeClient {
    client: Client,
    api_key: String,
    base_url: String,
}

impl YouTubeClient {
    pub fn new(api_key: impl Into<String>, base_url: impl Into<String>, timeout: Duration) -> Result<Self, FetchError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| FetchError::Transport(e.without_url()))?;
        Ok(Self {
            client,
            api_key: api_key.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn from_settings(settings: &Settings) -> Result<Self, FetchError> {
        Self::new(settings.api_key.clone(), settings.api_base.clone(), settings.timeout)
    }

    fn get_channel(&self, channel_id: &str) -> Result<Value, FetchError> {
        let url = format!("{}/channels", self.base_url);
        let resp = self
            .client
            .get(url)
            .query(&[
                ("part", CHANNEL_PARTS),
                ("id", channel_id),
                ("key", self.api_key.as_str()),
            ])
            .send()
            // The request URL carries the API key; keep it out of error text.
            .map_err(|e| FetchError::Transport(e.without_url()))?;

        if !resp.status().is_success() {
            return Err(FetchError::Upstream { status: resp.status() });
        }

        resp.json::<Value>()
            .map_err(|e| FetchError::Malformed(format!("body is not JSON: {}", e.without_url())))
    }
}

impl StatsFetcher for YouTubeClient {
    fn fetch(&self, channel_id: &str) -> Result<ChannelStatsRecord, FetchError> {
        tracing::debug!(channel_id, "fetching channel statistics");
        let payload = self.get_channel(channel_id)?;
        parse_channel_response(channel_id, payload, Utc::now())
    }
}

/// Map a `channels.list` response body onto a record.
///
/// Only the first item is used; an absent or empty `items` array means the
/// id is unknown upstream.
pub fn parse_channel_response(
    channel_id: &str,
    payload: Value,
    ingested_at: DateTime<Utc>,
) -> Result<ChannelStatsRecord, FetchError> {
    let Value::Object(mut body) = payload else {
        return Err(FetchError::Malformed("expected a JSON object".to_string()));
    };

    let item = match body.remove("items") {
        None | Some(Value::Null) => None,
        Some(Value::Array(items)) => items.into_iter().next(),
        Some(_) => return Err(FetchError::Malformed("`items` is not an array".to_string())),
    };
    let Some(item) = item else {
        return Err(FetchError::NotFound {
            channel_id: channel_id.to_string(),
        });
    };

    let snippet = item.get("snippet");
    let stats = item.get("statistics");
    let text = |key: &str| {
        snippet
            .and_then(|s| s.get(key))
            .and_then(Value::as_str)
            .map(str::to_string)
    };

    Ok(ChannelStatsRecord {
        ingested_at,
        channel_id: channel_id.to_string(),
        title: text("title"),
        published_at: text("publishedAt"),
        country: text("country"),
        subscriber_count: coerce_count(stats, "subscriberCount")?,
        view_count: coerce_count(stats, "viewCount")?,
        video_count: coerce_count(stats, "videoCount")?,
        raw: item,
        category: None,
        channel_name_config: None,
    })
}

/// Counts arrive as decimal strings; a missing field counts as zero.
fn coerce_count(stats: Option<&Value>, key: &str) -> Result<u64, FetchError> {
    match stats.and_then(|s| s.get(key)) {
        None | Some(Value::Null) => Ok(0),
        Some(Value::Number(n)) => n
            .as_u64()
            .ok_or_else(|| FetchError::Malformed(format!("`{key}` is not a non-negative integer: {n}"))),
        Some(Value::String(s)) => s
            .trim()
            .parse::<u64>()
            .map_err(|_| FetchError::Malformed(format!("`{key}` is not a non-negative integer: '{s}'"))),
        Some(other) => Err(FetchError::Malformed(format!("`{key}` has unexpected type: {other}"))),
    }
}
