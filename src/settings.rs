//! Process configuration resolved from the environment (and `.env`).

use std::time::Duration;

use thiserror::Error;

use crate::data::youtube::{DEFAULT_BASE_URL, DEFAULT_TIMEOUT};

pub const API_KEY_VAR: &str = "YOUTUBE_API_KEY";
pub const API_BASE_VAR: &str = "YOUTUBE_API_BASE";
pub const TIMEOUT_VAR: &str = "YOUTUBE_TIMEOUT_SECS";
pub const TEST_CHANNEL_VAR: &str = "YOUTUBE_TEST_CHANNEL_ID";

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("Missing YOUTUBE_API_KEY in environment (.env).")]
    MissingApiKey,

    #[error("Invalid YOUTUBE_TIMEOUT_SECS '{0}': expected a positive number of seconds.")]
    InvalidTimeout(String),
}

#[derive(Debug, Clone)]
pub struct Settings {
    pub api_key: String,
    pub api_base: String,
    pub timeout: Duration,
    /// Channel used by `probe` when no id is given on the command line.
    pub test_channel_id: Option<String>,
}

impl Settings {
    pub fn from_env() -> Result<Self, SettingsError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Resolve settings through an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, SettingsError> {
        let non_empty = |name: &str| lookup(name).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let api_key = non_empty(API_KEY_VAR).ok_or(SettingsError::MissingApiKey)?;
        let api_base = non_empty(API_BASE_VAR).unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        let timeout = match non_empty(TIMEOUT_VAR) {
            None => DEFAULT_TIMEOUT,
            Some(raw) => match raw.parse::<u64>() {
                Ok(secs) if secs > 0 => Duration::from_secs(secs),
                _ => return Err(SettingsError::InvalidTimeout(raw)),
            },
        };

        Ok(Self {
            api_key,
            api_base,
            timeout,
            test_channel_id: non_empty(TEST_CHANNEL_VAR),
        })
    }
}
