//! Upstream data sources.

pub mod youtube;

pub use youtube::{FetchError, StatsFetcher, YouTubeClient, parse_channel_response};
