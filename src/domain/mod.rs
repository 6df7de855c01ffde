//! Domain types used throughout the run.
//!
//! This module defines:
//!
//! - the channel config entry (`ChannelDescriptor`, `Category`)
//! - the fetched statistics record (`ChannelStatsRecord`)

pub mod types;

pub use types::*;
