//! `channel-stats` library crate.
//!
//! The binary (`channel-stats`) is a thin wrapper around this library so that:
//!
//! - the ingestion loop is testable with a stub fetcher, without spawning processes
//! - config loading and snapshot layout can be reused by other tooling

pub mod app;
pub mod cli;
pub mod data;
pub mod domain;
pub mod error;
pub mod io;
pub mod report;
pub mod settings;
