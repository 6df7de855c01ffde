//! Console reporting: per-channel lines, run summary, config summary.

use std::path::Path;

use crate::app::pipeline::RunSummary;
use crate::domain::{Category, ChannelDescriptor};

pub fn format_success(channel_id: &str, path: &Path) -> String {
    format!("[OK] {channel_id} -> {}", path.display())
}

pub fn format_failure(channel_id: &str, reason: &str) -> String {
    format!("[FAIL] {channel_id}: {reason}")
}

pub fn format_summary(summary: &RunSummary) -> String {
    format!(
        "Done. successes={} failures={} total={}",
        summary.successes,
        summary.failure_count(),
        summary.total()
    )
}

/// Count channels per category, in order of first appearance.
pub fn count_by_category(channels: &[ChannelDescriptor]) -> Vec<(Category, usize)> {
    let mut counts: Vec<(Category, usize)> = Vec::new();
    for channel in channels {
        match counts.iter_mut().find(|(c, _)| *c == channel.category) {
            Some((_, n)) => *n += 1,
            None => counts.push((channel.category, 1)),
        }
    }
    counts
}

/// Text printed by `summary`: total loaded, then one line per category.
pub fn format_category_summary(channels: &[ChannelDescriptor]) -> String {
    let mut out = format!("Loaded {} channels", channels.len());
    for (category, count) in count_by_category(channels) {
        out.push_str(&format!("\n{category}: {count}"));
    }
    out
}
