//! Progress and pace math for a reading session.
//!
//! Everything here is a pure function of the session counters and a caller
//! supplied `now`, so the figures can be recomputed on every progress push
//! without holding state of their own.

use std::time::{Duration, Instant};

/// Live pace figures derived from elapsed time and dispatched words.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PaceEstimate {
    pub elapsed: Duration,
    pub avg_time_per_line: Duration,
    pub estimated_remaining: Duration,
    pub live_wpm: u32,
}

/// End-of-session statistics shown once playback runs past the last line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionSummary {
    pub total_lines: usize,
    pub total_words: u64,
    pub reading_time: Duration,
    pub average_wpm: u32,
    pub target_wpm: u32,
}

/// Estimate pace from the session counters.
///
/// Undefined until at least one line has completed; callers render a
/// "not yet available" placeholder on `None`.
pub fn estimate(
    started_at: Instant,
    now: Instant,
    words_spoken: u64,
    completed_lines: usize,
    total_lines: usize,
) -> Option<PaceEstimate> {
    if completed_lines == 0 {
        return None;
    }
    let elapsed = now.saturating_duration_since(started_at);
    let avg_time_per_line = elapsed / completed_lines as u32;
    let remaining_lines = total_lines.saturating_sub(completed_lines) as u32;
    Some(PaceEstimate {
        elapsed,
        avg_time_per_line,
        estimated_remaining: avg_time_per_line * remaining_lines,
        live_wpm: live_wpm(words_spoken, elapsed),
    })
}

/// Words per minute over the elapsed window, guarded against a zero window.
pub fn live_wpm(words_spoken: u64, elapsed: Duration) -> u32 {
    let secs = elapsed.as_secs_f64();
    if secs <= 0.0 {
        return 0;
    }
    (words_spoken as f64 / secs * 60.0).round() as u32
}

/// Render a duration as `m:ss` for progress and summary lines.
pub fn format_mm_ss(duration: Duration) -> String {
    let total = duration.as_secs();
    format!("{}:{:02}", total / 60, total % 60)
}
