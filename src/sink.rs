//! The rendering seam. The sequencer never draws anything; it emits intent
//! through this interface and the front end decides what that looks like.

use crate::config::ThemeMode;
use crate::pace::SessionSummary;
use std::time::Duration;

/// Progress snapshot pushed after every state transition.
#[derive(Debug, Clone, PartialEq)]
pub struct Progress {
    /// 1-based, clamped to `total_lines` so a finished session reads
    /// "line N of N".
    pub current_line: usize,
    pub total_lines: usize,
    pub percent: f32,
    pub estimated_remaining: Option<Duration>,
    pub live_wpm: Option<u32>,
}

pub trait PresentationSink {
    fn render_lines(&mut self, lines: &[String]);
    fn highlight(&mut self, index: usize);
    fn mark_completed(&mut self, index: usize);
    fn clear_completed(&mut self);
    fn update_progress(&mut self, progress: &Progress);
    /// Transient notice; the assistive live-region analog.
    fn announce(&mut self, message: &str);
    fn show_summary(&mut self, summary: &SessionSummary);
    /// Keep the given line visible when auto-scroll is on.
    fn reveal(&mut self, index: usize);
    /// Display preferences changed; restyle future output.
    fn restyle(&mut self, theme: ThemeMode, highlight_color: &str);
}
