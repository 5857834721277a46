use super::update::Effect;
use crate::config::AppConfig;
use crate::pace;
use crate::pace::{PaceEstimate, SessionSummary};
use crate::sink::Progress;
use std::time::Instant;

/// Play state for the whole session. A single enum, so contradictory flag
/// combinations are unrepresentable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayState {
    Idle,
    Playing,
    Paused,
    Finished,
}

/// One run through a segmented text, from Start to Finished or Stop.
///
/// `current_index` may equal `lines.len()`, which means playback ran past
/// the last line. `active_token` identifies the in-flight utterance; any
/// callback carrying an older token is stale and must be ignored.
pub struct Session {
    pub(in crate::session) lines: Vec<String>,
    pub(in crate::session) current_index: usize,
    pub(in crate::session) play_state: PlayState,
    pub(in crate::session) started_at: Option<Instant>,
    pub(in crate::session) words_spoken: u64,
    pub(in crate::session) active_token: u64,
}

impl Session {
    pub(in crate::session) fn new(lines: Vec<String>) -> Self {
        Self {
            lines,
            current_index: 0,
            play_state: PlayState::Idle,
            started_at: None,
            words_spoken: 0,
            active_token: 0,
        }
    }

    /// Invalidate any in-flight utterance; its completion becomes stale.
    pub(in crate::session) fn invalidate_utterance(&mut self) {
        self.active_token = self.active_token.wrapping_add(1);
    }

    /// Mint the token for the next dispatched utterance or advance timer.
    pub(in crate::session) fn mint_token(&mut self) -> u64 {
        self.active_token = self.active_token.wrapping_add(1);
        self.active_token
    }

    pub(in crate::session) fn is_stale(&self, token: u64) -> bool {
        token != self.active_token
    }

    pub(in crate::session) fn last_index(&self) -> usize {
        self.lines.len().saturating_sub(1)
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }
}

/// The session plus the settings snapshot it dispatches with. Handlers live
/// in `session::update` and are driven through [`Reader::reduce`].
pub struct Reader {
    pub(in crate::session) session: Session,
    pub(in crate::session) config: AppConfig,
}

impl Reader {
    /// Begin a session over freshly segmented lines. Counters are reset and
    /// the sink is told to render; speaking starts only on an explicit play.
    pub(crate) fn start(lines: Vec<String>, config: AppConfig) -> (Self, Vec<Effect>) {
        debug_assert!(!lines.is_empty(), "a session needs at least one line");
        let mut session = Session::new(lines);
        session.started_at = Some(Instant::now());
        let reader = Reader { session, config };
        let effects = vec![
            Effect::Restyle {
                theme: reader.config.theme,
                highlight_color: reader.config.highlight_color.clone(),
            },
            Effect::RenderLines,
            Effect::UpdateProgress(reader.progress()),
        ];
        (reader, effects)
    }

    pub fn lines(&self) -> &[String] {
        &self.session.lines
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Pace figures for the session as of now; `None` before the first
    /// completed line.
    pub(in crate::session) fn pace_sample(&self) -> Option<PaceEstimate> {
        let started = self.session.started_at?;
        pace::estimate(
            started,
            Instant::now(),
            self.session.words_spoken,
            self.session.current_index,
            self.session.lines.len(),
        )
    }

    pub(in crate::session) fn progress(&self) -> Progress {
        let total = self.session.lines.len();
        let completed = self.session.current_index;
        let percent = if total == 0 {
            0.0
        } else {
            completed as f32 / total as f32 * 100.0
        };
        let estimate = self.pace_sample();
        Progress {
            current_line: (completed + 1).min(total),
            total_lines: total,
            percent,
            estimated_remaining: estimate.map(|e| e.estimated_remaining),
            live_wpm: if self.config.show_wpm {
                estimate.map(|e| e.live_wpm)
            } else {
                None
            },
        }
    }

    pub(in crate::session) fn summary(&self) -> SessionSummary {
        let reading_time = self
            .session
            .started_at
            .map(|started| Instant::now().saturating_duration_since(started))
            .unwrap_or_default();
        SessionSummary {
            total_lines: self.session.lines.len(),
            total_words: self.session.words_spoken,
            reading_time,
            average_wpm: pace::live_wpm(self.session.words_spoken, reading_time),
            target_wpm: self.config.speed_wpm,
        }
    }
}
