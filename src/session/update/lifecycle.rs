use super::Effect;
use super::super::state::{PlayState, Reader};
use crate::speech::{SpeakRequest, SpeechErrorKind, wpm_to_rate};
use crate::text_utils::count_words;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

impl Reader {
    pub(super) fn handle_toggle_play_pause(&mut self, effects: &mut Vec<Effect>) {
        if self.session.play_state == PlayState::Playing {
            self.handle_pause(effects);
        } else {
            self.handle_play(effects);
        }
    }

    pub(super) fn handle_play(&mut self, effects: &mut Vec<Effect>) {
        if self.session.current_index >= self.session.lines.len() {
            debug!("Resuming past the end; wrapping to the first line");
            self.session.current_index = 0;
        }
        info!(line = self.session.current_index + 1, "Resuming playback");
        self.session.play_state = PlayState::Playing;
        self.speak_current_line(effects);
    }

    pub(super) fn handle_pause(&mut self, effects: &mut Vec<Effect>) {
        if self.session.play_state != PlayState::Playing {
            return;
        }
        info!(line = self.session.current_index + 1, "Pausing playback");
        self.session.play_state = PlayState::Paused;
        self.session.invalidate_utterance();
        effects.push(Effect::CancelSpeech);
    }

    /// Dispatch the line under the cursor, or finish when playback ran past
    /// the end.
    pub(super) fn speak_current_line(&mut self, effects: &mut Vec<Effect>) {
        if self.session.play_state != PlayState::Playing
            || self.session.current_index >= self.session.lines.len()
        {
            self.finish(effects);
            return;
        }
        let index = self.session.current_index;
        effects.push(Effect::Highlight(index));
        let token = self.session.mint_token();
        let line = self.session.lines[index].clone();
        // Words count at dispatch, not completion, so the pace figure tracks
        // line-start cadence even across cancelled utterances.
        self.session.words_spoken += count_words(&line);
        let request = SpeakRequest {
            token,
            text: line,
            voice: self.config.voice_index,
            rate: wpm_to_rate(self.config.speed_wpm),
            pitch: 1.0,
            volume: self.effective_volume(),
        };
        debug!(
            line = index + 1,
            token,
            rate = request.rate,
            "Dispatching utterance"
        );
        effects.push(Effect::Speak(request));
    }

    pub(super) fn handle_utterance_finished(&mut self, token: u64, effects: &mut Vec<Effect>) {
        if self.session.is_stale(token) {
            debug!(
                token,
                current = self.session.active_token,
                "Ignoring stale utterance completion"
            );
            return;
        }
        let index = self.session.current_index;
        effects.push(Effect::MarkCompleted(index));
        self.session.current_index += 1;
        if let Some(pace) = self.pace_sample() {
            debug!(
                lines_done = self.session.current_index,
                elapsed_ms = pace.elapsed.as_millis() as u64,
                avg_line_ms = pace.avg_time_per_line.as_millis() as u64,
                wpm = pace.live_wpm,
                "Pace sample"
            );
        }
        effects.push(Effect::UpdateProgress(self.progress()));
        effects.push(Effect::SaveBookmark);
        if self.config.auto_scroll && self.session.current_index < self.session.lines.len() {
            effects.push(Effect::Reveal(self.session.current_index));
        }
        let gap = self.session.mint_token();
        effects.push(Effect::ScheduleAdvance {
            token: gap,
            delay: Duration::from_millis(self.config.pause_between_lines_ms),
        });
    }

    pub(super) fn handle_advance_elapsed(&mut self, token: u64, effects: &mut Vec<Effect>) {
        if self.session.is_stale(token) {
            debug!(token, "Ignoring stale advance timer");
            return;
        }
        self.speak_current_line(effects);
    }

    pub(super) fn handle_utterance_failed(
        &mut self,
        token: u64,
        error: SpeechErrorKind,
        effects: &mut Vec<Effect>,
    ) {
        if self.session.is_stale(token) {
            debug!(token, %error, "Ignoring stale utterance error");
            return;
        }
        warn!(
            line = self.session.current_index + 1,
            %error,
            "Speech backend error; pausing"
        );
        self.session.play_state = PlayState::Paused;
        self.session.invalidate_utterance();
        effects.push(Effect::CancelSpeech);
        effects.push(Effect::Announce(format!(
            "Paused: {error}. Play again to retry this line."
        )));
    }

    pub(super) fn handle_restart(&mut self, effects: &mut Vec<Effect>) {
        info!("Restarting session");
        self.session.invalidate_utterance();
        effects.push(Effect::CancelSpeech);
        self.session.current_index = 0;
        self.session.words_spoken = 0;
        self.session.started_at = Some(Instant::now());
        self.session.play_state = PlayState::Idle;
        effects.push(Effect::ClearCompleted);
        effects.push(Effect::UpdateProgress(self.progress()));
        effects.push(Effect::SaveBookmark);
    }

    pub(super) fn handle_stop(&mut self, effects: &mut Vec<Effect>) {
        info!("Stopping session");
        self.session.invalidate_utterance();
        effects.push(Effect::CancelSpeech);
        self.session.play_state = PlayState::Idle;
        effects.push(Effect::ClearCompleted);
        effects.push(Effect::Announce(
            "Stopped. The text stays loaded; play or restart to continue.".to_string(),
        ));
    }

    fn finish(&mut self, effects: &mut Vec<Effect>) {
        self.session.play_state = PlayState::Finished;
        self.session.invalidate_utterance();
        effects.push(Effect::CancelSpeech);
        let summary = self.summary();
        info!(
            total_lines = summary.total_lines,
            total_words = summary.total_words,
            average_wpm = summary.average_wpm,
            "Reading finished"
        );
        effects.push(Effect::UpdateProgress(self.progress()));
        effects.push(Effect::ShowSummary(summary));
        effects.push(Effect::SaveBookmark);
    }

    fn effective_volume(&self) -> f32 {
        if self.config.is_muted {
            0.0
        } else {
            f32::from(self.config.volume) / 100.0
        }
    }
}
