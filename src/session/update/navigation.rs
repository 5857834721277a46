use super::Effect;
use super::super::state::{PlayState, Reader};
use tracing::{debug, info};

impl Reader {
    pub(super) fn handle_next_line(&mut self, effects: &mut Vec<Effect>) {
        let target = self.session.current_index + 1;
        if target >= self.session.lines.len() {
            debug!("Already at the last line");
            return;
        }
        self.move_to(target, effects);
    }

    pub(super) fn handle_previous_line(&mut self, effects: &mut Vec<Effect>) {
        if self.session.current_index == 0 {
            debug!("Already at the first line");
            return;
        }
        self.move_to(self.session.current_index - 1, effects);
    }

    pub(super) fn handle_jump_lines(&mut self, delta: i64, effects: &mut Vec<Effect>) {
        let last = self.session.last_index() as i64;
        let target = (self.session.current_index as i64 + delta).clamp(0, last) as usize;
        if target == self.session.current_index {
            debug!(delta, "Jump clamps to the current line");
            return;
        }
        info!(delta, target = target + 1, "Jumping");
        self.move_to(target, effects);
    }

    pub(super) fn handle_jump_to_start(&mut self, effects: &mut Vec<Effect>) {
        info!("Seeking to the first line");
        self.move_to(0, effects);
    }

    /// Landing on the last line highlights it but never speaks it; a playing
    /// session drops to paused so an explicit play resumes from here.
    pub(super) fn handle_jump_to_end(&mut self, effects: &mut Vec<Effect>) {
        info!("Seeking to the last line");
        self.session.invalidate_utterance();
        effects.push(Effect::CancelSpeech);
        if self.session.play_state == PlayState::Playing {
            self.session.play_state = PlayState::Paused;
        }
        self.session.current_index = self.session.last_index();
        effects.push(Effect::Highlight(self.session.current_index));
        effects.push(Effect::UpdateProgress(self.progress()));
        effects.push(Effect::SaveBookmark);
    }

    fn move_to(&mut self, target: usize, effects: &mut Vec<Effect>) {
        self.session.invalidate_utterance();
        effects.push(Effect::CancelSpeech);
        self.session.current_index = target;
        effects.push(Effect::UpdateProgress(self.progress()));
        effects.push(Effect::SaveBookmark);
        if self.session.play_state == PlayState::Playing {
            self.speak_current_line(effects);
        } else {
            effects.push(Effect::Highlight(target));
        }
    }
}
