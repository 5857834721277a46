mod lifecycle;
mod navigation;
mod settings;

use super::messages::Message;
use super::state::Reader;
use crate::config::ThemeMode;
use crate::pace::SessionSummary;
use crate::sink::Progress;
use crate::speech::SpeakRequest;
use std::time::Duration;

/// Work that must be performed outside the pure reducer: backend calls, sink
/// notifications, timers, and persistence.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Effect {
    RenderLines,
    Highlight(usize),
    MarkCompleted(usize),
    ClearCompleted,
    UpdateProgress(Progress),
    Reveal(usize),
    Announce(String),
    ShowSummary(SessionSummary),
    Restyle {
        theme: ThemeMode,
        highlight_color: String,
    },
    Speak(SpeakRequest),
    CancelSpeech,
    ScheduleAdvance {
        token: u64,
        delay: Duration,
    },
    ListVoices,
    SaveSettings,
    SaveBookmark,
    Quit,
}

impl Reader {
    /// Apply one message and describe the side work it requires. State
    /// changes are visible to the caller immediately; the effects are
    /// executed afterwards by the runtime.
    pub(crate) fn reduce(&mut self, message: Message) -> Vec<Effect> {
        let mut effects = Vec::new();

        match message {
            Message::TogglePlayPause => self.handle_toggle_play_pause(&mut effects),
            Message::Play => self.handle_play(&mut effects),
            Message::Pause => self.handle_pause(&mut effects),
            Message::NextLine => self.handle_next_line(&mut effects),
            Message::PreviousLine => self.handle_previous_line(&mut effects),
            Message::JumpLines(delta) => self.handle_jump_lines(delta, &mut effects),
            Message::JumpToStart => self.handle_jump_to_start(&mut effects),
            Message::JumpToEnd => self.handle_jump_to_end(&mut effects),
            Message::Restart => self.handle_restart(&mut effects),
            Message::Stop => self.handle_stop(&mut effects),
            Message::SpeedChanged(wpm) => self.handle_speed_changed(wpm, &mut effects),
            Message::VoiceChanged(index) => self.handle_voice_changed(index, &mut effects),
            Message::VolumeChanged(volume) => self.handle_volume_changed(volume, &mut effects),
            Message::ToggleMute => self.handle_toggle_mute(&mut effects),
            Message::AutoScrollChanged(enabled) => {
                self.handle_auto_scroll_changed(enabled, &mut effects)
            }
            Message::ShowWpmChanged(enabled) => self.handle_show_wpm_changed(enabled, &mut effects),
            Message::ToggleTheme => self.handle_toggle_theme(&mut effects),
            Message::HighlightColorChanged(color) => {
                self.handle_highlight_color_changed(color, &mut effects)
            }
            Message::ListVoices => effects.push(Effect::ListVoices),
            Message::UtteranceFinished { token } => {
                self.handle_utterance_finished(token, &mut effects)
            }
            Message::UtteranceFailed { token, error } => {
                self.handle_utterance_failed(token, error, &mut effects)
            }
            Message::AdvanceElapsed { token } => self.handle_advance_elapsed(token, &mut effects),
            Message::SafeQuit => effects.push(Effect::Quit),
        }

        effects
    }
}

#[cfg(test)]
mod tests {
    use super::Effect;
    use crate::config::AppConfig;
    use crate::session::messages::Message;
    use crate::session::state::{PlayState, Reader};
    use crate::speech::SpeechErrorKind;

    fn reader_with(lines: &[&str]) -> Reader {
        let lines = lines.iter().map(|s| s.to_string()).collect();
        let (reader, _) = Reader::start(lines, AppConfig::default());
        reader
    }

    fn speak_request(effects: &[Effect]) -> Option<&crate::speech::SpeakRequest> {
        effects.iter().find_map(|effect| match effect {
            Effect::Speak(request) => Some(request),
            _ => None,
        })
    }

    fn advance_token(effects: &[Effect]) -> Option<u64> {
        effects.iter().find_map(|effect| match effect {
            Effect::ScheduleAdvance { token, .. } => Some(*token),
            _ => None,
        })
    }

    #[test]
    fn start_establishes_fresh_counters() {
        let lines = vec!["one two".to_string(), "three".to_string()];
        let (reader, effects) = Reader::start(lines, AppConfig::default());
        assert_eq!(reader.session.current_index, 0);
        assert_eq!(reader.session.play_state, PlayState::Idle);
        assert_eq!(reader.session.words_spoken, 0);
        assert!(effects.contains(&Effect::RenderLines));
        let progress = effects.iter().find_map(|effect| match effect {
            Effect::UpdateProgress(progress) => Some(progress),
            _ => None,
        });
        let progress = progress.expect("start pushes progress");
        assert_eq!(progress.current_line, 1);
        assert_eq!(progress.total_lines, 2);
    }

    #[test]
    fn play_dispatches_the_current_line() {
        let mut reader = reader_with(&["Hello world", "Foo bar baz"]);
        let effects = reader.reduce(Message::Play);
        assert_eq!(reader.session.play_state, PlayState::Playing);
        assert!(effects.contains(&Effect::Highlight(0)));
        let request = speak_request(&effects).expect("play speaks line 0");
        assert_eq!(request.text, "Hello world");
        assert_eq!(reader.session.words_spoken, 2);
    }

    #[test]
    fn completion_advances_and_keeps_playing() {
        let mut reader = reader_with(&["Hello world", "Foo bar baz", "tail"]);
        let effects = reader.reduce(Message::Play);
        let token = speak_request(&effects).unwrap().token;

        let effects = reader.reduce(Message::UtteranceFinished { token });
        assert_eq!(reader.session.current_index, 1);
        assert_eq!(reader.session.play_state, PlayState::Playing);
        assert_eq!(reader.session.words_spoken, 2);
        assert!(effects.contains(&Effect::MarkCompleted(0)));
        let gap = advance_token(&effects).expect("completion schedules the next line");

        let effects = reader.reduce(Message::AdvanceElapsed { token: gap });
        let request = speak_request(&effects).expect("the pause ends in the next line");
        assert_eq!(request.text, "Foo bar baz");
        assert_eq!(reader.session.words_spoken, 5);
    }

    #[test]
    fn stale_completion_after_pause_changes_nothing() {
        let mut reader = reader_with(&["Hello world", "Foo bar baz"]);
        let effects = reader.reduce(Message::Play);
        let token = speak_request(&effects).unwrap().token;

        let effects = reader.reduce(Message::Pause);
        assert_eq!(reader.session.play_state, PlayState::Paused);
        assert!(effects.contains(&Effect::CancelSpeech));

        let effects = reader.reduce(Message::UtteranceFinished { token });
        assert!(effects.is_empty());
        assert_eq!(reader.session.current_index, 0);
        assert_eq!(reader.session.play_state, PlayState::Paused);
    }

    #[test]
    fn stale_advance_timer_is_dropped() {
        let mut reader = reader_with(&["a", "b"]);
        let effects = reader.reduce(Message::Play);
        let token = speak_request(&effects).unwrap().token;
        let effects = reader.reduce(Message::UtteranceFinished { token });
        let gap = advance_token(&effects).unwrap();

        reader.reduce(Message::Pause);
        let effects = reader.reduce(Message::AdvanceElapsed { token: gap });
        assert!(effects.is_empty());
        assert_eq!(reader.session.current_index, 1);
        assert_eq!(reader.session.play_state, PlayState::Paused);
    }

    #[test]
    fn pause_outside_playing_is_a_no_op() {
        let mut reader = reader_with(&["a"]);
        let effects = reader.reduce(Message::Pause);
        assert!(effects.is_empty());
        assert_eq!(reader.session.play_state, PlayState::Idle);
    }

    #[test]
    fn next_then_previous_restores_the_index() {
        let mut reader = reader_with(&["a", "b", "c"]);
        reader.reduce(Message::NextLine);
        assert_eq!(reader.session.current_index, 1);
        reader.reduce(Message::PreviousLine);
        assert_eq!(reader.session.current_index, 0);
    }

    #[test]
    fn navigation_is_a_no_op_at_the_boundaries() {
        let mut reader = reader_with(&["a", "b"]);
        assert!(reader.reduce(Message::PreviousLine).is_empty());
        reader.reduce(Message::NextLine);
        assert_eq!(reader.session.current_index, 1);
        assert!(reader.reduce(Message::NextLine).is_empty());
        assert_eq!(reader.session.current_index, 1);
    }

    #[test]
    fn navigation_while_playing_speaks_the_new_line() {
        let mut reader = reader_with(&["a", "b", "c"]);
        reader.reduce(Message::Play);
        let effects = reader.reduce(Message::NextLine);
        assert!(effects.contains(&Effect::CancelSpeech));
        let request = speak_request(&effects).expect("playing navigation re-dispatches");
        assert_eq!(request.text, "b");
        assert_eq!(reader.session.play_state, PlayState::Playing);
    }

    #[test]
    fn jumps_clamp_to_the_line_range() {
        let mut reader = reader_with(&["a", "b", "c"]);
        reader.reduce(Message::JumpLines(999));
        assert_eq!(reader.session.current_index, 2);
        reader.reduce(Message::JumpLines(-999));
        assert_eq!(reader.session.current_index, 0);
        assert!(reader.reduce(Message::JumpLines(0)).is_empty());
    }

    #[test]
    fn jump_to_end_never_auto_resumes() {
        let mut reader = reader_with(&["a", "b", "c"]);
        reader.reduce(Message::Play);
        let effects = reader.reduce(Message::JumpToEnd);
        assert_eq!(reader.session.current_index, 2);
        assert_eq!(reader.session.play_state, PlayState::Paused);
        assert!(speak_request(&effects).is_none());
        assert!(effects.contains(&Effect::Highlight(2)));
    }

    #[test]
    fn jump_to_start_keeps_a_playing_session_speaking() {
        let mut reader = reader_with(&["a", "b", "c"]);
        reader.reduce(Message::Play);
        reader.reduce(Message::NextLine);
        let effects = reader.reduce(Message::JumpToStart);
        assert_eq!(reader.session.current_index, 0);
        let request = speak_request(&effects).expect("jump to start resumes speech");
        assert_eq!(request.text, "a");
    }

    #[test]
    fn single_line_session_finishes_with_a_summary() {
        let mut reader = reader_with(&["only line here"]);
        let effects = reader.reduce(Message::Play);
        let token = speak_request(&effects).unwrap().token;
        let effects = reader.reduce(Message::UtteranceFinished { token });
        assert_eq!(reader.session.current_index, 1);
        let gap = advance_token(&effects).unwrap();

        let effects = reader.reduce(Message::AdvanceElapsed { token: gap });
        assert_eq!(reader.session.play_state, PlayState::Finished);
        let summary = effects.iter().find_map(|effect| match effect {
            Effect::ShowSummary(summary) => Some(summary),
            _ => None,
        });
        let summary = summary.expect("finishing emits the session summary");
        assert_eq!(summary.total_lines, 1);
        assert_eq!(summary.total_words, 3);
        assert_eq!(summary.target_wpm, reader.config.speed_wpm);
    }

    #[test]
    fn resuming_a_finished_session_wraps_to_the_first_line() {
        let mut reader = reader_with(&["a b"]);
        let effects = reader.reduce(Message::Play);
        let token = speak_request(&effects).unwrap().token;
        let effects = reader.reduce(Message::UtteranceFinished { token });
        let gap = advance_token(&effects).unwrap();
        reader.reduce(Message::AdvanceElapsed { token: gap });
        assert_eq!(reader.session.play_state, PlayState::Finished);

        let effects = reader.reduce(Message::Play);
        assert_eq!(reader.session.current_index, 0);
        assert_eq!(reader.session.play_state, PlayState::Playing);
        assert_eq!(speak_request(&effects).unwrap().text, "a b");
    }

    #[test]
    fn backend_errors_pause_and_stay_resumable() {
        let mut reader = reader_with(&["a", "b"]);
        let effects = reader.reduce(Message::Play);
        let token = speak_request(&effects).unwrap().token;

        let effects = reader.reduce(Message::UtteranceFailed {
            token,
            error: SpeechErrorKind::SynthesisFailed,
        });
        assert_eq!(reader.session.play_state, PlayState::Paused);
        assert_eq!(reader.session.current_index, 0);
        assert!(
            effects
                .iter()
                .any(|effect| matches!(effect, Effect::Announce(_)))
        );

        let effects = reader.reduce(Message::Play);
        assert_eq!(speak_request(&effects).unwrap().text, "a");
    }

    #[test]
    fn stale_backend_errors_are_dropped() {
        let mut reader = reader_with(&["a", "b"]);
        let effects = reader.reduce(Message::Play);
        let token = speak_request(&effects).unwrap().token;
        reader.reduce(Message::NextLine);

        let effects = reader.reduce(Message::UtteranceFailed {
            token,
            error: SpeechErrorKind::Network,
        });
        assert!(effects.is_empty());
        assert_eq!(reader.session.play_state, PlayState::Playing);
        assert_eq!(reader.session.current_index, 1);
    }

    #[test]
    fn restart_resets_counters_and_clears_marks() {
        let mut reader = reader_with(&["a b", "c"]);
        let effects = reader.reduce(Message::Play);
        let token = speak_request(&effects).unwrap().token;
        reader.reduce(Message::UtteranceFinished { token });

        let effects = reader.reduce(Message::Restart);
        assert_eq!(reader.session.current_index, 0);
        assert_eq!(reader.session.words_spoken, 0);
        assert_eq!(reader.session.play_state, PlayState::Idle);
        assert!(effects.contains(&Effect::ClearCompleted));
        assert!(effects.contains(&Effect::CancelSpeech));
    }

    #[test]
    fn stop_returns_to_idle_but_keeps_the_lines() {
        let mut reader = reader_with(&["a", "b"]);
        reader.reduce(Message::Play);
        let effects = reader.reduce(Message::Stop);
        assert_eq!(reader.session.play_state, PlayState::Idle);
        assert!(effects.contains(&Effect::CancelSpeech));
        assert_eq!(reader.lines().len(), 2);
    }

    #[test]
    fn muted_sessions_dispatch_at_zero_volume() {
        let mut reader = reader_with(&["a"]);
        reader.reduce(Message::ToggleMute);
        let effects = reader.reduce(Message::Play);
        assert_eq!(speak_request(&effects).unwrap().volume, 0.0);
    }

    #[test]
    fn speed_changes_clamp_and_persist() {
        let mut reader = reader_with(&["a"]);
        let effects = reader.reduce(Message::SpeedChanged(9999));
        assert_eq!(reader.config.speed_wpm, crate::config::MAX_WPM);
        assert!(effects.contains(&Effect::SaveSettings));
        assert!(reader.reduce(Message::SpeedChanged(crate::config::MAX_WPM)).is_empty());
    }

    #[test]
    fn settings_snapshot_applies_at_the_next_dispatch() {
        let mut reader = reader_with(&["a", "b"]);
        let effects = reader.reduce(Message::Play);
        let first_rate = speak_request(&effects).unwrap().rate;
        let token = speak_request(&effects).unwrap().token;

        reader.reduce(Message::SpeedChanged(300));
        let effects = reader.reduce(Message::UtteranceFinished { token });
        let gap = advance_token(&effects).unwrap();
        let effects = reader.reduce(Message::AdvanceElapsed { token: gap });
        let second_rate = speak_request(&effects).unwrap().rate;
        assert!(second_rate > first_rate);
    }
}
