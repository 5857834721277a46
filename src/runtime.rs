//! The event loop wiring the sequencer to its collaborators.
//!
//! A single thread of control: messages come off one channel (user commands,
//! backend results, the SIGINT handler), each is reduced to state plus
//! effects, and the effects run against the backend, sink, and cache. The
//! inter-line pause is the only timer; it is realized as a receive deadline
//! so no extra thread is needed, and its token keeps late firings harmless.

use crate::cache;
use crate::session::{Effect, Message, Reader};
use crate::sink::PresentationSink;
use crate::speech::{SpeechBackend, Voice};
use std::path::PathBuf;
use std::sync::mpsc::{Receiver, RecvTimeoutError};
use std::time::Instant;
use tracing::info;

pub struct Runtime<B: SpeechBackend, S: PresentationSink> {
    reader: Reader,
    backend: B,
    sink: S,
    events: Receiver<Message>,
    text_path: Option<PathBuf>,
    exit_when_finished: bool,
    pending_advance: Option<(Instant, u64)>,
}

impl<B: SpeechBackend, S: PresentationSink> Runtime<B, S> {
    pub fn new(
        reader: Reader,
        backend: B,
        sink: S,
        events: Receiver<Message>,
        text_path: Option<PathBuf>,
        exit_when_finished: bool,
    ) -> Self {
        Self {
            reader,
            backend,
            sink,
            events,
            text_path,
            exit_when_finished,
            pending_advance: None,
        }
    }

    pub fn run(mut self, initial: Vec<Effect>) -> anyhow::Result<()> {
        if self.perform(initial) {
            return Ok(());
        }
        while let Some(message) = self.next_message() {
            let effects = self.reader.reduce(message);
            if self.perform(effects) {
                break;
            }
        }
        Ok(())
    }

    /// Block for the next message, or synthesize the advance tick when its
    /// deadline passes first.
    fn next_message(&mut self) -> Option<Message> {
        if let Some((deadline, token)) = self.pending_advance {
            let now = Instant::now();
            if now >= deadline {
                self.pending_advance = None;
                return Some(Message::AdvanceElapsed { token });
            }
            match self.events.recv_timeout(deadline - now) {
                Ok(message) => Some(message),
                Err(RecvTimeoutError::Timeout) => {
                    self.pending_advance = None;
                    Some(Message::AdvanceElapsed { token })
                }
                Err(RecvTimeoutError::Disconnected) => None,
            }
        } else {
            self.events.recv().ok()
        }
    }

    /// Execute effects in order; returns true when the loop should end.
    fn perform(&mut self, effects: Vec<Effect>) -> bool {
        for effect in effects {
            match effect {
                Effect::RenderLines => self.sink.render_lines(self.reader.lines()),
                Effect::Highlight(index) => self.sink.highlight(index),
                Effect::MarkCompleted(index) => self.sink.mark_completed(index),
                Effect::ClearCompleted => self.sink.clear_completed(),
                Effect::UpdateProgress(progress) => self.sink.update_progress(&progress),
                Effect::Reveal(index) => self.sink.reveal(index),
                Effect::Announce(message) => self.sink.announce(&message),
                Effect::ShowSummary(summary) => {
                    self.sink.show_summary(&summary);
                    if self.exit_when_finished {
                        info!("Reached the end in batch mode");
                        return true;
                    }
                }
                Effect::Restyle {
                    theme,
                    highlight_color,
                } => self.sink.restyle(theme, &highlight_color),
                Effect::Speak(request) => self.backend.speak(request),
                Effect::CancelSpeech => self.backend.cancel_all(),
                Effect::ScheduleAdvance { token, delay } => {
                    self.pending_advance = Some((Instant::now() + delay, token));
                }
                Effect::ListVoices => {
                    let listing =
                        format_voice_list(&self.backend.voices(), self.reader.config().voice_index);
                    self.sink.announce(&listing);
                }
                Effect::SaveSettings => cache::save_settings_overlay(self.reader.config()),
                Effect::SaveBookmark => {
                    if let Some(path) = &self.text_path {
                        cache::save_bookmark(path, self.reader.session().current_index());
                    }
                }
                Effect::Quit => {
                    info!("Quitting");
                    return true;
                }
            }
        }
        false
    }
}

fn format_voice_list(voices: &[Voice], selected: usize) -> String {
    if voices.is_empty() {
        return "No voices available".to_string();
    }
    let entries: Vec<String> = voices
        .iter()
        .enumerate()
        .map(|(index, voice)| {
            let marker = if index == selected { "*" } else { " " };
            let default = if voice.is_default { " (default)" } else { "" };
            let remote = if voice.is_local { "" } else { " (remote)" };
            format!(
                "{marker}{index}: {} [{}]{default}{remote}",
                voice.name, voice.language
            )
        })
        .collect();
    format!("Voices:\n{}", entries.join("\n"))
}
