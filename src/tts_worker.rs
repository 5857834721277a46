//! Bundled speech backend that paces lines in real time.
//!
//! No audio path is wired in; each utterance occupies the wall-clock time its
//! word count and requested rate imply, then reports completion the way an
//! engine binding would. Cancellation interrupts the in-flight utterance
//! mid-sleep, and completions for superseded requests may still be delivered,
//! which keeps the sequencer's token filter honest.

use crate::session::Message;
use crate::speech::{MAX_RATE, MIN_RATE, SpeakRequest, SpeechBackend, SpeechErrorKind, Voice};
use once_cell::sync::Lazy;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Sender};
use std::thread;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Words per minute spoken at rate 1.0.
const BASELINE_WPM: f32 = 160.0;
/// Engines reject unreasonably long utterances; mirror that here.
const MAX_UTTERANCE_CHARS: usize = 8192;
/// Sleep slice between cancellation checks.
const CANCEL_POLL: Duration = Duration::from_millis(25);

static VOICES: Lazy<Vec<Voice>> = Lazy::new(|| {
    vec![
        Voice {
            name: "Mira".to_string(),
            language: "en-US".to_string(),
            is_local: true,
            is_default: true,
        },
        Voice {
            name: "Sage".to_string(),
            language: "en-GB".to_string(),
            is_local: true,
            is_default: false,
        },
        Voice {
            name: "Lumen".to_string(),
            language: "en-AU".to_string(),
            is_local: false,
            is_default: false,
        },
    ]
});

struct Job {
    request: SpeakRequest,
    cancelled: Arc<AtomicBool>,
}

pub struct PacedSpeech {
    jobs: Sender<Job>,
    current: Option<Arc<AtomicBool>>,
}

impl PacedSpeech {
    /// Spawn the worker thread. Utterance results are posted to `events`.
    pub fn spawn(events: Sender<Message>) -> Self {
        let (jobs, job_rx) = mpsc::channel::<Job>();
        thread::spawn(move || {
            info!("Speech worker started");
            while let Ok(job) = job_rx.recv() {
                run_utterance(&job.request, &job.cancelled, &events);
            }
            debug!("Speech worker shutting down");
        });
        Self {
            jobs,
            current: None,
        }
    }
}

impl SpeechBackend for PacedSpeech {
    fn speak(&mut self, request: SpeakRequest) {
        self.cancel_all();
        let cancelled = Arc::new(AtomicBool::new(false));
        self.current = Some(Arc::clone(&cancelled));
        if self.jobs.send(Job { request, cancelled }).is_err() {
            warn!("Speech worker is gone; dropping utterance");
        }
    }

    fn cancel_all(&mut self) {
        if let Some(flag) = self.current.take() {
            flag.store(true, Ordering::Release);
        }
    }

    fn voices(&self) -> Vec<Voice> {
        VOICES.clone()
    }
}

fn run_utterance(request: &SpeakRequest, cancelled: &AtomicBool, events: &Sender<Message>) {
    if let Some(error) = validate(request) {
        warn!(token = request.token, %error, "Rejecting utterance");
        let _ = events.send(Message::UtteranceFailed {
            token: request.token,
            error,
        });
        return;
    }
    let words = crate::text_utils::count_words(&request.text).max(1);
    let mut remaining =
        Duration::from_secs_f32(words as f32 * 60.0 / (BASELINE_WPM * request.rate));
    debug!(
        token = request.token,
        words,
        ms = remaining.as_millis(),
        "Pacing utterance"
    );
    while remaining > Duration::ZERO {
        if cancelled.load(Ordering::Acquire) {
            debug!(token = request.token, "Utterance cancelled mid-line");
            return;
        }
        let step = remaining.min(CANCEL_POLL);
        thread::sleep(step);
        remaining -= step;
    }
    if cancelled.load(Ordering::Acquire) {
        debug!(token = request.token, "Utterance cancelled at the line end");
        return;
    }
    let _ = events.send(Message::UtteranceFinished {
        token: request.token,
    });
}

fn validate(request: &SpeakRequest) -> Option<SpeechErrorKind> {
    if request.text.len() > MAX_UTTERANCE_CHARS {
        return Some(SpeechErrorKind::TextTooLong);
    }
    if request.voice >= VOICES.len() {
        return Some(SpeechErrorKind::VoiceUnavailable);
    }
    if !(MIN_RATE..=MAX_RATE).contains(&request.rate) {
        return Some(SpeechErrorKind::RateNotSupported);
    }
    None
}

#[cfg(test)]
mod tests {
    use super::{PacedSpeech, validate};
    use crate::session::Message;
    use crate::speech::{SpeakRequest, SpeechBackend, SpeechErrorKind};
    use std::sync::mpsc;
    use std::time::Duration;

    fn request(text: &str, voice: usize, rate: f32) -> SpeakRequest {
        SpeakRequest {
            token: 7,
            text: text.to_string(),
            voice,
            rate,
            pitch: 1.0,
            volume: 1.0,
        }
    }

    #[test]
    fn validation_categorizes_bad_requests() {
        let long = "x".repeat(9000);
        assert_eq!(
            validate(&request(&long, 0, 1.0)),
            Some(SpeechErrorKind::TextTooLong)
        );
        assert_eq!(
            validate(&request("hi", 99, 1.0)),
            Some(SpeechErrorKind::VoiceUnavailable)
        );
        assert_eq!(
            validate(&request("hi", 0, 9.0)),
            Some(SpeechErrorKind::RateNotSupported)
        );
        assert_eq!(validate(&request("hi", 0, 1.0)), None);
    }

    #[test]
    fn short_utterances_complete_with_their_token() {
        let (tx, rx) = mpsc::channel();
        let mut backend = PacedSpeech::spawn(tx);
        backend.speak(request("word", 0, 3.0));
        match rx.recv_timeout(Duration::from_secs(5)) {
            Ok(Message::UtteranceFinished { token }) => assert_eq!(token, 7),
            other => panic!("expected completion, got {other:?}"),
        }
    }

    #[test]
    fn bad_voice_reports_voice_unavailable() {
        let (tx, rx) = mpsc::channel();
        let mut backend = PacedSpeech::spawn(tx);
        backend.speak(request("hello there", 42, 1.0));
        match rx.recv_timeout(Duration::from_secs(5)) {
            Ok(Message::UtteranceFailed { token, error }) => {
                assert_eq!(token, 7);
                assert_eq!(error, SpeechErrorKind::VoiceUnavailable);
            }
            other => panic!("expected failure, got {other:?}"),
        }
    }

    #[test]
    fn cancellation_suppresses_the_completion() {
        let (tx, rx) = mpsc::channel();
        let mut backend = PacedSpeech::spawn(tx);
        let long_line = "word ".repeat(200);
        backend.speak(request(long_line.trim(), 0, 0.1));
        backend.cancel_all();
        assert!(rx.recv_timeout(Duration::from_millis(400)).is_err());
    }
}
