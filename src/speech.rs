//! The speech engine seam.
//!
//! The engine is a black box: anything that can vocalize one line at a time,
//! be cancelled, and report back. Results arrive on the session channel as
//! [`crate::session::Message::UtteranceFinished`] or `UtteranceFailed`,
//! tagged with the request token so the sequencer can drop superseded
//! callbacks.

use thiserror::Error;

pub const MIN_RATE: f32 = 0.1;
pub const MAX_RATE: f32 = 3.0;

/// One utterance handed to the backend, with the voice/rate/volume settings
/// snapshotted at dispatch time.
#[derive(Debug, Clone, PartialEq)]
pub struct SpeakRequest {
    pub token: u64,
    pub text: String,
    pub voice: usize,
    pub rate: f32,
    pub pitch: f32,
    pub volume: f32,
}

/// A voice the backend can speak with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Voice {
    pub name: String,
    pub language: String,
    pub is_local: bool,
    pub is_default: bool,
}

/// Categories a backend may fail an utterance with. None of these terminate
/// the session; the sequencer pauses and the same line can be retried.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SpeechErrorKind {
    #[error("network error while reaching the speech service")]
    Network,
    #[error("speech synthesis failed")]
    SynthesisFailed,
    #[error("speech synthesis is unavailable")]
    SynthesisUnavailable,
    #[error("the selected voice is unavailable")]
    VoiceUnavailable,
    #[error("the line is too long to synthesize")]
    TextTooLong,
    #[error("the requested speech rate is not supported")]
    RateNotSupported,
    #[error("speech engine error")]
    Other,
}

/// Abstract speech capability. Implementations own their audio path; the
/// sequencer only requires that exactly one utterance is serviced at a time
/// and that cancellation stops output best-effort.
pub trait SpeechBackend {
    /// Dispatch one utterance. A new dispatch supersedes the previous one.
    fn speak(&mut self, request: SpeakRequest);

    /// Best-effort stop of any in-flight audio. The sequencer has already
    /// invalidated the token by the time this is called.
    fn cancel_all(&mut self);

    /// Voices this backend can speak with.
    fn voices(&self) -> Vec<Voice>;
}

/// Map a target words-per-minute to an engine rate multiplier.
///
/// Piecewise so the multiplier sits near 1.0 in the natural 150-180 WPM band
/// while staying inside the supported [0.1, 3.0] range at the extremes.
pub fn wpm_to_rate(wpm: u32) -> f32 {
    let wpm = wpm as f32;
    let rate = if wpm <= 100.0 {
        (wpm / 180.0).max(MIN_RATE)
    } else if wpm <= 200.0 {
        wpm / 160.0
    } else {
        (wpm / 140.0).min(MAX_RATE)
    };
    rate.clamp(MIN_RATE, MAX_RATE)
}
