use crate::speech::SpeechErrorKind;

/// Everything that can happen to a running session: user commands plus the
/// speech backend's asynchronous results, tagged with the issuing token.
#[derive(Debug, Clone, PartialEq)]
pub enum Message {
    TogglePlayPause,
    Play,
    Pause,
    NextLine,
    PreviousLine,
    JumpLines(i64),
    JumpToStart,
    JumpToEnd,
    Restart,
    Stop,
    SpeedChanged(u32),
    VoiceChanged(usize),
    VolumeChanged(u8),
    ToggleMute,
    AutoScrollChanged(bool),
    ShowWpmChanged(bool),
    ToggleTheme,
    HighlightColorChanged(String),
    ListVoices,
    UtteranceFinished {
        token: u64,
    },
    UtteranceFailed {
        token: u64,
        error: SpeechErrorKind,
    },
    /// The inter-line pause ran out; speak the next line if the token is
    /// still current.
    AdvanceElapsed {
        token: u64,
    },
    SafeQuit,
}
