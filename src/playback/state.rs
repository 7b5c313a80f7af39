use std::fmt;

use serde::Serialize;

/// State of the playback controller
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PlaybackState {
    /// No sequence, or a sequence that was never started
    Idle,
    /// A unit's media is being opened
    Loading,
    /// A unit's media is playing
    Playing,
    /// Suspended by the user
    Paused,
    /// Terminated by the user; cursor rewound
    Stopped,
    /// Ran off the end of the sequence
    Completed,
    /// Nothing in the sequence could be played
    Failed,
}

impl PlaybackState {
    /// Whether media is being opened or played
    pub fn is_progressing(&self) -> bool {
        matches!(self, Self::Loading | Self::Playing)
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Failed)
    }
}

impl fmt::Display for PlaybackState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Idle => "idle",
            Self::Loading => "loading",
            Self::Playing => "playing",
            Self::Paused => "paused",
            Self::Stopped => "stopped",
            Self::Completed => "completed",
            Self::Failed => "failed",
        };
        write!(f, "{}", name)
    }
}

/// Why playback reached a terminal state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ReasonCode {
    /// Every playable unit was played
    EndOfSequence,
    /// The sequence has no units
    EmptySequence,
    /// No unit carries a media locator
    NoPlayableMedia,
    /// Units had locators but none of them could be opened
    AllMediaFailed,
}

impl ReasonCode {
    /// Text a presentation layer can show as is
    pub fn message(&self) -> &'static str {
        match self {
            Self::EndOfSequence => "Animation finished",
            Self::EmptySequence => "Nothing to play: the sequence is empty",
            Self::NoPlayableMedia => "Nothing to play: no unit has a video",
            Self::AllMediaFailed => "Nothing to play: no video could be loaded",
        }
    }
}

impl fmt::Display for ReasonCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message())
    }
}

/// Notification pushed to the presentation layer on every state change
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Transition {
    pub state: PlaybackState,
    pub active_index: Option<usize>,
    pub reason: Option<ReasonCode>,
}

impl Transition {
    pub fn new(state: PlaybackState, active_index: Option<usize>) -> Self {
        Self {
            state,
            active_index,
            reason: None,
        }
    }

    pub fn terminal(state: PlaybackState, reason: ReasonCode) -> Self {
        Self {
            state,
            active_index: None,
            reason: Some(reason),
        }
    }
}

/// Read-only view of the controller
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PlaybackSnapshot {
    pub state: PlaybackState,
    pub cursor: usize,
    pub active_index: Option<usize>,
    pub len: usize,
    pub last_reason: Option<ReasonCode>,
}
