//! State codes reported by the native engine.
//!
//! Codes come from another process and are parsed, never transmuted. Anything
//! unrecognized lands on a catch-all variant.

/// High-level playback state of one session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(i32)]
pub enum PlaybackState {
    /// No session exists.
    #[default]
    Empty = 0,
    /// Session created, nothing opened.
    Initialized = 1,
    /// Source opened.
    Opened = 2,
    /// Playing.
    Playing = 3,
    /// Paused.
    Paused = 4,
    /// Source closed.
    Closed = 5,
    /// Unknown or failed state.
    Broken = 6,
}

impl PlaybackState {
    /// Parses an engine state code. Unknown codes map to [`PlaybackState::Broken`].
    #[must_use]
    pub const fn from_code(code: i32) -> Self {
        match code {
            0 => Self::Empty,
            1 => Self::Initialized,
            2 => Self::Opened,
            3 => Self::Playing,
            4 => Self::Paused,
            5 => Self::Closed,
            _ => Self::Broken,
        }
    }

    /// Returns the engine code for this state.
    #[must_use]
    pub const fn code(self) -> i32 {
        self as i32
    }
}

/// Internal state of the engine's container reader.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(i32)]
pub enum ReaderState {
    /// Unknown state (also the parse fallback).
    #[default]
    Unknown = 0,
    /// Reader initialized.
    Initialized = 1,
    /// Open pending.
    OpenPending = 2,
    /// Open finished.
    Opened = 3,
    /// Pre-roll started.
    Prerolling = 4,
    /// Frames ready for delivery.
    Ready = 5,
    /// Buffering, no frames available.
    Buffering = 6,
    /// Closing.
    Closing = 7,
    /// Closed.
    Closed = 8,
    /// Reached end of the current file.
    EndOfStream = 9,
    /// Reader shutting down.
    ShuttingDown = 10,
}

impl ReaderState {
    /// Parses a reader state code. Unknown codes map to [`ReaderState::Unknown`].
    #[must_use]
    pub const fn from_code(code: i32) -> Self {
        match code {
            1 => Self::Initialized,
            2 => Self::OpenPending,
            3 => Self::Opened,
            4 => Self::Prerolling,
            5 => Self::Ready,
            6 => Self::Buffering,
            7 => Self::Closing,
            8 => Self::Closed,
            9 => Self::EndOfStream,
            10 => Self::ShuttingDown,
            _ => Self::Unknown,
        }
    }
}
