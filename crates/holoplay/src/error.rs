//! # Playback Error Types

use holoplay_interop::NativeError;
use holoplay_rendering::CameraConfigError;
use holoplay_shared::SettingsError;
use thiserror::Error;

/// Errors returned by the playback controller.
#[derive(Error, Debug)]
pub enum PlaybackError {
    /// No native session. Call `initialize` or `open` first.
    #[error("controller is not initialized")]
    NotInitialized,

    /// The native engine refused a call. Nothing is retried.
    #[error("native call `{0}` failed")]
    NativeCallFailed(&'static str),

    /// Session allocation failed. The controller stays inert until retried.
    #[error("session allocation failed: {0}")]
    Allocation(#[from] NativeError),

    /// A camera cannot be rendered as configured.
    #[error(transparent)]
    Camera(#[from] CameraConfigError),

    /// Configuration could not be loaded or is out of range.
    #[error(transparent)]
    Settings(#[from] SettingsError),

    /// An argument is outside its valid range.
    #[error("invalid {name}: {value}")]
    InvalidArgument {
        /// Argument name.
        name: &'static str,
        /// Rejected value.
        value: f32,
    },
}

/// Result type for playback operations.
pub type PlaybackResult<T> = Result<T, PlaybackError>;
