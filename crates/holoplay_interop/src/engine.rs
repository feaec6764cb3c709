//! # Native Engine Boundary
//!
//! The decode/render engine is reached only through [`NativeEngine`]. An
//! implementation is constructed explicitly and shared as
//! `Arc<dyn NativeEngine>`; there is no process-wide instance.
//!
//! Every per-session call takes the [`SessionId`] and must tolerate ids it
//! does not know (returning `false`/`None`), because a blocking open may
//! still be running when its session is destroyed.

use std::path::Path;

use holoplay_shared::{FileMetadata, FrameMetadata, OpenSettings, Vec3Interop};

use crate::error::NativeResult;
use crate::records::{
    AudioDevice, CameraViewInterop, ColorParameter, ColorParameterInfo, DebugToggle,
    PublishedBuffers, ReaderStatusInterop, RenderToken, SessionHints, SessionId,
};

/// The native decode/render engine.
///
/// Core lifecycle, metadata and buffer calls are required. Diagnostic and
/// tuning calls default to "unsupported" so minimal engines stay small.
pub trait NativeEngine: Send + Sync {
    // ------------------------------------------------------------------
    // Lifecycle
    // ------------------------------------------------------------------

    /// Allocates a session.
    ///
    /// # Errors
    ///
    /// Returns [`crate::NativeError::AllocationFailed`] when the engine is out of resources.
    fn create_session(&self, hints: &SessionHints) -> NativeResult<SessionId>;

    /// Destroys a session. Unknown ids return `false`.
    fn destroy_session(&self, id: SessionId) -> bool;

    /// Opens a source. Blocks until the container header is read.
    fn open(&self, id: SessionId, path: &Path, settings: &OpenSettings) -> bool;

    /// Closes the open source. The session stays valid.
    fn close(&self, id: SessionId) -> bool;

    /// Starts or resumes playback.
    fn play(&self, id: SessionId) -> bool;

    /// Pauses playback.
    fn pause(&self, id: SessionId) -> bool;

    /// Returns to the start of the source.
    fn rewind(&self, id: SessionId) -> bool;

    /// Raw playback state code.
    fn state_code(&self, id: SessionId) -> i32;

    // ------------------------------------------------------------------
    // Metadata
    // ------------------------------------------------------------------

    /// Metadata of the open source.
    fn file_info(&self, id: SessionId) -> Option<FileMetadata>;

    /// Metadata of the most recently decoded frame.
    fn frame_info(&self, id: SessionId) -> Option<FrameMetadata>;

    // ------------------------------------------------------------------
    // Buffers and rendering
    // ------------------------------------------------------------------

    /// Hands the engine the host buffers to fill.
    fn set_buffers(&self, id: SessionId, buffers: &PublishedBuffers) -> bool;

    /// Makes the engine forget the published buffers.
    fn release_buffers(&self, id: SessionId) -> bool;

    /// Whether the published buffers are still usable by the engine.
    fn buffers_valid(&self, id: SessionId) -> bool;

    /// Publishes one camera's view.
    fn set_camera_view(&self, id: SessionId, view: &CameraViewInterop) -> bool;

    /// Native-draw render event for one camera.
    fn issue_render_event(&self, token: RenderToken);

    /// Host-draw buffer fill event.
    fn issue_buffer_fill_event(&self, id: SessionId);

    /// Listener-relative position of the audio source.
    fn set_audio_position(&self, id: SessionId, position: Vec3Interop) -> bool;

    // ------------------------------------------------------------------
    // Tuning
    // ------------------------------------------------------------------

    /// Playback clock multiplier.
    fn clock_scale(&self, _id: SessionId) -> Option<f32> {
        None
    }

    /// Sets the playback clock multiplier.
    fn set_clock_scale(&self, _id: SessionId, _scale: f32) -> bool {
        false
    }

    /// Sets the audio volume in `[0, 1]`.
    fn set_audio_volume(&self, _id: SessionId, _volume: f32) -> bool {
        false
    }

    /// Sets how long the engine waits on a texture upload.
    fn set_texture_load_timeout(&self, _id: SessionId, _timeout_ms: u32) -> bool {
        false
    }

    /// Tells the engine the host depth buffer runs far-to-near.
    fn set_z_buffer_inverted(&self, _inverted: bool) {}

    /// Range and current value of one colour parameter.
    fn color_parameter(&self, _id: SessionId, _param: ColorParameter) -> Option<ColorParameterInfo> {
        None
    }

    /// Sets one colour parameter.
    fn set_color_parameter(
        &self,
        _id: SessionId,
        _param: ColorParameter,
        _value: f32,
        _enabled: bool,
    ) -> bool {
        false
    }

    // ------------------------------------------------------------------
    // Diagnostics
    // ------------------------------------------------------------------

    /// Container reader status.
    fn reader_status(&self, _id: SessionId) -> Option<ReaderStatusInterop> {
        None
    }

    /// Engine-internal flag word.
    fn internal_state_bits(&self, _id: SessionId) -> u32 {
        0
    }

    /// First and last seekable frame.
    fn seek_range(&self, _id: SessionId) -> Option<(u64, u64)> {
        None
    }

    /// Jumps to a frame.
    fn seek_to_frame(&self, _id: SessionId, _frame_id: u64) -> bool {
        false
    }

    /// Flips one diagnostic switch.
    fn set_debug_toggle(&self, _id: SessionId, _toggle: DebugToggle, _enabled: bool) -> bool {
        false
    }

    /// Turns engine tracing on or off at a level code.
    fn enable_tracing(&self, _enabled: bool, _level: i32) {}

    /// Next buffered trace line, `None` when drained.
    fn next_trace_line(&self) -> Option<String> {
        None
    }

    /// Up to `max` audio output devices.
    fn enumerate_audio_devices(&self, _max: usize) -> Vec<AudioDevice> {
        Vec::new()
    }
}
