//! # Native Session Handle
//!
//! Owns one engine session. Every call is a safe failure once the session is
//! gone; destroying twice is a no-op and drop destroys whatever is left.

use std::path::Path;
use std::sync::Arc;

use holoplay_shared::constants::MAX_AUDIO_DEVICES;
use holoplay_shared::{FileMetadata, FrameMetadata, OpenSettings, PlaybackState, Vec3Interop};

use crate::engine::NativeEngine;
use crate::error::{NativeError, NativeResult};
use crate::records::{
    AudioDevice, CameraViewInterop, ColorCorrection, ColorParameter, ColorParameterInfo,
    DebugToggle, InternalState, PublishedBuffers, ReaderStatus, RenderToken, SessionHints,
    SessionId,
};

/// Exclusive owner of one engine session.
///
/// Not `Clone`: the controller is the only holder.
pub struct SessionHandle {
    engine: Arc<dyn NativeEngine>,
    id: SessionId,
}

impl std::fmt::Debug for SessionHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionHandle").field("id", &self.id).finish_non_exhaustive()
    }
}

impl SessionHandle {
    /// Allocates a session on `engine`.
    ///
    /// # Errors
    ///
    /// Propagates the engine's allocation failure. A sentinel id from the
    /// engine is treated as an allocation failure too.
    pub fn create(engine: Arc<dyn NativeEngine>, hints: &SessionHints) -> NativeResult<Self> {
        let id = engine.create_session(hints)?;
        if !id.is_valid() {
            return Err(NativeError::AllocationFailed);
        }
        tracing::info!(session = id.0, "native session created");
        Ok(Self { engine, id })
    }

    /// A handle that owns nothing.
    #[must_use]
    pub fn detached(engine: Arc<dyn NativeEngine>) -> Self {
        Self {
            engine,
            id: SessionId::INVALID,
        }
    }

    /// Session id, [`SessionId::INVALID`] once destroyed.
    #[must_use]
    pub fn id(&self) -> SessionId {
        self.id
    }

    /// Whether a session is held.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.id.is_valid()
    }

    /// The engine this handle talks to.
    #[must_use]
    pub fn engine(&self) -> &Arc<dyn NativeEngine> {
        &self.engine
    }

    /// Destroys the session. Returns `false` when nothing was held.
    pub fn destroy(&mut self) -> bool {
        if !self.id.is_valid() {
            return false;
        }
        let id = std::mem::replace(&mut self.id, SessionId::INVALID);
        let ok = self.engine.destroy_session(id);
        if ok {
            tracing::info!(session = id.0, "native session destroyed");
        } else {
            tracing::warn!(session = id.0, "engine refused to destroy session");
        }
        ok
    }

    fn live(&self) -> NativeResult<SessionId> {
        if self.id.is_valid() {
            Ok(self.id)
        } else {
            Err(NativeError::NoSession)
        }
    }

    fn with<T>(&self, missing: T, f: impl FnOnce(&dyn NativeEngine, SessionId) -> T) -> T {
        match self.live() {
            Ok(id) => f(self.engine.as_ref(), id),
            Err(_) => missing,
        }
    }

    // ------------------------------------------------------------------
    // Lifecycle
    // ------------------------------------------------------------------

    /// Opens a source. Blocks.
    pub fn open(&self, path: &Path, settings: &OpenSettings) -> bool {
        self.with(false, |e, id| e.open(id, path, settings))
    }

    /// Closes the open source.
    pub fn close(&self) -> bool {
        self.with(false, |e, id| e.close(id))
    }

    /// Starts playback.
    pub fn play(&self) -> bool {
        self.with(false, |e, id| e.play(id))
    }

    /// Pauses playback.
    pub fn pause(&self) -> bool {
        self.with(false, |e, id| e.pause(id))
    }

    /// Returns to the start.
    pub fn rewind(&self) -> bool {
        self.with(false, |e, id| e.rewind(id))
    }

    /// Current playback state. [`PlaybackState::Empty`] without a session.
    #[must_use]
    pub fn state(&self) -> PlaybackState {
        self.with(PlaybackState::Empty, |e, id| {
            PlaybackState::from_code(e.state_code(id))
        })
    }

    // ------------------------------------------------------------------
    // Metadata
    // ------------------------------------------------------------------

    /// Metadata of the open source.
    #[must_use]
    pub fn file_info(&self) -> Option<FileMetadata> {
        self.with(None, |e, id| e.file_info(id))
    }

    /// Metadata of the latest decoded frame.
    #[must_use]
    pub fn frame_info(&self) -> Option<FrameMetadata> {
        self.with(None, |e, id| e.frame_info(id))
    }

    // ------------------------------------------------------------------
    // Buffers and rendering
    // ------------------------------------------------------------------

    /// Publishes host buffers.
    pub fn set_buffers(&self, buffers: &PublishedBuffers) -> bool {
        self.with(false, |e, id| e.set_buffers(id, buffers))
    }

    /// Releases published buffers.
    pub fn release_buffers(&self) -> bool {
        self.with(false, |e, id| e.release_buffers(id))
    }

    /// Whether the published buffers are still valid.
    #[must_use]
    pub fn buffers_valid(&self) -> bool {
        self.with(false, |e, id| e.buffers_valid(id))
    }

    /// Publishes one camera view.
    pub fn set_camera_view(&self, view: &CameraViewInterop) -> bool {
        self.with(false, |e, id| e.set_camera_view(id, view))
    }

    /// Issues the native-draw render event for `camera_id`.
    pub fn issue_render_event(&self, camera_id: i32) -> bool {
        self.with(false, |e, id| {
            e.issue_render_event(RenderToken::pack(camera_id, id));
            true
        })
    }

    /// Issues the host-draw buffer fill event.
    pub fn issue_buffer_fill_event(&self) -> bool {
        self.with(false, |e, id| {
            e.issue_buffer_fill_event(id);
            true
        })
    }

    /// Sets the listener-relative audio position.
    pub fn set_audio_position(&self, position: Vec3Interop) -> bool {
        self.with(false, |e, id| e.set_audio_position(id, position))
    }

    // ------------------------------------------------------------------
    // Tuning
    // ------------------------------------------------------------------

    /// Playback clock multiplier.
    #[must_use]
    pub fn clock_scale(&self) -> Option<f32> {
        self.with(None, |e, id| e.clock_scale(id))
    }

    /// Sets the playback clock multiplier.
    pub fn set_clock_scale(&self, scale: f32) -> bool {
        self.with(false, |e, id| e.set_clock_scale(id, scale))
    }

    /// Sets the audio volume.
    pub fn set_audio_volume(&self, volume: f32) -> bool {
        self.with(false, |e, id| e.set_audio_volume(id, volume))
    }

    /// Sets the texture load timeout.
    pub fn set_texture_load_timeout(&self, timeout_ms: u32) -> bool {
        self.with(false, |e, id| e.set_texture_load_timeout(id, timeout_ms))
    }

    /// Applies every override in `correction`. Returns `false` if any was refused.
    pub fn set_color_correction(&self, correction: &ColorCorrection) -> bool {
        self.with(false, |e, id| {
            correction
                .overrides()
                .fold(true, |ok, (param, value)| {
                    e.set_color_parameter(id, param, value, true) && ok
                })
        })
    }

    /// Range and value of one colour parameter.
    #[must_use]
    pub fn color_parameter(&self, param: ColorParameter) -> Option<ColorParameterInfo> {
        self.with(None, |e, id| e.color_parameter(id, param))
    }

    /// Sets one colour parameter.
    pub fn set_color_parameter(&self, param: ColorParameter, value: f32, enabled: bool) -> bool {
        self.with(false, |e, id| e.set_color_parameter(id, param, value, enabled))
    }

    // ------------------------------------------------------------------
    // Diagnostics
    // ------------------------------------------------------------------

    /// Parsed reader status.
    #[must_use]
    pub fn reader_status(&self) -> Option<ReaderStatus> {
        self.with(None, |e, id| e.reader_status(id).map(ReaderStatus::from))
    }

    /// Decoded engine-internal flags. All clear without a session.
    #[must_use]
    pub fn internal_state(&self) -> InternalState {
        self.with(InternalState::default(), |e, id| {
            InternalState::from_bits(e.internal_state_bits(id))
        })
    }

    /// Seekable frame range.
    #[must_use]
    pub fn seek_range(&self) -> Option<(u64, u64)> {
        self.with(None, |e, id| e.seek_range(id))
    }

    /// Jumps to a frame.
    pub fn seek_to_frame(&self, frame_id: u64) -> bool {
        self.with(false, |e, id| e.seek_to_frame(id, frame_id))
    }

    /// Flips a diagnostic switch.
    pub fn set_debug_toggle(&self, toggle: DebugToggle, enabled: bool) -> bool {
        self.with(false, |e, id| e.set_debug_toggle(id, toggle, enabled))
    }
}

impl Drop for SessionHandle {
    fn drop(&mut self) {
        self.destroy();
    }
}

/// Pulls every buffered engine trace line.
#[must_use]
pub fn drain_trace_lines(engine: &dyn NativeEngine) -> Vec<String> {
    std::iter::from_fn(|| engine.next_trace_line())
        .take_while(|line| !line.is_empty())
        .collect()
}

/// Audio output devices, at most [`MAX_AUDIO_DEVICES`].
#[must_use]
pub fn audio_devices(engine: &dyn NativeEngine) -> Vec<AudioDevice> {
    let mut devices = engine.enumerate_audio_devices(MAX_AUDIO_DEVICES);
    devices.truncate(MAX_AUDIO_DEVICES);
    devices
}
