//! Scripted in-process engine for tests and benches.
//!
//! Behaves like the real engine at the boundary: sessions are created and
//! destroyed, opens can fail or block, frames come from a script. Every call
//! is recorded so tests can assert what crossed the boundary.

use std::collections::{HashMap, VecDeque};
use std::path::{Path, PathBuf};
use std::time::Duration;

use holoplay_shared::{FileMetadata, FrameMetadata, OpenSettings, PlaybackState, Vec3Interop};
use parking_lot::Mutex;

use crate::engine::NativeEngine;
use crate::error::{NativeError, NativeResult};
use crate::records::{
    AudioDevice, CameraViewInterop, ColorParameter, ColorParameterInfo, DebugToggle,
    PublishedBuffers, ReaderStatusInterop, RenderToken, SessionHints, SessionId,
};

/// One recorded engine call.
#[derive(Debug, Clone, PartialEq)]
pub enum EngineCall {
    /// `create_session`
    CreateSession(SessionHints),
    /// `destroy_session`
    DestroySession(SessionId),
    /// `open`
    Open(SessionId, PathBuf),
    /// `close`
    Close(SessionId),
    /// `play`
    Play(SessionId),
    /// `pause`
    Pause(SessionId),
    /// `rewind`
    Rewind(SessionId),
    /// `set_buffers`
    SetBuffers(SessionId, PublishedBuffers),
    /// `release_buffers`
    ReleaseBuffers(SessionId),
    /// `set_camera_view`
    SetCameraView(SessionId, CameraViewInterop),
    /// `issue_render_event`
    RenderEvent(RenderToken),
    /// `issue_buffer_fill_event`
    BufferFill(SessionId),
    /// `set_audio_position`
    AudioPosition(SessionId, Vec3Interop),
    /// `seek_to_frame`
    Seek(SessionId, u64),
}

#[derive(Debug)]
struct MockSession {
    state_code: i32,
    opened: Option<PathBuf>,
    current_frame: Option<FrameMetadata>,
    buffers: Option<PublishedBuffers>,
    buffers_valid: bool,
    clock_scale: f32,
    volume: f32,
    texture_timeout_ms: u32,
    colors: HashMap<ColorParameter, ColorParameterInfo>,
    toggles: HashMap<DebugToggle, bool>,
}

impl MockSession {
    fn new() -> Self {
        Self {
            state_code: PlaybackState::Initialized.code(),
            opened: None,
            current_frame: None,
            buffers: None,
            buffers_valid: false,
            clock_scale: 1.0,
            volume: 1.0,
            texture_timeout_ms: 0,
            colors: HashMap::new(),
            toggles: HashMap::new(),
        }
    }
}

#[derive(Debug, Default)]
struct MockState {
    next_id: i32,
    last_created: Option<i32>,
    sessions: HashMap<i32, MockSession>,
    fail_next_create: bool,
    fail_open: bool,
    open_delay: Option<Duration>,
    file: FileMetadata,
    frames: VecDeque<FrameMetadata>,
    internal_bits: u32,
    reader: ReaderStatusInterop,
    trace: VecDeque<String>,
    tracing: Option<i32>,
    devices: Vec<AudioDevice>,
    z_buffer_inverted: bool,
    calls: Vec<EngineCall>,
}

impl MockState {
    fn session(&mut self, id: SessionId) -> Option<&mut MockSession> {
        self.sessions.get_mut(&id.0)
    }

    fn latest(&self) -> Option<&MockSession> {
        self.last_created.and_then(|id| self.sessions.get(&id))
    }

    fn latest_mut(&mut self) -> Option<&mut MockSession> {
        self.last_created.and_then(|id| self.sessions.get_mut(&id))
    }
}

/// Scripted engine.
///
/// Queries without an explicit session id act on the most recently created
/// live session.
#[derive(Debug, Default)]
pub struct MockEngine {
    state: Mutex<MockState>,
}

impl MockEngine {
    /// Creates an engine with an empty script.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an engine whose opens report `file`.
    #[must_use]
    pub fn with_file(file: FileMetadata) -> Self {
        let engine = Self::new();
        engine.set_file(file);
        engine
    }

    // ------------------------------------------------------------------
    // Script
    // ------------------------------------------------------------------

    /// The next `create_session` fails with an allocation error.
    pub fn fail_next_create(&self) {
        self.state.lock().fail_next_create = true;
    }

    /// Makes every open fail (or succeed again).
    pub fn set_fail_open(&self, fail: bool) {
        self.state.lock().fail_open = fail;
    }

    /// Makes every open block for `delay` before completing.
    pub fn set_open_delay(&self, delay: Duration) {
        self.state.lock().open_delay = Some(delay);
    }

    /// File metadata reported after an open.
    pub fn set_file(&self, file: FileMetadata) {
        self.state.lock().file = file;
    }

    /// Queues one decoded frame.
    pub fn push_frame(&self, frame: FrameMetadata) {
        self.state.lock().frames.push_back(frame);
    }

    /// Queues several decoded frames.
    pub fn push_frames(&self, frames: impl IntoIterator<Item = FrameMetadata>) {
        self.state.lock().frames.extend(frames);
    }

    /// Marks the published buffers of the latest session as lost.
    pub fn invalidate_buffers(&self) {
        if let Some(session) = self.state.lock().latest_mut() {
            session.buffers_valid = false;
        }
    }

    /// Forces a raw state code on the latest session.
    pub fn set_state_code(&self, code: i32) {
        if let Some(session) = self.state.lock().latest_mut() {
            session.state_code = code;
        }
    }

    /// Engine-internal flag word reported for every session.
    pub fn set_internal_bits(&self, bits: u32) {
        self.state.lock().internal_bits = bits;
    }

    /// Reader status reported for every session.
    pub fn set_reader_status(&self, status: ReaderStatusInterop) {
        self.state.lock().reader = status;
    }

    /// Buffers one trace line.
    pub fn push_trace_line(&self, line: &str) {
        self.state.lock().trace.push_back(line.to_string());
    }

    /// Devices reported by enumeration.
    pub fn set_audio_devices(&self, devices: Vec<AudioDevice>) {
        self.state.lock().devices = devices;
    }

    // ------------------------------------------------------------------
    // Inspection
    // ------------------------------------------------------------------

    /// Every call so far, in order.
    #[must_use]
    pub fn calls(&self) -> Vec<EngineCall> {
        self.state.lock().calls.clone()
    }

    /// Number of recorded calls matching `pred`.
    pub fn count(&self, pred: impl Fn(&EngineCall) -> bool) -> usize {
        self.state.lock().calls.iter().filter(|c| pred(c)).count()
    }

    /// Forgets recorded calls.
    pub fn clear_calls(&self) {
        self.state.lock().calls.clear();
    }

    /// Number of sessions alive.
    #[must_use]
    pub fn live_sessions(&self) -> usize {
        self.state.lock().sessions.len()
    }

    /// Buffers currently published to the latest session.
    #[must_use]
    pub fn published_buffers(&self) -> Option<PublishedBuffers> {
        self.state.lock().latest().and_then(|s| s.buffers)
    }

    /// Path opened in the latest session.
    #[must_use]
    pub fn opened_path(&self) -> Option<PathBuf> {
        self.state.lock().latest().and_then(|s| s.opened.clone())
    }

    /// Audio volume of the latest session.
    #[must_use]
    pub fn volume(&self) -> Option<f32> {
        self.state.lock().latest().map(|s| s.volume)
    }

    /// Texture load timeout of the latest session.
    #[must_use]
    pub fn texture_load_timeout(&self) -> Option<u32> {
        self.state.lock().latest().map(|s| s.texture_timeout_ms)
    }

    /// State of a debug switch on the latest session.
    #[must_use]
    pub fn debug_toggle(&self, toggle: DebugToggle) -> bool {
        self.state
            .lock()
            .latest()
            .and_then(|s| s.toggles.get(&toggle).copied())
            .unwrap_or(false)
    }

    /// Tracing level code, `None` while disabled.
    #[must_use]
    pub fn tracing_level(&self) -> Option<i32> {
        self.state.lock().tracing
    }

    /// Whether the host reported an inverted depth buffer.
    #[must_use]
    pub fn z_buffer_inverted(&self) -> bool {
        self.state.lock().z_buffer_inverted
    }

    fn record(&self, call: EngineCall) {
        self.state.lock().calls.push(call);
    }
}

impl NativeEngine for MockEngine {
    fn create_session(&self, hints: &SessionHints) -> NativeResult<SessionId> {
        let mut state = self.state.lock();
        state.calls.push(EngineCall::CreateSession(*hints));
        if std::mem::take(&mut state.fail_next_create) {
            return Err(NativeError::AllocationFailed);
        }
        let id = state.next_id;
        state.next_id += 1;
        state.sessions.insert(id, MockSession::new());
        state.last_created = Some(id);
        Ok(SessionId(id))
    }

    fn destroy_session(&self, id: SessionId) -> bool {
        let mut state = self.state.lock();
        state.calls.push(EngineCall::DestroySession(id));
        state.sessions.remove(&id.0).is_some()
    }

    fn open(&self, id: SessionId, path: &Path, _settings: &OpenSettings) -> bool {
        let delay = {
            let mut state = self.state.lock();
            state.calls.push(EngineCall::Open(id, path.to_path_buf()));
            state.open_delay
        };
        if let Some(delay) = delay {
            std::thread::sleep(delay);
        }
        let mut state = self.state.lock();
        let fail = state.fail_open;
        let Some(session) = state.session(id) else {
            return false;
        };
        if fail {
            return false;
        }
        session.opened = Some(path.to_path_buf());
        session.current_frame = None;
        session.state_code = PlaybackState::Opened.code();
        true
    }

    fn close(&self, id: SessionId) -> bool {
        let mut state = self.state.lock();
        state.calls.push(EngineCall::Close(id));
        match state.session(id) {
            Some(session) if session.opened.is_some() => {
                session.opened = None;
                session.current_frame = None;
                session.state_code = PlaybackState::Closed.code();
                true
            }
            _ => false,
        }
    }

    fn play(&self, id: SessionId) -> bool {
        let mut state = self.state.lock();
        state.calls.push(EngineCall::Play(id));
        match state.session(id) {
            Some(session) if session.opened.is_some() => {
                session.state_code = PlaybackState::Playing.code();
                true
            }
            _ => false,
        }
    }

    fn pause(&self, id: SessionId) -> bool {
        let mut state = self.state.lock();
        state.calls.push(EngineCall::Pause(id));
        match state.session(id) {
            Some(session) if session.opened.is_some() => {
                session.state_code = PlaybackState::Paused.code();
                true
            }
            _ => false,
        }
    }

    fn rewind(&self, id: SessionId) -> bool {
        let mut state = self.state.lock();
        state.calls.push(EngineCall::Rewind(id));
        state
            .session(id)
            .is_some_and(|session| session.opened.is_some())
    }

    fn state_code(&self, id: SessionId) -> i32 {
        let mut state = self.state.lock();
        state
            .session(id)
            .map_or(PlaybackState::Empty.code(), |s| s.state_code)
    }

    fn file_info(&self, id: SessionId) -> Option<FileMetadata> {
        let mut state = self.state.lock();
        let file = state.file;
        state
            .session(id)
            .and_then(|s| s.opened.as_ref())
            .map(|_| file)
    }

    fn frame_info(&self, id: SessionId) -> Option<FrameMetadata> {
        let mut state = self.state.lock();
        if state.session(id)?.opened.is_none() {
            return None;
        }
        let next = state.frames.pop_front();
        let session = state.session(id)?;
        if next.is_some() {
            session.current_frame = next;
        }
        session.current_frame
    }

    fn set_buffers(&self, id: SessionId, buffers: &PublishedBuffers) -> bool {
        let mut state = self.state.lock();
        state.calls.push(EngineCall::SetBuffers(id, *buffers));
        match state.session(id) {
            Some(session) => {
                session.buffers = Some(*buffers);
                session.buffers_valid = true;
                true
            }
            None => false,
        }
    }

    fn release_buffers(&self, id: SessionId) -> bool {
        let mut state = self.state.lock();
        state.calls.push(EngineCall::ReleaseBuffers(id));
        match state.session(id) {
            Some(session) => {
                session.buffers = None;
                session.buffers_valid = false;
                true
            }
            None => false,
        }
    }

    fn buffers_valid(&self, id: SessionId) -> bool {
        let mut state = self.state.lock();
        state.session(id).is_some_and(|s| s.buffers_valid)
    }

    fn set_camera_view(&self, id: SessionId, view: &CameraViewInterop) -> bool {
        let mut state = self.state.lock();
        state.calls.push(EngineCall::SetCameraView(id, *view));
        state.session(id).is_some()
    }

    fn issue_render_event(&self, token: RenderToken) {
        self.record(EngineCall::RenderEvent(token));
    }

    fn issue_buffer_fill_event(&self, id: SessionId) {
        self.record(EngineCall::BufferFill(id));
    }

    fn set_audio_position(&self, id: SessionId, position: Vec3Interop) -> bool {
        let mut state = self.state.lock();
        state.calls.push(EngineCall::AudioPosition(id, position));
        state.session(id).is_some()
    }

    fn clock_scale(&self, id: SessionId) -> Option<f32> {
        self.state.lock().session(id).map(|s| s.clock_scale)
    }

    fn set_clock_scale(&self, id: SessionId, scale: f32) -> bool {
        self.state
            .lock()
            .session(id)
            .map(|s| s.clock_scale = scale)
            .is_some()
    }

    fn set_audio_volume(&self, id: SessionId, volume: f32) -> bool {
        self.state
            .lock()
            .session(id)
            .map(|s| s.volume = volume)
            .is_some()
    }

    fn set_texture_load_timeout(&self, id: SessionId, timeout_ms: u32) -> bool {
        self.state
            .lock()
            .session(id)
            .map(|s| s.texture_timeout_ms = timeout_ms)
            .is_some()
    }

    fn set_z_buffer_inverted(&self, inverted: bool) {
        self.state.lock().z_buffer_inverted = inverted;
    }

    fn color_parameter(&self, id: SessionId, param: ColorParameter) -> Option<ColorParameterInfo> {
        let mut state = self.state.lock();
        let session = state.session(id)?;
        Some(session.colors.get(&param).copied().unwrap_or(ColorParameterInfo {
            min: 0.0,
            max: 2.0,
            default: 1.0,
            current: 1.0,
            enabled: false,
        }))
    }

    fn set_color_parameter(
        &self,
        id: SessionId,
        param: ColorParameter,
        value: f32,
        enabled: bool,
    ) -> bool {
        let mut state = self.state.lock();
        let Some(session) = state.session(id) else {
            return false;
        };
        session.colors.insert(
            param,
            ColorParameterInfo {
                min: 0.0,
                max: 2.0,
                default: 1.0,
                current: value,
                enabled,
            },
        );
        true
    }

    fn reader_status(&self, id: SessionId) -> Option<ReaderStatusInterop> {
        let mut state = self.state.lock();
        let reader = state.reader;
        state.session(id).map(|_| reader)
    }

    fn internal_state_bits(&self, id: SessionId) -> u32 {
        let mut state = self.state.lock();
        let bits = state.internal_bits;
        state.session(id).map_or(0, |_| bits)
    }

    fn seek_range(&self, id: SessionId) -> Option<(u64, u64)> {
        let mut state = self.state.lock();
        let frames = u64::from(state.file.frame_count);
        state
            .session(id)
            .and_then(|s| s.opened.as_ref())
            .map(|_| (0, frames.saturating_sub(1)))
    }

    fn seek_to_frame(&self, id: SessionId, frame_id: u64) -> bool {
        let mut state = self.state.lock();
        state.calls.push(EngineCall::Seek(id, frame_id));
        state.session(id).is_some_and(|s| s.opened.is_some())
    }

    fn set_debug_toggle(&self, id: SessionId, toggle: DebugToggle, enabled: bool) -> bool {
        self.state
            .lock()
            .session(id)
            .map(|s| s.toggles.insert(toggle, enabled))
            .is_some()
    }

    fn enable_tracing(&self, enabled: bool, level: i32) {
        self.state.lock().tracing = enabled.then_some(level);
    }

    fn next_trace_line(&self) -> Option<String> {
        self.state.lock().trace.pop_front()
    }

    fn enumerate_audio_devices(&self, max: usize) -> Vec<AudioDevice> {
        self.state.lock().devices.iter().take(max).cloned().collect()
    }
}
