//! # Playback Controller
//!
//! The object the host drives once per render frame.
//!
//! ```text
//!            initialize            open / open_async
//! Uninitialized ────► Initialized ───────────────► Opened ◄──► Playing/Paused
//!       ▲                                             │
//!       │ cleanup (from anywhere)          close      ▼
//!       └─────────────────────────────────────────  Closed ──open──► Opened
//! ```
//!
//! Everything here runs on the render thread. The only blocking call, the
//! engine's open, can be pushed to a tokio blocking worker with
//! [`PlaybackController::open_async`]; its completion is picked up by `tick`.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::thread::{self, ThreadId};

use glam::{Mat4, Vec3};
use holoplay_interop::{
    audio_devices, drain_trace_lines, AudioDevice, ColorCorrection, ColorParameter,
    ColorParameterInfo, DebugToggle, InternalState, NativeEngine, ReaderStatus, RenderToken,
    SessionHandle, SessionHints,
};
use holoplay_rendering::{
    CameraRegistry, FrameBufferSync, GpuAllocator, HostCamera, RenderHookHost, TextureFormat,
};
use holoplay_shared::constants::{FALLBACK_BOUNDS_MAX, FALLBACK_BOUNDS_MIN};
use holoplay_shared::{
    Bounds, FileMetadata, FrameMetadata, NativeLogLevel, PlaybackState, PlayerConfig, RenderMode,
};
use tokio::runtime::Handle;

use crate::error::{PlaybackError, PlaybackResult};
use crate::events::{EventHub, EventReceiver, ListenerId, PlaybackEvent, PlaybackListener};
use crate::open::OpenWorker;
use crate::report::{TickReport, TickSkip};
use crate::source::resolve_source_path;

/// Tolerance when deciding whether frame bounds moved.
const BOUNDS_EPSILON: f32 = 1e-6;

/// Host services the controller cannot work without.
#[derive(Clone)]
pub struct HostServices {
    /// Creates the texture and mesh the engine fills in host-draw mode.
    pub gpu: Arc<dyn GpuAllocator>,
    /// Attaches per-camera render hooks in native-draw mode.
    pub hooks: Arc<dyn RenderHookHost>,
}

/// The host's audio listener.
pub trait AudioListener {
    /// Transform from world space into listener space.
    fn world_to_listener(&self) -> Mat4;
}

/// Drives one volumetric clip.
pub struct PlaybackController {
    config: PlayerConfig,
    engine: Arc<dyn NativeEngine>,
    session: SessionHandle,
    gpu: Arc<dyn GpuAllocator>,
    hooks: Arc<dyn RenderHookHost>,
    cameras: CameraRegistry,
    buffers: FrameBufferSync,
    events: EventHub,
    opener: OpenWorker,
    render_thread: ThreadId,

    // Placement
    world_transform: Mat4,
    audio_listener: Option<Box<dyn AudioListener>>,
    audio_source_offset: Vec3,
    xr_device: Option<String>,
    preview_keeps_texture: bool,

    // Open source
    source: Option<PathBuf>,
    file: FileMetadata,
    frame: FrameMetadata,
    local_bounds: Bounds,
    world_bounds: Bounds,

    // Per-run flags
    ready: bool,
    visible: bool,
    world_bounds_from_frame: bool,
    was_eos: bool,
    was_playing: bool,
    pause_at: Option<u32>,
}

impl std::fmt::Debug for PlaybackController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PlaybackController")
            .field("session", &self.session)
            .field("render_mode", &self.config.render_mode)
            .field("source", &self.source)
            .field("ready", &self.ready)
            .field("cameras", &self.cameras.len())
            .field("events", &self.events)
            .finish_non_exhaustive()
    }
}

impl PlaybackController {
    /// Creates an uninitialized controller bound to the calling thread.
    ///
    /// No session exists until [`initialize`](Self::initialize) or
    /// [`open`](Self::open).
    #[must_use]
    pub fn new(engine: Arc<dyn NativeEngine>, host: HostServices, config: PlayerConfig) -> Self {
        let format = TextureFormat::for_platform(config.platform);
        Self {
            session: SessionHandle::detached(Arc::clone(&engine)),
            cameras: CameraRegistry::new(config.build_profile),
            buffers: FrameBufferSync::new(format),
            events: EventHub::default(),
            opener: OpenWorker::new(),
            render_thread: thread::current().id(),
            world_transform: Mat4::IDENTITY,
            audio_listener: None,
            audio_source_offset: Vec3::ZERO,
            xr_device: None,
            preview_keeps_texture: false,
            source: None,
            file: FileMetadata::default(),
            frame: FrameMetadata::default(),
            local_bounds: Bounds::EMPTY,
            world_bounds: Bounds::EMPTY,
            ready: false,
            visible: false,
            world_bounds_from_frame: false,
            was_eos: false,
            was_playing: false,
            pause_at: None,
            gpu: host.gpu,
            hooks: host.hooks,
            engine,
            config,
        }
    }

    /// Creates an uninitialized controller configured from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns [`PlaybackError::Settings`] when the file cannot be read,
    /// parsed or validated.
    pub fn from_config_file(
        engine: Arc<dyn NativeEngine>,
        host: HostServices,
        path: impl AsRef<Path>,
    ) -> PlaybackResult<Self> {
        let config = PlayerConfig::load(path)?;
        Ok(Self::new(engine, host, config))
    }

    // =========================================================================
    // Lifecycle
    // =========================================================================

    /// Allocates a fresh native session, disposing any previous one first.
    ///
    /// # Errors
    ///
    /// Returns [`PlaybackError::Allocation`] when the engine cannot create a
    /// session. The controller stays inert and the call may be retried.
    pub fn initialize(&mut self) -> PlaybackResult<()> {
        self.ready = false;
        self.opener.cancel();
        if self.session.is_valid() {
            self.cameras.flush_all(self.hooks.as_ref());
            self.session.destroy();
            self.buffers.release(self.gpu.as_ref());
            self.forget_source();
        }

        let (alloc_memory_min_gb, alloc_memory_max_gb) = self.config.active_memory_limits();
        let hints = SessionHints {
            default_max_vertex_count: self.config.default_max_vertex_count,
            default_max_index_count: self.config.default_max_index_count,
            alloc_memory_min_gb,
            alloc_memory_max_gb,
        };
        self.session = match SessionHandle::create(Arc::clone(&self.engine), &hints) {
            Ok(session) => session,
            Err(e) => {
                tracing::error!(error = %e, "session allocation failed, controller is inert");
                return Err(e.into());
            }
        };

        self.engine.set_z_buffer_inverted(self.config.z_buffer_inverted);
        if self.config.native_log_level != NativeLogLevel::None {
            self.enable_native_tracing(self.config.native_log_level);
        }
        if self.config.render_mode == RenderMode::HostDraw {
            self.session.set_debug_toggle(DebugToggle::UseGpu, true);
            self.session
                .set_debug_toggle(DebugToggle::ComputeNormals, self.config.open.output_normals);
        }
        self.apply_core_settings();
        self.ready = true;

        tracing::info!(
            session = self.session.id().0,
            render_mode = ?self.config.render_mode,
            "playback session initialized"
        );
        Ok(())
    }

    /// Opens `source` and blocks until the engine has it.
    ///
    /// Initializes first when there is no session.
    ///
    /// # Errors
    ///
    /// Returns an error if initialization fails or the engine rejects the
    /// source. Metadata from any earlier open is left untouched.
    pub fn open(&mut self, source: &str) -> PlaybackResult<()> {
        if !self.session.is_valid() {
            self.initialize()?;
        }
        let path = self.resolve(source);
        self.opener.cancel();
        if !self.session.open(&path, &self.config.open) {
            tracing::warn!(path = %path.display(), "engine rejected source");
            return Err(PlaybackError::NativeCallFailed("open"));
        }
        self.finish_open(path);
        Ok(())
    }

    /// Opens `source` on a blocking worker of `runtime`.
    ///
    /// The rest of the open runs on the next `tick` after the engine answers.
    /// A failed open is reported through [`PlaybackEvent::FatalError`].
    ///
    /// # Errors
    ///
    /// Returns an error if initialization fails.
    pub fn open_async(&mut self, source: &str, runtime: &Handle) -> PlaybackResult<()> {
        if !self.session.is_valid() {
            self.initialize()?;
        }
        let path = self.resolve(source);
        self.opener.dispatch(
            runtime,
            Arc::clone(&self.engine),
            self.session.id(),
            path,
            self.config.open.clone(),
        );
        Ok(())
    }

    /// Starts or resumes playback and shows the object.
    ///
    /// # Errors
    ///
    /// Fails when uninitialized or when the engine refuses.
    pub fn play(&mut self) -> PlaybackResult<()> {
        self.require_session()?;
        self.visible = true;
        native("play", self.session.play())
    }

    /// Pauses playback.
    ///
    /// # Errors
    ///
    /// Fails when uninitialized or when the engine refuses.
    pub fn pause(&mut self) -> PlaybackResult<()> {
        self.require_session()?;
        native("pause", self.session.pause())
    }

    /// Returns to the start of the file and re-arms the end-of-stream
    /// notification.
    ///
    /// # Errors
    ///
    /// Fails when uninitialized or when the engine refuses.
    pub fn rewind(&mut self) -> PlaybackResult<()> {
        self.require_session()?;
        native("rewind", self.session.rewind())?;
        self.was_eos = false;
        Ok(())
    }

    /// Hides the object, pauses and rewinds.
    ///
    /// # Errors
    ///
    /// Fails when uninitialized or when the engine refuses either call.
    pub fn stop(&mut self) -> PlaybackResult<()> {
        self.require_session()?;
        self.visible = false;
        self.pause()?;
        self.rewind()
    }

    /// Shows frame `frame_id` and holds there.
    ///
    /// Rewinds, plays and pauses the first time a frame at or past `frame_id`
    /// is observed by `tick`.
    ///
    /// # Errors
    ///
    /// Fails when uninitialized or when the engine refuses.
    pub fn display_frame(&mut self, frame_id: u32) -> PlaybackResult<()> {
        self.require_session()?;
        self.pause_at = None;
        self.rewind()?;
        self.play()?;
        self.pause_at = Some(frame_id);
        Ok(())
    }

    /// [`display_frame`](Self::display_frame) on the configured
    /// `pause_frame_id`.
    ///
    /// # Errors
    ///
    /// Fails when uninitialized or when the engine refuses.
    pub fn display_default_frame(&mut self) -> PlaybackResult<()> {
        self.display_frame(self.config.pause_frame_id)
    }

    /// Closes the current source. The session stays valid for another open.
    ///
    /// Any background open still in flight is discarded when it completes.
    ///
    /// # Errors
    ///
    /// Fails when uninitialized or when the engine has nothing to close.
    pub fn close(&mut self) -> PlaybackResult<()> {
        self.ready = false;
        self.visible = false;
        self.pause_at = None;
        self.opener.cancel();
        self.cameras.detach_hooks(self.hooks.as_ref());
        self.require_session()?;

        let closed = self.session.close();
        if !self.preview_keeps_texture {
            self.buffers.release_texture(self.gpu.as_ref());
        }
        if closed {
            tracing::info!(session = self.session.id().0, "source closed");
        }
        native("close", closed)
    }

    /// Destroys the session and forgets everything about the source.
    ///
    /// Safe to call in any state, any number of times.
    pub fn cleanup(&mut self) {
        self.ready = false;
        self.visible = false;
        self.opener.cancel();
        self.cameras.flush_all(self.hooks.as_ref());
        if self.session.destroy() {
            tracing::info!("playback session cleaned up");
        }
        self.buffers.release(self.gpu.as_ref());
        self.forget_source();
    }

    // =========================================================================
    // Per-frame
    // =========================================================================

    /// Once per render frame.
    pub fn tick(&mut self) -> TickReport {
        let mut report = TickReport::default();
        self.drain_opens(&mut report);
        report.trace_lines = self.forward_native_trace();

        if !self.ready || !self.session.is_valid() {
            report.skipped = Some(TickSkip::NotReady);
            return report;
        }

        self.update_audio();

        let Some(raw) = self.session.frame_info() else {
            tracing::debug!("no frame metadata this tick");
            report.skipped = Some(TickSkip::NoFrame);
            return report;
        };
        self.frame = raw;

        let mut frame = raw;
        if self.config.render_mode == RenderMode::NativeDraw && self.config.flip_handedness {
            frame.bounds = frame.bounds.mirrored_x();
        }
        report.frame_id = Some(frame.frame_id);

        if !frame.bounds.is_degenerate()
            && !frame.bounds.approx_eq(&self.local_bounds, BOUNDS_EPSILON)
        {
            self.local_bounds = frame.bounds;
            report.bounds_updated = true;
            if !self.file.has_bounds() && frame.frame_id <= 1 && !self.world_bounds_from_frame {
                tracing::warn!(
                    frame = frame.frame_id,
                    "source carries no bounds, sizing world bounds from the first frame"
                );
                self.world_bounds = self.local_bounds.transformed(&self.world_transform);
                self.world_bounds_from_frame = true;
                report.world_bounds_seeded = true;
            }
            self.publish_mesh_bounds();
        }

        if self.config.render_mode == RenderMode::HostDraw {
            let reallocated = self
                .buffers
                .sync(&raw, false, self.gpu.as_ref(), &self.session);
            report.buffers_reallocated = reallocated;
            report.buffers_published = self.buffers.publish(&self.session, reallocated);
            if reallocated {
                self.publish_mesh_bounds();
            }
        }

        self.events.emit(&PlaybackEvent::FrameUpdated(frame));

        if let Some(target) = self.pause_at {
            if frame.frame_id >= target {
                self.pause_at = None;
                report.paused_on_frame = true;
                if let Err(e) = self.pause() {
                    tracing::warn!(error = %e, frame = frame.frame_id, "display pause failed");
                }
            }
        }

        if frame.is_end_of_stream && !self.was_eos {
            tracing::info!(frame = frame.frame_id, "end of stream");
            self.events.emit(&PlaybackEvent::EndOfStream);
            report.end_of_stream = true;
        }
        self.was_eos = frame.is_end_of_stream;

        report
    }

    /// End of the host frame. Asks the engine to fill host buffers in
    /// host-draw mode.
    pub fn end_of_frame(&self) {
        if self.ready && self.config.render_mode == RenderMode::HostDraw {
            self.session.issue_buffer_fill_event();
        }
    }

    /// Before `camera` renders the object.
    ///
    /// In native-draw mode, attaches the camera's render hook once and pushes
    /// its view to the engine.
    ///
    /// # Errors
    ///
    /// Returns a configuration error for a camera that cannot be rendered.
    pub fn will_render_object(&mut self, camera: &dyn HostCamera) -> PlaybackResult<()> {
        if !self.ready || self.config.render_mode != RenderMode::NativeDraw {
            return Ok(());
        }
        let id = self
            .cameras
            .resolve(
                camera,
                self.config.target_device,
                self.config.flip_handedness,
                self.xr_device.as_deref(),
            )?
            .id();
        if !self.hooks.is_attached(camera.key()) {
            self.hooks
                .attach(camera.key(), RenderToken::pack(id, self.session.id()));
            tracing::debug!(camera = camera.name(), id, "render hook attached");
        }
        self.update_camera(camera)
    }

    /// After `camera` rendered the object.
    ///
    /// # Errors
    ///
    /// Returns a configuration error for a camera that cannot be rendered.
    pub fn render_object(&mut self, camera: &dyn HostCamera) -> PlaybackResult<()> {
        if !self.ready {
            return Ok(());
        }
        if self.config.render_mode == RenderMode::NativeDraw {
            self.update_camera(camera)?;
        }
        self.events.emit(&PlaybackEvent::Render);
        Ok(())
    }

    /// Host application lost or regained focus.
    ///
    /// Playback that was running when focus was lost resumes when it returns.
    pub fn on_application_pause(&mut self, paused: bool) {
        if !self.session.is_valid() {
            return;
        }
        if paused {
            self.was_playing = self.current_state() == PlaybackState::Playing;
            if let Err(e) = self.pause() {
                tracing::debug!(error = %e, "pause on focus loss failed");
            }
        } else if self.was_playing {
            if let Err(e) = self.play() {
                tracing::warn!(error = %e, "resume after focus loss failed");
            }
        }
    }

    // =========================================================================
    // Settings
    // =========================================================================

    /// Pushes texture timeout, volume and clock scale to the engine.
    pub fn apply_core_settings(&self) {
        self.session
            .set_texture_load_timeout(self.config.texture_load_timeout_ms);
        self.session.set_audio_volume(self.config.audio_volume);
        self.session.set_clock_scale(self.config.clock_scale);
    }

    /// Configured audio volume.
    #[must_use]
    pub fn audio_volume(&self) -> f32 {
        self.config.audio_volume
    }

    /// Sets the audio volume. Stored even without a session.
    ///
    /// # Errors
    ///
    /// Rejects values outside `[0, 1]`; fails when the engine refuses.
    pub fn set_audio_volume(&mut self, volume: f32) -> PlaybackResult<()> {
        if !(0.0..=1.0).contains(&volume) {
            return Err(PlaybackError::InvalidArgument {
                name: "audio_volume",
                value: volume,
            });
        }
        self.config.audio_volume = volume;
        if !self.session.is_valid() {
            return Ok(());
        }
        native("set_audio_volume", self.session.set_audio_volume(volume))
    }

    /// Engine clock multiplier, `0.0` without a session.
    #[must_use]
    pub fn clock_scale(&self) -> f32 {
        self.session.clock_scale().unwrap_or(0.0)
    }

    /// Sets the clock multiplier. Stored even without a session.
    ///
    /// # Errors
    ///
    /// Rejects non-positive values; fails when the engine refuses.
    pub fn set_clock_scale(&mut self, scale: f32) -> PlaybackResult<()> {
        if !(scale.is_finite() && scale > 0.0) {
            return Err(PlaybackError::InvalidArgument {
                name: "clock_scale",
                value: scale,
            });
        }
        self.config.clock_scale = scale;
        if !self.session.is_valid() {
            return Ok(());
        }
        native("set_clock_scale", self.session.set_clock_scale(scale))
    }

    /// Turns native trace output on at `level`, or off with
    /// [`NativeLogLevel::None`].
    pub fn enable_native_tracing(&mut self, level: NativeLogLevel) {
        self.config.native_log_level = level;
        self.engine
            .enable_tracing(level != NativeLogLevel::None, level.code());
    }

    /// Applies every override in `correction`.
    ///
    /// # Errors
    ///
    /// Fails when uninitialized or when the engine refuses any override.
    pub fn set_color_correction(&mut self, correction: &ColorCorrection) -> PlaybackResult<()> {
        self.require_session()?;
        native(
            "set_color_correction",
            self.session.set_color_correction(correction),
        )
    }

    /// Range and current value of one colour parameter.
    #[must_use]
    pub fn color_parameter(&self, param: ColorParameter) -> Option<ColorParameterInfo> {
        self.session.color_parameter(param)
    }

    /// Sets one colour parameter.
    ///
    /// # Errors
    ///
    /// Fails when uninitialized or when the engine refuses.
    pub fn set_color_parameter(
        &mut self,
        param: ColorParameter,
        value: f32,
        enabled: bool,
    ) -> PlaybackResult<()> {
        self.require_session()?;
        native(
            "set_color_parameter",
            self.session.set_color_parameter(param, value, enabled),
        )
    }

    /// Flips an engine debug toggle.
    ///
    /// # Errors
    ///
    /// Fails when uninitialized or when the engine refuses.
    pub fn set_debug_toggle(&mut self, toggle: DebugToggle, enabled: bool) -> PlaybackResult<()> {
        self.require_session()?;
        native(
            "set_debug_toggle",
            self.session.set_debug_toggle(toggle, enabled),
        )
    }

    /// Jumps to `frame_id` and re-arms the end-of-stream notification.
    ///
    /// # Errors
    ///
    /// Fails when uninitialized or when the engine refuses.
    pub fn seek_to_frame(&mut self, frame_id: u64) -> PlaybackResult<()> {
        self.require_session()?;
        native("seek_to_frame", self.session.seek_to_frame(frame_id))?;
        self.was_eos = false;
        Ok(())
    }

    // =========================================================================
    // Placement
    // =========================================================================

    /// Object-to-world transform.
    #[must_use]
    pub fn world_transform(&self) -> Mat4 {
        self.world_transform
    }

    /// Moves the object.
    pub fn set_world_transform(&mut self, transform: Mat4) {
        self.world_transform = transform;
    }

    /// Name of the active XR runtime device, used when the target device is
    /// auto-detected.
    pub fn set_xr_device(&mut self, name: Option<String>) {
        self.xr_device = name;
    }

    /// Listener positional audio is relative to.
    pub fn set_audio_listener(&mut self, listener: Option<Box<dyn AudioListener>>) {
        self.audio_listener = listener;
    }

    /// World-space offset of the audio source from the object origin.
    pub fn set_audio_source_offset(&mut self, offset: Vec3) {
        self.audio_source_offset = offset;
    }

    /// Keep the frame texture across `close` for an authoring preview.
    pub fn set_preview_keeps_texture(&mut self, keep: bool) {
        self.preview_keeps_texture = keep;
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// Engine playback state, [`PlaybackState::Empty`] without a session.
    #[must_use]
    pub fn current_state(&self) -> PlaybackState {
        self.session.state()
    }

    /// Whether a session exists.
    #[must_use]
    pub fn is_initialized(&self) -> bool {
        self.session.is_valid()
    }

    /// Whether `tick` does any work.
    #[must_use]
    pub fn is_ready(&self) -> bool {
        self.ready
    }

    /// Whether the host should draw the object.
    #[must_use]
    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Local-space bounds of the current frame.
    #[must_use]
    pub fn bounding_box(&self) -> Bounds {
        self.local_bounds
    }

    /// World-space bounds the clip is expected to stay within.
    #[must_use]
    pub fn maximal_world_bounds(&self) -> Bounds {
        self.world_bounds
    }

    /// Metadata of the open file.
    #[must_use]
    pub fn file_info(&self) -> &FileMetadata {
        &self.file
    }

    /// Metadata of the latest frame.
    #[must_use]
    pub fn frame_info(&self) -> &FrameMetadata {
        &self.frame
    }

    /// Path of the open source.
    #[must_use]
    pub fn source_path(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    /// Audio output devices the engine can use.
    #[must_use]
    pub fn audio_devices(&self) -> Vec<AudioDevice> {
        audio_devices(self.engine.as_ref())
    }

    /// Reader progress snapshot.
    #[must_use]
    pub fn reader_status(&self) -> Option<ReaderStatus> {
        self.session.reader_status()
    }

    /// Engine internal flags.
    #[must_use]
    pub fn internal_state(&self) -> InternalState {
        self.session.internal_state()
    }

    /// First and last seekable frame.
    #[must_use]
    pub fn seek_range(&self) -> Option<(u64, u64)> {
        self.session.seek_range()
    }

    /// Camera registry.
    #[must_use]
    pub fn cameras(&self) -> &CameraRegistry {
        &self.cameras
    }

    /// Host buffer synchronizer.
    #[must_use]
    pub fn buffers(&self) -> &FrameBufferSync {
        &self.buffers
    }

    /// Active configuration.
    #[must_use]
    pub fn config(&self) -> &PlayerConfig {
        &self.config
    }

    /// Background opens not yet picked up by `tick`.
    #[must_use]
    pub fn pending_opens(&self) -> usize {
        self.opener.in_flight()
    }

    // =========================================================================
    // Notifications
    // =========================================================================

    /// Adds a synchronous listener.
    pub fn add_listener(&mut self, listener: impl PlaybackListener + 'static) -> ListenerId {
        self.events.add_listener(listener)
    }

    /// Removes a listener.
    pub fn remove_listener(&mut self, id: ListenerId) -> bool {
        self.events.remove_listener(id)
    }

    /// Opens a bounded event channel.
    pub fn subscribe(&mut self, capacity: usize) -> EventReceiver {
        self.events.subscribe(capacity)
    }

    // =========================================================================
    // Internals
    // =========================================================================

    fn require_session(&self) -> PlaybackResult<()> {
        if self.session.is_valid() {
            Ok(())
        } else {
            Err(PlaybackError::NotInitialized)
        }
    }

    /// Drops everything learned from the current source.
    fn forget_source(&mut self) {
        self.source = None;
        self.file = FileMetadata::default();
        self.frame = FrameMetadata::default();
        self.local_bounds = Bounds::EMPTY;
        self.world_bounds = Bounds::EMPTY;
        self.world_bounds_from_frame = false;
        self.was_eos = false;
        self.was_playing = false;
        self.pause_at = None;
    }

    fn resolve(&self, source: &str) -> PathBuf {
        resolve_source_path(source, self.config.platform, &self.config.assets_dir)
    }

    fn drain_opens(&mut self, report: &mut TickReport) {
        for completion in self.opener.drain() {
            let live = self.opener.is_current(&completion)
                && self.session.is_valid()
                && completion.session == self.session.id();
            if !live {
                tracing::debug!(
                    generation = completion.generation,
                    path = %completion.path.display(),
                    "stale open discarded"
                );
                report.opens_discarded += 1;
            } else if completion.opened {
                self.finish_open(completion.path);
                report.opens_completed += 1;
            } else {
                tracing::warn!(path = %completion.path.display(), "background open failed");
                report.opens_failed += 1;
                self.events.emit(&PlaybackEvent::FatalError {
                    reason: format!("failed to open {}", completion.path.display()),
                });
            }
        }
    }

    /// Everything after the engine accepted a source.
    fn finish_open(&mut self, path: PathBuf) {
        debug_assert_eq!(
            thread::current().id(),
            self.render_thread,
            "open continuation must run on the render thread"
        );

        let file = self.session.file_info().unwrap_or_else(|| {
            tracing::warn!("engine returned no file metadata after open");
            FileMetadata::default()
        });
        self.local_bounds = if file.has_bounds() {
            file.bounds
        } else {
            tracing::warn!(path = %path.display(), "source carries no bounds, using fallback box");
            self.fallback_bounds()
        };
        self.frame = FrameMetadata::presized(
            &file,
            self.config.default_max_vertex_count,
            self.config.default_max_index_count,
        );
        self.file = file;
        self.world_bounds_from_frame = false;
        self.was_eos = false;
        self.ready = true;

        tracing::info!(
            path = %path.display(),
            frames = file.frame_count,
            duration_secs = file.duration_secs(),
            has_audio = file.has_audio,
            "source opened"
        );
        self.events.emit(&PlaybackEvent::Opened { path: path.clone() });
        self.source = Some(path);

        self.world_bounds = self.local_bounds.transformed(&self.world_transform);
        self.update_audio();
        if self.config.render_mode == RenderMode::HostDraw {
            let frame = self.frame;
            let reallocated = self
                .buffers
                .sync(&frame, true, self.gpu.as_ref(), &self.session);
            self.buffers.publish(&self.session, reallocated);
        }
        self.publish_mesh_bounds();
    }

    fn fallback_bounds(&self) -> Bounds {
        let (scale, _, _) = self.world_transform.to_scale_rotation_translation();
        let scale = scale.abs().max(Vec3::splat(f32::EPSILON));
        Bounds::new(
            Vec3::splat(FALLBACK_BOUNDS_MIN) / scale,
            Vec3::splat(FALLBACK_BOUNDS_MAX) / scale,
        )
    }

    fn publish_mesh_bounds(&self) {
        if let Some(mesh) = self.buffers.mesh() {
            self.gpu.set_mesh_bounds(mesh, self.local_bounds);
        }
    }

    fn update_audio(&self) -> bool {
        let Some(listener) = &self.audio_listener else {
            return false;
        };
        if self.session.state() != PlaybackState::Playing {
            return false;
        }
        let source = self.world_transform.w_axis.truncate() + self.audio_source_offset;
        let relative = listener.world_to_listener().transform_point3(source);
        self.session.set_audio_position(relative.into())
    }

    fn update_camera(&mut self, camera: &dyn HostCamera) -> PlaybackResult<()> {
        let view = self.cameras.resolve(
            camera,
            self.config.target_device,
            self.config.flip_handedness,
            self.xr_device.as_deref(),
        )?;
        view.update(camera, &self.world_transform);
        self.session.set_camera_view(view.interop());
        Ok(())
    }

    fn forward_native_trace(&self) -> usize {
        let level = self.config.native_log_level;
        if level == NativeLogLevel::None {
            return 0;
        }
        let lines = drain_trace_lines(self.engine.as_ref());
        for line in &lines {
            match level {
                NativeLogLevel::Verbose => tracing::trace!(target: "holoplay::native", "{line}"),
                NativeLogLevel::Message => tracing::info!(target: "holoplay::native", "{line}"),
                NativeLogLevel::Debug => tracing::debug!(target: "holoplay::native", "{line}"),
                NativeLogLevel::Critical => tracing::error!(target: "holoplay::native", "{line}"),
                NativeLogLevel::None => {}
            }
        }
        lines.len()
    }
}

impl Drop for PlaybackController {
    fn drop(&mut self) {
        self.cleanup();
    }
}

fn native(call: &'static str, ok: bool) -> PlaybackResult<()> {
    if ok {
        Ok(())
    } else {
        tracing::warn!(call, "native call failed");
        Err(PlaybackError::NativeCallFailed(call))
    }
}
