//! Plain records exchanged with the native engine.
//!
//! Anything the engine reads by layout is `#[repr(C)]` and `Pod`. Booleans
//! travel as `u8` so the records stay padding-free.

use bytemuck::{Pod, Zeroable};
use glam::Mat4;
use holoplay_shared::ReaderState;

/// Identity of one engine session.
#[repr(transparent)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Pod, Zeroable)]
pub struct SessionId(pub i32);

impl SessionId {
    /// The "no session" sentinel.
    pub const INVALID: Self = Self(-1);

    /// Returns true unless this is the sentinel.
    #[must_use]
    pub const fn is_valid(self) -> bool {
        self.0 != Self::INVALID.0
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::INVALID
    }
}

/// Capacity and memory hints handed to the engine when a session is created.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
pub struct SessionHints {
    /// Vertex count to size for before a file is opened.
    pub default_max_vertex_count: u32,
    /// Index count to size for before a file is opened.
    pub default_max_index_count: u32,
    /// Below this process footprint (GB) the engine stops trimming its cache.
    pub alloc_memory_min_gb: f32,
    /// Above this process footprint (GB) the engine starts trimming its cache.
    pub alloc_memory_max_gb: f32,
}

/// Opaque GPU resource pointer owned by the host.
#[repr(transparent)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Pod, Zeroable)]
pub struct NativePtr(pub u64);

impl NativePtr {
    /// Null pointer.
    pub const NULL: Self = Self(0);

    /// Returns true for the null pointer.
    #[must_use]
    pub const fn is_null(self) -> bool {
        self.0 == 0
    }
}

/// Texture and mesh handles the engine fills each frame in host-draw mode.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Pod, Zeroable)]
pub struct PublishedBuffers {
    /// Texture the engine writes the atlas into.
    pub texture: NativePtr,
    /// Texture width in pixels.
    pub texture_width: u32,
    /// Texture height in pixels.
    pub texture_height: u32,
    /// Vertex buffer.
    pub vertex_buffer: NativePtr,
    /// Index buffer.
    pub index_buffer: NativePtr,
    /// Vertex capacity of `vertex_buffer`.
    pub vertex_count: u32,
    /// Index capacity of `index_buffer`.
    pub index_count: u32,
}

/// Which eye(s) a camera renders for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(u8)]
pub enum TargetEye {
    /// No eye.
    None = 0,
    /// Left eye.
    #[default]
    Left = 1,
    /// Right eye.
    Right = 2,
    /// Both eyes in one pass.
    Both = 3,
}

impl TargetEye {
    /// Parses an eye code. Unknown codes map to [`TargetEye::None`].
    #[must_use]
    pub const fn from_code(code: u8) -> Self {
        match code {
            1 => Self::Left,
            2 => Self::Right,
            3 => Self::Both,
            _ => Self::None,
        }
    }

    /// Returns true for exactly one eye.
    #[must_use]
    pub const fn is_single(self) -> bool {
        matches!(self, Self::Left | Self::Right)
    }
}

/// Per-camera view published to the engine.
///
/// The matrix is column-major, the layout `glam` uses.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct CameraViewInterop {
    /// Registry id of the camera.
    pub camera_id: i32,
    /// Model-view-projection matrix, column-major.
    pub mvp: [f32; 16],
    /// Viewport width in pixels.
    pub viewport_width: f32,
    /// Viewport height in pixels.
    pub viewport_height: f32,
    /// 1 when the camera renders left-handed.
    pub is_left_handed: u8,
    /// 1 for a stereo camera.
    pub is_stereo: u8,
    /// [`TargetEye`] code.
    pub target_eye: u8,
    /// Unused.
    pub reserved: u8,
}

impl Default for CameraViewInterop {
    fn default() -> Self {
        Self {
            camera_id: -1,
            mvp: Mat4::IDENTITY.to_cols_array(),
            viewport_width: 0.0,
            viewport_height: 0.0,
            is_left_handed: 0,
            is_stereo: 0,
            target_eye: TargetEye::Left as u8,
            reserved: 0,
        }
    }
}

impl CameraViewInterop {
    /// Matrix as a `glam` value.
    #[must_use]
    pub fn mvp_matrix(&self) -> Mat4 {
        Mat4::from_cols_array(&self.mvp)
    }

    /// Eye as a typed value.
    #[must_use]
    pub const fn eye(&self) -> TargetEye {
        TargetEye::from_code(self.target_eye)
    }
}

/// Render event key: camera id in the high half, session id in the low half.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RenderToken(pub u32);

impl RenderToken {
    /// Packs a camera id and a session id. Both are truncated to 16 bits.
    #[must_use]
    pub const fn pack(camera_id: i32, session: SessionId) -> Self {
        let cam = (camera_id as u32) & 0xFFFF;
        let sess = (session.0 as u32) & 0xFFFF;
        Self((cam << 16) | sess)
    }

    /// Camera half of the token.
    #[must_use]
    pub const fn camera_bits(self) -> u16 {
        (self.0 >> 16) as u16
    }

    /// Session half of the token.
    #[must_use]
    pub const fn session_bits(self) -> u16 {
        (self.0 & 0xFFFF) as u16
    }
}

/// Colour correction parameters the engine exposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColorParameter {
    /// Brightness.
    Brightness,
    /// Contrast.
    Contrast,
    /// Saturation.
    Saturation,
    /// Gamma.
    Gamma,
    /// Hue.
    Hue,
    /// Alpha.
    Alpha,
    /// Red tint.
    TintR,
    /// Green tint.
    TintG,
    /// Blue tint.
    TintB,
}

impl ColorParameter {
    /// Every parameter, in mask order.
    pub const ALL: [Self; 9] = [
        Self::Brightness,
        Self::Contrast,
        Self::Saturation,
        Self::Gamma,
        Self::Hue,
        Self::Alpha,
        Self::TintR,
        Self::TintG,
        Self::TintB,
    ];

    /// Engine mask bit for this parameter.
    #[must_use]
    pub const fn mask(self) -> u32 {
        match self {
            Self::Brightness => 0x0001,
            Self::Contrast => 0x0002,
            Self::Saturation => 0x0004,
            Self::Gamma => 0x0008,
            Self::Hue => 0x0010,
            Self::Alpha => 0x0020,
            Self::TintR => 0x0040,
            Self::TintG => 0x0080,
            Self::TintB => 0x0100,
        }
    }
}

/// A set of colour correction overrides. `None` leaves a parameter untouched.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ColorCorrection {
    /// Brightness override.
    pub brightness: Option<f32>,
    /// Contrast override.
    pub contrast: Option<f32>,
    /// Saturation override.
    pub saturation: Option<f32>,
    /// Gamma override.
    pub gamma: Option<f32>,
    /// Hue override.
    pub hue: Option<f32>,
    /// Alpha override.
    pub alpha: Option<f32>,
    /// Red tint override.
    pub tint_r: Option<f32>,
    /// Green tint override.
    pub tint_g: Option<f32>,
    /// Blue tint override.
    pub tint_b: Option<f32>,
}

impl ColorCorrection {
    /// Value set for one parameter.
    #[must_use]
    pub const fn get(&self, param: ColorParameter) -> Option<f32> {
        match param {
            ColorParameter::Brightness => self.brightness,
            ColorParameter::Contrast => self.contrast,
            ColorParameter::Saturation => self.saturation,
            ColorParameter::Gamma => self.gamma,
            ColorParameter::Hue => self.hue,
            ColorParameter::Alpha => self.alpha,
            ColorParameter::TintR => self.tint_r,
            ColorParameter::TintG => self.tint_g,
            ColorParameter::TintB => self.tint_b,
        }
    }

    /// Overrides that are set, in mask order.
    pub fn overrides(&self) -> impl Iterator<Item = (ColorParameter, f32)> + '_ {
        ColorParameter::ALL
            .into_iter()
            .filter_map(|p| self.get(p).map(|v| (p, v)))
    }
}

/// Range and current value of one colour parameter.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ColorParameterInfo {
    /// Smallest accepted value.
    pub min: f32,
    /// Largest accepted value.
    pub max: f32,
    /// Engine default.
    pub default: f32,
    /// Value in effect.
    pub current: f32,
    /// Whether the override is active.
    pub enabled: bool,
}

/// Reader status as the engine lays it out.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Pod, Zeroable)]
pub struct ReaderStatusInterop {
    /// Last frame read from the container.
    pub last_read_frame: u32,
    /// Reads that produced no frame.
    pub unsuccessful_read_frame_count: u32,
    /// Frames dropped by the decoder.
    pub dropped_frame_count: u32,
    /// Last engine error code, 0 when none.
    pub error_code: u32,
    /// Raw [`ReaderState`] code.
    pub last_known_state: i32,
    /// 1 when the source is a live stream.
    pub is_live_source: u8,
    /// Unused.
    pub reserved: [u8; 3],
}

/// Parsed reader status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReaderStatus {
    /// The source is a live stream.
    pub is_live_source: bool,
    /// Last frame read from the container.
    pub last_read_frame: u32,
    /// Reads that produced no frame.
    pub unsuccessful_read_frame_count: u32,
    /// Frames dropped by the decoder.
    pub dropped_frame_count: u32,
    /// Last engine error code, 0 when none.
    pub error_code: u32,
    /// Reader state. Unknown codes parse to [`ReaderState::Unknown`].
    pub state: ReaderState,
}

impl From<ReaderStatusInterop> for ReaderStatus {
    fn from(raw: ReaderStatusInterop) -> Self {
        Self {
            is_live_source: raw.is_live_source != 0,
            last_read_frame: raw.last_read_frame,
            unsuccessful_read_frame_count: raw.unsuccessful_read_frame_count,
            dropped_frame_count: raw.dropped_frame_count,
            error_code: raw.error_code,
            state: ReaderState::from_code(raw.last_known_state),
        }
    }
}

/// Engine-internal state flags.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InternalState {
    /// Frames are served from the local cache.
    pub cached: bool,
    /// Source is live.
    pub live: bool,
    /// Cache is being flushed to disc.
    pub disc_flushing: bool,
    /// Container reader is running.
    pub reader_active: bool,
}

impl InternalState {
    /// Cached mode bit.
    pub const CACHED: u32 = 0x1;
    /// Live mode bit.
    pub const LIVE: u32 = 0x2;
    /// Disc flushing bit.
    pub const DISC_FLUSHING: u32 = 0x4;
    /// Reader active bit.
    pub const READER_ACTIVE: u32 = 0x8;

    /// Decodes the engine's flag word. Unknown bits are ignored.
    #[must_use]
    pub const fn from_bits(bits: u32) -> Self {
        Self {
            cached: bits & Self::CACHED != 0,
            live: bits & Self::LIVE != 0,
            disc_flushing: bits & Self::DISC_FLUSHING != 0,
            reader_active: bits & Self::READER_ACTIVE != 0,
        }
    }
}

/// Diagnostic switches the engine understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DebugToggle {
    /// Draw the mesh as wireframe.
    Wireframe,
    /// Visualise normals.
    ShowNormals,
    /// Draw the frame bounds.
    ShowBoundingBox,
    /// Show the texture atlas.
    ShowAtlas,
    /// Decode on the GPU.
    UseGpu,
    /// Compute normals in the engine.
    ComputeNormals,
    /// Serve frames from the local cache.
    CachedMode,
}

/// One audio output device.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioDevice {
    /// Display name.
    pub name: String,
    /// Id to put in the open settings.
    pub id: String,
}
