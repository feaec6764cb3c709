//! Playback constants shared by every layer.

/// Vertex capacity is rounded up to a multiple of this.
///
/// Large enough that frame-to-frame count jitter never crosses a boundary.
pub const VERTEX_QUANTUM: u32 = 5_000;

/// Index capacity is rounded up to a multiple of this before the triangle rule.
pub const INDEX_QUANTUM: u32 = 5_000;

/// Index capacity must also be a multiple of this so triangle lists stay valid.
pub const TRIANGLE_STRIDE: u32 = 3;

/// Vertex count assumed when the file does not report one.
pub const DEFAULT_MAX_VERTEX_COUNT: u32 = 15_000;

/// Index count assumed when the file does not report one.
pub const DEFAULT_MAX_INDEX_COUNT: u32 = 45_000;

/// Lower corner of the fallback bounding box, divided by the object scale.
pub const FALLBACK_BOUNDS_MIN: f32 = 0.5;

/// Upper corner of the fallback bounding box, divided by the object scale.
pub const FALLBACK_BOUNDS_MAX: f32 = 1.1;

/// Name the host gives to its authoring preview camera.
pub const PREVIEW_CAMERA_NAME: &str = "Preview Camera";

/// Maximum audio devices returned by one enumeration.
pub const MAX_AUDIO_DEVICES: usize = 10;

/// Default frame the one-shot pause trigger stops on.
pub const DEFAULT_PAUSE_FRAME_ID: u32 = 1;

/// Default texture load timeout forwarded to the engine (milliseconds).
pub const DEFAULT_TEXTURE_LOAD_TIMEOUT_MS: u32 = 50;
