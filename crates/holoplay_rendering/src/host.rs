//! Host engine seams: cameras, render hooks and GPU allocation.
//!
//! The host's scene graph stays on its side of these traits. Allocators and
//! hook hosts are shared (`Arc`) between the controller and the host, so they
//! take `&self` and synchronise internally.

use glam::Mat4;
use holoplay_interop::{NativePtr, RenderToken, TargetEye};
use holoplay_shared::constants::PREVIEW_CAMERA_NAME;
use holoplay_shared::{Bounds, Platform};

/// Stable identity of one host camera.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CameraKey(pub u64);

/// A camera as the host sees it this frame.
pub trait HostCamera {
    /// Stable identity.
    fn key(&self) -> CameraKey;

    /// Display name.
    fn name(&self) -> &str;

    /// Render target size in pixels.
    fn pixel_size(&self) -> (u32, u32);

    /// Whether this is a primary (game) render camera rather than a tool camera.
    fn is_primary(&self) -> bool;

    /// Whether the camera renders stereo.
    fn stereo_enabled(&self) -> bool;

    /// Eye(s) the camera renders for.
    fn target_eye(&self) -> TargetEye;

    /// World-to-camera (view) matrix.
    fn world_to_camera(&self) -> Mat4;

    /// Projection matrix in the host's convention.
    fn projection(&self) -> Mat4;

    /// Projection matrix adjusted for the graphics API in use.
    fn gpu_projection(&self) -> Mat4 {
        self.projection()
    }

    /// Whether this is the authoring tool's preview camera.
    fn is_preview(&self) -> bool {
        self.name() == PREVIEW_CAMERA_NAME
    }
}

/// Per-camera render hooks the native engine draws through.
pub trait RenderHookHost {
    /// Attaches a hook that issues `token` when `camera` renders. Replaces any existing hook.
    fn attach(&self, camera: CameraKey, token: RenderToken);

    /// Removes every hook from `camera`.
    fn detach(&self, camera: CameraKey);

    /// Whether `camera` has a hook.
    fn is_attached(&self, camera: CameraKey) -> bool;
}

/// Pixel layout of the frame texture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextureFormat {
    /// 8-bit BGRA.
    Bgra32,
    /// 8-bit RGBA.
    Rgba32,
}

impl TextureFormat {
    /// Layout the engine writes on `platform`.
    #[must_use]
    pub const fn for_platform(platform: Platform) -> Self {
        match platform {
            Platform::Android => Self::Rgba32,
            Platform::Desktop => Self::Bgra32,
        }
    }
}

/// Texture owned by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GpuTexture {
    /// Native pointer handed to the engine.
    pub ptr: NativePtr,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Pixel layout.
    pub format: TextureFormat,
}

/// Vertex/index buffer pair owned by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GpuMesh {
    /// Native vertex buffer pointer.
    pub vertex_buffer: NativePtr,
    /// Native index buffer pointer.
    pub index_buffer: NativePtr,
    /// Vertex capacity.
    pub vertex_capacity: u32,
    /// Index capacity.
    pub index_capacity: u32,
    /// Marked for frequent updates.
    pub dynamic: bool,
}

/// Host GPU resource allocation.
pub trait GpuAllocator {
    /// Creates a texture.
    fn create_texture(&self, width: u32, height: u32, format: TextureFormat) -> GpuTexture;

    /// Destroys a texture.
    fn destroy_texture(&self, texture: GpuTexture);

    /// Creates a mesh with room for the given counts.
    fn create_mesh(&self, vertex_capacity: u32, index_capacity: u32) -> GpuMesh;

    /// Marks a mesh as rewritten every frame.
    fn mark_dynamic(&self, mesh: &mut GpuMesh);

    /// Destroys a mesh.
    fn destroy_mesh(&self, mesh: GpuMesh);

    /// Sets the culling bounds of a mesh.
    fn set_mesh_bounds(&self, mesh: &GpuMesh, bounds: Bounds);
}
