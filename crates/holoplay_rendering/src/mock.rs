//! Host doubles for tests and benches.

use std::collections::HashMap;

use glam::Mat4;
use holoplay_interop::{NativeEngine, NativePtr, RenderToken, TargetEye};
use holoplay_shared::Bounds;
use parking_lot::Mutex;

use crate::host::{CameraKey, GpuAllocator, GpuMesh, GpuTexture, HostCamera, RenderHookHost, TextureFormat};

/// A camera with plain fields.
#[derive(Debug, Clone)]
pub struct MockCamera {
    /// Identity.
    pub key: CameraKey,
    /// Display name.
    pub name: String,
    /// Pixel size.
    pub pixel_size: (u32, u32),
    /// Primary render camera.
    pub primary: bool,
    /// Stereo enabled.
    pub stereo: bool,
    /// Target eye.
    pub target_eye: TargetEye,
    /// World-to-camera matrix.
    pub view: Mat4,
    /// Projection matrix.
    pub projection: Mat4,
}

impl MockCamera {
    /// A 1920x1080 mono tool camera with identity matrices.
    #[must_use]
    pub fn new(key: u64) -> Self {
        Self {
            key: CameraKey(key),
            name: format!("Camera {key}"),
            pixel_size: (1920, 1080),
            primary: false,
            stereo: false,
            target_eye: TargetEye::Left,
            view: Mat4::IDENTITY,
            projection: Mat4::IDENTITY,
        }
    }

    /// A primary game camera.
    #[must_use]
    pub fn primary(key: u64) -> Self {
        Self {
            primary: true,
            ..Self::new(key)
        }
    }

    /// A stereo camera rendering `eye`.
    #[must_use]
    pub fn stereo(key: u64, eye: TargetEye) -> Self {
        Self {
            primary: true,
            stereo: true,
            target_eye: eye,
            ..Self::new(key)
        }
    }
}

impl HostCamera for MockCamera {
    fn key(&self) -> CameraKey {
        self.key
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn pixel_size(&self) -> (u32, u32) {
        self.pixel_size
    }

    fn is_primary(&self) -> bool {
        self.primary
    }

    fn stereo_enabled(&self) -> bool {
        self.stereo
    }

    fn target_eye(&self) -> TargetEye {
        self.target_eye
    }

    fn world_to_camera(&self) -> Mat4 {
        self.view
    }

    fn projection(&self) -> Mat4 {
        self.projection
    }
}

#[derive(Debug, Default)]
struct GpuState {
    next_ptr: u64,
    textures: HashMap<NativePtr, GpuTexture>,
    meshes: HashMap<NativePtr, GpuMesh>,
    mesh_bounds: Option<Bounds>,
    texture_allocations: u32,
    mesh_allocations: u32,
}

impl GpuState {
    fn ptr(&mut self) -> NativePtr {
        self.next_ptr += 1;
        NativePtr(self.next_ptr)
    }
}

/// Allocator that hands out fake pointers and counts live resources.
#[derive(Debug, Default)]
pub struct MockGpu {
    state: Mutex<GpuState>,
}

impl MockGpu {
    /// Textures not yet destroyed.
    #[must_use]
    pub fn live_textures(&self) -> usize {
        self.state.lock().textures.len()
    }

    /// Meshes not yet destroyed.
    #[must_use]
    pub fn live_meshes(&self) -> usize {
        self.state.lock().meshes.len()
    }

    /// Textures created so far.
    #[must_use]
    pub fn texture_allocations(&self) -> u32 {
        self.state.lock().texture_allocations
    }

    /// Meshes created so far.
    #[must_use]
    pub fn mesh_allocations(&self) -> u32 {
        self.state.lock().mesh_allocations
    }

    /// Live meshes not marked dynamic.
    #[must_use]
    pub fn static_meshes(&self) -> usize {
        self.state.lock().meshes.values().filter(|m| !m.dynamic).count()
    }

    /// Bounds last set on any mesh.
    #[must_use]
    pub fn mesh_bounds(&self) -> Option<Bounds> {
        self.state.lock().mesh_bounds
    }
}

impl GpuAllocator for MockGpu {
    fn create_texture(&self, width: u32, height: u32, format: TextureFormat) -> GpuTexture {
        let mut state = self.state.lock();
        let texture = GpuTexture {
            ptr: state.ptr(),
            width,
            height,
            format,
        };
        state.textures.insert(texture.ptr, texture);
        state.texture_allocations += 1;
        texture
    }

    fn destroy_texture(&self, texture: GpuTexture) {
        self.state.lock().textures.remove(&texture.ptr);
    }

    fn create_mesh(&self, vertex_capacity: u32, index_capacity: u32) -> GpuMesh {
        let mut state = self.state.lock();
        let mesh = GpuMesh {
            vertex_buffer: state.ptr(),
            index_buffer: state.ptr(),
            vertex_capacity,
            index_capacity,
            dynamic: false,
        };
        state.meshes.insert(mesh.vertex_buffer, mesh);
        state.mesh_allocations += 1;
        mesh
    }

    fn mark_dynamic(&self, mesh: &mut GpuMesh) {
        mesh.dynamic = true;
        if let Some(live) = self.state.lock().meshes.get_mut(&mesh.vertex_buffer) {
            live.dynamic = true;
        }
    }

    fn destroy_mesh(&self, mesh: GpuMesh) {
        self.state.lock().meshes.remove(&mesh.vertex_buffer);
    }

    fn set_mesh_bounds(&self, _mesh: &GpuMesh, bounds: Bounds) {
        self.state.lock().mesh_bounds = Some(bounds);
    }
}

/// Hook host that remembers attached tokens and can fire them.
#[derive(Debug, Default)]
pub struct MockHooks {
    hooks: Mutex<HashMap<CameraKey, RenderToken>>,
}

impl MockHooks {
    /// Number of cameras with a hook.
    #[must_use]
    pub fn attached_count(&self) -> usize {
        self.hooks.lock().len()
    }

    /// Token attached to `camera`.
    #[must_use]
    pub fn token(&self, camera: CameraKey) -> Option<RenderToken> {
        self.hooks.lock().get(&camera).copied()
    }

    /// Runs `camera`'s hook the way the host would during its render pass.
    pub fn fire(&self, camera: CameraKey, engine: &dyn NativeEngine) -> bool {
        match self.token(camera) {
            Some(token) => {
                engine.issue_render_event(token);
                true
            }
            None => false,
        }
    }
}

impl RenderHookHost for MockHooks {
    fn attach(&self, camera: CameraKey, token: RenderToken) {
        self.hooks.lock().insert(camera, token);
    }

    fn detach(&self, camera: CameraKey) {
        self.hooks.lock().remove(&camera);
    }

    fn is_attached(&self, camera: CameraKey) -> bool {
        self.hooks.lock().contains_key(&camera)
    }
}
