//! Frame buffer synchronizer.
//!
//! Owns the host texture and mesh the engine fills in host-draw mode. Buffers
//! only grow: a frame that needs less than what is allocated reuses it.

use holoplay_interop::{NativePtr, PublishedBuffers, SessionHandle};
use holoplay_shared::FrameMetadata;

use super::capacity::BufferCapacity;
use crate::host::{GpuAllocator, GpuMesh, GpuTexture, TextureFormat};

/// Counters for one synchronizer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SyncStats {
    /// Texture allocations.
    pub texture_allocations: u32,
    /// Mesh allocations.
    pub mesh_allocations: u32,
    /// Times buffers were handed to the engine.
    pub publishes: u32,
}

/// Mirrors the latest decoded frame in host GPU buffers.
#[derive(Debug)]
pub struct FrameBufferSync {
    format: TextureFormat,
    texture: Option<GpuTexture>,
    mesh: Option<GpuMesh>,
    stats: SyncStats,
}

impl FrameBufferSync {
    /// Creates a synchronizer that allocates textures in `format`.
    #[must_use]
    pub const fn new(format: TextureFormat) -> Self {
        Self {
            format,
            texture: None,
            mesh: None,
            stats: SyncStats {
                texture_allocations: 0,
                mesh_allocations: 0,
                publishes: 0,
            },
        }
    }

    /// Brings the buffers up to what `frame` needs.
    ///
    /// The texture is replaced when missing or a different size. The mesh is
    /// replaced when it is too small for the rounded demand or on
    /// `force_rebuild`; the engine lets go of the old buffers first. New
    /// meshes are always marked dynamic.
    ///
    /// Returns true when anything was reallocated and must be republished.
    pub fn sync(
        &mut self,
        frame: &FrameMetadata,
        force_rebuild: bool,
        gpu: &dyn GpuAllocator,
        session: &SessionHandle,
    ) -> bool {
        let mut reallocated = false;

        let (w, h) = (frame.texture_width, frame.texture_height);
        let texture_stale = self
            .texture
            .map_or(true, |t| t.width != w || t.height != h);
        if texture_stale && w > 0 && h > 0 {
            if let Some(old) = self.texture.take() {
                gpu.destroy_texture(old);
            }
            self.texture = Some(gpu.create_texture(w, h, self.format));
            self.stats.texture_allocations += 1;
            tracing::info!(width = w, height = h, "frame texture allocated");
            reallocated = true;
        }

        let demand = BufferCapacity::for_frame(frame);
        let fits = self.capacity().is_some_and(|cap| cap.covers(&demand));
        if force_rebuild || !fits {
            session.release_buffers();
            if let Some(old) = self.mesh.take() {
                gpu.destroy_mesh(old);
            }
            let mut mesh = gpu.create_mesh(demand.vertices, demand.indices);
            gpu.mark_dynamic(&mut mesh);
            debug_assert!(mesh.dynamic, "frame mesh must be marked dynamic");
            self.mesh = Some(mesh);
            self.stats.mesh_allocations += 1;
            tracing::info!(
                vertices = mesh.vertex_capacity,
                indices = mesh.index_capacity,
                forced = force_rebuild,
                "frame mesh allocated"
            );
            reallocated = true;
        }

        reallocated
    }

    /// Hands the buffers to the engine when they changed or the engine lost them.
    ///
    /// Returns true when a publish happened.
    pub fn publish(&mut self, session: &SessionHandle, reallocated: bool) -> bool {
        let Some(buffers) = self.published() else {
            return false;
        };
        if !reallocated {
            if session.buffers_valid() {
                return false;
            }
            tracing::warn!("engine reports published buffers invalid, republishing");
        }
        let ok = session.set_buffers(&buffers);
        if ok {
            self.stats.publishes += 1;
        }
        ok
    }

    /// Destroys the texture only.
    pub fn release_texture(&mut self, gpu: &dyn GpuAllocator) {
        if let Some(texture) = self.texture.take() {
            gpu.destroy_texture(texture);
        }
    }

    /// Destroys every buffer.
    pub fn release(&mut self, gpu: &dyn GpuAllocator) {
        if let Some(mesh) = self.mesh.take() {
            gpu.destroy_mesh(mesh);
        }
        self.release_texture(gpu);
    }

    /// Record the engine receives, if a mesh exists.
    #[must_use]
    pub fn published(&self) -> Option<PublishedBuffers> {
        let mesh = self.mesh?;
        let (texture, texture_width, texture_height) = self
            .texture
            .map_or((NativePtr::NULL, 0, 0), |t| (t.ptr, t.width, t.height));
        Some(PublishedBuffers {
            texture,
            texture_width,
            texture_height,
            vertex_buffer: mesh.vertex_buffer,
            index_buffer: mesh.index_buffer,
            vertex_count: mesh.vertex_capacity,
            index_count: mesh.index_capacity,
        })
    }

    /// Allocated mesh capacity.
    #[must_use]
    pub fn capacity(&self) -> Option<BufferCapacity> {
        self.mesh.map(|m| BufferCapacity {
            vertices: m.vertex_capacity,
            indices: m.index_capacity,
        })
    }

    /// Current texture.
    #[must_use]
    pub fn texture(&self) -> Option<&GpuTexture> {
        self.texture.as_ref()
    }

    /// Current mesh.
    #[must_use]
    pub fn mesh(&self) -> Option<&GpuMesh> {
        self.mesh.as_ref()
    }

    /// Allocation and publish counters.
    #[must_use]
    pub fn stats(&self) -> SyncStats {
        self.stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::MockGpu;
    use holoplay_interop::mock::{EngineCall, MockEngine};
    use holoplay_interop::SessionHints;
    use std::sync::Arc;

    fn frame(vertices: u32, indices: u32) -> FrameMetadata {
        FrameMetadata {
            vertex_count: vertices,
            index_count: indices,
            texture_width: 1024,
            texture_height: 1024,
            ..FrameMetadata::default()
        }
    }

    fn session() -> (Arc<MockEngine>, SessionHandle) {
        let engine = Arc::new(MockEngine::new());
        let handle = SessionHandle::create(engine.clone(), &SessionHints::default()).unwrap();
        (engine, handle)
    }

    #[test]
    fn test_capacity_never_shrinks() {
        let (_engine, session) = session();
        let gpu = MockGpu::default();
        let mut sync = FrameBufferSync::new(TextureFormat::Bgra32);

        assert!(sync.sync(&frame(12_000, 30_000), false, &gpu, &session));
        let first = sync.capacity().unwrap();
        assert_eq!(first, BufferCapacity { vertices: 15_000, indices: 30_000 });

        for (v, i) in [(12_000, 30_000), (9_000, 20_000), (15_000, 30_000)] {
            assert!(!sync.sync(&frame(v, i), false, &gpu, &session));
            assert_eq!(sync.capacity(), Some(first));
        }

        assert!(sync.sync(&frame(15_001, 30_000), false, &gpu, &session));
        assert_eq!(sync.capacity().unwrap().vertices, 20_000);
        assert_eq!(sync.stats().mesh_allocations, 2);
        assert_eq!(gpu.live_meshes(), 1);
    }

    #[test]
    fn test_force_rebuild_releases_engine_buffers_first() {
        let (engine, session) = session();
        let gpu = MockGpu::default();
        let mut sync = FrameBufferSync::new(TextureFormat::Bgra32);
        let f = frame(5_000, 5_000);

        let changed = sync.sync(&f, false, &gpu, &session);
        assert!(sync.publish(&session, changed));
        engine.clear_calls();

        assert!(sync.sync(&f, true, &gpu, &session));
        assert_eq!(
            engine.calls(),
            vec![EngineCall::ReleaseBuffers(session.id())]
        );
        assert_eq!(sync.stats().mesh_allocations, 2);
        assert_eq!(sync.stats().texture_allocations, 1);
    }

    #[test]
    fn test_texture_reallocated_on_size_change_only() {
        let (_engine, session) = session();
        let gpu = MockGpu::default();
        let mut sync = FrameBufferSync::new(TextureFormat::Rgba32);

        sync.sync(&frame(1, 1), false, &gpu, &session);
        sync.sync(&frame(1, 1), false, &gpu, &session);
        assert_eq!(sync.stats().texture_allocations, 1);

        let mut bigger = frame(1, 1);
        bigger.texture_width = 2048;
        assert!(sync.sync(&bigger, false, &gpu, &session));
        assert_eq!(sync.stats().texture_allocations, 2);
        assert_eq!(gpu.live_textures(), 1);
        assert_eq!(sync.texture().map(|t| t.format), Some(TextureFormat::Rgba32));
    }

    #[test]
    fn test_steady_state_publishes_nothing() {
        let (engine, session) = session();
        let gpu = MockGpu::default();
        let mut sync = FrameBufferSync::new(TextureFormat::Bgra32);

        let changed = sync.sync(&frame(100, 300), false, &gpu, &session);
        assert!(sync.publish(&session, changed));

        let changed = sync.sync(&frame(100, 300), false, &gpu, &session);
        assert!(!sync.publish(&session, changed));
        assert_eq!(sync.stats().publishes, 1);

        engine.invalidate_buffers();
        let changed = sync.sync(&frame(100, 300), false, &gpu, &session);
        assert!(!changed);
        assert!(sync.publish(&session, changed));
        assert_eq!(sync.stats().publishes, 2);
        assert_eq!(engine.published_buffers(), sync.published());
    }

    #[test]
    fn test_every_allocated_mesh_is_dynamic() {
        let (_engine, session) = session();
        let gpu = MockGpu::default();
        let mut sync = FrameBufferSync::new(TextureFormat::Bgra32);

        for (v, i, force) in [(10, 30, false), (6_000, 30, false), (6_000, 30, true)] {
            assert!(sync.sync(&frame(v, i), force, &gpu, &session));
            assert!(sync.mesh().is_some_and(|m| m.dynamic));
            assert_eq!(gpu.static_meshes(), 0);
        }
        assert_eq!(sync.stats().mesh_allocations, 3);
    }

    #[test]
    fn test_release_texture_keeps_mesh() {
        let (_engine, session) = session();
        let gpu = MockGpu::default();
        let mut sync = FrameBufferSync::new(TextureFormat::Bgra32);
        sync.sync(&frame(10, 30), false, &gpu, &session);

        sync.release_texture(&gpu);
        assert!(sync.texture().is_none());
        assert!(sync.mesh().is_some());
        assert_eq!(sync.published().map(|b| b.texture), Some(NativePtr::NULL));

        assert!(sync.sync(&frame(10, 30), false, &gpu, &session));
        assert_eq!(sync.stats().texture_allocations, 2);

        sync.release(&gpu);
        assert_eq!(gpu.live_textures(), 0);
        assert_eq!(gpu.live_meshes(), 0);
        assert!(sync.published().is_none());
    }
}
