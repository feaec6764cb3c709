//! Shared rig for the controller suites.

use std::sync::Arc;
use std::time::{Duration, Instant};

use glam::Vec3;
use holoplay::{HostServices, PlaybackController, TickReport};
use holoplay_interop::mock::MockEngine;
use holoplay_rendering::mock::{MockGpu, MockHooks};
use holoplay_shared::{Bounds, FileMetadata, FrameMetadata, PlayerConfig, RenderMode};

pub struct Rig {
    pub engine: Arc<MockEngine>,
    pub gpu: Arc<MockGpu>,
    pub hooks: Arc<MockHooks>,
    pub controller: PlaybackController,
}

pub fn rig(config: PlayerConfig) -> Rig {
    rig_with_file(config, clip_file(15_000, 45_000))
}

pub fn rig_with_file(config: PlayerConfig, file: FileMetadata) -> Rig {
    let engine = Arc::new(MockEngine::with_file(file));
    let gpu = Arc::new(MockGpu::default());
    let hooks = Arc::new(MockHooks::default());
    let host = HostServices {
        gpu: gpu.clone(),
        hooks: hooks.clone(),
    };
    let controller = PlaybackController::new(engine.clone(), host, config);
    Rig {
        engine,
        gpu,
        hooks,
        controller,
    }
}

pub fn native_draw() -> PlayerConfig {
    PlayerConfig {
        render_mode: RenderMode::NativeDraw,
        ..PlayerConfig::default()
    }
}

pub fn unit_box() -> Bounds {
    Bounds::new(Vec3::splat(-1.0), Vec3::splat(1.0))
}

/// A 1024x1024 clip with bounds.
pub fn clip_file(max_vertices: u32, max_indices: u32) -> FileMetadata {
    FileMetadata {
        frame_count: 300,
        duration_100ns: 100_000_000,
        max_vertex_count: max_vertices,
        max_index_count: max_indices,
        bounds: unit_box(),
        texture_width: 1024,
        texture_height: 1024,
        ..FileMetadata::default()
    }
}

/// The same clip with no bounds.
pub fn unbounded_file() -> FileMetadata {
    FileMetadata {
        bounds: Bounds::EMPTY,
        ..clip_file(15_000, 45_000)
    }
}

pub fn frame(frame_id: u32) -> FrameMetadata {
    FrameMetadata {
        frame_id,
        vertex_count: 10_000,
        index_count: 30_000,
        texture_width: 1024,
        texture_height: 1024,
        bounds: unit_box(),
        ..FrameMetadata::default()
    }
}

pub fn eos_frame(frame_id: u32) -> FrameMetadata {
    FrameMetadata {
        is_end_of_stream: true,
        ..frame(frame_id)
    }
}

pub fn multi_thread_runtime() -> tokio::runtime::Runtime {
    tokio::runtime::Builder::new_multi_thread()
        .worker_threads(1)
        .build()
        .unwrap()
}

/// Ticks until every background open has been picked up.
pub fn settle(controller: &mut PlaybackController) -> TickReport {
    let deadline = Instant::now() + Duration::from_secs(5);
    let mut total = TickReport::default();
    loop {
        let report = controller.tick();
        total.opens_completed += report.opens_completed;
        total.opens_failed += report.opens_failed;
        total.opens_discarded += report.opens_discarded;
        if controller.pending_opens() == 0 {
            return total;
        }
        assert!(Instant::now() < deadline, "background open never completed");
        std::thread::sleep(Duration::from_millis(2));
    }
}
