//! # Steady-State Tick Benchmark
//!
//! REQUIREMENTS:
//! - A tick with no buffer growth allocates no GPU resources
//! - Tick + camera refresh well under 0.1ms against the scripted engine
//!
//! Run with: `cargo bench --package holoplay`

// Benchmarks don't need strict docs
#![allow(missing_docs)]

use std::sync::Arc;

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use glam::Vec3;

use holoplay::{HostServices, PlaybackController};
use holoplay_interop::mock::MockEngine;
use holoplay_rendering::mock::{MockCamera, MockGpu, MockHooks};
use holoplay_shared::{Bounds, FileMetadata, FrameMetadata, PlayerConfig, RenderMode};

type Rig = (Arc<MockEngine>, Arc<MockGpu>, PlaybackController);

fn opened_controller(render_mode: RenderMode) -> Rig {
    let file = FileMetadata {
        frame_count: 1_000,
        max_vertex_count: 40_000,
        max_index_count: 120_000,
        bounds: Bounds::new(Vec3::splat(-1.0), Vec3::splat(1.0)),
        texture_width: 2048,
        texture_height: 2048,
        ..FileMetadata::default()
    };
    let engine = Arc::new(MockEngine::with_file(file));
    let gpu = Arc::new(MockGpu::default());
    let host = HostServices {
        gpu: gpu.clone(),
        hooks: Arc::new(MockHooks::default()),
    };
    let config = PlayerConfig {
        render_mode,
        ..PlayerConfig::default()
    };
    let mut controller = PlaybackController::new(engine.clone(), host, config);
    if let Err(e) = controller.open("bench.mp4") {
        panic!("open failed: {e}");
    }

    // The engine repeats the last frame once the script runs dry.
    engine.push_frame(FrameMetadata {
        frame_id: 10,
        vertex_count: 35_000,
        index_count: 100_000,
        texture_width: 2048,
        texture_height: 2048,
        bounds: file.bounds,
        ..FrameMetadata::default()
    });
    controller.tick();
    (engine, gpu, controller)
}

/// Benchmark: host-draw tick with buffers already large enough.
fn bench_host_draw_tick(c: &mut Criterion) {
    let (_engine, gpu, mut controller) = opened_controller(RenderMode::HostDraw);
    let meshes_before = gpu.mesh_allocations();

    c.bench_function("tick_host_draw_steady", |b| {
        b.iter(|| black_box(controller.tick()));
    });

    assert_eq!(gpu.mesh_allocations(), meshes_before, "steady tick reallocated");
}

/// Benchmark: native-draw tick plus one camera render cycle.
fn bench_native_draw_frame(c: &mut Criterion) {
    let (engine, _gpu, mut controller) = opened_controller(RenderMode::NativeDraw);
    let camera = MockCamera::primary(1);

    c.bench_function("frame_native_draw_one_camera", |b| {
        b.iter(|| {
            // The mock records every camera push.
            engine.clear_calls();
            let report = controller.tick();
            let _ = controller.will_render_object(&camera);
            let _ = controller.render_object(&camera);
            black_box(report)
        });
    });
}

criterion_group!(benches, bench_host_draw_tick, bench_native_draw_frame);
criterion_main!(benches);
