//! # Per-Frame Tests
//!
//! Host buffers, bounds, end-of-stream and the display pause, driven through
//! `tick` with scripted frames.
//!
//! Run with: cargo test -p holoplay --test frame_sync

mod common;

use common::{clip_file, eos_frame, frame, native_draw, rig, rig_with_file, unbounded_file, unit_box};
use glam::{Mat4, Vec3};
use holoplay::{AudioListener, PlaybackEvent, TickSkip};
use holoplay_interop::mock::EngineCall;
use holoplay_rendering::BufferCapacity;
use holoplay_shared::{Bounds, NativeLogLevel, PlaybackState, PlayerConfig, Vec3Interop};

// ============================================================================
// HOST BUFFERS
// ============================================================================

#[test]
fn seeded_capacity_absorbs_smaller_frames() {
    let mut rig = rig_with_file(PlayerConfig::default(), clip_file(20_000, 60_000));
    rig.controller.open("clip.mp4").unwrap();

    assert_eq!(rig.gpu.mesh_allocations(), 1);
    assert_eq!(
        rig.controller.buffers().capacity(),
        Some(BufferCapacity {
            vertices: 20_000,
            indices: 60_000
        })
    );
    let published = rig.engine.published_buffers().unwrap();
    assert_eq!((published.vertex_count, published.index_count), (20_000, 60_000));

    let mut next = frame(0);
    next.vertex_count = 18_000;
    next.index_count = 54_000;
    rig.engine.push_frame(next);
    let report = rig.controller.tick();

    assert!(report.ran());
    assert!(!report.buffers_reallocated);
    assert!(!report.buffers_published);
    assert_eq!(rig.gpu.mesh_allocations(), 1);
    assert_eq!(rig.gpu.texture_allocations(), 1);
}

#[test]
fn larger_frame_grows_buffers_after_release() {
    let mut rig = rig(PlayerConfig::default());
    rig.controller.open("clip.mp4").unwrap();
    rig.engine.clear_calls();

    let mut big = frame(0);
    big.vertex_count = 21_000;
    rig.engine.push_frame(big);
    let report = rig.controller.tick();

    assert!(report.buffers_reallocated);
    assert!(report.buffers_published);
    assert_eq!(rig.controller.buffers().capacity().unwrap().vertices, 25_000);
    assert_eq!(rig.gpu.live_meshes(), 1);

    let calls = rig.engine.calls();
    let release = calls
        .iter()
        .position(|c| matches!(c, EngineCall::ReleaseBuffers(_)))
        .unwrap();
    let publish = calls
        .iter()
        .position(|c| matches!(c, EngineCall::SetBuffers(..)))
        .unwrap();
    assert!(release < publish);
}

#[test]
fn lost_buffers_are_republished_without_reallocation() {
    let mut rig = rig(PlayerConfig::default());
    rig.controller.open("clip.mp4").unwrap();
    rig.engine.push_frame(frame(0));
    rig.controller.tick();

    rig.engine.invalidate_buffers();
    let report = rig.controller.tick();

    assert!(!report.buffers_reallocated);
    assert!(report.buffers_published);
    assert_eq!(rig.engine.published_buffers(), rig.controller.buffers().published());
}

#[test]
fn end_of_frame_requests_fill_only_in_host_draw() {
    let mut host = rig(PlayerConfig::default());
    host.controller.open("clip.mp4").unwrap();
    host.controller.end_of_frame();
    assert_eq!(
        host.engine.count(|c| matches!(c, EngineCall::BufferFill(_))),
        1
    );

    let mut native = rig(native_draw());
    native.controller.open("clip.mp4").unwrap();
    native.controller.end_of_frame();
    assert_eq!(
        native.engine.count(|c| matches!(c, EngineCall::BufferFill(_))),
        0
    );
    assert_eq!(native.gpu.mesh_allocations(), 0);
}

#[test]
fn missing_frame_skips_tick() {
    let mut rig = rig(PlayerConfig::default());
    rig.controller.open("clip.mp4").unwrap();
    let rx = rig.controller.subscribe(4);

    let report = rig.controller.tick();
    assert_eq!(report.skipped, Some(TickSkip::NoFrame));
    assert!(rx.drain().is_empty());
}

// ============================================================================
// END OF STREAM
// ============================================================================

#[test]
fn end_of_stream_fires_once_per_run() {
    let mut rig = rig(PlayerConfig::default());
    rig.controller.open("clip.mp4").unwrap();
    rig.controller.play().unwrap();
    let rx = rig.controller.subscribe(64);

    rig.engine
        .push_frames([frame(298), eos_frame(299), eos_frame(299), eos_frame(299)]);
    let eos_ticks: Vec<bool> = (0..4).map(|_| rig.controller.tick().end_of_stream).collect();
    assert_eq!(eos_ticks, vec![false, true, false, false]);

    rig.controller.rewind().unwrap();
    rig.engine.push_frames([frame(0), frame(1), eos_frame(299)]);
    for _ in 0..3 {
        rig.controller.tick();
    }

    let eos_events = rx
        .drain()
        .into_iter()
        .filter(|e| *e == PlaybackEvent::EndOfStream)
        .count();
    assert_eq!(eos_events, 2);
}

#[test]
fn rewind_rearms_end_of_stream_without_intervening_frame() {
    let mut rig = rig(PlayerConfig::default());
    rig.controller.open("clip.mp4").unwrap();
    rig.controller.play().unwrap();

    rig.engine.push_frame(eos_frame(0));
    assert!(rig.controller.tick().end_of_stream);
    assert!(!rig.controller.tick().end_of_stream);

    rig.controller.rewind().unwrap();
    assert!(rig.controller.tick().end_of_stream);

    rig.controller.seek_to_frame(0).unwrap();
    assert!(rig.controller.tick().end_of_stream);

    rig.controller.stop().unwrap();
    assert!(rig.controller.tick().end_of_stream);
}

#[test]
fn frame_update_precedes_end_of_stream() {
    let mut rig = rig(PlayerConfig::default());
    rig.controller.open("clip.mp4").unwrap();
    let rx = rig.controller.subscribe(8);

    rig.engine.push_frame(eos_frame(299));
    rig.controller.tick();

    let events = rx.drain();
    assert_eq!(events.len(), 2);
    assert!(matches!(events[0], PlaybackEvent::FrameUpdated(f) if f.frame_id == 299));
    assert_eq!(events[1], PlaybackEvent::EndOfStream);
}

// ============================================================================
// BOUNDS
// ============================================================================

#[test]
fn unbounded_source_sizes_world_bounds_from_first_frame() {
    let mut rig = rig_with_file(PlayerConfig::default(), unbounded_file());
    rig.controller
        .set_world_transform(Mat4::from_translation(Vec3::new(10.0, 0.0, 0.0)));
    rig.controller.open("clip.mp4").unwrap();

    rig.engine.push_frame(frame(0));
    let report = rig.controller.tick();
    assert!(report.world_bounds_seeded);
    let seeded = rig.controller.maximal_world_bounds();
    assert!(seeded.min.abs_diff_eq(Vec3::new(9.0, -1.0, -1.0), 1e-5));
    assert!(seeded.max.abs_diff_eq(Vec3::new(11.0, 1.0, 1.0), 1e-5));

    let mut later = frame(1);
    later.bounds = Bounds::new(Vec3::splat(-3.0), Vec3::splat(3.0));
    rig.engine.push_frame(later);
    let report = rig.controller.tick();
    assert!(report.bounds_updated);
    assert!(!report.world_bounds_seeded);
    assert_eq!(rig.controller.bounding_box(), later.bounds);
    assert_eq!(rig.controller.maximal_world_bounds(), seeded);
}

#[test]
fn world_bounds_not_seeded_past_frame_one() {
    let mut rig = rig_with_file(PlayerConfig::default(), unbounded_file());
    rig.controller.open("clip.mp4").unwrap();
    let fallback_world = rig.controller.maximal_world_bounds();

    rig.engine.push_frame(frame(2));
    let report = rig.controller.tick();

    assert!(report.bounds_updated);
    assert!(!report.world_bounds_seeded);
    assert_eq!(rig.controller.bounding_box(), unit_box());
    assert_eq!(rig.controller.maximal_world_bounds(), fallback_world);
}

#[test]
fn bounded_source_never_reseeds_world_bounds() {
    let mut rig = rig(PlayerConfig::default());
    rig.controller.open("clip.mp4").unwrap();
    let opened_world = rig.controller.maximal_world_bounds();

    let mut f = frame(0);
    f.bounds = Bounds::new(Vec3::splat(-2.0), Vec3::splat(2.0));
    rig.engine.push_frame(f);
    let report = rig.controller.tick();

    assert!(report.bounds_updated);
    assert!(!report.world_bounds_seeded);
    assert_eq!(rig.controller.maximal_world_bounds(), opened_world);
    assert_eq!(rig.gpu.mesh_bounds(), Some(f.bounds));
}

#[test]
fn degenerate_frame_bounds_are_ignored() {
    let mut rig = rig(PlayerConfig::default());
    rig.controller.open("clip.mp4").unwrap();

    let mut f = frame(0);
    f.bounds = Bounds::EMPTY;
    rig.engine.push_frame(f);
    let report = rig.controller.tick();

    assert!(!report.bounds_updated);
    assert_eq!(rig.controller.bounding_box(), unit_box());
}

#[test]
fn native_draw_mirrors_frame_bounds_when_flipping() {
    let mut rig = rig(native_draw());
    rig.controller.open("clip.mp4").unwrap();

    let mut f = frame(0);
    f.bounds = Bounds::new(Vec3::new(0.5, 0.0, 0.0), Vec3::new(2.0, 1.0, 1.0));
    rig.engine.push_frame(f);
    rig.controller.tick();

    let local = rig.controller.bounding_box();
    assert_eq!(local, f.bounds.mirrored_x());
    assert!((local.min.x + 2.0).abs() < f32::EPSILON);
}

// ============================================================================
// PLAYBACK CONTROL
// ============================================================================

#[test]
fn display_frame_pauses_on_target() {
    let mut rig = rig(PlayerConfig::default());
    rig.controller.open("clip.mp4").unwrap();
    rig.engine.clear_calls();

    rig.controller.display_frame(3).unwrap();
    assert!(matches!(
        rig.engine.calls().as_slice(),
        [EngineCall::Rewind(_), EngineCall::Play(_)]
    ));
    assert_eq!(rig.controller.current_state(), PlaybackState::Playing);

    rig.engine.push_frames((0..6).map(frame));
    let mut paused_at = None;
    for _ in 0..6 {
        let report = rig.controller.tick();
        if report.paused_on_frame {
            assert!(paused_at.is_none(), "display pause fired twice");
            paused_at = report.frame_id;
        }
    }
    assert_eq!(paused_at, Some(3));
    assert_eq!(rig.controller.current_state(), PlaybackState::Paused);
}

#[test]
fn display_default_frame_uses_configured_frame() {
    let config = PlayerConfig {
        pause_frame_id: 2,
        ..PlayerConfig::default()
    };
    let mut rig = rig(config);
    rig.controller.open("clip.mp4").unwrap();

    rig.controller.display_default_frame().unwrap();
    rig.engine.push_frames((0..4).map(frame));
    let paused: Vec<Option<u32>> = (0..4)
        .map(|_| rig.controller.tick())
        .filter(|r| r.paused_on_frame)
        .map(|r| r.frame_id)
        .collect();

    assert_eq!(paused, vec![Some(2)]);
    assert_eq!(rig.controller.current_state(), PlaybackState::Paused);
}

#[test]
fn failed_display_frame_leaves_no_pause_armed() {
    let mut rig = rig(PlayerConfig::default());
    rig.controller.initialize().unwrap();

    // Nothing open, so the engine refuses the rewind.
    assert!(rig.controller.display_frame(1).is_err());
    assert!(!rig.controller.is_visible());

    rig.controller.open("clip.mp4").unwrap();
    rig.controller.play().unwrap();
    rig.engine.push_frames((0..4).map(frame));
    for _ in 0..4 {
        assert!(!rig.controller.tick().paused_on_frame);
    }
    assert_eq!(rig.controller.current_state(), PlaybackState::Playing);
}

struct OffsetListener(Mat4);

impl AudioListener for OffsetListener {
    fn world_to_listener(&self) -> Mat4 {
        self.0
    }
}

#[test]
fn audio_position_follows_listener_while_playing() {
    let mut rig = rig(PlayerConfig::default());
    rig.controller
        .set_world_transform(Mat4::from_translation(Vec3::new(3.0, 0.0, 0.0)));
    rig.controller.set_audio_source_offset(Vec3::new(0.0, 1.0, 0.0));
    rig.controller
        .set_audio_listener(Some(Box::new(OffsetListener(Mat4::from_translation(
            Vec3::new(-1.0, 0.0, 0.0),
        )))));
    rig.controller.open("clip.mp4").unwrap();
    rig.engine.push_frame(frame(0));

    // Paused: nothing sent.
    rig.controller.tick();
    assert_eq!(
        rig.engine.count(|c| matches!(c, EngineCall::AudioPosition(..))),
        0
    );

    rig.controller.play().unwrap();
    rig.controller.tick();
    let positions: Vec<Vec3Interop> = rig
        .engine
        .calls()
        .into_iter()
        .filter_map(|c| match c {
            EngineCall::AudioPosition(_, p) => Some(p),
            _ => None,
        })
        .collect();
    assert_eq!(positions, vec![Vec3Interop { x: 2.0, y: 1.0, z: 0.0 }]);
}

#[test]
fn native_trace_is_forwarded_when_enabled() {
    let mut rig = rig(PlayerConfig::default());
    rig.controller.initialize().unwrap();
    rig.engine.push_trace_line("decoder started");
    assert_eq!(rig.controller.tick().trace_lines, 0);

    rig.controller.enable_native_tracing(NativeLogLevel::Debug);
    rig.engine.push_trace_line("frame 1 decoded");
    assert_eq!(rig.controller.tick().trace_lines, 2);
    assert_eq!(rig.engine.tracing_level(), Some(NativeLogLevel::Debug.code()));

    rig.controller.enable_native_tracing(NativeLogLevel::None);
    assert_eq!(rig.engine.tracing_level(), None);
}
