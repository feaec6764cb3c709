//! # HOLOPLAY Shared
//!
//! Common types used by the interop layer, the rendering layer and the
//! playback controller.
//!
//! ## CRITICAL RULE
//!
//! This crate must NEVER depend on:
//! - the native engine bindings
//! - host camera or GPU abstractions
//!
//! If you need those, put them in `holoplay_interop` or `holoplay_rendering`.

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod constants;
pub mod math;
pub mod metadata;
pub mod settings;
pub mod state;

pub use constants::{
    DEFAULT_MAX_INDEX_COUNT, DEFAULT_MAX_VERTEX_COUNT, INDEX_QUANTUM, TRIANGLE_STRIDE,
    VERTEX_QUANTUM,
};
pub use math::{Bounds, Vec3Interop};
pub use metadata::{FileMetadata, FrameMetadata};
pub use settings::{
    BuildProfile, MemoryLimits, NativeLogLevel, OpenSettings, Platform, PlayerConfig,
    RenderMode, SettingsError, SettingsResult, TargetDevice,
};
pub use state::{PlaybackState, ReaderState};
