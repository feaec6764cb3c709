//! # HOLOPLAY Interop
//!
//! The boundary to the native volumetric decode/render engine.
//!
//! ## Architecture
//!
//! ```text
//! Controller ──owns──► SessionHandle ──Arc<dyn NativeEngine>──► engine
//!                           │
//!                           └── #[repr(C)] records: CameraViewInterop,
//!                               PublishedBuffers, SessionHints
//! ```
//!
//! - A session is a single integer identity, `-1` when absent
//! - Every call through a dead handle fails without touching the engine
//! - Engine state codes are parsed, unknown codes are `Broken`

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod engine;
pub mod error;
pub mod mock;
pub mod records;
pub mod session;

pub use engine::NativeEngine;
pub use error::{NativeError, NativeResult};
pub use records::{
    AudioDevice, CameraViewInterop, ColorCorrection, ColorParameter, ColorParameterInfo,
    DebugToggle, InternalState, NativePtr, PublishedBuffers, ReaderStatus, ReaderStatusInterop,
    RenderToken, SessionHints, SessionId, TargetEye,
};
pub use session::{audio_devices, drain_trace_lines, SessionHandle};
