//! # HOLOPLAY Rendering
//!
//! Per-frame work inside the host's render callback.
//!
//! ## Components
//!
//! - **Camera views**: one [`CameraView`] per rendering camera, with
//!   device-specific handedness resolved once and the MVP refreshed per frame
//! - **Frame buffers**: [`FrameBufferSync`] grows the texture/mesh the engine
//!   fills and republishes them only when they change
//!
//! ## Host seams
//!
//! [`HostCamera`], [`RenderHookHost`] and [`GpuAllocator`] are all the host has
//! to provide. The `mock` module has doubles for each.

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod buffers;
pub mod camera;
pub mod error;
pub mod host;
pub mod mock;

pub use buffers::{roundup, BufferCapacity, FrameBufferSync, SyncStats};
pub use camera::{device_family, resolve_device, CameraRegistry, CameraView, DeviceFamily, Handedness};
pub use error::{CameraConfigError, CameraResult};
pub use host::{
    CameraKey, GpuAllocator, GpuMesh, GpuTexture, HostCamera, RenderHookHost, TextureFormat,
};
