//! Camera view registry.
//!
//! Every camera that renders the object gets a [`CameraView`]. Device
//! conventions (handedness, vertical flip) are resolved once per camera; the
//! MVP and viewport are refreshed every frame.

mod handedness;
mod registry;
mod view;

pub use handedness::{device_family, resolve_device, DeviceFamily, Handedness};
pub use registry::CameraRegistry;
pub use view::CameraView;
