//! # Rendering Error Types

use holoplay_interop::TargetEye;
use thiserror::Error;

use crate::host::CameraKey;

/// Camera setups that cannot be rendered.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CameraConfigError {
    /// A stereo camera must target exactly one eye.
    #[error("stereo camera {camera:?} targets {eye:?}, expected Left or Right")]
    InvalidStereoEye {
        /// Offending camera.
        camera: CameraKey,
        /// Eye it targets.
        eye: TargetEye,
    },
}

/// Result type for camera operations.
pub type CameraResult<T> = Result<T, CameraConfigError>;
