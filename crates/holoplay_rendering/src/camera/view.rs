//! Per-camera view state.

use glam::{Mat4, Vec3};
use holoplay_interop::{CameraViewInterop, TargetEye};

use super::handedness::{DeviceFamily, Handedness};
use crate::error::{CameraConfigError, CameraResult};
use crate::host::{CameraKey, HostCamera};

/// Derived state of one camera.
///
/// Handedness and the correction matrix are fixed at creation. [`update`]
/// refreshes the viewport and MVP.
///
/// [`update`]: CameraView::update
#[derive(Debug, Clone)]
pub struct CameraView {
    id: i32,
    key: CameraKey,
    viewport: (f32, f32),
    is_primary: bool,
    is_preview: bool,
    is_stereo: bool,
    target_eye: TargetEye,
    handedness: Handedness,
    flip_hand: bool,
    correction: Mat4,
    mvp: Mat4,
    interop: CameraViewInterop,
}

impl CameraView {
    /// Builds the view for a camera seen for the first time.
    ///
    /// # Errors
    ///
    /// Rejects a stereo camera that does not target exactly one eye.
    pub fn new(
        id: i32,
        camera: &dyn HostCamera,
        family: DeviceFamily,
        flip_hand: bool,
    ) -> CameraResult<Self> {
        let is_stereo = camera.stereo_enabled();
        let target_eye = if is_stereo {
            let eye = camera.target_eye();
            if !eye.is_single() {
                return Err(CameraConfigError::InvalidStereoEye {
                    camera: camera.key(),
                    eye,
                });
            }
            eye
        } else {
            TargetEye::Left
        };

        let (w, h) = camera.pixel_size();
        let viewport = (w as f32, h as f32);
        let is_primary = camera.is_primary();
        let is_preview = camera.is_preview();
        let handedness = Handedness::resolve(family, is_primary, is_preview, flip_hand);

        let interop = CameraViewInterop {
            camera_id: id,
            viewport_width: viewport.0,
            viewport_height: viewport.1,
            is_left_handed: u8::from(handedness.left_handed),
            is_stereo: u8::from(is_stereo),
            target_eye: target_eye as u8,
            ..CameraViewInterop::default()
        };

        Ok(Self {
            id,
            key: camera.key(),
            viewport,
            is_primary,
            is_preview,
            is_stereo,
            target_eye,
            handedness,
            flip_hand,
            correction: handedness.correction(),
            mvp: Mat4::IDENTITY,
            interop,
        })
    }

    /// Recomputes viewport and MVP for this frame.
    ///
    /// `mvp = correction * gpu_projection * world_to_camera * model`, where the
    /// model is mirrored on X when the view flips handedness.
    pub fn update(&mut self, camera: &dyn HostCamera, world_transform: &Mat4) {
        let (w, h) = camera.pixel_size();
        self.viewport = (w as f32, h as f32);

        let model = if self.flip_hand {
            *world_transform * Mat4::from_scale(Vec3::new(-1.0, 1.0, 1.0))
        } else {
            *world_transform
        };
        self.mvp = self.correction * camera.gpu_projection() * camera.world_to_camera() * model;

        self.interop.viewport_width = self.viewport.0;
        self.interop.viewport_height = self.viewport.1;
        self.interop.mvp = self.mvp.to_cols_array();
    }

    /// Registry id.
    #[must_use]
    pub fn id(&self) -> i32 {
        self.id
    }

    /// Camera this view belongs to.
    #[must_use]
    pub fn key(&self) -> CameraKey {
        self.key
    }

    /// Viewport in pixels.
    #[must_use]
    pub fn viewport(&self) -> (f32, f32) {
        self.viewport
    }

    /// Primary render camera.
    #[must_use]
    pub fn is_primary(&self) -> bool {
        self.is_primary
    }

    /// Authoring preview camera.
    #[must_use]
    pub fn is_preview(&self) -> bool {
        self.is_preview
    }

    /// Stereo camera.
    #[must_use]
    pub fn is_stereo(&self) -> bool {
        self.is_stereo
    }

    /// Eye this view renders. `Left` for mono cameras.
    #[must_use]
    pub fn target_eye(&self) -> TargetEye {
        self.target_eye
    }

    /// Rasterised as left-handed.
    #[must_use]
    pub fn is_left_handed(&self) -> bool {
        self.handedness.left_handed
    }

    /// Mirrors the model on X.
    #[must_use]
    pub fn is_flip_hand(&self) -> bool {
        self.flip_hand
    }

    /// Correction matrix applied after projection.
    #[must_use]
    pub fn correction(&self) -> Mat4 {
        self.correction
    }

    /// MVP from the last update.
    #[must_use]
    pub fn mvp(&self) -> Mat4 {
        self.mvp
    }

    /// Record to publish to the engine.
    #[must_use]
    pub fn interop(&self) -> &CameraViewInterop {
        &self.interop
    }
}
