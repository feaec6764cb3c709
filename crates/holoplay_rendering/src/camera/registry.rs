//! Registry of every camera seen this run.

use std::collections::hash_map::Entry;
use std::collections::HashMap;

use holoplay_shared::{BuildProfile, TargetDevice};

use super::handedness::{device_family, resolve_device};
use super::view::CameraView;
use crate::error::CameraResult;
use crate::host::{CameraKey, HostCamera, RenderHookHost};

/// Maps cameras to their views. Ids are handed out in first-seen order.
#[derive(Debug, Default)]
pub struct CameraRegistry {
    profile: BuildProfile,
    views: HashMap<CameraKey, CameraView>,
}

impl CameraRegistry {
    /// Creates an empty registry for the given build.
    #[must_use]
    pub fn new(profile: BuildProfile) -> Self {
        Self {
            profile,
            views: HashMap::new(),
        }
    }

    /// View for `camera`, created on first sight.
    ///
    /// # Errors
    ///
    /// Returns a configuration error for an unrenderable stereo setup. The
    /// camera is not registered in that case.
    pub fn resolve(
        &mut self,
        camera: &dyn HostCamera,
        target_device: TargetDevice,
        flip_handedness: bool,
        xr_device: Option<&str>,
    ) -> CameraResult<&mut CameraView> {
        let id = i32::try_from(self.views.len()).unwrap_or(i32::MAX);
        let profile = self.profile;
        match self.views.entry(camera.key()) {
            Entry::Occupied(entry) => Ok(entry.into_mut()),
            Entry::Vacant(entry) => {
                let device = resolve_device(target_device, xr_device);
                let family = device_family(device, profile);
                let view = CameraView::new(id, camera, family, flip_handedness)?;
                tracing::debug!(camera = entry.key().0, id, ?device, ?family, "camera registered");
                Ok(entry.insert(view))
            }
        }
    }

    /// View for a camera that has already been seen.
    #[must_use]
    pub fn get(&self, key: CameraKey) -> Option<&CameraView> {
        self.views.get(&key)
    }

    /// Number of tracked cameras.
    #[must_use]
    pub fn len(&self) -> usize {
        self.views.len()
    }

    /// Whether no camera has been seen.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.views.is_empty()
    }

    /// Tracked views in id order.
    pub fn views(&self) -> impl Iterator<Item = &CameraView> {
        let mut views: Vec<_> = self.views.values().collect();
        views.sort_by_key(|v| v.id());
        views.into_iter()
    }

    /// Removes render hooks from every tracked camera. Views and ids are kept.
    pub fn detach_hooks(&self, hooks: &dyn RenderHookHost) {
        for key in self.views.keys() {
            hooks.detach(*key);
        }
    }

    /// Removes render hooks from every tracked camera and forgets them all.
    pub fn flush_all(&mut self, hooks: &dyn RenderHookHost) {
        self.detach_hooks(hooks);
        self.views.clear();
    }
}
