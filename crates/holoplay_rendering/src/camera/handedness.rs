//! Device conventions: which target a camera renders for and which way its
//! coordinate system turns.

use glam::{Mat4, Vec3};
use holoplay_shared::{BuildProfile, TargetDevice};

/// Coordinate-convention class of a target device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeviceFamily {
    /// Head-mounted or post-effects targets.
    Immersive,
    /// Desktop-style targets.
    Desktop,
}

/// Picks a concrete device from the active XR runtime name.
///
/// Anything that is not `AutoDetect` passes through. Unrecognised or absent
/// runtime names leave `AutoDetect` in place, which [`device_family`] treats
/// as the build profile's default.
#[must_use]
pub fn resolve_device(target: TargetDevice, xr_device: Option<&str>) -> TargetDevice {
    if target != TargetDevice::AutoDetect {
        return target;
    }
    let Some(name) = xr_device else {
        return TargetDevice::AutoDetect;
    };
    let name = name.to_ascii_lowercase();
    if name.contains("windowsmr") || name.contains("mixedreality") {
        TargetDevice::WindowsMixedReality
    } else if name.contains("oculus") {
        TargetDevice::Oculus
    } else if name.contains("openvr") {
        TargetDevice::Vive
    } else {
        TargetDevice::AutoDetect
    }
}

/// Convention class of `device` in a given build.
///
/// Shipped player builds render the generic PC and store targets with the
/// immersive conventions.
#[must_use]
pub const fn device_family(device: TargetDevice, profile: BuildProfile) -> DeviceFamily {
    match device {
        TargetDevice::Vive
        | TargetDevice::Oculus
        | TargetDevice::PostEffects
        | TargetDevice::WindowsMixedReality => DeviceFamily::Immersive,
        TargetDevice::AutoDetect
        | TargetDevice::AppStore
        | TargetDevice::Hololens
        | TargetDevice::Pc => match profile {
            BuildProfile::Player => DeviceFamily::Immersive,
            BuildProfile::Editor => DeviceFamily::Desktop,
        },
        TargetDevice::LegacyPc => DeviceFamily::Desktop,
    }
}

/// Resolved handedness of one camera.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Handedness {
    /// Rasterise as left-handed (flips the culled face).
    pub left_handed: bool,
    /// Sign of the vertical term of the correction matrix.
    pub vertical_sign: f32,
}

impl Handedness {
    /// Pure resolution from the device class and camera flags.
    #[must_use]
    pub fn resolve(family: DeviceFamily, is_primary: bool, is_preview: bool, flip: bool) -> Self {
        match family {
            DeviceFamily::Immersive if is_preview => Self {
                left_handed: !flip,
                vertical_sign: 1.0,
            },
            DeviceFamily::Immersive => Self {
                left_handed: flip,
                vertical_sign: -1.0,
            },
            DeviceFamily::Desktop => Self {
                left_handed: flip ^ is_primary,
                vertical_sign: if is_primary { 1.0 } else { -1.0 },
            },
        }
    }

    /// Correction applied after projection.
    #[must_use]
    pub fn correction(&self) -> Mat4 {
        Mat4::from_scale(Vec3::new(1.0, self.vertical_sign, 1.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auto_detect_matches_runtime_names() {
        let auto = TargetDevice::AutoDetect;
        assert_eq!(
            resolve_device(auto, Some("WindowsMR")),
            TargetDevice::WindowsMixedReality
        );
        assert_eq!(
            resolve_device(auto, Some("WindowsMixedReality Display")),
            TargetDevice::WindowsMixedReality
        );
        assert_eq!(resolve_device(auto, Some("Oculus Quest")), TargetDevice::Oculus);
        assert_eq!(resolve_device(auto, Some("OpenVR")), TargetDevice::Vive);
        assert_eq!(resolve_device(auto, Some("cardboard")), TargetDevice::AutoDetect);
        assert_eq!(resolve_device(auto, None), TargetDevice::AutoDetect);
    }

    #[test]
    fn test_explicit_target_is_kept() {
        assert_eq!(
            resolve_device(TargetDevice::Hololens, Some("oculus")),
            TargetDevice::Hololens
        );
    }

    #[test]
    fn test_family_depends_on_build_profile() {
        assert_eq!(
            device_family(TargetDevice::Pc, BuildProfile::Editor),
            DeviceFamily::Desktop
        );
        assert_eq!(
            device_family(TargetDevice::Pc, BuildProfile::Player),
            DeviceFamily::Immersive
        );
        assert_eq!(
            device_family(TargetDevice::Oculus, BuildProfile::Editor),
            DeviceFamily::Immersive
        );
        assert_eq!(
            device_family(TargetDevice::LegacyPc, BuildProfile::Player),
            DeviceFamily::Desktop
        );
    }

    #[test]
    fn test_handedness_table() {
        use DeviceFamily::{Desktop, Immersive};
        // (family, primary, preview, flip) -> (left, sign)
        let table = [
            (Immersive, false, false, true, true, -1.0),
            (Immersive, true, false, false, false, -1.0),
            (Immersive, false, true, true, false, 1.0),
            (Immersive, true, true, false, true, 1.0),
            (Desktop, true, false, true, false, 1.0),
            (Desktop, true, false, false, true, 1.0),
            (Desktop, false, false, true, true, -1.0),
            (Desktop, false, true, false, false, -1.0),
        ];
        for (family, primary, preview, flip, left, sign) in table {
            let h = Handedness::resolve(family, primary, preview, flip);
            assert_eq!(h.left_handed, left, "{family:?} {primary} {preview} {flip}");
            assert!((h.vertical_sign - sign).abs() < f32::EPSILON);
        }
    }

    #[test]
    fn test_correction_flips_y_only() {
        let h = Handedness::resolve(DeviceFamily::Desktop, false, false, false);
        let p = h.correction().transform_point3(Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(p, Vec3::new(1.0, -2.0, 3.0));
    }
}
