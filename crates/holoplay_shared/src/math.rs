//! Bounding volumes and the plain records used at the native boundary.

use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec3};

/// 3D vector in the layout the native engine expects.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct Vec3Interop {
    /// X component
    pub x: f32,
    /// Y component
    pub y: f32,
    /// Z component
    pub z: f32,
}

impl From<Vec3> for Vec3Interop {
    fn from(v: Vec3) -> Self {
        Self { x: v.x, y: v.y, z: v.z }
    }
}

impl From<Vec3Interop> for Vec3 {
    fn from(v: Vec3Interop) -> Self {
        Vec3::new(v.x, v.y, v.z)
    }
}

/// Axis-aligned bounding box.
///
/// Native metadata reports bounds as min/max corners. A box with no positive
/// extent on any axis is *degenerate* and means the source carried no bounds.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Bounds {
    /// Minimum corner.
    pub min: Vec3,
    /// Maximum corner.
    pub max: Vec3,
}

impl Bounds {
    /// The all-zero box.
    pub const EMPTY: Self = Self {
        min: Vec3::ZERO,
        max: Vec3::ZERO,
    };

    /// Creates a box from raw corners, exactly as given.
    #[must_use]
    pub const fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    /// Smallest box containing every point.
    #[must_use]
    pub fn enclosing(points: &[Vec3]) -> Self {
        let Some(first) = points.first() else {
            return Self::EMPTY;
        };
        let (min, max) = points
            .iter()
            .fold((*first, *first), |(lo, hi), p| (lo.min(*p), hi.max(*p)));
        Self { min, max }
    }

    /// Returns true when no axis has a positive extent.
    #[must_use]
    pub fn is_degenerate(&self) -> bool {
        let size = self.max - self.min;
        size.x <= 0.0 && size.y <= 0.0 && size.z <= 0.0
    }

    /// Returns the center of the box.
    #[must_use]
    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    /// Returns the full extents of the box.
    #[must_use]
    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }

    /// Returns the eight corners.
    #[must_use]
    pub fn corners(&self) -> [Vec3; 8] {
        let (lo, hi) = (self.min, self.max);
        [
            Vec3::new(lo.x, lo.y, lo.z),
            Vec3::new(hi.x, lo.y, lo.z),
            Vec3::new(lo.x, hi.y, lo.z),
            Vec3::new(hi.x, hi.y, lo.z),
            Vec3::new(lo.x, lo.y, hi.z),
            Vec3::new(hi.x, lo.y, hi.z),
            Vec3::new(lo.x, hi.y, hi.z),
            Vec3::new(hi.x, hi.y, hi.z),
        ]
    }

    /// Mirrors the box across the YZ plane.
    #[must_use]
    pub fn mirrored_x(&self) -> Self {
        Self {
            min: Vec3::new(-self.max.x, self.min.y, self.min.z),
            max: Vec3::new(-self.min.x, self.max.y, self.max.z),
        }
    }

    /// Box enclosing this one after an affine transform.
    #[must_use]
    pub fn transformed(&self, m: &Mat4) -> Self {
        let corners = self.corners().map(|c| m.transform_point3(c));
        Self::enclosing(&corners)
    }

    /// Compares corners with a per-component tolerance.
    #[must_use]
    pub fn approx_eq(&self, other: &Self, epsilon: f32) -> bool {
        self.min.abs_diff_eq(other.min, epsilon) && self.max.abs_diff_eq(other.max, epsilon)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_degenerate_detection() {
        assert!(Bounds::EMPTY.is_degenerate());
        let flat = Bounds::new(Vec3::ZERO, Vec3::new(0.0, 1.0, 0.0));
        assert!(!flat.is_degenerate());
        let inverted = Bounds::new(Vec3::ONE, Vec3::ZERO);
        assert!(inverted.is_degenerate());
    }

    #[test]
    fn test_mirror_x() {
        let b = Bounds::new(Vec3::new(1.0, 0.0, 0.0), Vec3::new(3.0, 2.0, 2.0));
        let m = b.mirrored_x();
        assert_eq!(m.min, Vec3::new(-3.0, 0.0, 0.0));
        assert_eq!(m.max, Vec3::new(-1.0, 2.0, 2.0));
        assert_eq!(m.size(), b.size());
    }

    #[test]
    fn test_transform_rotation_keeps_box_ordered() {
        let b = Bounds::new(Vec3::ZERO, Vec3::new(2.0, 1.0, 1.0));
        let rot = Mat4::from_rotation_y(std::f32::consts::PI);
        let t = b.transformed(&rot);
        assert!(t.min.x <= t.max.x);
        assert!((t.min.x + 2.0).abs() < 1e-5);
        assert!(t.max.x.abs() < 1e-5);
    }

    #[test]
    fn test_center_and_size() {
        let b = Bounds::new(Vec3::splat(-1.0), Vec3::splat(3.0));
        assert_eq!(b.center(), Vec3::splat(1.0));
        assert_eq!(b.size(), Vec3::splat(4.0));
    }
}
