//! Collision shapes
//!
//! Shapes are described in the owner's local space; the position and
//! rotation they are tested at come from a [`Pose`].

use scene3d_math::{Quat, Vec3};
use serde::{Deserialize, Serialize};

/// Where a shape sits in the world
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Pose {
    pub position: Vec3,
    /// Euler angles in radians laid out as (pitch, yaw, roll)
    pub rotation: Vec3,
}

impl Pose {
    pub fn new(position: Vec3, rotation: Vec3) -> Self {
        Self { position, rotation }
    }

    /// A pose at `position` with no rotation
    pub fn at(position: Vec3) -> Self {
        Self { position, rotation: Vec3::ZERO }
    }

    /// The pose's rotation as a quaternion
    pub fn orientation(&self) -> Quat {
        Quat::from_euler(self.rotation)
    }
}

/// A sphere, or an axis-aligned ellipsoid when the radii differ per axis
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct SphereShape {
    pub radius: Vec3,
}

impl SphereShape {
    /// Sphere with the same radius on every axis
    pub fn uniform(radius: f32) -> Self {
        Self { radius: Vec3::splat(radius) }
    }

    /// Sphere with an independent radius per axis
    pub fn from_radii(radius: Vec3) -> Self {
        Self { radius }
    }

    pub fn is_uniform(&self) -> bool {
        self.radius.x == self.radius.y && self.radius.y == self.radius.z
    }
}

/// A box given by min/max extents in local space
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct BoxShape {
    pub min: Vec3,
    pub max: Vec3,
}

impl BoxShape {
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    /// Box of the given full size centered on the local origin
    pub fn from_size(size: Vec3) -> Self {
        let half = size * 0.5;
        Self { min: -half, max: half }
    }

    /// The 8 local-space corners
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

    /// Axis-aligned bounds of the box after rotating its corners by `rotation`
    ///
    /// This is a re-bound, not an oriented box: for anything but multiples of
    /// 90 degrees the result is larger than the rotated box itself.
    pub fn rotated_bounds(&self, rotation: Quat) -> Bounds {
        let corners = self.corners();
        let first = rotation.rotate(corners[0]);
        let mut bounds = Bounds::new(first, first);
        for corner in &corners[1..] {
            let p = rotation.rotate(*corner);
            bounds.min = bounds.min.min_components(p);
            bounds.max = bounds.max.max_components(p);
        }
        bounds
    }
}

/// An axis-aligned bounding region
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bounds {
    pub min: Vec3,
    pub max: Vec3,
}

impl Bounds {
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    /// Translate the bounds by a delta
    pub fn translated(&self, delta: Vec3) -> Self {
        Self {
            min: self.min + delta,
            max: self.max + delta,
        }
    }

    /// Inclusive interval overlap on all three axes
    pub fn overlaps(&self, other: &Bounds) -> bool {
        self.min.x <= other.max.x
            && self.max.x >= other.min.x
            && self.min.y <= other.max.y
            && self.max.y >= other.min.y
            && self.min.z <= other.max.z
            && self.max.z >= other.min.z
    }
}

/// Closed set of collider geometries
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum ColliderShape {
    Sphere(SphereShape),
    Box(BoxShape),
}

impl ColliderShape {
    pub fn sphere(radius: f32) -> Self {
        ColliderShape::Sphere(SphereShape::uniform(radius))
    }

    pub fn ellipsoid(radius: Vec3) -> Self {
        ColliderShape::Sphere(SphereShape::from_radii(radius))
    }

    pub fn cuboid(min: Vec3, max: Vec3) -> Self {
        ColliderShape::Box(BoxShape::new(min, max))
    }

    pub fn cuboid_from_size(size: Vec3) -> Self {
        ColliderShape::Box(BoxShape::from_size(size))
    }

    pub fn as_sphere(&self) -> Option<&SphereShape> {
        match self {
            ColliderShape::Sphere(s) => Some(s),
            ColliderShape::Box(_) => None,
        }
    }

    pub fn is_sphere(&self) -> bool {
        self.as_sphere().is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::{FRAC_PI_2, FRAC_PI_4};

    const EPSILON: f32 = 0.0001;

    fn approx_eq(a: f32, b: f32) -> bool {
        (a - b).abs() < EPSILON
    }

    fn vec_approx_eq(a: Vec3, b: Vec3) -> bool {
        approx_eq(a.x, b.x) && approx_eq(a.y, b.y) && approx_eq(a.z, b.z)
    }

    #[test]
    fn test_sphere_uniform() {
        assert!(SphereShape::uniform(0.5).is_uniform());
        assert!(!SphereShape::from_radii(Vec3::new(1.0, 2.0, 1.0)).is_uniform());
    }

    #[test]
    fn test_box_from_size() {
        let b = BoxShape::from_size(Vec3::new(2.0, 4.0, 6.0));
        assert_eq!(b.min, Vec3::new(-1.0, -2.0, -3.0));
        assert_eq!(b.max, Vec3::new(1.0, 2.0, 3.0));
    }

    #[test]
    fn test_rotated_bounds_identity() {
        let b = BoxShape::new(Vec3::new(-1.0, 0.0, -2.0), Vec3::new(3.0, 1.0, 2.0));
        let bounds = b.rotated_bounds(Quat::IDENTITY);
        assert!(vec_approx_eq(bounds.min, b.min));
        assert!(vec_approx_eq(bounds.max, b.max));
    }

    #[test]
    fn test_rotated_bounds_quarter_turn_swaps_axes() {
        let b = BoxShape::from_size(Vec3::new(4.0, 1.0, 2.0));
        let bounds = b.rotated_bounds(Quat::from_yaw_pitch_roll(FRAC_PI_2, 0.0, 0.0));
        assert!(vec_approx_eq(bounds.max, Vec3::new(1.0, 0.5, 2.0)), "got {:?}", bounds.max);
        assert!(vec_approx_eq(bounds.min, Vec3::new(-1.0, -0.5, -2.0)), "got {:?}", bounds.min);
    }

    #[test]
    fn test_rotated_bounds_grow_at_45_degrees() {
        let b = BoxShape::from_size(Vec3::splat(2.0));
        let bounds = b.rotated_bounds(Quat::from_yaw_pitch_roll(FRAC_PI_4, 0.0, 0.0));
        let expected = 2.0f32.sqrt();
        assert!(approx_eq(bounds.max.x, expected));
        assert!(approx_eq(bounds.max.z, expected));
        assert!(approx_eq(bounds.max.y, 1.0));
    }

    #[test]
    fn test_bounds_overlap_is_inclusive() {
        let a = Bounds::new(Vec3::ZERO, Vec3::ONE);
        let touching = a.translated(Vec3::new(1.0, 0.0, 0.0));
        let apart = a.translated(Vec3::new(1.01, 0.0, 0.0));
        assert!(a.overlaps(&touching));
        assert!(!a.overlaps(&apart));
    }

    #[test]
    fn test_collider_shape_accessors() {
        assert!(ColliderShape::sphere(1.0).is_sphere());
        assert!(!ColliderShape::cuboid_from_size(Vec3::ONE).is_sphere());
        assert_eq!(
            ColliderShape::ellipsoid(Vec3::new(1.0, 2.0, 3.0)).as_sphere().map(|s| s.radius.y),
            Some(2.0)
        );
    }
}
