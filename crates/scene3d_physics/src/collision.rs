//! Pairwise intersection tests
//!
//! All tests are boolean: the scene only needs to know *whether* two
//! colliders touch. Sphere pairs can additionally be pushed apart with
//! [`separate_spheres`].

use scene3d_math::Vec3;

use crate::shapes::{BoxShape, ColliderShape, Pose, SphereShape};

/// Test two spheres for overlap
///
/// Uniform spheres collide when the center distance is strictly less than
/// the sum of radii. If either sphere has per-axis radii the offset is scaled
/// by the reciprocal of the summed radii and compared against 1 instead,
/// which reduces to the same test for uniform radii.
pub fn sphere_vs_sphere(a: &SphereShape, a_pos: Vec3, b: &SphereShape, b_pos: Vec3) -> bool {
    let offset = b_pos - a_pos;

    if a.is_uniform() && b.is_uniform() {
        let sum = a.radius.x + b.radius.x;
        return offset.length_squared() < sum * sum;
    }

    let sum = a.radius + b.radius;
    if sum.x <= 0.0 || sum.y <= 0.0 || sum.z <= 0.0 {
        return false;
    }
    offset.component_mul(sum.recip()).length_squared() < 1.0
}

/// Test two boxes for overlap
///
/// Each box is rotated by its pose, re-bounded to an axis-aligned region and
/// the two regions are tested for interval overlap. Rotated boxes can report
/// hits where their oriented volumes do not actually touch.
pub fn box_vs_box(a: &BoxShape, a_pose: &Pose, b: &BoxShape, b_pose: &Pose) -> bool {
    let a_bounds = a.rotated_bounds(a_pose.orientation()).translated(a_pose.position);
    let b_bounds = b.rotated_bounds(b_pose.orientation()).translated(b_pose.position);
    a_bounds.overlaps(&b_bounds)
}

/// Test two collider shapes at the given poses
///
/// Mixed sphere/box pairs are not supported and never collide.
pub fn intersects(a: &ColliderShape, a_pose: &Pose, b: &ColliderShape, b_pose: &Pose) -> bool {
    match (a, b) {
        (ColliderShape::Sphere(sa), ColliderShape::Sphere(sb)) => {
            sphere_vs_sphere(sa, a_pose.position, sb, b_pose.position)
        }
        (ColliderShape::Box(ba), ColliderShape::Box(bb)) => box_vs_box(ba, a_pose, bb, b_pose),
        _ => false,
    }
}

/// Compute where a sphere at `pos` must move so it just touches one at `other_pos`
///
/// The direction from `other_pos` toward `pos` is preserved and the result is
/// `sum_radii` (per axis) away from `other_pos`. When the centers coincide
/// there is no direction to preserve and the sphere is pushed along +X.
pub fn separate_spheres(pos: Vec3, other_pos: Vec3, sum_radii: Vec3) -> Vec3 {
    let away = match (pos - other_pos).try_normalized() {
        Some(dir) => dir,
        None => {
            log::debug!("coincident sphere centers at {:?}, separating along +X", pos);
            Vec3::X
        }
    };
    other_pos + away.component_mul(sum_radii)
}
