//! Transform (position, rotation, scale)
//!
//! A Transform represents the position, rotation, and scale of an entity in 3D space.

use scene3d_math::{mat4, Mat4, Quat, Vec3};
use serde::{Serialize, Deserialize};

/// A 3D transform with position, Euler rotation, and per-axis scale
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    /// Position in world space
    pub position: Vec3,
    /// Rotation in radians as (pitch, yaw, roll): x about X, y about Y, z about Z
    pub rotation: Vec3,
    /// Per-axis scale factor
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self::identity()
    }
}

impl Transform {
    /// Create an identity transform (no translation, rotation, or scale change)
    pub fn identity() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Vec3::ZERO,
            scale: Vec3::ONE,
        }
    }

    /// Create a transform with just a position
    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            ..Self::identity()
        }
    }

    /// Builder: set rotation
    pub fn with_rotation(mut self, rotation: Vec3) -> Self {
        self.rotation = rotation;
        self
    }

    /// Builder: set scale
    pub fn with_scale(mut self, scale: Vec3) -> Self {
        self.scale = scale;
        self
    }

    /// Rotation as a quaternion (roll, then pitch, then yaw)
    #[inline]
    pub fn orientation(&self) -> Quat {
        Quat::from_euler(self.rotation)
    }

    /// The local-to-world matrix
    ///
    /// Applies scale, then rotation, then translation.
    pub fn to_matrix(&self) -> Mat4 {
        mat4::from_scale_rotation_translation(self.scale, self.orientation(), self.position)
    }

    /// Transform a point from local space to world space
    pub fn transform_point(&self, p: Vec3) -> Vec3 {
        self.orientation().rotate(p.component_mul(self.scale)) + self.position
    }

    /// Transform a direction from local space to world space
    ///
    /// Applies scale and rotation, but not translation.
    pub fn transform_direction(&self, d: Vec3) -> Vec3 {
        self.orientation().rotate(d.component_mul(self.scale))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_2;

    const EPSILON: f32 = 0.0001;

    fn approx_eq(a: f32, b: f32) -> bool {
        (a - b).abs() < EPSILON
    }

    fn vec_approx_eq(a: Vec3, b: Vec3) -> bool {
        approx_eq(a.x, b.x) && approx_eq(a.y, b.y) && approx_eq(a.z, b.z)
    }

    fn axis_rotation(axis: usize, angle: f32) -> Mat4 {
        let (s, c) = angle.sin_cos();
        let (a, b) = match axis {
            0 => (1, 2),
            1 => (2, 0),
            _ => (0, 1),
        };
        let mut m = mat4::IDENTITY;
        m[a][a] = c;
        m[b][b] = c;
        m[a][b] = s;
        m[b][a] = -s;
        m
    }

    #[test]
    fn test_identity_transform() {
        let t = Transform::identity();
        let p = Vec3::new(1.0, 2.0, 3.0);
        assert!(vec_approx_eq(t.transform_point(p), p));
    }

    #[test]
    fn test_translation() {
        let t = Transform::from_position(Vec3::new(1.0, 2.0, 3.0));
        assert!(vec_approx_eq(t.transform_point(Vec3::ZERO), Vec3::new(1.0, 2.0, 3.0)));
        assert!(vec_approx_eq(t.transform_direction(Vec3::X), Vec3::X));
    }

    #[test]
    fn test_transform_order() {
        // X * 2 = (2, 0, 0), yawed 90 degrees = (0, 0, -2), + (10, 0, 0)
        let t = Transform::from_position(Vec3::new(10.0, 0.0, 0.0))
            .with_rotation(Vec3::new(0.0, FRAC_PI_2, 0.0))
            .with_scale(Vec3::splat(2.0));
        let p = t.transform_point(Vec3::X);
        assert!(vec_approx_eq(p, Vec3::new(10.0, 0.0, -2.0)), "Expected (10, 0, -2), got {:?}", p);
    }

    #[test]
    fn test_matrix_matches_reference_composition() {
        let t = Transform::from_position(Vec3::new(1.5, -2.0, 4.0))
            .with_rotation(Vec3::new(0.4, -1.1, 0.7))
            .with_scale(Vec3::new(2.0, 0.5, 3.0));

        // Scale, then roll (Z), pitch (X), yaw (Y), then translate
        let reference = mat4::mul(
            mat4::translation(t.position),
            mat4::mul(
                axis_rotation(1, t.rotation.y),
                mat4::mul(
                    axis_rotation(0, t.rotation.x),
                    mat4::mul(axis_rotation(2, t.rotation.z), mat4::scale(t.scale)),
                ),
            ),
        );

        let m = t.to_matrix();
        for col in 0..4 {
            for row in 0..4 {
                assert!(
                    approx_eq(m[col][row], reference[col][row]),
                    "m[{}][{}] = {} but reference has {}",
                    col, row, m[col][row], reference[col][row]
                );
            }
        }
    }

    #[test]
    fn test_matrix_agrees_with_transform_point() {
        let t = Transform::from_position(Vec3::new(0.0, 3.0, 0.0))
            .with_rotation(Vec3::new(0.2, 0.3, 0.4))
            .with_scale(Vec3::new(1.0, 2.0, 3.0));
        let p = Vec3::new(-1.0, 0.5, 2.0);
        assert!(vec_approx_eq(mat4::transform_point(t.to_matrix(), p), t.transform_point(p)));
    }
}
