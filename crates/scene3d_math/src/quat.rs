//! Unit quaternion for 3D rotations
//!
//! Angles follow the yaw/pitch/roll convention used throughout the scene:
//! yaw about +Y, pitch about +X, roll about +Z. The composed rotation applies
//! roll first, then pitch, then yaw (`R = Ry * Rx * Rz` for column vectors).

use bytemuck::{Pod, Zeroable};
use serde::{Serialize, Deserialize};

use crate::mat4::{self, Mat4};
use crate::Vec3;

/// A quaternion `x*i + y*j + z*k + w`
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable, Serialize, Deserialize)]
pub struct Quat {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub w: f32,
}

impl Default for Quat {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Quat {
    pub const IDENTITY: Self = Self { x: 0.0, y: 0.0, z: 0.0, w: 1.0 };

    #[inline]
    pub const fn new(x: f32, y: f32, z: f32, w: f32) -> Self {
        Self { x, y, z, w }
    }

    /// Rotation of `angle` radians about a unit `axis`
    pub fn from_axis_angle(axis: Vec3, angle: f32) -> Self {
        let (s, c) = (angle * 0.5).sin_cos();
        let a = axis.normalized();
        Self::new(a.x * s, a.y * s, a.z * s, c)
    }

    /// Build a rotation from yaw (Y), pitch (X) and roll (Z), all in radians.
    pub fn from_yaw_pitch_roll(yaw: f32, pitch: f32, roll: f32) -> Self {
        let (sr, cr) = (roll * 0.5).sin_cos();
        let (sp, cp) = (pitch * 0.5).sin_cos();
        let (sy, cy) = (yaw * 0.5).sin_cos();

        Self {
            x: cy * sp * cr + sy * cp * sr,
            y: sy * cp * cr - cy * sp * sr,
            z: cy * cp * sr - sy * sp * cr,
            w: cy * cp * cr + sy * sp * sr,
        }
    }

    /// Build a rotation from an Euler vector laid out as (pitch, yaw, roll)
    #[inline]
    pub fn from_euler(rotation: Vec3) -> Self {
        Self::from_yaw_pitch_roll(rotation.y, rotation.x, rotation.z)
    }

    #[inline]
    pub fn length(self) -> f32 {
        (self.x * self.x + self.y * self.y + self.z * self.z + self.w * self.w).sqrt()
    }

    pub fn normalize(self) -> Self {
        let len = self.length();
        if len > 0.0 {
            let inv = 1.0 / len;
            Self::new(self.x * inv, self.y * inv, self.z * inv, self.w * inv)
        } else {
            Self::IDENTITY
        }
    }

    /// Inverse rotation for a unit quaternion
    #[inline]
    pub fn conjugate(self) -> Self {
        Self::new(-self.x, -self.y, -self.z, self.w)
    }

    /// Hamilton product: `self * other` applies `other` first
    pub fn mul(self, other: Self) -> Self {
        Self {
            w: self.w * other.w - self.x * other.x - self.y * other.y - self.z * other.z,
            x: self.w * other.x + self.x * other.w + self.y * other.z - self.z * other.y,
            y: self.w * other.y - self.x * other.z + self.y * other.w + self.z * other.x,
            z: self.w * other.z + self.x * other.y - self.y * other.x + self.z * other.w,
        }
    }

    /// Rotate a vector by this quaternion
    pub fn rotate(self, v: Vec3) -> Vec3 {
        // v' = v + 2w(q x v) + 2 q x (q x v)
        let q = Vec3::new(self.x, self.y, self.z);
        let t = q.cross(v) * 2.0;
        v + t * self.w + q.cross(t)
    }

    /// Convert to a column-major rotation matrix
    pub fn to_matrix(self) -> Mat4 {
        let Self { x, y, z, w } = self;
        let (xx, yy, zz) = (x * x, y * y, z * z);
        let (xy, xz, yz) = (x * y, x * z, y * z);
        let (wx, wy, wz) = (w * x, w * y, w * z);

        let mut m = mat4::IDENTITY;
        m[0][0] = 1.0 - 2.0 * (yy + zz);
        m[0][1] = 2.0 * (xy + wz);
        m[0][2] = 2.0 * (xz - wy);

        m[1][0] = 2.0 * (xy - wz);
        m[1][1] = 1.0 - 2.0 * (xx + zz);
        m[1][2] = 2.0 * (yz + wx);

        m[2][0] = 2.0 * (xz + wy);
        m[2][1] = 2.0 * (yz - wx);
        m[2][2] = 1.0 - 2.0 * (xx + yy);
        m
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

    #[test]
    fn test_identity_rotation() {
        let v = Vec3::new(1.0, 2.0, 3.0);
        assert!(vec_approx_eq(Quat::IDENTITY.rotate(v), v));
        assert!(vec_approx_eq(Quat::from_yaw_pitch_roll(0.0, 0.0, 0.0).rotate(v), v));
    }

    #[test]
    fn test_yaw_rotates_x_to_negative_z() {
        let q = Quat::from_yaw_pitch_roll(FRAC_PI_2, 0.0, 0.0);
        let r = q.rotate(Vec3::X);
        assert!(vec_approx_eq(r, -Vec3::Z), "got {:?}", r);
    }

    #[test]
    fn test_pitch_rotates_y_to_z() {
        let q = Quat::from_yaw_pitch_roll(0.0, FRAC_PI_2, 0.0);
        let r = q.rotate(Vec3::Y);
        assert!(vec_approx_eq(r, Vec3::Z), "got {:?}", r);
    }

    #[test]
    fn test_roll_rotates_x_to_y() {
        let q = Quat::from_yaw_pitch_roll(0.0, 0.0, FRAC_PI_2);
        let r = q.rotate(Vec3::X);
        assert!(vec_approx_eq(r, Vec3::Y), "got {:?}", r);
    }

    #[test]
    fn test_composition_order_roll_pitch_yaw() {
        let (yaw, pitch, roll) = (0.3, -0.7, 1.1);
        let combined = Quat::from_yaw_pitch_roll(yaw, pitch, roll);
        let composed = Quat::from_axis_angle(Vec3::Y, yaw)
            .mul(Quat::from_axis_angle(Vec3::X, pitch))
            .mul(Quat::from_axis_angle(Vec3::Z, roll));

        let v = Vec3::new(0.4, -1.2, 2.5);
        assert!(vec_approx_eq(combined.rotate(v), composed.rotate(v)));
    }

    #[test]
    fn test_matrix_matches_rotate() {
        let q = Quat::from_yaw_pitch_roll(0.9, 0.2, -0.4);
        let v = Vec3::new(1.0, 2.0, -3.0);
        let m = q.to_matrix();
        assert!(vec_approx_eq(mat4::transform_vector(m, v), q.rotate(v)));
    }

    #[test]
    fn test_conjugate_undoes_rotation() {
        let q = Quat::from_yaw_pitch_roll(0.5, 0.25, 0.1);
        let v = Vec3::new(3.0, -1.0, 0.5);
        assert!(vec_approx_eq(q.conjugate().rotate(q.rotate(v)), v));
    }

    #[test]
    fn test_unit_length() {
        let q = Quat::from_yaw_pitch_roll(1.0, 2.0, 3.0);
        assert!(approx_eq(q.length(), 1.0));
        assert!(approx_eq(Quat::new(0.0, 0.0, 0.0, 2.0).normalize().w, 1.0));
    }
}
