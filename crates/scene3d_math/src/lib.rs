//! 3D Mathematics Library
//!
//! This crate provides the vector, rotation, and matrix types used by the
//! scene3d runtime.
//!
//! ## Core Types
//!
//! - [`Vec3`] - 3D vector with x, y, z components
//! - [`Vec2`] - 2D vector (screen-space offsets, mouse deltas)
//! - [`Quat`] - unit quaternion built from yaw/pitch/roll
//! - [`Mat4`] - 4x4 column-major matrix, see the [`mat4`] module
//!
//! All angles passed to this crate are in radians. Matrices use the
//! column-vector convention (`v' = M * v`) in a right-handed, Y-up space.

mod vec2;
mod vec3;
mod quat;
pub mod mat4;

pub use vec2::Vec2;
pub use vec3::Vec3;
pub use quat::Quat;
pub use mat4::Mat4;
