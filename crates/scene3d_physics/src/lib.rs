//! Collision and motion primitives for scene3d
//!
//! This crate provides the geometric half of the collider system:
//! - Collision shapes (per-axis spheres, local-space boxes)
//! - Pairwise intersection tests dispatched over [`ColliderShape`]
//! - Positional separation for overlapping spheres
//! - Velocity integration with per-axis friction
//!
//! It has no notion of entities or events; `scene3d_core` owns those and
//! feeds poses in from entity transforms.

pub mod collision;
pub mod integrate;
pub mod shapes;

pub use collision::{box_vs_box, intersects, separate_spheres, sphere_vs_sphere};
pub use integrate::integrate_velocity;
pub use shapes::{Bounds, BoxShape, ColliderShape, Pose, SphereShape};
