//! Core types for the scene3d runtime
//!
//! This crate provides the scene graph, colliders and camera:
//!
//! - [`Transform`] - Position, rotation (pitch, yaw, roll) and scale
//! - [`Entity`] - A positioned object with velocity, friction and an optional collider
//! - [`Collider`] - Sphere or box volume with trigger flag and collision handlers
//! - [`Group`] - Ordered container of entities that render and die together
//! - [`World`] - Arena owning every entity and group, in list order
//! - [`Camera`] - View/projection from yaw, pitch and fov, Following or FreeFly
//! - [`Scene`] - World + camera + lighting, driven by [`SceneHooks`]
//! - [`pipeline`] - The per-frame collision, integration and render passes

mod camera;
mod collider;
mod entity;
mod error;
mod group;
mod lighting;
pub mod pipeline;
mod render;
mod scene;
mod transform;
mod world;

pub use camera::{Camera, CameraMode, CameraUniform, DEFAULT_FAR, DEFAULT_NEAR, MAX_FOV, MIN_FOV, PITCH_LIMIT};
pub use collider::{Collider, CollisionContext, CollisionHandler};
pub use entity::{DirtyFlags, Entity};
pub use error::SceneError;
pub use group::Group;
pub use lighting::{Attenuation, Lighting, PointLight, SunLight, MAX_POINT_LIGHTS};
pub use pipeline::CollisionSettings;
pub use render::{Material, MeshHandle, RenderSink, RenderView};
pub use scene::{FrameStats, Scene, SceneHooks};
pub use transform::Transform;
pub use world::{EntityKey, GroupKey, Node, World};

// Re-export commonly used types for convenience
pub use scene3d_math::{Mat4, Quat, Vec2, Vec3};
pub use scene3d_physics::{BoxShape, ColliderShape, SphereShape};
