//! Render seam
//!
//! The core never binds meshes or submits draws itself. Each frame it hands a
//! [`RenderView`] and every visible entity, in list order, to a [`RenderSink`]
//! supplied by the application.

use scene3d_math::{mat4, Mat4, Vec3};
use serde::{Serialize, Deserialize};

use crate::{Entity, EntityKey, Lighting};

/// Opaque handle to a GPU mesh owned by the render backend
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MeshHandle(pub u32);

/// Surface properties passed through to the renderer
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Material {
    /// Base color as RGBA (each component 0.0-1.0)
    pub base_color: [f32; 4],
    pub shininess: f32,
    /// Bitmask of light kinds that affect this surface (bit 0 sun, bit 1 point lights)
    pub light_mask: u32,
}

impl Default for Material {
    fn default() -> Self {
        Self {
            base_color: [1.0, 1.0, 1.0, 1.0],
            shininess: 32.0,
            light_mask: 0b11,
        }
    }
}

impl Material {
    /// Create a new opaque material with the given RGB color
    pub fn from_rgb(r: f32, g: f32, b: f32) -> Self {
        Self {
            base_color: [r, g, b, 1.0],
            ..Self::default()
        }
    }

    /// Builder: restrict which lights affect this material
    pub fn with_light_mask(mut self, mask: u32) -> Self {
        self.light_mask = mask;
        self
    }
}

/// Everything a renderer needs from the scene for one frame
#[derive(Clone, Copy, Debug)]
pub struct RenderView<'a> {
    pub view: Mat4,
    pub projection: Mat4,
    pub camera_position: Vec3,
    pub lighting: &'a Lighting,
}

impl RenderView<'_> {
    /// `projection * view`
    pub fn view_projection(&self) -> Mat4 {
        mat4::mul(self.projection, self.view)
    }
}

/// Receiver for per-frame draw dispatch
pub trait RenderSink {
    /// Called once before any draw of the frame
    fn begin_frame(&mut self, _view: &RenderView<'_>) {}

    /// Draw one visible entity
    fn draw(&mut self, view: &RenderView<'_>, key: EntityKey, entity: &Entity);

    /// A destroyed entity's mesh may be freed
    fn release(&mut self, _mesh: MeshHandle) {}

    /// Called once after the last draw of the frame
    fn end_frame(&mut self) {}
}
