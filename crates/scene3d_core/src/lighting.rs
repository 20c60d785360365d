//! Scene lighting
//!
//! One directional sun plus a bounded list of point lights. The core only
//! stores the state; shaders read it through the frame's `RenderView`.

use scene3d_math::Vec3;
use serde::{Serialize, Deserialize};

/// Most point lights a frame can carry
pub const MAX_POINT_LIGHTS: usize = 100;

/// Directional light
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct SunLight {
    pub direction: Vec3,
    /// RGBA
    pub color: [f32; 4],
    pub ambient_intensity: f32,
    pub diffuse_intensity: f32,
}

impl Default for SunLight {
    fn default() -> Self {
        Self {
            direction: Vec3::new(0.0, -1.0, 0.0),
            color: [1.0; 4],
            ambient_intensity: 0.02,
            diffuse_intensity: 0.2,
        }
    }
}

/// Distance falloff: `1 / (constant + linear*d + exponential*d^2)`
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Attenuation {
    pub constant: f32,
    pub linear: f32,
    pub exponential: f32,
}

impl Default for Attenuation {
    fn default() -> Self {
        Self { constant: 0.0, linear: 0.0, exponential: 0.4 }
    }
}

/// Omnidirectional light at a position
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PointLight {
    pub position: Vec3,
    /// RGBA
    pub color: [f32; 4],
    pub ambient_intensity: f32,
    pub diffuse_intensity: f32,
    pub attenuation: Attenuation,
}

impl PointLight {
    pub fn new(position: Vec3, color: [f32; 4]) -> Self {
        Self {
            position,
            color,
            ambient_intensity: 0.0001,
            diffuse_intensity: 1.0,
            attenuation: Attenuation::default(),
        }
    }
}

/// Light state owned by a scene
#[derive(Clone, Debug, Default)]
pub struct Lighting {
    pub sun: SunLight,
    point_lights: Vec<PointLight>,
}

impl Lighting {
    pub fn new(sun: SunLight) -> Self {
        Self { sun, point_lights: Vec::new() }
    }

    /// Add a point light, returning its index
    ///
    /// Returns `None` once [`MAX_POINT_LIGHTS`] are present.
    pub fn add_point_light(&mut self, light: PointLight) -> Option<usize> {
        if self.point_lights.len() >= MAX_POINT_LIGHTS {
            log::warn!("Point light limit ({}) reached, light at {:?} ignored", MAX_POINT_LIGHTS, light.position);
            return None;
        }
        self.point_lights.push(light);
        Some(self.point_lights.len() - 1)
    }

    pub fn remove_point_light(&mut self, index: usize) -> Option<PointLight> {
        if index < self.point_lights.len() {
            Some(self.point_lights.remove(index))
        } else {
            None
        }
    }

    pub fn point_lights(&self) -> &[PointLight] {
        &self.point_lights
    }

    pub fn clear_point_lights(&mut self) {
        self.point_lights.clear();
    }
}
