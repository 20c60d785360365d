//! Scene camera
//!
//! The camera derives its view and projection matrices from position,
//! yaw/pitch, field of view and aspect ratio. Both matrices are rebuilt by
//! every setter, so reading them is always free and always current.
//!
//! Two modes:
//! - **Following** (default): position and direction are scripted by the
//!   scene, typically through [`Camera::follow_viewport`]. A fractional
//!   screen offset is written into the view matrix.
//! - **FreeFly**: driven by a [`FreeFlyController`](scene3d_input::FreeFlyController)
//!   through the [`CameraControl`] impl, with the pointer captured.
//!
//! Angles on this type are in degrees.

use bytemuck::{Pod, Zeroable};
use scene3d_input::{CameraControl, Viewport, WindowControl};
use scene3d_math::{mat4, Mat4, Vec2, Vec3};

/// Narrowest allowed field of view, in degrees
pub const MIN_FOV: f32 = 1.0;
/// Widest allowed field of view, in degrees
pub const MAX_FOV: f32 = 45.0;
/// Pitch is kept strictly inside +/-90 degrees so the view never flips
pub const PITCH_LIMIT: f32 = 89.999;

pub const DEFAULT_NEAR: f32 = 0.1;
pub const DEFAULT_FAR: f32 = 1000.0;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum CameraMode {
    #[default]
    Following,
    FreeFly,
}

/// GPU-side camera data
#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable)]
pub struct CameraUniform {
    pub view_proj: [[f32; 4]; 4],
    /// xyz position, w unused
    pub position: [f32; 4],
}

/// Perspective camera with yaw/pitch orientation
#[derive(Clone, Debug)]
pub struct Camera {
    position: Vec3,
    up: Vec3,
    yaw: f32,
    pitch: f32,
    fov: f32,
    aspect: f32,
    near: f32,
    far: f32,
    offset: Vec2,
    mode: CameraMode,

    front: Vec3,
    view: Mat4,
    projection: Mat4,
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(Vec3::ZERO, 1.0)
    }
}

impl Camera {
    /// Camera at `position` looking down -Z with a 45 degree field of view
    pub fn new(position: Vec3, aspect: f32) -> Self {
        let mut camera = Self {
            position,
            up: Vec3::Y,
            yaw: -90.0,
            pitch: 0.0,
            fov: MAX_FOV,
            aspect: if aspect.is_finite() && aspect > 0.0 { aspect } else { 1.0 },
            near: DEFAULT_NEAR,
            far: DEFAULT_FAR,
            offset: Vec2::ZERO,
            mode: CameraMode::Following,
            front: Vec3::ZERO,
            view: mat4::IDENTITY,
            projection: mat4::IDENTITY,
        };
        camera.recompute();
        camera
    }

    /// Builder: set the up vector
    pub fn with_up(mut self, up: Vec3) -> Self {
        self.up = up.try_normalized().unwrap_or(Vec3::Y);
        self.recompute();
        self
    }

    /// Builder: set yaw and pitch
    pub fn with_direction(mut self, yaw: f32, pitch: f32) -> Self {
        self.set_direction(yaw, pitch);
        self
    }

    /// Builder: set clip plane distances
    pub fn with_clip_planes(mut self, near: f32, far: f32) -> Self {
        if near > 0.0 && far > near {
            self.near = near;
            self.far = far;
            self.recompute();
        } else {
            log::warn!("Invalid clip planes near={} far={}, keeping {}..{}", near, far, self.near, self.far);
        }
        self
    }

    // --- State ---

    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn up(&self) -> Vec3 {
        self.up
    }

    pub fn yaw(&self) -> f32 {
        self.yaw
    }

    pub fn pitch(&self) -> f32 {
        self.pitch
    }

    pub fn fov(&self) -> f32 {
        self.fov
    }

    pub fn aspect(&self) -> f32 {
        self.aspect
    }

    pub fn offset(&self) -> Vec2 {
        self.offset
    }

    pub fn mode(&self) -> CameraMode {
        self.mode
    }

    pub fn is_free(&self) -> bool {
        self.mode == CameraMode::FreeFly
    }

    /// Unit view direction
    pub fn front(&self) -> Vec3 {
        self.front
    }

    /// Unit right vector, perpendicular to the view direction and up
    pub fn right(&self) -> Vec3 {
        self.front.cross(self.up).normalized()
    }

    pub fn view_matrix(&self) -> Mat4 {
        self.view
    }

    pub fn projection_matrix(&self) -> Mat4 {
        self.projection
    }

    pub fn uniform(&self) -> CameraUniform {
        CameraUniform {
            view_proj: mat4::mul(self.projection, self.view),
            position: [self.position.x, self.position.y, self.position.z, 1.0],
        }
    }

    // --- Mutators ---

    pub fn set_position(&mut self, position: Vec3) {
        self.position = position;
        self.recompute();
    }

    /// Set yaw and pitch; pitch is clamped to +/-[`PITCH_LIMIT`]
    pub fn set_direction(&mut self, yaw: f32, pitch: f32) {
        self.yaw = yaw;
        self.pitch = pitch.clamp(-PITCH_LIMIT, PITCH_LIMIT);
        self.recompute();
    }

    /// Add to yaw and subtract from pitch, e.g. from a mouse delta
    pub fn modify_direction(&mut self, delta_yaw: f32, delta_pitch: f32) {
        self.set_direction(self.yaw + delta_yaw, self.pitch - delta_pitch);
    }

    /// Set the field of view, clamped to [`MIN_FOV`]..=[`MAX_FOV`]
    pub fn set_fov(&mut self, fov: f32) {
        if fov.is_nan() {
            log::warn!("NaN field of view ignored");
            return;
        }
        self.fov = fov.clamp(MIN_FOV, MAX_FOV);
        self.recompute();
    }

    /// Narrow the field of view by `amount` degrees (negative widens)
    pub fn change_zoom(&mut self, amount: f32) {
        self.set_fov(self.fov - amount);
    }

    /// Set the aspect ratio; non-positive values are ignored
    pub fn set_aspect(&mut self, aspect: f32) {
        if !(aspect.is_finite() && aspect > 0.0) {
            log::warn!("Invalid aspect ratio {} ignored", aspect);
            return;
        }
        self.aspect = aspect;
        self.recompute();
    }

    /// Set the fractional screen-space offset used in Following mode
    pub fn set_offset(&mut self, offset: Vec2) {
        self.offset = offset;
        self.recompute();
    }

    // --- Modes ---

    /// Switch to free-fly and capture the pointer
    ///
    /// Returns whether the window reported the pointer as captured.
    pub fn enable_free_camera(&mut self, window: &mut dyn WindowControl) -> bool {
        let captured = window.set_cursor_captured(true);
        self.mode = CameraMode::FreeFly;
        self.recompute();
        log::debug!("Camera entered free-fly (pointer captured: {})", captured);
        captured
    }

    /// Return to Following mode and release the pointer
    pub fn disable_free_camera(&mut self, window: &mut dyn WindowControl) {
        window.set_cursor_captured(false);
        self.mode = CameraMode::Following;
        self.recompute();
        log::debug!("Camera left free-fly");
    }

    /// Place a top-down camera so world units map to window pixels
    ///
    /// Keeps the current elevation (`position.y`) and picks the field of view
    /// so that `pixels_per_unit` window pixels cover one world unit. The
    /// window's desktop position selects which part of the world is seen, so
    /// moving the window pans over a fixed world. Ignored in free-fly mode.
    pub fn follow_viewport(&mut self, viewport: &Viewport, pixels_per_unit: f32) {
        if self.is_free() {
            return;
        }
        let elevation = self.position.y;
        if viewport.is_empty() || pixels_per_unit <= 0.0 || elevation <= 0.0 {
            log::warn!(
                "Cannot follow viewport {:?} at elevation {} with {} px/unit",
                viewport, elevation, pixels_per_unit
            );
            return;
        }

        let size = viewport.size();
        let half_height = size.y / 2.0 / pixels_per_unit;
        self.fov = (2.0 * (half_height / elevation).atan()).to_degrees().clamp(MIN_FOV, MAX_FOV);
        self.aspect = viewport.aspect();

        let base = elevation * (self.fov.to_radians() / 2.0).tan() * 2.0;
        let width = base * self.aspect;
        let height = base;
        let offset_x = viewport.x as f32 * (width / size.x);
        let offset_z = viewport.y as f32 * (height / size.y);

        self.position = Vec3::new(width / 2.0 + offset_x, elevation, height / 2.0 + offset_z);
        self.recompute();
    }

    fn recompute(&mut self) {
        let (yaw, pitch) = (self.yaw.to_radians(), self.pitch.to_radians());
        self.front = Vec3::new(yaw.cos() * pitch.cos(), pitch.sin(), yaw.sin() * pitch.cos()).normalized();

        self.view = mat4::look_at(self.position, self.position + self.front, self.up);
        if self.mode == CameraMode::Following {
            // Horizontal/vertical basis terms carry the follow offset
            self.view[1][0] = -self.offset.x;
            self.view[1][1] = self.offset.y;
        }

        self.projection = mat4::perspective(self.fov.to_radians(), self.aspect, self.near, self.far);
    }
}

impl CameraControl for Camera {
    fn move_forward(&mut self, distance: f32) {
        self.set_position(self.position + self.front * distance);
    }

    fn move_right(&mut self, distance: f32) {
        self.set_position(self.position + self.right() * distance);
    }

    fn move_up(&mut self, distance: f32) {
        self.set_position(self.position + self.up * distance);
    }

    fn modify_direction(&mut self, delta_yaw: f32, delta_pitch: f32) {
        Camera::modify_direction(self, delta_yaw, delta_pitch);
    }

    fn change_zoom(&mut self, amount: f32) {
        Camera::change_zoom(self, amount);
    }

    fn position(&self) -> Vec3 {
        self.position
    }
}
