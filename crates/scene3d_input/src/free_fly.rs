//! Free-fly camera controller
//!
//! Controls:
//! - W/S: Forward/backward along the view direction
//! - A/D: Strafe left/right
//! - Space/Left Ctrl: Up/down along the camera's up vector
//! - Left Shift: Sprint
//! - Mouse: Yaw/pitch
//! - Scroll wheel: Zoom (field of view)

use scene3d_math::Vec3;
use winit::keyboard::KeyCode;

use crate::InputState;

/// Tunables for free-fly movement
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FreeFlySettings {
    /// Units per second
    pub move_speed: f32,
    /// Speed multiplier while sprint is held
    pub sprint_multiplier: f32,
    /// Degrees per pixel of mouse movement
    pub mouse_sensitivity: f32,
}

impl Default for FreeFlySettings {
    fn default() -> Self {
        Self {
            move_speed: 4.0,
            sprint_multiplier: 5.0,
            mouse_sensitivity: 0.1,
        }
    }
}

/// Moves a camera from keyboard, mouse and wheel input
#[derive(Clone, Debug, Default)]
pub struct FreeFlyController {
    pub settings: FreeFlySettings,
}

impl FreeFlyController {
    pub fn new(settings: FreeFlySettings) -> Self {
        Self { settings }
    }

    /// Builder: set movement speed
    pub fn with_move_speed(mut self, speed: f32) -> Self {
        self.settings.move_speed = speed;
        self
    }

    /// Builder: set sprint multiplier
    pub fn with_sprint_multiplier(mut self, multiplier: f32) -> Self {
        self.settings.sprint_multiplier = multiplier;
        self
    }

    /// Builder: set mouse sensitivity
    pub fn with_mouse_sensitivity(mut self, sensitivity: f32) -> Self {
        self.settings.mouse_sensitivity = sensitivity;
        self
    }

    /// Current speed given whether sprint is held
    pub fn speed(&self, input: &InputState) -> f32 {
        if input.is_pressed(KeyCode::ShiftLeft) {
            self.settings.move_speed * self.settings.sprint_multiplier
        } else {
            self.settings.move_speed
        }
    }

    /// Apply this frame's input to the camera
    ///
    /// Returns the camera position after the update.
    pub fn update<C: CameraControl + ?Sized>(&self, camera: &mut C, input: &InputState, dt: f32) -> Vec3 {
        let step = self.speed(input) * dt;

        let forward = input.axis(KeyCode::KeyW, KeyCode::KeyS);
        let right = input.axis(KeyCode::KeyD, KeyCode::KeyA);
        let up = input.axis(KeyCode::Space, KeyCode::ControlLeft);

        if forward != 0.0 {
            camera.move_forward(forward * step);
        }
        if right != 0.0 {
            camera.move_right(right * step);
        }
        if up != 0.0 {
            camera.move_up(up * step);
        }

        let delta = input.mouse_delta();
        if delta.x != 0.0 || delta.y != 0.0 {
            // Mouse right turns right, mouse down looks down
            camera.modify_direction(
                delta.x * self.settings.mouse_sensitivity,
                delta.y * self.settings.mouse_sensitivity,
            );
        }

        let scroll = input.scroll();
        if scroll != 0.0 {
            camera.change_zoom(scroll);
        }

        let position = camera.position();
        log::trace!("free-fly update: position={:?}", position);
        position
    }
}

/// Trait for camera control
/// Allows the controller to work with different camera implementations
pub trait CameraControl {
    /// Move along the view direction
    fn move_forward(&mut self, distance: f32);
    /// Move along the horizontal right vector
    fn move_right(&mut self, distance: f32);
    /// Move along the camera's up vector
    fn move_up(&mut self, distance: f32);
    /// Add to yaw and subtract from pitch, both in degrees
    fn modify_direction(&mut self, delta_yaw: f32, delta_pitch: f32);
    /// Narrow the field of view by `amount` degrees
    fn change_zoom(&mut self, amount: f32);
    fn position(&self) -> Vec3;
}

#[cfg(test)]
mod tests {
    use super::*;
    use winit::event::ElementState;

    /// Records what the controller asked for
    #[derive(Default)]
    struct MockCamera {
        position: Vec3,
        yaw: f32,
        pitch: f32,
        fov: f32,
    }

    impl CameraControl for MockCamera {
        fn move_forward(&mut self, distance: f32) {
            self.position.z -= distance;
        }
        fn move_right(&mut self, distance: f32) {
            self.position.x += distance;
        }
        fn move_up(&mut self, distance: f32) {
            self.position.y += distance;
        }
        fn modify_direction(&mut self, delta_yaw: f32, delta_pitch: f32) {
            self.yaw += delta_yaw;
            self.pitch -= delta_pitch;
        }
        fn change_zoom(&mut self, amount: f32) {
            self.fov -= amount;
        }
        fn position(&self) -> Vec3 {
            self.position
        }
    }

    fn press(input: &mut InputState, key: KeyCode) {
        input.process_keyboard(key, ElementState::Pressed);
    }

    #[test]
    fn test_idle_input_does_nothing() {
        let mut cam = MockCamera::default();
        let pos = FreeFlyController::default().update(&mut cam, &InputState::new(), 1.0);
        assert_eq!(pos, Vec3::ZERO);
        assert_eq!(cam.yaw, 0.0);
        assert_eq!(cam.fov, 0.0);
    }

    #[test]
    fn test_forward_uses_move_speed() {
        let mut cam = MockCamera::default();
        let mut input = InputState::new();
        press(&mut input, KeyCode::KeyW);

        FreeFlyController::default().update(&mut cam, &input, 0.5);
        assert_eq!(cam.position.z, -2.0);
    }

    #[test]
    fn test_sprint_multiplies_speed() {
        let mut cam = MockCamera::default();
        let mut input = InputState::new();
        press(&mut input, KeyCode::KeyD);
        press(&mut input, KeyCode::ShiftLeft);

        FreeFlyController::default().update(&mut cam, &input, 1.0);
        assert_eq!(cam.position.x, 20.0);
    }

    #[test]
    fn test_vertical_keys() {
        let mut cam = MockCamera::default();
        let mut input = InputState::new();
        press(&mut input, KeyCode::ControlLeft);

        FreeFlyController::default().with_move_speed(2.0).update(&mut cam, &input, 1.0);
        assert_eq!(cam.position.y, -2.0);
    }

    #[test]
    fn test_mouse_delta_scaled_by_sensitivity() {
        let mut cam = MockCamera::default();
        let mut input = InputState::new();
        input.process_mouse_motion(10.0, 20.0);

        FreeFlyController::default().update(&mut cam, &input, 0.016);
        assert!((cam.yaw - 1.0).abs() < 0.0001);
        assert!((cam.pitch + 2.0).abs() < 0.0001);
    }

    #[test]
    fn test_scroll_zooms() {
        let mut cam = MockCamera { fov: 45.0, ..Default::default() };
        let mut input = InputState::new();
        input.process_scroll(3.0);

        FreeFlyController::default().update(&mut cam, &input, 0.016);
        assert_eq!(cam.fov, 42.0);
    }

    #[test]
    fn test_builders() {
        let c = FreeFlyController::default()
            .with_move_speed(1.0)
            .with_sprint_multiplier(3.0)
            .with_mouse_sensitivity(0.5);
        assert_eq!(c.settings, FreeFlySettings { move_speed: 1.0, sprint_multiplier: 3.0, mouse_sensitivity: 0.5 });
    }
}
