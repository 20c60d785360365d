//! Per-frame input state
//!
//! Window events are fed in as they arrive; the scene reads the state during
//! its update and the app calls [`InputState::end_frame`] once the frame has
//! been rendered.

use std::collections::HashSet;

use scene3d_math::Vec2;
use winit::event::{ElementState, MouseButton};
use winit::keyboard::KeyCode;

/// Keyboard, mouse and scroll state for the current frame
#[derive(Debug, Default, Clone)]
pub struct InputState {
    held: HashSet<KeyCode>,
    pressed_this_frame: HashSet<KeyCode>,
    released_this_frame: HashSet<KeyCode>,
    buttons: HashSet<MouseButton>,

    mouse_position: Vec2,
    mouse_delta: Vec2,
    scroll: f32,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Process a keyboard event
    pub fn process_keyboard(&mut self, key: KeyCode, state: ElementState) {
        match state {
            ElementState::Pressed => {
                // Key repeat arrives as repeated presses
                if self.held.insert(key) {
                    self.pressed_this_frame.insert(key);
                }
            }
            ElementState::Released => {
                self.held.remove(&key);
                self.released_this_frame.insert(key);
            }
        }
    }

    /// Process a mouse button event
    pub fn process_mouse_button(&mut self, button: MouseButton, state: ElementState) {
        match state {
            ElementState::Pressed => {
                self.buttons.insert(button);
            }
            ElementState::Released => {
                self.buttons.remove(&button);
            }
        }
    }

    /// Process an absolute cursor position in window pixels
    pub fn process_cursor_moved(&mut self, x: f64, y: f64) {
        self.mouse_position = Vec2::new(x as f32, y as f32);
    }

    /// Process raw mouse movement
    pub fn process_mouse_motion(&mut self, delta_x: f64, delta_y: f64) {
        self.mouse_delta += Vec2::new(delta_x as f32, delta_y as f32);
    }

    /// Process a scroll wheel step (positive is away from the user)
    pub fn process_scroll(&mut self, delta: f32) {
        self.scroll += delta;
    }

    /// Is the key currently held
    pub fn is_pressed(&self, key: KeyCode) -> bool {
        self.held.contains(&key)
    }

    /// Did the key go down this frame
    pub fn was_just_pressed(&self, key: KeyCode) -> bool {
        self.pressed_this_frame.contains(&key)
    }

    /// Did the key come up this frame
    pub fn was_released(&self, key: KeyCode) -> bool {
        self.released_this_frame.contains(&key)
    }

    pub fn is_button_pressed(&self, button: MouseButton) -> bool {
        self.buttons.contains(&button)
    }

    /// Signed axis from two keys: +1 for `positive`, -1 for `negative`
    pub fn axis(&self, positive: KeyCode, negative: KeyCode) -> f32 {
        (self.is_pressed(positive) as i32 - self.is_pressed(negative) as i32) as f32
    }

    pub fn mouse_position(&self) -> Vec2 {
        self.mouse_position
    }

    /// Mouse movement accumulated since the last `end_frame`
    pub fn mouse_delta(&self) -> Vec2 {
        self.mouse_delta
    }

    /// Scroll accumulated since the last `end_frame`
    pub fn scroll(&self) -> f32 {
        self.scroll
    }

    /// Clear per-frame edges and accumulators; held keys persist
    pub fn end_frame(&mut self) {
        self.pressed_this_frame.clear();
        self.released_this_frame.clear();
        self.mouse_delta = Vec2::ZERO;
        self.scroll = 0.0;
    }
}
