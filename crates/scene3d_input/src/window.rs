//! Window seam
//!
//! The scene never talks to winit windows directly. The app implements
//! [`WindowControl`] for its window so the camera can capture the pointer
//! and scene hooks can read or move the window rectangle.

use scene3d_math::Vec2;

/// Window rectangle in physical pixels, position relative to the desktop
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Viewport {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    pub fn new(x: i32, y: i32, width: u32, height: u32) -> Self {
        Self { x, y, width, height }
    }

    /// Width / height, or 1.0 for a collapsed window
    pub fn aspect(&self) -> f32 {
        if self.height == 0 {
            1.0
        } else {
            self.width as f32 / self.height as f32
        }
    }

    pub fn position(&self) -> Vec2 {
        Vec2::new(self.x as f32, self.y as f32)
    }

    pub fn size(&self) -> Vec2 {
        Vec2::new(self.width as f32, self.height as f32)
    }

    /// True if the window has no drawable area (minimized)
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

/// Operations the scene may request from the host window
pub trait WindowControl {
    fn viewport(&self) -> Viewport;
    fn set_position(&mut self, x: i32, y: i32);
    fn set_size(&mut self, width: u32, height: u32);
    /// Capture and hide the pointer, or release and show it.
    ///
    /// Returns whether the pointer is captured afterwards.
    fn set_cursor_captured(&mut self, captured: bool) -> bool;
    fn is_cursor_captured(&self) -> bool;
    /// Size of the monitor the window is on, if known
    fn monitor_size(&self) -> Option<(u32, u32)>;
}
