//! Window management system
//!
//! Wraps the winit window and exposes it to scenes through [`WindowControl`].

use std::sync::Arc;
use winit::{
    dpi::{PhysicalPosition, PhysicalSize},
    event_loop::ActiveEventLoop,
    window::{CursorGrabMode, Window},
};

use scene3d_core::CameraMode;
use scene3d_input::{Viewport, WindowControl};
use scene3d_math::Vec3;

use crate::config::WindowConfig;

/// Manages the application window and cursor state
pub struct WindowSystem {
    window: Arc<Window>,
    cursor_captured: bool,
    base_title: String,
}

impl WindowSystem {
    /// Create window from config
    pub fn create(event_loop: &ActiveEventLoop, config: &WindowConfig) -> Result<Self, WindowError> {
        let attrs = Window::default_attributes()
            .with_title(&config.title)
            .with_inner_size(PhysicalSize::new(config.width, config.height));

        let window = Arc::new(
            event_loop
                .create_window(attrs)
                .map_err(|e| WindowError::CreationFailed(e.to_string()))?,
        );

        Ok(Self {
            window,
            cursor_captured: false,
            base_title: config.title.clone(),
        })
    }

    pub fn window(&self) -> &Arc<Window> {
        &self.window
    }

    /// Update window title with position and camera mode
    pub fn update_title(&self, position: Vec3, mode: CameraMode) {
        self.window.set_title(&format_title(&self.base_title, position, mode));
    }

    pub fn request_redraw(&self) {
        self.window.request_redraw();
    }
}

impl WindowControl for WindowSystem {
    fn viewport(&self) -> Viewport {
        // Wayland has no global window position
        let position = self.window.outer_position().unwrap_or(PhysicalPosition::new(0, 0));
        let size = self.window.inner_size();
        Viewport::new(position.x, position.y, size.width, size.height)
    }

    fn set_position(&mut self, x: i32, y: i32) {
        self.window.set_outer_position(PhysicalPosition::new(x, y));
    }

    fn set_size(&mut self, width: u32, height: u32) {
        // The platform may apply the size later, through a Resized event
        let _ = self.window.request_inner_size(PhysicalSize::new(width, height));
    }

    fn set_cursor_captured(&mut self, captured: bool) -> bool {
        if !captured {
            let _ = self.window.set_cursor_grab(CursorGrabMode::None);
            self.window.set_cursor_visible(true);
            self.cursor_captured = false;
            log::info!("Cursor released");
            return false;
        }

        let grab_result = self
            .window
            .set_cursor_grab(CursorGrabMode::Locked)
            .or_else(|_| self.window.set_cursor_grab(CursorGrabMode::Confined));

        if grab_result.is_ok() {
            self.window.set_cursor_visible(false);
            self.cursor_captured = true;
            log::info!("Cursor captured - Escape to release");
        } else {
            log::warn!("Failed to capture cursor");
            self.cursor_captured = false;
        }
        self.cursor_captured
    }

    fn is_cursor_captured(&self) -> bool {
        self.cursor_captured
    }

    fn monitor_size(&self) -> Option<(u32, u32)> {
        self.window.current_monitor().map(|monitor| {
            let size = monitor.size();
            (size.width, size.height)
        })
    }
}

/// Title text for a camera at `position` in `mode`
pub fn format_title(base: &str, position: Vec3, mode: CameraMode) -> String {
    match mode {
        CameraMode::Following => format!(
            "{} - ({:.1}, {:.1}, {:.1}) [F1 free camera]",
            base, position.x, position.y, position.z
        ),
        CameraMode::FreeFly => format!(
            "{} - ({:.1}, {:.1}, {:.1}) [Esc to release]",
            base, position.x, position.y, position.z
        ),
    }
}

#[derive(Debug)]
pub enum WindowError {
    CreationFailed(String),
}

impl std::fmt::Display for WindowError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WindowError::CreationFailed(msg) => write!(f, "Window creation failed: {}", msg),
        }
    }
}

impl std::error::Error for WindowError {}
