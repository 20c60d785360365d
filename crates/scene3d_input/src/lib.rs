//! Input handling for scene3d
//!
//! This crate turns raw window events into per-frame input state and drives
//! the free-fly camera from it.
//!
//! - [`InputState`] - held/released keys, mouse position and delta, scroll
//! - [`FreeFlyController`] - WASD + mouse-look camera movement through [`CameraControl`]
//! - [`WindowControl`] - what the scene may ask of the window (rect, pointer capture)

mod free_fly;
mod input_state;
mod window;

pub use free_fly::{CameraControl, FreeFlyController, FreeFlySettings};
pub use input_state::InputState;
pub use window::{Viewport, WindowControl};

pub use winit::event::{ElementState, MouseButton};
pub use winit::keyboard::KeyCode;
