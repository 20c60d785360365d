//! Demo scenes
//!
//! The arena game and the window rectangle logic it is played in.

mod arena;
mod window_bounds;

pub use arena::{Arena, CameraSettings, GameSettings};
pub use window_bounds::{EdgeVelocity, Rect, ShrinkRule, WindowBounds};
