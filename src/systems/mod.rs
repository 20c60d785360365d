//! Application systems
//!
//! Pieces of the binary that do not depend on a running event loop are kept
//! here so they can be tested.

mod render;
mod simulation;
mod window;

pub use render::LogRenderer;
pub use simulation::FrameClock;
pub use window::{format_title, WindowError, WindowSystem};
