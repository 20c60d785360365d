//! scene3d application crate
//!
//! Configuration loading, the arena demo scene and the systems the binary
//! wires into the winit event loop.

pub mod config;
pub mod scene;
pub mod systems;
