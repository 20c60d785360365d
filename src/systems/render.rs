//! Logging render sink
//!
//! Stands in for a GPU backend: it receives the scene's per-frame draw
//! dispatch, counts it, and logs what would be drawn.

use scene3d_core::{Entity, EntityKey, MeshHandle, RenderSink, RenderView};

/// Counts draw calls and mesh releases
#[derive(Debug, Default)]
pub struct LogRenderer {
    frames: u64,
    frame_draws: usize,
    last_frame_draws: usize,
    released: usize,
}

impl LogRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Frames completed so far
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Draws issued in the last completed frame
    pub fn last_frame_draws(&self) -> usize {
        self.last_frame_draws
    }

    /// Meshes freed since start
    pub fn released(&self) -> usize {
        self.released
    }
}

impl RenderSink for LogRenderer {
    fn begin_frame(&mut self, view: &RenderView<'_>) {
        self.frame_draws = 0;
        log::trace!(
            "Frame {} from {:?} with {} point lights",
            self.frames,
            view.camera_position,
            view.lighting.point_lights().len()
        );
    }

    fn draw(&mut self, _view: &RenderView<'_>, key: EntityKey, entity: &Entity) {
        self.frame_draws += 1;
        log::trace!(
            "draw {:?} '{}' mesh {:?}",
            key,
            entity.name.as_deref().unwrap_or("unnamed"),
            entity.mesh()
        );
    }

    fn release(&mut self, mesh: MeshHandle) {
        self.released += 1;
        log::trace!("release mesh {:?}", mesh);
    }

    fn end_frame(&mut self) {
        self.last_frame_draws = self.frame_draws;
        self.frames += 1;
    }
}
