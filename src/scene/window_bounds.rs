//! Moving window rectangle
//!
//! The arena is played inside the OS window. The window slowly shrinks toward
//! a minimum size, and bullets that leave it near an edge kick that edge
//! outward. Each edge has its own velocity that decays with friction.

use scene3d_input::Viewport;
use scene3d_math::{Vec2, Vec3};

/// Fraction of velocity lost per second on a moving edge
const EDGE_FRICTION: f32 = 5.0;
/// Edges slower than this (plus the frame's friction loss) stop
const EDGE_STOP: f32 = 4.0;
/// Bullets only push an edge when they leave within this fraction of it
const EDGE_INFLUENCE: f32 = 0.1;

/// Window rectangle in desktop pixels, kept as floats between frames
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self { x, y, width, height }
    }

    pub fn from_viewport(viewport: &Viewport) -> Self {
        Self::new(viewport.x as f32, viewport.y as f32, viewport.width as f32, viewport.height as f32)
    }

    /// Truncate to whole pixels
    pub fn to_viewport(&self) -> Viewport {
        Viewport::new(self.x as i32, self.y as i32, self.width.max(0.0) as u32, self.height.max(0.0) as u32)
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    pub fn position(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }

    pub fn size(&self) -> Vec2 {
        Vec2::new(self.width, self.height)
    }
}

/// Per-edge velocities in pixels per second
///
/// Negative values move an edge left/up, positive right/down.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct EdgeVelocity {
    pub left: f32,
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
}

/// How the rectangle shrinks when no edge is being pushed
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ShrinkRule {
    /// Pixels per second, per edge
    pub rate: f32,
    pub min_width: f32,
    pub min_height: f32,
}

/// The arena window: rectangle plus edge motion
#[derive(Clone, Debug, Default)]
pub struct WindowBounds {
    rect: Rect,
    velocity: EdgeVelocity,
}

impl WindowBounds {
    pub fn new(rect: Rect) -> Self {
        Self {
            rect,
            velocity: EdgeVelocity::default(),
        }
    }

    pub fn rect(&self) -> Rect {
        self.rect
    }

    pub fn velocity(&self) -> EdgeVelocity {
        self.velocity
    }

    /// Top-left corner in world units (x, z)
    pub fn world_origin(&self, pixels_per_unit: f32) -> Vec2 {
        self.rect.position() / pixels_per_unit
    }

    /// Extent in world units (x, z)
    pub fn world_size(&self, pixels_per_unit: f32) -> Vec2 {
        self.rect.size() / pixels_per_unit
    }

    /// Whether a sphere at `position` pokes out of the window in world space
    pub fn is_outside(&self, position: Vec3, radius: f32, pixels_per_unit: f32) -> bool {
        let origin = self.world_origin(pixels_per_unit);
        let size = self.world_size(pixels_per_unit);
        let (x, z) = (position.x - origin.x, position.z - origin.y);
        x - radius < 0.0 || x + radius > size.x || z - radius < 0.0 || z + radius > size.y
    }

    /// Kick the edges a bullet left through
    ///
    /// Only edges within the influence band of the exit point move; corner
    /// exits move two edges. `power` scales the bullet's unit direction.
    pub fn push_from(&mut self, position: Vec3, direction: Vec3, power: f32, pixels_per_unit: f32) {
        let dir = direction.normalized();
        let origin = self.world_origin(pixels_per_unit);
        let size = self.world_size(pixels_per_unit);
        let (x, z) = (position.x - origin.x, position.z - origin.y);

        if dir.x < 0.0 && x < size.x * EDGE_INFLUENCE {
            self.velocity.left = dir.x * power;
        }
        if dir.x > 0.0 && x > size.x * (1.0 - EDGE_INFLUENCE) {
            self.velocity.right = dir.x * power;
        }
        if dir.z < 0.0 && z < size.y * EDGE_INFLUENCE {
            self.velocity.top = dir.z * power;
        }
        if dir.z > 0.0 && z > size.y * (1.0 - EDGE_INFLUENCE) {
            self.velocity.bottom = dir.z * power;
        }
    }

    /// Advance edge motion and shrinking by `dt`
    ///
    /// The result never leaves the desktop: left/top stop at 0 and, when the
    /// monitor size is known, right/bottom stop at its far edge. Returns true
    /// if the rectangle changed.
    pub fn update(&mut self, dt: f32, shrink: &ShrinkRule, monitor: Option<(u32, u32)>) -> bool {
        let old = self.rect;
        let mut rect = old;

        let left = decay(&mut self.velocity.left, dt);
        rect.x += left;
        rect.width -= left;
        rect.width += decay(&mut self.velocity.right, dt);
        let top = decay(&mut self.velocity.top, dt);
        rect.y += top;
        rect.height -= top;
        rect.height += decay(&mut self.velocity.bottom, dt);

        let step = shrink.rate * dt;
        if rect.width > shrink.min_width {
            if self.velocity.right == 0.0 {
                rect.width -= step;
            }
            if self.velocity.left == 0.0 {
                rect.x += step;
                rect.width -= step;
            }
            rect.width = rect.width.max(shrink.min_width);
        }
        if rect.height > shrink.min_height {
            if self.velocity.bottom == 0.0 {
                rect.height -= step;
            }
            if self.velocity.top == 0.0 {
                rect.y += step;
                rect.height -= step;
            }
            rect.height = rect.height.max(shrink.min_height);
        }

        if rect.x < 0.0 {
            rect.width -= old.x - rect.x;
            rect.x = 0.0;
        }
        if rect.y < 0.0 {
            rect.height -= old.y - rect.y;
            rect.y = 0.0;
        }
        if let Some((width, height)) = monitor {
            let (max_x, max_y) = (width as f32, height as f32);
            if rect.right() > max_x {
                rect.width += old.right() - rect.right();
                rect.x = max_x - rect.width;
            }
            if rect.bottom() > max_y {
                rect.height += old.bottom() - rect.bottom();
                rect.y = max_y - rect.height;
            }
        }

        if rect == old {
            return false;
        }
        log::trace!("Window bounds {:?} -> {:?}", old, rect);
        self.rect = rect;
        true
    }
}

/// Apply friction to one edge velocity and return this frame's displacement
fn decay(velocity: &mut f32, dt: f32) -> f32 {
    let change = *velocity * dt;
    let friction = EDGE_FRICTION * *velocity * dt;
    *velocity -= friction;
    if velocity.abs() < friction.abs() + EDGE_STOP {
        *velocity = 0.0;
    }
    change
}
