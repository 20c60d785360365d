//! Per-frame world passes
//!
//! The before-render pass runs, in order:
//! 1. Collision detection over every ordered pair of entities, with
//!    positional correction for solid sphere pairs and event dispatch
//! 2. Velocity integration for every live entity
//!
//! The render pass then walks the node list and hands visible entities to a
//! [`RenderSink`].

use scene3d_physics::separate_spheres;

use crate::collider::dispatch;
use crate::{EntityKey, Node, RenderSink, RenderView, World};

/// Options for the collision pass
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CollisionSettings {
    /// Do not test two members of the same group against each other
    pub skip_same_group_pairs: bool,
}

/// Detect and resolve collisions between all entity pairs
///
/// Every ordered pair `(a, b)` of distinct entities is visited in list order,
/// so `(b, a)` gets its own visit later and is tested again against the
/// positions left by earlier corrections. On a hit where neither collider is
/// a trigger and both are spheres, `a` is moved out along the line from `b`
/// until they just touch. Events fire after the correction: first on `a`,
/// then on `b`. A pair that stays overlapping (triggers, boxes) therefore
/// fires twice per frame on each side.
///
/// Returns the number of colliding ordered pairs.
pub fn collision_pass(world: &mut World, settings: &CollisionSettings) -> usize {
    let keys = world.flatten();
    let mut hits = 0;

    for i in 0..keys.len() {
        for j in 0..keys.len() {
            if i == j {
                continue;
            }
            let (a, b) = (keys[i], keys[j]);
            if !pair_collides(world, a, b, settings) {
                continue;
            }
            hits += 1;
            log::trace!("Collision between {:?} and {:?}", a, b);

            if let Some(position) = sphere_correction(world, a, b) {
                if let Some(entity) = world.get_mut(a) {
                    entity.set_position(position);
                }
            }

            dispatch(world, a, b);
            dispatch(world, b, a);
        }
    }

    hits
}

fn pair_collides(world: &World, a: EntityKey, b: EntityKey, settings: &CollisionSettings) -> bool {
    let (Some(ea), Some(eb)) = (world.get(a), world.get(b)) else {
        // destroyed earlier in this pass
        return false;
    };
    if settings.skip_same_group_pairs && ea.parent().is_some() && ea.parent() == eb.parent() {
        return false;
    }
    match (ea.collider(), eb.collider()) {
        (Some(ca), Some(cb)) => ca.check_collision(world, cb),
        _ => false,
    }
}

/// Where `a` must move to just touch `b`, if the pair is two solid spheres
fn sphere_correction(world: &World, a: EntityKey, b: EntityKey) -> Option<scene3d_math::Vec3> {
    let (ea, eb) = (world.get(a)?, world.get(b)?);
    let (ca, cb) = (ea.collider()?, eb.collider()?);
    if ca.is_trigger() || cb.is_trigger() {
        return None;
    }
    let sum = ca.sphere_radius()? + cb.sphere_radius()?;
    Some(separate_spheres(ea.position(), eb.position(), sum))
}

/// Integrate velocity and friction for every entity
pub fn integrate_all(world: &mut World, dt: f32) {
    for key in world.flatten() {
        if let Some(entity) = world.get_mut(key) {
            entity.integrate(dt);
        }
    }
}

/// Collision pass followed by integration; returns the collision count
pub fn before_render_pass(world: &mut World, settings: &CollisionSettings, dt: f32) -> usize {
    let hits = collision_pass(world, settings);
    integrate_all(world, dt);
    hits
}

/// Hand every visible entity to the sink in list order
///
/// Meshes released since the last frame are passed to the sink first.
/// Returns the number of draw calls.
pub fn render_pass<S: RenderSink + ?Sized>(world: &mut World, view: &RenderView<'_>, sink: &mut S) -> usize {
    for mesh in world.take_released() {
        sink.release(mesh);
    }

    sink.begin_frame(view);
    let mut draws = 0;
    for node in world.nodes() {
        match *node {
            Node::Entity(key) => {
                if let Some(entity) = world.get(key).filter(|e| e.is_visible()) {
                    sink.draw(view, key, entity);
                    draws += 1;
                }
            }
            Node::Group(group) => {
                let Some(g) = world.group(group).filter(|g| g.is_visible()) else {
                    continue;
                };
                for &key in g.members() {
                    if let Some(entity) = world.get(key).filter(|e| e.is_visible()) {
                        sink.draw(view, key, entity);
                        draws += 1;
                    }
                }
            }
        }
    }
    sink.end_frame();

    log::trace!("Rendered {} entities", draws);
    draws
}
