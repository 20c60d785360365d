//! Collider capability
//!
//! A [`Collider`] is owned by exactly one [`Entity`](crate::Entity) and
//! records that entity's key as its owner. The owner is set by the entity or
//! the world whenever the collider is attached, and cleared when it is taken
//! off or the entity leaves the world. A collider without an owner is never
//! tested.
//!
//! Collision events are multicast: every registered handler runs, in
//! registration order, each time the owner is part of a detected pair.

use std::fmt;
use std::mem;

use scene3d_math::Vec3;
use scene3d_physics::{intersects, ColliderShape};

use crate::{Entity, EntityKey, GroupKey, World};

/// A collision callback
///
/// Handlers receive a [`CollisionContext`] with the owner as `this` and the
/// entity it hit as `other`, plus mutable access to the world.
pub type CollisionHandler = Box<dyn FnMut(&mut CollisionContext<'_>)>;

/// What a collision handler can see and change
pub struct CollisionContext<'w> {
    /// The entity whose collider the handler is registered on
    pub this: EntityKey,
    /// The entity it collided with
    pub other: EntityKey,
    pub world: &'w mut World,
}

impl CollisionContext<'_> {
    pub fn this_entity(&self) -> Option<&Entity> {
        self.world.get(self.this)
    }

    pub fn this_entity_mut(&mut self) -> Option<&mut Entity> {
        self.world.get_mut(self.this)
    }

    pub fn other_entity(&self) -> Option<&Entity> {
        self.world.get(self.other)
    }

    pub fn other_entity_mut(&mut self) -> Option<&mut Entity> {
        self.world.get_mut(self.other)
    }

    /// Group the other entity belongs to, if any
    pub fn other_parent(&self) -> Option<GroupKey> {
        self.other_entity().and_then(Entity::parent)
    }
}

/// Collision volume plus event sink, attached to an entity
pub struct Collider {
    shape: ColliderShape,
    is_trigger: bool,
    owner: Option<EntityKey>,
    handlers: Vec<CollisionHandler>,
}

impl fmt::Debug for Collider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Collider")
            .field("shape", &self.shape)
            .field("is_trigger", &self.is_trigger)
            .field("owner", &self.owner)
            .field("handlers", &self.handlers.len())
            .finish()
    }
}

impl Collider {
    pub fn new(shape: ColliderShape) -> Self {
        Self {
            shape,
            is_trigger: false,
            owner: None,
            handlers: Vec::new(),
        }
    }

    /// Sphere with a uniform radius
    pub fn sphere(radius: f32) -> Self {
        Self::new(ColliderShape::sphere(radius))
    }

    /// Sphere with per-axis radii
    pub fn ellipsoid(radius: Vec3) -> Self {
        Self::new(ColliderShape::ellipsoid(radius))
    }

    /// Box from local-space min/max extents
    pub fn cuboid(min: Vec3, max: Vec3) -> Self {
        Self::new(ColliderShape::cuboid(min, max))
    }

    /// Box of the given full size centered on the owner
    pub fn cuboid_from_size(size: Vec3) -> Self {
        Self::new(ColliderShape::cuboid_from_size(size))
    }

    /// Builder: make this a trigger (events only, never pushed apart)
    pub fn with_trigger(mut self, is_trigger: bool) -> Self {
        self.is_trigger = is_trigger;
        self
    }

    /// Builder: register a collision handler
    pub fn with_handler(mut self, handler: impl FnMut(&mut CollisionContext<'_>) + 'static) -> Self {
        self.on_collision(handler);
        self
    }

    /// Register a collision handler; it runs after those already registered
    pub fn on_collision(&mut self, handler: impl FnMut(&mut CollisionContext<'_>) + 'static) {
        self.handlers.push(Box::new(handler));
    }

    pub fn handler_count(&self) -> usize {
        self.handlers.len()
    }

    pub fn shape(&self) -> &ColliderShape {
        &self.shape
    }

    pub fn set_shape(&mut self, shape: ColliderShape) {
        self.shape = shape;
    }

    pub fn is_trigger(&self) -> bool {
        self.is_trigger
    }

    pub fn set_trigger(&mut self, is_trigger: bool) {
        self.is_trigger = is_trigger;
    }

    /// The entity holding this collider, if attached to a live one
    pub fn owner(&self) -> Option<EntityKey> {
        self.owner
    }

    pub(crate) fn set_owner(&mut self, owner: Option<EntityKey>) {
        self.owner = owner;
    }

    /// Sphere radii, if this is a sphere collider
    pub fn sphere_radius(&self) -> Option<Vec3> {
        self.shape.as_sphere().map(|s| s.radius)
    }

    /// Test this collider against another, each at its owner's pose
    ///
    /// Returns false if either collider is orphaned or the shape pairing is
    /// unsupported.
    pub fn check_collision(&self, world: &World, other: &Collider) -> bool {
        let (Some(a), Some(b)) = (self.owner, other.owner) else {
            return false;
        };
        let (Some(ea), Some(eb)) = (world.get(a), world.get(b)) else {
            return false;
        };
        intersects(&self.shape, &ea.pose(), &other.shape, &eb.pose())
    }
}

/// Run `this`'s handlers for a hit against `other`
///
/// Handlers are taken out of the collider for the duration of the call so
/// they can borrow the world mutably. Handlers registered while dispatching
/// are kept and run from the next event on.
pub(crate) fn dispatch(world: &mut World, this: EntityKey, other: EntityKey) {
    let mut handlers = match world.get_mut(this).and_then(Entity::collider_mut) {
        Some(collider) if !collider.handlers.is_empty() => mem::take(&mut collider.handlers),
        _ => return,
    };

    {
        let mut ctx = CollisionContext { this, other, world };
        for handler in handlers.iter_mut() {
            handler(&mut ctx);
        }
    }

    // The entity may have been destroyed by one of its own handlers
    if let Some(collider) = world.get_mut(this).and_then(Entity::collider_mut) {
        let added = mem::replace(&mut collider.handlers, handlers);
        collider.handlers.extend(added);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn test_constructors() {
        assert_eq!(Collider::sphere(0.5).sphere_radius(), Some(Vec3::splat(0.5)));
        assert!(Collider::cuboid_from_size(Vec3::ONE).sphere_radius().is_none());
        assert!(Collider::sphere(1.0).with_trigger(true).is_trigger());
        assert!(!Collider::ellipsoid(Vec3::new(1.0, 2.0, 1.0)).is_trigger());
    }

    #[test]
    fn test_orphan_never_collides() {
        let world = World::new();
        let a = Collider::sphere(100.0);
        let b = Collider::sphere(100.0);
        assert!(a.owner().is_none());
        assert!(!a.check_collision(&world, &b));
    }

    #[test]
    fn test_owner_set_on_attach() {
        let mut world = World::new();
        let key = world.add_entity(Entity::new().with_collider(Collider::sphere(1.0)));
        let owner = world.get(key).and_then(|e| e.collider()).and_then(Collider::owner);
        assert_eq!(owner, Some(key));
    }

    #[test]
    fn test_check_collision_uses_owner_positions() {
        let mut world = World::new();
        let a = world.add_entity(Entity::new().with_collider(Collider::sphere(0.5)));
        let b = world.add_entity(
            Entity::new()
                .with_position(Vec3::new(0.9, 0.0, 0.0))
                .with_collider(Collider::sphere(0.5)),
        );

        let ca = world.get(a).and_then(|e| e.collider()).unwrap();
        let cb = world.get(b).and_then(|e| e.collider()).unwrap();
        assert!(ca.check_collision(&world, cb));
        assert!(cb.check_collision(&world, ca));
    }

    #[test]
    fn test_dispatch_runs_handlers_in_order() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let (l1, l2) = (log.clone(), log.clone());

        let mut collider = Collider::sphere(1.0);
        collider.on_collision(move |_| l1.borrow_mut().push(1));
        collider.on_collision(move |_| l2.borrow_mut().push(2));

        let mut world = World::new();
        let a = world.add_entity(Entity::new().with_collider(collider));
        let b = world.add_entity(Entity::new());

        dispatch(&mut world, a, b);
        assert_eq!(*log.borrow(), vec![1, 2]);
        assert_eq!(world.get(a).and_then(|e| e.collider()).map(Collider::handler_count), Some(2));
    }

    #[test]
    fn test_handler_added_during_dispatch_is_kept() {
        let mut world = World::new();
        let a = world.add_entity(Entity::new().with_collider(Collider::sphere(1.0).with_handler(|ctx| {
            let this = ctx.this;
            if let Some(c) = ctx.world.get_mut(this).and_then(Entity::collider_mut) {
                c.on_collision(|_| {});
            }
        })));
        let b = world.add_entity(Entity::new());

        dispatch(&mut world, a, b);
        assert_eq!(world.get(a).and_then(|e| e.collider()).map(Collider::handler_count), Some(2));
    }

    #[test]
    fn test_handler_can_destroy_its_owner() {
        let mut world = World::new();
        let a = world.add_entity(Entity::new().with_collider(Collider::sphere(1.0).with_handler(|ctx| {
            let this = ctx.this;
            ctx.world.destroy_entity(this).ok();
        })));
        let b = world.add_entity(Entity::new());

        dispatch(&mut world, a, b);
        assert!(world.get(a).is_none());
        assert!(world.get(b).is_some());
    }

    #[test]
    fn test_context_mutates_other() {
        let mut world = World::new();
        let a = world.add_entity(Entity::new().with_collider(Collider::sphere(1.0).with_handler(|ctx| {
            if let Some(other) = ctx.other_entity_mut() {
                other.velocity = Vec3::new(0.0, 0.0, 3.0);
            }
        })));
        let b = world.add_entity(Entity::new());

        dispatch(&mut world, a, b);
        assert_eq!(world.get(b).map(|e| e.velocity), Some(Vec3::new(0.0, 0.0, 3.0)));
    }
}
