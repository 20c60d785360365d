//! Entity type
//!
//! An Entity is a positioned object in the scene. It keeps its world matrix
//! in sync with its transform: every transform mutator recomputes the cached
//! matrix before returning.

use bitflags::bitflags;
use scene3d_math::{Mat4, Vec3};
use scene3d_physics::{integrate_velocity, Pose};

use crate::{Collider, EntityKey, GroupKey, Material, MeshHandle, Transform};

bitflags! {
    /// Flags indicating which parts of an entity have changed since the
    /// renderer last looked at it
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
    pub struct DirtyFlags: u8 {
        /// No changes
        const NONE = 0;
        /// Transform (position, rotation, scale) has changed
        const TRANSFORM = 1 << 0;
        /// Collider was attached, replaced or removed
        const COLLIDER = 1 << 1;
        /// Visibility, mesh or material has changed
        const APPEARANCE = 1 << 2;
        /// All flags set - entity needs full upload
        const ALL = Self::TRANSFORM.bits() | Self::COLLIDER.bits() | Self::APPEARANCE.bits();
    }
}

/// An object in the scene
///
/// Each entity has:
/// - An optional name (for lookup by name)
/// - A transform and the world matrix derived from it
/// - Velocity and friction, applied by [`Entity::integrate`]
/// - An optional collider
/// - A non-owning key to the group holding it, if any
/// - Render data (mesh handle, material, visibility)
/// - Dirty flags (for change tracking)
#[derive(Debug)]
pub struct Entity {
    /// Optional name for this entity (for lookup)
    pub name: Option<String>,
    transform: Transform,
    matrix: Mat4,
    /// Units per second
    pub velocity: Vec3,
    friction: f32,
    collider: Option<Collider>,
    parent: Option<GroupKey>,
    key: Option<EntityKey>,
    mesh: Option<MeshHandle>,
    material: Material,
    visible: bool,
    dirty: DirtyFlags,
}

impl Default for Entity {
    fn default() -> Self {
        Self::new()
    }
}

impl Entity {
    /// Create an entity at the origin with no collider
    pub fn new() -> Self {
        Self::with_transform(Transform::identity())
    }

    /// Create an entity with the given transform
    pub fn with_transform(transform: Transform) -> Self {
        Self {
            name: None,
            transform,
            matrix: transform.to_matrix(),
            velocity: Vec3::ZERO,
            friction: 0.0,
            collider: None,
            parent: None,
            key: None,
            mesh: None,
            material: Material::default(),
            visible: true,
            dirty: DirtyFlags::ALL, // New entities are dirty
        }
    }

    /// Set the name of this entity (for lookup)
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_position(mut self, position: Vec3) -> Self {
        self.set_position(position);
        self
    }

    pub fn with_rotation(mut self, rotation: Vec3) -> Self {
        self.set_rotation(rotation);
        self
    }

    pub fn with_scale(mut self, scale: Vec3) -> Self {
        self.set_scale(scale);
        self
    }

    pub fn with_velocity(mut self, velocity: Vec3) -> Self {
        self.velocity = velocity;
        self
    }

    pub fn with_friction(mut self, friction: f32) -> Self {
        self.set_friction(friction);
        self
    }

    pub fn with_collider(mut self, collider: Collider) -> Self {
        self.set_collider(Some(collider));
        self
    }

    pub fn with_mesh(mut self, mesh: MeshHandle) -> Self {
        self.mesh = Some(mesh);
        self
    }

    pub fn with_material(mut self, material: Material) -> Self {
        self.material = material;
        self
    }

    // --- Transform ---

    pub fn transform(&self) -> &Transform {
        &self.transform
    }

    pub fn position(&self) -> Vec3 {
        self.transform.position
    }

    /// Rotation in radians as (pitch, yaw, roll)
    pub fn rotation(&self) -> Vec3 {
        self.transform.rotation
    }

    pub fn scale(&self) -> Vec3 {
        self.transform.scale
    }

    /// The cached local-to-world matrix
    pub fn matrix(&self) -> Mat4 {
        self.matrix
    }

    pub fn set_position(&mut self, position: Vec3) {
        self.transform.position = position;
        self.update_matrix();
    }

    pub fn set_rotation(&mut self, rotation: Vec3) {
        self.transform.rotation = rotation;
        self.update_matrix();
    }

    pub fn set_scale(&mut self, scale: Vec3) {
        self.transform.scale = scale;
        self.update_matrix();
    }

    pub fn set_transform(&mut self, transform: Transform) {
        self.transform = transform;
        self.update_matrix();
    }

    pub fn translate(&mut self, delta: Vec3) {
        self.set_position(self.transform.position + delta);
    }

    fn update_matrix(&mut self) {
        self.matrix = self.transform.to_matrix();
        self.dirty |= DirtyFlags::TRANSFORM;
    }

    /// Position and rotation as seen by collision tests
    pub fn pose(&self) -> Pose {
        Pose::new(self.transform.position, self.transform.rotation)
    }

    // --- Motion ---

    pub fn friction(&self) -> f32 {
        self.friction
    }

    /// Set friction; negative values are clamped to 0
    pub fn set_friction(&mut self, friction: f32) {
        if friction < 0.0 {
            log::warn!("Negative friction {} clamped to 0", friction);
        }
        self.friction = friction.max(0.0);
    }

    /// Move by velocity over `dt` seconds, then apply friction
    pub fn integrate(&mut self, dt: f32) {
        if self.velocity.is_zero() {
            return;
        }
        let mut position = self.transform.position;
        integrate_velocity(&mut position, &mut self.velocity, self.friction, dt);
        self.set_position(position);
    }

    // --- Collider ---

    pub fn collider(&self) -> Option<&Collider> {
        self.collider.as_ref()
    }

    pub fn collider_mut(&mut self) -> Option<&mut Collider> {
        self.collider.as_mut()
    }

    /// Attach, replace or remove the collider, returning the previous one
    ///
    /// The new collider's owner is set to this entity in the same call; the
    /// returned collider is orphaned.
    pub fn set_collider(&mut self, collider: Option<Collider>) -> Option<Collider> {
        let mut previous = std::mem::replace(&mut self.collider, collider);
        if let Some(c) = self.collider.as_mut() {
            c.set_owner(self.key);
        }
        if let Some(c) = previous.as_mut() {
            c.set_owner(None);
        }
        self.dirty |= DirtyFlags::COLLIDER;
        previous
    }

    // --- Hierarchy ---

    /// The group holding this entity, if any
    pub fn parent(&self) -> Option<GroupKey> {
        self.parent
    }

    /// This entity's key while it lives in a world
    pub fn key(&self) -> Option<EntityKey> {
        self.key
    }

    pub(crate) fn attach(&mut self, key: EntityKey, parent: Option<GroupKey>) {
        self.key = Some(key);
        self.parent = parent;
        if let Some(c) = self.collider.as_mut() {
            c.set_owner(Some(key));
        }
    }

    pub(crate) fn detach(&mut self) {
        self.key = None;
        self.parent = None;
        if let Some(c) = self.collider.as_mut() {
            c.set_owner(None);
        }
    }

    // --- Rendering ---

    pub fn mesh(&self) -> Option<MeshHandle> {
        self.mesh
    }

    pub fn set_mesh(&mut self, mesh: Option<MeshHandle>) {
        self.mesh = mesh;
        self.dirty |= DirtyFlags::APPEARANCE;
    }

    pub fn material(&self) -> &Material {
        &self.material
    }

    pub fn set_material(&mut self, material: Material) {
        self.material = material;
        self.dirty |= DirtyFlags::APPEARANCE;
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn set_visible(&mut self, visible: bool) {
        if self.visible != visible {
            self.visible = visible;
            self.dirty |= DirtyFlags::APPEARANCE;
        }
    }

    /// Release owned resources: the collider and its handlers are dropped and
    /// the mesh handle is returned for the renderer to free.
    pub fn dispose(&mut self) -> Option<MeshHandle> {
        self.set_collider(None);
        self.visible = false;
        self.mesh.take()
    }

    // --- Dirty tracking ---

    pub fn dirty(&self) -> DirtyFlags {
        self.dirty
    }

    pub fn is_dirty(&self) -> bool {
        !self.dirty.is_empty()
    }

    pub fn mark_dirty(&mut self, flags: DirtyFlags) {
        self.dirty |= flags;
    }

    pub fn clear_dirty(&mut self) {
        self.dirty = DirtyFlags::NONE;
    }
}
