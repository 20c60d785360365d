//! World container for entities and groups
//!
//! The World owns every entity and group in a scene. Top-level nodes are kept
//! in insertion order; a node is either a single entity or a group whose
//! members are expanded in place when the world is flattened.

use slotmap::{new_key_type, SlotMap};

use crate::{Collider, Entity, Group, MeshHandle, SceneError};

new_key_type! {
    /// Key for an entity in the world
    pub struct EntityKey;
    /// Key for a group in the world
    pub struct GroupKey;
}

/// A top-level entry in the world's node list
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Node {
    Entity(EntityKey),
    Group(GroupKey),
}

/// Container for all entities and groups of a scene
#[derive(Default)]
pub struct World {
    entities: SlotMap<EntityKey, Entity>,
    groups: SlotMap<GroupKey, Group>,
    nodes: Vec<Node>,
    released: Vec<MeshHandle>,
}

impl World {
    /// Create a new empty world
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an entity as a top-level node, returning its key
    pub fn add_entity(&mut self, entity: Entity) -> EntityKey {
        let key = self.insert(entity, None);
        self.nodes.push(Node::Entity(key));
        key
    }

    /// Add a group as a top-level node, returning its key
    pub fn add_group(&mut self, group: Group) -> GroupKey {
        let name = group.name.clone();
        let key = self.groups.insert(group);
        self.nodes.push(Node::Group(key));
        log::debug!("Created group {:?} ({:?})", key, name);
        key
    }

    /// Append an entity to a group; its parent is set to the group
    pub fn add_to_group(&mut self, group: GroupKey, entity: Entity) -> Result<EntityKey, SceneError> {
        if !self.groups.contains_key(group) {
            return Err(SceneError::StaleGroup(group));
        }
        let key = self.insert(entity, Some(group));
        if let Some(g) = self.groups.get_mut(group) {
            g.push(key);
        }
        Ok(key)
    }

    fn insert(&mut self, entity: Entity, parent: Option<GroupKey>) -> EntityKey {
        let key = self.entities.insert(entity);
        if let Some(e) = self.entities.get_mut(key) {
            e.attach(key, parent);
        }
        key
    }

    /// Get a reference to an entity by key
    pub fn get(&self, key: EntityKey) -> Option<&Entity> {
        self.entities.get(key)
    }

    /// Get a mutable reference to an entity by key
    pub fn get_mut(&mut self, key: EntityKey) -> Option<&mut Entity> {
        self.entities.get_mut(key)
    }

    pub fn contains(&self, key: EntityKey) -> bool {
        self.entities.contains_key(key)
    }

    pub fn group(&self, key: GroupKey) -> Option<&Group> {
        self.groups.get(key)
    }

    pub fn group_mut(&mut self, key: GroupKey) -> Option<&mut Group> {
        self.groups.get_mut(key)
    }

    /// Find the first entity with the given name
    pub fn entity_by_name(&self, name: &str) -> Option<(EntityKey, &Entity)> {
        self.entities
            .iter()
            .find(|(_, e)| e.name.as_deref() == Some(name))
    }

    /// Attach, replace or remove an entity's collider
    pub fn set_collider(&mut self, key: EntityKey, collider: Option<Collider>) -> Result<Option<Collider>, SceneError> {
        let entity = self.entities.get_mut(key).ok_or(SceneError::StaleEntity(key))?;
        Ok(entity.set_collider(collider))
    }

    /// Top-level nodes in insertion order
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// Every entity key in list order, groups expanded one level
    pub fn flatten(&self) -> Vec<EntityKey> {
        let mut keys = Vec::with_capacity(self.entities.len());
        for node in &self.nodes {
            match *node {
                Node::Entity(key) => keys.push(key),
                Node::Group(group) => {
                    if let Some(g) = self.groups.get(group) {
                        keys.extend_from_slice(g.members());
                    }
                }
            }
        }
        keys
    }

    /// Iterate over entities in list order
    pub fn iter(&self) -> impl Iterator<Item = (EntityKey, &Entity)> + '_ {
        self.flatten()
            .into_iter()
            .filter_map(move |key| self.entities.get(key).map(|e| (key, e)))
    }

    /// Get the number of entities, group members included
    #[inline]
    pub fn entity_count(&self) -> usize {
        self.entities.len()
    }

    #[inline]
    pub fn group_count(&self) -> usize {
        self.groups.len()
    }

    /// Check if the world is empty
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Remove an entity from a group without destroying it
    ///
    /// The entity leaves the world and is returned detached: no key, no
    /// parent, and an orphaned collider until it is added again.
    pub fn group_remove(&mut self, group: GroupKey, key: EntityKey) -> Result<Entity, SceneError> {
        let g = self.groups.get_mut(group).ok_or(SceneError::StaleGroup(group))?;
        if !g.remove_key(key) {
            return if self.entities.contains_key(key) {
                Err(SceneError::NotInGroup(key, group))
            } else {
                Err(SceneError::StaleEntity(key))
            };
        }
        let mut entity = self.entities.remove(key).ok_or(SceneError::StaleEntity(key))?;
        entity.detach();
        Ok(entity)
    }

    /// Destroy the members at the given indices of a group
    ///
    /// Indices are processed from highest to lowest so earlier removals do
    /// not shift later ones. Duplicates are ignored and out-of-range indices
    /// are skipped with a warning. Returns how many entities were destroyed.
    pub fn group_remove_at(&mut self, group: GroupKey, indices: &[usize]) -> Result<usize, SceneError> {
        let g = self.groups.get(group).ok_or(SceneError::StaleGroup(group))?;
        let len = g.len();

        let mut sorted: Vec<usize> = indices.to_vec();
        sorted.sort_unstable_by(|a, b| b.cmp(a));
        sorted.dedup();

        let mut targets = Vec::with_capacity(sorted.len());
        for index in sorted {
            match g.members().get(index) {
                Some(key) => targets.push(*key),
                None => log::warn!("Group {:?} has {} members, index {} ignored", group, len, index),
            }
        }

        let mut removed = 0;
        for key in targets {
            if self.destroy_entity(key).is_ok() {
                removed += 1;
            }
        }
        Ok(removed)
    }

    /// Destroy an entity, removing it from its group or the top-level list
    pub fn destroy_entity(&mut self, key: EntityKey) -> Result<(), SceneError> {
        let mut entity = self.entities.remove(key).ok_or(SceneError::StaleEntity(key))?;
        match entity.parent() {
            Some(group) => {
                if let Some(g) = self.groups.get_mut(group) {
                    g.remove_key(key);
                }
            }
            None => self.nodes.retain(|n| *n != Node::Entity(key)),
        }
        entity.detach();
        if let Some(mesh) = entity.dispose() {
            self.released.push(mesh);
        }
        log::trace!("Destroyed entity {:?} ({:?})", key, entity.name);
        Ok(())
    }

    /// Destroy a group and every member, in insertion order
    ///
    /// Returns how many members were destroyed.
    pub fn destroy_group(&mut self, group: GroupKey) -> Result<usize, SceneError> {
        let mut g = self.groups.remove(group).ok_or(SceneError::StaleGroup(group))?;
        self.nodes.retain(|n| *n != Node::Group(group));

        let mut destroyed = 0;
        for key in g.take_members() {
            if let Some(mut entity) = self.entities.remove(key) {
                entity.detach();
                if let Some(mesh) = entity.dispose() {
                    self.released.push(mesh);
                }
                destroyed += 1;
            }
        }
        log::debug!("Destroyed group {:?} ({:?}) with {} members", group, g.name, destroyed);
        Ok(destroyed)
    }

    /// Destroy every node, as on scene teardown
    pub fn clear(&mut self) {
        for node in std::mem::take(&mut self.nodes) {
            let result = match node {
                Node::Entity(key) => self.destroy_entity(key),
                Node::Group(group) => self.destroy_group(group).map(|_| ()),
            };
            if let Err(err) = result {
                log::warn!("Clearing world: {}", err);
            }
        }
    }

    /// Mesh handles of destroyed entities not yet handed to the renderer
    pub fn take_released(&mut self) -> Vec<MeshHandle> {
        std::mem::take(&mut self.released)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scene3d_math::Vec3;

    fn meshed(id: u32) -> Entity {
        Entity::new().with_mesh(MeshHandle(id))
    }

    #[test]
    fn test_world_new() {
        let world = World::new();
        assert!(world.is_empty());
        assert_eq!(world.entity_count(), 0);
    }

    #[test]
    fn test_add_entity_sets_key() {
        let mut world = World::new();
        let key = world.add_entity(Entity::new());
        assert_eq!(world.get(key).and_then(Entity::key), Some(key));
        assert_eq!(world.get(key).and_then(Entity::parent), None);
        assert_eq!(world.nodes(), &[Node::Entity(key)]);
    }

    #[test]
    fn test_add_to_group_sets_parent() {
        let mut world = World::new();
        let g = world.add_group(Group::new());
        let e = world.add_to_group(g, Entity::new()).unwrap();
        assert_eq!(world.get(e).and_then(Entity::parent), Some(g));
        assert_eq!(world.group(g).map(Group::len), Some(1));
    }

    #[test]
    fn test_add_to_stale_group_fails() {
        let mut world = World::new();
        let g = world.add_group(Group::new());
        world.destroy_group(g).unwrap();
        assert_eq!(world.add_to_group(g, Entity::new()), Err(SceneError::StaleGroup(g)));
        assert_eq!(world.entity_count(), 0);
    }

    #[test]
    fn test_flatten_expands_groups_in_place() {
        let mut world = World::new();
        let a = world.add_entity(Entity::new());
        let g = world.add_group(Group::new());
        let b = world.add_to_group(g, Entity::new()).unwrap();
        let c = world.add_to_group(g, Entity::new()).unwrap();
        let d = world.add_entity(Entity::new());
        assert_eq!(world.flatten(), vec![a, b, c, d]);
        assert_eq!(world.iter().count(), 4);
    }

    #[test]
    fn test_group_remove_at_descending() {
        let mut world = World::new();
        let g = world.add_group(Group::new());
        let k0 = world.add_to_group(g, meshed(0)).unwrap();
        let k1 = world.add_to_group(g, meshed(1)).unwrap();
        let k2 = world.add_to_group(g, meshed(2)).unwrap();

        assert_eq!(world.group_remove_at(g, &[2, 0]), Ok(2));
        assert_eq!(world.group(g).map(|g| g.members().to_vec()), Some(vec![k1]));
        assert!(!world.contains(k0));
        assert!(!world.contains(k2));
        // index 2 was destroyed before index 0
        assert_eq!(world.take_released(), vec![MeshHandle(2), MeshHandle(0)]);
    }

    #[test]
    fn test_group_remove_at_ignores_bad_indices() {
        let mut world = World::new();
        let g = world.add_group(Group::new());
        world.add_to_group(g, Entity::new()).unwrap();
        world.add_to_group(g, Entity::new()).unwrap();

        assert_eq!(world.group_remove_at(g, &[1, 1, 9]), Ok(1));
        assert_eq!(world.group(g).map(Group::len), Some(1));
    }

    #[test]
    fn test_group_remove_keeps_entity_alive() {
        let mut world = World::new();
        let g = world.add_group(Group::new());
        let e = world
            .add_to_group(g, Entity::new().with_position(Vec3::X).with_collider(Collider::sphere(1.0)))
            .unwrap();

        let entity = world.group_remove(g, e).unwrap();
        assert_eq!(entity.position(), Vec3::X);
        assert!(entity.parent().is_none());
        assert!(entity.collider().and_then(Collider::owner).is_none());
        assert!(world.take_released().is_empty());

        let again = world.add_entity(entity);
        assert_eq!(world.get(again).and_then(|e| e.collider()).and_then(Collider::owner), Some(again));
    }

    #[test]
    fn test_group_remove_not_member() {
        let mut world = World::new();
        let g = world.add_group(Group::new());
        let loose = world.add_entity(Entity::new());
        assert_eq!(world.group_remove(g, loose).err(), Some(SceneError::NotInGroup(loose, g)));
    }

    #[test]
    fn test_destroy_group_cascades_once() {
        let mut world = World::new();
        let g = world.add_group(Group::new());
        for i in 0..3 {
            world.add_to_group(g, meshed(i)).unwrap();
        }
        let loose = world.add_entity(meshed(10));

        assert_eq!(world.destroy_group(g), Ok(3));
        assert_eq!(world.take_released(), vec![MeshHandle(0), MeshHandle(1), MeshHandle(2)]);
        assert_eq!(world.entity_count(), 1);
        assert_eq!(world.nodes(), &[Node::Entity(loose)]);
        assert_eq!(world.destroy_group(g), Err(SceneError::StaleGroup(g)));
    }

    #[test]
    fn test_destroy_entity_removes_from_parent() {
        let mut world = World::new();
        let g = world.add_group(Group::new());
        let e = world.add_to_group(g, Entity::new()).unwrap();
        world.destroy_entity(e).unwrap();
        assert_eq!(world.group(g).map(Group::len), Some(0));
        assert_eq!(world.destroy_entity(e), Err(SceneError::StaleEntity(e)));
    }

    #[test]
    fn test_clear_destroys_everything() {
        let mut world = World::new();
        world.add_entity(meshed(1));
        let g = world.add_group(Group::new());
        world.add_to_group(g, meshed(2)).unwrap();

        world.clear();
        assert!(world.is_empty());
        assert_eq!(world.entity_count(), 0);
        assert_eq!(world.group_count(), 0);
        assert_eq!(world.take_released().len(), 2);
    }

    #[test]
    fn test_set_collider_on_stale_key() {
        let mut world = World::new();
        let e = world.add_entity(Entity::new());
        world.destroy_entity(e).unwrap();
        assert!(matches!(world.set_collider(e, Some(Collider::sphere(1.0))), Err(SceneError::StaleEntity(_))));
    }

    #[test]
    fn test_entity_by_name() {
        let mut world = World::new();
        let key = world.add_entity(Entity::new().with_name("player"));
        assert_eq!(world.entity_by_name("player").map(|(k, _)| k), Some(key));
        assert!(world.entity_by_name("enemy").is_none());
    }
}
