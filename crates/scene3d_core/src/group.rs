//! Group container
//!
//! A Group is an ordered list of entity keys. The entities themselves live in
//! the [`World`](crate::World); membership changes go through the world so
//! each entity's parent key stays in step with the list.

use crate::EntityKey;

/// Ordered collection of entities that render, collide and die together
#[derive(Clone, Debug)]
pub struct Group {
    /// Optional name for this group (for lookup)
    pub name: Option<String>,
    members: Vec<EntityKey>,
    visible: bool,
}

impl Default for Group {
    fn default() -> Self {
        Self::new()
    }
}

impl Group {
    pub fn new() -> Self {
        Self {
            name: None,
            members: Vec::new(),
            visible: true,
        }
    }

    /// Set the name of this group (for lookup)
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Members in insertion order
    pub fn members(&self) -> &[EntityKey] {
        &self.members
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub(crate) fn index_of(&self, key: EntityKey) -> Option<usize> {
        self.members.iter().position(|k| *k == key)
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Hide or show every member at render time
    pub fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    pub(crate) fn push(&mut self, key: EntityKey) {
        self.members.push(key);
    }

    pub(crate) fn remove_key(&mut self, key: EntityKey) -> bool {
        match self.index_of(key) {
            Some(i) => {
                self.members.remove(i);
                true
            }
            None => false,
        }
    }

    pub(crate) fn take_members(&mut self) -> Vec<EntityKey> {
        std::mem::take(&mut self.members)
    }
}
