//! Scene error types
//!
//! Returned by world and group operations that are handed keys the world
//! no longer (or never did) recognise.

use std::fmt;

use crate::{EntityKey, GroupKey};

/// Error type for world/group operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SceneError {
    /// The entity key does not refer to a live entity
    StaleEntity(EntityKey),
    /// The group key does not refer to a live group
    StaleGroup(GroupKey),
    /// The entity is live but not a member of the given group
    NotInGroup(EntityKey, GroupKey),
}

impl fmt::Display for SceneError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SceneError::StaleEntity(key) => write!(f, "Entity {:?} does not exist", key),
            SceneError::StaleGroup(key) => write!(f, "Group {:?} does not exist", key),
            SceneError::NotInGroup(entity, group) => {
                write!(f, "Entity {:?} is not a member of group {:?}", entity, group)
            }
        }
    }
}

impl std::error::Error for SceneError {}
