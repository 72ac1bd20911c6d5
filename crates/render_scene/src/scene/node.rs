//! Scene-graph nodes as seen by the render scene
//!
//! The scene only needs a node's identity and its live world transform.
//! Hierarchy and parenting belong to the scene-graph code that owns nodes.

use crate::foundation::math::{Quat, Transform, Vec3};

/// Identity of a scene-graph node
///
/// Raycast hits report the node of the model that was hit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub u64);

/// Node handle carried by models, cameras and lights
#[derive(Debug, Clone)]
pub struct Node {
    id: NodeId,
    name: String,
    transform: Transform,
    changed: bool,
}

impl Node {
    /// Create a node at the identity transform
    pub fn new(id: NodeId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            transform: Transform::identity(),
            changed: true,
        }
    }

    /// Node identity
    pub fn id(&self) -> NodeId {
        self.id
    }

    /// Debug name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Current world transform
    pub fn transform(&self) -> &Transform {
        &self.transform
    }

    /// Replace the world transform
    pub fn set_transform(&mut self, transform: Transform) {
        self.transform = transform;
        self.changed = true;
    }

    /// Move the node
    pub fn set_position(&mut self, position: Vec3) {
        self.transform.position = position;
        self.changed = true;
    }

    /// Rotate the node
    pub fn set_rotation(&mut self, rotation: Quat) {
        self.transform.rotation = rotation;
        self.changed = true;
    }

    /// Scale the node
    pub fn set_scale(&mut self, scale: Vec3) {
        self.transform.scale = scale;
        self.changed = true;
    }

    /// Whether the transform moved since the last [`clear_changed`](Self::clear_changed)
    pub fn has_changed(&self) -> bool {
        self.changed
    }

    /// Acknowledge the current transform
    pub fn clear_changed(&mut self) {
        self.changed = false;
    }

    /// Force dependents to recompute on the next update
    pub fn mark_changed(&mut self) {
        self.changed = true;
    }
}
