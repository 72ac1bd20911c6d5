//! Render views attached to a scene
//!
//! A view is one rendering pass: a camera, a priority and a cull mask. The
//! scene keeps views in an ordered list, not a pool.

use super::render_scene::CameraKey;
use super::Layers;

/// Identity of a view
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ViewId(pub u32);

/// Render pass descriptor
#[derive(Debug, Clone, PartialEq)]
pub struct View {
    id: ViewId,
    /// Camera rendered by this view
    pub camera: Option<CameraKey>,
    /// Rendering order, lower first
    pub priority: i32,
    /// Layers this view draws
    pub cull_mask: Layers,
}

impl View {
    /// Create a view drawing every layer
    pub fn new(id: ViewId) -> Self {
        Self {
            id,
            camera: None,
            priority: 0,
            cull_mask: Layers::ALL,
        }
    }

    /// Builder for the camera
    pub fn with_camera(mut self, camera: CameraKey) -> Self {
        self.camera = Some(camera);
        self
    }

    /// Builder for the priority
    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }

    /// View identity
    pub fn id(&self) -> ViewId {
        self.id
    }
}
