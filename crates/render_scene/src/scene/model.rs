//! Renderable models
//!
//! A [`Model`] ties a node to its sub-meshes. It caches the world matrix,
//! its inverse and the world-space bounds; [`Model::update_transform`]
//! refreshes them from the node and is driven by `Scene::tick`.
//!
//! Queries read models through the capability traits below rather than
//! the concrete type.

use crate::foundation::math::Mat4;
use crate::geometry::Aabb;

use super::mesh::SubMesh;
use super::node::Node;
use super::pool::Pooled;
use super::view::ViewId;
use super::Layers;

/// Something placed in the world by a matrix
pub trait HasWorldTransform {
    /// Model-to-world matrix as of the last transform update
    fn world_matrix(&self) -> &Mat4;

    /// World-to-model matrix, `None` when the world matrix is singular
    fn inverse_world_matrix(&self) -> Option<&Mat4>;
}

/// Something with cached bounding volumes
pub trait HasBounds {
    /// Bounds in model space
    fn local_bounds(&self) -> Option<&Aabb>;

    /// Bounds in world space as of the last transform update
    fn world_bounds(&self) -> Option<&Aabb>;
}

/// Something whose triangles can be walked
pub trait HasTriangleGeometry {
    /// Sub-meshes in draw order
    fn sub_meshes(&self) -> &[SubMesh];
}

/// A renderable model
#[derive(Debug, Clone)]
pub struct Model {
    node: Node,
    layer: Layers,
    enabled: bool,
    sub_meshes: Vec<SubMesh>,
    local_bounds: Option<Aabb>,
    world_matrix: Mat4,
    inverse_world_matrix: Option<Mat4>,
    world_bounds: Option<Aabb>,
    view_id: Option<ViewId>,
    pool_id: Option<usize>,
}

impl Model {
    /// Create an enabled model with no geometry on the default layer
    pub fn new(node: Node) -> Self {
        Self {
            node,
            layer: Layers::DEFAULT,
            enabled: true,
            sub_meshes: Vec::new(),
            local_bounds: None,
            world_matrix: Mat4::identity(),
            inverse_world_matrix: Some(Mat4::identity()),
            world_bounds: None,
            view_id: None,
            pool_id: None,
        }
    }

    /// Builder form of [`add_sub_mesh`](Self::add_sub_mesh)
    pub fn with_sub_mesh(mut self, sub_mesh: SubMesh) -> Self {
        self.add_sub_mesh(sub_mesh);
        self
    }

    /// Builder form of [`set_layer`](Self::set_layer)
    pub fn with_layer(mut self, layer: Layers) -> Self {
        self.layer = layer;
        self
    }

    /// Append geometry and grow the local bounds
    ///
    /// World bounds follow on the next transform update.
    pub fn add_sub_mesh(&mut self, sub_mesh: SubMesh) {
        self.local_bounds = match (self.local_bounds, sub_mesh.local_bounds()) {
            (Some(a), Some(b)) => Aabb::from_points([a.min, a.max, b.min, b.max]),
            (a, b) => a.or(b),
        };
        self.sub_meshes.push(sub_mesh);
        self.node.mark_changed();
    }

    /// Node this model renders at
    pub fn node(&self) -> &Node {
        &self.node
    }

    /// Mutable node, for moving the model
    pub fn node_mut(&mut self) -> &mut Node {
        &mut self.node
    }

    /// Layer bits used by query masks
    pub fn layer(&self) -> Layers {
        self.layer
    }

    /// Change the layer bits
    pub fn set_layer(&mut self, layer: Layers) {
        self.layer = layer;
    }

    /// Whether the model takes part in queries
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Enable or disable the model
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    /// Index in the scene's model pool, `None` when not attached
    pub fn pool_id(&self) -> Option<usize> {
        self.pool_id
    }

    /// View that last processed this model in the current frame
    pub fn view_id(&self) -> Option<ViewId> {
        self.view_id
    }

    /// Record that `view` processed this model
    ///
    /// Returns `false` if the same view already did so this frame.
    pub fn mark_visited(&mut self, view: ViewId) -> bool {
        if self.view_id == Some(view) {
            return false;
        }
        self.view_id = Some(view);
        true
    }

    /// Forget the per-frame view marker
    pub fn clear_view(&mut self) {
        self.view_id = None;
    }

    /// Recompute world matrix, inverse and world bounds if the node moved
    ///
    /// Returns whether anything was recomputed.
    pub fn update_transform(&mut self) -> bool {
        if !self.node.has_changed() {
            return false;
        }

        self.world_matrix = self.node.transform().to_matrix();
        self.inverse_world_matrix = self.world_matrix.try_inverse();
        if self.inverse_world_matrix.is_none() {
            log::warn!(
                "Model '{}' has a singular world matrix and will be skipped by raycasts",
                self.node.name()
            );
        }
        self.world_bounds = self.local_bounds.map(|b| b.transformed(&self.world_matrix));
        self.node.clear_changed();
        true
    }
}

impl HasWorldTransform for Model {
    fn world_matrix(&self) -> &Mat4 {
        &self.world_matrix
    }

    fn inverse_world_matrix(&self) -> Option<&Mat4> {
        self.inverse_world_matrix.as_ref()
    }
}

impl HasBounds for Model {
    fn local_bounds(&self) -> Option<&Aabb> {
        self.local_bounds.as_ref()
    }

    fn world_bounds(&self) -> Option<&Aabb> {
        self.world_bounds.as_ref()
    }
}

impl HasTriangleGeometry for Model {
    fn sub_meshes(&self) -> &[SubMesh] {
        &self.sub_meshes
    }
}

impl Pooled for Model {
    fn pool_id(&self) -> Option<usize> {
        self.pool_id
    }

    fn set_pool_id(&mut self, id: Option<usize>) {
        self.pool_id = id;
    }
}
