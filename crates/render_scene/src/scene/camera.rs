//! Scene cameras
//!
//! A camera looks down its node's local -Z axis. View and projection
//! matrices are computed on demand from the node transform and the
//! perspective parameters.

use bitflags::bitflags;

use crate::foundation::math::{utils, Mat4, Mat4Ext, Quat, Vec3, Vec4};
use crate::geometry::Ray;

use super::node::Node;
use super::pool::Pooled;
use super::Layers;

bitflags! {
    /// Buffers a camera clears before drawing
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct ClearFlags: u8 {
        /// Clear the color attachment
        const COLOR = 1 << 0;
        /// Clear depth
        const DEPTH = 1 << 1;
        /// Clear stencil
        const STENCIL = 1 << 2;
    }
}

/// 3D perspective camera
#[derive(Debug, Clone)]
pub struct Camera {
    node: Node,
    /// Vertical field of view in radians
    pub fov: f32,
    /// Aspect ratio (width / height)
    pub aspect: f32,
    /// Distance to near clipping plane
    pub near: f32,
    /// Distance to far clipping plane
    pub far: f32,
    /// Buffers cleared before this camera draws
    pub clear_flags: ClearFlags,
    /// Clear color [R, G, B, A]
    pub clear_color: [f32; 4],
    /// Draw order among cameras, lower first
    pub priority: i32,
    /// Layers this camera renders
    pub visibility: Layers,
    enabled: bool,
    pool_id: Option<usize>,
}

impl Camera {
    /// Create a perspective camera
    ///
    /// # Arguments
    /// * `node` - Node carrying the camera's world transform
    /// * `fov_degrees` - Vertical field of view in degrees
    /// * `aspect` - Aspect ratio (width / height) of the viewport
    /// * `near` - Distance to near clipping plane (must be > 0)
    /// * `far` - Distance to far clipping plane (must be > near)
    pub fn perspective(node: Node, fov_degrees: f32, aspect: f32, near: f32, far: f32) -> Self {
        Self {
            node,
            fov: utils::deg_to_rad(fov_degrees),
            aspect,
            near,
            far,
            clear_flags: ClearFlags::COLOR | ClearFlags::DEPTH,
            clear_color: [0.005, 0.005, 0.005, 1.0],
            priority: 0,
            visibility: Layers::ALL,
            enabled: true,
            pool_id: None,
        }
    }

    /// Node carrying the camera transform
    pub fn node(&self) -> &Node {
        &self.node
    }

    /// Mutable node, for moving the camera
    pub fn node_mut(&mut self) -> &mut Node {
        &mut self.node
    }

    /// Whether the camera renders
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Enable or disable the camera
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    /// Index in the scene's camera pool, `None` when not attached
    pub fn pool_id(&self) -> Option<usize> {
        self.pool_id
    }

    /// Turn the camera to face `target`
    pub fn look_at(&mut self, target: Vec3, up: Vec3) {
        let eye = self.node.transform().position;
        let view_rotation = Quat::look_at_rh(&(target - eye), &up);
        self.node.set_rotation(view_rotation.inverse());
        log::trace!("Camera '{}' now looking at {:?}", self.node.name(), target);
    }

    /// Update aspect ratio after a viewport resize
    pub fn set_aspect_ratio(&mut self, aspect: f32) {
        if (self.aspect - aspect).abs() > 0.01 {
            log::debug!("Camera aspect ratio changed: {:.3} -> {:.3}", self.aspect, aspect);
        }
        self.aspect = aspect;
    }

    /// World-to-view matrix, `None` if the node transform is singular
    pub fn view_matrix(&self) -> Option<Mat4> {
        self.node.transform().to_matrix().try_inverse()
    }

    /// Perspective projection matrix
    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective(self.fov, self.aspect, self.near, self.far)
    }

    /// Combined projection * view
    pub fn view_projection_matrix(&self) -> Option<Mat4> {
        Some(self.projection_matrix() * self.view_matrix()?)
    }

    /// World-space ray through a point in normalized device coordinates
    ///
    /// `ndc_x` runs -1 (left) to 1 (right), `ndc_y` -1 (bottom) to 1 (top).
    /// The ray starts on the near plane.
    pub fn screen_point_to_ray(&self, ndc_x: f32, ndc_y: f32) -> Option<Ray> {
        let inv_view_proj = self.view_projection_matrix()?.try_inverse()?;

        let unproject = |z: f32| {
            let h = inv_view_proj * Vec4::new(ndc_x, ndc_y, z, 1.0);
            Vec3::new(h.x / h.w, h.y / h.w, h.z / h.w)
        };

        Some(Ray::from_points(unproject(-1.0), unproject(1.0)))
    }
}

impl Pooled for Camera {
    fn pool_id(&self) -> Option<usize> {
        self.pool_id
    }

    fn set_pool_id(&mut self, id: Option<usize>) {
        self.pool_id = id;
    }
}
