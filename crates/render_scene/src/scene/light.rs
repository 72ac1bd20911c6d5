//! Scene lights

use crate::foundation::math::Vec3;

use super::node::Node;
use super::pool::Pooled;

/// Shape of the light's influence
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LightKind {
    /// Parallel rays along the node's -Z axis (sunlight)
    Directional,
    /// Radiates in all directions from the node position
    Sphere {
        /// Distance at which the light has no effect
        range: f32,
    },
    /// Cone along the node's -Z axis
    Spot {
        /// Distance at which the light has no effect
        range: f32,
        /// Full cone angle in radians
        angle: f32,
    },
}

/// A light source attached to a node
#[derive(Debug, Clone)]
pub struct Light {
    node: Node,
    /// Shape of the light
    pub kind: LightKind,
    /// RGB color values (0.0 to 1.0 range)
    pub color: Vec3,
    /// Intensity multiplier
    pub intensity: f32,
    enabled: bool,
    pool_id: Option<usize>,
}

impl Light {
    /// Create an enabled white light
    pub fn new(node: Node, kind: LightKind) -> Self {
        Self {
            node,
            kind,
            color: Vec3::new(1.0, 1.0, 1.0),
            intensity: 1.0,
            enabled: true,
            pool_id: None,
        }
    }

    /// Builder for color and intensity
    pub fn with_color(mut self, color: Vec3, intensity: f32) -> Self {
        self.color = color;
        self.intensity = intensity;
        self
    }

    /// Node carrying the light transform
    pub fn node(&self) -> &Node {
        &self.node
    }

    /// Mutable node, for moving the light
    pub fn node_mut(&mut self) -> &mut Node {
        &mut self.node
    }

    /// Whether the light contributes
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Enable or disable the light
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    /// Index in the scene's light pool, `None` when not attached
    pub fn pool_id(&self) -> Option<usize> {
        self.pool_id
    }

    /// World position of the light
    pub fn position(&self) -> Vec3 {
        self.node.transform().position
    }

    /// World direction the light shines along
    pub fn direction(&self) -> Vec3 {
        self.node.transform().rotation * Vec3::new(0.0, 0.0, -1.0)
    }

    /// Effective range, `None` for directional lights
    pub fn range(&self) -> Option<f32> {
        match self.kind {
            LightKind::Directional => None,
            LightKind::Sphere { range } | LightKind::Spot { range, .. } => Some(range),
        }
    }
}

impl Pooled for Light {
    fn pool_id(&self) -> Option<usize> {
        self.pool_id
    }

    fn set_pool_id(&mut self, id: Option<usize>) {
        self.pool_id = id;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::Quat;
    use crate::scene::NodeId;
    use approx::assert_relative_eq;

    #[test]
    fn test_direction_follows_node_rotation() {
        let mut node = Node::new(NodeId(3), "sun");
        node.set_rotation(Quat::from_axis_angle(&Vec3::y_axis(), std::f32::consts::FRAC_PI_2));
        let light = Light::new(node, LightKind::Directional);

        assert_relative_eq!(light.direction(), Vec3::new(-1.0, 0.0, 0.0), epsilon = 1e-6);
        assert_eq!(light.range(), None);
    }

    #[test]
    fn test_spot_range() {
        let light = Light::new(
            Node::new(NodeId(4), "spot"),
            LightKind::Spot { range: 12.0, angle: 0.5 },
        );
        assert_eq!(light.range(), Some(12.0));
    }
}
