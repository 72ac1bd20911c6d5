//! # Render Scene
//!
//! The scene core of a real-time renderer: pooled models, cameras and
//! lights, an ordered list of views, the per-frame transform update and
//! ray queries against live mesh buffers.
//!
//! ## Features
//!
//! - **Pooled Entities**: O(1) attach and detach with swap-and-pop pools
//! - **Frame Lifecycle**: `reset` then `tick` once per frame
//! - **Ray Queries**: layer-masked broadphase/narrowphase raycasts (`raycast` feature)
//! - **Configurable**: pool sizing and overflow policy from TOML or RON
//!
//! ## Quick Start
//!
//! ```rust
//! use render_scene::prelude::*;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut scene = Scene::with_config(SceneConfig::default())?;
//!
//! let quad = VertexBuffer::positions(vec![
//!     0.0, 0.0, 0.0,  1.0, 0.0, 0.0,  1.0, 1.0, 0.0,  0.0, 1.0, 0.0,
//! ])?;
//! let mesh = SubMesh::new(quad, IndexBuffer::U16(vec![0, 1, 2, 0, 2, 3]), PrimitiveMode::TriangleList)?;
//! let key = scene.create_model(Model::new(Node::new(NodeId(1), "quad")).with_sub_mesh(mesh));
//! scene.add_model(key)?;
//!
//! // Once per frame
//! scene.reset();
//! scene.tick();
//!
//! let mut results = RaycastResults::new();
//! let ray = Ray::new(Vec3::new(0.5, 0.5, 5.0), Vec3::new(0.0, 0.0, -1.0));
//! assert_eq!(scene.raycast(&ray, &mut results, Layers::ALL), 1);
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names)]

pub mod config;
pub mod foundation;
pub mod geometry;
pub mod scene;

/// Common imports for scene users
pub mod prelude {
    pub use crate::{
        config::{Config, ConfigError, SceneConfig},
        foundation::{
            collections::{FixedArray, OverflowPolicy, RecyclePool},
            math::{Mat4, Quat, Transform, Vec3},
        },
        geometry::{Aabb, Ray, Triangle},
        scene::{
            Camera, CameraKey, IndexBuffer, Layers, Light, LightKey, LightKind, Model, ModelKey,
            Node, NodeId, PrimitiveMode, Scene, SceneError, SubMesh, VertexBuffer, View, ViewId,
        },
    };

    #[cfg(feature = "raycast")]
    pub use crate::scene::{RaycastHit, RaycastResults};
}
