//! Render scene
//!
//! The scene is the container the render loop and editor tooling talk to:
//!
//! ```text
//! Scene-graph code ── create / add / remove ──▶ Scene ◀── reset / tick ── Render loop
//!                                                 │
//!                                                 └── raycast ──▶ Editor tooling
//! ```
//!
//! - Models, cameras and lights are owned by the scene and referenced by
//!   typed keys. Attached ones sit in dense pools with O(1) removal.
//! - Views are an ordered list without duplicates.
//! - Queries read models through the [`HasWorldTransform`], [`HasBounds`]
//!   and [`HasTriangleGeometry`] capabilities.

mod camera;
mod error;
mod layers;
mod light;
pub mod mesh;
mod model;
mod node;
mod pool;
#[cfg(feature = "raycast")]
mod raycast;
mod render_scene;
mod view;

#[cfg(test)]
mod tests;

pub use camera::{Camera, ClearFlags};
pub use error::{PoolCategory, SceneError, SceneResult};
pub use layers::Layers;
pub use light::{Light, LightKind};
pub use mesh::{
    AttributeName, GeometryError, IndexBuffer, PrimitiveMode, SubMesh, VertexAttribute,
    VertexBuffer,
};
pub use model::{HasBounds, HasTriangleGeometry, HasWorldTransform, Model};
pub use node::{Node, NodeId};
#[cfg(feature = "raycast")]
pub use raycast::{RaycastHit, RaycastResults, RaycastStats};
pub use render_scene::{CameraKey, LightKey, ModelKey, Scene};
pub use view::{View, ViewId};
