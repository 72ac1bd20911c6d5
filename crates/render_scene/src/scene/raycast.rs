//! Ray queries against attached models
//!
//! A query walks the model pool once. Each model is filtered by layer,
//! then the ray is moved into model space and tested against the local
//! AABB (broadphase). Only models whose box is hit have their triangles
//! walked (narrowphase), straight from the live vertex and index buffers.
//!
//! Results go into a caller-owned [`RaycastResults`] that is rewound, not
//! reallocated, on every query. Each hit model contributes one entry with
//! its nearest distance; entries come out in pool order.

use crate::foundation::collections::RecyclePool;
use crate::foundation::math::Mat4Ext;
use crate::geometry::intersect::{ray_aabb, ray_triangle};
use crate::geometry::Ray;

use super::mesh::PrimitiveMode;
use super::model::{HasBounds, HasTriangleGeometry, HasWorldTransform};
use super::node::NodeId;
use super::render_scene::{ModelKey, Scene};
use super::Layers;

/// One model hit by a ray
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RaycastHit {
    /// Node of the model that was hit
    pub node: NodeId,
    /// Model that was hit
    pub model: ModelKey,
    /// World-space distance from the ray origin to the nearest hit
    pub distance: f32,
}

impl RaycastHit {
    fn empty() -> Self {
        Self {
            node: NodeId(0),
            model: ModelKey::default(),
            distance: f32::INFINITY,
        }
    }
}

/// Counters from the last query
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RaycastStats {
    /// Attached models the query looked at
    pub models_tested: usize,
    /// Models skipped by the layer mask
    pub layer_rejected: usize,
    /// Models whose bounds the ray missed
    pub broadphase_rejected: usize,
    /// Ray-triangle tests performed
    pub triangles_tested: usize,
}

/// Reusable output of [`Scene::raycast`]
#[derive(Debug)]
pub struct RaycastResults {
    hits: RecyclePool<RaycastHit>,
    stats: RaycastStats,
}

impl Default for RaycastResults {
    fn default() -> Self {
        Self::new()
    }
}

impl RaycastResults {
    /// Results with room for a handful of hits
    pub fn new() -> Self {
        Self::with_capacity(8)
    }

    /// Results with `capacity` preallocated entries
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            hits: RecyclePool::new(RaycastHit::empty, capacity),
            stats: RaycastStats::default(),
        }
    }

    /// Hits from the last query, in pool order unless sorted
    pub fn hits(&self) -> &[RaycastHit] {
        self.hits.as_slice()
    }

    /// Number of hits from the last query
    pub fn len(&self) -> usize {
        self.hits.len()
    }

    /// Whether the last query hit nothing
    pub fn is_empty(&self) -> bool {
        self.hits.is_empty()
    }

    /// Counters from the last query
    pub fn stats(&self) -> &RaycastStats {
        &self.stats
    }

    /// Closest hit of the last query
    pub fn nearest(&self) -> Option<&RaycastHit> {
        self.hits
            .iter()
            .min_by(|a, b| a.distance.total_cmp(&b.distance))
    }

    /// Order hits nearest first
    pub fn sort_by_distance(&mut self) {
        self.hits.sort_by(|a, b| a.distance.total_cmp(&b.distance));
    }

    fn begin(&mut self) {
        self.hits.reset();
        self.stats = RaycastStats::default();
    }

    fn push(&mut self, hit: RaycastHit) {
        *self.hits.add() = hit;
    }
}

impl Scene {
    /// Cast a world-space ray against every attached model on `mask`
    ///
    /// Returns the number of models hit.
    pub fn raycast(&self, ray: &Ray, results: &mut RaycastResults, mask: Layers) -> usize {
        self.raycast_within(ray, results, mask, f32::INFINITY)
    }

    /// [`raycast`](Self::raycast) with the configured default mask
    pub fn raycast_default(&self, ray: &Ray, results: &mut RaycastResults) -> usize {
        self.raycast(ray, results, self.config().default_raycast_mask)
    }

    /// [`raycast`](Self::raycast) ignoring hits at or past `max_distance`
    pub fn raycast_within(
        &self,
        ray: &Ray,
        results: &mut RaycastResults,
        mask: Layers,
        max_distance: f32,
    ) -> usize {
        results.begin();

        for (key, model) in self.models.iter() {
            results.stats.models_tested += 1;

            if !model.is_enabled() {
                continue;
            }
            if !model.layer().matches(mask) {
                results.stats.layer_rejected += 1;
                continue;
            }

            if let Some(distance) = raycast_model(model, ray, max_distance, &mut results.stats) {
                results.push(RaycastHit {
                    node: model.node().id(),
                    model: key,
                    distance,
                });
            }
        }

        log::trace!(
            "Raycast hit {} models ({:?})",
            results.len(),
            results.stats
        );
        results.len()
    }
}

/// Nearest world-space hit distance of `ray` on one model
fn raycast_model<M>(model: &M, ray: &Ray, max_distance: f32, stats: &mut RaycastStats) -> Option<f32>
where
    M: HasWorldTransform + HasBounds + HasTriangleGeometry,
{
    let has_triangles = model
        .sub_meshes()
        .iter()
        .any(|sm| sm.primitive() == PrimitiveMode::TriangleList);
    if !has_triangles {
        return None;
    }

    let bounds = model.local_bounds()?;
    let inverse = model.inverse_world_matrix()?;
    let local_ray = ray.transformed(inverse);

    // Local distances times this give world distances
    let scale = model.world_matrix().transform_vector3(&local_ray.direction).norm();

    match ray_aabb(&local_ray, bounds) {
        Some(d) if d > 0.0 && d * scale < max_distance => {}
        _ => {
            log::trace!("Raycast broadphase missed");
            stats.broadphase_rejected += 1;
            return None;
        }
    }

    let mut nearest = f32::INFINITY;
    for sub_mesh in model.sub_meshes() {
        let double_sided = sub_mesh.is_double_sided();
        for triangle in sub_mesh.triangles() {
            stats.triangles_tested += 1;
            match ray_triangle(&local_ray, &triangle, double_sided) {
                Some(d) if d > 0.0 && d < nearest => nearest = d,
                _ => {}
            }
        }
    }

    let distance = nearest * scale;
    log::trace!("Raycast narrowphase nearest {}", distance);
    (distance < max_distance).then_some(distance)
}
