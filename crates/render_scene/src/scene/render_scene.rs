//! The render scene
//!
//! [`Scene`] owns every model, camera and light it knows about and keeps
//! a pool of the ones currently attached. Scene-graph code creates
//! entities, attaches and detaches them, and moves their nodes; the
//! render-loop driver calls [`Scene::reset`] then [`Scene::tick`] once per
//! frame before any view processes the scene.
//!
//! ```text
//! reset -> tick -> (per view: cull / render, raycasts) -> next frame
//! ```

use crate::config::{ConfigError, SceneConfig};

use super::camera::Camera;
use super::error::{PoolCategory, SceneResult};
use super::light::Light;
use super::model::Model;
use super::pool::EntityPool;
use super::view::{View, ViewId};

slotmap::new_key_type! {
    /// Handle to a model owned by a [`Scene`]
    pub struct ModelKey;
    /// Handle to a camera owned by a [`Scene`]
    pub struct CameraKey;
    /// Handle to a light owned by a [`Scene`]
    pub struct LightKey;
}

/// Container of models, cameras, lights and views for one running session
#[derive(Debug)]
pub struct Scene {
    config: SceneConfig,
    pub(crate) models: EntityPool<ModelKey, Model>,
    cameras: EntityPool<CameraKey, Camera>,
    lights: EntityPool<LightKey, Light>,
    views: Vec<View>,
    debug_camera: Option<CameraKey>,
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}

impl Scene {
    /// Create a scene with the default configuration
    pub fn new() -> Self {
        Self::build(SceneConfig::default())
    }

    /// Create a scene from a validated configuration
    pub fn with_config(config: SceneConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::build(config))
    }

    fn build(config: SceneConfig) -> Self {
        log::info!(
            "Creating scene (pool capacity {}, overflow {:?})",
            config.pool_capacity,
            config.overflow
        );
        Self {
            models: EntityPool::new(PoolCategory::Model, config.pool_capacity, config.overflow),
            cameras: EntityPool::new(PoolCategory::Camera, config.pool_capacity, config.overflow),
            lights: EntityPool::new(PoolCategory::Light, config.pool_capacity, config.overflow),
            views: Vec::new(),
            debug_camera: None,
            config,
        }
    }

    /// Configuration the scene was built with
    pub fn config(&self) -> &SceneConfig {
        &self.config
    }

    // ---- Models ----

    /// Take ownership of a model; it is not attached yet
    pub fn create_model(&mut self, model: Model) -> ModelKey {
        self.models.create(model)
    }

    /// Detach and return a model, invalidating its key
    pub fn destroy_model(&mut self, key: ModelKey) -> Option<Model> {
        self.models.destroy(key)
    }

    /// Model by key, attached or not
    pub fn model(&self, key: ModelKey) -> Option<&Model> {
        self.models.get(key)
    }

    /// Mutable model by key
    pub fn model_mut(&mut self, key: ModelKey) -> Option<&mut Model> {
        self.models.get_mut(key)
    }

    /// Attach a model; returns `Ok(false)` if it was already attached
    pub fn add_model(&mut self, key: ModelKey) -> SceneResult<bool> {
        self.models.add(key)
    }

    /// Detach a model; returns `Ok(false)` if it was not attached
    pub fn remove_model(&mut self, key: ModelKey) -> SceneResult<bool> {
        self.models.remove(key)
    }

    /// Attached model at pool index `index`
    pub fn get_model(&self, index: usize) -> SceneResult<&Model> {
        self.models.at(index)
    }

    /// Key of the attached model at pool index `index`
    pub fn get_model_key(&self, index: usize) -> SceneResult<ModelKey> {
        self.models.key_at(index)
    }

    /// Number of attached models
    pub fn model_count(&self) -> usize {
        self.models.count()
    }

    /// Attached models in pool order
    pub fn models(&self) -> impl Iterator<Item = (ModelKey, &Model)> + '_ {
        self.models.iter()
    }

    // ---- Cameras ----

    /// Take ownership of a camera; it is not attached yet
    pub fn create_camera(&mut self, camera: Camera) -> CameraKey {
        self.cameras.create(camera)
    }

    /// Detach and return a camera, invalidating its key
    ///
    /// Clears the debug camera if it was this one.
    pub fn destroy_camera(&mut self, key: CameraKey) -> Option<Camera> {
        if self.debug_camera == Some(key) {
            self.debug_camera = None;
        }
        self.cameras.destroy(key)
    }

    /// Camera by key, attached or not
    pub fn camera(&self, key: CameraKey) -> Option<&Camera> {
        self.cameras.get(key)
    }

    /// Mutable camera by key
    pub fn camera_mut(&mut self, key: CameraKey) -> Option<&mut Camera> {
        self.cameras.get_mut(key)
    }

    /// Attach a camera; returns `Ok(false)` if it was already attached
    pub fn add_camera(&mut self, key: CameraKey) -> SceneResult<bool> {
        self.cameras.add(key)
    }

    /// Detach a camera; returns `Ok(false)` if it was not attached
    pub fn remove_camera(&mut self, key: CameraKey) -> SceneResult<bool> {
        self.cameras.remove(key)
    }

    /// Attached camera at pool index `index`
    pub fn get_camera(&self, index: usize) -> SceneResult<&Camera> {
        self.cameras.at(index)
    }

    /// Number of attached cameras
    pub fn camera_count(&self) -> usize {
        self.cameras.count()
    }

    /// Attached cameras in pool order
    pub fn cameras(&self) -> impl Iterator<Item = (CameraKey, &Camera)> + '_ {
        self.cameras.iter()
    }

    // ---- Lights ----

    /// Take ownership of a light; it is not attached yet
    pub fn create_light(&mut self, light: Light) -> LightKey {
        self.lights.create(light)
    }

    /// Detach and return a light, invalidating its key
    pub fn destroy_light(&mut self, key: LightKey) -> Option<Light> {
        self.lights.destroy(key)
    }

    /// Light by key, attached or not
    pub fn light(&self, key: LightKey) -> Option<&Light> {
        self.lights.get(key)
    }

    /// Mutable light by key
    pub fn light_mut(&mut self, key: LightKey) -> Option<&mut Light> {
        self.lights.get_mut(key)
    }

    /// Attach a light; returns `Ok(false)` if it was already attached
    pub fn add_light(&mut self, key: LightKey) -> SceneResult<bool> {
        self.lights.add(key)
    }

    /// Detach a light; returns `Ok(false)` if it was not attached
    pub fn remove_light(&mut self, key: LightKey) -> SceneResult<bool> {
        self.lights.remove(key)
    }

    /// Attached light at pool index `index`
    pub fn get_light(&self, index: usize) -> SceneResult<&Light> {
        self.lights.at(index)
    }

    /// Number of attached lights
    pub fn light_count(&self) -> usize {
        self.lights.count()
    }

    /// Attached lights in pool order
    pub fn lights(&self) -> impl Iterator<Item = (LightKey, &Light)> + '_ {
        self.lights.iter()
    }

    // ---- Views ----

    /// Append a view unless one with the same id is already attached
    pub fn add_view(&mut self, view: View) -> bool {
        if self.views.iter().any(|v| v.id() == view.id()) {
            return false;
        }
        log::debug!("Added view {:?}", view.id());
        self.views.push(view);
        true
    }

    /// Remove the view with id `id`, keeping the order of the rest
    pub fn remove_view(&mut self, id: ViewId) -> Option<View> {
        let index = self.views.iter().position(|v| v.id() == id)?;
        log::debug!("Removed view {:?}", id);
        Some(self.views.remove(index))
    }

    /// Attached views in rendering order
    pub fn views(&self) -> &[View] {
        &self.views
    }

    /// Mutable view by id
    pub fn view_mut(&mut self, id: ViewId) -> Option<&mut View> {
        self.views.iter_mut().find(|v| v.id() == id)
    }

    /// Number of attached views
    pub fn view_count(&self) -> usize {
        self.views.len()
    }

    /// Reorder views by ascending priority; equal priorities keep their order
    pub fn sort_views(&mut self) {
        self.views.sort_by_key(|v| v.priority);
    }

    // ---- Debug camera ----

    /// Replace the debug camera
    pub fn set_debug_camera(&mut self, camera: Option<CameraKey>) {
        self.debug_camera = camera;
    }

    /// Current debug camera, if it still exists
    pub fn debug_camera(&self) -> Option<CameraKey> {
        self.debug_camera.filter(|&key| self.cameras.get(key).is_some())
    }

    // ---- Frame ----

    /// Recompute world matrices and bounds of attached models that moved
    ///
    /// Call once per frame after [`reset`](Self::reset) and before any
    /// view or query reads the scene.
    pub fn tick(&mut self) {
        let mut updated = 0usize;
        self.models.for_each_mut(|model| {
            if model.update_transform() {
                updated += 1;
            }
        });
        log::trace!("Scene tick: {} of {} models updated", updated, self.models.count());
    }

    /// Clear the per-frame view marker on every attached model
    pub fn reset(&mut self) {
        self.models.for_each_mut(Model::clear_view);
    }

    /// Capacity of each entity pool
    pub fn pool_capacities(&self) -> [(PoolCategory, usize); 3] {
        [
            (PoolCategory::Model, self.models.capacity()),
            (PoolCategory::Camera, self.cameras.capacity()),
            (PoolCategory::Light, self.lights.capacity()),
        ]
    }
}
