//! Scene demo application
//!
//! Scatters quads around the origin, then runs a few frames of the
//! reset / tick / pick loop an editor would drive, casting rays through
//! random screen points of an orbiting camera.
//!
//! Usage: `scene_demo [config.toml|config.ron]`

use rand::Rng;
use render_scene::prelude::*;
use render_scene::scene::GeometryError;

const FRAMES: usize = 5;
const QUADS: u64 = 24;
const PICKS_PER_FRAME: usize = 8;

struct DemoApp {
    scene: Scene,
    camera: CameraKey,
    models: Vec<ModelKey>,
    results: RaycastResults,
    orbit_angle: f32,
}

impl DemoApp {
    fn new(config: SceneConfig) -> Result<Self, Box<dyn std::error::Error>> {
        log::info!("Creating scene demo...");
        let mut scene = Scene::with_config(config)?;

        let mut node = Node::new(NodeId(0), "main_camera");
        node.set_position(Vec3::new(0.0, 4.0, 12.0));
        let mut camera = Camera::perspective(node, 60.0, 16.0 / 9.0, 0.1, 100.0);
        camera.look_at(Vec3::zeros(), Vec3::y());
        let camera = scene.create_camera(camera);
        scene.add_camera(camera)?;

        let sun = Light::new(
            Node::new(NodeId(1), "sun"),
            LightKind::Directional,
        )
        .with_color(Vec3::new(1.0, 0.95, 0.8), 1.2);
        let sun = scene.create_light(sun);
        scene.add_light(sun)?;

        scene.add_view(View::new(ViewId(0)).with_camera(camera));
        scene.set_debug_camera(Some(camera));

        Ok(Self {
            scene,
            camera,
            models: Vec::new(),
            results: RaycastResults::with_capacity(QUADS as usize),
            orbit_angle: 0.0,
        })
    }

    fn initialize(&mut self) -> Result<(), Box<dyn std::error::Error>> {
        log::info!("Scattering {} quads...", QUADS);
        let mut rng = rand::thread_rng();

        for i in 0..QUADS {
            let mut node = Node::new(NodeId(100 + i), format!("quad_{i}"));
            node.set_transform(Transform::new(
                Vec3::new(
                    rng.gen_range(-6.0..6.0),
                    rng.gen_range(-3.0..3.0),
                    rng.gen_range(-6.0..6.0),
                ),
                Quat::from_axis_angle(&Vec3::y_axis(), rng.gen_range(0.0..std::f32::consts::TAU)),
                Vec3::repeat(rng.gen_range(0.5f32..2.0)),
            ));

            // Every fourth quad is editor-only and ignored by default picks
            let layer = if i % 4 == 3 { Layers::IGNORE_RAYCAST } else { Layers::DEFAULT };
            let model = Model::new(node)
                .with_sub_mesh(unit_quad()?.with_double_sided(true))
                .with_layer(layer);

            let key = self.scene.create_model(model);
            self.scene.add_model(key)?;
            self.models.push(key);
        }

        log::info!(
            "Scene ready: {} models, {} cameras, {} lights, {} views",
            self.scene.model_count(),
            self.scene.camera_count(),
            self.scene.light_count(),
            self.scene.view_count()
        );
        Ok(())
    }

    fn run(&mut self) -> Result<(), Box<dyn std::error::Error>> {
        let mut rng = rand::thread_rng();

        for frame in 0..FRAMES {
            self.scene.reset();
            self.scene.tick();

            let Some(camera) = self.scene.camera(self.camera) else {
                return Err("main camera was destroyed".into());
            };

            let mut picked = 0;
            for _ in 0..PICKS_PER_FRAME {
                let (x, y) = (rng.gen_range(-1.0..1.0), rng.gen_range(-1.0..1.0));
                let Some(ray) = camera.screen_point_to_ray(x, y) else {
                    log::warn!("Camera matrix is singular, skipping picks");
                    break;
                };

                if self.scene.raycast_default(&ray, &mut self.results) > 0 {
                    self.results.sort_by_distance();
                    if let Some(hit) = self.results.nearest() {
                        log::debug!(
                            "Frame {}: ({:.2}, {:.2}) picked node {:?} at {:.3}",
                            frame, x, y, hit.node, hit.distance
                        );
                    }
                    picked += 1;
                }
                log::trace!("{:?}", self.results.stats());
            }
            log::info!("Frame {}: {} of {} picks hit", frame, picked, PICKS_PER_FRAME);

            self.update_camera();
            self.churn_models(frame)?;
        }
        Ok(())
    }

    fn update_camera(&mut self) {
        self.orbit_angle += 0.4;
        if let Some(camera) = self.scene.camera_mut(self.camera) {
            let (sin, cos) = self.orbit_angle.sin_cos();
            camera.node_mut().set_position(Vec3::new(12.0 * sin, 4.0, 12.0 * cos));
            camera.look_at(Vec3::zeros(), Vec3::y());
        }
    }

    /// Detach one model and re-attach the previous one to exercise the pools
    fn churn_models(&mut self, frame: usize) -> Result<(), Box<dyn std::error::Error>> {
        let Some(&detach) = self.models.get(frame % self.models.len().max(1)) else {
            return Ok(());
        };
        self.scene.remove_model(detach)?;
        if frame > 0 {
            self.scene.add_model(self.models[(frame - 1) % self.models.len()])?;
        }
        log::debug!("Attached models after churn: {}", self.scene.model_count());
        Ok(())
    }
}

fn unit_quad() -> Result<SubMesh, GeometryError> {
    let vertices = VertexBuffer::positions(vec![
        -0.5, -0.5, 0.0,
        0.5, -0.5, 0.0,
        0.5, 0.5, 0.0,
        -0.5, 0.5, 0.0,
    ])?;
    SubMesh::new(vertices, IndexBuffer::U16(vec![0, 1, 2, 0, 2, 3]), PrimitiveMode::TriangleList)
}

fn load_config() -> Result<SceneConfig, ConfigError> {
    match std::env::args().nth(1) {
        Some(path) => {
            log::info!("Loading scene config from {}", path);
            SceneConfig::load_from_file(&path)
        }
        None => Ok(SceneConfig::default()),
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    render_scene::foundation::logging::init();

    log::info!("Starting scene demo");

    let config = load_config()?;
    let mut app = DemoApp::new(config)?;
    app.initialize()?;
    app.run()?;

    log::info!("Scene demo finished successfully");
    Ok(())
}
