use approx::assert_relative_eq;

use crate::foundation::math::Vec3;
use crate::geometry::Ray;
use crate::scene::{
    IndexBuffer, Layers, Model, Node, NodeId, PrimitiveMode, RaycastResults, Scene, SubMesh,
    VertexBuffer,
};

use super::fixtures::{quad_model, quad_model_at};

fn down_from(x: f32, y: f32) -> Ray {
    Ray::new(Vec3::new(x, y, 5.0), Vec3::new(0.0, 0.0, -1.0))
}

fn scene_with(models: Vec<Model>) -> Scene {
    let mut scene = Scene::new();
    for model in models {
        let key = scene.create_model(model);
        scene.add_model(key).unwrap();
    }
    scene.tick();
    scene
}

#[test]
fn test_ray_hits_unit_quad() {
    let scene = scene_with(vec![quad_model(42)]);
    let mut results = RaycastResults::new();

    let count = scene.raycast(&down_from(0.5, 0.5), &mut results, Layers::ALL);

    assert_eq!(count, 1);
    let hit = results.hits()[0];
    assert_eq!(hit.node, NodeId(42));
    assert_relative_eq!(hit.distance, 5.0, epsilon = 1e-5);
}

#[test]
fn test_ray_beside_quad_misses() {
    let scene = scene_with(vec![quad_model(42)]);
    let mut results = RaycastResults::new();

    assert_eq!(scene.raycast(&down_from(5.0, 5.0), &mut results, Layers::ALL), 0);
    assert!(results.is_empty());
}

#[test]
fn test_results_are_rewound_between_queries() {
    let scene = scene_with(vec![quad_model(1)]);
    let mut results = RaycastResults::new();

    scene.raycast(&down_from(0.5, 0.5), &mut results, Layers::ALL);
    assert_eq!(results.len(), 1);

    scene.raycast(&down_from(5.0, 5.0), &mut results, Layers::ALL);
    assert!(results.is_empty());
}

#[test]
fn test_layer_mask_filters_models() {
    let layer = Layers::from_bits_retain(0x2);
    let scene = scene_with(vec![quad_model(1).with_layer(layer)]);
    let mut results = RaycastResults::new();

    assert_eq!(scene.raycast(&down_from(0.5, 0.5), &mut results, Layers::from_bits_retain(0x1)), 0);
    assert_eq!(results.stats().layer_rejected, 1);

    assert_eq!(scene.raycast(&down_from(0.5, 0.5), &mut results, Layers::from_bits_retain(0x2)), 1);
}

#[test]
fn test_default_mask_skips_ignore_raycast_layer() {
    let scene = scene_with(vec![quad_model(1).with_layer(Layers::IGNORE_RAYCAST)]);
    let mut results = RaycastResults::new();

    assert_eq!(scene.raycast_default(&down_from(0.5, 0.5), &mut results), 0);
}

#[test]
fn test_broadphase_miss_walks_no_triangles() {
    let scene = scene_with(vec![
        quad_model(1),
        quad_model_at(2, Vec3::new(10.0, 0.0, 0.0)),
    ]);
    let mut results = RaycastResults::new();

    scene.raycast(&down_from(0.5, 0.5), &mut results, Layers::ALL);

    let stats = results.stats();
    assert_eq!(stats.models_tested, 2);
    assert_eq!(stats.broadphase_rejected, 1);
    // Only the hit quad's two triangles were tested
    assert_eq!(stats.triangles_tested, 2);
    assert_eq!(results.len(), 1);
    assert_eq!(results.hits()[0].node, NodeId(1));
}

#[test]
fn test_nearest_triangle_wins_per_model() {
    // Far triangle first in the index buffer
    #[rustfmt::skip]
    let vb = VertexBuffer::positions(vec![
        0.0, 0.0, -2.0,
        1.0, 0.0, -2.0,
        0.0, 1.0, -2.0,
        0.0, 0.0, 0.0,
        1.0, 0.0, 0.0,
        0.0, 1.0, 0.0,
    ])
    .unwrap();
    let mesh = SubMesh::new(vb, IndexBuffer::U32(vec![0, 1, 2, 3, 4, 5]), PrimitiveMode::TriangleList)
        .unwrap();
    let scene = scene_with(vec![Model::new(Node::new(NodeId(7), "stack")).with_sub_mesh(mesh)]);
    let mut results = RaycastResults::new();

    assert_eq!(scene.raycast(&down_from(0.25, 0.25), &mut results, Layers::ALL), 1);
    assert_relative_eq!(results.hits()[0].distance, 5.0, epsilon = 1e-5);
}

#[test]
fn test_tick_is_required_after_moving() {
    let mut scene = scene_with(vec![quad_model(1)]);
    let key = scene.get_model_key(0).unwrap();
    let mut results = RaycastResults::new();
    let ray = down_from(5.5, 0.5);

    scene
        .model_mut(key)
        .unwrap()
        .node_mut()
        .set_position(Vec3::new(5.0, 0.0, 0.0));

    // Stale transform until the next tick
    assert_eq!(scene.raycast(&ray, &mut results, Layers::ALL), 0);

    scene.tick();
    assert_eq!(scene.raycast(&ray, &mut results, Layers::ALL), 1);
    assert_relative_eq!(results.hits()[0].distance, 5.0, epsilon = 1e-5);
}

#[test]
fn test_distance_is_in_world_units_for_scaled_models() {
    let mut model = quad_model(1);
    model.node_mut().set_scale(Vec3::new(2.0, 2.0, 2.0));
    model.node_mut().set_position(Vec3::new(0.0, 0.0, 1.0));
    let scene = scene_with(vec![model]);
    let mut results = RaycastResults::new();

    assert_eq!(scene.raycast(&down_from(1.5, 1.5), &mut results, Layers::ALL), 1);
    assert_relative_eq!(results.hits()[0].distance, 4.0, epsilon = 1e-4);
}

#[test]
fn test_max_distance_cuts_far_hits() {
    let scene = scene_with(vec![quad_model(1)]);
    let mut results = RaycastResults::new();

    assert_eq!(scene.raycast_within(&down_from(0.5, 0.5), &mut results, Layers::ALL, 4.0), 0);
    assert_eq!(scene.raycast_within(&down_from(0.5, 0.5), &mut results, Layers::ALL, 6.0), 1);
}

#[test]
fn test_back_face_needs_double_sided() {
    let from_below = Ray::new(Vec3::new(0.5, 0.5, -5.0), Vec3::new(0.0, 0.0, 1.0));
    let mut results = RaycastResults::new();

    let single = scene_with(vec![quad_model(1)]);
    assert_eq!(single.raycast(&from_below, &mut results, Layers::ALL), 0);

    let double = scene_with(vec![
        Model::new(Node::new(NodeId(2), "two_sided"))
            .with_sub_mesh(super::fixtures::unit_quad().with_double_sided(true)),
    ]);
    assert_eq!(double.raycast(&from_below, &mut results, Layers::ALL), 1);
}

#[test]
fn test_disabled_and_non_triangle_models_are_skipped() {
    let mut disabled = quad_model(1);
    disabled.set_enabled(false);

    let lines = {
        let vb = VertexBuffer::positions(vec![0.0, 0.0, 0.0, 1.0, 1.0, 0.0]).unwrap();
        SubMesh::new(vb, IndexBuffer::U16(vec![0, 1]), PrimitiveMode::LineList).unwrap()
    };
    let wire = Model::new(Node::new(NodeId(2), "wire")).with_sub_mesh(lines);

    let scene = scene_with(vec![disabled, wire]);
    let mut results = RaycastResults::new();

    assert_eq!(scene.raycast(&down_from(0.5, 0.5), &mut results, Layers::ALL), 0);
    assert_eq!(results.stats().triangles_tested, 0);
}

#[test]
fn test_degenerate_ray_reports_no_hit() {
    let scene = scene_with(vec![quad_model(1)]);
    let mut results = RaycastResults::new();
    let ray = Ray::new(Vec3::new(0.5, 0.5, 5.0), Vec3::zeros());

    assert_eq!(scene.raycast(&ray, &mut results, Layers::ALL), 0);
}

#[test]
fn test_sort_by_distance_orders_models() {
    let scene = scene_with(vec![
        quad_model_at(1, Vec3::new(0.0, 0.0, -3.0)),
        quad_model_at(2, Vec3::new(0.0, 0.0, 1.0)),
    ]);
    let mut results = RaycastResults::new();

    assert_eq!(scene.raycast(&down_from(0.5, 0.5), &mut results, Layers::ALL), 2);
    assert_eq!(results.nearest().unwrap().node, NodeId(2));

    results.sort_by_distance();
    let order: Vec<_> = results.hits().iter().map(|h| h.node).collect();
    assert_eq!(order, vec![NodeId(2), NodeId(1)]);
}

#[test]
fn test_rays_along_quad_edges_hit() {
    let scene = scene_with(vec![
        quad_model(1),
        quad_model_at(2, Vec3::new(1.0, 0.0, 0.0)),
    ]);
    let mut results = RaycastResults::new();

    // Shared edge at x = 1 belongs to both quads
    assert_eq!(scene.raycast(&down_from(1.0, 0.5), &mut results, Layers::ALL), 2);
    assert_eq!(results.stats().broadphase_rejected, 0);
    for hit in results.hits() {
        assert_relative_eq!(hit.distance, 5.0, epsilon = 1e-5);
    }

    // Outer edge at x = 0
    assert_eq!(scene.raycast(&down_from(0.0, 0.5), &mut results, Layers::ALL), 1);
    assert_eq!(results.hits()[0].node, NodeId(1));
    assert_relative_eq!(results.hits()[0].distance, 5.0, epsilon = 1e-5);
}
