use cubefall_geom::{Cell, Vec3};
use cubefall_physics::{BodyId, CollisionWorld, QueryFilter, VoxelScene};

fn approx(a: f32, b: f32) -> bool {
    (a - b).abs() <= 1e-4
}

#[test]
fn ray_down_hits_floor_when_empty() {
    let scene = VoxelScene::new(-0.5);
    let hit = scene
        .raycast(Vec3::new(0.0, 3.0, 0.0), Vec3::DOWN, 10.0, QueryFilter::none())
        .expect("floor below");
    assert_eq!(hit.body, BodyId::FLOOR);
    assert!(approx(hit.distance, 3.5));
    assert!(approx(hit.point.y, -0.5));
    assert_eq!(hit.normal, Vec3::UP);
}

#[test]
fn ray_respects_max_distance() {
    let scene = VoxelScene::new(-0.5);
    assert!(scene
        .raycast(Vec3::new(0.0, 3.0, 0.0), Vec3::DOWN, 1.0, QueryFilter::none())
        .is_none());
}

#[test]
fn ray_down_hits_top_face_of_settled_cube() {
    let mut scene = VoxelScene::new(-0.5);
    scene.insert_body(BodyId(5), [Cell::new(0, 0, 0)]);
    let hit = scene
        .raycast(Vec3::new(0.1, 2.5, -0.2), Vec3::DOWN, 10.0, QueryFilter::none())
        .unwrap();
    assert_eq!(hit.body, BodyId(5));
    assert!(approx(hit.distance, 2.0));
    assert!(approx(hit.point.y, 0.5));
    assert_eq!(hit.normal, Vec3::UP);
}

#[test]
fn ray_ignores_filtered_body() {
    let mut scene = VoxelScene::new(-0.5);
    scene.insert_body(BodyId(5), [Cell::new(0, 0, 0)]);
    let hit = scene
        .raycast(Vec3::new(0.0, 2.5, 0.0), Vec3::DOWN, 10.0, QueryFilter::excluding(BodyId(5)))
        .unwrap();
    assert_eq!(hit.body, BodyId::FLOOR);
}

#[test]
fn ray_from_side_reports_side_normal() {
    let mut scene = VoxelScene::new(-0.5);
    scene.insert_body(BodyId(2), [Cell::new(3, 0, 0)]);
    let hit = scene
        .raycast(Vec3::new(0.0, 0.0, 0.0), Vec3::RIGHT, 10.0, QueryFilter::none())
        .unwrap();
    assert_eq!(hit.body, BodyId(2));
    assert!(approx(hit.distance, 2.5));
    assert_eq!(hit.normal, Vec3::LEFT);
}

#[test]
fn slanted_tap_ray_lands_on_floor() {
    let scene = VoxelScene::new(-0.5);
    let origin = Vec3::new(0.0, 9.5, -10.0);
    let dir = Vec3::new(0.0, -1.0, 1.0);
    let hit = scene.raycast(origin, dir, 100.0, QueryFilter::none()).unwrap();
    assert!(approx(hit.point.y, -0.5));
    assert!(approx(hit.point.z, 0.0));
}

#[test]
fn boxcast_finds_edge_overlap() {
    let mut scene = VoxelScene::new(-0.5);
    scene.insert_body(BodyId(3), [Cell::new(1, 0, 0)]);
    // A thin box whose edge overhangs x = 0.5 still catches the cube at x = 1.
    let hit = scene
        .boxcast(
            Vec3::new(0.45, 3.0, 0.0),
            Vec3::splat(0.1),
            Vec3::DOWN,
            20.0,
            QueryFilter::none(),
        )
        .unwrap();
    assert_eq!(hit.body, BodyId(3));
    assert!(approx(hit.distance, 2.4));
    assert!(approx(hit.point.y, 0.5));
}

#[test]
fn boxcast_floor_contact_point() {
    let scene = VoxelScene::new(-0.5);
    let hit = scene
        .boxcast(Vec3::new(2.0, 1.0, 2.0), Vec3::splat(0.05), Vec3::DOWN, 20.0, QueryFilter::none())
        .unwrap();
    assert_eq!(hit.body, BodyId::FLOOR);
    assert!(approx(hit.distance, 1.45));
    assert!(approx(hit.point.y, -0.5));
}

#[test]
fn bodies_can_be_listed_and_removed() {
    let mut scene = VoxelScene::new(-0.5);
    assert_eq!(scene.insert_body(BodyId(2), [Cell::new(0, 0, 0), Cell::new(0, 1, 0)]), 2);
    // Taken cells keep their owner
    assert_eq!(scene.insert_body(BodyId(3), [Cell::new(0, 1, 0), Cell::new(1, 0, 0)]), 1);
    assert_eq!(scene.body_at(Cell::new(0, 1, 0)), Some(BodyId(2)));
    assert_eq!(scene.column_top(0, 0), Some(1));
    assert_eq!(scene.max_height(), Some(1));
    assert_eq!(scene.cells_of(BodyId(2)), vec![Cell::new(0, 0, 0), Cell::new(0, 1, 0)]);

    let removed = scene.remove_body(BodyId(2));
    assert_eq!(removed.len(), 2);
    assert_eq!(scene.len(), 1);
    assert!(scene.is_occupied(Cell::new(1, 0, 0)));
    assert_eq!(scene.remove_cell(Cell::new(1, 0, 0)), Some(BodyId(3)));
    assert!(scene.is_empty());
}
