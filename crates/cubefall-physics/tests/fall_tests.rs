use cubefall_geom::{Cell, Vec3};
use cubefall_physics::{
    BodyId, CollisionWorld, FallMode, FallParams, FallPhase, Hit, Landing, QueryFilter,
    ShapeGroup, VoxelScene,
};

const DT: f32 = 1.0 / 60.0;

fn run_until_landed(group: &mut ShapeGroup, scene: &VoxelScene, max_secs: f32) -> Option<Landing> {
    let frames = (max_secs / DT) as usize;
    for _ in 0..frames {
        if let Some(l) = group.update(DT, scene) {
            return Some(l);
        }
    }
    None
}

#[test]
fn single_cube_lands_on_floor_row_zero() {
    let scene = VoxelScene::new(-0.5);
    let mut g = ShapeGroup::from_positions(
        BodyId(7),
        &[Vec3::new(0.0, 5.0, 0.0)],
        FallParams::default(),
    );
    let landing = run_until_landed(&mut g, &scene, 10.0).expect("lands");
    assert_eq!(landing.body, BodyId(7));
    assert_eq!(landing.cells, vec![Cell::new(0, 0, 0)]);
    assert_eq!(landing.positions, vec![Vec3::new(0.0, 0.0, 0.0)]);
    assert!(g.is_grounded());
    // Stays put afterwards
    assert!(g.update(DT, &scene).is_none());
}

#[test]
fn group_rests_on_highest_obstruction() {
    let mut scene = VoxelScene::new(-0.5);
    // A two-high tower under the right cube only.
    scene.insert_body(BodyId(2), [Cell::new(1, 0, 0), Cell::new(1, 1, 0)]);
    let mut g = ShapeGroup::from_positions(
        BodyId(9),
        &[Vec3::new(0.0, 8.0, 0.0), Vec3::new(1.0, 8.0, 0.0)],
        FallParams::default(),
    );
    let landing = run_until_landed(&mut g, &scene, 20.0).expect("lands");
    assert_eq!(landing.cells, vec![Cell::new(0, 2, 0), Cell::new(1, 2, 0)]);
}

#[test]
fn already_resting_group_lands_on_first_step() {
    let scene = VoxelScene::new(-0.5);
    let mut g = ShapeGroup::from_positions(BodyId(4), &[Vec3::ZERO], FallParams::default());
    let mut landed = None;
    for _ in 0..40 {
        landed = landed.or(g.update(DT, &scene));
    }
    assert_eq!(landed.expect("lands").cells, vec![Cell::new(0, 0, 0)]);
}

#[test]
fn start_delay_holds_the_group() {
    let scene = VoxelScene::new(-0.5);
    let params = FallParams {
        start_delay: 1.0,
        ..FallParams::default()
    };
    let mut g = ShapeGroup::from_positions(BodyId(4), &[Vec3::new(0.0, 6.0, 0.0)], params);
    for _ in 0..50 {
        assert!(g.update(DT, &scene).is_none());
    }
    assert_eq!(g.origin(), Vec3::new(0.0, 6.0, 0.0));
    assert!(matches!(g.phase(), FallPhase::Delayed { .. }));
    assert!(run_until_landed(&mut g, &scene, 10.0).is_some());
}

#[test]
fn boost_divides_interval_and_restores() {
    let mut g = ShapeGroup::from_positions(BodyId(4), &[Vec3::ZERO], FallParams::default());
    g.set_boost(true);
    g.set_boost(true);
    assert!(g.is_boosted());
    assert!((g.current_fall_interval() - 0.5 / 3.0).abs() < 1e-6);
    g.set_boost(false);
    assert!(!g.is_boosted());
    assert!((g.current_fall_interval() - 0.5).abs() < 1e-6);
}

#[test]
fn boosted_group_lands_sooner() {
    let scene = VoxelScene::new(-0.5);
    let start = [Vec3::new(0.0, 9.0, 0.0)];
    let count_frames = |boost: bool| {
        let mut g = ShapeGroup::from_positions(BodyId(4), &start, FallParams::default());
        g.set_boost(boost);
        let mut frames = 0;
        while g.update(DT, &scene).is_none() {
            frames += 1;
            assert!(frames < 10_000);
        }
        frames
    };
    assert!(count_frames(true) < count_frames(false));
}

#[test]
fn glide_mode_lands_on_the_same_cells() {
    let mut scene = VoxelScene::new(-0.5);
    scene.insert_body(BodyId(2), [Cell::new(0, 0, 0)]);
    let params = FallParams {
        mode: FallMode::Glide,
        ..FallParams::default()
    };
    let mut g = ShapeGroup::from_positions(
        BodyId(8),
        &[Vec3::new(0.0, 7.0, 0.0), Vec3::new(1.0, 7.0, 0.0)],
        params,
    );
    let landing = run_until_landed(&mut g, &scene, 10.0).expect("lands");
    assert_eq!(landing.cells, vec![Cell::new(0, 1, 0), Cell::new(1, 1, 0)]);
}

#[test]
fn shift_blocked_by_neighbor_and_bounds() {
    let mut scene = VoxelScene::new(-0.5);
    scene.insert_body(BodyId(2), [Cell::new(2, 4, 0)]);
    let mut g = ShapeGroup::from_positions(
        BodyId(8),
        &[Vec3::new(0.0, 4.0, 0.0)],
        FallParams::default(),
    );
    let range = (-3.0, 3.0);
    assert!(g.try_shift(1, &scene, range));
    assert_eq!(g.origin(), Vec3::new(1.0, 4.0, 0.0));
    // Settled cube at x = 2
    assert!(!g.try_shift(1, &scene, range));
    assert!(g.try_shift(-1, &scene, range));
    assert!(g.try_shift(-1, &scene, range));
    assert!(g.try_shift(-1, &scene, range));
    assert!(g.try_shift(-1, &scene, range));
    // Board edge at x = -3
    assert!(!g.try_shift(-1, &scene, range));
    assert_eq!(g.origin().x, -3.0);
}

#[test]
fn groups_without_ground_give_up_below_kill_height() {
    struct Void;
    impl CollisionWorld for Void {
        fn raycast(&self, _: Vec3, _: Vec3, _: f32, _: QueryFilter) -> Option<Hit> {
            None
        }
        fn boxcast(&self, _: Vec3, _: Vec3, _: Vec3, _: f32, _: QueryFilter) -> Option<Hit> {
            None
        }
    }
    let params = FallParams {
        kill_y: -3.0,
        fall_interval: 0.01,
        ..FallParams::default()
    };
    let mut g = ShapeGroup::from_positions(BodyId(4), &[Vec3::new(0.0, 0.0, 0.0)], params);
    let mut landed = None;
    for _ in 0..10_000 {
        if let Some(l) = g.update(DT, &Void) {
            landed = Some(l);
            break;
        }
    }
    assert!(landed.expect("gives up").cells[0].y < -3);

    // Glide mode settles in place straight away.
    let glide = FallParams {
        mode: FallMode::Glide,
        ..FallParams::default()
    };
    let mut g = ShapeGroup::from_positions(BodyId(5), &[Vec3::new(0.0, 4.0, 0.0)], glide);
    let l = g.update(DT, &Void).expect("settles");
    assert_eq!(l.cells, vec![Cell::new(0, 4, 0)]);
}

#[test]
fn nudge_during_partial_drop_replans_in_new_column() {
    let mut scene = VoxelScene::new(-0.5);
    scene.insert_body(BodyId(2), [Cell::new(0, 1, 0)]);
    let mut g = ShapeGroup::from_positions(
        BodyId(8),
        &[Vec3::new(0.0, 4.0, 0.0)],
        FallParams::default(),
    );
    // Step down until the drop that would stop on the cube at (0,1,0).
    let mut frames = 0;
    while !matches!(
        g.phase(),
        FallPhase::Moving {
            land_on_arrival: true,
            ..
        }
    ) {
        assert!(g.update(DT, &scene).is_none(), "landed before the partial drop");
        frames += 1;
        assert!(frames < 1_000);
    }
    assert!(g.try_shift(1, &scene, (-3.0, 3.0)));
    let landing = run_until_landed(&mut g, &scene, 10.0).expect("lands");
    assert_eq!(landing.cells, vec![Cell::new(1, 0, 0)]);
}

#[test]
fn nudge_during_glide_stops_on_taller_tower() {
    let mut scene = VoxelScene::new(-0.5);
    scene.insert_body(BodyId(2), (0..=3).map(|y| Cell::new(1, y, 0)));
    let params = FallParams {
        mode: FallMode::Glide,
        ..FallParams::default()
    };
    let mut g = ShapeGroup::from_positions(BodyId(8), &[Vec3::new(0.0, 8.0, 0.0)], params);
    assert!(g.update(DT, &scene).is_none());
    assert!(matches!(g.phase(), FallPhase::Moving { .. }));
    assert!(g.try_shift(1, &scene, (-3.0, 3.0)));
    let landing = run_until_landed(&mut g, &scene, 10.0).expect("lands");
    assert_eq!(landing.cells, vec![Cell::new(1, 4, 0)]);
}
