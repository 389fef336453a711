use cubefall_game::{Game, GameConfig, GameEvent, RoundController, RoundState, ShapeSource};
use cubefall_geom::{Cell, Vec3};
use cubefall_grid::PlacementError;
use cubefall_physics::BodyId;

const DT: f32 = 1.0 / 60.0;

fn game() -> Game {
    Game::new(GameConfig::default(), Some(7)).unwrap()
}

/// Steps until `done` holds; returns the number of frames taken.
fn run_until(g: &mut Game, max_frames: usize, done: impl Fn(&Game) -> bool) -> usize {
    for frame in 0..max_frames {
        if done(g) {
            return frame;
        }
        g.update(DT);
    }
    panic!("condition not reached within {} frames (state {:?})", max_frames, g.state());
}

#[test]
fn controller_only_follows_known_edges() {
    let mut rc = RoundController::new(5.0);
    assert_eq!(rc.state(), RoundState::Idle);
    assert!(rc.transition(RoundState::Falling).is_none());
    assert_eq!(rc.state(), RoundState::Idle);
    assert_eq!(rc.transition(RoundState::Countdown), Some(RoundState::Idle));
    assert_eq!(rc.round(), 1);
    assert!((rc.remaining() - 5.0).abs() < 1e-6);
    assert!(rc.transition(RoundState::Grounded).is_none());
}

#[test]
fn controller_tick_reports_expiry_once() {
    let mut rc = RoundController::new(1.0);
    assert!(!rc.tick(0.5), "idle controller must not count down");
    rc.transition(RoundState::Countdown);
    assert!(!rc.tick(0.6));
    assert!(rc.tick(0.6));
    assert_eq!(rc.remaining(), 0.0);
    assert!(!rc.tick(0.6));
}

#[test]
fn placement_is_locked_outside_countdown() {
    let mut g = game();
    assert_eq!(g.try_place(Cell::new(0, 0, 0)), Err(PlacementError::Locked));
    g.start();
    assert_eq!(g.state(), RoundState::Countdown);
    assert!(g.try_place(Cell::new(0, 0, 0)).is_ok());
}

#[test]
fn placement_grows_a_connected_shape() {
    let mut g = game();
    g.start();
    assert!(g.try_place(Cell::new(0, 0, 0)).is_ok());
    assert_eq!(
        g.try_place(Cell::new(2, 0, 0)),
        Err(PlacementError::NotAdjacent(Cell::new(2, 0, 0)))
    );
    assert_eq!(
        g.try_place(Cell::new(0, 0, 0)),
        Err(PlacementError::Occupied(Cell::new(0, 0, 0)))
    );
    assert_eq!(
        g.try_place(Cell::new(0, -1, 0)),
        Err(PlacementError::BelowFloor(Cell::new(0, -1, 0)))
    );
    assert!(g.try_place(Cell::new(1, 0, 0)).is_ok());
    assert_eq!(g.pending().len(), 2);
    assert_eq!(g.scene().body_at(Cell::new(1, 0, 0)), Some(BodyId::PENDING));

    let events: Vec<GameEvent> = g.drain_events().into_iter().map(|e| e.kind).collect();
    let placed = events
        .iter()
        .filter(|e| matches!(e, GameEvent::CubePlaced { .. }))
        .count();
    let rejected = events
        .iter()
        .filter(|e| matches!(e, GameEvent::PlacementRejected { .. }))
        .count();
    assert_eq!((placed, rejected), (2, 3));
}

#[test]
fn player_shape_falls_and_settles() {
    let mut g = game();
    g.start();
    g.try_place(Cell::new(0, 0, 0)).unwrap();
    g.try_place(Cell::new(0, 1, 0)).unwrap();
    g.try_place(Cell::new(1, 1, 0)).unwrap();

    run_until(&mut g, 400, |g| g.state() != RoundState::Countdown);
    assert_eq!(g.state(), RoundState::Falling);
    assert!(g.pending().is_empty());
    assert_eq!(g.try_place(Cell::new(3, 0, 0)), Err(PlacementError::Locked));

    run_until(&mut g, 600, |g| g.state() == RoundState::Countdown);
    assert_eq!(g.round(), 2);
    assert!(g.falling().is_none());
    let mut cells: Vec<Cell> = g.settled_cubes().map(|(c, _)| c).collect();
    cells.sort();
    assert_eq!(
        cells,
        vec![Cell::new(0, 0, 0), Cell::new(0, 1, 0), Cell::new(1, 1, 0)]
    );
    assert!(g.scene().cells_of(BodyId::PENDING).is_empty());

    let kinds: Vec<GameEvent> = g.drain_events().into_iter().map(|e| e.kind).collect();
    assert!(kinds.contains(&GameEvent::CountdownExpired { placed: 3 }));
    assert!(kinds.iter().any(|e| matches!(
        e,
        GameEvent::ShapeReleased { cubes: 3, source: ShapeSource::Player, .. }
    )));
    assert!(kinds.iter().any(|e| matches!(e, GameEvent::ShapeLanded { .. })));
    assert!(kinds.contains(&GameEvent::RoundStarted { round: 2 }));
}

#[test]
fn empty_round_spawns_random_group() {
    let mut g = game();
    g.start();
    run_until(&mut g, 400, |g| g.state() != RoundState::Countdown);
    let falling = g.falling().expect("random group released");
    assert_eq!(falling.source, ShapeSource::Random);
    assert!(falling.group.len() >= 2);

    run_until(&mut g, 60 * 30, |g| g.state() == RoundState::Countdown);
    assert!(g.scene().len() >= 2);
    assert!(g.settled_cubes().all(|(c, _)| c.y >= 0));
    let kinds: Vec<GameEvent> = g.drain_events().into_iter().map(|e| e.kind).collect();
    assert!(kinds.contains(&GameEvent::CountdownExpired { placed: 0 }));
    assert!(kinds.iter().any(|e| matches!(
        e,
        GameEvent::ShapeReleased { source: ShapeSource::Random, .. }
    )));
}

#[test]
fn second_shape_stacks_on_the_first() {
    let mut g = game();
    g.start();
    g.try_place(Cell::new(0, 0, 0)).unwrap();
    run_until(&mut g, 60 * 20, |g| g.round() == 2);

    // A cube placed high up falls onto the settled one.
    g.try_place(Cell::new(0, 5, 0)).unwrap();
    run_until(&mut g, 60 * 20, |g| g.round() == 3);
    assert!(g.scene().is_occupied(Cell::new(0, 1, 0)));
    assert!(!g.scene().is_occupied(Cell::new(0, 5, 0)));
    assert_eq!(g.scene().column_top(0, 0), Some(1));
}

#[test]
fn tap_targets_the_cell_outside_the_hit_face() {
    let mut g = game();
    g.start();
    let from_above = Vec3::new(0.0, 10.0, 0.0);
    assert!(g.tap(from_above, Vec3::DOWN).is_ok());
    assert!(g.pending().contains(Cell::new(0, 0, 0)));

    assert_eq!(g.tap_target(from_above, Vec3::DOWN), Ok(Cell::new(0, 1, 0)));
    assert!(g.tap(from_above, Vec3::DOWN).is_ok());
    assert!(g.pending().contains(Cell::new(0, 1, 0)));

    assert_eq!(g.tap(from_above, Vec3::UP), Err(PlacementError::Missed));
}

#[test]
fn boost_carries_over_to_the_released_group() {
    let mut g = game();
    g.start();
    g.try_place(Cell::new(0, 3, 0)).unwrap();
    g.set_boost(true);
    run_until(&mut g, 400, |g| g.state() == RoundState::Falling);
    let group = &g.falling().unwrap().group;
    assert!(group.is_boosted());
    assert!((group.current_fall_interval() - 0.5 / 3.0).abs() < 1e-5);

    g.set_boost(false);
    assert!(!g.falling().unwrap().group.is_boosted());
}

#[test]
fn nudge_moves_the_falling_group_sideways() {
    let mut g = game();
    g.start();
    g.try_place(Cell::new(0, 6, 0)).unwrap();
    assert!(!g.nudge(1), "nothing is falling yet");
    run_until(&mut g, 400, |g| g.state() == RoundState::Falling);
    assert!(g.nudge(1));
    run_until(&mut g, 60 * 20, |g| g.round() == 2);
    assert!(g.scene().is_occupied(Cell::new(1, 0, 0)));
}

#[test]
fn queued_config_applies_at_round_boundary() {
    let mut g = game();
    g.start();
    let mut cfg = GameConfig::default();
    cfg.round.countdown_secs = 2.0;
    g.queue_config(cfg).unwrap();
    assert!((g.remaining() - 5.0).abs() < 1e-6);

    run_until(&mut g, 60 * 30, |g| g.round() == 2);
    assert!((g.remaining() - 2.0).abs() < 1e-6);
    assert!(
        g.drain_events()
            .iter()
            .any(|e| e.kind == GameEvent::ConfigApplied)
    );
}

#[test]
fn invalid_config_is_refused() {
    let mut g = game();
    let mut cfg = GameConfig::default();
    cfg.round.countdown_secs = 0.0;
    assert!(g.queue_config(cfg.clone()).is_err());
    assert!(Game::new(cfg, None).is_err());
}

#[test]
fn board_full_clears_the_scene() {
    let mut cfg = GameConfig::default();
    cfg.board.max_height = 1;
    // A single vertical domino per spawn.
    cfg.spawner.max_width = 1;
    cfg.spawner.max_height = 2;
    cfg.spawner.min_cubes = 2;
    cfg.spawner.max_cubes = 2;
    cfg.spawner.min_shapes = 1;
    cfg.spawner.max_shapes = 1;
    cfg.spawner.spawn_delay = 0.0;
    let mut g = Game::new(cfg, Some(3)).unwrap();
    g.start();
    run_until(&mut g, 60 * 30, |g| g.round() == 2);
    assert!(g.scene().is_empty());
    assert!(
        g.drain_events()
            .iter()
            .any(|e| e.kind == GameEvent::BoardFull { height: 1 })
    );
}

#[test]
fn events_are_ordered() {
    let mut g = game();
    g.start();
    g.try_place(Cell::new(0, 0, 0)).unwrap();
    run_until(&mut g, 60 * 20, |g| g.round() == 2);
    let events = g.drain_events();
    assert!(events.len() >= 6);
    for pair in events.windows(2) {
        assert!(pair[0].id < pair[1].id);
        assert!(pair[0].tick <= pair[1].tick);
    }
    assert!(g.drain_events().is_empty());
}

#[test]
fn check_placement_is_a_dry_run() {
    let mut g = game();
    assert_eq!(g.check_placement(Cell::new(0, 0, 0)), Err(PlacementError::Locked));
    g.start();
    assert_eq!(g.check_placement(Cell::new(0, 0, 0)), Ok(()));
    assert!(g.pending().is_empty());
    assert!(g.drain_events().iter().all(|e| !matches!(e.kind, GameEvent::CubePlaced { .. })));
}
