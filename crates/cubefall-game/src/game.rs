use std::collections::BTreeMap;

use cubefall_geom::{Cell, Vec3};
use cubefall_grid::{
    CubeId, CubeSet, PlacementError, PlacementValidator, nearest_connection_point, resolve_tap,
};
use cubefall_physics::{BodyId, CollisionWorld, Landing, QueryFilter, ShapeGroup, VoxelScene};
use cubefall_shapes::{ShapeColor, build_spawn_group};
use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::config::{ConfigError, GameConfig};
use crate::countdown::{countdown_label, display_seconds};
use crate::event::{EventEnvelope, EventQueue, GameEvent, ShapeSource};
use crate::round::{RoundController, RoundState};

/// The group currently in the air.
#[derive(Clone, Debug)]
pub struct FallingShape {
    pub group: ShapeGroup,
    pub color: ShapeColor,
    pub source: ShapeSource,
}

/// One game session: round flow, the shape being built, the falling group and
/// every settled cube.
pub struct Game {
    config: GameConfig,
    rng: StdRng,
    round: RoundController,
    scene: VoxelScene,
    pending: CubeSet,
    validator: PlacementValidator,
    falling: Option<FallingShape>,
    colors: BTreeMap<BodyId, ShapeColor>,
    next_body: u32,
    events: EventQueue,
    queued_config: Option<GameConfig>,
    boost_held: bool,
}

impl Game {
    /// `seed` makes shape generation and colours reproducible.
    pub fn new(config: GameConfig, seed: Option<u64>) -> Result<Self, ConfigError> {
        config.validate()?;
        let rng = match seed {
            Some(s) => StdRng::seed_from_u64(s),
            None => StdRng::from_entropy(),
        };
        Ok(Self {
            round: RoundController::new(config.round.countdown_secs),
            scene: VoxelScene::new(config.board.floor_y),
            validator: PlacementValidator::new(config.board_bounds()),
            config,
            rng,
            pending: CubeSet::new(),
            falling: None,
            colors: BTreeMap::new(),
            next_body: BodyId::FIRST_GROUP,
            events: EventQueue::new(),
            queued_config: None,
            boost_held: false,
        })
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    #[inline]
    pub fn state(&self) -> RoundState {
        self.round.state()
    }

    #[inline]
    pub fn round(&self) -> u32 {
        self.round.round()
    }

    #[inline]
    pub fn remaining(&self) -> f32 {
        self.round.remaining()
    }

    pub fn seconds_left_display(&self) -> u32 {
        display_seconds(self.round.remaining())
    }

    pub fn countdown_label(&self) -> String {
        countdown_label(self.round.remaining(), self.state() == RoundState::Countdown)
    }

    pub fn scene(&self) -> &VoxelScene {
        &self.scene
    }

    pub fn pending(&self) -> &CubeSet {
        &self.pending
    }

    pub fn falling(&self) -> Option<&FallingShape> {
        self.falling.as_ref()
    }

    pub fn color_of(&self, body: BodyId) -> Option<ShapeColor> {
        self.colors.get(&body).copied()
    }

    /// Landed cubes with their shape colour.
    pub fn settled_cubes(&self) -> impl Iterator<Item = (Cell, ShapeColor)> + '_ {
        self.scene
            .iter()
            .filter(|(_, b)| *b != BodyId::PENDING)
            .map(|(c, b)| (c, self.color_of(b).unwrap_or(ShapeColor::NEUTRAL)))
    }

    #[inline]
    pub fn tick(&self) -> u64 {
        self.events.now
    }

    pub fn drain_events(&mut self) -> Vec<EventEnvelope> {
        self.events.drain().collect()
    }

    fn transition(&mut self, to: RoundState) -> bool {
        match self.round.transition(to) {
            Some(from) => {
                self.events.emit_now(GameEvent::StateChanged { from, to });
                true
            }
            None => false,
        }
    }

    fn begin_countdown(&mut self) {
        if self.transition(RoundState::Countdown) {
            let round = self.round.round();
            self.events.emit_now(GameEvent::RoundStarted { round });
        }
    }

    /// Opens the first round. Does nothing once the game is running.
    pub fn start(&mut self) {
        if self.state() == RoundState::Idle {
            if let Some(cfg) = self.queued_config.take() {
                self.apply_config(cfg);
            }
            self.begin_countdown();
        }
    }

    /// Advances timers and the fall by `dt` seconds. Finalizing, spawning and
    /// grounding resolve within the call that triggers them.
    pub fn update(&mut self, dt: f32) {
        self.events.advance_tick();
        match self.state() {
            RoundState::Countdown => {
                if self.round.tick(dt) {
                    self.on_countdown_expired();
                }
            }
            RoundState::Falling => self.step_fall(dt),
            _ => {}
        }
    }

    fn on_countdown_expired(&mut self) {
        let placed = self.pending.len();
        log::info!("countdown expired with {} cube(s) placed", placed);
        self.events.emit_now(GameEvent::CountdownExpired { placed });
        if placed > 0 {
            self.transition(RoundState::PlayerShapeFinalizing);
            self.release_player_shape();
        } else {
            self.transition(RoundState::RandomShapeSpawning);
            self.spawn_random_group();
        }
    }

    fn alloc_body(&mut self) -> BodyId {
        let id = BodyId(self.next_body);
        self.next_body = self.next_body.wrapping_add(1).max(BodyId::FIRST_GROUP);
        id
    }

    fn release_player_shape(&mut self) {
        let cubes = self.pending.drain();
        self.scene.remove_body(BodyId::PENDING);
        let positions: Vec<Vec3> = cubes.iter().map(|c| c.cell.center()).collect();
        let params = self.config.fall_params(self.config.fall.player_start_delay);
        let body = self.alloc_body();
        let group = ShapeGroup::from_positions(body, &positions, params);
        self.release(group, ShapeSource::Player);
    }

    fn spawn_random_group(&mut self) {
        let spawn = build_spawn_group(
            &self.config.shape_params(),
            &self.config.group_params(),
            self.config.spawn_point(),
            &mut self.rng,
        );
        let params = self.config.fall_params(self.config.spawner.spawn_delay);
        let body = self.alloc_body();
        let group = ShapeGroup::new(body, spawn.origin, spawn.offsets, params);
        self.release(group, ShapeSource::Random);
    }

    fn release(&mut self, mut group: ShapeGroup, source: ShapeSource) {
        let color = ShapeColor::random(&mut self.rng);
        group.set_boost(self.boost_held);
        let body = group.body();
        let cubes = group.len();
        log::info!("released {:?} shape {:?} with {} cube(s)", source, body, cubes);
        self.events.emit_now(GameEvent::ShapeReleased { body, cubes, source });
        self.falling = Some(FallingShape { group, color, source });
        self.transition(RoundState::Falling);
    }

    fn step_fall(&mut self, dt: f32) {
        let Some(falling) = self.falling.as_mut() else {
            log::warn!("falling state without a group; skipping to the next round");
            self.transition(RoundState::Grounded);
            self.finish_round();
            return;
        };
        if let Some(landing) = falling.group.update(dt, &self.scene) {
            let color = falling.color;
            self.falling = None;
            self.on_landed(landing, color);
        }
    }

    fn on_landed(&mut self, landing: Landing, color: ShapeColor) {
        let Landing { body, cells, .. } = landing;
        let added = self.scene.insert_body(body, cells.iter().copied());
        if added < cells.len() {
            log::warn!(
                "group {:?} landed on {} occupied cell(s)",
                body,
                cells.len() - added
            );
        }
        self.colors.insert(body, color);
        self.events.emit_now(GameEvent::ShapeLanded { body, cells });
        self.transition(RoundState::Grounded);
        self.finish_round();
    }

    /// Grounded: enforce the height limit, apply queued settings and open the
    /// next countdown.
    fn finish_round(&mut self) {
        if let Some(height) = self.scene.max_height() {
            if height >= self.config.board.max_height {
                log::warn!("board full at height {}; clearing", height);
                self.events.emit_now(GameEvent::BoardFull { height });
                self.scene.clear();
                self.colors.clear();
            }
        }
        self.pending.clear();
        if let Some(cfg) = self.queued_config.take() {
            self.apply_config(cfg);
        }
        self.begin_countdown();
    }

    /// Adds a cube at `cell` to the shape being built.
    pub fn try_place(&mut self, cell: Cell) -> Result<CubeId, PlacementError> {
        let result = self.place(cell);
        match &result {
            Ok(id) => {
                log::debug!("placed cube {} at {:?}", id, cell);
                self.events.emit_now(GameEvent::CubePlaced { id: *id, cell });
            }
            Err(reason) => {
                log::debug!("rejected placement at {:?}: {}", cell, reason);
                self.events
                    .emit_now(GameEvent::PlacementRejected { reason: *reason });
            }
        }
        result
    }

    /// Dry run of `try_place`: whether a cube could go into `cell` now.
    pub fn check_placement(&self, cell: Cell) -> Result<(), PlacementError> {
        if !self.state().accepts_placement() {
            return Err(PlacementError::Locked);
        }
        self.validator
            .validate(&self.pending, cell, |c| self.scene.is_occupied(c))
    }

    fn place(&mut self, cell: Cell) -> Result<CubeId, PlacementError> {
        self.check_placement(cell)?;
        let id = self
            .pending
            .insert(cell)
            .ok_or(PlacementError::Occupied(cell))?;
        self.scene.insert_cell(BodyId::PENDING, cell);
        Ok(id)
    }

    /// Resolves a tap given as a world-space ray (camera through the cursor)
    /// to a cell and places a cube there.
    pub fn tap(&mut self, origin: Vec3, dir: Vec3) -> Result<CubeId, PlacementError> {
        match self.tap_target(origin, dir) {
            Ok(cell) => self.try_place(cell),
            Err(reason) => {
                log::debug!("tap rejected: {}", reason);
                self.events
                    .emit_now(GameEvent::PlacementRejected { reason });
                Err(reason)
            }
        }
    }

    /// The cell a tap along `origin + t * dir` would place into.
    pub fn tap_target(&self, origin: Vec3, dir: Vec3) -> Result<Cell, PlacementError> {
        if !self.state().accepts_placement() {
            return Err(PlacementError::Locked);
        }
        let p = &self.config.placement;
        let hit = self
            .scene
            .raycast(origin, dir.normalized(), p.tap_reach, QueryFilter::none())
            .ok_or(PlacementError::Missed)?;
        let cell = resolve_tap(hit.point, hit.normal, self.config.spawn_offset());
        if p.snap_to_shape && !self.pending.is_empty() {
            if let Some(snap) =
                nearest_connection_point(&self.pending, cell.center(), p.connection_distance)
            {
                return Ok(Cell::from_world(snap));
            }
        }
        Ok(cell)
    }

    /// Boost key down/up; affects the current and later groups while held.
    pub fn set_boost(&mut self, on: bool) {
        self.boost_held = on;
        if let Some(f) = self.falling.as_mut() {
            f.group.set_boost(on);
        }
    }

    /// Shifts the falling group one cube left (`-1`) or right (`1`).
    pub fn nudge(&mut self, dir_x: i32) -> bool {
        let range = self.config.lateral_range();
        match self.falling.as_mut() {
            Some(f) => f.group.try_shift(dir_x, &self.scene, range),
            None => false,
        }
    }

    /// Stores settings to take effect at the next round boundary.
    pub fn queue_config(&mut self, config: GameConfig) -> Result<(), ConfigError> {
        config.validate()?;
        if self.state() == RoundState::Idle {
            self.apply_config(config);
        } else {
            log::info!("config change queued until the round ends");
            self.queued_config = Some(config);
        }
        Ok(())
    }

    fn apply_config(&mut self, config: GameConfig) {
        if config == self.config {
            return;
        }
        if config.board.floor_y != self.config.board.floor_y {
            log::warn!("board.floor_y changes need a restart; keeping {}", self.scene.floor_y());
        }
        self.round.set_duration(config.round.countdown_secs);
        self.validator = PlacementValidator::new(config.board_bounds());
        self.config = config;
        log::info!("applied new game config");
        self.events.emit_now(GameEvent::ConfigApplied);
    }
}
