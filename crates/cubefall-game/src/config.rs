use std::path::Path;

use cubefall_geom::{Cell, Vec3};
use cubefall_grid::BoardBounds;
use cubefall_physics::{FallMode, FallParams};
use cubefall_shapes::{GroupParams, ShapeParams};
use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
pub struct GameConfig {
    #[serde(default)]
    pub round: RoundConfig,
    #[serde(default)]
    pub placement: PlacementConfig,
    #[serde(default)]
    pub fall: FallConfig,
    #[serde(default)]
    pub spawner: SpawnerConfig,
    #[serde(default)]
    pub board: BoardConfig,
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct RoundConfig {
    #[serde(default = "default_countdown")]
    pub countdown_secs: f32,
}

fn default_countdown() -> f32 {
    5.0
}

impl Default for RoundConfig {
    fn default() -> Self {
        Self {
            countdown_secs: default_countdown(),
        }
    }
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct PlacementConfig {
    #[serde(default = "default_connection_distance")]
    pub connection_distance: f32,
    #[serde(default)]
    pub spawn_offset: [f32; 3],
    #[serde(default = "default_true")]
    pub snap_to_shape: bool,
    #[serde(default = "default_tap_reach")]
    pub tap_reach: f32,
}

fn default_connection_distance() -> f32 {
    1.1
}

fn default_true() -> bool {
    true
}

fn default_tap_reach() -> f32 {
    200.0
}

impl Default for PlacementConfig {
    fn default() -> Self {
        Self {
            connection_distance: default_connection_distance(),
            spawn_offset: [0.0; 3],
            snap_to_shape: true,
            tap_reach: default_tap_reach(),
        }
    }
}

#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum FallModeConfig {
    Stepped,
    Glide,
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct FallConfig {
    #[serde(default = "default_mode")]
    pub mode: FallModeConfig,
    #[serde(default = "default_fall_interval")]
    pub fall_interval: f32,
    #[serde(default = "default_step_size")]
    pub step_size: f32,
    #[serde(default = "default_probe_margin")]
    pub probe_margin: f32,
    #[serde(default = "default_ground_probe")]
    pub ground_probe: f32,
    #[serde(default = "default_move_speed")]
    pub move_speed: f32,
    #[serde(default = "default_boosted_move_speed")]
    pub boosted_move_speed: f32,
    #[serde(default = "default_boost_mult")]
    pub speed_boost_multiplier: f32,
    #[serde(default)]
    pub player_start_delay: f32,
    #[serde(default = "default_glide_speed")]
    pub glide_speed: f32,
    #[serde(default = "default_max_probe")]
    pub max_probe_distance: f32,
    #[serde(default = "default_snap")]
    pub snap_resolution: f32,
    #[serde(default = "default_kill_y")]
    pub kill_y: f32,
}

fn default_mode() -> FallModeConfig {
    FallModeConfig::Stepped
}

fn default_fall_interval() -> f32 {
    0.5
}

fn default_step_size() -> f32 {
    1.0
}

fn default_probe_margin() -> f32 {
    0.1
}

fn default_ground_probe() -> f32 {
    0.2
}

fn default_move_speed() -> f32 {
    10.0
}

fn default_boosted_move_speed() -> f32 {
    20.0
}

fn default_boost_mult() -> f32 {
    3.0
}

fn default_glide_speed() -> f32 {
    10.0
}

fn default_max_probe() -> f32 {
    20.0
}

fn default_snap() -> f32 {
    0.5
}

fn default_kill_y() -> f32 {
    -50.0
}

impl Default for FallConfig {
    fn default() -> Self {
        Self {
            mode: default_mode(),
            fall_interval: default_fall_interval(),
            step_size: default_step_size(),
            probe_margin: default_probe_margin(),
            ground_probe: default_ground_probe(),
            move_speed: default_move_speed(),
            boosted_move_speed: default_boosted_move_speed(),
            speed_boost_multiplier: default_boost_mult(),
            player_start_delay: 0.0,
            glide_speed: default_glide_speed(),
            max_probe_distance: default_max_probe(),
            snap_resolution: default_snap(),
            kill_y: default_kill_y(),
        }
    }
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct SpawnerConfig {
    #[serde(default = "default_spawn_point")]
    pub spawn_point: [f32; 3],
    #[serde(default = "default_max_width")]
    pub max_width: usize,
    #[serde(default = "default_max_height")]
    pub max_height: usize,
    #[serde(default = "default_min_cubes")]
    pub min_cubes: usize,
    #[serde(default = "default_max_cubes")]
    pub max_cubes: usize,
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
    #[serde(default = "default_min_shapes")]
    pub min_shapes: usize,
    #[serde(default = "default_max_shapes")]
    pub max_shapes: usize,
    #[serde(default = "default_cube_size")]
    pub cube_size: f32,
    #[serde(default = "default_shape_spacing")]
    pub shape_spacing: f32,
    #[serde(default = "default_spawn_delay")]
    pub spawn_delay: f32,
}

fn default_spawn_point() -> [f32; 3] {
    [0.0, 10.0, 0.0]
}

fn default_max_width() -> usize {
    7
}

fn default_max_height() -> usize {
    4
}

fn default_min_cubes() -> usize {
    2
}

fn default_max_cubes() -> usize {
    4
}

fn default_max_attempts() -> u32 {
    50
}

fn default_min_shapes() -> usize {
    2
}

fn default_max_shapes() -> usize {
    4
}

fn default_cube_size() -> f32 {
    1.0
}

fn default_shape_spacing() -> f32 {
    2.0
}

fn default_spawn_delay() -> f32 {
    1.0
}

impl Default for SpawnerConfig {
    fn default() -> Self {
        Self {
            spawn_point: default_spawn_point(),
            max_width: default_max_width(),
            max_height: default_max_height(),
            min_cubes: default_min_cubes(),
            max_cubes: default_max_cubes(),
            max_attempts: default_max_attempts(),
            min_shapes: default_min_shapes(),
            max_shapes: default_max_shapes(),
            cube_size: default_cube_size(),
            shape_spacing: default_shape_spacing(),
            spawn_delay: default_spawn_delay(),
        }
    }
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct BoardConfig {
    #[serde(default = "default_floor_y")]
    pub floor_y: f32,
    #[serde(default = "default_half_width")]
    pub half_width: i32,
    #[serde(default = "default_half_depth")]
    pub half_depth: i32,
    #[serde(default = "default_board_height")]
    pub max_height: i32,
}

fn default_floor_y() -> f32 {
    -0.5
}

fn default_half_width() -> i32 {
    20
}

fn default_half_depth() -> i32 {
    6
}

fn default_board_height() -> i32 {
    9
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            floor_y: default_floor_y(),
            half_width: default_half_width(),
            half_depth: default_half_depth(),
            max_height: default_board_height(),
        }
    }
}

#[inline]
fn vec3(a: [f32; 3]) -> Vec3 {
    Vec3::new(a[0], a[1], a[2])
}

impl GameConfig {
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let cfg: GameConfig = toml::from_str(s)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let s = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&s)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |msg: &str| Err(ConfigError::Invalid(msg.to_string()));
        let f = &self.fall;
        let s = &self.spawner;
        if self.round.countdown_secs <= 0.0 {
            return invalid("round.countdown_secs must be positive");
        }
        if f.fall_interval <= 0.0 || f.step_size <= 0.0 {
            return invalid("fall.fall_interval and fall.step_size must be positive");
        }
        if f.ground_probe <= 0.0 {
            return invalid("fall.ground_probe must be positive");
        }
        if f.snap_resolution <= 0.0 {
            return invalid("fall.snap_resolution must be positive");
        }
        if f.move_speed <= 0.0 || f.boosted_move_speed <= 0.0 || f.glide_speed <= 0.0 {
            return invalid("fall speeds must be positive");
        }
        if f.speed_boost_multiplier < 1.0 {
            return invalid("fall.speed_boost_multiplier must be at least 1");
        }
        if f.probe_margin < 0.0 || f.probe_margin >= f.step_size {
            return invalid("fall.probe_margin must lie in [0, step_size)");
        }
        if s.max_width == 0 || s.max_height == 0 {
            return invalid("spawner mask must be at least 1x1");
        }
        if s.min_cubes == 0 || s.min_cubes > s.max_cubes {
            return invalid("spawner.min_cubes must be in 1..=max_cubes");
        }
        if s.min_shapes == 0 || s.min_shapes > s.max_shapes {
            return invalid("spawner.min_shapes must be in 1..=max_shapes");
        }
        if s.cube_size <= 0.0 {
            return invalid("spawner.cube_size must be positive");
        }
        if self.board.half_width < 0 || self.board.half_depth < 0 || self.board.max_height < 1 {
            return invalid("board dimensions must be non-negative with max_height >= 1");
        }
        Ok(())
    }

    pub fn fall_params(&self, start_delay: f32) -> FallParams {
        let f = &self.fall;
        FallParams {
            mode: match f.mode {
                FallModeConfig::Stepped => FallMode::Stepped,
                FallModeConfig::Glide => FallMode::Glide,
            },
            fall_interval: f.fall_interval,
            step_size: f.step_size,
            probe_margin: f.probe_margin,
            ground_probe: f.ground_probe,
            move_speed: f.move_speed,
            boosted_move_speed: f.boosted_move_speed,
            speed_boost_multiplier: f.speed_boost_multiplier,
            start_delay,
            glide_speed: f.glide_speed,
            max_probe_distance: f.max_probe_distance,
            snap_resolution: f.snap_resolution,
            cube_half: self.spawner.cube_size * 0.5,
            kill_y: f.kill_y,
        }
    }

    pub fn shape_params(&self) -> ShapeParams {
        let s = &self.spawner;
        ShapeParams {
            width: s.max_width,
            height: s.max_height,
            min_cubes: s.min_cubes,
            max_cubes: s.max_cubes,
            max_attempts: s.max_attempts,
        }
    }

    pub fn group_params(&self) -> GroupParams {
        let s = &self.spawner;
        GroupParams {
            min_shapes: s.min_shapes,
            max_shapes: s.max_shapes,
            cube_size: s.cube_size,
            shape_spacing: s.shape_spacing,
        }
    }

    pub fn spawn_point(&self) -> Vec3 {
        vec3(self.spawner.spawn_point)
    }

    pub fn spawn_offset(&self) -> Vec3 {
        vec3(self.placement.spawn_offset)
    }

    /// Cells the player may build in: the board footprint from the floor row
    /// up to `max_height - 1`.
    pub fn board_bounds(&self) -> BoardBounds {
        let b = &self.board;
        BoardBounds {
            min: Cell::new(-b.half_width, 0, -b.half_depth),
            max: Cell::new(b.half_width, b.max_height - 1, b.half_depth),
        }
    }

    /// Inclusive range of cube centres a falling group may be nudged across.
    pub fn lateral_range(&self) -> (f32, f32) {
        let w = self.board.half_width as f32 * self.spawner.cube_size;
        (-w, w)
    }
}
