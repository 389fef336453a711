use std::collections::VecDeque;
use std::path::PathBuf;
use std::sync::mpsc::Receiver;

use cubefall_game::Game;
use cubefall_geom::Cell;

use crate::camera::OrbitCamera;
use crate::config::HostConfig;

pub struct App {
    pub game: Game,
    pub cam: OrbitCamera,
    pub host: HostConfig,
    pub stats: SessionStats,
    pub(crate) hover: Option<HoverTarget>,
    pub(crate) messages: VecDeque<String>,
    pub(crate) config_path: PathBuf,
    pub(crate) config_rx: Option<Receiver<()>>,
}

/// Cell under the cursor and whether a cube could go there.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct HoverTarget {
    pub cell: Cell,
    pub valid: bool,
}

#[derive(Default, Debug, Clone)]
pub struct SessionStats {
    pub rounds_finished: u32,
    pub cubes_placed: usize,
    pub placements_rejected: usize,
    pub cubes_settled: usize,
    pub board_clears: u32,
    pub random_spawns: u32,
}

pub(crate) const MAX_MESSAGES: usize = 5;
