use std::collections::VecDeque;
use std::path::PathBuf;
use std::sync::mpsc::Receiver;

use cubefall_game::Game;
use raylib::prelude::Vector3;

use super::{App, SessionStats};
use crate::camera::OrbitCamera;
use crate::config::HostConfig;

impl App {
    pub fn new(
        game: Game,
        host: HostConfig,
        config_path: PathBuf,
        config_rx: Option<Receiver<()>>,
    ) -> Self {
        let board = &game.config().board;
        let target = Vector3::new(0.0, board.max_height as f32 * 0.35, 0.0);
        let cam = OrbitCamera::new(target, &host.camera);
        log::info!(
            "board {}x{} cells, height limit {}",
            board.half_width * 2 + 1,
            board.half_depth * 2 + 1,
            board.max_height
        );
        Self {
            game,
            cam,
            host,
            stats: SessionStats::default(),
            hover: None,
            messages: VecDeque::new(),
            config_path,
            config_rx,
        }
    }
}
