mod app;
mod camera;
mod config;
mod headless;

use std::error::Error;
use std::path::PathBuf;
use std::sync::mpsc::Receiver;

use clap::Parser;
use cubefall_game::Game;

use crate::app::App;

#[derive(Parser, Debug)]
#[command(name = "cubefall")]
#[command(about = "Build shapes from cubes and watch them fall")]
struct Cli {
    /// Settings file
    #[arg(long, default_value = "assets/cubefall.toml")]
    config: PathBuf,

    /// Seed for shapes and colours
    #[arg(long)]
    seed: Option<u64>,

    /// Reload settings when the file changes (applied between rounds)
    #[arg(long)]
    watch_config: bool,

    /// Run without a window using a scripted player
    #[arg(long)]
    headless: bool,

    /// Rounds to play in headless mode
    #[arg(long, default_value_t = 10)]
    rounds: u32,

    /// Log filter, e.g. `debug` or `cubefall_game=trace` (overrides RUST_LOG)
    #[arg(long)]
    log_level: Option<String>,
}

fn init_logging(level: Option<&str>) {
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    if let Some(filter) = level {
        builder.parse_filters(filter);
    }
    builder.init();
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();
    init_logging(cli.log_level.as_deref());

    let game_cfg = config::load_game_config(&cli.config)?;
    let game = Game::new(game_cfg, cli.seed)?;
    let watcher = cli
        .watch_config
        .then(|| config::spawn_config_watcher(cli.config.clone()));

    if cli.headless {
        headless::run(game, &cli.config, watcher, cli.rounds, cli.seed);
        return Ok(());
    }
    run_window(game, cli.config, watcher);
    Ok(())
}

fn run_window(game: Game, config_path: PathBuf, watcher: Option<Receiver<()>>) {
    let host = config::load_host_config(&config_path);
    let (mut rl, thread) = raylib::init()
        .size(host.window.width, host.window.height)
        .title(&host.window.title)
        .msaa_4x()
        .build();
    rl.set_target_fps(host.window.target_fps);

    let mut app = App::new(game, host, config_path, watcher);
    app.game.start();
    while !rl.window_should_close() {
        // Clamp long frames (window drags) so the fall does not tunnel.
        let dt = rl.get_frame_time().min(0.1);
        app.step(&mut rl, &thread, dt);
        app.render(&mut rl, &thread);
    }
    log::info!("session stats: {:?}", app.stats);
}
