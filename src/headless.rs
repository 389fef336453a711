use std::path::Path;
use std::sync::mpsc::Receiver;

use cubefall_game::{Game, GameEvent, RoundState};
use cubefall_geom::{Cell, Vec3};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::config::poll_config_reload;

const DT: f32 = 1.0 / 60.0;
const TAP_INTERVAL: f32 = 0.25;
const MAX_TAPS: usize = 4;

/// What a headless session did.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Summary {
    pub rounds: u32,
    pub frames: u64,
    pub cubes_placed: usize,
    pub placements_rejected: usize,
    pub random_spawns: u32,
    pub board_clears: u32,
    pub settled: usize,
}

/// Plays `rounds` rounds without a window: a scripted player taps a few
/// cells each countdown at a fixed 60 Hz step.
pub fn run(
    mut game: Game,
    config_path: &Path,
    watcher: Option<Receiver<()>>,
    rounds: u32,
    seed: Option<u64>,
) -> Summary {
    let mut rng = match seed {
        Some(s) => StdRng::seed_from_u64(s.wrapping_add(1)),
        None => StdRng::from_entropy(),
    };
    let mut summary = Summary::default();
    let mut taps_left = 0usize;
    let mut tap_timer = 0.0f32;
    // Generous cap so a stuck round cannot spin forever.
    let max_frames = u64::from(rounds.max(1)) * 60 * 60;

    game.start();
    while summary.rounds < rounds && summary.frames < max_frames {
        poll_config_reload(watcher.as_ref(), config_path, &mut game);

        if game.state() == RoundState::Countdown && taps_left > 0 {
            tap_timer -= DT;
            if tap_timer <= 0.0 {
                tap_timer = TAP_INTERVAL;
                taps_left -= 1;
                scripted_tap(&mut game, &mut rng);
            }
        }

        game.update(DT);
        summary.frames += 1;

        for ev in game.drain_events() {
            match ev.kind {
                GameEvent::RoundStarted { round } => {
                    taps_left = rng.gen_range(0..=MAX_TAPS);
                    tap_timer = TAP_INTERVAL;
                    log::debug!("round {}: scripting {} tap(s)", round, taps_left);
                }
                GameEvent::CubePlaced { .. } => summary.cubes_placed += 1,
                GameEvent::PlacementRejected { .. } => summary.placements_rejected += 1,
                GameEvent::CountdownExpired { placed: 0 } => summary.random_spawns += 1,
                GameEvent::ShapeLanded { cells, .. } => {
                    summary.rounds += 1;
                    log::info!(
                        "round {} landed {} cube(s), stack height {:?}",
                        summary.rounds,
                        cells.len(),
                        game.scene().max_height()
                    );
                }
                GameEvent::BoardFull { .. } => summary.board_clears += 1,
                _ => {}
            }
        }
    }

    summary.settled = game.settled_cubes().count();
    if summary.rounds < rounds {
        log::warn!(
            "stopped after {} frame(s) with {} of {} round(s) done",
            summary.frames,
            summary.rounds,
            rounds
        );
    }
    log::info!("headless session finished: {:?}", summary);
    summary
}

/// First cube: a tap from straight above a random column. Later cubes: a
/// random face neighbour of a cube already placed.
fn scripted_tap<R: Rng>(game: &mut Game, rng: &mut R) {
    let Some(anchor) = pick_anchor(game, rng) else {
        let x = rng.gen_range(-4..=4) as f32;
        let z = rng.gen_range(-2..=2) as f32;
        let _ = game.tap(Vec3::new(x, 40.0, z), Vec3::DOWN);
        return;
    };
    let n = anchor.neighbors();
    let cell = n[rng.gen_range(0..n.len())];
    let _ = game.try_place(cell);
}

fn pick_anchor<R: Rng>(game: &Game, rng: &mut R) -> Option<Cell> {
    let cells: Vec<Cell> = game.pending().cells().collect();
    if cells.is_empty() {
        return None;
    }
    Some(cells[rng.gen_range(0..cells.len())])
}

#[cfg(test)]
mod tests {
    use super::*;
    use cubefall_game::GameConfig;

    #[test]
    fn seeded_session_plays_requested_rounds() {
        let game = Game::new(GameConfig::default(), Some(11)).unwrap();
        let summary = run(game, Path::new("unused.toml"), None, 3, Some(11));
        assert_eq!(summary.rounds, 3);
        assert!(summary.settled > 0 || summary.board_clears > 0);
    }

    #[test]
    fn same_seed_same_session() {
        let a = run(
            Game::new(GameConfig::default(), Some(5)).unwrap(),
            Path::new("unused.toml"),
            None,
            2,
            Some(5),
        );
        let b = run(
            Game::new(GameConfig::default(), Some(5)).unwrap(),
            Path::new("unused.toml"),
            None,
            2,
            Some(5),
        );
        assert_eq!(a, b);
    }
}
