use cubefall_game::{EventEnvelope, GameEvent, RoundState, ShapeSource};

use super::App;
use super::state::MAX_MESSAGES;

impl App {
    pub(crate) fn handle_event(&mut self, env: EventEnvelope) {
        log::trace!("event #{} @{}: {:?}", env.id, env.tick, env.kind);
        match env.kind {
            GameEvent::RoundStarted { round } => {
                self.push_message(format!("Round {round}: build a shape!"));
            }
            GameEvent::CubePlaced { .. } => self.stats.cubes_placed += 1,
            GameEvent::PlacementRejected { reason } => {
                self.stats.placements_rejected += 1;
                log::debug!("placement rejected: {}", reason);
            }
            GameEvent::CountdownExpired { placed } => {
                if placed == 0 {
                    self.push_message("Time's up, incoming blocks!".to_string());
                }
            }
            GameEvent::ShapeReleased { source, cubes, .. } => {
                if source == ShapeSource::Random {
                    self.stats.random_spawns += 1;
                }
                self.push_message(format!("{cubes} cube(s) falling"));
            }
            GameEvent::ShapeLanded { cells, .. } => {
                self.stats.rounds_finished += 1;
                self.stats.cubes_settled += cells.len();
            }
            GameEvent::BoardFull { height } => {
                self.stats.board_clears += 1;
                self.push_message(format!("Board full at height {height}, clearing"));
            }
            GameEvent::ConfigApplied => self.push_message("Settings reloaded".to_string()),
            GameEvent::StateChanged { to: RoundState::Grounded, .. } => {
                log::debug!(
                    "settled {} cube(s) over {} round(s)",
                    self.stats.cubes_settled,
                    self.stats.rounds_finished
                );
            }
            GameEvent::StateChanged { .. } => {}
        }
    }

    fn push_message(&mut self, msg: String) {
        if self.messages.len() == MAX_MESSAGES {
            self.messages.pop_front();
        }
        self.messages.push_back(msg);
    }
}
