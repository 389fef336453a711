/// Phases of one round.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RoundState {
    Idle,
    Countdown,
    PlayerShapeFinalizing,
    RandomShapeSpawning,
    Falling,
    Grounded,
}

impl RoundState {
    pub fn can_transition_to(self, to: RoundState) -> bool {
        use RoundState::*;
        matches!(
            (self, to),
            (Idle, Countdown)
                | (Countdown, PlayerShapeFinalizing)
                | (Countdown, RandomShapeSpawning)
                | (PlayerShapeFinalizing, Falling)
                | (RandomShapeSpawning, Falling)
                | (Falling, Grounded)
                | (Grounded, Countdown)
        )
    }

    #[inline]
    pub fn accepts_placement(self) -> bool {
        matches!(self, RoundState::Countdown)
    }
}

/// Owns the round phase and the countdown timer.
#[derive(Debug, Clone)]
pub struct RoundController {
    state: RoundState,
    duration: f32,
    remaining: f32,
    round: u32,
}

impl RoundController {
    pub fn new(countdown_secs: f32) -> Self {
        Self {
            state: RoundState::Idle,
            duration: countdown_secs,
            remaining: 0.0,
            round: 0,
        }
    }

    #[inline]
    pub fn state(&self) -> RoundState {
        self.state
    }

    #[inline]
    pub fn remaining(&self) -> f32 {
        self.remaining
    }

    #[inline]
    pub fn round(&self) -> u32 {
        self.round
    }

    #[inline]
    pub fn duration(&self) -> f32 {
        self.duration
    }

    /// Takes effect on the next countdown.
    pub fn set_duration(&mut self, secs: f32) {
        self.duration = secs;
    }

    /// Moves to `to` if the edge exists. Returns the previous state.
    pub fn transition(&mut self, to: RoundState) -> Option<RoundState> {
        let from = self.state;
        if !from.can_transition_to(to) {
            log::error!("ignored round transition {:?} -> {:?}", from, to);
            return None;
        }
        if to == RoundState::Countdown {
            self.remaining = self.duration;
            self.round = self.round.wrapping_add(1);
        }
        self.state = to;
        log::info!("round {}: {:?} -> {:?}", self.round, from, to);
        Some(from)
    }

    /// Runs the countdown; true on the frame it reaches zero.
    pub fn tick(&mut self, dt: f32) -> bool {
        if self.state != RoundState::Countdown || self.remaining <= 0.0 {
            return false;
        }
        self.remaining = (self.remaining - dt).max(0.0);
        self.remaining <= 0.0
    }
}
