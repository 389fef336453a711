use std::collections::VecDeque;

use cubefall_geom::Cell;
use cubefall_grid::{CubeId, PlacementError};
use cubefall_physics::BodyId;

use crate::round::RoundState;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum ShapeSource {
    Player,
    Random,
}

#[derive(Clone, Debug, PartialEq)]
pub enum GameEvent {
    StateChanged { from: RoundState, to: RoundState },
    RoundStarted { round: u32 },
    CubePlaced { id: CubeId, cell: Cell },
    PlacementRejected { reason: PlacementError },
    CountdownExpired { placed: usize },
    ShapeReleased { body: BodyId, cubes: usize, source: ShapeSource },
    ShapeLanded { body: BodyId, cells: Vec<Cell> },
    BoardFull { height: i32 },
    ConfigApplied,
}

#[derive(Clone, Debug)]
pub struct EventEnvelope {
    pub id: u64,
    pub tick: u64,
    pub kind: GameEvent,
}

/// FIFO of game events stamped with the frame they happened on.
pub struct EventQueue {
    items: VecDeque<EventEnvelope>,
    pub now: u64,
    next_id: u64,
}

impl Default for EventQueue {
    fn default() -> Self {
        Self { items: VecDeque::new(), now: 0, next_id: 1 }
    }
}

impl EventQueue {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    fn alloc_id(&mut self) -> u64 {
        let id = self.next_id;
        self.next_id = self.next_id.wrapping_add(1).max(1);
        id
    }

    pub fn emit_now(&mut self, kind: GameEvent) -> u64 {
        let id = self.alloc_id();
        self.items.push_back(EventEnvelope { id, tick: self.now, kind });
        id
    }

    pub fn pop_ready(&mut self) -> Option<EventEnvelope> {
        self.items.pop_front()
    }

    pub fn drain(&mut self) -> impl Iterator<Item = EventEnvelope> + '_ {
        self.items.drain(..)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn advance_tick(&mut self) {
        self.now = self.now.wrapping_add(1);
    }
}
